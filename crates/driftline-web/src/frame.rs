//! The worker-owned render loop: one `requestAnimationFrame` callback
//! advances physics, draws, and reschedules itself until stopped.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use instant::Instant;
use wasm_bindgen::closure::Closure;
use web_sys as web;

use driftline_core::Simulation;

use crate::render::Painter;
use crate::worker::{self, Raf};

struct FrameContext {
    sim: Simulation,
    painter: Painter,
    scope: web::DedicatedWorkerGlobalScope,
}

pub struct SimLoop {
    ctx: Rc<RefCell<FrameContext>>,
    raf: Rc<Raf>,
    raf_id: Rc<Cell<i32>>,
    running: Rc<Cell<bool>>,
    tick: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

impl SimLoop {
    pub fn start(
        scope: web::DedicatedWorkerGlobalScope,
        canvas: web::OffscreenCanvas,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Self> {
        let raf = Rc::new(Raf::detect(&scope)?);
        let painter = Painter::new(canvas)?;
        painter.resize(width, height);

        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        let mut sim = Simulation::new(seed);
        sim.init(width, height, worker::now_ms(&scope))?;

        let ctx = Rc::new(RefCell::new(FrameContext {
            sim,
            painter,
            scope,
        }));
        let raf_id = Rc::new(Cell::new(0));
        let running = Rc::new(Cell::new(true));
        let tick: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));

        let ctx_tick = ctx.clone();
        let raf_tick = raf.clone();
        let raf_id_tick = raf_id.clone();
        let running_tick = running.clone();
        let tick_clone = tick.clone();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            if !running_tick.get() {
                return;
            }
            frame(&ctx_tick, timestamp);
            if running_tick.get() {
                if let Some(cb) = tick_clone.borrow().as_ref() {
                    raf_id_tick.set(raf_tick.schedule(cb.as_ref()));
                }
            }
        }) as Box<dyn FnMut(f64)>));

        if let Some(cb) = tick.borrow().as_ref() {
            raf_id.set(raf.schedule(cb.as_ref()));
        }
        log::info!("render loop started at {width}x{height}");
        Ok(Self {
            ctx,
            raf,
            raf_id,
            running,
            tick,
        })
    }

    /// Applied to the owned canvas immediately, so it takes effect no later
    /// than the next drawn frame.
    pub fn resize(&self, width: u32, height: u32) {
        let mut ctx = self.ctx.borrow_mut();
        ctx.painter.resize(width, height);
        if let Err(e) = ctx.sim.resize(width, height) {
            log::error!("resize rejected: {e}");
        }
    }

    /// Cancels the pending frame callback before returning; no frame is
    /// drawn and no report is posted past this point.
    pub fn stop(&self) {
        self.running.set(false);
        self.raf.cancel(self.raf_id.get());
        self.tick.borrow_mut().take();
        self.ctx.borrow_mut().sim.stop();
        log::info!("render loop stopped");
    }
}

fn frame(ctx: &Rc<RefCell<FrameContext>>, now_ms: f64) {
    let mut ctx = ctx.borrow_mut();
    let ctx = &mut *ctx;

    let physics_start = Instant::now();
    ctx.sim.advance(now_ms);
    ctx.sim.prepare_draw();
    let physics_ms = physics_start.elapsed().as_secs_f64() * 1000.0;

    let render_start = Instant::now();
    ctx.painter.draw(ctx.sim.threads(), ctx.sim.glow());
    let render_ms = render_start.elapsed().as_secs_f64() * 1000.0;

    if let Some(report) = ctx
        .sim
        .record_frame(physics_ms as f32, render_ms as f32, now_ms)
    {
        worker::post_report(&ctx.scope, &report);
    }
}
