#![cfg(target_arch = "wasm32")]
//! Worker-side entry point. The host page spawns this module in a dedicated
//! worker, transfers an `OffscreenCanvas` with `init`, and from then on the
//! worker owns the surface outright: it runs the simulation, strokes every
//! frame, and posts periodic `performance` reports back.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

mod constants;
mod frame;
mod render;
mod worker;

use frame::SimLoop;
use worker::WorkerCommand;

struct App {
    sim_loop: Option<SimLoop>,
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    let scope: web::DedicatedWorkerGlobalScope = js_sys::global()
        .dyn_into()
        .map_err(|_| JsValue::from_str("not running in a dedicated worker"))?;
    log::info!("driftline worker ready");

    let app = Rc::new(RefCell::new(App { sim_loop: None }));
    let scope_for_msg = scope.clone();
    let onmessage = Closure::wrap(Box::new(move |ev: web::MessageEvent| {
        handle_message(&app, &scope_for_msg, ev);
    }) as Box<dyn FnMut(web::MessageEvent)>);
    scope.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    onmessage.forget();
    Ok(())
}

fn handle_message(
    app: &Rc<RefCell<App>>,
    scope: &web::DedicatedWorkerGlobalScope,
    ev: web::MessageEvent,
) {
    let Some(cmd) = worker::decode_command(&ev) else {
        return;
    };
    let mut app = app.borrow_mut();
    match cmd {
        WorkerCommand::Init {
            canvas,
            width,
            height,
        } => {
            if app.sim_loop.is_some() {
                log::warn!("init ignored: loop already running");
                return;
            }
            // Setup failures are swallowed: the worker never starts its loop
            // and the host sees that as capability absence.
            match SimLoop::start(scope.clone(), canvas, width, height) {
                Ok(l) => app.sim_loop = Some(l),
                Err(e) => log::error!("init failed: {e:?}"),
            }
        }
        WorkerCommand::Resize { width, height } => {
            if let Some(l) = app.sim_loop.as_ref() {
                l.resize(width, height);
            }
        }
        WorkerCommand::Stop => {
            if let Some(l) = app.sim_loop.take() {
                l.stop();
            }
        }
    }
}
