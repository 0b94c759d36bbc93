//! Worker-global helpers: command decoding, report encoding, and the frame
//! callback capability lookup.

use anyhow::anyhow;
use js_sys::{Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

use driftline_core::{PerfReport, QualityHint};

pub enum WorkerCommand {
    Init {
        canvas: web::OffscreenCanvas,
        width: u32,
        height: u32,
    },
    Resize {
        width: u32,
        height: u32,
    },
    Stop,
}

#[inline]
fn get(data: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(data, &JsValue::from_str(key)).ok()
}

#[inline]
fn get_u32(data: &JsValue, key: &str) -> Option<u32> {
    get(data, key)?.as_f64().map(|v| v as u32)
}

pub fn decode_command(ev: &web::MessageEvent) -> Option<WorkerCommand> {
    let data = ev.data();
    let kind = get(&data, "type")?.as_string()?;
    match kind.as_str() {
        "init" => {
            let canvas = get(&data, "canvas")?
                .dyn_into::<web::OffscreenCanvas>()
                .ok()?;
            Some(WorkerCommand::Init {
                canvas,
                width: get_u32(&data, "width")?,
                height: get_u32(&data, "height")?,
            })
        }
        "resize" => Some(WorkerCommand::Resize {
            width: get_u32(&data, "width")?,
            height: get_u32(&data, "height")?,
        }),
        "stop" => Some(WorkerCommand::Stop),
        other => {
            log::warn!("unknown command {other:?}");
            None
        }
    }
}

pub fn post_report(scope: &web::DedicatedWorkerGlobalScope, report: &PerfReport) {
    let msg = Object::new();
    let set = |key: &str, value: JsValue| {
        _ = Reflect::set(&msg, &JsValue::from_str(key), &value);
    };
    set("type", JsValue::from_str("performance"));
    set("physicsMs", JsValue::from_f64(report.physics_ms as f64));
    set("renderMs", JsValue::from_f64(report.render_ms as f64));
    set("totalMs", JsValue::from_f64(report.total_ms as f64));
    set("fps", JsValue::from_f64(report.fps as f64));
    set(
        "quality",
        match report.hint {
            Some(QualityHint::Down) => JsValue::from_str("down"),
            Some(QualityHint::Up) => JsValue::from_str("up"),
            None => JsValue::NULL,
        },
    );
    _ = scope.post_message(&msg);
}

pub fn now_ms(scope: &web::DedicatedWorkerGlobalScope) -> f64 {
    scope.performance().map(|p| p.now()).unwrap_or(0.0)
}

/// The worker's frame scheduling capability. `requestAnimationFrame` is not
/// available in workers on older engines; when the lookup fails the
/// simulation must not start at all.
pub struct Raf {
    scope: JsValue,
    request: Function,
    cancel: Option<Function>,
}

impl Raf {
    pub fn detect(scope: &web::DedicatedWorkerGlobalScope) -> anyhow::Result<Self> {
        let request = get(scope.as_ref(), "requestAnimationFrame")
            .and_then(|v| v.dyn_into::<Function>().ok())
            .ok_or_else(|| anyhow!("requestAnimationFrame unavailable in this worker"))?;
        let cancel = get(scope.as_ref(), "cancelAnimationFrame")
            .and_then(|v| v.dyn_into::<Function>().ok());
        Ok(Self {
            scope: scope.clone().into(),
            request,
            cancel,
        })
    }

    pub fn schedule(&self, callback: &JsValue) -> i32 {
        self.request
            .call1(&self.scope, callback)
            .ok()
            .and_then(|v| v.as_f64())
            .map(|id| id as i32)
            .unwrap_or(0)
    }

    pub fn cancel(&self, id: i32) {
        if let Some(cancel) = &self.cancel {
            _ = cancel.call1(&self.scope, &JsValue::from_f64(id as f64));
        }
    }
}
