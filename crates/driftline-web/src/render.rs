//! Canvas2D painter: midpoint-quadratic smoothing with optional glow via
//! shadow blur and additive compositing.

use anyhow::anyhow;
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

use driftline_core::constants::pivot_x;
use driftline_core::{Thread, Visual};

use crate::constants::*;

pub struct Painter {
    canvas: web::OffscreenCanvas,
    ctx: web::OffscreenCanvasRenderingContext2d,
}

impl Painter {
    pub fn new(canvas: web::OffscreenCanvas) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow!("get_context failed: {e:?}"))?
            .ok_or_else(|| anyhow!("2d context unavailable"))?
            .dyn_into::<web::OffscreenCanvasRenderingContext2d>()
            .map_err(|_| anyhow!("unexpected 2d context type"))?;
        Ok(Self { canvas, ctx })
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    pub fn draw(&self, threads: &[Thread], glow: bool) {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        self.ctx.clear_rect(0.0, 0.0, w, h);

        self.draw_guideline(w, h);

        // Additive blending lets overlapping glows sum; plain compositing
        // without the shadow is markedly cheaper.
        _ = self
            .ctx
            .set_global_composite_operation(if glow { "lighter" } else { "source-over" });
        self.ctx.set_line_cap("round");
        self.ctx.set_shadow_blur(if glow { GLOW_BLUR_PX } else { 0.0 });

        for thread in threads {
            let pts: &[Vec2] = bytemuck::cast_slice(&thread.draw);
            if pts.len() < 2 {
                continue;
            }
            let v = &thread.visual;
            if glow {
                self.ctx.set_shadow_color(&hsla(v, GLOW_SHADOW_ALPHA));
            }
            self.ctx.set_line_width(v.stroke_width as f64);
            self.ctx.set_stroke_style_str(&hsla(v, v.opacity));
            self.ctx.begin_path();
            self.ctx.move_to(pts[0].x as f64, pts[0].y as f64);
            // Each vertex is a control point, midpoints are the on-curve
            // joints; no polyline kinks without a full spline fit.
            for i in 1..pts.len() - 1 {
                let mid = (pts[i] + pts[i + 1]) * 0.5;
                self.ctx.quadratic_curve_to(
                    pts[i].x as f64,
                    pts[i].y as f64,
                    mid.x as f64,
                    mid.y as f64,
                );
            }
            let last = pts[pts.len() - 1];
            self.ctx.line_to(last.x as f64, last.y as f64);
            self.ctx.stroke();
        }

        // Shadow state would leak into the next frame's guideline otherwise.
        if glow {
            self.ctx.set_shadow_blur(0.0);
        }
    }

    fn draw_guideline(&self, w: f64, h: f64) {
        _ = self.ctx.set_global_composite_operation("source-over");
        self.ctx.set_shadow_blur(0.0);
        let x = pivot_x() as f64 * w;
        self.ctx.set_line_width(1.0);
        self.ctx.set_stroke_style_str(GUIDELINE_COLOR);
        self.ctx.begin_path();
        self.ctx.move_to(x, 0.0);
        self.ctx.line_to(x, h);
        self.ctx.stroke();
    }
}

fn hsla(v: &Visual, alpha: f32) -> String {
    format!(
        "hsla({:.0}, {:.0}%, {:.0}%, {:.2})",
        v.hue, v.saturation, v.lightness, alpha
    )
}
