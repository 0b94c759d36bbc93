// Worker-side rendering constants.

pub const GLOW_BLUR_PX: f64 = 14.0; // shadow blur radius in pixels
pub const GLOW_SHADOW_ALPHA: f32 = 0.55;
pub const GUIDELINE_COLOR: &str = "rgba(148, 163, 184, 0.08)";
