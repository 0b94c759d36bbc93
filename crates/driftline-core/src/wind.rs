//! Coarse 2D wind field, regenerated on a frame-count cadence and sampled
//! with bilinear interpolation every physics step.

use glam::Vec2;

use crate::constants::*;
use crate::noise;

pub struct WindField {
    grid: Vec<Vec2>,
}

impl WindField {
    pub fn new() -> Self {
        Self {
            grid: vec![Vec2::ZERO; WIND_COLS * WIND_ROWS],
        }
    }

    /// Rebuild the full grid from layered noise, advected slowly along x by
    /// elapsed time. Components are centered on zero in [-1, 1].
    pub fn regenerate(&mut self, elapsed_sec: f32, seed_x: f32, seed_y: f32) {
        for row in 0..WIND_ROWS {
            for col in 0..WIND_COLS {
                let fx = col as f32 * WIND_FREQUENCY + elapsed_sec * WIND_DRIFT + seed_x;
                let fy = row as f32 * WIND_FREQUENCY + seed_y;
                let vx = noise::fbm(fx, fy, WIND_OCTAVES, 101) * 2.0 - 1.0;
                let vy = noise::fbm(fx + 37.7, fy + 11.3, WIND_OCTAVES, 211) * 2.0 - 1.0;
                self.grid[row * WIND_COLS + col] = Vec2::new(vx, vy);
            }
        }
    }

    /// Bilinear lookup at a normalized position.
    pub fn sample(&self, x: f32, y: f32) -> Vec2 {
        let gx = x.clamp(0.0, 1.0) * (WIND_COLS - 1) as f32;
        let gy = y.clamp(0.0, 1.0) * (WIND_ROWS - 1) as f32;
        let x0 = gx.floor() as usize;
        let y0 = gy.floor() as usize;
        let x1 = (x0 + 1).min(WIND_COLS - 1);
        let y1 = (y0 + 1).min(WIND_ROWS - 1);
        let tx = gx - x0 as f32;
        let ty = gy - y0 as f32;

        let a = self.grid[y0 * WIND_COLS + x0];
        let b = self.grid[y0 * WIND_COLS + x1];
        let c = self.grid[y1 * WIND_COLS + x0];
        let d = self.grid[y1 * WIND_COLS + x1];
        let top = a.lerp(b, tx);
        let bottom = c.lerp(d, tx);
        top.lerp(bottom, ty)
    }
}

impl Default for WindField {
    fn default() -> Self {
        Self::new()
    }
}
