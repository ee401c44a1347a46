//! Software canvas the overlay is painted on.

use anyhow::Result;
use image::{Rgba, RgbaImage};
use motion_cam::prelude::v1::*;
use std::path::Path;

/// Opaque black RGBA image with alpha blended drawing.
pub struct Canvas {
    img: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            img: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])),
        }
    }

    pub fn dim(&self) -> (u32, u32) {
        self.img.dimensions()
    }

    /// Paint everything black.
    pub fn clear(&mut self) {
        for p in self.img.pixels_mut() {
            *p = Rgba([0, 0, 0, 255]);
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.img
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.image().save(path).map_err(Into::into)
    }

    /// Blend a single pixel, ignoring out of bounds coordinates.
    pub fn blend(&mut self, x: i64, y: i64, color: RGBA) {
        let (w, h) = self.dim();
        if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
            return;
        }

        let dst = self.img.get_pixel_mut(x as u32, y as u32);
        let a = color.a as f32 / 255.0;
        let src = [color.r, color.g, color.b];

        for (d, s) in dst.0.iter_mut().zip(src) {
            *d = (s as f32 * a + *d as f32 * (1.0 - a)).round() as u8;
        }
        dst.0[3] = (color.a as f32 + dst.0[3] as f32 * (1.0 - a)).round() as u8;
    }

    /// Fill an axis aligned rectangle.
    ///
    /// Covers every pixel whose center lies within `[x, x + w) x [y, y + h)`.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: RGBA) {
        let (cw, ch) = self.dim();
        let x0 = (x - 0.5).ceil().max(0.0) as i64;
        let y0 = (y - 0.5).ceil().max(0.0) as i64;
        let x1 = ((x + w - 0.5).ceil() as i64).min(cw as i64);
        let y1 = ((y + h - 0.5).ceil() as i64).min(ch as i64);

        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color);
            }
        }
    }

    /// Fill a square around a center point.
    pub fn fill_square(&mut self, cx: f32, cy: f32, side: f32, color: RGBA) {
        self.fill_rect(cx - side / 2.0, cy - side / 2.0, side, side, color);
    }

    /// Draw a horizontal or vertical line.
    ///
    /// Diagonal lines are not needed by the overlay and are drawn as their bounding box.
    pub fn line(&mut self, (x0, y0): (f32, f32), (x1, y1): (f32, f32), weight: f32, color: RGBA) {
        let half = weight / 2.0;
        let (lx, hx) = (x0.min(x1), x0.max(x1));
        let (ly, hy) = (y0.min(y1), y0.max(y1));
        self.fill_rect(
            lx - half,
            ly - half,
            hx - lx + weight,
            hy - ly + weight,
            color,
        );
    }

    /// Outline a rectangle.
    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, weight: f32, color: RGBA) {
        self.line((x, y), (x + w, y), weight, color);
        self.line((x, y + h), (x + w, y + h), weight, color);
        self.line((x, y), (x, y + h), weight, color);
        self.line((x + w, y), (x + w, y + h), weight, color);
    }

    /// Outline a circle.
    pub fn ring(&mut self, cx: f32, cy: f32, radius: f32, weight: f32, color: RGBA) {
        let reach = (radius + weight).ceil() as i64;
        let (ix, iy) = (cx.round() as i64, cy.round() as i64);

        for py in iy - reach..=iy + reach {
            for px in ix - reach..=ix + reach {
                let (dx, dy) = (px as f32 + 0.5 - cx, py as f32 + 0.5 - cy);
                if ((dx * dx + dy * dy).sqrt() - radius).abs() <= weight / 2.0 {
                    self.blend(px, py, color);
                }
            }
        }
    }
}
