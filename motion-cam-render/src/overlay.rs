//! Thermal camera style overlay: zone squares, crosshair, corner brackets and legend.

use crate::canvas::Canvas;
use motion_cam::prelude::v1::*;

/// Colour of all overlay strokes.
pub const STROKE: RGBA = RGBA::new(170, 170, 170, 255);
/// Width of all overlay strokes.
pub const STROKE_WEIGHT: f32 = 2.0;
/// Diameter of the crosshair ring.
const RING_DIAMETER: f32 = 8.0;

type Line = ((f32, f32), (f32, f32));

/// Overlay geometry for a given canvas and frame size.
///
/// The frame is centered on the canvas. When the canvas is wider than the frame, brackets and the
/// legend are placed relative to the frame instead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    canvas: (f32, f32),
    frame: (f32, f32),
    grid: f32,
}

impl Layout {
    pub fn new(canvas: (u32, u32), frame: (usize, usize), grid_size: usize) -> Self {
        Self {
            canvas: (canvas.0 as f32, canvas.1 as f32),
            frame: (frame.0 as f32, frame.1 as f32),
            grid: grid_size as f32,
        }
    }

    /// Position of the frame's top-left corner on the canvas.
    pub fn offset(&self) -> (f32, f32) {
        (
            self.canvas.0 / 2.0 - self.frame.0 / 2.0,
            self.canvas.1 / 2.0 - self.frame.1 / 2.0,
        )
    }

    fn min_width(&self) -> f32 {
        self.canvas.0.min(self.frame.0)
    }

    /// Horizontal slack that keeps right side elements on the zone grid.
    fn leftover(&self) -> f32 {
        self.min_width() % (self.grid * 2.0)
    }

    /// Center and side of a zone's square.
    pub fn zone_square(&self, zone: &Zone, palette: &ThermalPalette) -> (f32, f32, f32) {
        let (ox, oy) = self.offset();
        let shift = self.grid * 2.3 / 15.0;
        (
            zone.pos.x as f32 + ox + shift,
            zone.pos.y as f32 + oy + shift,
            self.grid * palette.zone_scale(zone.mag),
        )
    }

    /// Crosshair lines and the center of its ring.
    pub fn crosshair(&self) -> ([Line; 2], (f32, f32)) {
        let (cx, cy) = (self.canvas.0 / 2.0, self.canvas.1 / 2.0);
        let g = self.grid;
        (
            [
                ((cx + g, cy), (cx + g, cy + 2.0 * g)),
                ((cx, cy + g), (cx + 2.0 * g, cy + g)),
            ],
            (cx + g, cy + g),
        )
    }

    /// L-shaped brackets in each corner, two lines per corner.
    pub fn brackets(&self) -> [Line; 8] {
        let (cx, cy) = (self.canvas.0 / 2.0, self.canvas.1 / 2.0);
        let (hw, hh) = (self.min_width() / 2.0, self.canvas.1 / 2.0);
        let m = self.grid * 2.0;
        let n = self.grid * 3.5;
        let lo = self.leftover();

        let left = (cx - hw + m, cx - hw + n);
        let right = (cx + hw - m - lo, cx + hw - n - lo);
        let top = (cy - hh + m, cy - hh + n);
        let bottom = (cy + hh - m, cy + hh - n);

        let corner =
            |(x, xe): (f32, f32), (y, ye): (f32, f32)| [((x, y), (xe, y)), ((x, y), (x, ye))];

        let [a, b] = corner(left, top);
        let [c, d] = corner(right, top);
        let [e, f] = corner(right, bottom);
        let [g, h] = corner(left, bottom);

        [a, b, c, d, e, f, g, h]
    }

    /// Left edge of the legend scale.
    pub fn legend_x(&self) -> f32 {
        let (w, fw) = (self.canvas.0, self.frame.0);
        let x = if self.min_width() == w {
            w - self.grid * 3.0
        } else {
            w - (w - fw) / 2.0 - self.grid * 3.0
        };
        x - self.leftover()
    }

    /// Legend cells as `(top, t)` pairs, where `t` is the position within the scale.
    pub fn legend_cells(&self) -> impl Iterator<Item = (f32, f32)> {
        let h = self.canvas.1;
        let (start, end) = (h * 0.25, h * 0.75);
        let step = self.grid.max(1.0);

        (0..)
            .map(move |i| start + i as f32 * step)
            .take_while(move |&y| y < end)
            .map(move |y| (y, (y - start) / (end - start)))
    }
}

/// Draw every zone as a translucent square.
pub fn draw_zones(
    canvas: &mut Canvas,
    layout: &Layout,
    field: &FlowField,
    palette: &ThermalPalette,
) {
    for zone in field.zones() {
        let (x, y, side) = layout.zone_square(zone, palette);
        canvas.fill_square(x, y, side, palette.zone_color(zone.mag));
    }
}

/// Draw the crosshair, corner brackets and legend scale.
pub fn draw_overlay(canvas: &mut Canvas, layout: &Layout, palette: &ThermalPalette) {
    let (lines, (rx, ry)) = layout.crosshair();
    for (a, b) in lines.into_iter().chain(layout.brackets()) {
        canvas.line(a, b, STROKE_WEIGHT, STROKE);
    }
    canvas.ring(rx, ry, RING_DIAMETER / 2.0, STROKE_WEIGHT, STROKE);

    let x = layout.legend_x();
    let g = layout.grid;
    let cells = layout.legend_cells().collect::<Vec<_>>();

    for &(y, t) in &cells {
        canvas.fill_rect(x, y, g, g, palette.legend_color(t));
    }

    if let Some(&(top, _)) = cells.first() {
        let height = g * cells.len() as f32;
        canvas.stroke_rect(x, top, g, height, STROKE_WEIGHT, STROKE);
    }
}
