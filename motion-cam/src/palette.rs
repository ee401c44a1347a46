//! # Thermal style colour mapping
//!
//! Zones with little motion are drawn in cold, faint colours, while moving zones go from yellow to
//! red the faster they move.

use crate::frame::RGBA;

/// Maps zone magnitudes to colours and square sizes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ThermalPalette {
    /// Magnitudes below this are considered noise.
    pub ignore_threshold: f32,
    /// Colour of zones below `0.7 * ignore_threshold`.
    pub still: RGBA,
    /// Colour of zones between `0.7 * ignore_threshold` and `ignore_threshold`.
    pub drift: RGBA,
    /// Colour at the bottom of `motion_range`.
    pub low_motion: RGBA,
    /// Colour at the top of `motion_range`.
    pub high_motion: RGBA,
    /// Magnitudes that blend from `low_motion` to `high_motion`.
    pub motion_range: (f32, f32),
    /// Magnitudes that `size_range` is mapped over.
    pub size_mags: (f32, f32),
    /// Square size, relative to grid size, at each end of `size_mags`.
    pub size_range: (f32, f32),
}

impl Default for ThermalPalette {
    fn default() -> Self {
        Self {
            ignore_threshold: 12.0,
            still: RGBA::new(0, 0, 200, alpha(0.2)),
            drift: RGBA::new(0, 200, 100, alpha(0.2)),
            low_motion: RGBA::new(250, 250, 50, alpha(0.4)),
            high_motion: RGBA::new(250, 50, 50, alpha(0.4)),
            motion_range: (10.0, 30.0),
            size_mags: (8.0, 50.0),
            size_range: (2.6, 2.3),
        }
    }
}

impl ThermalPalette {
    /// Fill colour for a zone.
    ///
    /// # Examples
    ///
    /// ```
    /// use motion_cam::palette::ThermalPalette;
    ///
    /// let palette = ThermalPalette::default();
    ///
    /// assert_eq!(palette.zone_color(0.0), palette.still);
    /// assert_eq!(palette.zone_color(10.0), palette.drift);
    /// assert_eq!(palette.zone_color(100.0), palette.high_motion);
    /// ```
    pub fn zone_color(&self, mag: f32) -> RGBA {
        if mag < self.ignore_threshold * 0.7 {
            self.still
        } else if mag < self.ignore_threshold {
            self.drift
        } else {
            let t = remap(mag, self.motion_range, (0.0, 1.0));
            lerp_rgba(self.low_motion, self.high_motion, t)
        }
    }

    /// Side of a zone's square relative to grid size.
    ///
    /// Faster zones are drawn slightly smaller.
    pub fn zone_scale(&self, mag: f32) -> f32 {
        let (a, b) = self.size_range;
        remap(mag, self.size_mags, self.size_range).clamp(a.min(b), a.max(b))
    }

    /// Colour of the legend scale at `t`.
    ///
    /// `t` goes from 0 (top, fastest motion) to 1 (bottom, no motion). Colours are the opaque
    /// versions of the zone colours.
    pub fn legend_color(&self, t: f32) -> RGBA {
        let [high, low, drift, still] =
            [self.high_motion, self.low_motion, self.drift, self.still].map(opaque);

        if t < 0.34 {
            lerp_rgba(high, low, remap(t, (0.0, 0.34), (0.0, 1.0)))
        } else if t < 0.66 {
            lerp_rgba(low, drift, remap(t, (0.34, 0.66), (0.0, 1.0)))
        } else {
            lerp_rgba(drift, still, remap(t, (0.66, 1.0), (0.0, 1.0)))
        }
    }
}

/// Linearly interpolate between two colours.
///
/// `t` is clamped to `[0; 1]`.
pub fn lerp_rgba(a: RGBA, b: RGBA, t: f32) -> RGBA {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;

    RGBA {
        r: mix(a.r, b.r),
        g: mix(a.g, b.g),
        b: mix(a.b, b.b),
        a: mix(a.a, b.a),
    }
}

/// Map `v` from one range onto another, without clamping.
pub fn remap(v: f32, (from_lo, from_hi): (f32, f32), (to_lo, to_hi): (f32, f32)) -> f32 {
    if from_hi == from_lo {
        return to_lo;
    }
    to_lo + (v - from_lo) / (from_hi - from_lo) * (to_hi - to_lo)
}

fn alpha(a: f32) -> u8 {
    (a * 255.0).round() as u8
}

fn opaque(c: RGBA) -> RGBA {
    RGBA { a: 255, ..c }
}
