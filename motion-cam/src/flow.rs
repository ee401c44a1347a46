//! # Coarse block flow

use crate::error::{FlowError, Mismatch, Result};
use crate::flow_field::{FlowField, Zone};
use crate::frame::{self, RGBA, CHANNELS};
use log::*;
use nalgebra as na;

/// Block based flow calculator.
///
/// Splits each frame into square zones of `grid_size` pixels and estimates motion within each
/// zone from the two frames alone. Partial zones at the right and bottom edges are skipped.
///
/// Magnitude of a zone is the mean absolute difference of all its samples (every channel of every
/// pixel). Direction is a least squares gradient solution over the zone's luminance, using only
/// pixels inside the zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlowCalculator {
    grid_size: usize,
}

impl Default for FlowCalculator {
    fn default() -> Self {
        Self { grid_size: 12 }
    }
}

impl FlowCalculator {
    /// Create a new calculator.
    ///
    /// # Arguments
    ///
    /// * `grid_size` - side of each zone, in pixels. Must be positive.
    pub fn new(grid_size: usize) -> Result<Self> {
        if grid_size == 0 {
            return Err(FlowError::InvalidDimensions(Mismatch::GridSize));
        }

        debug!("flow calculator with {grid_size}px zones");

        Ok(Self { grid_size })
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Calculate flow between two frames.
    ///
    /// # Arguments
    ///
    /// * `previous` - RGBA bytes of the older frame.
    /// * `current` - RGBA bytes of the newer frame.
    /// * `width` - width of both frames.
    /// * `height` - height of both frames.
    ///
    /// # Examples
    ///
    /// ```
    /// use motion_cam::flow::FlowCalculator;
    ///
    /// let previous = vec![0u8; 24 * 24 * 4];
    /// let mut current = previous.clone();
    ///
    /// // Light up the bottom-right zone.
    /// for y in 12..24 {
    ///     current[(y * 24 + 12) * 4..(y * 24 + 24) * 4].fill(255);
    /// }
    ///
    /// let field = FlowCalculator::new(12)?.calculate(&previous, &current, 24, 24)?;
    ///
    /// assert_eq!(field.len(), 4);
    /// assert_eq!(field.max_zone(), Some(3));
    /// # Ok::<_, motion_cam::error::FlowError>(())
    /// ```
    pub fn calculate(
        &self,
        previous: &[u8],
        current: &[u8],
        width: usize,
        height: usize,
    ) -> Result<FlowField> {
        let mut field = FlowField::default();
        self.calculate_into(previous, current, width, height, &mut field)?;
        Ok(field)
    }

    /// Calculate flow between two frames, reusing an existing field.
    ///
    /// The field is fully overwritten. On error, it is left untouched.
    pub fn calculate_into(
        &self,
        previous: &[u8],
        current: &[u8],
        width: usize,
        height: usize,
        field: &mut FlowField,
    ) -> Result<()> {
        if previous.len() != current.len() {
            return Err(FlowError::InvalidDimensions(Mismatch::BufferLengths {
                previous: previous.len(),
                current: current.len(),
            }));
        }

        frame::check_frame(current, width, height)?;

        let prev = frame::pixels(previous);
        let cur = frame::pixels(current);
        let g = self.grid_size;

        field.reset(width, height, g);
        let (cols, _) = field.dim();

        for (i, zone) in field.zones_mut().iter_mut().enumerate() {
            let block = Block {
                width,
                x0: (i % cols) * g,
                y0: (i / cols) * g,
                size: g,
            };
            let (mag, dir) = block.flow(prev, cur);
            *zone = Zone {
                pos: zone.pos,
                mag,
                dir,
            };
        }

        Ok(())
    }
}

/// Square pixel block of a frame.
struct Block {
    width: usize,
    x0: usize,
    y0: usize,
    size: usize,
}

impl Block {
    fn idx(&self, x: usize, y: usize) -> usize {
        (self.y0 + y) * self.width + self.x0 + x
    }

    /// Magnitude and direction of change within the block.
    fn flow(&self, prev: &[RGBA], cur: &[RGBA]) -> (f32, na::Vector2<f32>) {
        let n = self.size;

        let diff = (0..n)
            .flat_map(|y| (0..n).map(move |x| (x, y)))
            .map(|(x, y)| {
                let i = self.idx(x, y);
                prev[i].abs_diff(&cur[i]) as u64
            })
            .sum::<u64>();

        if diff == 0 {
            return (0.0, na::Vector2::zeros());
        }

        let mag = (diff as f64 / (n * n * CHANNELS) as f64) as f32;

        (mag, self.direction(prev, cur))
    }

    /// Solve the gradient constraint `Ix * u + Iy * v + It = 0` over the block.
    fn direction(&self, prev: &[RGBA], cur: &[RGBA]) -> na::Vector2<f32> {
        let n = self.size;
        let luma = |x: usize, y: usize| cur[self.idx(x, y)].luma();

        let mut a = na::Matrix2::<f32>::zeros();
        let mut b = na::Vector2::<f32>::zeros();

        for y in 0..n {
            for x in 0..n {
                let grad = na::Vector2::new(
                    gradient(x, n, |x| luma(x, y)),
                    gradient(y, n, |y| luma(x, y)),
                );
                let i = self.idx(x, y);
                let it = cur[i].luma() - prev[i].luma();

                a += grad * grad.transpose();
                b -= grad * it;
            }
        }

        let dir = match a.try_inverse() {
            Some(inv) => inv * b,
            // All gradients are parallel, only the normal component is known.
            None => match a.trace() {
                t if t > 0.0 => b / t,
                _ => na::Vector2::zeros(),
            },
        };

        if dir.iter().all(|c| c.is_finite()) {
            let lim = n as f32;
            dir.map(|c| c.clamp(-lim, lim))
        } else {
            na::Vector2::zeros()
        }
    }
}

/// Central difference at `pos`, one-sided at the ends of `0..len`.
fn gradient(pos: usize, len: usize, sample: impl Fn(usize) -> f32) -> f32 {
    if len < 2 {
        return 0.0;
    }

    let lo = pos.saturating_sub(1);
    let hi = (pos + 1).min(len - 1);

    (sample(hi) - sample(lo)) / (hi - lo) as f32
}
