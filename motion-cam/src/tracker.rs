//! # Frame to frame motion tracking

use crate::differ::FrameDiffer;
use crate::error::Result;
use crate::flow::FlowCalculator;
use crate::flow_field::FlowField;
use crate::frame::{check_frame, Frame, CHANNELS};
use log::*;

/// Tracker configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackerConfig {
    /// Side of each flow zone, in pixels.
    pub grid_size: usize,
    /// Compare one pixel out of this many when checking for a static scene.
    pub sample_step: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            grid_size: FlowCalculator::default().grid_size(),
            sample_step: FrameDiffer::default().sample_step(),
        }
    }
}

/// Outcome of a single tracker step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// No usable previous frame. The frame was stored and the field has no motion.
    Primed,
    /// Frame matches the previous one. The field has no motion.
    Static,
    /// Flow was recalculated.
    Moved,
}

/// Motion tracker over a stream of frames.
///
/// Owns the previous frame and the latest flow field. Each call to [`tick`](Self::tick) gates the
/// calculation through a [`FrameDiffer`] and then runs the [`FlowCalculator`].
pub struct MotionTracker {
    differ: FrameDiffer,
    calc: FlowCalculator,
    previous: Option<Frame>,
    field: FlowField,
}

impl Default for MotionTracker {
    fn default() -> Self {
        Self {
            differ: FrameDiffer::default(),
            calc: FlowCalculator::default(),
            previous: None,
            field: FlowField::default(),
        }
    }
}

impl MotionTracker {
    /// Create a new tracker.
    ///
    /// Fails if `grid_size` is zero.
    pub fn new(config: TrackerConfig) -> Result<Self> {
        Ok(Self {
            differ: FrameDiffer::new(config.sample_step),
            calc: FlowCalculator::new(config.grid_size)?,
            previous: None,
            field: FlowField::default(),
        })
    }

    pub fn grid_size(&self) -> usize {
        self.calc.grid_size()
    }

    /// Latest flow field.
    pub fn field(&self) -> &FlowField {
        &self.field
    }

    /// Forget the previous frame. The next tick will prime the tracker again.
    pub fn reset(&mut self) {
        self.previous = None;
        self.field = FlowField::default();
    }

    /// Process the next frame.
    ///
    /// # Arguments
    ///
    /// * `frame` - RGBA bytes of the frame.
    /// * `width` - width of the frame.
    /// * `height` - height of the frame.
    ///
    /// # Examples
    ///
    /// ```
    /// use motion_cam::prelude::v1::*;
    ///
    /// let mut tracker = MotionTracker::default();
    /// let still = vec![0u8; 48 * 24 * 4];
    /// let lit = vec![255u8; 48 * 24 * 4];
    ///
    /// assert_eq!(tracker.tick(&still, 48, 24)?, Tick::Primed);
    /// assert_eq!(tracker.tick(&still, 48, 24)?, Tick::Static);
    /// assert_eq!(tracker.tick(&lit, 48, 24)?, Tick::Moved);
    /// assert_eq!(tracker.field().len(), 8);
    /// # Ok::<_, FlowError>(())
    /// ```
    pub fn tick(&mut self, frame: &[u8], width: usize, height: usize) -> Result<Tick> {
        check_frame(frame, width, height)?;

        let previous = match &mut self.previous {
            Some(previous) if previous.dim() == (width, height) => previous,
            slot => {
                if let Some(old) = slot {
                    debug!(
                        "frame size changed {:?} -> {:?}, priming",
                        old.dim(),
                        (width, height)
                    );
                }
                *slot = Some(Frame::copy_from(frame, width, height)?);
                self.field.reset(width, height, self.calc.grid_size());
                return Ok(Tick::Primed);
            }
        };

        if self
            .differ
            .same(previous.as_bytes(), frame, CHANNELS, width)
        {
            trace!("static frame, skipping flow");
            self.field.clear_motion();
            return Ok(Tick::Static);
        }

        self.calc
            .calculate_into(previous.as_bytes(), frame, width, height, &mut self.field)?;
        previous.replace_with(frame, width, height)?;

        Ok(Tick::Moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FlowError, Mismatch};

    fn tracker(grid_size: usize, sample_step: usize) -> MotionTracker {
        MotionTracker::new(TrackerConfig {
            grid_size,
            sample_step,
        })
        .unwrap()
    }

    #[test]
    fn primes_on_first_frame() {
        let mut t = tracker(4, 1);
        assert_eq!(t.tick(&[7; 8 * 8 * 4], 8, 8), Ok(Tick::Primed));
        assert_eq!(t.field(), &FlowField::new(8, 8, 4));
    }

    #[test]
    fn static_matches_calculation() {
        let frame = (0..8 * 8 * 4).map(|i| i as u8).collect::<Vec<_>>();
        let moved = frame.iter().map(|b| b ^ 0x55).collect::<Vec<_>>();

        let mut t = tracker(4, 1);
        t.tick(&frame, 8, 8).unwrap();
        assert_eq!(t.tick(&moved, 8, 8), Ok(Tick::Moved));
        assert!(t.field().max_mag() > 0.0);

        assert_eq!(t.tick(&moved, 8, 8), Ok(Tick::Static));

        let computed = FlowCalculator::new(4)
            .unwrap()
            .calculate(&moved, &moved, 8, 8)
            .unwrap();
        assert_eq!(t.field(), &computed);
    }

    #[test]
    fn previous_frame_is_replaced() {
        let a = vec![0u8; 4 * 4 * 4];
        let b = vec![100u8; 4 * 4 * 4];
        let c = vec![150u8; 4 * 4 * 4];

        let mut t = tracker(4, 1);
        t.tick(&a, 4, 4).unwrap();
        t.tick(&b, 4, 4).unwrap();
        assert_eq!(t.field().zones()[0].mag, 100.0);

        // Compared against `b`, not `a`.
        t.tick(&c, 4, 4).unwrap();
        assert_eq!(t.field().zones()[0].mag, 50.0);
    }

    #[test]
    fn invalid_frame_keeps_state() {
        let mut t = tracker(4, 1);
        t.tick(&[0; 64], 4, 4).unwrap();
        t.tick(&[9; 64], 4, 4).unwrap();
        let field = t.field().clone();

        assert!(matches!(
            t.tick(&[1; 63], 4, 4),
            Err(FlowError::InvalidDimensions(Mismatch::FrameSize { .. }))
        ));
        assert_eq!(t.field(), &field);
        assert_eq!(t.tick(&[9; 64], 4, 4), Ok(Tick::Static));
    }

    #[test]
    fn resize_primes_again() {
        let mut t = tracker(4, 1);
        t.tick(&[0; 64], 4, 4).unwrap();
        assert_eq!(t.tick(&[0; 128], 8, 4), Ok(Tick::Primed));
        assert_eq!(t.field().dim(), (2, 1));
        assert_eq!(t.tick(&[1; 128], 8, 4), Ok(Tick::Moved));
    }

    #[test]
    fn reset_forgets_previous() {
        let mut t = tracker(4, 1);
        t.tick(&[0; 64], 4, 4).unwrap();
        t.reset();
        assert!(t.field().is_empty());
        assert_eq!(t.tick(&[0; 64], 4, 4), Ok(Tick::Primed));
    }

    #[test]
    fn zero_grid_is_rejected() {
        assert!(MotionTracker::new(TrackerConfig {
            grid_size: 0,
            sample_step: 1,
        })
        .is_err());
    }
}
