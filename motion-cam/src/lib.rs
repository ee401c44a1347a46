//! # Motion Cam
//!
//! Coarse optical flow engine behind a thermal camera style motion display. Every frame is split
//! into a grid of square zones, and each zone gets a motion magnitude and direction computed from
//! the previous and current frames.
//!
//! The easiest way to use the library is to import its prelude:
//!
//! ```
//! use motion_cam::prelude::v1::*;
//! ```
//!
//! You may need [`nalgebra`](https://crates.io/crates/nalgebra) to make use of zone positions and
//! directions.

pub mod differ;
pub mod error;
pub mod flow;
pub mod flow_field;
pub mod frame;
pub mod palette;
pub mod tracker;

pub mod prelude {
    pub mod v1 {
        pub use crate::{
            differ::FrameDiffer,
            error::{FlowError, Mismatch},
            flow::FlowCalculator,
            flow_field::{FlowField, MotionEntry, Zone},
            frame::{Frame, CHANNELS, RGBA},
            palette::{lerp_rgba, ThermalPalette},
            tracker::{MotionTracker, Tick, TrackerConfig},
        };
    }
}
