//! Headless testing support: recording host doubles and the Pilot.
//!
//! Use the [`Pilot`] to drive a [`Gui`](crate::app::Gui) without a window.
//! [`RecordingSurface`] captures draw commands for assertions and
//! [`render_log`] turns them into text for snapshots.

pub mod pilot;
pub mod recording;

pub use pilot::Pilot;
pub use recording::{render_log, DrawCommand, FixedMeasurer, ManualClock, RecordingSurface};
