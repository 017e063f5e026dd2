//! Property animation: easing curves and the tween service.

pub mod easing;
pub mod service;

pub use easing::Easing;
pub use service::{interpolate, TweenId, TweenInfo, TweenService, TweenStatus};
