//! # scenegraph-ui
//!
//! A retained-mode widget toolkit core. Widgets live in a slotmap-backed
//! scene, are sized and placed with scale-plus-offset units, arranged by
//! pluggable layout styles, hit-tested through per-root quadtrees, animated
//! by tweens and driven by prioritized input actions. Drawing, text
//! measurement and frame decoding stay with the host behind narrow traits.
//!
//! ## Core Systems
//!
//! - **[`geometry`]**: Vec2, Rect, UDim, UDim2 and Color primitives
//! - **[`scene`]**: widget arena, properties with override layers, redraw protocol, hit testing
//! - **[`layout`]**: list and grid layout styles
//! - **[`spatial`]**: quadtree over lazily measured rects
//! - **[`widget`]** / **[`widgets`]**: content trait and the built-in widgets
//! - **[`event`]**: input events and the action service
//! - **[`tween`]**: easing curves and the tween service
//! - **[`reactive`]**: signals and connections
//! - **[`render`]**: host boundary traits
//! - **[`app`]**: the per-frame loop
//! - **[`testing`]**: recording doubles and a headless pilot

// Foundation
pub mod error;
pub mod geometry;

// Core systems
pub mod layout;
pub mod scene;
pub mod spatial;

// Widget system
pub mod widget;
pub mod widgets;

// Events, reactivity and animation
pub mod event;
pub mod reactive;
pub mod tween;

// Host boundary
pub mod render;

// Application
pub mod app;
pub mod testing;

pub use app::{Clock, Gui, GuiConfig, SystemClock};
pub use error::{GuiError, Result};
pub use geometry::{Color, Rect, UDim, UDim2, Vec2};
pub use scene::{PropertyValue, Scene, WidgetId, WidgetProps};
