//! Input events and prioritized action dispatch.

pub mod action;
pub mod input;

pub use action::{ActionCallback, ActionResult, ActionService, Trigger, INTERNAL_PRIORITY_THRESHOLD};
pub use input::{
    EventKind, InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseButton, MouseEvent,
    PointerEvent,
};
