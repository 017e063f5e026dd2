//! Plain rectangular container.

use std::any::Any;

use crate::widget::{Container, Widget};

/// A background-and-border box that hosts children and accepts layouts.
#[derive(Debug, Default, Clone, Copy)]
pub struct Frame;

impl Frame {
    pub fn new() -> Self {
        Frame
    }
}

impl Widget for Frame {
    fn widget_type(&self) -> &str {
        "Frame"
    }

    fn as_container(&self) -> Option<&dyn Container> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Container for Frame {}
