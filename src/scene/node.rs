//! Node types: WidgetId, WidgetProps, WidgetNode.

use std::collections::HashMap;

use slotmap::new_key_type;

use crate::event::PointerEvent;
use crate::geometry::{Color, UDim2, Vec2};
use crate::layout::LayoutStyle;
use crate::reactive::Signal;
use crate::scene::PropertyValue;
use crate::widget::{DrawerHook, UpdaterHook, Widget};

new_key_type! {
    /// Unique identifier for a widget. Copy, lightweight (u64).
    pub struct WidgetId;
}

// ---------------------------------------------------------------------------
// Layered values
// ---------------------------------------------------------------------------

/// A base value with an optional override layered above it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layered<T> {
    base: T,
    over: Option<T>,
}

impl<T: Copy> Layered<T> {
    pub fn new(base: T) -> Self {
        Self { base, over: None }
    }

    /// The override if present, else the base.
    pub fn get(&self) -> T {
        self.over.unwrap_or(self.base)
    }

    pub fn base(&self) -> T {
        self.base
    }

    pub fn set_base(&mut self, value: T) {
        self.base = value;
    }

    pub fn override_value(&self) -> Option<T> {
        self.over
    }

    pub fn set_override(&mut self, value: T) {
        self.over = Some(value);
    }

    /// Drop the override, returning it.
    pub fn clear_override(&mut self) -> Option<T> {
        self.over.take()
    }
}

/// Properties that accept an override layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverridableProperty {
    Position,
    Size,
    AnchorPoint,
}

impl OverridableProperty {
    pub const fn name(self) -> &'static str {
        match self {
            OverridableProperty::Position => "position",
            OverridableProperty::Size => "size",
            OverridableProperty::AnchorPoint => "anchor_point",
        }
    }
}

/// An override to install.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverrideValue {
    Position(UDim2),
    Size(UDim2),
    AnchorPoint(Vec2),
}

impl OverrideValue {
    pub const fn property(self) -> OverridableProperty {
        match self {
            OverrideValue::Position(_) => OverridableProperty::Position,
            OverrideValue::Size(_) => OverridableProperty::Size,
            OverrideValue::AnchorPoint(_) => OverridableProperty::AnchorPoint,
        }
    }
}

// ---------------------------------------------------------------------------
// WidgetProps
// ---------------------------------------------------------------------------

/// Construction arguments shared by every widget.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetProps {
    /// Generated from the widget type when `None`.
    pub name: Option<String>,
    pub parent: Option<WidgetId>,
    pub position: UDim2,
    pub size: UDim2,
    pub anchor_point: Vec2,
    pub visible: bool,
    pub draw_order: i64,
    pub layout_order: i64,
    /// Falls back to the scene's configured default when `None`.
    pub background_color: Option<Color>,
    /// Background alpha: 0 is invisible, 255 is opaque.
    pub background_transparency: f64,
    pub border_color: Color,
    pub border_size: i64,
}

impl Default for WidgetProps {
    fn default() -> Self {
        Self {
            name: None,
            parent: None,
            position: UDim2::ZERO,
            size: UDim2::ZERO,
            anchor_point: Vec2::ZERO,
            visible: true,
            draw_order: 0,
            layout_order: 0,
            background_color: None,
            background_transparency: 255.0,
            border_color: Color::BLACK,
            border_size: 0,
        }
    }
}

impl WidgetProps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Widget props attached to `parent`.
    pub fn child_of(parent: WidgetId) -> Self {
        Self { parent: Some(parent), ..Self::default() }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_parent(mut self, parent: WidgetId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_position(mut self, position: UDim2) -> Self {
        self.position = position;
        self
    }

    pub fn with_size(mut self, size: UDim2) -> Self {
        self.size = size;
        self
    }

    pub fn with_anchor_point(mut self, anchor_point: Vec2) -> Self {
        self.anchor_point = anchor_point;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_draw_order(mut self, draw_order: i64) -> Self {
        self.draw_order = draw_order;
        self
    }

    pub fn with_layout_order(mut self, layout_order: i64) -> Self {
        self.layout_order = layout_order;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn with_background_transparency(mut self, alpha: f64) -> Self {
        self.background_transparency = alpha;
        self
    }

    pub fn with_border(mut self, color: Color, size: i64) -> Self {
        self.border_color = color;
        self.border_size = size;
        self
    }
}

// ---------------------------------------------------------------------------
// Signals
// ---------------------------------------------------------------------------

/// Signals every widget exposes.
#[derive(Debug, Clone, Default)]
pub struct WidgetSignals {
    pub child_added: Signal<WidgetId>,
    pub child_removed: Signal<WidgetId>,
    pub mouse_entered: Signal<PointerEvent>,
    pub mouse_leaving: Signal<PointerEvent>,
    pub mouse_moved: Signal<PointerEvent>,
    pub mouse_button_down: Signal<PointerEvent>,
    pub mouse_button_up: Signal<PointerEvent>,
}

// ---------------------------------------------------------------------------
// WidgetNode
// ---------------------------------------------------------------------------

/// A widget's core state plus its boxed content.
pub(crate) struct WidgetNode {
    pub(crate) name: String,
    pub(crate) parent: Option<WidgetId>,
    /// Built children, sorted by draw order (stable).
    pub(crate) children: Vec<WidgetId>,

    pub(crate) position: Layered<UDim2>,
    pub(crate) size: Layered<UDim2>,
    pub(crate) anchor_point: Layered<Vec2>,

    pub(crate) visible: bool,
    pub(crate) draw_order: i64,
    pub(crate) layout_order: i64,
    pub(crate) background_color: Color,
    pub(crate) background_transparency: f64,
    pub(crate) border_color: Color,
    pub(crate) border_size: i64,

    pub(crate) built: bool,
    pub(crate) is_root: bool,
    pub(crate) depth: usize,
    /// Redraws requested while this is nonzero are suppressed.
    pub(crate) redraw_block: u32,

    pub(crate) content: Box<dyn Widget>,
    pub(crate) layout: Option<Box<dyn LayoutStyle>>,
    pub(crate) signals: WidgetSignals,
    pub(crate) property_signals: HashMap<String, Signal<PropertyValue>>,
    pub(crate) drawers: Vec<DrawerHook>,
    pub(crate) updaters: Vec<UpdaterHook>,
}

impl WidgetNode {
    pub(crate) fn new(
        name: String,
        props: WidgetProps,
        default_background: Color,
        content: Box<dyn Widget>,
    ) -> Self {
        Self {
            name,
            parent: props.parent,
            children: Vec::new(),
            position: Layered::new(props.position),
            size: Layered::new(props.size),
            anchor_point: Layered::new(props.anchor_point),
            visible: props.visible,
            draw_order: props.draw_order,
            layout_order: props.layout_order,
            background_color: props.background_color.unwrap_or(default_background),
            background_transparency: props.background_transparency.clamp(0.0, 255.0),
            border_color: props.border_color,
            border_size: props.border_size.max(0),
            built: false,
            is_root: false,
            depth: 0,
            redraw_block: 0,
            content,
            layout: None,
            signals: WidgetSignals::default(),
            property_signals: HashMap::new(),
            drawers: Vec::new(),
            updaters: Vec::new(),
        }
    }

    /// Background color with the transparency applied as alpha.
    pub(crate) fn background(&self) -> Color {
        self.background_color
            .with_alpha(self.background_transparency.round().clamp(0.0, 255.0) as u8)
    }
}
