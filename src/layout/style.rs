//! Layout style framework: alignment enums, shared configuration, and the
//! [`LayoutStyle`] trait every policy implements.
//!
//! A layout style is bound to exactly one container. It keeps the
//! container's children sorted and, whenever the child set or its
//! configuration changes, repositions every child by writing overrides.

use std::any::Any;
use std::cmp::Ordering;

use slotmap::SecondaryMap;

use crate::error::Result;
use crate::scene::{Scene, WidgetId};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl HorizontalAlignment {
    /// Fraction of the free horizontal space placed before the content.
    pub const fn factor(self) -> f32 {
        match self {
            HorizontalAlignment::Left => 0.0,
            HorizontalAlignment::Center => 0.5,
            HorizontalAlignment::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalAlignment {
    #[default]
    Top,
    Center,
    Bottom,
}

impl VerticalAlignment {
    /// Fraction of the free vertical space placed before the content.
    pub const fn factor(self) -> f32 {
        match self {
            VerticalAlignment::Top => 0.0,
            VerticalAlignment::Center => 0.5,
            VerticalAlignment::Bottom => 1.0,
        }
    }
}

/// The primary axis children are packed along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillDirection {
    #[default]
    Horizontal,
    Vertical,
}

/// How a layout orders its children before packing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    /// By widget name.
    Name,
    /// By `layout_order`, ties in insertion order.
    #[default]
    LayoutOrder,
    /// By [`LayoutStyle::custom_sort`].
    Custom,
}

// ---------------------------------------------------------------------------
// LayoutConfig
// ---------------------------------------------------------------------------

/// Settings shared by every layout style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutConfig {
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
    pub fill_direction: FillDirection,
    pub sort_order: SortOrder,
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_horizontal_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.horizontal_alignment = alignment;
        self
    }

    pub fn with_vertical_alignment(mut self, alignment: VerticalAlignment) -> Self {
        self.vertical_alignment = alignment;
        self
    }

    pub fn with_fill_direction(mut self, direction: FillDirection) -> Self {
        self.fill_direction = direction;
        self
    }

    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }
}

// ---------------------------------------------------------------------------
// LayoutBase
// ---------------------------------------------------------------------------

/// State every layout style carries: its configuration, the container it is
/// bound to, and the container's children in layout order.
#[derive(Debug, Clone, Default)]
pub struct LayoutBase {
    pub config: LayoutConfig,
    container: Option<WidgetId>,
    children: Vec<WidgetId>,
    /// Insertion sequence per child; sort ties fall back to it.
    sequence: SecondaryMap<WidgetId, u64>,
    next_sequence: u64,
}

impl LayoutBase {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config, ..Self::default() }
    }

    /// The container this layout is applied to.
    pub fn container(&self) -> Option<WidgetId> {
        self.container
    }

    /// Children in layout order.
    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    pub(crate) fn bind(&mut self, container: WidgetId) {
        self.container = Some(container);
    }

    /// The order `child` joined this layout in. Unknown children sort last.
    pub fn insertion_index(&self, child: WidgetId) -> u64 {
        self.sequence.get(child).copied().unwrap_or(u64::MAX)
    }

    pub(crate) fn unbind(&mut self) {
        self.container = None;
        self.children.clear();
        self.sequence.clear();
    }

    pub(crate) fn push_child(&mut self, child: WidgetId) {
        if !self.children.contains(&child) {
            self.children.push(child);
            self.sequence.insert(child, self.next_sequence);
            self.next_sequence += 1;
        }
    }

    pub(crate) fn remove_child(&mut self, child: WidgetId) -> bool {
        let before = self.children.len();
        self.children.retain(|&c| c != child);
        self.sequence.remove(child);
        self.children.len() != before
    }

    pub(crate) fn set_children(&mut self, children: Vec<WidgetId>) {
        self.children = children;
    }
}

// ---------------------------------------------------------------------------
// LayoutStyle
// ---------------------------------------------------------------------------

/// A policy that positions a container's children.
///
/// The scene owns the call sequence: `on_applied`, then `attach_child` for
/// every existing child, then a sort and `order_children`. Child additions
/// and removals run `attach_child`/`detach_child` followed by a fresh sort
/// and order pass. Every pass runs under the container's redraw block and
/// ends in a single redraw.
pub trait LayoutStyle {
    /// Short name for logs.
    fn name(&self) -> &str;

    fn base(&self) -> &LayoutBase;

    fn base_mut(&mut self) -> &mut LayoutBase;

    /// Install the baseline overrides a child needs before ordering.
    fn attach_child(&mut self, scene: &mut Scene, child: WidgetId) -> Result<()>;

    /// Remove every override `attach_child` or an order pass installed.
    fn detach_child(&mut self, scene: &mut Scene, child: WidgetId) -> Result<()>;

    /// Reposition every child in [`LayoutBase::children`] order.
    fn order_children(&mut self, scene: &mut Scene, container: WidgetId) -> Result<()>;

    /// Ordering used by [`SortOrder::Custom`]. Defaults to insertion order.
    fn custom_sort(&self, _scene: &Scene, _a: WidgetId, _b: WidgetId) -> Ordering {
        Ordering::Equal
    }

    /// Runs once when bound to `container`, before any child is attached.
    fn on_applied(&mut self, _scene: &mut Scene, _container: WidgetId) -> Result<()> {
        Ok(())
    }

    /// Runs once after every child has been detached.
    fn on_removed(&mut self, _scene: &mut Scene, _container: WidgetId) -> Result<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Sort a layout's children by its configured [`SortOrder`]. Equal keys fall
/// back to insertion order, whatever earlier passes did.
pub fn sort_children(layout: &mut dyn LayoutStyle, scene: &Scene) {
    let mut children = layout.base().children().to_vec();
    let base = layout.base();
    match base.config.sort_order {
        SortOrder::Name => {
            children.sort_by_key(|&c| (scene.name(c), base.insertion_index(c)));
        }
        SortOrder::LayoutOrder => {
            children.sort_by_key(|&c| (scene.layout_order(c).unwrap_or(0), base.insertion_index(c)));
        }
        SortOrder::Custom => {
            children.sort_by(|&a, &b| {
                layout
                    .custom_sort(scene, a, b)
                    .then_with(|| base.insertion_index(a).cmp(&base.insertion_index(b)))
            });
        }
    }
    layout.base_mut().set_children(children);
}
