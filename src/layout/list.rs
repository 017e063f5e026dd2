//! List layout: children flow along the primary axis and wrap into rows.
//!
//! The pass runs on the horizontal frame; a vertical fill direction
//! transposes the container, the child sizes, the padding and the results.

use std::any::Any;

use super::style::{
    FillDirection, HorizontalAlignment, LayoutBase, LayoutConfig, LayoutStyle, VerticalAlignment,
};
use crate::error::{GuiError, Result};
use crate::geometry::{UDim2, Vec2};
use crate::scene::{OverridableProperty, OverrideValue, Scene, WidgetId};

/// Flows children left to right (or top to bottom) and wraps them into rows.
#[derive(Debug, Clone, Default)]
pub struct ListLayout {
    base: LayoutBase,
    padding: UDim2,
}

impl ListLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.base.config = config;
        self
    }

    /// Gap between items in a row (x) and between rows (y), resolved
    /// against the container size.
    pub fn with_padding(mut self, padding: UDim2) -> Self {
        self.padding = padding;
        self
    }

    pub fn padding(&self) -> UDim2 {
        self.padding
    }

    pub fn set_padding(&mut self, padding: UDim2) {
        self.padding = padding;
    }
}

impl LayoutStyle for ListLayout {
    fn name(&self) -> &str {
        "ListLayout"
    }

    fn base(&self) -> &LayoutBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LayoutBase {
        &mut self.base
    }

    fn attach_child(&mut self, scene: &mut Scene, child: WidgetId) -> Result<()> {
        scene.add_override(child, OverrideValue::Position(UDim2::ZERO))?;
        scene.add_override(child, OverrideValue::AnchorPoint(Vec2::ZERO))
    }

    fn detach_child(&mut self, scene: &mut Scene, child: WidgetId) -> Result<()> {
        for property in [OverridableProperty::Position, OverridableProperty::AnchorPoint] {
            if scene.has_override(child, property) {
                scene.remove_override(child, property)?;
            }
        }
        Ok(())
    }

    fn order_children(&mut self, scene: &mut Scene, container: WidgetId) -> Result<()> {
        let container_size = scene.absolute_size(container)?;
        let sizes = self
            .base
            .children()
            .iter()
            .map(|&child| scene.absolute_size(child))
            .collect::<Result<Vec<_>>>()?;
        let gap = self.padding.resolve(container_size);
        let offsets = flow(&sizes, container_size, gap, &self.base.config)?;
        for (&child, offset) in self.base.children().iter().zip(offsets) {
            scene.add_override(child, OverrideValue::Position(UDim2::from_offset(offset.x, offset.y)))?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Compute the offset of every child, in order, inside `container`.
///
/// `gap.x` separates neighbours in a row and `gap.y` separates rows. A row
/// wraps when the next child would overflow the primary axis; a child wider
/// than the container still gets a row to itself.
pub fn flow(sizes: &[Vec2], container: Vec2, gap: Vec2, config: &LayoutConfig) -> Result<Vec<Vec2>> {
    if config.vertical_alignment == VerticalAlignment::Center {
        return Err(GuiError::UnsupportedAlignment(
            "vertical CENTER is not supported by ListLayout".into(),
        ));
    }
    let vertical = config.fill_direction == FillDirection::Vertical;
    let orient = |v: Vec2| if vertical { v.transpose() } else { v };
    let container = orient(container);
    let gap = orient(gap);

    let mut offsets: Vec<Vec2> = Vec::with_capacity(sizes.len());
    let mut row_start = 0;
    let mut row_width = 0.0_f32;
    let mut row_height = 0.0_f32;
    let mut largest_height = 0.0_f32;

    for (index, &size) in sizes.iter().enumerate() {
        let size = orient(size);
        let in_row = index > row_start;

        if in_row && row_width + gap.x + size.x > container.x {
            row_height += largest_height + gap.y;
            largest_height = 0.0;
            row_width = 0.0;
            row_start = index;
        }
        let spacing = if index > row_start { gap.x } else { 0.0 };

        let x = match config.horizontal_alignment {
            HorizontalAlignment::Left => row_width + spacing,
            HorizontalAlignment::Right => container.x - row_width - spacing - size.x,
            HorizontalAlignment::Center => {
                let shift = (size.x + spacing) / 2.0;
                for placed in &mut offsets[row_start..] {
                    placed.x -= shift;
                }
                (container.x - size.x + row_width + spacing) / 2.0
            }
        };
        let y = match config.vertical_alignment {
            VerticalAlignment::Bottom => container.y - size.y - row_height,
            _ => row_height,
        };

        offsets.push(Vec2::new(x, y));
        row_width += spacing + size.x;
        largest_height = largest_height.max(size.y);
    }

    Ok(offsets.into_iter().map(orient).collect())
}
