//! Grid layout: uniform cells, packed row-major (column-major for a vertical
//! fill), with the whole block aligned inside the container.

use std::any::Any;

use super::style::{FillDirection, LayoutBase, LayoutConfig, LayoutStyle};
use crate::error::Result;
use crate::geometry::{UDim2, Vec2};
use crate::scene::{OverridableProperty, OverrideValue, Scene, WidgetId};

#[derive(Debug, Clone)]
pub struct GridLayout {
    base: LayoutBase,
    cell_size: UDim2,
    cell_padding: UDim2,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            base: LayoutBase::default(),
            cell_size: UDim2::from_offset(100.0, 100.0),
            cell_padding: UDim2::from_offset(5.0, 5.0),
        }
    }
}

impl GridLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.base.config = config;
        self
    }

    pub fn with_cell_size(mut self, cell_size: UDim2) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_cell_padding(mut self, cell_padding: UDim2) -> Self {
        self.cell_padding = cell_padding;
        self
    }

    pub fn cell_size(&self) -> UDim2 {
        self.cell_size
    }

    pub fn set_cell_size(&mut self, cell_size: UDim2) {
        self.cell_size = cell_size;
    }

    pub fn cell_padding(&self) -> UDim2 {
        self.cell_padding
    }

    pub fn set_cell_padding(&mut self, cell_padding: UDim2) {
        self.cell_padding = cell_padding;
    }
}

impl LayoutStyle for GridLayout {
    fn name(&self) -> &str {
        "GridLayout"
    }

    fn base(&self) -> &LayoutBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LayoutBase {
        &mut self.base
    }

    fn attach_child(&mut self, scene: &mut Scene, child: WidgetId) -> Result<()> {
        scene.add_override(child, OverrideValue::Position(UDim2::ZERO))?;
        scene.add_override(child, OverrideValue::AnchorPoint(Vec2::ZERO))?;
        scene.add_override(child, OverrideValue::Size(self.cell_size))
    }

    fn detach_child(&mut self, scene: &mut Scene, child: WidgetId) -> Result<()> {
        for property in [
            OverridableProperty::Position,
            OverridableProperty::AnchorPoint,
            OverridableProperty::Size,
        ] {
            if scene.has_override(child, property) {
                scene.remove_override(child, property)?;
            }
        }
        Ok(())
    }

    fn order_children(&mut self, scene: &mut Scene, container: WidgetId) -> Result<()> {
        let container_size = scene.absolute_size(container)?;
        let cell = self.cell_size.resolve(container_size);
        let padding = self.cell_padding.resolve(container_size);
        let cells = grid_cells(
            self.base.children().len(),
            container_size,
            cell,
            padding,
            &self.base.config,
        );
        for (&child, offset) in self.base.children().iter().zip(cells) {
            scene.add_override(child, OverrideValue::Size(self.cell_size))?;
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

/// Offsets of `count` uniform cells inside `container`.
///
/// As many cells as fit (at least one) go along the primary axis before
/// starting the next line. The occupied block is then shifted by the
/// alignment factors times the free space on each axis.
pub fn grid_cells(
    count: usize,
    container: Vec2,
    cell: Vec2,
    padding: Vec2,
    config: &LayoutConfig,
) -> Vec<Vec2> {
    if count == 0 {
        return Vec::new();
    }
    let vertical = config.fill_direction == FillDirection::Vertical;
    let fits = |space: f32, cell: f32, pad: f32| -> usize {
        let step = cell + pad;
        if step <= 0.0 {
            return count;
        }
        (((space + pad) / step).floor() as usize).max(1)
    };
    let per_line = if vertical {
        fits(container.y, cell.y, padding.y)
    } else {
        fits(container.x, cell.x, padding.x)
    }
    .min(count);
    let lines = count.div_ceil(per_line);
    let (columns, rows) = if vertical { (lines, per_line) } else { (per_line, lines) };

    let block = Vec2::new(
        columns as f32 * cell.x + (columns - 1) as f32 * padding.x,
        rows as f32 * cell.y + (rows - 1) as f32 * padding.y,
    );
    let origin = Vec2::new(
        (container.x - block.x) * config.horizontal_alignment.factor(),
        (container.y - block.y) * config.vertical_alignment.factor(),
    );

    (0..count)
        .map(|i| {
            let (line, slot) = (i / per_line, i % per_line);
            let (column, row) = if vertical { (line, slot) } else { (slot, line) };
            origin
                + Vec2::new(
                    column as f32 * (cell.x + padding.x),
                    row as f32 * (cell.y + padding.y),
                )
        })
        .collect()
}
