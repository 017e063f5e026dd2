//! Absolute geometry resolution.
//!
//! Absolute position and size are never stored. Every read walks the parent
//! chain: a widget's size resolves against its parent's absolute size, and
//! its position against the parent's absolute position and size, shifted by
//! its anchor point scaled by its own absolute size. Roots resolve against
//! the viewport.

use slotmap::SlotMap;

use super::{Scene, WidgetId, WidgetNode};
use crate::error::{GuiError, Result};
use crate::geometry::{Rect, Vec2};
use crate::spatial::GeometryProvider;

/// Read-only geometry view over the arena.
///
/// Borrowing only the node map lets the spatial index be mutated while
/// geometry is resolved.
#[derive(Clone, Copy)]
pub struct Geometry<'a> {
    nodes: &'a SlotMap<WidgetId, WidgetNode>,
    viewport: Vec2,
}

impl<'a> Geometry<'a> {
    pub(crate) fn new(nodes: &'a SlotMap<WidgetId, WidgetNode>, viewport: Vec2) -> Self {
        Self { nodes, viewport }
    }

    /// The widget's absolute rect, or `None` if it does not exist.
    pub fn rect(&self, id: WidgetId) -> Option<Rect> {
        let node = self.nodes.get(id)?;
        let parent_rect = match node.parent.filter(|_| !node.is_root) {
            Some(parent) => self.rect(parent)?,
            None => Rect::from_pos_size(Vec2::ZERO, self.viewport),
        };
        let size = node.size.get().resolve(parent_rect.size());
        let position = parent_rect.position() + node.position.get().resolve(parent_rect.size())
            - size.scale(node.anchor_point.get());
        Some(Rect::from_pos_size(position, size))
    }
}

impl GeometryProvider<WidgetId> for Geometry<'_> {
    fn position(&self, item: &WidgetId) -> Vec2 {
        self.rect(*item).map_or(Vec2::ZERO, Rect::position)
    }

    fn size(&self, item: &WidgetId) -> Vec2 {
        self.rect(*item).map_or(Vec2::ZERO, Rect::size)
    }

    fn rect(&self, item: &WidgetId) -> Rect {
        Geometry::rect(self, *item).unwrap_or(Rect::EMPTY)
    }
}

impl Scene {
    /// Geometry view over the current tree.
    pub fn geometry(&self) -> Geometry<'_> {
        Geometry::new(&self.nodes, self.viewport)
    }

    /// Absolute rect, derived from the parent chain.
    pub fn absolute_rect(&self, id: WidgetId) -> Result<Rect> {
        self.geometry().rect(id).ok_or(GuiError::UnknownWidget(id))
    }

    /// Absolute size: `parent_size * size.scale + size.offset`.
    pub fn absolute_size(&self, id: WidgetId) -> Result<Vec2> {
        self.absolute_rect(id).map(Rect::size)
    }

    /// Absolute position, after the anchor-point shift.
    pub fn absolute_position(&self, id: WidgetId) -> Result<Vec2> {
        self.absolute_rect(id).map(Rect::position)
    }
}

#[cfg(test)]
mod tests {
    use crate::app::GuiConfig;
    use crate::geometry::{Rect, UDim2, Vec2};
    use crate::scene::{Scene, WidgetProps};
    use crate::testing::{FixedMeasurer, RecordingSurface};
    use crate::widgets::Frame;

    fn scene(viewport: Vec2) -> Scene {
        Scene::new(
            &GuiConfig::default().with_viewport(viewport),
            Box::new(RecordingSurface::new()),
            Box::new(FixedMeasurer::default()),
        )
    }

    #[test]
    fn root_resolves_against_viewport() {
        let mut scene = scene(Vec2::new(800.0, 600.0));
        let root = scene.create_root(
            WidgetProps::new().with_size(UDim2::from_scale(1.0, 1.0)),
            Frame::new(),
        );
        assert_eq!(scene.absolute_rect(root).unwrap(), Rect::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn three_level_mixed_scale_and_offset() {
        let mut scene = scene(Vec2::new(800.0, 600.0));
        let root = scene.create_root(
            WidgetProps::new().with_size(UDim2::from_scale(1.0, 1.0)),
            Frame::new(),
        );
        // 800*0.5+20 = 420 wide, 600*0.5-10 = 290 tall, at (100, 50).
        let child = scene
            .spawn(
                WidgetProps::child_of(root)
                    .with_size(UDim2::new(0.5, 20.0, 0.5, -10.0))
                    .with_position(UDim2::new(0.0, 100.0, 0.0, 50.0)),
                Frame::new(),
            )
            .unwrap();
        // 210x40, pivoting on its bottom center.
        let grandchild = scene
            .spawn(
                WidgetProps::child_of(child)
                    .with_size(UDim2::new(0.5, 0.0, 0.0, 40.0))
                    .with_position(UDim2::new(0.5, 5.0, 1.0, 0.0))
                    .with_anchor_point(Vec2::new(0.5, 1.0)),
                Frame::new(),
            )
            .unwrap();

        assert_eq!(scene.absolute_size(child).unwrap(), Vec2::new(420.0, 290.0));
        assert_eq!(scene.absolute_position(child).unwrap(), Vec2::new(100.0, 50.0));
        assert_eq!(scene.absolute_size(grandchild).unwrap(), Vec2::new(210.0, 40.0));
        assert_eq!(scene.absolute_position(grandchild).unwrap(), Vec2::new(210.0, 300.0));
    }

    #[test]
    fn geometry_follows_parent_moves() {
        let mut scene = scene(Vec2::new(200.0, 200.0));
        let root = scene.create_root(
            WidgetProps::new().with_size(UDim2::from_scale(1.0, 1.0)),
            Frame::new(),
        );
        let parent = scene
            .spawn(
                WidgetProps::child_of(root).with_size(UDim2::from_offset(100.0, 100.0)),
                Frame::new(),
            )
            .unwrap();
        let child = scene
            .spawn(
                WidgetProps::child_of(parent)
                    .with_size(UDim2::from_offset(10.0, 10.0))
                    .with_position(UDim2::from_offset(5.0, 5.0)),
                Frame::new(),
            )
            .unwrap();
        scene.set_position(parent, UDim2::from_offset(50.0, 20.0)).unwrap();
        assert_eq!(scene.absolute_position(child).unwrap(), Vec2::new(55.0, 25.0));
    }

    #[test]
    fn viewport_change_rescales_roots() {
        let mut scene = scene(Vec2::new(100.0, 100.0));
        let root = scene.create_root(
            WidgetProps::new().with_size(UDim2::from_scale(0.5, 1.0)),
            Frame::new(),
        );
        scene.set_viewport(Vec2::new(300.0, 50.0));
        assert_eq!(scene.absolute_size(root).unwrap(), Vec2::new(150.0, 50.0));
    }
}
