//! Applying, configuring and driving layout styles.
//!
//! A container's layout lives in its node. While a pass runs, the layout is
//! taken out of the node so it can mutate the scene, then put back.

use super::{Scene, WidgetId};
use crate::error::{GuiError, Result};
use crate::layout::{sort_children, LayoutConfig, LayoutStyle};

impl Scene {
    /// Bind `layout` to `container` and position every current child.
    ///
    /// Fails if the container's content does not accept layouts or a layout
    /// is already applied. If the first pass fails, every override it
    /// installed is removed and the layout is not kept.
    pub fn apply_layout(&mut self, container: WidgetId, layout: impl LayoutStyle + 'static) -> Result<()> {
        let node = self.node(container)?;
        if !node.content.as_container().is_some_and(|c| c.accepts_layout()) {
            return Err(GuiError::NotAContainer(container));
        }
        if node.layout.is_some() {
            return Err(GuiError::LayoutAlreadyApplied(container));
        }

        let mut layout: Box<dyn LayoutStyle> = Box::new(layout);
        layout.base_mut().bind(container);
        let children = self.children(container).to_vec();
        let result = self.batch_redraw(container, |scene| {
            layout.on_applied(scene, container)?;
            for child in children {
                layout.base_mut().push_child(child);
                layout.attach_child(scene, child)?;
            }
            scene.run_layout(layout.as_mut(), container)
        });

        if let Err(err) = result {
            self.release_children(layout.as_mut());
            layout.base_mut().unbind();
            return Err(err);
        }
        tracing::debug!(?container, layout = layout.name(), "layout applied");
        self.node_mut(container)?.layout = Some(layout);
        Ok(())
    }

    /// Tear down `container`'s layout, removing every override it
    /// installed, and hand it back.
    pub fn remove_layout(&mut self, container: WidgetId) -> Result<Box<dyn LayoutStyle>> {
        let mut layout = self
            .node_mut(container)?
            .layout
            .take()
            .ok_or(GuiError::NoLayoutApplied(container))?;
        let result = self.batch_redraw(container, |scene| {
            scene.release_children(layout.as_mut());
            layout.on_removed(scene, container)
        });
        layout.base_mut().unbind();
        tracing::debug!(?container, layout = layout.name(), "layout removed");
        result.map(|()| layout)
    }

    /// Whether `container` has a layout applied.
    pub fn has_layout(&self, container: WidgetId) -> bool {
        self.nodes.get(container).is_some_and(|n| n.layout.is_some())
    }

    /// The applied layout, downcast.
    pub fn layout<L: LayoutStyle + 'static>(&self, container: WidgetId) -> Option<&L> {
        self.nodes.get(container)?.layout.as_ref()?.as_any().downcast_ref::<L>()
    }

    /// Children in the order the applied layout placed them.
    pub fn layout_children(&self, container: WidgetId) -> Vec<WidgetId> {
        self.nodes
            .get(container)
            .and_then(|n| n.layout.as_ref())
            .map(|l| l.base().children().to_vec())
            .unwrap_or_default()
    }

    /// Change the layout's alignment, fill direction or sort order and
    /// re-run it. A configuration the layout rejects is rolled back.
    pub fn update_layout(&mut self, container: WidgetId, f: impl FnOnce(&mut LayoutConfig)) -> Result<()> {
        self.with_layout(container, |scene, layout| {
            let previous = layout.base().config;
            f(&mut layout.base_mut().config);
            let result = scene.relayout_with(layout, container);
            if result.is_err() {
                layout.base_mut().config = previous;
                if let Err(err) = scene.relayout_with(layout, container) {
                    tracing::error!(?container, error = %err, "layout rollback failed");
                }
            }
            result
        })
    }

    /// Mutate the concrete layout (padding, cell size, ...) and re-run it.
    pub fn configure_layout<L: LayoutStyle + 'static, R>(
        &mut self,
        container: WidgetId,
        f: impl FnOnce(&mut L) -> R,
    ) -> Result<R> {
        self.with_layout(container, |scene, layout| {
            let concrete = layout.as_any_mut().downcast_mut::<L>().ok_or_else(|| {
                GuiError::InvalidWidget(format!(
                    "layout on {container:?} is not a {}",
                    std::any::type_name::<L>()
                ))
            })?;
            let out = f(concrete);
            scene.relayout_with(layout, container)?;
            Ok(out)
        })
    }

    /// Re-run `container`'s layout against current geometry.
    pub fn relayout(&mut self, container: WidgetId) -> Result<()> {
        self.with_layout(container, |scene, layout| scene.relayout_with(layout, container))
    }

    // -----------------------------------------------------------------------
    // Scene-internal hooks
    // -----------------------------------------------------------------------

    /// Returns whether a layout pass ran, in which case the parent (child
    /// included) has already been redrawn.
    pub(crate) fn layout_child_added(&mut self, parent: WidgetId, child: WidgetId) -> Result<bool> {
        if !self.has_layout(parent) {
            return Ok(false);
        }
        self.with_layout(parent, |scene, layout| {
            scene.batch_redraw(parent, |scene| {
                layout.base_mut().push_child(child);
                layout.attach_child(scene, child)?;
                scene.run_layout(layout, parent)
            })
        })?;
        Ok(true)
    }

    pub(crate) fn layout_child_removed(&mut self, parent: WidgetId, child: WidgetId) -> Result<()> {
        if !self.has_layout(parent) {
            return Ok(());
        }
        self.with_layout(parent, |scene, layout| {
            scene.batch_redraw(parent, |scene| {
                if layout.base_mut().remove_child(child) && scene.contains(child) {
                    layout.detach_child(scene, child)?;
                }
                scene.run_layout(layout, parent)
            })
        })
    }

    /// A child's name or layout order changed: re-sort its parent's layout.
    pub(crate) fn layout_order_changed(&mut self, id: WidgetId) {
        let Some(parent) = self.parent(id) else { return };
        if !self.layout_children(parent).contains(&id) {
            return;
        }
        if let Err(err) = self.relayout(parent) {
            tracing::error!(?parent, error = %err, "layout pass failed after order change");
        }
    }

    /// Re-run every layout, e.g. after the viewport changed.
    pub(crate) fn relayout_all(&mut self) {
        let containers: Vec<WidgetId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.layout.is_some() && n.built)
            .map(|(id, _)| id)
            .collect();
        for container in containers {
            if let Err(err) = self.relayout(container) {
                tracing::error!(?container, error = %err, "layout pass failed");
            }
        }
    }

    // -----------------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------------

    fn with_layout<R>(
        &mut self,
        container: WidgetId,
        f: impl FnOnce(&mut Scene, &mut dyn LayoutStyle) -> Result<R>,
    ) -> Result<R> {
        let mut layout = self
            .node_mut(container)?
            .layout
            .take()
            .ok_or(GuiError::NoLayoutApplied(container))?;
        let result = f(self, layout.as_mut());
        if let Some(node) = self.nodes.get_mut(container) {
            node.layout = Some(layout);
        }
        result
    }

    fn relayout_with(&mut self, layout: &mut dyn LayoutStyle, container: WidgetId) -> Result<()> {
        self.batch_redraw(container, |scene| scene.run_layout(layout, container))
    }

    fn run_layout(&mut self, layout: &mut dyn LayoutStyle, container: WidgetId) -> Result<()> {
        sort_children(layout, self);
        layout.order_children(self, container)?;
        tracing::trace!(?container, layout = layout.name(), children = layout.base().children().len(), "layout pass");
        Ok(())
    }

    /// Detach every child the layout tracks. Failures are logged so one bad
    /// child does not strand the others' overrides.
    fn release_children(&mut self, layout: &mut dyn LayoutStyle) {
        for child in layout.base().children().to_vec() {
            if !self.contains(child) {
                continue;
            }
            if let Err(err) = layout.detach_child(self, child) {
                tracing::error!(?child, error = %err, "failed to release layout child");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app::GuiConfig;
    use crate::error::GuiError;
    use crate::geometry::{UDim2, Vec2};
    use crate::layout::{
        GridLayout, HorizontalAlignment, LayoutStyle, ListLayout, SortOrder, VerticalAlignment,
    };
    use crate::scene::{OverridableProperty, Scene, WidgetId, WidgetProps};
    use crate::testing::{DrawCommand, FixedMeasurer, RecordingSurface};
    use crate::widgets::{Frame, TextLabel};

    fn scene() -> (Scene, RecordingSurface, WidgetId) {
        let surface = RecordingSurface::new();
        let mut scene = Scene::new(
            &GuiConfig::default().with_viewport(Vec2::new(100.0, 100.0)),
            Box::new(surface.clone()),
            Box::new(FixedMeasurer::default()),
        );
        let root = scene.create_root(
            WidgetProps::new().with_size(UDim2::from_scale(1.0, 1.0)),
            Frame::new(),
        );
        (scene, surface, root)
    }

    fn item(scene: &mut Scene, parent: WidgetId, order: i64) -> WidgetId {
        scene
            .spawn(
                WidgetProps::child_of(parent)
                    .with_size(UDim2::from_offset(40.0, 20.0))
                    .with_position(UDim2::from_offset(7.0, 7.0))
                    .with_layout_order(order),
                Frame::new(),
            )
            .unwrap()
    }

    fn positions(scene: &Scene, ids: &[WidgetId]) -> Vec<Vec2> {
        ids.iter().map(|&id| scene.absolute_position(id).unwrap()).collect()
    }

    // ── Apply / remove ──

    #[test]
    fn apply_positions_existing_children() {
        let (mut scene, _surface, root) = scene();
        let ids: Vec<_> = (0..3).map(|i| item(&mut scene, root, i)).collect();
        scene.apply_layout(root, ListLayout::new()).unwrap();
        assert_eq!(
            positions(&scene, &ids),
            vec![Vec2::new(0.0, 0.0), Vec2::new(40.0, 0.0), Vec2::new(0.0, 20.0)]
        );
        assert_eq!(scene.base_position(ids[0]).unwrap(), UDim2::from_offset(7.0, 7.0));
    }

    #[test]
    fn apply_issues_one_redraw() {
        let (mut scene, surface, root) = scene();
        for i in 0..3 {
            item(&mut scene, root, i);
        }
        surface.take();
        scene.apply_layout(root, ListLayout::new()).unwrap();
        let clears = surface.take().iter().filter(|c| matches!(c, DrawCommand::Clear { .. })).count();
        assert_eq!(clears, 1);
    }

    #[test]
    fn child_added_under_layout_draws_once() {
        let (mut scene, surface, root) = scene();
        scene.apply_layout(root, ListLayout::new()).unwrap();
        surface.take();

        item(&mut scene, root, 0);
        let commands = surface.take();
        let clears = commands.iter().filter(|c| matches!(c, DrawCommand::Clear { .. })).count();
        let fills = commands.iter().filter(|c| matches!(c, DrawCommand::FillRect { .. })).count();
        assert_eq!(clears, 1);
        assert_eq!(fills, 2);
    }

    #[test]
    fn children_added_later_are_placed() {
        let (mut scene, _surface, root) = scene();
        scene.apply_layout(root, ListLayout::new()).unwrap();
        let a = item(&mut scene, root, 0);
        let b = item(&mut scene, root, 1);
        assert_eq!(positions(&scene, &[a, b]), vec![Vec2::new(0.0, 0.0), Vec2::new(40.0, 0.0)]);
        assert_eq!(scene.layout_children(root), vec![a, b]);
    }

    #[test]
    fn remove_layout_restores_base_values() {
        let (mut scene, _surface, root) = scene();
        let a = item(&mut scene, root, 0);
        let b = item(&mut scene, root, 1);
        scene.apply_layout(root, ListLayout::new()).unwrap();
        let layout = scene.remove_layout(root).unwrap();
        assert_eq!(layout.name(), "ListLayout");
        assert!(layout.base().children().is_empty());
        assert!(!scene.has_override(a, OverridableProperty::Position));
        assert!(!scene.has_override(b, OverridableProperty::AnchorPoint));
        assert_eq!(positions(&scene, &[a, b]), vec![Vec2::new(7.0, 7.0); 2]);
        assert!(!scene.has_layout(root));
    }

    #[test]
    fn second_layout_is_rejected() {
        let (mut scene, _surface, root) = scene();
        scene.apply_layout(root, ListLayout::new()).unwrap();
        let err = scene.apply_layout(root, GridLayout::new()).unwrap_err();
        assert!(matches!(err, GuiError::LayoutAlreadyApplied(_)));
        assert!(scene.layout::<ListLayout>(root).is_some());
    }

    #[test]
    fn non_container_is_rejected() {
        let (mut scene, _surface, root) = scene();
        let label = scene.spawn(WidgetProps::child_of(root), TextLabel::new("hi")).unwrap();
        let err = scene.apply_layout(label, ListLayout::new()).unwrap_err();
        assert!(matches!(err, GuiError::NotAContainer(_)));
    }

    #[test]
    fn remove_without_layout_errors() {
        let (mut scene, _surface, root) = scene();
        assert!(matches!(scene.remove_layout(root), Err(GuiError::NoLayoutApplied(_))));
    }

    #[test]
    fn failed_apply_leaves_no_overrides() {
        let (mut scene, _surface, root) = scene();
        let a = item(&mut scene, root, 0);
        let list = ListLayout::new().with_config(
            crate::layout::LayoutConfig::new().with_vertical_alignment(VerticalAlignment::Center),
        );
        let err = scene.apply_layout(root, list).unwrap_err();
        assert!(matches!(err, GuiError::UnsupportedAlignment(_)));
        assert!(!scene.has_layout(root));
        assert!(!scene.has_override(a, OverridableProperty::Position));
    }

    // ── Re-runs ──

    #[test]
    fn layout_order_change_reflows() {
        let (mut scene, _surface, root) = scene();
        let a = item(&mut scene, root, 0);
        let b = item(&mut scene, root, 1);
        scene.apply_layout(root, ListLayout::new()).unwrap();
        scene.set_layout_order(a, 5).unwrap();
        assert_eq!(scene.layout_children(root), vec![b, a]);
        assert_eq!(scene.absolute_position(a).unwrap(), Vec2::new(40.0, 0.0));
    }

    #[test]
    fn layout_order_round_trip_restores_insertion_order() {
        let (mut scene, _surface, root) = scene();
        let ids: Vec<_> = (0..3).map(|_| item(&mut scene, root, 0)).collect();
        scene.apply_layout(root, ListLayout::new()).unwrap();

        scene.set_layout_order(ids[0], 5).unwrap();
        assert_eq!(scene.layout_children(root), vec![ids[1], ids[2], ids[0]]);
        scene.set_layout_order(ids[0], 0).unwrap();
        assert_eq!(scene.layout_children(root), ids);
        assert_eq!(scene.absolute_position(ids[0]).unwrap(), Vec2::ZERO);
    }

    #[test]
    fn custom_sort_ties_keep_insertion_order() {
        let (mut scene, _surface, root) = scene();
        let first = item(&mut scene, root, 0);
        let second = item(&mut scene, root, 0);
        scene.apply_layout(root, ListLayout::new()).unwrap();
        scene.update_layout(root, |cfg| cfg.sort_order = SortOrder::Custom).unwrap();
        assert_eq!(scene.layout_children(root), vec![first, second]);
    }

    #[test]
    fn destroyed_child_leaves_a_gap_closed() {
        let (mut scene, _surface, root) = scene();
        let a = item(&mut scene, root, 0);
        let b = item(&mut scene, root, 1);
        scene.apply_layout(root, ListLayout::new()).unwrap();
        scene.destroy(a).unwrap();
        assert_eq!(scene.layout_children(root), vec![b]);
        assert_eq!(scene.absolute_position(b).unwrap(), Vec2::ZERO);
    }

    #[test]
    fn update_layout_reruns_and_rolls_back() {
        let (mut scene, _surface, root) = scene();
        let a = item(&mut scene, root, 0);
        scene.apply_layout(root, ListLayout::new()).unwrap();

        scene
            .update_layout(root, |cfg| cfg.horizontal_alignment = HorizontalAlignment::Right)
            .unwrap();
        assert_eq!(scene.absolute_position(a).unwrap(), Vec2::new(60.0, 0.0));

        let err = scene
            .update_layout(root, |cfg| cfg.vertical_alignment = VerticalAlignment::Center)
            .unwrap_err();
        assert!(matches!(err, GuiError::UnsupportedAlignment(_)));
        let cfg = scene.layout::<ListLayout>(root).unwrap().base().config;
        assert_eq!(cfg.vertical_alignment, VerticalAlignment::Top);
    }

    #[test]
    fn sort_by_name() {
        let (mut scene, _surface, root) = scene();
        let b = scene
            .spawn(WidgetProps::child_of(root).with_name("b").with_size(UDim2::from_offset(10.0, 10.0)), Frame::new())
            .unwrap();
        let a = scene
            .spawn(WidgetProps::child_of(root).with_name("a").with_size(UDim2::from_offset(10.0, 10.0)), Frame::new())
            .unwrap();
        scene.apply_layout(root, ListLayout::new()).unwrap();
        scene.update_layout(root, |cfg| cfg.sort_order = SortOrder::Name).unwrap();
        assert_eq!(scene.layout_children(root), vec![a, b]);
    }

    #[test]
    fn configure_list_padding() {
        let (mut scene, _surface, root) = scene();
        let _a = item(&mut scene, root, 0);
        let b = item(&mut scene, root, 1);
        scene.apply_layout(root, ListLayout::new()).unwrap();
        scene
            .configure_layout::<ListLayout, _>(root, |l| l.set_padding(UDim2::from_offset(10.0, 0.0)))
            .unwrap();
        assert_eq!(scene.absolute_position(b).unwrap(), Vec2::new(50.0, 0.0));
        let wrong = scene.configure_layout::<GridLayout, _>(root, |_| ());
        assert!(matches!(wrong, Err(GuiError::InvalidWidget(_))));
    }

    // ── Grid ──

    #[test]
    fn grid_sizes_and_places_cells() {
        let (mut scene, _surface, root) = scene();
        let a = item(&mut scene, root, 0);
        let b = item(&mut scene, root, 1);
        let grid = GridLayout::new()
            .with_cell_size(UDim2::from_offset(30.0, 30.0))
            .with_cell_padding(UDim2::from_offset(10.0, 10.0));
        scene.apply_layout(root, grid).unwrap();
        assert_eq!(scene.absolute_size(a).unwrap(), Vec2::new(30.0, 30.0));
        assert_eq!(scene.absolute_position(b).unwrap(), Vec2::new(40.0, 0.0));

        scene.remove_layout(root).unwrap();
        assert_eq!(scene.absolute_size(a).unwrap(), Vec2::new(40.0, 20.0));
    }
}
