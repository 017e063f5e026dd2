//! Spatial index maintenance and pointer hit testing.
//!
//! Each root owns a quadtree over its built subtree. Widgets are inserted
//! when built; any geometry write marks the owning root's tree dirty and the
//! next hit test rebuilds it from the live geometry before querying.

use super::{Geometry, Scene, WidgetId};
use crate::geometry::Vec2;

impl Scene {
    pub(crate) fn index_insert(&mut self, id: WidgetId) {
        let Some(root) = self.root_of(id) else { return };
        let geometry = Geometry::new(&self.nodes, self.viewport);
        if let Some(entry) = self.roots.iter_mut().find(|e| e.id == root) {
            entry.index.insert(id, &geometry);
        }
    }

    pub(crate) fn mark_spatial_dirty(&mut self, root: WidgetId) {
        if let Some(entry) = self.roots.iter_mut().find(|e| e.id == root) {
            entry.dirty = true;
        }
    }

    pub(crate) fn mark_spatial_dirty_for(&mut self, id: WidgetId) {
        if let Some(root) = self.root_of(id) {
            self.mark_spatial_dirty(root);
        }
    }

    /// Built widgets in `root`'s subtree, depth-first, `root` included.
    pub fn subtree(&self, root: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else { continue };
            if !node.built {
                continue;
            }
            out.push(id);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Rebuild every dirty root's quadtree from current geometry.
    pub fn refresh_spatial_index(&mut self) {
        let pending: Vec<Option<Vec<WidgetId>>> = self
            .roots
            .iter()
            .map(|entry| entry.dirty.then(|| self.subtree(entry.id)))
            .collect();
        let geometry = Geometry::new(&self.nodes, self.viewport);
        for (entry, items) in self.roots.iter_mut().zip(pending) {
            if let Some(items) = items {
                entry.index.rebuild(items, &geometry);
                entry.dirty = false;
                tracing::trace!(root = ?entry.id, entries = entry.index.entry_count(), "spatial index rebuilt");
            }
        }
    }

    /// Whether the widget and every ancestor are visible.
    pub fn is_effectively_visible(&self, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            match self.nodes.get(cur) {
                Some(node) if node.visible => current = node.parent.filter(|_| !node.is_root),
                _ => return false,
            }
        }
        true
    }

    /// Every visible widget under `point`, without duplicates.
    pub fn hits_at(&mut self, point: Vec2) -> Vec<WidgetId> {
        self.refresh_spatial_index();
        let geometry = Geometry::new(&self.nodes, self.viewport);
        let mut hits: Vec<WidgetId> = Vec::new();
        for entry in &self.roots {
            for id in entry.index.query_point(point, &geometry) {
                if !hits.contains(&id) {
                    hits.push(id);
                }
            }
        }
        hits.retain(|&id| self.is_effectively_visible(id));
        hits
    }

    /// The single deepest visible widget under `point`. Ties at equal depth
    /// go to the higher draw order, then to the later root.
    pub fn hit_test(&mut self, point: Vec2) -> Option<WidgetId> {
        let hits = self.hits_at(point);
        hits.into_iter().max_by_key(|&id| {
            self.nodes
                .get(id)
                .map(|node| (node.depth, node.draw_order))
                .unwrap_or_default()
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::app::GuiConfig;
    use crate::geometry::{UDim2, Vec2};
    use crate::scene::{OverrideValue, Scene, WidgetId, WidgetProps};
    use crate::testing::{FixedMeasurer, RecordingSurface};
    use crate::widgets::Frame;

    fn scene() -> (Scene, WidgetId) {
        let mut scene = Scene::new(
            &GuiConfig::default().with_viewport(Vec2::new(200.0, 200.0)),
            Box::new(RecordingSurface::new()),
            Box::new(FixedMeasurer::default()),
        );
        let root = scene.create_root(
            WidgetProps::new().with_size(UDim2::from_scale(1.0, 1.0)),
            Frame::new(),
        );
        (scene, root)
    }

    fn boxed(scene: &mut Scene, parent: WidgetId, x: f32, y: f32, w: f32, h: f32) -> WidgetId {
        scene
            .spawn(
                WidgetProps::child_of(parent)
                    .with_position(UDim2::from_offset(x, y))
                    .with_size(UDim2::from_offset(w, h)),
                Frame::new(),
            )
            .unwrap()
    }

    #[test]
    fn deepest_widget_wins() {
        let (mut scene, root) = scene();
        let outer = boxed(&mut scene, root, 10.0, 10.0, 100.0, 100.0);
        let inner = boxed(&mut scene, outer, 10.0, 10.0, 20.0, 20.0);
        assert_eq!(scene.hit_test(Vec2::new(25.0, 25.0)), Some(inner));
        assert_eq!(scene.hit_test(Vec2::new(90.0, 90.0)), Some(outer));
        assert_eq!(scene.hit_test(Vec2::new(150.0, 150.0)), Some(root));
    }

    #[test]
    fn fractional_edges_hit_exactly() {
        let (mut scene, root) = scene();
        let w = boxed(&mut scene, root, 10.5, 10.5, 20.0, 20.0);
        assert_eq!(scene.hit_test(Vec2::new(10.7, 10.7)), Some(w));
        assert_eq!(scene.hit_test(Vec2::new(10.2, 10.7)), Some(root));
    }

    #[test]
    fn draw_order_breaks_depth_ties() {
        let (mut scene, root) = scene();
        let a = boxed(&mut scene, root, 0.0, 0.0, 50.0, 50.0);
        let b = boxed(&mut scene, root, 0.0, 0.0, 50.0, 50.0);
        scene.set_draw_order(a, 5).unwrap();
        assert_eq!(scene.hit_test(Vec2::new(10.0, 10.0)), Some(a));
        scene.set_draw_order(b, 9).unwrap();
        assert_eq!(scene.hit_test(Vec2::new(10.0, 10.0)), Some(b));
    }

    #[test]
    fn moved_widgets_are_reindexed() {
        let (mut scene, root) = scene();
        let w = boxed(&mut scene, root, 0.0, 0.0, 10.0, 10.0);
        scene.set_position(w, UDim2::from_offset(150.0, 150.0)).unwrap();
        assert_eq!(scene.hit_test(Vec2::new(155.0, 155.0)), Some(w));
        assert_eq!(scene.hit_test(Vec2::new(5.0, 5.0)), Some(root));

        scene.add_override(w, OverrideValue::Position(UDim2::from_offset(0.0, 0.0))).unwrap();
        assert_eq!(scene.hit_test(Vec2::new(5.0, 5.0)), Some(w));
    }

    #[test]
    fn hidden_widgets_are_not_hit() {
        let (mut scene, root) = scene();
        let parent = boxed(&mut scene, root, 0.0, 0.0, 100.0, 100.0);
        let child = boxed(&mut scene, parent, 0.0, 0.0, 10.0, 10.0);
        scene.set_visible(parent, false).unwrap();
        assert_eq!(scene.hit_test(Vec2::new(5.0, 5.0)), Some(root));
        scene.set_visible(parent, true).unwrap();
        assert_eq!(scene.hit_test(Vec2::new(5.0, 5.0)), Some(child));
    }

    #[test]
    fn destroyed_widgets_leave_the_index() {
        let (mut scene, root) = scene();
        let w = boxed(&mut scene, root, 0.0, 0.0, 10.0, 10.0);
        scene.destroy(w).unwrap();
        assert_eq!(scene.hit_test(Vec2::new(5.0, 5.0)), Some(root));
    }

    #[test]
    fn subtree_is_depth_first_in_draw_order() {
        let (mut scene, root) = scene();
        let a = boxed(&mut scene, root, 0.0, 0.0, 10.0, 10.0);
        let a1 = boxed(&mut scene, a, 0.0, 0.0, 1.0, 1.0);
        let b = boxed(&mut scene, root, 0.0, 0.0, 10.0, 10.0);
        assert_eq!(scene.subtree(root), vec![root, a, a1, b]);
    }

    #[test]
    fn resize_rebuilds_bounds() {
        let (mut scene, root) = scene();
        let w = boxed(&mut scene, root, 250.0, 250.0, 10.0, 10.0);
        assert_eq!(scene.hit_test(Vec2::new(255.0, 255.0)), None);
        scene.set_viewport(Vec2::new(400.0, 400.0));
        assert_eq!(scene.hit_test(Vec2::new(255.0, 255.0)), Some(w));
    }
}
