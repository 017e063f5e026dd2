//! The scene graph: a slotmap arena of widgets.
//!
//! [`Scene`] owns every widget, the per-root spatial indices, the draw
//! surface and the text measurer. Behaviour is split by concern:
//!
//! - this file: construction, build/destroy lifecycle, naming, content access
//! - [`geometry`]: absolute position/size resolution
//! - [`properties`]: typed and by-name property access, overrides, signals
//! - [`redraw`]: the redraw protocol, draw and update traversals
//! - [`hit`]: quadtree maintenance and pointer hit testing
//! - [`layouts`]: applying and driving layout styles

pub mod geometry;
pub mod hit;
pub mod layouts;
pub mod node;
pub mod properties;
pub mod property;
pub mod redraw;

use std::collections::VecDeque;

use slotmap::SlotMap;

use crate::app::GuiConfig;
use crate::error::{GuiError, Result};
use crate::geometry::{Color, Rect, Vec2};
use crate::render::{DrawSurface, Font, TextMeasurer};
use crate::spatial::Quadtree;
use crate::widget::{DrawerHook, Focusable, UpdaterHook, Widget};

pub use geometry::Geometry;
pub use node::{
    Layered, OverridableProperty, OverrideValue, WidgetId, WidgetProps, WidgetSignals,
};
pub use property::{PropertyKind, PropertyValue, CORE_PROPERTIES};

pub(crate) use node::WidgetNode;

/// A root widget and the spatial index covering its subtree.
pub(crate) struct RootEntry {
    pub(crate) id: WidgetId,
    pub(crate) index: Quadtree<WidgetId>,
    /// Set when geometry in the subtree may have moved since the last rebuild.
    pub(crate) dirty: bool,
}

/// The retained widget tree.
pub struct Scene {
    pub(crate) nodes: SlotMap<WidgetId, WidgetNode>,
    pub(crate) roots: Vec<RootEntry>,
    pub(crate) viewport: Vec2,
    pub(crate) surface: Box<dyn DrawSurface>,
    pub(crate) measurer: Box<dyn TextMeasurer>,
    quadtree_capacity: usize,
    quadtree_max_depth: usize,
    default_background: Color,
    default_font: Font,
    name_counter: u64,
    /// Focus release requested by an action callback, with the enter flag.
    pub(crate) blur_request: Option<(WidgetId, bool)>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(
        config: &GuiConfig,
        surface: Box<dyn DrawSurface>,
        measurer: Box<dyn TextMeasurer>,
    ) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            viewport: config.viewport,
            surface,
            measurer,
            quadtree_capacity: config.quadtree_capacity,
            quadtree_max_depth: config.quadtree_max_depth,
            default_background: config.background_color,
            default_font: config.default_font.clone(),
            name_counter: 0,
            blur_request: None,
        }
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    /// Create a root widget covering the viewport.
    ///
    /// Roots are built immediately, get their own spatial index, and are
    /// drawn right away. `props.parent` is ignored.
    pub fn create_root(&mut self, props: WidgetProps, content: impl Widget + 'static) -> WidgetId {
        let props = WidgetProps { parent: None, ..props };
        let id = self.insert_node(props, Box::new(content));
        if let Some(node) = self.nodes.get_mut(id) {
            node.built = true;
            node.is_root = true;
        }
        let bounds = Rect::from_pos_size(Vec2::ZERO, self.viewport);
        let mut index = Quadtree::with_limits(bounds, self.quadtree_capacity, self.quadtree_max_depth);
        index.insert(id, &Geometry::new(&self.nodes, self.viewport));
        self.roots.push(RootEntry { id, index, dirty: false });
        tracing::debug!(?id, "root created");
        self.redraw(id);
        id
    }

    /// Create a detached widget. It stays invisible to its parent until
    /// [`build`](Self::build) is called.
    pub fn create(&mut self, props: WidgetProps, content: impl Widget + 'static) -> WidgetId {
        self.insert_node(props, Box::new(content))
    }

    /// Create a widget and build it in one step.
    pub fn spawn(&mut self, props: WidgetProps, content: impl Widget + 'static) -> Result<WidgetId> {
        let id = self.create(props, content);
        if let Err(err) = self.build(id) {
            if self.is_built(id) {
                self.destroy(id)?;
            } else {
                self.nodes.remove(id);
            }
            return Err(err);
        }
        Ok(id)
    }

    fn insert_node(&mut self, props: WidgetProps, mut content: Box<dyn Widget>) -> WidgetId {
        let name = match props.name.clone() {
            Some(name) => name,
            None => {
                self.name_counter += 1;
                format!("{}{}", content.widget_type(), self.name_counter)
            }
        };
        if let Some(text) = content.as_text_mut() {
            text.text_content_mut().apply_default_font(&self.default_font);
        }
        content.refresh(self.measurer.as_ref());
        let node = WidgetNode::new(name, props, self.default_background, content);
        self.nodes.insert(node)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Attach a widget to its parent.
    ///
    /// Idempotent: building an already-built widget does nothing. A widget
    /// created without a parent stays inert (logged, not an error).
    pub fn build(&mut self, id: WidgetId) -> Result<()> {
        let node = self.nodes.get(id).ok_or(GuiError::UnknownWidget(id))?;
        if node.built {
            return Ok(());
        }
        let Some(parent) = node.parent else {
            tracing::warn!(?id, name = %node.name, "widget built without a parent; it will not be drawn");
            return Ok(());
        };
        let parent_node = self.nodes.get(parent).ok_or(GuiError::UnknownWidget(parent))?;
        if !parent_node.built {
            return Err(GuiError::ParentNotBuilt(id));
        }
        if self.find_child(parent, &node.name).is_some() {
            return Err(GuiError::NameCollision(node.name.clone()));
        }
        let depth = parent_node.depth + 1;

        if let Some(node) = self.nodes.get_mut(id) {
            node.built = true;
            node.depth = depth;
        }
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(id);
        }
        self.sort_children(parent);
        self.index_insert(id);
        tracing::debug!(?id, ?parent, "widget built");

        let signal = self.nodes.get(parent).map(|p| p.signals.child_added.clone());
        if let Some(signal) = signal {
            signal.fire(&id);
        }
        if !self.layout_child_added(parent, id)? {
            self.redraw(id);
        }
        Ok(())
    }

    /// Remove a widget and its whole subtree.
    ///
    /// The parent's `child_removed` signal fires and its layout (if any)
    /// releases the child before the subtree is dropped; the parent is then
    /// redrawn.
    pub fn destroy(&mut self, id: WidgetId) -> Result<()> {
        let node = self.nodes.get(id).ok_or(GuiError::UnknownWidget(id))?;
        let built = node.built;
        let parent = node.parent.filter(|_| built && !node.is_root);

        if let Some(parent) = parent {
            if let Some(parent_node) = self.nodes.get_mut(parent) {
                parent_node.children.retain(|&c| c != id);
            }
            let signal = self.nodes.get(parent).map(|p| p.signals.child_removed.clone());
            if let Some(signal) = signal {
                signal.fire(&id);
            }
            if let Err(err) = self.layout_child_removed(parent, id) {
                tracing::error!(?parent, error = %err, "layout failed to release destroyed child");
            }
        }

        let root = self.root_of(id);
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            if let Some(node) = self.nodes.remove(current) {
                queue.extend(node.children);
            }
            for entry in self.roots.iter_mut() {
                entry.index.remove(current);
            }
        }
        self.roots.retain(|entry| entry.id != id);
        if let Some(root) = root {
            self.mark_spatial_dirty(root);
        }
        tracing::debug!(?id, "widget destroyed");

        if let Some(parent) = parent {
            self.redraw(parent);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Tree queries
    // -----------------------------------------------------------------------

    /// Whether the widget exists.
    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of widgets, built or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene holds no widgets.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root widgets in creation order.
    pub fn roots(&self) -> Vec<WidgetId> {
        self.roots.iter().map(|entry| entry.id).collect()
    }

    /// The owning parent, if any.
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// Built children, in ascending draw order.
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// The built child of `parent` called `name`.
    pub fn find_child(&self, parent: WidgetId, name: &str) -> Option<WidgetId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.nodes.get(c).is_some_and(|n| n.name == name))
    }

    /// Whether the widget has been attached (roots always are).
    pub fn is_built(&self, id: WidgetId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.built)
    }

    /// Whether the widget is a root.
    pub fn is_root(&self, id: WidgetId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.is_root)
    }

    /// Distance from the root (roots are depth 0).
    pub fn depth(&self, id: WidgetId) -> Option<usize> {
        self.nodes.get(id).map(|n| n.depth)
    }

    /// The root at the top of the widget's parent chain.
    pub fn root_of(&self, id: WidgetId) -> Option<WidgetId> {
        let mut current = id;
        loop {
            let node = self.nodes.get(current)?;
            if node.is_root {
                return Some(current);
            }
            current = node.parent?;
        }
    }

    /// Ancestors from the immediate parent up to the root.
    pub fn ancestors(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent(current) {
            result.push(p);
            current = p;
        }
        result
    }

    /// The widget's name.
    pub fn name(&self, id: WidgetId) -> Option<&str> {
        self.nodes.get(id).map(|n| n.name.as_str())
    }

    /// Rename a widget. Fails if a built sibling already has `name`.
    pub fn set_name(&mut self, id: WidgetId, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        let node = self.nodes.get(id).ok_or(GuiError::UnknownWidget(id))?;
        if node.name == name {
            return Ok(());
        }
        if let Some(parent) = node.parent {
            if self.find_child(parent, &name).is_some() {
                return Err(GuiError::NameCollision(name));
            }
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.name = name.clone();
        }
        self.fire_property_changed(id, "name", PropertyValue::Text(name));
        self.layout_order_changed(id);
        Ok(())
    }

    /// Sort `parent`'s children by draw order, keeping insertion order for ties.
    pub(crate) fn sort_children(&mut self, parent: WidgetId) {
        let Some(mut children) = self.nodes.get_mut(parent).map(|n| std::mem::take(&mut n.children)) else {
            return;
        };
        children.sort_by_key(|&c| self.nodes.get(c).map_or(0, |n| n.draw_order));
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children = children;
        }
    }

    // -----------------------------------------------------------------------
    // Content and hooks
    // -----------------------------------------------------------------------

    /// The widget's content, downcast.
    pub fn content<W: Widget + 'static>(&self, id: WidgetId) -> Option<&W> {
        self.nodes.get(id)?.content.as_any().downcast_ref::<W>()
    }

    /// The widget's content as a trait object.
    pub fn content_dyn(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.nodes.get(id).map(|n| n.content.as_ref())
    }

    /// Mutate the widget's content directly, then refresh its metrics and
    /// request a redraw.
    pub fn edit_content<W: Widget + 'static, R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut W) -> R,
    ) -> Result<R> {
        let node = self.nodes.get_mut(id).ok_or(GuiError::UnknownWidget(id))?;
        let content = node
            .content
            .as_any_mut()
            .downcast_mut::<W>()
            .ok_or_else(|| GuiError::InvalidWidget(format!("widget {id:?} has different content")))?;
        let result = f(content);
        node.content.refresh(self.measurer.as_ref());
        self.request_redraw(id);
        Ok(result)
    }

    /// Run `f` on the widget's focus capability, then refresh its metrics
    /// and request a redraw. `None` when the widget cannot hold focus.
    pub fn edit_focusable<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Focusable) -> R,
    ) -> Result<Option<R>> {
        let node = self.nodes.get_mut(id).ok_or(GuiError::UnknownWidget(id))?;
        let Some(focusable) = node.content.as_focusable_mut() else {
            return Ok(None);
        };
        let result = f(focusable);
        node.content.refresh(self.measurer.as_ref());
        self.request_redraw(id);
        Ok(Some(result))
    }

    /// The widget's signals.
    pub fn signals(&self, id: WidgetId) -> Result<&WidgetSignals> {
        self.nodes.get(id).map(|n| &n.signals).ok_or(GuiError::UnknownWidget(id))
    }

    /// Register a draw hook, run after the content draws, in registration order.
    pub fn add_drawer(&mut self, id: WidgetId, hook: DrawerHook) -> Result<()> {
        self.nodes.get_mut(id).ok_or(GuiError::UnknownWidget(id))?.drawers.push(hook);
        Ok(())
    }

    /// Register an update hook, run after the content updates, in registration order.
    pub fn add_updater(&mut self, id: WidgetId, hook: UpdaterHook) -> Result<()> {
        self.nodes.get_mut(id).ok_or(GuiError::UnknownWidget(id))?.updaters.push(hook);
        Ok(())
    }

    /// The text measurer.
    pub fn measurer(&self) -> &dyn TextMeasurer {
        self.measurer.as_ref()
    }

    /// The draw surface.
    pub fn surface_mut(&mut self) -> &mut dyn DrawSurface {
        self.surface.as_mut()
    }

    // -----------------------------------------------------------------------
    // Viewport and focus requests
    // -----------------------------------------------------------------------

    /// The size every root resolves against.
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Change the viewport: resize every root's spatial index, re-run every
    /// layout and redraw every root.
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        let bounds = Rect::from_pos_size(Vec2::ZERO, viewport);
        for entry in self.roots.iter_mut() {
            entry.index.reset(bounds);
            entry.dirty = true;
        }
        tracing::debug!(width = viewport.x, height = viewport.y, "viewport resized");
        self.relayout_all();
        for root in self.roots() {
            self.redraw(root);
        }
    }

    /// Ask the frame loop to release focus from `id` after action dispatch.
    pub fn request_blur(&mut self, id: WidgetId, enter_pressed: bool) {
        self.blur_request = Some((id, enter_pressed));
    }

    pub(crate) fn take_blur_request(&mut self) -> Option<(WidgetId, bool)> {
        self.blur_request.take()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::UDim2;
    use crate::testing::{FixedMeasurer, RecordingSurface};
    use crate::widgets::Frame;
    use std::cell::Cell;
    use std::rc::Rc;

    fn scene() -> Scene {
        Scene::new(
            &GuiConfig::default(),
            Box::new(RecordingSurface::new()),
            Box::new(FixedMeasurer::default()),
        )
    }

    fn frame_props(parent: WidgetId) -> WidgetProps {
        WidgetProps::child_of(parent).with_size(UDim2::from_offset(10.0, 10.0))
    }

    // -----------------------------------------------------------------------
    // Build
    // -----------------------------------------------------------------------

    #[test]
    fn build_is_idempotent() {
        let mut scene = scene();
        let root = scene.create_root(WidgetProps::new(), Frame::new());
        let added = Rc::new(Cell::new(0));
        let added_c = added.clone();
        scene.signals(root).unwrap().child_added.connect(move |_| added_c.set(added_c.get() + 1));

        let child = scene.create(frame_props(root), Frame::new());
        assert!(scene.children(root).is_empty());
        scene.build(child).unwrap();
        scene.build(child).unwrap();
        assert_eq!(scene.children(root), &[child]);
        assert_eq!(added.get(), 1);
        assert_eq!(scene.depth(child), Some(1));
    }

    #[test]
    fn parentless_build_is_inert() {
        let mut scene = scene();
        let orphan = scene.create(WidgetProps::new(), Frame::new());
        scene.build(orphan).unwrap();
        assert!(!scene.is_built(orphan));
    }

    #[test]
    fn build_requires_built_parent() {
        let mut scene = scene();
        let root = scene.create_root(WidgetProps::new(), Frame::new());
        let parent = scene.create(frame_props(root), Frame::new());
        let child = scene.create(frame_props(parent), Frame::new());
        assert!(matches!(scene.build(child), Err(GuiError::ParentNotBuilt(_))));
        scene.build(parent).unwrap();
        scene.build(child).unwrap();
        assert_eq!(scene.depth(child), Some(2));
    }

    #[test]
    fn sibling_names_must_be_unique() {
        let mut scene = scene();
        let root = scene.create_root(WidgetProps::new(), Frame::new());
        scene.spawn(frame_props(root).with_name("a"), Frame::new()).unwrap();
        let dup = scene.create(frame_props(root).with_name("a"), Frame::new());
        assert!(matches!(scene.build(dup), Err(GuiError::NameCollision(n)) if n == "a"));
        assert_eq!(scene.children(root).len(), 1);
    }

    #[test]
    fn generated_names_are_unique() {
        let mut scene = scene();
        let root = scene.create_root(WidgetProps::new(), Frame::new());
        let a = scene.spawn(frame_props(root), Frame::new()).unwrap();
        let b = scene.spawn(frame_props(root), Frame::new()).unwrap();
        assert_ne!(scene.name(a), scene.name(b));
        assert!(scene.name(a).unwrap().starts_with("Frame"));
    }

    #[test]
    fn children_sorted_by_draw_order() {
        let mut scene = scene();
        let root = scene.create_root(WidgetProps::new(), Frame::new());
        let a = scene.spawn(frame_props(root).with_draw_order(5), Frame::new()).unwrap();
        let b = scene.spawn(frame_props(root).with_draw_order(1), Frame::new()).unwrap();
        let c = scene.spawn(frame_props(root).with_draw_order(5), Frame::new()).unwrap();
        assert_eq!(scene.children(root), &[b, a, c]);
    }

    // -----------------------------------------------------------------------
    // Rename
    // -----------------------------------------------------------------------

    #[test]
    fn rename_updates_lookup_and_rejects_collisions() {
        let mut scene = scene();
        let root = scene.create_root(WidgetProps::new(), Frame::new());
        let a = scene.spawn(frame_props(root).with_name("a"), Frame::new()).unwrap();
        scene.spawn(frame_props(root).with_name("b"), Frame::new()).unwrap();

        scene.set_name(a, "c").unwrap();
        assert_eq!(scene.find_child(root, "c"), Some(a));
        assert_eq!(scene.find_child(root, "a"), None);
        assert!(matches!(scene.set_name(a, "b"), Err(GuiError::NameCollision(_))));
        assert_eq!(scene.name(a), Some("c"));
    }

    // -----------------------------------------------------------------------
    // Destroy
    // -----------------------------------------------------------------------

    #[test]
    fn destroy_removes_subtree_and_fires_signal() {
        let mut scene = scene();
        let root = scene.create_root(WidgetProps::new(), Frame::new());
        let parent = scene.spawn(frame_props(root), Frame::new()).unwrap();
        let child = scene.spawn(frame_props(parent), Frame::new()).unwrap();
        let removed = Rc::new(Cell::new(None));
        let removed_c = removed.clone();
        scene.signals(root).unwrap().child_removed.connect(move |id| removed_c.set(Some(*id)));

        scene.destroy(parent).unwrap();
        assert!(!scene.contains(parent));
        assert!(!scene.contains(child));
        assert!(scene.children(root).is_empty());
        assert_eq!(removed.get(), Some(parent));
    }

    #[test]
    fn destroy_root_unregisters_it() {
        let mut scene = scene();
        let a = scene.create_root(WidgetProps::new(), Frame::new());
        let b = scene.create_root(WidgetProps::new(), Frame::new());
        scene.destroy(a).unwrap();
        assert_eq!(scene.roots(), vec![b]);
    }

    #[test]
    fn unknown_widget_errors() {
        let mut scene = scene();
        let root = scene.create_root(WidgetProps::new(), Frame::new());
        scene.destroy(root).unwrap();
        assert!(matches!(scene.build(root), Err(GuiError::UnknownWidget(_))));
        assert!(matches!(scene.destroy(root), Err(GuiError::UnknownWidget(_))));
    }

    #[test]
    fn ancestors_and_root_of() {
        let mut scene = scene();
        let root = scene.create_root(WidgetProps::new(), Frame::new());
        let a = scene.spawn(frame_props(root), Frame::new()).unwrap();
        let b = scene.spawn(frame_props(a), Frame::new()).unwrap();
        assert_eq!(scene.ancestors(b), vec![a, root]);
        assert_eq!(scene.root_of(b), Some(root));
    }

    #[test]
    fn edit_content_downcasts() {
        let mut scene = scene();
        let root = scene.create_root(WidgetProps::new(), Frame::new());
        let kind = scene.edit_content::<Frame, _>(root, |f| f.widget_type().to_owned()).unwrap();
        assert_eq!(kind, "Frame");
        let wrong = scene.edit_content::<crate::widgets::TextLabel, _>(root, |_| ());
        assert!(matches!(wrong, Err(GuiError::InvalidWidget(_))));
    }
}
