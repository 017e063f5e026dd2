//! Property access: typed setters, access by name, overrides, change signals.
//!
//! Every write follows the same contract: validate, store, fire the
//! property's change signal, then request a redraw (which does nothing while
//! the widget is unbuilt or a redraw block is held).

use super::{
    OverridableProperty, OverrideValue, PropertyValue, Scene, WidgetId, WidgetNode,
    CORE_PROPERTIES,
};
use crate::error::{GuiError, Result};
use crate::geometry::{Color, UDim2, Vec2};
use crate::reactive::Signal;

impl Scene {
    pub(crate) fn node(&self, id: WidgetId) -> Result<&WidgetNode> {
        self.nodes.get(id).ok_or(GuiError::UnknownWidget(id))
    }

    pub(crate) fn node_mut(&mut self, id: WidgetId) -> Result<&mut WidgetNode> {
        self.nodes.get_mut(id).ok_or(GuiError::UnknownWidget(id))
    }

    // -----------------------------------------------------------------------
    // Change plumbing
    // -----------------------------------------------------------------------

    pub(crate) fn fire_property_changed(&self, id: WidgetId, name: &str, value: PropertyValue) {
        let signal = self
            .nodes
            .get(id)
            .and_then(|n| n.property_signals.get(name).cloned());
        if let Some(signal) = signal {
            signal.fire(&value);
        }
    }

    fn changed(&mut self, id: WidgetId, name: &str, value: PropertyValue) {
        self.fire_property_changed(id, name, value);
        self.request_redraw(id);
    }

    fn geometry_changed(&mut self, id: WidgetId, name: &str, value: PropertyValue) {
        self.mark_spatial_dirty_for(id);
        self.changed(id, name, value);
    }

    /// The change signal for `name`, which must be a core property or one
    /// the widget's content declares.
    pub fn property_changed_signal(&mut self, id: WidgetId, name: &str) -> Result<Signal<PropertyValue>> {
        let node = self.node_mut(id)?;
        let known = CORE_PROPERTIES.contains(&name) || node.content.property_names().contains(&name);
        if !known {
            return Err(GuiError::UnknownProperty(name.to_owned()));
        }
        Ok(node.property_signals.entry(name.to_owned()).or_default().clone())
    }

    /// Whether `name` is readable on this widget.
    pub fn has_property(&self, id: WidgetId, name: &str) -> bool {
        CORE_PROPERTIES.contains(&name)
            || self
                .nodes
                .get(id)
                .is_some_and(|n| n.content.property_names().contains(&name))
    }

    // -----------------------------------------------------------------------
    // Access by name
    // -----------------------------------------------------------------------

    /// Read any property by name.
    pub fn property(&self, id: WidgetId, name: &str) -> Result<PropertyValue> {
        let node = self.node(id)?;
        let value = match name {
            "name" => PropertyValue::Text(node.name.clone()),
            "visible" => PropertyValue::Bool(node.visible),
            "draw_order" => PropertyValue::Int(node.draw_order),
            "layout_order" => PropertyValue::Int(node.layout_order),
            "background_color" => PropertyValue::Color(node.background_color),
            "background_transparency" => PropertyValue::Float(node.background_transparency),
            "border_color" => PropertyValue::Color(node.border_color),
            "border_size" => PropertyValue::Int(node.border_size),
            "position" => PropertyValue::UDim2(node.position.get()),
            "size" => PropertyValue::UDim2(node.size.get()),
            "anchor_point" => PropertyValue::Vec2(node.anchor_point.get()),
            _ => node
                .content
                .property(name)
                .ok_or_else(|| GuiError::UnknownProperty(name.to_owned()))?,
        };
        Ok(value)
    }

    /// Write any property by name. Type mismatches fail without mutating.
    pub fn set_property(&mut self, id: WidgetId, name: &str, value: PropertyValue) -> Result<()> {
        match name {
            "name" => self.set_name(id, value.into_text(name)?),
            "visible" => self.set_visible(id, value.into_bool(name)?),
            "draw_order" => self.set_draw_order(id, value.into_int(name)?),
            "layout_order" => self.set_layout_order(id, value.into_int(name)?),
            "background_color" => self.set_background_color(id, value.into_color(name)?),
            "background_transparency" => {
                self.set_background_transparency(id, value.into_number(name)?)
            }
            "border_color" => self.set_border_color(id, value.into_color(name)?),
            "border_size" => self.set_border_size(id, value.into_int(name)?),
            "position" => self.set_position(id, value.into_udim2(name)?),
            "size" => self.set_size(id, value.into_udim2(name)?),
            "anchor_point" => self.set_anchor_point(id, value.into_vec2(name)?),
            _ => self.set_content_property(id, name, value),
        }
    }

    fn set_content_property(&mut self, id: WidgetId, name: &str, value: PropertyValue) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(GuiError::UnknownWidget(id))?;
        node.content.set_property(name, value)?;
        node.content.refresh(self.measurer.as_ref());
        let current = node.content.property(name);
        if let Some(current) = current {
            self.fire_property_changed(id, name, current);
        }
        self.request_redraw(id);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Typed access
    // -----------------------------------------------------------------------

    /// Effective position (override if present, else base).
    pub fn position(&self, id: WidgetId) -> Result<UDim2> {
        Ok(self.node(id)?.position.get())
    }

    /// Position as set by the user, ignoring any override.
    pub fn base_position(&self, id: WidgetId) -> Result<UDim2> {
        Ok(self.node(id)?.position.base())
    }

    pub fn set_position(&mut self, id: WidgetId, value: UDim2) -> Result<()> {
        let node = self.node_mut(id)?;
        node.position.set_base(value);
        let effective = node.position.get();
        self.geometry_changed(id, "position", PropertyValue::UDim2(effective));
        Ok(())
    }

    /// Effective size.
    pub fn size(&self, id: WidgetId) -> Result<UDim2> {
        Ok(self.node(id)?.size.get())
    }

    pub fn set_size(&mut self, id: WidgetId, value: UDim2) -> Result<()> {
        let node = self.node_mut(id)?;
        node.size.set_base(value);
        let effective = node.size.get();
        self.geometry_changed(id, "size", PropertyValue::UDim2(effective));
        Ok(())
    }

    /// Effective anchor point.
    pub fn anchor_point(&self, id: WidgetId) -> Result<Vec2> {
        Ok(self.node(id)?.anchor_point.get())
    }

    pub fn set_anchor_point(&mut self, id: WidgetId, value: Vec2) -> Result<()> {
        let node = self.node_mut(id)?;
        node.anchor_point.set_base(value);
        let effective = node.anchor_point.get();
        self.geometry_changed(id, "anchor_point", PropertyValue::Vec2(effective));
        Ok(())
    }

    pub fn visible(&self, id: WidgetId) -> Result<bool> {
        Ok(self.node(id)?.visible)
    }

    /// Hidden widgets are skipped by drawing and hit testing but still update.
    pub fn set_visible(&mut self, id: WidgetId, visible: bool) -> Result<()> {
        self.node_mut(id)?.visible = visible;
        self.changed(id, "visible", PropertyValue::Bool(visible));
        Ok(())
    }

    pub fn draw_order(&self, id: WidgetId) -> Result<i64> {
        Ok(self.node(id)?.draw_order)
    }

    /// Changing draw order re-sorts the parent's children.
    pub fn set_draw_order(&mut self, id: WidgetId, draw_order: i64) -> Result<()> {
        let node = self.node_mut(id)?;
        node.draw_order = draw_order;
        if let Some(parent) = node.parent.filter(|_| node.built) {
            self.sort_children(parent);
        }
        self.changed(id, "draw_order", PropertyValue::Int(draw_order));
        Ok(())
    }

    pub fn layout_order(&self, id: WidgetId) -> Result<i64> {
        Ok(self.node(id)?.layout_order)
    }

    /// Changing layout order re-runs the parent's layout, if any.
    pub fn set_layout_order(&mut self, id: WidgetId, layout_order: i64) -> Result<()> {
        self.node_mut(id)?.layout_order = layout_order;
        self.fire_property_changed(id, "layout_order", PropertyValue::Int(layout_order));
        self.layout_order_changed(id);
        Ok(())
    }

    pub fn background_color(&self, id: WidgetId) -> Result<Color> {
        Ok(self.node(id)?.background_color)
    }

    pub fn set_background_color(&mut self, id: WidgetId, color: Color) -> Result<()> {
        self.node_mut(id)?.background_color = color;
        self.changed(id, "background_color", PropertyValue::Color(color));
        Ok(())
    }

    pub fn background_transparency(&self, id: WidgetId) -> Result<f64> {
        Ok(self.node(id)?.background_transparency)
    }

    /// Background alpha, clamped to `0..=255`.
    pub fn set_background_transparency(&mut self, id: WidgetId, alpha: f64) -> Result<()> {
        let alpha = alpha.clamp(0.0, 255.0);
        self.node_mut(id)?.background_transparency = alpha;
        self.changed(id, "background_transparency", PropertyValue::Float(alpha));
        Ok(())
    }

    pub fn border_color(&self, id: WidgetId) -> Result<Color> {
        Ok(self.node(id)?.border_color)
    }

    pub fn set_border_color(&mut self, id: WidgetId, color: Color) -> Result<()> {
        self.node_mut(id)?.border_color = color;
        self.changed(id, "border_color", PropertyValue::Color(color));
        Ok(())
    }

    pub fn border_size(&self, id: WidgetId) -> Result<i64> {
        Ok(self.node(id)?.border_size)
    }

    pub fn set_border_size(&mut self, id: WidgetId, size: i64) -> Result<()> {
        let size = size.max(0);
        self.node_mut(id)?.border_size = size;
        self.changed(id, "border_size", PropertyValue::Int(size));
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Overrides
    // -----------------------------------------------------------------------

    /// Layer `value` above the base value of its property.
    pub fn add_override(&mut self, id: WidgetId, value: OverrideValue) -> Result<()> {
        let node = self.node_mut(id)?;
        let effective = match value {
            OverrideValue::Position(v) => {
                node.position.set_override(v);
                PropertyValue::UDim2(v)
            }
            OverrideValue::Size(v) => {
                node.size.set_override(v);
                PropertyValue::UDim2(v)
            }
            OverrideValue::AnchorPoint(v) => {
                node.anchor_point.set_override(v);
                PropertyValue::Vec2(v)
            }
        };
        self.geometry_changed(id, value.property().name(), effective);
        Ok(())
    }

    /// Remove an override, restoring the base value. Fails if none is set.
    pub fn remove_override(&mut self, id: WidgetId, property: OverridableProperty) -> Result<()> {
        let node = self.node_mut(id)?;
        let (removed, effective) = match property {
            OverridableProperty::Position => (
                node.position.clear_override().is_some(),
                PropertyValue::UDim2(node.position.get()),
            ),
            OverridableProperty::Size => (
                node.size.clear_override().is_some(),
                PropertyValue::UDim2(node.size.get()),
            ),
            OverridableProperty::AnchorPoint => (
                node.anchor_point.clear_override().is_some(),
                PropertyValue::Vec2(node.anchor_point.get()),
            ),
        };
        if !removed {
            return Err(GuiError::OverrideMissing { widget: id, property: property.name() });
        }
        self.geometry_changed(id, property.name(), effective);
        Ok(())
    }

    /// Whether an override is installed on `property`.
    pub fn has_override(&self, id: WidgetId, property: OverridableProperty) -> bool {
        self.nodes.get(id).is_some_and(|node| match property {
            OverridableProperty::Position => node.position.override_value().is_some(),
            OverridableProperty::Size => node.size.override_value().is_some(),
            OverridableProperty::AnchorPoint => node.anchor_point.override_value().is_some(),
        })
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::GuiConfig;
    use crate::scene::WidgetProps;
    use crate::testing::{FixedMeasurer, RecordingSurface};
    use crate::widgets::{Frame, TextLabel};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn scene_with_root() -> (Scene, WidgetId) {
        let mut scene = Scene::new(
            &GuiConfig::default(),
            Box::new(RecordingSurface::new()),
            Box::new(FixedMeasurer::default()),
        );
        let root = scene.create_root(
            WidgetProps::new().with_size(UDim2::from_scale(1.0, 1.0)),
            Frame::new(),
        );
        (scene, root)
    }

    // ── Overrides ────────────────────────────────────────────────────

    #[test]
    fn override_round_trip_restores_base() {
        let (mut scene, root) = scene_with_root();
        let base = UDim2::new(0.25, 3.0, 0.5, -7.0);
        let id = scene
            .spawn(WidgetProps::child_of(root).with_position(base), Frame::new())
            .unwrap();

        scene.add_override(id, OverrideValue::Position(UDim2::ZERO)).unwrap();
        assert_eq!(scene.position(id).unwrap(), UDim2::ZERO);
        assert_eq!(scene.base_position(id).unwrap(), base);

        scene.remove_override(id, OverridableProperty::Position).unwrap();
        assert_eq!(scene.position(id).unwrap(), base);
        assert!(!scene.has_override(id, OverridableProperty::Position));
    }

    #[test]
    fn removing_missing_override_errors() {
        let (mut scene, root) = scene_with_root();
        let err = scene.remove_override(root, OverridableProperty::AnchorPoint).unwrap_err();
        assert!(matches!(err, GuiError::OverrideMissing { property: "anchor_point", .. }));
    }

    #[test]
    fn base_writes_under_override_are_kept() {
        let (mut scene, root) = scene_with_root();
        scene.add_override(root, OverrideValue::Size(UDim2::from_offset(1.0, 1.0))).unwrap();
        scene.set_size(root, UDim2::from_offset(50.0, 50.0)).unwrap();
        assert_eq!(scene.size(root).unwrap(), UDim2::from_offset(1.0, 1.0));
        scene.remove_override(root, OverridableProperty::Size).unwrap();
        assert_eq!(scene.size(root).unwrap(), UDim2::from_offset(50.0, 50.0));
    }

    // ── By name ──────────────────────────────────────────────────────

    #[test]
    fn property_by_name_round_trip() {
        let (mut scene, root) = scene_with_root();
        scene.set_property(root, "border_size", PropertyValue::Int(3)).unwrap();
        scene
            .set_property(root, "background_color", PropertyValue::Color(Color::WHITE))
            .unwrap();
        assert_eq!(scene.property(root, "border_size").unwrap(), PropertyValue::Int(3));
        assert_eq!(
            scene.property(root, "background_color").unwrap(),
            PropertyValue::Color(Color::WHITE)
        );
    }

    #[test]
    fn type_mismatch_leaves_value_untouched() {
        let (mut scene, root) = scene_with_root();
        let before = scene.size(root).unwrap();
        let err = scene.set_property(root, "size", PropertyValue::Float(1.0)).unwrap_err();
        assert!(matches!(err, GuiError::PropertyType { .. }));
        assert_eq!(scene.size(root).unwrap(), before);
    }

    #[test]
    fn unknown_property_errors() {
        let (mut scene, root) = scene_with_root();
        assert!(matches!(scene.property(root, "nope"), Err(GuiError::UnknownProperty(_))));
        assert!(matches!(
            scene.set_property(root, "nope", PropertyValue::Bool(true)),
            Err(GuiError::UnknownProperty(_))
        ));
        assert!(matches!(
            scene.property_changed_signal(root, "nope"),
            Err(GuiError::UnknownProperty(_))
        ));
    }

    #[test]
    fn content_properties_are_reachable() {
        let (mut scene, root) = scene_with_root();
        let label = scene
            .spawn(WidgetProps::child_of(root), TextLabel::new("hi"))
            .unwrap();
        assert!(scene.has_property(label, "text"));
        scene.set_property(label, "text", "bye".into()).unwrap();
        assert_eq!(scene.property(label, "text").unwrap(), PropertyValue::Text("bye".into()));
    }

    // ── Signals ──────────────────────────────────────────────────────

    #[test]
    fn change_signal_fires_with_effective_value() {
        let (mut scene, root) = scene_with_root();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_c = seen.clone();
        scene
            .property_changed_signal(root, "position")
            .unwrap()
            .connect(move |v| seen_c.borrow_mut().push(v.clone()));

        scene.set_position(root, UDim2::from_offset(1.0, 2.0)).unwrap();
        scene.add_override(root, OverrideValue::Position(UDim2::ZERO)).unwrap();
        scene.remove_override(root, OverridableProperty::Position).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                PropertyValue::UDim2(UDim2::from_offset(1.0, 2.0)),
                PropertyValue::UDim2(UDim2::ZERO),
                PropertyValue::UDim2(UDim2::from_offset(1.0, 2.0)),
            ]
        );
    }

    #[test]
    fn transparency_is_clamped() {
        let (mut scene, root) = scene_with_root();
        scene.set_background_transparency(root, 400.0).unwrap();
        assert_eq!(scene.background_transparency(root).unwrap(), 255.0);
        scene.set_border_size(root, -2).unwrap();
        assert_eq!(scene.border_size(root).unwrap(), 0);
    }

    #[test]
    fn draw_order_change_resorts_siblings() {
        let (mut scene, root) = scene_with_root();
        let a = scene.spawn(WidgetProps::child_of(root), Frame::new()).unwrap();
        let b = scene.spawn(WidgetProps::child_of(root), Frame::new()).unwrap();
        assert_eq!(scene.children(root), &[a, b]);
        scene.set_draw_order(a, 10).unwrap();
        assert_eq!(scene.children(root), &[b, a]);
    }
}
