//! Integration tests for scenegraph-ui.
//!
//! These tests exercise the public API from outside the crate: the pilot
//! drives a headless gui while layouts, tweens, actions and text boxes work
//! together.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use scenegraph_ui::event::{ActionResult, InputEvent, Key, Trigger};
use scenegraph_ui::layout::{GridLayout, HorizontalAlignment, LayoutConfig, ListLayout};
use scenegraph_ui::testing::{render_log, Pilot};
use scenegraph_ui::tween::{Easing, TweenInfo, TweenStatus};
use scenegraph_ui::widgets::{Frame, TextBox, TextLabel};
use scenegraph_ui::{GuiError, PropertyValue, UDim2, Vec2, WidgetId, WidgetProps};

fn pilot_with_root(width: u32, height: u32) -> (Pilot, WidgetId) {
    let mut pilot = Pilot::new(width, height);
    let root = pilot
        .gui_mut()
        .scene_mut()
        .create_root(WidgetProps::new().with_size(UDim2::from_scale(1.0, 1.0)), Frame::new());
    (pilot, root)
}

fn label(pilot: &mut Pilot, parent: WidgetId, text: &str) -> WidgetId {
    pilot
        .gui_mut()
        .scene_mut()
        .spawn(
            WidgetProps::child_of(parent)
                .with_size(UDim2::from_offset(40.0, 20.0))
                .with_background_transparency(0.0),
            TextLabel::new(text),
        )
        .unwrap()
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[test]
fn list_layout_redraws_once_snapshot() {
    let (mut pilot, root) = pilot_with_root(100, 50);
    label(&mut pilot, root, "hi");
    label(&mut pilot, root, "yo");
    pilot.take_commands();

    pilot.gui_mut().scene_mut().apply_layout(root, ListLayout::new()).unwrap();

    insta::assert_snapshot!(render_log(&pilot.take_commands()), @r###"
    clear 0,0 100x50
    fill 0,0 100x50 #8c8c8cff
    text "hi" at 12,2 #ffffffff
    text "yo" at 52,2 #ffffffff
    "###);
}

#[test]
fn list_layout_wraps_and_follows_resize() {
    let (mut pilot, root) = pilot_with_root(100, 50);
    let labels: Vec<_> = ["a", "b", "c"].iter().map(|t| label(&mut pilot, root, t)).collect();
    pilot.gui_mut().scene_mut().apply_layout(root, ListLayout::new()).unwrap();

    let positions = |pilot: &Pilot| -> Vec<Vec2> {
        labels
            .iter()
            .map(|&id| pilot.gui().scene().absolute_position(id).unwrap())
            .collect()
    };
    assert_eq!(
        positions(&pilot),
        vec![Vec2::new(0.0, 0.0), Vec2::new(40.0, 0.0), Vec2::new(0.0, 20.0)]
    );

    pilot.resize(120, 50);
    pilot.tick();
    assert_eq!(
        positions(&pilot),
        vec![Vec2::new(0.0, 0.0), Vec2::new(40.0, 0.0), Vec2::new(80.0, 0.0)]
    );
}

#[test]
fn grid_layout_centers_block() {
    let (mut pilot, root) = pilot_with_root(100, 100);
    let a = label(&mut pilot, root, "a");
    let b = label(&mut pilot, root, "b");
    let grid = GridLayout::new()
        .with_config(LayoutConfig::new().with_horizontal_alignment(HorizontalAlignment::Center))
        .with_cell_size(UDim2::from_offset(30.0, 30.0))
        .with_cell_padding(UDim2::from_offset(10.0, 10.0));
    pilot.gui_mut().scene_mut().apply_layout(root, grid).unwrap();

    let scene = pilot.gui().scene();
    assert_eq!(scene.absolute_rect(a).unwrap().size(), Vec2::new(30.0, 30.0));
    assert_eq!(scene.absolute_position(a).unwrap(), Vec2::new(15.0, 0.0));
    assert_eq!(scene.absolute_position(b).unwrap(), Vec2::new(55.0, 0.0));
}

#[test]
fn layout_on_label_is_rejected() {
    let (mut pilot, root) = pilot_with_root(100, 100);
    let a = label(&mut pilot, root, "a");
    let err = pilot.gui_mut().scene_mut().apply_layout(a, ListLayout::new()).unwrap_err();
    assert!(matches!(err, GuiError::NotAContainer(_)));
}

// ---------------------------------------------------------------------------
// Tweens
// ---------------------------------------------------------------------------

#[test]
fn tween_runs_to_completion_through_frames() {
    let (mut pilot, root) = pilot_with_root(200, 100);
    let a = label(&mut pilot, root, "a");
    let ended = Rc::new(RefCell::new(Vec::new()));

    let gui = pilot.gui_mut();
    let id = gui
        .create_tween(
            a,
            [("position", PropertyValue::UDim2(UDim2::from_offset(100.0, 0.0)))],
            TweenInfo::new(1.0, Easing::Linear),
        )
        .unwrap();
    let ended_c = ended.clone();
    gui.tweens().ended_signal(id).unwrap().connect(move |s| ended_c.borrow_mut().push(*s));
    gui.play_tween(id).unwrap();

    pilot.advance(0.5);
    assert_eq!(pilot.gui().scene().absolute_position(a).unwrap(), Vec2::new(50.0, 0.0));
    pilot.advance(0.6);
    assert_eq!(pilot.gui().scene().absolute_position(a).unwrap(), Vec2::new(100.0, 0.0));
    assert_eq!(*ended.borrow(), vec![TweenStatus::Ended]);
}

#[test]
fn canceled_tween_restores_color() {
    let (mut pilot, root) = pilot_with_root(200, 100);
    let a = label(&mut pilot, root, "a");
    let before = pilot.gui().scene().property(a, "text_color").unwrap();

    let id = pilot
        .gui_mut()
        .create_tween(
            a,
            [("text_color", PropertyValue::Color(scenegraph_ui::Color::BLACK))],
            TweenInfo::new(2.0, Easing::SineInOut),
        )
        .unwrap();
    pilot.gui_mut().play_tween(id).unwrap();
    pilot.advance(1.0);
    assert_ne!(pilot.gui().scene().property(a, "text_color").unwrap(), before);

    pilot.gui_mut().cancel_tween(id).unwrap();
    assert_eq!(pilot.gui().scene().property(a, "text_color").unwrap(), before);
}

// ---------------------------------------------------------------------------
// Actions and text boxes
// ---------------------------------------------------------------------------

#[test]
fn lower_priority_value_sinks_first() {
    let (mut pilot, _root) = pilot_with_root(10, 10);
    let log = Rc::new(RefCell::new(Vec::new()));
    for (name, priority, result) in [("late", 10, ActionResult::Pass), ("early", 5, ActionResult::Sink)] {
        let log = log.clone();
        pilot
            .gui_mut()
            .actions_mut()
            .bind(name, [Trigger::Key(Key::Enter)], priority, move |_, _| {
                log.borrow_mut().push(name);
                Ok(result)
            })
            .unwrap();
    }
    pilot.send(InputEvent::key_down(Key::Enter));
    pilot.tick();
    assert_eq!(*log.borrow(), vec!["early"]);
}

#[test]
fn text_box_editing_session() {
    let (mut pilot, root) = pilot_with_root(200, 100);
    let tb = pilot
        .gui_mut()
        .scene_mut()
        .spawn(
            WidgetProps::child_of(root).with_size(UDim2::from_offset(120.0, 30.0)),
            TextBox::new().with_clear_on_focus_lost(true),
        )
        .unwrap();
    let changes = Rc::new(RefCell::new(Vec::new()));
    let changes_c = changes.clone();
    pilot
        .gui_mut()
        .scene_mut()
        .property_changed_signal(tb, "text")
        .unwrap()
        .connect(move |v| changes_c.borrow_mut().push(v.clone()));

    pilot.click(10.0, 10.0);
    pilot.tick();
    pilot.type_text("ab");
    pilot.press_key(Key::Left);
    pilot.type_text("x");
    pilot.press_key(Key::Enter);
    pilot.tick();
    assert_eq!(pilot.gui().scene().property(tb, "text").unwrap(), PropertyValue::Text("axb".into()));

    pilot.press_key(Key::Right);
    pilot.press_key(Key::Enter);
    pilot.tick();
    assert_eq!(pilot.gui().scene().property(tb, "text").unwrap(), PropertyValue::Text("axb\n".into()));
    assert!(pilot.surface().texts().iter().any(|t| t == "axb"));

    pilot.click(190.0, 90.0);
    pilot.tick();
    assert_eq!(pilot.gui().focused(), None);
    assert_eq!(pilot.gui().scene().property(tb, "text").unwrap(), PropertyValue::Text(String::new()));
    assert_eq!(changes.borrow().last(), Some(&PropertyValue::Text(String::new())));
    assert!(pilot.surface().texts().iter().any(|t| t == "TextBox"));
}
