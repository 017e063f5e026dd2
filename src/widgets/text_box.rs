//! Editable text box.
//!
//! Shows its placeholder while unfocused and empty. A pointer press captures
//! focus; while focused, internal actions installed on the
//! [`ActionService`] handle editing keys ahead of every user binding.
//!
//! The cursor is a byte offset into the text and always sits on a char
//! boundary.

use std::any::Any;

use super::text_label::{TextContent, TEXT_PROPERTIES};
use crate::error::{GuiError, Result};
use crate::event::{ActionResult, ActionService, EventKind, InputEvent, Key, Trigger};
use crate::geometry::{Color, Rect};
use crate::reactive::Signal;
use crate::render::{Font, TextMeasurer};
use crate::scene::{PropertyValue, Scene, WidgetId};
use crate::widget::{DrawContext, Focusable, TextRenderable, Widget};

pub const TEXT_BOX_PROPERTIES: &[&str] = &[
    "text",
    "text_color",
    "text_transparency",
    "text_size",
    "font",
    "text_x_alignment",
    "text_y_alignment",
    "text_border_color",
    "text_border_size",
    "placeholder_text",
    "placeholder_text_color",
    "placeholder_text_transparency",
    "placeholder_font",
    "text_editable",
    "clear_text_on_focus_lost",
    "cursor_position",
    "selection_start",
    "selection_end",
];

/// Names of the internal actions a focused text box installs.
pub const EDITING_ACTIONS: &[&str] = &[
    "text_box_backspace",
    "text_box_return",
    "text_box_left",
    "text_box_right",
    "text_box_up",
    "text_box_down",
    "text_box_input",
];

// ---------------------------------------------------------------------------
// TextBox
// ---------------------------------------------------------------------------

pub struct TextBox {
    content: TextContent,
    placeholder: TextContent,
    placeholder_font_set: bool,
    editable: bool,
    clear_on_focus_lost: bool,
    cursor: usize,
    selection: (usize, usize),
    focused: bool,
    focus_gained: Signal<()>,
    focus_lost: Signal<bool>,
}

impl TextBox {
    pub fn new() -> Self {
        let mut placeholder = TextContent::new("TextBox");
        placeholder.text_color = Color::rgb(255, 0, 0);
        Self {
            content: TextContent::new(""),
            placeholder,
            placeholder_font_set: false,
            editable: true,
            clear_on_focus_lost: false,
            cursor: 0,
            selection: (0, 0),
            focused: false,
            focus_gained: Signal::new(),
            focus_lost: Signal::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder.text = text.into();
        self
    }

    pub fn with_placeholder_color(mut self, color: Color) -> Self {
        self.placeholder.text_color = color;
        self
    }

    /// Placeholder font. Defaults to the italic variant of the text font.
    pub fn with_placeholder_font(mut self, font: Font) -> Self {
        self.placeholder.font = font;
        self.placeholder_font_set = true;
        self
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.content.text_color = color;
        self
    }

    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn with_clear_on_focus_lost(mut self, clear: bool) -> Self {
        self.clear_on_focus_lost = clear;
        self
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn text(&self) -> &str {
        &self.content.text
    }

    /// Replace the text, moving the cursor to the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content.text = text.into();
        self.cursor = self.content.text.len();
    }

    pub fn placeholder_text(&self) -> &str {
        &self.placeholder.text
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// Selected byte range; empty when start equals end.
    pub fn selection(&self) -> (usize, usize) {
        self.selection
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Whether the placeholder is what gets drawn.
    pub fn showing_placeholder(&self) -> bool {
        !self.focused && self.content.text.is_empty()
    }

    /// Fires when the box captures focus.
    pub fn focus_gained_signal(&self) -> &Signal<()> {
        &self.focus_gained
    }

    /// Fires when the box releases focus, with whether Enter caused it.
    pub fn focus_lost_signal(&self) -> &Signal<bool> {
        &self.focus_lost
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Insert `s` at the cursor and move the cursor past it.
    pub fn insert_str(&mut self, s: &str) {
        self.content.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    /// Delete the character before the cursor. Returns whether anything
    /// was removed.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = self.prev_char_boundary();
        self.content.text.drain(prev..self.cursor);
        self.cursor = prev;
        true
    }

    /// Append a newline when the cursor is at the end; otherwise leave the
    /// text alone. Returns whether the text changed.
    pub fn enter(&mut self) -> bool {
        if self.cursor != self.content.text.len() {
            return false;
        }
        self.content.text.push('\n');
        self.cursor += 1;
        true
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_char_boundary();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.content.text.len() {
            self.cursor = self.next_char_boundary();
        }
    }

    /// Pull the cursor and selection back inside the text, onto char
    /// boundaries. The text can change under them through
    /// [`TextRenderable::text_content_mut`].
    fn clamp_cursor(&mut self) {
        let text = &self.content.text;
        let clamp = |pos: usize| {
            let mut pos = pos.min(text.len());
            while !text.is_char_boundary(pos) {
                pos -= 1;
            }
            pos
        };
        self.cursor = clamp(self.cursor);
        self.selection = (clamp(self.selection.0), clamp(self.selection.1));
    }

    fn prev_char_boundary(&self) -> usize {
        let mut pos = self.cursor.saturating_sub(1);
        while pos > 0 && !self.content.text.is_char_boundary(pos) {
            pos -= 1;
        }
        pos
    }

    fn next_char_boundary(&self) -> usize {
        let mut pos = self.cursor + 1;
        while pos < self.content.text.len() && !self.content.text.is_char_boundary(pos) {
            pos += 1;
        }
        pos
    }

    fn draw_cursor(&self, ctx: &mut DrawContext<'_>) {
        let Some(before) = self.content.text.get(..self.cursor) else {
            return;
        };
        let line = before.matches('\n').count();
        let column_text = before.rsplit('\n').next().unwrap_or("");
        let Some(origin) = self.content.line_positions(ctx.rect).get(line).copied() else {
            return;
        };
        let x = origin.x + ctx.measurer.measure(column_text, &self.content.font).x;
        let caret = Rect::new(x, origin.y, 1.0, self.content.line_height());
        ctx.surface.fill_rect(caret, self.content.text_color);
    }
}

impl Default for TextBox {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TextBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextBox")
            .field("text", &self.content.text)
            .field("placeholder", &self.placeholder.text)
            .field("cursor", &self.cursor)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

impl Widget for TextBox {
    fn widget_type(&self) -> &str {
        "TextBox"
    }

    fn property_names(&self) -> &'static [&'static str] {
        TEXT_BOX_PROPERTIES
    }

    fn property(&self, name: &str) -> Option<PropertyValue> {
        let value = match name {
            "placeholder_text" => PropertyValue::Text(self.placeholder.text.clone()),
            "placeholder_text_color" => PropertyValue::Color(self.placeholder.text_color),
            "placeholder_text_transparency" => PropertyValue::Float(self.placeholder.text_transparency),
            "placeholder_font" => PropertyValue::Font(self.placeholder.font.clone()),
            "text_editable" => PropertyValue::Bool(self.editable),
            "clear_text_on_focus_lost" => PropertyValue::Bool(self.clear_on_focus_lost),
            "cursor_position" => PropertyValue::Int(self.cursor as i64),
            "selection_start" => PropertyValue::Int(self.selection.0 as i64),
            "selection_end" => PropertyValue::Int(self.selection.1 as i64),
            _ => return self.content.property(name),
        };
        Some(value)
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<()> {
        match name {
            "placeholder_text" => self.placeholder.text = value.into_text(name)?,
            "placeholder_text_color" => self.placeholder.text_color = value.into_color(name)?,
            "placeholder_text_transparency" => {
                self.placeholder.text_transparency = value.into_number(name)?.clamp(0.0, 255.0)
            }
            "placeholder_font" => {
                self.placeholder.font = value.into_font(name)?;
                self.placeholder_font_set = true;
            }
            "text_editable" => self.editable = value.into_bool(name)?,
            "clear_text_on_focus_lost" => self.clear_on_focus_lost = value.into_bool(name)?,
            "cursor_position" | "selection_start" | "selection_end" => {
                return Err(GuiError::ReadOnlyProperty(name.to_owned()))
            }
            "text" => self.set_text(value.into_text(name)?),
            _ if TEXT_PROPERTIES.contains(&name) => self.content.set_property(name, value)?,
            _ => return Err(GuiError::UnknownProperty(name.to_owned())),
        }
        Ok(())
    }

    fn refresh(&mut self, measurer: &dyn TextMeasurer) {
        if !self.placeholder_font_set {
            self.placeholder.font = self.content.font.clone().italic();
        }
        self.placeholder.text_x_alignment = self.content.text_x_alignment;
        self.placeholder.text_y_alignment = self.content.text_y_alignment;
        self.clamp_cursor();
        self.content.measure(measurer);
        self.placeholder.measure(measurer);
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) {
        if self.showing_placeholder() {
            self.placeholder.draw(ctx);
            return;
        }
        self.content.draw(ctx);
        if self.focused {
            self.draw_cursor(ctx);
        }
    }

    fn as_text(&self) -> Option<&dyn TextRenderable> {
        Some(self)
    }

    fn as_text_mut(&mut self) -> Option<&mut dyn TextRenderable> {
        Some(self)
    }

    fn as_focusable(&self) -> Option<&dyn Focusable> {
        Some(self)
    }

    fn as_focusable_mut(&mut self) -> Option<&mut dyn Focusable> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl TextRenderable for TextBox {
    fn text_content(&self) -> &TextContent {
        &self.content
    }

    fn text_content_mut(&mut self) -> &mut TextContent {
        &mut self.content
    }
}

impl Focusable for TextBox {
    fn is_focused(&self) -> bool {
        self.focused
    }

    fn accepts_focus(&self) -> bool {
        self.editable && !self.focused
    }

    fn focus_gained(&mut self) {
        self.focused = true;
        self.cursor = self.content.text.len();
        self.focus_gained.fire(&());
    }

    fn focus_lost(&mut self, enter_pressed: bool) {
        self.focused = false;
        if self.clear_on_focus_lost {
            self.content.text.clear();
        }
        self.cursor = 0;
        self.focus_lost.fire(&enter_pressed);
    }
}

// ---------------------------------------------------------------------------
// Editing actions
// ---------------------------------------------------------------------------

fn edit(scene: &mut Scene, id: WidgetId, f: impl FnOnce(&mut TextBox) -> bool) -> Result<ActionResult> {
    let (changed, text) = scene.edit_content::<TextBox, _>(id, |tb| (f(tb), tb.text().to_owned()))?;
    if changed {
        scene.fire_property_changed(id, "text", PropertyValue::Text(text));
    }
    Ok(ActionResult::Sink)
}

fn key_down(event: &InputEvent) -> bool {
    event.kind() == EventKind::KeyDown
}

/// Install the internal actions that edit text box `id` while it has focus.
pub fn install_editing_actions(actions: &mut ActionService, id: WidgetId) -> Result<()> {
    actions.bind_internal("text_box_backspace", [Trigger::Key(Key::Backspace)], 0, move |event, scene| {
        if !key_down(event) {
            return Ok(ActionResult::Pass);
        }
        edit(scene, id, TextBox::backspace)
    })?;
    actions.bind_internal("text_box_return", [Trigger::Key(Key::Enter)], 0, move |event, scene| {
        if !key_down(event) {
            return Ok(ActionResult::Pass);
        }
        edit(scene, id, TextBox::enter)
    })?;
    actions.bind_internal("text_box_left", [Trigger::Key(Key::Left)], 0, move |event, scene| {
        if !key_down(event) {
            return Ok(ActionResult::Pass);
        }
        edit(scene, id, |tb| {
            tb.move_cursor_left();
            false
        })
    })?;
    actions.bind_internal("text_box_right", [Trigger::Key(Key::Right)], 0, move |event, scene| {
        if !key_down(event) {
            return Ok(ActionResult::Pass);
        }
        edit(scene, id, |tb| {
            tb.move_cursor_right();
            false
        })
    })?;
    // Vertical movement is swallowed so it cannot leak to user bindings.
    actions.bind_internal("text_box_up", [Trigger::Key(Key::Up)], 0, |_, _| Ok(ActionResult::Sink))?;
    actions.bind_internal("text_box_down", [Trigger::Key(Key::Down)], 0, |_, _| Ok(ActionResult::Sink))?;
    actions.bind_internal(
        "text_box_input",
        [Trigger::Kind(EventKind::KeyDown), Trigger::Kind(EventKind::TextInput)],
        10,
        move |event, scene| match event {
            InputEvent::KeyDown(ke) => match ke.code {
                Key::Char(c) if ke.modifiers.types_text() => {
                    edit(scene, id, |tb| {
                        tb.insert_str(c.encode_utf8(&mut [0; 4]));
                        true
                    })
                }
                _ => Ok(ActionResult::Pass),
            },
            InputEvent::TextInput(s) => edit(scene, id, |tb| {
                tb.insert_str(s);
                !s.is_empty()
            }),
            _ => Ok(ActionResult::Pass),
        },
    )?;
    tracing::debug!(?id, "text box editing actions installed");
    Ok(())
}

/// Remove the actions [`install_editing_actions`] added.
pub fn remove_editing_actions(actions: &mut ActionService) {
    for name in EDITING_ACTIONS {
        actions.unbind(name);
    }
}
