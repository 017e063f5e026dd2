//! Input event types fed to the frame loop by the host.
//!
//! Defines [`InputEvent`], [`KeyEvent`], [`MouseEvent`] and supporting types.
//! With the `crossterm` feature, crossterm events convert via `TryFrom` impls
//! so the rest of the crate never depends on a particular event pump.

use std::ops::BitOr;

use crate::geometry::Vec2;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// A key the action service and the text box can match on. Anything else the
/// host reports is dropped before it reaches the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A key that produces a character.
    Char(char),
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Held modifier keys, as a bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(1 << 1);
    pub const ALT: Modifiers = Modifiers(1 << 2);

    pub fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether a character typed with these modifiers is text. Shift alone
    /// still types; a held Ctrl or Alt makes it a shortcut.
    pub fn types_text(self) -> bool {
        !self.contains(Modifiers::CTRL) && !self.contains(Modifiers::ALT)
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A keyboard event with key and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event.
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }
}

// ---------------------------------------------------------------------------
// MouseButton / MouseAction / MouseEvent
// ---------------------------------------------------------------------------

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Mouse action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    Down(MouseButton),
    Up(MouseButton),
    Drag(MouseButton),
    Moved,
    ScrollUp,
    ScrollDown,
}

/// A mouse event with action, pointer position in pixels, and modifiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseAction,
    pub x: f32,
    pub y: f32,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// Pointer position as a vector.
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Payload of the per-widget pointer signals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Vec2,
    /// Set for button down/up signals.
    pub button: Option<MouseButton>,
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// The event-type code actions match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    KeyUp,
    TextInput,
    MouseMotion,
    MouseButtonDown,
    MouseButtonUp,
    MouseWheel,
    Resize,
    WindowFocus,
    Quit,
}

/// Top-level input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
    Mouse(MouseEvent),
    /// Committed text that did not come from a single key (e.g. a paste).
    TextInput(String),
    Resize { width: u32, height: u32 },
    WindowFocus(bool),
    Quit,
}

impl InputEvent {
    /// Key press without modifiers.
    pub fn key_down(code: Key) -> Self {
        InputEvent::KeyDown(KeyEvent::new(code, Modifiers::NONE))
    }

    /// Key release without modifiers.
    pub fn key_up(code: Key) -> Self {
        InputEvent::KeyUp(KeyEvent::new(code, Modifiers::NONE))
    }

    /// Pointer motion to `(x, y)`.
    pub fn mouse_move(x: f32, y: f32) -> Self {
        Self::mouse(MouseAction::Moved, x, y)
    }

    /// Button press at `(x, y)`.
    pub fn mouse_down(button: MouseButton, x: f32, y: f32) -> Self {
        Self::mouse(MouseAction::Down(button), x, y)
    }

    /// Button release at `(x, y)`.
    pub fn mouse_up(button: MouseButton, x: f32, y: f32) -> Self {
        Self::mouse(MouseAction::Up(button), x, y)
    }

    fn mouse(kind: MouseAction, x: f32, y: f32) -> Self {
        InputEvent::Mouse(MouseEvent { kind, x, y, modifiers: Modifiers::NONE })
    }

    /// The event-type code.
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::KeyDown(_) => EventKind::KeyDown,
            InputEvent::KeyUp(_) => EventKind::KeyUp,
            InputEvent::Mouse(me) => match me.kind {
                MouseAction::Down(_) => EventKind::MouseButtonDown,
                MouseAction::Up(_) => EventKind::MouseButtonUp,
                MouseAction::Drag(_) | MouseAction::Moved => EventKind::MouseMotion,
                MouseAction::ScrollUp | MouseAction::ScrollDown => EventKind::MouseWheel,
            },
            InputEvent::TextInput(_) => EventKind::TextInput,
            InputEvent::Resize { .. } => EventKind::Resize,
            InputEvent::WindowFocus(_) => EventKind::WindowFocus,
            InputEvent::Quit => EventKind::Quit,
        }
    }

    /// The key code, for keyboard events.
    pub fn key(&self) -> Option<Key> {
        match self {
            InputEvent::KeyDown(ke) | InputEvent::KeyUp(ke) => Some(ke.code),
            _ => None,
        }
    }

    /// The pointer position, for mouse events.
    pub fn position(&self) -> Option<Vec2> {
        match self {
            InputEvent::Mouse(me) => Some(me.position()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// From<crossterm> conversions
// ---------------------------------------------------------------------------

#[cfg(feature = "crossterm")]
mod crossterm_impls {
    use super::*;

    /// Convert crossterm key modifiers to our `Modifiers`.
    fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
        let mut out = Modifiers::NONE;
        if m.contains(crossterm::event::KeyModifiers::SHIFT) {
            out = out | Modifiers::SHIFT;
        }
        if m.contains(crossterm::event::KeyModifiers::CONTROL) {
            out = out | Modifiers::CTRL;
        }
        if m.contains(crossterm::event::KeyModifiers::ALT) {
            out = out | Modifiers::ALT;
        }
        out
    }

    fn convert_key(code: crossterm::event::KeyCode) -> Option<Key> {
        use crossterm::event::KeyCode;
        let key = match code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Tab => Key::Tab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            _ => return None,
        };
        Some(key)
    }

    impl TryFrom<crossterm::event::KeyEvent> for KeyEvent {
        type Error = crossterm::event::KeyCode;

        /// Fails with the key code when it has no [`Key`] counterpart.
        fn try_from(ct: crossterm::event::KeyEvent) -> Result<Self, Self::Error> {
            let code = convert_key(ct.code).ok_or(ct.code)?;
            Ok(KeyEvent { code, modifiers: convert_modifiers(ct.modifiers) })
        }
    }

    fn convert_mouse_button(b: crossterm::event::MouseButton) -> MouseButton {
        match b {
            crossterm::event::MouseButton::Left => MouseButton::Left,
            crossterm::event::MouseButton::Right => MouseButton::Right,
            crossterm::event::MouseButton::Middle => MouseButton::Middle,
        }
    }

    impl TryFrom<crossterm::event::Event> for InputEvent {
        type Error = crossterm::event::Event;

        /// Fails with the original event when it carries a key the crate has
        /// no [`Key`] for.
        fn try_from(ct: crossterm::event::Event) -> Result<Self, Self::Error> {
            use crossterm::event::{Event, KeyEventKind, MouseEventKind};
            let event = match ct {
                Event::Key(ke) => {
                    let Ok(key) = KeyEvent::try_from(ke) else {
                        return Err(Event::Key(ke));
                    };
                    if ke.kind == KeyEventKind::Release {
                        InputEvent::KeyUp(key)
                    } else {
                        InputEvent::KeyDown(key)
                    }
                }
                Event::Mouse(me) => {
                    let kind = match me.kind {
                        MouseEventKind::Down(b) => MouseAction::Down(convert_mouse_button(b)),
                        MouseEventKind::Up(b) => MouseAction::Up(convert_mouse_button(b)),
                        MouseEventKind::Drag(b) => MouseAction::Drag(convert_mouse_button(b)),
                        MouseEventKind::Moved => MouseAction::Moved,
                        MouseEventKind::ScrollUp => MouseAction::ScrollUp,
                        // Horizontal scrolling folds into ScrollDown.
                        _ => MouseAction::ScrollDown,
                    };
                    InputEvent::Mouse(MouseEvent {
                        kind,
                        x: f32::from(me.column),
                        y: f32::from(me.row),
                        modifiers: convert_modifiers(me.modifiers),
                    })
                }
                Event::Resize(w, h) => InputEvent::Resize { width: u32::from(w), height: u32::from(h) },
                Event::FocusGained => InputEvent::WindowFocus(true),
                Event::FocusLost => InputEvent::WindowFocus(false),
                Event::Paste(s) => InputEvent::TextInput(s),
            };
            Ok(event)
        }
    }

}

// ===========================================================================
// Tests
// ===========================================================================
