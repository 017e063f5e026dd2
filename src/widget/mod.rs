//! Widget system: content trait, capabilities and hook contexts.

pub mod traits;

pub use traits::{
    Container, DrawContext, DrawerHook, Focusable, TextRenderable, UpdateContext, UpdaterHook,
    Widget,
};
