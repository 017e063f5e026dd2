//! Error type shared by every subsystem.

use crate::scene::WidgetId;

/// Errors raised by scene, layout, action and tween operations.
#[derive(Debug, thiserror::Error)]
pub enum GuiError {
    #[error("widget {0:?} does not exist")]
    UnknownWidget(WidgetId),
    #[error("unknown property '{0}'")]
    UnknownProperty(String),
    #[error("property '{property}' expects {expected}, found {found}")]
    PropertyType {
        property: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("property '{0}' cannot be interpolated")]
    NotInterpolable(String),
    #[error("property '{0}' is read-only")]
    ReadOnlyProperty(String),
    #[error("widget {0:?} already has a layout applied")]
    LayoutAlreadyApplied(WidgetId),
    #[error("widget {0:?} has no layout applied")]
    NoLayoutApplied(WidgetId),
    #[error("widget {0:?} is not a container")]
    NotAContainer(WidgetId),
    #[error("unsupported alignment: {0}")]
    UnsupportedAlignment(String),
    #[error("an action named '{0}' is already bound")]
    DuplicateAction(String),
    #[error("a sibling named '{0}' already exists")]
    NameCollision(String),
    #[error("no {property} override on widget {widget:?}")]
    OverrideMissing {
        widget: WidgetId,
        property: &'static str,
    },
    #[error("parent of widget {0:?} has not been built")]
    ParentNotBuilt(WidgetId),
    #[error("tween is already playing")]
    TweenAlreadyPlaying,
    #[error("tween does not exist")]
    UnknownTween,
    #[error("invalid widget configuration: {0}")]
    InvalidWidget(String),
    #[error("callback failed: {0}")]
    Callback(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GuiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_interpolate_fields() {
        let err = GuiError::PropertyType {
            property: "size".into(),
            expected: "udim2",
            found: "float",
        };
        assert_eq!(err.to_string(), "property 'size' expects udim2, found float");
        assert_eq!(
            GuiError::DuplicateAction("jump".into()).to_string(),
            "an action named 'jump' is already bound"
        );
    }
}
