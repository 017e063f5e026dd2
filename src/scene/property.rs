//! Dynamically typed property values, used for access by name and tweening.

use std::fmt;

use crate::error::{GuiError, Result};
use crate::geometry::{Color, UDim2, Vec2};
use crate::render::{Font, ImageHandle, TextAlign};

/// Names of the properties every widget has, regardless of content.
pub const CORE_PROPERTIES: &[&str] = &[
    "name",
    "visible",
    "draw_order",
    "layout_order",
    "background_color",
    "background_transparency",
    "border_color",
    "border_size",
    "position",
    "size",
    "anchor_point",
];

/// The type of a [`PropertyValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Int,
    Float,
    Bool,
    Color,
    Vec2,
    UDim2,
    Text,
    Font,
    Align,
    Image,
}

impl PropertyKind {
    /// Lowercase name used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            PropertyKind::Int => "int",
            PropertyKind::Float => "float",
            PropertyKind::Bool => "bool",
            PropertyKind::Color => "color",
            PropertyKind::Vec2 => "vec2",
            PropertyKind::UDim2 => "udim2",
            PropertyKind::Text => "text",
            PropertyKind::Font => "font",
            PropertyKind::Align => "align",
            PropertyKind::Image => "image",
        }
    }

    /// Whether a tween can interpolate values of this kind.
    pub const fn is_interpolable(self) -> bool {
        matches!(
            self,
            PropertyKind::Int
                | PropertyKind::Float
                | PropertyKind::Color
                | PropertyKind::Vec2
                | PropertyKind::UDim2
        )
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A property value of any supported type.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Color(Color),
    Vec2(Vec2),
    UDim2(UDim2),
    Text(String),
    Font(Font),
    Align(TextAlign),
    Image(Option<ImageHandle>),
}

macro_rules! accessor {
    ($fn_name:ident, $variant:ident, $ty:ty, $kind:ident) => {
        /// Extract the value, or fail with a type error naming `property`.
        pub fn $fn_name(self, property: &str) -> Result<$ty> {
            match self {
                PropertyValue::$variant(v) => Ok(v),
                other => Err(type_error(property, PropertyKind::$kind, other.kind())),
            }
        }
    };
}

impl PropertyValue {
    /// The type of this value.
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Int(_) => PropertyKind::Int,
            PropertyValue::Float(_) => PropertyKind::Float,
            PropertyValue::Bool(_) => PropertyKind::Bool,
            PropertyValue::Color(_) => PropertyKind::Color,
            PropertyValue::Vec2(_) => PropertyKind::Vec2,
            PropertyValue::UDim2(_) => PropertyKind::UDim2,
            PropertyValue::Text(_) => PropertyKind::Text,
            PropertyValue::Font(_) => PropertyKind::Font,
            PropertyValue::Align(_) => PropertyKind::Align,
            PropertyValue::Image(_) => PropertyKind::Image,
        }
    }

    accessor!(into_int, Int, i64, Int);
    accessor!(into_float, Float, f64, Float);
    accessor!(into_bool, Bool, bool, Bool);
    accessor!(into_color, Color, Color, Color);
    accessor!(into_vec2, Vec2, Vec2, Vec2);
    accessor!(into_udim2, UDim2, UDim2, UDim2);
    accessor!(into_text, Text, String, Text);
    accessor!(into_font, Font, Font, Font);
    accessor!(into_align, Align, TextAlign, Align);
    accessor!(into_image, Image, Option<ImageHandle>, Image);

    /// Accept a float property written as either `Float` or `Int`.
    pub fn into_number(self, property: &str) -> Result<f64> {
        match self {
            PropertyValue::Float(v) => Ok(v),
            PropertyValue::Int(v) => Ok(v as f64),
            other => Err(type_error(property, PropertyKind::Float, other.kind())),
        }
    }
}

/// Build a [`GuiError::PropertyType`].
pub fn type_error(property: &str, expected: PropertyKind, found: PropertyKind) -> GuiError {
    GuiError::PropertyType {
        property: property.to_owned(),
        expected: expected.name(),
        found: found.name(),
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Int(i64::from(v))
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<Color> for PropertyValue {
    fn from(v: Color) -> Self {
        PropertyValue::Color(v)
    }
}

impl From<Vec2> for PropertyValue {
    fn from(v: Vec2) -> Self {
        PropertyValue::Vec2(v)
    }
}

impl From<UDim2> for PropertyValue {
    fn from(v: UDim2) -> Self {
        PropertyValue::UDim2(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Text(v.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Text(v)
    }
}

impl From<Font> for PropertyValue {
    fn from(v: Font) -> Self {
        PropertyValue::Font(v)
    }
}

impl From<TextAlign> for PropertyValue {
    fn from(v: TextAlign) -> Self {
        PropertyValue::Align(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_and_interpolability() {
        assert_eq!(PropertyValue::from(3_i64).kind(), PropertyKind::Int);
        assert_eq!(PropertyValue::from(0.5).kind(), PropertyKind::Float);
        assert!(PropertyKind::UDim2.is_interpolable());
        assert!(PropertyKind::Color.is_interpolable());
        assert!(!PropertyKind::Text.is_interpolable());
        assert!(!PropertyKind::Bool.is_interpolable());
    }

    #[test]
    fn accessor_type_mismatch() {
        let err = PropertyValue::Bool(true).into_udim2("size").unwrap_err();
        assert_eq!(err.to_string(), "property 'size' expects udim2, found bool");
    }

    #[test]
    fn number_accepts_int() {
        assert_eq!(PropertyValue::Int(4).into_number("x").unwrap(), 4.0);
        assert!(PropertyValue::Text("4".into()).into_number("x").is_err());
    }
}
