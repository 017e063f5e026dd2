//! Core geometry types: Vec2, Rect, UDim, UDim2, Color.
//!
//! `UDim`/`UDim2` are the scale-plus-offset measurement units used for every
//! widget's position and size: the absolute value of a `UDim` is
//! `parent_extent * scale + offset`. `Vec2` and `Rect` hold fully resolved
//! pixel geometry.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

// ---------------------------------------------------------------------------
// Vec2
// ---------------------------------------------------------------------------

/// A 2D vector in pixels (also used for normalized anchor points).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Swap the components.
    #[inline]
    pub const fn transpose(self) -> Vec2 {
        Vec2 { x: self.y, y: self.x }
    }

    /// Component-wise product.
    #[inline]
    pub fn scale(self, other: Vec2) -> Vec2 {
        Vec2 { x: self.x * other.x, y: self.y * other.y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2 { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2 { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2 { x: -self.x, y: -self.y }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2 { x: self.x * rhs, y: self.y * rhs }
    }
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// An axis-aligned rectangle in pixels defined by position and size.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// An empty rect at the origin.
    pub const EMPTY: Rect = Rect { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    /// Create a new rect.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Build a rect from a position and a size.
    #[inline]
    pub const fn from_pos_size(position: Vec2, size: Vec2) -> Self {
        Self { x: position.x, y: position.y, width: size.x, height: size.y }
    }

    /// The right edge (exclusive): `x + width`.
    #[inline]
    pub fn right(self) -> f32 {
        self.x + self.width
    }

    /// The bottom edge (exclusive): `y + height`.
    #[inline]
    pub fn bottom(self) -> f32 {
        self.y + self.height
    }

    /// The top-left corner.
    #[inline]
    pub const fn position(self) -> Vec2 {
        Vec2 { x: self.x, y: self.y }
    }

    /// The dimensions.
    #[inline]
    pub const fn size(self) -> Vec2 {
        Vec2 { x: self.width, y: self.height }
    }

    /// The center point.
    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2 { x: self.x + self.width / 2.0, y: self.y + self.height / 2.0 }
    }

    /// Whether the point lies inside this rect (right/bottom edges exclusive).
    #[inline]
    pub fn contains_point(self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Whether `other` is entirely contained within this rect.
    #[inline]
    pub fn contains_rect(self, other: Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Split into four equal quadrants: top-left, top-right, bottom-left, bottom-right.
    pub fn quadrants(self) -> [Rect; 4] {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        let center = self.center();
        [
            Rect::new(self.x, self.y, half_w, half_h),
            Rect::new(center.x, self.y, half_w, half_h),
            Rect::new(self.x, center.y, half_w, half_h),
            Rect::new(center.x, center.y, half_w, half_h),
        ]
    }
}

// ---------------------------------------------------------------------------
// UDim
// ---------------------------------------------------------------------------

/// A one-dimensional scale-plus-offset measurement.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct UDim {
    pub scale: f32,
    pub offset: f32,
}

impl UDim {
    /// Create a new `UDim`.
    #[inline]
    pub const fn new(scale: f32, offset: f32) -> Self {
        Self { scale, offset }
    }

    /// Resolve against a parent extent: `parent * scale + offset`.
    #[inline]
    pub fn resolve(self, parent: f32) -> f32 {
        parent * self.scale + self.offset
    }

    /// Component-wise floor division.
    pub fn floor_div(self, rhs: UDim) -> UDim {
        UDim {
            scale: (self.scale / rhs.scale).floor(),
            offset: (self.offset / rhs.offset).floor(),
        }
    }
}

impl Add for UDim {
    type Output = UDim;
    fn add(self, rhs: UDim) -> UDim {
        UDim { scale: self.scale + rhs.scale, offset: self.offset + rhs.offset }
    }
}

impl Sub for UDim {
    type Output = UDim;
    fn sub(self, rhs: UDim) -> UDim {
        UDim { scale: self.scale - rhs.scale, offset: self.offset - rhs.offset }
    }
}

impl Mul for UDim {
    type Output = UDim;
    fn mul(self, rhs: UDim) -> UDim {
        UDim { scale: self.scale * rhs.scale, offset: self.offset * rhs.offset }
    }
}

impl Div for UDim {
    type Output = UDim;
    fn div(self, rhs: UDim) -> UDim {
        UDim { scale: self.scale / rhs.scale, offset: self.offset / rhs.offset }
    }
}

impl fmt::Display for UDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UDim({}, {})", self.scale, self.offset)
    }
}

// ---------------------------------------------------------------------------
// UDim2
// ---------------------------------------------------------------------------

/// A two-dimensional scale-plus-offset measurement (one `UDim` per axis).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct UDim2 {
    pub x: UDim,
    pub y: UDim,
}

impl UDim2 {
    /// Zero scale and zero offset on both axes.
    pub const ZERO: UDim2 = UDim2 { x: UDim::new(0.0, 0.0), y: UDim::new(0.0, 0.0) };

    /// Create a new `UDim2` from per-axis scale and offset.
    #[inline]
    pub const fn new(scale_x: f32, offset_x: f32, scale_y: f32, offset_y: f32) -> Self {
        Self { x: UDim::new(scale_x, offset_x), y: UDim::new(scale_y, offset_y) }
    }

    /// Pure scale on both axes.
    #[inline]
    pub const fn from_scale(x: f32, y: f32) -> Self {
        Self::new(x, 0.0, y, 0.0)
    }

    /// Pure pixel offset on both axes.
    #[inline]
    pub const fn from_offset(x: f32, y: f32) -> Self {
        Self::new(0.0, x, 0.0, y)
    }

    /// Resolve against a parent size.
    #[inline]
    pub fn resolve(self, parent: Vec2) -> Vec2 {
        Vec2 { x: self.x.resolve(parent.x), y: self.y.resolve(parent.y) }
    }

    /// Component-wise floor division.
    pub fn floor_div(self, rhs: UDim2) -> UDim2 {
        UDim2 { x: self.x.floor_div(rhs.x), y: self.y.floor_div(rhs.y) }
    }
}

impl Add for UDim2 {
    type Output = UDim2;
    fn add(self, rhs: UDim2) -> UDim2 {
        UDim2 { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for UDim2 {
    type Output = UDim2;
    fn sub(self, rhs: UDim2) -> UDim2 {
        UDim2 { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Mul for UDim2 {
    type Output = UDim2;
    fn mul(self, rhs: UDim2) -> UDim2 {
        UDim2 { x: self.x * rhs.x, y: self.y * rhs.y }
    }
}

impl Div for UDim2 {
    type Output = UDim2;
    fn div(self, rhs: UDim2) -> UDim2 {
        UDim2 { x: self.x / rhs.x, y: self.y / rhs.y }
    }
}

impl fmt::Display for UDim2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UDim2({}, {}, {}, {})",
            self.x.scale, self.x.offset, self.y.scale, self.y.offset
        )
    }
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An 8-bit RGBA color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Create an opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with an explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// The same color with a different alpha.
    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
