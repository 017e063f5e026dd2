//! Quadtree over live, movable rectangles.
//!
//! Items are opaque handles (`T: Copy + PartialEq`). The tree never stores an
//! item's geometry: every containment test asks a [`GeometryProvider`] for
//! the item's current position and size, so queries always see the widget
//! where it is now. Structural decisions (which node an item lives in) are
//! made at insert time only; call [`Quadtree::rebuild`] after items move.

use crate::geometry::{Rect, Vec2};

/// Default number of items a node holds before it subdivides.
pub const DEFAULT_CAPACITY: usize = 6;

/// Default depth at which nodes stop subdividing.
pub const DEFAULT_MAX_DEPTH: usize = 10;

// ---------------------------------------------------------------------------
// GeometryProvider
// ---------------------------------------------------------------------------

/// Live geometry accessors for quadtree items.
pub trait GeometryProvider<T> {
    /// Current absolute position of `item`.
    fn position(&self, item: &T) -> Vec2;

    /// Current absolute size of `item`.
    fn size(&self, item: &T) -> Vec2;

    /// Current rect of `item`.
    fn rect(&self, item: &T) -> Rect {
        Rect::from_pos_size(self.position(item), self.size(item))
    }
}

/// A [`GeometryProvider`] built from a pair of closures.
pub struct FnGeometry<P, S> {
    pub position: P,
    pub size: S,
}

impl<T, P, S> GeometryProvider<T> for FnGeometry<P, S>
where
    P: Fn(&T) -> Vec2,
    S: Fn(&T) -> Vec2,
{
    fn position(&self, item: &T) -> Vec2 {
        (self.position)(item)
    }

    fn size(&self, item: &T) -> Vec2 {
        (self.size)(item)
    }
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

struct QuadNode<T> {
    bounds: Rect,
    depth: usize,
    objects: Vec<T>,
    /// Top-left, top-right, bottom-left, bottom-right.
    quadrants: Option<Box<[QuadNode<T>; 4]>>,
}

impl<T: Copy + PartialEq> QuadNode<T> {
    fn new(bounds: Rect, depth: usize) -> Self {
        Self { bounds, depth, objects: Vec::new(), quadrants: None }
    }

    fn subdivide(&mut self) {
        if self.quadrants.is_some() {
            return;
        }
        let depth = self.depth + 1;
        let [tl, tr, bl, br] = self.bounds.quadrants();
        self.quadrants = Some(Box::new([
            QuadNode::new(tl, depth),
            QuadNode::new(tr, depth),
            QuadNode::new(bl, depth),
            QuadNode::new(br, depth),
        ]));
    }

    fn insert(&mut self, item: T, rect: Rect, capacity: usize, max_depth: usize) -> bool {
        if !self.bounds.contains_rect(rect) {
            return false;
        }
        if self.objects.len() < capacity || self.depth >= max_depth {
            self.objects.push(item);
            return true;
        }
        self.subdivide();
        let mut placed = false;
        if let Some(quadrants) = self.quadrants.as_mut() {
            for quadrant in quadrants.iter_mut() {
                placed |= quadrant.insert(item, rect, capacity, max_depth);
            }
        }
        // Straddles a quadrant boundary: keep it here rather than lose it.
        if !placed {
            self.objects.push(item);
        }
        true
    }

    fn query<G: GeometryProvider<T>>(&self, rect: Rect, geometry: &G, out: &mut Vec<T>) {
        if !self.bounds.contains_rect(rect) {
            return;
        }
        out.extend(
            self.objects
                .iter()
                .filter(|item| geometry.rect(item).contains_rect(rect))
                .copied(),
        );
        if let Some(quadrants) = self.quadrants.as_ref() {
            for quadrant in quadrants.iter() {
                quadrant.query(rect, geometry, out);
            }
        }
    }

    fn query_point<G: GeometryProvider<T>>(&self, point: Vec2, geometry: &G, out: &mut Vec<T>) {
        let b = self.bounds;
        if point.x < b.x || point.y < b.y || point.x > b.right() || point.y > b.bottom() {
            return;
        }
        out.extend(
            self.objects
                .iter()
                .filter(|item| geometry.rect(item).contains_point(point))
                .copied(),
        );
        if let Some(quadrants) = self.quadrants.as_ref() {
            for quadrant in quadrants.iter() {
                quadrant.query_point(point, geometry, out);
            }
        }
    }

    fn remove(&mut self, item: T) -> bool {
        let before = self.objects.len();
        self.objects.retain(|o| *o != item);
        let mut removed = self.objects.len() != before;
        if let Some(quadrants) = self.quadrants.as_mut() {
            for quadrant in quadrants.iter_mut() {
                removed |= quadrant.remove(item);
            }
        }
        removed
    }

    fn entry_count(&self) -> usize {
        self.objects.len()
            + self
                .quadrants
                .as_ref()
                .map_or(0, |q| q.iter().map(QuadNode::entry_count).sum())
    }

    fn max_depth(&self) -> usize {
        self.quadrants
            .as_ref()
            .map_or(self.depth, |q| q.iter().map(QuadNode::max_depth).max().unwrap_or(self.depth))
    }
}

// ---------------------------------------------------------------------------
// Quadtree
// ---------------------------------------------------------------------------

/// A 4-way spatial partition used for pointer hit testing.
///
/// An item that fits several quadrants is stored in each of them, so query
/// results may contain duplicates.
pub struct Quadtree<T> {
    root: QuadNode<T>,
    capacity: usize,
    max_depth: usize,
}

impl<T: Copy + PartialEq> Quadtree<T> {
    /// Create an empty tree covering `bounds` with default capacity and depth.
    pub fn new(bounds: Rect) -> Self {
        Self::with_limits(bounds, DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH)
    }

    /// Create an empty tree with explicit subdivision limits.
    pub fn with_limits(bounds: Rect, capacity: usize, max_depth: usize) -> Self {
        Self { root: QuadNode::new(bounds, 0), capacity: capacity.max(1), max_depth }
    }

    /// The root bounds.
    pub fn bounds(&self) -> Rect {
        self.root.bounds
    }

    /// Insert `item` using its current geometry.
    ///
    /// Returns `false` (and stores nothing) when the item's rect is not fully
    /// inside the root bounds.
    pub fn insert<G: GeometryProvider<T>>(&mut self, item: T, geometry: &G) -> bool {
        let rect = geometry.rect(&item);
        self.root.insert(item, rect, self.capacity, self.max_depth)
    }

    /// Every stored item whose current rect contains `rect`.
    pub fn query<G: GeometryProvider<T>>(&self, rect: Rect, geometry: &G) -> Vec<T> {
        let mut out = Vec::new();
        self.root.query(rect, geometry, &mut out);
        out
    }

    /// Every stored item whose current rect contains `point` (left and top
    /// edges inclusive, right and bottom exclusive).
    pub fn query_point<G: GeometryProvider<T>>(&self, point: Vec2, geometry: &G) -> Vec<T> {
        let mut out = Vec::new();
        self.root.query_point(point, geometry, &mut out);
        out
    }

    /// Remove every stored copy of `item`. Returns whether anything was removed.
    pub fn remove(&mut self, item: T) -> bool {
        self.root.remove(item)
    }

    /// Drop all items and quadrants, keeping the bounds.
    pub fn clear(&mut self) {
        self.root = QuadNode::new(self.root.bounds, 0);
    }

    /// Drop everything and cover new bounds.
    pub fn reset(&mut self, bounds: Rect) {
        self.root = QuadNode::new(bounds, 0);
    }

    /// Clear and re-insert `items` at their current geometry.
    pub fn rebuild<G, I>(&mut self, items: I, geometry: &G)
    where
        G: GeometryProvider<T>,
        I: IntoIterator<Item = T>,
    {
        self.clear();
        for item in items {
            self.insert(item, geometry);
        }
    }

    /// Number of stored entries, counting duplicates.
    pub fn entry_count(&self) -> usize {
        self.root.entry_count()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }

    /// Depth of the deepest node.
    pub fn depth(&self) -> usize {
        self.root.max_depth()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
