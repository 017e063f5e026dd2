//! Spatial indexing for hit testing.

pub mod quadtree;

pub use quadtree::{FnGeometry, GeometryProvider, Quadtree};
