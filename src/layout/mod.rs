//! Layout styles: pluggable policies that position a container's children
//! through property overrides.

pub mod grid;
pub mod list;
pub mod style;

pub use grid::{grid_cells, GridLayout};
pub use list::{flow, ListLayout};
pub use style::{
    sort_children, FillDirection, HorizontalAlignment, LayoutBase, LayoutConfig, LayoutStyle,
    SortOrder, VerticalAlignment,
};
