mod grid;
mod growth;
mod order;
mod rect;

pub use grid::OccupancyGrid;
pub use growth::grow;
pub use order::{packing_order, sorted_indices};
pub use rect::Rect;
