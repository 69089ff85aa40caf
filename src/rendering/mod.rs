//! Grid rendering: sparse records to dense grid, grid to fragment tree,
//! fragment tree to HTML, and post-processing of the captured raster.

pub mod grid;
pub mod layout;
pub mod markup;
pub mod raster;

pub use grid::{resolve, CellRecord, DenseGrid, DESTINATION_KIND};
pub use layout::{compose, CellContent, CellFragment, Destination, DocumentFragment, RowFragment, Schedule};
pub use markup::render_html;
pub use raster::{normalize, normalize_with, NormalizeOptions, NormalizedImage, RasterBuffer};
