pub mod extractor;
pub mod navigator;
pub mod selectors;
pub mod wait;

pub use extractor::{extract, map_row, parse_first_row, RawRow};
pub use navigator::Navigator;
