pub mod row;
pub mod value;

pub use row::{ConsolidatedRow, PartialRow};
pub use value::{
    clean_cell, parse_cell, parse_date_int, parse_date_text, parse_number, Value,
    SOURCE_DATE_FORMAT,
};
