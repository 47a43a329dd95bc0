pub mod registry;
pub mod types;

pub use registry::{
    column, columns, columns_for, currency, source, CURRENCIES, DATA_FREQUENCY, DATA_SOURCE_NAME,
    SETTLEMENTS, SOURCES, TRADE_DATE_COLUMN,
};
pub use types::{ColumnSpec, Facet, FilterChoice, Settlement, Source, ValueType};
