//! Data module - CSV loading, coercion and year selection

mod loader;
mod processor;
mod record;
mod table;

pub use loader::DataLoader;
pub use processor::DataProcessor;
pub use record::Record;
pub use table::GdpTable;
