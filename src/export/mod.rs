//! Output formats for extracted records.
//!
//! - **xlsx**: header row of field names plus one row per record; batches
//!   keep a row with a status for every document
//! - **json**: records or full extractions, pretty or compact

mod json;
mod xlsx;

pub use json::{to_json, JsonFormat};
pub use xlsx::{
    batch_to_xlsx, to_xlsx, write_batch_xlsx, write_xlsx, ERROR_COLUMN, SOURCE_COLUMN,
    STATUS_COLUMN,
};
