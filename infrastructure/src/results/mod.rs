//! Result file persistence
//!
//! A result file is the stable boundary artifact of a run: every record
//! with its verdict plus the summary. It can be re-aggregated later
//! without calling any provider.

mod result_file;
mod store;

pub use result_file::{RESULT_SCHEMA_VERSION, ResultFile, ResultFileError, RunMetadata};
pub use store::ResultStore;
