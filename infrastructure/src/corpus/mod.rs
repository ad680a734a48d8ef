//! Question corpus loading

mod loader;

pub use loader::{CorpusError, CorpusLoader};
