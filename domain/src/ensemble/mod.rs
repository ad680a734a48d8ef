//! Ensemble vote over detector outcomes

pub mod combiner;
pub mod tally;

pub use combiner::{EnsembleCombiner, EnsembleVerdict};
pub use tally::{LabelWeights, Tally};
