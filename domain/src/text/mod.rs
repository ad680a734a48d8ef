//! Text handling shared by every detector.
//!
//! All comparisons happen on normalized text; see [`Normalizer`].

pub mod normalizer;
pub mod numbers;

pub use normalizer::Normalizer;
