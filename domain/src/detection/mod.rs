//! Hallucination detectors
//!
//! Each detector looks at one (question, response) pair from a different
//! angle and produces a [`DetectionVerdict`]:
//!
//! ```text
//! ┌──────────────────────┬──────────────────────────────────────────────┐
//! │ Detector             │ Signal                                       │
//! ├──────────────────────┼──────────────────────────────────────────────┤
//! │ TokenOverlapVerifier │ expected answer tokens found in the response │
//! │ SelfConsistency      │ agreement across re-sampled responses        │
//! │ ContradictionDetector│ statements that contradict each other        │
//! └──────────────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! Self-consistency needs extra provider calls; only its scoring half
//! ([`ConsistencyScorer`]) lives here.

pub mod config;
pub mod consistency;
pub mod contradiction;
pub mod token_overlap;
pub mod verdict;

pub use config::DetectionConfig;
pub use consistency::{ConsistencyScorer, agreement_score, pair_similarity};
pub use contradiction::{Contradiction, ContradictionDetector};
pub use token_overlap::{TokenOverlapVerifier, overlap_ratio};
pub use verdict::{DetectionVerdict, DetectorKind, DetectorOutcome, HallucinationKind, Label};
