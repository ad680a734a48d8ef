//! Lexical contradiction scan over a single response
//!
//! Two patterns are recognized:
//!
//! - **Negation conflict**: the same `(subject, verb, predicate)` triple stated
//!   both plainly and negated, e.g. "paris is the capital ... paris is not the
//!   capital". The subject is the token before a copula/auxiliary verb and the
//!   predicate is the first following token that is neither a negation nor an
//!   article.
//! - **Numeric conflict**: a question expecting exactly one number answered
//!   with two or more distinct numbers. Numbers already present in the
//!   question text are ignored, since echoing them is not an answer.
//!
//! A detected pattern is strong evidence of HALLUCINATION. Finding nothing
//! is only weak evidence of correctness.

use super::config::{CONTRADICTION_CONFIDENCE, NO_CONTRADICTION_CONFIDENCE};
use super::verdict::{DetectionVerdict, DetectorKind, HallucinationKind};
use crate::text::{Normalizer, numbers};
use serde::Serialize;
use serde_json::json;
use std::collections::{HashMap, HashSet};

const VERBS: [&str; 16] = [
    "is", "are", "was", "were", "am", "has", "have", "had", "does", "do", "did", "can", "will",
    "could", "should", "would",
];

const NEGATED_VERBS: [(&str, &str); 17] = [
    ("isnt", "is"),
    ("arent", "are"),
    ("wasnt", "was"),
    ("werent", "were"),
    ("hasnt", "has"),
    ("havent", "have"),
    ("hadnt", "had"),
    ("doesnt", "does"),
    ("dont", "do"),
    ("didnt", "did"),
    ("cant", "can"),
    ("cannot", "can"),
    ("wont", "will"),
    ("couldnt", "could"),
    ("shouldnt", "should"),
    ("wouldnt", "would"),
    ("aint", "is"),
];

const NEGATIONS: [&str; 3] = ["not", "never", "no"];

const ARTICLES: [&str; 3] = ["a", "an", "the"];

const SINGLE_NUMBER_PREFIXES: [&str; 5] = [
    "how many",
    "how much",
    "what year",
    "in what year",
    "in which year",
];

/// A contradiction found in a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum Contradiction {
    Negation {
        subject: String,
        verb: String,
        predicate: String,
    },
    Numeric {
        values: Vec<u64>,
    },
}

impl Contradiction {
    pub fn kind(&self) -> HallucinationKind {
        match self {
            Contradiction::Negation { .. } => HallucinationKind::NegationConflict,
            Contradiction::Numeric { .. } => HallucinationKind::NumericConflict,
        }
    }
}

/// Scans one response for internally inconsistent statements
#[derive(Debug, Clone, Default)]
pub struct ContradictionDetector;

impl ContradictionDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect(&self, question: &str, expected: &str, response: &str) -> DetectionVerdict {
        let found = self.find(question, expected, response);
        match found.first() {
            Some(first) => DetectionVerdict::hallucination(
                DetectorKind::Contradiction,
                CONTRADICTION_CONFIDENCE,
                first.kind(),
            )
            .with_evidence(json!({ "contradictions": found })),
            None => {
                DetectionVerdict::correct(DetectorKind::Contradiction, NO_CONTRADICTION_CONFIDENCE)
                    .with_evidence(json!({ "contradictions": [] }))
            }
        }
    }

    /// Every contradiction pattern present in `response`
    pub fn find(&self, question: &str, expected: &str, response: &str) -> Vec<Contradiction> {
        let tokens = Normalizer::tokens(response);
        let mut found = negation_conflicts(&tokens);
        if let Some(numeric) = numeric_conflict(question, expected, &tokens) {
            found.push(numeric);
        }
        found
    }
}

fn negation_conflicts(tokens: &[String]) -> Vec<Contradiction> {
    // (subject, verb, predicate) -> (seen plain, seen negated)
    let mut polarity: HashMap<(&str, &str, &str), (bool, bool)> = HashMap::new();
    let mut order: Vec<(&str, &str, &str)> = Vec::new();

    for i in 1..tokens.len() {
        let token = tokens[i].as_str();
        let (verb, mut negated) = if VERBS.contains(&token) {
            (token, false)
        } else if let Some((_, base)) = NEGATED_VERBS.iter().find(|(neg, _)| *neg == token) {
            (*base, true)
        } else {
            continue;
        };

        let mut j = i + 1;
        if j < tokens.len() && NEGATIONS.contains(&tokens[j].as_str()) {
            negated = true;
            j += 1;
        }
        while j < tokens.len() && ARTICLES.contains(&tokens[j].as_str()) {
            j += 1;
        }
        let Some(predicate) = tokens.get(j) else {
            continue;
        };

        let key = (tokens[i - 1].as_str(), verb, predicate.as_str());
        let entry = polarity.entry(key).or_insert_with(|| {
            order.push(key);
            (false, false)
        });
        if negated {
            entry.1 = true;
        } else {
            entry.0 = true;
        }
    }

    order
        .into_iter()
        .filter(|key| polarity.get(key).is_some_and(|(plain, neg)| *plain && *neg))
        .map(|(subject, verb, predicate)| Contradiction::Negation {
            subject: subject.to_string(),
            verb: verb.to_string(),
            predicate: predicate.to_string(),
        })
        .collect()
}

fn expects_single_number(question: &str, expected: &str) -> bool {
    let expected_tokens = Normalizer::tokens(expected);
    let numeric_in_expected = expected_tokens
        .iter()
        .filter(|t| numbers::numeric_value(t).is_some())
        .count();
    if numeric_in_expected == 1 {
        return true;
    }
    let normalized_question = Normalizer::normalize(question);
    SINGLE_NUMBER_PREFIXES
        .iter()
        .any(|prefix| normalized_question.starts_with(prefix))
}

fn numeric_conflict(question: &str, expected: &str, tokens: &[String]) -> Option<Contradiction> {
    if !expects_single_number(question, expected) {
        return None;
    }
    let echoed: HashSet<u64> = numbers::distinct_values(&Normalizer::tokens(question))
        .into_iter()
        .collect();
    let values: Vec<u64> = numbers::distinct_values(tokens)
        .into_iter()
        .filter(|v| !echoed.contains(v))
        .collect();
    (values.len() >= 2).then_some(Contradiction::Numeric { values })
}
