//! JSON corpus loader
//!
//! Two layouts are accepted, and may be mixed in one file:
//!
//! - flat records: `{id, question, expected_answer, category, difficulty, hallucination_trigger?}`
//! - groups: `{category, difficulty, questions: [{id?, question, answer, type?, hallucination_trigger?}]}`
//!
//! Groups are flattened in file order. Records that miss a required field
//! are rejected here and never reach evaluation.

use serde::Deserialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use veracity_domain::{Category, Difficulty, Question};

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Failed to read corpus {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corpus is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corpus must be a JSON array of questions or question groups")]
    NotAList,

    /// `index` is the position of the question in the flattened corpus.
    #[error("Malformed corpus record {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    id: Option<String>,
    question: Option<String>,
    #[serde(alias = "answer")]
    expected_answer: Option<String>,
    category: Option<String>,
    difficulty: Option<String>,
    hallucination_trigger: Option<bool>,
    #[serde(rename = "type", alias = "kind")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    category: Option<String>,
    difficulty: Option<String>,
    questions: Vec<Value>,
}

/// Group-level fields inherited by the questions of a group
#[derive(Default)]
struct Inherited<'a> {
    category: Option<&'a str>,
    difficulty: Option<&'a str>,
}

/// Loads question corpora from JSON files
pub struct CorpusLoader;

impl CorpusLoader {
    pub fn load(path: &Path) -> Result<Vec<Question>, CorpusError> {
        let content = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let questions = Self::parse(&content)?;
        info!(path = %path.display(), questions = questions.len(), "Corpus loaded");
        Ok(questions)
    }

    /// Load and keep only the first `limit` questions.
    pub fn load_sample(path: &Path, limit: Option<usize>) -> Result<Vec<Question>, CorpusError> {
        let mut questions = Self::load(path)?;
        if let Some(limit) = limit
            && limit < questions.len()
        {
            debug!(limit, available = questions.len(), "Sampling corpus");
            questions.truncate(limit);
        }
        Ok(questions)
    }

    pub fn parse(content: &str) -> Result<Vec<Question>, CorpusError> {
        let root: Value = serde_json::from_str(content)?;
        let Value::Array(entries) = root else {
            return Err(CorpusError::NotAList);
        };

        let mut builder = CorpusBuilder::default();
        for entry in entries {
            if entry.get("questions").is_some() {
                let group: RawGroup =
                    serde_json::from_value(entry).map_err(|e| builder.malformed(e.to_string()))?;
                let inherited = Inherited {
                    category: group.category.as_deref(),
                    difficulty: group.difficulty.as_deref(),
                };
                for record in group.questions {
                    builder.push(record, &inherited)?;
                }
            } else {
                builder.push(entry, &Inherited::default())?;
            }
        }
        Ok(builder.questions)
    }
}

#[derive(Default)]
struct CorpusBuilder {
    questions: Vec<Question>,
    seen_ids: HashSet<String>,
    generated: HashMap<Category, usize>,
}

impl CorpusBuilder {
    fn malformed(&self, reason: impl Into<String>) -> CorpusError {
        CorpusError::MalformedRecord {
            index: self.questions.len(),
            reason: reason.into(),
        }
    }

    fn push(&mut self, record: Value, inherited: &Inherited<'_>) -> Result<(), CorpusError> {
        let raw: RawQuestion =
            serde_json::from_value(record).map_err(|e| self.malformed(e.to_string()))?;

        let text = raw
            .question
            .ok_or_else(|| self.malformed("missing field `question`"))?;
        let expected = raw
            .expected_answer
            .ok_or_else(|| self.malformed("missing field `expected_answer`"))?;
        let category: Category = raw
            .category
            .as_deref()
            .or(inherited.category)
            .ok_or_else(|| self.malformed("missing field `category`"))?
            .parse()
            .map_err(|e: veracity_domain::DomainError| self.malformed(e.to_string()))?;
        let difficulty: Difficulty = raw
            .difficulty
            .as_deref()
            .or(inherited.difficulty)
            .ok_or_else(|| self.malformed("missing field `difficulty`"))?
            .parse()
            .map_err(|e: veracity_domain::DomainError| self.malformed(e.to_string()))?;

        let id = match raw.id {
            Some(id) => id,
            // generated ids step over explicit ones already taken
            None => loop {
                let n = self.generated.entry(category).or_insert(0);
                *n += 1;
                let candidate = format!("{}-{}", category, n);
                if !self.seen_ids.contains(&candidate) {
                    break candidate;
                }
            },
        };
        if self.seen_ids.contains(&id) {
            return Err(self.malformed(format!("duplicate id '{}'", id)));
        }

        let mut question = Question::new(id.clone(), text, expected)
            .map_err(|e| self.malformed(e.to_string()))?
            .with_category(category)
            .with_difficulty(difficulty)
            .with_trigger(raw.hallucination_trigger.unwrap_or(false));
        if let Some(kind) = raw.kind {
            question = question.with_kind(kind);
        }

        self.seen_ids.insert(id);
        self.questions.push(question);
        Ok(())
    }
}
