//! Question entity and its classification value objects

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// Question kind assumed when a corpus record does not specify one
pub const DEFAULT_QUESTION_KIND: &str = "factual";

/// Subject category of a benchmark question
///
/// The set is fixed: corpus records naming any other category are rejected
/// at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Geography,
    History,
    Science,
    Mathematics,
    Literature,
    Arts,
    Technology,
    Sports,
    Entertainment,
    General,
    /// Letter, word and object counting
    Counting,
    /// Questions built on a false assumption
    FalsePremise,
    /// Questions with more than one reasonable reading
    Ambiguity,
    /// Questions about recent events
    Recency,
}

impl Category {
    /// Every category, in declaration order
    pub const ALL: [Category; 14] = [
        Category::Geography,
        Category::History,
        Category::Science,
        Category::Mathematics,
        Category::Literature,
        Category::Arts,
        Category::Technology,
        Category::Sports,
        Category::Entertainment,
        Category::General,
        Category::Counting,
        Category::FalsePremise,
        Category::Ambiguity,
        Category::Recency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Geography => "geography",
            Category::History => "history",
            Category::Science => "science",
            Category::Mathematics => "mathematics",
            Category::Literature => "literature",
            Category::Arts => "arts",
            Category::Technology => "technology",
            Category::Sports => "sports",
            Category::Entertainment => "entertainment",
            Category::General => "general",
            Category::Counting => "counting",
            Category::FalsePremise => "false_premise",
            Category::Ambiguity => "ambiguity",
            Category::Recency => "recency",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = DomainError;

    /// Case-insensitive; spaces and hyphens are read as underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace([' ', '-'], "_");
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == key)
            .ok_or_else(|| DomainError::UnknownCategory(s.to_string()))
    }
}

/// Difficulty tier, ordered `Easy < Medium < Hard`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All tiers in ascending order
    pub const ORDERED: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(DomainError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// A labeled benchmark question (Entity, identified by `id`)
///
/// Immutable once loaded. The detectors only ever borrow it.
///
/// # Example
///
/// ```
/// use veracity_domain::{Category, Difficulty, Question};
///
/// let q = Question::new("geo-1", "What is the capital of France?", "Paris")
///     .unwrap()
///     .with_category(Category::Geography)
///     .with_difficulty(Difficulty::Easy);
/// assert_eq!(q.expected_answer(), "Paris");
/// assert!(!q.is_trigger());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: String,
    question: String,
    expected_answer: String,
    category: Category,
    difficulty: Difficulty,
    #[serde(default)]
    hallucination_trigger: bool,
    #[serde(default = "default_kind")]
    kind: String,
}

fn default_kind() -> String {
    DEFAULT_QUESTION_KIND.to_string()
}

impl Question {
    /// Create a question with `general` category and `easy` difficulty.
    ///
    /// The expected answer may be empty (no ground truth); the id and the
    /// question text may not.
    pub fn new(
        id: impl Into<String>,
        question: impl Into<String>,
        expected_answer: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let id = id.into();
        let question = question.into();
        if id.trim().is_empty() {
            return Err(DomainError::InvalidQuestion("id cannot be empty".to_string()));
        }
        if question.trim().is_empty() {
            return Err(DomainError::InvalidQuestion(format!(
                "question text for '{}' cannot be empty",
                id
            )));
        }
        Ok(Self {
            id,
            question,
            expected_answer: expected_answer.into(),
            category: Category::General,
            difficulty: Difficulty::Easy,
            hallucination_trigger: false,
            kind: default_kind(),
        })
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_trigger(mut self, trigger: bool) -> Self {
        self.hallucination_trigger = trigger;
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.question
    }

    pub fn expected_answer(&self) -> &str {
        &self.expected_answer
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Whether the question was written to provoke an error
    pub fn is_trigger(&self) -> bool {
        self.hallucination_trigger
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.id, self.question)
    }
}
