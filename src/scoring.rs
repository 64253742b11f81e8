//! Composite RFV scores and the marketing action dictionary

use crate::error::RfvError;
use crate::model::Grade;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Action text for scores missing from the dictionary
pub const UNDEFINED_ACTION: &str = "no action defined";

/// Three-letter composite score in recency, frequency, value order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Score {
    pub recency: Grade,
    pub frequency: Grade,
    pub value: Grade,
}

impl Score {
    pub fn new(recency: Grade, frequency: Grade, value: Grade) -> Self {
        Self {
            recency,
            frequency,
            value,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.recency, self.frequency, self.value)
    }
}

impl FromStr for Score {
    type Err = RfvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RfvError::InvalidScore {
            score: s.to_string(),
        };

        let grades: Vec<Grade> = s
            .chars()
            .map(Grade::from_char)
            .collect::<Option<_>>()
            .ok_or_else(invalid)?;

        match grades.as_slice() {
            [recency, frequency, value] => Ok(Score::new(*recency, *frequency, *value)),
            _ => Err(invalid()),
        }
    }
}

/// Serialized form of [`ActionBook`]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ActionBookFile {
    actions: BTreeMap<String, String>,
    #[serde(default = "default_undefined")]
    undefined: String,
}

fn default_undefined() -> String {
    UNDEFINED_ACTION.to_string()
}

/// Mapping from composite score to marketing action text
///
/// Lookups never fail: a score without an entry resolves to the undefined
/// marker.
///
/// JSON layout:
/// ```json
/// { "actions": { "AAA": "Send discount coupons" }, "undefined": "no action defined" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ActionBookFile", into = "ActionBookFile")]
pub struct ActionBook {
    actions: BTreeMap<Score, String>,
    undefined: String,
}

impl TryFrom<ActionBookFile> for ActionBook {
    type Error = RfvError;

    fn try_from(file: ActionBookFile) -> Result<Self, Self::Error> {
        let actions = file
            .actions
            .into_iter()
            .map(|(score, action)| score.parse::<Score>().map(|score| (score, action)))
            .collect::<crate::Result<_>>()?;

        Ok(Self {
            actions,
            undefined: file.undefined,
        })
    }
}

impl From<ActionBook> for ActionBookFile {
    fn from(book: ActionBook) -> Self {
        Self {
            actions: book
                .actions
                .into_iter()
                .map(|(score, action)| (score.to_string(), action))
                .collect(),
            undefined: book.undefined,
        }
    }
}

impl Default for ActionBook {
    fn default() -> Self {
        use Grade::{A, C, D};

        let win_back = "Churn! Customers who spent a lot and bought often, send discount coupons to win them back";

        Self::new(UNDEFINED_ACTION)
            .with_action(
                Score::new(A, A, A),
                "Send discount coupons, ask them to refer our product to a friend",
            )
            .with_action(
                Score::new(D, D, D),
                "Churn! Customers who spent very little and bought rarely, no action",
            )
            .with_action(Score::new(D, A, A), win_back)
            .with_action(Score::new(C, A, A), win_back)
    }
}

impl ActionBook {
    /// Empty dictionary with the given undefined marker
    pub fn new(undefined: impl Into<String>) -> Self {
        Self {
            actions: BTreeMap::new(),
            undefined: undefined.into(),
        }
    }

    pub fn with_action(mut self, score: Score, action: impl Into<String>) -> Self {
        self.insert(score, action);
        self
    }

    pub fn insert(&mut self, score: Score, action: impl Into<String>) -> Option<String> {
        self.actions.insert(score, action.into())
    }

    /// Action mapped to `score`, if any
    pub fn lookup(&self, score: &Score) -> Option<&str> {
        self.actions.get(score).map(String::as_str)
    }

    /// Action for `score`, falling back to the undefined marker
    pub fn action_for(&self, score: &Score) -> &str {
        self.lookup(score).unwrap_or(&self.undefined)
    }

    pub fn undefined(&self) -> &str {
        &self.undefined
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Score, &str)> {
        self.actions.iter().map(|(score, action)| (score, action.as_str()))
    }

    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
