use serde::{Deserialize, Serialize};

use crate::utils::constants::ALL_SELECTION;

/// A selector choice: the "All" sentinel or one concrete value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    #[default]
    All,
    Value(String),
}

impl Selection {
    /// Surrounding whitespace is ignored; the literal "All" is the sentinel.
    pub fn parse(choice: &str) -> Self {
        let trimmed = choice.trim();
        if trimmed == ALL_SELECTION {
            Selection::All
        } else {
            Selection::Value(trimmed.to_string())
        }
    }

    pub fn from_option(choice: Option<&str>) -> Self {
        choice.map(Selection::parse).unwrap_or_default()
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Value(choice) => choice == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Selection::All => ALL_SELECTION,
            Selection::Value(choice) => choice,
        }
    }
}

impl From<String> for Selection {
    fn from(choice: String) -> Self {
        Selection::parse(&choice)
    }
}

impl From<Selection> for String {
    fn from(selection: Selection) -> Self {
        selection.as_str().to_string()
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
