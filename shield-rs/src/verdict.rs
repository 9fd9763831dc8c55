//! Classification outcome

use serde::{Deserialize, Serialize};
use std::fmt;

const SPAM_RATIONALE: &str = "This message contains characteristics typical of spam communications. \
Be cautious before interacting with it.";

const NOT_SPAM_RATIONALE: &str =
    "This message appears to be legitimate and does not show typical spam indicators.";

/// Binary class of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    Spam,
    NotSpam,
}

impl Label {
    /// Map a model class value; `1` is spam, `0` is not
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            1 => Some(Label::Spam),
            0 => Some(Label::NotSpam),
            _ => None,
        }
    }

    pub fn class(&self) -> i64 {
        match self {
            Label::Spam => 1,
            Label::NotSpam => 0,
        }
    }

    pub fn is_spam(&self) -> bool {
        matches!(self, Label::Spam)
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Label::Spam => "Spam Detected!",
            Label::NotSpam => "Safe Message",
        }
    }

    pub fn rationale(&self) -> &'static str {
        match self {
            Label::Spam => SPAM_RATIONALE,
            Label::NotSpam => NOT_SPAM_RATIONALE,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Spam => write!(f, "SPAM"),
            Label::NotSpam => write!(f, "NOT_SPAM"),
        }
    }
}

/// Label plus the fixed explanation shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub label: Label,
    pub rationale: &'static str,
}

impl Verdict {
    pub fn from_label(label: Label) -> Self {
        Self {
            label,
            rationale: label.rationale(),
        }
    }

    pub fn is_spam(&self) -> bool {
        self.label.is_spam()
    }

    pub fn headline(&self) -> &'static str {
        self.label.headline()
    }
}

impl From<Label> for Verdict {
    fn from(label: Label) -> Self {
        Self::from_label(label)
    }
}
