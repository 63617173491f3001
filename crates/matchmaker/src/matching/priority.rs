use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// The five evaluated categories a person can prioritise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Appearance,
    Personality,
    Job,
    Education,
    Economics,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Appearance,
        Category::Personality,
        Category::Job,
        Category::Education,
        Category::Economics,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Category::Appearance => "appearance",
            Category::Personality => "personality",
            Category::Job => "job",
            Category::Education => "education",
            Category::Economics => "economics",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(token))
    }
}

/// Ordered, duplicate-free priority list.
///
/// Stored preferences carry this field either as a JSON list or as a
/// delimited string (`"appearance, job"`, `"appearance/job"`, even a
/// stringified list such as `"['appearance', 'job']"`). Every shape is folded
/// into one ordered list here so the ranker never sees the raw form. Tokens
/// that do not name a category are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<PriorityInput>", into = "Vec<Category>")]
pub struct PriorityList(Vec<Category>);

/// Raw shapes accepted at the deserialization boundary.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PriorityInput {
    List(Vec<Value>),
    Text(String),
    Other(Value),
}

const DELIMITERS: &[char] = &[',', '/', '|', '>', ';'];
const NOISE: &[char] = &['[', ']', '\'', '"', '(', ')'];

impl PriorityList {
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut list = Vec::new();
        for category in categories {
            if !list.contains(&category) {
                list.push(category);
            }
        }
        Self(list)
    }

    /// Normalise a delimited priority string.
    pub fn parse(raw: &str) -> Self {
        Self::from_tokens(
            raw.split(|c: char| DELIMITERS.contains(&c) || c.is_whitespace())
                .map(str::to_string),
        )
    }

    fn from_tokens(tokens: impl IntoIterator<Item = String>) -> Self {
        let categories = tokens.into_iter().filter_map(|token| {
            let cleaned = token.trim().trim_matches(NOISE).trim();
            if cleaned.is_empty() {
                return None;
            }
            let category = Category::from_token(cleaned);
            if category.is_none() {
                debug!(token = cleaned, "ignoring unrecognised priority token");
            }
            category
        });
        Self::new(categories)
    }

    pub fn categories(&self) -> &[Category] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<PriorityInput> for PriorityList {
    fn from(input: PriorityInput) -> Self {
        match input {
            PriorityInput::Text(raw) => Self::parse(&raw),
            PriorityInput::List(values) => {
                // Entries may themselves be delimited strings.
                let tokens = values.into_iter().flat_map(|value| match value {
                    Value::String(raw) => Self::parse(&raw)
                        .0
                        .into_iter()
                        .map(|category| category.label().to_string())
                        .collect::<Vec<_>>(),
                    other => {
                        debug!(value = %other, "ignoring non-text priority entry");
                        Vec::new()
                    }
                });
                Self::from_tokens(tokens)
            }
            PriorityInput::Other(value) => {
                debug!(value = %value, "ignoring malformed priority field");
                Self::default()
            }
        }
    }
}

impl From<Option<PriorityInput>> for PriorityList {
    fn from(input: Option<PriorityInput>) -> Self {
        input.map(Self::from).unwrap_or_default()
    }
}

impl From<PriorityList> for Vec<Category> {
    fn from(list: PriorityList) -> Self {
        list.0
    }
}

impl FromIterator<Category> for PriorityList {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        Self::new(iter)
    }
}
