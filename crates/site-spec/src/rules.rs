use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

// Email: one `@` and a dot in the domain part.
// Phone: up to 16 ASCII digits, no leading zero; whitespace is stripped first.
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").expect("phone pattern compiles"));

const MIN_NAME_CHARS: usize = 2;
const MIN_PARTY: i64 = 1;
const MAX_PARTY: i64 = 20;

/// Validation rule selected by a field's semantic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRule {
    Name,
    Email,
    Phone,
    Date,
    Time,
    People,
}

impl FieldRule {
    pub const ALL: [FieldRule; 6] = [
        FieldRule::Name,
        FieldRule::Email,
        FieldRule::Phone,
        FieldRule::Date,
        FieldRule::Time,
        FieldRule::People,
    ];

    pub fn for_field(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|rule| rule.field_name() == name)
    }

    pub fn field_name(self) -> &'static str {
        match self {
            FieldRule::Name => "name",
            FieldRule::Email => "email",
            FieldRule::Phone => "phone",
            FieldRule::Date => "date",
            FieldRule::Time => "time",
            FieldRule::People => "people",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            FieldRule::Name => "Name must be at least 2 characters long",
            FieldRule::Email => "Please enter a valid email address",
            FieldRule::Phone => "Please enter a valid phone number",
            FieldRule::Date => "Please select a future date",
            FieldRule::Time => "Please select a time",
            FieldRule::People => "Please enter between 1 and 20 people",
        }
    }

    /// Evaluates the rule against an already trimmed value.
    pub fn accepts(self, value: &str, today: NaiveDate) -> bool {
        match self {
            FieldRule::Name => value.chars().count() >= MIN_NAME_CHARS,
            FieldRule::Email => EMAIL.is_match(value),
            FieldRule::Phone => {
                let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
                PHONE.is_match(&compact)
            }
            FieldRule::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|date| date >= today)
                .unwrap_or(false),
            FieldRule::Time => !value.is_empty(),
            FieldRule::People => value
                .parse::<i64>()
                .map(|people| (MIN_PARTY..=MAX_PARTY).contains(&people))
                .unwrap_or(false),
        }
    }

    pub fn check(self, value: &str, today: NaiveDate) -> FieldValidation {
        if self.accepts(value.trim(), today) {
            FieldValidation::valid()
        } else {
            FieldValidation::invalid(self.message())
        }
    }
}

/// Outcome of one validation pass over a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldValidation {
    pub fn valid() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// Checks `value` against the rule for `name`; names without a rule pass.
pub fn check_field(name: &str, value: &str, today: NaiveDate) -> FieldValidation {
    match FieldRule::for_field(name) {
        Some(rule) => rule.check(value, today),
        None => FieldValidation::valid(),
    }
}
