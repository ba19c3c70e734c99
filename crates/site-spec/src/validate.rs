use chrono::NaiveDate;
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::page::{FieldId, Page};
use crate::rules::{FieldRule, FieldValidation};
use crate::spec::ConfigError;

/// Allow-list of semantic field names that are checked against a rule.
///
/// A name outside the list is accepted without looking for a rule.
#[derive(Debug, Clone)]
pub struct ValidatedFields {
    patterns: Vec<String>,
    set: GlobSet,
}

impl ValidatedFields {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = Glob::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|source| ConfigError::InvalidPattern {
                pattern: patterns
                    .iter()
                    .map(|pattern| pattern.as_ref())
                    .collect::<Vec<_>>()
                    .join(","),
                source,
            })?;
        Ok(Self {
            patterns: patterns
                .iter()
                .map(|pattern| pattern.as_ref().to_string())
                .collect(),
            set,
        })
    }

    /// Every name that has a built-in rule.
    pub fn builtin() -> Self {
        let mut builder = GlobSetBuilder::new();
        let mut patterns = Vec::new();
        for rule in FieldRule::ALL {
            // Rule names are plain identifiers, which always form a valid glob.
            if let Ok(glob) = Glob::new(rule.field_name()) {
                builder.add(glob);
                patterns.push(rule.field_name().to_string());
            }
        }
        Self {
            patterns,
            set: builder.build().unwrap_or_else(|_| GlobSet::empty()),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.set.is_match(name)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for ValidatedFields {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Applies field rules to the page and keeps error annotations in sync.
#[derive(Debug, Clone, Default)]
pub struct FieldValidator {
    allow: ValidatedFields,
}

impl FieldValidator {
    pub fn new(allow: ValidatedFields) -> Self {
        Self { allow }
    }

    pub fn allow_list(&self) -> &ValidatedFields {
        &self.allow
    }

    /// Pure check of one value, honouring the allow-list.
    pub fn check(&self, name: &str, value: &str, today: NaiveDate) -> FieldValidation {
        if !self.allow.contains(name) {
            return FieldValidation::valid();
        }
        match FieldRule::for_field(name) {
            Some(rule) => rule.check(value, today),
            None => {
                debug!(field = name, "allow-listed field has no rule");
                FieldValidation::valid()
            }
        }
    }

    /// Validates one field and updates its state and annotation.
    ///
    /// Returns `false` for an unknown field id without touching the page:
    /// a missing element is skipped, and callers that gate on the result
    /// (form submission) treat it as not passed.
    pub fn validate_field(&self, page: &mut Page, id: FieldId, today: NaiveDate) -> bool {
        let Some(field) = page.field_mut(id) else {
            debug!(?id, "validate_field on missing field");
            return false;
        };
        let result = self.check(&field.name, &field.value, today);
        match result.message {
            None => field.mark_valid(),
            Some(message) => field.mark_invalid(message),
        }
        result.valid
    }

    /// Validates every required field of `form`, without stopping at the
    /// first failure, and reports whether all of them passed. A missing
    /// form reports `false`, so it can never be submitted.
    pub fn validate_form(&self, page: &mut Page, form: &str, today: NaiveDate) -> bool {
        if page.form(form).is_none() {
            debug!(form, "validate_form on missing form");
            return false;
        }
        page.required_fields(form)
            .into_iter()
            .fold(true, |all_valid, id| {
                self.validate_field(page, id, today) && all_valid
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_list_covers_rule_names() {
        let allow = ValidatedFields::builtin();
        for rule in FieldRule::ALL {
            assert!(allow.contains(rule.field_name()));
        }
        assert!(!allow.contains("nickname"));
    }

    #[test]
    fn glob_patterns_extend_the_list() {
        let allow = ValidatedFields::new(&["e*", "people"]).unwrap();
        assert!(allow.contains("email"));
        assert!(allow.contains("people"));
        assert!(!allow.contains("name"));
    }

    #[test]
    fn bad_pattern_is_a_config_error() {
        let err = ValidatedFields::new(&["na[me"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn fields_outside_the_list_skip_their_rule() {
        let validator = FieldValidator::new(ValidatedFields::new(&["email"]).unwrap());
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert!(validator.check("name", "A", today).valid);
        assert!(!validator.check("email", "nope", today).valid);
    }
}
