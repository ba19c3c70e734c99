use std::collections::BTreeSet;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::FieldRule;
use crate::spec::form::FormSpec;

/// Errors raised while loading a site configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse site config: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("invalid validated field pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("form '{0}' is declared more than once")]
    DuplicateForm(String),
    #[error("form '{form}' declares field '{field}' more than once")]
    DuplicateField { form: String, field: String },
    #[error("timing '{0}' must be at least 1 ms")]
    ZeroInterval(&'static str),
}

/// Timer durations, all in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Timings {
    /// Delay before a freshly inserted toast or modal flips to its entered state.
    pub enter_delay_ms: u64,
    /// Exit transition length; removal waits this long after exit begins.
    pub exit_ms: u64,
    /// Lifetime of a toast before it dismisses itself.
    pub notification_ttl_ms: u64,
    pub welcome_delay_ms: u64,
    pub cart_revert_ms: u64,
    pub contact_send_ms: u64,
    pub clock_interval_ms: u64,
    pub typewriter_start_ms: u64,
    pub typewriter_step_ms: u64,
    pub counter_frame_ms: u64,
    /// Pause between hiding the menu and revealing the chosen category.
    pub menu_reveal_delay_ms: u64,
    /// Stagger between consecutive revealed menu items.
    pub menu_reveal_step_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            enter_delay_ms: 100,
            exit_ms: 300,
            notification_ttl_ms: 5_000,
            welcome_delay_ms: 1_000,
            cart_revert_ms: 2_000,
            contact_send_ms: 2_000,
            clock_interval_ms: 1_000,
            typewriter_start_ms: 1_000,
            typewriter_step_ms: 100,
            counter_frame_ms: 16,
            menu_reveal_delay_ms: 200,
            menu_reveal_step_ms: 100,
        }
    }
}

impl Timings {
    pub fn enter_delay(&self) -> Duration {
        Duration::from_millis(self.enter_delay_ms)
    }

    pub fn exit(&self) -> Duration {
        Duration::from_millis(self.exit_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    /// Timers that reschedule themselves must move the clock forward.
    pub fn check(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("clock_interval_ms", self.clock_interval_ms),
            ("typewriter_step_ms", self.typewriter_step_ms),
            ("counter_frame_ms", self.counter_frame_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroInterval(name));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MenuItemSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// Menu tab the item belongs to. Uncategorised items are hidden once a
    /// tab is picked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChefSpec {
    pub name: String,
    pub role: String,
}

/// A stat counter that animates up to `end` once the stats section is seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CounterSpec {
    pub label: String,
    pub end: u64,
    /// Animation length in whole seconds.
    #[serde(default = "default_counter_duration")]
    pub duration_secs: u64,
}

fn default_counter_duration() -> u64 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ImageSpec {
    pub data_src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// A testimonial slide already present in the page markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TestimonialSpec {
    pub name: String,
    pub role: String,
    pub text: String,
    #[serde(default = "default_rating")]
    pub rating: u8,
}

fn default_rating() -> u8 {
    5
}

/// Anchor target for in-page navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SectionSpec {
    pub id: String,
    pub offset: u32,
}

fn default_validated_fields() -> Vec<String> {
    FieldRule::ALL
        .iter()
        .map(|rule| rule.field_name().to_string())
        .collect()
}

fn default_header_height() -> u32 {
    80
}

fn default_message_limit() -> usize {
    500
}

/// Top-level description of the page the controller manages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SiteConfig {
    pub restaurant: String,
    /// Overrides the default welcome toast text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
    /// Glob patterns of semantic field names that go through rule lookup.
    /// Names outside this list are always valid.
    #[serde(default = "default_validated_fields")]
    pub validated_fields: Vec<String>,
    #[serde(default)]
    pub timings: Timings,
    #[serde(default)]
    pub forms: Vec<FormSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub menu: Vec<MenuItemSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chefs: Vec<ChefSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stats: Vec<CounterSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<SectionSpec>,
    /// Slides of the testimonial slider. `None` means the page has no
    /// slider, so no extra testimonials are appended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testimonials: Option<Vec<TestimonialSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_title: Option<String>,
    #[serde(default = "default_header_height")]
    pub header_height: u32,
    #[serde(default)]
    pub live_clock: bool,
    #[serde(default = "default_message_limit")]
    pub message_limit: usize,
}

impl SiteConfig {
    pub fn new(restaurant: impl Into<String>) -> Self {
        Self {
            restaurant: restaurant.into(),
            welcome_message: None,
            validated_fields: default_validated_fields(),
            timings: Timings::default(),
            forms: Vec::new(),
            menu: Vec::new(),
            chefs: Vec::new(),
            stats: Vec::new(),
            images: Vec::new(),
            sections: Vec::new(),
            testimonials: None,
            hero_title: None,
            header_height: default_header_height(),
            live_clock: false,
            message_limit: default_message_limit(),
        }
    }

    /// Parses and checks a JSON site configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.check()?;
        Ok(config)
    }

    /// Rejects zero self-rescheduling intervals, duplicate form ids and
    /// duplicate field names within a form.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.timings.check()?;
        let mut forms = BTreeSet::new();
        for form in &self.forms {
            if !forms.insert(form.id.as_str()) {
                return Err(ConfigError::DuplicateForm(form.id.clone()));
            }
            let mut names = BTreeSet::new();
            for field in &form.fields {
                if !names.insert(field.name.as_str()) {
                    return Err(ConfigError::DuplicateField {
                        form: form.id.clone(),
                        field: field.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn welcome_text(&self) -> String {
        self.welcome_message
            .clone()
            .unwrap_or_else(|| format!("Welcome to {}! 🍽️", self.restaurant))
    }

    pub fn form(&self, id: &str) -> Option<&FormSpec> {
        self.forms.iter().find(|form| form.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{FieldSpec, FormKind};

    #[test]
    fn defaults_fill_missing_sections() {
        let config = SiteConfig::from_json(r#"{ "restaurant": "Ann's Restaurant" }"#).unwrap();
        assert_eq!(config.timings, Timings::default());
        assert_eq!(config.validated_fields.len(), 6);
        assert_eq!(config.message_limit, 500);
        assert_eq!(config.welcome_text(), "Welcome to Ann's Restaurant! 🍽️");
    }

    #[test]
    fn partial_timings_keep_other_defaults() {
        let config = SiteConfig::from_json(
            r#"{ "restaurant": "R", "timings": { "notification_ttl_ms": 1000 } }"#,
        )
        .unwrap();
        assert_eq!(config.timings.notification_ttl_ms, 1_000);
        assert_eq!(config.timings.exit_ms, 300);
    }

    #[test]
    fn duplicate_field_is_rejected() {
        let mut config = SiteConfig::new("R");
        config.forms.push(FormSpec {
            id: "booking".into(),
            kind: FormKind::Booking,
            title: None,
            submit_label: "Book".into(),
            fields: vec![FieldSpec::new("name"), FieldSpec::new("name")],
        });
        let err = config.check().unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateField { .. }));
    }

    #[test]
    fn zero_repeating_intervals_are_rejected() {
        for field in ["clock_interval_ms", "typewriter_step_ms", "counter_frame_ms"] {
            let json = format!(r#"{{ "restaurant": "R", "timings": {{ "{field}": 0 }} }}"#);
            let err = SiteConfig::from_json(&json).unwrap_err();
            assert!(matches!(err, ConfigError::ZeroInterval(name) if name == field));
            assert_eq!(err.to_string(), format!("timing '{field}' must be at least 1 ms"));
        }
    }

    #[test]
    fn zero_one_shot_delays_are_allowed() {
        let mut config = SiteConfig::new("R");
        config.timings.enter_delay_ms = 0;
        config.timings.exit_ms = 0;
        config.timings.notification_ttl_ms = 0;
        config.timings.menu_reveal_step_ms = 0;
        assert!(config.check().is_ok());
    }

    #[test]
    fn extreme_timings_pass_the_check() {
        let mut config = SiteConfig::new("R");
        config.timings.clock_interval_ms = u64::MAX;
        config.timings.notification_ttl_ms = u64::MAX;
        config.header_height = u32::MAX;
        assert!(config.check().is_ok());
    }

    #[test]
    fn testimonials_are_optional() {
        let config = SiteConfig::from_json(r#"{ "restaurant": "R" }"#).unwrap();
        assert!(config.testimonials.is_none());
        let config = SiteConfig::from_json(
            r#"{ "restaurant": "R", "testimonials": [ { "name": "A", "role": "B", "text": "C" } ] }"#,
        )
        .unwrap();
        assert_eq!(config.testimonials.unwrap()[0].rating, 5);
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        let err = SiteConfig::from_json("{").unwrap_err();
        assert!(err.to_string().starts_with("failed to parse site config"));
    }
}
