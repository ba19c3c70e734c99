use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::field::FieldSpec;

/// What a form does when it is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    /// Table reservation; validated, then confirmed in a modal.
    Booking,
    /// Contact message; submission is simulated and acknowledged by a toast.
    Contact,
}

fn default_submit_label() -> String {
    "Send Message".into()
}

/// A form on the page and the fields it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormSpec {
    pub id: String,
    pub kind: FormKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default = "default_submit_label")]
    pub submit_label: String,
    pub fields: Vec<FieldSpec>,
}
