use serde::{Deserialize, Serialize};

use crate::spec::{FormKind, SiteConfig};
use crate::widgets::contact::{CharCounter, SubmitButton};

/// Handle to a field inside a [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(usize);

/// Visual validation state of a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldState {
    #[default]
    Unvalidated,
    Valid,
    Invalid,
}

impl FieldState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldState::Unvalidated => "unvalidated",
            FieldState::Valid => "valid",
            FieldState::Invalid => "invalid",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub form: String,
    pub name: String,
    pub label: Option<String>,
    pub value: String,
    pub required: bool,
    pub multiline: bool,
    pub state: FieldState,
    /// Error annotations rendered next to the field.
    pub feedback: Vec<String>,
    /// Floating-label state of the field's wrapper.
    pub focused: bool,
    pub counter: Option<CharCounter>,
}

impl Field {
    pub fn mark_valid(&mut self) {
        self.state = FieldState::Valid;
        self.feedback.clear();
    }

    pub fn mark_invalid(&mut self, message: impl Into<String>) {
        self.state = FieldState::Invalid;
        self.feedback.clear();
        self.feedback.push(message.into());
    }

    pub fn is_invalid(&self) -> bool {
        self.state == FieldState::Invalid
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// The wrapper keeps its floating label while the field has content.
    pub fn blur(&mut self) {
        if self.value.is_empty() {
            self.focused = false;
        }
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        if let Some(counter) = &mut self.counter {
            counter.update(&self.value);
        }
    }

    fn clear(&mut self) {
        self.value.clear();
        self.state = FieldState::Unvalidated;
        self.feedback.clear();
        self.focused = false;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub id: String,
    pub kind: FormKind,
    pub fields: Vec<FieldId>,
    pub submit: SubmitButton,
}

/// The form part of the live page: every form and the fields it owns.
#[derive(Debug, Clone, Default)]
pub struct Page {
    forms: Vec<Form>,
    fields: Vec<Field>,
}

impl Page {
    pub fn from_config(config: &SiteConfig) -> Self {
        let mut page = Page::default();
        for spec in &config.forms {
            let mut ids = Vec::with_capacity(spec.fields.len());
            for field in &spec.fields {
                let counter = (spec.kind == FormKind::Contact && field.multiline)
                    .then(|| CharCounter::new(config.message_limit));
                ids.push(FieldId(page.fields.len()));
                page.fields.push(Field {
                    form: spec.id.clone(),
                    name: field.name.clone(),
                    label: field.label.clone(),
                    value: field.initial_value.clone().unwrap_or_default(),
                    required: field.required,
                    multiline: field.multiline,
                    state: FieldState::Unvalidated,
                    feedback: Vec::new(),
                    focused: false,
                    counter,
                });
            }
            page.forms.push(Form {
                id: spec.id.clone(),
                kind: spec.kind,
                fields: ids,
                submit: SubmitButton::new(spec.submit_label.clone()),
            });
        }
        page
    }

    pub fn forms(&self) -> &[Form] {
        &self.forms
    }

    pub fn form(&self, id: &str) -> Option<&Form> {
        self.forms.iter().find(|form| form.id == id)
    }

    pub fn form_mut(&mut self, id: &str) -> Option<&mut Form> {
        self.forms.iter_mut().find(|form| form.id == id)
    }

    /// First form of the given kind, in page order.
    pub fn form_of_kind(&self, kind: FormKind) -> Option<&Form> {
        self.forms.iter().find(|form| form.kind == kind)
    }

    pub fn field_id(&self, form: &str, name: &str) -> Option<FieldId> {
        self.form(form)?
            .fields
            .iter()
            .copied()
            .find(|id| self.fields[id.0].name == name)
    }

    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.get(id.0)
    }

    pub fn field_mut(&mut self, id: FieldId) -> Option<&mut Field> {
        self.fields.get_mut(id.0)
    }

    pub fn field_by_name(&self, form: &str, name: &str) -> Option<&Field> {
        self.field_id(form, name).and_then(|id| self.field(id))
    }

    pub fn fields(&self) -> impl Iterator<Item = (FieldId, &Field)> {
        self.fields
            .iter()
            .enumerate()
            .map(|(index, field)| (FieldId(index), field))
    }

    pub fn required_fields(&self, form: &str) -> Vec<FieldId> {
        self.form(form)
            .map(|form| {
                form.fields
                    .iter()
                    .copied()
                    .filter(|id| self.fields[id.0].required)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Raw value of a field, or empty when the field is absent.
    pub fn value_of(&self, form: &str, name: &str) -> String {
        self.field_by_name(form, name)
            .map(|field| field.value.clone())
            .unwrap_or_default()
    }

    pub fn reset_form(&mut self, form: &str) {
        let Some(ids) = self.form(form).map(|form| form.fields.clone()) else {
            return;
        };
        for id in ids {
            if let Some(field) = self.fields.get_mut(id.0) {
                field.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{FieldSpec, FormSpec};

    fn config() -> SiteConfig {
        let mut config = SiteConfig::new("Ann's Restaurant");
        config.forms.push(FormSpec {
            id: "contact".into(),
            kind: FormKind::Contact,
            title: None,
            submit_label: "Send Message".into(),
            fields: vec![
                FieldSpec::new("name").required(),
                FieldSpec::new("message").multiline(),
            ],
        });
        config
    }

    #[test]
    fn contact_textarea_gets_a_counter() {
        let page = Page::from_config(&config());
        assert!(page.field_by_name("contact", "message").unwrap().counter.is_some());
        assert!(page.field_by_name("contact", "name").unwrap().counter.is_none());
        assert_eq!(page.required_fields("contact").len(), 1);
    }

    #[test]
    fn invalid_mark_keeps_a_single_annotation() {
        let mut page = Page::from_config(&config());
        let id = page.field_id("contact", "name").unwrap();
        let field = page.field_mut(id).unwrap();
        field.mark_invalid("first");
        field.mark_invalid("second");
        assert_eq!(field.feedback, vec!["second".to_string()]);
        field.mark_valid();
        assert!(field.feedback.is_empty());
    }

    #[test]
    fn blur_keeps_label_floating_while_filled() {
        let mut page = Page::from_config(&config());
        let id = page.field_id("contact", "name").unwrap();
        let field = page.field_mut(id).unwrap();
        field.focus();
        field.set_value("Ann");
        field.blur();
        assert!(field.focused);
        field.set_value("");
        field.blur();
        assert!(!field.focused);
    }

    #[test]
    fn state_labels_match_serde_names() {
        for state in [FieldState::Unvalidated, FieldState::Valid, FieldState::Invalid] {
            let json = serde_json::to_value(state).unwrap();
            assert_eq!(json, state.as_str());
        }
    }

    #[test]
    fn reset_clears_values_and_state() {
        let mut page = Page::from_config(&config());
        let id = page.field_id("contact", "name").unwrap();
        page.field_mut(id).unwrap().set_value("Ann");
        page.field_mut(id).unwrap().mark_invalid("x");
        page.reset_form("contact");
        let field = page.field(id).unwrap();
        assert!(field.value.is_empty());
        assert_eq!(field.state, FieldState::Unvalidated);
    }
}
