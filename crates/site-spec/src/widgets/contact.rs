use serde::Serialize;

const WARNING_THRESHOLD: usize = 50;

/// "n characters remaining" hint under a contact textarea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharCounter {
    limit: usize,
    remaining: Option<i64>,
}

impl CharCounter {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            remaining: None,
        }
    }

    pub fn update(&mut self, value: &str) {
        let used = value.chars().count();
        let limit = i64::try_from(self.limit).unwrap_or(i64::MAX);
        let used = i64::try_from(used).unwrap_or(i64::MAX);
        self.remaining = Some(limit - used);
    }

    /// Empty until the first keystroke.
    pub fn text(&self) -> String {
        match self.remaining {
            Some(remaining) => format!("{remaining} characters remaining"),
            None => String::new(),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.remaining
            .is_some_and(|remaining| remaining < WARNING_THRESHOLD as i64)
    }
}

/// Submit button of a simulated form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitButton {
    label: String,
    sending: bool,
}

impl SubmitButton {
    pub const SENDING_LABEL: &'static str = "Sending...";

    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sending: false,
        }
    }

    pub fn label(&self) -> &str {
        if self.sending {
            Self::SENDING_LABEL
        } else {
            &self.label
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.sending
    }

    /// Returns false when a submission is already in flight.
    pub fn start(&mut self) -> bool {
        if self.sending {
            return false;
        }
        self.sending = true;
        true
    }

    pub fn finish(&mut self) {
        self.sending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_warns_near_the_limit() {
        let mut counter = CharCounter::new(500);
        assert_eq!(counter.text(), "");
        counter.update(&"x".repeat(440));
        assert_eq!(counter.text(), "60 characters remaining");
        assert!(!counter.is_warning());
        counter.update(&"x".repeat(460));
        assert!(counter.is_warning());
    }

    #[test]
    fn counter_goes_negative_past_the_limit() {
        let mut counter = CharCounter::new(3);
        counter.update("abcde");
        assert_eq!(counter.text(), "-2 characters remaining");
    }

    #[test]
    fn submit_button_blocks_double_send() {
        let mut button = SubmitButton::new("Send Message");
        assert!(button.start());
        assert_eq!(button.label(), "Sending...");
        assert!(button.is_disabled());
        assert!(!button.start());
        button.finish();
        assert_eq!(button.label(), "Send Message");
    }
}
