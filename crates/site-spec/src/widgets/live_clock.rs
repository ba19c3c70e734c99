use chrono::NaiveDateTime;
use serde::Serialize;

/// "Current Time" line in the opening hours block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LiveClock {
    text: String,
}

impl LiveClock {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn refresh(&mut self, now: NaiveDateTime) {
        self.text = format!("Current Time: {}", now.format("%I:%M %p"));
    }
}
