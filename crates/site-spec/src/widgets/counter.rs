use serde::Serialize;

use crate::spec::CounterSpec;

/// Number that counts up to its target one animation frame at a time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCounter {
    label: String,
    target: u64,
    #[serde(skip)]
    increment: f64,
    #[serde(skip)]
    current: f64,
    shown: u64,
    done: bool,
}

impl StatCounter {
    pub fn new(spec: &CounterSpec, frame_ms: u64) -> Self {
        let duration_ms = spec.duration_secs.saturating_mul(1_000) as f64;
        let frames = duration_ms / frame_ms.max(1) as f64;
        let increment = if frames > 0.0 {
            spec.end as f64 / frames
        } else {
            f64::INFINITY
        };
        Self {
            label: spec.label.clone(),
            target: spec.end,
            increment,
            current: 0.0,
            shown: 0,
            done: false,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn shown(&self) -> u64 {
        self.shown
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Advances one frame. Returns true while more frames are needed.
    pub fn frame(&mut self) -> bool {
        if self.done {
            return false;
        }
        self.current += self.increment;
        if self.current < self.target as f64 {
            self.shown = self.current.floor() as u64;
            true
        } else {
            self.shown = self.target;
            self.done = true;
            false
        }
    }
}

/// The stats block; its counters start the first time it scrolls into view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSection {
    counters: Vec<StatCounter>,
    triggered: bool,
}

impl StatsSection {
    pub fn new(specs: &[CounterSpec], frame_ms: u64) -> Self {
        Self {
            counters: specs
                .iter()
                .map(|spec| StatCounter::new(spec, frame_ms))
                .collect(),
            triggered: false,
        }
    }

    pub fn counters(&self) -> &[StatCounter] {
        &self.counters
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Marks the section as seen; false if it was seen before.
    pub fn trigger(&mut self) -> bool {
        if self.triggered || self.counters.is_empty() {
            return false;
        }
        self.triggered = true;
        true
    }

    pub fn frame(&mut self, index: usize) -> bool {
        self.counters
            .get_mut(index)
            .is_some_and(StatCounter::frame)
    }
}
