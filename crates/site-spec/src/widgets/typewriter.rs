use serde::Serialize;

/// Hero title revealed one character at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Typewriter {
    #[serde(skip)]
    full: Vec<char>,
    shown: usize,
}

impl Typewriter {
    pub fn new(title: &str) -> Self {
        Self {
            full: title.chars().collect(),
            shown: 0,
        }
    }

    pub fn text(&self) -> String {
        self.full[..self.shown].iter().collect()
    }

    pub fn is_done(&self) -> bool {
        self.shown >= self.full.len()
    }

    /// Appends the next character. Returns true while characters remain.
    pub fn step(&mut self) -> bool {
        if self.shown < self.full.len() {
            self.shown += 1;
        }
        !self.is_done()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_every_character() {
        let mut title = Typewriter::new("Délice");
        assert_eq!(title.text(), "");
        let mut steps = 1;
        while title.step() {
            steps += 1;
        }
        assert_eq!(steps, 6);
        assert_eq!(title.text(), "Délice");
        assert!(!title.step());
    }
}
