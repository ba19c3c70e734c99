use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CartButtonState {
    Idle,
    Added,
}

/// Simulated "Add to Cart" button attached to a menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartButton {
    item: String,
    state: CartButtonState,
    #[serde(skip)]
    generation: u64,
}

impl CartButton {
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            state: CartButtonState::Idle,
            generation: 0,
        }
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn state(&self) -> CartButtonState {
        self.state
    }

    pub fn label(&self) -> &'static str {
        match self.state {
            CartButtonState::Idle => "Add to Cart",
            CartButtonState::Added => "Added!",
        }
    }

    pub fn confirmation(&self) -> String {
        format!("{} added to cart!", self.item)
    }

    /// Flips to `Added` and returns the token the revert timer must present.
    pub fn click(&mut self) -> u64 {
        self.state = CartButtonState::Added;
        self.generation += 1;
        self.generation
    }

    /// Only the most recent click's timer may revert the button.
    pub fn revert(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.state = CartButtonState::Idle;
        true
    }
}
