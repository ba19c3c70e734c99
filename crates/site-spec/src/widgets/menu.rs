use serde::Serialize;
use tracing::debug;

use crate::spec::MenuItemSpec;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    shown: bool,
}

impl MenuEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }
}

/// Category tabs above the menu. Picking a tab hides every item at once,
/// then the matching ones come back one by one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuFilter {
    items: Vec<MenuEntry>,
    active: Option<String>,
    #[serde(skip)]
    generation: u64,
}

impl MenuFilter {
    pub fn new(menu: &[MenuItemSpec]) -> Self {
        Self {
            items: menu
                .iter()
                .map(|item| MenuEntry {
                    name: item.name.clone(),
                    category: item.category.clone(),
                    shown: true,
                })
                .collect(),
            active: None,
            generation: 0,
        }
    }

    pub fn items(&self) -> &[MenuEntry] {
        &self.items
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.items
            .iter()
            .any(|item| item.category() == Some(category))
    }

    /// Activates `category` and hides everything. Returns the reveal token
    /// and the indices to bring back, in menu order, or `None` when no item
    /// carries that category.
    pub fn select(&mut self, category: &str) -> Option<(u64, Vec<usize>)> {
        if !self.has_category(category) {
            debug!(category, "no such menu tab");
            return None;
        }
        self.active = Some(category.to_string());
        self.generation += 1;
        for item in &mut self.items {
            item.shown = false;
        }
        let reveal = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.category() == Some(category))
            .map(|(index, _)| index)
            .collect();
        Some((self.generation, reveal))
    }

    /// A reveal from an earlier tab click is dropped.
    pub fn reveal(&mut self, generation: u64, index: usize) -> bool {
        if generation != self.generation {
            return false;
        }
        match self.items.get_mut(index) {
            Some(item) => {
                item.shown = true;
                true
            }
            None => false,
        }
    }
}
