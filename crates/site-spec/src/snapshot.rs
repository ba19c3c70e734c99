use serde::Serialize;

use crate::controller::SiteController;
use crate::modal::ModalContent;
use crate::page::FieldState;
use crate::transient::{EntityId, Phase, Transient, TransientBody};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSnapshot {
    pub form: String,
    pub name: String,
    pub value: String,
    pub state: FieldState,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub feedback: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter: Option<String>,
    pub counter_warning: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSnapshot {
    pub id: String,
    pub submit_label: String,
    pub submit_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlaySnapshot {
    pub id: EntityId,
    pub kind: String,
    pub phase: Phase,
    pub summary: String,
}

impl OverlaySnapshot {
    fn from_transient(transient: &Transient) -> Self {
        let summary = match transient.body() {
            TransientBody::Notification(notification) => notification.message.clone(),
            TransientBody::Modal(ModalContent::BookingConfirmation(details)) => format!(
                "Booking Confirmation: {} on {} at {} for {}",
                details.name, details.date, details.time, details.people
            ),
            TransientBody::Modal(ModalContent::ChefDetail(profile)) => {
                format!("Chef Details: {} ({})", profile.name, profile.role)
            }
        };
        Self {
            id: transient.id(),
            kind: transient.body().label().to_string(),
            phase: transient.phase(),
            summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelledValue {
    pub label: String,
    pub value: String,
}

/// Point-in-time view of the page, for printing and assertions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSnapshot {
    pub at_ms: u64,
    pub forms: Vec<FormSnapshot>,
    pub fields: Vec<FieldSnapshot>,
    pub overlays: Vec<OverlaySnapshot>,
    pub cart: Vec<LabelledValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu_tab: Option<String>,
    /// Names of the menu items currently visible.
    pub menu_shown: Vec<String>,
    pub nav_open: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub testimonials: Vec<LabelledValue>,
    pub counters: Vec<LabelledValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero: Option<String>,
    pub header_hidden: bool,
    pub scroll_position: u32,
    pub images_loaded: usize,
}

impl PageSnapshot {
    pub fn capture(controller: &SiteController) -> Self {
        let page = controller.page();
        Self {
            at_ms: controller.now().as_millis(),
            forms: page
                .forms()
                .iter()
                .map(|form| FormSnapshot {
                    id: form.id.clone(),
                    submit_label: form.submit.label().to_string(),
                    submit_disabled: form.submit.is_disabled(),
                })
                .collect(),
            fields: page
                .fields()
                .map(|(_, field)| FieldSnapshot {
                    form: field.form.clone(),
                    name: field.name.clone(),
                    value: field.value.clone(),
                    state: field.state,
                    feedback: field.feedback.clone(),
                    counter: field
                        .counter
                        .as_ref()
                        .map(|counter| counter.text())
                        .filter(|text| !text.is_empty()),
                    counter_warning: field
                        .counter
                        .as_ref()
                        .is_some_and(|counter| counter.is_warning()),
                })
                .collect(),
            overlays: controller
                .overlays()
                .iter()
                .map(OverlaySnapshot::from_transient)
                .collect(),
            cart: controller
                .cart()
                .iter()
                .map(|button| LabelledValue {
                    label: button.item().to_string(),
                    value: button.label().to_string(),
                })
                .collect(),
            menu_tab: controller.menu().active().map(str::to_string),
            menu_shown: controller
                .menu()
                .items()
                .iter()
                .filter(|item| item.is_shown())
                .map(|item| item.name().to_string())
                .collect(),
            nav_open: controller.nav().is_open(),
            testimonials: controller
                .testimonials()
                .map(|slider| slider.slides())
                .unwrap_or_default()
                .iter()
                .map(|slide| LabelledValue {
                    label: format!("{}, {}", slide.name, slide.role),
                    value: slide.text.clone(),
                })
                .collect(),
            counters: controller
                .stats()
                .counters()
                .iter()
                .map(|counter| LabelledValue {
                    label: counter.label().to_string(),
                    value: counter.shown().to_string(),
                })
                .collect(),
            clock: controller.clock_text().map(str::to_string),
            hero: controller.hero_text(),
            header_hidden: controller.header().is_hidden(),
            scroll_position: controller.scroll_position(),
            images_loaded: controller
                .images()
                .iter()
                .filter(|image| !image.is_lazy())
                .count(),
        }
    }
}
