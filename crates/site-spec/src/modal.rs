use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clock::{Instant, Schedule};
use crate::transient::{DismissTrigger, EntityId, TransientBody, TransientTimer, TransientUi};

/// Reservation details copied out of the booking form at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub name: String,
    pub date: String,
    pub time: String,
    pub people: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChefProfile {
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "modal", rename_all = "snake_case")]
pub enum ModalContent {
    BookingConfirmation(BookingDetails),
    ChefDetail(ChefProfile),
}

impl ModalContent {
    pub fn label(&self) -> &'static str {
        match self {
            ModalContent::BookingConfirmation(_) => "booking_modal",
            ModalContent::ChefDetail(_) => "chef_modal",
        }
    }

    /// The chef card has no footer button.
    pub fn accepts(&self, trigger: DismissTrigger) -> bool {
        match self {
            ModalContent::BookingConfirmation(_) => true,
            ModalContent::ChefDetail(_) => trigger != DismissTrigger::FooterButton,
        }
    }
}

impl TransientUi {
    pub fn show_confirmation(
        &mut self,
        details: BookingDetails,
        now: Instant,
        timers: &mut impl Schedule<TransientTimer>,
    ) -> EntityId {
        info!(name = %details.name, date = %details.date, "booking confirmation shown");
        self.show_modal(ModalContent::BookingConfirmation(details), now, timers)
    }

    pub fn show_detail(
        &mut self,
        profile: ChefProfile,
        now: Instant,
        timers: &mut impl Schedule<TransientTimer>,
    ) -> EntityId {
        info!(chef = %profile.name, "chef details shown");
        self.show_modal(ModalContent::ChefDetail(profile), now, timers)
    }

    fn show_modal(
        &mut self,
        content: ModalContent,
        now: Instant,
        timers: &mut impl Schedule<TransientTimer>,
    ) -> EntityId {
        self.insert(TransientBody::Modal(content), false, now, timers)
    }
}
