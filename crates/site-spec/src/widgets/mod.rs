//! Small page behaviours that sit next to the forms and overlays.

pub mod cart;
pub mod contact;
pub mod counter;
pub mod header;
pub mod lazy;
pub mod live_clock;
pub mod menu;
pub mod nav;
pub mod testimonials;
pub mod typewriter;

pub use cart::{CartButton, CartButtonState};
pub use contact::{CharCounter, SubmitButton};
pub use counter::{StatCounter, StatsSection};
pub use header::Header;
pub use lazy::LazyImage;
pub use live_clock::LiveClock;
pub use menu::{MenuEntry, MenuFilter};
pub use nav::MobileNav;
pub use testimonials::{Testimonial, TestimonialSlider};
pub use typewriter::Typewriter;
