#![allow(missing_docs)]

pub mod clock;
pub mod controller;
pub mod modal;
pub mod notify;
pub mod page;
pub mod render;
pub mod rules;
pub mod snapshot;
pub mod spec;
pub mod transient;
pub mod validate;
pub mod widgets;

pub use clock::{Instant, Schedule, TimerId, TimerQueue};
pub use controller::{CONTACT_SENT_MESSAGE, ScriptStep, SiteController, SiteEvent, SiteTimer};
pub use modal::{BookingDetails, ChefProfile, ModalContent};
pub use notify::{NotificationKind, NotificationMessage};
pub use page::{Field, FieldId, FieldState, Form, Page};
pub use render::{MarkupRenderer, RenderError, render_json, render_text};
pub use rules::{FieldRule, FieldValidation, check_field};
pub use snapshot::PageSnapshot;
pub use spec::{ConfigError, FieldSpec, FormKind, FormSpec, SiteConfig, Timings};
pub use transient::{
    ClickTarget, DismissTrigger, EntityId, Lifecycle, LifecycleError, Phase, Transient,
    TransientBody, TransientTimer, TransientUi,
};
pub use validate::{FieldValidator, ValidatedFields};
