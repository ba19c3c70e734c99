//! The single owner of everything on the page.
//!
//! A [`SiteController`] is built once from a [`SiteConfig`]. Hosts feed it
//! [`SiteEvent`]s and advance its virtual clock; it reacts by mutating the
//! page, showing overlays and scheduling follow-up timers on its own queue.

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clock::{Instant, TimerQueue};
use crate::modal::{BookingDetails, ChefProfile};
use crate::notify::NotificationKind;
use crate::page::{Field, Page};
use crate::spec::{ConfigError, FormKind, SiteConfig};
use crate::transient::{ClickTarget, DismissTrigger, EntityId, TransientTimer, TransientUi};
use crate::validate::{FieldValidator, ValidatedFields};
use crate::widgets::{
    CartButton, Header, LazyImage, LiveClock, MenuFilter, MobileNav, StatsSection,
    TestimonialSlider, Typewriter,
};

pub const CONTACT_SENT_MESSAGE: &str = "Message sent successfully! We'll get back to you soon.";

/// Something the visitor did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SiteEvent {
    Focus {
        form: String,
        field: String,
    },
    Input {
        form: String,
        field: String,
        value: String,
    },
    Blur {
        form: String,
        field: String,
    },
    Submit {
        form: String,
    },
    AddToCart {
        item: String,
    },
    ChefClick {
        chef: String,
    },
    /// Click somewhere on a toast or modal.
    Click {
        entity: EntityId,
        target: ClickTarget,
    },
    Scroll {
        offset: u32,
    },
    /// In-page anchor link to a section.
    Navigate {
        section: String,
    },
    StatsVisible,
    ImageVisible {
        index: usize,
    },
    /// Click on a menu category tab.
    MenuTab {
        category: String,
    },
    NavToggle,
    /// Click anywhere on the document. `in_nav` is set when it landed on
    /// the mobile menu or its toggle.
    PageClick {
        #[serde(default)]
        in_nav: bool,
    },
}

/// Deferred work owned by the controller's queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteTimer {
    Transient(TransientTimer),
    Welcome,
    CartRevert { item: usize, generation: u64 },
    ContactSent { form: String },
    ClockTick,
    CounterFrame(usize),
    Typewriter,
    MenuReveal { generation: u64, item: usize },
}

impl From<TransientTimer> for SiteTimer {
    fn from(timer: TransientTimer) -> Self {
        SiteTimer::Transient(timer)
    }
}

/// One scripted event, fired once the clock reaches `at_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: SiteEvent,
}

#[derive(Debug)]
pub struct SiteController {
    config: SiteConfig,
    started_at: NaiveDateTime,
    now: Instant,
    timers: TimerQueue<SiteTimer>,
    page: Page,
    validator: FieldValidator,
    overlays: TransientUi,
    cart: Vec<CartButton>,
    stats: StatsSection,
    header: Header,
    scroll_position: u32,
    images: Vec<LazyImage>,
    clock: Option<LiveClock>,
    hero: Option<Typewriter>,
    menu: MenuFilter,
    nav: MobileNav,
    testimonials: Option<TestimonialSlider>,
}

impl SiteController {
    /// Builds the page and schedules the start-up timers (welcome toast,
    /// clock, hero title). `started_at` is the wall-clock time at t = 0.
    pub fn new(config: SiteConfig, started_at: NaiveDateTime) -> Result<Self, ConfigError> {
        config.check()?;
        let validator = FieldValidator::new(ValidatedFields::new(&config.validated_fields)?);
        let timings = config.timings;
        let mut controller = Self {
            page: Page::from_config(&config),
            validator,
            overlays: TransientUi::new(timings),
            cart: config
                .menu
                .iter()
                .map(|item| CartButton::new(item.name.clone()))
                .collect(),
            stats: StatsSection::new(&config.stats, timings.counter_frame_ms),
            header: Header::new(config.header_height),
            scroll_position: 0,
            images: config
                .images
                .iter()
                .map(|image| LazyImage::new(image.data_src.clone()))
                .collect(),
            clock: config.live_clock.then(LiveClock::default),
            hero: config.hero_title.as_deref().map(Typewriter::new),
            menu: MenuFilter::new(&config.menu),
            nav: MobileNav::default(),
            testimonials: TestimonialSlider::new(config.testimonials.as_deref()),
            started_at,
            now: Instant::ZERO,
            timers: TimerQueue::new(),
            config,
        };
        controller.start();
        Ok(controller)
    }

    fn start(&mut self) {
        let timings = self.config.timings;
        let welcome_at = self.after(timings.welcome_delay_ms);
        self.timers.schedule(welcome_at, SiteTimer::Welcome);
        let wall = self.wall_clock();
        let tick_at = self.after(timings.clock_interval_ms);
        if let Some(clock) = &mut self.clock {
            clock.refresh(wall);
            self.timers.schedule(tick_at, SiteTimer::ClockTick);
        }
        if self.hero.is_some() {
            let type_at = self.after(timings.typewriter_start_ms);
            self.timers.schedule(type_at, SiteTimer::Typewriter);
        }
        info!(
            restaurant = %self.config.restaurant,
            forms = self.page.forms().len(),
            "site controller started"
        );
    }

    fn after(&self, millis: u64) -> Instant {
        self.now + Duration::from_millis(millis)
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn wall_clock(&self) -> NaiveDateTime {
        let elapsed = i64::try_from(self.now.as_millis()).unwrap_or(i64::MAX);
        self.started_at
            .checked_add_signed(TimeDelta::milliseconds(elapsed))
            .unwrap_or(self.started_at)
    }

    pub fn today(&self) -> NaiveDate {
        self.wall_clock().date()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn validator(&self) -> &FieldValidator {
        &self.validator
    }

    pub fn overlays(&self) -> &TransientUi {
        &self.overlays
    }

    pub fn cart(&self) -> &[CartButton] {
        &self.cart
    }

    pub fn stats(&self) -> &StatsSection {
        &self.stats
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn scroll_position(&self) -> u32 {
        self.scroll_position
    }

    pub fn images(&self) -> &[LazyImage] {
        &self.images
    }

    pub fn clock_text(&self) -> Option<&str> {
        self.clock.as_ref().map(LiveClock::text)
    }

    pub fn hero_text(&self) -> Option<String> {
        self.hero.as_ref().map(Typewriter::text)
    }

    pub fn menu(&self) -> &MenuFilter {
        &self.menu
    }

    pub fn nav(&self) -> MobileNav {
        self.nav
    }

    pub fn testimonials(&self) -> Option<&TestimonialSlider> {
        self.testimonials.as_ref()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Fires every timer due up to `target`, in due order, then parks the
    /// clock at `target`. Timers scheduled by handlers fire in the same
    /// pass when they fall inside the window.
    pub fn advance_to(&mut self, target: Instant) {
        while let Some((at, timer)) = self.timers.pop_due(target) {
            self.now = self.now.max(at);
            self.fire(timer);
        }
        self.now = self.now.max(target);
    }

    pub fn advance_by(&mut self, elapsed: Duration) {
        self.advance_to(self.now + elapsed);
    }

    /// Plays scripted events in order, advancing the clock to each step's time.
    pub fn run_script(&mut self, steps: &[ScriptStep]) {
        for step in steps {
            self.advance_to(Instant::from_millis(step.at_ms));
            self.handle(step.event.clone());
        }
    }

    /// Validates `field` of `form`. An absent form or field is skipped and
    /// reports `false`, the same answer as a failed rule.
    pub fn validate_field(&mut self, form: &str, field: &str) -> bool {
        let today = self.today();
        match self.page.field_id(form, field) {
            Some(id) => self.validator.validate_field(&mut self.page, id, today),
            None => {
                debug!(form, field, "no such field");
                false
            }
        }
    }

    /// `false` when any required field fails or the form does not exist.
    pub fn validate_form(&mut self, form: &str) -> bool {
        let today = self.today();
        self.validator.validate_form(&mut self.page, form, today)
    }

    pub fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) -> EntityId {
        self.overlays.notify(message, kind, self.now, &mut self.timers)
    }

    pub fn show_confirmation(&mut self, details: BookingDetails) -> EntityId {
        self.overlays
            .show_confirmation(details, self.now, &mut self.timers)
    }

    pub fn show_detail(&mut self, profile: ChefProfile) -> EntityId {
        self.overlays.show_detail(profile, self.now, &mut self.timers)
    }

    pub fn dismiss(&mut self, id: EntityId, trigger: DismissTrigger) -> bool {
        self.overlays.dismiss(id, trigger, self.now, &mut self.timers)
    }

    pub fn handle(&mut self, event: SiteEvent) {
        debug!(?event, at = self.now.as_millis(), "event");
        match event {
            SiteEvent::Focus { form, field } => {
                if let Some(field) = self.contact_field_mut(&form, &field) {
                    field.focus();
                }
            }
            SiteEvent::Input { form, field, value } => self.on_input(&form, &field, value),
            SiteEvent::Blur { form, field } => self.on_blur(&form, &field),
            SiteEvent::Submit { form } => self.on_submit(&form),
            SiteEvent::AddToCart { item } => self.on_add_to_cart(&item),
            SiteEvent::ChefClick { chef } => {
                let profile = self
                    .config
                    .chefs
                    .iter()
                    .find(|candidate| candidate.name == chef)
                    .map(|spec| ChefProfile {
                        name: spec.name.clone(),
                        role: spec.role.clone(),
                    });
                match profile {
                    Some(profile) => {
                        self.show_detail(profile);
                    }
                    None => debug!(chef, "no such chef card"),
                }
            }
            SiteEvent::Click { entity, target } => {
                self.overlays
                    .click(entity, target, self.now, &mut self.timers);
            }
            SiteEvent::Scroll { offset } => {
                self.scroll_position = offset;
                self.header.on_scroll(offset);
            }
            SiteEvent::Navigate { section } => {
                let offset = self
                    .config
                    .sections
                    .iter()
                    .find(|candidate| candidate.id == section)
                    .map(|candidate| candidate.offset);
                match offset {
                    Some(offset) => self.scroll_position = self.header.scroll_target(offset),
                    None => debug!(section, "no such section"),
                }
            }
            SiteEvent::StatsVisible => self.on_stats_visible(),
            SiteEvent::ImageVisible { index } => {
                if let Some(image) = self.images.get_mut(index)
                    && image.reveal()
                {
                    debug!(index, "lazy image loaded");
                }
            }
            SiteEvent::MenuTab { category } => self.on_menu_tab(&category),
            SiteEvent::NavToggle => {
                let open = self.nav.toggle();
                debug!(open, "mobile nav toggled");
            }
            SiteEvent::PageClick { in_nav } => {
                if !in_nav && self.nav.close() {
                    debug!("mobile nav closed by outside click");
                }
            }
        }
    }

    fn form_kind(&self, form: &str) -> Option<FormKind> {
        self.page.form(form).map(|form| form.kind)
    }

    fn contact_field_mut(&mut self, form: &str, field: &str) -> Option<&mut Field> {
        if self.form_kind(form) != Some(FormKind::Contact) {
            return None;
        }
        let id = self.page.field_id(form, field)?;
        self.page.field_mut(id)
    }

    fn on_input(&mut self, form: &str, name: &str, value: String) {
        let Some(id) = self.page.field_id(form, name) else {
            debug!(form, field = name, "input for missing field");
            return;
        };
        let revalidate = match self.page.field_mut(id) {
            Some(field) => {
                field.set_value(value);
                field.is_invalid()
            }
            None => false,
        };
        // Only a field already showing an error is re-checked while typing.
        if revalidate && self.form_kind(form) == Some(FormKind::Booking) {
            let today = self.today();
            self.validator.validate_field(&mut self.page, id, today);
        }
    }

    fn on_blur(&mut self, form: &str, name: &str) {
        match self.form_kind(form) {
            Some(FormKind::Booking) => {
                self.validate_field(form, name);
            }
            Some(FormKind::Contact) => {
                if let Some(field) = self.contact_field_mut(form, name) {
                    field.blur();
                }
            }
            None => debug!(form, "blur on missing form"),
        }
    }

    fn on_submit(&mut self, form: &str) {
        match self.form_kind(form) {
            Some(FormKind::Booking) => {
                if self.validate_form(form) {
                    let details = BookingDetails {
                        name: self.page.value_of(form, "name"),
                        date: self.page.value_of(form, "date"),
                        time: self.page.value_of(form, "time"),
                        people: self.page.value_of(form, "people"),
                    };
                    self.show_confirmation(details);
                } else {
                    info!(form, "booking form has invalid fields");
                }
            }
            Some(FormKind::Contact) => {
                let started = self
                    .page
                    .form_mut(form)
                    .is_some_and(|form| form.submit.start());
                if started {
                    let at = self.after(self.config.timings.contact_send_ms);
                    self.timers.schedule(
                        at,
                        SiteTimer::ContactSent {
                            form: form.to_string(),
                        },
                    );
                } else {
                    debug!(form, "contact form already sending");
                }
            }
            None => debug!(form, "submit on missing form"),
        }
    }

    fn on_add_to_cart(&mut self, item: &str) {
        let Some(index) = self.cart.iter().position(|button| button.item() == item) else {
            debug!(item, "no such menu item");
            return;
        };
        let button = &mut self.cart[index];
        let generation = button.click();
        let message = button.confirmation();
        self.notify(message, NotificationKind::Success);
        let at = self.after(self.config.timings.cart_revert_ms);
        self.timers.schedule(
            at,
            SiteTimer::CartRevert {
                item: index,
                generation,
            },
        );
    }

    fn on_menu_tab(&mut self, category: &str) {
        let Some((generation, reveal)) = self.menu.select(category) else {
            return;
        };
        let timings = self.config.timings;
        for (step, item) in (0u64..).zip(reveal) {
            let delay = timings
                .menu_reveal_delay_ms
                .saturating_add(step.saturating_mul(timings.menu_reveal_step_ms));
            let at = self.after(delay);
            self.timers
                .schedule(at, SiteTimer::MenuReveal { generation, item });
        }
    }

    fn on_stats_visible(&mut self) {
        if !self.stats.trigger() {
            return;
        }
        for index in 0..self.stats.counters().len() {
            self.counter_frame(index);
        }
    }

    fn counter_frame(&mut self, index: usize) {
        if self.stats.frame(index) {
            let at = self.after(self.config.timings.counter_frame_ms);
            self.timers.schedule(at, SiteTimer::CounterFrame(index));
        }
    }

    fn fire(&mut self, timer: SiteTimer) {
        match timer {
            SiteTimer::Transient(timer) => {
                self.overlays.fire(timer, self.now, &mut self.timers);
            }
            SiteTimer::Welcome => {
                let message = self.config.welcome_text();
                self.notify(message, NotificationKind::Success);
            }
            SiteTimer::CartRevert { item, generation } => {
                if let Some(button) = self.cart.get_mut(item) {
                    button.revert(generation);
                }
            }
            SiteTimer::ContactSent { form } => {
                self.notify(CONTACT_SENT_MESSAGE, NotificationKind::Success);
                self.page.reset_form(&form);
                if let Some(form) = self.page.form_mut(&form) {
                    form.submit.finish();
                }
            }
            SiteTimer::ClockTick => {
                let wall = self.wall_clock();
                if let Some(clock) = &mut self.clock {
                    clock.refresh(wall);
                    let at = self.after(self.config.timings.clock_interval_ms);
                    self.timers.schedule(at, SiteTimer::ClockTick);
                }
            }
            SiteTimer::CounterFrame(index) => self.counter_frame(index),
            SiteTimer::Typewriter => {
                let more = self.hero.as_mut().is_some_and(Typewriter::step);
                if more {
                    let at = self.after(self.config.timings.typewriter_step_ms);
                    self.timers.schedule(at, SiteTimer::Typewriter);
                }
            }
            SiteTimer::MenuReveal { generation, item } => {
                self.menu.reveal(generation, item);
            }
        }
    }
}
