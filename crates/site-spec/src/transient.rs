//! Lifecycle of short-lived overlays: toasts and modals.
//!
//! Every entity walks `Created → Entering → Visible → Exiting → Removed`.
//! Timers only ever request a transition; the lifecycle decides whether it
//! still applies, which is what makes repeated dismissals and stale timers
//! harmless.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::clock::{Instant, Schedule, TimerId};
use crate::modal::ModalContent;
use crate::notify::NotificationMessage;
use crate::spec::Timings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Created,
    Entering,
    Visible,
    Exiting,
    Removed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Created => "created",
            Phase::Entering => "entering",
            Phase::Visible => "visible",
            Phase::Exiting => "exiting",
            Phase::Removed => "removed",
        }
    }

    fn can_move_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Created, Phase::Entering)
                | (Phase::Entering, Phase::Visible)
                | (Phase::Entering, Phase::Exiting)
                | (Phase::Visible, Phase::Exiting)
                | (Phase::Exiting, Phase::Removed)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("cannot move from {from} to {to}")]
    InvalidTransition { from: Phase, to: Phase },
}

/// Phase tracker for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lifecycle {
    phase: Phase,
    exit_started: Option<Instant>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            phase: Phase::Created,
            exit_started: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn exit_started(&self) -> Option<Instant> {
        self.exit_started
    }

    pub fn advance(&mut self, next: Phase, now: Instant) -> Result<(), LifecycleError> {
        if !self.phase.can_move_to(next) {
            return Err(LifecycleError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        if next == Phase::Exiting {
            self.exit_started = Some(now);
        }
        self.phase = next;
        Ok(())
    }
}

/// User action that asks an overlay to go away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissTrigger {
    /// The `×` control in a toast or modal header.
    CloseButton,
    /// The footer "Close" button of the booking confirmation.
    FooterButton,
    /// A click on the dimmed overlay outside the modal content.
    Backdrop,
}

/// Where a click on an overlay landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickTarget {
    Close,
    Footer,
    Backdrop,
    Content,
}

impl ClickTarget {
    pub fn dismiss_trigger(self) -> Option<DismissTrigger> {
        match self {
            ClickTarget::Close => Some(DismissTrigger::CloseButton),
            ClickTarget::Footer => Some(DismissTrigger::FooterButton),
            ClickTarget::Backdrop => Some(DismissTrigger::Backdrop),
            ClickTarget::Content => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransientBody {
    Notification(NotificationMessage),
    Modal(ModalContent),
}

impl TransientBody {
    fn accepts(&self, trigger: DismissTrigger) -> bool {
        match self {
            TransientBody::Notification(_) => trigger == DismissTrigger::CloseButton,
            TransientBody::Modal(content) => content.accepts(trigger),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransientBody::Notification(_) => "notification",
            TransientBody::Modal(content) => content.label(),
        }
    }
}

/// A live toast or modal.
#[derive(Debug, Clone)]
pub struct Transient {
    id: EntityId,
    created_at: Instant,
    lifecycle: Lifecycle,
    body: TransientBody,
    auto_dismiss: Option<TimerId>,
}

impl Transient {
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn phase(&self) -> Phase {
        self.lifecycle.phase()
    }

    pub fn body(&self) -> &TransientBody {
        &self.body
    }

    pub fn has_pending_auto_dismiss(&self) -> bool {
        self.auto_dismiss.is_some()
    }
}

/// Deferred steps of an overlay's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientTimer {
    Enter(EntityId),
    AutoDismiss(EntityId),
    Remove(EntityId),
}

/// Owner of every live overlay on the page.
#[derive(Debug)]
pub struct TransientUi {
    timings: Timings,
    next_id: u64,
    live: BTreeMap<EntityId, Transient>,
}

impl TransientUi {
    pub fn new(timings: Timings) -> Self {
        Self {
            timings,
            next_id: 1,
            live: BTreeMap::new(),
        }
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Transient> {
        self.live.get(&id)
    }

    pub fn phase(&self, id: EntityId) -> Option<Phase> {
        self.live.get(&id).map(Transient::phase)
    }

    /// Live overlays in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Transient> {
        self.live.values()
    }

    pub(crate) fn insert(
        &mut self,
        body: TransientBody,
        auto_dismiss: bool,
        now: Instant,
        timers: &mut impl Schedule<TransientTimer>,
    ) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;

        let mut lifecycle = Lifecycle::new();
        // A fresh lifecycle always accepts Created -> Entering.
        let _ = lifecycle.advance(Phase::Entering, now);
        timers.schedule(now + self.timings.enter_delay(), TransientTimer::Enter(id));
        let auto_dismiss = auto_dismiss.then(|| {
            timers.schedule(
                now + self.timings.notification_ttl(),
                TransientTimer::AutoDismiss(id),
            )
        });

        debug!(entity = %id, kind = body.label(), "overlay inserted");
        self.live.insert(
            id,
            Transient {
                id,
                created_at: now,
                lifecycle,
                body,
                auto_dismiss,
            },
        );
        id
    }

    /// Starts the exit sequence if `trigger` applies to the overlay and it
    /// is not already leaving. Returns whether anything changed.
    pub fn dismiss(
        &mut self,
        id: EntityId,
        trigger: DismissTrigger,
        now: Instant,
        timers: &mut impl Schedule<TransientTimer>,
    ) -> bool {
        let Some(entity) = self.live.get(&id) else {
            debug!(entity = %id, "dismiss for unknown overlay ignored");
            return false;
        };
        if !entity.body.accepts(trigger) {
            trace!(entity = %id, ?trigger, "overlay has no such control");
            return false;
        }
        self.begin_exit(id, now, timers)
    }

    /// Routes a click on an overlay to the matching dismiss trigger.
    pub fn click(
        &mut self,
        id: EntityId,
        target: ClickTarget,
        now: Instant,
        timers: &mut impl Schedule<TransientTimer>,
    ) -> bool {
        match target.dismiss_trigger() {
            Some(trigger) => self.dismiss(id, trigger, now, timers),
            None => false,
        }
    }

    pub fn fire(
        &mut self,
        timer: TransientTimer,
        now: Instant,
        timers: &mut impl Schedule<TransientTimer>,
    ) {
        match timer {
            TransientTimer::Enter(id) => {
                if let Some(entity) = self.live.get_mut(&id)
                    && let Err(err) = entity.lifecycle.advance(Phase::Visible, now)
                {
                    trace!(entity = %id, %err, "enter flip skipped");
                }
            }
            TransientTimer::AutoDismiss(id) => {
                if let Some(entity) = self.live.get_mut(&id) {
                    entity.auto_dismiss = None;
                    self.begin_exit(id, now, timers);
                }
            }
            TransientTimer::Remove(id) => {
                let finished = self
                    .live
                    .get_mut(&id)
                    .map(|entity| entity.lifecycle.advance(Phase::Removed, now));
                match finished {
                    Some(Ok(())) => {
                        self.live.remove(&id);
                        debug!(entity = %id, "overlay removed");
                    }
                    Some(Err(err)) => trace!(entity = %id, %err, "removal skipped"),
                    None => trace!(entity = %id, "overlay already gone"),
                }
            }
        }
    }

    fn begin_exit(
        &mut self,
        id: EntityId,
        now: Instant,
        timers: &mut impl Schedule<TransientTimer>,
    ) -> bool {
        let Some(entity) = self.live.get_mut(&id) else {
            return false;
        };
        if let Err(err) = entity.lifecycle.advance(Phase::Exiting, now) {
            trace!(entity = %id, %err, "dismiss ignored");
            return false;
        }
        if let Some(pending) = entity.auto_dismiss.take() {
            timers.cancel(pending);
        }
        timers.schedule(now + self.timings.exit(), TransientTimer::Remove(id));
        debug!(entity = %id, "overlay exiting");
        true
    }
}
