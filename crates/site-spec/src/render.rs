use std::fmt::Write;

use handlebars::Handlebars;
use serde_json::{Value, json};
use thiserror::Error;

use crate::modal::ModalContent;
use crate::notify::NotificationMessage;
use crate::snapshot::PageSnapshot;
use crate::spec::Timings;
use crate::transient::{EntityId, Phase, Transient, TransientBody};
use crate::widgets::Testimonial;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template registration failed: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),
    #[error("template rendering failed: {0}")]
    Render(#[from] handlebars::RenderError),
}

const NOTIFICATION_TEMPLATE: &str = r#"<div class="notification notification-{{kind}}" data-entity="{{id}}" style="position: fixed; top: 20px; right: 20px; background: {{background}}; color: white; padding: 15px 20px; border-radius: 5px; box-shadow: 0 4px 6px rgba(0,0,0,0.1); z-index: 9999; transform: {{transform}}; transition: transform {{transition}} ease;">
  <div class="notification-content">
    <i class="bi bi-{{icon}}"></i>
    <span>{{message}}</span>
    <button class="notification-close">&times;</button>
  </div>
</div>"#;

const BOOKING_TEMPLATE: &str = r#"<div class="booking-modal" data-entity="{{id}}" style="position: fixed; top: 0; left: 0; width: 100%; height: 100%; background: rgba(0,0,0,0.5); display: flex; justify-content: center; align-items: center; z-index: 10000; opacity: {{opacity}}; transition: opacity {{transition}} ease;">
  <div class="modal-content" style="background: white; border-radius: 10px; max-width: 500px; width: 90%; max-height: 80vh; overflow-y: auto; transform: {{scale}}; transition: transform {{transition}} ease;">
    <div class="modal-header">
      <h3>Booking Confirmation</h3>
      <button class="modal-close">&times;</button>
    </div>
    <div class="modal-body">
      <div class="success-icon"><i class="bi bi-check-circle"></i></div>
      <h4>Thank you for your reservation!</h4>
      <p>We have received your booking request and will contact you shortly to confirm your table.</p>
      <div class="booking-details">
        <p><strong>Name:</strong> <span id="booking-name">{{name}}</span></p>
        <p><strong>Date:</strong> <span id="booking-date">{{date}}</span></p>
        <p><strong>Time:</strong> <span id="booking-time">{{time}}</span></p>
        <p><strong>Party Size:</strong> <span id="booking-people">{{people}}</span></p>
      </div>
    </div>
    <div class="modal-footer">
      <button class="btn btn-primary modal-close-btn">Close</button>
    </div>
  </div>
</div>"#;

const CHEF_TEMPLATE: &str = r#"<div class="chef-modal" data-entity="{{id}}" style="position: fixed; top: 0; left: 0; width: 100%; height: 100%; background: rgba(0,0,0,0.8); display: flex; justify-content: center; align-items: center; z-index: 10000; opacity: {{opacity}}; transition: opacity {{transition}} ease;">
  <div class="modal-content" style="background: white; border-radius: 15px; max-width: 500px; width: 90%; padding: 30px; transform: {{scale}}; transition: transform {{transition}} ease;">
    <div class="modal-header">
      <h3>Chef Details</h3>
      <button class="modal-close">&times;</button>
    </div>
    <div class="modal-body">
      <h4>{{name}}</h4>
      <p class="chef-role">{{role}}</p>
      <p>Meet our talented chef who brings years of culinary expertise to {{restaurant}}. With a passion for creating exceptional dining experiences, our chef ensures every dish is prepared with the finest ingredients and attention to detail.</p>
      <div class="chef-specialties">
        <h5>Specialties:</h5>
        <ul>
          {{#each specialties}}<li>{{this}}</li>{{/each}}
        </ul>
      </div>
    </div>
  </div>
</div>"#;

const TESTIMONIAL_TEMPLATE: &str = r#"<div class="swiper-slide">
  <div class="testimonial-item">
    <div class="row gy-4 justify-content-center">
      <div class="col-lg-6">
        <div class="testimonial-content">
          <p>
            <i class="bi bi-quote quote-icon-left"></i>
            <span>{{text}}</span>
            <i class="bi bi-quote quote-icon-right"></i>
          </p>
          <h3>{{name}}</h3>
          <h4>{{role}}</h4>
          <div class="stars">
            {{#each stars}}<i class="bi bi-star-fill"></i>{{/each}}
          </div>
        </div>
      </div>
    </div>
  </div>
</div>"#;

const SPECIALTIES: [&str; 4] = [
    "Signature Pasta Dishes",
    "Grilled Seafood",
    "Artisanal Desserts",
    "Seasonal Menu Creations",
];

/// Renders live overlays to HTML. User-supplied text is escaped.
pub struct MarkupRenderer {
    registry: Handlebars<'static>,
    restaurant: String,
    transition: String,
}

impl MarkupRenderer {
    pub fn new(restaurant: impl Into<String>, timings: &Timings) -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        for (name, template) in [
            ("notification", NOTIFICATION_TEMPLATE),
            ("booking_modal", BOOKING_TEMPLATE),
            ("chef_modal", CHEF_TEMPLATE),
            ("testimonial", TESTIMONIAL_TEMPLATE),
        ] {
            registry
                .register_template_string(name, template)
                .map_err(Box::new)?;
        }
        Ok(Self {
            registry,
            restaurant: restaurant.into(),
            transition: format!("{}s", timings.exit_ms as f64 / 1000.0),
        })
    }

    pub fn render(&self, transient: &Transient) -> Result<String, RenderError> {
        match transient.body() {
            TransientBody::Notification(notification) => {
                self.render_notification(transient.id(), notification, transient.phase())
            }
            TransientBody::Modal(content) => {
                self.render_modal(transient.id(), content, transient.phase())
            }
        }
    }

    pub fn render_notification(
        &self,
        id: EntityId,
        notification: &NotificationMessage,
        phase: Phase,
    ) -> Result<String, RenderError> {
        let transform = if phase == Phase::Visible {
            "translateX(0)"
        } else {
            "translateX(100%)"
        };
        let data = json!({
            "id": id,
            "kind": notification.kind.as_str(),
            "icon": notification.kind.icon(),
            "background": notification.kind.background(),
            "message": notification.message,
            "transform": transform,
            "transition": self.transition,
        });
        Ok(self.registry.render("notification", &data)?)
    }

    pub fn render_modal(
        &self,
        id: EntityId,
        content: &ModalContent,
        phase: Phase,
    ) -> Result<String, RenderError> {
        let shown = phase == Phase::Visible;
        let mut data = json!({
            "id": id,
            "opacity": if shown { "1" } else { "0" },
            "scale": if shown { "scale(1)" } else { "scale(0.8)" },
            "transition": self.transition,
        });
        let fields = match content {
            ModalContent::BookingConfirmation(details) => json!({
                "name": details.name,
                "date": details.date,
                "time": details.time,
                "people": details.people,
            }),
            ModalContent::ChefDetail(profile) => json!({
                "name": profile.name,
                "role": profile.role,
                "restaurant": self.restaurant,
                "specialties": SPECIALTIES,
            }),
        };
        if let (Some(target), Value::Object(extra)) = (data.as_object_mut(), fields) {
            target.extend(extra);
        }
        Ok(self.registry.render(content.label(), &data)?)
    }

    pub fn render_testimonial(&self, slide: &Testimonial) -> Result<String, RenderError> {
        let data = json!({
            "text": slide.text,
            "name": slide.name,
            "role": slide.role,
            "stars": vec![(); usize::from(slide.rating)],
        });
        Ok(self.registry.render("testimonial", &data)?)
    }
}

/// Human readable dump of a snapshot.
pub fn render_text(snapshot: &PageSnapshot) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "t = {} ms", snapshot.at_ms);
    for form in &snapshot.forms {
        let _ = writeln!(
            output,
            "Form {} [{}{}]",
            form.id,
            form.submit_label,
            if form.submit_disabled { ", disabled" } else { "" }
        );
        for field in snapshot.fields.iter().filter(|field| field.form == form.id) {
            let mut line = format!(
                "  - {} = {:?} ({})",
                field.name,
                field.value,
                field.state.as_str()
            );
            for message in &field.feedback {
                let _ = write!(line, " ! {message}");
            }
            if let Some(counter) = &field.counter {
                let _ = write!(line, " [{counter}]");
            }
            let _ = writeln!(output, "{line}");
        }
    }
    if snapshot.overlays.is_empty() {
        let _ = writeln!(output, "Overlays: none");
    } else {
        let _ = writeln!(output, "Overlays:");
        for overlay in &snapshot.overlays {
            let _ = writeln!(
                output,
                "  #{} {} [{}] {}",
                overlay.id, overlay.kind, overlay.phase, overlay.summary
            );
        }
    }
    for item in &snapshot.cart {
        let _ = writeln!(output, "Cart {}: {}", item.label, item.value);
    }
    if let Some(tab) = &snapshot.menu_tab {
        let _ = writeln!(output, "Menu [{tab}]: {}", snapshot.menu_shown.join(", "));
    }
    for counter in &snapshot.counters {
        let _ = writeln!(output, "Counter {}: {}", counter.label, counter.value);
    }
    if let Some(clock) = &snapshot.clock {
        let _ = writeln!(output, "{clock}");
    }
    if let Some(hero) = &snapshot.hero {
        let _ = writeln!(output, "Hero: {hero}");
    }
    for slide in &snapshot.testimonials {
        let _ = writeln!(output, "Testimonial {}: {}", slide.label, slide.value);
    }
    let _ = writeln!(
        output,
        "Header: {} (scroll {}){}",
        if snapshot.header_hidden { "hidden" } else { "shown" },
        snapshot.scroll_position,
        if snapshot.nav_open { ", nav open" } else { "" }
    );
    output
}

pub fn render_json(snapshot: &PageSnapshot) -> Value {
    serde_json::to_value(snapshot).unwrap_or(Value::Null)
}
