use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::debug;

use site_spec::{
    ConfigError, EntityId, Instant, MarkupRenderer, ModalContent, NotificationKind,
    NotificationMessage, PageSnapshot, Phase, RenderError, ScriptStep, SiteConfig, SiteController,
    SiteEvent, render_json,
};

const DEFAULT_SITE: &str = include_str!("../../site-spec/tests/fixtures/site.json");

#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("failed to parse config: {0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to parse input: {0}")]
    InputParse(#[source] serde_json::Error),
    #[error("form '{0}' is not available")]
    FormUnavailable(String),
    #[error("invalid start time '{0}'")]
    StartTime(String),
    #[error("json encode error: {0}")]
    JsonEncode(#[source] serde_json::Error),
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
}

#[derive(Debug, Deserialize, Serialize, Default)]
struct ComponentConfig {
    #[serde(default)]
    site: Option<SiteConfig>,
}

/// Scripted session: events in time order, then an optional final clock target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationScript {
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until_ms: Option<u64>,
}

fn load_site_config(config_json: &str) -> Result<SiteConfig, ComponentError> {
    let config: ComponentConfig = if config_json.trim().is_empty() {
        ComponentConfig::default()
    } else {
        serde_json::from_str(config_json).map_err(ComponentError::ConfigParse)?
    };

    match config.site {
        Some(site) => {
            site.check()?;
            Ok(site)
        }
        None => Ok(SiteConfig::from_json(DEFAULT_SITE)?),
    }
}

fn parse_context(ctx_json: &str) -> Value {
    serde_json::from_str(ctx_json).unwrap_or_else(|_| Value::Object(Map::new()))
}

/// Wall-clock start of the session: `ctx.now` when given, local time otherwise.
fn resolve_start(ctx: &Value) -> Result<NaiveDateTime, ComponentError> {
    match ctx.get("now").and_then(Value::as_str) {
        Some(raw) => raw
            .parse::<NaiveDateTime>()
            .map_err(|_| ComponentError::StartTime(raw.to_string())),
        None => Ok(Local::now().naive_local()),
    }
}

fn respond(result: Result<Value, ComponentError>) -> String {
    match result {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|error| {
            json!({"error": format!("json encode: {}", error)}).to_string()
        }),
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

fn respond_string(result: Result<String, ComponentError>) -> String {
    match result {
        Ok(value) => value,
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

fn build_controller(config_json: &str, ctx_json: &str) -> Result<SiteController, ComponentError> {
    let site = load_site_config(config_json)?;
    let start = resolve_start(&parse_context(ctx_json))?;
    Ok(SiteController::new(site, start)?)
}

pub fn describe(config_json: &str) -> String {
    respond(
        load_site_config(config_json)
            .and_then(|site| serde_json::to_value(site).map_err(ComponentError::JsonEncode)),
    )
}

/// Checks one value against the rule for `field`, honouring the
/// configured allow-list.
pub fn validate_field(config_json: &str, ctx_json: &str, field: &str, value: &str) -> String {
    let result = build_controller(config_json, ctx_json).and_then(|controller| {
        let outcome = controller
            .validator()
            .check(field, value, controller.today());
        serde_json::to_value(outcome).map_err(ComponentError::JsonEncode)
    });
    respond(result)
}

/// Fills `form_id` from a `{ field: value }` map and validates it.
pub fn validate_form(form_id: &str, config_json: &str, ctx_json: &str, values_json: &str) -> String {
    respond(validate_form_value(form_id, config_json, ctx_json, values_json))
}

fn validate_form_value(
    form_id: &str,
    config_json: &str,
    ctx_json: &str,
    values_json: &str,
) -> Result<Value, ComponentError> {
    let mut controller = build_controller(config_json, ctx_json)?;
    if controller.page().form(form_id).is_none() {
        return Err(ComponentError::FormUnavailable(form_id.to_string()));
    }
    let values: Map<String, Value> =
        serde_json::from_str(values_json).map_err(ComponentError::InputParse)?;
    for (field, value) in values {
        let value = match value {
            Value::String(text) => text,
            other => other.to_string(),
        };
        controller.handle(SiteEvent::Input {
            form: form_id.to_string(),
            field,
            value,
        });
    }

    let valid = controller.validate_form(form_id);
    let page = controller.page();
    let fields = page
        .required_fields(form_id)
        .into_iter()
        .filter_map(|id| page.field(id))
        .map(|field| {
            json!({
                "name": field.name,
                "valid": field.feedback.is_empty(),
                "message": field.feedback.first(),
            })
        })
        .collect::<Vec<_>>();
    debug!(form = form_id, valid, "form validated");
    Ok(json!({ "form_id": form_id, "valid": valid, "fields": fields }))
}

pub fn render_notification(config_json: &str, message: &str, kind: &str) -> String {
    let result = load_site_config(config_json).and_then(|site| {
        let kind = match kind {
            "success" => NotificationKind::Success,
            _ => NotificationKind::Info,
        };
        let renderer = MarkupRenderer::new(site.restaurant.clone(), &site.timings)?;
        Ok(renderer.render_notification(
            EntityId::new(1),
            &NotificationMessage::new(message, kind),
            Phase::Visible,
        )?)
    });
    respond_string(result)
}

/// Renders a modal described as `{"modal": "booking_confirmation", ...}`
/// or `{"modal": "chef_detail", ...}`.
pub fn render_modal(config_json: &str, modal_json: &str) -> String {
    let result = load_site_config(config_json).and_then(|site| {
        let content: ModalContent =
            serde_json::from_str(modal_json).map_err(ComponentError::InputParse)?;
        let renderer = MarkupRenderer::new(site.restaurant.clone(), &site.timings)?;
        Ok(renderer.render_modal(EntityId::new(1), &content, Phase::Visible)?)
    });
    respond_string(result)
}

/// Plays a script and returns a snapshot after every step plus a final one.
pub fn run_simulation(
    site: SiteConfig,
    start: NaiveDateTime,
    script: &SimulationScript,
) -> Result<Vec<PageSnapshot>, ComponentError> {
    let mut controller = SiteController::new(site, start)?;
    let mut snapshots = Vec::with_capacity(script.steps.len() + 1);
    for step in &script.steps {
        controller.run_script(std::slice::from_ref(step));
        snapshots.push(PageSnapshot::capture(&controller));
    }
    if let Some(until) = script.until_ms {
        controller.advance_to(Instant::from_millis(until));
    }
    snapshots.push(PageSnapshot::capture(&controller));
    Ok(snapshots)
}

pub fn simulate(config_json: &str, ctx_json: &str, script_json: &str) -> String {
    let result = load_site_config(config_json).and_then(|site| {
        let start = resolve_start(&parse_context(ctx_json))?;
        let script: SimulationScript =
            serde_json::from_str(script_json).map_err(ComponentError::InputParse)?;
        let snapshots = run_simulation(site, start, &script)?;
        Ok(json!({
            "snapshots": snapshots.iter().map(render_json).collect::<Vec<_>>(),
        }))
    });
    respond(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTX: &str = r#"{ "now": "2026-10-19T18:00:00" }"#;

    #[test]
    fn describe_returns_default_site() {
        let json: Value = serde_json::from_str(&describe("")).expect("json");
        assert_eq!(json["restaurant"], "Ann's Restaurant");
        assert_eq!(json["forms"][0]["id"], "booking");
    }

    #[test]
    fn validate_field_reports_message() {
        let json: Value =
            serde_json::from_str(&validate_field("", CTX, "people", "21")).expect("json");
        assert_eq!(json["valid"], false);
        assert_eq!(json["message"], "Please enter between 1 and 20 people");

        let json: Value =
            serde_json::from_str(&validate_field("", CTX, "date", "2026-10-18")).expect("json");
        assert_eq!(json["valid"], false);
    }

    #[test]
    fn validate_form_lists_required_fields() {
        let values = r#"{
            "name": "Ann",
            "email": "ann@example.com",
            "phone": "5550102030",
            "date": "2026-10-20",
            "time": "19:00",
            "people": 4
        }"#;
        let json: Value =
            serde_json::from_str(&validate_form("booking", "", CTX, values)).expect("json");
        assert_eq!(json["valid"], true);
        assert_eq!(json["fields"].as_array().unwrap().len(), 6);

        let json: Value =
            serde_json::from_str(&validate_form("booking", "", CTX, r#"{"name": "A"}"#))
                .expect("json");
        assert_eq!(json["valid"], false);
        assert_eq!(json["fields"][0]["message"], "Name must be at least 2 characters long");
    }

    #[test]
    fn unknown_form_is_an_error() {
        let json: Value =
            serde_json::from_str(&validate_form("catering", "", CTX, "{}")).expect("json");
        assert_eq!(json["error"], "form 'catering' is not available");
    }

    #[test]
    fn bad_start_time_is_reported() {
        let json: Value = serde_json::from_str(&validate_field(
            "",
            r#"{ "now": "yesterday" }"#,
            "name",
            "Ann",
        ))
        .expect("json");
        assert_eq!(json["error"], "invalid start time 'yesterday'");
    }

    #[test]
    fn render_notification_outputs_markup() {
        let html = render_notification("", "Saved", "success");
        assert!(html.starts_with("<div class=\"notification notification-success\""));
        assert!(html.contains("<span>Saved</span>"));
    }

    #[test]
    fn render_modal_accepts_tagged_content() {
        let html = render_modal(
            "",
            r#"{ "modal": "chef_detail", "name": "Walter White", "role": "Master Chef" }"#,
        );
        assert!(html.contains("<h4>Walter White</h4>"));
        let error: Value =
            serde_json::from_str(&render_modal("", r#"{ "modal": "menu" }"#)).expect("json");
        assert!(error["error"].as_str().unwrap().starts_with("failed to parse input"));
    }

    #[test]
    fn simulate_returns_snapshot_per_step() {
        let script = r#"{
            "steps": [
                { "at_ms": 0, "event": "add_to_cart", "item": "Magnam Tiste" },
                { "at_ms": 100, "event": "scroll", "offset": 400 }
            ],
            "until_ms": 5300
        }"#;
        let json: Value = serde_json::from_str(&simulate("", CTX, script)).expect("json");
        let snapshots = json["snapshots"].as_array().expect("snapshots");
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[0]["overlays"][0]["summary"], "Magnam Tiste added to cart!");
        assert_eq!(snapshots[1]["header_hidden"], true);
        assert_eq!(snapshots[2]["at_ms"], 5300);
        // Cart toast is gone; the welcome toast from t = 1s is still up.
        assert_eq!(snapshots[2]["overlays"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn inline_site_config_is_checked() {
        let config = r#"{ "site": { "restaurant": "R", "validated_fields": ["na[me"] } }"#;
        let json: Value =
            serde_json::from_str(&validate_field(config, CTX, "name", "A")).expect("json");
        assert!(
            json["error"]
                .as_str()
                .unwrap()
                .starts_with("invalid validated field pattern")
        );
    }
}
