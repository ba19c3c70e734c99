use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use component_site::{SimulationScript, render_modal, render_notification, run_simulation};
use serde_json::{Value, json};
use site_spec::{FieldValidator, SiteConfig, ValidatedFields, render_json, render_text};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Restaurant site interaction CLI",
    long_about = "Validates booking input, replays scripted visitor sessions and renders overlays for the restaurant site"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a `{ field: value }` JSON file against the field rules.
    Validate {
        /// JSON file with the values to check.
        #[arg(long, value_name = "VALUES")]
        values: PathBuf,
        /// Optional site config; its allow-list decides which fields are checked.
        #[arg(long, value_name = "CONFIG")]
        config: Option<PathBuf>,
        /// Reference date for the future-date rule (defaults to today).
        #[arg(long, value_name = "YYYY-MM-DD")]
        today: Option<chrono::NaiveDate>,
    },
    /// Replay a scripted visitor session and print page snapshots.
    Simulate {
        /// Path to the site config JSON.
        #[arg(long, value_name = "CONFIG")]
        config: PathBuf,
        /// Script JSON: `{ "steps": [...], "until_ms": n }`.
        #[arg(long, value_name = "SCRIPT")]
        script: PathBuf,
        /// Wall-clock time at t = 0, e.g. 2026-10-19T18:00:00.
        #[arg(long, value_name = "DATETIME")]
        start: Option<NaiveDateTime>,
        /// Overrides the script's final clock target.
        #[arg(long, value_name = "MS")]
        until_ms: Option<u64>,
        /// Only print the final snapshot.
        #[arg(long)]
        last: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Render a notification or modal to HTML.
    Render {
        #[command(subcommand)]
        target: RenderTarget,
    },
    /// Print the JSON schema of the site config.
    Schema,
}

#[derive(Subcommand)]
enum RenderTarget {
    Notification {
        #[arg(long)]
        message: String,
        /// `info` or `success`.
        #[arg(long, default_value = "info")]
        kind: String,
        #[arg(long, value_name = "CONFIG")]
        config: Option<PathBuf>,
    },
    Modal {
        /// Modal JSON, e.g. `{ "modal": "chef_detail", "name": ..., "role": ... }`.
        #[arg(long, value_name = "MODAL")]
        modal: PathBuf,
        #[arg(long, value_name = "CONFIG")]
        config: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Validate {
            values,
            config,
            today,
        } => run_validate(values, config, today),
        Command::Simulate {
            config,
            script,
            start,
            until_ms,
            last,
            format,
        } => run_simulate(config, script, start, until_ms, last, format),
        Command::Render { target } => run_render(target),
        Command::Schema => {
            let schema = schemars::schema_for!(SiteConfig);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

fn load_config(path: &Path) -> CliResult<SiteConfig> {
    let contents = fs::read_to_string(path)?;
    Ok(SiteConfig::from_json(&contents)?)
}

/// Wraps an optional config file in the component's `{ "site": ... }` envelope.
fn component_config(path: Option<&Path>) -> CliResult<String> {
    match path {
        Some(path) => {
            let site: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
            Ok(json!({ "site": site }).to_string())
        }
        None => Ok(String::new()),
    }
}

fn run_validate(
    values_path: PathBuf,
    config: Option<PathBuf>,
    today: Option<chrono::NaiveDate>,
) -> CliResult<()> {
    let values: serde_json::Map<String, Value> =
        serde_json::from_str(&fs::read_to_string(&values_path)?)?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let allow = match &config {
        Some(path) => ValidatedFields::new(&load_config(path)?.validated_fields)?,
        None => ValidatedFields::builtin(),
    };
    let validator = FieldValidator::new(allow);

    let mut failures = 0;
    for (name, value) in &values {
        let value = match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        let outcome = validator.check(name, &value, today);
        match outcome.message {
            Some(message) if !outcome.valid => {
                failures += 1;
                println!("  {} - {}", name, message);
            }
            _ => debug!(field = %name, "field passed"),
        }
    }

    if failures == 0 {
        println!("Validation result: valid");
        Ok(())
    } else {
        println!("Validation result: invalid ({} field(s))", failures);
        Err("validation failed".into())
    }
}

fn run_simulate(
    config_path: PathBuf,
    script_path: PathBuf,
    start: Option<NaiveDateTime>,
    until_ms: Option<u64>,
    last: bool,
    format: OutputFormat,
) -> CliResult<()> {
    let site = load_config(&config_path)?;
    let mut script: SimulationScript = serde_json::from_str(&fs::read_to_string(&script_path)?)?;
    if until_ms.is_some() {
        script.until_ms = until_ms;
    }
    let start = start.unwrap_or_else(|| Local::now().naive_local());
    info!(steps = script.steps.len(), "replaying script");

    let snapshots = run_simulation(site, start, &script)?;
    let shown = if last {
        &snapshots[snapshots.len().saturating_sub(1)..]
    } else {
        &snapshots[..]
    };
    match format {
        OutputFormat::Text => {
            for snapshot in shown {
                println!("{}", render_text(snapshot));
            }
        }
        OutputFormat::Json => {
            let values = shown.iter().map(render_json).collect::<Vec<_>>();
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
    }
    Ok(())
}

fn run_render(target: RenderTarget) -> CliResult<()> {
    let output = match target {
        RenderTarget::Notification {
            message,
            kind,
            config,
        } => render_notification(&component_config(config.as_deref())?, &message, &kind),
        RenderTarget::Modal { modal, config } => {
            let modal_json = fs::read_to_string(modal)?;
            render_modal(&component_config(config.as_deref())?, &modal_json)
        }
    };
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&output)
        && let Some(Value::String(error)) = map.get("error")
    {
        return Err(error.clone().into());
    }
    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use assert_fs::prelude::*;
    use serde_json::Value;
    use tempfile::TempDir;

    const SITE: &str = include_str!("../../site-spec/tests/fixtures/site.json");

    fn bin() -> Command {
        Command::cargo_bin("restaurant-site").expect("binary")
    }

    #[test]
    fn validate_reports_each_bad_field() -> Result<(), Box<dyn std::error::Error>> {
        let temp = assert_fs::TempDir::new()?;
        let values = temp.child("values.json");
        values.write_str(r#"{ "name": "A", "email": "ann@example.com", "people": 0 }"#)?;

        let output = bin()
            .arg("validate")
            .arg("--values")
            .arg(values.path())
            .arg("--today")
            .arg("2026-10-19")
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        let stdout = String::from_utf8(output)?;
        assert!(stdout.contains("name - Name must be at least 2 characters long"));
        assert!(stdout.contains("people - Please enter between 1 and 20 people"));
        assert!(!stdout.contains("email -"));
        assert!(stdout.contains("invalid (2 field(s))"));
        Ok(())
    }

    #[test]
    fn validate_honours_config_allow_list() -> Result<(), Box<dyn std::error::Error>> {
        let temp = assert_fs::TempDir::new()?;
        let config = temp.child("site.json");
        config.write_str(r#"{ "restaurant": "Ann's", "validated_fields": ["email"] }"#)?;
        let values = temp.child("values.json");
        values.write_str(r#"{ "name": "A", "email": "ann@example.com" }"#)?;

        let output = bin()
            .arg("validate")
            .arg("--values")
            .arg(values.path())
            .arg("--config")
            .arg(config.path())
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        assert!(String::from_utf8(output)?.contains("Validation result: valid"));
        Ok(())
    }

    #[test]
    fn simulate_prints_final_snapshot_as_json() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let config = dir.path().join("site.json");
        std::fs::write(&config, SITE)?;
        let script = dir.path().join("script.json");
        std::fs::write(
            &script,
            r#"{ "steps": [ { "at_ms": 0, "event": "chef_click", "chef": "Walter White" } ] }"#,
        )?;

        let output = bin()
            .arg("simulate")
            .arg("--config")
            .arg(&config)
            .arg("--script")
            .arg(&script)
            .arg("--start")
            .arg("2026-10-19T18:00:00")
            .arg("--until-ms")
            .arg("1000")
            .arg("--last")
            .arg("--format")
            .arg("json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let snapshots: Value = serde_json::from_slice(&output)?;
        let last = &snapshots[0];
        assert_eq!(last["at_ms"], 1000);
        assert_eq!(last["overlays"][0]["kind"], "chef_modal");
        assert_eq!(last["overlays"][0]["phase"], "visible");
        assert_eq!(last["overlays"][1]["summary"], "Welcome to Ann's Restaurant! 🍽️");
        assert_eq!(last["clock"], "Current Time: 06:00 PM");
        Ok(())
    }

    #[test]
    fn simulate_text_lists_overlays() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let config = dir.path().join("site.json");
        std::fs::write(&config, SITE)?;
        let script = dir.path().join("script.json");
        std::fs::write(&script, r#"{ "steps": [], "until_ms": 0 }"#)?;

        let output = bin()
            .args(["simulate", "--start", "2026-10-19T18:00:00", "--config"])
            .arg(&config)
            .arg("--script")
            .arg(&script)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let stdout = String::from_utf8(output)?;
        assert!(stdout.starts_with("t = 0 ms"));
        assert!(stdout.contains("Overlays: none"));
        assert!(stdout.contains("Form booking [Book a Table]"));
        assert!(stdout.contains("Form contact [Send Message]"));
        Ok(())
    }

    #[test]
    fn render_notification_prints_markup() -> Result<(), Box<dyn std::error::Error>> {
        let output = bin()
            .args(["render", "notification", "--message", "Saved", "--kind", "success"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let stdout = String::from_utf8(output)?;
        assert!(stdout.contains("notification-success"));
        assert!(stdout.contains("<span>Saved</span>"));
        Ok(())
    }

    #[test]
    fn render_modal_rejects_unknown_kind() -> Result<(), Box<dyn std::error::Error>> {
        let temp = assert_fs::TempDir::new()?;
        let modal = temp.child("modal.json");
        modal.write_str(r#"{ "modal": "menu" }"#)?;
        bin()
            .args(["render", "modal", "--modal"])
            .arg(modal.path())
            .assert()
            .failure();
        Ok(())
    }

    #[test]
    fn schema_describes_site_config() -> Result<(), Box<dyn std::error::Error>> {
        let output = bin().arg("schema").assert().success().get_output().stdout.clone();
        let schema: Value = serde_json::from_slice(&output)?;
        assert_eq!(schema["title"], "SiteConfig");
        assert!(schema["properties"]["restaurant"].is_object());
        Ok(())
    }
}
