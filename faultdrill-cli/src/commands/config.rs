//! `faultdrill config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use faultdrill_core::config::FaultdrillConfig;
use faultdrill_core::error::FaultdrillError;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Label used when no file was given.
const DEFAULTS_SOURCE: &str = "(defaults + environment)";

/// Execute the `config` command against an already attempted load.
pub fn execute(
    args: ConfigArgs,
    config_path: Option<&Path>,
    loaded: Result<FaultdrillConfig, FaultdrillError>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let source = config_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| DEFAULTS_SOURCE.to_owned());

    match args.action {
        ConfigAction::Validate => execute_validate(source, loaded, writer),
        ConfigAction::Show { section } => execute_show(source, loaded?, section, writer),
    }
}

/// Report whether the configuration loaded and validated.
///
/// # Errors
///
/// Returns `CliError::Config` after rendering when the configuration is invalid.
fn execute_validate(
    source: String,
    loaded: Result<FaultdrillConfig, FaultdrillError>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(source = %source, "validating configuration");

    let report = match loaded {
        Ok(_) => ConfigValidationReport {
            source,
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source,
            valid: false,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }
    Ok(())
}

/// Display the effective configuration, optionally a single section.
fn execute_show(
    source: String,
    config: FaultdrillConfig,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config_toml = match section.as_deref() {
        None => toml::to_string_pretty(&config),
        Some("general") => toml::to_string_pretty(&config.general),
        Some("supervisor") => toml::to_string_pretty(&config.supervisor),
        Some("scenarios") => toml::to_string_pretty(&config.scenarios),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {} (expected: general, supervisor, scenarios)",
                other
            )));
        }
    }
    .map_err(|e| CliError::Command(format!("failed to serialize configuration: {}", e)))?;

    writer.render(&ConfigReport {
        source,
        section,
        config_toml,
    })
}

/// Configuration display report.
///
/// `config_toml` is only used for text rendering.
#[derive(Serialize)]
pub struct ConfigReport {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;
        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    pub source: String,
    pub valid: bool,
    /// Empty when valid
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }
        Ok(())
    }
}
