//! `faultdrill list` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use faultdrill_core::types::{FaultKind, TerminationMode};
use faultdrill_scenarios::{Catalog, catalog};

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

pub fn execute(writer: &OutputWriter) -> Result<(), CliError> {
    let catalog = catalog::standard()?;
    info!(scenarios = catalog.len(), "listing catalog");
    writer.render(&CatalogReport::from_catalog(&catalog))
}

/// Catalog listing in declared order.
#[derive(Serialize)]
pub struct CatalogReport {
    pub scenarios: Vec<CatalogEntry>,
}

#[derive(Serialize)]
pub struct CatalogEntry {
    pub name: String,
    pub kind: FaultKind,
    pub termination: TerminationMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
}

impl CatalogReport {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            scenarios: catalog
                .specs()
                .into_iter()
                .map(|spec| CatalogEntry {
                    name: spec.name,
                    kind: spec.kind,
                    termination: spec.termination,
                    expected_output: spec.expected_output,
                })
                .collect(),
        }
    }
}

impl Render for CatalogReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "{:<20} {:<26} {:<10} {}",
            "SCENARIO".bold(),
            "KIND".bold(),
            "ENDS".bold(),
            "LAST MARKER".bold()
        )?;
        for entry in &self.scenarios {
            writeln!(
                w,
                "{:<20} {:<26} {:<10} {}",
                entry.name,
                entry.kind.as_str(),
                entry.termination.to_string(),
                entry.expected_output.as_deref().unwrap_or("-")
            )?;
        }
        Ok(())
    }
}
