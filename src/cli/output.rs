//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::api::types::ClusterRecord;

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Cluster row for table display.
#[derive(Tabled)]
struct ClusterRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Alias")]
    alias: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the registered cluster list for display.
    #[must_use]
    pub fn format_clusters(&self, clusters: &[ClusterRecord]) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&ClustersJson::from(clusters)).unwrap_or_default()
            }
            OutputFormat::Text => Self::format_clusters_text(clusters),
        }
    }

    /// Formats the cluster list as text.
    fn format_clusters_text(clusters: &[ClusterRecord]) -> String {
        if clusters.is_empty() {
            return String::from("No clusters registered.\n");
        }

        let mut output = String::new();
        let rows: Vec<ClusterRow> = clusters
            .iter()
            .map(|c| ClusterRow {
                id: c.cluster_id,
                alias: c.alias_name.clone(),
            })
            .collect();

        let table = Table::new(rows).to_string();
        output.push_str(&table);
        output.push('\n');

        let _ = write!(output, "\n{} cluster(s) registered.\n", clusters.len());
        output
    }

    /// Formats the registration status of one alias.
    #[must_use]
    pub fn format_cluster_status(&self, alias: &str, record: Option<&ClusterRecord>) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&StatusJson::new(alias, record)).unwrap_or_default()
            }
            OutputFormat::Text => record.map_or_else(
                || format!("{} Cluster '{alias}' is not registered.\n", "✗".red()),
                |r| {
                    format!(
                        "{} Cluster '{alias}' is registered with id {}.\n",
                        "✓".green(),
                        r.cluster_id
                    )
                },
            ),
        }
    }

    /// Formats a success message.
    #[must_use]
    pub fn success(&self, message: &str) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({ "status": "success", "message": message });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => format!("{} {message}", "✓".green()),
        }
    }

    /// Formats an error message.
    #[must_use]
    pub fn error(&self, message: &str) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({ "status": "error", "message": message });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => format!("{} {message}", "✗".red()),
        }
    }

    /// Formats a warning message.
    #[must_use]
    pub fn warning(&self, message: &str) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({ "status": "warning", "message": message });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => format!("{} {message}", "⚠".yellow()),
        }
    }
}

// JSON serialization helpers

#[derive(serde::Serialize)]
struct ClustersJson {
    count: usize,
    clusters: Vec<ClusterJson>,
}

#[derive(serde::Serialize)]
struct ClusterJson {
    cluster_id: u64,
    alias_name: String,
}

impl From<&[ClusterRecord]> for ClustersJson {
    fn from(clusters: &[ClusterRecord]) -> Self {
        Self {
            count: clusters.len(),
            clusters: clusters
                .iter()
                .map(|c| ClusterJson {
                    cluster_id: c.cluster_id,
                    alias_name: c.alias_name.clone(),
                })
                .collect(),
        }
    }
}

#[derive(serde::Serialize)]
struct StatusJson {
    alias: String,
    registered: bool,
    cluster_id: Option<u64>,
}

impl StatusJson {
    fn new(alias: &str, record: Option<&ClusterRecord>) -> Self {
        Self {
            alias: alias.to_string(),
            registered: record.is_some(),
            cluster_id: record.map(|r| r.cluster_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, alias: &str) -> ClusterRecord {
        ClusterRecord {
            cluster_id: id,
            alias_name: alias.to_string(),
        }
    }

    #[test]
    fn test_empty_cluster_list_text() {
        let formatter = OutputFormatter::new(OutputFormat::Text);
        assert_eq!(formatter.format_clusters(&[]), "No clusters registered.\n");
    }

    #[test]
    fn test_cluster_list_json() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter.format_clusters(&[record(42, "prod-rac")]);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["clusters"][0]["cluster_id"], 42);
        assert_eq!(value["clusters"][0]["alias_name"], "prod-rac");
    }

    #[test]
    fn test_status_json_for_unregistered_alias() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter.format_cluster_status("prod-rac", None);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["registered"], false);
        assert_eq!(value["cluster_id"], serde_json::Value::Null);
    }
}
