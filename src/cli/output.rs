//! Output formatting for the release descriptor
//!
//! The staging orchestrator reads the release descriptor as YAML from stdout.
//! JSON is available for tooling that inspects a staged app by hand.

use anyhow::{Context, Result};

use crate::staging_info::ReleaseInfo;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// YAML, as expected by the staging orchestrator
    Yaml,
    /// JSON format (machine-readable)
    Json,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a release descriptor; the result always ends with a newline
    pub fn format_release(&self, release: &ReleaseInfo) -> Result<String> {
        match self.format {
            OutputFormat::Yaml => {
                serde_yaml::to_string(release).context("Failed to serialize release to YAML")
            }
            OutputFormat::Json => serde_json::to_string_pretty(release)
                .map(|json| format!("{}\n", json))
                .context("Failed to serialize release to JSON"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_release_yaml() {
        let formatter = OutputFormatter::new(OutputFormat::Yaml);
        let output = formatter
            .format_release(&ReleaseInfo::web("bundle exec rails s"))
            .unwrap();

        assert_eq!(
            output,
            "default_process_types:\n  web: bundle exec rails s\n"
        );
    }

    #[test]
    fn test_format_release_json() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter
            .format_release(&ReleaseInfo::web("node server.js"))
            .unwrap();

        assert!(output.ends_with('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["default_process_types"]["web"], "node server.js");
    }

    #[test]
    fn test_yaml_output_round_trips_special_characters() {
        let command = "sh -c 'echo: $PORT' # not a comment";
        let formatter = OutputFormatter::new(OutputFormat::Yaml);
        let output = formatter.format_release(&ReleaseInfo::web(command)).unwrap();

        let parsed: ReleaseInfo = serde_yaml::from_str(&output).unwrap();
        assert_eq!(parsed.web_command(), Some(command));
    }
}
