//! Report types for generation runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of a complete generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: u64,
    /// Root output directory.
    pub output_dir: String,
    /// Per-provider results, in run order.
    pub providers: Vec<ProviderSummary>,
    /// Providers excluded by the preset or fork filter.
    pub skipped_providers: Vec<String>,
}

impl GenerationReport {
    pub fn new(output_dir: impl Into<String>) -> Self {
        Self {
            started_at: Utc::now(),
            elapsed_ms: 0,
            output_dir: output_dir.into(),
            providers: Vec::new(),
            skipped_providers: Vec::new(),
        }
    }

    pub fn cases_written(&self) -> u64 {
        self.providers.iter().map(|p| p.cases_written).sum()
    }

    pub fn cases_skipped(&self) -> u64 {
        self.providers.iter().map(|p| p.cases_skipped).sum()
    }

    pub fn cases_regenerated(&self) -> u64 {
        self.providers.iter().map(|p| p.cases_regenerated).sum()
    }
}

/// Outcome of one provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSummary {
    /// Provider id (`<preset>/<fork>/<suite>`).
    pub id: String,
    pub seed: u64,
    /// Number of catalog types enumerated.
    pub types: usize,
    /// Cases written in this run.
    pub cases_written: u64,
    /// Cases already on disk and left untouched.
    pub cases_skipped: u64,
    /// Cases found incomplete and written again.
    pub cases_regenerated: u64,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let mut report = GenerationReport::new("out");
        report.providers.push(ProviderSummary {
            cases_written: 3,
            cases_skipped: 1,
            ..Default::default()
        });
        report.providers.push(ProviderSummary {
            cases_written: 2,
            cases_regenerated: 1,
            ..Default::default()
        });
        assert_eq!(report.cases_written(), 5);
        assert_eq!(report.cases_skipped(), 1);
        assert_eq!(report.cases_regenerated(), 1);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["output_dir"], "out");
        assert_eq!(json["providers"].as_array().unwrap().len(), 2);
    }
}
