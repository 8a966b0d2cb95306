//! Emission of generated cases to disk.
//!
//! Each provider's cases are produced and written in parallel with rayon.
//! Every case owns its own derived seed stream, so the files are identical
//! to what a sequential run writes.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use ssz_static_core::{
    Encoder, GenerationReport, PartData, ProviderSummary, RunCoordinator, Ssz, TestCase,
    TestProvider,
};

use crate::paths::{atomic_write, atomic_write_json, case_dir, incomplete_marker_path, part_path};

/// What happened to one case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseOutcome {
    Written,
    /// The case directory already existed and `force` was off.
    Skipped,
    /// An earlier run left the case incomplete; it was written again.
    Regenerated,
}

/// Writes cases under an output root.
#[derive(Debug, Clone)]
pub struct CaseWriter {
    output_dir: PathBuf,
    force: bool,
    parallel: bool,
    encoder: Encoder<Ssz>,
}

impl CaseWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            force: false,
            parallel: true,
            encoder: Encoder::default(),
        }
    }

    /// Overwrite cases that already exist.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Decode every serialized case again and compare roots before writing.
    pub fn with_roundtrip_check(mut self, verify: bool) -> Self {
        self.encoder = self.encoder.with_roundtrip_check(verify);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Run every provider of `coordinator` and write its cases.
    pub fn run(&self, coordinator: &RunCoordinator) -> Result<GenerationReport> {
        let start = Instant::now();
        let mut report = GenerationReport::new(self.output_dir.display().to_string());
        report.skipped_providers = coordinator.skipped_providers();

        for provider in coordinator.providers() {
            report.providers.push(self.write_provider(&provider)?);
        }

        report.elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            written = report.cases_written(),
            skipped = report.cases_skipped(),
            regenerated = report.cases_regenerated(),
            elapsed_ms = report.elapsed_ms,
            "generation finished"
        );
        Ok(report)
    }

    /// Write all cases of one provider.
    pub fn write_provider(&self, provider: &TestProvider) -> Result<ProviderSummary> {
        let start = Instant::now();
        let enumerator = provider.cases()?;
        let types = enumerator.type_count();
        info!(provider = %provider.id(), types, "generating provider");

        let cases: Vec<TestCase> = enumerator.collect();
        let outcomes: Vec<CaseOutcome> = if self.parallel {
            cases
                .par_iter()
                .map(|case| self.write_case(case))
                .collect::<Result<_>>()?
        } else {
            cases
                .iter()
                .map(|case| self.write_case(case))
                .collect::<Result<_>>()?
        };

        let count = |wanted: CaseOutcome| outcomes.iter().filter(|o| **o == wanted).count() as u64;
        let summary = ProviderSummary {
            id: provider.id(),
            seed: provider.setting.seed,
            types,
            cases_written: count(CaseOutcome::Written),
            cases_skipped: count(CaseOutcome::Skipped),
            cases_regenerated: count(CaseOutcome::Regenerated),
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            provider = %summary.id,
            written = summary.cases_written,
            skipped = summary.cases_skipped,
            "provider done"
        );
        Ok(summary)
    }

    /// Produce and write one case.
    ///
    /// The case directory holds an `INCOMPLETE` marker while parts are being
    /// written. A failed case has its directory removed and the error is
    /// returned.
    pub fn write_case(&self, case: &TestCase) -> Result<CaseOutcome> {
        let dir = case_dir(&self.output_dir, case);
        let marker = incomplete_marker_path(&dir);

        let mut outcome = CaseOutcome::Written;
        if dir.exists() {
            if marker.exists() {
                warn!(case = %case.id(), "regenerating incomplete case");
                outcome = CaseOutcome::Regenerated;
            } else if !self.force {
                return Ok(CaseOutcome::Skipped);
            }
            std::fs::remove_dir_all(&dir)
                .with_context(|| format!("Failed to clear case directory {}", dir.display()))?;
        }

        atomic_write(&marker, b"")?;
        if let Err(err) = self.write_parts(case, &dir) {
            std::fs::remove_dir_all(&dir).ok();
            return Err(err);
        }
        std::fs::remove_file(&marker)
            .with_context(|| format!("Failed to remove marker {}", marker.display()))?;

        debug!(case = %case.id(), "wrote case");
        Ok(outcome)
    }

    fn write_parts(&self, case: &TestCase, dir: &Path) -> Result<()> {
        let encoded = case
            .produce_with(&self.encoder)
            .map_err(|e| anyhow!("Failed to produce {}: {}", case.id(), e))?;
        for part in encoded.parts() {
            let path = part_path(dir, &part);
            match &part.data {
                PartData::Data(json) => atomic_write_json(&path, json)?,
                PartData::Ssz(bytes) => atomic_write(&path, bytes)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssz_static_core::{Fork, GenerationSetting, RandomizationMode, RunConfig};
    use ssz_static_types::MINIMAL;
    use tempfile::TempDir;

    fn coordinator(mode: RandomizationMode) -> RunCoordinator {
        RunCoordinator::new(
            RunConfig::default()
                .with_forks(vec![Fork::Phase0])
                .with_settings(vec![GenerationSetting::new(1, MINIMAL, mode, false, 2)]),
        )
    }

    fn checkpoint_case(coordinator: &RunCoordinator) -> TestCase {
        coordinator
            .cases()
            .unwrap()
            .find(|case| case.handler == "Checkpoint")
            .unwrap()
    }

    #[test]
    fn test_write_case_layout() -> Result<()> {
        let out = TempDir::new()?;
        let writer = CaseWriter::new(out.path());
        let case = checkpoint_case(&coordinator(RandomizationMode::Zero));

        assert_eq!(writer.write_case(&case)?, CaseOutcome::Written);
        let dir = out
            .path()
            .join("minimal/phase0/ssz_static/Checkpoint/ssz_zero/case_0");
        assert_eq!(std::fs::read(dir.join("serialized.ssz"))?, vec![0u8; 40]);
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.join("value.json"))?)?;
        assert_eq!(value["epoch"], 0);
        assert!(dir.join("roots.json").exists());
        assert!(!dir.join("INCOMPLETE").exists());
        Ok(())
    }

    #[test]
    fn test_existing_case_skipped_unless_forced() -> Result<()> {
        let out = TempDir::new()?;
        let case = checkpoint_case(&coordinator(RandomizationMode::One));
        let writer = CaseWriter::new(out.path());
        writer.write_case(&case)?;

        let roots = case_dir(out.path(), &case).join("roots.json");
        std::fs::write(&roots, "stale")?;
        assert_eq!(writer.write_case(&case)?, CaseOutcome::Skipped);
        assert_eq!(std::fs::read_to_string(&roots)?, "stale");

        let forced = writer.clone().with_force(true);
        assert_eq!(forced.write_case(&case)?, CaseOutcome::Written);
        assert_ne!(std::fs::read_to_string(&roots)?, "stale");
        Ok(())
    }

    #[test]
    fn test_incomplete_case_regenerated() -> Result<()> {
        let out = TempDir::new()?;
        let case = checkpoint_case(&coordinator(RandomizationMode::Max));
        let dir = case_dir(out.path(), &case);
        std::fs::create_dir_all(&dir)?;
        std::fs::write(incomplete_marker_path(&dir), "")?;

        let writer = CaseWriter::new(out.path());
        assert_eq!(writer.write_case(&case)?, CaseOutcome::Regenerated);
        assert!(dir.join("value.json").exists());
        assert!(!incomplete_marker_path(&dir).exists());
        Ok(())
    }

    #[test]
    fn test_parallel_matches_sequential() -> Result<()> {
        let parallel_out = TempDir::new()?;
        let sequential_out = TempDir::new()?;
        let coordinator = coordinator(RandomizationMode::Random);

        let report = CaseWriter::new(parallel_out.path()).run(&coordinator)?;
        CaseWriter::new(sequential_out.path())
            .with_parallel(false)
            .run(&coordinator)?;

        assert_eq!(report.providers.len(), 1);
        assert_eq!(report.cases_written(), report.providers[0].types as u64 * 2);

        for case in coordinator.cases()? {
            let a = case_dir(parallel_out.path(), &case).join("serialized.ssz");
            let b = case_dir(sequential_out.path(), &case).join("serialized.ssz");
            assert_eq!(std::fs::read(a)?, std::fs::read(b)?, "{}", case.id());
        }
        Ok(())
    }
}
