//! Output formatting for ssz-static-gen

use std::path::Path;

use anyhow::Result;

use ssz_static_core::GenerationReport;
use ssz_static_gen::paths::atomic_write_json;

/// Print a run report, human-readable or as JSON.
pub fn print_report(report: &GenerationReport, json_output: bool, verbose: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    println!("{}", format_report(report, verbose));
    Ok(())
}

/// Write the run report as pretty-printed JSON.
pub fn write_report(path: &Path, report: &GenerationReport) -> Result<()> {
    atomic_write_json(path, report)
}

pub fn format_report(report: &GenerationReport, verbose: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\x1b[32m✓ Generated {} cases\x1b[0m into {} ({} ms)\n",
        report.cases_written() + report.cases_regenerated(),
        report.output_dir,
        report.elapsed_ms
    ));
    if report.cases_skipped() > 0 {
        out.push_str(&format!(
            "  {} existing cases skipped (use --force to overwrite)\n",
            report.cases_skipped()
        ));
    }
    if report.cases_regenerated() > 0 {
        out.push_str(&format!(
            "  \x1b[33m{} incomplete cases regenerated\x1b[0m\n",
            report.cases_regenerated()
        ));
    }

    if verbose {
        out.push_str("\n\x1b[1mProviders:\x1b[0m\n");
        for provider in &report.providers {
            out.push_str(&format!(
                "  {:<36} seed {:>2}  {:>3} types  {:>5} written  {:>5} skipped\n",
                provider.id,
                provider.seed,
                provider.types,
                provider.cases_written + provider.cases_regenerated,
                provider.cases_skipped
            ));
        }
        if !report.skipped_providers.is_empty() {
            out.push_str(&format!(
                "  ({} providers filtered out)\n",
                report.skipped_providers.len()
            ));
        }
    }
    out
}
