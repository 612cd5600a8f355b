//! Output formatting and display utilities

use crate::error::{CleanerError, Result};
use crate::extractor::ExtractReport;
use crate::interests::CleanPlan;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Write `value` as pretty JSON to `path`.
pub fn write_json_file<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        if e.kind() == io::ErrorKind::PermissionDenied {
            CleanerError::PermissionDenied(format!("Cannot write {:?}: {}", path, e))
        } else {
            CleanerError::Io(e)
        }
    })?;
    serde_json::to_writer_pretty(&mut file, value)?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Operator-facing report lines, separate from the log stream.
pub struct OutputWriter<W: Write> {
    out: W,
}

impl OutputWriter<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> OutputWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn line(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{}", message)?;
        Ok(())
    }

    pub fn dry_run_summary(&mut self, plan: &CleanPlan) -> Result<()> {
        self.line("Dry run: no changes were made.")?;
        self.line("Summary:")?;
        self.line(&format!("  - Current interests: {}", plan.current.len()))?;
        self.line(&format!("  - Already disabled: {}", plan.disabled.len()))?;
        self.line(&format!("  - Total to disable: {}", plan.union.len()))
    }

    pub fn clean_summary(&mut self, plan: &CleanPlan) -> Result<()> {
        if plan.union.is_empty() {
            return self.line("Nothing to disable: the account has no interests.");
        }
        self.line(&format!(
            "Disabled {} interests ({} newly disabled).",
            plan.union.len(),
            plan.newly_disabled()
        ))
    }

    pub fn extract_summary(&mut self, report: &ExtractReport) -> Result<()> {
        self.line(&format!("Tokens saved to {}", report.path.display()))?;
        if report.bundle.auth_token.is_none() {
            self.line("Note: auth_token was not found; some operations may be rejected.")?;
        }
        if report.copied_to_clipboard {
            self.line("The config was also copied to the clipboard.")?;
        }
        Ok(())
    }

    pub fn sample_config_guidance(&mut self, path: &Path) -> Result<()> {
        self.line(&format!("Sample config created as {}", path.display()))?;
        self.line("Edit it with your tokens:")?;
        self.line("  - bearer_token: from the Authorization header (without 'Bearer ')")?;
        self.line("  - csrf_token: from the x-csrf-token header")?;
        self.line("  - ct0: from the ct0 cookie (same value as csrf_token)")?;
        self.line("  - auth_token: from the auth_token cookie")?;
        self.line("Rename it to config.json when ready, or run --extract instead.")
    }

    pub fn interests_example_guidance(&mut self, path: &Path) -> Result<()> {
        self.line(&format!("Created {}", path.display()))?;
        self.line(&format!(
            "Edit it, then run: xclean --add-interests {}",
            path.display()
        ))
    }
}
