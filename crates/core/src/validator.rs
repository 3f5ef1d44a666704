//! External conformance validation.
//!
//! The bundle is written to a temporary `.json` file and handed to the configured validator
//! program. Whatever the validator prints is returned verbatim; the exit status decides
//! validity. The temporary file is removed once the validator has exited, on every path.

use crate::config::ValidatorConfig;
use crate::{ConvertError, ConvertResult};
use fhir::{Bundle, BundleData};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::process::Command;

/// Outcome of one validator run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub stdout: String,
    pub stderr: String,
    /// Process exit code, or `-1` when the process was terminated by a signal.
    pub returncode: i32,
    pub valid: bool,
}

/// Run the external validator against `bundle`.
///
/// Blocks until the validator exits. Callers on an async runtime should run this on a
/// blocking thread.
///
/// # Errors
///
/// Returns [`ConvertError::TempFile`] if the bundle cannot be written out, and
/// [`ConvertError::ValidatorLaunch`] if the validator program cannot be started. A validator
/// that starts and reports problems is not an error; see [`ValidationReport::valid`].
pub fn validate_bundle(cfg: &ValidatorConfig, bundle: &BundleData) -> ConvertResult<ValidationReport> {
    validate_bundle_in(cfg, bundle, &std::env::temp_dir())
}

/// [`validate_bundle`], writing the temporary bundle file under `scratch_dir`.
///
/// # Errors
///
/// See [`validate_bundle`].
fn validate_bundle_in(
    cfg: &ValidatorConfig,
    bundle: &BundleData,
    scratch_dir: &Path,
) -> ConvertResult<ValidationReport> {
    let rendered = Bundle::render(bundle)?;

    let mut file = tempfile::Builder::new()
        .prefix("bundle-")
        .suffix(".json")
        .tempfile_in(scratch_dir)
        .map_err(ConvertError::TempFile)?;
    file.write_all(rendered.as_bytes())
        .and_then(|()| file.flush())
        .map_err(ConvertError::TempFile)?;
    // Close the handle so the validator sees a complete file; the path still cleans up on drop.
    let path = file.into_temp_path();

    tracing::debug!(
        program = cfg.program(),
        path = %path.display(),
        fhir_version = cfg.fhir_version(),
        "running validator"
    );

    let output = Command::new(cfg.program())
        .args(cfg.leading_args())
        .arg(&*path)
        .arg("-version")
        .arg(cfg.fhir_version())
        .output()
        .map_err(|source| ConvertError::ValidatorLaunch {
            program: cfg.program().to_string(),
            source,
        })?;

    if let Err(e) = path.close() {
        tracing::warn!(error = %e, "failed to remove temporary bundle file");
    }

    let returncode = output.status.code().unwrap_or(-1);
    let report = ValidationReport {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        returncode,
        valid: output.status.success(),
    };

    tracing::info!(
        returncode = report.returncode,
        valid = report.valid,
        "validator finished"
    );
    Ok(report)
}
