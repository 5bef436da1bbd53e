//! `intake upload <manifest> --dest <dir>` – run one batch through the pipeline.

use anyhow::{Context, Result};
use clap::Args;
use intake_core::config::IntakeConfig;
use intake_core::{BatchReport, UploadBatch, UploadPolicy, Uploader};
use std::path::PathBuf;

#[derive(Debug, Clone, Args)]
pub struct UploadArgs {
    /// JSON manifest: one descriptor, a list of them, or parallel
    /// name/type/tmp_name/error/size arrays.
    pub manifest: PathBuf,

    /// Destination directory (must exist and be writable).
    #[arg(long, value_name = "DIR")]
    pub dest: PathBuf,

    /// Per-file maximum such as 500k or 2M; overrides the config file.
    #[arg(long, value_name = "SIZE")]
    pub max_size: Option<String>,

    /// Skip MIME type checks; untrusted names get the quarantine suffix.
    #[arg(long)]
    pub allow_all_types: bool,

    /// Quarantine suffix (implies --allow-all-types). Empty disables suffixing.
    #[arg(long, value_name = "SUFFIX")]
    pub suffix: Option<String>,

    /// Replace existing files instead of storing as name_1.ext, name_2.ext, ...
    #[arg(long)]
    pub keep_duplicate_names: bool,

    /// Report transport error 3 with the old two-line message sequence.
    #[arg(long)]
    pub legacy_partial_fallthrough: bool,
}

/// Config file values with command-line flags layered on top.
pub fn apply_overrides(cfg: &IntakeConfig, args: &UploadArgs) -> IntakeConfig {
    let mut cfg = cfg.clone();
    if let Some(max) = &args.max_size {
        cfg.max_size = max.clone();
    }
    if args.allow_all_types || args.suffix.is_some() {
        cfg.allow_all_types = true;
    }
    if args.suffix.is_some() {
        cfg.quarantine_suffix = args.suffix.clone();
    }
    if args.keep_duplicate_names {
        cfg.rename_duplicates = false;
    }
    if args.legacy_partial_fallthrough {
        cfg.legacy_partial_fallthrough = true;
    }
    cfg
}

/// Builds the policy, reads the manifest and processes the batch.
pub fn execute_upload(cfg: &IntakeConfig, args: &UploadArgs) -> Result<BatchReport> {
    let cfg = apply_overrides(cfg, args);
    let ceiling = cfg.ceiling()?;
    let policy = UploadPolicy::from_config(&args.dest, &cfg, ceiling.as_ref())?;

    let data = std::fs::read_to_string(&args.manifest)
        .with_context(|| format!("read manifest: {}", args.manifest.display()))?;
    let batch: UploadBatch = serde_json::from_str(&data)
        .with_context(|| format!("parse manifest: {}", args.manifest.display()))?;

    Ok(Uploader::new(policy).upload(&batch))
}

pub fn run_upload(cfg: &IntakeConfig, args: &UploadArgs) -> Result<()> {
    let report = execute_upload(cfg, args)?;
    print!("{}", report.messages);
    Ok(())
}
