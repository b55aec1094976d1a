//! Source discovery for the auditor
//!
//! Expands the files and directories given on the command line into the Rust
//! sources to audit.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use stylus_architect::{analyze_ink_usage, AuditResult};

/// Audit result for one file
#[derive(Debug, Clone)]
pub struct FileAudit {
    pub file_path: PathBuf,
    pub result: AuditResult,
}

fn is_skipped_dir(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| matches!(name, "target" | ".git" | ".cargo"))
}

fn is_rust_source(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("rs")
}

/// Collect `.rs` files. Files named explicitly are kept whatever their extension.
pub fn discover_sources(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();

    for root in paths {
        if root.is_file() {
            sources.push(root.clone());
            continue;
        }
        if !root.is_dir() {
            anyhow::bail!("{} does not exist", root.display());
        }

        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e.path()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_file() && is_rust_source(entry.path()) {
                sources.push(entry.into_path());
            }
        }
    }

    debug!(count = sources.len(), "sources discovered");
    Ok(sources)
}

/// Read and audit every discovered source.
pub fn audit_paths(paths: &[PathBuf]) -> Result<Vec<FileAudit>> {
    discover_sources(paths)?
        .into_iter()
        .map(|file_path| {
            let content = std::fs::read_to_string(&file_path)
                .with_context(|| format!("Failed to read {}", file_path.display()))?;
            Ok(FileAudit {
                result: analyze_ink_usage(&content),
                file_path,
            })
        })
        .collect()
}
