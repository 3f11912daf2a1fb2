//! CLI output formatting for composed ads and layout listings.
//!
//! # Output Format
//!
//! ## Compose
//!
//! ```text
//! out/ad.png (1080x1080)
//!     SHA-256: 3b1f…
//! ```
//!
//! ## Batch
//!
//! ```text
//! 001 out/a.png (1080x1080)
//!     SHA-256: 3b1f…
//! 002 jobs/b.json
//!     Error: image not found: scenes/missing.png
//!
//! Composed 1 ad, 1 failed
//! ```
//!
//! ## Layouts
//!
//! ```text
//! Hero Product with Stat Overlay
//!     Product centered and prominent, with key stat/headline overlaid at bottom
//!     product:  x 0.15-0.85  y 0.10-0.70
//!     headline: x 0.05-0.65  y 0.68-0.82
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::layout::{LayoutSpec, LayoutZone};
use crate::types::ImageAsset;
use sha2::{Digest, Sha256};
use std::io;
use std::path::{Path, PathBuf};

/// Outcome of one job in a batch run.
#[derive(Debug)]
pub enum JobOutcome {
    Composed { asset: ImageAsset, digest: String },
    Failed { job: PathBuf, error: String },
}

/// Hex SHA-256 of a file's contents.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{:x}", digest))
}

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn pluralize(count: usize, singular: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {singular}s")
    }
}

fn asset_line(asset: &ImageAsset) -> String {
    format!(
        "{} ({}x{})",
        asset.path.display(),
        asset.width,
        asset.height
    )
}

// ============================================================================
// compose
// ============================================================================

pub fn format_compose_result(asset: &ImageAsset, digest: &str) -> Vec<String> {
    vec![asset_line(asset), format!("    SHA-256: {digest}")]
}

pub fn print_compose_result(asset: &ImageAsset, digest: &str) {
    for line in format_compose_result(asset, digest) {
        println!("{}", line);
    }
}

// ============================================================================
// batch
// ============================================================================

/// Format batch results in job order, followed by a summary line.
pub fn format_batch_summary(outcomes: &[JobOutcome]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut composed = 0;
    let mut failed = 0;

    for (i, outcome) in outcomes.iter().enumerate() {
        let idx = format_index(i + 1);
        match outcome {
            JobOutcome::Composed { asset, digest } => {
                composed += 1;
                lines.push(format!("{} {}", idx, asset_line(asset)));
                lines.push(format!("    SHA-256: {digest}"));
            }
            JobOutcome::Failed { job, error } => {
                failed += 1;
                lines.push(format!("{} {}", idx, job.display()));
                lines.push(format!("    Error: {error}"));
            }
        }
    }

    lines.push(String::new());
    let mut summary = format!("Composed {}", pluralize(composed, "ad"));
    if failed > 0 {
        summary.push_str(&format!(", {failed} failed"));
    }
    lines.push(summary);
    lines
}

pub fn print_batch_summary(outcomes: &[JobOutcome]) {
    for line in format_batch_summary(outcomes) {
        println!("{}", line);
    }
}

// ============================================================================
// layouts
// ============================================================================

fn zone_line(label: &str, zone: &LayoutZone) -> String {
    format!(
        "    {:<10}x {:.2}-{:.2}  y {:.2}-{:.2}",
        format!("{label}:"),
        zone.x_start,
        zone.x_end,
        zone.y_start,
        zone.y_end
    )
}

/// Format every archetype with its description and zone fractions.
pub fn format_layouts(specs: &[LayoutSpec]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, spec) in specs.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(spec.name.to_string());
        lines.push(format!("    {}", spec.description));
        lines.push(zone_line("product", &spec.product_zone));
        lines.push(zone_line("headline", &spec.headline_zone));
        lines.push(zone_line("body", &spec.body_zone));
        lines.push(zone_line("cta", &spec.cta_zone));
        lines.push(zone_line("logo", &spec.logo_zone));
        if let Some(zone) = &spec.secondary_logo_zone {
            lines.push(zone_line("logo 2", zone));
        }
    }
    lines
}

pub fn print_layouts(specs: &[LayoutSpec]) {
    for line in format_layouts(specs) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::get_layout_spec;
    use tempfile::TempDir;

    fn asset(path: &str) -> ImageAsset {
        ImageAsset {
            path: PathBuf::from(path),
            width: 1080,
            height: 1920,
        }
    }

    #[test]
    fn compose_result_shows_path_size_and_digest() {
        let lines = format_compose_result(&asset("out/ad.png"), "abc123");
        assert_eq!(lines, vec!["out/ad.png (1080x1920)", "    SHA-256: abc123"]);
    }

    #[test]
    fn batch_summary_counts_failures() {
        let outcomes = vec![
            JobOutcome::Composed {
                asset: asset("out/a.png"),
                digest: "d1".to_string(),
            },
            JobOutcome::Failed {
                job: PathBuf::from("jobs/b.json"),
                error: "image not found".to_string(),
            },
        ];
        let lines = format_batch_summary(&outcomes);
        assert_eq!(lines[0], "001 out/a.png (1080x1920)");
        assert_eq!(lines[2], "002 jobs/b.json");
        assert_eq!(lines[3], "    Error: image not found");
        assert_eq!(lines.last().unwrap(), "Composed 1 ad, 1 failed");
    }

    #[test]
    fn batch_summary_all_ok_has_no_failure_count() {
        let outcomes = vec![
            JobOutcome::Composed {
                asset: asset("a.png"),
                digest: "d1".to_string(),
            },
            JobOutcome::Composed {
                asset: asset("b.png"),
                digest: "d2".to_string(),
            },
        ];
        let lines = format_batch_summary(&outcomes);
        assert_eq!(lines.last().unwrap(), "Composed 2 ads");
    }

    #[test]
    fn layouts_list_every_zone() {
        let spec = get_layout_spec("Hero Product with Stat Overlay");
        let lines = format_layouts(&[spec]);
        assert_eq!(lines[0], "Hero Product with Stat Overlay");
        assert!(lines[2].starts_with("    product:"));
        assert!(lines[2].contains("x 0.15-0.85"));
        assert!(lines[2].contains("y 0.10-0.70"));
        assert!(lines.iter().any(|l| l.trim_start().starts_with("logo:")));
    }

    #[test]
    fn layouts_are_separated_by_blank_lines() {
        let specs = [
            get_layout_spec("Hero Product with Stat Overlay"),
            get_layout_spec("Minimal Product Focus"),
        ];
        let lines = format_layouts(&specs);
        let blanks = lines.iter().filter(|l| l.is_empty()).count();
        assert_eq!(blanks, 1);
    }

    #[test]
    fn hash_file_is_stable_hex() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("f.bin");
        std::fs::write(&path, b"abc").unwrap();
        assert_eq!(
            hash_file(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn hash_file_missing_is_error() {
        let tmp = TempDir::new().unwrap();
        assert!(hash_file(&tmp.path().join("nope")).is_err());
    }
}
