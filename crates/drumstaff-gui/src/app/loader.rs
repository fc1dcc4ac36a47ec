use std::path::{Path, PathBuf};

use anyhow::Context;
use drumstaff_core::Pattern;

/// Ask the user for a pattern file
pub(super) fn pick_pattern_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Load drum pattern")
        .add_filter("Drum pattern", &["json"])
        .pick_file()
}

pub(super) fn load_pattern_file(path: &Path) -> anyhow::Result<Pattern> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let pattern = Pattern::from_json_str(&json)
        .with_context(|| format!("Failed to parse pattern {}", path.display()))?;
    tracing::info!(
        "Loaded pattern {}: {} steps, {} tracks",
        path.display(),
        pattern.len(),
        pattern.tracks().len()
    );
    Ok(pattern)
}

/// Two bars of groove, keyed the way older exports spelled drum names
pub(super) fn demo_pattern() -> Pattern {
    const LENGTH: usize = 32;
    let hits = |steps: &[usize]| {
        let mut track = vec![false; LENGTH];
        for &s in steps {
            track[s] = true;
        }
        track
    };

    Pattern::new(LENGTH)
        .with_track("Crash Cymbal", hits(&[0]))
        .with_track("HH Closed", hits(&[2, 4, 6, 8, 10, 12, 18, 20, 22, 24, 26]))
        .with_track("HH Open", hits(&[14, 30]))
        .with_track("Snare", hits(&[4, 12, 20, 28]))
        .with_track("ghost note", hits(&[7, 15, 23]))
        .with_track("tom-tom", hits(&[27]))
        .with_track("Low Tom-tom", hits(&[29, 31]))
        .with_track("kick", hits(&[0, 3, 8, 10, 16, 19, 24]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_pattern_normalizes_every_track() {
        let pattern = demo_pattern();
        assert_eq!(pattern.len(), 32);
        assert!(pattern.tracks().iter().all(|t| t.drum.voice.is_some()));
        assert_eq!(pattern.rows().last().map(|t| t.key.as_str()), Some("kick"));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = load_pattern_file(Path::new("/nonexistent/pattern.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
