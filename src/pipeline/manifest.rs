//! Description manifest: the human-readable labels shown after consent.
//!
//! The manifest is a JSON array of `{ "index": n, "label": "..." }` entries
//! stored next to the settings file:
//!
//! | Platform | Path |
//! |----------|------|
//! | Windows  | `%APPDATA%\article-narrator\descriptions.json` |
//! | macOS    | `~/Library/Application Support/article-narrator/descriptions.json` |
//! | Linux    | `~/.config/article-narrator/descriptions.json` |
//!
//! When the file is absent or unreadable the labels are derived from the
//! paragraph text itself, so the listing always reflects the current article.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::Paragraph;

/// Characters of paragraph text kept in a derived label.
pub const PREVIEW_CHARS: usize = 60;

// ---------------------------------------------------------------------------
// DescriptionEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionEntry {
    /// 1-based paragraph index.
    pub index: usize,
    pub label: String,
}

impl DescriptionEntry {
    /// The line printed in the listing, e.g. `"2. Reactions"`.
    pub fn render(&self) -> String {
        format!("{}. {}", self.index, self.label)
    }
}

// ---------------------------------------------------------------------------
// ManifestError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<DescriptionEntry>,
}

impl Manifest {
    pub fn new(entries: Vec<DescriptionEntry>) -> Self {
        Self { entries }
    }

    /// Read a manifest file.  A missing file yields `Ok(None)`.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ManifestError> {
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(path)?;
        let entries: Vec<DescriptionEntry> = serde_json::from_str(&data)?;
        Ok(Some(Self { entries }))
    }

    /// One entry per paragraph, labelled with a short preview of its text.
    pub fn from_paragraphs(paragraphs: &[Paragraph]) -> Self {
        let entries = paragraphs
            .iter()
            .filter(|p| !p.is_blank())
            .map(|p| DescriptionEntry {
                index: p.index,
                label: preview(&p.text, PREVIEW_CHARS),
            })
            .collect();
        Self { entries }
    }

    /// Load the manifest at `path`, falling back to labels derived from
    /// `paragraphs` when the file is missing or malformed.
    pub fn load_or_derive(path: &Path, paragraphs: &[Paragraph]) -> Self {
        match Self::load_from(path) {
            Ok(Some(manifest)) => {
                log::info!(
                    "manifest: {} entries loaded from {}",
                    manifest.len(),
                    path.display()
                );
                manifest
            }
            Ok(None) => {
                log::debug!("manifest: {} not found, deriving labels", path.display());
                Self::from_paragraphs(paragraphs)
            }
            Err(e) => {
                log::warn!("manifest: {}: {e}; deriving labels", path.display());
                Self::from_paragraphs(paragraphs)
            }
        }
    }

    pub fn entries(&self) -> &[DescriptionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Listing lines for entries whose index is selectable in a session with
    /// `total` artifacts.  Entries outside `1..=total` are skipped.
    pub fn lines(&self, total: usize) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| (1..=total).contains(&e.index))
            .map(DescriptionEntry::render)
            .collect()
    }
}

/// First `max_chars` characters of `text`, cut back to a word boundary and
/// marked with an ellipsis when shortened.
///
/// ```
/// use article_narrator::pipeline::manifest::preview;
///
/// assert_eq!(preview("Short text", 60), "Short text");
/// assert_eq!(preview("The quick brown fox jumps", 15), "The quick brown…");
/// ```
pub fn preview(text: &str, max_chars: usize) -> String {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= max_chars {
        return text;
    }

    // One extra char so a word ending exactly at the limit is kept whole.
    let window: String = text.chars().take(max_chars + 1).collect();
    let head = match window.rfind(' ') {
        Some(pos) if pos > 0 => window[..pos].to_string(),
        _ => text.chars().take(max_chars).collect(),
    };
    format!("{}…", head.trim_end_matches([',', ';', ':', '.']))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_paragraphs() -> Vec<Paragraph> {
        Paragraph::number(["Intro to the story", "Reactions from the town", "Outlook"])
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempdir().expect("temp dir");
        let loaded = Manifest::load_from(&dir.path().join("descriptions.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn serialized_entries_load_back() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("descriptions.json");
        let manifest = Manifest::new(vec![
            DescriptionEntry {
                index: 1,
                label: "Intro".into(),
            },
            DescriptionEntry {
                index: 2,
                label: "Reactions".into(),
            },
        ]);
        let data = serde_json::to_string_pretty(manifest.entries()).expect("serialize");
        std::fs::write(&path, data).expect("write");

        let loaded = Manifest::load_from(&path).unwrap().expect("present");
        assert_eq!(loaded, manifest);
    }

    #[test]
    fn parses_handwritten_json() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("descriptions.json");
        std::fs::write(
            &path,
            r#"[{"index": 1, "label": "Intro"}, {"index": 3, "label": "Outlook"}]"#,
        )
        .unwrap();

        let loaded = Manifest::load_from(&path).unwrap().unwrap();
        assert_eq!(loaded.lines(3), vec!["1. Intro", "3. Outlook"]);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("descriptions.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            Manifest::load_from(&path),
            Err(ManifestError::Parse(_))
        ));
    }

    #[test]
    fn malformed_file_falls_back_to_derived_labels() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("descriptions.json");
        std::fs::write(&path, "{").unwrap();

        let manifest = Manifest::load_or_derive(&path, &sample_paragraphs());
        assert_eq!(manifest.len(), 3);
        assert_eq!(manifest.entries()[1].label, "Reactions from the town");
    }

    #[test]
    fn derived_labels_follow_paragraph_indices() {
        let manifest = Manifest::from_paragraphs(&sample_paragraphs());
        assert_eq!(
            manifest.lines(3),
            vec![
                "1. Intro to the story",
                "2. Reactions from the town",
                "3. Outlook"
            ]
        );
    }

    #[test]
    fn lines_skip_unselectable_entries() {
        let manifest = Manifest::new(vec![
            DescriptionEntry {
                index: 0,
                label: "zero".into(),
            },
            DescriptionEntry {
                index: 2,
                label: "two".into(),
            },
            DescriptionEntry {
                index: 9,
                label: "nine".into(),
            },
        ]);
        assert_eq!(manifest.lines(3), vec!["2. two"]);
        assert!(manifest.lines(0).is_empty());
    }

    #[test]
    fn preview_collapses_whitespace() {
        assert_eq!(preview("  a \n b\tc ", 60), "a b c");
    }

    #[test]
    fn preview_cuts_at_word_boundary() {
        assert_eq!(preview("Hello, wonderful world", 10), "Hello…");
    }

    #[test]
    fn preview_hard_cuts_a_single_long_word() {
        assert_eq!(preview("abcdefghij", 4), "abcd…");
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        assert_eq!(preview("ñññ ñññ", 5), "ñññ…");
    }
}
