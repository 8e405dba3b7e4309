use anyhow::{Context, Result};
use scripture_model::{Book, StoredPayload};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("file is not a valid chapter or verse payload: {0}")]
    Unparseable(String),

    #[error("file has neither a `data` verse list nor a top-level `text`")]
    UnexpectedShape,

    #[error("verse at index {index} has no text")]
    MissingText { index: usize },

    #[error("verse at index {index} still contains square brackets")]
    ResidualBracket { index: usize },

    #[error("verse at index {index} is numbered {found}, expected {expected}")]
    VerseOutOfOrder { index: usize, expected: u32, found: u32 },

    #[error("verse {chapter}:{verse} is past the end of the stored chapter ({count} verses)")]
    VerseBeyondChapter { chapter: u32, verse: u32, count: usize },
}

/// Check an already-classified payload.
///
/// Chapter payloads must number their verses 1, 2, 3, ... where a number
/// is present. Every verse needs text with no `[` or `]` left in it.
pub fn validate_payload(payload: &StoredPayload) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if matches!(payload, StoredPayload::Other(_)) {
        errors.push(ValidationError::UnexpectedShape);
        return errors;
    }

    let is_chapter = matches!(payload, StoredPayload::Chapter(_));
    for (index, verse) in payload.verses().into_iter().enumerate() {
        match verse.text.as_deref() {
            None => errors.push(ValidationError::MissingText { index }),
            Some(text) if text.contains(['[', ']']) => {
                errors.push(ValidationError::ResidualBracket { index })
            }
            Some(_) => {}
        }

        if is_chapter {
            let expected = index as u32 + 1;
            if let Some(found) = verse.verse.filter(|&n| n != expected) {
                errors.push(ValidationError::VerseOutOfOrder { index, expected, found });
            }
        }
    }

    errors
}

/// Verse counts per chapter, taken from the stored chapter payloads.
pub fn chapter_verse_counts<'a>(payloads: impl IntoIterator<Item = &'a StoredPayload>) -> HashMap<u32, usize> {
    let mut counts = HashMap::new();
    for payload in payloads {
        if let StoredPayload::Chapter(chapter) = payload {
            if let Some(number) = chapter.data.iter().find_map(|v| v.chapter) {
                counts.insert(number, chapter.data.len());
            }
        }
    }
    counts
}

/// Check a single-verse payload against the verse count of its chapter.
/// Nothing is reported when the chapter itself isn't stored.
pub fn validate_verse_bounds(payload: &StoredPayload, counts: &HashMap<u32, usize>) -> Option<ValidationError> {
    let StoredPayload::Verse(verse) = payload else {
        return None;
    };
    let (chapter, number) = (verse.chapter?, verse.verse?);
    let count = *counts.get(&chapter)?;
    (number as usize > count).then_some(ValidationError::VerseBeyondChapter { chapter, verse: number, count })
}

fn read_payload(path: &Path) -> Result<Result<StoredPayload, ValidationError>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    Ok(serde_json::from_str(&contents)
        .and_then(StoredPayload::from_value)
        .map_err(|e| ValidationError::Unparseable(e.to_string())))
}

fn report(path: &Path, errors: &[ValidationError]) {
    for e in errors {
        tracing::warn!(path = %path.display(), "{e}");
    }
}

/// Validate one stored file. I/O failures are returned as `Err`;
/// content problems are returned in the list.
pub fn validate_file(path: &Path) -> Result<Vec<ValidationError>> {
    let errors = match read_payload(path)? {
        Ok(payload) => validate_payload(&payload),
        Err(e) => vec![e],
    };
    report(path, &errors);
    Ok(errors)
}

/// Validate every `*.json` file under `{root}/{slug}`, in path order.
///
/// Single-verse files are also checked against the verse count of their
/// chapter when that chapter is stored alongside them.
pub fn validate_book_dir(root: &Path, book: Book) -> Result<Vec<(PathBuf, Vec<ValidationError>)>> {
    let dir = root.join(book.slug());
    let entries = std::fs::read_dir(&dir)
        .with_context(|| format!("No stored files for {book} at {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut loaded = Vec::with_capacity(paths.len());
    for path in paths {
        let payload = read_payload(&path)?;
        loaded.push((path, payload));
    }
    let counts = chapter_verse_counts(loaded.iter().filter_map(|(_, p)| p.as_ref().ok()));

    let results: Vec<_> = loaded
        .into_iter()
        .map(|(path, payload)| {
            let errors = match payload {
                Ok(payload) => {
                    let mut errors = validate_payload(&payload);
                    errors.extend(validate_verse_bounds(&payload, &counts));
                    errors
                }
                Err(e) => vec![e],
            };
            report(&path, &errors);
            (path, errors)
        })
        .collect();

    tracing::info!(book = %book, files = results.len(), "Validated stored files");
    Ok(results)
}
