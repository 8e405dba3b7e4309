use crate::book::Book;
use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A chapter, or a single verse within a chapter.
///
/// `verse: None` means "whole chapter". Chapter and verse numbers are not
/// range-checked here; see [`Reference::is_within_canon`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub book: Book,
    pub chapter: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verse: Option<u32>,
}

impl Reference {
    pub fn chapter(book: Book, chapter: u32) -> Self {
        Self { book, chapter, verse: None }
    }

    pub fn verse(book: Book, chapter: u32, verse: u32) -> Self {
        Self { book, chapter, verse: Some(verse) }
    }

    /// Request URL under `books_url`:
    /// `{books_url}/{slug}/chapters/{chapter}[/verses/{verse}].json`.
    pub fn url(&self, books_url: &str) -> String {
        let base = books_url.trim_end_matches('/');
        let slug = self.book.slug();
        match self.verse {
            Some(verse) => format!("{base}/{slug}/chapters/{}/verses/{verse}.json", self.chapter),
            None => format!("{base}/{slug}/chapters/{}.json", self.chapter),
        }
    }

    /// Directory holding every stored file for this book: `{root}/{slug}`.
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join(self.book.slug())
    }

    /// `{file_stem}_chapter_{chapter}[_verse_{verse}].json`
    pub fn file_name(&self) -> String {
        let stem = self.book.file_stem();
        match self.verse {
            Some(verse) => format!("{stem}_chapter_{}_verse_{verse}.json", self.chapter),
            None => format!("{stem}_chapter_{}.json", self.chapter),
        }
    }

    pub fn output_path(&self, root: &Path) -> PathBuf {
        self.output_dir(root).join(self.file_name())
    }

    /// True when the chapter exists in the book and the verse, if any, is
    /// at least 1. Verse upper bounds come from the stored chapter; see
    /// `scripture_validate::validate_verse_bounds`.
    pub fn is_within_canon(&self) -> bool {
        let chapter_ok = (1..=self.book.chapter_count()).contains(&self.chapter);
        chapter_ok && self.verse.map_or(true, |v| v >= 1)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.book, self.chapter)?;
        if let Some(verse) = self.verse {
            write!(f, ":{verse}")?;
        }
        Ok(())
    }
}

impl FromStr for Reference {
    type Err = ModelError;

    /// Parse `"<book> <chapter>[:<verse>]"`, e.g. `"Genesis 1"` or
    /// `"1 Samuel 3:4"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidReference(s.to_string());

        let trimmed = s.trim();
        let (book_part, numbers) = trimmed.rsplit_once(char::is_whitespace).ok_or_else(invalid)?;
        let book: Book = book_part.trim().parse()?;

        let (chapter, verse) = match numbers.split_once(':') {
            Some((c, v)) => (c, Some(v)),
            None => (numbers, None),
        };
        let chapter = chapter.parse().map_err(|_| invalid())?;
        let verse = verse
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|_| invalid())?;

        Ok(Self { book, chapter, verse })
    }
}
