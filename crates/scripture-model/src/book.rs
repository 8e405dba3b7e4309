use crate::error::ModelError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One of the 66 books of the Protestant canon, in canonical order.
///
/// Each book carries two strings the rest of the system depends on:
/// the API slug used in request URLs (`"1samuel"`) and the display name
/// used for output filenames and human-facing text (`"1 Samuel"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Book {
    Genesis,
    Exodus,
    Leviticus,
    Numbers,
    Deuteronomy,
    Joshua,
    Judges,
    Ruth,
    FirstSamuel,
    SecondSamuel,
    FirstKings,
    SecondKings,
    FirstChronicles,
    SecondChronicles,
    Ezra,
    Nehemiah,
    Esther,
    Job,
    Psalms,
    Proverbs,
    Ecclesiastes,
    SongOfSolomon,
    Isaiah,
    Jeremiah,
    Lamentations,
    Ezekiel,
    Daniel,
    Hosea,
    Joel,
    Amos,
    Obadiah,
    Jonah,
    Micah,
    Nahum,
    Habakkuk,
    Zephaniah,
    Haggai,
    Zechariah,
    Malachi,
    Matthew,
    Mark,
    Luke,
    John,
    Acts,
    Romans,
    FirstCorinthians,
    SecondCorinthians,
    Galatians,
    Ephesians,
    Philippians,
    Colossians,
    FirstThessalonians,
    SecondThessalonians,
    FirstTimothy,
    SecondTimothy,
    Titus,
    Philemon,
    Hebrews,
    James,
    FirstPeter,
    SecondPeter,
    FirstJohn,
    SecondJohn,
    ThirdJohn,
    Jude,
    Revelation,
}

/// Which half of the canon a book belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Testament {
    Old,
    New,
}

struct BookInfo {
    slug: &'static str,
    name: &'static str,
    chapters: u32,
}

const fn info(slug: &'static str, name: &'static str, chapters: u32) -> BookInfo {
    BookInfo { slug, name, chapters }
}

// Indexed by `Book as usize`; must stay in the same order as the enum.
static TABLE: [BookInfo; 66] = [
    info("genesis", "Genesis", 50),
    info("exodus", "Exodus", 40),
    info("leviticus", "Leviticus", 27),
    info("numbers", "Numbers", 36),
    info("deuteronomy", "Deuteronomy", 34),
    info("joshua", "Joshua", 24),
    info("judges", "Judges", 21),
    info("ruth", "Ruth", 4),
    info("1samuel", "1 Samuel", 31),
    info("2samuel", "2 Samuel", 24),
    info("1kings", "1 Kings", 22),
    info("2kings", "2 Kings", 25),
    info("1chronicles", "1 Chronicles", 29),
    info("2chronicles", "2 Chronicles", 36),
    info("ezra", "Ezra", 10),
    info("nehemiah", "Nehemiah", 13),
    info("esther", "Esther", 10),
    info("job", "Job", 42),
    info("psalms", "Psalms", 150),
    info("proverbs", "Proverbs", 31),
    info("ecclesiastes", "Ecclesiastes", 12),
    info("songofsolomon", "Song of Solomon", 8),
    info("isaiah", "Isaiah", 66),
    info("jeremiah", "Jeremiah", 52),
    info("lamentations", "Lamentations", 5),
    info("ezekiel", "Ezekiel", 48),
    info("daniel", "Daniel", 12),
    info("hosea", "Hosea", 14),
    info("joel", "Joel", 3),
    info("amos", "Amos", 9),
    info("obadiah", "Obadiah", 1),
    info("jonah", "Jonah", 4),
    info("micah", "Micah", 7),
    info("nahum", "Nahum", 3),
    info("habakkuk", "Habakkuk", 3),
    info("zephaniah", "Zephaniah", 3),
    info("haggai", "Haggai", 2),
    info("zechariah", "Zechariah", 14),
    info("malachi", "Malachi", 4),
    info("matthew", "Matthew", 28),
    info("mark", "Mark", 16),
    info("luke", "Luke", 24),
    info("john", "John", 21),
    info("acts", "Acts", 28),
    info("romans", "Romans", 16),
    info("1corinthians", "1 Corinthians", 16),
    info("2corinthians", "2 Corinthians", 13),
    info("galatians", "Galatians", 6),
    info("ephesians", "Ephesians", 6),
    info("philippians", "Philippians", 4),
    info("colossians", "Colossians", 4),
    info("1thessalonians", "1 Thessalonians", 5),
    info("2thessalonians", "2 Thessalonians", 3),
    info("1timothy", "1 Timothy", 6),
    info("2timothy", "2 Timothy", 4),
    info("titus", "Titus", 3),
    info("philemon", "Philemon", 1),
    info("hebrews", "Hebrews", 13),
    info("james", "James", 5),
    info("1peter", "1 Peter", 5),
    info("2peter", "2 Peter", 3),
    info("1john", "1 John", 5),
    info("2john", "2 John", 1),
    info("3john", "3 John", 1),
    info("jude", "Jude", 1),
    info("revelation", "Revelation", 22),
];

impl Book {
    /// Every book in canonical order.
    pub const ALL: [Book; 66] = [
        Book::Genesis,
        Book::Exodus,
        Book::Leviticus,
        Book::Numbers,
        Book::Deuteronomy,
        Book::Joshua,
        Book::Judges,
        Book::Ruth,
        Book::FirstSamuel,
        Book::SecondSamuel,
        Book::FirstKings,
        Book::SecondKings,
        Book::FirstChronicles,
        Book::SecondChronicles,
        Book::Ezra,
        Book::Nehemiah,
        Book::Esther,
        Book::Job,
        Book::Psalms,
        Book::Proverbs,
        Book::Ecclesiastes,
        Book::SongOfSolomon,
        Book::Isaiah,
        Book::Jeremiah,
        Book::Lamentations,
        Book::Ezekiel,
        Book::Daniel,
        Book::Hosea,
        Book::Joel,
        Book::Amos,
        Book::Obadiah,
        Book::Jonah,
        Book::Micah,
        Book::Nahum,
        Book::Habakkuk,
        Book::Zephaniah,
        Book::Haggai,
        Book::Zechariah,
        Book::Malachi,
        Book::Matthew,
        Book::Mark,
        Book::Luke,
        Book::John,
        Book::Acts,
        Book::Romans,
        Book::FirstCorinthians,
        Book::SecondCorinthians,
        Book::Galatians,
        Book::Ephesians,
        Book::Philippians,
        Book::Colossians,
        Book::FirstThessalonians,
        Book::SecondThessalonians,
        Book::FirstTimothy,
        Book::SecondTimothy,
        Book::Titus,
        Book::Philemon,
        Book::Hebrews,
        Book::James,
        Book::FirstPeter,
        Book::SecondPeter,
        Book::FirstJohn,
        Book::SecondJohn,
        Book::ThirdJohn,
        Book::Jude,
        Book::Revelation,
    ];

    pub fn iter() -> impl Iterator<Item = Book> {
        Self::ALL.into_iter()
    }

    fn info(self) -> &'static BookInfo {
        &TABLE[self as usize]
    }

    /// Lowercase URL path segment used by the remote API (e.g., "1samuel").
    pub fn slug(self) -> &'static str {
        self.info().slug
    }

    /// Display name (e.g., "1 Samuel", "Song of Solomon").
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Output filename prefix: the display name lowercased, with
    /// whitespace replaced by underscores (e.g., "song_of_solomon").
    pub fn file_stem(self) -> String {
        self.name()
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("_")
    }

    pub fn chapter_count(self) -> u32 {
        self.info().chapters
    }

    pub fn testament(self) -> Testament {
        if self <= Book::Malachi {
            Testament::Old
        } else {
            Testament::New
        }
    }

    /// The next book in canonical order, or `None` after Revelation.
    pub fn next(self) -> Option<Book> {
        Self::ALL.get(self as usize + 1).copied()
    }
}

/// Reduce a book name to lowercase alphanumerics so "1 Samuel", "1_samuel"
/// and "1samuel" all compare equal.
fn fold(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Book {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = fold(s);
        if key.is_empty() {
            return Err(ModelError::UnknownBook(s.to_string()));
        }
        Book::iter()
            .find(|book| book.slug() == key)
            .ok_or_else(|| ModelError::UnknownBook(s.to_string()))
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Book {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.slug())
    }
}

impl<'de> Deserialize<'de> for Book {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_enum_order() {
        for (i, book) in Book::iter().enumerate() {
            assert_eq!(book as usize, i, "{book:?} out of order");
        }
        assert_eq!(Book::ALL.len(), 66);
        assert_eq!(Book::Genesis.slug(), "genesis");
        assert_eq!(Book::Revelation.slug(), "revelation");
        assert_eq!(Book::SongOfSolomon.name(), "Song of Solomon");
    }

    #[test]
    fn test_slug_is_folded_name() {
        // FromStr relies on this: every slug is its display name folded.
        for book in Book::iter() {
            assert_eq!(book.slug(), fold(book.name()));
        }
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(Book::Genesis.file_stem(), "genesis");
        assert_eq!(Book::FirstSamuel.file_stem(), "1_samuel");
        assert_eq!(Book::SongOfSolomon.file_stem(), "song_of_solomon");
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!("genesis".parse::<Book>().unwrap(), Book::Genesis);
        assert_eq!("Genesis".parse::<Book>().unwrap(), Book::Genesis);
        assert_eq!("1 Samuel".parse::<Book>().unwrap(), Book::FirstSamuel);
        assert_eq!("1_samuel".parse::<Book>().unwrap(), Book::FirstSamuel);
        assert_eq!("song-of-solomon".parse::<Book>().unwrap(), Book::SongOfSolomon);
        assert_eq!(
            "Hezekiah".parse::<Book>(),
            Err(ModelError::UnknownBook("Hezekiah".into()))
        );
        assert!("".parse::<Book>().is_err());
    }

    #[test]
    fn test_navigation_and_counts() {
        assert_eq!(Book::Genesis.next(), Some(Book::Exodus));
        assert_eq!(Book::Malachi.next(), Some(Book::Matthew));
        assert_eq!(Book::Revelation.next(), None);
        assert_eq!(Book::Psalms.chapter_count(), 150);
        assert_eq!(Book::Jude.chapter_count(), 1);
        assert_eq!(Book::Malachi.testament(), Testament::Old);
        assert_eq!(Book::Matthew.testament(), Testament::New);
        let total: u32 = Book::iter().map(Book::chapter_count).sum();
        assert_eq!(total, 1189);
    }

    #[test]
    fn test_serde_uses_slug() {
        let json = serde_json::to_string(&Book::FirstJohn).unwrap();
        assert_eq!(json, "\"1john\"");
        let parsed: Book = serde_json::from_str("\"1 John\"").unwrap();
        assert_eq!(parsed, Book::FirstJohn);
    }
}
