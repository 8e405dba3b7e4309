use crate::clean;
use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::output;
use crate::transport::Transport;
use scripture_model::{Book, Reference};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Result of a successful fetch: where the file went and how many verse
/// texts were cleaned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredChapter {
    pub reference: Reference,
    pub path: PathBuf,
    pub verses_cleaned: usize,
}

/// Outcome of fetching every chapter of a book.
#[derive(Debug, Default)]
pub struct BookSummary {
    pub stored: Vec<StoredChapter>,
    pub failed: Vec<(Reference, FetchError)>,
}

impl BookSummary {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fetch one chapter or verse, strip bracket marks from its text, and write
/// it under `config.output_root`.
///
/// On a non-200 response this returns `FetchError::Status` before touching
/// the filesystem, so no directory or file is created. The output file is
/// overwritten if it already exists.
pub async fn fetch_and_store<T: Transport>(
    transport: &T,
    config: &FetchConfig,
    reference: Reference,
) -> Result<StoredChapter, FetchError> {
    let url = reference.url(&config.books_url());
    tracing::debug!(url = %url, reference = %reference, "Downloading JSON");

    let response = transport.get(&url).await?;
    if !response.is_ok() {
        tracing::warn!(status = response.status, url = %url, "Request failed");
        return Err(FetchError::Status { status: response.status, url });
    }

    let mut payload: Value = serde_json::from_str(&response.body)
        .map_err(|source| FetchError::Parse { origin: url.clone(), source })?;
    let verses_cleaned = clean::clean_payload(&mut payload);

    let path = reference.output_path(&config.output_root);
    output::write_pretty(&path, &payload)?;
    tracing::info!(path = %path.display(), verses = verses_cleaned, "Wrote JSON data");

    Ok(StoredChapter { reference, path, verses_cleaned })
}

/// Fetch every chapter of `book` in order, one request at a time.
///
/// A failed chapter is logged and recorded; the remaining chapters are
/// still attempted.
pub async fn fetch_book<T: Transport>(transport: &T, config: &FetchConfig, book: Book) -> BookSummary {
    let mut summary = BookSummary::default();

    for chapter in 1..=book.chapter_count() {
        let reference = Reference::chapter(book, chapter);
        match fetch_and_store(transport, config, reference).await {
            Ok(stored) => summary.stored.push(stored),
            Err(e) => {
                tracing::error!(reference = %reference, error = %e, "Chapter fetch failed");
                summary.failed.push((reference, e));
            }
        }
    }

    tracing::info!(
        book = %book,
        stored = summary.stored.len(),
        failed = summary.failed.len(),
        "Finished book"
    );
    summary
}

/// Read a previously stored chapter or verse back from disk.
pub fn load_stored(config: &FetchConfig, reference: Reference) -> Result<Value, FetchError> {
    let path = reference.output_path(&config.output_root);
    let contents = fs::read_to_string(&path).map_err(FetchError::io(&path))?;
    serde_json::from_str(&contents).map_err(|source| FetchError::Parse {
        origin: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RawResponse;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serves canned responses by URL; anything unknown is a 404.
    #[derive(Default)]
    struct FakeTransport {
        routes: HashMap<String, RawResponse>,
        requested: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        fn route(mut self, url: &str, status: u16, body: &str) -> Self {
            self.routes.insert(url.to_string(), RawResponse { status, body: body.to_string() });
            self
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl Transport for FakeTransport {
        async fn get(&self, url: &str) -> Result<RawResponse, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            Ok(self.routes.get(url).cloned().unwrap_or(RawResponse {
                status: 404,
                body: "Couldn't find the requested file".to_string(),
            }))
        }
    }

    fn config(tmp: &TempDir) -> FetchConfig {
        FetchConfig {
            base_url: "http://bible.test/bibles".into(),
            output_root: tmp.path().join("json"),
            ..FetchConfig::default()
        }
    }

    const GEN_1: &str = "http://bible.test/bibles/en-lsv/books/genesis/chapters/1.json";
    const GEN_1_1: &str = "http://bible.test/bibles/en-lsv/books/genesis/chapters/1/verses/1.json";

    fn read_json(path: &std::path::Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_chapter_is_cleaned_and_stored() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let transport = FakeTransport::default().route(
            GEN_1,
            200,
            r#"{"data":[{"book":"Genesis","chapter":"1","verse":"1","text":"In the beginning [God] created..."}]}"#,
        );

        let stored = fetch_and_store(&transport, &config, Reference::chapter(Book::Genesis, 1))
            .await
            .unwrap();

        assert_eq!(stored.path, tmp.path().join("json/genesis/genesis_chapter_1.json"));
        assert_eq!(stored.verses_cleaned, 1);
        assert_eq!(transport.requested(), vec![GEN_1.to_string()]);
        assert_eq!(
            read_json(&stored.path),
            json!({"data":[{"book":"Genesis","chapter":"1","verse":"1","text":"In the beginning God created..."}]})
        );
    }

    #[tokio::test]
    async fn test_single_verse_is_cleaned_and_stored() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let transport = FakeTransport::default().route(GEN_1_1, 200, r#"{"text":"[In] the beginning."}"#);

        let stored = fetch_and_store(&transport, &config, Reference::verse(Book::Genesis, 1, 1))
            .await
            .unwrap();

        assert_eq!(stored.path, tmp.path().join("json/genesis/genesis_chapter_1_verse_1.json"));
        assert_eq!(read_json(&stored.path), json!({"text":"In the beginning."}));
    }

    #[tokio::test]
    async fn test_not_found_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let transport = FakeTransport::default();

        let err = fetch_and_store(&transport, &config, Reference::chapter(Book::Genesis, 99))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("404"));
        assert!(!config.output_root.exists());
    }

    #[tokio::test]
    async fn test_unrecognized_shape_passes_through() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let body = r#"{"verses":[{"content":"[kept]"}],"meta":{"count":1}}"#;
        let transport = FakeTransport::default().route(GEN_1, 200, body);

        let stored = fetch_and_store(&transport, &config, Reference::chapter(Book::Genesis, 1))
            .await
            .unwrap();

        assert_eq!(stored.verses_cleaned, 0);
        let written = std::fs::read_to_string(&stored.path).unwrap();
        assert_eq!(serde_json::from_str::<Value>(&written).unwrap(), serde_json::from_str::<Value>(body).unwrap());
        // Key order survives the round trip.
        assert!(written.find("\"verses\"").unwrap() < written.find("\"meta\"").unwrap());
    }

    #[tokio::test]
    async fn test_numbers_are_written_exactly_as_received() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let transport = FakeTransport::default().route(
            GEN_1,
            200,
            r#"{"data":[{"text":"[a]","id":123456789012345678901234,"score":1.10,"w":1e2}],"big":1e400}"#,
        );

        let stored = fetch_and_store(&transport, &config, Reference::chapter(Book::Genesis, 1))
            .await
            .unwrap();

        let written = std::fs::read_to_string(&stored.path).unwrap();
        assert!(written.contains("\"id\": 123456789012345678901234"), "{written}");
        assert!(written.contains("\"score\": 1.10"), "{written}");
        assert!(written.contains("\"w\": 1e2"), "{written}");
        assert!(written.contains("\"big\": 1e400"), "{written}");
        assert!(written.contains("\"text\": \"a\""), "{written}");
    }

    #[tokio::test]
    async fn test_invalid_json_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let transport = FakeTransport::default().route(GEN_1, 200, "<html>oops</html>");

        let err = fetch_and_store(&transport, &config, Reference::chapter(Book::Genesis, 1))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Parse { .. }));
        assert!(!config.output_root.exists());
    }

    #[tokio::test]
    async fn test_refetch_overwrites_same_path() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let reference = Reference::verse(Book::Genesis, 1, 1);

        let first = FakeTransport::default().route(GEN_1_1, 200, r#"{"text":"old"}"#);
        let a = fetch_and_store(&first, &config, reference).await.unwrap();
        let second = FakeTransport::default().route(GEN_1_1, 200, r#"{"text":"new"}"#);
        let b = fetch_and_store(&second, &config, reference).await.unwrap();

        assert_eq!(a.path, b.path);
        assert_eq!(read_json(&b.path), json!({"text":"new"}));
        assert_eq!(std::fs::read_dir(config.output_root.join("genesis")).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_book_continues_past_failures() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let base = "http://bible.test/bibles/en-lsv/books/ruth/chapters";
        let transport = FakeTransport::default()
            .route(&format!("{base}/1.json"), 200, r#"{"data":[{"text":"[a]"}]}"#)
            .route(&format!("{base}/2.json"), 500, "")
            .route(&format!("{base}/3.json"), 200, r#"{"data":[{"text":"c"}]}"#)
            .route(&format!("{base}/4.json"), 200, r#"{"data":[{"text":"d"}]}"#);

        let summary = fetch_book(&transport, &config, Book::Ruth).await;

        assert_eq!(transport.requested().len(), 4);
        assert_eq!(summary.stored.len(), 3);
        assert!(!summary.is_complete());
        let (failed_ref, failed_err) = &summary.failed[0];
        assert_eq!(*failed_ref, Reference::chapter(Book::Ruth, 2));
        assert_eq!(failed_err.status(), Some(500));
        assert!(!config.output_root.join("ruth/ruth_chapter_2.json").exists());
    }

    #[tokio::test]
    async fn test_load_stored_reads_back() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let reference = Reference::chapter(Book::Genesis, 1);

        assert!(matches!(load_stored(&config, reference), Err(FetchError::Io { .. })));

        let transport = FakeTransport::default().route(GEN_1, 200, r#"{"data":[{"text":"[x]"}]}"#);
        fetch_and_store(&transport, &config, reference).await.unwrap();
        assert_eq!(load_stored(&config, reference).unwrap(), json!({"data":[{"text":"x"}]}));
    }
}
