pub mod clean;
pub mod config;
pub mod error;
pub mod fetch;
pub mod output;
pub mod transport;

pub use config::FetchConfig;
pub use error::FetchError;
pub use fetch::{fetch_and_store, fetch_book, load_stored, BookSummary, StoredChapter};
pub use transport::{HttpTransport, RawResponse, Transport};
