use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single verse as returned by the API and stored on disk.
///
/// The API sends `chapter` and `verse` as strings; numbers are accepted too.
/// Fields this type doesn't name are kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VersePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32", skip_serializing_if = "Option::is_none")]
    pub chapter: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32", skip_serializing_if = "Option::is_none")]
    pub verse: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A whole chapter: the verse list lives under `data`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChapterPayload {
    pub data: Vec<VersePayload>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A stored or fetched payload, classified by shape.
///
/// Shape is decided by content, not by what was requested: a `data` array
/// makes it a chapter, a top-level `text` makes it a verse, anything else
/// is `Other`.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredPayload {
    Chapter(ChapterPayload),
    Verse(VersePayload),
    Other(Value),
}

impl StoredPayload {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if value.get("data").is_some_and(Value::is_array) {
            return serde_json::from_value(value).map(StoredPayload::Chapter);
        }
        if value.as_object().is_some_and(|obj| obj.contains_key("text")) {
            return serde_json::from_value(value).map(StoredPayload::Verse);
        }
        Ok(StoredPayload::Other(value))
    }

    /// The verses held by this payload, in order. Empty for `Other`.
    pub fn verses(&self) -> Vec<&VersePayload> {
        match self {
            StoredPayload::Chapter(chapter) => chapter.data.iter().collect(),
            StoredPayload::Verse(verse) => vec![verse],
            StoredPayload::Other(_) => Vec::new(),
        }
    }
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    // Under `flatten` with arbitrary_precision, numbers arrive as buffered
    // maps that only `Value` reads back as numbers.
    let invalid = |raw: &dyn std::fmt::Display| {
        D::Error::custom(format!("expected a verse or chapter number, got {raw}"))
    };

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| invalid(&n)),
        Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid(&format!("{s:?}"))),
        Some(other) => Err(invalid(&other)),
    }
}
