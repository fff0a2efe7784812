//! Normalized book record and the variables handed to the host
//!
//! Every field of [`BookRecord`] is always present. Fields that could not be
//! extracted hold [`Field::Unknown`] and reach the host as a single space.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::field::Field;
use crate::format::file_name;

/// Output variables keyed by host variable name
pub type Variables = Map<String, Value>;

/// Bibliographic record extracted from one detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    #[serde(rename = "bookTitle")]
    pub title: String,
    pub subtitle: Field<String>,
    /// Quoted, comma-joined author names
    pub authors: Field<String>,
    pub isbn: Field<String>,
    pub cover_url: Field<String>,
    pub publisher: Field<String>,
    pub original_title: Field<String>,
    pub translators: Field<Vec<String>>,
    pub publication_year: Field<String>,
    pub page_count: Field<String>,
    pub rating: Field<String>,
    pub summary: Field<String>,
    pub author_intro: Field<String>,
    /// `quote\nsource` entries
    pub quotes: Vec<String>,
    pub contents: Field<String>,
    /// Comma-joined user tags
    pub tags: Field<String>,
    #[serde(rename = "bookUrl")]
    pub source_url: String,
}

impl BookRecord {
    /// Host variable names, in output order
    pub const FIELD_NAMES: [&'static str; 17] = [
        "bookTitle",
        "subtitle",
        "authors",
        "isbn",
        "coverUrl",
        "publisher",
        "originalTitle",
        "translators",
        "publicationYear",
        "pageCount",
        "rating",
        "summary",
        "authorIntro",
        "quotes",
        "contents",
        "tags",
        "bookUrl",
    ];

    /// A record with every field unknown
    pub fn empty(title: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: Field::Unknown,
            authors: Field::Unknown,
            isbn: Field::Unknown,
            cover_url: Field::Unknown,
            publisher: Field::Unknown,
            original_title: Field::Unknown,
            translators: Field::Unknown,
            publication_year: Field::Unknown,
            page_count: Field::Unknown,
            rating: Field::Unknown,
            summary: Field::Unknown,
            author_intro: Field::Unknown,
            quotes: Vec::new(),
            contents: Field::Unknown,
            tags: Field::Unknown,
            source_url: source_url.into(),
        }
    }

    /// Collapse blank values into [`Field::Unknown`] and drop blank quotes
    pub fn normalize(mut self) -> Self {
        for field in [
            &mut self.subtitle,
            &mut self.authors,
            &mut self.isbn,
            &mut self.cover_url,
            &mut self.publisher,
            &mut self.original_title,
            &mut self.publication_year,
            &mut self.page_count,
            &mut self.rating,
            &mut self.summary,
            &mut self.author_intro,
            &mut self.contents,
            &mut self.tags,
        ] {
            if matches!(field, Field::Known(value) if value.trim().is_empty()) {
                *field = Field::Unknown;
            }
        }
        self.translators = match std::mem::take(&mut self.translators) {
            Field::Known(items) => Field::list(items),
            Field::Unknown => Field::Unknown,
        };
        self.quotes.retain(|quote| !quote.trim().is_empty());
        self
    }

    /// Host variables, plus `fileName` when `with_file_name` is set
    pub fn to_variables(&self, with_file_name: bool) -> Result<Variables> {
        let mut variables = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        if with_file_name {
            variables.insert(
                "fileName".to_string(),
                serde_json::to_value(file_name(&self.title))?,
            );
        }
        Ok(variables)
    }
}

/// Result of fetching and parsing a detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecordOutcome {
    /// Page parsed; fields may still be unknown
    Complete(BookRecord),
    /// Page could not be obtained; no field is trustworthy
    Failed { message: String },
}

impl RecordOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    pub fn record(&self) -> Option<&BookRecord> {
        match self {
            Self::Complete(record) => Some(record),
            Self::Failed { .. } => None,
        }
    }

    pub fn into_record(self) -> std::result::Result<BookRecord, String> {
        match self {
            Self::Complete(record) => Ok(record),
            Self::Failed { message } => Err(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_contain_every_field() {
        let record = BookRecord::empty("Unknown Title", "https://book.douban.com/subject/1");
        let variables = record.to_variables(false).unwrap();

        assert_eq!(variables.len(), BookRecord::FIELD_NAMES.len());
        for name in BookRecord::FIELD_NAMES {
            assert!(variables.contains_key(name), "missing {}", name);
        }
        assert_eq!(variables["isbn"], " ");
        assert_eq!(variables["translators"], " ");
        assert_eq!(variables["quotes"], serde_json::json!([]));
        assert_eq!(variables["bookUrl"], "https://book.douban.com/subject/1");
    }

    #[test]
    fn test_file_name_variable() {
        let record = BookRecord::empty("Rust: Up/Running", "u");
        let variables = record.to_variables(true).unwrap();
        assert_eq!(variables["fileName"], "Rust， Up，Running");
    }

    #[test]
    fn test_normalize_collapses_blanks() {
        let mut record = BookRecord::empty("t", "u");
        record.isbn = Field::Known("  ".to_string());
        record.publisher = Field::Known("作家出版社".to_string());
        record.translators = Field::Known(vec![" ".to_string()]);
        record.quotes = vec!["".to_string(), "q\ns".to_string()];

        let record = record.normalize();
        assert!(record.isbn.is_unknown());
        assert_eq!(record.publisher.as_str(), "作家出版社");
        assert!(record.translators.is_unknown());
        assert_eq!(record.quotes, vec!["q\ns"]);
    }

    #[test]
    fn test_failed_outcome_shape() {
        let outcome = RecordOutcome::Failed {
            message: "Failed to parse the content due to an error.".to_string(),
        };
        assert!(!outcome.is_complete());
        assert!(outcome.record().is_none());
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            serde_json::json!({ "message": "Failed to parse the content due to an error." })
        );
    }
}
