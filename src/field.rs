//! Extracted field values
//!
//! A field is either a value read from the page or [`Field::Unknown`].
//! Hosts see unknown fields as a single space, which keeps them apart from
//! an intentionally empty string.

use serde::{Serialize, Serializer};

/// Placeholder handed to hosts for a field that could not be extracted
pub const UNKNOWN: &str = " ";

/// One extracted value with an explicit "unknown" state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    /// Value read from the page
    Known(T),
    /// Extraction failed or the page does not carry the field
    Unknown,
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::Unknown
    }
}

impl<T> Field<T> {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Self::Known(value) => value,
            Self::Unknown => default,
        }
    }
}

impl Field<String> {
    /// Known if `value` has any non-whitespace content
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Self::Unknown
        } else {
            Self::Known(value)
        }
    }

    /// The value, or [`UNKNOWN`]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(value) => value,
            Self::Unknown => UNKNOWN,
        }
    }
}

impl Field<Vec<String>> {
    /// Known if at least one item has content; blank items are dropped
    pub fn list(items: impl IntoIterator<Item = String>) -> Self {
        let items: Vec<String> = items
            .into_iter()
            .filter(|item| !item.trim().is_empty())
            .collect();
        if items.is_empty() {
            Self::Unknown
        } else {
            Self::Known(items)
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Known(value),
            None => Self::Unknown,
        }
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(value) => value.serialize(serializer),
            Self::Unknown => serializer.serialize_str(UNKNOWN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_is_unknown() {
        assert_eq!(Field::text(""), Field::Unknown);
        assert_eq!(Field::text(" \n\t"), Field::Unknown);
        assert_eq!(Field::text("活着"), Field::Known("活着".to_string()));
    }

    #[test]
    fn test_list_drops_blank_items() {
        let field = Field::list(vec!["张三".to_string(), " ".to_string()]);
        assert_eq!(field, Field::Known(vec!["张三".to_string()]));
        assert!(Field::list(Vec::<String>::new()).is_unknown());
    }

    #[test]
    fn test_unknown_serializes_as_space() {
        let unknown: Field<String> = Field::Unknown;
        assert_eq!(serde_json::to_value(&unknown).unwrap(), " ");

        let list = Field::Known(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            serde_json::to_value(&list).unwrap(),
            serde_json::json!(["a", "b"])
        );
    }
}
