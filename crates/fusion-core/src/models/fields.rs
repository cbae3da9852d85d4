//! Service input fields and the incoming field map
//!
//! A service declares an ordered list of named input fields. For IMEI-type
//! services the first declared field is the primary identifier and is
//! supplied directly; everything else arrives through the encoded custom
//! field blob. Declaration order is significant: validation reports the
//! first missing field in that order, and the first-submitted custom value
//! doubles as the stored primary value for non-IMEI services.

use serde::{Deserialize, Serialize};

/// A declared input field of a service, in declaration order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceField {
    /// Unique identifier; ascending ids give declaration order
    pub id: i64,

    /// Owning service
    pub service_id: i64,

    /// Field name as shown to resellers and matched against submissions
    pub name: String,
}

/// Ordered map of submitted field values, name to value
///
/// Preserves insertion order from the decoded request and distinguishes
/// absent keys from empty values; both count as missing for required-field
/// validation, but only present keys can supply a fallback primary value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: Vec<(String, String)>,
}

impl FieldMap {
    /// Create an empty field map
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, replacing any earlier value under the same name
    /// while keeping the original position
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Look up a submitted value by field name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// First-inserted entry, if any
    pub fn first(&self) -> Option<(&str, &str)> {
        self.entries.first().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of submitted fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no fields were submitted
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

/// Resolved input schema of a service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSchema {
    /// Name of the reserved primary field, if the service has one
    pub primary: Option<String>,

    /// Required secondary field names, in declaration order
    pub required: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let mut map = FieldMap::new();
        map.insert("Carrier", "Vodafone");
        map.insert("Country", "DE");
        map.insert("Model", "X200");

        let names: Vec<&str> = map.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Carrier", "Country", "Model"]);
        assert_eq!(map.first(), Some(("Carrier", "Vodafone")));
    }

    #[test]
    fn test_duplicate_insert_keeps_position() {
        let mut map = FieldMap::new();
        map.insert("a", "1");
        map.insert("b", "2");
        map.insert("a", "3");

        assert_eq!(map.len(), 2);
        assert_eq!(map.first(), Some(("a", "3")));
    }

    #[test]
    fn test_absent_vs_empty() {
        let mut map = FieldMap::new();
        map.insert("present", "");

        assert_eq!(map.get("present"), Some(""));
        assert_eq!(map.get("absent"), None);
    }
}
