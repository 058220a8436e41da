//! Intermediate schema for parsed datastore documents.
//!
//! The canonical text form is a YAML document whose named collections are
//! lists of single-key maps (`- objectName: {fields}`). These records are an
//! explicit, fully-typed staging layer: loaders parse into them, and the
//! datastore's populate operations run each record through the matching
//! validating constructor. Field declaration order here fixes the canonical
//! field order.

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DsError, Result};
use crate::model::PressState;

/// A record keyed by its object (or element) name.
///
/// Serializes as a single-entry map `{name: value}`; deserialization rejects
/// maps with any other entry count.
#[derive(Debug, Clone, PartialEq)]
pub struct Named<T> {
    pub name: String,
    pub value: T,
}

impl<T> Named<T> {
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl<T: Serialize> Serialize for Named<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.value)?;
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Named<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct NamedVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for NamedVisitor<T> {
            type Value = Named<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map with exactly one entry")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let Some((name, value)) = map.next_entry::<String, T>()? else {
                    return Err(de::Error::invalid_length(0, &self));
                };
                if map.next_key::<String>()?.is_some() {
                    return Err(de::Error::custom("expected a map with exactly one entry"));
                }
                Ok(Named { name, value })
            }
        }

        deserializer.deserialize_map(NamedVisitor(PhantomData))
    }
}

/// Bounded scalar record: unsigned (`u64`), signed (`i64`) or float (`f64`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalarRecord<T> {
    pub index: u16,
    pub size: u8,
    pub min: T,
    pub max: T,
    pub default: T,
    #[serde(default)]
    pub in_nvm: bool,
}

/// Bounds of a numeric array element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundsRecord<T> {
    pub min: T,
    pub max: T,
    pub default: T,
}

/// Numeric array record; elements are name-keyed bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayRecord<T> {
    pub index: u16,
    #[serde(default)]
    pub elements: Vec<Named<BoundsRecord<T>>>,
    #[serde(default)]
    pub in_nvm: bool,
}

const fn default_long_press() -> u32 {
    3000
}

const fn default_inactive() -> u32 {
    6000
}

/// Button record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonRecord {
    pub index: u16,
    #[serde(default = "default_long_press")]
    pub long_press_time: u32,
    #[serde(default = "default_inactive")]
    pub inactive_time: u32,
}

/// Button record with transient press state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonStateRecord {
    pub index: u16,
    #[serde(default = "default_long_press")]
    pub long_press_time: u32,
    #[serde(default = "default_inactive")]
    pub inactive_time: u32,
    #[serde(default)]
    pub is_long_press: bool,
    #[serde(default)]
    pub is_inactive: bool,
    #[serde(default)]
    pub state: PressState,
}

/// Button array record; elements are bare names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonArrayRecord {
    pub index: u16,
    #[serde(default = "default_long_press")]
    pub long_press_time: u32,
    #[serde(default = "default_inactive")]
    pub inactive_time: u32,
    #[serde(default)]
    pub elements: Vec<String>,
}

/// Per-element transient press state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonStateElementRecord {
    #[serde(default)]
    pub is_long_press: bool,
    #[serde(default)]
    pub is_inactive: bool,
    #[serde(default)]
    pub state: PressState,
}

/// Button state array record; elements are name-keyed press states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonStateArrayRecord {
    pub index: u16,
    #[serde(default = "default_long_press")]
    pub long_press_time: u32,
    #[serde(default = "default_inactive")]
    pub inactive_time: u32,
    #[serde(default)]
    pub elements: Vec<Named<ButtonStateElementRecord>>,
}

/// Multi-state record. The in-memory default selection is not part of the
/// canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiStateRecord {
    pub index: u16,
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub in_nvm: bool,
}

/// A complete parsed datastore document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub name: String,
    pub last_modified: NaiveDate,
    pub working_dir: PathBuf,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Named<ButtonRecord>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub button_arrays: Vec<Named<ButtonArrayRecord>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub floats: Vec<Named<ScalarRecord<f64>>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub float_arrays: Vec<Named<ArrayRecord<f64>>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub multi_states: Vec<Named<MultiStateRecord>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signed_integers: Vec<Named<ScalarRecord<i64>>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub int_arrays: Vec<Named<ArrayRecord<i64>>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unsigned_integers: Vec<Named<ScalarRecord<u64>>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uint_arrays: Vec<Named<ArrayRecord<u64>>>,
}

impl Document {
    /// Parses a document from canonical YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| DsError::DocumentParse(e.to_string()))
    }

    /// Renders the document as canonical YAML text.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| DsError::DocumentParse(e.to_string()))
    }

    /// Loads a document from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&text)
    }

    /// Writes the document as YAML to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_yaml()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_round_trip() {
        let named = Named::new(
            "counter",
            ScalarRecord {
                index: 1,
                size: 1,
                min: 0u64,
                max: 255,
                default: 32,
                in_nvm: true,
            },
        );
        let yaml = serde_yaml::to_string(&named).unwrap();
        let back: Named<ScalarRecord<u64>> = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, named);
    }

    #[test]
    fn test_named_rejects_multi_key_map() {
        let yaml = "a: {min: 0, max: 1, default: 0}\nb: {min: 0, max: 1, default: 0}\n";
        let result: std::result::Result<Named<BoundsRecord<u64>>, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_document_parse_minimal() {
        let yaml = "name: store\nlastModified: 2026-08-30\nworkingDir: /tmp/proj\n";
        let doc = Document::from_yaml(yaml).unwrap();
        assert_eq!(doc.name, "store");
        assert_eq!(
            doc.last_modified,
            NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
        );
        assert!(doc.unsigned_integers.is_empty());
    }

    #[test]
    fn test_document_parse_collections() {
        let yaml = r"
name: store
lastModified: 2026-08-30
workingDir: /tmp/proj
unsignedIntegers:
  - counter:
      index: 1
      size: 1
      min: 0
      max: 255
      default: 32
      inNvm: true
buttons:
  - power:
      index: 2
multiStates:
  - mode:
      index: 1
      states: [A, B]
";
        let doc = Document::from_yaml(yaml).unwrap();
        assert_eq!(doc.unsigned_integers.len(), 1);
        assert_eq!(doc.unsigned_integers[0].name, "counter");
        assert_eq!(doc.unsigned_integers[0].value.max, 255);
        // Button times fall back to the defaults
        assert_eq!(doc.buttons[0].value.long_press_time, 3000);
        assert_eq!(doc.buttons[0].value.inactive_time, 6000);
        assert_eq!(doc.multi_states[0].value.states, ["A", "B"]);
    }

    #[test]
    fn test_document_yaml_round_trip() {
        let yaml = r"
name: store
lastModified: 2026-08-30
workingDir: /tmp/proj
uintArrays:
  - calib:
      index: 3
      elements:
        - gain: {min: 0, max: 100, default: 50}
        - offset: {min: 0, max: 10, default: 0}
      inNvm: true
";
        let doc = Document::from_yaml(yaml).unwrap();
        let text = doc.to_yaml().unwrap();
        let back = Document::from_yaml(&text).unwrap();
        assert_eq!(back, doc);
        // Element order survives
        assert_eq!(back.uint_arrays[0].value.elements[0].name, "gain");
        assert_eq!(back.uint_arrays[0].value.elements[1].name, "offset");
    }

    #[test]
    fn test_document_parse_error_kind() {
        let err = Document::from_yaml("not: [valid").unwrap_err();
        assert!(matches!(err, DsError::DocumentParse(_)));
    }
}
