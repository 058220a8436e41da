//! Canonical (human-readable) encoding.
//!
//! Every object renders as a single name-keyed YAML mapping and decodes back
//! through its validating constructor, so a canonical document can never
//! smuggle in invalid state. The conversion goes through the typed records
//! in [`crate::document`]; fields absent from the record layer (the
//! multi-state default selection) are absent from this form by design.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::document::{
    ArrayRecord, BoundsRecord, ButtonArrayRecord, ButtonRecord, ButtonStateArrayRecord,
    ButtonStateElementRecord, ButtonStateRecord, MultiStateRecord, Named, ScalarRecord,
};
use crate::error::{DsError, Result};
use crate::model::{
    Button, ButtonArray, ButtonState, ButtonStateArray, ButtonStateElement, Float, FloatArray,
    FloatElement, IntArray, IntElement, MultiState, UintArray, UintElement, SignedInteger,
    UnsignedInteger,
};

/// Conversion between a validated object and its name-keyed record.
pub trait CanonicalForm: Sized {
    type Record: Serialize + DeserializeOwned;

    /// Renders the validated state as a record. Never fails: encoding adds
    /// no validation of its own.
    fn to_record(&self) -> Named<Self::Record>;

    /// Rebuilds the object through its validating constructor.
    fn from_record(record: Named<Self::Record>) -> Result<Self>;
}

/// Encodes an object as canonical YAML text.
pub fn encode<T: CanonicalForm>(object: &T) -> Result<String> {
    serde_yaml::to_string(&object.to_record()).map_err(|e| DsError::DocumentParse(e.to_string()))
}

/// Decodes an object from canonical YAML text.
pub fn decode<T: CanonicalForm>(text: &str) -> Result<T> {
    let record: Named<T::Record> =
        serde_yaml::from_str(text).map_err(|e| DsError::DocumentParse(e.to_string()))?;
    T::from_record(record)
}

impl CanonicalForm for UnsignedInteger {
    type Record = ScalarRecord<u64>;

    fn to_record(&self) -> Named<Self::Record> {
        Named::new(
            self.name(),
            ScalarRecord {
                index: u16::from(self.index()),
                size: self.size(),
                min: self.min(),
                max: self.max(),
                default: self.default_value(),
                in_nvm: self.in_nvm(),
            },
        )
    }

    fn from_record(record: Named<Self::Record>) -> Result<Self> {
        let r = record.value;
        Self::new(record.name, r.index, r.size, r.min, r.max, r.default, r.in_nvm)
    }
}

impl CanonicalForm for SignedInteger {
    type Record = ScalarRecord<i64>;

    fn to_record(&self) -> Named<Self::Record> {
        Named::new(
            self.name(),
            ScalarRecord {
                index: u16::from(self.index()),
                size: self.size(),
                min: self.min(),
                max: self.max(),
                default: self.default_value(),
                in_nvm: self.in_nvm(),
            },
        )
    }

    fn from_record(record: Named<Self::Record>) -> Result<Self> {
        let r = record.value;
        Self::new(record.name, r.index, r.size, r.min, r.max, r.default, r.in_nvm)
    }
}

impl CanonicalForm for Float {
    type Record = ScalarRecord<f64>;

    fn to_record(&self) -> Named<Self::Record> {
        Named::new(
            self.name(),
            ScalarRecord {
                index: u16::from(self.index()),
                size: self.size(),
                min: self.min(),
                max: self.max(),
                default: self.default_value(),
                in_nvm: self.in_nvm(),
            },
        )
    }

    fn from_record(record: Named<Self::Record>) -> Result<Self> {
        let r = record.value;
        Self::new(record.name, r.index, r.size, r.min, r.max, r.default, r.in_nvm)
    }
}

impl CanonicalForm for UintArray {
    type Record = ArrayRecord<u64>;

    fn to_record(&self) -> Named<Self::Record> {
        Named::new(
            self.name(),
            ArrayRecord {
                index: u16::from(self.index()),
                elements: self
                    .elements()
                    .iter()
                    .map(|e| {
                        Named::new(
                            &e.name,
                            BoundsRecord {
                                min: e.min,
                                max: e.max,
                                default: e.default,
                            },
                        )
                    })
                    .collect(),
                in_nvm: self.in_nvm(),
            },
        )
    }

    fn from_record(record: Named<Self::Record>) -> Result<Self> {
        let r = record.value;
        let elements = r
            .elements
            .into_iter()
            .map(|e| UintElement::new(e.name, e.value.min, e.value.max, e.value.default))
            .collect();
        Self::new(record.name, r.index, elements, r.in_nvm)
    }
}

impl CanonicalForm for IntArray {
    type Record = ArrayRecord<i64>;

    fn to_record(&self) -> Named<Self::Record> {
        Named::new(
            self.name(),
            ArrayRecord {
                index: u16::from(self.index()),
                elements: self
                    .elements()
                    .iter()
                    .map(|e| {
                        Named::new(
                            &e.name,
                            BoundsRecord {
                                min: e.min,
                                max: e.max,
                                default: e.default,
                            },
                        )
                    })
                    .collect(),
                in_nvm: self.in_nvm(),
            },
        )
    }

    fn from_record(record: Named<Self::Record>) -> Result<Self> {
        let r = record.value;
        let elements = r
            .elements
            .into_iter()
            .map(|e| IntElement::new(e.name, e.value.min, e.value.max, e.value.default))
            .collect();
        Self::new(record.name, r.index, elements, r.in_nvm)
    }
}

impl CanonicalForm for FloatArray {
    type Record = ArrayRecord<f64>;

    fn to_record(&self) -> Named<Self::Record> {
        Named::new(
            self.name(),
            ArrayRecord {
                index: u16::from(self.index()),
                elements: self
                    .elements()
                    .iter()
                    .map(|e| {
                        Named::new(
                            &e.name,
                            BoundsRecord {
                                min: e.min,
                                max: e.max,
                                default: e.default,
                            },
                        )
                    })
                    .collect(),
                in_nvm: self.in_nvm(),
            },
        )
    }

    fn from_record(record: Named<Self::Record>) -> Result<Self> {
        let r = record.value;
        let elements = r
            .elements
            .into_iter()
            .map(|e| FloatElement::new(e.name, e.value.min, e.value.max, e.value.default))
            .collect();
        Self::new(record.name, r.index, elements, r.in_nvm)
    }
}

impl CanonicalForm for Button {
    type Record = ButtonRecord;

    fn to_record(&self) -> Named<Self::Record> {
        Named::new(
            self.name(),
            ButtonRecord {
                index: u16::from(self.index()),
                long_press_time: u32::from(self.long_press_ms()),
                inactive_time: u32::from(self.inactive_ms()),
            },
        )
    }

    fn from_record(record: Named<Self::Record>) -> Result<Self> {
        let r = record.value;
        Self::new(record.name, r.index, r.long_press_time, r.inactive_time)
    }
}

impl CanonicalForm for ButtonState {
    type Record = ButtonStateRecord;

    fn to_record(&self) -> Named<Self::Record> {
        Named::new(
            self.name(),
            ButtonStateRecord {
                index: u16::from(self.index()),
                long_press_time: u32::from(self.long_press_ms()),
                inactive_time: u32::from(self.inactive_ms()),
                is_long_press: self.is_long_press(),
                is_inactive: self.is_inactive(),
                state: self.state(),
            },
        )
    }

    fn from_record(record: Named<Self::Record>) -> Result<Self> {
        let r = record.value;
        let mut button = Self::new(record.name, r.index, r.long_press_time, r.inactive_time)?;
        button.set_is_long_press(r.is_long_press);
        button.set_is_inactive(r.is_inactive);
        button.set_state(r.state);
        Ok(button)
    }
}

impl CanonicalForm for ButtonArray {
    type Record = ButtonArrayRecord;

    fn to_record(&self) -> Named<Self::Record> {
        Named::new(
            self.name(),
            ButtonArrayRecord {
                index: u16::from(self.index()),
                long_press_time: u32::from(self.long_press_ms()),
                inactive_time: u32::from(self.inactive_ms()),
                elements: self.elements().to_vec(),
            },
        )
    }

    fn from_record(record: Named<Self::Record>) -> Result<Self> {
        let r = record.value;
        Self::new(
            record.name,
            r.index,
            r.long_press_time,
            r.inactive_time,
            r.elements,
        )
    }
}

impl CanonicalForm for ButtonStateArray {
    type Record = ButtonStateArrayRecord;

    fn to_record(&self) -> Named<Self::Record> {
        Named::new(
            self.name(),
            ButtonStateArrayRecord {
                index: u16::from(self.index()),
                long_press_time: u32::from(self.long_press_ms()),
                inactive_time: u32::from(self.inactive_ms()),
                elements: self
                    .elements()
                    .iter()
                    .map(|e| {
                        Named::new(
                            &e.name,
                            ButtonStateElementRecord {
                                is_long_press: e.is_long_press,
                                is_inactive: e.is_inactive,
                                state: e.state,
                            },
                        )
                    })
                    .collect(),
            },
        )
    }

    fn from_record(record: Named<Self::Record>) -> Result<Self> {
        let r = record.value;
        let elements = r
            .elements
            .into_iter()
            .map(|e| ButtonStateElement {
                name: e.name,
                is_long_press: e.value.is_long_press,
                is_inactive: e.value.is_inactive,
                state: e.value.state,
            })
            .collect();
        Self::new(
            record.name,
            r.index,
            r.long_press_time,
            r.inactive_time,
            elements,
        )
    }
}

impl CanonicalForm for MultiState {
    type Record = MultiStateRecord;

    fn to_record(&self) -> Named<Self::Record> {
        // The default selection is deliberately not part of this form.
        Named::new(
            self.name(),
            MultiStateRecord {
                index: u16::from(self.index()),
                states: self.states().to_vec(),
                in_nvm: self.in_nvm(),
            },
        )
    }

    fn from_record(record: Named<Self::Record>) -> Result<Self> {
        let r = record.value;
        Self::new(record.name, r.index, r.states, "", r.in_nvm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_canonical_round_trip() {
        let obj = UnsignedInteger::new("counter", 1, 1, 0, 255, 32, true).unwrap();
        let yaml = encode(&obj).unwrap();
        assert!(yaml.starts_with("counter:"));
        let back: UnsignedInteger = decode(&yaml).unwrap();
        assert_eq!(back, obj);
    }

    #[test]
    fn test_array_canonical_keeps_element_names_and_order() {
        let obj = UintArray::new(
            "calib",
            2,
            vec![
                UintElement::new("gain", 0, 100, 50),
                UintElement::new("offset", 0, 10, 0),
            ],
            false,
        )
        .unwrap();
        let yaml = encode(&obj).unwrap();
        let back: UintArray = decode(&yaml).unwrap();
        assert_eq!(back, obj);
        assert_eq!(back.element(0).unwrap().name, "gain");
        assert_eq!(back.element(1).unwrap().name, "offset");
    }

    #[test]
    fn test_decode_runs_validation() {
        let yaml = "bad:\n  index: 0\n  size: 1\n  min: 0\n  max: 255\n  default: 0\n";
        let err = decode::<UnsignedInteger>(yaml).unwrap_err();
        assert!(matches!(err, crate::error::DsError::IndexOutOfRange { index: 0 }));
    }

    #[test]
    fn test_button_state_canonical_uses_symbolic_state() {
        let mut obj = ButtonState::new("power", 1, 3000, 6000).unwrap();
        obj.set_state(crate::model::PressState::Pressed);
        let yaml = encode(&obj).unwrap();
        assert!(yaml.contains("state: pressed"));
        let back: ButtonState = decode(&yaml).unwrap();
        assert_eq!(back, obj);
    }

    #[test]
    fn test_scenario_d_multi_state_omits_default() {
        let obj = MultiState::new(
            "mode",
            1,
            vec!["A".to_string(), "B".to_string()],
            "A",
            false,
        )
        .unwrap();
        let yaml = encode(&obj).unwrap();
        assert!(yaml.contains("states:"));
        // Asserting observed behavior: the default selection is absent.
        assert!(!yaml.contains("default"));

        let back: MultiState = decode(&yaml).unwrap();
        assert_eq!(back.states(), obj.states());
        assert_eq!(back.default_state(), "");
    }

    #[test]
    fn test_float_canonical_round_trip() {
        let obj = Float::new("gain", 9, 4, -1.5, 1.5, 0.25, true).unwrap();
        let yaml = encode(&obj).unwrap();
        let back: Float = decode(&yaml).unwrap();
        assert_eq!(back, obj);
    }
}
