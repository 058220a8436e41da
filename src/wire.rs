//! Compact CBOR wire encoding for firmware consumption.
//!
//! Each object renders as a single-entry CBOR map keyed by its integer wire
//! id (`BASE_ID | index`); the value is a map of the operationally-relevant
//! fields. Object and element names never reach the wire: array elements are
//! positional, and a decoded object carries an empty name. Encoding derives
//! straight from validated state and performs no validation of its own.

use ciborium::value::{Integer, Value};
use tracing::debug;

use crate::datastore::Datastore;
use crate::error::{DsError, Result};
use crate::model::{
    Button, ButtonArray, ButtonState, ButtonStateArray, ButtonStateElement, Float, FloatArray,
    FloatElement, IntArray, IntElement, MultiState, ObjectKind, PressState, UintArray,
    UintElement, UnsignedInteger, SignedInteger,
};

/// Conversion from a validated object to its wire map.
pub trait WireForm {
    /// The object's wire identifier, `BASE_ID | index`.
    fn wire_id(&self) -> u16;

    /// The retained-field map for this object.
    fn wire_fields(&self) -> Value;
}

fn entry(key: &str, value: Value) -> (Value, Value) {
    (Value::Text(key.to_string()), value)
}

fn uint(value: u64) -> Value {
    Value::Integer(Integer::from(value))
}

fn int(value: i64) -> Value {
    Value::Integer(Integer::from(value))
}

/// Renders an object as its single-entry wire map value.
pub fn to_value<T: WireForm>(object: &T) -> Value {
    Value::Map(vec![(
        Value::Integer(Integer::from(object.wire_id())),
        object.wire_fields(),
    )])
}

/// Encodes an object to CBOR bytes.
pub fn encode<T: WireForm>(object: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(&to_value(object), &mut buf)
        .map_err(|e| DsError::WireEncode(e.to_string()))?;
    Ok(buf)
}

/// Encodes a whole datastore as one CBOR map of all objects.
pub fn encode_datastore(store: &Datastore) -> Result<Vec<u8>> {
    let mut entries = Vec::new();
    let mut push = |id: u16, fields: Value| {
        entries.push((Value::Integer(Integer::from(id)), fields));
    };

    for obj in store.buttons.iter() {
        push(obj.wire_id(), obj.wire_fields());
    }
    for obj in store.button_arrays.iter() {
        push(obj.wire_id(), obj.wire_fields());
    }
    for obj in store.floats.iter() {
        push(obj.wire_id(), obj.wire_fields());
    }
    for obj in store.float_arrays.iter() {
        push(obj.wire_id(), obj.wire_fields());
    }
    for obj in store.multi_states.iter() {
        push(obj.wire_id(), obj.wire_fields());
    }
    for obj in store.signed_integers.iter() {
        push(obj.wire_id(), obj.wire_fields());
    }
    for obj in store.int_arrays.iter() {
        push(obj.wire_id(), obj.wire_fields());
    }
    for obj in store.unsigned_integers.iter() {
        push(obj.wire_id(), obj.wire_fields());
    }
    for obj in store.uint_arrays.iter() {
        push(obj.wire_id(), obj.wire_fields());
    }

    debug!(objects = entries.len(), "Encoding datastore wire image");
    let mut buf = Vec::new();
    ciborium::ser::into_writer(&Value::Map(entries), &mut buf)
        .map_err(|e| DsError::WireEncode(e.to_string()))?;
    Ok(buf)
}

impl WireForm for UnsignedInteger {
    fn wire_id(&self) -> u16 {
        self.id()
    }

    fn wire_fields(&self) -> Value {
        Value::Map(vec![
            entry("size", uint(u64::from(self.size()))),
            entry("min", uint(self.min())),
            entry("max", uint(self.max())),
            entry("default", uint(self.default_value())),
            entry("inNvm", Value::Bool(self.in_nvm())),
        ])
    }
}

impl WireForm for SignedInteger {
    fn wire_id(&self) -> u16 {
        self.id()
    }

    fn wire_fields(&self) -> Value {
        Value::Map(vec![
            entry("size", uint(u64::from(self.size()))),
            entry("min", int(self.min())),
            entry("max", int(self.max())),
            entry("default", int(self.default_value())),
            entry("inNvm", Value::Bool(self.in_nvm())),
        ])
    }
}

impl WireForm for Float {
    fn wire_id(&self) -> u16 {
        self.id()
    }

    fn wire_fields(&self) -> Value {
        Value::Map(vec![
            entry("size", uint(u64::from(self.size()))),
            entry("min", Value::Float(self.min())),
            entry("max", Value::Float(self.max())),
            entry("default", Value::Float(self.default_value())),
            entry("inNvm", Value::Bool(self.in_nvm())),
        ])
    }
}

impl WireForm for UintArray {
    fn wire_id(&self) -> u16 {
        self.id()
    }

    fn wire_fields(&self) -> Value {
        let elements = self
            .elements()
            .iter()
            .map(|e| {
                Value::Map(vec![
                    entry("min", uint(e.min)),
                    entry("max", uint(e.max)),
                    entry("default", uint(e.default)),
                ])
            })
            .collect();
        Value::Map(vec![
            entry("elements", Value::Array(elements)),
            entry("inNvm", Value::Bool(self.in_nvm())),
        ])
    }
}

impl WireForm for IntArray {
    fn wire_id(&self) -> u16 {
        self.id()
    }

    fn wire_fields(&self) -> Value {
        let elements = self
            .elements()
            .iter()
            .map(|e| {
                Value::Map(vec![
                    entry("min", int(e.min)),
                    entry("max", int(e.max)),
                    entry("default", int(e.default)),
                ])
            })
            .collect();
        Value::Map(vec![
            entry("elements", Value::Array(elements)),
            entry("inNvm", Value::Bool(self.in_nvm())),
        ])
    }
}

impl WireForm for FloatArray {
    fn wire_id(&self) -> u16 {
        self.id()
    }

    fn wire_fields(&self) -> Value {
        let elements = self
            .elements()
            .iter()
            .map(|e| {
                Value::Map(vec![
                    entry("min", Value::Float(e.min)),
                    entry("max", Value::Float(e.max)),
                    entry("default", Value::Float(e.default)),
                ])
            })
            .collect();
        Value::Map(vec![
            entry("elements", Value::Array(elements)),
            entry("inNvm", Value::Bool(self.in_nvm())),
        ])
    }
}

impl WireForm for Button {
    fn wire_id(&self) -> u16 {
        self.id()
    }

    fn wire_fields(&self) -> Value {
        Value::Map(vec![
            entry("longPressTime", uint(u64::from(self.long_press_ms()))),
            entry("inactiveTime", uint(u64::from(self.inactive_ms()))),
        ])
    }
}

impl WireForm for ButtonState {
    fn wire_id(&self) -> u16 {
        self.id()
    }

    fn wire_fields(&self) -> Value {
        Value::Map(vec![
            entry("longPressTime", uint(u64::from(self.long_press_ms()))),
            entry("inactiveTime", uint(u64::from(self.inactive_ms()))),
            entry("isLongPress", Value::Bool(self.is_long_press())),
            entry("isInactive", Value::Bool(self.is_inactive())),
            entry("state", uint(u64::from(self.state().as_u8()))),
        ])
    }
}

impl WireForm for ButtonArray {
    fn wire_id(&self) -> u16 {
        self.id()
    }

    // Momentary buttons need no per-element config beyond the shared
    // timings; only the count goes out.
    fn wire_fields(&self) -> Value {
        Value::Map(vec![
            entry("longPressTime", uint(u64::from(self.long_press_ms()))),
            entry("inactiveTime", uint(u64::from(self.inactive_ms()))),
            entry("elementCount", uint(self.element_count() as u64)),
        ])
    }
}

impl WireForm for ButtonStateArray {
    fn wire_id(&self) -> u16 {
        self.id()
    }

    fn wire_fields(&self) -> Value {
        let elements = self
            .elements()
            .iter()
            .map(|e| {
                Value::Map(vec![
                    entry("isLongPress", Value::Bool(e.is_long_press)),
                    entry("isInactive", Value::Bool(e.is_inactive)),
                    entry("state", uint(u64::from(e.state.as_u8()))),
                ])
            })
            .collect();
        Value::Map(vec![
            entry("longPressTime", uint(u64::from(self.long_press_ms()))),
            entry("inactiveTime", uint(u64::from(self.inactive_ms()))),
            entry("elements", Value::Array(elements)),
        ])
    }
}

impl WireForm for MultiState {
    fn wire_id(&self) -> u16 {
        self.id()
    }

    fn wire_fields(&self) -> Value {
        let states = self
            .states()
            .iter()
            .map(|s| Value::Text(s.clone()))
            .collect();
        Value::Map(vec![
            entry("states", Value::Array(states)),
            entry("inNvm", Value::Bool(self.in_nvm())),
        ])
    }
}

/// Aggregate metadata decoded from a button array's wire form.
///
/// Element names never reach the wire, so the full array is not
/// reconstructible; this is the retained subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonArraySummary {
    pub index: u8,
    pub long_press_ms: u16,
    pub inactive_ms: u16,
    pub element_count: usize,
}

impl ButtonArraySummary {
    pub fn id(&self) -> u16 {
        ObjectKind::ButtonArray.base_id() | u16::from(self.index)
    }
}

/// A typed object decoded from the wire.
///
/// Names are not part of the wire form; decoded objects and elements carry
/// empty names.
#[derive(Debug, Clone, PartialEq)]
pub enum WireObject {
    UnsignedInteger(UnsignedInteger),
    Float(Float),
    SignedInteger(SignedInteger),
    Button(Button),
    ButtonState(ButtonState),
    MultiState(MultiState),
    UintArray(UintArray),
    IntArray(IntArray),
    FloatArray(FloatArray),
    ButtonArray(ButtonArraySummary),
    ButtonStateArray(ButtonStateArray),
}

impl WireObject {
    pub fn id(&self) -> u16 {
        match self {
            Self::UnsignedInteger(o) => o.id(),
            Self::Float(o) => o.id(),
            Self::SignedInteger(o) => o.id(),
            Self::Button(o) => o.id(),
            Self::ButtonState(o) => o.id(),
            Self::MultiState(o) => o.id(),
            Self::UintArray(o) => o.id(),
            Self::IntArray(o) => o.id(),
            Self::FloatArray(o) => o.id(),
            Self::ButtonArray(o) => o.id(),
            Self::ButtonStateArray(o) => o.id(),
        }
    }

    pub const fn kind(&self) -> ObjectKind {
        match self {
            Self::UnsignedInteger(_) => ObjectKind::UnsignedInteger,
            Self::Float(_) => ObjectKind::Float,
            Self::SignedInteger(_) => ObjectKind::SignedInteger,
            Self::Button(_) => ObjectKind::Button,
            Self::ButtonState(_) => ObjectKind::ButtonState,
            Self::MultiState(_) => ObjectKind::MultiState,
            Self::UintArray(_) => ObjectKind::UintArray,
            Self::IntArray(_) => ObjectKind::IntArray,
            Self::FloatArray(_) => ObjectKind::FloatArray,
            Self::ButtonArray(_) => ObjectKind::ButtonArray,
            Self::ButtonStateArray(_) => ObjectKind::ButtonStateArray,
        }
    }
}

/// Decodes a single object from CBOR bytes.
pub fn decode(bytes: &[u8]) -> Result<WireObject> {
    let value: Value = ciborium::de::from_reader(bytes)
        .map_err(|e| DsError::WireDecode(e.to_string()))?;
    let Value::Map(entries) = value else {
        return Err(DsError::WireDecode("expected a top-level map".to_string()));
    };
    let [(key, fields)] = entries.as_slice() else {
        return Err(DsError::WireDecode(format!(
            "expected one object, found {}",
            entries.len()
        )));
    };
    decode_entry(key, fields)
}

/// Decodes every object from a datastore wire image.
pub fn decode_all(bytes: &[u8]) -> Result<Vec<WireObject>> {
    let value: Value = ciborium::de::from_reader(bytes)
        .map_err(|e| DsError::WireDecode(e.to_string()))?;
    let Value::Map(entries) = value else {
        return Err(DsError::WireDecode("expected a top-level map".to_string()));
    };
    entries
        .iter()
        .map(|(key, fields)| decode_entry(key, fields))
        .collect()
}

fn decode_entry(key: &Value, fields: &Value) -> Result<WireObject> {
    let id = key_id(key)?;
    let index = id & 0x00FF;
    let kind = ObjectKind::from_id(id)?;
    let Value::Map(map) = fields else {
        return Err(DsError::WireDecode(format!(
            "object {id:#06x}: expected a field map"
        )));
    };

    match kind {
        ObjectKind::UnsignedInteger => {
            let obj = UnsignedInteger::new(
                "",
                index,
                size_field(map)?,
                req_u64(map, "min")?,
                req_u64(map, "max")?,
                req_u64(map, "default")?,
                req_bool(map, "inNvm")?,
            )?;
            Ok(WireObject::UnsignedInteger(obj))
        }
        ObjectKind::SignedInteger => {
            let obj = SignedInteger::new(
                "",
                index,
                size_field(map)?,
                req_i64(map, "min")?,
                req_i64(map, "max")?,
                req_i64(map, "default")?,
                req_bool(map, "inNvm")?,
            )?;
            Ok(WireObject::SignedInteger(obj))
        }
        ObjectKind::Float => {
            let obj = Float::new(
                "",
                index,
                size_field(map)?,
                req_f64(map, "min")?,
                req_f64(map, "max")?,
                req_f64(map, "default")?,
                req_bool(map, "inNvm")?,
            )?;
            Ok(WireObject::Float(obj))
        }
        ObjectKind::MultiState => {
            let states = req_array(map, "states")?
                .iter()
                .map(|v| match v {
                    Value::Text(s) => Ok(s.clone()),
                    _ => Err(DsError::WireDecode("state names must be text".to_string())),
                })
                .collect::<Result<Vec<_>>>()?;
            let obj = MultiState::new("", index, states, "", req_bool(map, "inNvm")?)?;
            Ok(WireObject::MultiState(obj))
        }
        ObjectKind::UintArray => {
            let elements = req_array(map, "elements")?
                .iter()
                .map(|v| {
                    let m = element_map(v)?;
                    Ok(UintElement::new(
                        "",
                        req_u64(m, "min")?,
                        req_u64(m, "max")?,
                        req_u64(m, "default")?,
                    ))
                })
                .collect::<Result<Vec<_>>>()?;
            let obj = UintArray::new("", index, elements, req_bool(map, "inNvm")?)?;
            Ok(WireObject::UintArray(obj))
        }
        ObjectKind::IntArray => {
            let elements = req_array(map, "elements")?
                .iter()
                .map(|v| {
                    let m = element_map(v)?;
                    Ok(IntElement::new(
                        "",
                        req_i64(m, "min")?,
                        req_i64(m, "max")?,
                        req_i64(m, "default")?,
                    ))
                })
                .collect::<Result<Vec<_>>>()?;
            let obj = IntArray::new("", index, elements, req_bool(map, "inNvm")?)?;
            Ok(WireObject::IntArray(obj))
        }
        ObjectKind::FloatArray => {
            let elements = req_array(map, "elements")?
                .iter()
                .map(|v| {
                    let m = element_map(v)?;
                    Ok(FloatElement::new(
                        "",
                        req_f64(m, "min")?,
                        req_f64(m, "max")?,
                        req_f64(m, "default")?,
                    ))
                })
                .collect::<Result<Vec<_>>>()?;
            let obj = FloatArray::new("", index, elements, req_bool(map, "inNvm")?)?;
            Ok(WireObject::FloatArray(obj))
        }
        // Stateful variants share their base; field presence disambiguates.
        ObjectKind::Button | ObjectKind::ButtonState => {
            let long_press = req_u32(map, "longPressTime")?;
            let inactive = req_u32(map, "inactiveTime")?;
            if field(map, "isLongPress").is_some() {
                let mut obj = ButtonState::new("", index, long_press, inactive)?;
                obj.set_is_long_press(req_bool(map, "isLongPress")?);
                obj.set_is_inactive(req_bool(map, "isInactive")?);
                obj.set_state(PressState::from_u8(u8::try_from(req_u64(map, "state")?).map_err(
                    |_| DsError::WireDecode("press state out of range".to_string()),
                )?)?);
                Ok(WireObject::ButtonState(obj))
            } else {
                let obj = Button::new("", index, long_press, inactive)?;
                Ok(WireObject::Button(obj))
            }
        }
        ObjectKind::ButtonArray | ObjectKind::ButtonStateArray => {
            let long_press = req_u32(map, "longPressTime")?;
            let inactive = req_u32(map, "inactiveTime")?;
            if field(map, "elements").is_some() {
                let elements = req_array(map, "elements")?
                    .iter()
                    .map(|v| {
                        let m = element_map(v)?;
                        Ok(ButtonStateElement {
                            name: String::new(),
                            is_long_press: req_bool(m, "isLongPress")?,
                            is_inactive: req_bool(m, "isInactive")?,
                            state: PressState::from_u8(
                                u8::try_from(req_u64(m, "state")?).map_err(|_| {
                                    DsError::WireDecode("press state out of range".to_string())
                                })?,
                            )?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                let obj = ButtonStateArray::new("", index, long_press, inactive, elements)?;
                Ok(WireObject::ButtonStateArray(obj))
            } else {
                let element_count = usize::try_from(req_u64(map, "elementCount")?)
                    .map_err(|_| DsError::WireDecode("element count out of range".to_string()))?;
                // Index is still range-checked even for the summary form.
                let index = crate::model::validate_index(index)?;
                Ok(WireObject::ButtonArray(ButtonArraySummary {
                    index,
                    long_press_ms: clamp_time(long_press)?,
                    inactive_ms: clamp_time(inactive)?,
                    element_count,
                }))
            }
        }
    }
}

fn clamp_time(ms: u32) -> Result<u16> {
    u16::try_from(ms).map_err(|_| DsError::InvalidTime { ms })
}

fn key_id(key: &Value) -> Result<u16> {
    let Value::Integer(i) = key else {
        return Err(DsError::WireDecode("object key must be an integer id".to_string()));
    };
    u16::try_from(i128::from(*i))
        .map_err(|_| DsError::WireDecode(format!("object id {:?} out of range", i128::from(*i))))
}

fn field<'a>(map: &'a [(Value, Value)], key: &str) -> Option<&'a Value> {
    map.iter().find_map(|(k, v)| match k {
        Value::Text(t) if t == key => Some(v),
        _ => None,
    })
}

fn req_field<'a>(map: &'a [(Value, Value)], key: &str) -> Result<&'a Value> {
    field(map, key).ok_or_else(|| DsError::WireDecode(format!("missing field '{key}'")))
}

fn req_u64(map: &[(Value, Value)], key: &str) -> Result<u64> {
    match req_field(map, key)? {
        Value::Integer(i) => u64::try_from(i128::from(*i))
            .map_err(|_| DsError::WireDecode(format!("field '{key}' out of unsigned range"))),
        _ => Err(DsError::WireDecode(format!("field '{key}' must be an integer"))),
    }
}

fn req_i64(map: &[(Value, Value)], key: &str) -> Result<i64> {
    match req_field(map, key)? {
        Value::Integer(i) => i64::try_from(i128::from(*i))
            .map_err(|_| DsError::WireDecode(format!("field '{key}' out of signed range"))),
        _ => Err(DsError::WireDecode(format!("field '{key}' must be an integer"))),
    }
}

fn req_u32(map: &[(Value, Value)], key: &str) -> Result<u32> {
    u32::try_from(req_u64(map, key)?)
        .map_err(|_| DsError::WireDecode(format!("field '{key}' out of range")))
}

fn req_f64(map: &[(Value, Value)], key: &str) -> Result<f64> {
    match req_field(map, key)? {
        Value::Float(f) => Ok(*f),
        Value::Integer(i) => Ok(i128::from(*i) as f64),
        _ => Err(DsError::WireDecode(format!("field '{key}' must be a number"))),
    }
}

fn req_bool(map: &[(Value, Value)], key: &str) -> Result<bool> {
    match req_field(map, key)? {
        Value::Bool(b) => Ok(*b),
        _ => Err(DsError::WireDecode(format!("field '{key}' must be a bool"))),
    }
}

fn req_array<'a>(map: &'a [(Value, Value)], key: &str) -> Result<&'a [Value]> {
    match req_field(map, key)? {
        Value::Array(items) => Ok(items),
        _ => Err(DsError::WireDecode(format!("field '{key}' must be an array"))),
    }
}

fn element_map(value: &Value) -> Result<&[(Value, Value)]> {
    match value {
        Value::Map(m) => Ok(m),
        _ => Err(DsError::WireDecode("array element must be a map".to_string())),
    }
}

fn size_field(map: &[(Value, Value)]) -> Result<u8> {
    u8::try_from(req_u64(map, "size")?)
        .map_err(|_| DsError::WireDecode("field 'size' out of range".to_string()))
}
