//! Momentary button objects and button arrays.
//!
//! Buttons carry two millisecond thresholds: the long-press time and the
//! inactivity time, both in `[1000, 65535]`. The stateful variants add
//! transient press tracking that is never persisted by the authoring tool
//! but does ride along on the wire for live consumers.

use serde::{Deserialize, Serialize};

use crate::error::{DsError, Result};
use crate::model::{validate_index, ObjectKind};

/// Default long-press threshold in milliseconds.
pub const DEFAULT_LONG_PRESS_MS: u16 = 3000;

/// Default inactivity threshold in milliseconds.
pub const DEFAULT_INACTIVE_MS: u16 = 6000;

const TIME_MIN_MS: u32 = 1000;
const TIME_MAX_MS: u32 = 65535;

/// Returns true when `ms` is a valid press-timing threshold.
pub const fn is_time_valid(ms: u32) -> bool {
    ms >= TIME_MIN_MS && ms <= TIME_MAX_MS
}

fn validate_time(ms: u32) -> Result<u16> {
    if is_time_valid(ms) {
        #[allow(clippy::cast_possible_truncation)] // Range-checked above
        Ok(ms as u16)
    } else {
        Err(DsError::InvalidTime { ms })
    }
}

/// Momentary press state of a button.
///
/// Canonical form uses the symbolic name; the wire form uses the integer
/// value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressState {
    #[default]
    Depressed,
    Pressed,
}

impl PressState {
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Depressed => 0,
            Self::Pressed => 1,
        }
    }

    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Depressed),
            1 => Ok(Self::Pressed),
            _ => Err(DsError::WireDecode(format!(
                "invalid press state {value}: expected 0 or 1"
            ))),
        }
    }
}

/// A momentary button configuration object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    name: String,
    index: u8,
    long_press_ms: u16,
    inactive_ms: u16,
}

impl Button {
    pub fn new(name: impl Into<String>, index: u16, long_press_ms: u32, inactive_ms: u32) -> Result<Self> {
        let index = validate_index(index)?;
        let long_press_ms = validate_time(long_press_ms)?;
        let inactive_ms = validate_time(inactive_ms)?;
        Ok(Self {
            name: name.into(),
            index,
            long_press_ms,
            inactive_ms,
        })
    }

    pub fn id(&self) -> u16 {
        ObjectKind::Button.base_id() | u16::from(self.index)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn index(&self) -> u8 {
        self.index
    }

    pub const fn long_press_ms(&self) -> u16 {
        self.long_press_ms
    }

    pub const fn inactive_ms(&self) -> u16 {
        self.inactive_ms
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_index(&mut self, index: u16) -> Result<()> {
        self.index = validate_index(index)?;
        Ok(())
    }

    pub fn set_long_press_ms(&mut self, ms: u32) -> Result<()> {
        self.long_press_ms = validate_time(ms)?;
        Ok(())
    }

    pub fn set_inactive_ms(&mut self, ms: u32) -> Result<()> {
        self.inactive_ms = validate_time(ms)?;
        Ok(())
    }
}

impl Default for Button {
    fn default() -> Self {
        Self {
            name: String::new(),
            index: 1,
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            inactive_ms: DEFAULT_INACTIVE_MS,
        }
    }
}

/// A button carrying live transient press state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonState {
    name: String,
    index: u8,
    long_press_ms: u16,
    inactive_ms: u16,
    is_long_press: bool,
    is_inactive: bool,
    state: PressState,
}

impl ButtonState {
    pub fn new(name: impl Into<String>, index: u16, long_press_ms: u32, inactive_ms: u32) -> Result<Self> {
        let index = validate_index(index)?;
        let long_press_ms = validate_time(long_press_ms)?;
        let inactive_ms = validate_time(inactive_ms)?;
        Ok(Self {
            name: name.into(),
            index,
            long_press_ms,
            inactive_ms,
            is_long_press: false,
            is_inactive: false,
            state: PressState::Depressed,
        })
    }

    pub fn id(&self) -> u16 {
        ObjectKind::ButtonState.base_id() | u16::from(self.index)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn index(&self) -> u8 {
        self.index
    }

    pub const fn long_press_ms(&self) -> u16 {
        self.long_press_ms
    }

    pub const fn inactive_ms(&self) -> u16 {
        self.inactive_ms
    }

    pub const fn is_long_press(&self) -> bool {
        self.is_long_press
    }

    pub const fn is_inactive(&self) -> bool {
        self.is_inactive
    }

    pub const fn state(&self) -> PressState {
        self.state
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_index(&mut self, index: u16) -> Result<()> {
        self.index = validate_index(index)?;
        Ok(())
    }

    pub fn set_long_press_ms(&mut self, ms: u32) -> Result<()> {
        self.long_press_ms = validate_time(ms)?;
        Ok(())
    }

    pub fn set_inactive_ms(&mut self, ms: u32) -> Result<()> {
        self.inactive_ms = validate_time(ms)?;
        Ok(())
    }

    pub fn set_is_long_press(&mut self, value: bool) {
        self.is_long_press = value;
    }

    pub fn set_is_inactive(&mut self, value: bool) {
        self.is_inactive = value;
    }

    pub fn set_state(&mut self, state: PressState) {
        self.state = state;
    }
}

/// Element of a [`ButtonStateArray`]: a named transient press record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonStateElement {
    pub name: String,
    pub is_long_press: bool,
    pub is_inactive: bool,
    pub state: PressState,
}

impl ButtonStateElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// An array of momentary buttons sharing press timings.
///
/// Elements are bare names; no per-element validation exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonArray {
    name: String,
    index: u8,
    long_press_ms: u16,
    inactive_ms: u16,
    elements: Vec<String>,
}

impl ButtonArray {
    pub fn new(
        name: impl Into<String>,
        index: u16,
        long_press_ms: u32,
        inactive_ms: u32,
        elements: Vec<String>,
    ) -> Result<Self> {
        let index = validate_index(index)?;
        let long_press_ms = validate_time(long_press_ms)?;
        let inactive_ms = validate_time(inactive_ms)?;
        Ok(Self {
            name: name.into(),
            index,
            long_press_ms,
            inactive_ms,
            elements,
        })
    }

    pub fn id(&self) -> u16 {
        ObjectKind::ButtonArray.base_id() | u16::from(self.index)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn index(&self) -> u8 {
        self.index
    }

    pub const fn long_press_ms(&self) -> u16 {
        self.long_press_ms
    }

    pub const fn inactive_ms(&self) -> u16 {
        self.inactive_ms
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    pub fn element(&self, position: usize) -> Result<&str> {
        self.elements
            .get(position)
            .map(String::as_str)
            .ok_or(DsError::PositionOutOfRange {
                position,
                len: self.elements.len(),
            })
    }

    pub fn append_element(&mut self, name: impl Into<String>) {
        self.elements.push(name.into());
    }

    pub fn remove_element_at(&mut self, position: usize) -> Result<String> {
        if position >= self.elements.len() {
            return Err(DsError::PositionOutOfRange {
                position,
                len: self.elements.len(),
            });
        }
        Ok(self.elements.remove(position))
    }

    /// Removes the first element with the given name.
    pub fn remove_element(&mut self, name: &str) -> Result<String> {
        let position = self
            .elements
            .iter()
            .position(|e| e == name)
            .ok_or_else(|| DsError::NotFound {
                what: format!("button '{name}'"),
            })?;
        Ok(self.elements.remove(position))
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_index(&mut self, index: u16) -> Result<()> {
        self.index = validate_index(index)?;
        Ok(())
    }

    pub fn set_long_press_ms(&mut self, ms: u32) -> Result<()> {
        self.long_press_ms = validate_time(ms)?;
        Ok(())
    }

    pub fn set_inactive_ms(&mut self, ms: u32) -> Result<()> {
        self.inactive_ms = validate_time(ms)?;
        Ok(())
    }
}

/// A button array carrying live per-element press state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonStateArray {
    name: String,
    index: u8,
    long_press_ms: u16,
    inactive_ms: u16,
    elements: Vec<ButtonStateElement>,
}

impl ButtonStateArray {
    pub fn new(
        name: impl Into<String>,
        index: u16,
        long_press_ms: u32,
        inactive_ms: u32,
        elements: Vec<ButtonStateElement>,
    ) -> Result<Self> {
        let index = validate_index(index)?;
        let long_press_ms = validate_time(long_press_ms)?;
        let inactive_ms = validate_time(inactive_ms)?;
        Ok(Self {
            name: name.into(),
            index,
            long_press_ms,
            inactive_ms,
            elements,
        })
    }

    pub fn id(&self) -> u16 {
        ObjectKind::ButtonStateArray.base_id() | u16::from(self.index)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn index(&self) -> u8 {
        self.index
    }

    pub const fn long_press_ms(&self) -> u16 {
        self.long_press_ms
    }

    pub const fn inactive_ms(&self) -> u16 {
        self.inactive_ms
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> &[ButtonStateElement] {
        &self.elements
    }

    /// Live element list for in-place press-state updates.
    pub fn elements_mut(&mut self) -> &mut Vec<ButtonStateElement> {
        &mut self.elements
    }

    pub fn element(&self, position: usize) -> Result<&ButtonStateElement> {
        self.elements
            .get(position)
            .ok_or(DsError::PositionOutOfRange {
                position,
                len: self.elements.len(),
            })
    }

    pub fn append_element(&mut self, element: ButtonStateElement) {
        self.elements.push(element);
    }

    pub fn remove_element_at(&mut self, position: usize) -> Result<ButtonStateElement> {
        if position >= self.elements.len() {
            return Err(DsError::PositionOutOfRange {
                position,
                len: self.elements.len(),
            });
        }
        Ok(self.elements.remove(position))
    }

    /// Removes the first element equal to `element`.
    pub fn remove_element(&mut self, element: &ButtonStateElement) -> Result<ButtonStateElement> {
        let position = self
            .elements
            .iter()
            .position(|e| e == element)
            .ok_or_else(|| DsError::NotFound {
                what: format!("button '{}'", element.name),
            })?;
        Ok(self.elements.remove(position))
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_index(&mut self, index: u16) -> Result<()> {
        self.index = validate_index(index)?;
        Ok(())
    }

    pub fn set_long_press_ms(&mut self, ms: u32) -> Result<()> {
        self.long_press_ms = validate_time(ms)?;
        Ok(())
    }

    pub fn set_inactive_ms(&mut self, ms: u32) -> Result<()> {
        self.inactive_ms = validate_time(ms)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_bounds() {
        assert!(!is_time_valid(999));
        assert!(is_time_valid(1000));
        assert!(is_time_valid(65535));
        assert!(!is_time_valid(65536));
    }

    #[test]
    fn test_button_rejects_bad_times() {
        assert!(matches!(
            Button::new("b", 1, 999, 6000),
            Err(DsError::InvalidTime { ms: 999 })
        ));
        assert!(matches!(
            Button::new("b", 1, 3000, 65536),
            Err(DsError::InvalidTime { ms: 65536 })
        ));
    }

    #[test]
    fn test_button_id() {
        let b = Button::new("b", 255, 3000, 6000).unwrap();
        assert_eq!(b.id(), 0x04FF);
        let b = Button::new("b", 1, 3000, 6000).unwrap();
        assert_eq!(b.id(), 0x0401);
    }

    #[test]
    fn test_button_time_setters() {
        let mut b = Button::new("b", 1, 3000, 6000).unwrap();
        assert!(b.set_long_press_ms(100).is_err());
        assert_eq!(b.long_press_ms(), 3000);
        b.set_long_press_ms(1000).unwrap();
        b.set_inactive_ms(65535).unwrap();
        assert_eq!(b.long_press_ms(), 1000);
        assert_eq!(b.inactive_ms(), 65535);
    }

    #[test]
    fn test_button_state_defaults() {
        let bs = ButtonState::new("b", 3, 3000, 6000).unwrap();
        assert!(!bs.is_long_press());
        assert!(!bs.is_inactive());
        assert_eq!(bs.state(), PressState::Depressed);
        assert_eq!(bs.id(), 0x0403);
    }

    #[test]
    fn test_press_state_values() {
        assert_eq!(PressState::Depressed.as_u8(), 0);
        assert_eq!(PressState::Pressed.as_u8(), 1);
        assert_eq!(PressState::from_u8(1).unwrap(), PressState::Pressed);
        assert!(PressState::from_u8(2).is_err());
    }

    #[test]
    fn test_button_array_elements_unvalidated() {
        let mut arr =
            ButtonArray::new("arr", 2, 3000, 6000, vec!["up".to_string(), "down".to_string()])
                .unwrap();
        assert_eq!(arr.id(), 0x0902);
        assert_eq!(arr.element_count(), 2);

        arr.append_element("left");
        assert_eq!(arr.element(2).unwrap(), "left");

        assert_eq!(arr.remove_element("down").unwrap(), "down");
        assert!(matches!(
            arr.remove_element("down"),
            Err(DsError::NotFound { .. })
        ));
        assert_eq!(arr.element_count(), 2);
    }

    #[test]
    fn test_button_array_position_boundary() {
        let mut arr = ButtonArray::new("arr", 1, 3000, 6000, vec!["a".to_string()]).unwrap();
        assert!(matches!(
            arr.element(1),
            Err(DsError::PositionOutOfRange { position: 1, len: 1 })
        ));
        assert!(arr.remove_element_at(1).is_err());
        arr.remove_element_at(0).unwrap();
        assert_eq!(arr.element_count(), 0);
    }

    #[test]
    fn test_button_state_array_remove_by_value() {
        let e1 = ButtonStateElement::new("one");
        let mut e2 = ButtonStateElement::new("two");
        e2.state = PressState::Pressed;

        let mut arr =
            ButtonStateArray::new("arr", 1, 3000, 6000, vec![e1.clone(), e2.clone()]).unwrap();
        arr.remove_element(&e2).unwrap();
        assert_eq!(arr.element_count(), 1);

        // Same name, different state: no value match
        let mut ghost = ButtonStateElement::new("one");
        ghost.state = PressState::Pressed;
        assert!(matches!(
            arr.remove_element(&ghost),
            Err(DsError::NotFound { .. })
        ));
    }

    #[test]
    fn test_shared_bases() {
        let b = Button::new("b", 9, 3000, 6000).unwrap();
        let bs = ButtonState::new("b", 9, 3000, 6000).unwrap();
        assert_eq!(b.id(), bs.id());
    }
}
