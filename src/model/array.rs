//! Homogeneous bounded arrays of numeric elements.
//!
//! Array elements are un-sized: instead of a byte-width they obey a fixed
//! 32-bit-scale cap (unsigned `[0, 2^32-1]`, signed `[-2^32, 2^32-1]`,
//! floats unbounded). Element limits are strict (`min < max`) and the
//! default is boundary-inclusive. Element names exist for editing only and
//! are dropped from the wire form.

use crate::error::{DsError, Result};
use crate::model::{validate_index, ObjectKind};

/// Upper cap for unsigned and signed array element limits.
const ELEMENT_MAX: u64 = u64::pow(2, 32) - 1;

/// Lower cap for signed array element limits.
const ELEMENT_MIN_SIGNED: i64 = -(1i64 << 32);

/// Element of a [`UintArray`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UintElement {
    pub name: String,
    pub min: u64,
    pub max: u64,
    pub default: u64,
}

impl UintElement {
    pub fn new(name: impl Into<String>, min: u64, max: u64, default: u64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            default,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.max > ELEMENT_MAX {
            return Err(invalid_element(&self.name, "max exceeds 2^32-1"));
        }
        if self.min >= self.max {
            return Err(invalid_element(&self.name, "min must be strictly below max"));
        }
        if self.default < self.min || self.default > self.max {
            return Err(invalid_element(&self.name, "default outside [min, max]"));
        }
        Ok(())
    }
}

/// Element of an [`IntArray`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntElement {
    pub name: String,
    pub min: i64,
    pub max: i64,
    pub default: i64,
}

impl IntElement {
    pub fn new(name: impl Into<String>, min: i64, max: i64, default: i64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            default,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.min < ELEMENT_MIN_SIGNED {
            return Err(invalid_element(&self.name, "min below -2^32"));
        }
        #[allow(clippy::cast_possible_wrap)] // ELEMENT_MAX fits in i64
        if self.max > ELEMENT_MAX as i64 {
            return Err(invalid_element(&self.name, "max exceeds 2^32-1"));
        }
        if self.min >= self.max {
            return Err(invalid_element(&self.name, "min must be strictly below max"));
        }
        if self.default < self.min || self.default > self.max {
            return Err(invalid_element(&self.name, "default outside [min, max]"));
        }
        Ok(())
    }
}

/// Element of a [`FloatArray`].
#[derive(Debug, Clone, PartialEq)]
pub struct FloatElement {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl FloatElement {
    pub fn new(name: impl Into<String>, min: f64, max: f64, default: f64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            default,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.min >= self.max {
            return Err(invalid_element(&self.name, "min must be strictly below max"));
        }
        if self.default < self.min || self.default > self.max {
            return Err(invalid_element(&self.name, "default outside [min, max]"));
        }
        Ok(())
    }
}

fn invalid_element(name: &str, reason: &str) -> DsError {
    DsError::InvalidElement {
        element: name.to_string(),
        reason: reason.to_string(),
    }
}

fn position_err(position: usize, len: usize) -> DsError {
    DsError::PositionOutOfRange { position, len }
}

/// An ordered array of bounded unsigned elements.
///
/// Construction validates every initial element; the first invalid element
/// rejects the whole array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UintArray {
    name: String,
    index: u8,
    elements: Vec<UintElement>,
    in_nvm: bool,
}

impl UintArray {
    pub fn new(
        name: impl Into<String>,
        index: u16,
        elements: Vec<UintElement>,
        in_nvm: bool,
    ) -> Result<Self> {
        let index = validate_index(index)?;
        for element in &elements {
            element.validate()?;
        }
        Ok(Self {
            name: name.into(),
            index,
            elements,
            in_nvm,
        })
    }

    pub fn id(&self) -> u16 {
        ObjectKind::UintArray.base_id() | u16::from(self.index)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn index(&self) -> u8 {
        self.index
    }

    pub const fn in_nvm(&self) -> bool {
        self.in_nvm
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> &[UintElement] {
        &self.elements
    }

    /// Live element list; in-place edits bypass element validation by design.
    pub fn elements_mut(&mut self) -> &mut Vec<UintElement> {
        &mut self.elements
    }

    pub fn element(&self, position: usize) -> Result<&UintElement> {
        self.elements
            .get(position)
            .ok_or_else(|| position_err(position, self.elements.len()))
    }

    pub fn append_element(&mut self, element: UintElement) -> Result<()> {
        element.validate()?;
        self.elements.push(element);
        Ok(())
    }

    pub fn remove_element_at(&mut self, position: usize) -> Result<UintElement> {
        if position >= self.elements.len() {
            return Err(position_err(position, self.elements.len()));
        }
        Ok(self.elements.remove(position))
    }

    /// Removes the first element equal to `element`.
    pub fn remove_element(&mut self, element: &UintElement) -> Result<UintElement> {
        let position = self
            .elements
            .iter()
            .position(|e| e == element)
            .ok_or_else(|| DsError::NotFound {
                what: format!("element '{}'", element.name),
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

    pub fn set_in_nvm(&mut self, in_nvm: bool) {
        self.in_nvm = in_nvm;
    }
}

/// An ordered array of bounded signed elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntArray {
    name: String,
    index: u8,
    elements: Vec<IntElement>,
    in_nvm: bool,
}

impl IntArray {
    pub fn new(
        name: impl Into<String>,
        index: u16,
        elements: Vec<IntElement>,
        in_nvm: bool,
    ) -> Result<Self> {
        let index = validate_index(index)?;
        for element in &elements {
            element.validate()?;
        }
        Ok(Self {
            name: name.into(),
            index,
            elements,
            in_nvm,
        })
    }

    pub fn id(&self) -> u16 {
        ObjectKind::IntArray.base_id() | u16::from(self.index)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn index(&self) -> u8 {
        self.index
    }

    pub const fn in_nvm(&self) -> bool {
        self.in_nvm
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> &[IntElement] {
        &self.elements
    }

    /// Live element list; in-place edits bypass element validation by design.
    pub fn elements_mut(&mut self) -> &mut Vec<IntElement> {
        &mut self.elements
    }

    pub fn element(&self, position: usize) -> Result<&IntElement> {
        self.elements
            .get(position)
            .ok_or_else(|| position_err(position, self.elements.len()))
    }

    pub fn append_element(&mut self, element: IntElement) -> Result<()> {
        element.validate()?;
        self.elements.push(element);
        Ok(())
    }

    pub fn remove_element_at(&mut self, position: usize) -> Result<IntElement> {
        if position >= self.elements.len() {
            return Err(position_err(position, self.elements.len()));
        }
        Ok(self.elements.remove(position))
    }

    /// Removes the first element equal to `element`.
    pub fn remove_element(&mut self, element: &IntElement) -> Result<IntElement> {
        let position = self
            .elements
            .iter()
            .position(|e| e == element)
            .ok_or_else(|| DsError::NotFound {
                what: format!("element '{}'", element.name),
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

    pub fn set_in_nvm(&mut self, in_nvm: bool) {
        self.in_nvm = in_nvm;
    }
}

/// An ordered array of bounded float elements.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatArray {
    name: String,
    index: u8,
    elements: Vec<FloatElement>,
    in_nvm: bool,
}

impl FloatArray {
    pub fn new(
        name: impl Into<String>,
        index: u16,
        elements: Vec<FloatElement>,
        in_nvm: bool,
    ) -> Result<Self> {
        let index = validate_index(index)?;
        for element in &elements {
            element.validate()?;
        }
        Ok(Self {
            name: name.into(),
            index,
            elements,
            in_nvm,
        })
    }

    pub fn id(&self) -> u16 {
        ObjectKind::FloatArray.base_id() | u16::from(self.index)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn index(&self) -> u8 {
        self.index
    }

    pub const fn in_nvm(&self) -> bool {
        self.in_nvm
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> &[FloatElement] {
        &self.elements
    }

    /// Live element list; in-place edits bypass element validation by design.
    pub fn elements_mut(&mut self) -> &mut Vec<FloatElement> {
        &mut self.elements
    }

    pub fn element(&self, position: usize) -> Result<&FloatElement> {
        self.elements
            .get(position)
            .ok_or_else(|| position_err(position, self.elements.len()))
    }

    pub fn append_element(&mut self, element: FloatElement) -> Result<()> {
        element.validate()?;
        self.elements.push(element);
        Ok(())
    }

    pub fn remove_element_at(&mut self, position: usize) -> Result<FloatElement> {
        if position >= self.elements.len() {
            return Err(position_err(position, self.elements.len()));
        }
        Ok(self.elements.remove(position))
    }

    /// Removes the first element equal to `element`.
    pub fn remove_element(&mut self, element: &FloatElement) -> Result<FloatElement> {
        let position = self
            .elements
            .iter()
            .position(|e| e == element)
            .ok_or_else(|| DsError::NotFound {
                what: format!("element '{}'", element.name),
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

    pub fn set_in_nvm(&mut self, in_nvm: bool) {
        self.in_nvm = in_nvm;
    }
}
