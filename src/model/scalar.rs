//! Bounded scalar objects: unsigned/signed integers and floats.
//!
//! Each scalar carries a byte width, inclusive `[min, max]` limits within the
//! representable range for that width, and a default inside the limits. All
//! invariants are checked at construction and on the corresponding setter.

use tracing::trace;

use crate::error::{DsError, Result};
use crate::model::{validate_index, ObjectKind};

/// Valid byte widths for integer scalars.
pub const INT_SIZES: &[u8] = &[1, 2, 4, 8];

/// Valid byte widths for float scalars.
pub const FLOAT_SIZES: &[u8] = &[4, 8];

/// Representable range for an unsigned integer of `size` bytes.
fn unsigned_range(size: u8) -> (u64, u64) {
    if size >= 8 {
        (0, u64::MAX)
    } else {
        (0, (1u64 << (8 * u32::from(size))) - 1)
    }
}

/// Representable range for a signed integer of `size` bytes.
fn signed_range(size: u8) -> (i64, i64) {
    if size >= 8 {
        (i64::MIN, i64::MAX)
    } else {
        let half = 1i64 << (8 * u32::from(size) - 1);
        (-half, half - 1)
    }
}

fn check_size(kind: &'static str, valid: &'static [u8], size: u8) -> Result<()> {
    if valid.contains(&size) {
        Ok(())
    } else {
        Err(DsError::UnsupportedSize { kind, size, valid })
    }
}

/// A bounded unsigned integer configuration object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedInteger {
    name: String,
    index: u8,
    size: u8,
    min: u64,
    max: u64,
    default: u64,
    in_nvm: bool,
}

impl UnsignedInteger {
    /// Returns true when `[min, max]` is ordered and representable in `size` bytes.
    pub fn are_limits_valid(size: u8, min: u64, max: u64) -> bool {
        let (lo, hi) = unsigned_range(size);
        min >= lo && max <= hi && min <= max
    }

    /// Returns true when `default` lies within `[min, max]`, boundary-inclusive.
    pub const fn is_default_valid(min: u64, max: u64, default: u64) -> bool {
        default >= min && default <= max
    }

    pub fn new(
        name: impl Into<String>,
        index: u16,
        size: u8,
        min: u64,
        max: u64,
        default: u64,
        in_nvm: bool,
    ) -> Result<Self> {
        let index = validate_index(index)?;
        check_size("unsigned integer", INT_SIZES, size)?;
        if !Self::are_limits_valid(size, min, max) {
            return Err(DsError::InvalidLimits {
                min: min.to_string(),
                max: max.to_string(),
                reason: format!("outside unsigned {size}-byte range or min > max"),
            });
        }
        if !Self::is_default_valid(min, max, default) {
            return Err(DsError::InvalidDefault {
                value: default.to_string(),
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        let name = name.into();
        trace!(name = %name, index, size, "Validated unsigned integer");
        Ok(Self {
            name,
            index,
            size,
            min,
            max,
            default,
            in_nvm,
        })
    }

    pub fn id(&self) -> u16 {
        ObjectKind::UnsignedInteger.base_id() | u16::from(self.index)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn index(&self) -> u8 {
        self.index
    }

    pub const fn size(&self) -> u8 {
        self.size
    }

    pub const fn min(&self) -> u64 {
        self.min
    }

    pub const fn max(&self) -> u64 {
        self.max
    }

    pub const fn default_value(&self) -> u64 {
        self.default
    }

    pub const fn in_nvm(&self) -> bool {
        self.in_nvm
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_index(&mut self, index: u16) -> Result<()> {
        self.index = validate_index(index)?;
        Ok(())
    }

    /// Changes the byte width. Does not re-validate existing limits against
    /// the new size.
    pub fn set_size(&mut self, size: u8) -> Result<()> {
        check_size("unsigned integer", INT_SIZES, size)?;
        self.size = size;
        Ok(())
    }

    pub fn set_limits(&mut self, min: u64, max: u64) -> Result<()> {
        if !Self::are_limits_valid(self.size, min, max) {
            return Err(DsError::InvalidLimits {
                min: min.to_string(),
                max: max.to_string(),
                reason: format!("outside unsigned {}-byte range or min > max", self.size),
            });
        }
        self.min = min;
        self.max = max;
        Ok(())
    }

    pub fn set_default(&mut self, default: u64) -> Result<()> {
        if !Self::is_default_valid(self.min, self.max, default) {
            return Err(DsError::InvalidDefault {
                value: default.to_string(),
                min: self.min.to_string(),
                max: self.max.to_string(),
            });
        }
        self.default = default;
        Ok(())
    }

    pub fn set_in_nvm(&mut self, in_nvm: bool) {
        self.in_nvm = in_nvm;
    }
}

/// A bounded signed integer configuration object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedInteger {
    name: String,
    index: u8,
    size: u8,
    min: i64,
    max: i64,
    default: i64,
    in_nvm: bool,
}

impl SignedInteger {
    /// Returns true when `[min, max]` is ordered and representable in `size` bytes.
    pub fn are_limits_valid(size: u8, min: i64, max: i64) -> bool {
        let (lo, hi) = signed_range(size);
        min >= lo && max <= hi && min <= max
    }

    /// Returns true when `default` lies within `[min, max]`, boundary-inclusive.
    pub const fn is_default_valid(min: i64, max: i64, default: i64) -> bool {
        default >= min && default <= max
    }

    pub fn new(
        name: impl Into<String>,
        index: u16,
        size: u8,
        min: i64,
        max: i64,
        default: i64,
        in_nvm: bool,
    ) -> Result<Self> {
        let index = validate_index(index)?;
        check_size("signed integer", INT_SIZES, size)?;
        if !Self::are_limits_valid(size, min, max) {
            return Err(DsError::InvalidLimits {
                min: min.to_string(),
                max: max.to_string(),
                reason: format!("outside signed {size}-byte range or min > max"),
            });
        }
        if !Self::is_default_valid(min, max, default) {
            return Err(DsError::InvalidDefault {
                value: default.to_string(),
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        let name = name.into();
        trace!(name = %name, index, size, "Validated signed integer");
        Ok(Self {
            name,
            index,
            size,
            min,
            max,
            default,
            in_nvm,
        })
    }

    pub fn id(&self) -> u16 {
        ObjectKind::SignedInteger.base_id() | u16::from(self.index)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn index(&self) -> u8 {
        self.index
    }

    pub const fn size(&self) -> u8 {
        self.size
    }

    pub const fn min(&self) -> i64 {
        self.min
    }

    pub const fn max(&self) -> i64 {
        self.max
    }

    pub const fn default_value(&self) -> i64 {
        self.default
    }

    pub const fn in_nvm(&self) -> bool {
        self.in_nvm
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_index(&mut self, index: u16) -> Result<()> {
        self.index = validate_index(index)?;
        Ok(())
    }

    /// Changes the byte width. Does not re-validate existing limits against
    /// the new size.
    pub fn set_size(&mut self, size: u8) -> Result<()> {
        check_size("signed integer", INT_SIZES, size)?;
        self.size = size;
        Ok(())
    }

    pub fn set_limits(&mut self, min: i64, max: i64) -> Result<()> {
        if !Self::are_limits_valid(self.size, min, max) {
            return Err(DsError::InvalidLimits {
                min: min.to_string(),
                max: max.to_string(),
                reason: format!("outside signed {}-byte range or min > max", self.size),
            });
        }
        self.min = min;
        self.max = max;
        Ok(())
    }

    pub fn set_default(&mut self, default: i64) -> Result<()> {
        if !Self::is_default_valid(self.min, self.max, default) {
            return Err(DsError::InvalidDefault {
                value: default.to_string(),
                min: self.min.to_string(),
                max: self.max.to_string(),
            });
        }
        self.default = default;
        Ok(())
    }

    pub fn set_in_nvm(&mut self, in_nvm: bool) {
        self.in_nvm = in_nvm;
    }
}

/// A bounded float configuration object.
///
/// Floats have no size-derived range; the only limit rule is `min < max`.
#[derive(Debug, Clone, PartialEq)]
pub struct Float {
    name: String,
    index: u8,
    size: u8,
    min: f64,
    max: f64,
    default: f64,
    in_nvm: bool,
}

impl Float {
    /// Returns true when `min` is strictly below `max`.
    pub fn are_limits_valid(min: f64, max: f64) -> bool {
        min < max
    }

    /// Returns true when `default` lies within `[min, max]`, boundary-inclusive.
    pub fn is_default_valid(min: f64, max: f64, default: f64) -> bool {
        default >= min && default <= max
    }

    pub fn new(
        name: impl Into<String>,
        index: u16,
        size: u8,
        min: f64,
        max: f64,
        default: f64,
        in_nvm: bool,
    ) -> Result<Self> {
        let index = validate_index(index)?;
        check_size("float", FLOAT_SIZES, size)?;
        if !Self::are_limits_valid(min, max) {
            return Err(DsError::InvalidLimits {
                min: min.to_string(),
                max: max.to_string(),
                reason: "min must be strictly below max".to_string(),
            });
        }
        if !Self::is_default_valid(min, max, default) {
            return Err(DsError::InvalidDefault {
                value: default.to_string(),
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        let name = name.into();
        trace!(name = %name, index, size, "Validated float");
        Ok(Self {
            name,
            index,
            size,
            min,
            max,
            default,
            in_nvm,
        })
    }

    pub fn id(&self) -> u16 {
        ObjectKind::Float.base_id() | u16::from(self.index)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn index(&self) -> u8 {
        self.index
    }

    pub const fn size(&self) -> u8 {
        self.size
    }

    pub const fn min(&self) -> f64 {
        self.min
    }

    pub const fn max(&self) -> f64 {
        self.max
    }

    pub const fn default_value(&self) -> f64 {
        self.default
    }

    pub const fn in_nvm(&self) -> bool {
        self.in_nvm
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_index(&mut self, index: u16) -> Result<()> {
        self.index = validate_index(index)?;
        Ok(())
    }

    /// Changes the byte width. Does not re-validate existing limits against
    /// the new size.
    pub fn set_size(&mut self, size: u8) -> Result<()> {
        check_size("float", FLOAT_SIZES, size)?;
        self.size = size;
        Ok(())
    }

    pub fn set_limits(&mut self, min: f64, max: f64) -> Result<()> {
        if !Self::are_limits_valid(min, max) {
            return Err(DsError::InvalidLimits {
                min: min.to_string(),
                max: max.to_string(),
                reason: "min must be strictly below max".to_string(),
            });
        }
        self.min = min;
        self.max = max;
        Ok(())
    }

    pub fn set_default(&mut self, default: f64) -> Result<()> {
        if !Self::is_default_valid(self.min, self.max, default) {
            return Err(DsError::InvalidDefault {
                value: default.to_string(),
                min: self.min.to_string(),
                max: self.max.to_string(),
            });
        }
        self.default = default;
        Ok(())
    }

    pub fn set_in_nvm(&mut self, in_nvm: bool) {
        self.in_nvm = in_nvm;
    }
}
