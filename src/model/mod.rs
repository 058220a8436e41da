//! Typed datastore object model.
//!
//! Every object type carries a name and a 1-based index and derives its wire
//! identifier from a fixed per-type base id ORed with the index. Validation
//! happens at construction and on every mutator; the encoding layers never
//! re-validate.

mod array;
mod button;
mod multi_state;
mod scalar;

pub use array::{FloatArray, FloatElement, IntArray, IntElement, UintArray, UintElement};
pub use button::{
    Button, ButtonArray, ButtonState, ButtonStateArray, ButtonStateElement, PressState,
};
pub use multi_state::MultiState;
pub use scalar::{Float, SignedInteger, UnsignedInteger, FLOAT_SIZES, INT_SIZES};

use crate::error::{DsError, Result};

/// Closed set of datastore object kinds.
///
/// `Button`/`ButtonState` and `ButtonArray`/`ButtonStateArray` share a base
/// id; the stateful variants add transient press fields on top of the same
/// identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    UnsignedInteger,
    Float,
    SignedInteger,
    Button,
    ButtonState,
    MultiState,
    UintArray,
    IntArray,
    FloatArray,
    ButtonArray,
    ButtonStateArray,
}

impl ObjectKind {
    /// Fixed 16-bit base id for this kind. Low byte is always zero so the
    /// index ORs in without collision.
    pub const fn base_id(self) -> u16 {
        match self {
            Self::UnsignedInteger => 0x0100,
            Self::Float => 0x0200,
            Self::SignedInteger => 0x0300,
            Self::Button | Self::ButtonState => 0x0400,
            Self::MultiState => 0x0500,
            Self::UintArray => 0x0600,
            Self::IntArray => 0x0700,
            Self::FloatArray => 0x0800,
            Self::ButtonArray | Self::ButtonStateArray => 0x0900,
        }
    }

    /// Recovers the kind from a wire id's high byte.
    ///
    /// Shared bases resolve to the stateless variant; wire decoding refines
    /// to the stateful one from field presence.
    pub fn from_id(id: u16) -> Result<Self> {
        match id & 0xFF00 {
            0x0100 => Ok(Self::UnsignedInteger),
            0x0200 => Ok(Self::Float),
            0x0300 => Ok(Self::SignedInteger),
            0x0400 => Ok(Self::Button),
            0x0500 => Ok(Self::MultiState),
            0x0600 => Ok(Self::UintArray),
            0x0700 => Ok(Self::IntArray),
            0x0800 => Ok(Self::FloatArray),
            0x0900 => Ok(Self::ButtonArray),
            _ => Err(DsError::UnknownWireId { id }),
        }
    }

    /// Human-readable kind name, as shown by the CLI.
    pub const fn name(self) -> &'static str {
        match self {
            Self::UnsignedInteger => "unsigned integer",
            Self::Float => "float",
            Self::SignedInteger => "signed integer",
            Self::Button => "button",
            Self::ButtonState => "button state",
            Self::MultiState => "multi-state",
            Self::UintArray => "uint array",
            Self::IntArray => "int array",
            Self::FloatArray => "float array",
            Self::ButtonArray => "button array",
            Self::ButtonStateArray => "button state array",
        }
    }
}

/// Returns true when `index` is a valid object index (1-255).
pub const fn is_index_valid(index: u16) -> bool {
    index >= 1 && index <= 255
}

/// Validates an object index, narrowing it to the low byte of a wire id.
pub(crate) fn validate_index(index: u16) -> Result<u8> {
    if is_index_valid(index) {
        #[allow(clippy::cast_possible_truncation)] // Range-checked above
        Ok(index as u8)
    } else {
        Err(DsError::IndexOutOfRange { index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_bounds() {
        assert!(!is_index_valid(0));
        assert!(is_index_valid(1));
        assert!(is_index_valid(255));
        assert!(!is_index_valid(256));
    }

    #[test]
    fn test_validate_index_narrows() {
        assert_eq!(validate_index(255).unwrap(), 255u8);
        assert!(matches!(
            validate_index(0),
            Err(DsError::IndexOutOfRange { index: 0 })
        ));
        assert!(matches!(
            validate_index(256),
            Err(DsError::IndexOutOfRange { index: 256 })
        ));
    }

    #[test]
    fn test_base_ids_have_zero_low_byte() {
        let kinds = [
            ObjectKind::UnsignedInteger,
            ObjectKind::Float,
            ObjectKind::SignedInteger,
            ObjectKind::Button,
            ObjectKind::ButtonState,
            ObjectKind::MultiState,
            ObjectKind::UintArray,
            ObjectKind::IntArray,
            ObjectKind::FloatArray,
            ObjectKind::ButtonArray,
            ObjectKind::ButtonStateArray,
        ];
        for kind in kinds {
            assert_eq!(kind.base_id() & 0x00FF, 0, "{}", kind.name());
        }
    }

    #[test]
    fn test_kind_from_id() {
        assert_eq!(
            ObjectKind::from_id(0x0101).unwrap(),
            ObjectKind::UnsignedInteger
        );
        assert_eq!(ObjectKind::from_id(0x03FF).unwrap(), ObjectKind::SignedInteger);
        assert_eq!(ObjectKind::from_id(0x0901).unwrap(), ObjectKind::ButtonArray);
        assert!(matches!(
            ObjectKind::from_id(0x0A01),
            Err(DsError::UnknownWireId { id: 0x0A01 })
        ));
    }
}
