//! Multi-state objects: named enumerations with an ordered state list.

use crate::error::Result;
use crate::model::{validate_index, ObjectKind};

/// A named enumerated value.
///
/// Insertion order of `states` defines the numeric encoding order consumed
/// by firmware. The `default` selection lives only in memory: it is absent
/// from both the canonical and the wire encoding, and neither the
/// constructor nor `append_state` enforces that it names a known state.
/// [`MultiState::is_default_valid`] exists for editing collaborators that
/// want to check before saving.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiState {
    name: String,
    index: u8,
    states: Vec<String>,
    default: String,
    in_nvm: bool,
}

impl MultiState {
    pub fn new(
        name: impl Into<String>,
        index: u16,
        states: Vec<String>,
        default: impl Into<String>,
        in_nvm: bool,
    ) -> Result<Self> {
        let index = validate_index(index)?;
        Ok(Self {
            name: name.into(),
            index,
            states,
            default: default.into(),
            in_nvm,
        })
    }

    pub fn id(&self) -> u16 {
        ObjectKind::MultiState.base_id() | u16::from(self.index)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn index(&self) -> u8 {
        self.index
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn default_state(&self) -> &str {
        &self.default
    }

    pub const fn in_nvm(&self) -> bool {
        self.in_nvm
    }

    /// Returns true when the default names one of the states.
    pub fn is_default_valid(&self) -> bool {
        self.states.iter().any(|s| s == &self.default)
    }

    pub fn append_state(&mut self, state: impl Into<String>) {
        self.states.push(state.into());
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_index(&mut self, index: u16) -> Result<()> {
        self.index = validate_index(index)?;
        Ok(())
    }

    /// Not validated against the state list; see the type-level note.
    pub fn set_default(&mut self, default: impl Into<String>) {
        self.default = default.into();
    }

    pub fn set_in_nvm(&mut self, in_nvm: bool) {
        self.in_nvm = in_nvm;
    }
}
