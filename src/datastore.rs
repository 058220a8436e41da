//! The datastore aggregate: ordered, owned collections of every object type.
//!
//! Collections expose a uniform CRUD contract (by position and by value) and
//! per-type bulk loaders that consume parsed document records. Loaders are
//! atomic per call: the whole batch is validated before anything is
//! appended, so one malformed record never leaves a half-loaded collection.

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::canonical::CanonicalForm;
use crate::document::{
    ArrayRecord, ButtonArrayRecord, ButtonRecord, Document, MultiStateRecord, Named, ScalarRecord,
};
use crate::error::{DsError, Result};
use crate::model::{
    Button, ButtonArray, Float, FloatArray, IntArray, MultiState, UintArray, UnsignedInteger,
    SignedInteger,
};

/// An ordered, owning collection with position- and value-based removal.
///
/// Positions are plain list offsets; they are unrelated to the domain
/// `index` field objects carry for wire identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: PartialEq> Collection<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, position: usize) -> Result<&T> {
        self.items.get(position).ok_or(DsError::PositionOutOfRange {
            position,
            len: self.items.len(),
        })
    }

    pub fn get_mut(&mut self, position: usize) -> Result<&mut T> {
        let len = self.items.len();
        self.items
            .get_mut(position)
            .ok_or(DsError::PositionOutOfRange { position, len })
    }

    /// Appends unconditionally; the object was validated at construction.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn remove_at(&mut self, position: usize) -> Result<T> {
        if position >= self.items.len() {
            return Err(DsError::PositionOutOfRange {
                position,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(position))
    }

    /// Removes the first item equal to `item` by value.
    pub fn remove(&mut self, item: &T) -> Result<T> {
        let position = self
            .items
            .iter()
            .position(|i| i == item)
            .ok_or_else(|| DsError::NotFound {
                what: "object not present in collection".to_string(),
            })?;
        Ok(self.items.remove(position))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    fn extend(&mut self, items: Vec<T>) {
        self.items.extend(items);
    }
}

impl<'a, T: PartialEq> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Validates a whole batch of records before any of them lands.
fn build_batch<T: CanonicalForm>(records: &[Named<T::Record>]) -> Result<Vec<T>>
where
    T::Record: Clone,
{
    records.iter().cloned().map(T::from_record).collect()
}

/// Aggregate root owning every typed object collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datastore {
    pub name: String,
    pub last_modified: Option<NaiveDate>,
    pub working_dir: PathBuf,
    pub buttons: Collection<Button>,
    pub button_arrays: Collection<ButtonArray>,
    pub floats: Collection<Float>,
    pub float_arrays: Collection<FloatArray>,
    pub multi_states: Collection<MultiState>,
    pub signed_integers: Collection<SignedInteger>,
    pub int_arrays: Collection<IntArray>,
    pub unsigned_integers: Collection<UnsignedInteger>,
    pub uint_arrays: Collection<UintArray>,
}

impl Datastore {
    /// Creates an empty datastore.
    pub fn new(
        name: impl Into<String>,
        last_modified: Option<NaiveDate>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            last_modified,
            working_dir: working_dir.into(),
            ..Self::default()
        }
    }

    /// Constructs a fresh empty datastore from a document's header fields.
    /// Typed collections stay empty; populate them with the per-type loaders.
    pub fn parse(document: &Document) -> Self {
        Self::new(
            document.name.clone(),
            Some(document.last_modified),
            document.working_dir.clone(),
        )
    }

    /// Parses the header and runs every populate loader.
    pub fn from_document(document: &Document) -> Result<Self> {
        let mut store = Self::parse(document);
        store.populate_buttons(&document.buttons)?;
        store.populate_button_arrays(&document.button_arrays)?;
        store.populate_floats(&document.floats)?;
        store.populate_float_arrays(&document.float_arrays)?;
        store.populate_multi_states(&document.multi_states)?;
        store.populate_signed_integers(&document.signed_integers)?;
        store.populate_int_arrays(&document.int_arrays)?;
        store.populate_unsigned_integers(&document.unsigned_integers)?;
        store.populate_uint_arrays(&document.uint_arrays)?;
        info!(name = %store.name, objects = store.object_count(), "Loaded datastore");
        Ok(store)
    }

    /// Rebuilds the canonical document from current state.
    pub fn to_document(&self) -> Document {
        Document {
            name: self.name.clone(),
            last_modified: self.last_modified.unwrap_or_default(),
            working_dir: self.working_dir.clone(),
            buttons: self.buttons.iter().map(CanonicalForm::to_record).collect(),
            button_arrays: self
                .button_arrays
                .iter()
                .map(CanonicalForm::to_record)
                .collect(),
            floats: self.floats.iter().map(CanonicalForm::to_record).collect(),
            float_arrays: self
                .float_arrays
                .iter()
                .map(CanonicalForm::to_record)
                .collect(),
            multi_states: self
                .multi_states
                .iter()
                .map(CanonicalForm::to_record)
                .collect(),
            signed_integers: self
                .signed_integers
                .iter()
                .map(CanonicalForm::to_record)
                .collect(),
            int_arrays: self
                .int_arrays
                .iter()
                .map(CanonicalForm::to_record)
                .collect(),
            unsigned_integers: self
                .unsigned_integers
                .iter()
                .map(CanonicalForm::to_record)
                .collect(),
            uint_arrays: self
                .uint_arrays
                .iter()
                .map(CanonicalForm::to_record)
                .collect(),
        }
    }

    /// Encodes the whole datastore as a single CBOR wire image.
    pub fn to_wire_bytes(&self) -> Result<Vec<u8>> {
        crate::wire::encode_datastore(self)
    }

    /// Total object count across every collection.
    pub fn object_count(&self) -> usize {
        self.buttons.len()
            + self.button_arrays.len()
            + self.floats.len()
            + self.float_arrays.len()
            + self.multi_states.len()
            + self.signed_integers.len()
            + self.int_arrays.len()
            + self.unsigned_integers.len()
            + self.uint_arrays.len()
    }

    pub fn populate_buttons(&mut self, records: &[Named<ButtonRecord>]) -> Result<()> {
        let batch = build_batch::<Button>(records)?;
        debug!(count = batch.len(), "Populating buttons");
        self.buttons.extend(batch);
        Ok(())
    }

    pub fn populate_button_arrays(&mut self, records: &[Named<ButtonArrayRecord>]) -> Result<()> {
        let batch = build_batch::<ButtonArray>(records)?;
        debug!(count = batch.len(), "Populating button arrays");
        self.button_arrays.extend(batch);
        Ok(())
    }

    pub fn populate_floats(&mut self, records: &[Named<ScalarRecord<f64>>]) -> Result<()> {
        let batch = build_batch::<Float>(records)?;
        debug!(count = batch.len(), "Populating floats");
        self.floats.extend(batch);
        Ok(())
    }

    pub fn populate_float_arrays(&mut self, records: &[Named<ArrayRecord<f64>>]) -> Result<()> {
        let batch = build_batch::<FloatArray>(records)?;
        debug!(count = batch.len(), "Populating float arrays");
        self.float_arrays.extend(batch);
        Ok(())
    }

    pub fn populate_multi_states(&mut self, records: &[Named<MultiStateRecord>]) -> Result<()> {
        let batch = build_batch::<MultiState>(records)?;
        debug!(count = batch.len(), "Populating multi-states");
        self.multi_states.extend(batch);
        Ok(())
    }

    pub fn populate_signed_integers(&mut self, records: &[Named<ScalarRecord<i64>>]) -> Result<()> {
        let batch = build_batch::<SignedInteger>(records)?;
        debug!(count = batch.len(), "Populating signed integers");
        self.signed_integers.extend(batch);
        Ok(())
    }

    pub fn populate_int_arrays(&mut self, records: &[Named<ArrayRecord<i64>>]) -> Result<()> {
        let batch = build_batch::<IntArray>(records)?;
        debug!(count = batch.len(), "Populating int arrays");
        self.int_arrays.extend(batch);
        Ok(())
    }

    pub fn populate_unsigned_integers(
        &mut self,
        records: &[Named<ScalarRecord<u64>>],
    ) -> Result<()> {
        let batch = build_batch::<UnsignedInteger>(records)?;
        debug!(count = batch.len(), "Populating unsigned integers");
        self.unsigned_integers.extend(batch);
        Ok(())
    }

    pub fn populate_uint_arrays(&mut self, records: &[Named<ArrayRecord<u64>>]) -> Result<()> {
        let batch = build_batch::<UintArray>(records)?;
        debug!(count = batch.len(), "Populating uint arrays");
        self.uint_arrays.extend(batch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_button(index: u16) -> Button {
        Button::new(format!("b{index}"), index, 3000, 6000).unwrap()
    }

    #[test]
    fn test_collection_position_contract() {
        let mut coll = Collection::new();
        coll.push(sample_button(1));
        coll.push(sample_button(2));

        assert_eq!(coll.len(), 2);
        assert_eq!(coll.get(1).unwrap().index(), 2);
        // Position == len is the off-by-one boundary
        assert!(matches!(
            coll.get(2),
            Err(DsError::PositionOutOfRange { position: 2, len: 2 })
        ));
        assert!(matches!(
            coll.remove_at(2),
            Err(DsError::PositionOutOfRange { .. })
        ));
    }

    #[test]
    fn test_collection_remove_by_value() {
        let mut coll = Collection::new();
        let b1 = sample_button(1);
        let b2 = sample_button(2);
        coll.push(b1.clone());
        coll.push(b2.clone());

        coll.remove(&b1).unwrap();
        assert_eq!(coll.len(), 1);
        assert_eq!(coll.get(0).unwrap(), &b2);

        // Absent value: NotFound, collection untouched
        assert!(matches!(coll.remove(&b1), Err(DsError::NotFound { .. })));
        assert_eq!(coll.len(), 1);
    }

    #[test]
    fn test_parse_header_only() {
        let doc = Document::from_yaml(
            "name: store\nlastModified: 2026-08-30\nworkingDir: /tmp/p\nbuttons:\n  - b: {index: 1}\n",
        )
        .unwrap();
        let store = Datastore::parse(&doc);
        assert_eq!(store.name, "store");
        // parse does not populate
        assert!(store.buttons.is_empty());
    }

    #[test]
    fn test_populate_appends_in_order() {
        let mut store = Datastore::default();
        let records = vec![
            Named::new(
                "a",
                ScalarRecord {
                    index: 1,
                    size: 1,
                    min: 0u64,
                    max: 255,
                    default: 0,
                    in_nvm: false,
                },
            ),
            Named::new(
                "b",
                ScalarRecord {
                    index: 2,
                    size: 2,
                    min: 0u64,
                    max: 65535,
                    default: 1,
                    in_nvm: true,
                },
            ),
        ];
        store.populate_unsigned_integers(&records).unwrap();
        assert_eq!(store.unsigned_integers.len(), 2);
        assert_eq!(store.unsigned_integers.get(0).unwrap().name(), "a");
        assert_eq!(store.unsigned_integers.get(1).unwrap().id(), 0x0102);
    }

    #[test]
    fn test_populate_is_atomic() {
        let mut store = Datastore::default();
        let records = vec![
            Named::new(
                "good",
                ScalarRecord {
                    index: 1,
                    size: 1,
                    min: 0u64,
                    max: 255,
                    default: 0,
                    in_nvm: false,
                },
            ),
            Named::new(
                "bad",
                ScalarRecord {
                    index: 2,
                    size: 1,
                    min: 0u64,
                    max: 256, // past the 1-byte range
                    default: 0,
                    in_nvm: false,
                },
            ),
        ];
        let err = store.populate_unsigned_integers(&records).unwrap_err();
        assert!(matches!(err, DsError::InvalidLimits { .. }));
        // Nothing from the batch landed
        assert!(store.unsigned_integers.is_empty());
    }

    #[test]
    fn test_from_document_and_back() {
        let yaml = r"
name: store
lastModified: 2026-08-30
workingDir: /tmp/p
buttons:
  - power: {index: 1}
multiStates:
  - mode:
      index: 1
      states: [off, on]
      inNvm: true
signedIntegers:
  - temp:
      index: 1
      size: 1
      min: -128
      max: 127
      default: 32
";
        let doc = Document::from_yaml(yaml).unwrap();
        let store = Datastore::from_document(&doc).unwrap();
        assert_eq!(store.object_count(), 3);
        assert_eq!(store.signed_integers.get(0).unwrap().id(), 0x0301);

        let back = store.to_document();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_from_document_propagates_record_errors() {
        let yaml = r"
name: store
lastModified: 2026-08-30
workingDir: /tmp/p
buttons:
  - fast: {index: 1, longPressTime: 10}
";
        let doc = Document::from_yaml(yaml).unwrap();
        assert!(matches!(
            Datastore::from_document(&doc),
            Err(DsError::InvalidTime { ms: 10 })
        ));
    }
}
