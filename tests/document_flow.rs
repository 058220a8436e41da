//! End-to-end document flow: YAML text through the datastore to CBOR and back.

use dsf::datastore::Datastore;
use dsf::document::Document;
use dsf::error::DsError;
use dsf::wire::{self, WireObject};

const FULL_STORE: &str = r"
name: bench_rig
lastModified: 2026-08-30
workingDir: /opt/bench
buttons:
  - power: {index: 1}
buttonArrays:
  - panel:
      index: 1
      longPressTime: 2000
      inactiveTime: 9000
      elements: [up, down, enter]
floats:
  - gain:
      index: 1
      size: 4
      min: 0.0
      max: 1.0
      default: 0.5
floatArrays:
  - calib:
      index: 1
      elements:
        - slope: {min: -10.0, max: 10.0, default: 1.0}
      inNvm: true
multiStates:
  - mode:
      index: 1
      states: [idle, run, fault]
      inNvm: true
signedIntegers:
  - temp:
      index: 1
      size: 2
      min: -400
      max: 1250
      default: 200
intArrays:
  - offsets:
      index: 1
      elements:
        - x: {min: -100, max: 100, default: 0}
        - y: {min: -100, max: 100, default: 0}
unsignedIntegers:
  - counter:
      index: 1
      size: 4
      min: 0
      max: 4294967295
      default: 0
      inNvm: true
uintArrays:
  - thresholds:
      index: 1
      elements:
        - warn: {min: 0, max: 1000, default: 100}
";

#[test]
fn full_document_loads_and_round_trips() {
    let doc = Document::from_yaml(FULL_STORE).unwrap();
    let store = Datastore::from_document(&doc).unwrap();
    assert_eq!(store.object_count(), 9);
    assert_eq!(store.name, "bench_rig");

    // Rebuilt document matches the parsed one, and its YAML reparses equal.
    let rebuilt = store.to_document();
    assert_eq!(rebuilt, doc);
    let reparsed = Document::from_yaml(&rebuilt.to_yaml().unwrap()).unwrap();
    assert_eq!(reparsed, doc);
}

#[test]
fn wire_image_covers_every_object() {
    let doc = Document::from_yaml(FULL_STORE).unwrap();
    let store = Datastore::from_document(&doc).unwrap();
    let bytes = store.to_wire_bytes().unwrap();

    let objects = wire::decode_all(&bytes).unwrap();
    assert_eq!(objects.len(), 9);

    let mut ids: Vec<u16> = objects.iter().map(WireObject::id).collect();
    ids.sort_unstable();
    assert_eq!(
        ids,
        [0x0101, 0x0201, 0x0301, 0x0401, 0x0501, 0x0601, 0x0701, 0x0801, 0x0901]
    );
}

#[test]
fn wire_decode_recovers_field_values() {
    let doc = Document::from_yaml(FULL_STORE).unwrap();
    let store = Datastore::from_document(&doc).unwrap();
    let bytes = store.to_wire_bytes().unwrap();

    for object in wire::decode_all(&bytes).unwrap() {
        match object {
            WireObject::SignedInteger(s) => {
                assert_eq!(s.size(), 2);
                assert_eq!(s.min(), -400);
                assert_eq!(s.max(), 1250);
                assert_eq!(s.default_value(), 200);
            }
            WireObject::MultiState(ms) => {
                assert_eq!(ms.states(), ["idle", "run", "fault"]);
                assert!(ms.in_nvm());
                // The default selection never crosses the wire.
                assert_eq!(ms.default_state(), "");
            }
            WireObject::ButtonArray(summary) => {
                // Button arrays travel as a count; element names do not.
                assert_eq!(summary.element_count, 3);
                assert_eq!(summary.long_press_ms, 2000);
                assert_eq!(summary.inactive_ms, 9000);
            }
            WireObject::IntArray(arr) => {
                assert_eq!(arr.element_count(), 2);
                // Numeric array elements are positional on the wire.
                assert_eq!(arr.element(0).unwrap().name, "");
            }
            _ => {}
        }
    }
}

#[test]
fn invalid_record_fails_the_whole_load() {
    let yaml = r"
name: broken
lastModified: 2026-08-30
workingDir: /tmp
unsignedIntegers:
  - ok:
      index: 1
      size: 1
      min: 0
      max: 255
      default: 0
  - oversized:
      index: 2
      size: 1
      min: 0
      max: 300
      default: 0
";
    let doc = Document::from_yaml(yaml).unwrap();
    let err = Datastore::from_document(&doc).unwrap_err();
    assert!(matches!(err, DsError::InvalidLimits { .. }));
}

#[test]
fn duplicate_indices_share_a_wire_id() {
    // Index uniqueness is not enforced; both objects encode under 0x0105.
    let yaml = r"
name: dup
lastModified: 2026-08-30
workingDir: /tmp
unsignedIntegers:
  - a: {index: 5, size: 1, min: 0, max: 255, default: 0}
  - b: {index: 5, size: 1, min: 0, max: 255, default: 1}
";
    let doc = Document::from_yaml(yaml).unwrap();
    let store = Datastore::from_document(&doc).unwrap();
    let bytes = store.to_wire_bytes().unwrap();
    let objects = wire::decode_all(&bytes).unwrap();
    assert_eq!(objects.len(), 2);
    assert!(objects.iter().all(|o| o.id() == 0x0105));
}
