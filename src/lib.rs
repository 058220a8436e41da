//! Datastore Forge library - typed firmware datastore schema authoring.
//!
//! This library exposes the core functionality of the `dsf` CLI for use in
//! tests and potentially other applications.
//!
//! # Modules
//!
//! - `model`: Self-validating schema objects (scalars, arrays, buttons, multi-states)
//! - `document`: Canonical YAML document records
//! - `canonical`: Object <-> record conversion
//! - `wire`: CBOR wire encoding and decoding
//! - `datastore`: The aggregate holding every object collection
//! - `error`: Error types with user-recoverable hints
#![forbid(unsafe_code)]

pub mod canonical;
pub mod cli;
pub mod datastore;
pub mod document;
pub mod error;
pub mod logging;
pub mod model;
pub mod wire;
