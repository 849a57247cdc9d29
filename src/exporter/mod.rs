// file: src/exporter/mod.rs
// description: data export module exports

pub mod json;

pub use json::{ExportManifest, ExportSnapshot, JsonExporter};
