// LogStitch - core/mod.rs
//
// Core pipeline layer: classification, decoding, per-folder combination and
// tree traversal. Depends on `util` only; knows nothing about the CLI.

pub mod classify;
pub mod combine;
pub mod decode;
pub mod discovery;
pub mod model;
