// LogStitch - lib.rs
//
// Library entry point, exposing all non-CLI modules for integration testing
// and potential future programmatic use.

pub mod app;
pub mod core;
pub mod util;
