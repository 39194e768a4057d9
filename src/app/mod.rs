// LogStitch - app/mod.rs
//
// Application layer: run orchestration and worker pools.
// Dependencies: core layer.
// Must NOT depend on: CLI specifics (argument parsing stays in main).

pub mod merge;
