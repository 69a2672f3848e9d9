//! Time-series utilities shared by the engine and orchestrator.
//!
//! Modules include:
//! - `infer`: infer the native cadence of a series
//! - `dedup`: collapse rows sharing a timestamp with a reducer
//! - `bucket`: tz-aware floor of instants onto an output grid
//! - `resample`: refine or coarsen a series to a requested cadence
//! - `merge`: outer-merge several named series on the timestamp key
/// Tz-aware bucket floor and grid stepping.
pub mod bucket;
/// Row deduplication by timestamp.
pub mod dedup;
/// Native cadence inference.
pub mod infer;
/// Outer merge of named series with attribution.
pub mod merge;
/// Resampling to a requested output cadence.
pub mod resample;
