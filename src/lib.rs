//! Capecache - cached superhero data client
//!
//! Fetches character records from superheroapi.com (with a token) or the
//! akabab fallback dataset (without one), normalizes both shapes, and caches
//! results in a pluggable key-value store.

pub mod cache;
pub mod cli;
pub mod data;
pub mod view;
