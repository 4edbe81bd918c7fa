//! fimon library crate
//!
//! This crate provides both a CLI binary and a library API so the scan
//! engine can be driven against arbitrary roots in tests

pub mod cli;
pub mod config;
pub mod error;
pub mod exclude;
pub mod hasher;
pub mod report;
pub mod scanner;
pub mod snapshot;
