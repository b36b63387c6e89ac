//! Shared code for the weir binaries

pub mod common;
