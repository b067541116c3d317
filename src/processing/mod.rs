//! Turns raw API records into the normalized table and its derived views.

pub mod error;
pub mod latest;
pub mod pivot;
pub mod process;
pub mod statistics;
