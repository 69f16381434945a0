//! Shared utility functions

pub mod housekeeping;

pub use housekeeping::{housekeeping_cleanup, touch, TouchTime};
