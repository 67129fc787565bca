//! Platform-specific package formats.

pub mod linux;
