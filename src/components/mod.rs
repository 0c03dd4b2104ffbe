//! UI components.

pub mod weather;
