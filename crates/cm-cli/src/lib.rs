//! Command-line components for confusion matrix export.

pub mod commands;
pub mod logging;
pub mod preview;
pub mod session;
