//! Permission action definitions.

pub mod action;

pub use action::Action;
