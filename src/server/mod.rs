//! Socket acceptance.

pub mod listener;
