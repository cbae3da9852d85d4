//! HTTP request handlers

pub mod public;

pub use public::configure;
