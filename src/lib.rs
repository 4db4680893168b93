//! Adl chat client library exports

pub mod backend;
pub mod core;
pub mod plain;
pub mod tui;

#[cfg(test)]
pub mod test_support;
