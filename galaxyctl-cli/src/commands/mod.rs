//! Command implementations for galaxyctl CLI

pub mod register;

// Re-export dispatcher functions for flat access from main.rs
pub use register::run_register;
