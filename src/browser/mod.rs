// src/browser/mod.rs
//! External browsing-context integration.

pub mod launcher;
