// src/ui/mod.rs
//! UI reflection layer and the transient modal session.

pub mod modal;
pub mod reflection;
