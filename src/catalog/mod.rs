// src/catalog/mod.rs
//! Static certificate catalog.

pub mod service;
