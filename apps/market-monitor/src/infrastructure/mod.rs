//! Infrastructure Layer
//!
//! Adapters implementing the application ports:
//! - `provider`: Yahoo Finance chart API price history adapter
//! - `cache`: in-memory TTL price cache

pub mod cache;
pub mod provider;
