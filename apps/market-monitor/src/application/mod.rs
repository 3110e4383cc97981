//! Application Layer
//!
//! Use cases and the ports they depend on:
//! - `ports`: interfaces for the price provider and the price cache
//! - `use_cases`: market data loading and the asset/benchmark comparison

pub mod ports;
pub mod use_cases;
