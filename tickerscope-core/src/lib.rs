//! TickerScope Core: price series domain, data providers and indicators.
//!
//! This crate holds everything that depends only on price history:
//! - Domain types (`PriceBar`, `PriceSeries`, `DatedValue`)
//! - The `DataProvider` trait with Yahoo, CSV and synthetic implementations
//! - Canonicalization of raw provider rows
//! - Indicator primitives and the per-series `IndicatorSet`
//! - Series fingerprinting

pub mod data;
pub mod domain;
pub mod fingerprint;
pub mod indicators;
