// src/lib.rs

//! Transit Crawler Library
//!
//! Scrapes a transit authority's routes, directions, and stops from its
//! listing pages and saves them as one snapshot.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;
