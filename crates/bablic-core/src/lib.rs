//! # bablic-core
//!
//! Core types, traits, configuration, and error handling for the Bablic
//! ngx adapter.

pub mod config;
pub mod context;
pub mod editor;
pub mod error;
pub mod parser;
pub mod storage;
pub mod table;
pub mod traits;
