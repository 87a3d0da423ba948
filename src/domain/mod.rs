//! Core domain types and logic.

pub mod quote;
pub mod date_index;
pub mod densify;
pub mod instrument;
pub mod track;
pub mod track_config;
pub mod error;
