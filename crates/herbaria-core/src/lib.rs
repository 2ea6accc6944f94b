// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Herbaria core types, errors, and configuration shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod types;

pub use config::RectifyConfig;
pub use error::HerbariaError;
pub use types::*;
