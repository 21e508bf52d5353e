// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Diagnostics
//!
//! - [`data_log`] - ring of the most recent loop measurements
//! - [`terminal`] - line-based debug console over the USART

pub mod data_log;
pub mod terminal;

pub use data_log::DataLog;
pub use terminal::Terminal;
