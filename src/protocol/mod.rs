// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Protocols
//!
//! - [`command`] – 32-bit controller command word carried over the radio
//! - [`messages`] / [`parser`] – line-oriented debug terminal commands

pub mod command;
pub mod messages;
pub mod parser;

pub use command::{Axes, Buttons, CommandWord};
pub use messages::DebugCommand;
pub use parser::LineParser;
