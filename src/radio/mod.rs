// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Radio Link
//!
//! Link policy on top of [`crate::drivers::nrf24l01`].
//!
//! - [`link`] – robot side: RX on the controller and peer pipes, interrupt-driven receive, peer
//!   transmit
//! - [`transmitter`] – controller side: TX only
//! - [`mailbox`] – interrupt-to-loop hand-off with the link watchdog

pub mod link;
pub mod mailbox;
pub mod transmitter;

pub use link::RadioLink;
pub use mailbox::Mailbox;
pub use transmitter::RadioTransmitter;
