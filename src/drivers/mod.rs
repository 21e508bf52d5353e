// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the `embedded-hal` bus traits and
//! below the link and application logic.
//!
//! ## Existing drivers
//!
//! - [`nrf24l01`] – Nordic nRF24L01+ 2.4 GHz transceiver over 4-wire SPI plus CE

pub mod nrf24l01;

#[cfg(test)]
pub(crate) mod sim;

pub use nrf24l01::Nrf24;
