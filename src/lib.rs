// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Walkbot Firmware
//!
//! Firmware components for a radio-controlled quadruped with three hobby servos per leg, written
//! in Rust, targeting an STM32F767 MCU. The handheld controller firmware lives in the same crate.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`math`] | 3-vectors and rigid/mirror transforms |
//! | [`protocol`] | Radio command word and debug terminal commands |
//! | [`drivers`] | Device-level drivers (nRF24L01+) |
//! | [`radio`] | Robot and controller link policy, command mailbox |
//! | [`motors`] | Hobby servo actuator |
//! | [`control`] | Leg kinematics and the gait scheduler |
//! | [`diag`] | Data log and debug terminal |
//! | [`config`] | Design-time robot parameters |
//! | `hw` | MCU-level wrappers (feature `board`) |
//!
//! Everything outside `hw` is hardware-agnostic (`embedded-hal` traits) and is unit tested on
//! the host.
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the robot or the controller:
//!
//! ```bash
//! cargo run --release --features board,defmt --bin walkbot
//! cargo run --release --features board,defmt --bin controller
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod control;
pub mod diag;
pub mod drivers;
#[cfg(feature = "board")]
pub mod hw;
pub mod math;
pub mod motors;
pub mod protocol;
pub mod radio;
pub mod time;
