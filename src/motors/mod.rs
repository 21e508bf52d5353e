// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Actuator Abstractions
//!
//! This module contains actuator-level wrappers that sit above raw PWM outputs.
//!
//! ## Modules
//!
//! - [`servo`] - Calibrated hobby servo with angle bounds and explicit enable/disable.

pub mod servo;

pub use servo::{Calibration, Servo, ServoError};
