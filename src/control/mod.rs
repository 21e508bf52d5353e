// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Walking Control
//!
//! Leg kinematics and the gait that coordinates the four legs.
//!
//! ## Modules
//!
//! - [`leg`] - Inverse kinematics and the per-leg step state machine.
//! - [`gait`] - Body motion, stability arbitration, and homing across all legs.

pub mod gait;
pub mod leg;

pub use gait::{CycleOutcome, GaitConfig, GaitScheduler, LegMount, Mode, LEG_COUNT, LEG_NAMES};
pub use leg::{Joint, JointAngles, LegConfig, LegController, LegState, MoveError};
