// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Transform Primitives
//!
//! - [`Vector3`] – position or direction in a body, leg-local, or world frame
//! - [`Transform4`] – rigid affine transform (3×3 block plus translation) with composition and
//!   inversion

pub mod transform;
pub mod vector;

pub use transform::Transform4;
pub use vector::Vector3;
