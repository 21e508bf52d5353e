// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Three-component vector.

use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

#[allow(unused_imports)]
use micromath::F32Ext;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(&self, rhs: Vector3) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        self.dot(*self).sqrt()
    }

    /// Projection onto the x/y plane.
    #[inline]
    pub fn horizontal(&self) -> Vector3 {
        Vector3::new(self.x, self.y, 0.0)
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn unit(&self) -> Vector3 {
        let n = self.norm();
        if n > 0.0 {
            *self / n
        } else {
            Vector3::ZERO
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Vector3) {
        *self = *self + rhs;
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Vector3;

    fn mul(self, k: f32) -> Vector3 {
        Vector3::new(self.x * k, self.y * k, self.z * k)
    }
}

impl Div<f32> for Vector3 {
    type Output = Vector3;

    fn div(self, k: f32) -> Vector3 {
        Vector3::new(self.x / k, self.y / k, self.z / k)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_drops_z() {
        let v = Vector3::new(3.0, 4.0, 12.0);
        assert_eq!(v.norm(), 13.0);
        assert_eq!(v.horizontal().norm(), 5.0);
    }

    #[test]
    fn unit_of_zero_is_zero() {
        assert_eq!(Vector3::ZERO.unit(), Vector3::ZERO);
        let u = Vector3::new(0.0, -2.0, 0.0).unit();
        assert_eq!(u, Vector3::new(0.0, -1.0, 0.0));
    }
}
