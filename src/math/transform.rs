// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Affine transform with a fixed `[0 0 0 1]` bottom row.
//!
//! Only the top three rows are stored. `translate` and `rotate_*` left-multiply, so
//! `Transform4::IDENTITY.rotate_z(a).translate(v)` rotates first and then translates.

use core::ops::Mul;

#[allow(unused_imports)]
use micromath::F32Ext;

use super::Vector3;

const SINGULAR_EPS: f32 = 1e-9;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform4 {
    m: [[f32; 4]; 3],
}

impl Transform4 {
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ],
    };

    /// Axis-aligned scale (or mirror, with negative factors) followed by a translation.
    pub const fn from_scale_translation(scale: Vector3, t: Vector3) -> Self {
        Self {
            m: [
                [scale.x, 0.0, 0.0, t.x],
                [0.0, scale.y, 0.0, t.y],
                [0.0, 0.0, scale.z, t.z],
            ],
        }
    }

    pub const fn from_rows(m: [[f32; 4]; 3]) -> Self {
        Self { m }
    }

    #[inline]
    pub fn rows(&self) -> &[[f32; 4]; 3] {
        &self.m
    }

    #[inline]
    pub fn translation(&self) -> Vector3 {
        Vector3::new(self.m[0][3], self.m[1][3], self.m[2][3])
    }

    /// `T(v) · self`.
    pub fn translate(&self, v: Vector3) -> Self {
        let mut out = *self;
        out.m[0][3] += v.x;
        out.m[1][3] += v.y;
        out.m[2][3] += v.z;
        out
    }

    /// `Rx(angle) · self`, angle in radians.
    pub fn rotate_x(&self, angle: f32) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
        ]) * *self
    }

    /// `Ry(angle) · self`, angle in radians.
    pub fn rotate_y(&self, angle: f32) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        Self::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
        ]) * *self
    }

    /// `Rz(angle) · self`, angle in radians.
    pub fn rotate_z(&self, angle: f32) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        Self::from_rows([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ]) * *self
    }

    /// Apply only the 3×3 block (directions, not points).
    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        let m = &self.m;
        Vector3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Inverse transform, `None` if the 3×3 block is singular.
    pub fn inverse(&self) -> Option<Self> {
        let m = &self.m;
        let c00 = m[1][1] * m[2][2] - m[1][2] * m[2][1];
        let c01 = m[1][2] * m[2][0] - m[1][0] * m[2][2];
        let c02 = m[1][0] * m[2][1] - m[1][1] * m[2][0];
        let det = m[0][0] * c00 + m[0][1] * c01 + m[0][2] * c02;
        if det.abs() < SINGULAR_EPS {
            return None;
        }
        let k = 1.0 / det;

        let r = [
            [
                c00 * k,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * k,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * k,
            ],
            [
                c01 * k,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * k,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * k,
            ],
            [
                c02 * k,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * k,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * k,
            ],
        ];

        let t = self.translation();
        let mut out = [[0.0; 4]; 3];
        for (row, r_row) in out.iter_mut().zip(r.iter()) {
            row[..3].copy_from_slice(r_row);
            row[3] = -(r_row[0] * t.x + r_row[1] * t.y + r_row[2] * t.z);
        }
        Some(Self { m: out })
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Transform4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform4 {
    type Output = Transform4;

    fn mul(self, rhs: Transform4) -> Transform4 {
        let (a, b) = (&self.m, &rhs.m);
        let mut out = [[0.0; 4]; 3];
        for i in 0..3 {
            for j in 0..4 {
                let mut acc = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
                if j == 3 {
                    acc += a[i][3];
                }
                out[i][j] = acc;
            }
        }
        Transform4 { m: out }
    }
}

impl Mul<Vector3> for Transform4 {
    type Output = Vector3;

    /// Transform a point (implicit w = 1).
    fn mul(self, p: Vector3) -> Vector3 {
        self.transform_vector(p) + self.translation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::FRAC_PI_2;

    fn assert_close(a: Vector3, b: Vector3) {
        assert!((a - b).norm() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn rotate_then_translate_order() {
        let t = Transform4::IDENTITY
            .rotate_z(FRAC_PI_2)
            .translate(Vector3::new(1.0, 0.0, 0.0));
        assert_close(t * Vector3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn inverse_undoes_rigid_motion() {
        let t = Transform4::IDENTITY
            .rotate_x(0.3)
            .rotate_z(-1.1)
            .translate(Vector3::new(0.2, -0.4, 0.05));
        let inv = t.inverse().unwrap();
        let p = Vector3::new(0.1, 0.2, -0.3);
        assert_close(inv * (t * p), p);
        assert_close((t * inv) * p, p);
    }

    #[test]
    fn mirror_is_its_own_inverse() {
        let m = Transform4::from_scale_translation(Vector3::new(-1.0, 1.0, 1.0), Vector3::ZERO);
        assert_eq!(m.inverse().unwrap(), m);
        assert_eq!(m * Vector3::new(2.0, 3.0, 4.0), Vector3::new(-2.0, 3.0, 4.0));
    }

    #[test]
    fn singular_block_has_no_inverse() {
        let flat = Transform4::from_scale_translation(Vector3::new(1.0, 1.0, 0.0), Vector3::ZERO);
        assert!(flat.inverse().is_none());
    }

    #[test]
    fn vectors_ignore_translation() {
        let t = Transform4::IDENTITY.translate(Vector3::new(5.0, 5.0, 5.0));
        assert_eq!(t.transform_vector(Vector3::new(1.0, 2.0, 3.0)), Vector3::new(1.0, 2.0, 3.0));
        assert!(Transform4::default().is_identity());
    }
}
