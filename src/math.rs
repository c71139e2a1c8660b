//! Vector and matrix algebra for the transform chain.
//!
//! `Mat4` is row-major: element `(row, col)` lives at index `row * 4 + col`,
//! and points are column vectors multiplied on the right.

use std::ops::{Add, Index, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const ONE: Vec3 = Vec3::new(1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn scale(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    #[inline]
    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction.
    ///
    /// A zero-length input comes back unchanged instead of dividing by zero.
    #[inline]
    pub fn normalize(self) -> Vec3 {
        let mag = self.length();
        if mag > 0.0 {
            // one over mag
            let oomag = 1.0 / mag;
            self.scale(oomag)
        } else {
            self
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        self.scale(rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// A 4x4 matrix, stored in row-major
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4([f32; 16]);

impl Mat4 {
    pub const fn from_rows(data: [f32; 16]) -> Self {
        Self(data)
    }

    pub fn as_array(&self) -> &[f32; 16] {
        &self.0
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.0[row * 4 + col]
    }

    #[rustfmt::skip]
    pub const fn identity() -> Mat4 {
        Mat4([
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn translation(offset: Vec3) -> Mat4 {
        Mat4([
            1.0, 0.0, 0.0, offset.x,
            0.0, 1.0, 0.0, offset.y,
            0.0, 0.0, 1.0, offset.z,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn scaling(factor: Vec3) -> Mat4 {
        Mat4([
            factor.x, 0.0,      0.0,      0.0,
            0.0,      factor.y, 0.0,      0.0,
            0.0,      0.0,      factor.z, 0.0,
            0.0,      0.0,      0.0,      1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn from_x_rotation(theta: f32) -> Mat4 {
        let (s, c) = theta.sin_cos();
        Mat4([
            1.0, 0.0, 0.0, 0.0,
            0.0, c,   -s,  0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn from_y_rotation(theta: f32) -> Mat4 {
        let (s, c) = theta.sin_cos();
        Mat4([
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
            -s,  0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn from_z_rotation(theta: f32) -> Mat4 {
        let (s, c) = theta.sin_cos();
        Mat4([
            c,   -s,  0.0, 0.0,
            s,   c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Mat4::identity()
    }
}

impl Index<(usize, usize)> for Mat4 {
    type Output = f32;
    fn index(&self, index: (usize, usize)) -> &f32 {
        &self.0[index.0 * 4 + index.1]
    }
}

/// Row-major product `a * b`; applied to a point, `b` acts first.
pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut acc = [0.0f32; 16];
    for i in 0..4 {
        for j in 0..4 {
            acc[i * 4 + j] = (0..4).map(|k| a.0[i * 4 + k] * b.0[k * 4 + j]).sum();
        }
    }
    Mat4(acc)
}

impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, rhs: Mat4) -> Mat4 {
        multiply(&self, &rhs)
    }
}

/// Applies `m` to the homogeneous point `(p, 1)`, then divides by `w`.
///
/// `w == 0` is not guarded; the result carries infinities or NaN.
pub fn transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    let [x, y, z, w] = transform_homogeneous(m, p);
    Vec3::new(x / w, y / w, z / w)
}

/// Applies `m` to `(p, 1)` without the perspective divide.
pub fn transform_homogeneous(m: &Mat4, p: Vec3) -> [f32; 4] {
    let v = [p.x, p.y, p.z, 1.0];
    std::array::from_fn(|row| (0..4).map(|col| m.0[row * 4 + col] * v[col]).sum())
}
