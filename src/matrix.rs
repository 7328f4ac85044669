/*
 * // Copyright (c) Radzivon Bartoshyk 4/2025. All rights reserved.
 * //
 * // Redistribution and use in source and binary forms, with or without modification,
 * // are permitted provided that the following conditions are met:
 * //
 * // 1.  Redistributions of source code must retain the above copyright notice, this
 * // list of conditions and the following disclaimer.
 * //
 * // 2.  Redistributions in binary form must reproduce the above copyright notice,
 * // this list of conditions and the following disclaimer in the documentation
 * // and/or other materials provided with the distribution.
 * //
 * // 3.  Neither the name of the copyright holder nor the names of its
 * // contributors may be used to endorse or promote products derived from
 * // this software without specific prior written permission.
 * //
 * // THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * // AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * // IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * // DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * // FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * // DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * // SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * // CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * // OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * // OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
use crate::mlaf::mlaf;

/// Vector math helper
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default)]
pub struct Vector3f {
    pub v: [f32; 3],
}

/// Matrix math helper
#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct Matrix3f {
    pub v: [[f32; 3]; 3],
}

impl Matrix3f {
    pub const IDENTITY: Matrix3f = Matrix3f {
        v: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    #[inline]
    pub fn transpose(&self) -> Matrix3f {
        Matrix3f {
            v: [
                [self.v[0][0], self.v[1][0], self.v[2][0]],
                [self.v[0][1], self.v[1][1], self.v[2][1]],
                [self.v[0][2], self.v[1][2], self.v[2][2]],
            ],
        }
    }

    #[inline]
    pub const fn determinant(&self) -> Option<f32> {
        let v = self.v;
        let a0 = v[0][0] * v[1][1] * v[2][2];
        let a1 = v[0][1] * v[1][2] * v[2][0];
        let a2 = v[0][2] * v[1][0] * v[2][1];

        let s0 = v[0][2] * v[1][1] * v[2][0];
        let s1 = v[0][1] * v[1][0] * v[2][2];
        let s2 = v[0][0] * v[1][2] * v[2][1];

        let j = a0 + a1 + a2 - s0 - s1 - s2;
        if j == 0. {
            return None;
        }
        Some(j)
    }

    #[inline]
    pub fn inverse(&self) -> Option<Self> {
        let v = self.v;
        let det = 1. / self.determinant()?;
        let a = v[0][0];
        let b = v[0][1];
        let c = v[0][2];
        let d = v[1][0];
        let e = v[1][1];
        let f = v[1][2];
        let g = v[2][0];
        let h = v[2][1];
        let i = v[2][2];

        Some(Matrix3f {
            v: [
                [
                    (e * i - f * h) * det,
                    (c * h - b * i) * det,
                    (b * f - c * e) * det,
                ],
                [
                    (f * g - d * i) * det,
                    (a * i - c * g) * det,
                    (c * d - a * f) * det,
                ],
                [
                    (d * h - e * g) * det,
                    (b * g - a * h) * det,
                    (a * e - b * d) * det,
                ],
            ],
        })
    }

    #[inline]
    pub const fn mul_vector(&self, other: Vector3f) -> Vector3f {
        let x = self.v[0][0] * other.v[0] + self.v[0][1] * other.v[1] + self.v[0][2] * other.v[2];
        let y = self.v[1][0] * other.v[0] + self.v[1][1] * other.v[1] + self.v[1][2] * other.v[2];
        let z = self.v[2][0] * other.v[0] + self.v[2][1] * other.v[1] + self.v[2][2] * other.v[2];
        Vector3f { v: [x, y, z] }
    }

    #[inline]
    pub fn mat_mul(&self, other: Matrix3f) -> Self {
        let mut result = Matrix3f::default();

        for i in 0..3 {
            for j in 0..3 {
                result.v[i][j] = mlaf(
                    mlaf(self.v[i][0] * other.v[0][j], self.v[i][1], other.v[1][j]),
                    self.v[i][2],
                    other.v[2][j],
                );
            }
        }

        result
    }

    #[inline]
    pub const fn test_equality(&self, other: Matrix3f) -> bool {
        const TOLERANCE: f32 = 0.001f32;
        let mut i = 0usize;
        while i < 3 {
            let mut j = 0usize;
            while j < 3 {
                if (self.v[i][j] - other.v[i][j]).abs() > TOLERANCE {
                    return false;
                }
                j += 1;
            }
            i += 1;
        }
        true
    }
}

/// Holds CIE XYZ representation
#[repr(C)]
#[derive(Clone, Debug, Copy, Default)]
pub struct Xyz {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Xyz {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn to_vector(self) -> Vector3f {
        Vector3f {
            v: [self.x, self.y, self.z],
        }
    }

    /// Chromaticity/luminance decomposition. Black and negative-sum inputs
    /// collapse onto the supplied white point with zero luminance.
    #[inline]
    pub fn to_xyyb(self, white: Chromaticity) -> XyY {
        let sum = self.x + self.y + self.z;
        if sum <= 0.0 {
            return XyY {
                x: white.x,
                y: white.y,
                yb: 0.0,
            };
        }
        XyY {
            x: self.x / sum,
            y: self.y / sum,
            yb: self.y,
        }
    }
}

/// Holds CIE xyY representation
#[derive(Clone, Debug, Copy, Default)]
pub struct XyY {
    pub x: f32,
    pub y: f32,
    pub yb: f32,
}

impl XyY {
    #[inline]
    pub fn to_xyz(self) -> Xyz {
        if self.yb <= 0.0 {
            return Xyz::new(0.0, 0.0, 0.0);
        }
        Xyz {
            x: (self.x * self.yb) / self.y,
            y: self.yb,
            z: ((1. - self.x - self.y) * self.yb) / self.y,
        }
    }
}

/// A single CIE 1931 chromaticity coordinate.
#[repr(C)]
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct Chromaticity {
    pub x: f32,
    pub y: f32,
}

impl Chromaticity {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const D65: Chromaticity = Chromaticity {
        x: 0.3127,
        y: 0.3290,
    };
}

/// Tolerance under which two primary coordinates describe the same stimulus.
pub const PRIMARIES_EPSILON: f32 = 0.001;

/// Chromaticities of the red/green/blue reference stimuli and reference
/// white.
#[repr(C)]
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct Primaries {
    pub red: Chromaticity,
    pub green: Chromaticity,
    pub blue: Chromaticity,
    pub white: Chromaticity,
}

impl Primaries {
    pub const BT709: Primaries = Primaries {
        red: Chromaticity::new(0.64, 0.33),
        green: Chromaticity::new(0.30, 0.60),
        blue: Chromaticity::new(0.15, 0.06),
        white: Chromaticity::D65,
    };

    pub const BT2020: Primaries = Primaries {
        red: Chromaticity::new(0.708, 0.292),
        green: Chromaticity::new(0.170, 0.797),
        blue: Chromaticity::new(0.131, 0.046),
        white: Chromaticity::D65,
    };

    pub const DISPLAY_P3: Primaries = Primaries {
        red: Chromaticity::new(0.680, 0.320),
        green: Chromaticity::new(0.265, 0.690),
        blue: Chromaticity::new(0.150, 0.060),
        white: Chromaticity::D65,
    };

    /// Coordinate-wise ε-match. Matching primary sets are collapsed to one
    /// copy before matrix derivation so the forward and inverse matrices
    /// stay exact inverses of each other.
    #[inline]
    pub fn matches(&self, other: &Primaries) -> bool {
        (self.red.x - other.red.x).abs() <= PRIMARIES_EPSILON
            && (self.red.y - other.red.y).abs() <= PRIMARIES_EPSILON
            && (self.green.x - other.green.x).abs() <= PRIMARIES_EPSILON
            && (self.green.y - other.green.y).abs() <= PRIMARIES_EPSILON
            && (self.blue.x - other.blue.x).abs() <= PRIMARIES_EPSILON
            && (self.blue.y - other.blue.y).abs() <= PRIMARIES_EPSILON
            && (self.white.x - other.white.x).abs() <= PRIMARIES_EPSILON
            && (self.white.y - other.white.y).abs() <= PRIMARIES_EPSILON
    }

    #[inline]
    pub fn all_positive(&self) -> bool {
        self.red.x > 0.0
            && self.red.y > 0.0
            && self.green.x > 0.0
            && self.green.y > 0.0
            && self.blue.x > 0.0
            && self.blue.y > 0.0
            && self.white.x > 0.0
            && self.white.y > 0.0
    }

    /// Derives the row-major RGB→XYZ colorant matrix from the
    /// chromaticities, per http://docs-hoffmann.de/ciexyz29082000.pdf §11.4.
    ///
    /// P holds the primaries as columns; U = P⁻¹·W and the diagonal U/W_y
    /// rescales each colorant so reference white maps to luminance 1.
    pub fn to_xyz_matrix(&self) -> Option<Matrix3f> {
        let p = Matrix3f {
            v: [
                [self.red.x, self.green.x, self.blue.x],
                [self.red.y, self.green.y, self.blue.y],
                [
                    1. - self.red.x - self.red.y,
                    1. - self.green.x - self.green.y,
                    1. - self.blue.x - self.blue.y,
                ],
            ],
        };
        let p_inv = p.inverse()?;

        let w = Vector3f {
            v: [
                self.white.x,
                self.white.y,
                1. - self.white.x - self.white.y,
            ],
        };
        let u = p_inv.mul_vector(w);

        let d = Matrix3f {
            v: [
                [u.v[0] / w.v[1], 0.0, 0.0],
                [0.0, u.v[1] / w.v[1], 0.0],
                [0.0, 0.0, u.v[2] / w.v[1]],
            ],
        };
        Some(p.mat_mul(d))
    }
}
