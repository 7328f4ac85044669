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

//! Hald CLUT postprocessing.
//!
//! A Hald image of side `i³` unrolls a 3D lookup cube of side `i²`. Inputs
//! index the cube red-fastest; out-of-range inputs clamp.

use crate::err::CmsError;
use crate::image::Image;
use crate::pixelmath::unorm_to_float;

#[inline]
fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] * (1.0 - t) + b[0] * t,
        a[1] * (1.0 - t) + b[1] * t,
        a[2] * (1.0 - t) + b[2] * t,
    ]
}

/// A 3D lookup table unrolled into a square RGBA image.
#[derive(Debug)]
pub struct HaldClut {
    dim: usize,
    data: Vec<f32>,
}

impl HaldClut {
    /// Validates and loads a Hald image. The image must be square with a
    /// perfect-cube side; anything else is not cubic and is rejected.
    pub fn from_image(image: &Image) -> Result<HaldClut, CmsError> {
        if image.width != image.height {
            return Err(CmsError::InvalidHald {
                width: image.width,
                height: image.height,
            });
        }
        let mut dim = 0usize;
        for i in 1usize..32 {
            if (i * i * i) as u32 == image.width {
                dim = i * i;
                break;
            }
        }
        if dim == 0 {
            return Err(CmsError::InvalidHald {
                width: image.width,
                height: image.height,
            });
        }

        let mut data = vec![0f32; image.pixels.len()];
        unorm_to_float(image.pixels.as_slice(), &mut data)?;

        log::info!(target: "hald", "Loaded {dim}x{dim}x{dim} Hald CLUT");
        Ok(HaldClut { dim, data })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    fn grid(&self, r: usize, g: usize, b: usize) -> [f32; 3] {
        let idx = ((b * self.dim + g) * self.dim + r) * 4;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Trilinear lookup of one RGBA pixel. Alpha passes through.
    pub fn lookup(&self, src: [f32; 4]) -> [f32; 4] {
        let scale = (self.dim - 1) as f32;
        let top = self.dim - 1;

        let fr = src[0].clamp(0.0, 1.0) * scale;
        let fg = src[1].clamp(0.0, 1.0) * scale;
        let fb = src[2].clamp(0.0, 1.0) * scale;

        let r0 = (fr.floor() as usize).min(top);
        let g0 = (fg.floor() as usize).min(top);
        let b0 = (fb.floor() as usize).min(top);
        let r1 = (r0 + 1).min(top);
        let g1 = (g0 + 1).min(top);
        let b1 = (b0 + 1).min(top);

        let rd = fr - r0 as f32;
        let gd = fg - g0 as f32;
        let bd = fb - b0 as f32;

        let c00 = lerp3(self.grid(r0, g0, b0), self.grid(r1, g0, b0), rd);
        let c10 = lerp3(self.grid(r0, g1, b0), self.grid(r1, g1, b0), rd);
        let c01 = lerp3(self.grid(r0, g0, b1), self.grid(r1, g0, b1), rd);
        let c11 = lerp3(self.grid(r0, g1, b1), self.grid(r1, g1, b1), rd);

        let c0 = lerp3(c00, c10, gd);
        let c1 = lerp3(c01, c11, gd);
        let c = lerp3(c0, c1, bd);

        [c[0], c[1], c[2], src[3]]
    }

    /// Maps a whole RGBA f32 buffer through the table in place.
    pub fn apply(&self, pixels: &mut [f32]) {
        for pixel in pixels.chunks_exact_mut(4) {
            let out = self.lookup([pixel[0], pixel[1], pixel[2], pixel[3]]);
            pixel.copy_from_slice(&out);
        }
    }
}
