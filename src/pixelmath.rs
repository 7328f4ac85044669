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

//! Scalar buffer math shared by the kernel and the orchestrator.

use crate::CmsError;
use crate::image::{PixelSlice, PixelSliceMut};

/// Round-half-up, stable across platforms.
#[inline]
pub(crate) fn roundf(v: f32) -> f32 {
    (v + 0.5).floor()
}

/// Quantizes a normalized sample onto `0..=scale`.
#[inline]
pub(crate) fn round_normalized(v: f32, scale: f32) -> f32 {
    roundf(v.clamp(0.0, 1.0) * scale)
}

/// The Reinhard operator, strictly increasing on `y ≥ 0` with range `[0, 1)`.
#[inline]
pub(crate) fn reinhard(y: f32) -> f32 {
    y / (1.0 + y)
}

/// Expands integer RGBA samples to normalized f32, `x / (2^depth − 1)`.
/// Float input copies through untouched.
pub fn unorm_to_float(src: PixelSlice, dst: &mut [f32]) -> Result<(), CmsError> {
    if src.len() != dst.len() {
        return Err(CmsError::LaneSizeMismatch);
    }
    match src {
        PixelSlice::U8(v) => {
            let rescale = 1.0 / 255.0;
            for (s, d) in v.iter().zip(dst.iter_mut()) {
                *d = *s as f32 * rescale;
            }
        }
        PixelSlice::U16(v) => {
            let rescale = 1.0 / 65535.0;
            for (s, d) in v.iter().zip(dst.iter_mut()) {
                *d = *s as f32 * rescale;
            }
        }
        PixelSlice::F32(v) => dst.copy_from_slice(v),
    }
    Ok(())
}

/// Quantizes normalized f32 samples into integer storage,
/// `round(x · (2^depth − 1))` with channel clamping. Float output copies
/// through untouched.
pub fn float_to_unorm(src: &[f32], dst: PixelSliceMut) -> Result<(), CmsError> {
    if src.len() != dst.len() {
        return Err(CmsError::LaneSizeMismatch);
    }
    match dst {
        PixelSliceMut::U8(v) => {
            for (s, d) in src.iter().zip(v.iter_mut()) {
                *d = round_normalized(*s, 255.0) as u8;
            }
        }
        PixelSliceMut::U16(v) => {
            for (s, d) in src.iter().zip(v.iter_mut()) {
                *d = round_normalized(*s, 65535.0) as u16;
            }
        }
        PixelSliceMut::F32(v) => v.copy_from_slice(src),
    }
    Ok(())
}

/// Applies a luminance ratio to a linear RGBA f32 buffer, optionally
/// compressing the result with the Reinhard operator. Alpha is untouched.
pub fn scale_luminance(pixels: &mut [f32], luminance_scale: f32, tonemap: bool) {
    for pixel in pixels.chunks_exact_mut(4) {
        for c in pixel.iter_mut().take(3) {
            let mut v = *c * luminance_scale;
            if tonemap {
                v = reinhard(v);
            }
            *c = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_normalized_clamps() {
        assert_eq!(round_normalized(-0.5, 255.0), 0.0);
        assert_eq!(round_normalized(1.5, 255.0), 255.0);
        assert_eq!(round_normalized(0.5, 255.0), 128.0);
    }

    #[test]
    fn reinhard_monotonic_and_bounded() {
        let mut last = -1.0f32;
        let mut y = 0.0f32;
        while y < 100.0 {
            let t = reinhard(y);
            assert!(t > last, "not increasing at {y}");
            assert!((0.0..1.0).contains(&t), "out of range at {y}");
            last = t;
            y += 0.25;
        }
        assert_eq!(reinhard(0.0), 0.0);
    }

    #[test]
    fn unorm_roundtrip_8bit() {
        let src: Vec<u8> = (0..=255).collect();
        let mut floats = vec![0f32; src.len()];
        unorm_to_float(PixelSlice::U8(&src), &mut floats).unwrap();
        let mut back = vec![0u8; src.len()];
        float_to_unorm(&floats, PixelSliceMut::U8(&mut back)).unwrap();
        assert_eq!(src, back);
    }

    #[test]
    fn scale_luminance_leaves_alpha() {
        let mut pixels = vec![0.5, 0.25, 1.0, 0.7];
        scale_luminance(&mut pixels, 2.0, false);
        assert_eq!(pixels, vec![1.0, 0.5, 2.0, 0.7]);

        let mut toned = vec![1.0, 0.0, 3.0, 1.0];
        scale_luminance(&mut toned, 1.0, true);
        assert_eq!(toned[0], 0.5);
        assert_eq!(toned[1], 0.0);
        assert_eq!(toned[2], 0.75);
        assert_eq!(toned[3], 1.0);
    }

    #[test]
    fn lane_mismatch_is_rejected() {
        let mut floats = vec![0f32; 3];
        let err = unorm_to_float(PixelSlice::U8(&[0, 1]), &mut floats);
        assert_eq!(err.unwrap_err(), CmsError::LaneSizeMismatch);
    }
}
