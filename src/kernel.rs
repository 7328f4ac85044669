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

//! The scalar per-pixel conversion kernel and its reformat wrappers.
//!
//! Everything here is reentrant: the prepared transform state is read-only
//! and each invocation owns its slab exclusively, so slabs run on worker
//! threads without locks. None of these routines can fail; out-of-range
//! values clamp.

use crate::image::{PixelSlice, PixelSliceMut};
use crate::matrix::{Vector3f, Xyz};
use crate::mlaf::mlaf;
use crate::pixelmath::{reinhard, round_normalized};
use crate::transform::{Engine, LaneShape, Prepared, TransferStage};
use crate::trc::{hlg_eotf, hlg_oetf, pq_eotf, pq_oetf, srgb_eotf, srgb_oetf};
use num_traits::AsPrimitive;

#[inline]
fn apply_eotf(stage: TransferStage, pixel: &[f32], hlg_peak: f32) -> [f32; 3] {
    let r = pixel[0].max(0.0);
    let g = pixel[1].max(0.0);
    let b = pixel[2].max(0.0);
    match stage {
        TransferStage::None => [pixel[0], pixel[1], pixel[2]],
        TransferStage::Gamma(gamma) => [r.powf(gamma), g.powf(gamma), b.powf(gamma)],
        TransferStage::Srgb => [srgb_eotf(r), srgb_eotf(g), srgb_eotf(b)],
        TransferStage::Hlg => [
            hlg_eotf(r, hlg_peak),
            hlg_eotf(g, hlg_peak),
            hlg_eotf(b, hlg_peak),
        ],
        TransferStage::Pq => [pq_eotf(r), pq_eotf(g), pq_eotf(b)],
    }
}

#[inline]
fn apply_oetf(stage: TransferStage, pixel: [f32; 3], hlg_peak: f32) -> [f32; 3] {
    let r = pixel[0].max(0.0);
    let g = pixel[1].max(0.0);
    let b = pixel[2].max(0.0);
    match stage {
        TransferStage::None => pixel,
        // The destination gamma stage already stores the inverted exponent.
        TransferStage::Gamma(inv_gamma) => {
            [r.powf(inv_gamma), g.powf(inv_gamma), b.powf(inv_gamma)]
        }
        TransferStage::Srgb => [srgb_oetf(r), srgb_oetf(g), srgb_oetf(b)],
        TransferStage::Hlg => [
            hlg_oetf(r, hlg_peak),
            hlg_oetf(g, hlg_peak),
            hlg_oetf(b, hlg_peak),
        ],
        TransferStage::Pq => [pq_oetf(r), pq_oetf(g), pq_oetf(b)],
    }
}

/// The real color conversion: EOTF → src matrix → optional xyY luminance
/// rescale/tonemap → dst matrix → OETF → alpha.
fn transform_pixel(prepared: &Prepared, shape: LaneShape, src: &[f32], dst: &mut [f32]) {
    let mut xyz = [0f32; 3];

    match &prepared.engine {
        Engine::Builtin(b) => {
            let linear = apply_eotf(b.src_eotf, src, prepared.hlg_peak_luminance);
            xyz = b.src_to_xyz.mul_vector(Vector3f { v: linear }).v;
        }
        Engine::Foreign(f) => {
            f.src_to_xyz
                .transform(PixelSlice::F32(&src[..3]), PixelSliceMut::F32(&mut xyz), 1);
        }
    }

    // If tonemapping is necessary, luminance scale MUST be enabled.
    debug_assert!(!prepared.tonemap_enabled || prepared.luminance_scale_enabled);

    if prepared.luminance_scale_enabled {
        let mut xyy = Xyz::new(xyz[0], xyz[1], xyz[2]).to_xyyb(prepared.white_point);

        // The external engine folds the curve scale into its own transforms;
        // the built-in one applies it here.
        let builtin = matches!(prepared.engine, Engine::Builtin(_));
        if builtin {
            xyy.yb *= prepared.src_curve_scale;
        }

        xyy.yb *= prepared.src_luminance_scale;
        xyy.yb /= prepared.dst_luminance_scale;

        // Remove the destination curve scale before tonemapping so the
        // operator sees a [0, 1] range.
        xyy.yb /= prepared.dst_curve_scale;

        if prepared.tonemap_enabled {
            xyy.yb = reinhard(xyy.yb);
        }

        if !builtin {
            // The external engine expects its XYZ→dst input overranged.
            xyy.yb *= prepared.dst_curve_scale;
        }

        let v = xyy.to_xyz();
        xyz = [v.x, v.y, v.z];
    }

    match &prepared.engine {
        Engine::Builtin(b) => {
            let mut out = b.xyz_to_dst.mul_vector(Vector3f { v: xyz }).v;
            if prepared.clamp_output {
                out[0] = out[0].clamp(0.0, 1.0);
                out[1] = out[1].clamp(0.0, 1.0);
                out[2] = out[2].clamp(0.0, 1.0);
            }
            let encoded = apply_oetf(b.dst_oetf, out, prepared.hlg_peak_luminance);
            dst[..3].copy_from_slice(&encoded);
        }
        Engine::Foreign(f) => {
            f.xyz_to_dst
                .transform(PixelSlice::F32(&xyz), PixelSliceMut::F32(&mut dst[..3]), 1);
            if prepared.clamp_output {
                dst[0] = dst[0].clamp(0.0, 1.0);
                dst[1] = dst[1].clamp(0.0, 1.0);
                dst[2] = dst[2].clamp(0.0, 1.0);
            }
        }
    }

    if shape.dst_channels == 4 {
        dst[3] = if shape.src_channels == 4 { src[3] } else { 1.0 };
    }
}

fn transform_float_to_float(prepared: &Prepared, shape: LaneShape, src: &[f32], dst: &mut [f32]) {
    for (s, d) in src
        .chunks_exact(shape.src_channels)
        .zip(dst.chunks_exact_mut(shape.dst_channels))
    {
        transform_pixel(prepared, shape, s, d);
    }
}

fn transform_int_to_float<T>(prepared: &Prepared, shape: LaneShape, src: &[T], dst: &mut [f32], max: f32)
where
    T: Copy + 'static + AsPrimitive<f32>,
{
    let rescale = 1.0 / max;
    let mut tmp = [0f32; 4];
    for (s, d) in src
        .chunks_exact(shape.src_channels)
        .zip(dst.chunks_exact_mut(shape.dst_channels))
    {
        for (t, v) in tmp.iter_mut().zip(s.iter()) {
            *t = v.as_() * rescale;
        }
        transform_pixel(prepared, shape, &tmp[..shape.src_channels], d);
    }
}

fn transform_float_to_int<T>(prepared: &Prepared, shape: LaneShape, src: &[f32], dst: &mut [T], max: f32)
where
    T: Copy + Default + 'static,
    f32: AsPrimitive<T>,
{
    let mut tmp = [0f32; 4];
    for (s, d) in src
        .chunks_exact(shape.src_channels)
        .zip(dst.chunks_exact_mut(shape.dst_channels))
    {
        transform_pixel(prepared, shape, s, &mut tmp[..shape.dst_channels]);
        for (v, t) in d.iter_mut().zip(tmp.iter()) {
            *v = round_normalized(*t, max).as_();
        }
    }
}

fn transform_int_to_int<T, U>(
    prepared: &Prepared,
    shape: LaneShape,
    src: &[T],
    dst: &mut [U],
    src_max: f32,
    dst_max: f32,
) where
    T: Copy + 'static + AsPrimitive<f32>,
    U: Copy + Default + 'static,
    f32: AsPrimitive<U>,
{
    let rescale = 1.0 / src_max;
    let mut tmp_src = [0f32; 4];
    let mut tmp_dst = [0f32; 4];
    for (s, d) in src
        .chunks_exact(shape.src_channels)
        .zip(dst.chunks_exact_mut(shape.dst_channels))
    {
        for (t, v) in tmp_src.iter_mut().zip(s.iter()) {
            *t = v.as_() * rescale;
        }
        transform_pixel(
            prepared,
            shape,
            &tmp_src[..shape.src_channels],
            &mut tmp_dst[..shape.dst_channels],
        );
        for (v, t) in d.iter_mut().zip(tmp_dst.iter()) {
            *v = round_normalized(*t, dst_max).as_();
        }
    }
}

// Pure reformatting, taken when source and destination profiles match.

fn reformat_float_to_float(shape: LaneShape, src: &[f32], dst: &mut [f32]) {
    for (s, d) in src
        .chunks_exact(shape.src_channels)
        .zip(dst.chunks_exact_mut(shape.dst_channels))
    {
        d[..3].copy_from_slice(&s[..3]);
        if shape.dst_channels == 4 {
            d[3] = if shape.src_channels == 4 { s[3] } else { 1.0 };
        }
    }
}

fn reformat_float_to_int<T>(shape: LaneShape, src: &[f32], dst: &mut [T], max: f32)
where
    T: Copy + Default + 'static,
    f32: AsPrimitive<T>,
{
    for (s, d) in src
        .chunks_exact(shape.src_channels)
        .zip(dst.chunks_exact_mut(shape.dst_channels))
    {
        d[0] = round_normalized(s[0], max).as_();
        d[1] = round_normalized(s[1], max).as_();
        d[2] = round_normalized(s[2], max).as_();
        if shape.dst_channels == 4 {
            d[3] = if shape.src_channels == 4 {
                round_normalized(s[3], max).as_()
            } else {
                max.as_()
            };
        }
    }
}

fn reformat_int_to_float<T>(shape: LaneShape, src: &[T], dst: &mut [f32], max: f32)
where
    T: Copy + 'static + AsPrimitive<f32>,
{
    let rescale = 1.0 / max;
    for (s, d) in src
        .chunks_exact(shape.src_channels)
        .zip(dst.chunks_exact_mut(shape.dst_channels))
    {
        d[0] = s[0].as_() * rescale;
        d[1] = s[1].as_() * rescale;
        d[2] = s[2].as_() * rescale;
        if shape.dst_channels == 4 {
            d[3] = if shape.src_channels == 4 {
                s[3].as_() * rescale
            } else {
                1.0
            };
        }
    }
}

fn reformat_int_to_int<T, U>(shape: LaneShape, src: &[T], dst: &mut [U], src_max: f32, dst_max: f32)
where
    T: Copy + 'static + AsPrimitive<f32>,
    U: Copy + Default + 'static,
    f32: AsPrimitive<U>,
{
    let rescale = dst_max / src_max;
    for (s, d) in src
        .chunks_exact(shape.src_channels)
        .zip(dst.chunks_exact_mut(shape.dst_channels))
    {
        d[0] = mlaf(0.5, s[0].as_(), rescale).floor().as_();
        d[1] = mlaf(0.5, s[1].as_(), rescale).floor().as_();
        d[2] = mlaf(0.5, s[2].as_(), rescale).floor().as_();
        if shape.dst_channels == 4 {
            d[3] = if shape.src_channels == 4 {
                mlaf(0.5, s[3].as_(), rescale).floor().as_()
            } else {
                dst_max.as_()
            };
        }
    }
}

/// Converts one contiguous slab of pixels. The prepared state decides
/// between the full color pipeline and a pure reformat.
pub(crate) fn run_slab(prepared: &Prepared, shape: LaneShape, src: PixelSlice, dst: PixelSliceMut) {
    if prepared.bypass {
        match (src, dst) {
            (PixelSlice::F32(s), PixelSliceMut::F32(d)) => reformat_float_to_float(shape, s, d),
            (PixelSlice::F32(s), PixelSliceMut::U8(d)) => {
                reformat_float_to_int(shape, s, d, 255.0)
            }
            (PixelSlice::F32(s), PixelSliceMut::U16(d)) => {
                reformat_float_to_int(shape, s, d, 65535.0)
            }
            (PixelSlice::U8(s), PixelSliceMut::F32(d)) => {
                reformat_int_to_float(shape, s, d, 255.0)
            }
            (PixelSlice::U16(s), PixelSliceMut::F32(d)) => {
                reformat_int_to_float(shape, s, d, 65535.0)
            }
            (PixelSlice::U8(s), PixelSliceMut::U8(d)) => {
                reformat_int_to_int(shape, s, d, 255.0, 255.0)
            }
            (PixelSlice::U8(s), PixelSliceMut::U16(d)) => {
                reformat_int_to_int(shape, s, d, 255.0, 65535.0)
            }
            (PixelSlice::U16(s), PixelSliceMut::U8(d)) => {
                reformat_int_to_int(shape, s, d, 65535.0, 255.0)
            }
            (PixelSlice::U16(s), PixelSliceMut::U16(d)) => {
                reformat_int_to_int(shape, s, d, 65535.0, 65535.0)
            }
        }
    } else {
        match (src, dst) {
            (PixelSlice::F32(s), PixelSliceMut::F32(d)) => {
                transform_float_to_float(prepared, shape, s, d)
            }
            (PixelSlice::F32(s), PixelSliceMut::U8(d)) => {
                transform_float_to_int(prepared, shape, s, d, 255.0)
            }
            (PixelSlice::F32(s), PixelSliceMut::U16(d)) => {
                transform_float_to_int(prepared, shape, s, d, 65535.0)
            }
            (PixelSlice::U8(s), PixelSliceMut::F32(d)) => {
                transform_int_to_float(prepared, shape, s, d, 255.0)
            }
            (PixelSlice::U16(s), PixelSliceMut::F32(d)) => {
                transform_int_to_float(prepared, shape, s, d, 65535.0)
            }
            (PixelSlice::U8(s), PixelSliceMut::U8(d)) => {
                transform_int_to_int(prepared, shape, s, d, 255.0, 255.0)
            }
            (PixelSlice::U8(s), PixelSliceMut::U16(d)) => {
                transform_int_to_int(prepared, shape, s, d, 255.0, 65535.0)
            }
            (PixelSlice::U16(s), PixelSliceMut::U8(d)) => {
                transform_int_to_int(prepared, shape, s, d, 65535.0, 255.0)
            }
            (PixelSlice::U16(s), PixelSliceMut::U16(d)) => {
                transform_int_to_int(prepared, shape, s, d, 65535.0, 65535.0)
            }
        }
    }
}
