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
#![allow(clippy::manual_clamp, clippy::excessive_precision)]
#![deny(unreachable_pub)]
mod clut;
mod cmm;
mod context;
mod convert;
mod err;
mod grade;
mod image;
mod kernel;
mod matrix;
mod mlaf;
mod pixelmath;
mod profile;
mod transform;
mod trc;

pub use clut::HaldClut;
pub use cmm::{
    CmmPixelFormat, ForeignCmm, ForeignProfile, ForeignProfileInfo, ForeignTransform,
    RenderingIntent, TransformFlags,
};
pub use context::{Context, DEFAULT_LUMINANCE, Resampler, ResizeFilter};
pub use convert::{ConversionParams, convert};
pub use err::CmsError;
pub use grade::color_grade;
pub use image::{BitDepth, Image, PixelData, PixelSlice, PixelSliceMut};
pub use matrix::{
    Chromaticity, Matrix3f, PRIMARIES_EPSILON, Primaries, Vector3f, XyY, Xyz,
};
pub use pixelmath::{float_to_unorm, scale_luminance, unorm_to_float};
pub use profile::Profile;
pub use transform::{
    AUTO_TONEMAP_LUMINANCE_SCALE_THRESHOLD, LUMINANCE_SCALE_EPSILON, Tonemap, Transform,
    TransformFormat,
};
pub use trc::{
    TransferCurve, default_luminance_from_hlg, hlg_diffuse_white, hlg_eotf, hlg_oetf,
    hlg_peak_for_diffuse_white, pq_eotf, pq_oetf, srgb_eotf, srgb_oetf,
};
