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

//! Transform descriptors and their lazy preparation.
//!
//! A [`Transform`] is an immutable description of one conversion between two
//! profiles. The first use derives the colorant matrices, resolves
//! luminances and picks an engine; the prepared state is cached behind a
//! one-shot gate and read-only afterwards, so worker threads share it
//! freely.

use crate::cmm::{CmmPixelFormat, ForeignCmm, ForeignProfile, ForeignTransform, RenderingIntent, TransformFlags};
use crate::context::Context;
use crate::err::CmsError;
use crate::image::{BitDepth, PixelSlice, PixelSliceMut};
use crate::kernel;
use crate::matrix::{Chromaticity, Matrix3f, Primaries};
use crate::profile::Profile;
use crate::trc::{TransferCurve, hlg_peak_for_diffuse_white};
use std::sync::{Arc, OnceLock};

/// The small amount after the 1.0 here buys a little imprecision wiggle
/// room on an automatic tonemap. It's ok to clip if the luminance scale is
/// this close.
pub const AUTO_TONEMAP_LUMINANCE_SCALE_THRESHOLD: f32 = 1.001;

/// Luminance products within this distance count as equal and skip the
/// per-pixel rescale.
pub const LUMINANCE_SCALE_EPSILON: f32 = 1e-5;

/// Lane layout of one side of a transform. `Xyz` is always three floats.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransformFormat {
    Xyz,
    Rgb,
    Rgba,
}

impl TransformFormat {
    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            TransformFormat::Xyz => 3,
            TransformFormat::Rgb => 3,
            TransformFormat::Rgba => 4,
        }
    }

    #[inline]
    pub const fn is_float(self, depth: BitDepth) -> bool {
        match self {
            TransformFormat::Xyz => true,
            TransformFormat::Rgb | TransformFormat::Rgba => depth.is_float(),
        }
    }
}

/// Tone mapping request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Tonemap {
    #[default]
    Auto,
    On,
    Off,
}

/// Per-channel transfer stage resolved from a profile curve. The gamma
/// variant on the destination side stores the exponent already inverted.
#[derive(Copy, Clone, Debug)]
pub(crate) enum TransferStage {
    None,
    Gamma(f32),
    Srgb,
    Hlg,
    Pq,
}

pub(crate) struct BuiltinEngine {
    pub(crate) src_to_xyz: Matrix3f,
    pub(crate) xyz_to_dst: Matrix3f,
    pub(crate) src_eotf: TransferStage,
    pub(crate) dst_oetf: TransferStage,
}

pub(crate) struct ForeignEngine {
    pub(crate) src_to_xyz: Arc<dyn ForeignTransform>,
    pub(crate) xyz_to_dst: Arc<dyn ForeignTransform>,
}

pub(crate) enum Engine {
    Builtin(BuiltinEngine),
    Foreign(ForeignEngine),
}

pub(crate) struct Prepared {
    pub(crate) engine: Engine,
    /// Source and destination profiles match; skip the color math and only
    /// reformat.
    pub(crate) bypass: bool,
    pub(crate) white_point: Chromaticity,
    pub(crate) src_luminance_scale: f32,
    pub(crate) dst_luminance_scale: f32,
    pub(crate) src_curve_scale: f32,
    pub(crate) dst_curve_scale: f32,
    pub(crate) hlg_peak_luminance: f32,
    pub(crate) luminance_scale_enabled: bool,
    pub(crate) tonemap_enabled: bool,
    /// Clamp converted channels to [0, 1]. Raw XYZ output is never clamped.
    pub(crate) clamp_output: bool,
}

#[derive(Copy, Clone)]
pub(crate) struct LaneShape {
    pub(crate) src_channels: usize,
    pub(crate) dst_channels: usize,
}

/// Immutable conversion descriptor. Borrows its profiles; `None` stands for
/// the XYZ profile connection space.
pub struct Transform<'a> {
    src_profile: Option<&'a Profile>,
    dst_profile: Option<&'a Profile>,
    src_format: TransformFormat,
    src_depth: BitDepth,
    dst_format: TransformFormat,
    dst_depth: BitDepth,
    tonemap: Tonemap,
    prepared: OnceLock<Result<Prepared, CmsError>>,
}

impl<'a> Transform<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        src_profile: Option<&'a Profile>,
        src_format: TransformFormat,
        src_depth: BitDepth,
        dst_profile: Option<&'a Profile>,
        dst_format: TransformFormat,
        dst_depth: BitDepth,
        tonemap: Tonemap,
    ) -> Transform<'a> {
        Transform {
            src_profile,
            dst_profile,
            src_format,
            src_depth,
            dst_format,
            dst_depth,
            tonemap,
            prepared: OnceLock::new(),
        }
    }

    /// True when both profiles (where present) are representable in closed
    /// form and the context permits the built-in engine.
    pub fn uses_builtin_engine(&self, ctx: &Context) -> bool {
        ctx.builtin_allowed
            && self.src_profile.is_none_or(|p| p.uses_builtin_engine())
            && self.dst_profile.is_none_or(|p| p.uses_builtin_engine())
    }

    pub fn engine_name(&self, ctx: &Context) -> &'static str {
        if self.uses_builtin_engine(ctx) {
            "builtin"
        } else {
            "foreign"
        }
    }

    /// Overall linear-light gain of this transform,
    /// `srcLum/dstLum · srcScale/dstScale`.
    pub fn luminance_scale(&self, ctx: &Context) -> Result<f32, CmsError> {
        let p = self.prepared(ctx)?;
        Ok(p.src_luminance_scale / p.dst_luminance_scale * p.src_curve_scale
            / p.dst_curve_scale)
    }

    pub(crate) fn prepared(&self, ctx: &Context) -> Result<&Prepared, CmsError> {
        self.prepared
            .get_or_init(|| self.compute_prepared(ctx))
            .as_ref()
            .map_err(|e| e.clone())
    }

    fn compute_prepared(&self, ctx: &Context) -> Result<Prepared, CmsError> {
        let use_builtin = self.uses_builtin_engine(ctx);

        // Default to D65, allow either profile to override it, with the
        // priority dst > src > D65.
        let mut white_point = Chromaticity::D65;

        let mut src_uses_hlg_scaling = false;
        let mut src_curve: Option<TransferCurve> = None;
        let mut src_luminance_scale = 1.0f32;
        if let Some(profile) = self.src_profile {
            let (primaries, curve, luminance_tag) = profile.query();
            let mut luminance = luminance_tag;
            if luminance == 0 {
                luminance = ctx.default_luminance;
                if curve == TransferCurve::Hlg {
                    src_uses_hlg_scaling = true;
                }
            }
            src_luminance_scale = luminance as f32;
            src_curve = Some(curve);
            white_point = primaries.white;
        }

        let mut dst_uses_hlg_scaling = false;
        let mut dst_curve: Option<TransferCurve> = None;
        let mut dst_luminance_scale = 1.0f32;
        if let Some(profile) = self.dst_profile {
            let (primaries, curve, luminance_tag) = profile.query();
            let mut luminance = luminance_tag;
            if luminance == 0 {
                luminance = ctx.default_luminance;
                if curve == TransferCurve::Hlg {
                    dst_uses_hlg_scaling = true;
                }
            }
            dst_luminance_scale = luminance as f32;
            dst_curve = Some(curve);
            white_point = primaries.white;
        }

        let mut hlg_peak_luminance = 0.0f32;
        if src_uses_hlg_scaling || dst_uses_hlg_scaling {
            hlg_peak_luminance = hlg_peak_for_diffuse_white(ctx.default_luminance) as f32;
            log::info!(
                target: "hlg",
                "HLG: Max Luminance {:2.2} nits, based on diffuse white of {} nits",
                hlg_peak_luminance,
                ctx.default_luminance
            );
            if src_uses_hlg_scaling {
                src_luminance_scale = hlg_peak_luminance;
            }
            if dst_uses_hlg_scaling {
                dst_luminance_scale = hlg_peak_luminance;
            }
        } else if src_curve == Some(TransferCurve::Hlg) {
            // HLG profile with an explicit luminance tag: its own peak.
            hlg_peak_luminance = src_luminance_scale;
        } else if dst_curve == Some(TransferCurve::Hlg) {
            hlg_peak_luminance = dst_luminance_scale;
        }

        let src_curve_scale =
            src_curve.map_or(1.0, |c| c.implicit_scale(src_luminance_scale));
        let dst_curve_scale =
            dst_curve.map_or(1.0, |c| c.implicit_scale(dst_luminance_scale));

        let tonemap_enabled = match self.tonemap {
            Tonemap::Auto => {
                (src_luminance_scale * src_curve_scale)
                    / (dst_luminance_scale * dst_curve_scale)
                    > AUTO_TONEMAP_LUMINANCE_SCALE_THRESHOLD
            }
            Tonemap::On => true,
            Tonemap::Off => false,
        };

        let luminance_scale_enabled = !use_builtin
            || self.src_profile.is_none()
            || self.dst_profile.is_none()
            || tonemap_enabled
            || ((src_luminance_scale * src_curve_scale)
                - (dst_luminance_scale * dst_curve_scale))
                .abs()
                > LUMINANCE_SCALE_EPSILON;

        let bypass = match (self.src_profile, self.dst_profile) {
            (None, None) => true,
            (Some(a), Some(b)) => a.matches(b),
            _ => false,
        };

        let engine = if use_builtin {
            Engine::Builtin(self.build_builtin_engine()?)
        } else {
            Engine::Foreign(self.build_foreign_engine(ctx)?)
        };

        Ok(Prepared {
            engine,
            bypass,
            white_point,
            src_luminance_scale,
            dst_luminance_scale,
            src_curve_scale,
            dst_curve_scale,
            hlg_peak_luminance,
            luminance_scale_enabled,
            tonemap_enabled,
            clamp_output: self.dst_profile.is_some(),
        })
    }

    fn build_builtin_engine(&self) -> Result<BuiltinEngine, CmsError> {
        fn derive_side(profile: Option<&Profile>) -> (Option<Primaries>, TransferStage) {
            match profile {
                None => (None, TransferStage::None),
                Some(p) => {
                    let stage = match p.curve {
                        TransferCurve::Gamma(g) => TransferStage::Gamma(g),
                        TransferCurve::Srgb => TransferStage::Srgb,
                        TransferCurve::Hlg => TransferStage::Hlg,
                        TransferCurve::Pq => TransferStage::Pq,
                    };
                    (Some(p.primaries), stage)
                }
            }
        }

        let (mut src_primaries, src_eotf) = derive_side(self.src_profile);
        let (dst_primaries, mut dst_oetf) = derive_side(self.dst_profile);

        // If the primaries are close enough, make them match exactly so the
        // forward and inverse matrices are true inverses of one another and
        // round trips stay tight.
        if let (Some(sp), Some(dp)) = (src_primaries.as_mut(), dst_primaries.as_ref()) {
            if sp.matches(dp) {
                *sp = *dp;
            }
        }

        let src_to_xyz = match src_primaries {
            Some(p) => p.to_xyz_matrix().ok_or(CmsError::DivisionByZero)?,
            None => Matrix3f::IDENTITY,
        };
        let dst_to_xyz = match dst_primaries {
            Some(p) => p.to_xyz_matrix().ok_or(CmsError::DivisionByZero)?,
            None => Matrix3f::IDENTITY,
        };
        let xyz_to_dst = dst_to_xyz.inverse().ok_or(CmsError::DivisionByZero)?;

        if let TransferStage::Gamma(g) = dst_oetf {
            if g != 0.0 {
                dst_oetf = TransferStage::Gamma(1.0 / g);
            }
        }

        Ok(BuiltinEngine {
            src_to_xyz,
            xyz_to_dst,
            src_eotf,
            dst_oetf,
        })
    }

    fn build_foreign_engine(&self, ctx: &Context) -> Result<ForeignEngine, CmsError> {
        let backend = ctx.foreign_cmm().ok_or(CmsError::ForeignEngineUnavailable)?;

        fn handle_for(
            backend: &Arc<dyn ForeignCmm>,
            profile: Option<&Profile>,
        ) -> Result<Option<Arc<dyn ForeignProfile>>, CmsError> {
            match profile {
                None => Ok(None),
                Some(p) => match &p.foreign {
                    Some(h) => Ok(Some(h.clone())),
                    None => Ok(Some(backend.create_profile(
                        &p.primaries,
                        p.curve,
                        p.luminance,
                    )?)),
                },
            }
        }

        // The backend bridges always run on floats; alpha stays with the
        // core.
        fn float_format(format: TransformFormat) -> CmmPixelFormat {
            match format {
                TransformFormat::Xyz => CmmPixelFormat::XyzF32,
                TransformFormat::Rgb | TransformFormat::Rgba => CmmPixelFormat::RgbF32,
            }
        }

        let src_handle = handle_for(backend, self.src_profile)?;
        let dst_handle = handle_for(backend, self.dst_profile)?;

        let src_to_xyz = backend.create_transform(
            src_handle,
            float_format(self.src_format),
            None,
            CmmPixelFormat::XyzF32,
            RenderingIntent::AbsoluteColorimetric,
            TransformFlags::COPY_ALPHA_NO_OPTIMIZE,
        )?;
        let xyz_to_dst = backend.create_transform(
            None,
            CmmPixelFormat::XyzF32,
            dst_handle,
            float_format(self.dst_format),
            RenderingIntent::AbsoluteColorimetric,
            TransformFlags::COPY_ALPHA_NO_OPTIMIZE,
        )?;

        Ok(ForeignEngine {
            src_to_xyz,
            xyz_to_dst,
        })
    }

    /// Runs the transform over `pixel_count` pixels, splitting the work into
    /// at most `task_count` contiguous slabs.
    ///
    /// Slab boundaries never influence per-pixel results; outputs are
    /// bit-identical for any task count.
    pub fn run(
        &self,
        ctx: &Context,
        task_count: usize,
        src: PixelSlice,
        dst: PixelSliceMut,
        pixel_count: usize,
    ) -> Result<(), CmsError> {
        let prepared = self.prepared(ctx)?;

        if src.depth() != self.src_depth || dst.depth() != self.dst_depth {
            return Err(CmsError::MismatchedDepth);
        }
        if (self.src_format == TransformFormat::Xyz && !self.src_depth.is_float())
            || (self.dst_format == TransformFormat::Xyz && !self.dst_depth.is_float())
        {
            return Err(CmsError::MismatchedDepth);
        }

        let shape = LaneShape {
            src_channels: self.src_format.channels(),
            dst_channels: self.dst_format.channels(),
        };
        if src.len() != pixel_count * shape.src_channels
            || dst.len() != pixel_count * shape.dst_channels
        {
            return Err(CmsError::LaneSizeMismatch);
        }
        if pixel_count == 0 {
            return Ok(());
        }

        let tasks = task_count.max(1).min(pixel_count);
        if tasks == 1 {
            kernel::run_slab(prepared, shape, src, dst);
            return Ok(());
        }

        log::info!(target: "convert", "Using {tasks} threads to pixel transform.");

        let pixels_per_task = pixel_count / tasks;
        std::thread::scope(|scope| {
            let mut src_rest = src;
            let mut dst_rest = dst;
            for i in 0..tasks {
                let count = if i == tasks - 1 {
                    pixel_count - pixels_per_task * (tasks - 1)
                } else {
                    pixels_per_task
                };
                let (src_slab, src_tail) = src_rest.split_at(count * shape.src_channels);
                src_rest = src_tail;
                let (dst_slab, dst_tail) = dst_rest.split_at_mut(count * shape.dst_channels);
                dst_rest = dst_tail;
                scope.spawn(move || kernel::run_slab(prepared, shape, src_slab, dst_slab));
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::PixelData;
    use crate::profile::Profile;

    fn ctx() -> Context {
        Context::new().with_default_luminance(80)
    }

    #[test]
    fn matching_profiles_bypass_color_math() {
        // Gamma round-trip: BT.709 2.2g at 100 nits, converted onto itself.
        let profile = Profile::new(
            Primaries::BT709,
            TransferCurve::Gamma(2.2),
            100,
            "BT.709 2.2g 100nits",
        );
        let transform = Transform::new(
            Some(&profile),
            TransformFormat::Rgba,
            BitDepth::Eight,
            Some(&profile),
            TransformFormat::Rgba,
            BitDepth::Eight,
            Tonemap::Off,
        );
        let src = [255u8, 128, 0, 255];
        let mut dst = [0u8; 4];
        transform
            .run(
                &ctx(),
                1,
                PixelSlice::U8(&src),
                PixelSliceMut::U8(&mut dst),
                1,
            )
            .unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn xyz_roundtrip_within_one_code() {
        let profile = Profile::new(
            Primaries::BT709,
            TransferCurve::Gamma(2.2),
            100,
            "BT.709 2.2g 100nits",
        );
        let c = ctx();
        let to_xyz = Transform::new(
            Some(&profile),
            TransformFormat::Rgba,
            BitDepth::Eight,
            None,
            TransformFormat::Xyz,
            BitDepth::Float,
            Tonemap::Off,
        );
        let from_xyz = Transform::new(
            None,
            TransformFormat::Xyz,
            BitDepth::Float,
            Some(&profile),
            TransformFormat::Rgba,
            BitDepth::Eight,
            Tonemap::Off,
        );

        let src = [255u8, 128, 0, 255];
        let mut xyz = [0f32; 3];
        to_xyz
            .run(&c, 1, PixelSlice::U8(&src), PixelSliceMut::F32(&mut xyz), 1)
            .unwrap();
        let mut back = [0u8; 4];
        from_xyz
            .run(&c, 1, PixelSlice::F32(&xyz), PixelSliceMut::U8(&mut back), 1)
            .unwrap();
        for (a, b) in src.iter().zip(back.iter()).take(3) {
            assert!((*a as i32 - *b as i32).abs() <= 1, "{src:?} vs {back:?}");
        }
        assert_eq!(back[3], 255);
    }

    #[test]
    fn linear_to_srgb_hits_reference_code() {
        let linear = Profile::new_linear(Primaries::BT709, 0);
        let srgb = Profile::new_srgb();
        let transform = Transform::new(
            Some(&linear),
            TransformFormat::Rgba,
            BitDepth::Float,
            Some(&srgb),
            TransformFormat::Rgba,
            BitDepth::Eight,
            Tonemap::Off,
        );
        let src = [0.5f32, 0.5, 0.5, 1.0];
        let mut dst = [0u8; 4];
        transform
            .run(
                &ctx(),
                1,
                PixelSlice::F32(&src),
                PixelSliceMut::U8(&mut dst),
                1,
            )
            .unwrap();
        for c in dst.iter().take(3) {
            assert!((*c as i32 - 188).abs() <= 1, "{dst:?}");
        }
        assert_eq!(dst[3], 255);
    }

    #[test]
    fn pq_to_sdr_tonemaps_into_range() {
        let pq = Profile::new(Primaries::BT2020, TransferCurve::Pq, 10000, "BT.2020 PQ");
        let sdr = Profile::new(
            Primaries::BT709,
            TransferCurve::Gamma(2.2),
            100,
            "BT.709 2.2g 100nits",
        );
        let transform = Transform::new(
            Some(&pq),
            TransformFormat::Rgba,
            BitDepth::Float,
            Some(&sdr),
            TransformFormat::Rgba,
            BitDepth::Eight,
            Tonemap::On,
        );
        let c = ctx();
        assert!((transform.luminance_scale(&c).unwrap() - 100.0).abs() < 1e-3);

        let src = [0.58f32, 0.58, 0.58, 1.0];
        let mut dst = [0u8; 4];
        transform
            .run(
                &c,
                1,
                PixelSlice::F32(&src),
                PixelSliceMut::U8(&mut dst),
                1,
            )
            .unwrap();
        assert!(dst[0] > 0, "{dst:?}");
        assert_eq!(dst[3], 255);
    }

    #[test]
    fn parallel_outputs_are_bit_identical() {
        let pq = Profile::new(Primaries::BT2020, TransferCurve::Pq, 10000, "BT.2020 PQ");
        let sdr = Profile::new(
            Primaries::BT709,
            TransferCurve::Gamma(2.2),
            100,
            "BT.709 2.2g 100nits",
        );
        let transform = Transform::new(
            Some(&pq),
            TransformFormat::Rgba,
            BitDepth::Float,
            Some(&sdr),
            TransformFormat::Rgba,
            BitDepth::Eight,
            Tonemap::Auto,
        );
        let c = ctx();

        let pixel_count = 173;
        let mut src = vec![0f32; pixel_count * 4];
        for (i, v) in src.iter_mut().enumerate() {
            *v = if i % 4 == 3 {
                1.0
            } else {
                (i % 97) as f32 / 96.0
            };
        }

        let mut reference = PixelData::zeroed(BitDepth::Eight, pixel_count * 4);
        transform
            .run(
                &c,
                1,
                PixelSlice::F32(&src),
                reference.as_slice_mut(),
                pixel_count,
            )
            .unwrap();

        for tasks in [2usize, 3, 7, 8, 64] {
            let mut out = PixelData::zeroed(BitDepth::Eight, pixel_count * 4);
            transform
                .run(
                    &c,
                    tasks,
                    PixelSlice::F32(&src),
                    out.as_slice_mut(),
                    pixel_count,
                )
                .unwrap();
            match (&reference, &out) {
                (PixelData::U8(a), PixelData::U8(b)) => assert_eq!(a, b, "tasks {tasks}"),
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn random_pixels_roundtrip_through_xyz() {
        use rand::Rng;
        let profile = Profile::new(
            Primaries::DISPLAY_P3,
            TransferCurve::Gamma(2.2),
            200,
            "P3 2.2g 200nits",
        );
        let c = ctx();
        let to_xyz = Transform::new(
            Some(&profile),
            TransformFormat::Rgba,
            BitDepth::Eight,
            None,
            TransformFormat::Xyz,
            BitDepth::Float,
            Tonemap::Off,
        );
        let from_xyz = Transform::new(
            None,
            TransformFormat::Xyz,
            BitDepth::Float,
            Some(&profile),
            TransformFormat::Rgba,
            BitDepth::Eight,
            Tonemap::Off,
        );

        let pixel_count = 64;
        let mut rng = rand::rng();
        let src: Vec<u8> = (0..pixel_count * 4).map(|_| rng.random()).collect();
        let mut xyz = vec![0f32; pixel_count * 3];
        to_xyz
            .run(
                &c,
                4,
                PixelSlice::U8(&src),
                PixelSliceMut::F32(&mut xyz),
                pixel_count,
            )
            .unwrap();
        let mut back = vec![0u8; pixel_count * 4];
        from_xyz
            .run(
                &c,
                4,
                PixelSlice::F32(&xyz),
                PixelSliceMut::U8(&mut back),
                pixel_count,
            )
            .unwrap();
        for (pixel, restored) in src.chunks_exact(4).zip(back.chunks_exact(4)) {
            for (a, b) in pixel.iter().zip(restored.iter()).take(3) {
                assert!((*a as i32 - *b as i32).abs() <= 1, "{pixel:?} vs {restored:?}");
            }
            // Alpha was dropped at the XYZ stage and widens back to opaque.
            assert_eq!(restored[3], 255);
        }
    }

    #[test]
    fn luminance_scale_flags() {
        let c = ctx();

        let a = Profile::new(
            Primaries::BT709,
            TransferCurve::Gamma(2.2),
            100,
            "BT.709 2.2g 100nits",
        );
        let same = Transform::new(
            Some(&a),
            TransformFormat::Rgba,
            BitDepth::Float,
            Some(&a),
            TransformFormat::Rgba,
            BitDepth::Float,
            Tonemap::Auto,
        );
        let p = same.prepared(&c).unwrap();
        assert!(!p.luminance_scale_enabled);
        assert!(!p.tonemap_enabled);

        let brighter = Profile::new(
            Primaries::BT709,
            TransferCurve::Gamma(2.2),
            400,
            "BT.709 2.2g 400nits",
        );
        let down = Transform::new(
            Some(&brighter),
            TransformFormat::Rgba,
            BitDepth::Float,
            Some(&a),
            TransformFormat::Rgba,
            BitDepth::Float,
            Tonemap::Auto,
        );
        let p = down.prepared(&c).unwrap();
        assert!(p.luminance_scale_enabled);
        assert!(p.tonemap_enabled);

        let up = Transform::new(
            Some(&a),
            TransformFormat::Rgba,
            BitDepth::Float,
            Some(&brighter),
            TransformFormat::Rgba,
            BitDepth::Float,
            Tonemap::Auto,
        );
        let p = up.prepared(&c).unwrap();
        assert!(p.luminance_scale_enabled);
        // Scaling up never auto-tonemaps.
        assert!(!p.tonemap_enabled);
    }

    #[test]
    fn prepared_matrices_invert_each_other() {
        let a = Profile::new_linear(Primaries::BT709, 100);
        let b = Profile::new_linear(Primaries::BT709, 100);
        let t = Transform::new(
            Some(&a),
            TransformFormat::Rgba,
            BitDepth::Float,
            Some(&b),
            TransformFormat::Rgba,
            BitDepth::Float,
            Tonemap::Off,
        );
        let p = t.prepared(&ctx()).unwrap();
        match &p.engine {
            Engine::Builtin(e) => {
                let product = e.xyz_to_dst.mat_mul(e.src_to_xyz);
                for i in 0..3 {
                    for j in 0..3 {
                        let expected = if i == j { 1.0 } else { 0.0 };
                        assert!(
                            (product.v[i][j] - expected).abs() < 1e-6,
                            "{product:?}"
                        );
                    }
                }
            }
            Engine::Foreign(_) => unreachable!(),
        }
    }

    #[test]
    fn hlg_without_luminance_uses_peak_solver() {
        let hlg = Profile::new_bt2020_hlg();
        let sdr = Profile::new(
            Primaries::BT709,
            TransferCurve::Gamma(2.2),
            0,
            "BT.709 2.2g",
        );
        let t = Transform::new(
            Some(&hlg),
            TransformFormat::Rgba,
            BitDepth::Float,
            Some(&sdr),
            TransformFormat::Rgba,
            BitDepth::Float,
            Tonemap::Auto,
        );
        let p = t.prepared(&ctx()).unwrap();
        // Peak white solved from the 80 nit context diffuse white.
        assert!(p.hlg_peak_luminance > 100.0, "{}", p.hlg_peak_luminance);
        assert_eq!(p.src_luminance_scale, p.hlg_peak_luminance);
        assert_eq!(p.dst_luminance_scale, 80.0);
        assert!(p.tonemap_enabled);
        assert!(p.luminance_scale_enabled);
    }

    #[test]
    fn missing_profile_forces_luminance_scale() {
        let a = Profile::new(
            Primaries::BT709,
            TransferCurve::Gamma(2.2),
            100,
            "BT.709 2.2g 100nits",
        );
        let t = Transform::new(
            Some(&a),
            TransformFormat::Rgba,
            BitDepth::Float,
            None,
            TransformFormat::Xyz,
            BitDepth::Float,
            Tonemap::Off,
        );
        let p = t.prepared(&ctx()).unwrap();
        assert!(p.luminance_scale_enabled);
        assert!(!p.clamp_output);
    }

    #[test]
    fn lane_validation() {
        let a = Profile::new_srgb();
        let t = Transform::new(
            Some(&a),
            TransformFormat::Rgba,
            BitDepth::Eight,
            Some(&a),
            TransformFormat::Rgba,
            BitDepth::Eight,
            Tonemap::Off,
        );
        let src = [0u8; 8];
        let mut dst = [0u8; 4];
        let err = t.run(
            &ctx(),
            1,
            PixelSlice::U8(&src),
            PixelSliceMut::U8(&mut dst),
            2,
        );
        assert_eq!(err.unwrap_err(), CmsError::LaneSizeMismatch);

        let mut dst16 = [0u16; 4];
        let err = t.run(
            &ctx(),
            1,
            PixelSlice::U8(&src[..4]),
            PixelSliceMut::U16(&mut dst16),
            1,
        );
        assert_eq!(err.unwrap_err(), CmsError::MismatchedDepth);
    }
}
