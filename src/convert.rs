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

//! The top-level conversion orchestrator.
//!
//! Decides the pipeline shape (direct single transform versus a linear
//! float intermediate), sequences grading, resizing and CLUT postprocessing
//! and produces the destination image. All intermediate buffers are locals,
//! released on every exit path; a partially built destination image never
//! escapes on error.

use crate::clut::HaldClut;
use crate::context::{Context, ResizeFilter};
use crate::err::CmsError;
use crate::grade::color_grade;
use crate::image::{BitDepth, Image, PixelSlice, PixelSliceMut};
use crate::matrix::Primaries;
use crate::pixelmath::{float_to_unorm, scale_luminance, unorm_to_float};
use crate::profile::Profile;
use crate::transform::{Tonemap, Transform, TransformFormat};
use crate::trc::TransferCurve;
use std::path::PathBuf;

/// Conversion request.
///
/// `gamma` and `luminance` follow the same convention: negative inherits
/// the source value, zero asks auto-grading to choose, positive is taken
/// literally.
#[derive(Clone, Debug)]
pub struct ConversionParams {
    /// Destination primaries override.
    pub primaries: Option<Primaries>,
    pub gamma: f32,
    pub luminance: i32,
    /// Destination bits per channel, 0 inherits the source depth.
    pub bpp: u32,
    pub auto_grade: bool,
    /// Target dimensions; a zero in one dimension preserves aspect.
    pub resize_width: u32,
    pub resize_height: u32,
    pub resize_filter: ResizeFilter,
    /// Path to an ICC profile adopted as the destination profile.
    pub icc_override_out: Option<PathBuf>,
    /// Hald CLUT applied to the converted float pixels.
    pub hald: Option<Image>,
    pub tonemap: Tonemap,
    pub description: Option<String>,
    pub copyright: Option<String>,
    /// Worker threads, 0 uses the context default.
    pub jobs: usize,
}

impl Default for ConversionParams {
    fn default() -> Self {
        ConversionParams {
            primaries: None,
            gamma: -1.0,
            luminance: -1,
            bpp: 0,
            auto_grade: false,
            resize_width: 0,
            resize_height: 0,
            resize_filter: ResizeFilter::Auto,
            icc_override_out: None,
            hald: None,
            tonemap: Tonemap::Auto,
            description: None,
            copyright: None,
            jobs: 0,
        }
    }
}

/// Converts `src_image` according to `params`, producing a fresh image.
pub fn convert(
    ctx: &Context,
    src_image: &Image,
    params: &ConversionParams,
) -> Result<Image, CmsError> {
    let jobs = if params.jobs == 0 { ctx.jobs } else { params.jobs };

    // Parse the source image and arguments for early pipeline decisions.
    let (src_primaries, src_curve, src_luminance_tag) = src_image.profile.query();

    let mut dst_primaries = src_primaries;
    if let Some(p) = params.primaries {
        dst_primaries = p;
    }

    let src_luminance = if src_luminance_tag != 0 {
        src_luminance_tag
    } else {
        ctx.default_luminance
    };
    let mut dst_luminance: u32 = 0;
    if params.luminance < 0 {
        dst_luminance = src_luminance;
    } else if params.luminance != 0 {
        dst_luminance = params.luminance as u32;
    }

    let src_gamma = src_curve.estimated_gamma();
    if !matches!(src_curve, TransferCurve::Gamma(_)) && src_gamma > 0.0 {
        log::info!(target: "convert", "Estimated source gamma: {src_gamma}");
    }
    let mut dst_gamma = 0.0f32;
    if params.gamma < 0.0 {
        dst_gamma = src_gamma;
    } else if params.gamma > 0.0 {
        dst_gamma = params.gamma;
    }

    let dst_depth = match params.bpp {
        0 => src_image.depth,
        bits => BitDepth::from_bits(bits).ok_or(CmsError::InvalidDestination)?,
    };

    if !params.auto_grade {
        if dst_gamma == 0.0 {
            dst_gamma = src_gamma;
        }
        if dst_luminance == 0 {
            dst_luminance = src_luminance;
        }
    }

    let (dst_width, dst_height) = if params.resize_width > 0 || params.resize_height > 0 {
        let (w, h) = if params.resize_width == 0 {
            (
                ((src_image.width as f32 / src_image.height as f32)
                    * params.resize_height as f32) as u32,
                params.resize_height,
            )
        } else if params.resize_height == 0 {
            (
                params.resize_width,
                ((src_image.height as f32 / src_image.width as f32)
                    * params.resize_width as f32) as u32,
            )
        } else {
            (params.resize_width, params.resize_height)
        };
        (w.max(1), h.max(1))
    } else {
        (src_image.width, src_image.height)
    };
    let resizing = dst_width != src_image.width || dst_height != src_image.height;

    // Load the destination profile override, if any.
    let mut dst_profile_override: Option<Profile> = None;
    if let Some(path) = &params.icc_override_out {
        let mut profile = Profile::read(ctx, path).map_err(|e| {
            log::error!("Invalid destination profile override: {}", path.display());
            match e {
                CmsError::InvalidProfileOverride(_) => e,
                _ => CmsError::InvalidProfileOverride(path.display().to_string()),
            }
        })?;

        // Adopt the override's luminance tag when it has one, otherwise the
        // source luminance, and record the resolution on the profile so the
        // final transform agrees with it.
        dst_luminance = if profile.luminance != 0 {
            profile.luminance
        } else {
            src_luminance
        };
        if profile.luminance == 0 {
            profile.luminance = dst_luminance;
        }

        log::info!(target: "profile", "Overriding dst profile with file: {}", path.display());
        dst_profile_override = Some(profile);
    }

    // Decide whether to convert through an intermediate linear float array
    // or directly with a single transform.
    let mut convert_directly = true;
    if src_luminance != dst_luminance {
        convert_directly = false;
    }
    if resizing {
        convert_directly = false;
    }
    if src_image.depth.is_float() || dst_depth.is_float() {
        convert_directly = false;
    }
    if params.auto_grade {
        // Grading inspects the linear pixels.
        convert_directly = false;
    }
    let hald_clut = match &params.hald {
        Some(hald_image) => {
            let clut = HaldClut::from_image(hald_image).inspect_err(|_| {
                log::error!(
                    "Hald CLUT dimensions aren't cubic [{}x{}]",
                    hald_image.width,
                    hald_image.height
                );
            })?;
            convert_directly = false;
            Some(clut)
        }
        None => None,
    };

    // Intermediate gamma-1.0 float pixels, when the pipeline needs them.
    let mut linear_pixels: Vec<f32> = Vec::new();
    if !convert_directly {
        let linear_profile = Profile::new_linear(dst_primaries, src_luminance);
        let pixel_count = src_image.pixel_count();

        log::info!(target: "convert", "Calculating linear pixels...");
        let mut src_floats = vec![0f32; Image::CHANNELS * pixel_count];
        unorm_to_float(src_image.pixels.as_slice(), &mut src_floats)?;

        linear_pixels = vec![0f32; Image::CHANNELS * pixel_count];
        let to_linear = Transform::new(
            Some(&src_image.profile),
            TransformFormat::Rgba,
            BitDepth::Float,
            Some(&linear_profile),
            TransformFormat::Rgba,
            BitDepth::Float,
            Tonemap::Off,
        );
        to_linear.run(
            ctx,
            jobs,
            PixelSlice::F32(&src_floats),
            PixelSliceMut::F32(&mut linear_pixels),
            pixel_count,
        )?;
    }

    if params.auto_grade {
        log::info!(target: "grading", "Color grading...");
        color_grade(
            jobs,
            &linear_pixels,
            src_luminance,
            dst_depth,
            &mut dst_luminance,
            &mut dst_gamma,
        );
        log::info!(target: "grading", "Using maxLum: {dst_luminance}, gamma: {dst_gamma}");
    }

    if dst_luminance == 0 {
        log::error!(
            "Can't create destination profile, luminance({dst_luminance}) is invalid"
        );
        return Err(CmsError::InvalidDestination);
    }

    // Luminance scale and tonemapping. Auto-grading never scales a pixel
    // past the brightest source pixel, so tonemapping is unnecessary there.
    let luminance_scale = src_luminance as f32 / dst_luminance as f32;
    let mut tonemap = if params.auto_grade {
        false
    } else {
        luminance_scale > 1.0
    };
    if params.tonemap != Tonemap::Auto {
        tonemap = params.tonemap == Tonemap::On;
    }

    // Create the destination profile, or clone the source one.
    let dst_profile = match dst_profile_override {
        Some(profile) => profile,
        None => {
            let customized = params.primaries.is_some()
                || src_gamma != dst_gamma
                || src_luminance != dst_luminance
                || params.description.is_some()
                || params.copyright.is_some();
            if customized {
                if !dst_primaries.all_positive() {
                    log::error!(
                        "Can't create destination profile, destination primaries are invalid"
                    );
                    return Err(CmsError::InvalidDestination);
                }
                if dst_gamma == 0.0 {
                    log::error!(
                        "Can't create destination profile, source profile's curve cannot be re-created as it isn't just a simple gamma curve"
                    );
                    return Err(CmsError::UnsupportedCurve);
                }
                let curve = TransferCurve::Gamma(dst_gamma);
                let description = params.description.clone().unwrap_or_else(|| {
                    Profile::generate_description(&dst_primaries, curve, dst_luminance)
                });
                log::info!(
                    target: "profile",
                    "Creating new destination ICC profile: \"{description}\""
                );
                let mut profile =
                    Profile::new(dst_primaries, curve, dst_luminance, description);
                if let Some(copyright) = &params.copyright {
                    log::info!(target: "profile", "Setting copyright: \"{copyright}\"");
                    profile.set_localized_text("cprt", "en", "US", copyright);
                }
                profile
            } else {
                log::info!(
                    target: "profile",
                    "Using unmodified source ICC profile: \"{}\"",
                    src_image.profile.description
                );
                src_image.profile.clone()
            }
        }
    };

    if resizing {
        let resampler = ctx
            .resampler()
            .ok_or(CmsError::ForeignEngineUnavailable)?
            .clone();
        log::info!(
            target: "resize",
            "Resizing {}x{} -> {}x{}",
            src_image.width,
            src_image.height,
            dst_width,
            dst_height
        );
        linear_pixels = resampler.resample(
            &linear_pixels,
            src_image.width as usize,
            src_image.height as usize,
            dst_width as usize,
            dst_height as usize,
            params.resize_filter,
        );
        if linear_pixels.len()
            != Image::CHANNELS * dst_width as usize * dst_height as usize
        {
            return Err(CmsError::LaneSizeMismatch);
        }
    }

    let mut dst_image = Image::new(dst_width, dst_height, dst_depth, dst_profile);

    if convert_directly {
        log::info!(target: "convert", "Converting directly...");
        let pixel_count = src_image.pixel_count();
        let direct = Transform::new(
            Some(&src_image.profile),
            TransformFormat::Rgba,
            src_image.depth,
            Some(&dst_image.profile),
            TransformFormat::Rgba,
            dst_depth,
            params.tonemap,
        );
        direct.run(
            ctx,
            jobs,
            src_image.pixels.as_slice(),
            dst_image.pixels.as_slice_mut(),
            pixel_count,
        )?;
    } else {
        let pixel_count = dst_image.pixel_count();

        if src_luminance != dst_luminance {
            log::info!(
                target: "luminance",
                "Scaling luminance ({luminance_scale}x, {})...",
                if tonemap { "tonemap" } else { "clip" }
            );
            scale_luminance(&mut linear_pixels, luminance_scale, tonemap);
        }

        log::info!(target: "convert", "Performing color conversion...");
        let relinear_profile = Profile::new_linear(dst_primaries, dst_luminance);
        let from_linear = Transform::new(
            Some(&relinear_profile),
            TransformFormat::Rgba,
            BitDepth::Float,
            Some(&dst_image.profile),
            TransformFormat::Rgba,
            BitDepth::Float,
            Tonemap::Off,
        );
        let mut dst_floats = vec![0f32; Image::CHANNELS * pixel_count];
        from_linear.run(
            ctx,
            jobs,
            PixelSlice::F32(&linear_pixels),
            PixelSliceMut::F32(&mut dst_floats),
            pixel_count,
        )?;

        if let Some(clut) = &hald_clut {
            log::info!(target: "hald", "Performing Hald CLUT postprocessing...");
            clut.apply(&mut dst_floats);
        }

        float_to_unorm(&dst_floats, dst_image.pixels.as_slice_mut())?;
    }

    Ok(dst_image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmm::{
        CmmPixelFormat, ForeignCmm, ForeignProfile, ForeignProfileInfo, ForeignTransform,
        RenderingIntent, TransformFlags,
    };
    use crate::context::Resampler;
    use crate::image::PixelData;
    use std::sync::Arc;

    fn ctx() -> Context {
        Context::new().with_default_luminance(80)
    }

    fn bt709_image_8bit(pixel: [u8; 4], luminance: u32) -> Image {
        let profile = Profile::new(
            Primaries::BT709,
            TransferCurve::Gamma(2.2),
            luminance,
            "BT.709 2.2g",
        );
        Image::from_parts(
            1,
            1,
            BitDepth::Eight,
            PixelData::U8(pixel.to_vec()),
            profile,
        )
        .unwrap()
    }

    #[test]
    fn unchanged_conversion_is_lossless() {
        let src = bt709_image_8bit([255, 128, 0, 255], 100);
        let out = convert(&ctx(), &src, &ConversionParams::default()).unwrap();
        assert_eq!(out.width, 1);
        assert_eq!(out.depth, BitDepth::Eight);
        match &out.pixels {
            PixelData::U8(v) => assert_eq!(v.as_slice(), &[255, 128, 0, 255]),
            _ => unreachable!(),
        }
        assert!(out.profile.matches(&src.profile));
    }

    #[test]
    fn depth_widening_keeps_values() {
        let src = bt709_image_8bit([255, 128, 0, 255], 100);
        let params = ConversionParams {
            bpp: 16,
            ..Default::default()
        };
        let out = convert(&ctx(), &src, &params).unwrap();
        assert_eq!(out.depth, BitDepth::Sixteen);
        match &out.pixels {
            PixelData::U16(v) => {
                assert_eq!(v[0], 65535);
                assert!((v[1] as i32 - 128 * 257).abs() <= 257);
                assert_eq!(v[2], 0);
                assert_eq!(v[3], 65535);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn invalid_hald_aborts() {
        let src = bt709_image_8bit([10, 20, 30, 255], 100);
        let params = ConversionParams {
            hald: Some(Image::new(257, 257, BitDepth::Eight, Profile::new_srgb())),
            ..Default::default()
        };
        let err = convert(&ctx(), &src, &params).unwrap_err();
        assert_eq!(
            err,
            CmsError::InvalidHald {
                width: 257,
                height: 257
            }
        );
    }

    #[test]
    fn luminance_rescale_darkens() {
        let src = bt709_image_8bit([200, 200, 200, 255], 400);
        let params = ConversionParams {
            luminance: 100,
            tonemap: Tonemap::Off,
            ..Default::default()
        };
        let out = convert(&ctx(), &src, &params).unwrap();
        assert_eq!(out.profile.luminance, 100);
        match &out.pixels {
            // 4x in linear light clips at the destination range.
            PixelData::U8(v) => assert_eq!(v[0], 255),
            _ => unreachable!(),
        }

        let dimmer = ConversionParams {
            luminance: 800,
            ..Default::default()
        };
        let out = convert(&ctx(), &src, &dimmer).unwrap();
        match &out.pixels {
            PixelData::U8(v) => assert!(v[0] < 200, "{v:?}"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn hdr_source_without_gamma_cannot_be_synthesized() {
        let profile = Profile::new(Primaries::BT2020, TransferCurve::Pq, 10000, "BT.2020 PQ");
        let src = Image::from_parts(
            1,
            1,
            BitDepth::Eight,
            PixelData::U8(vec![64, 64, 64, 255]),
            profile,
        )
        .unwrap();
        let params = ConversionParams {
            luminance: 100,
            ..Default::default()
        };
        let err = convert(&ctx(), &src, &params).unwrap_err();
        assert_eq!(err, CmsError::UnsupportedCurve);
    }

    #[test]
    fn auto_grade_picks_luminance_and_gamma() {
        let profile = Profile::new_linear(Primaries::BT709, 100);
        let src = Image::from_parts(
            1,
            1,
            BitDepth::Float,
            PixelData::F32(vec![0.5, 0.5, 0.5, 1.0]),
            profile,
        )
        .unwrap();
        let params = ConversionParams {
            auto_grade: true,
            gamma: 0.0,
            luminance: 0,
            bpp: 8,
            ..Default::default()
        };
        let out = convert(&ctx(), &src, &params).unwrap();
        assert_eq!(out.profile.luminance, 50);
        assert!(matches!(out.profile.curve, TransferCurve::Gamma(g) if g >= 2.0));
        match &out.pixels {
            // Graded peak maps onto the top code.
            PixelData::U8(v) => assert_eq!(v[0], 255),
            _ => unreachable!(),
        }
    }

    struct AveragingResampler;

    impl Resampler for AveragingResampler {
        fn resample(
            &self,
            src: &[f32],
            src_width: usize,
            src_height: usize,
            dst_width: usize,
            dst_height: usize,
            _filter: ResizeFilter,
        ) -> Vec<f32> {
            // Collapse everything onto one average pixel per output cell.
            let mut avg = [0f32; 4];
            let count = (src_width * src_height) as f32;
            for px in src.chunks_exact(4) {
                for (a, v) in avg.iter_mut().zip(px.iter()) {
                    *a += v / count;
                }
            }
            let mut out = Vec::with_capacity(dst_width * dst_height * 4);
            for _ in 0..dst_width * dst_height {
                out.extend_from_slice(&avg);
            }
            out
        }
    }

    #[test]
    fn resizing_goes_through_resampler() {
        let profile = Profile::new(
            Primaries::BT709,
            TransferCurve::Gamma(1.0),
            100,
            "Linear 100nits",
        );
        let src = Image::from_parts(
            2,
            1,
            BitDepth::Float,
            PixelData::F32(vec![0.2, 0.2, 0.2, 1.0, 0.4, 0.4, 0.4, 1.0]),
            profile,
        )
        .unwrap();
        let params = ConversionParams {
            resize_width: 1,
            resize_height: 1,
            bpp: 32,
            ..Default::default()
        };

        let without = convert(&ctx(), &src, &params).unwrap_err();
        assert_eq!(without, CmsError::ForeignEngineUnavailable);

        let c = ctx().with_resampler(Arc::new(AveragingResampler));
        let out = convert(&c, &src, &params).unwrap();
        assert_eq!((out.width, out.height), (1, 1));
        match &out.pixels {
            PixelData::F32(v) => assert!((v[0] - 0.3).abs() < 1e-5, "{v:?}"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn hald_postprocessing_applies() {
        // An inverting CLUT of level 2: output = 1 - input.
        let level = 2usize;
        let side = level * level * level;
        let dim = level * level;
        let mut data = vec![0f32; side * side * 4];
        let max = (dim - 1) as f32;
        for b in 0..dim {
            for g in 0..dim {
                for r in 0..dim {
                    let idx = ((b * dim + g) * dim + r) * 4;
                    data[idx] = 1.0 - r as f32 / max;
                    data[idx + 1] = 1.0 - g as f32 / max;
                    data[idx + 2] = 1.0 - b as f32 / max;
                    data[idx + 3] = 1.0;
                }
            }
        }
        let hald = Image::from_parts(
            side as u32,
            side as u32,
            BitDepth::Float,
            PixelData::F32(data),
            Profile::new_srgb(),
        )
        .unwrap();

        let src = bt709_image_8bit([255, 255, 255, 255], 100);
        let params = ConversionParams {
            hald: Some(hald),
            ..Default::default()
        };
        let out = convert(&ctx(), &src, &params).unwrap();
        match &out.pixels {
            PixelData::U8(v) => assert_eq!(&v[..3], &[0, 0, 0]),
            _ => unreachable!(),
        }
    }

    #[derive(Debug)]
    struct MockHandle;

    impl ForeignProfile for MockHandle {}

    /// Parses the first four bytes as a little-endian luminance tag.
    struct MockCmm;

    impl ForeignCmm for MockCmm {
        fn read_profile(&self, bytes: &[u8]) -> Result<ForeignProfileInfo, CmsError> {
            let luminance = bytes
                .get(..4)
                .map(|b| u32::from_le_bytes(b.try_into().unwrap()))
                .ok_or_else(|| CmsError::InvalidProfileOverride("truncated".into()))?;
            Ok(ForeignProfileInfo {
                handle: Arc::new(MockHandle),
                primaries: Primaries::BT709,
                curve: TransferCurve::Gamma(2.2),
                luminance,
                description: "Mock".into(),
                builtin_capable: true,
            })
        }

        fn create_profile(
            &self,
            _primaries: &Primaries,
            _curve: TransferCurve,
            _luminance: u32,
        ) -> Result<Arc<dyn ForeignProfile>, CmsError> {
            Err(CmsError::ForeignEngineUnavailable)
        }

        fn create_transform(
            &self,
            _src: Option<Arc<dyn ForeignProfile>>,
            _src_format: CmmPixelFormat,
            _dst: Option<Arc<dyn ForeignProfile>>,
            _dst_format: CmmPixelFormat,
            _intent: RenderingIntent,
            _flags: TransformFlags,
        ) -> Result<Arc<dyn ForeignTransform>, CmsError> {
            Err(CmsError::ForeignEngineUnavailable)
        }
    }

    fn write_mock_profile(luminance: u32) -> PathBuf {
        let path = std::env::temp_dir().join(format!("lumacms_override_{luminance}.icc"));
        std::fs::write(&path, luminance.to_le_bytes()).unwrap();
        path
    }

    #[test]
    fn override_profile_luminance_adoption() {
        let c = ctx().with_foreign_cmm(Arc::new(MockCmm));
        let src = bt709_image_8bit([128, 128, 128, 255], 100);

        // Override with a luminance tag wins.
        let params = ConversionParams {
            icc_override_out: Some(write_mock_profile(600)),
            ..Default::default()
        };
        let out = convert(&c, &src, &params).unwrap();
        assert_eq!(out.profile.luminance, 600);

        // Override without one falls back to the source luminance.
        let params = ConversionParams {
            icc_override_out: Some(write_mock_profile(0)),
            ..Default::default()
        };
        let out = convert(&c, &src, &params).unwrap();
        assert_eq!(out.profile.luminance, 100);
        match &out.pixels {
            PixelData::U8(v) => assert_eq!(v.as_slice(), &[128, 128, 128, 255]),
            _ => unreachable!(),
        }

        // A missing file is an invalid override.
        let params = ConversionParams {
            icc_override_out: Some(std::env::temp_dir().join("lumacms_no_such_profile.icc")),
            ..Default::default()
        };
        let err = convert(&c, &src, &params).unwrap_err();
        assert!(matches!(err, CmsError::InvalidProfileOverride(_)));
    }
}
