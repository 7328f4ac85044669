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

//! Seam to an external color management module.
//!
//! The built-in engine covers parametric profiles in closed form; anything
//! it cannot model (LUT curves, exotic connection spaces) is delegated to a
//! backend implementing these traits. The backend is opaque to the core: it
//! parses ICC blobs into handles and turns pairs of handles into transform
//! objects.

use crate::err::CmsError;
use crate::image::{PixelSlice, PixelSliceMut};
use crate::matrix::Primaries;
use crate::trc::TransferCurve;
use std::fmt::Debug;
use std::sync::Arc;

/// Rendering intents the core requests from the backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RenderingIntent {
    Perceptual,
    AbsoluteColorimetric,
}

/// Transform creation flags. The core always asks for alpha passthrough and
/// disables pipeline collapsing so per-pixel bridges stay exact.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TransformFlags {
    pub copy_alpha: bool,
    pub no_optimize: bool,
}

impl TransformFlags {
    pub const COPY_ALPHA_NO_OPTIMIZE: TransformFlags = TransformFlags {
        copy_alpha: true,
        no_optimize: true,
    };
}

/// Pixel encodings understood at the backend boundary.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CmmPixelFormat {
    Rgba8,
    Rgba16,
    Rgb8,
    Rgb16,
    RgbF32,
    RgbaF32,
    XyzF32,
}

impl CmmPixelFormat {
    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            CmmPixelFormat::Rgba8 | CmmPixelFormat::Rgba16 | CmmPixelFormat::RgbaF32 => 4,
            CmmPixelFormat::Rgb8
            | CmmPixelFormat::Rgb16
            | CmmPixelFormat::RgbF32
            | CmmPixelFormat::XyzF32 => 3,
        }
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(
            self,
            CmmPixelFormat::RgbF32 | CmmPixelFormat::RgbaF32 | CmmPixelFormat::XyzF32
        )
    }
}

/// Opaque backend representation of a profile.
pub trait ForeignProfile: Send + Sync + Debug {}

/// Everything the backend learned while parsing a profile.
pub struct ForeignProfileInfo {
    pub handle: Arc<dyn ForeignProfile>,
    pub primaries: Primaries,
    pub curve: TransferCurve,
    /// Peak luminance tag in nits, 0 when the profile has none.
    pub luminance: u32,
    pub description: String,
    /// Whether the built-in engine can reproduce this profile in closed
    /// form. False routes every transform touching it through the backend.
    pub builtin_capable: bool,
}

/// A prepared backend transform. Implementations must be safe to call from
/// multiple worker threads at once and must never fail; out-of-range values
/// are clamped.
pub trait ForeignTransform: Send + Sync {
    fn transform(&self, src: PixelSlice, dst: PixelSliceMut, pixel_count: usize);
}

/// The external engine itself.
pub trait ForeignCmm: Send + Sync {
    /// Parses an ICC blob.
    fn read_profile(&self, bytes: &[u8]) -> Result<ForeignProfileInfo, CmsError>;

    /// Builds a backend handle for a profile synthesized from components.
    fn create_profile(
        &self,
        primaries: &Primaries,
        curve: TransferCurve,
        luminance: u32,
    ) -> Result<Arc<dyn ForeignProfile>, CmsError>;

    /// Creates a transform between two profiles. `None` stands for the XYZ
    /// profile connection space.
    fn create_transform(
        &self,
        src: Option<Arc<dyn ForeignProfile>>,
        src_format: CmmPixelFormat,
        dst: Option<Arc<dyn ForeignProfile>>,
        dst_format: CmmPixelFormat,
        intent: RenderingIntent,
        flags: TransformFlags,
    ) -> Result<Arc<dyn ForeignTransform>, CmsError>;
}
