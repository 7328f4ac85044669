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
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors surfaced by the conversion core.
///
/// Pixel math itself never fails; out-of-range values are clamped. Anything
/// listed here aborts the current conversion and releases every intermediate
/// buffer acquired so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CmsError {
    /// The destination profile override could not be loaded.
    InvalidProfileOverride(String),
    /// Destination primaries, gamma or luminance are not strictly positive.
    InvalidDestination,
    /// Destination profile synthesis was requested but the source curve is
    /// neither a plain gamma nor was an explicit gamma supplied.
    UnsupportedCurve,
    /// Hald image is not square, or its side is not a perfect cube.
    InvalidHald { width: u32, height: u32 },
    /// Source and destination lanes do not hold the same number of pixels.
    LaneSizeMismatch,
    /// A pixel buffer variant does not match the declared bit depth.
    MismatchedDepth,
    /// The operation requires an external engine (CMM or resampler) and the
    /// context has none registered.
    ForeignEngineUnavailable,
    /// Degenerate primaries triangle, the colorant matrix is singular.
    DivisionByZero,
}

impl Display for CmsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CmsError::InvalidProfileOverride(path) => {
                write!(f, "Invalid destination profile override: {path}")
            }
            CmsError::InvalidDestination => f.write_str(
                "Can't create destination profile, primaries, gamma and luminance must be positive",
            ),
            CmsError::UnsupportedCurve => f.write_str(
                "Can't create destination profile, source curve is not a simple gamma curve",
            ),
            CmsError::InvalidHald { width, height } => {
                write!(f, "Hald CLUT dimensions aren't cubic [{width}x{height}]")
            }
            CmsError::LaneSizeMismatch => f.write_str("Lanes length must match"),
            CmsError::MismatchedDepth => {
                f.write_str("Pixel storage does not match the declared bit depth")
            }
            CmsError::ForeignEngineUnavailable => {
                f.write_str("No external engine is registered on this context")
            }
            CmsError::DivisionByZero => f.write_str("Division by zero"),
        }
    }
}

impl Error for CmsError {}
