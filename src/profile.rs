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
use crate::cmm::ForeignProfile;
use crate::context::Context;
use crate::err::CmsError;
use crate::matrix::Primaries;
use crate::trc::TransferCurve;
use std::path::Path;
use std::sync::Arc;

/// Tolerance used when comparing two gamma exponents.
const GAMMA_EPSILON: f32 = 1e-4;

#[derive(Clone, Debug)]
pub(crate) struct LocalizedTag {
    pub(crate) tag: String,
    pub(crate) language: String,
    pub(crate) country: String,
    pub(crate) text: String,
}

/// A display profile: chromaticity primaries, a tone curve and an optional
/// peak luminance.
///
/// Profiles synthesized from components are always representable by the
/// built-in engine. Profiles parsed by an external backend additionally
/// carry the backend's opaque handle and the backend's verdict on whether
/// the closed-form engine may be used for them.
#[derive(Clone, Debug)]
pub struct Profile {
    pub primaries: Primaries,
    pub curve: TransferCurve,
    /// Peak luminance in nits, 0 = unspecified.
    pub luminance: u32,
    pub description: String,
    pub(crate) localized: Vec<LocalizedTag>,
    pub(crate) foreign: Option<Arc<dyn ForeignProfile>>,
    pub(crate) builtin_capable: bool,
}

impl Profile {
    pub fn new(
        primaries: Primaries,
        curve: TransferCurve,
        luminance: u32,
        description: impl Into<String>,
    ) -> Profile {
        Profile {
            primaries,
            curve,
            luminance,
            description: description.into(),
            localized: Vec::new(),
            foreign: None,
            builtin_capable: true,
        }
    }

    pub fn new_srgb() -> Profile {
        Profile::new(
            Primaries::BT709,
            TransferCurve::Srgb,
            0,
            "sRGB IEC61966-2.1",
        )
    }

    pub fn new_bt709(gamma: f32) -> Profile {
        Profile::new(
            Primaries::BT709,
            TransferCurve::Gamma(gamma),
            0,
            format!("BT.709 {gamma}g"),
        )
    }

    pub fn new_bt2020_pq(luminance: u32) -> Profile {
        Profile::new(
            Primaries::BT2020,
            TransferCurve::Pq,
            luminance,
            "BT.2020 PQ",
        )
    }

    pub fn new_bt2020_hlg() -> Profile {
        Profile::new(Primaries::BT2020, TransferCurve::Hlg, 0, "BT.2020 HLG")
    }

    /// A linear-light working profile, the shape used for intermediate
    /// float buffers.
    pub fn new_linear(primaries: Primaries, luminance: u32) -> Profile {
        Profile::new(primaries, TransferCurve::Gamma(1.0), luminance, "Linear")
    }

    /// Loads a profile through the context's external backend. ICC binary
    /// parsing is not a concern of this crate.
    pub fn read(ctx: &Context, path: &Path) -> Result<Profile, CmsError> {
        let backend = ctx.foreign_cmm().ok_or(CmsError::ForeignEngineUnavailable)?;
        let bytes = std::fs::read(path)
            .map_err(|_| CmsError::InvalidProfileOverride(path.display().to_string()))?;
        let info = backend.read_profile(&bytes)?;
        Ok(Profile {
            primaries: info.primaries,
            curve: info.curve,
            luminance: info.luminance,
            description: info.description,
            localized: Vec::new(),
            foreign: Some(info.handle),
            builtin_capable: info.builtin_capable,
        })
    }

    #[inline]
    pub fn query(&self) -> (Primaries, TransferCurve, u32) {
        (self.primaries, self.curve, self.luminance)
    }

    /// Whether the closed-form engine may evaluate this profile.
    #[inline]
    pub fn uses_builtin_engine(&self) -> bool {
        self.builtin_capable
    }

    #[inline]
    pub fn primaries_match(&self, other: &Profile) -> bool {
        self.primaries.matches(&other.primaries)
    }

    fn curves_match(a: TransferCurve, b: TransferCurve) -> bool {
        match (a, b) {
            (TransferCurve::Gamma(ga), TransferCurve::Gamma(gb)) => {
                (ga - gb).abs() <= GAMMA_EPSILON
            }
            (TransferCurve::Srgb, TransferCurve::Srgb) => true,
            (TransferCurve::Hlg, TransferCurve::Hlg) => true,
            (TransferCurve::Pq, TransferCurve::Pq) => true,
            _ => false,
        }
    }

    /// Full semantic match. Matching profiles let a transform skip the
    /// color math entirely and degrade to a pure reformat.
    pub fn matches(&self, other: &Profile) -> bool {
        self.primaries_match(other)
            && Self::curves_match(self.curve, other.curve)
            && self.luminance == other.luminance
    }

    /// Attaches a localized text tag, `"cprt"` being the copyright tag.
    pub fn set_localized_text(
        &mut self,
        tag: impl Into<String>,
        language: impl Into<String>,
        country: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.localized.push(LocalizedTag {
            tag: tag.into(),
            language: language.into(),
            country: country.into(),
            text: text.into(),
        });
    }

    pub fn localized_text(&self, tag: &str) -> Option<&str> {
        self.localized
            .iter()
            .find(|t| t.tag == tag)
            .map(|t| t.text.as_str())
    }

    /// Auto-generated description for synthesized profiles, e.g.
    /// `"BT.709 2.2g 100nits"`.
    pub fn generate_description(
        primaries: &Primaries,
        curve: TransferCurve,
        luminance: u32,
    ) -> String {
        let prim = if primaries.matches(&Primaries::BT709) {
            "BT.709"
        } else if primaries.matches(&Primaries::BT2020) {
            "BT.2020"
        } else if primaries.matches(&Primaries::DISPLAY_P3) {
            "P3"
        } else {
            "Custom"
        };
        let curve = match curve {
            TransferCurve::Gamma(g) => format!("{g}g"),
            TransferCurve::Srgb => "sRGB".to_string(),
            TransferCurve::Hlg => "HLG".to_string(),
            TransferCurve::Pq => "PQ".to_string(),
        };
        if luminance == 0 {
            format!("{prim} {curve}")
        } else {
            format!("{prim} {curve} {luminance}nits")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_match() {
        let a = Profile::new_bt709(2.2);
        let b = Profile::new_bt709(2.2);
        assert!(a.matches(&b));

        let c = Profile::new_bt709(2.4);
        assert!(a.primaries_match(&c));
        assert!(!a.matches(&c));

        let mut d = Profile::new_bt709(2.2);
        d.luminance = 300;
        assert!(!a.matches(&d));

        assert!(!Profile::new_srgb().matches(&a));
    }

    #[test]
    fn description_generation() {
        let desc =
            Profile::generate_description(&Primaries::BT709, TransferCurve::Gamma(2.2), 100);
        assert_eq!(desc, "BT.709 2.2g 100nits");
        let hdr = Profile::generate_description(&Primaries::BT2020, TransferCurve::Pq, 0);
        assert_eq!(hdr, "BT.2020 PQ");
    }

    #[test]
    fn copyright_tag() {
        let mut p = Profile::new_srgb();
        p.set_localized_text("cprt", "en", "US", "No rights reserved");
        assert_eq!(p.localized_text("cprt"), Some("No rights reserved"));
        assert_eq!(p.localized_text("desc"), None);
    }

    #[test]
    fn synthesized_profiles_are_builtin() {
        assert!(Profile::new_srgb().uses_builtin_engine());
        assert!(Profile::new_bt2020_pq(10000).uses_builtin_engine());
    }
}
