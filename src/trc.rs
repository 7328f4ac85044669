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

//! Tone reproduction curves.
//!
//! Every curve here is parametric, so the built-in engine can evaluate both
//! directions in closed form. HLG carries its OOTF folded in; the exponent
//! depends on the peak display luminance, which is why the HLG pair takes a
//! `peak` argument while the others do not.

/// Tone curve of a profile.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TransferCurve {
    /// Plain power curve, `γ > 0`.
    Gamma(f32),
    /// IEC 61966-2-1 piecewise sRGB curve.
    Srgb,
    /// Rec. ITU-R BT.2100 hybrid log-gamma, OOTF included.
    Hlg,
    /// SMPTE ST.2084 perceptual quantizer.
    Pq,
}

impl TransferCurve {
    /// A power-gamma estimate of this curve, used when a destination
    /// profile has to be synthesized from it. HDR curves have no meaningful
    /// single exponent and report 0.
    #[inline]
    pub const fn estimated_gamma(self) -> f32 {
        match self {
            TransferCurve::Gamma(g) => g,
            TransferCurve::Srgb => 2.2,
            TransferCurve::Hlg | TransferCurve::Pq => 0.0,
        }
    }

    /// Scale of the curve's nominal 1.0 in linear-light units relative to
    /// the profile luminance. PQ is an absolute encoding whose full code
    /// value always means 10 000 nits.
    #[inline]
    pub fn implicit_scale(self, luminance: f32) -> f32 {
        match self {
            TransferCurve::Pq => 10000.0 / luminance,
            _ => 1.0,
        }
    }
}

// SMPTE ST.2084: https://ieeexplore.ieee.org/servlet/opac?punumber=7291450

const PQ_C1: f32 = 3424.0 / 4096.0;
const PQ_C2: f32 = 2413.0 / 4096.0 * 32.0;
const PQ_C3: f32 = 2392.0 / 4096.0 * 32.0;
const PQ_M1: f32 = 2610.0 / 16384.0;
const PQ_M2: f32 = 2523.0 / 4096.0 * 128.0;

/// SMPTE ST.2084 Equation 4.1,
/// `L = ((max(N^(1/m2) - c1, 0)) / (c2 - c3*N^(1/m2)))^(1/m1)`.
#[inline]
pub fn pq_eotf(n: f32) -> f32 {
    let n1m2 = n.powf(1. / PQ_M2);
    let n1m2c1 = (n1m2 - PQ_C1).max(0.0);
    let c2c3n1m2 = PQ_C2 - PQ_C3 * n1m2;
    (n1m2c1 / c2c3n1m2).powf(1. / PQ_M1)
}

/// SMPTE ST.2084 Equation 5.2,
/// `N = ((c1 + c2*L^m1) / (1 + c3*L^m1))^m2`.
#[inline]
pub fn pq_oetf(l: f32) -> f32 {
    let lm1 = l.powf(PQ_M1);
    ((PQ_C1 + PQ_C2 * lm1) / (1. + PQ_C3 * lm1)).powf(PQ_M2)
}

const HLG_A: f32 = 0.17883277;
const HLG_B: f32 = 0.28466892; // 1 - 4a
const HLG_C: f32 = 0.55991072953; // 0.5 - a*ln(4a)
const HLG_ONE_TWELFTH: f32 = 1.0 / 12.0;

#[inline]
fn hlg_ootf_exponent(peak_luminance: f32) -> f32 {
    1.2 + 0.42 * (peak_luminance / 1000.0).log10()
}

/// BT.2100 HLG decode with the display OOTF folded in.
#[inline]
pub fn hlg_eotf(n: f32, peak_luminance: f32) -> f32 {
    let l = if n < 0.5 {
        (n * n) / 3.0
    } else {
        (((n - HLG_C) / HLG_A).exp() + HLG_B) / 12.0
    };
    l.powf(hlg_ootf_exponent(peak_luminance))
}

/// BT.2100 HLG encode with the inverse display OOTF folded in.
#[inline]
pub fn hlg_oetf(l: f32, peak_luminance: f32) -> f32 {
    let n = l.powf(1.0 / hlg_ootf_exponent(peak_luminance));
    if n <= HLG_ONE_TWELFTH {
        (3.0 * n).sqrt()
    } else {
        HLG_A * (12.0 * n - HLG_B).ln() + HLG_C
    }
}

/// Display light of the HLG reference ("diffuse") white, signal 0.75, on a
/// display with the given peak luminance in nits.
#[inline]
pub fn hlg_diffuse_white(peak_white: f32) -> f32 {
    let base = (((0.75 - HLG_C) / HLG_A).exp() + HLG_B) / 12.0;
    peak_white * base.powf(hlg_ootf_exponent(peak_white))
}

/// Finds the next integral HLG peak white for a goal diffuse white, by
/// binary search on [1, 100000] nits.
pub fn hlg_peak_for_diffuse_white(diffuse_white: u32) -> u32 {
    let goal = diffuse_white as f32;
    let mut l: u32 = 1;
    let mut r: u32 = 100_000;
    while l < r {
        let m = (l + r) >> 1;
        let attempt = hlg_diffuse_white(m as f32);
        if attempt <= goal {
            l = m + 1;
        } else {
            r = m;
        }
    }
    l
}

/// Inverse companion: the diffuse white produced by an HLG display of the
/// given peak luminance, rounded to whole nits.
pub fn default_luminance_from_hlg(hlg_luminance: u32) -> u32 {
    crate::pixelmath::roundf(hlg_diffuse_white(hlg_luminance as f32)) as u32
}

// IEC 61966-2-1. Same parametric constants the sRGB table builder uses:
// y = ((x + 0.055)/1.055)^2.4 above the linear toe, y = x/12.92 below it.

#[inline]
pub fn srgb_eotf(x: f32) -> f32 {
    if x < 0.04045 {
        x / 12.92
    } else {
        ((x + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
pub fn srgb_oetf(x: f32) -> f32 {
    if x <= 0.0031308 {
        x * 12.92
    } else {
        1.055 * x.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pq_roundtrip() {
        let mut x = 0.05f32;
        while x <= 0.95 {
            let n = pq_oetf(pq_eotf(x));
            assert!((n - x).abs() < 1e-3, "pq roundtrip at {x}: {n}");
            let l = pq_eotf(pq_oetf(x));
            assert!((l - x).abs() < 1e-3, "pq inverse roundtrip at {x}: {l}");
            x += 0.05;
        }
    }

    #[test]
    fn pq_anchors() {
        // Signal 1.0 is 10 000 nits, i.e. full scale linear.
        assert!((pq_eotf(1.0) - 1.0).abs() < 1e-4);
        assert!((pq_oetf(1.0) - 1.0).abs() < 1e-4);
        assert_eq!(pq_eotf(0.0), 0.0);
    }

    #[test]
    fn hlg_roundtrip() {
        let peak = 1000.0;
        let mut x = 0.05f32;
        while x <= 0.95 {
            let n = hlg_oetf(hlg_eotf(x, peak), peak);
            assert!((n - x).abs() < 1e-3, "hlg roundtrip at {x}: {n}");
            x += 0.05;
        }
    }

    #[test]
    fn srgb_roundtrip() {
        let mut x = 0.0f32;
        while x <= 1.0 {
            let n = srgb_oetf(srgb_eotf(x));
            assert!((n - x).abs() < 1e-4, "srgb roundtrip at {x}: {n}");
            x += 0.01;
        }
    }

    #[test]
    fn gamma_roundtrip() {
        let gamma = 2.2f32;
        let mut x = 0.0f32;
        while x <= 1.0 {
            let n = x.powf(gamma).powf(1.0 / gamma);
            assert!((n - x).abs() < 1e-4);
            x += 0.01;
        }
    }

    #[test]
    fn hlg_peak_monotonic() {
        let mut last = 0;
        for diffuse in [1u32, 10, 80, 100, 203, 400, 1000, 4000] {
            let peak = hlg_peak_for_diffuse_white(diffuse);
            assert!(peak >= last, "peak went down at diffuse {diffuse}");
            last = peak;
        }
    }

    #[test]
    fn hlg_peak_brackets_diffuse_white() {
        for diffuse in [10u32, 80, 100, 203, 1000] {
            let peak = hlg_peak_for_diffuse_white(diffuse);
            assert!(
                hlg_diffuse_white(peak as f32) >= diffuse as f32,
                "peak {peak} too dim for diffuse {diffuse}"
            );
            assert!(
                hlg_diffuse_white((peak - 1) as f32) < diffuse as f32,
                "peak {peak} not minimal for diffuse {diffuse}"
            );
        }
    }

    #[test]
    fn hlg_default_luminance_inverts_peak() {
        let peak = hlg_peak_for_diffuse_white(80);
        let diffuse = default_luminance_from_hlg(peak);
        assert!(diffuse >= 80 && diffuse <= 82, "{diffuse}");
    }

    #[test]
    fn pq_implicit_scale() {
        assert_eq!(TransferCurve::Pq.implicit_scale(10000.0), 1.0);
        assert_eq!(TransferCurve::Pq.implicit_scale(100.0), 100.0);
        assert_eq!(TransferCurve::Gamma(2.2).implicit_scale(100.0), 1.0);
        assert_eq!(TransferCurve::Hlg.implicit_scale(1000.0), 1.0);
    }
}
