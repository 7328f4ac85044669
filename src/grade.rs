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

//! Automatic grading: pick an output peak luminance and gamma that minimize
//! quantization error of a linear float image at the destination depth.

use crate::image::BitDepth;
use crate::pixelmath::roundf;

const GAMMA_SCALE: f32 = 20.0;
const GAMMA_INT_MIN: u32 = 40; // 2.00
const GAMMA_INT_MAX: u32 = 80; // 4.00

/// Total quantization error of encoding the buffer with `gamma` at
/// `max_code` levels, after rescaling channels by `luminance_scale`.
fn gamma_error_term(gamma: f32, pixels: &[f32], max_code: f32, luminance_scale: f32) -> f32 {
    let inv_gamma = 1.0 / gamma;
    let mut error_term = 0.0f32;
    for pixel in pixels.chunks_exact(4) {
        for channel in &pixel[..3] {
            let scaled = (channel * luminance_scale).clamp(0.0, 1.0);
            let quantized = roundf(scaled.powf(inv_gamma) * max_code) / max_code;
            error_term += (scaled - quantized.powf(gamma)).abs();
        }
    }
    error_term
}

/// Grades a linear RGBA f32 buffer.
///
/// A zero `luminance` is replaced by the brightest channel value scaled to
/// the source luminance (clamped so grading never exceeds it). A zero
/// `gamma` is replaced by the exponent in {2.00, 2.05, …, 4.00} with the
/// smallest accumulated quantization error; candidate evaluation is spread
/// over `task_count` worker threads per batch.
pub fn color_grade(
    task_count: usize,
    pixels: &[f32],
    src_luminance: u32,
    dst_depth: BitDepth,
    luminance: &mut u32,
    gamma: &mut f32,
) {
    let task_count = task_count.max(1);

    if *luminance == 0 {
        // TODO: a histogram would spend the codepoints where the pixel
        // values actually are.
        let mut max_channel = 0.0f32;
        for pixel in pixels.chunks_exact(4) {
            max_channel = max_channel.max(pixel[0]).max(pixel[1]).max(pixel[2]);
        }
        let max_luminance = roundf(max_channel * src_luminance as f32) as i64;
        *luminance = max_luminance.clamp(0, src_luminance as i64) as u32;
        log::info!(target: "grading", "Found max luminance: {} nits", *luminance);
    } else {
        log::info!(target: "grading", "Using requested max luminance: {} nits", *luminance);
    }

    if *luminance == 0 {
        // Entirely black input; nothing to grade against.
        return;
    }

    if *gamma == 0.0 {
        let luminance_scale = src_luminance as f32 / *luminance as f32;
        let max_code = if dst_depth == BitDepth::Sixteen {
            65535.0
        } else {
            255.0
        };

        log::info!(target: "grading", "Using {task_count} threads to find best gamma.");

        // Best candidate starts from the first evaluated gamma so a
        // pathological NaN error can never leave it unset; ties keep the
        // earliest gamma.
        let mut best: Option<(u32, f32)> = None;
        let candidates: Vec<u32> = (GAMMA_INT_MIN..=GAMMA_INT_MAX).collect();
        for batch in candidates.chunks(task_count) {
            let evaluated: Vec<(u32, f32)> = std::thread::scope(|scope| {
                let handles: Vec<_> = batch
                    .iter()
                    .map(|&gamma_int| {
                        scope.spawn(move || {
                            let attempt = gamma_int as f32 / GAMMA_SCALE;
                            (
                                gamma_int,
                                gamma_error_term(attempt, pixels, max_code, luminance_scale),
                            )
                        })
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(|h| match h.join() {
                        Ok(v) => v,
                        Err(p) => std::panic::resume_unwind(p),
                    })
                    .collect()
            });
            for (gamma_int, error_term) in evaluated {
                log::debug!(
                    target: "grading",
                    "attempt: gamma {:.3}, err: {error_term}",
                    gamma_int as f32 / GAMMA_SCALE
                );
                match best {
                    None => best = Some((gamma_int, error_term)),
                    Some((_, best_error)) if best_error > error_term => {
                        best = Some((gamma_int, error_term))
                    }
                    _ => {}
                }
            }
        }
        if let Some((gamma_int, _)) = best {
            *gamma = gamma_int as f32 / GAMMA_SCALE;
        }
        log::info!(target: "grading", "Found best gamma: {}", *gamma);
    } else {
        log::info!(target: "grading", "Using requested gamma: {}", *gamma);
    }
}
