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
use crate::cmm::ForeignCmm;
use std::sync::Arc;

/// Default diffuse-white luminance in nits when a profile does not say.
pub const DEFAULT_LUMINANCE: u32 = 80;

/// Resize filters understood by an external resampler.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ResizeFilter {
    #[default]
    Auto,
    Box,
    Triangle,
    CatmullRom,
    Mitchell,
    Lanczos,
}

/// Opaque resampling collaborator, operating on linear RGBA f32 rasters.
pub trait Resampler: Send + Sync {
    fn resample(
        &self,
        src: &[f32],
        src_width: usize,
        src_height: usize,
        dst_width: usize,
        dst_height: usize,
        filter: ResizeFilter,
    ) -> Vec<f32>;
}

/// Ambient state threaded through every core call. There is no process-wide
/// instance; callers own their contexts.
#[derive(Clone)]
pub struct Context {
    /// Luminance assumed for profiles without a luminance tag, in nits.
    pub default_luminance: u32,
    /// Permits the closed-form engine. Turning this off forces every
    /// transform through the external backend.
    pub builtin_allowed: bool,
    /// Default worker-thread count for pixel dispatch.
    pub jobs: usize,
    pub(crate) foreign: Option<Arc<dyn ForeignCmm>>,
    pub(crate) resampler: Option<Arc<dyn Resampler>>,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            default_luminance: DEFAULT_LUMINANCE,
            builtin_allowed: true,
            jobs: std::thread::available_parallelism()
                .map(|v| v.get())
                .unwrap_or(1),
            foreign: None,
            resampler: None,
        }
    }
}

impl Context {
    pub fn new() -> Context {
        Context::default()
    }

    pub fn with_default_luminance(mut self, nits: u32) -> Context {
        self.default_luminance = nits;
        self
    }

    pub fn with_builtin_allowed(mut self, allowed: bool) -> Context {
        self.builtin_allowed = allowed;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Context {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_foreign_cmm(mut self, cmm: Arc<dyn ForeignCmm>) -> Context {
        self.foreign = Some(cmm);
        self
    }

    pub fn with_resampler(mut self, resampler: Arc<dyn Resampler>) -> Context {
        self.resampler = Some(resampler);
        self
    }

    #[inline]
    pub(crate) fn foreign_cmm(&self) -> Option<&Arc<dyn ForeignCmm>> {
        self.foreign.as_ref()
    }

    #[inline]
    pub(crate) fn resampler(&self) -> Option<&Arc<dyn Resampler>> {
        self.resampler.as_ref()
    }
}
