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
use crate::CmsError;
use crate::profile::Profile;

/// Bit depth of a sample. `Float` means IEEE-754 f32 channels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BitDepth {
    Eight,
    Sixteen,
    Float,
}

impl BitDepth {
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
            BitDepth::Float => 32,
        }
    }

    #[inline]
    pub const fn from_bits(bits: u32) -> Option<BitDepth> {
        match bits {
            8 => Some(BitDepth::Eight),
            16 => Some(BitDepth::Sixteen),
            32 => Some(BitDepth::Float),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, BitDepth::Float)
    }

    /// Largest code value at integer depths.
    #[inline]
    pub const fn max_code(self) -> u32 {
        match self {
            BitDepth::Eight => 255,
            BitDepth::Sixteen => 65535,
            BitDepth::Float => 1,
        }
    }
}

/// Owned pixel storage. The variant carries the sample width.
#[derive(Clone, Debug)]
pub enum PixelData {
    U8(Vec<u8>),
    U16(Vec<u16>),
    F32(Vec<f32>),
}

impl PixelData {
    pub fn zeroed(depth: BitDepth, samples: usize) -> PixelData {
        match depth {
            BitDepth::Eight => PixelData::U8(vec![0; samples]),
            BitDepth::Sixteen => PixelData::U16(vec![0; samples]),
            BitDepth::Float => PixelData::F32(vec![0.; samples]),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match self {
            PixelData::U8(v) => v.len(),
            PixelData::U16(v) => v.len(),
            PixelData::F32(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn depth(&self) -> BitDepth {
        match self {
            PixelData::U8(_) => BitDepth::Eight,
            PixelData::U16(_) => BitDepth::Sixteen,
            PixelData::F32(_) => BitDepth::Float,
        }
    }

    #[inline]
    pub fn as_slice(&self) -> PixelSlice<'_> {
        match self {
            PixelData::U8(v) => PixelSlice::U8(v),
            PixelData::U16(v) => PixelSlice::U16(v),
            PixelData::F32(v) => PixelSlice::F32(v),
        }
    }

    #[inline]
    pub fn as_slice_mut(&mut self) -> PixelSliceMut<'_> {
        match self {
            PixelData::U8(v) => PixelSliceMut::U8(v),
            PixelData::U16(v) => PixelSliceMut::U16(v),
            PixelData::F32(v) => PixelSliceMut::F32(v),
        }
    }
}

/// Borrowed view over a pixel lane.
#[derive(Copy, Clone, Debug)]
pub enum PixelSlice<'a> {
    U8(&'a [u8]),
    U16(&'a [u16]),
    F32(&'a [f32]),
}

impl<'a> PixelSlice<'a> {
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            PixelSlice::U8(v) => v.len(),
            PixelSlice::U16(v) => v.len(),
            PixelSlice::F32(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn depth(&self) -> BitDepth {
        match self {
            PixelSlice::U8(_) => BitDepth::Eight,
            PixelSlice::U16(_) => BitDepth::Sixteen,
            PixelSlice::F32(_) => BitDepth::Float,
        }
    }

    #[inline]
    pub fn split_at(self, mid: usize) -> (PixelSlice<'a>, PixelSlice<'a>) {
        match self {
            PixelSlice::U8(v) => {
                let (a, b) = v.split_at(mid);
                (PixelSlice::U8(a), PixelSlice::U8(b))
            }
            PixelSlice::U16(v) => {
                let (a, b) = v.split_at(mid);
                (PixelSlice::U16(a), PixelSlice::U16(b))
            }
            PixelSlice::F32(v) => {
                let (a, b) = v.split_at(mid);
                (PixelSlice::F32(a), PixelSlice::F32(b))
            }
        }
    }
}

/// Exclusive view over a pixel lane.
#[derive(Debug)]
pub enum PixelSliceMut<'a> {
    U8(&'a mut [u8]),
    U16(&'a mut [u16]),
    F32(&'a mut [f32]),
}

impl<'a> PixelSliceMut<'a> {
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            PixelSliceMut::U8(v) => v.len(),
            PixelSliceMut::U16(v) => v.len(),
            PixelSliceMut::F32(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn depth(&self) -> BitDepth {
        match self {
            PixelSliceMut::U8(_) => BitDepth::Eight,
            PixelSliceMut::U16(_) => BitDepth::Sixteen,
            PixelSliceMut::F32(_) => BitDepth::Float,
        }
    }

    #[inline]
    pub fn reborrow(&mut self) -> PixelSliceMut<'_> {
        match self {
            PixelSliceMut::U8(v) => PixelSliceMut::U8(v),
            PixelSliceMut::U16(v) => PixelSliceMut::U16(v),
            PixelSliceMut::F32(v) => PixelSliceMut::F32(v),
        }
    }

    #[inline]
    pub fn split_at_mut(self, mid: usize) -> (PixelSliceMut<'a>, PixelSliceMut<'a>) {
        match self {
            PixelSliceMut::U8(v) => {
                let (a, b) = v.split_at_mut(mid);
                (PixelSliceMut::U8(a), PixelSliceMut::U8(b))
            }
            PixelSliceMut::U16(v) => {
                let (a, b) = v.split_at_mut(mid);
                (PixelSliceMut::U16(a), PixelSliceMut::U16(b))
            }
            PixelSliceMut::F32(v) => {
                let (a, b) = v.split_at_mut(mid);
                (PixelSliceMut::F32(a), PixelSliceMut::F32(b))
            }
        }
    }
}

/// An RGBA raster with an attached color profile.
#[derive(Clone, Debug)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub depth: BitDepth,
    pub pixels: PixelData,
    pub profile: Profile,
}

impl Image {
    /// Samples per pixel. Images are always interleaved RGBA.
    pub const CHANNELS: usize = 4;

    /// Allocates a zeroed image.
    pub fn new(width: u32, height: u32, depth: BitDepth, profile: Profile) -> Image {
        let samples = width as usize * height as usize * Self::CHANNELS;
        Image {
            width,
            height,
            depth,
            pixels: PixelData::zeroed(depth, samples),
            profile,
        }
    }

    /// Wraps existing storage, enforcing `len == width·height·4` and a
    /// storage variant that matches the depth.
    pub fn from_parts(
        width: u32,
        height: u32,
        depth: BitDepth,
        pixels: PixelData,
        profile: Profile,
    ) -> Result<Image, CmsError> {
        if pixels.depth() != depth {
            return Err(CmsError::MismatchedDepth);
        }
        if pixels.len() != width as usize * height as usize * Self::CHANNELS {
            return Err(CmsError::LaneSizeMismatch);
        }
        Ok(Image {
            width,
            height,
            depth,
            pixels,
            profile,
        })
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
