/*
 * Copyright (c) Radzivon Bartoshyk, 2/2025. All rights reserved.
 *
 * Redistribution and use in source and binary forms, with or without modification,
 * are permitted provided that the following conditions are met:
 *
 * 1.  Redistributions of source code must retain the above copyright notice, this
 * list of conditions and the following disclaimer.
 *
 * 2.  Redistributions in binary form must reproduce the above copyright notice,
 * this list of conditions and the following disclaimer in the documentation
 * and/or other materials provided with the distribution.
 *
 * 3.  Neither the name of the copyright holder nor the names of its
 * contributors may be used to endorse or promote products derived from
 * this software without specific prior written permission.
 *
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */

pub const MAX_PLANES: usize = 4;

/// Read-only planes of one input slice.
///
/// Plane `i` starts at the first row of the slice being converted: the
/// caller advances the source pointers when feeding a frame in stripes.
/// Strides are in bytes and may exceed the row payload.
#[derive(Debug, Default)]
pub struct SourceSlice<'a> {
    pub planes: [Option<&'a [u8]>; MAX_PLANES],
    pub strides: [usize; MAX_PLANES],
}

/// Mutable planes of the output frame.
///
/// Unlike [`SourceSlice`], destination planes always point at the frame
/// origin; conversion offsets them by the slice start internally, with
/// chroma rows scaled by the vertical subsampling of the format.
#[derive(Debug, Default)]
pub struct DestSlice<'a> {
    pub planes: [Option<&'a mut [u8]>; MAX_PLANES],
    pub strides: [usize; MAX_PLANES],
}

impl<'a> SourceSlice<'a> {
    pub fn single(plane: &'a [u8], stride: usize) -> Self {
        SourceSlice {
            planes: [Some(plane), None, None, None],
            strides: [stride, 0, 0, 0],
        }
    }

    /// The plane at `index`; the dispatcher guarantees presence for the
    /// selected path before any kernel runs.
    #[inline]
    pub fn plane(&self, index: usize) -> &'a [u8] {
        match self.planes[index] {
            Some(plane) => plane,
            None => panic!("Source plane {index} must be present here"),
        }
    }

    #[inline]
    pub fn has_plane(&self, index: usize) -> bool {
        self.planes[index].is_some()
    }
}

impl<'a> DestSlice<'a> {
    pub fn single(plane: &'a mut [u8], stride: usize) -> Self {
        DestSlice {
            planes: [Some(plane), None, None, None],
            strides: [stride, 0, 0, 0],
        }
    }

    #[inline]
    pub fn plane_mut(&mut self, index: usize) -> &mut [u8] {
        match self.planes[index].as_deref_mut() {
            Some(plane) => plane,
            None => panic!("Destination plane {index} must be present here"),
        }
    }

    #[inline]
    pub fn has_plane(&self, index: usize) -> bool {
        self.planes[index].is_some()
    }
}

/// Extent of a subsampled dimension, rounded up for odd sizes.
#[inline]
pub(crate) const fn chroma_extent(size: usize, log2: u8) -> usize {
    (size + (1usize << log2) - 1) >> log2
}

/// Rows `start..start + count` of a plane, one borrow per row.
///
/// The final row of a tightly sized plane may be shorter than the stride;
/// kernels only touch the payload prefix of each row.
#[inline]
pub(crate) fn rows(
    plane: &[u8],
    stride: usize,
    start: usize,
    count: usize,
) -> impl Iterator<Item = &[u8]> {
    plane.chunks(stride.max(1)).skip(start).take(count)
}

#[inline]
pub(crate) fn rows_mut(
    plane: &mut [u8],
    stride: usize,
    start: usize,
    count: usize,
) -> impl Iterator<Item = &mut [u8]> {
    plane.chunks_mut(stride.max(1)).skip(start).take(count)
}
