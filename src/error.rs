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
use crate::pix_fmt::PixelFormat;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MismatchedSize {
    pub expected: usize,
    pub received: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    ZeroBaseSize,
    /// No conversion path is registered for the format pair.
    UnsupportedConversion(PixelFormat, PixelFormat),
    /// The format requires plane `N` but the image did not provide it.
    MissingPlane(usize),
    MinimumStrideSize { plane: usize, size: MismatchedSize },
    MinimumPlaneSize { plane: usize, size: MismatchedSize },
    /// Strides of 16-bit storage must be even.
    UnalignedStride { plane: usize, stride: usize },
    UnalignedSliceStart { alignment: usize, slice_y: usize },
    SliceOutOfBounds { slice_y: usize, slice_height: usize, height: usize },
    /// `Pal8` and `Ya8` sources need a palette installed on the context.
    PaletteRequired,
}

impl Display for ConvertError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvertError::ZeroBaseSize => {
                f.write_str("Image size must not be zero")
            }
            ConvertError::UnsupportedConversion(src, dst) => f.write_fmt(format_args!(
                "No conversion is available from {src:?} to {dst:?}"
            )),
            ConvertError::MissingPlane(plane) => f.write_fmt(format_args!(
                "Plane {plane} is required by the pixel format but was not provided"
            )),
            ConvertError::MinimumStrideSize { plane, size } => f.write_fmt(format_args!(
                "Stride of plane {plane} must be at least {} but it is {}",
                size.expected, size.received
            )),
            ConvertError::MinimumPlaneSize { plane, size } => f.write_fmt(format_args!(
                "Plane {plane} must hold at least {} bytes but it holds {}",
                size.expected, size.received
            )),
            ConvertError::UnalignedStride { plane, stride } => f.write_fmt(format_args!(
                "Stride of 16-bit plane {plane} must be even but it is {stride}"
            )),
            ConvertError::UnalignedSliceStart { alignment, slice_y } => f.write_fmt(format_args!(
                "Slice start {slice_y} violates the required alignment of {alignment} rows"
            )),
            ConvertError::SliceOutOfBounds {
                slice_y,
                slice_height,
                height,
            } => f.write_fmt(format_args!(
                "Slice rows {slice_y}..{} exceed the image height {height}",
                slice_y + slice_height
            )),
            ConvertError::PaletteRequired => {
                f.write_str("This source format requires a palette to be set on the context")
            }
        }
    }
}

impl Error for ConvertError {}
