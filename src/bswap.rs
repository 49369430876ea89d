/*
 * Copyright (c) Radzivon Bartoshyk, 3/2025. All rights reserved.
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
use crate::context::ConvertContext;
use crate::dispatch::SliceConvert;
use crate::slice::{chroma_extent, rows, rows_mut, DestSlice, SourceSlice};

fn swap_pairs_row(src_row: &[u8], dst_row: &mut [u8], elements: usize, elem_bytes: usize) {
    for (s, d) in src_row
        .chunks_exact(elem_bytes)
        .zip(dst_row.chunks_exact_mut(elem_bytes))
        .take(elements)
    {
        for (i, b) in s.iter().rev().enumerate() {
            d[i] = *b;
        }
    }
}

/// Byte order flip between a format and its opposite-endian twin.
///
/// Works on every plane the destination carries; pixel values are
/// untouched, only the storage order of each component changes. Both
/// directions run the same kernel since the swap is an involution.
pub(crate) struct EndianSwap {
    pub elem_bytes: usize,
}

impl SliceConvert for EndianSwap {
    fn name(&self) -> &'static str {
        "endian_swap"
    }

    fn convert_slice(
        &self,
        ctx: &ConvertContext,
        src: &SourceSlice,
        slice_y: usize,
        slice_h: usize,
        dst: &mut DestSlice,
    ) -> usize {
        let dd = ctx.dst_format.describe();
        let packed = ctx.dst_format.packed_rgb_layout();

        for plane in 0..crate::slice::MAX_PLANES {
            if !dst.has_plane(plane) {
                break;
            }
            let chroma = (plane == 1 || plane == 2) && dd.planar;
            let (elements, y, height) = if chroma {
                (
                    chroma_extent(ctx.width, dd.log2_chroma_w),
                    chroma_extent(slice_y, dd.log2_chroma_h),
                    chroma_extent(slice_h, dd.log2_chroma_h),
                )
            } else {
                let per_pixel = match packed {
                    Some(l) => l.step,
                    None => 1,
                };
                (ctx.width * per_pixel, slice_y, slice_h)
            };
            let src_stride = src.strides[plane];
            let dst_stride = dst.strides[plane];
            let src_plane = src.plane(plane);
            let dst_plane = dst.plane_mut(plane);
            for (src_row, dst_row) in rows(src_plane, src_stride, 0, height)
                .zip(rows_mut(dst_plane, dst_stride, y, height))
            {
                swap_pairs_row(src_row, dst_row, elements, self.elem_bytes);
            }
        }
        slice_h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pix_fmt::PixelFormat;
    use crate::rw::{get_u16, put_u16};

    #[test]
    fn rgb48_flips_every_component() {
        let ctx =
            ConvertContext::new(PixelFormat::Rgb48Le, PixelFormat::Rgb48Be, 2, 1).unwrap();
        let mut input = vec![0u8; 12];
        for (i, v) in [0x0102u16, 0x0304, 0x0506, 0x0708, 0x090A, 0x0B0C]
            .iter()
            .enumerate()
        {
            put_u16::<false>(&mut input, i, *v);
        }
        let mut out = vec![0u8; 12];
        let src = SourceSlice::single(&input, 12);
        let mut dst = DestSlice::single(&mut out, 12);
        EndianSwap { elem_bytes: 2 }.convert_slice(&ctx, &src, 0, 1, &mut dst);
        for i in 0..6 {
            assert_eq!(get_u16::<true>(&out, i), get_u16::<false>(&input, i));
        }
    }

    #[test]
    fn planar_yuv_chroma_planes_swap_at_chroma_extent() {
        let ctx = ConvertContext::new(
            PixelFormat::Yuv420P10Le,
            PixelFormat::Yuv420P10Be,
            2,
            2,
        )
        .unwrap();
        let mut y = vec![0u8; 8];
        for i in 0..4 {
            put_u16::<false>(&mut y, i, 0x0123 + i as u16);
        }
        let mut u = vec![0u8; 2];
        put_u16::<false>(&mut u, 0, 0x0200);
        let mut v = vec![0u8; 2];
        put_u16::<false>(&mut v, 0, 0x0100);
        let mut dy = vec![0u8; 8];
        let mut du = vec![0u8; 2];
        let mut dv = vec![0u8; 2];
        let src = SourceSlice {
            planes: [Some(&y), Some(&u), Some(&v), None],
            strides: [4, 2, 2, 0],
        };
        let mut dst = DestSlice {
            planes: [Some(&mut dy), Some(&mut du), Some(&mut dv), None],
            strides: [4, 2, 2, 0],
        };
        EndianSwap { elem_bytes: 2 }.convert_slice(&ctx, &src, 0, 2, &mut dst);
        assert_eq!(get_u16::<true>(&dy, 0), 0x0123);
        assert_eq!(get_u16::<true>(&du, 0), 0x0200);
        assert_eq!(get_u16::<true>(&dv, 0), 0x0100);
    }

    #[test]
    fn float_gray_swaps_whole_words() {
        let ctx =
            ConvertContext::new(PixelFormat::GrayF32Le, PixelFormat::GrayF32Be, 1, 1).unwrap();
        let input = 1.5f32.to_le_bytes().to_vec();
        let mut out = vec![0u8; 4];
        let src = SourceSlice::single(&input, 4);
        let mut dst = DestSlice::single(&mut out, 4);
        EndianSwap { elem_bytes: 4 }.convert_slice(&ctx, &src, 0, 1, &mut dst);
        assert_eq!(f32::from_be_bytes([out[0], out[1], out[2], out[3]]), 1.5);
    }
}
