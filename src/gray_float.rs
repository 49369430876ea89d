/*
 * Copyright (c) Radzivon Bartoshyk, 4/2025. All rights reserved.
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
use crate::slice::{rows, rows_mut, DestSlice, SourceSlice};
use num_traits::AsPrimitive;

/// 8-bit gray to normalized 32-bit float gray.
///
/// All 256 quotients are precomputed once at construction; conversion is
/// then a plain table lookup per pixel.
pub(crate) struct GrayToFloat {
    pub dst_be: bool,
    table: [f32; 256],
}

impl GrayToFloat {
    pub fn new(dst_be: bool) -> Self {
        let mut table = [0f32; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = i as f32 / 255.0;
        }
        Self { dst_be, table }
    }
}

impl SliceConvert for GrayToFloat {
    fn name(&self) -> &'static str {
        "gray8_to_grayf32"
    }

    fn convert_slice(
        &self,
        ctx: &ConvertContext,
        src: &SourceSlice,
        slice_y: usize,
        slice_h: usize,
        dst: &mut DestSlice,
    ) -> usize {
        let src_stride = src.strides[0];
        let dst_stride = dst.strides[0];
        let src_plane = src.plane(0);
        let dst_plane = dst.plane_mut(0);
        for (src_row, dst_row) in rows(src_plane, src_stride, 0, slice_h)
            .zip(rows_mut(dst_plane, dst_stride, slice_y, slice_h))
        {
            for (s, d) in src_row
                .iter()
                .zip(dst_row.chunks_exact_mut(4))
                .take(ctx.width)
            {
                let f = self.table[*s as usize];
                if self.dst_be {
                    crate::rw::store_f32::<true>(d, f);
                } else {
                    crate::rw::store_f32::<false>(d, f);
                }
            }
        }
        slice_h
    }
}

/// Normalized float gray back to 8-bit, with clamping to `[0, 1]`.
pub(crate) struct FloatToGray {
    pub src_be: bool,
}

impl SliceConvert for FloatToGray {
    fn name(&self) -> &'static str {
        "grayf32_to_gray8"
    }

    fn convert_slice(
        &self,
        ctx: &ConvertContext,
        src: &SourceSlice,
        slice_y: usize,
        slice_h: usize,
        dst: &mut DestSlice,
    ) -> usize {
        let src_stride = src.strides[0];
        let dst_stride = dst.strides[0];
        let src_plane = src.plane(0);
        let dst_plane = dst.plane_mut(0);
        for (src_row, dst_row) in rows(src_plane, src_stride, 0, slice_h)
            .zip(rows_mut(dst_plane, dst_stride, slice_y, slice_h))
        {
            for (s, d) in src_row
                .chunks_exact(4)
                .zip(dst_row.iter_mut())
                .take(ctx.width)
            {
                let f = if self.src_be {
                    crate::rw::load_f32::<true>(s)
                } else {
                    crate::rw::load_f32::<false>(s)
                };
                *d = (f.clamp(0.0, 1.0) * 255.0).round().as_();
            }
        }
        slice_h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pix_fmt::PixelFormat;
    use crate::rw::{load_f32, store_f32};

    #[test]
    fn gray8_endpoints_map_to_unit_range() {
        let ctx =
            ConvertContext::new(PixelFormat::Gray8, PixelFormat::GrayF32Le, 3, 1).unwrap();
        let input = [0u8, 128, 255];
        let mut out = vec![0u8; 12];
        let src = SourceSlice::single(&input, 3);
        let mut dst = DestSlice::single(&mut out, 12);
        GrayToFloat::new(false).convert_slice(&ctx, &src, 0, 1, &mut dst);
        assert_eq!(load_f32::<false>(&out[0..4]), 0.0);
        assert_eq!(load_f32::<false>(&out[8..12]), 1.0);
        assert!((load_f32::<false>(&out[4..8]) - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn float_to_gray_clamps_out_of_range() {
        let ctx =
            ConvertContext::new(PixelFormat::GrayF32Le, PixelFormat::Gray8, 4, 1).unwrap();
        let mut input = vec![0u8; 16];
        store_f32::<false>(&mut input[0..4], -0.5);
        store_f32::<false>(&mut input[4..8], 0.5);
        store_f32::<false>(&mut input[8..12], 1.0);
        store_f32::<false>(&mut input[12..16], 2.0);
        let mut out = vec![0u8; 4];
        let src = SourceSlice::single(&input, 16);
        let mut dst = DestSlice::single(&mut out, 4);
        FloatToGray { src_be: false }.convert_slice(&ctx, &src, 0, 1, &mut dst);
        assert_eq!(out, vec![0, 128, 255, 255]);
    }

    #[test]
    fn roundtrip_through_float_is_exact() {
        let ctx =
            ConvertContext::new(PixelFormat::Gray8, PixelFormat::GrayF32Be, 256, 1).unwrap();
        let input: Vec<u8> = (0..=255).collect();
        let mut mid = vec![0u8; 1024];
        let src = SourceSlice::single(&input, 256);
        let mut dst = DestSlice::single(&mut mid, 1024);
        GrayToFloat::new(true).convert_slice(&ctx, &src, 0, 1, &mut dst);

        let ctx2 =
            ConvertContext::new(PixelFormat::GrayF32Be, PixelFormat::Gray8, 256, 1).unwrap();
        let mut out = vec![0u8; 256];
        let src2 = SourceSlice::single(&mid, 1024);
        let mut dst2 = DestSlice::single(&mut out, 256);
        FloatToGray { src_be: true }.convert_slice(&ctx2, &src2, 0, 1, &mut dst2);
        assert_eq!(out, input);
    }
}
