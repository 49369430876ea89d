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
use crate::rw::{get_u16, put_u16};
use crate::slice::{chroma_extent, rows, rows_mut, DestSlice, SourceSlice};

/// Planar 4:2:0 with 10..16 bit components to P010LE/P016LE.
///
/// Each component only moves left by the net difference between the two
/// storage layouts; no rounding or replication is involved, so the path
/// stays exactly invertible where the depths allow it.
pub(crate) struct PlanarToP01x {
    pub src_be: bool,
}

impl PlanarToP01x {
    fn net_shift(ctx: &ConvertContext) -> u32 {
        let sd = ctx.src_format.describe();
        let dd = ctx.dst_format.describe();
        (dd.depth[0] as u32 + dd.shift[0] as u32) - (sd.depth[0] as u32 + sd.shift[0] as u32)
    }
}

impl SliceConvert for PlanarToP01x {
    fn name(&self) -> &'static str {
        "planar_to_p01x"
    }

    fn slice_align(&self) -> usize {
        2
    }

    fn convert_slice(
        &self,
        ctx: &ConvertContext,
        src: &SourceSlice,
        slice_y: usize,
        slice_h: usize,
        dst: &mut DestSlice,
    ) -> usize {
        let shift = Self::net_shift(ctx);
        let cw = chroma_extent(ctx.width, 1);

        let dst_luma_stride = dst.strides[0];
        {
            let dst_y = dst.plane_mut(0);
            for (src_row, dst_row) in rows(src.plane(0), src.strides[0], 0, slice_h)
                .zip(rows_mut(dst_y, dst_luma_stride, slice_y, slice_h))
            {
                for x in 0..ctx.width {
                    let v = if self.src_be {
                        get_u16::<true>(src_row, x)
                    } else {
                        get_u16::<false>(src_row, x)
                    };
                    put_u16::<false>(dst_row, x, v << shift);
                }
            }
        }

        let cy = chroma_extent(slice_y, 1);
        let ch = chroma_extent(slice_h, 1);
        let uv_stride = dst.strides[1];
        let dst_uv = dst.plane_mut(1);
        for ((u_row, v_row), uv_row) in rows(src.plane(1), src.strides[1], 0, ch)
            .zip(rows(src.plane(2), src.strides[2], 0, ch))
            .zip(rows_mut(dst_uv, uv_stride, cy, ch))
        {
            for x in 0..cw {
                let (u, v) = if self.src_be {
                    (get_u16::<true>(u_row, x), get_u16::<true>(v_row, x))
                } else {
                    (get_u16::<false>(u_row, x), get_u16::<false>(v_row, x))
                };
                put_u16::<false>(uv_row, 2 * x, u << shift);
                put_u16::<false>(uv_row, 2 * x + 1, v << shift);
            }
        }
        slice_h
    }
}

/// 8-bit planar 4:2:0 straight into the high byte of P010LE words.
pub(crate) struct Planar8ToP010;

impl SliceConvert for Planar8ToP010 {
    fn name(&self) -> &'static str {
        "planar8_to_p010le"
    }

    fn slice_align(&self) -> usize {
        2
    }

    fn convert_slice(
        &self,
        ctx: &ConvertContext,
        src: &SourceSlice,
        slice_y: usize,
        slice_h: usize,
        dst: &mut DestSlice,
    ) -> usize {
        let cw = chroma_extent(ctx.width, 1);

        let dst_luma_stride = dst.strides[0];
        {
            let dst_y = dst.plane_mut(0);
            for (src_row, dst_row) in rows(src.plane(0), src.strides[0], 0, slice_h)
                .zip(rows_mut(dst_y, dst_luma_stride, slice_y, slice_h))
            {
                for x in 0..ctx.width {
                    put_u16::<false>(dst_row, x, (src_row[x] as u16) << 8);
                }
            }
        }

        let cy = chroma_extent(slice_y, 1);
        let ch = chroma_extent(slice_h, 1);
        let uv_stride = dst.strides[1];
        let dst_uv = dst.plane_mut(1);
        for ((u_row, v_row), uv_row) in rows(src.plane(1), src.strides[1], 0, ch)
            .zip(rows(src.plane(2), src.strides[2], 0, ch))
            .zip(rows_mut(dst_uv, uv_stride, cy, ch))
        {
            for x in 0..cw {
                put_u16::<false>(uv_row, 2 * x, (u_row[x] as u16) << 8);
                put_u16::<false>(uv_row, 2 * x + 1, (v_row[x] as u16) << 8);
            }
        }
        slice_h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pix_fmt::PixelFormat;

    #[test]
    fn yuv420p10_to_p010_shifts_into_high_bits() {
        let ctx =
            ConvertContext::new(PixelFormat::Yuv420P10Le, PixelFormat::P010Le, 2, 2).unwrap();
        let mut y = vec![0u8; 8];
        put_u16::<false>(&mut y, 0, 64);
        put_u16::<false>(&mut y, 1, 940);
        put_u16::<false>(&mut y, 2, 512);
        put_u16::<false>(&mut y, 3, 1023);
        let mut u = vec![0u8; 2];
        put_u16::<false>(&mut u, 0, 512);
        let mut v = vec![0u8; 2];
        put_u16::<false>(&mut v, 0, 300);
        let mut dy = vec![0u8; 8];
        let mut duv = vec![0u8; 4];
        let src = SourceSlice {
            planes: [Some(&y), Some(&u), Some(&v), None],
            strides: [4, 2, 2, 0],
        };
        let mut dst = DestSlice {
            planes: [Some(&mut dy), Some(&mut duv), None, None],
            strides: [4, 4, 0, 0],
        };
        PlanarToP01x { src_be: false }.convert_slice(&ctx, &src, 0, 2, &mut dst);
        assert_eq!(get_u16::<false>(&dy, 0), 64 << 6);
        assert_eq!(get_u16::<false>(&dy, 3), 1023 << 6);
        assert_eq!(get_u16::<false>(&duv, 0), 512 << 6);
        assert_eq!(get_u16::<false>(&duv, 1), 300 << 6);
    }

    #[test]
    fn yuv420p16_to_p016_is_a_straight_copy() {
        let ctx =
            ConvertContext::new(PixelFormat::Yuv420P16Be, PixelFormat::P016Le, 2, 2).unwrap();
        let mut y = vec![0u8; 8];
        for (i, val) in [0x1234u16, 0xFFFF, 1, 0x8000].iter().enumerate() {
            put_u16::<true>(&mut y, i, *val);
        }
        let mut u = vec![0u8; 2];
        put_u16::<true>(&mut u, 0, 0xCAFE);
        let mut v = vec![0u8; 2];
        put_u16::<true>(&mut v, 0, 0xBEEF);
        let mut dy = vec![0u8; 8];
        let mut duv = vec![0u8; 4];
        let src = SourceSlice {
            planes: [Some(&y), Some(&u), Some(&v), None],
            strides: [4, 2, 2, 0],
        };
        let mut dst = DestSlice {
            planes: [Some(&mut dy), Some(&mut duv), None, None],
            strides: [4, 4, 0, 0],
        };
        PlanarToP01x { src_be: true }.convert_slice(&ctx, &src, 0, 2, &mut dst);
        assert_eq!(get_u16::<false>(&dy, 0), 0x1234);
        assert_eq!(get_u16::<false>(&dy, 1), 0xFFFF);
        assert_eq!(get_u16::<false>(&duv, 0), 0xCAFE);
        assert_eq!(get_u16::<false>(&duv, 1), 0xBEEF);
    }

    #[test]
    fn planar8_widens_by_the_byte() {
        let ctx = ConvertContext::new(PixelFormat::Yuv420, PixelFormat::P010Le, 2, 2).unwrap();
        let y = vec![16u8, 235, 0, 255];
        let u = vec![128u8];
        let v = vec![64u8];
        let mut dy = vec![0u8; 8];
        let mut duv = vec![0u8; 4];
        let src = SourceSlice {
            planes: [Some(&y), Some(&u), Some(&v), None],
            strides: [2, 1, 1, 0],
        };
        let mut dst = DestSlice {
            planes: [Some(&mut dy), Some(&mut duv), None, None],
            strides: [4, 4, 0, 0],
        };
        Planar8ToP010.convert_slice(&ctx, &src, 0, 2, &mut dst);
        assert_eq!(get_u16::<false>(&dy, 0), 16 << 8);
        assert_eq!(get_u16::<false>(&dy, 3), 255 << 8);
        assert_eq!(get_u16::<false>(&duv, 0), 128 << 8);
        assert_eq!(get_u16::<false>(&duv, 1), 64 << 8);
    }
}
