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
use crate::copy::{copy_plane_rows, fill_plane};
use crate::dispatch::SliceConvert;
use crate::slice::{chroma_extent, rows, rows_mut, DestSlice, SourceSlice};

/// Order of the interleaved chroma samples in a semi-planar plane.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum YuvNVOrder {
    UV = 0,
    VU = 1,
}

impl YuvNVOrder {
    #[inline]
    const fn u_offset(self) -> usize {
        match self {
            YuvNVOrder::UV => 0,
            YuvNVOrder::VU => 1,
        }
    }

    #[inline]
    const fn v_offset(self) -> usize {
        match self {
            YuvNVOrder::UV => 1,
            YuvNVOrder::VU => 0,
        }
    }
}

fn interleave_rows(
    u_src: &[u8],
    u_stride: usize,
    v_src: &[u8],
    v_stride: usize,
    uv_dst: &mut [u8],
    uv_stride: usize,
    uv_y: usize,
    order: YuvNVOrder,
    width: usize,
    height: usize,
) {
    let uo = order.u_offset();
    let vo = order.v_offset();
    for ((u_row, v_row), uv_row) in rows(u_src, u_stride, 0, height)
        .zip(rows(v_src, v_stride, 0, height))
        .zip(rows_mut(uv_dst, uv_stride, uv_y, height))
    {
        for (j, pair) in uv_row[..width * 2].chunks_exact_mut(2).enumerate() {
            pair[uo] = u_row[j];
            pair[vo] = v_row[j];
        }
    }
}

fn deinterleave_rows(
    uv_src: &[u8],
    uv_stride: usize,
    u_dst: &mut [u8],
    u_stride: usize,
    v_dst: &mut [u8],
    v_stride: usize,
    uv_y: usize,
    order: YuvNVOrder,
    width: usize,
    height: usize,
) {
    let uo = order.u_offset();
    let vo = order.v_offset();
    for ((uv_row, u_row), v_row) in rows(uv_src, uv_stride, 0, height)
        .zip(rows_mut(u_dst, u_stride, uv_y, height))
        .zip(rows_mut(v_dst, v_stride, uv_y, height))
    {
        for (j, pair) in uv_row[..width * 2].chunks_exact(2).enumerate() {
            u_row[j] = pair[uo];
            v_row[j] = pair[vo];
        }
    }
}

/// Planar 8-bit YUV to a semi-planar layout of the same subsampling.
pub(crate) struct PlanarToNv {
    pub order: YuvNVOrder,
    /// 4:2:0 chroma when unset, full resolution chroma (NV24/NV42) when set.
    pub full_chroma: bool,
}

impl SliceConvert for PlanarToNv {
    fn name(&self) -> &'static str {
        "planar_to_nv"
    }

    fn slice_align(&self) -> usize {
        if self.full_chroma {
            1
        } else {
            2
        }
    }

    fn convert_slice(
        &self,
        ctx: &ConvertContext,
        src: &SourceSlice,
        slice_y: usize,
        slice_h: usize,
        dst: &mut DestSlice,
    ) -> usize {
        let dst_luma_stride = dst.strides[0];
        copy_plane_rows(
            src.plane(0),
            src.strides[0],
            dst.plane_mut(0),
            dst_luma_stride,
            slice_y,
            ctx.width,
            slice_h,
        );
        let (cw, cy, ch) = if self.full_chroma {
            (ctx.width, slice_y, slice_h)
        } else {
            (
                chroma_extent(ctx.width, 1),
                chroma_extent(slice_y, 1),
                chroma_extent(slice_h, 1),
            )
        };
        let uv_stride = dst.strides[1];
        interleave_rows(
            src.plane(1),
            src.strides[1],
            src.plane(2),
            src.strides[2],
            dst.plane_mut(1),
            uv_stride,
            cy,
            self.order,
            cw,
            ch,
        );
        slice_h
    }
}

/// Semi-planar to planar 8-bit YUV of the same subsampling.
pub(crate) struct NvToPlanar {
    pub order: YuvNVOrder,
    pub full_chroma: bool,
}

impl SliceConvert for NvToPlanar {
    fn name(&self) -> &'static str {
        "nv_to_planar"
    }

    fn slice_align(&self) -> usize {
        if self.full_chroma {
            1
        } else {
            2
        }
    }

    fn convert_slice(
        &self,
        ctx: &ConvertContext,
        src: &SourceSlice,
        slice_y: usize,
        slice_h: usize,
        dst: &mut DestSlice,
    ) -> usize {
        let dst_luma_stride = dst.strides[0];
        copy_plane_rows(
            src.plane(0),
            src.strides[0],
            dst.plane_mut(0),
            dst_luma_stride,
            slice_y,
            ctx.width,
            slice_h,
        );
        let (cw, cy, ch) = if self.full_chroma {
            (ctx.width, slice_y, slice_h)
        } else {
            (
                chroma_extent(ctx.width, 1),
                chroma_extent(slice_y, 1),
                chroma_extent(slice_h, 1),
            )
        };
        let (u_stride, v_stride) = (dst.strides[1], dst.strides[2]);
        let a_stride = dst.strides[3];
        let [_, u_plane, v_plane, a_plane] = &mut dst.planes;
        let u_plane = match u_plane.as_deref_mut() {
            Some(p) => p,
            None => panic!("Destination plane 1 must be present here"),
        };
        let v_plane = match v_plane.as_deref_mut() {
            Some(p) => p,
            None => panic!("Destination plane 2 must be present here"),
        };
        deinterleave_rows(
            src.plane(1),
            src.strides[1],
            u_plane,
            u_stride,
            v_plane,
            v_stride,
            cy,
            self.order,
            cw,
            ch,
        );
        // semi-planar sources carry no alpha, the destination gets full opacity
        if ctx.dst_format.describe().alpha {
            if let Some(a_plane) = a_plane.as_deref_mut() {
                fill_plane(a_plane, a_stride, ctx.width, slice_h, slice_y, 255);
            }
        }
        slice_h
    }
}

/// NV24/NV42 to YUV 4:2:0: luma is copied, every 2x2 chroma quad is
/// averaged with a floor division.
pub(crate) struct Nv24ToYuv420 {
    pub order: YuvNVOrder,
}

impl SliceConvert for Nv24ToYuv420 {
    fn name(&self) -> &'static str {
        "nv24_to_yuv420p"
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
        let dst_luma_stride = dst.strides[0];
        copy_plane_rows(
            src.plane(0),
            src.strides[0],
            dst.plane_mut(0),
            dst_luma_stride,
            slice_y,
            ctx.width,
            slice_h,
        );

        let uo = self.order.u_offset();
        let vo = self.order.v_offset();
        let uv = src.plane(1);
        let uv_stride = src.strides[1];
        let cy_up = chroma_extent(slice_y, 1);
        let ch_up = chroma_extent(slice_h, 1);
        let cw = chroma_extent(ctx.width, 1);

        let (u_stride, v_stride) = (dst.strides[1], dst.strides[2]);
        let [_, u_plane, v_plane, _] = &mut dst.planes;
        let u_plane = match u_plane.as_deref_mut() {
            Some(p) => p,
            None => panic!("Destination plane 1 must be present here"),
        };
        let v_plane = match v_plane.as_deref_mut() {
            Some(p) => p,
            None => panic!("Destination plane 2 must be present here"),
        };

        for (i, (u_row, v_row)) in rows_mut(u_plane, u_stride, cy_up, ch_up)
            .zip(rows_mut(v_plane, v_stride, cy_up, ch_up))
            .enumerate()
        {
            let row1 = &uv[2 * i * uv_stride..];
            // an odd final row pairs with itself
            let row2 = if 2 * i + 1 == slice_h {
                row1
            } else {
                &uv[(2 * i + 1) * uv_stride..]
            };
            for j in 0..cw {
                let x1 = 2 * j;
                let x2 = (2 * j + 1).min(ctx.width - 1);
                let u_sum = row1[2 * x1 + uo] as u16
                    + row1[2 * x2 + uo] as u16
                    + row2[2 * x1 + uo] as u16
                    + row2[2 * x2 + uo] as u16;
                let v_sum = row1[2 * x1 + vo] as u16
                    + row1[2 * x2 + vo] as u16
                    + row2[2 * x1 + vo] as u16
                    + row2[2 * x2 + vo] as u16;
                u_row[j] = (u_sum >> 2) as u8;
                v_row[j] = (v_sum >> 2) as u8;
            }
        }
        slice_h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pix_fmt::PixelFormat;

    fn ctx(src: PixelFormat, dst: PixelFormat, w: usize, h: usize) -> ConvertContext {
        ConvertContext::new(src, dst, w, h).unwrap()
    }

    #[test]
    fn planar_to_nv12_and_back() {
        let c = ctx(PixelFormat::Yuv420, PixelFormat::Nv12, 4, 2);
        let y: Vec<u8> = (0..8).collect();
        let u = vec![11u8, 12];
        let v = vec![21u8, 22];
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
        PlanarToNv {
            order: YuvNVOrder::UV,
            full_chroma: false,
        }
        .convert_slice(&c, &src, 0, 2, &mut dst);
        assert_eq!(duv, vec![11, 21, 12, 22]);

        let c_back = ctx(PixelFormat::Nv12, PixelFormat::Yuv420, 4, 2);
        let mut ry = vec![0u8; 8];
        let mut ru = vec![0u8; 2];
        let mut rv = vec![0u8; 2];
        let nv_src = SourceSlice {
            planes: [Some(&dy), Some(&duv), None, None],
            strides: [4, 4, 0, 0],
        };
        let mut planar_dst = DestSlice {
            planes: [Some(&mut ry), Some(&mut ru), Some(&mut rv), None],
            strides: [4, 2, 2, 0],
        };
        NvToPlanar {
            order: YuvNVOrder::UV,
            full_chroma: false,
        }
        .convert_slice(&c_back, &nv_src, 0, 2, &mut planar_dst);
        assert_eq!(ry, y);
        assert_eq!(ru, u);
        assert_eq!(rv, v);
    }

    #[test]
    fn nv21_swaps_chroma_order() {
        let c = ctx(PixelFormat::Yuv420, PixelFormat::Nv21, 2, 2);
        let y = vec![0u8; 4];
        let u = vec![5u8];
        let v = vec![9u8];
        let mut dy = vec![0u8; 4];
        let mut duv = vec![0u8; 2];
        let src = SourceSlice {
            planes: [Some(&y), Some(&u), Some(&v), None],
            strides: [2, 1, 1, 0],
        };
        let mut dst = DestSlice {
            planes: [Some(&mut dy), Some(&mut duv), None, None],
            strides: [2, 2, 0, 0],
        };
        PlanarToNv {
            order: YuvNVOrder::VU,
            full_chroma: false,
        }
        .convert_slice(&c, &src, 0, 2, &mut dst);
        assert_eq!(duv, vec![9, 5]);
    }

    #[test]
    fn nv24_chroma_average_is_exact() {
        let c = ctx(PixelFormat::Nv24, PixelFormat::Yuv420, 2, 2);
        let y = vec![0u8; 4];
        // U quad 10/20/30/40, V quad 1/3/5/7
        let uv = vec![10u8, 1, 20, 3, 30, 5, 40, 7];
        let mut dy = vec![0u8; 4];
        let mut du = vec![0u8; 1];
        let mut dv = vec![0u8; 1];
        let src = SourceSlice {
            planes: [Some(&y), Some(&uv), None, None],
            strides: [2, 4, 0, 0],
        };
        let mut dst = DestSlice {
            planes: [Some(&mut dy), Some(&mut du), Some(&mut dv), None],
            strides: [2, 1, 1, 0],
        };
        Nv24ToYuv420 {
            order: YuvNVOrder::UV,
        }
        .convert_slice(&c, &src, 0, 2, &mut dst);
        assert_eq!(du[0], 25);
        assert_eq!(dv[0], 4);
    }

    #[test]
    fn nv24_odd_height_duplicates_last_row() {
        let c = ctx(PixelFormat::Nv24, PixelFormat::Yuv420, 2, 1);
        let y = vec![0u8; 2];
        let uv = vec![10u8, 0, 20, 0];
        let mut dy = vec![0u8; 2];
        let mut du = vec![0u8; 1];
        let mut dv = vec![0u8; 1];
        let src = SourceSlice {
            planes: [Some(&y), Some(&uv), None, None],
            strides: [2, 4, 0, 0],
        };
        let mut dst = DestSlice {
            planes: [Some(&mut dy), Some(&mut du), Some(&mut dv), None],
            strides: [2, 1, 1, 0],
        };
        Nv24ToYuv420 {
            order: YuvNVOrder::UV,
        }
        .convert_slice(&c, &src, 0, 1, &mut dst);
        // (10 + 20 + 10 + 20) >> 2
        assert_eq!(du[0], 15);
    }

    #[test]
    fn nv12_to_yuva420_fills_alpha() {
        let c = ctx(PixelFormat::Nv12, PixelFormat::Yuva420, 2, 2);
        let y = vec![50u8; 4];
        let uv = vec![30u8, 40];
        let mut ry = vec![0u8; 4];
        let mut ru = vec![0u8; 1];
        let mut rv = vec![0u8; 1];
        let mut ra = vec![7u8; 4];
        let src = SourceSlice {
            planes: [Some(&y), Some(&uv), None, None],
            strides: [2, 2, 0, 0],
        };
        let mut dst = DestSlice {
            planes: [Some(&mut ry), Some(&mut ru), Some(&mut rv), Some(&mut ra)],
            strides: [2, 1, 1, 2],
        };
        NvToPlanar {
            order: YuvNVOrder::UV,
            full_chroma: false,
        }
        .convert_slice(&c, &src, 0, 2, &mut dst);
        assert_eq!(ru[0], 30);
        assert_eq!(rv[0], 40);
        assert_eq!(ra, vec![255; 4]);
    }
}
