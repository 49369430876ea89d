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
use crate::context::{
    get_forward_transform, get_kr_kb, get_yuv_range, CbCrForwardTransform, ConvertContext,
};
use crate::copy::fill_plane;
use crate::dispatch::SliceConvert;
use crate::slice::{rows, rows_mut, DestSlice, SourceSlice};

const PRECISION: u32 = 8;

/// Packed byte RGB to planar 8-bit 4:2:0.
///
/// Luma is computed per pixel; chroma is taken from the mean of each 2x2
/// block, so the result does not depend on which half of the block a
/// slice boundary lands on. Requires an even frame width.
pub(crate) struct RgbToYuv420 {
    transform: CbCrForwardTransform<i32>,
    bias_y: i32,
    bias_uv: i32,
}

impl RgbToYuv420 {
    pub fn new(ctx: &ConvertContext) -> Self {
        let range = get_yuv_range(8, ctx.src_range);
        let kr_kb = get_kr_kb(ctx.matrix);
        let transform =
            get_forward_transform(255, range.range_y, range.range_uv, kr_kb.kr, kr_kb.kb)
                .to_integers(PRECISION);
        let precision_scale = (1 << PRECISION) as f32;
        Self {
            transform,
            bias_y: ((range.bias_y as f32 + 0.5f32) * precision_scale) as i32,
            bias_uv: ((range.bias_uv as f32 + 0.5f32) * precision_scale) as i32,
        }
    }
}

impl SliceConvert for RgbToYuv420 {
    fn name(&self) -> &'static str {
        "packed_rgb_to_yuv420"
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
        let layout = match ctx.src_format.packed_rgb_layout() {
            Some(l) => l,
            None => panic!("YUV encode requires a packed RGB source"),
        };
        let t = self.transform;
        let src_plane = src.plane(0);
        let src_stride = src.strides[0];

        let luma_stride = dst.strides[0];
        {
            let y_plane = dst.plane_mut(0);
            for (rgb_row, y_row) in rows(src_plane, src_stride, 0, slice_h)
                .zip(rows_mut(y_plane, luma_stride, slice_y, slice_h))
            {
                for (px, y_out) in rgb_row
                    .chunks_exact(layout.step)
                    .zip(y_row.iter_mut())
                    .take(ctx.width)
                {
                    let r = px[layout.r] as i32;
                    let g = px[layout.g] as i32;
                    let b = px[layout.b] as i32;
                    *y_out =
                        ((r * t.yr + g * t.yg + b * t.yb + self.bias_y) >> PRECISION) as u8;
                }
            }
        }

        let cy = slice_y / 2;
        let ch = slice_h / 2;
        let cw = ctx.width / 2;
        let u_stride = dst.strides[1];
        let v_stride = dst.strides[2];
        {
            let u_plane = dst.plane_mut(1);
            for (i, u_row) in rows_mut(u_plane, u_stride, cy, ch).enumerate() {
                let row0 = &src_plane[2 * i * src_stride..];
                let row1 = &src_plane[(2 * i + 1) * src_stride..];
                for (j, u_out) in u_row.iter_mut().take(cw).enumerate() {
                    let (r, g, b) = average_block(layout.step, row0, row1, j, layout);
                    *u_out = ((r * t.cb_r + g * t.cb_g + b * t.cb_b + self.bias_uv)
                        >> PRECISION) as u8;
                }
            }
        }
        let v_plane = dst.plane_mut(2);
        for (i, v_row) in rows_mut(v_plane, v_stride, cy, ch).enumerate() {
            let row0 = &src_plane[2 * i * src_stride..];
            let row1 = &src_plane[(2 * i + 1) * src_stride..];
            for (j, v_out) in v_row.iter_mut().take(cw).enumerate() {
                let (r, g, b) = average_block(layout.step, row0, row1, j, layout);
                *v_out =
                    ((r * t.cr_r + g * t.cr_g + b * t.cr_b + self.bias_uv) >> PRECISION) as u8;
            }
        }
        // opaque sources set the destination alpha to full scale
        if ctx.dst_format.describe().alpha && dst.has_plane(3) {
            let a_stride = dst.strides[3];
            fill_plane(dst.plane_mut(3), a_stride, ctx.width, slice_h, slice_y, 255);
        }
        slice_h
    }
}

#[inline]
fn average_block(
    step: usize,
    row0: &[u8],
    row1: &[u8],
    j: usize,
    layout: crate::pix_fmt::PackedRgbLayout,
) -> (i32, i32, i32) {
    let p00 = &row0[2 * j * step..];
    let p01 = &row0[(2 * j + 1) * step..];
    let p10 = &row1[2 * j * step..];
    let p11 = &row1[(2 * j + 1) * step..];
    let r = (p00[layout.r] as i32 + p01[layout.r] as i32 + p10[layout.r] as i32
        + p11[layout.r] as i32
        + 2)
        >> 2;
    let g = (p00[layout.g] as i32 + p01[layout.g] as i32 + p10[layout.g] as i32
        + p11[layout.g] as i32
        + 2)
        >> 2;
    let b = (p00[layout.b] as i32 + p01[layout.b] as i32 + p10[layout.b] as i32
        + p11[layout.b] as i32
        + 2)
        >> 2;
    (r, g, b)
}
