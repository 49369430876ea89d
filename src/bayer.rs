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
use crate::context::{
    get_forward_transform, get_kr_kb, get_yuv_range, CbCrForwardTransform, ConvertContext,
};
use crate::dispatch::SliceConvert;
use crate::pix_fmt::BayerPattern;
use crate::rw::{get_u16, put_u16};
use crate::slice::{rows_mut, DestSlice, SourceSlice};

const PRECISION: u32 = 8;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CellColor {
    R,
    G,
    B,
}

/// Color of the mosaic site at frame position `(y, x)`.
#[inline]
const fn site_color(pattern: BayerPattern, y: usize, x: usize) -> CellColor {
    use CellColor::*;
    let table = match pattern {
        BayerPattern::Bggr => [[B, G], [G, R]],
        BayerPattern::Rggb => [[R, G], [G, B]],
        BayerPattern::Gbrg => [[G, B], [R, G]],
        BayerPattern::Grbg => [[G, R], [B, G]],
    };
    table[y & 1][x & 1]
}

/// Demosaicing of a Bayer mosaic to packed RGB.
///
/// Interior row pairs are interpolated bilinearly; the first and last
/// pair of every slice fall back to nearest-neighbor inside the 2x2
/// cell, which keeps each slice independent of its neighbors.
pub(crate) struct BayerToRgb {
    pub pattern: BayerPattern,
    pub src_wide: bool,
    pub dst_wide: bool,
    pub src_be: bool,
    pub dst_be: bool,
}

impl BayerToRgb {
    #[inline]
    fn sample(&self, plane: &[u8], stride: usize, y: usize, x: usize) -> u32 {
        if !self.src_wide {
            return plane[y * stride + x] as u32;
        }
        let row = &plane[y * stride..];
        let v = if self.src_be {
            get_u16::<true>(row, x) as u32
        } else {
            get_u16::<false>(row, x) as u32
        };
        // a narrowing demosaic keeps the top byte of each sample
        if self.dst_wide {
            v
        } else {
            v >> 8
        }
    }

    #[inline]
    fn emit(&self, dst_row: &mut [u8], x: usize, r: u32, g: u32, b: u32) {
        if self.dst_wide {
            let px = &mut dst_row[x * 6..];
            if self.dst_be {
                put_u16::<true>(px, 0, r as u16);
                put_u16::<true>(px, 1, g as u16);
                put_u16::<true>(px, 2, b as u16);
            } else {
                put_u16::<false>(px, 0, r as u16);
                put_u16::<false>(px, 1, g as u16);
                put_u16::<false>(px, 2, b as u16);
            }
        } else {
            let px = &mut dst_row[x * 3..];
            px[0] = r as u8;
            px[1] = g as u8;
            px[2] = b as u8;
        }
    }

    /// Nearest-neighbor rendition of one row pair.
    fn copy_pair(
        &self,
        src: &[u8],
        stride: usize,
        y0: usize,
        width: usize,
        rows: &mut [&mut [u8]],
    ) {
        for x0 in (0..width).step_by(2) {
            let x1 = (x0 + 1).min(width - 1);
            let mut r_val = 0u32;
            let mut b_val = 0u32;
            let mut g_row = [0u32; 2];
            for dy in 0..2 {
                for (dx, x) in [x0, x1].iter().enumerate() {
                    let v = self.sample(src, stride, y0 + dy, *x);
                    match site_color(self.pattern, y0 + dy, x0 + dx) {
                        CellColor::R => r_val = v,
                        CellColor::B => b_val = v,
                        CellColor::G => g_row[dy] = v,
                    }
                }
            }
            for dy in 0..2 {
                self.emit(&mut rows[dy], x0, r_val, g_row[dy], b_val);
                if x1 != x0 {
                    self.emit(&mut rows[dy], x1, r_val, g_row[dy], b_val);
                }
            }
        }
    }

    /// Bilinear rendition of one interior row pair; reads the rows right
    /// above and below it.
    fn interpolate_pair(
        &self,
        src: &[u8],
        stride: usize,
        y0: usize,
        width: usize,
        rows: &mut [&mut [u8]],
    ) {
        for dy in 0..2 {
            let y = y0 + dy;
            for x in 0..width {
                let xm = x.saturating_sub(1);
                let xp = (x + 1).min(width - 1);
                let up = self.sample(src, stride, y - 1, x);
                let down = self.sample(src, stride, y + 1, x);
                let left = self.sample(src, stride, y, xm);
                let right = self.sample(src, stride, y, xp);
                let own = self.sample(src, stride, y, x);
                match site_color(self.pattern, y, x) {
                    CellColor::G => {
                        let horizontal = (left + right + 1) >> 1;
                        let vertical = (up + down + 1) >> 1;
                        let (r, b) = match site_color(self.pattern, y, x + 1) {
                            CellColor::R => (horizontal, vertical),
                            _ => (vertical, horizontal),
                        };
                        self.emit(&mut rows[dy], x, r, own, b);
                    }
                    own_color => {
                        let cross = (up + down + left + right + 2) >> 2;
                        let diag = (self.sample(src, stride, y - 1, xm)
                            + self.sample(src, stride, y - 1, xp)
                            + self.sample(src, stride, y + 1, xm)
                            + self.sample(src, stride, y + 1, xp)
                            + 2)
                            >> 2;
                        if own_color == CellColor::R {
                            self.emit(&mut rows[dy], x, own, cross, diag);
                        } else {
                            self.emit(&mut rows[dy], x, diag, cross, own);
                        }
                    }
                }
            }
        }
    }
}

impl SliceConvert for BayerToRgb {
    fn name(&self) -> &'static str {
        "bayer_to_rgb"
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
        if slice_h < 2 {
            return 0;
        }
        let plane = src.plane(0);
        let stride = src.strides[0];
        let dst_stride = dst.strides[0];
        let dst_plane = dst.plane_mut(0);

        let mut dst_rows: Vec<&mut [u8]> =
            rows_mut(dst_plane, dst_stride, slice_y, slice_h).collect();
        let pairs = slice_h / 2;
        for (k, pair) in dst_rows.chunks_exact_mut(2).take(pairs).enumerate() {
            let y0 = 2 * k;
            if k == 0 || k + 1 == pairs {
                self.copy_pair(plane, stride, y0, ctx.width, pair);
            } else {
                self.interpolate_pair(plane, stride, y0, ctx.width, pair);
            }
        }
        slice_h
    }
}

/// Demosaicing of a Bayer mosaic straight to planar 8-bit 4:2:0.
///
/// Each row pair is demosaiced into scratch RGB rows with the same
/// windows as [`BayerToRgb`], then encoded through the context's forward
/// coefficients: luma per pixel, chroma from the mean of each 2x2 block.
pub(crate) struct BayerToYuv420 {
    demosaic: BayerToRgb,
    transform: CbCrForwardTransform<i32>,
    bias_y: i32,
    bias_uv: i32,
}

impl BayerToYuv420 {
    pub fn new(
        ctx: &ConvertContext,
        pattern: BayerPattern,
        src_wide: bool,
        src_be: bool,
    ) -> Self {
        let range = get_yuv_range(8, ctx.src_range);
        let kr_kb = get_kr_kb(ctx.matrix);
        let transform =
            get_forward_transform(255, range.range_y, range.range_uv, kr_kb.kr, kr_kb.kb)
                .to_integers(PRECISION);
        let precision_scale = (1 << PRECISION) as f32;
        Self {
            demosaic: BayerToRgb {
                pattern,
                src_wide,
                dst_wide: false,
                src_be,
                dst_be: false,
            },
            transform,
            bias_y: ((range.bias_y as f32 + 0.5f32) * precision_scale) as i32,
            bias_uv: ((range.bias_uv as f32 + 0.5f32) * precision_scale) as i32,
        }
    }
}

impl SliceConvert for BayerToYuv420 {
    fn name(&self) -> &'static str {
        "bayer_to_yuv420p"
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
        if slice_h < 2 {
            return 0;
        }
        let plane = src.plane(0);
        let stride = src.strides[0];
        let t = self.transform;
        let width = ctx.width;
        let cw = width / 2;
        let pairs = slice_h / 2;
        let mut rgb0 = vec![0u8; width * 3];
        let mut rgb1 = vec![0u8; width * 3];

        let (ys, us, vs) = (dst.strides[0], dst.strides[1], dst.strides[2]);
        let [y_plane, u_plane, v_plane, _] = &mut dst.planes;
        let y_plane = match y_plane.as_deref_mut() {
            Some(p) => p,
            None => panic!("Destination plane 0 must be present here"),
        };
        let u_plane = match u_plane.as_deref_mut() {
            Some(p) => p,
            None => panic!("Destination plane 1 must be present here"),
        };
        let v_plane = match v_plane.as_deref_mut() {
            Some(p) => p,
            None => panic!("Destination plane 2 must be present here"),
        };
        let mut y_rows = rows_mut(y_plane, ys, slice_y, slice_h);
        let mut u_rows = rows_mut(u_plane, us, slice_y / 2, pairs);
        let mut v_rows = rows_mut(v_plane, vs, slice_y / 2, pairs);

        for k in 0..pairs {
            {
                let mut pair = [rgb0.as_mut_slice(), rgb1.as_mut_slice()];
                if k == 0 || k + 1 == pairs {
                    self.demosaic.copy_pair(plane, stride, 2 * k, width, &mut pair);
                } else {
                    self.demosaic
                        .interpolate_pair(plane, stride, 2 * k, width, &mut pair);
                }
            }
            for rgb_row in [&rgb0, &rgb1] {
                let y_row = match y_rows.next() {
                    Some(r) => r,
                    None => break,
                };
                for (px, y_out) in rgb_row.chunks_exact(3).zip(y_row.iter_mut()).take(width) {
                    let (r, g, b) = (px[0] as i32, px[1] as i32, px[2] as i32);
                    *y_out =
                        ((r * t.yr + g * t.yg + b * t.yb + self.bias_y) >> PRECISION) as u8;
                }
            }
            if let (Some(u_row), Some(v_row)) = (u_rows.next(), v_rows.next()) {
                for j in 0..cw {
                    let avg = |c: usize| -> i32 {
                        (rgb0[6 * j + c] as i32
                            + rgb0[6 * j + 3 + c] as i32
                            + rgb1[6 * j + c] as i32
                            + rgb1[6 * j + 3 + c] as i32
                            + 2)
                            >> 2
                    };
                    let (r, g, b) = (avg(0), avg(1), avg(2));
                    u_row[j] = ((r * t.cb_r + g * t.cb_g + b * t.cb_b + self.bias_uv)
                        >> PRECISION) as u8;
                    v_row[j] = ((r * t.cr_r + g * t.cr_g + b * t.cr_b + self.bias_uv)
                        >> PRECISION) as u8;
                }
            }
        }
        slice_h
    }
}
