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
    get_inverse_transform, get_kr_kb, get_yuv_range, CbCrInverseTransform, ConvertContext,
};
use crate::dispatch::SliceConvert;
use crate::numerics::qrshr;
use crate::slice::{rows_mut, DestSlice, SourceSlice};
#[cfg(feature = "rayon")]
use rayon::iter::{IndexedParallelIterator, IntoParallelRefMutIterator, ParallelIterator};

const PRECISION: i32 = 12;

/// Planar 8-bit YUV straight to packed byte RGB.
///
/// The integral inverse transform is fixed at construction from the
/// context's range and matrix; each pixel is then three multiplies and a
/// rounding shift per channel.
pub(crate) struct YuvToRgb {
    pub log2_cw: u32,
    pub log2_ch: u32,
    transform: CbCrInverseTransform<i32>,
    bias_y: i32,
    bias_uv: i32,
}

impl YuvToRgb {
    pub fn new(ctx: &ConvertContext) -> Self {
        let sd = ctx.src_format.describe();
        let range = get_yuv_range(8, ctx.src_range);
        let kr_kb = get_kr_kb(ctx.matrix);
        let transform =
            get_inverse_transform(255, range.range_y, range.range_uv, kr_kb.kr, kr_kb.kb)
                .to_integers(PRECISION as u32);
        Self {
            log2_cw: sd.log2_chroma_w as u32,
            log2_ch: sd.log2_chroma_h as u32,
            transform,
            bias_y: range.bias_y as i32,
            bias_uv: range.bias_uv as i32,
        }
    }
}

impl SliceConvert for YuvToRgb {
    fn name(&self) -> &'static str {
        "planar_yuv_to_packed_rgb"
    }

    fn slice_align(&self) -> usize {
        1 << self.log2_ch
    }

    fn convert_slice(
        &self,
        ctx: &ConvertContext,
        src: &SourceSlice,
        slice_y: usize,
        slice_h: usize,
        dst: &mut DestSlice,
    ) -> usize {
        let layout = match ctx.dst_format.packed_rgb_layout() {
            Some(l) => l,
            None => panic!("YUV decode requires a packed RGB destination"),
        };
        let t = self.transform;
        let bias_y = self.bias_y;
        let bias_uv = self.bias_uv;

        let y_plane = src.plane(0);
        let u_plane = src.plane(1);
        let v_plane = src.plane(2);
        let a_plane = if src.has_plane(3) && layout.a.is_some() {
            Some(src.plane(3))
        } else {
            None
        };
        let dst_stride = dst.strides[0];
        let dst_plane = dst.plane_mut(0);

        let mut dst_rows: Vec<&mut [u8]> =
            rows_mut(dst_plane, dst_stride, slice_y, slice_h).collect();
        let iter;
        #[cfg(feature = "rayon")]
        {
            iter = dst_rows.par_iter_mut();
        }
        #[cfg(not(feature = "rayon"))]
        {
            iter = dst_rows.iter_mut();
        }
        iter.enumerate().for_each(|(i, rgb_row)| {
            let y_row = &y_plane[i * src.strides[0]..];
            let ci = i >> self.log2_ch;
            let u_row = &u_plane[ci * src.strides[1]..];
            let v_row = &v_plane[ci * src.strides[2]..];
            let a_row = a_plane.map(|p| &p[i * src.strides[3]..]);

            for (x, px) in rgb_row
                .chunks_exact_mut(layout.step)
                .take(ctx.width)
                .enumerate()
            {
                let cx = x >> self.log2_cw;
                let y_value = (y_row[x] as i32 - bias_y) * t.y_coef;
                let cb_value = u_row[cx] as i32 - bias_uv;
                let cr_value = v_row[cx] as i32 - bias_uv;

                let r = qrshr::<PRECISION, 8>(y_value + t.cr_coef * cr_value);
                let b = qrshr::<PRECISION, 8>(y_value + t.cb_coef * cb_value);
                let g =
                    qrshr::<PRECISION, 8>(y_value - t.g_coeff_1 * cr_value - t.g_coeff_2 * cb_value);

                px[layout.r] = r as u8;
                px[layout.g] = g as u8;
                px[layout.b] = b as u8;
                if let Some(a) = layout.a {
                    px[a] = match a_row {
                        Some(row) => row[x],
                        None => 255,
                    };
                }
            }
        });
        slice_h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::YuvRange;
    use crate::pix_fmt::PixelFormat;

    fn decode_single(y: u8, u: u8, v: u8, fmt: PixelFormat) -> Vec<u8> {
        let mut ctx = ConvertContext::new(PixelFormat::Yuv444, fmt, 1, 1).unwrap();
        ctx.src_range = YuvRange::Limited;
        let yp = [y];
        let up = [u];
        let vp = [v];
        let step = fmt.packed_rgb_layout().unwrap().step;
        let mut out = vec![0u8; step];
        let src = SourceSlice {
            planes: [Some(&yp), Some(&up), Some(&vp), None],
            strides: [1, 1, 1, 0],
        };
        let mut dst = DestSlice::single(&mut out, step);
        YuvToRgb::new(&ctx).convert_slice(&ctx, &src, 0, 1, &mut dst);
        out
    }

    #[test]
    fn limited_black_and_white_hit_the_rails() {
        assert_eq!(decode_single(16, 128, 128, PixelFormat::Rgb24), vec![0, 0, 0]);
        assert_eq!(
            decode_single(235, 128, 128, PixelFormat::Rgb24),
            vec![255, 255, 255]
        );
    }

    #[test]
    fn neutral_chroma_decodes_to_gray() {
        let px = decode_single(126, 128, 128, PixelFormat::Bgra);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn red_chroma_pushes_the_red_channel() {
        let px = decode_single(81, 90, 240, PixelFormat::Rgb24);
        assert!(px[0] > 200, "r = {}", px[0]);
        assert!(px[2] < 60, "b = {}", px[2]);
    }

    #[test]
    fn yuv420_chroma_rows_are_shared() {
        let ctx = ConvertContext::new(PixelFormat::Yuv420, PixelFormat::Rgb24, 2, 2).unwrap();
        let y = [100u8, 100, 100, 100];
        let u = [128u8];
        let v = [128u8];
        let mut out = vec![0u8; 12];
        let src = SourceSlice {
            planes: [Some(&y), Some(&u), Some(&v), None],
            strides: [2, 1, 1, 0],
        };
        let mut dst = DestSlice::single(&mut out, 6);
        YuvToRgb::new(&ctx).convert_slice(&ctx, &src, 0, 2, &mut dst);
        assert_eq!(&out[0..3], &out[3..6]);
        assert_eq!(&out[0..3], &out[6..9]);
    }

    #[test]
    fn alpha_plane_passes_through() {
        let ctx = ConvertContext::new(PixelFormat::Yuva444, PixelFormat::Rgba, 1, 1).unwrap();
        let y = [126u8];
        let u = [128u8];
        let v = [128u8];
        let a = [42u8];
        let mut out = vec![0u8; 4];
        let src = SourceSlice {
            planes: [Some(&y), Some(&u), Some(&v), Some(&a)],
            strides: [1, 1, 1, 1],
        };
        let mut dst = DestSlice::single(&mut out, 4);
        YuvToRgb::new(&ctx).convert_slice(&ctx, &src, 0, 1, &mut dst);
        assert_eq!(out[3], 42);
    }
}
