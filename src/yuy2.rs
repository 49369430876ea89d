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
use crate::copy::fill_plane;
use crate::dispatch::SliceConvert;
use crate::slice::{chroma_extent, rows, rows_mut, DestSlice, SourceSlice};

/// Byte positions inside one 4-byte cell holding two pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Yuy2Variant {
    Yuyv,
    Uyvy,
}

impl Yuy2Variant {
    #[inline]
    const fn offsets(self) -> (usize, usize, usize, usize) {
        // (y0, u, y1, v)
        match self {
            Yuy2Variant::Yuyv => (0, 1, 2, 3),
            Yuy2Variant::Uyvy => (1, 0, 3, 2),
        }
    }
}

fn pack_row(
    variant: Yuy2Variant,
    y_row: &[u8],
    u_row: &[u8],
    v_row: &[u8],
    dst_row: &mut [u8],
    width: usize,
) {
    let (y0, u, y1, v) = variant.offsets();
    let pairs = width / 2;
    for j in 0..pairs {
        let cell = &mut dst_row[4 * j..4 * j + 4];
        cell[y0] = y_row[2 * j];
        cell[y1] = y_row[2 * j + 1];
        cell[u] = u_row[j];
        cell[v] = v_row[j];
    }
    if width & 1 != 0 {
        // trailing half cell: one luma plus the leading chroma byte
        let tail = &mut dst_row[4 * pairs..4 * pairs + 2];
        match variant {
            Yuy2Variant::Yuyv => {
                tail[0] = y_row[width - 1];
                tail[1] = u_row[pairs];
            }
            Yuy2Variant::Uyvy => {
                tail[0] = u_row[pairs];
                tail[1] = y_row[width - 1];
            }
        }
    }
}

fn unpack_row(
    variant: Yuy2Variant,
    src_row: &[u8],
    y_row: &mut [u8],
    chroma: Option<(&mut [u8], &mut [u8])>,
    width: usize,
) {
    let (y0, u, y1, v) = variant.offsets();
    let pairs = width / 2;
    if let Some((u_row, v_row)) = chroma {
        for j in 0..pairs {
            let cell = &src_row[4 * j..4 * j + 4];
            y_row[2 * j] = cell[y0];
            y_row[2 * j + 1] = cell[y1];
            u_row[j] = cell[u];
            v_row[j] = cell[v];
        }
        if width & 1 != 0 {
            let tail = &src_row[4 * pairs..4 * pairs + 2];
            match variant {
                Yuy2Variant::Yuyv => {
                    y_row[width - 1] = tail[0];
                    u_row[pairs] = tail[1];
                    v_row[pairs] = tail[1];
                }
                Yuy2Variant::Uyvy => {
                    u_row[pairs] = tail[0];
                    v_row[pairs] = tail[0];
                    y_row[width - 1] = tail[1];
                }
            }
        }
    } else {
        for j in 0..pairs {
            let cell = &src_row[4 * j..4 * j + 4];
            y_row[2 * j] = cell[y0];
            y_row[2 * j + 1] = cell[y1];
        }
        if width & 1 != 0 {
            let tail = &src_row[4 * pairs..4 * pairs + 2];
            y_row[width - 1] = match variant {
                Yuy2Variant::Yuyv => tail[0],
                Yuy2Variant::Uyvy => tail[1],
            };
        }
    }
}

/// Planar YUV to a packed 4:2:2 stream.
///
/// From 4:2:2 input this is lossless repacking. From 4:2:0 input each
/// chroma row is reused for both luma rows of its pair, which is why the
/// path is only offered in fast mode.
pub(crate) struct PlanarToYuy2 {
    pub variant: Yuy2Variant,
    /// Source chroma is vertically subsampled (4:2:0).
    pub vertical_sub: bool,
}

impl SliceConvert for PlanarToYuy2 {
    fn name(&self) -> &'static str {
        "planar_to_yuy2"
    }

    fn slice_align(&self) -> usize {
        if self.vertical_sub {
            2
        } else {
            1
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
        let y_plane = src.plane(0);
        let u_plane = src.plane(1);
        let v_plane = src.plane(2);
        let (ys, us, vs) = (src.strides[0], src.strides[1], src.strides[2]);
        let dst_stride = dst.strides[0];
        let dst_plane = dst.plane_mut(0);

        for (i, dst_row) in rows_mut(dst_plane, dst_stride, slice_y, slice_h).enumerate() {
            let ci = if self.vertical_sub { i >> 1 } else { i };
            let y_row = &y_plane[i * ys..];
            let u_row = &u_plane[ci * us..];
            let v_row = &v_plane[ci * vs..];
            pack_row(self.variant, y_row, u_row, v_row, dst_row, ctx.width);
        }
        slice_h
    }
}

/// Packed 4:2:2 to planar YUV, 4:2:2 or 4:2:0 output.
///
/// For 4:2:0 output the chroma of odd rows is dropped rather than
/// averaged.
pub(crate) struct Yuy2ToPlanar {
    pub variant: Yuy2Variant,
    pub to_420: bool,
}

impl SliceConvert for Yuy2ToPlanar {
    fn name(&self) -> &'static str {
        "yuy2_to_planar"
    }

    fn slice_align(&self) -> usize {
        if self.to_420 {
            2
        } else {
            1
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
        let src_plane = src.plane(0);
        let src_stride = src.strides[0];
        let (ys, us, vs) = (dst.strides[0], dst.strides[1], dst.strides[2]);
        let a_stride = dst.strides[3];
        let cy = if self.to_420 {
            chroma_extent(slice_y, 1)
        } else {
            slice_y
        };

        let [y_plane, u_plane, v_plane, a_plane] = &mut dst.planes;
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

        let mut u_rows = rows_mut(u_plane, us, cy, slice_h);
        let mut v_rows = rows_mut(v_plane, vs, cy, slice_h);
        for (i, (src_row, y_row)) in rows(src_plane, src_stride, 0, slice_h)
            .zip(rows_mut(y_plane, ys, slice_y, slice_h))
            .enumerate()
        {
            let take_chroma = !self.to_420 || i & 1 == 0;
            if take_chroma {
                let u_row = u_rows.next();
                let v_row = v_rows.next();
                if let (Some(u_row), Some(v_row)) = (u_row, v_row) {
                    unpack_row(self.variant, src_row, y_row, Some((u_row, v_row)), ctx.width);
                    continue;
                }
            }
            unpack_row(self.variant, src_row, y_row, None, ctx.width);
        }
        // packed 4:2:2 carries no alpha, the destination gets full opacity
        if ctx.dst_format.describe().alpha {
            if let Some(a_plane) = a_plane.as_deref_mut() {
                fill_plane(a_plane, a_stride, ctx.width, slice_h, slice_y, 255);
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
    fn yuv422p_round_trips_through_yuyv() {
        let ctx = ConvertContext::new(PixelFormat::Yuv422, PixelFormat::Yuyv422, 4, 2).unwrap();
        let y: Vec<u8> = (10..18).collect();
        let u = vec![1u8, 2, 3, 4];
        let v = vec![5u8, 6, 7, 8];
        let mut packed = vec![0u8; 16];
        let src = SourceSlice {
            planes: [Some(&y), Some(&u), Some(&v), None],
            strides: [4, 2, 2, 0],
        };
        let mut dst = DestSlice::single(&mut packed, 8);
        PlanarToYuy2 {
            variant: Yuy2Variant::Yuyv,
            vertical_sub: false,
        }
        .convert_slice(&ctx, &src, 0, 2, &mut dst);
        assert_eq!(&packed[..8], &[10, 1, 11, 5, 12, 2, 13, 6]);

        let ctx_back =
            ConvertContext::new(PixelFormat::Yuyv422, PixelFormat::Yuv422, 4, 2).unwrap();
        let mut ry = vec![0u8; 8];
        let mut ru = vec![0u8; 4];
        let mut rv = vec![0u8; 4];
        let back_src = SourceSlice::single(&packed, 8);
        let mut back_dst = DestSlice {
            planes: [Some(&mut ry), Some(&mut ru), Some(&mut rv), None],
            strides: [4, 2, 2, 0],
        };
        Yuy2ToPlanar {
            variant: Yuy2Variant::Yuyv,
            to_420: false,
        }
        .convert_slice(&ctx_back, &back_src, 0, 2, &mut back_dst);
        assert_eq!(ry, y);
        assert_eq!(ru, u);
        assert_eq!(rv, v);
    }

    #[test]
    fn uyvy_layout() {
        let ctx = ConvertContext::new(PixelFormat::Yuv422, PixelFormat::Uyvy422, 2, 1).unwrap();
        let y = vec![100u8, 101];
        let u = vec![50u8];
        let v = vec![60u8];
        let mut packed = vec![0u8; 4];
        let src = SourceSlice {
            planes: [Some(&y), Some(&u), Some(&v), None],
            strides: [2, 1, 1, 0],
        };
        let mut dst = DestSlice::single(&mut packed, 4);
        PlanarToYuy2 {
            variant: Yuy2Variant::Uyvy,
            vertical_sub: false,
        }
        .convert_slice(&ctx, &src, 0, 1, &mut dst);
        assert_eq!(packed, vec![50, 100, 60, 101]);
    }

    #[test]
    fn yuv420_duplicates_chroma_rows() {
        let ctx = ConvertContext::new(PixelFormat::Yuv420, PixelFormat::Yuyv422, 2, 2).unwrap();
        let y = vec![1u8, 2, 3, 4];
        let u = vec![9u8];
        let v = vec![8u8];
        let mut packed = vec![0u8; 8];
        let src = SourceSlice {
            planes: [Some(&y), Some(&u), Some(&v), None],
            strides: [2, 1, 1, 0],
        };
        let mut dst = DestSlice::single(&mut packed, 4);
        PlanarToYuy2 {
            variant: Yuy2Variant::Yuyv,
            vertical_sub: true,
        }
        .convert_slice(&ctx, &src, 0, 2, &mut dst);
        assert_eq!(&packed[..4], &[1, 9, 2, 8]);
        assert_eq!(&packed[4..], &[3, 9, 4, 8]);
    }

    #[test]
    fn yuyv_to_yuv420_takes_even_row_chroma() {
        let ctx = ConvertContext::new(PixelFormat::Yuyv422, PixelFormat::Yuv420, 2, 2).unwrap();
        let packed = vec![1u8, 10, 2, 20, 3, 30, 4, 40];
        let mut ry = vec![0u8; 4];
        let mut ru = vec![0u8; 1];
        let mut rv = vec![0u8; 1];
        let src = SourceSlice::single(&packed, 4);
        let mut dst = DestSlice {
            planes: [Some(&mut ry), Some(&mut ru), Some(&mut rv), None],
            strides: [2, 1, 1, 0],
        };
        Yuy2ToPlanar {
            variant: Yuy2Variant::Yuyv,
            to_420: true,
        }
        .convert_slice(&ctx, &src, 0, 2, &mut dst);
        assert_eq!(ry, vec![1, 2, 3, 4]);
        assert_eq!(ru[0], 10);
        assert_eq!(rv[0], 20);
    }

    #[test]
    fn yuyv_to_yuva420_fills_opaque_alpha() {
        let ctx =
            ConvertContext::new(PixelFormat::Yuyv422, PixelFormat::Yuva420, 2, 2).unwrap();
        let packed = vec![1u8, 10, 2, 20, 3, 30, 4, 40];
        let mut ry = vec![0u8; 4];
        let mut ru = vec![0u8; 1];
        let mut rv = vec![0u8; 1];
        let mut ra = vec![7u8; 4];
        let src = SourceSlice::single(&packed, 4);
        let mut dst = DestSlice {
            planes: [Some(&mut ry), Some(&mut ru), Some(&mut rv), Some(&mut ra)],
            strides: [2, 1, 1, 2],
        };
        Yuy2ToPlanar {
            variant: Yuy2Variant::Yuyv,
            to_420: true,
        }
        .convert_slice(&ctx, &src, 0, 2, &mut dst);
        assert_eq!(ra, vec![255; 4]);
    }
}
