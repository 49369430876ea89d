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
use crate::context::{ConvertContext, YuvRange};
use crate::dispatch::SliceConvert;
use crate::dither::{narrow_plane, widen_plane, DepthConvert};
use crate::rw::{get_u16, put_u16};
use crate::slice::{chroma_extent, rows, rows_mut, DestSlice, SourceSlice, MAX_PLANES};

/// Fills rows `y..y + height` of a byte plane with a constant.
pub(crate) fn fill_plane(
    plane: &mut [u8],
    stride: usize,
    length: usize,
    height: usize,
    y: usize,
    val: u8,
) {
    for row in rows_mut(plane, stride, y, height) {
        let n = row.len().min(length);
        row[..n].fill(val);
    }
}

/// Fills a 16-bit storage plane with the neutral value of the component:
/// full scale for alpha, the midpoint otherwise.
pub(crate) fn fill_plane16(
    plane: &mut [u8],
    stride: usize,
    length: usize,
    height: usize,
    y: usize,
    alpha: bool,
    depth: u32,
    shift: u32,
    big_endian: bool,
) {
    let val: u16 = (if alpha {
        ((1u32 << depth) - 1) as u16
    } else {
        1 << (depth - 1)
    }) << shift;
    let pattern = if big_endian {
        val.to_be_bytes()
    } else {
        val.to_le_bytes()
    };
    for row in rows_mut(plane, stride, y, height) {
        let n = (length * 2).min(row.len());
        for pair in row[..n].chunks_exact_mut(2) {
            pair[0] = pattern[0];
            pair[1] = pattern[1];
        }
    }
}

pub(crate) fn copy_plane_rows(
    src: &[u8],
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
    dst_y: usize,
    row_bytes: usize,
    height: usize,
) {
    for (src_row, dst_row) in
        rows(src, src_stride, 0, height).zip(rows_mut(dst, dst_stride, dst_y, height))
    {
        dst_row[..row_bytes].copy_from_slice(&src_row[..row_bytes]);
    }
}

fn bswap16_rows(
    src: &[u8],
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
    dst_y: usize,
    length: usize,
    height: usize,
) {
    for (src_row, dst_row) in
        rows(src, src_stride, 0, height).zip(rows_mut(dst, dst_stride, dst_y, height))
    {
        for j in 0..length {
            put_u16::<false>(dst_row, j, get_u16::<true>(src_row, j));
        }
    }
}

fn bswap32_rows(
    src: &[u8],
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
    dst_y: usize,
    length: usize,
    height: usize,
) {
    for (src_row, dst_row) in
        rows(src, src_stride, 0, height).zip(rows_mut(dst, dst_stride, dst_y, height))
    {
        for j in 0..length {
            let v = u32::from_be_bytes([
                src_row[j * 4],
                src_row[j * 4 + 1],
                src_row[j * 4 + 2],
                src_row[j * 4 + 3],
            ]);
            dst_row[j * 4..j * 4 + 4].copy_from_slice(&v.to_le_bytes());
        }
    }
}

fn narrow_dispatch(
    src_be: bool,
    dst_be: bool,
    p: DepthConvert,
    src: &[u8],
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
    dst_y: usize,
    length: usize,
    height: usize,
) {
    match (src_be, dst_be) {
        (false, false) => {
            narrow_plane::<false, false>(p, src, src_stride, dst, dst_stride, dst_y, length, height)
        }
        (false, true) => {
            narrow_plane::<false, true>(p, src, src_stride, dst, dst_stride, dst_y, length, height)
        }
        (true, false) => {
            narrow_plane::<true, false>(p, src, src_stride, dst, dst_stride, dst_y, length, height)
        }
        (true, true) => {
            narrow_plane::<true, true>(p, src, src_stride, dst, dst_stride, dst_y, length, height)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn widen_dispatch(
    src_be: bool,
    dst_be: bool,
    p: DepthConvert,
    src: &[u8],
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
    dst_y: usize,
    length: usize,
    height: usize,
) {
    match (src_be, dst_be) {
        (false, false) => {
            widen_plane::<false, false>(p, src, src_stride, dst, dst_stride, dst_y, length, height)
        }
        (false, true) => {
            widen_plane::<false, true>(p, src, src_stride, dst, dst_stride, dst_y, length, height)
        }
        (true, false) => {
            widen_plane::<true, false>(p, src, src_stride, dst, dst_stride, dst_y, length, height)
        }
        (true, true) => {
            widen_plane::<true, true>(p, src, src_stride, dst, dst_stride, dst_y, length, height)
        }
    }
}

/// Plane-by-plane copy between compatible planar layouts.
///
/// Covers identity copies, depth and endianness changes, alpha plane
/// addition or removal, gray to planar YUV and back, and semi-planar to
/// semi-planar transfers. Planes the destination lacks are dropped,
/// planes the source lacks are filled with their neutral value.
pub(crate) struct PlanarCopy {
    /// Vertical chroma shift of the more subsampled side; slices must
    /// not split a shared chroma row.
    pub log2_ch: u8,
}

impl SliceConvert for PlanarCopy {
    fn name(&self) -> &'static str {
        "planar_copy"
    }

    fn slice_align(&self) -> usize {
        1 << self.log2_ch
    }

    fn allows_missing_src_planes(&self) -> bool {
        true
    }

    fn convert_slice(
        &self,
        ctx: &ConvertContext,
        src: &SourceSlice,
        slice_y: usize,
        slice_h: usize,
        dst: &mut DestSlice,
    ) -> usize {
        let sd = ctx.src_format.describe();
        let dd = ctx.dst_format.describe();

        for plane in 0..MAX_PLANES {
            if !dst.has_plane(plane) {
                break;
            }
            let full_res = plane == 0 || plane == 3;
            let mut length = if full_res {
                ctx.width
            } else {
                chroma_extent(ctx.width, dd.log2_chroma_w)
            };
            let y = if full_res {
                slice_y
            } else {
                chroma_extent(slice_y, dd.log2_chroma_h)
            };
            let height = if full_res {
                slice_h
            } else {
                chroma_extent(slice_h, dd.log2_chroma_h)
            };
            if plane == 1 && dd.semi_planar {
                length *= 2;
            }
            if plane == 1 && dd.components < 3 {
                continue;
            }
            let dst_stride = dst.strides[plane];
            let dst_plane = dst.plane_mut(plane);

            let src_missing = !src.has_plane(plane)
                || (plane == 1 && sd.components < 3)
                || (plane == 3 && !sd.alpha);
            if src_missing {
                if dd.component_bytes() == 2 {
                    fill_plane16(
                        dst_plane,
                        dst_stride,
                        length,
                        height,
                        y,
                        plane == 3,
                        dd.depth[plane] as u32,
                        dd.shift[plane] as u32,
                        dd.big_endian,
                    );
                } else {
                    fill_plane(
                        dst_plane,
                        dst_stride,
                        length,
                        height,
                        y,
                        if plane == 3 { 255 } else { 128 },
                    );
                }
                continue;
            }

            let src_plane = src.plane(plane);
            let src_stride = src.strides[plane];
            let depth_changes = !sd.float
                && !dd.float
                && (sd.depth[plane] != dd.depth[plane] || sd.shift[plane] != dd.shift[plane]);

            if depth_changes {
                let p = DepthConvert {
                    src_depth: sd.depth[plane] as u32,
                    dst_depth: dd.depth[plane] as u32,
                    src_shift: sd.shift[plane] as u32,
                    dst_shift: dd.shift[plane] as u32,
                    shift_only: plane == 1
                        || plane == 2
                        || (ctx.src_range == YuvRange::Limited && plane == 0),
                    ordered_dither: ctx.ordered_dither_enabled(),
                };
                if p.src_depth > p.dst_depth {
                    narrow_dispatch(
                        sd.big_endian,
                        dd.big_endian,
                        p,
                        src_plane,
                        src_stride,
                        dst_plane,
                        dst_stride,
                        y,
                        length,
                        height,
                    );
                } else {
                    widen_dispatch(
                        sd.big_endian,
                        dd.big_endian,
                        p,
                        src_plane,
                        src_stride,
                        dst_plane,
                        dst_stride,
                        y,
                        length,
                        height,
                    );
                }
            } else if !sd.float
                && dd.component_bytes() == 2
                && sd.big_endian != dd.big_endian
            {
                if sd.big_endian {
                    bswap16_rows(src_plane, src_stride, dst_plane, dst_stride, y, length, height);
                } else {
                    // swapping is symmetric, run the same kernel in reverse
                    for (src_row, dst_row) in rows(src_plane, src_stride, 0, height)
                        .zip(rows_mut(dst_plane, dst_stride, y, height))
                    {
                        for j in 0..length {
                            put_u16::<true>(dst_row, j, get_u16::<false>(src_row, j));
                        }
                    }
                }
            } else if sd.float && dd.float && sd.big_endian != dd.big_endian {
                bswap32_rows(src_plane, src_stride, dst_plane, dst_stride, y, length, height);
            } else {
                let row_bytes = length * dd.component_bytes();
                copy_plane_rows(
                    src_plane, src_stride, dst_plane, dst_stride, y, row_bytes, height,
                );
            }
        }
        slice_h
    }
}

/// Row copy of any single plane packed format onto itself.
pub(crate) struct PackedCopy;

impl SliceConvert for PackedCopy {
    fn name(&self) -> &'static str {
        "packed_copy"
    }

    fn convert_slice(
        &self,
        ctx: &ConvertContext,
        src: &SourceSlice,
        slice_y: usize,
        slice_h: usize,
        dst: &mut DestSlice,
    ) -> usize {
        let bits = ctx.src_format.packed_bits_per_pixel() as usize;
        let row_bytes = (ctx.width * bits).div_ceil(8);
        let dst_stride = dst.strides[0];
        copy_plane_rows(
            src.plane(0),
            src.strides[0],
            dst.plane_mut(0),
            dst_stride,
            slice_y,
            row_bytes,
            slice_h,
        );
        slice_h
    }
}
