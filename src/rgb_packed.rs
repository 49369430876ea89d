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
use crate::pix_fmt::PackedRgbLayout;
use crate::rw::{get_u16, put_u16};
use crate::slice::{rows, rows_mut, DestSlice, SourceSlice};

fn shuffle_row_bytes(
    sl: PackedRgbLayout,
    dl: PackedRgbLayout,
    src_row: &[u8],
    dst_row: &mut [u8],
    width: usize,
) {
    for (s, d) in src_row
        .chunks_exact(sl.step)
        .zip(dst_row.chunks_exact_mut(dl.step))
        .take(width)
    {
        d[dl.r] = s[sl.r];
        d[dl.g] = s[sl.g];
        d[dl.b] = s[sl.b];
        if let Some(da) = dl.a {
            d[da] = match sl.a {
                Some(sa) => s[sa],
                None => 255,
            };
        }
    }
}

fn shuffle_row_wide<const SRC_BE: bool, const DST_BE: bool>(
    sl: PackedRgbLayout,
    dl: PackedRgbLayout,
    src_row: &[u8],
    dst_row: &mut [u8],
    width: usize,
) {
    for x in 0..width {
        let s = &src_row[x * sl.step * 2..];
        let d = &mut dst_row[x * dl.step * 2..];
        put_u16::<DST_BE>(d, dl.r, get_u16::<SRC_BE>(s, sl.r));
        put_u16::<DST_BE>(d, dl.g, get_u16::<SRC_BE>(s, sl.g));
        put_u16::<DST_BE>(d, dl.b, get_u16::<SRC_BE>(s, sl.b));
        if let Some(da) = dl.a {
            let a = match sl.a {
                Some(sa) => get_u16::<SRC_BE>(s, sa),
                None => 0xFFFF,
            };
            put_u16::<DST_BE>(d, da, a);
        }
    }
}

/// Channel reordering between packed RGB layouts of equal component size.
///
/// Handles 3 and 4 channel combinations in both directions; a missing
/// source alpha becomes fully opaque. Byte order of 16-bit components is
/// converted on the fly.
pub(crate) struct RgbShuffle {
    pub wide: bool,
    pub src_be: bool,
    pub dst_be: bool,
}

impl SliceConvert for RgbShuffle {
    fn name(&self) -> &'static str {
        "rgb_shuffle"
    }

    fn convert_slice(
        &self,
        ctx: &ConvertContext,
        src: &SourceSlice,
        slice_y: usize,
        slice_h: usize,
        dst: &mut DestSlice,
    ) -> usize {
        let sl = match ctx.src_format.packed_rgb_layout() {
            Some(l) => l,
            None => panic!("Shuffle requires a packed RGB source"),
        };
        let dl = match ctx.dst_format.packed_rgb_layout() {
            Some(l) => l,
            None => panic!("Shuffle requires a packed RGB destination"),
        };
        let src_plane = src.plane(0);
        let src_stride = src.strides[0];
        let dst_stride = dst.strides[0];
        let dst_plane = dst.plane_mut(0);

        for (src_row, dst_row) in
            rows(src_plane, src_stride, 0, slice_h).zip(rows_mut(dst_plane, dst_stride, slice_y, slice_h))
        {
            if !self.wide {
                shuffle_row_bytes(sl, dl, src_row, dst_row, ctx.width);
            } else {
                match (self.src_be, self.dst_be) {
                    (false, false) => {
                        shuffle_row_wide::<false, false>(sl, dl, src_row, dst_row, ctx.width)
                    }
                    (false, true) => {
                        shuffle_row_wide::<false, true>(sl, dl, src_row, dst_row, ctx.width)
                    }
                    (true, false) => {
                        shuffle_row_wide::<true, false>(sl, dl, src_row, dst_row, ctx.width)
                    }
                    (true, true) => {
                        shuffle_row_wide::<true, true>(sl, dl, src_row, dst_row, ctx.width)
                    }
                }
            }
        }
        slice_h
    }
}
