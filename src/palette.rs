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

/// Palette expansion to packed byte RGB.
///
/// For `Pal8` the pixel value indexes a 256-entry RGBA table set on the
/// context. `Ya8` is treated as a gray ramp with per-pixel alpha: the
/// luma byte indexes the table (or an identity ramp when no table was
/// supplied) and the second byte replaces the entry's alpha.
pub(crate) struct PaletteExpand {
    pub pixel_alpha: bool,
}

impl PaletteExpand {
    #[inline]
    fn entry(ctx: &ConvertContext, index: u8) -> [u8; 4] {
        match ctx.palette() {
            Some(pal) => {
                let e = &pal[index as usize * 4..index as usize * 4 + 4];
                [e[0], e[1], e[2], e[3]]
            }
            None => [index, index, index, 255],
        }
    }
}

impl SliceConvert for PaletteExpand {
    fn name(&self) -> &'static str {
        "pal8_to_packed_rgb"
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
            None => panic!("Palette expansion requires a packed RGB destination"),
        };
        let src_step = if self.pixel_alpha { 2 } else { 1 };
        let src_plane = src.plane(0);
        let src_stride = src.strides[0];
        let dst_stride = dst.strides[0];
        let dst_plane = dst.plane_mut(0);

        for (src_row, dst_row) in rows(src_plane, src_stride, 0, slice_h)
            .zip(rows_mut(dst_plane, dst_stride, slice_y, slice_h))
        {
            for (s, d) in src_row
                .chunks_exact(src_step)
                .zip(dst_row.chunks_exact_mut(layout.step))
                .take(ctx.width)
            {
                let e = Self::entry(ctx, s[0]);
                d[layout.r] = e[0];
                d[layout.g] = e[1];
                d[layout.b] = e[2];
                if let Some(a) = layout.a {
                    d[a] = if self.pixel_alpha { s[1] } else { e[3] };
                }
            }
        }
        slice_h
    }
}

/// Palette expansion to planar G/B/R(/A).
///
/// Table lookup rules are the same as [`PaletteExpand`], the entries are
/// just scattered into the destination planes instead of interleaved.
pub(crate) struct PaletteToPlanarRgb {
    pub pixel_alpha: bool,
}

impl SliceConvert for PaletteToPlanarRgb {
    fn name(&self) -> &'static str {
        "pal8_to_planar_rgb"
    }

    fn convert_slice(
        &self,
        ctx: &ConvertContext,
        src: &SourceSlice,
        slice_y: usize,
        slice_h: usize,
        dst: &mut DestSlice,
    ) -> usize {
        let src_step = if self.pixel_alpha { 2 } else { 1 };
        let src_plane = src.plane(0);
        let src_stride = src.strides[0];
        let strides = dst.strides;
        // planar RGB keeps its planes in G, B, R (, A) order
        let [g_p, b_p, r_p, a_p] = &mut dst.planes;
        let g_p = match g_p.as_deref_mut() {
            Some(p) => p,
            None => panic!("Destination plane 0 must be present here"),
        };
        let b_p = match b_p.as_deref_mut() {
            Some(p) => p,
            None => panic!("Destination plane 1 must be present here"),
        };
        let r_p = match r_p.as_deref_mut() {
            Some(p) => p,
            None => panic!("Destination plane 2 must be present here"),
        };
        let mut a_rows = a_p
            .as_deref_mut()
            .map(|p| rows_mut(p, strides[3], slice_y, slice_h));

        for (((src_row, g_row), b_row), r_row) in rows(src_plane, src_stride, 0, slice_h)
            .zip(rows_mut(g_p, strides[0], slice_y, slice_h))
            .zip(rows_mut(b_p, strides[1], slice_y, slice_h))
            .zip(rows_mut(r_p, strides[2], slice_y, slice_h))
        {
            let mut a_row = a_rows.as_mut().and_then(|it| it.next());
            for (x, s) in src_row.chunks_exact(src_step).take(ctx.width).enumerate() {
                let e = PaletteExpand::entry(ctx, s[0]);
                r_row[x] = e[0];
                g_row[x] = e[1];
                b_row[x] = e[2];
                if let Some(a_row) = a_row.as_deref_mut() {
                    a_row[x] = if self.pixel_alpha { s[1] } else { e[3] };
                }
            }
        }
        slice_h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pix_fmt::PixelFormat;

    fn two_entry_palette() -> [u8; 1024] {
        let mut pal = [0u8; 1024];
        pal[0..4].copy_from_slice(&[10, 20, 30, 200]);
        pal[4..8].copy_from_slice(&[40, 50, 60, 100]);
        pal
    }

    #[test]
    fn pal8_to_bgra_uses_table_entries() {
        let mut ctx =
            ConvertContext::new(PixelFormat::Pal8, PixelFormat::Bgra, 2, 1).unwrap();
        ctx.set_palette(&two_entry_palette());
        let indices = [0u8, 1];
        let mut out = [0u8; 8];
        let src = SourceSlice::single(&indices, 2);
        let mut dst = DestSlice::single(&mut out, 8);
        PaletteExpand { pixel_alpha: false }.convert_slice(&ctx, &src, 0, 1, &mut dst);
        assert_eq!(out, [30, 20, 10, 200, 60, 50, 40, 100]);
    }

    #[test]
    fn pal8_to_rgb24_drops_alpha() {
        let mut ctx =
            ConvertContext::new(PixelFormat::Pal8, PixelFormat::Rgb24, 2, 1).unwrap();
        ctx.set_palette(&two_entry_palette());
        let indices = [1u8, 0];
        let mut out = [0u8; 6];
        let src = SourceSlice::single(&indices, 2);
        let mut dst = DestSlice::single(&mut out, 6);
        PaletteExpand { pixel_alpha: false }.convert_slice(&ctx, &src, 0, 1, &mut dst);
        assert_eq!(out, [40, 50, 60, 10, 20, 30]);
    }

    #[test]
    fn ya8_uses_gray_ramp_and_pixel_alpha() {
        let ctx = ConvertContext::new(PixelFormat::Ya8, PixelFormat::Rgba, 2, 1).unwrap();
        let pixels = [120u8, 7, 200, 255];
        let mut out = [0u8; 8];
        let src = SourceSlice::single(&pixels, 4);
        let mut dst = DestSlice::single(&mut out, 8);
        PaletteExpand { pixel_alpha: true }.convert_slice(&ctx, &src, 0, 1, &mut dst);
        assert_eq!(out, [120, 120, 120, 7, 200, 200, 200, 255]);
    }

    #[test]
    fn pal8_to_gbrp_scatters_the_planes() {
        let mut ctx =
            ConvertContext::new(PixelFormat::Pal8, PixelFormat::Gbrp, 2, 1).unwrap();
        ctx.set_palette(&two_entry_palette());
        let indices = [0u8, 1];
        let mut g = [0u8; 2];
        let mut b = [0u8; 2];
        let mut r = [0u8; 2];
        let src = SourceSlice::single(&indices, 2);
        let mut dst = DestSlice {
            planes: [Some(&mut g), Some(&mut b), Some(&mut r), None],
            strides: [2, 2, 2, 0],
        };
        PaletteToPlanarRgb { pixel_alpha: false }.convert_slice(&ctx, &src, 0, 1, &mut dst);
        assert_eq!(r, [10, 40]);
        assert_eq!(g, [20, 50]);
        assert_eq!(b, [30, 60]);
    }

    #[test]
    fn ya8_to_gbrap_keeps_pixel_alpha() {
        let ctx = ConvertContext::new(PixelFormat::Ya8, PixelFormat::Gbrap, 2, 1).unwrap();
        let pixels = [120u8, 7, 200, 255];
        let mut g = [0u8; 2];
        let mut b = [0u8; 2];
        let mut r = [0u8; 2];
        let mut a = [0u8; 2];
        let src = SourceSlice::single(&pixels, 4);
        let mut dst = DestSlice {
            planes: [Some(&mut g), Some(&mut b), Some(&mut r), Some(&mut a)],
            strides: [2, 2, 2, 2],
        };
        PaletteToPlanarRgb { pixel_alpha: true }.convert_slice(&ctx, &src, 0, 1, &mut dst);
        assert_eq!(r, [120, 200]);
        assert_eq!(a, [7, 255]);
    }
}
