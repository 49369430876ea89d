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
use crate::rw::{get_u16, put_u16};
use crate::slice::{rows, rows_mut, DestSlice, SourceSlice};

// Planar RGB keeps its planes in G, B, R (, A) order.
const PLANE_G: usize = 0;
const PLANE_B: usize = 1;
const PLANE_R: usize = 2;
const PLANE_A: usize = 3;

/// Packed RGB to planar G/B/R(/A).
///
/// Wide sources are truncated down to the destination depth; a missing
/// source alpha fills the alpha plane with full scale.
pub(crate) struct PackedToPlanarRgb {
    pub wide: bool,
    pub src_be: bool,
    pub dst_be: bool,
}

impl SliceConvert for PackedToPlanarRgb {
    fn name(&self) -> &'static str {
        "packed_to_planar_rgb"
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
            None => panic!("Packed RGB source required here"),
        };
        let dd = ctx.dst_format.describe();
        let shift = 16 - dd.depth[0] as u32;
        let src_plane = src.plane(0);
        let src_stride = src.strides[0];
        let strides = dst.strides;
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
            .map(|p| rows_mut(p, strides[PLANE_A], slice_y, slice_h));

        for (((src_row, g_row), b_row), r_row) in rows(src_plane, src_stride, 0, slice_h)
            .zip(rows_mut(g_p, strides[PLANE_G], slice_y, slice_h))
            .zip(rows_mut(b_p, strides[PLANE_B], slice_y, slice_h))
            .zip(rows_mut(r_p, strides[PLANE_R], slice_y, slice_h))
        {
            let mut a_row = a_rows.as_mut().and_then(|it| it.next());
            if !self.wide {
                for x in 0..ctx.width {
                    let s = &src_row[x * sl.step..];
                    g_row[x] = s[sl.g];
                    b_row[x] = s[sl.b];
                    r_row[x] = s[sl.r];
                    if let Some(a_row) = a_row.as_deref_mut() {
                        a_row[x] = match sl.a {
                            Some(sa) => s[sa],
                            None => 255,
                        };
                    }
                }
            } else {
                for x in 0..ctx.width {
                    let s = &src_row[x * sl.step * 2..];
                    let load = |idx: usize| -> u16 {
                        if self.src_be {
                            get_u16::<true>(s, idx)
                        } else {
                            get_u16::<false>(s, idx)
                        }
                    };
                    let store = |row: &mut [u8], v: u16| {
                        if self.dst_be {
                            put_u16::<true>(row, x, v)
                        } else {
                            put_u16::<false>(row, x, v)
                        }
                    };
                    store(g_row, load(sl.g) >> shift);
                    store(b_row, load(sl.b) >> shift);
                    store(r_row, load(sl.r) >> shift);
                    if let Some(a_row) = a_row.as_deref_mut() {
                        let a = match sl.a {
                            Some(sa) => load(sa) >> shift,
                            None => 0xFFFF >> shift,
                        };
                        store(a_row, a);
                    }
                }
            }
        }
        slice_h
    }
}

/// Planar G/B/R(/A) to packed RGB.
///
/// Components below 16 bits are widened by bit replication so full scale
/// maps to full scale; a missing alpha plane becomes fully opaque.
pub(crate) struct PlanarRgbToPacked {
    pub wide: bool,
    pub src_be: bool,
    pub dst_be: bool,
}

impl SliceConvert for PlanarRgbToPacked {
    fn name(&self) -> &'static str {
        "planar_rgb_to_packed"
    }

    fn convert_slice(
        &self,
        ctx: &ConvertContext,
        src: &SourceSlice,
        slice_y: usize,
        slice_h: usize,
        dst: &mut DestSlice,
    ) -> usize {
        let dl = match ctx.dst_format.packed_rgb_layout() {
            Some(l) => l,
            None => panic!("Packed RGB destination required here"),
        };
        let sd = ctx.src_format.describe();
        let bpp = sd.depth[0] as u32;
        let scale_high = 16 - bpp;
        let scale_low = (bpp - 8) * 2;
        let src_has_alpha = sd.alpha && src.has_plane(PLANE_A);

        let dst_stride = dst.strides[0];
        let dst_plane = dst.plane_mut(0);
        let g = src.plane(PLANE_G);
        let b = src.plane(PLANE_B);
        let r = src.plane(PLANE_R);

        for (i, dst_row) in rows_mut(dst_plane, dst_stride, slice_y, slice_h).enumerate() {
            let g_row = &g[i * src.strides[PLANE_G]..];
            let b_row = &b[i * src.strides[PLANE_B]..];
            let r_row = &r[i * src.strides[PLANE_R]..];
            if !self.wide {
                for x in 0..ctx.width {
                    let d = &mut dst_row[x * dl.step..];
                    d[dl.g] = g_row[x];
                    d[dl.b] = b_row[x];
                    d[dl.r] = r_row[x];
                    if let Some(da) = dl.a {
                        d[da] = if src_has_alpha {
                            src.plane(PLANE_A)[i * src.strides[PLANE_A] + x]
                        } else {
                            255
                        };
                    }
                }
            } else {
                let widen = |row: &[u8], x: usize| -> u16 {
                    let v = if self.src_be {
                        get_u16::<true>(row, x)
                    } else {
                        get_u16::<false>(row, x)
                    } as u32;
                    ((v << scale_high) | (v >> scale_low)) as u16
                };
                for x in 0..ctx.width {
                    let d = &mut dst_row[x * dl.step * 2..];
                    let store = |d: &mut [u8], idx: usize, v: u16| {
                        if self.dst_be {
                            put_u16::<true>(d, idx, v)
                        } else {
                            put_u16::<false>(d, idx, v)
                        }
                    };
                    store(d, dl.g, widen(g_row, x));
                    store(d, dl.b, widen(b_row, x));
                    store(d, dl.r, widen(r_row, x));
                    if let Some(da) = dl.a {
                        let a = if src_has_alpha {
                            widen(&src.plane(PLANE_A)[i * src.strides[PLANE_A]..], x)
                        } else {
                            0xFFFF
                        };
                        store(d, da, a);
                    }
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

    #[test]
    fn rgb24_to_gbrp() {
        let ctx = ConvertContext::new(PixelFormat::Rgb24, PixelFormat::Gbrp, 2, 1).unwrap();
        let packed = vec![10u8, 20, 30, 40, 50, 60];
        let mut g = vec![0u8; 2];
        let mut b = vec![0u8; 2];
        let mut r = vec![0u8; 2];
        let src = SourceSlice::single(&packed, 6);
        let mut dst = DestSlice {
            planes: [Some(&mut g), Some(&mut b), Some(&mut r), None],
            strides: [2, 2, 2, 0],
        };
        PackedToPlanarRgb {
            wide: false,
            src_be: false,
            dst_be: false,
        }
        .convert_slice(&ctx, &src, 0, 1, &mut dst);
        assert_eq!(r, vec![10, 40]);
        assert_eq!(g, vec![20, 50]);
        assert_eq!(b, vec![30, 60]);
    }

    #[test]
    fn bgra_to_gbrap_keeps_alpha() {
        let ctx = ConvertContext::new(PixelFormat::Bgra, PixelFormat::Gbrap, 1, 1).unwrap();
        let packed = vec![1u8, 2, 3, 4];
        let mut g = vec![0u8; 1];
        let mut b = vec![0u8; 1];
        let mut r = vec![0u8; 1];
        let mut a = vec![0u8; 1];
        let src = SourceSlice::single(&packed, 4);
        let mut dst = DestSlice {
            planes: [Some(&mut g), Some(&mut b), Some(&mut r), Some(&mut a)],
            strides: [1, 1, 1, 1],
        };
        PackedToPlanarRgb {
            wide: false,
            src_be: false,
            dst_be: false,
        }
        .convert_slice(&ctx, &src, 0, 1, &mut dst);
        assert_eq!((b[0], g[0], r[0], a[0]), (1, 2, 3, 4));
    }

    #[test]
    fn rgb48_to_gbrp10_truncates() {
        let ctx =
            ConvertContext::new(PixelFormat::Rgb48Le, PixelFormat::Gbrp10Le, 1, 1).unwrap();
        let mut packed = vec![0u8; 6];
        put_u16::<false>(&mut packed, 0, 0xFFFF);
        put_u16::<false>(&mut packed, 1, 0x8000);
        put_u16::<false>(&mut packed, 2, 0x003F);
        let mut g = vec![0u8; 2];
        let mut b = vec![0u8; 2];
        let mut r = vec![0u8; 2];
        let src = SourceSlice::single(&packed, 6);
        let mut dst = DestSlice {
            planes: [Some(&mut g), Some(&mut b), Some(&mut r), None],
            strides: [2, 2, 2, 0],
        };
        PackedToPlanarRgb {
            wide: true,
            src_be: false,
            dst_be: false,
        }
        .convert_slice(&ctx, &src, 0, 1, &mut dst);
        assert_eq!(get_u16::<false>(&r, 0), 0x3FF);
        assert_eq!(get_u16::<false>(&g, 0), 0x200);
        assert_eq!(get_u16::<false>(&b, 0), 0);
    }

    #[test]
    fn gbrp10_to_rgb48_replicates_to_full_scale() {
        let ctx =
            ConvertContext::new(PixelFormat::Gbrp10Le, PixelFormat::Rgb48Le, 1, 1).unwrap();
        let mut g = vec![0u8; 2];
        let mut b = vec![0u8; 2];
        let mut r = vec![0u8; 2];
        put_u16::<false>(&mut g, 0, 0x3FF);
        put_u16::<false>(&mut b, 0, 0);
        put_u16::<false>(&mut r, 0, 0x200);
        let mut packed = vec![0u8; 6];
        let src = SourceSlice {
            planes: [Some(&g), Some(&b), Some(&r), None],
            strides: [2, 2, 2, 0],
        };
        let mut dst = DestSlice::single(&mut packed, 6);
        PlanarRgbToPacked {
            wide: true,
            src_be: false,
            dst_be: false,
        }
        .convert_slice(&ctx, &src, 0, 1, &mut dst);
        assert_eq!(get_u16::<false>(&packed, 1), 0xFFFF); // green at full scale
        assert_eq!(get_u16::<false>(&packed, 2), 0);
        assert_eq!(get_u16::<false>(&packed, 0), (0x200 << 6) | (0x200 >> 4));
    }

    #[test]
    fn gbrap_to_argb_places_alpha_first() {
        let ctx = ConvertContext::new(PixelFormat::Gbrap, PixelFormat::Argb, 1, 1).unwrap();
        let g = vec![2u8];
        let b = vec![3u8];
        let r = vec![1u8];
        let a = vec![9u8];
        let mut packed = vec![0u8; 4];
        let src = SourceSlice {
            planes: [Some(&g), Some(&b), Some(&r), Some(&a)],
            strides: [1, 1, 1, 1],
        };
        let mut dst = DestSlice::single(&mut packed, 4);
        PlanarRgbToPacked {
            wide: false,
            src_be: false,
            dst_be: false,
        }
        .convert_slice(&ctx, &src, 0, 1, &mut dst);
        assert_eq!(packed, vec![9, 1, 2, 3]);
    }

    #[test]
    fn gbrp_to_rgba_fills_opaque_alpha() {
        let ctx = ConvertContext::new(PixelFormat::Gbrp, PixelFormat::Rgba, 1, 1).unwrap();
        let g = vec![20u8];
        let b = vec![30u8];
        let r = vec![10u8];
        let mut packed = vec![0u8; 4];
        let src = SourceSlice {
            planes: [Some(&g), Some(&b), Some(&r), None],
            strides: [1, 1, 1, 0],
        };
        let mut dst = DestSlice::single(&mut packed, 4);
        PlanarRgbToPacked {
            wide: false,
            src_be: false,
            dst_be: false,
        }
        .convert_slice(&ctx, &src, 0, 1, &mut dst);
        assert_eq!(packed, vec![10, 20, 30, 255]);
    }
}
