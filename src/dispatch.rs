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
use crate::bayer::{BayerToRgb, BayerToYuv420};
use crate::bswap::EndianSwap;
use crate::context::{ConvertContext, DitherMode};
use crate::copy::{PackedCopy, PlanarCopy};
use crate::error::{ConvertError, MismatchedSize};
use crate::gray_float::{FloatToGray, GrayToFloat};
use crate::nv::{Nv24ToYuv420, NvToPlanar, PlanarToNv, YuvNVOrder};
use crate::p01x::{Planar8ToP010, PlanarToP01x};
use crate::palette::{PaletteExpand, PaletteToPlanarRgb};
use crate::pix_fmt::PixelFormat;
use crate::rgb_packed::RgbShuffle;
use crate::rgb_planar::{PackedToPlanarRgb, PlanarRgbToPacked};
use crate::rgb_to_yuv::RgbToYuv420;
use crate::slice::{chroma_extent, DestSlice, SourceSlice};
use crate::yuv_to_rgb::YuvToRgb;
use crate::yuy2::{PlanarToYuy2, Yuy2ToPlanar, Yuy2Variant};

/// One selected conversion path.
///
/// Source planes are expected to start at the first row of the slice;
/// destination planes always point at the frame origin and the
/// implementation offsets them by `slice_y` itself.
pub trait SliceConvert: Send + Sync {
    fn name(&self) -> &'static str;

    /// Converts `slice_h` rows starting at absolute row `slice_y` and
    /// returns the number of rows written.
    fn convert_slice(
        &self,
        ctx: &ConvertContext,
        src: &SourceSlice,
        slice_y: usize,
        slice_h: usize,
        dst: &mut DestSlice,
    ) -> usize;

    /// Required alignment of `slice_y` (and of every slice height except
    /// the one touching the bottom of the frame).
    fn slice_align(&self) -> usize {
        1
    }

    /// Whether absent source planes are tolerated and synthesized.
    fn allows_missing_src_planes(&self) -> bool {
        false
    }
}

#[inline]
fn nv_order(fmt: PixelFormat) -> YuvNVOrder {
    if fmt.has_swapped_chroma() {
        YuvNVOrder::VU
    } else {
        YuvNVOrder::UV
    }
}

#[inline]
fn is_byte_packed_rgb(fmt: PixelFormat) -> bool {
    fmt.packed_rgb_layout().is_some() && fmt.describe().component_bytes() == 1
}

#[inline]
fn is_wide_packed_rgb(fmt: PixelFormat) -> bool {
    fmt.packed_rgb_layout().is_some() && fmt.describe().component_bytes() == 2
}

#[inline]
fn is_wide_planar_rgb(fmt: PixelFormat) -> bool {
    fmt.is_planar_rgb() && !fmt.is_float() && fmt.describe().component_bytes() == 2
}

/// Walks the ordered rule list and returns the conversion path for the
/// context, if any. Later rules override earlier ones, so the most
/// specific paths are listed first and the generic copies last.
pub(crate) fn select_converter(ctx: &ConvertContext) -> Option<Box<dyn SliceConvert>> {
    use PixelFormat::*;
    let src = ctx.src_format;
    let dst = ctx.dst_format;
    let sd = src.describe();
    let dd = dst.describe();
    let mut conv: Option<Box<dyn SliceConvert>> = None;

    // planar chroma to interleaved chroma and back
    if matches!(src, Yuv420 | Yuva420) && matches!(dst, Nv12 | Nv21) {
        conv = Some(Box::new(PlanarToNv {
            order: nv_order(dst),
            full_chroma: false,
        }));
    }
    if matches!(src, Yuv444 | Yuva444) && matches!(dst, Nv24 | Nv42) {
        conv = Some(Box::new(PlanarToNv {
            order: nv_order(dst),
            full_chroma: true,
        }));
    }
    if matches!(src, Nv12 | Nv21) && matches!(dst, Yuv420 | Yuva420) {
        conv = Some(Box::new(NvToPlanar {
            order: nv_order(src),
            full_chroma: false,
        }));
    }
    if matches!(src, Nv24 | Nv42) && matches!(dst, Yuv444 | Yuva444) {
        conv = Some(Box::new(NvToPlanar {
            order: nv_order(src),
            full_chroma: true,
        }));
    }

    // direct planar YUV decode to packed RGB
    if matches!(src, Yuv420 | Yuva420 | Yuv422 | Yuv444 | Yuva444)
        && is_byte_packed_rgb(dst)
        && !ctx.accurate_rounding
        && matches!(ctx.dither, DitherMode::Auto | DitherMode::Bayer)
        && ctx.height & 1 == 0
    {
        conv = Some(Box::new(YuvToRgb::new(ctx)));
    }

    // high bit depth 4:2:0 into the P01x layouts
    if matches!(
        src,
        Yuv420P10Le | Yuv420P10Be | Yuv420P12Le | Yuv420P12Be | Yuv420P16Le | Yuv420P16Be
    ) && matches!(dst, P010Le | P016Le)
    {
        conv = Some(Box::new(PlanarToP01x {
            src_be: sd.big_endian,
        }));
    }
    if matches!(src, Yuv420 | Yuva420) && matches!(dst, P010Le | P016Le) {
        conv = Some(Box::new(Planar8ToP010));
    }

    // packed byte RGB down to planar 4:2:0
    if matches!(src, Bgr24 | Rgb24)
        && matches!(dst, Yuv420 | Yuva420)
        && !ctx.accurate_rounding
        && ctx.width & 1 == 0
    {
        conv = Some(Box::new(RgbToYuv420::new(ctx)));
    }

    // packed RGB channel reorders of equal component size
    if src.packed_rgb_layout().is_some()
        && dst.packed_rgb_layout().is_some()
        && sd.component_bytes() == dd.component_bytes()
    {
        conv = Some(Box::new(RgbShuffle {
            wide: sd.component_bytes() == 2,
            src_be: sd.big_endian,
            dst_be: dd.big_endian,
        }));
    }

    // planar RGB gaining or dropping the alpha plane
    if src.is_planar_rgb()
        && dst.is_planar_rgb()
        && !sd.float
        && !dd.float
        && sd.depth[0] == dd.depth[0]
        && sd.big_endian == dd.big_endian
    {
        conv = Some(Box::new(PlanarCopy { log2_ch: 0 }));
    }

    // byte packed RGB to and from planar byte RGB
    if is_byte_packed_rgb(src) && matches!(dst, Gbrp | Gbrap) {
        conv = Some(Box::new(PackedToPlanarRgb {
            wide: false,
            src_be: false,
            dst_be: false,
        }));
    }
    if matches!(src, Gbrp | Gbrap) && is_byte_packed_rgb(dst) {
        conv = Some(Box::new(PlanarRgbToPacked {
            wide: false,
            src_be: false,
            dst_be: false,
        }));
    }

    // wide packed RGB to and from wide planar RGB
    if is_wide_packed_rgb(src) && is_wide_planar_rgb(dst) {
        conv = Some(Box::new(PackedToPlanarRgb {
            wide: true,
            src_be: sd.big_endian,
            dst_be: dd.big_endian,
        }));
    }
    if is_wide_planar_rgb(src) && is_wide_packed_rgb(dst) {
        conv = Some(Box::new(PlanarRgbToPacked {
            wide: true,
            src_be: sd.big_endian,
            dst_be: dd.big_endian,
        }));
    }

    // demosaicing works in 2x2 cells, odd frames have no rule
    if let (Some(pattern), true) = (sd.bayer, ctx.width & 1 == 0 && ctx.height & 1 == 0) {
        match dst {
            Rgb24 => {
                conv = Some(Box::new(BayerToRgb {
                    pattern,
                    src_wide: sd.component_bytes() == 2,
                    dst_wide: false,
                    src_be: sd.big_endian,
                    dst_be: false,
                }));
            }
            Rgb48Le | Rgb48Be => {
                if sd.component_bytes() == 2 {
                    conv = Some(Box::new(BayerToRgb {
                        pattern,
                        src_wide: true,
                        dst_wide: true,
                        src_be: sd.big_endian,
                        dst_be: dd.big_endian,
                    }));
                }
            }
            Yuv420 => {
                conv = Some(Box::new(BayerToYuv420::new(
                    ctx,
                    pattern,
                    sd.component_bytes() == 2,
                    sd.big_endian,
                )));
            }
            _ => {}
        }
    }

    // opposite-endian twins
    if src.swapped_endian() == Some(dst) {
        conv = Some(Box::new(EndianSwap {
            elem_bytes: if sd.float { 4 } else { 2 },
        }));
    }

    // palette indexed sources
    if src.uses_palette() && is_byte_packed_rgb(dst) {
        conv = Some(Box::new(PaletteExpand {
            pixel_alpha: src == Ya8,
        }));
    }
    if src.uses_palette() && matches!(dst, Gbrp | Gbrap) {
        conv = Some(Box::new(PaletteToPlanarRgb {
            pixel_alpha: src == Ya8,
        }));
    }

    // planar 4:2:2 to packed 4:2:2
    if src == Yuv422 {
        if dst == Yuyv422 {
            conv = Some(Box::new(PlanarToYuy2 {
                variant: Yuy2Variant::Yuyv,
                vertical_sub: false,
            }));
        } else if dst == Uyvy422 {
            conv = Some(Box::new(PlanarToYuy2 {
                variant: Yuy2Variant::Uyvy,
                vertical_sub: false,
            }));
        }
    }

    // gray to and from normalized float
    if src == Gray8 && matches!(dst, GrayF32Le | GrayF32Be) {
        conv = Some(Box::new(GrayToFloat::new(dd.big_endian)));
    }
    if matches!(src, GrayF32Le | GrayF32Be) && dst == Gray8 {
        conv = Some(Box::new(FloatToGray {
            src_be: sd.big_endian,
        }));
    }

    // low quality chroma row duplication, only when asked for
    if ctx.fast_mode && matches!(src, Yuv420 | Yuva420) {
        if dst == Yuyv422 {
            conv = Some(Box::new(PlanarToYuy2 {
                variant: Yuy2Variant::Yuyv,
                vertical_sub: true,
            }));
        } else if dst == Uyvy422 {
            conv = Some(Box::new(PlanarToYuy2 {
                variant: Yuy2Variant::Uyvy,
                vertical_sub: true,
            }));
        }
    }

    // packed 4:2:2 back to planar
    if src == Yuyv422 && matches!(dst, Yuv420 | Yuva420) {
        conv = Some(Box::new(Yuy2ToPlanar {
            variant: Yuy2Variant::Yuyv,
            to_420: true,
        }));
    }
    if src == Uyvy422 && matches!(dst, Yuv420 | Yuva420) {
        conv = Some(Box::new(Yuy2ToPlanar {
            variant: Yuy2Variant::Uyvy,
            to_420: true,
        }));
    }
    if src == Yuyv422 && dst == Yuv422 {
        conv = Some(Box::new(Yuy2ToPlanar {
            variant: Yuy2Variant::Yuyv,
            to_420: false,
        }));
    }
    if src == Uyvy422 && dst == Yuv422 {
        conv = Some(Box::new(Yuy2ToPlanar {
            variant: Yuy2Variant::Uyvy,
            to_420: false,
        }));
    }

    // full resolution interleaved chroma down to 4:2:0
    if matches!(src, Nv24 | Nv42) && dst == Yuv420 {
        conv = Some(Box::new(Nv24ToYuv420 {
            order: nv_order(src),
        }));
    }

    // simple copy
    let simple_planar = sd.float == dd.float
        && ((src.is_planar_yuv() && dst.is_planar_gray())
            || (dst.is_planar_yuv() && src.is_planar_gray())
            || (src.is_planar_gray() && dst.is_planar_gray())
            || (src.is_planar_yuv()
                && dst.is_planar_yuv()
                && sd.log2_chroma_w == dd.log2_chroma_w
                && sd.log2_chroma_h == dd.log2_chroma_h
                && sd.semi_planar == dd.semi_planar
                && src.has_swapped_chroma() == dst.has_swapped_chroma()));
    if src == dst
        || (src == Yuva420 && dst == Yuv420)
        || (src == Yuv420 && dst == Yuva420)
        || simple_planar
    {
        conv = if !sd.planar {
            Some(Box::new(PackedCopy))
        } else {
            Some(Box::new(PlanarCopy {
                log2_ch: sd.log2_chroma_h.max(dd.log2_chroma_h),
            }))
        };
    }

    conv
}

/// Whether a direct conversion path exists between two formats.
pub fn is_conversion_supported(src: PixelFormat, dst: PixelFormat) -> bool {
    match ConvertContext::new(src, dst, 2, 2) {
        Ok(ctx) => select_converter(&ctx).is_some(),
        Err(_) => false,
    }
}

fn required_planes(fmt: PixelFormat) -> usize {
    let d = fmt.describe();
    if !d.planar {
        1
    } else if d.semi_planar {
        2
    } else {
        d.components as usize
    }
}

/// Minimum row bytes and total rows of plane `plane` covering rows
/// `[y, y + h)` of the frame.
fn plane_geometry(
    fmt: PixelFormat,
    width: usize,
    y: usize,
    h: usize,
    plane: usize,
) -> (usize, usize) {
    let d = fmt.describe();
    if !d.planar {
        let row_bytes = (width * fmt.packed_bits_per_pixel() as usize).div_ceil(8);
        return (row_bytes, y + h);
    }
    let unit = d.component_bytes();
    if plane == 1 || plane == 2 {
        let cw = chroma_extent(width, d.log2_chroma_w);
        let rows = chroma_extent(y, d.log2_chroma_h) + chroma_extent(h, d.log2_chroma_h);
        let row_bytes = if d.semi_planar { 2 * cw } else { cw } * unit;
        (row_bytes, rows)
    } else {
        (width * unit, y + h)
    }
}

fn check_plane(
    plane: usize,
    fmt: PixelFormat,
    stride: usize,
    len: usize,
    row_bytes: usize,
    rows: usize,
) -> Result<(), ConvertError> {
    let d = fmt.describe();
    let unit = if d.float { 4 } else { d.component_bytes() };
    if unit > 1 && stride % unit != 0 {
        return Err(ConvertError::UnalignedStride { plane, stride });
    }
    if stride < row_bytes {
        return Err(ConvertError::MinimumStrideSize {
            plane,
            size: MismatchedSize {
                expected: row_bytes,
                received: stride,
            },
        });
    }
    let needed = (rows - 1) * stride + row_bytes;
    if len < needed {
        return Err(ConvertError::MinimumPlaneSize {
            plane,
            size: MismatchedSize {
                expected: needed,
                received: len,
            },
        });
    }
    Ok(())
}

/// A configured conversion between two pixel formats.
///
/// The conversion path is selected once at construction; every call
/// afterwards only validates the slice geometry and runs the kernel.
/// Feeding the frame in independent horizontal slices produces exactly
/// the same output as converting it in one call.
pub struct ConvertSession {
    ctx: ConvertContext,
    converter: Box<dyn SliceConvert>,
}

impl ConvertSession {
    pub fn new(ctx: ConvertContext) -> Result<Self, ConvertError> {
        let converter = match select_converter(&ctx) {
            Some(c) => c,
            None => {
                return Err(ConvertError::UnsupportedConversion(
                    ctx.src_format,
                    ctx.dst_format,
                ))
            }
        };
        if ctx.src_format == PixelFormat::Pal8
            && ctx.palette().is_none()
            && converter.name().starts_with("pal8_to")
        {
            return Err(ConvertError::PaletteRequired);
        }
        Ok(Self { ctx, converter })
    }

    pub fn context(&self) -> &ConvertContext {
        &self.ctx
    }

    /// Identifier of the selected path, mainly for diagnostics.
    pub fn path_name(&self) -> &'static str {
        self.converter.name()
    }

    /// Required alignment for slice starts and non-final slice heights.
    pub fn slice_align(&self) -> usize {
        self.converter.slice_align()
    }

    fn validate(
        &self,
        src: &SourceSlice,
        slice_y: usize,
        slice_h: usize,
        dst: &DestSlice,
    ) -> Result<(), ConvertError> {
        let ctx = &self.ctx;
        if slice_h == 0 || slice_y + slice_h > ctx.height {
            return Err(ConvertError::SliceOutOfBounds {
                slice_y,
                slice_height: slice_h,
                height: ctx.height,
            });
        }
        let align = self.converter.slice_align();
        if slice_y % align != 0 {
            return Err(ConvertError::UnalignedSliceStart {
                alignment: align,
                slice_y,
            });
        }
        if slice_h % align != 0 && slice_y + slice_h != ctx.height {
            return Err(ConvertError::UnalignedSliceStart {
                alignment: align,
                slice_y: slice_y + slice_h,
            });
        }

        let missing_ok = self.converter.allows_missing_src_planes();
        for plane in 0..required_planes(ctx.src_format) {
            match src.planes[plane] {
                None if plane == 0 || !missing_ok => {
                    return Err(ConvertError::MissingPlane(plane))
                }
                None => continue,
                Some(data) => {
                    let (row_bytes, rows) =
                        plane_geometry(ctx.src_format, ctx.width, 0, slice_h, plane);
                    check_plane(
                        plane,
                        ctx.src_format,
                        src.strides[plane],
                        data.len(),
                        row_bytes,
                        rows,
                    )?;
                }
            }
        }
        for plane in 0..required_planes(ctx.dst_format) {
            match &dst.planes[plane] {
                None => return Err(ConvertError::MissingPlane(plane)),
                Some(data) => {
                    let (row_bytes, rows) =
                        plane_geometry(ctx.dst_format, ctx.width, slice_y, slice_h, plane);
                    check_plane(
                        plane,
                        ctx.dst_format,
                        dst.strides[plane],
                        data.len(),
                        row_bytes,
                        rows,
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Converts one horizontal slice. Source planes must start at the
    /// slice's first row; destination planes stay at the frame origin.
    pub fn convert_slice(
        &self,
        src: &SourceSlice,
        slice_y: usize,
        slice_h: usize,
        dst: &mut DestSlice,
    ) -> Result<usize, ConvertError> {
        self.validate(src, slice_y, slice_h, dst)?;
        Ok(self
            .converter
            .convert_slice(&self.ctx, src, slice_y, slice_h, dst))
    }

    /// Converts the whole frame in one slice.
    pub fn convert_frame(
        &self,
        src: &SourceSlice,
        dst: &mut DestSlice,
    ) -> Result<usize, ConvertError> {
        self.convert_slice(src, 0, self.ctx.height, dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(src: PixelFormat, dst: PixelFormat, w: usize, h: usize) -> ConvertSession {
        ConvertSession::new(ConvertContext::new(src, dst, w, h).unwrap()).unwrap()
    }

    #[test]
    fn rule_order_prefers_specific_paths() {
        assert_eq!(
            session(PixelFormat::Yuv422, PixelFormat::Yuyv422, 4, 4).path_name(),
            "planar_to_yuy2"
        );
        assert_eq!(
            session(PixelFormat::Nv12, PixelFormat::Yuv420, 4, 4).path_name(),
            "nv_to_planar"
        );
        assert_eq!(
            session(PixelFormat::Rgb24, PixelFormat::Bgra, 4, 4).path_name(),
            "rgb_shuffle"
        );
    }

    #[test]
    fn endian_pairs_pick_the_right_kernel() {
        // packed RGB pairs go through the dedicated swap
        assert_eq!(
            session(PixelFormat::Rgb48Le, PixelFormat::Rgb48Be, 4, 4).path_name(),
            "endian_swap"
        );
        // planar YUV pairs fall through to the plane copy, which swaps
        // per plane as part of the depth conversion logic
        assert_eq!(
            session(PixelFormat::Yuv420P10Le, PixelFormat::Yuv420P10Be, 4, 4).path_name(),
            "planar_copy"
        );
    }

    #[test]
    fn same_format_is_a_copy() {
        assert_eq!(
            session(PixelFormat::Rgb24, PixelFormat::Rgb24, 4, 4).path_name(),
            "packed_copy"
        );
        assert_eq!(
            session(PixelFormat::Yuv420, PixelFormat::Yuv420, 4, 4).path_name(),
            "planar_copy"
        );
    }

    #[test]
    fn unsupported_pairs_are_rejected() {
        let ctx =
            ConvertContext::new(PixelFormat::BayerRggb8, PixelFormat::Nv12, 4, 4).unwrap();
        assert!(matches!(
            ConvertSession::new(ctx),
            Err(ConvertError::UnsupportedConversion(_, _))
        ));
    }

    #[test]
    fn pal8_without_palette_is_rejected() {
        let ctx = ConvertContext::new(PixelFormat::Pal8, PixelFormat::Rgb24, 4, 4).unwrap();
        assert!(matches!(
            ConvertSession::new(ctx),
            Err(ConvertError::PaletteRequired)
        ));
    }

    #[test]
    fn missing_destination_plane_is_reported() {
        let s = session(PixelFormat::Yuv420, PixelFormat::Nv12, 4, 4);
        let y = vec![0u8; 16];
        let u = vec![0u8; 4];
        let v = vec![0u8; 4];
        let mut dy = vec![0u8; 16];
        let src = SourceSlice {
            planes: [Some(&y), Some(&u), Some(&v), None],
            strides: [4, 2, 2, 0],
        };
        let mut dst = DestSlice {
            planes: [Some(&mut dy), None, None, None],
            strides: [4, 4, 0, 0],
        };
        assert_eq!(
            s.convert_frame(&src, &mut dst),
            Err(ConvertError::MissingPlane(1))
        );
    }

    #[test]
    fn undersized_stride_is_reported() {
        let s = session(PixelFormat::Rgb24, PixelFormat::Rgb24, 4, 2);
        let input = vec![0u8; 24];
        let mut out = vec![0u8; 24];
        let src = SourceSlice::single(&input, 8);
        let mut dst = DestSlice::single(&mut out, 12);
        assert!(matches!(
            s.convert_frame(&src, &mut dst),
            Err(ConvertError::MinimumStrideSize { plane: 0, .. })
        ));
    }

    #[test]
    fn odd_stride_on_wide_format_is_rejected() {
        let s = session(PixelFormat::Gray16Le, PixelFormat::Gray16Be, 2, 2);
        let input = vec![0u8; 10];
        let mut out = vec![0u8; 10];
        let src = SourceSlice::single(&input, 5);
        let mut dst = DestSlice::single(&mut out, 5);
        assert!(matches!(
            s.convert_frame(&src, &mut dst),
            Err(ConvertError::UnalignedStride { plane: 0, stride: 5 })
        ));
    }

    #[test]
    fn slice_bounds_and_alignment_are_checked() {
        let s = session(PixelFormat::Yuv420, PixelFormat::Nv12, 4, 4);
        let y = vec![0u8; 16];
        let u = vec![0u8; 4];
        let v = vec![0u8; 4];
        let mut dy = vec![0u8; 16];
        let mut duv = vec![0u8; 8];
        let src = SourceSlice {
            planes: [Some(&y), Some(&u), Some(&v), None],
            strides: [4, 2, 2, 0],
        };
        let mut dst = DestSlice {
            planes: [Some(&mut dy), Some(&mut duv), None, None],
            strides: [4, 4, 0, 0],
        };
        assert!(matches!(
            s.convert_slice(&src, 2, 4, &mut dst),
            Err(ConvertError::SliceOutOfBounds { .. })
        ));
        assert!(matches!(
            s.convert_slice(&src, 1, 2, &mut dst),
            Err(ConvertError::UnalignedSliceStart { alignment: 2, .. })
        ));
    }

    #[test]
    fn slicing_matches_whole_frame_conversion() {
        let width = 4usize;
        let height = 4usize;
        let s = session(PixelFormat::Yuv420, PixelFormat::Nv12, width, height);
        let y: Vec<u8> = (0..16).map(|v| v * 3 + 10).collect();
        let u = vec![1u8, 2, 3, 4];
        let v = vec![5u8, 6, 7, 8];

        let mut whole_y = vec![0u8; 16];
        let mut whole_uv = vec![0u8; 8];
        {
            let src = SourceSlice {
                planes: [Some(&y), Some(&u), Some(&v), None],
                strides: [4, 2, 2, 0],
            };
            let mut dst = DestSlice {
                planes: [Some(&mut whole_y), Some(&mut whole_uv), None, None],
                strides: [4, 4, 0, 0],
            };
            s.convert_frame(&src, &mut dst).unwrap();
        }

        let mut sliced_y = vec![0u8; 16];
        let mut sliced_uv = vec![0u8; 8];
        for start in [0usize, 2] {
            let src = SourceSlice {
                planes: [Some(&y[start * 4..]), Some(&u[start..]), Some(&v[start..])
                    , None],
                strides: [4, 2, 2, 0],
            };
            let mut dst = DestSlice {
                planes: [Some(&mut sliced_y), Some(&mut sliced_uv), None, None],
                strides: [4, 4, 0, 0],
            };
            s.convert_slice(&src, start, 2, &mut dst).unwrap();
        }
        assert_eq!(whole_y, sliced_y);
        assert_eq!(whole_uv, sliced_uv);
    }

    #[test]
    fn support_probe_matches_selection() {
        assert!(is_conversion_supported(
            PixelFormat::Yuv420,
            PixelFormat::Rgb24
        ));
        assert!(is_conversion_supported(
            PixelFormat::BayerBggr16Le,
            PixelFormat::Rgb48Le
        ));
        assert!(!is_conversion_supported(
            PixelFormat::Pal8,
            PixelFormat::Yuv420
        ));
    }

    #[test]
    fn bayer_paths_cover_every_output() {
        assert_eq!(
            session(PixelFormat::BayerBggr16Le, PixelFormat::Rgb24, 4, 4).path_name(),
            "bayer_to_rgb"
        );
        assert_eq!(
            session(PixelFormat::BayerRggb8, PixelFormat::Yuv420, 4, 4).path_name(),
            "bayer_to_yuv420p"
        );
    }

    #[test]
    fn odd_frames_have_no_demosaic_rule() {
        let ctx =
            ConvertContext::new(PixelFormat::BayerRggb8, PixelFormat::Rgb24, 5, 4).unwrap();
        assert!(matches!(
            ConvertSession::new(ctx),
            Err(ConvertError::UnsupportedConversion(_, _))
        ));
        // odd geometry stays fine on paths with ceiling chroma extents
        assert!(ConvertSession::new(
            ConvertContext::new(PixelFormat::Yuv420, PixelFormat::Yuv420, 3, 3).unwrap()
        )
        .is_ok());
    }

    #[test]
    fn pal8_to_planar_rgb_needs_a_palette_too() {
        let ctx = ConvertContext::new(PixelFormat::Pal8, PixelFormat::Gbrp, 4, 4).unwrap();
        assert!(matches!(
            ConvertSession::new(ctx),
            Err(ConvertError::PaletteRequired)
        ));
        let mut ctx = ConvertContext::new(PixelFormat::Pal8, PixelFormat::Gbrp, 4, 4).unwrap();
        ctx.set_palette(&[0u8; 1024]);
        assert_eq!(
            ConvertSession::new(ctx).unwrap().path_name(),
            "pal8_to_planar_rgb"
        );
    }

    #[test]
    fn planar_copy_aligns_subsampled_slices() {
        let s = session(PixelFormat::Yuv420, PixelFormat::Yuv420, 4, 4);
        assert_eq!(s.slice_align(), 2);
        let y = vec![0u8; 16];
        let u = vec![0u8; 4];
        let v = vec![0u8; 4];
        let mut dy = vec![0u8; 16];
        let mut du = vec![0u8; 4];
        let mut dv = vec![0u8; 4];
        let src = SourceSlice {
            planes: [Some(&y), Some(&u), Some(&v), None],
            strides: [4, 2, 2, 0],
        };
        let mut dst = DestSlice {
            planes: [Some(&mut dy), Some(&mut du), Some(&mut dv), None],
            strides: [4, 2, 2, 0],
        };
        assert!(matches!(
            s.convert_slice(&src, 1, 2, &mut dst),
            Err(ConvertError::UnalignedSliceStart { alignment: 2, .. })
        ));
        assert_eq!(session(PixelFormat::Gray8, PixelFormat::Gray8, 4, 4).slice_align(), 1);
    }
}
