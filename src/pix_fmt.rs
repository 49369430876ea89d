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

/// Color model a pixel format belongs to.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorModel {
    Yuv,
    Rgb,
    Gray,
    Palette,
}

/// Layout of the 2x2 Bayer mosaic cell.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BayerPattern {
    Bggr = 0,
    Rggb = 1,
    Gbrg = 2,
    Grbg = 3,
}

impl From<u8> for BayerPattern {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => BayerPattern::Bggr,
            1 => BayerPattern::Rggb,
            2 => BayerPattern::Gbrg,
            3 => BayerPattern::Grbg,
            _ => {
                panic!("Unknown value")
            }
        }
    }
}

/// Identifier of one supported pixel format.
///
/// `Le`/`Be` suffixes declare the storage byte order of formats that keep
/// more than 8 bits per component; formats without a suffix are byte
/// oriented and have no endianness.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum PixelFormat {
    Gray8,
    Gray10Le,
    Gray10Be,
    Gray16Le,
    Gray16Be,
    GrayF32Le,
    GrayF32Be,
    /// Gray with interleaved alpha, 2 bytes per pixel.
    Ya8,
    Yuv420,
    Yuva420,
    Yuv422,
    Yuv444,
    Yuva444,
    Yuv420P10Le,
    Yuv420P10Be,
    Yuv420P12Le,
    Yuv420P12Be,
    Yuv420P16Le,
    Yuv420P16Be,
    Yuv422P10Le,
    Yuv422P10Be,
    Yuv444P10Le,
    Yuv444P10Be,
    Yuv444P12Le,
    Yuv444P12Be,
    Yuv444P16Le,
    Yuv444P16Be,
    Nv12,
    Nv21,
    Nv24,
    Nv42,
    /// Semi-planar 4:2:0, 10 bits stored in the top bits of 16-bit words.
    P010Le,
    P016Le,
    Yuyv422,
    Uyvy422,
    Rgb24,
    Bgr24,
    Rgba,
    Bgra,
    Argb,
    Abgr,
    Rgb48Le,
    Rgb48Be,
    Bgr48Le,
    Bgr48Be,
    Rgba64Le,
    Rgba64Be,
    Bgra64Le,
    Bgra64Be,
    Gbrp,
    Gbrap,
    Gbrp10Le,
    Gbrp10Be,
    Gbrp12Le,
    Gbrp12Be,
    Gbrp16Le,
    Gbrp16Be,
    Gbrap10Le,
    Gbrap10Be,
    Gbrap16Le,
    Gbrap16Be,
    GbrpF32Le,
    GbrpF32Be,
    BayerBggr8,
    BayerBggr16Le,
    BayerBggr16Be,
    BayerRggb8,
    BayerRggb16Le,
    BayerRggb16Be,
    BayerGbrg8,
    BayerGbrg16Le,
    BayerGbrg16Be,
    BayerGrbg8,
    BayerGrbg16Le,
    BayerGrbg16Be,
    /// 8-bit indices into a 256 entry RGBA palette.
    Pal8,
}

/// Read-only metadata of a pixel format.
///
/// Uniquely determined by the [`PixelFormat`]; wrappers derive all
/// shift/mask arithmetic from it instead of hardcoding bit layouts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub components: u8,
    /// Meaningful bits per component, indexed by component.
    pub depth: [u8; 4],
    /// Bit shift of the component inside its storage unit.
    pub shift: [u8; 4],
    pub color: ColorModel,
    pub planar: bool,
    /// Chroma stored as one plane of interleaved pairs.
    pub semi_planar: bool,
    pub float: bool,
    pub big_endian: bool,
    pub alpha: bool,
    pub log2_chroma_w: u8,
    pub log2_chroma_h: u8,
    pub bayer: Option<BayerPattern>,
}

impl FormatDescriptor {
    /// Bytes occupied by one component sample in memory.
    #[inline]
    pub const fn component_bytes(&self) -> usize {
        if self.float {
            4
        } else if self.depth[0] > 8 {
            2
        } else {
            1
        }
    }

    #[inline]
    pub const fn max_value(&self) -> u16 {
        ((1u32 << self.depth[0]) - 1) as u16
    }
}

const fn planar_yuv(
    depth: u8,
    log2_w: u8,
    log2_h: u8,
    be: bool,
    alpha: bool,
) -> FormatDescriptor {
    FormatDescriptor {
        components: if alpha { 4 } else { 3 },
        depth: [depth; 4],
        shift: [0; 4],
        color: ColorModel::Yuv,
        planar: true,
        semi_planar: false,
        float: false,
        big_endian: be,
        alpha,
        log2_chroma_w: log2_w,
        log2_chroma_h: log2_h,
        bayer: None,
    }
}

const fn semi_planar(depth: u8, shift: u8, log2_w: u8, log2_h: u8, be: bool) -> FormatDescriptor {
    FormatDescriptor {
        components: 3,
        depth: [depth; 4],
        shift: [shift; 4],
        color: ColorModel::Yuv,
        planar: true,
        semi_planar: true,
        float: false,
        big_endian: be,
        alpha: false,
        log2_chroma_w: log2_w,
        log2_chroma_h: log2_h,
        bayer: None,
    }
}

const fn packed_rgb8(alpha: bool) -> FormatDescriptor {
    FormatDescriptor {
        components: if alpha { 4 } else { 3 },
        depth: [8; 4],
        shift: [0; 4],
        color: ColorModel::Rgb,
        planar: false,
        semi_planar: false,
        float: false,
        big_endian: false,
        alpha,
        log2_chroma_w: 0,
        log2_chroma_h: 0,
        bayer: None,
    }
}

const fn packed_rgb16(alpha: bool, be: bool) -> FormatDescriptor {
    FormatDescriptor {
        components: if alpha { 4 } else { 3 },
        depth: [16; 4],
        shift: [0; 4],
        color: ColorModel::Rgb,
        planar: false,
        semi_planar: false,
        float: false,
        big_endian: be,
        alpha,
        log2_chroma_w: 0,
        log2_chroma_h: 0,
        bayer: None,
    }
}

const fn planar_rgb(depth: u8, be: bool, alpha: bool) -> FormatDescriptor {
    FormatDescriptor {
        components: if alpha { 4 } else { 3 },
        depth: [depth; 4],
        shift: [0; 4],
        color: ColorModel::Rgb,
        planar: true,
        semi_planar: false,
        float: false,
        big_endian: be,
        alpha,
        log2_chroma_w: 0,
        log2_chroma_h: 0,
        bayer: None,
    }
}

const fn planar_rgb_f32(be: bool) -> FormatDescriptor {
    FormatDescriptor {
        components: 3,
        depth: [32; 4],
        shift: [0; 4],
        color: ColorModel::Rgb,
        planar: true,
        semi_planar: false,
        float: true,
        big_endian: be,
        alpha: false,
        log2_chroma_w: 0,
        log2_chroma_h: 0,
        bayer: None,
    }
}

const fn gray(depth: u8, be: bool) -> FormatDescriptor {
    FormatDescriptor {
        components: 1,
        depth: [depth, 0, 0, 0],
        shift: [0; 4],
        color: ColorModel::Gray,
        planar: true,
        semi_planar: false,
        float: false,
        big_endian: be,
        alpha: false,
        log2_chroma_w: 0,
        log2_chroma_h: 0,
        bayer: None,
    }
}

const fn gray_f32(be: bool) -> FormatDescriptor {
    FormatDescriptor {
        components: 1,
        depth: [32, 0, 0, 0],
        shift: [0; 4],
        color: ColorModel::Gray,
        planar: true,
        semi_planar: false,
        float: true,
        big_endian: be,
        alpha: false,
        log2_chroma_w: 0,
        log2_chroma_h: 0,
        bayer: None,
    }
}

const fn bayer(pattern: BayerPattern, depth: u8, be: bool) -> FormatDescriptor {
    FormatDescriptor {
        components: 3,
        depth: [depth; 4],
        shift: [0; 4],
        color: ColorModel::Rgb,
        planar: false,
        semi_planar: false,
        float: false,
        big_endian: be,
        alpha: false,
        log2_chroma_w: 0,
        log2_chroma_h: 0,
        bayer: Some(pattern),
    }
}

const YA8: FormatDescriptor = FormatDescriptor {
    components: 2,
    depth: [8, 8, 0, 0],
    shift: [0; 4],
    color: ColorModel::Gray,
    planar: false,
    semi_planar: false,
    float: false,
    big_endian: false,
    alpha: true,
    log2_chroma_w: 0,
    log2_chroma_h: 0,
    bayer: None,
};

const PAL8: FormatDescriptor = FormatDescriptor {
    components: 1,
    depth: [8, 0, 0, 0],
    shift: [0; 4],
    color: ColorModel::Palette,
    planar: false,
    semi_planar: false,
    float: false,
    big_endian: false,
    alpha: true,
    log2_chroma_w: 0,
    log2_chroma_h: 0,
    bayer: None,
};

const PACKED_YUV422: FormatDescriptor = FormatDescriptor {
    components: 3,
    depth: [8; 4],
    shift: [0; 4],
    color: ColorModel::Yuv,
    planar: false,
    semi_planar: false,
    float: false,
    big_endian: false,
    alpha: false,
    log2_chroma_w: 1,
    log2_chroma_h: 0,
    bayer: None,
};

impl PixelFormat {
    /// Returns the immutable descriptor of the format in O(1).
    pub const fn describe(self) -> FormatDescriptor {
        use BayerPattern::*;
        use PixelFormat::*;
        match self {
            Gray8 => gray(8, false),
            Gray10Le => gray(10, false),
            Gray10Be => gray(10, true),
            Gray16Le => gray(16, false),
            Gray16Be => gray(16, true),
            GrayF32Le => gray_f32(false),
            GrayF32Be => gray_f32(true),
            Ya8 => YA8,
            Yuv420 => planar_yuv(8, 1, 1, false, false),
            Yuva420 => planar_yuv(8, 1, 1, false, true),
            Yuv422 => planar_yuv(8, 1, 0, false, false),
            Yuv444 => planar_yuv(8, 0, 0, false, false),
            Yuva444 => planar_yuv(8, 0, 0, false, true),
            Yuv420P10Le => planar_yuv(10, 1, 1, false, false),
            Yuv420P10Be => planar_yuv(10, 1, 1, true, false),
            Yuv420P12Le => planar_yuv(12, 1, 1, false, false),
            Yuv420P12Be => planar_yuv(12, 1, 1, true, false),
            Yuv420P16Le => planar_yuv(16, 1, 1, false, false),
            Yuv420P16Be => planar_yuv(16, 1, 1, true, false),
            Yuv422P10Le => planar_yuv(10, 1, 0, false, false),
            Yuv422P10Be => planar_yuv(10, 1, 0, true, false),
            Yuv444P10Le => planar_yuv(10, 0, 0, false, false),
            Yuv444P10Be => planar_yuv(10, 0, 0, true, false),
            Yuv444P12Le => planar_yuv(12, 0, 0, false, false),
            Yuv444P12Be => planar_yuv(12, 0, 0, true, false),
            Yuv444P16Le => planar_yuv(16, 0, 0, false, false),
            Yuv444P16Be => planar_yuv(16, 0, 0, true, false),
            Nv12 | Nv21 => semi_planar(8, 0, 1, 1, false),
            Nv24 | Nv42 => semi_planar(8, 0, 0, 0, false),
            P010Le => semi_planar(10, 6, 1, 1, false),
            P016Le => semi_planar(16, 0, 1, 1, false),
            Yuyv422 | Uyvy422 => PACKED_YUV422,
            Rgb24 | Bgr24 => packed_rgb8(false),
            Rgba | Bgra | Argb | Abgr => packed_rgb8(true),
            Rgb48Le | Bgr48Le => packed_rgb16(false, false),
            Rgb48Be | Bgr48Be => packed_rgb16(false, true),
            Rgba64Le | Bgra64Le => packed_rgb16(true, false),
            Rgba64Be | Bgra64Be => packed_rgb16(true, true),
            Gbrp => planar_rgb(8, false, false),
            Gbrap => planar_rgb(8, false, true),
            Gbrp10Le => planar_rgb(10, false, false),
            Gbrp10Be => planar_rgb(10, true, false),
            Gbrp12Le => planar_rgb(12, false, false),
            Gbrp12Be => planar_rgb(12, true, false),
            Gbrp16Le => planar_rgb(16, false, false),
            Gbrp16Be => planar_rgb(16, true, false),
            Gbrap10Le => planar_rgb(10, false, true),
            Gbrap10Be => planar_rgb(10, true, true),
            Gbrap16Le => planar_rgb(16, false, true),
            Gbrap16Be => planar_rgb(16, true, true),
            GbrpF32Le => planar_rgb_f32(false),
            GbrpF32Be => planar_rgb_f32(true),
            BayerBggr8 => bayer(Bggr, 8, false),
            BayerBggr16Le => bayer(Bggr, 16, false),
            BayerBggr16Be => bayer(Bggr, 16, true),
            BayerRggb8 => bayer(Rggb, 8, false),
            BayerRggb16Le => bayer(Rggb, 16, false),
            BayerRggb16Be => bayer(Rggb, 16, true),
            BayerGbrg8 => bayer(Gbrg, 8, false),
            BayerGbrg16Le => bayer(Gbrg, 16, false),
            BayerGbrg16Be => bayer(Gbrg, 16, true),
            BayerGrbg8 => bayer(Grbg, 8, false),
            BayerGrbg16Le => bayer(Grbg, 16, false),
            BayerGrbg16Be => bayer(Grbg, 16, true),
            Pal8 => PAL8,
        }
    }

    /// The same layout with the opposite storage byte order, if any.
    ///
    /// Defined for every format keeping more than 8 bits per component;
    /// byte oriented formats have no endianness and return `None`.
    pub const fn swapped_endian(self) -> Option<PixelFormat> {
        use PixelFormat::*;
        Some(match self {
            Gray10Le => Gray10Be,
            Gray10Be => Gray10Le,
            Gray16Le => Gray16Be,
            Gray16Be => Gray16Le,
            GrayF32Le => GrayF32Be,
            GrayF32Be => GrayF32Le,
            Yuv420P10Le => Yuv420P10Be,
            Yuv420P10Be => Yuv420P10Le,
            Yuv420P12Le => Yuv420P12Be,
            Yuv420P12Be => Yuv420P12Le,
            Yuv420P16Le => Yuv420P16Be,
            Yuv420P16Be => Yuv420P16Le,
            Yuv422P10Le => Yuv422P10Be,
            Yuv422P10Be => Yuv422P10Le,
            Yuv444P10Le => Yuv444P10Be,
            Yuv444P10Be => Yuv444P10Le,
            Yuv444P12Le => Yuv444P12Be,
            Yuv444P12Be => Yuv444P12Le,
            Yuv444P16Le => Yuv444P16Be,
            Yuv444P16Be => Yuv444P16Le,
            Rgb48Le => Rgb48Be,
            Rgb48Be => Rgb48Le,
            Bgr48Le => Bgr48Be,
            Bgr48Be => Bgr48Le,
            Rgba64Le => Rgba64Be,
            Rgba64Be => Rgba64Le,
            Bgra64Le => Bgra64Be,
            Bgra64Be => Bgra64Le,
            Gbrp10Le => Gbrp10Be,
            Gbrp10Be => Gbrp10Le,
            Gbrp12Le => Gbrp12Be,
            Gbrp12Be => Gbrp12Le,
            Gbrp16Le => Gbrp16Be,
            Gbrp16Be => Gbrp16Le,
            Gbrap10Le => Gbrap10Be,
            Gbrap10Be => Gbrap10Le,
            Gbrap16Le => Gbrap16Be,
            Gbrap16Be => Gbrap16Le,
            GbrpF32Le => GbrpF32Be,
            GbrpF32Be => GbrpF32Le,
            BayerBggr16Le => BayerBggr16Be,
            BayerBggr16Be => BayerBggr16Le,
            BayerRggb16Le => BayerRggb16Be,
            BayerRggb16Be => BayerRggb16Le,
            BayerGbrg16Le => BayerGbrg16Be,
            BayerGbrg16Be => BayerGbrg16Le,
            BayerGrbg16Le => BayerGrbg16Be,
            BayerGrbg16Be => BayerGrbg16Le,
            _ => return None,
        })
    }

    #[inline]
    pub const fn is_rgb(self) -> bool {
        matches!(self.describe().color, ColorModel::Rgb)
    }

    #[inline]
    pub const fn is_bayer(self) -> bool {
        self.describe().bayer.is_some()
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        self.describe().float
    }

    #[inline]
    pub const fn has_alpha(self) -> bool {
        self.describe().alpha
    }

    #[inline]
    pub const fn is_packed_rgb(self) -> bool {
        let d = self.describe();
        matches!(d.color, ColorModel::Rgb) && !d.planar && d.bayer.is_none()
    }

    #[inline]
    pub const fn is_planar_rgb(self) -> bool {
        let d = self.describe();
        matches!(d.color, ColorModel::Rgb) && d.planar
    }

    #[inline]
    pub const fn is_planar_yuv(self) -> bool {
        let d = self.describe();
        matches!(d.color, ColorModel::Yuv) && d.planar
    }

    #[inline]
    pub const fn is_semi_planar(self) -> bool {
        self.describe().semi_planar
    }

    /// Chroma plane order reversed relative to the U-first convention.
    #[inline]
    pub const fn has_swapped_chroma(self) -> bool {
        matches!(self, PixelFormat::Nv21 | PixelFormat::Nv42)
    }

    /// Gray stored as a plain luma plane, without interleaved alpha.
    #[inline]
    pub const fn is_planar_gray(self) -> bool {
        let d = self.describe();
        matches!(d.color, ColorModel::Gray) && !matches!(self, PixelFormat::Ya8)
    }

    #[inline]
    pub const fn is_gray(self) -> bool {
        matches!(self.describe().color, ColorModel::Gray)
    }

    /// Source formats resolved through the 256 entry RGBA lookup table.
    #[inline]
    pub const fn uses_palette(self) -> bool {
        matches!(self, PixelFormat::Pal8 | PixelFormat::Ya8)
    }

    /// Components stored in 16-bit words.
    #[inline]
    pub const fn is_16bit_storage(self) -> bool {
        let d = self.describe();
        !d.float && d.depth[0] > 8
    }

    /// Storage bits of one pixel of a packed (single plane) format.
    pub const fn packed_bits_per_pixel(self) -> u32 {
        let d = self.describe();
        if d.planar {
            // per-plane formats are measured per component instead
            (d.component_bytes() * 8) as u32
        } else if d.bayer.is_some() {
            (d.component_bytes() * 8) as u32
        } else if matches!(self, PixelFormat::Yuyv422 | PixelFormat::Uyvy422) {
            16
        } else {
            d.components as u32 * (d.component_bytes() * 8) as u32
        }
    }
}

/// Byte (or 16-bit element) offsets of the channels inside one packed
/// RGB pixel. Offsets are in storage units, `step` units per pixel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct PackedRgbLayout {
    pub step: usize,
    pub r: usize,
    pub g: usize,
    pub b: usize,
    pub a: Option<usize>,
}

impl PixelFormat {
    pub(crate) const fn packed_rgb_layout(self) -> Option<PackedRgbLayout> {
        use PixelFormat::*;
        Some(match self {
            Rgb24 | Rgb48Le | Rgb48Be => PackedRgbLayout {
                step: 3,
                r: 0,
                g: 1,
                b: 2,
                a: None,
            },
            Bgr24 | Bgr48Le | Bgr48Be => PackedRgbLayout {
                step: 3,
                r: 2,
                g: 1,
                b: 0,
                a: None,
            },
            Rgba | Rgba64Le | Rgba64Be => PackedRgbLayout {
                step: 4,
                r: 0,
                g: 1,
                b: 2,
                a: Some(3),
            },
            Bgra | Bgra64Le | Bgra64Be => PackedRgbLayout {
                step: 4,
                r: 2,
                g: 1,
                b: 0,
                a: Some(3),
            },
            Argb => PackedRgbLayout {
                step: 4,
                r: 1,
                g: 2,
                b: 3,
                a: Some(0),
            },
            Abgr => PackedRgbLayout {
                step: 4,
                r: 3,
                g: 2,
                b: 1,
                a: Some(0),
            },
            _ => return None,
        })
    }
}
