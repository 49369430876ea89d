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
use crate::error::ConvertError;
use crate::pix_fmt::PixelFormat;

/// Dithering applied when a conversion narrows the component depth.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum DitherMode {
    /// Ordered dithering for narrowing paths, plain rounding elsewhere.
    #[default]
    Auto,
    /// Rounding only; deterministic and cheapest.
    None,
    /// Ordered (Bayer matrix) dithering.
    Bayer,
}

/// Declares YUV range TV (limited) or Full
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialOrd, PartialEq)]
pub enum YuvRange {
    /// Limited range Y ∈ [16 << (depth - 8), 235 << (depth - 8)]
    #[default]
    Limited,
    /// Full range Y ∈ [0, 2^bit_depth - 1]
    Full,
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub struct YuvChromaRange {
    pub bias_y: u32,
    pub bias_uv: u32,
    pub range_y: u32,
    pub range_uv: u32,
    pub range: YuvRange,
}

pub const fn get_yuv_range(depth: u32, range: YuvRange) -> YuvChromaRange {
    match range {
        YuvRange::Limited => YuvChromaRange {
            bias_y: 16 << (depth - 8),
            bias_uv: 1 << (depth - 1),
            range_y: 219 << (depth - 8),
            range_uv: 224 << (depth - 8),
            range,
        },
        YuvRange::Full => YuvChromaRange {
            bias_y: 0,
            bias_uv: 1 << (depth - 1),
            range_uv: (1 << depth) - 1,
            range_y: (1 << depth) - 1,
            range,
        },
    }
}

/// Declares standard prebuilt YUV conversion matrices, check [ITU-R](https://www.itu.int/rec/T-REC-H.273/en) information for more info
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialOrd, PartialEq)]
pub enum YuvStandardMatrix {
    #[default]
    Bt601,
    Bt709,
    Bt2020,
    Smpte240,
    /// Custom parameters first goes for kr, second for kb.
    /// Methods will *panic* if 1.0f32 - kr - kb == 0
    Custom(f32, f32),
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub struct YuvBias {
    pub kr: f32,
    pub kb: f32,
}

pub const fn get_kr_kb(matrix: YuvStandardMatrix) -> YuvBias {
    match matrix {
        YuvStandardMatrix::Bt601 => YuvBias {
            kr: 0.299f32,
            kb: 0.114f32,
        },
        YuvStandardMatrix::Bt709 => YuvBias {
            kr: 0.2126f32,
            kb: 0.0722f32,
        },
        YuvStandardMatrix::Bt2020 => YuvBias {
            kr: 0.2627f32,
            kb: 0.0593f32,
        },
        YuvStandardMatrix::Smpte240 => YuvBias {
            kr: 0.087f32,
            kb: 0.212f32,
        },
        YuvStandardMatrix::Custom(kr, kb) => YuvBias { kr, kb },
    }
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct CbCrInverseTransform<T> {
    pub y_coef: T,
    pub cr_coef: T,
    pub cb_coef: T,
    pub g_coeff_1: T,
    pub g_coeff_2: T,
}

impl CbCrInverseTransform<f32> {
    /// Integral transformation adds an error not less than 1%
    pub fn to_integers(self, precision: u32) -> CbCrInverseTransform<i32> {
        let precision_scale: f32 = (1i32 << precision) as f32;
        CbCrInverseTransform::<i32> {
            y_coef: (self.y_coef * precision_scale).round() as i32,
            cr_coef: (self.cr_coef * precision_scale).round() as i32,
            cb_coef: (self.cb_coef * precision_scale).round() as i32,
            g_coeff_1: (self.g_coeff_1 * precision_scale).round() as i32,
            g_coeff_2: (self.g_coeff_2 * precision_scale).round() as i32,
        }
    }
}

/// Transformation YUV to RGB with coefficients as specified in [ITU-R](https://www.itu.int/rec/T-REC-H.273/en)
pub(crate) fn get_inverse_transform(
    range_rgba: u32,
    range_y: u32,
    range_uv: u32,
    kr: f32,
    kb: f32,
) -> CbCrInverseTransform<f32> {
    let range_uv = range_rgba as f32 / range_uv as f32;
    let y_coef = range_rgba as f32 / range_y as f32;
    let cr_coeff = (2f32 * (1f32 - kr)) * range_uv;
    let cb_coeff = (2f32 * (1f32 - kb)) * range_uv;
    let kg = 1.0f32 - kr - kb;
    if kg == 0f32 {
        panic!("1.0f - kr - kg must not be 0");
    }
    let g_coeff_1 = (2f32 * ((1f32 - kr) * kr / kg)) * range_uv;
    let g_coeff_2 = (2f32 * ((1f32 - kb) * kb / kg)) * range_uv;
    CbCrInverseTransform {
        y_coef,
        cr_coef: cr_coeff,
        cb_coef: cb_coeff,
        g_coeff_1,
        g_coeff_2,
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub(crate) struct CbCrForwardTransform<T> {
    pub yr: T,
    pub yg: T,
    pub yb: T,
    pub cb_r: T,
    pub cb_g: T,
    pub cb_b: T,
    pub cr_r: T,
    pub cr_g: T,
    pub cr_b: T,
}

impl CbCrForwardTransform<f32> {
    pub fn to_integers(self, precision: u32) -> CbCrForwardTransform<i32> {
        let scale = (1 << precision) as f32;
        CbCrForwardTransform::<i32> {
            yr: (self.yr * scale).round() as i32,
            yg: (self.yg * scale).round() as i32,
            yb: (self.yb * scale).round() as i32,
            cb_r: (self.cb_r * scale).round() as i32,
            cb_g: (self.cb_g * scale).round() as i32,
            cb_b: (self.cb_b * scale).round() as i32,
            cr_r: (self.cr_r * scale).round() as i32,
            cr_g: (self.cr_g * scale).round() as i32,
            cr_b: (self.cr_b * scale).round() as i32,
        }
    }
}

/// Transformation RGB to YUV with coefficients as specified in [ITU-R](https://www.itu.int/rec/T-REC-H.273/en)
pub(crate) fn get_forward_transform(
    range_rgba: u32,
    range_y: u32,
    range_uv: u32,
    kr: f32,
    kb: f32,
) -> CbCrForwardTransform<f32> {
    let kg = 1.0f32 - kr - kb;

    let yr = kr * range_y as f32 / range_rgba as f32;
    let yg = kg * range_y as f32 / range_rgba as f32;
    let yb = kb * range_y as f32 / range_rgba as f32;

    let cb_r = -0.5f32 * kr / (1f32 - kb) * range_uv as f32 / range_rgba as f32;
    let cb_g = -0.5f32 * kg / (1f32 - kb) * range_uv as f32 / range_rgba as f32;
    let cb_b = 0.5f32 * range_uv as f32 / range_rgba as f32;

    let cr_r = 0.5f32 * range_uv as f32 / range_rgba as f32;
    let cr_g = -0.5f32 * kg / (1f32 - kr) * range_uv as f32 / range_rgba as f32;
    let cr_b = -0.5f32 * kb / (1f32 - kr) * range_uv as f32 / range_rgba as f32;
    CbCrForwardTransform {
        yr,
        yg,
        yb,
        cb_r,
        cb_g,
        cb_b,
        cr_r,
        cr_g,
        cr_b,
    }
}

/// Immutable description of one conversion job.
///
/// Built once per format pair and frame geometry; the conversion path is
/// selected from it a single time and then reused for every slice.
#[derive(Debug, Clone)]
pub struct ConvertContext {
    pub src_format: PixelFormat,
    pub dst_format: PixelFormat,
    pub width: usize,
    pub height: usize,
    pub dither: DitherMode,
    /// Prefer exact arithmetic over approximations that gain speed.
    pub accurate_rounding: bool,
    /// Forbid anything that could differ between runs or platforms.
    pub bit_exact: bool,
    /// Allow visually lossless shortcuts, e.g. chroma row duplication.
    pub fast_mode: bool,
    pub src_range: YuvRange,
    pub matrix: YuvStandardMatrix,
    palette: Option<Box<[u8; 1024]>>,
}

impl ConvertContext {
    pub fn new(
        src_format: PixelFormat,
        dst_format: PixelFormat,
        width: usize,
        height: usize,
    ) -> Result<ConvertContext, ConvertError> {
        if width == 0 || height == 0 {
            return Err(ConvertError::ZeroBaseSize);
        }
        Ok(ConvertContext {
            src_format,
            dst_format,
            width,
            height,
            dither: DitherMode::default(),
            accurate_rounding: false,
            bit_exact: false,
            fast_mode: false,
            src_range: YuvRange::default(),
            matrix: YuvStandardMatrix::default(),
            palette: None,
        })
    }

    /// Installs the 256 RGBA entries consulted by palette sources.
    ///
    /// Entry `i` occupies bytes `4 * i..4 * i + 4` in R, G, B, A order.
    pub fn set_palette(&mut self, palette: &[u8; 1024]) {
        self.palette = Some(Box::new(*palette));
    }

    #[inline]
    pub fn palette(&self) -> Option<&[u8; 1024]> {
        self.palette.as_deref()
    }

    /// Whether the ordered dither table participates in narrowing copies.
    #[inline]
    pub(crate) fn ordered_dither_enabled(&self) -> bool {
        !matches!(self.dither, DitherMode::None)
    }
}
