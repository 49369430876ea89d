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
use crate::numerics::replicate_bits;
use crate::rw::{get_u16, put_u16};
use crate::slice::{rows, rows_mut};

/// Ordered dither matrices for 1..=8 bits of dropped precision.
///
/// Table `shift - 1` spans `0..1 << shift` so that adding the entry before
/// the truncating shift spreads the rounding error over an 8x8 tile.
pub(crate) static DITHERS: [[[u8; 8]; 8]; 8] = [
    [
        [0, 1, 0, 1, 0, 1, 0, 1],
        [1, 0, 1, 0, 1, 0, 1, 0],
        [0, 1, 0, 1, 0, 1, 0, 1],
        [1, 0, 1, 0, 1, 0, 1, 0],
        [0, 1, 0, 1, 0, 1, 0, 1],
        [1, 0, 1, 0, 1, 0, 1, 0],
        [0, 1, 0, 1, 0, 1, 0, 1],
        [1, 0, 1, 0, 1, 0, 1, 0],
    ],
    [
        [1, 2, 1, 2, 1, 2, 1, 2],
        [3, 0, 3, 0, 3, 0, 3, 0],
        [1, 2, 1, 2, 1, 2, 1, 2],
        [3, 0, 3, 0, 3, 0, 3, 0],
        [1, 2, 1, 2, 1, 2, 1, 2],
        [3, 0, 3, 0, 3, 0, 3, 0],
        [1, 2, 1, 2, 1, 2, 1, 2],
        [3, 0, 3, 0, 3, 0, 3, 0],
    ],
    [
        [2, 4, 3, 5, 2, 4, 3, 5],
        [6, 0, 7, 1, 6, 0, 7, 1],
        [3, 5, 2, 4, 3, 5, 2, 4],
        [7, 1, 6, 0, 7, 1, 6, 0],
        [2, 4, 3, 5, 2, 4, 3, 5],
        [6, 0, 7, 1, 6, 0, 7, 1],
        [3, 5, 2, 4, 3, 5, 2, 4],
        [7, 1, 6, 0, 7, 1, 6, 0],
    ],
    [
        [4, 8, 7, 11, 4, 8, 7, 11],
        [12, 0, 15, 3, 12, 0, 15, 3],
        [6, 10, 5, 9, 6, 10, 5, 9],
        [14, 2, 13, 1, 14, 2, 13, 1],
        [4, 8, 7, 11, 4, 8, 7, 11],
        [12, 0, 15, 3, 12, 0, 15, 3],
        [6, 10, 5, 9, 6, 10, 5, 9],
        [14, 2, 13, 1, 14, 2, 13, 1],
    ],
    [
        [9, 17, 15, 23, 8, 16, 14, 22],
        [25, 1, 31, 7, 24, 0, 30, 6],
        [13, 21, 11, 19, 12, 20, 10, 18],
        [29, 5, 27, 3, 28, 4, 26, 2],
        [8, 16, 14, 22, 9, 17, 15, 23],
        [24, 0, 30, 6, 25, 1, 31, 7],
        [12, 20, 10, 18, 13, 21, 11, 19],
        [28, 4, 26, 2, 29, 5, 27, 3],
    ],
    [
        [18, 34, 30, 46, 17, 33, 29, 45],
        [50, 2, 62, 14, 49, 1, 61, 13],
        [26, 42, 22, 38, 25, 41, 21, 37],
        [58, 10, 54, 6, 57, 9, 53, 5],
        [16, 32, 28, 44, 19, 35, 31, 47],
        [48, 0, 60, 12, 51, 3, 63, 15],
        [24, 40, 20, 36, 27, 43, 23, 39],
        [56, 8, 52, 4, 59, 11, 55, 7],
    ],
    [
        [18, 34, 30, 46, 17, 33, 29, 45],
        [50, 2, 62, 14, 49, 1, 61, 13],
        [26, 42, 22, 38, 25, 41, 21, 37],
        [58, 10, 54, 6, 57, 9, 53, 5],
        [16, 32, 28, 44, 19, 35, 31, 47],
        [48, 0, 60, 12, 51, 3, 63, 15],
        [24, 40, 20, 36, 27, 43, 23, 39],
        [56, 8, 52, 4, 59, 11, 55, 7],
    ],
    [
        [36, 68, 60, 92, 34, 66, 58, 90],
        [100, 4, 124, 28, 98, 2, 122, 26],
        [52, 84, 44, 76, 50, 82, 42, 74],
        [116, 20, 108, 12, 114, 18, 106, 10],
        [32, 64, 56, 88, 38, 70, 62, 94],
        [96, 0, 120, 24, 102, 6, 126, 30],
        [48, 80, 40, 72, 54, 86, 46, 78],
        [112, 16, 104, 8, 118, 22, 110, 14],
    ],
];

/// Per-plane parameters of a depth changing copy.
#[derive(Debug, Copy, Clone)]
pub(crate) struct DepthConvert {
    pub src_depth: u32,
    pub dst_depth: u32,
    /// Bit position of the component inside its source storage word.
    pub src_shift: u32,
    pub dst_shift: u32,
    /// Truncated low bits carry no signal worth folding back: always the
    /// case for chroma, and for luma of limited range sources.
    pub shift_only: bool,
    /// Ordered dithering instead of plain rounding on narrowing.
    pub ordered_dither: bool,
}

#[inline(always)]
fn narrow_biased(v: u32, add: u32, shift: u32, dst_depth: u32) -> u16 {
    let tmp = (v + add) >> shift;
    // values that would overflow the target depth collapse onto the maximum
    (tmp - (tmp >> dst_depth)) as u16
}

#[inline(always)]
fn narrow_folded(v: u32, add: u32, shift: u32, dst_depth: u32) -> u16 {
    ((v - (v >> dst_depth) + add) >> shift) as u16
}

/// Narrows a 16-bit storage plane to fewer bits, 8-bit or 16-bit output.
///
/// Row `dst_y + i` of the frame picks the dither line, so a frame split
/// into slices dithers exactly like one converted in a single call.
pub(crate) fn narrow_plane<const SRC_BE: bool, const DST_BE: bool>(
    p: DepthConvert,
    src: &[u8],
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
    dst_y: usize,
    length: usize,
    height: usize,
) {
    assert!(p.src_depth > p.dst_depth);
    let shift = p.src_depth - p.dst_depth;
    let bias = 1u32 << (shift - 1);
    let table = &DITHERS[(shift - 1) as usize];
    let to_byte = p.dst_depth <= 8;

    for (i, (src_row, dst_row)) in rows(src, src_stride, 0, height)
        .zip(rows_mut(dst, dst_stride, dst_y, height))
        .enumerate()
    {
        let dither_row = &table[(dst_y + i) & 7];
        for j in 0..length {
            let v = (get_u16::<SRC_BE>(src_row, j) as u32) >> p.src_shift;
            let out = if !p.ordered_dither {
                narrow_biased(v, bias, shift, p.dst_depth)
            } else if p.shift_only {
                narrow_biased(v, dither_row[j & 7] as u32, shift, p.dst_depth)
            } else {
                narrow_folded(v, dither_row[j & 7] as u32, shift, p.dst_depth)
            };
            if to_byte {
                dst_row[j] = out as u8;
            } else {
                put_u16::<DST_BE>(dst_row, j, out << p.dst_shift);
            }
        }
    }
}

/// Widens a plane to a deeper 16-bit storage format.
///
/// In shift-only mode the new low bits stay zero; otherwise the top bits
/// are replicated downwards so full scale maps to full scale.
pub(crate) fn widen_plane<const SRC_BE: bool, const DST_BE: bool>(
    p: DepthConvert,
    src: &[u8],
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
    dst_y: usize,
    length: usize,
    height: usize,
) {
    assert!(p.src_depth <= p.dst_depth);
    let from_byte = p.src_depth <= 8;
    let shift = p.dst_depth - p.src_depth;

    for (src_row, dst_row) in
        rows(src, src_stride, 0, height).zip(rows_mut(dst, dst_stride, dst_y, height))
    {
        for j in 0..length {
            let v = if from_byte {
                src_row[j] as u16
            } else {
                get_u16::<SRC_BE>(src_row, j) >> p.src_shift
            };
            let widened = if shift == 0 {
                v
            } else if p.shift_only {
                v << shift
            } else {
                replicate_bits(v, p.src_depth, p.dst_depth)
            };
            put_u16::<DST_BE>(dst_row, j, widened << p.dst_shift);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(src_depth: u32, dst_depth: u32) -> DepthConvert {
        DepthConvert {
            src_depth,
            dst_depth,
            src_shift: 0,
            dst_shift: 0,
            shift_only: true,
            ordered_dither: false,
        }
    }

    fn le_plane(values: &[u16]) -> Vec<u8> {
        let mut out = vec![0u8; values.len() * 2];
        for (i, v) in values.iter().enumerate() {
            put_u16::<false>(&mut out, i, *v);
        }
        out
    }

    #[test]
    fn rounding_narrow_10_to_8() {
        let src = le_plane(&[512, 513, 1023, 0]);
        let mut dst = vec![0u8; 4];
        narrow_plane::<false, false>(params(10, 8), &src, 8, &mut dst, 4, 0, 4, 1);
        // (512 + 2) >> 2 = 128; 1023 folds onto 255 instead of wrapping
        assert_eq!(dst, vec![128, 128, 255, 0]);
    }

    #[test]
    fn dithered_narrow_is_deterministic_and_slice_invariant() {
        let mut p = params(16, 8);
        p.ordered_dither = true;
        let width = 16usize;
        let height = 8usize;
        let mut values = Vec::new();
        for y in 0..height {
            for x in 0..width {
                values.push(((x * 2345 + y * 7717) % 65536) as u16);
            }
        }
        let src = le_plane(&values);
        let stride = width * 2;

        let mut whole = vec![0u8; width * height];
        narrow_plane::<false, false>(p, &src, stride, &mut whole, width, 0, width, height);

        let mut sliced = vec![0u8; width * height];
        narrow_plane::<false, false>(p, &src[..stride * 3], stride, &mut sliced, width, 0, width, 3);
        narrow_plane::<false, false>(
            p,
            &src[stride * 3..],
            stride,
            &mut sliced,
            width,
            3,
            width,
            height - 3,
        );
        assert_eq!(whole, sliced);

        let mut again = vec![0u8; width * height];
        narrow_plane::<false, false>(p, &src, stride, &mut again, width, 0, width, height);
        assert_eq!(whole, again);
    }

    #[test]
    fn widen_8_to_16_replicates_bits() {
        let src = [0u8, 255, 128];
        let mut dst = vec![0u8; 6];
        let mut p = params(8, 16);
        p.shift_only = false;
        widen_plane::<false, false>(p, &src, 3, &mut dst, 6, 0, 3, 1);
        assert_eq!(get_u16::<false>(&dst, 0), 0);
        assert_eq!(get_u16::<false>(&dst, 1), 0xFFFF);
        assert_eq!(get_u16::<false>(&dst, 2), 0x8080);
    }

    #[test]
    fn widen_into_high_bits() {
        // 8-bit luma into 10 bits stored at the top of a 16-bit word
        let src = [255u8, 16];
        let mut dst = vec![0u8; 4];
        let mut p = params(8, 10);
        p.dst_shift = 6;
        widen_plane::<false, false>(p, &src, 2, &mut dst, 4, 0, 2, 1);
        assert_eq!(get_u16::<false>(&dst, 0), 1020 << 6);
        assert_eq!(get_u16::<false>(&dst, 1), 64 << 6);
    }

    #[test]
    fn narrow_reads_shifted_source() {
        // P010 keeps its 10 bits at the top of the word
        let src = le_plane(&[600 << 6]);
        let mut dst = vec![0u8; 1];
        let mut p = params(10, 8);
        p.src_shift = 6;
        narrow_plane::<false, false>(p, &src, 2, &mut dst, 1, 0, 1, 1);
        assert_eq!(dst[0], 150);
    }
}
