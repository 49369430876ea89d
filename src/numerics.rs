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
#![forbid(unsafe_code)]

#[inline(always)]
/// Saturating rounding shift right against bit depth
pub(crate) fn qrshr<const PRECISION: i32, const BIT_DEPTH: usize>(val: i32) -> i32 {
    let rounding: i32 = 1 << (PRECISION - 1);
    let max_value: i32 = (1 << BIT_DEPTH) - 1;
    ((val + rounding) >> PRECISION).min(max_value).max(0)
}

/// Widens a `src_depth`-bit value to `dst_depth` bits by bit replication,
/// the exact counterpart of a plain truncating narrow.
#[inline(always)]
pub(crate) fn replicate_bits(v: u16, src_depth: u32, dst_depth: u32) -> u16 {
    let shift = dst_depth - src_depth;
    (v << shift) | (v >> (2 * src_depth - dst_depth))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qrshr_saturates() {
        assert_eq!(qrshr::<6, 8>(255 << 6), 255);
        assert_eq!(qrshr::<6, 8>(300 << 6), 255);
        assert_eq!(qrshr::<6, 8>(-100), 0);
        // exact midpoint rounds up
        assert_eq!(qrshr::<6, 8>((10 << 6) + 32), 11);
    }

    #[test]
    fn bit_replication_hits_full_scale() {
        assert_eq!(replicate_bits(0x3FF, 10, 16), 0xFFFF);
        assert_eq!(replicate_bits(0, 10, 16), 0);
        assert_eq!(replicate_bits(0xFF, 8, 16), 0xFFFF);
        assert_eq!(replicate_bits(0xFFF, 12, 16), 0xFFFF);
    }
}
