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

//! Element access on byte planes.
//!
//! All planes in this crate are byte slices; wide components are read and
//! written through these helpers with the byte order fixed at monomorphization
//! time so hot loops carry no per-element branch.

/// Reads a 16-bit component from the first two bytes of `bytes`.
#[inline(always)]
pub(crate) fn load_u16<const BE: bool>(bytes: &[u8]) -> u16 {
    if BE {
        u16::from_be_bytes([bytes[0], bytes[1]])
    } else {
        u16::from_le_bytes([bytes[0], bytes[1]])
    }
}

/// Writes a 16-bit component into the first two bytes of `bytes`.
#[inline(always)]
pub(crate) fn store_u16<const BE: bool>(bytes: &mut [u8], value: u16) {
    let b = if BE {
        value.to_be_bytes()
    } else {
        value.to_le_bytes()
    };
    bytes[0] = b[0];
    bytes[1] = b[1];
}

#[inline(always)]
pub(crate) fn load_u32<const BE: bool>(bytes: &[u8]) -> u32 {
    if BE {
        u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    } else {
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

#[inline(always)]
pub(crate) fn store_u32<const BE: bool>(bytes: &mut [u8], value: u32) {
    let b = if BE {
        value.to_be_bytes()
    } else {
        value.to_le_bytes()
    };
    bytes[..4].copy_from_slice(&b);
}

#[inline(always)]
pub(crate) fn load_f32<const BE: bool>(bytes: &[u8]) -> f32 {
    f32::from_bits(load_u32::<BE>(bytes))
}

#[inline(always)]
pub(crate) fn store_f32<const BE: bool>(bytes: &mut [u8], value: f32) {
    store_u32::<BE>(bytes, value.to_bits());
}

/// Reads the component at element index `idx` of a 16-bit row.
#[inline(always)]
pub(crate) fn get_u16<const BE: bool>(row: &[u8], idx: usize) -> u16 {
    load_u16::<BE>(&row[idx * 2..])
}

/// Writes the component at element index `idx` of a 16-bit row.
#[inline(always)]
pub(crate) fn put_u16<const BE: bool>(row: &mut [u8], idx: usize, value: u16) {
    store_u16::<BE>(&mut row[idx * 2..], value)
}
