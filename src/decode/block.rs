//! Block kernels for the compressed formats.
//!
//! Every kernel consumes one fixed-size encoded block and produces a
//! [`RawBlock4x4`]. Kernels are pure and never fail; a BC7 block with a
//! malformed mode decodes to opaque black. All multibyte fields are
//! little-endian.

use crate::color::{ColorRgba32, RawBlock4x4};

/// Decodes an 8-byte BC1 block. `with_alpha` preserves the punch-through
/// transparency of the three-color mode; otherwise alpha is forced opaque.
#[inline(always)]
pub(crate) fn decode_block_bc1(compressed_block: &[u8], with_alpha: bool) -> RawBlock4x4 {
    let mut output = RawBlock4x4::default();
    decode_color_block::<false>(compressed_block, &mut output);

    if !with_alpha {
        for pixel in output.pixels.iter_mut() {
            pixel.a = 255;
        }
    }

    output
}

/// Decodes a 16-byte BC2 block: an explicit 4-bit alpha grid followed by a
/// BC1-style color block.
#[inline(always)]
pub(crate) fn decode_block_bc2(compressed_block: &[u8]) -> RawBlock4x4 {
    let mut output = RawBlock4x4::default();
    decode_color_block::<true>(&compressed_block[8..], &mut output);
    decode_sharp_alpha_block(&compressed_block[..8], &mut output);
    output
}

/// Decodes a 16-byte BC3 block: an interpolated alpha block followed by a
/// BC1-style color block.
#[inline(always)]
pub(crate) fn decode_block_bc3(compressed_block: &[u8]) -> RawBlock4x4 {
    let mut output = RawBlock4x4::default();
    decode_color_block::<true>(&compressed_block[8..], &mut output);

    let alpha = decode_smooth_alpha_block(&compressed_block[..8]);
    for (pixel, value) in output.pixels.iter_mut().zip(alpha) {
        pixel.a = value;
    }

    output
}

/// Decodes an 8-byte BC4 block into the red channel. `red_as_luminance`
/// replicates the decoded value into green and blue.
#[inline(always)]
pub(crate) fn decode_block_bc4(compressed_block: &[u8], red_as_luminance: bool) -> RawBlock4x4 {
    let mut output = RawBlock4x4::default();

    let red = decode_smooth_alpha_block(compressed_block);
    for (pixel, value) in output.pixels.iter_mut().zip(red) {
        *pixel = if red_as_luminance {
            ColorRgba32::new(value, value, value, 255)
        } else {
            ColorRgba32::new(value, 0, 0, 255)
        };
    }

    output
}

/// Decodes a 16-byte BC5 block: two independent BC4-style halves for the red
/// and green channels.
#[inline(always)]
pub(crate) fn decode_block_bc5(compressed_block: &[u8]) -> RawBlock4x4 {
    let mut output = RawBlock4x4::default();

    let red = decode_smooth_alpha_block(&compressed_block[..8]);
    let green = decode_smooth_alpha_block(&compressed_block[8..]);
    for ((pixel, r), g) in output.pixels.iter_mut().zip(red).zip(green) {
        *pixel = ColorRgba32::new(r, g, 0, 255);
    }

    output
}

/// Decodes an 8-byte ATC color block.
#[inline(always)]
pub(crate) fn decode_block_atc(compressed_block: &[u8]) -> RawBlock4x4 {
    let mut output = RawBlock4x4::default();
    decode_atc_color_block(compressed_block, &mut output);
    output
}

/// Decodes a 16-byte ATC block with a BC2-style explicit alpha grid.
#[inline(always)]
pub(crate) fn decode_block_atc_explicit_alpha(compressed_block: &[u8]) -> RawBlock4x4 {
    let mut output = RawBlock4x4::default();
    decode_atc_color_block(&compressed_block[8..], &mut output);
    decode_sharp_alpha_block(&compressed_block[..8], &mut output);
    output
}

/// Decodes a 16-byte ATC block with a BC3-style interpolated alpha block.
#[inline(always)]
pub(crate) fn decode_block_atc_interpolated_alpha(compressed_block: &[u8]) -> RawBlock4x4 {
    let mut output = RawBlock4x4::default();
    decode_atc_color_block(&compressed_block[8..], &mut output);

    let alpha = decode_smooth_alpha_block(&compressed_block[..8]);
    for (pixel, value) in output.pixels.iter_mut().zip(alpha) {
        pixel.a = value;
    }

    output
}

/// Expands a 5-bit component to 8 bits by bit replication.
#[inline]
const fn expand5(value: u16) -> u8 {
    ((value as u32 * 527 + 23) >> 6) as u8
}

/// Expands a 6-bit component to 8 bits by bit replication.
#[inline]
const fn expand6(value: u16) -> u8 {
    ((value as u32 * 259 + 33) >> 6) as u8
}

#[inline]
const fn color_from_565(color: u16) -> ColorRgba32 {
    ColorRgba32::new(
        expand5((color >> 11) & 0x1F),
        expand6((color >> 5) & 0x3F),
        expand5(color & 0x1F),
        255,
    )
}

#[inline]
const fn color_from_555(color: u16) -> ColorRgba32 {
    ColorRgba32::new(
        expand5((color >> 10) & 0x1F),
        expand5((color >> 5) & 0x1F),
        expand5(color & 0x1F),
        255,
    )
}

/// color = 2/3*a + 1/3*b
#[inline]
fn interpolate_third(a: ColorRgba32, b: ColorRgba32) -> ColorRgba32 {
    ColorRgba32::new(
        ((2 * a.r as u16 + b.r as u16) / 3) as u8,
        ((2 * a.g as u16 + b.g as u16) / 3) as u8,
        ((2 * a.b as u16 + b.b as u16) / 3) as u8,
        255,
    )
}

/// color = 1/2*a + 1/2*b
#[inline]
fn interpolate_half(a: ColorRgba32, b: ColorRgba32) -> ColorRgba32 {
    ColorRgba32::new(
        ((a.r as u16 + b.r as u16) / 2) as u8,
        ((a.g as u16 + b.g as u16) / 2) as u8,
        ((a.b as u16 + b.b as u16) / 2) as u8,
        255,
    )
}

/// color = weight/8*a + (8-weight)/8*b
#[inline]
fn interpolate_eighth(a: ColorRgba32, b: ColorRgba32, weight: u16) -> ColorRgba32 {
    ColorRgba32::new(
        ((weight * a.r as u16 + (8 - weight) * b.r as u16) / 8) as u8,
        ((weight * a.g as u16 + (8 - weight) * b.g as u16) / 8) as u8,
        ((weight * a.b as u16 + (8 - weight) * b.b as u16) / 8) as u8,
        255,
    )
}

/// Decompresses a BC1/DXT1 color block.
///
/// The three-color mode is only reachable with `OPAQUE_MODE` off; the BC2 and
/// BC3 color halves always decode as four-color blocks regardless of endpoint
/// ordering.
#[inline(always)]
fn decode_color_block<const OPAQUE_MODE: bool>(compressed_block: &[u8], output: &mut RawBlock4x4) {
    let c0 = u16::from_le_bytes([compressed_block[0], compressed_block[1]]);
    let c1 = u16::from_le_bytes([compressed_block[2], compressed_block[3]]);

    let color0 = color_from_565(c0);
    let color1 = color_from_565(c1);

    let mut ref_colors = [
        color0,
        color1,
        ColorRgba32::default(),
        ColorRgba32::default(),
    ];

    if c0 > c1 || OPAQUE_MODE {
        // color_2 = 2/3*color_0 + 1/3*color_1
        // color_3 = 1/3*color_0 + 2/3*color_1
        ref_colors[2] = interpolate_third(color0, color1);
        ref_colors[3] = interpolate_third(color1, color0);
    } else {
        // Quite rare BC1A mode
        // color_2 = 1/2*color_0 + 1/2*color_1
        // color_3 = transparent black
        ref_colors[2] = interpolate_half(color0, color1);
        ref_colors[3] = ColorRgba32::new(0, 0, 0, 0);
    }

    let mut color_indices = u32::from_le_bytes(compressed_block[4..8].try_into().unwrap());

    // Bits 0-7 cover row 0, LSB first
    for pixel in output.pixels.iter_mut() {
        *pixel = ref_colors[(color_indices & 0x03) as usize];
        color_indices >>= 2;
    }
}

/// Decompresses an ATC color block. Bit 15 of the first endpoint selects the
/// palette rule: clear means the common 5:3 ramp between a 555 and a 565
/// endpoint, set means the opaque-black mode.
#[inline(always)]
fn decode_atc_color_block(compressed_block: &[u8], output: &mut RawBlock4x4) {
    let c0 = u16::from_le_bytes([compressed_block[0], compressed_block[1]]);
    let c1 = u16::from_le_bytes([compressed_block[2], compressed_block[3]]);

    let color0 = color_from_555(c0);
    let color1 = color_from_565(c1);

    let ref_colors = if c0 & 0x8000 == 0 {
        [
            color0,
            interpolate_eighth(color0, color1, 5),
            interpolate_eighth(color0, color1, 3),
            color1,
        ]
    } else {
        [
            ColorRgba32::new(0, 0, 0, 255),
            ColorRgba32::new(
                color0.r.saturating_sub(color1.r / 4),
                color0.g.saturating_sub(color1.g / 4),
                color0.b.saturating_sub(color1.b / 4),
                255,
            ),
            color0,
            color1,
        ]
    };

    let mut color_indices = u32::from_le_bytes(compressed_block[4..8].try_into().unwrap());

    for pixel in output.pixels.iter_mut() {
        *pixel = ref_colors[(color_indices & 0x03) as usize];
        color_indices >>= 2;
    }
}

/// Decodes a BC2/DXT3 alpha block (sharp transitions) into the alpha channel.
#[inline(always)]
fn decode_sharp_alpha_block(compressed_block: &[u8], output: &mut RawBlock4x4) {
    for i in 0..4 {
        for j in 0..4 {
            let byte_index = i * 2 + (j / 2);
            let shift = (j % 2) * 4;
            let alpha_value = (compressed_block[byte_index] >> shift) & 0x0F;
            output.pixels[i * 4 + j].a = alpha_value * 17;
        }
    }
}

/// Decodes a BC4/BC3-style alpha block (smooth transitions) into 16 channel
/// values in row-major order.
#[inline(always)]
#[rustfmt::skip]
fn decode_smooth_alpha_block(compressed_block: &[u8]) -> [u8; 16] {
    let block = u64::from_le_bytes(compressed_block[0..8].try_into().unwrap());

    let mut alpha = [0u8; 8];
    alpha[0] = (block & 0xFF) as u8;
    alpha[1] = ((block >> 8) & 0xFF) as u8;

    if alpha[0] > alpha[1] {
        // 6 interpolated alpha values
        alpha[2] = ((6 * alpha[0] as u16 +     alpha[1] as u16) / 7) as u8;   // 6/7*alpha_0 + 1/7*alpha_1
        alpha[3] = ((5 * alpha[0] as u16 + 2 * alpha[1] as u16) / 7) as u8;   // 5/7*alpha_0 + 2/7*alpha_1
        alpha[4] = ((4 * alpha[0] as u16 + 3 * alpha[1] as u16) / 7) as u8;   // 4/7*alpha_0 + 3/7*alpha_1
        alpha[5] = ((3 * alpha[0] as u16 + 4 * alpha[1] as u16) / 7) as u8;   // 3/7*alpha_0 + 4/7*alpha_1
        alpha[6] = ((2 * alpha[0] as u16 + 5 * alpha[1] as u16) / 7) as u8;   // 2/7*alpha_0 + 5/7*alpha_1
        alpha[7] = ((    alpha[0] as u16 + 6 * alpha[1] as u16) / 7) as u8;   // 1/7*alpha_0 + 6/7*alpha_1
    } else {
        // 4 interpolated alpha values
        alpha[2] = ((4 * alpha[0] as u16 +     alpha[1] as u16) / 5) as u8;   // 4/5*alpha_0 + 1/5*alpha_1
        alpha[3] = ((3 * alpha[0] as u16 + 2 * alpha[1] as u16) / 5) as u8;   // 3/5*alpha_0 + 2/5*alpha_1
        alpha[4] = ((2 * alpha[0] as u16 + 3 * alpha[1] as u16) / 5) as u8;   // 2/5*alpha_0 + 3/5*alpha_1
        alpha[5] = ((    alpha[0] as u16 + 4 * alpha[1] as u16) / 5) as u8;   // 1/5*alpha_0 + 4/5*alpha_1
        alpha[6] = 0x00;
        alpha[7] = 0xFF;
    }

    let mut indices = block >> 16;
    let mut values = [0u8; 16];

    for value in values.iter_mut() {
        *value = alpha[(indices & 0x07) as usize];
        indices >>= 3;
    }

    values
}

/// Decodes a 16-byte BC7 block.
///
/// The mode is the position of the lowest set bit of the first byte; a block
/// with all eight low bits clear is invalid and decodes to opaque black.
#[allow(clippy::needless_range_loop)]
pub(crate) fn decode_block_bc7(compressed_block: &[u8]) -> RawBlock4x4 {
    static ACTUAL_BITS_COUNT: &[[u8; 8]; 2] = &[
        [4, 6, 5, 7, 5, 7, 7, 5], // RGBA
        [0, 0, 0, 0, 6, 8, 7, 5], // Alpha
    ];

    // There are 64 possible partition sets for a two-region tile.
    // Each 4x4 block represents a single shape.
    // Here also every fix-up index has MSB bit set.
    static PARTITION_SETS: &[[[[u8; 4]; 4]; 64]; 2] = &[
        [
            // Partition table for 2-subset BPTC
            [[128, 0, 1, 1], [0, 0, 1, 1], [0, 0, 1, 1], [0, 0, 1, 129]], //  0
            [[128, 0, 0, 1], [0, 0, 0, 1], [0, 0, 0, 1], [0, 0, 0, 129]], //  1
            [[128, 1, 1, 1], [0, 1, 1, 1], [0, 1, 1, 1], [0, 1, 1, 129]], //  2
            [[128, 0, 0, 1], [0, 0, 1, 1], [0, 0, 1, 1], [0, 1, 1, 129]], //  3
            [[128, 0, 0, 0], [0, 0, 0, 1], [0, 0, 0, 1], [0, 0, 1, 129]], //  4
            [[128, 0, 1, 1], [0, 1, 1, 1], [0, 1, 1, 1], [1, 1, 1, 129]], //  5
            [[128, 0, 0, 1], [0, 0, 1, 1], [0, 1, 1, 1], [1, 1, 1, 129]], //  6
            [[128, 0, 0, 0], [0, 0, 0, 1], [0, 0, 1, 1], [0, 1, 1, 129]], //  7
            [[128, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 1], [0, 0, 1, 129]], //  8
            [[128, 0, 1, 1], [0, 1, 1, 1], [1, 1, 1, 1], [1, 1, 1, 129]], //  9
            [[128, 0, 0, 0], [0, 0, 0, 1], [0, 1, 1, 1], [1, 1, 1, 129]], // 10
            [[128, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 1], [0, 1, 1, 129]], // 11
            [[128, 0, 0, 1], [0, 1, 1, 1], [1, 1, 1, 1], [1, 1, 1, 129]], // 12
            [[128, 0, 0, 0], [0, 0, 0, 0], [1, 1, 1, 1], [1, 1, 1, 129]], // 13
            [[128, 0, 0, 0], [1, 1, 1, 1], [1, 1, 1, 1], [1, 1, 1, 129]], // 14
            [[128, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [1, 1, 1, 129]], // 15
            [[128, 0, 0, 0], [1, 0, 0, 0], [1, 1, 1, 0], [1, 1, 1, 129]], // 16
            [[128, 1, 129, 1], [0, 0, 0, 1], [0, 0, 0, 0], [0, 0, 0, 0]], // 17
            [[128, 0, 0, 0], [0, 0, 0, 0], [129, 0, 0, 0], [1, 1, 1, 0]], // 18
            [[128, 1, 129, 1], [0, 0, 1, 1], [0, 0, 0, 1], [0, 0, 0, 0]], // 19
            [[128, 0, 129, 1], [0, 0, 0, 1], [0, 0, 0, 0], [0, 0, 0, 0]], // 20
            [[128, 0, 0, 0], [1, 0, 0, 0], [129, 1, 0, 0], [1, 1, 1, 0]], // 21
            [[128, 0, 0, 0], [0, 0, 0, 0], [129, 0, 0, 0], [1, 1, 0, 0]], // 22
            [[128, 1, 1, 1], [0, 0, 1, 1], [0, 0, 1, 1], [0, 0, 0, 129]], // 23
            [[128, 0, 129, 1], [0, 0, 0, 1], [0, 0, 0, 1], [0, 0, 0, 0]], // 24
            [[128, 0, 0, 0], [1, 0, 0, 0], [129, 0, 0, 0], [1, 1, 0, 0]], // 25
            [[128, 1, 129, 0], [0, 1, 1, 0], [0, 1, 1, 0], [0, 1, 1, 0]], // 26
            [[128, 0, 129, 1], [0, 1, 1, 0], [0, 1, 1, 0], [1, 1, 0, 0]], // 27
            [[128, 0, 0, 1], [0, 1, 1, 1], [129, 1, 1, 0], [1, 0, 0, 0]], // 28
            [[128, 0, 0, 0], [1, 1, 1, 1], [129, 1, 1, 1], [0, 0, 0, 0]], // 29
            [[128, 1, 129, 1], [0, 0, 0, 1], [1, 0, 0, 0], [1, 1, 1, 0]], // 30
            [[128, 0, 129, 1], [1, 0, 0, 1], [1, 0, 0, 1], [1, 1, 0, 0]], // 31
            [[128, 1, 0, 1], [0, 1, 0, 1], [0, 1, 0, 1], [0, 1, 0, 129]], // 32
            [[128, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [1, 1, 1, 129]], // 33
            [[128, 1, 0, 1], [1, 0, 129, 0], [0, 1, 0, 1], [1, 0, 1, 0]], // 34
            [[128, 0, 1, 1], [0, 0, 1, 1], [129, 1, 0, 0], [1, 1, 0, 0]], // 35
            [[128, 0, 129, 1], [1, 1, 0, 0], [0, 0, 1, 1], [1, 1, 0, 0]], // 36
            [[128, 1, 0, 1], [0, 1, 0, 1], [129, 0, 1, 0], [1, 0, 1, 0]], // 37
            [[128, 1, 1, 0], [1, 0, 0, 1], [0, 1, 1, 0], [1, 0, 0, 129]], // 38
            [[128, 1, 0, 1], [1, 0, 1, 0], [1, 0, 1, 0], [0, 1, 0, 129]], // 39
            [[128, 1, 129, 1], [0, 0, 1, 1], [1, 1, 0, 0], [1, 1, 1, 0]], // 40
            [[128, 0, 0, 1], [0, 0, 1, 1], [129, 1, 0, 0], [1, 0, 0, 0]], // 41
            [[128, 0, 129, 1], [0, 0, 1, 0], [0, 1, 0, 0], [1, 1, 0, 0]], // 42
            [[128, 0, 129, 1], [1, 0, 1, 1], [1, 1, 0, 1], [1, 1, 0, 0]], // 43
            [[128, 1, 129, 0], [1, 0, 0, 1], [1, 0, 0, 1], [0, 1, 1, 0]], // 44
            [[128, 0, 1, 1], [1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 1, 129]], // 45
            [[128, 1, 1, 0], [0, 1, 1, 0], [1, 0, 0, 1], [1, 0, 0, 129]], // 46
            [[128, 0, 0, 0], [0, 1, 129, 0], [0, 1, 1, 0], [0, 0, 0, 0]], // 47
            [[128, 1, 0, 0], [1, 1, 129, 0], [0, 1, 0, 0], [0, 0, 0, 0]], // 48
            [[128, 0, 129, 0], [0, 1, 1, 1], [0, 0, 1, 0], [0, 0, 0, 0]], // 49
            [[128, 0, 0, 0], [0, 0, 129, 0], [0, 1, 1, 1], [0, 0, 1, 0]], // 50
            [[128, 0, 0, 0], [0, 1, 0, 0], [129, 1, 1, 0], [0, 1, 0, 0]], // 51
            [[128, 1, 1, 0], [1, 1, 0, 0], [1, 0, 0, 1], [0, 0, 1, 129]], // 52
            [[128, 0, 1, 1], [0, 1, 1, 0], [1, 1, 0, 0], [1, 0, 0, 129]], // 53
            [[128, 1, 129, 0], [0, 0, 1, 1], [1, 0, 0, 1], [1, 1, 0, 0]], // 54
            [[128, 0, 129, 1], [1, 0, 0, 1], [1, 1, 0, 0], [0, 1, 1, 0]], // 55
            [[128, 1, 1, 0], [1, 1, 0, 0], [1, 1, 0, 0], [1, 0, 0, 129]], // 56
            [[128, 1, 1, 0], [0, 0, 1, 1], [0, 0, 1, 1], [1, 0, 0, 129]], // 57
            [[128, 1, 1, 1], [1, 1, 1, 0], [1, 0, 0, 0], [0, 0, 0, 129]], // 58
            [[128, 0, 0, 1], [1, 0, 0, 0], [1, 1, 1, 0], [0, 1, 1, 129]], // 59
            [[128, 0, 0, 0], [1, 1, 1, 1], [0, 0, 1, 1], [0, 0, 1, 129]], // 60
            [[128, 0, 129, 1], [0, 0, 1, 1], [1, 1, 1, 1], [0, 0, 0, 0]], // 61
            [[128, 0, 129, 0], [0, 0, 1, 0], [1, 1, 1, 0], [1, 1, 1, 0]], // 62
            [[128, 1, 0, 0], [0, 1, 0, 0], [0, 1, 1, 1], [0, 1, 1, 129]], // 63
        ],
        [
            // Partition table for 3-subset BPTC
            [[128, 0, 1, 129], [0, 0, 1, 1], [0, 2, 2, 1], [2, 2, 2, 130]], //  0
            [[128, 0, 0, 129], [0, 0, 1, 1], [130, 2, 1, 1], [2, 2, 2, 1]], //  1
            [[128, 0, 0, 0], [2, 0, 0, 1], [130, 2, 1, 1], [2, 2, 1, 129]], //  2
            [[128, 2, 2, 130], [0, 0, 2, 2], [0, 0, 1, 1], [0, 1, 1, 129]], //  3
            [[128, 0, 0, 0], [0, 0, 0, 0], [129, 1, 2, 2], [1, 1, 2, 130]], //  4
            [[128, 0, 1, 129], [0, 0, 1, 1], [0, 0, 2, 2], [0, 0, 2, 130]], //  5
            [[128, 0, 2, 130], [0, 0, 2, 2], [1, 1, 1, 1], [1, 1, 1, 129]], //  6
            [[128, 0, 1, 1], [0, 0, 1, 1], [130, 2, 1, 1], [2, 2, 1, 129]], //  7
            [[128, 0, 0, 0], [0, 0, 0, 0], [129, 1, 1, 1], [2, 2, 2, 130]], //  8
            [[128, 0, 0, 0], [1, 1, 1, 1], [129, 1, 1, 1], [2, 2, 2, 130]], //  9
            [[128, 0, 0, 0], [1, 1, 129, 1], [2, 2, 2, 2], [2, 2, 2, 130]], // 10
            [[128, 0, 1, 2], [0, 0, 129, 2], [0, 0, 1, 2], [0, 0, 1, 130]], // 11
            [[128, 1, 1, 2], [0, 1, 129, 2], [0, 1, 1, 2], [0, 1, 1, 130]], // 12
            [[128, 1, 2, 2], [0, 129, 2, 2], [0, 1, 2, 2], [0, 1, 2, 130]], // 13
            [[128, 0, 1, 129], [0, 1, 1, 2], [1, 1, 2, 2], [1, 2, 2, 130]], // 14
            [[128, 0, 1, 129], [2, 0, 0, 1], [130, 2, 0, 0], [2, 2, 2, 0]], // 15
            [[128, 0, 0, 129], [0, 0, 1, 1], [0, 1, 1, 2], [1, 1, 2, 130]], // 16
            [[128, 1, 1, 129], [0, 0, 1, 1], [130, 0, 0, 1], [2, 2, 0, 0]], // 17
            [[128, 0, 0, 0], [1, 1, 2, 2], [129, 1, 2, 2], [1, 1, 2, 130]], // 18
            [[128, 0, 2, 130], [0, 0, 2, 2], [0, 0, 2, 2], [1, 1, 1, 129]], // 19
            [[128, 1, 1, 129], [0, 1, 1, 1], [0, 2, 2, 2], [0, 2, 2, 130]], // 20
            [[128, 0, 0, 129], [0, 0, 0, 1], [130, 2, 2, 1], [2, 2, 2, 1]], // 21
            [[128, 0, 0, 0], [0, 0, 129, 1], [0, 1, 2, 2], [0, 1, 2, 130]], // 22
            [[128, 0, 0, 0], [1, 1, 0, 0], [130, 2, 129, 0], [2, 2, 1, 0]], // 23
            [[128, 1, 2, 130], [0, 129, 2, 2], [0, 0, 1, 1], [0, 0, 0, 0]], // 24
            [[128, 0, 1, 2], [0, 0, 1, 2], [129, 1, 2, 2], [2, 2, 2, 130]], // 25
            [[128, 1, 1, 0], [1, 2, 130, 1], [129, 2, 2, 1], [0, 1, 1, 0]], // 26
            [[128, 0, 0, 0], [0, 1, 129, 0], [1, 2, 130, 1], [1, 2, 2, 1]], // 27
            [[128, 0, 2, 2], [1, 1, 0, 2], [129, 1, 0, 2], [0, 0, 2, 130]], // 28
            [[128, 1, 1, 0], [0, 129, 1, 0], [2, 0, 0, 2], [2, 2, 2, 130]], // 29
            [[128, 0, 1, 1], [0, 1, 2, 2], [0, 1, 130, 2], [0, 0, 1, 129]], // 30
            [[128, 0, 0, 0], [2, 0, 0, 0], [130, 2, 1, 1], [2, 2, 2, 129]], // 31
            [[128, 0, 0, 0], [0, 0, 0, 2], [129, 1, 2, 2], [1, 2, 2, 130]], // 32
            [[128, 2, 2, 130], [0, 0, 2, 2], [0, 0, 1, 2], [0, 0, 1, 129]], // 33
            [[128, 0, 1, 129], [0, 0, 1, 2], [0, 0, 2, 2], [0, 2, 2, 130]], // 34
            [[128, 1, 2, 0], [0, 129, 2, 0], [0, 1, 130, 0], [0, 1, 2, 0]], // 35
            [[128, 0, 0, 0], [1, 1, 129, 1], [2, 2, 130, 2], [0, 0, 0, 0]], // 36
            [[128, 1, 2, 0], [1, 2, 0, 1], [130, 0, 129, 2], [0, 1, 2, 0]], // 37
            [[128, 1, 2, 0], [2, 0, 1, 2], [129, 130, 0, 1], [0, 1, 2, 0]], // 38
            [[128, 0, 1, 1], [2, 2, 0, 0], [1, 1, 130, 2], [0, 0, 1, 129]], // 39
            [[128, 0, 1, 1], [1, 1, 130, 2], [2, 2, 0, 0], [0, 0, 1, 129]], // 40
            [[128, 1, 0, 129], [0, 1, 0, 1], [2, 2, 2, 2], [2, 2, 2, 130]], // 41
            [[128, 0, 0, 0], [0, 0, 0, 0], [130, 1, 2, 1], [2, 1, 2, 129]], // 42
            [[128, 0, 2, 2], [1, 129, 2, 2], [0, 0, 2, 2], [1, 1, 2, 130]], // 43
            [[128, 0, 2, 130], [0, 0, 1, 1], [0, 0, 2, 2], [0, 0, 1, 129]], // 44
            [[128, 2, 2, 0], [1, 2, 130, 1], [0, 2, 2, 0], [1, 2, 2, 129]], // 45
            [[128, 1, 0, 1], [2, 2, 130, 2], [2, 2, 2, 2], [0, 1, 0, 129]], // 46
            [[128, 0, 0, 0], [2, 1, 2, 1], [130, 1, 2, 1], [2, 1, 2, 129]], // 47
            [[128, 1, 0, 129], [0, 1, 0, 1], [0, 1, 0, 1], [2, 2, 2, 130]], // 48
            [[128, 2, 2, 130], [0, 1, 1, 1], [0, 2, 2, 2], [0, 1, 1, 129]], // 49
            [[128, 0, 0, 2], [1, 129, 1, 2], [0, 0, 0, 2], [1, 1, 1, 130]], // 50
            [[128, 0, 0, 0], [2, 129, 1, 2], [2, 1, 1, 2], [2, 1, 1, 130]], // 51
            [[128, 2, 2, 2], [0, 129, 1, 1], [0, 1, 1, 1], [0, 2, 2, 130]], // 52
            [[128, 0, 0, 2], [1, 1, 1, 2], [129, 1, 1, 2], [0, 0, 0, 130]], // 53
            [[128, 1, 1, 0], [0, 129, 1, 0], [0, 1, 1, 0], [2, 2, 2, 130]], // 54
            [[128, 0, 0, 0], [0, 0, 0, 0], [2, 1, 129, 2], [2, 1, 1, 130]], // 55
            [[128, 1, 1, 0], [0, 129, 1, 0], [2, 2, 2, 2], [2, 2, 2, 130]], // 56
            [[128, 0, 2, 2], [0, 0, 1, 1], [0, 0, 129, 1], [0, 0, 2, 130]], // 57
            [[128, 0, 2, 2], [1, 1, 2, 2], [129, 1, 2, 2], [0, 0, 2, 130]], // 58
            [[128, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [2, 129, 1, 130]], // 59
            [[128, 0, 0, 130], [0, 0, 0, 1], [0, 0, 0, 2], [0, 0, 0, 129]], // 60
            [[128, 2, 2, 2], [1, 2, 2, 2], [0, 2, 2, 2], [129, 2, 2, 130]], // 61
            [[128, 1, 0, 129], [2, 2, 2, 2], [2, 2, 2, 2], [2, 2, 2, 130]], // 62
            [[128, 1, 1, 129], [2, 0, 1, 1], [130, 2, 0, 1], [2, 2, 2, 0]], // 63
        ],
    ];

    static WEIGHT2: &[i32] = &[0, 21, 43, 64];
    static WEIGHT3: &[i32] = &[0, 9, 18, 27, 37, 46, 55, 64];
    static WEIGHT4: &[i32] = &[0, 4, 9, 13, 17, 21, 26, 30, 34, 38, 43, 47, 51, 55, 60, 64];

    const MODE_HAS_P_BITS: u8 = 0b11001011;

    let mut output = RawBlock4x4::default();
    let mut bstream = BitStream::new(compressed_block);

    // Find mode
    let mut mode = 0;
    while mode < 8 && bstream.read_bit() == 0 {
        mode += 1;
    }

    // Unexpected mode, the block resolves to opaque black
    if mode >= 8 {
        output.pixels.fill(ColorRgba32::new(0, 0, 0, 255));
        return output;
    }

    let mut partition = 0;
    let mut num_partitions = 1;
    let mut rotation = 0;
    let mut index_selection_bit = 0;

    if mode == 0 || mode == 1 || mode == 2 || mode == 3 || mode == 7 {
        num_partitions = if mode == 0 || mode == 2 { 3 } else { 2 };
        partition = bstream.read_bits(if mode == 0 { 4 } else { 6 }) as usize;
    }

    let num_endpoints = num_partitions * 2;

    if mode == 4 || mode == 5 {
        rotation = bstream.read_bits(2);
        if mode == 4 {
            index_selection_bit = bstream.read_bit();
        }
    }

    // Extract endpoints
    let mut endpoints = [[0i32; 4]; 6];

    // RGB
    for i in 0..3 {
        for j in 0..num_endpoints {
            endpoints[j][i] = bstream.read_bits(ACTUAL_BITS_COUNT[0][mode as usize] as u32) as i32;
        }
    }

    // Alpha (if any)
    if ACTUAL_BITS_COUNT[1][mode as usize] > 0 {
        for j in 0..num_endpoints {
            endpoints[j][3] = bstream.read_bits(ACTUAL_BITS_COUNT[1][mode as usize] as u32) as i32;
        }
    }

    // Fully decode endpoints
    // Handle modes that have P-bits
    if mode == 0 || mode == 1 || mode == 3 || mode == 6 || mode == 7 {
        // Component-wise left-shift
        for endpoint in endpoints.iter_mut().take(num_endpoints) {
            for component in endpoint.iter_mut() {
                *component <<= 1;
            }
        }

        // If P-bit is shared
        if mode == 1 {
            let i = bstream.read_bit() as i32;
            let j = bstream.read_bit() as i32;

            // RGB component-wise insert pbits
            for k in 0..3 {
                endpoints[0][k] |= i;
                endpoints[1][k] |= i;
                endpoints[2][k] |= j;
                endpoints[3][k] |= j;
            }
        } else if MODE_HAS_P_BITS & (1 << mode) != 0 {
            // Unique P-bit per endpoint
            for endpoint in endpoints.iter_mut().take(num_endpoints) {
                let j = bstream.read_bit() as i32;
                for component in endpoint.iter_mut() {
                    *component |= j;
                }
            }
        }
    }

    // Fully decode endpoints
    // Component-wise precision adjustment
    for i in 0..num_endpoints {
        // Get color components precision including pbit
        let j = ACTUAL_BITS_COUNT[0][mode as usize] + ((MODE_HAS_P_BITS >> mode) & 1);

        // RGB components
        for k in 0..3 {
            // Left shift endpoint components so that their MSB lies in bit 7
            endpoints[i][k] <<= 8 - j;
            // Replicate each component's MSB into the LSBs revealed by the left-shift operation
            endpoints[i][k] |= endpoints[i][k] >> j as i32;
        }

        // Get alpha component precision including pbit
        let j = ACTUAL_BITS_COUNT[1][mode as usize] + ((MODE_HAS_P_BITS >> mode) & 1);

        // Alpha component
        endpoints[i][3] <<= 8 - j;
        endpoints[i][3] |= endpoints[i][3] >> j as i32;
    }

    // If this mode does not explicitly define the alpha component, set alpha to 255 (1.0)
    if ACTUAL_BITS_COUNT[1][mode as usize] == 0 {
        for endpoint in endpoints.iter_mut().take(num_endpoints) {
            endpoint[3] = 0xFF;
        }
    }

    // Determine weights tables
    let index_bits2 = match mode {
        4 => 3,
        5 => 2,
        _ => 0,
    };

    let weights = match mode {
        0 | 1 => WEIGHT3,
        6 => WEIGHT4,
        _ => WEIGHT2,
    };

    let weights2 = match index_bits2 {
        2 => WEIGHT2,
        _ => WEIGHT3,
    };

    // Collect indices in two passes
    // Pass #1: collecting color indices
    let mut indices = [[0i32; 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            let partition_set = if num_partitions == 1 {
                if i | j == 0 {
                    128
                } else {
                    0
                }
            } else {
                PARTITION_SETS[num_partitions - 2][partition][i][j]
            };

            let mut idx_bits = match mode {
                0 | 1 => 3,
                6 => 4,
                _ => 2,
            };

            // Fix-up index is specified with one less bit
            // The fix-up index for subset 0 is always index 0
            if partition_set & 0x80 != 0 {
                idx_bits -= 1;
            }

            indices[i][j] = bstream.read_bits(idx_bits) as i32;
        }
    }

    // Pass #2: reading alpha indices (if any) and interpolating & rotating
    for i in 0..4 {
        for j in 0..4 {
            let partition_set = if num_partitions == 1 {
                if i | j == 0 {
                    128
                } else {
                    0
                }
            } else {
                PARTITION_SETS[num_partitions - 2][partition][i][j]
            };
            let partition_set = (partition_set & 0x03) as usize;

            let index = indices[i][j];
            let ep = partition_set * 2;

            let (mut r, mut g, mut b, mut a) = if index_bits2 == 0 {
                // No secondary index bits
                (
                    interpolate(endpoints[ep][0], endpoints[ep + 1][0], weights, index),
                    interpolate(endpoints[ep][1], endpoints[ep + 1][1], weights, index),
                    interpolate(endpoints[ep][2], endpoints[ep + 1][2], weights, index),
                    interpolate(endpoints[ep][3], endpoints[ep + 1][3], weights, index),
                )
            } else {
                let index2 = bstream.read_bits(if i | j == 0 {
                    index_bits2 - 1
                } else {
                    index_bits2
                }) as i32;

                if index_selection_bit == 0 {
                    (
                        interpolate(endpoints[ep][0], endpoints[ep + 1][0], weights, index),
                        interpolate(endpoints[ep][1], endpoints[ep + 1][1], weights, index),
                        interpolate(endpoints[ep][2], endpoints[ep + 1][2], weights, index),
                        interpolate(endpoints[ep][3], endpoints[ep + 1][3], weights2, index2),
                    )
                } else {
                    (
                        interpolate(endpoints[ep][0], endpoints[ep + 1][0], weights2, index2),
                        interpolate(endpoints[ep][1], endpoints[ep + 1][1], weights2, index2),
                        interpolate(endpoints[ep][2], endpoints[ep + 1][2], weights2, index2),
                        interpolate(endpoints[ep][3], endpoints[ep + 1][3], weights, index),
                    )
                }
            };

            // Handle rotation
            match rotation {
                1 => std::mem::swap(&mut a, &mut r), // 01 - Block format is Scalar(R) Vector(AGB) - swap A and R
                2 => std::mem::swap(&mut a, &mut g), // 10 - Block format is Scalar(G) Vector(RAB) - swap A and G
                3 => std::mem::swap(&mut a, &mut b), // 11 - Block format is Scalar(B) Vector(RGA) - swap A and B
                _ => {}
            }

            output.pixels[i * 4 + j] = ColorRgba32::new(r as u8, g as u8, b as u8, a as u8);
        }
    }

    output
}

#[inline]
fn interpolate(a: i32, b: i32, weights: &[i32], index: i32) -> i32 {
    (a * (64 - weights[index as usize]) + b * weights[index as usize] + 32) >> 6
}

/// Internal bitstream helper for reading bits from compressed data
#[derive(Debug, Clone, Copy)]
struct BitStream {
    low: u64,
    high: u64,
}

impl BitStream {
    /// Create a new bitstream from raw data.
    #[inline]
    fn new(data: &[u8]) -> Self {
        let low = u64::from_le_bytes(data[0..8].try_into().unwrap());
        let high = u64::from_le_bytes(data[8..16].try_into().unwrap());
        Self { low, high }
    }

    #[inline]
    fn read_bit(&mut self) -> u32 {
        self.read_bits(1)
    }

    #[inline]
    fn read_bits(&mut self, num_bits: u32) -> u32 {
        let mask = (1u64 << num_bits) - 1;
        // Read the low N bits.
        let bits = (self.low & mask) as u32;
        self.low >>= num_bits;

        // Put the low N bits of "high" into the high 64-N bits of "low".
        self.low |= (self.high & mask) << (64 - num_bits);
        self.high >>= num_bits;

        bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_block(decoded: RawBlock4x4, expected: &[u8; 64], name: &str) {
        for y in 0..4 {
            let start = y * 16;
            let end = start + 16;
            assert_eq!(
                &decoded.as_bytes()[start..end],
                &expected[start..end],
                "{}: Mismatch at row {}",
                name,
                y
            );
        }
    }

    fn solid(color: [u8; 4]) -> [u8; 64] {
        let mut expected = [0u8; 64];
        for pixel in expected.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
        expected
    }

    #[test]
    fn test_bc1_block_black() {
        let compressed_block = [0u8; 8];
        test_block(
            decode_block_bc1(&compressed_block, false),
            &solid([0x00, 0x00, 0x00, 0xFF]),
            "Black block",
        );
    }

    #[test]
    fn test_bc1_block_red() {
        let compressed_block = [0x00, 0xF8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        test_block(
            decode_block_bc1(&compressed_block, false),
            &solid([0xFF, 0x00, 0x00, 0xFF]),
            "Red block",
        );
    }

    #[test]
    fn test_bc1_block_green_endpoint() {
        // All indices select the second endpoint
        let compressed_block = [0x00, 0xF8, 0xE0, 0x07, 0x55, 0x55, 0x55, 0x55];
        test_block(
            decode_block_bc1(&compressed_block, false),
            &solid([0x00, 0xFF, 0x00, 0xFF]),
            "Green endpoint block",
        );
    }

    #[test]
    fn test_bc1_block_interpolated_opaque() {
        // c0 > c1, all indices 2: 2/3 red
        let compressed_block = [0x00, 0xF8, 0x00, 0x00, 0xAA, 0xAA, 0xAA, 0xAA];
        test_block(
            decode_block_bc1(&compressed_block, false),
            &solid([0xAA, 0x00, 0x00, 0xFF]),
            "Interpolated opaque block",
        );
    }

    #[test]
    fn test_bc1_block_interpolated_half() {
        // c0 <= c1, all indices 2: (c0 + c1) / 2
        let compressed_block = [0x00, 0x00, 0x00, 0xF8, 0xAA, 0xAA, 0xAA, 0xAA];
        test_block(
            decode_block_bc1(&compressed_block, false),
            &solid([0x7F, 0x00, 0x00, 0xFF]),
            "Interpolated three-color block",
        );
    }

    #[test]
    fn test_bc1_block_punch_through_with_alpha() {
        // c0 <= c1, all indices 3: transparent black
        let compressed_block = [0x00, 0x00, 0x00, 0xF8, 0xFF, 0xFF, 0xFF, 0xFF];
        test_block(
            decode_block_bc1(&compressed_block, true),
            &solid([0x00, 0x00, 0x00, 0x00]),
            "Punch-through block with alpha",
        );
    }

    #[test]
    fn test_bc1_block_punch_through_opaque() {
        // The same block without the alpha variant keeps black RGB but
        // forces alpha opaque
        let compressed_block = [0x00, 0x00, 0x00, 0xF8, 0xFF, 0xFF, 0xFF, 0xFF];
        test_block(
            decode_block_bc1(&compressed_block, false),
            &solid([0x00, 0x00, 0x00, 0xFF]),
            "Punch-through block without alpha",
        );
    }

    #[test]
    fn test_bc2_alpha_gradient() {
        let compressed_block = [
            0x10, 0x32, 0x54, 0x76, 0x98, 0xBA, 0xDC, 0xFE, 0x00, 0xF8, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ];
        let expected_output = [
            0xFF, 0x0, 0x0, 0x0, 0xFF, 0x0, 0x0, 0x11, 0xFF, 0x0, 0x0, 0x22, 0xFF, 0x0, 0x0, 0x33,
            0xFF, 0x0, 0x0, 0x44, 0xFF, 0x0, 0x0, 0x55, 0xFF, 0x0, 0x0, 0x66, 0xFF, 0x0, 0x0, 0x77,
            0xFF, 0x0, 0x0, 0x88, 0xFF, 0x0, 0x0, 0x99, 0xFF, 0x0, 0x0, 0xAA, 0xFF, 0x0, 0x0, 0xBB,
            0xFF, 0x0, 0x0, 0xCC, 0xFF, 0x0, 0x0, 0xDD, 0xFF, 0x0, 0x0, 0xEE, 0xFF, 0x0, 0x0, 0xFF,
        ];
        test_block(
            decode_block_bc2(&compressed_block),
            &expected_output,
            "Alpha gradient",
        );
    }

    #[test]
    fn test_bc2_alpha_half_transparent() {
        let compressed_block = [
            0x77, 0x77, 0x77, 0x77, 0x77, 0x77, 0x77, 0x77, 0x00, 0xF8, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ];
        test_block(
            decode_block_bc2(&compressed_block),
            &solid([0xFF, 0x00, 0x00, 0x77]),
            "Half transparent",
        );
    }

    #[test]
    fn test_bc2_opaque_mode_forced() {
        // c0 <= c1 but the color block still decodes with four opaque colors
        let compressed_block = [
            0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0xF8, 0xAA, 0xAA,
            0xAA, 0xAA,
        ];
        test_block(
            decode_block_bc2(&compressed_block),
            &solid([0x55, 0x00, 0x00, 0xFF]),
            "Forced opaque mode",
        );
    }

    #[test]
    fn test_bc3_solid_black() {
        let compressed_block = [0u8; 16];
        test_block(
            decode_block_bc3(&compressed_block),
            &solid([0x00, 0x00, 0x00, 0x00]),
            "Solid black with zero alpha",
        );
    }

    #[test]
    fn test_bc3_transparent_red() {
        let compressed_block = [
            0x00, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF8, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ];
        test_block(
            decode_block_bc3(&compressed_block),
            &solid([0xFF, 0x00, 0x00, 0x00]),
            "Transparent red",
        );
    }

    #[test]
    fn test_bc3_alpha_gradient() {
        let compressed_block = [
            0x00, 0xFF, 0xFF, 0xFF, 0x55, 0x55, 0x55, 0x55, 0x00, 0xF8, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ];
        let expected_output = [
            0xFF, 0x0, 0x0, 0xFF, 0xFF, 0x0, 0x0, 0xFF, 0xFF, 0x0, 0x0, 0xFF, 0xFF, 0x0, 0x0, 0xFF,
            0xFF, 0x0, 0x0, 0xFF, 0xFF, 0x0, 0x0, 0x66, 0xFF, 0x0, 0x0, 0xCC, 0xFF, 0x0, 0x0, 0x33,
            0xFF, 0x0, 0x0, 0xCC, 0xFF, 0x0, 0x0, 0x33, 0xFF, 0x0, 0x0, 0xCC, 0xFF, 0x0, 0x0, 0x33,
            0xFF, 0x0, 0x0, 0xCC, 0xFF, 0x0, 0x0, 0x33, 0xFF, 0x0, 0x0, 0xCC, 0xFF, 0x0, 0x0, 0x33,
        ];
        test_block(
            decode_block_bc3(&compressed_block),
            &expected_output,
            "Red with alpha gradient",
        );
    }

    #[test]
    fn test_bc3_semi_transparent() {
        let compressed_block = [
            0x80, 0x80, 0xFF, 0xFF, 0xAA, 0xAA, 0xAA, 0xAA, 0x00, 0xF8, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ];
        let expected_output = [
            0xFF, 0x0, 0x0, 0xFF, 0xFF, 0x0, 0x0, 0xFF, 0xFF, 0x0, 0x0, 0xFF, 0xFF, 0x0, 0x0, 0xFF,
            0xFF, 0x0, 0x0, 0xFF, 0xFF, 0x0, 0x0, 0x80, 0xFF, 0x0, 0x0, 0x80, 0xFF, 0x0, 0x0, 0x80,
            0xFF, 0x0, 0x0, 0x80, 0xFF, 0x0, 0x0, 0x80, 0xFF, 0x0, 0x0, 0x80, 0xFF, 0x0, 0x0, 0x80,
            0xFF, 0x0, 0x0, 0x80, 0xFF, 0x0, 0x0, 0x80, 0xFF, 0x0, 0x0, 0x80, 0xFF, 0x0, 0x0, 0x80,
        ];
        test_block(
            decode_block_bc3(&compressed_block),
            &expected_output,
            "Semi-transparent red",
        );
    }

    #[test]
    fn test_bc4_gradient() {
        let compressed_block = [0x00, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00];
        let mut expected_output = solid([0x00, 0x00, 0x00, 0xFF]);
        for pixel in expected_output.chunks_exact_mut(4).take(6) {
            pixel[0] = 0xFF;
        }
        test_block(
            decode_block_bc4(&compressed_block, false),
            &expected_output,
            "BC4 gradient",
        );
    }

    #[test]
    fn test_bc4_interpolated() {
        let compressed_block = [0x00, 0xFF, 0x92, 0x24, 0x49, 0x92, 0x00, 0x00];
        let mut expected_output = solid([0x00, 0x00, 0x00, 0xFF]);
        for pixel in expected_output.chunks_exact_mut(4).take(11) {
            pixel[0] = 0x33;
        }
        test_block(
            decode_block_bc4(&compressed_block, false),
            &expected_output,
            "BC4 interpolated",
        );
    }

    #[test]
    fn test_bc4_red_as_luminance() {
        let compressed_block = [0x64, 0x64, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        test_block(
            decode_block_bc4(&compressed_block, true),
            &solid([0x64, 0x64, 0x64, 0xFF]),
            "BC4 luminance",
        );
    }

    #[test]
    fn test_bc5_gradient() {
        let compressed_block = [
            0x00, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0x00, 0xFF, 0xFF, 0x00, 0x00,
            0x00, 0x00,
        ];
        let red = [
            0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ];
        let green = [
            0x24, 0x24, 0x24, 0x24, 0x24, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
            0xFF, 0xFF,
        ];
        let mut expected_output = [0u8; 64];
        for (pixel, (r, g)) in expected_output
            .chunks_exact_mut(4)
            .zip(red.iter().zip(green.iter()))
        {
            pixel.copy_from_slice(&[*r, *g, 0x00, 0xFF]);
        }
        test_block(
            decode_block_bc5(&compressed_block),
            &expected_output,
            "BC5 gradient",
        );
    }

    #[test]
    fn test_bc5_interpolated() {
        let compressed_block = [
            0x00, 0xFF, 0x92, 0x24, 0x49, 0x92, 0x00, 0x00, 0xFF, 0x00, 0x92, 0x24, 0x49, 0x92,
            0x00, 0x00,
        ];
        let mut expected_output = [0u8; 64];
        for (i, pixel) in expected_output.chunks_exact_mut(4).enumerate() {
            if i < 11 {
                pixel.copy_from_slice(&[0x33, 0xDA, 0x00, 0xFF]);
            } else {
                pixel.copy_from_slice(&[0x00, 0xFF, 0x00, 0xFF]);
            }
        }
        test_block(
            decode_block_bc5(&compressed_block),
            &expected_output,
            "BC5 interpolated",
        );
    }

    #[test]
    fn test_bc7_invalid_mode() {
        let compressed_block = [0u8; 16];
        test_block(
            decode_block_bc7(&compressed_block),
            &solid([0x00, 0x00, 0x00, 0xFF]),
            "BC7 invalid mode",
        );
    }

    #[test]
    fn test_bc7_mode6_transparent_black() {
        // Mode 6 with all-zero endpoints, P-bits and indices
        let mut compressed_block = [0u8; 16];
        compressed_block[0] = 0x40;
        test_block(
            decode_block_bc7(&compressed_block),
            &solid([0x00, 0x00, 0x00, 0x00]),
            "BC7 mode 6 zeros",
        );
    }

    #[test]
    fn test_bc7_mode6_white() {
        // Mode 6, both endpoints 0x7F with P-bit 1, all indices 0
        let compressed_block = [
            0xC0, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ];
        test_block(
            decode_block_bc7(&compressed_block),
            &solid([0xFF, 0xFF, 0xFF, 0xFF]),
            "BC7 mode 6 white",
        );
    }

    #[test]
    fn test_bc7_mode5_rotation() {
        // Mode 5 with rotation 1 (swap alpha and red), zero color endpoints,
        // opaque alpha endpoints and all indices 0
        let compressed_block = [
            0x60, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFC, 0xFF, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ];
        test_block(
            decode_block_bc7(&compressed_block),
            &solid([0xFF, 0x00, 0x00, 0x00]),
            "BC7 mode 5 rotation",
        );
    }

    #[test]
    fn test_atc_solid_red() {
        let compressed_block = [0x00, 0x7C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        test_block(
            decode_block_atc(&compressed_block),
            &solid([0xFF, 0x00, 0x00, 0xFF]),
            "ATC solid red",
        );
    }

    #[test]
    fn test_atc_common_palette() {
        // White to black, the first row walks all four palette entries
        let compressed_block = [0xFF, 0x7F, 0x00, 0x00, 0xE4, 0x00, 0x00, 0x00];
        let mut expected_output = solid([0xFF, 0xFF, 0xFF, 0xFF]);
        expected_output[4..8].copy_from_slice(&[0x9F, 0x9F, 0x9F, 0xFF]);
        expected_output[8..12].copy_from_slice(&[0x5F, 0x5F, 0x5F, 0xFF]);
        expected_output[12..16].copy_from_slice(&[0x00, 0x00, 0x00, 0xFF]);
        test_block(
            decode_block_atc(&compressed_block),
            &expected_output,
            "ATC common palette",
        );
    }

    #[test]
    fn test_atc_opaque_black_mode() {
        // Mode bit set: palette is {black, c0 - c1/4, c0, c1}
        let compressed_block = [0x00, 0xFC, 0x00, 0xF8, 0xE4, 0x00, 0x00, 0x00];
        let mut expected_output = solid([0xFF, 0x00, 0x00, 0xFF]);
        expected_output[0..4].copy_from_slice(&[0x00, 0x00, 0x00, 0xFF]);
        expected_output[4..8].copy_from_slice(&[0xC0, 0x00, 0x00, 0xFF]);
        test_block(
            decode_block_atc(&compressed_block),
            &expected_output,
            "ATC opaque black mode",
        );
    }

    #[test]
    fn test_atc_explicit_alpha() {
        let compressed_block = [
            0x77, 0x77, 0x77, 0x77, 0x77, 0x77, 0x77, 0x77, 0x00, 0x7C, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ];
        test_block(
            decode_block_atc_explicit_alpha(&compressed_block),
            &solid([0xFF, 0x00, 0x00, 0x77]),
            "ATC explicit alpha",
        );
    }

    #[test]
    fn test_atc_interpolated_alpha() {
        let compressed_block = [
            0x80, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x7C, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ];
        test_block(
            decode_block_atc_interpolated_alpha(&compressed_block),
            &solid([0xFF, 0x00, 0x00, 0x80]),
            "ATC interpolated alpha",
        );
    }
}
