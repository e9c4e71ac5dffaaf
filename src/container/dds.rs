//! DDS container adaptation over the `ddsfile` crate.
//!
//! The adapter never decodes anything; it resolves the surface format from
//! the pixel format or the DX10 extension header and hands out borrowed
//! per-mip slices of the layer-0 data.

use ddsfile::{Dds, DxgiFormat, PixelFormatFlags};

use crate::container::MipDescriptor;
use crate::error::DecodeError;
use crate::options::DecoderOptions;
use crate::CompressionFormat;

const FOURCC_DXT1: u32 = u32::from_le_bytes(*b"DXT1");
const FOURCC_DXT2: u32 = u32::from_le_bytes(*b"DXT2");
const FOURCC_DXT3: u32 = u32::from_le_bytes(*b"DXT3");
const FOURCC_DXT4: u32 = u32::from_le_bytes(*b"DXT4");
const FOURCC_DXT5: u32 = u32::from_le_bytes(*b"DXT5");
const FOURCC_ATI1: u32 = u32::from_le_bytes(*b"ATI1");
const FOURCC_ATI2: u32 = u32::from_le_bytes(*b"ATI2");
const FOURCC_BC4U: u32 = u32::from_le_bytes(*b"BC4U");
const FOURCC_BC5U: u32 = u32::from_le_bytes(*b"BC5U");
const FOURCC_ATC: u32 = u32::from_le_bytes(*b"ATC ");
const FOURCC_ATCA: u32 = u32::from_le_bytes(*b"ATCA");
const FOURCC_ATCI: u32 = u32::from_le_bytes(*b"ATCI");

/// Resolves the decode format of a DDS surface.
///
/// BC1 variant selection is deterministic: a set `DDPF_ALPHAPIXELS` flag
/// wins, then the `dds_bc1_expect_alpha` option, then plain BC1.
pub(crate) fn format_for_dds(
    dds: &Dds,
    options: &DecoderOptions,
) -> Result<CompressionFormat, DecodeError> {
    let pixel_format = &dds.header.spf;

    let bc1_variant = if pixel_format.flags.contains(PixelFormatFlags::ALPHA_PIXELS)
        || options.dds_bc1_expect_alpha
    {
        CompressionFormat::Bc1WithAlpha
    } else {
        CompressionFormat::Bc1
    };

    if let Some(header10) = &dds.header10 {
        return match header10.dxgi_format {
            DxgiFormat::BC1_UNorm | DxgiFormat::BC1_UNorm_sRGB => Ok(bc1_variant),
            DxgiFormat::BC2_UNorm | DxgiFormat::BC2_UNorm_sRGB => Ok(CompressionFormat::Bc2),
            DxgiFormat::BC3_UNorm | DxgiFormat::BC3_UNorm_sRGB => Ok(CompressionFormat::Bc3),
            DxgiFormat::BC4_UNorm => Ok(CompressionFormat::Bc4),
            DxgiFormat::BC5_UNorm => Ok(CompressionFormat::Bc5),
            DxgiFormat::BC7_UNorm | DxgiFormat::BC7_UNorm_sRGB => Ok(CompressionFormat::Bc7),
            DxgiFormat::R8_UNorm => Ok(CompressionFormat::R),
            DxgiFormat::R8G8_UNorm => Ok(CompressionFormat::Rg),
            DxgiFormat::R8G8B8A8_UNorm | DxgiFormat::R8G8B8A8_UNorm_sRGB => {
                Ok(CompressionFormat::Rgba)
            }
            DxgiFormat::B8G8R8A8_UNorm | DxgiFormat::B8G8R8A8_UNorm_sRGB => {
                Ok(CompressionFormat::Bgra)
            }
            _ => Err(DecodeError::UnsupportedFormat),
        };
    }

    if let Some(four_cc) = &pixel_format.fourcc {
        return match four_cc.0 {
            FOURCC_DXT1 => Ok(bc1_variant),
            FOURCC_DXT2 | FOURCC_DXT3 => Ok(CompressionFormat::Bc2),
            FOURCC_DXT4 | FOURCC_DXT5 => Ok(CompressionFormat::Bc3),
            FOURCC_ATI1 | FOURCC_BC4U => Ok(CompressionFormat::Bc4),
            FOURCC_ATI2 | FOURCC_BC5U => Ok(CompressionFormat::Bc5),
            FOURCC_ATC => Ok(CompressionFormat::Atc),
            FOURCC_ATCA => Ok(CompressionFormat::AtcExplicitAlpha),
            FOURCC_ATCI => Ok(CompressionFormat::AtcInterpolatedAlpha),
            _ => Err(DecodeError::UnsupportedFormat),
        };
    }

    // Masked uncompressed data
    match (pixel_format.rgb_bit_count, pixel_format.r_bit_mask) {
        (Some(32), Some(0x0000_00FF)) => Ok(CompressionFormat::Rgba),
        (Some(32), Some(0x00FF_0000)) => Ok(CompressionFormat::Bgra),
        (Some(24), Some(0x0000_00FF)) => Ok(CompressionFormat::Rgb),
        (Some(16), Some(0x0000_00FF)) => Ok(CompressionFormat::Rg),
        (Some(8), Some(0x0000_00FF)) => Ok(CompressionFormat::R),
        _ => Err(DecodeError::UnsupportedFormat),
    }
}

/// Slices the layer-0 data of a DDS surface into one descriptor per mip.
pub(crate) fn mip_descriptors<'a>(
    dds: &'a Dds,
    format: CompressionFormat,
) -> Result<Vec<MipDescriptor<'a>>, DecodeError> {
    let mip_count = dds.header.mip_map_count.unwrap_or(1).max(1);
    let data: &[u8] = &dds.data;

    let mut width = dds.header.width;
    let mut height = dds.header.height;
    let mut offset = 0;

    let mut mips = Vec::with_capacity(mip_count as usize);
    for _ in 0..mip_count {
        let size = format.buffer_byte_size(width, height);
        let end = offset + size;
        if end > data.len() {
            return Err(DecodeError::LengthMismatch {
                required: end,
                actual: data.len(),
            });
        }

        mips.push(MipDescriptor {
            width,
            height,
            data: &data[offset..end],
        });

        offset = end;
        width = (width / 2).max(1);
        height = (height / 2).max(1);
    }

    Ok(mips)
}
