//! KTX 1.1 container reading.
//!
//! The reader only rearranges bytes: it yields the typed header and one byte
//! payload per mip level and face. Format selection from the header's GL
//! identifiers lives here as well, next to the constants it interprets.

use std::io::Read;

use crate::container::read_exact_or_truncated;
use crate::error::DecodeError;
use crate::CompressionFormat;

/// The 12-byte KTX 1.1 file identifier.
pub const KTX_IDENTIFIER: [u8; 12] = [
    0xAB, b'K', b'T', b'X', b' ', b'1', b'1', 0xBB, b'\r', b'\n', 0x1A, b'\n',
];

const ENDIANNESS_MATCH: u32 = 0x0403_0201;
const ENDIANNESS_SWAPPED: u32 = 0x0102_0304;

const GL_COMPRESSED_RGB_S3TC_DXT1: u32 = 0x83F0;
const GL_COMPRESSED_RGBA_S3TC_DXT1: u32 = 0x83F1;
const GL_COMPRESSED_RGBA_S3TC_DXT3: u32 = 0x83F2;
const GL_COMPRESSED_RGBA_S3TC_DXT5: u32 = 0x83F3;
const GL_COMPRESSED_RED_RGTC1: u32 = 0x8DBB;
const GL_COMPRESSED_RG_RGTC2: u32 = 0x8DBD;
const GL_COMPRESSED_RGBA_BPTC_UNORM: u32 = 0x8E8C;
const GL_COMPRESSED_SRGB_ALPHA_BPTC_UNORM: u32 = 0x8E8D;
const GL_ATC_RGB_AMD: u32 = 0x8C92;
const GL_ATC_RGBA_EXPLICIT_ALPHA_AMD: u32 = 0x8C93;
const GL_ATC_RGBA_INTERPOLATED_ALPHA_AMD: u32 = 0x87EE;
const GL_R8: u32 = 0x8229;
const GL_RG8: u32 = 0x822B;
const GL_RGB8: u32 = 0x8051;
const GL_RGBA8: u32 = 0x8058;
const GL_SRGB8: u32 = 0x8C41;
const GL_SRGB8_ALPHA8: u32 = 0x8C43;
const GL_BGRA: u32 = 0x80E1;

/// The 13 header words following the KTX identifier.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct KtxHeader {
    pub gl_type: u32,
    pub gl_type_size: u32,
    pub gl_format: u32,
    pub gl_internal_format: u32,
    pub gl_base_internal_format: u32,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub pixel_depth: u32,
    pub array_element_count: u32,
    pub face_count: u32,
    pub mip_count: u32,
    pub key_value_byte_count: u32,
}

/// One mip level with its payload per face.
///
/// Only face 0 is ever decoded; further faces are retained as parsed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KtxMipmap {
    pub width: u32,
    pub height: u32,
    pub faces: Vec<Vec<u8>>,
}

/// A parsed KTX 1.1 texture.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KtxFile {
    pub header: KtxHeader,
    pub mipmaps: Vec<KtxMipmap>,
}

impl KtxFile {
    /// Reads a KTX 1.1 texture from a stream.
    ///
    /// Files written with the opposite byte order are swapped while reading.
    /// An unknown identifier or endianness marker fails with
    /// [`DecodeError::MalformedContainer`]; running out of data fails with
    /// [`DecodeError::Truncated`].
    pub fn read<R: Read>(mut reader: R) -> Result<Self, DecodeError> {
        let mut identifier = [0u8; 12];
        read_exact_or_truncated(&mut reader, &mut identifier)?;
        if identifier != KTX_IDENTIFIER {
            return Err(DecodeError::MalformedContainer);
        }

        let endianness = read_u32(&mut reader, false)?;
        let swap = match endianness {
            ENDIANNESS_MATCH => false,
            ENDIANNESS_SWAPPED => true,
            _ => return Err(DecodeError::MalformedContainer),
        };

        let mut words = [0u32; 12];
        for word in words.iter_mut() {
            *word = read_u32(&mut reader, swap)?;
        }

        let header = KtxHeader {
            gl_type: words[0],
            gl_type_size: words[1],
            gl_format: words[2],
            gl_internal_format: words[3],
            gl_base_internal_format: words[4],
            pixel_width: words[5],
            pixel_height: words[6],
            pixel_depth: words[7],
            array_element_count: words[8],
            face_count: words[9],
            mip_count: words[10],
            key_value_byte_count: words[11],
        };

        let mut key_value_data = vec![0u8; header.key_value_byte_count as usize];
        read_exact_or_truncated(&mut reader, &mut key_value_data)?;

        let mip_count = header.mip_count.max(1);
        let face_count = header.face_count.max(1);

        let mut mipmaps = Vec::with_capacity(mip_count as usize);
        for level in 0..mip_count {
            let image_size = read_u32(&mut reader, swap)? as usize;
            // Each face payload is padded to 4-byte alignment
            let padding = (4 - image_size % 4) % 4;

            let mut faces = Vec::with_capacity(face_count as usize);
            for _ in 0..face_count {
                let mut data = vec![0u8; image_size];
                read_exact_or_truncated(&mut reader, &mut data)?;
                faces.push(data);

                let mut pad = [0u8; 3];
                read_exact_or_truncated(&mut reader, &mut pad[..padding])?;
            }

            mipmaps.push(KtxMipmap {
                width: (header.pixel_width >> level).max(1),
                height: (header.pixel_height >> level).max(1),
                faces,
            });
        }

        Ok(Self { header, mipmaps })
    }
}

fn read_u32<R: Read>(reader: &mut R, swap: bool) -> Result<u32, DecodeError> {
    let mut bytes = [0u8; 4];
    read_exact_or_truncated(reader, &mut bytes)?;
    let value = u32::from_le_bytes(bytes);
    Ok(if swap { value.swap_bytes() } else { value })
}

/// Maps the header's GL identifiers onto the format registry.
pub(crate) fn format_for_gl(header: &KtxHeader) -> Result<CompressionFormat, DecodeError> {
    match header.gl_internal_format {
        GL_COMPRESSED_RGB_S3TC_DXT1 => Ok(CompressionFormat::Bc1),
        GL_COMPRESSED_RGBA_S3TC_DXT1 => Ok(CompressionFormat::Bc1WithAlpha),
        GL_COMPRESSED_RGBA_S3TC_DXT3 => Ok(CompressionFormat::Bc2),
        GL_COMPRESSED_RGBA_S3TC_DXT5 => Ok(CompressionFormat::Bc3),
        GL_COMPRESSED_RED_RGTC1 => Ok(CompressionFormat::Bc4),
        GL_COMPRESSED_RG_RGTC2 => Ok(CompressionFormat::Bc5),
        GL_COMPRESSED_RGBA_BPTC_UNORM | GL_COMPRESSED_SRGB_ALPHA_BPTC_UNORM => {
            Ok(CompressionFormat::Bc7)
        }
        GL_ATC_RGB_AMD => Ok(CompressionFormat::Atc),
        GL_ATC_RGBA_EXPLICIT_ALPHA_AMD => Ok(CompressionFormat::AtcExplicitAlpha),
        GL_ATC_RGBA_INTERPOLATED_ALPHA_AMD => Ok(CompressionFormat::AtcInterpolatedAlpha),
        GL_R8 => Ok(CompressionFormat::R),
        GL_RG8 => Ok(CompressionFormat::Rg),
        GL_RGB8 | GL_SRGB8 => Ok(CompressionFormat::Rgb),
        GL_RGBA8 | GL_SRGB8_ALPHA8 => {
            if header.gl_format == GL_BGRA {
                Ok(CompressionFormat::Bgra)
            } else {
                Ok(CompressionFormat::Rgba)
            }
        }
        _ => Err(DecodeError::UnsupportedFormat),
    }
}
