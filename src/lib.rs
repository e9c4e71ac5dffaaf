//! # block_decompression
//!
//! CPU decoding of GPU block-compressed textures into 32-bit RGBA pixels.
//!
//! Input is either a raw encoded payload with explicit dimensions and format,
//! or a self-describing KTX 1.1 / DDS container; output is one row-major
//! RGBA8 pixel buffer per mipmap level. Blocks are independent of each other,
//! so payloads can be decoded sequentially or data-parallel on a worker pool
//! with cooperative cancellation and progress reporting.
//!
//! ## Supported formats
//!
//!  * BC1 (with and without 1-bit alpha), BC2, BC3, BC4, BC5, BC7
//!  * ATC, ATC explicit alpha, ATC interpolated alpha
//!  * Uncompressed R, RG, RGB, RGBA and BGRA layouts
//!
//! BC6H is not supported; decoded pixels are returned in the container's
//! stored color space verbatim.

mod color;
mod container;
mod context;
mod decode;
mod decoder;
mod error;
mod options;

pub use color::{ColorRgba32, DecodedImage, RawBlock4x4};
pub use container::ktx::{KtxFile, KtxHeader, KtxMipmap, KTX_IDENTIFIER};
pub use container::MipDescriptor;
pub use context::CancellationToken;
pub use decoder::BcDecoder;
pub use error::{DecodeError, DecodeResult};
pub use options::{DecoderOptions, ProgressCallback};

pub use ddsfile;

/// Encoded payload kinds supported by this crate.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum CompressionFormat {
    /// Uncompressed single channel (8 bits per pixel).
    R,
    /// Uncompressed two channels (16 bits per pixel).
    Rg,
    /// Uncompressed three channels (24 bits per pixel).
    Rgb,
    /// Uncompressed four channels (32 bits per pixel).
    Rgba,
    /// Uncompressed four channels with blue first (32 bits per pixel).
    Bgra,
    /// BC1 compression, alpha forced opaque (RGB).
    Bc1,
    /// BC1 compression with 1-bit alpha (RGBA).
    Bc1WithAlpha,
    /// BC2 compression with explicit 4-bit alpha (RGBA).
    Bc2,
    /// BC3 compression with interpolated alpha (RGBA).
    Bc3,
    /// BC4 compression (R).
    Bc4,
    /// BC5 compression (RG).
    Bc5,
    /// BC7 compression (RGBA).
    Bc7,
    /// ATC compression (RGB).
    Atc,
    /// ATC compression with explicit 4-bit alpha (RGBA).
    AtcExplicitAlpha,
    /// ATC compression with interpolated alpha (RGBA).
    AtcInterpolatedAlpha,
}

impl CompressionFormat {
    /// Returns whether the format is block-compressed rather than a raw
    /// pixel layout.
    pub const fn is_compressed(self) -> bool {
        !matches!(
            self,
            CompressionFormat::R
                | CompressionFormat::Rg
                | CompressionFormat::Rgb
                | CompressionFormat::Rgba
                | CompressionFormat::Bgra
        )
    }

    /// Returns the byte size of one encoded unit: a 4x4 block for the
    /// compressed formats, a single pixel for the raw layouts.
    pub const fn block_byte_size(self) -> usize {
        match self {
            CompressionFormat::R => 1,
            CompressionFormat::Rg => 2,
            CompressionFormat::Rgb => 3,
            CompressionFormat::Rgba | CompressionFormat::Bgra => 4,
            CompressionFormat::Bc1 | CompressionFormat::Bc1WithAlpha => 8,
            CompressionFormat::Bc2 | CompressionFormat::Bc3 => 16,
            CompressionFormat::Bc4 => 8,
            CompressionFormat::Bc5 | CompressionFormat::Bc7 => 16,
            CompressionFormat::Atc => 8,
            CompressionFormat::AtcExplicitAlpha | CompressionFormat::AtcInterpolatedAlpha => 16,
        }
    }

    /// Pixel extent of one encoded unit per axis: 4 for compressed formats,
    /// 1 for raw layouts.
    pub const fn block_dimension(self) -> u32 {
        if self.is_compressed() {
            4
        } else {
            1
        }
    }

    /// Returns the bytes per encoded row for the given width.
    ///
    /// For compressed formats the width is rounded up to the nearest
    /// multiple of 4.
    pub const fn bytes_per_row(self, width: u32) -> usize {
        if self.is_compressed() {
            let blocks_per_row = (width as usize + 3) / 4;
            blocks_per_row * self.block_byte_size()
        } else {
            width as usize * self.block_byte_size()
        }
    }

    /// Returns the exact byte size of an encoded payload for the given
    /// dimensions.
    pub const fn buffer_byte_size(self, width: u32, height: u32) -> usize {
        if self.is_compressed() {
            let block_height = (height as usize + 3) / 4;
            self.bytes_per_row(width) * block_height
        } else {
            self.block_byte_size() * width as usize * height as usize
        }
    }

    /// Number of encoded units covering the given dimensions; this is the
    /// unit the progress counter advances in.
    pub(crate) const fn unit_count(self, width: u32, height: u32) -> u64 {
        if self.is_compressed() {
            block_count(width, height) as u64
        } else {
            width as u64 * height as u64
        }
    }
}

/// Number of 4x4 blocks covering an image of the given dimensions.
pub const fn block_count(width: u32, height: u32) -> usize {
    let block_width = (width as usize + 3) / 4;
    let block_height = (height as usize + 3) / 4;
    block_width * block_height
}
