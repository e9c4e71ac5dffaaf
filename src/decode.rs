//! Kernel selection and the many-block decode path.
//!
//! The kernel for a mip level is selected once per level; the hot loop only
//! ever dispatches through a plain enum match. `decode_many` partitions the
//! block range into contiguous chunks and runs them either on the calling
//! thread or on the rayon worker pool, with cancellation polled and progress
//! advanced at every chunk boundary.

mod block;
pub(crate) mod raw;

use rayon::prelude::*;

use self::block::{
    decode_block_atc, decode_block_atc_explicit_alpha, decode_block_atc_interpolated_alpha,
    decode_block_bc1, decode_block_bc2, decode_block_bc3, decode_block_bc4, decode_block_bc5,
    decode_block_bc7,
};
use crate::color::{ColorRgba32, RawBlock4x4};
use crate::context::OperationContext;
use crate::error::DecodeError;
use crate::options::DecoderOptions;
use crate::CompressionFormat;

/// One block kernel, configured for a decode call.
#[derive(Copy, Clone, Debug)]
pub(crate) enum BlockKernel {
    Bc1,
    Bc1WithAlpha,
    Bc2,
    Bc3,
    Bc4 { red_as_luminance: bool },
    Bc5,
    Bc7,
    Atc,
    AtcExplicitAlpha,
    AtcInterpolatedAlpha,
}

impl BlockKernel {
    /// Selects the kernel for a compressed format. Raw pixel layouts have no
    /// block kernel.
    pub(crate) fn for_format(
        format: CompressionFormat,
        options: &DecoderOptions,
    ) -> Result<Self, DecodeError> {
        match format {
            CompressionFormat::Bc1 => Ok(Self::Bc1),
            CompressionFormat::Bc1WithAlpha => Ok(Self::Bc1WithAlpha),
            CompressionFormat::Bc2 => Ok(Self::Bc2),
            CompressionFormat::Bc3 => Ok(Self::Bc3),
            CompressionFormat::Bc4 => Ok(Self::Bc4 {
                red_as_luminance: options.red_as_luminance,
            }),
            CompressionFormat::Bc5 => Ok(Self::Bc5),
            CompressionFormat::Bc7 => Ok(Self::Bc7),
            CompressionFormat::Atc => Ok(Self::Atc),
            CompressionFormat::AtcExplicitAlpha => Ok(Self::AtcExplicitAlpha),
            CompressionFormat::AtcInterpolatedAlpha => Ok(Self::AtcInterpolatedAlpha),
            CompressionFormat::R
            | CompressionFormat::Rg
            | CompressionFormat::Rgb
            | CompressionFormat::Rgba
            | CompressionFormat::Bgra => Err(DecodeError::UnsupportedFormat),
        }
    }

    pub(crate) const fn block_byte_size(self) -> usize {
        match self {
            Self::Bc1 | Self::Bc1WithAlpha | Self::Bc4 | Self::Atc => 8,
            Self::Bc2
            | Self::Bc3
            | Self::Bc5
            | Self::Bc7
            | Self::AtcExplicitAlpha
            | Self::AtcInterpolatedAlpha => 16,
        }
    }

    /// Decodes exactly one block. `compressed_block` must be
    /// `block_byte_size` bytes.
    #[inline]
    pub(crate) fn decode_one(self, compressed_block: &[u8]) -> RawBlock4x4 {
        match self {
            Self::Bc1 => decode_block_bc1(compressed_block, false),
            Self::Bc1WithAlpha => decode_block_bc1(compressed_block, true),
            Self::Bc2 => decode_block_bc2(compressed_block),
            Self::Bc3 => decode_block_bc3(compressed_block),
            Self::Bc4 { red_as_luminance } => decode_block_bc4(compressed_block, red_as_luminance),
            Self::Bc5 => decode_block_bc5(compressed_block),
            Self::Bc7 => decode_block_bc7(compressed_block),
            Self::Atc => decode_block_atc(compressed_block),
            Self::AtcExplicitAlpha => decode_block_atc_explicit_alpha(compressed_block),
            Self::AtcInterpolatedAlpha => decode_block_atc_interpolated_alpha(compressed_block),
        }
    }

    /// Decodes a whole payload of blocks. The encoded length must be a
    /// multiple of the block size; the caller verifies this.
    pub(crate) fn decode_many(
        self,
        encoded: &[u8],
        ctx: &OperationContext,
    ) -> Result<Vec<RawBlock4x4>, DecodeError> {
        let block_size = self.block_byte_size();
        debug_assert_eq!(encoded.len() % block_size, 0);

        let block_count = encoded.len() / block_size;
        let mut blocks = vec![RawBlock4x4::default(); block_count];
        let chunk_len = ctx.chunk_len(block_count);

        let decode_chunk = |out_chunk: &mut [RawBlock4x4], in_chunk: &[u8]| {
            ctx.check_cancelled()?;
            for (block, bytes) in out_chunk.iter_mut().zip(in_chunk.chunks_exact(block_size)) {
                *block = self.decode_one(bytes);
            }
            ctx.advance_progress(out_chunk.len() as u64);
            Ok(())
        };

        if ctx.is_parallel() && block_count > 1 {
            blocks
                .par_chunks_mut(chunk_len)
                .zip(encoded.par_chunks(chunk_len * block_size))
                .try_for_each(|(out_chunk, in_chunk)| decode_chunk(out_chunk, in_chunk))?;
        } else {
            for (out_chunk, in_chunk) in blocks
                .chunks_mut(chunk_len)
                .zip(encoded.chunks(chunk_len * block_size))
            {
                decode_chunk(out_chunk, in_chunk)?;
            }
        }

        Ok(blocks)
    }
}

/// Writes a flat sequence of decoded blocks into a row-major `width*height`
/// pixel buffer.
///
/// Blocks are laid out row-major over a `ceil(width/4) x ceil(height/4)`
/// grid; pixels of the bottom-right blocks that fall outside the image are
/// discarded. This is the only place non-multiple-of-4 dimensions are
/// handled.
pub(crate) fn assemble_blocks(
    blocks: &[RawBlock4x4],
    width: usize,
    height: usize,
) -> Vec<ColorRgba32> {
    let blocks_x = width.div_ceil(4);
    let blocks_y = height.div_ceil(4);
    debug_assert_eq!(blocks.len(), blocks_x * blocks_y);

    let mut pixels = vec![ColorRgba32::default(); width * height];

    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let block = &blocks[by * blocks_x + bx];

            for y in 0..4 {
                let py = by * 4 + y;
                if py >= height {
                    break;
                }

                let px = bx * 4;
                let columns = 4.min(width - px);
                let row = py * width + px;
                pixels[row..row + columns]
                    .copy_from_slice(&block.pixels[y * 4..y * 4 + columns]);
            }
        }
    }

    pixels
}
