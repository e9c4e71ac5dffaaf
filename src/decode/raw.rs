//! Raw channel kernels.
//!
//! These expand packed R/RG/RGB/RGBA/BGRA rows into RGBA pixels. They work
//! per pixel rather than per block and bypass the grid assembler entirely.

use rayon::prelude::*;

use crate::color::ColorRgba32;
use crate::context::OperationContext;
use crate::error::DecodeError;
use crate::options::DecoderOptions;
use crate::CompressionFormat;

/// One raw pixel kernel, configured for a decode call.
#[derive(Copy, Clone, Debug)]
pub(crate) enum RawKernel {
    R { red_as_luminance: bool },
    Rg,
    Rgb,
    Rgba,
    Bgra,
}

impl RawKernel {
    /// Selects the kernel for a raw pixel layout. Compressed formats have no
    /// raw kernel.
    pub(crate) fn for_format(
        format: CompressionFormat,
        options: &DecoderOptions,
    ) -> Result<Self, DecodeError> {
        match format {
            CompressionFormat::R => Ok(Self::R {
                red_as_luminance: options.red_as_luminance,
            }),
            CompressionFormat::Rg => Ok(Self::Rg),
            CompressionFormat::Rgb => Ok(Self::Rgb),
            CompressionFormat::Rgba => Ok(Self::Rgba),
            CompressionFormat::Bgra => Ok(Self::Bgra),
            _ => Err(DecodeError::UnsupportedFormat),
        }
    }

    pub(crate) const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::R { .. } => 1,
            Self::Rg => 2,
            Self::Rgb => 3,
            Self::Rgba | Self::Bgra => 4,
        }
    }

    #[inline]
    fn decode_pixel(self, bytes: &[u8]) -> ColorRgba32 {
        match self {
            Self::R { red_as_luminance } => {
                if red_as_luminance {
                    ColorRgba32::new(bytes[0], bytes[0], bytes[0], 255)
                } else {
                    ColorRgba32::new(bytes[0], 0, 0, 255)
                }
            }
            Self::Rg => ColorRgba32::new(bytes[0], bytes[1], 0, 255),
            Self::Rgb => ColorRgba32::new(bytes[0], bytes[1], bytes[2], 255),
            Self::Rgba => ColorRgba32::new(bytes[0], bytes[1], bytes[2], bytes[3]),
            Self::Bgra => ColorRgba32::new(bytes[2], bytes[1], bytes[0], bytes[3]),
        }
    }

    /// Expands a whole payload of packed pixels. The encoded length must be a
    /// multiple of the pixel size; the caller verifies this.
    pub(crate) fn decode_pixels(
        self,
        encoded: &[u8],
        ctx: &OperationContext,
    ) -> Result<Vec<ColorRgba32>, DecodeError> {
        let bytes_per_pixel = self.bytes_per_pixel();
        debug_assert_eq!(encoded.len() % bytes_per_pixel, 0);

        let pixel_count = encoded.len() / bytes_per_pixel;
        let mut pixels = vec![ColorRgba32::default(); pixel_count];
        let chunk_len = ctx.chunk_len(pixel_count);

        let decode_chunk = |out_chunk: &mut [ColorRgba32], in_chunk: &[u8]| {
            ctx.check_cancelled()?;
            for (pixel, bytes) in out_chunk
                .iter_mut()
                .zip(in_chunk.chunks_exact(bytes_per_pixel))
            {
                *pixel = self.decode_pixel(bytes);
            }
            ctx.advance_progress(out_chunk.len() as u64);
            Ok(())
        };

        if ctx.is_parallel() && pixel_count > 1 {
            pixels
                .par_chunks_mut(chunk_len)
                .zip(encoded.par_chunks(chunk_len * bytes_per_pixel))
                .try_for_each(|(out_chunk, in_chunk)| decode_chunk(out_chunk, in_chunk))?;
        } else {
            for (out_chunk, in_chunk) in pixels
                .chunks_mut(chunk_len)
                .zip(encoded.chunks(chunk_len * bytes_per_pixel))
            {
                decode_chunk(out_chunk, in_chunk)?;
            }
        }

        Ok(pixels)
    }
}
