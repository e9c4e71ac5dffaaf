//! The public decoder surface.
//!
//! [`BcDecoder`] owns the per-decoder options and exposes the raw-payload,
//! container, stream and single-block entry points, plus asynchronous
//! variants that dispatch the identical synchronous computation onto the
//! worker pool.

use std::io::Read;

use ddsfile::Dds;
use futures::channel::oneshot;

use crate::color::{ColorRgba32, DecodedImage, RawBlock4x4};
use crate::container::ktx::KtxFile;
use crate::container::{
    self, read_exact_or_truncated, ContainerView, MipDescriptor, ParsedContainer,
};
use crate::context::{CancellationToken, OperationContext};
use crate::decode::{assemble_blocks, raw::RawKernel, BlockKernel};
use crate::error::DecodeError;
use crate::options::DecoderOptions;
use crate::CompressionFormat;

/// Decoder for block-compressed and raw texture payloads.
///
/// A decoder is cheap to construct and carries no state between calls beyond
/// its options; every decode owns its output buffers exclusively until they
/// are returned.
#[derive(Clone, Debug, Default)]
pub struct BcDecoder {
    options: DecoderOptions,
}

impl BcDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecoderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut DecoderOptions {
        &mut self.options
    }

    // --- raw payloads ---

    /// Decodes a raw encoded payload with explicit dimensions.
    ///
    /// `data` must be exactly
    /// [`buffer_byte_size`](CompressionFormat::buffer_byte_size) bytes long.
    pub fn decode_raw(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        format: CompressionFormat,
    ) -> Result<Vec<ColorRgba32>, DecodeError> {
        self.decode_raw_with_token(data, width, height, format, &CancellationToken::new())
    }

    /// [`decode_raw`](Self::decode_raw) with the result wrapped in its 2-D
    /// shape.
    pub fn decode_raw_2d(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        format: CompressionFormat,
    ) -> Result<DecodedImage, DecodeError> {
        let pixels = self.decode_raw(data, width, height, format)?;
        Ok(DecodedImage::new(pixels, width, height))
    }

    /// Reads exactly the required payload size from the stream and decodes
    /// it. A short stream fails with [`DecodeError::Truncated`].
    pub fn decode_raw_stream<R: Read>(
        &self,
        mut reader: R,
        width: u32,
        height: u32,
        format: CompressionFormat,
    ) -> Result<Vec<ColorRgba32>, DecodeError> {
        let mut data = vec![0u8; format.buffer_byte_size(width, height)];
        read_exact_or_truncated(&mut reader, &mut data)?;
        self.decode_raw(&data, width, height, format)
    }

    /// [`decode_raw_stream`](Self::decode_raw_stream) with the result wrapped
    /// in its 2-D shape.
    pub fn decode_raw_stream_2d<R: Read>(
        &self,
        reader: R,
        width: u32,
        height: u32,
        format: CompressionFormat,
    ) -> Result<DecodedImage, DecodeError> {
        let pixels = self.decode_raw_stream(reader, width, height, format)?;
        Ok(DecodedImage::new(pixels, width, height))
    }

    // --- single blocks ---

    /// Decodes a single compressed block. Raw formats have no block kernel
    /// and fail with [`DecodeError::UnsupportedFormat`].
    pub fn decode_block(
        &self,
        block: &[u8],
        format: CompressionFormat,
    ) -> Result<RawBlock4x4, DecodeError> {
        let kernel = BlockKernel::for_format(format, &self.options)?;
        let required = kernel.block_byte_size();
        if block.len() != required {
            return Err(DecodeError::LengthMismatch {
                required,
                actual: block.len(),
            });
        }

        Ok(kernel.decode_one(block))
    }

    /// Reads and decodes one block from a stream into `output`, which must
    /// hold exactly the 16 pixels of a 4x4 grid.
    ///
    /// Returns the consumed block byte size, or 0 on a clean end of stream.
    /// A partially read block fails with [`DecodeError::Truncated`].
    pub fn decode_block_stream<R: Read>(
        &self,
        reader: &mut R,
        format: CompressionFormat,
        output: &mut [ColorRgba32],
    ) -> Result<usize, DecodeError> {
        if output.len() != 16 {
            return Err(DecodeError::InvalidShape(output.len()));
        }

        let kernel = BlockKernel::for_format(format, &self.options)?;
        let required = kernel.block_byte_size();

        let mut buffer = [0u8; 16];
        let buffer = &mut buffer[..required];

        let mut read = 0;
        while read < required {
            match reader.read(&mut buffer[read..]) {
                Ok(0) => break,
                Ok(count) => read += count,
                Err(error) if error.kind() == std::io::ErrorKind::Interrupted => {}
                Err(error) => return Err(DecodeError::Io(error)),
            }
        }

        if read == 0 {
            return Ok(0);
        }
        if read < required {
            return Err(DecodeError::Truncated { required, read });
        }

        output.copy_from_slice(&kernel.decode_one(buffer).pixels);
        Ok(required)
    }

    // --- containers ---

    /// Decodes the base mip level of a parsed KTX texture (face 0).
    pub fn decode_ktx(&self, ktx: &KtxFile) -> Result<Vec<ColorRgba32>, DecodeError> {
        self.decode_ktx_with_token(ktx, &CancellationToken::new())
    }

    /// [`decode_ktx`](Self::decode_ktx) with the result wrapped in its 2-D
    /// shape.
    pub fn decode_ktx_2d(&self, ktx: &KtxFile) -> Result<DecodedImage, DecodeError> {
        let view = container::view_ktx(ktx)?;
        self.decode_base_2d(&view, &CancellationToken::new())
    }

    /// Decodes every mip level of a parsed KTX texture (face 0).
    pub fn decode_ktx_all_mipmaps(&self, ktx: &KtxFile) -> Result<Vec<Vec<ColorRgba32>>, DecodeError> {
        let view = container::view_ktx(ktx)?;
        self.decode_mips(view.format, &view.mips, &CancellationToken::new())
    }

    /// [`decode_ktx_all_mipmaps`](Self::decode_ktx_all_mipmaps) with each
    /// level wrapped in its 2-D shape.
    pub fn decode_ktx_all_mipmaps_2d(&self, ktx: &KtxFile) -> Result<Vec<DecodedImage>, DecodeError> {
        let view = container::view_ktx(ktx)?;
        self.decode_all_2d(&view, &CancellationToken::new())
    }

    /// Decodes the base mip level of a parsed DDS surface.
    pub fn decode_dds(&self, dds: &Dds) -> Result<Vec<ColorRgba32>, DecodeError> {
        self.decode_dds_with_token(dds, &CancellationToken::new())
    }

    /// [`decode_dds`](Self::decode_dds) with the result wrapped in its 2-D
    /// shape.
    pub fn decode_dds_2d(&self, dds: &Dds) -> Result<DecodedImage, DecodeError> {
        let view = container::view_dds(dds, &self.options)?;
        self.decode_base_2d(&view, &CancellationToken::new())
    }

    /// Decodes every mip level of a parsed DDS surface.
    pub fn decode_dds_all_mipmaps(&self, dds: &Dds) -> Result<Vec<Vec<ColorRgba32>>, DecodeError> {
        let view = container::view_dds(dds, &self.options)?;
        self.decode_mips(view.format, &view.mips, &CancellationToken::new())
    }

    /// [`decode_dds_all_mipmaps`](Self::decode_dds_all_mipmaps) with each
    /// level wrapped in its 2-D shape.
    pub fn decode_dds_all_mipmaps_2d(&self, dds: &Dds) -> Result<Vec<DecodedImage>, DecodeError> {
        let view = container::view_dds(dds, &self.options)?;
        self.decode_all_2d(&view, &CancellationToken::new())
    }

    // --- streams ---

    /// Sniffs the magic bytes of a stream and decodes the base mip level of
    /// the KTX or DDS container it holds.
    pub fn decode_stream<R: Read>(&self, reader: R) -> Result<Vec<ColorRgba32>, DecodeError> {
        match container::read_container(reader)? {
            ParsedContainer::Ktx(ktx) => self.decode_ktx(&ktx),
            ParsedContainer::Dds(dds) => self.decode_dds(&dds),
        }
    }

    /// [`decode_stream`](Self::decode_stream) with the result wrapped in its
    /// 2-D shape.
    pub fn decode_stream_2d<R: Read>(&self, reader: R) -> Result<DecodedImage, DecodeError> {
        match container::read_container(reader)? {
            ParsedContainer::Ktx(ktx) => self.decode_ktx_2d(&ktx),
            ParsedContainer::Dds(dds) => self.decode_dds_2d(&dds),
        }
    }

    /// Sniffs the magic bytes of a stream and decodes every mip level of the
    /// KTX or DDS container it holds.
    pub fn decode_stream_all_mipmaps<R: Read>(
        &self,
        reader: R,
    ) -> Result<Vec<Vec<ColorRgba32>>, DecodeError> {
        match container::read_container(reader)? {
            ParsedContainer::Ktx(ktx) => self.decode_ktx_all_mipmaps(&ktx),
            ParsedContainer::Dds(dds) => self.decode_dds_all_mipmaps(&dds),
        }
    }

    // --- asynchronous variants ---

    /// Dispatches [`decode_raw`](Self::decode_raw) onto the worker pool.
    pub async fn decode_raw_async(
        &self,
        data: Vec<u8>,
        width: u32,
        height: u32,
        format: CompressionFormat,
        token: &CancellationToken,
    ) -> Result<Vec<ColorRgba32>, DecodeError> {
        let decoder = self.clone();
        let token = token.clone();
        run_on_pool(move || decoder.decode_raw_with_token(&data, width, height, format, &token))
            .await
    }

    /// Dispatches [`decode_raw_2d`](Self::decode_raw_2d) onto the worker
    /// pool.
    pub async fn decode_raw_2d_async(
        &self,
        data: Vec<u8>,
        width: u32,
        height: u32,
        format: CompressionFormat,
        token: &CancellationToken,
    ) -> Result<DecodedImage, DecodeError> {
        let decoder = self.clone();
        let token = token.clone();
        run_on_pool(move || {
            let pixels = decoder.decode_raw_with_token(&data, width, height, format, &token)?;
            Ok(DecodedImage::new(pixels, width, height))
        })
        .await
    }

    /// Dispatches [`decode_ktx`](Self::decode_ktx) onto the worker pool.
    pub async fn decode_ktx_async(
        &self,
        ktx: KtxFile,
        token: &CancellationToken,
    ) -> Result<Vec<ColorRgba32>, DecodeError> {
        let decoder = self.clone();
        let token = token.clone();
        run_on_pool(move || decoder.decode_ktx_with_token(&ktx, &token)).await
    }

    /// Dispatches [`decode_ktx_all_mipmaps`](Self::decode_ktx_all_mipmaps)
    /// onto the worker pool.
    pub async fn decode_ktx_all_mipmaps_async(
        &self,
        ktx: KtxFile,
        token: &CancellationToken,
    ) -> Result<Vec<Vec<ColorRgba32>>, DecodeError> {
        let decoder = self.clone();
        let token = token.clone();
        run_on_pool(move || {
            let view = container::view_ktx(&ktx)?;
            decoder.decode_mips(view.format, &view.mips, &token)
        })
        .await
    }

    /// Dispatches [`decode_dds`](Self::decode_dds) onto the worker pool.
    pub async fn decode_dds_async(
        &self,
        dds: Dds,
        token: &CancellationToken,
    ) -> Result<Vec<ColorRgba32>, DecodeError> {
        let decoder = self.clone();
        let token = token.clone();
        run_on_pool(move || decoder.decode_dds_with_token(&dds, &token)).await
    }

    /// Dispatches [`decode_dds_all_mipmaps`](Self::decode_dds_all_mipmaps)
    /// onto the worker pool.
    pub async fn decode_dds_all_mipmaps_async(
        &self,
        dds: Dds,
        token: &CancellationToken,
    ) -> Result<Vec<Vec<ColorRgba32>>, DecodeError> {
        let decoder = self.clone();
        let token = token.clone();
        run_on_pool(move || {
            let view = container::view_dds(&dds, &decoder.options)?;
            decoder.decode_mips(view.format, &view.mips, &token)
        })
        .await
    }

    /// Dispatches [`decode_stream`](Self::decode_stream) onto the worker
    /// pool.
    pub async fn decode_stream_async<R: Read + Send + 'static>(
        &self,
        reader: R,
        token: &CancellationToken,
    ) -> Result<Vec<ColorRgba32>, DecodeError> {
        let decoder = self.clone();
        let token = token.clone();
        run_on_pool(move || match container::read_container(reader)? {
            ParsedContainer::Ktx(ktx) => decoder.decode_ktx_with_token(&ktx, &token),
            ParsedContainer::Dds(dds) => decoder.decode_dds_with_token(&dds, &token),
        })
        .await
    }

    // --- internals ---

    fn decode_raw_with_token(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        format: CompressionFormat,
        token: &CancellationToken,
    ) -> Result<Vec<ColorRgba32>, DecodeError> {
        let mip = MipDescriptor {
            width,
            height,
            data,
        };
        let mut levels = self.decode_mips(format, &[mip], token)?;
        Ok(levels.remove(0))
    }

    fn decode_ktx_with_token(
        &self,
        ktx: &KtxFile,
        token: &CancellationToken,
    ) -> Result<Vec<ColorRgba32>, DecodeError> {
        let view = container::view_ktx(ktx)?;
        let mut levels = self.decode_mips(view.format, &view.mips[..1], token)?;
        Ok(levels.remove(0))
    }

    fn decode_dds_with_token(
        &self,
        dds: &Dds,
        token: &CancellationToken,
    ) -> Result<Vec<ColorRgba32>, DecodeError> {
        let view = container::view_dds(dds, &self.options)?;
        let mut levels = self.decode_mips(view.format, &view.mips[..1], token)?;
        Ok(levels.remove(0))
    }

    fn decode_base_2d(
        &self,
        view: &ContainerView<'_>,
        token: &CancellationToken,
    ) -> Result<DecodedImage, DecodeError> {
        let base = view.mips[0];
        let mut levels = self.decode_mips(view.format, &view.mips[..1], token)?;
        Ok(DecodedImage::new(levels.remove(0), base.width, base.height))
    }

    fn decode_all_2d(
        &self,
        view: &ContainerView<'_>,
        token: &CancellationToken,
    ) -> Result<Vec<DecodedImage>, DecodeError> {
        let levels = self.decode_mips(view.format, &view.mips, token)?;
        Ok(levels
            .into_iter()
            .zip(view.mips.iter())
            .map(|(pixels, mip)| DecodedImage::new(pixels, mip.width, mip.height))
            .collect())
    }

    /// Walks a mip chain: verifies payload sizes, runs the kernels against
    /// one shared operation context and re-assembles each level.
    fn decode_mips(
        &self,
        format: CompressionFormat,
        mips: &[MipDescriptor<'_>],
        token: &CancellationToken,
    ) -> Result<Vec<Vec<ColorRgba32>>, DecodeError> {
        let total_units = mips
            .iter()
            .map(|mip| format.unit_count(mip.width, mip.height))
            .sum();
        let ctx = OperationContext::new(&self.options, token.clone(), total_units);

        let mut levels = Vec::with_capacity(mips.len());
        for mip in mips {
            // Cancellation is polled between mip levels
            ctx.check_cancelled()?;
            levels.push(self.decode_mip(format, mip, &ctx)?);
        }

        Ok(levels)
    }

    fn decode_mip(
        &self,
        format: CompressionFormat,
        mip: &MipDescriptor<'_>,
        ctx: &OperationContext,
    ) -> Result<Vec<ColorRgba32>, DecodeError> {
        let required = format.buffer_byte_size(mip.width, mip.height);
        if mip.data.len() != required {
            return Err(DecodeError::LengthMismatch {
                required,
                actual: mip.data.len(),
            });
        }

        if format.is_compressed() {
            let kernel = BlockKernel::for_format(format, &self.options)?;
            let blocks = kernel.decode_many(mip.data, ctx)?;
            Ok(assemble_blocks(
                &blocks,
                mip.width as usize,
                mip.height as usize,
            ))
        } else {
            let kernel = RawKernel::for_format(format, &self.options)?;
            kernel.decode_pixels(mip.data, ctx)
        }
    }
}

/// Runs a synchronous decode task on the rayon pool, resolving with the
/// identical result or error.
async fn run_on_pool<T, F>(task: F) -> Result<T, DecodeError>
where
    F: FnOnce() -> Result<T, DecodeError> + Send + 'static,
    T: Send + 'static,
{
    let (sender, receiver) = oneshot::channel();
    rayon::spawn(move || {
        let _ = sender.send(task());
    });

    receiver.await.unwrap_or(Err(DecodeError::Cancelled))
}
