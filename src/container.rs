//! Container adaptation.
//!
//! A parsed KTX or DDS value is reduced to a shared [`CompressionFormat`]
//! plus a sequence of [`MipDescriptor`]s borrowing the encoded payloads. The
//! adapter never decodes; that stays with the kernels.

pub(crate) mod dds;
pub(crate) mod ktx;

use std::io::{self, Read};

use ddsfile::Dds;

use self::ktx::{KtxFile, KTX_IDENTIFIER};
use crate::error::DecodeError;
use crate::options::DecoderOptions;
use crate::CompressionFormat;

const DDS_MAGIC: [u8; 4] = *b"DDS ";

/// One mip level's input: its pixel dimensions and the borrowed encoded
/// payload.
#[derive(Copy, Clone, Debug)]
pub struct MipDescriptor<'a> {
    pub width: u32,
    pub height: u32,
    pub data: &'a [u8],
}

/// The decode-relevant view of a parsed container: the shared format plus
/// one descriptor per mip level of face 0.
pub(crate) struct ContainerView<'a> {
    pub(crate) format: CompressionFormat,
    pub(crate) mips: Vec<MipDescriptor<'a>>,
}

pub(crate) fn view_ktx<'a>(ktx: &'a KtxFile) -> Result<ContainerView<'a>, DecodeError> {
    let format = ktx::format_for_gl(&ktx.header)?;

    if ktx.mipmaps.is_empty() {
        return Err(DecodeError::MalformedContainer);
    }

    let mips = ktx
        .mipmaps
        .iter()
        .map(|mipmap| {
            let face = mipmap.faces.first().ok_or(DecodeError::MalformedContainer)?;
            Ok(MipDescriptor {
                width: mipmap.width,
                height: mipmap.height,
                data: face.as_slice(),
            })
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    Ok(ContainerView { format, mips })
}

pub(crate) fn view_dds<'a>(
    dds: &'a Dds,
    options: &DecoderOptions,
) -> Result<ContainerView<'a>, DecodeError> {
    let format = dds::format_for_dds(dds, options)?;
    let mips = dds::mip_descriptors(dds, format)?;
    Ok(ContainerView { format, mips })
}

/// A container parsed from a stream.
pub(crate) enum ParsedContainer {
    Ktx(KtxFile),
    Dds(Box<Dds>),
}

/// Reads a whole stream and parses it by its magic bytes. Anything that is
/// neither KTX nor DDS fails with [`DecodeError::MalformedContainer`].
pub(crate) fn read_container<R: Read>(mut reader: R) -> Result<ParsedContainer, DecodeError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    if bytes.len() >= 4 && bytes[..4] == KTX_IDENTIFIER[..4] {
        KtxFile::read(io::Cursor::new(bytes)).map(ParsedContainer::Ktx)
    } else if bytes.len() >= 4 && bytes[..4] == DDS_MAGIC {
        Dds::read(io::Cursor::new(bytes))
            .map(|dds| ParsedContainer::Dds(Box::new(dds)))
            .map_err(|_| DecodeError::MalformedContainer)
    } else {
        Err(DecodeError::MalformedContainer)
    }
}

/// Fills `buf` from the reader, mapping a premature end of stream to
/// [`DecodeError::Truncated`].
pub(crate) fn read_exact_or_truncated<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
) -> Result<(), DecodeError> {
    let required = buf.len();
    let mut read = 0;

    while read < required {
        match reader.read(&mut buf[read..]) {
            Ok(0) => return Err(DecodeError::Truncated { required, read }),
            Ok(count) => read += count,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => return Err(DecodeError::Io(error)),
        }
    }

    Ok(())
}
