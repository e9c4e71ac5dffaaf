//! Shared fixture builders for the integration suites.

#![allow(dead_code)]

use block_decompression::ddsfile::{
    AlphaMode, D3D10ResourceDimension, D3DFormat, Dds, DxgiFormat, NewD3dParams, NewDxgiParams,
};
use block_decompression::{block_count, CompressionFormat, KTX_IDENTIFIER};

/// Builds one BC1 block from its two 565 endpoints and the 2-bit index LUT.
pub fn bc1_block(c0: u16, c1: u16, indices: u32) -> [u8; 8] {
    let mut block = [0u8; 8];
    block[0..2].copy_from_slice(&c0.to_le_bytes());
    block[2..4].copy_from_slice(&c1.to_le_bytes());
    block[4..8].copy_from_slice(&indices.to_le_bytes());
    block
}

/// A BC1 block decoding to a solid color chosen from a handful of 565
/// primaries.
pub fn solid_bc1_block(color: u16) -> [u8; 8] {
    bc1_block(color, 0x0000, 0x0000_0000)
}

pub const RED_565: u16 = 0xF800;
pub const GREEN_565: u16 = 0x07E0;
pub const BLUE_565: u16 = 0x001F;
pub const WHITE_565: u16 = 0xFFFF;

/// A payload of identical solid-red BC1 blocks covering `width x height`.
pub fn red_bc1_payload(width: u32, height: u32) -> Vec<u8> {
    solid_bc1_block(RED_565).repeat(block_count(width, height))
}

/// Deterministic pseudo-random payload bytes (xorshift32).
pub fn random_bytes(seed: u32, len: usize) -> Vec<u8> {
    let mut state = seed.max(1);
    let mut bytes = Vec::with_capacity(len);
    while bytes.len() < len {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        bytes.extend_from_slice(&state.to_le_bytes());
    }
    bytes.truncate(len);
    bytes
}

/// A random payload of the exact size `format` requires for the dimensions.
pub fn random_payload(format: CompressionFormat, width: u32, height: u32, seed: u32) -> Vec<u8> {
    random_bytes(seed, format.buffer_byte_size(width, height))
}

/// Serializes a single-face KTX 1.1 texture from its per-mip payloads.
pub fn ktx_bytes(
    gl_internal_format: u32,
    gl_format: u32,
    width: u32,
    height: u32,
    mips: &[Vec<u8>],
) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&KTX_IDENTIFIER);
    bytes.extend_from_slice(&0x0403_0201u32.to_le_bytes());

    let words = [
        0,                 // glType (compressed)
        1,                 // glTypeSize
        gl_format,         // glFormat
        gl_internal_format,
        gl_format,         // glBaseInternalFormat
        width,
        height,
        0,                 // pixelDepth
        0,                 // numberOfArrayElements
        1,                 // numberOfFaces
        mips.len() as u32, // numberOfMipmapLevels
        0,                 // bytesOfKeyValueData
    ];
    for word in words {
        bytes.extend_from_slice(&word.to_le_bytes());
    }

    for mip in mips {
        bytes.extend_from_slice(&(mip.len() as u32).to_le_bytes());
        bytes.extend_from_slice(mip);
        let padding = (4 - mip.len() % 4) % 4;
        bytes.extend_from_slice(&[0u8; 3][..padding]);
    }

    bytes
}

/// A DX10-header DDS surface holding the given payload.
pub fn dxgi_dds(
    format: DxgiFormat,
    width: u32,
    height: u32,
    mipmap_levels: u32,
    data: Vec<u8>,
) -> Dds {
    let mut dds = Dds::new_dxgi(NewDxgiParams {
        height,
        width,
        depth: None,
        format,
        mipmap_levels: Some(mipmap_levels),
        array_layers: None,
        caps2: None,
        is_cubemap: false,
        resource_dimension: D3D10ResourceDimension::Texture2D,
        alpha_mode: AlphaMode::Straight,
    })
    .expect("failed to create DDS header");

    dds.data = data;
    dds
}

/// A legacy-header DDS surface holding the given payload.
pub fn d3d_dds(format: D3DFormat, width: u32, height: u32, data: Vec<u8>) -> Dds {
    let mut dds = Dds::new_d3d(NewD3dParams {
        height,
        width,
        depth: None,
        format,
        mipmap_levels: Some(1),
        caps2: None,
    })
    .expect("failed to create DDS header");

    dds.data = data;
    dds
}
