//! Binary canvas file format.
//!
//! ```text
//! offset  size  field
//! 0       4     magic "JOPC"
//! 4       1     format version
//! 5       1     canvas size id
//! 6       w*h   palette indices, row-major, top row first
//! ```
//!
//! There is no compression and no trailing data.

use crate::error::{JopError, Result};
use crate::types::{CanvasGeometry, CanvasSize, Palette, PixelBlock};

/// File magic.
pub const MAGIC: [u8; 4] = *b"JOPC";

/// The only format version this codec reads and writes.
pub const FORMAT_VERSION: u8 = 1;

/// Magic + version + size id.
pub const HEADER_LEN: usize = 6;

/// File extension for canvas files, without the dot.
pub const EXTENSION: &str = "paint";

/// An encoded canvas file. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasFile {
    bytes: Vec<u8>,
}

impl CanvasFile {
    /// Wrap raw bytes read from disk. Nothing is validated until decode.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Decoded header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasHeader {
    pub version: u8,
    pub size: CanvasSize,
}

/// Encodes and decodes canvas files against one palette and size table.
#[derive(Debug, Clone, Copy)]
pub struct CanvasCodec<'a> {
    palette: &'a Palette,
    geometry: &'a CanvasGeometry,
}

impl<'a> CanvasCodec<'a> {
    pub fn new(palette: &'a Palette, geometry: &'a CanvasGeometry) -> Self {
        Self { palette, geometry }
    }

    pub fn geometry(&self) -> &'a CanvasGeometry {
        self.geometry
    }

    /// Encode a block as a canvas of the given size.
    ///
    /// The block must match the size's resolution exactly; nothing is cropped
    /// or padded here. Every index must be inside the palette.
    pub fn encode(&self, block: &PixelBlock, size: CanvasSize) -> Result<CanvasFile> {
        if !self.geometry.contains(size) {
            return Err(JopError::UnknownCanvasSize { id: size.id });
        }

        let expected = self.geometry.resolution_of(size);
        if block.dimensions() != expected {
            return Err(JopError::DimensionMismatch {
                expected,
                actual: block.dimensions(),
            });
        }

        self.check_indices(block.indices())?;

        let mut bytes = Vec::with_capacity(HEADER_LEN + block.indices().len());
        bytes.extend_from_slice(&MAGIC);
        bytes.push(FORMAT_VERSION);
        bytes.push(size.id);
        bytes.extend_from_slice(block.indices());

        Ok(CanvasFile { bytes })
    }

    /// Validate and return the header without reading the body.
    pub fn read_header(&self, bytes: &[u8]) -> Result<CanvasHeader> {
        if bytes.len() < HEADER_LEN {
            return Err(JopError::TruncatedData {
                offset: bytes.len(),
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        }

        if bytes[..4] != MAGIC {
            return Err(JopError::UnrecognizedFormat {
                expected: MAGIC.to_vec(),
                found: bytes[..4].to_vec(),
            });
        }

        let version = bytes[4];
        if version != FORMAT_VERSION {
            return Err(JopError::UnsupportedVersion {
                version,
                supported: FORMAT_VERSION,
            });
        }

        let id = bytes[5];
        let size = self
            .geometry
            .by_id(id)
            .ok_or(JopError::UnknownCanvasSize { id })?;

        Ok(CanvasHeader { version, size })
    }

    /// Decode a canvas file back into its block and size.
    ///
    /// Invalid indices are reported, never clamped.
    pub fn decode(&self, bytes: &[u8]) -> Result<(PixelBlock, CanvasSize)> {
        let header = self.read_header(bytes)?;
        let (width, height) = self.geometry.resolution_of(header.size);
        let expected = self.geometry.pixel_count(header.size);

        let body = &bytes[HEADER_LEN..];
        if body.len() < expected {
            return Err(JopError::TruncatedData {
                offset: bytes.len(),
                expected,
                actual: body.len(),
            });
        }
        if body.len() > expected {
            return Err(JopError::TrailingData {
                expected,
                actual: body.len(),
            });
        }

        self.check_indices(body)?;

        let block = PixelBlock::from_indices(width, height, body.to_vec())?;
        Ok((block, header.size))
    }

    pub fn decode_file(&self, file: &CanvasFile) -> Result<(PixelBlock, CanvasSize)> {
        self.decode(file.as_bytes())
    }

    fn check_indices(&self, indices: &[u8]) -> Result<()> {
        match indices.iter().position(|&i| !self.palette.contains_index(i)) {
            Some(pos) => Err(JopError::PaletteIndexOutOfRange {
                index: indices[pos],
                offset: HEADER_LEN + pos,
                palette_len: self.palette.len(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tables() -> (Palette, CanvasGeometry) {
        (Palette::dyes(), CanvasGeometry::joy_of_painting())
    }

    fn gradient_block(width: u32, height: u32, palette_len: usize) -> PixelBlock {
        let indices = (0..width * height)
            .map(|i| (i as usize % palette_len) as u8)
            .collect();
        PixelBlock::from_indices(width, height, indices).unwrap()
    }

    #[test]
    fn test_encode_layout() {
        let (palette, geo) = tables();
        let codec = CanvasCodec::new(&palette, &geo);
        let small = geo.by_name("small").unwrap();

        let mut block = PixelBlock::new(16, 16, 0);
        block.set(1, 0, 5);
        block.set(0, 1, 9);

        let file = codec.encode(&block, small).unwrap();
        let bytes = file.as_bytes();

        assert_eq!(bytes.len(), HEADER_LEN + 256);
        assert_eq!(&bytes[..6], &[b'J', b'O', b'P', b'C', FORMAT_VERSION, 0]);
        // Row-major: (1, 0) is the second byte, (0, 1) starts the second row
        assert_eq!(bytes[HEADER_LEN + 1], 5);
        assert_eq!(bytes[HEADER_LEN + 16], 9);
    }

    #[test]
    fn test_round_trip_every_size() {
        let (palette, geo) = tables();
        let codec = CanvasCodec::new(&palette, &geo);

        for entry in geo.entries() {
            let size = entry.size();
            let (w, h) = geo.resolution_of(size);
            let block = gradient_block(w, h, palette.len());

            let file = codec.encode(&block, size).unwrap();
            let decoded = codec.decode_file(&file).unwrap();
            assert_eq!(decoded, (block, size), "{}", entry.name);
        }
    }

    #[test]
    fn test_encode_dimension_mismatch() {
        let (palette, geo) = tables();
        let codec = CanvasCodec::new(&palette, &geo);
        let large = geo.by_name("large").unwrap();

        let err = codec.encode(&PixelBlock::new(16, 32, 0), large).unwrap_err();
        assert!(matches!(
            err,
            JopError::DimensionMismatch {
                expected: (32, 32),
                actual: (16, 32)
            }
        ));
    }

    #[test]
    fn test_encode_rejects_unknown_size_and_index() {
        let (palette, geo) = tables();
        let codec = CanvasCodec::new(&palette, &geo);

        let bogus = CanvasSize::new(9, 1, 1);
        assert!(matches!(
            codec.encode(&PixelBlock::new(16, 16, 0), bogus),
            Err(JopError::UnknownCanvasSize { id: 9 })
        ));

        let small = geo.by_name("small").unwrap();
        assert!(matches!(
            codec.encode(&PixelBlock::new(16, 16, 16), small),
            Err(JopError::PaletteIndexOutOfRange { index: 16, offset: HEADER_LEN, .. })
        ));
    }

    #[test]
    fn test_decode_short_buffer() {
        let (palette, geo) = tables();
        let codec = CanvasCodec::new(&palette, &geo);

        assert!(matches!(
            codec.decode(&[b'J', b'O', b'P']),
            Err(JopError::TruncatedData { expected: HEADER_LEN, actual: 3, .. })
        ));
    }

    #[test]
    fn test_decode_truncated_body() {
        let (palette, geo) = tables();
        let codec = CanvasCodec::new(&palette, &geo);

        // A large canvas needs 1024 index bytes; only 3 follow the header
        let bytes = [b'J', b'O', b'P', b'C', FORMAT_VERSION, 1, 0, 0, 0];
        assert!(matches!(
            codec.decode(&bytes),
            Err(JopError::TruncatedData { expected: 1024, actual: 3, .. })
        ));
    }

    #[test]
    fn test_decode_trailing_data() {
        let (palette, geo) = tables();
        let codec = CanvasCodec::new(&palette, &geo);
        let small = geo.by_name("small").unwrap();

        let mut bytes = codec
            .encode(&PixelBlock::new(16, 16, 0), small)
            .unwrap()
            .into_bytes();
        bytes.push(0);

        assert!(matches!(
            codec.decode(&bytes),
            Err(JopError::TrailingData { expected: 256, actual: 257 })
        ));
    }

    #[test]
    fn test_decode_bad_magic_and_version() {
        let (palette, geo) = tables();
        let codec = CanvasCodec::new(&palette, &geo);

        assert!(matches!(
            codec.decode(b"NOPE\x01\x00"),
            Err(JopError::UnrecognizedFormat { .. })
        ));
        assert!(matches!(
            codec.decode(b"JOPC\x02\x00"),
            Err(JopError::UnsupportedVersion { version: 2, supported: 1 })
        ));
        assert!(matches!(
            codec.decode(b"JOPC\x01\x07"),
            Err(JopError::UnknownCanvasSize { id: 7 })
        ));
    }

    #[test]
    fn test_decode_index_one_past_palette() {
        let (palette, geo) = tables();
        let codec = CanvasCodec::new(&palette, &geo);
        let small = geo.by_name("small").unwrap();

        let mut bytes = codec
            .encode(&PixelBlock::new(16, 16, 3), small)
            .unwrap()
            .into_bytes();
        bytes[HEADER_LEN + 40] = palette.len() as u8;

        match codec.decode(&bytes) {
            Err(JopError::PaletteIndexOutOfRange {
                index,
                offset,
                palette_len,
            }) => {
                assert_eq!(index, 16);
                assert_eq!(offset, HEADER_LEN + 40);
                assert_eq!(palette_len, 16);
            }
            other => panic!("expected PaletteIndexOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_read_header() {
        let (palette, geo) = tables();
        let codec = CanvasCodec::new(&palette, &geo);
        let header = codec.read_header(b"JOPC\x01\x03").unwrap();
        assert_eq!(header.version, 1);
        assert_eq!(header.size, geo.by_name("tall").unwrap());
    }
}
