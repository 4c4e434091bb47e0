//! Built-in magic number sniffing.
//!
//! Used when `file(1)` is not installed. Recognizes archive formats from
//! their signatures and can look inside gzip, xz and lzma streams to find a
//! wrapped container.

use crate::mime::{canonical_mime, encoding_mime};
use flate2::read::MultiGzDecoder;
use oxiwrap_core::{Format, MimeSniffer, Result, Sniffed, WrapError};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use xz2::read::XzDecoder;
use xz2::stream::Stream;

/// Bytes needed to reach the ISO 9660 volume descriptor.
const HEAD_LEN: u64 = 32774;

/// Bytes decoded from a compressed stream, enough for a tar header.
const INNER_LEN: u64 = 512;

/// Detect a format from the first bytes of a file.
pub fn from_magic(magic: &[u8]) -> Option<Format> {
    if magic.len() < 2 {
        return None;
    }

    if magic.starts_with(b"PK") {
        return Some(Format::Zip);
    }

    // gzip and compress share the first byte
    if magic.starts_with(&[0x1F, 0x8B]) {
        return Some(Format::Gzip);
    }
    if magic.starts_with(&[0x1F, 0x9D]) {
        return Some(Format::Compress);
    }

    if magic.starts_with(&[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C]) {
        return Some(Format::SevenZip);
    }
    if magic.starts_with(&[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00]) {
        return Some(Format::Xz);
    }
    if magic.starts_with(b"BZh") {
        return Some(Format::Bzip2);
    }
    if magic.starts_with(&[0x28, 0xB5, 0x2F, 0xFD]) {
        return Some(Format::Zstd);
    }
    if magic.starts_with(&[0x04, 0x22, 0x4D, 0x18]) {
        return Some(Format::Lz4);
    }
    if magic.starts_with(b"MSCF") {
        return Some(Format::Cab);
    }
    if magic.starts_with(b"Rar!\x1a\x07") {
        return Some(Format::Rar);
    }
    if magic.starts_with(b"LZIP") {
        return Some(Format::Lzip);
    }
    if magic.starts_with(&[0x89, b'L', b'Z', b'O']) {
        return Some(Format::Lzop);
    }
    if magic.starts_with(b"LRZI") {
        return Some(Format::Lrzip);
    }
    if magic.starts_with(b"RZIP") {
        return Some(Format::Rzip);
    }
    if magic.starts_with(b"zPQ") {
        return Some(Format::Zpaq);
    }
    if magic.starts_with(&[0xED, 0xAB, 0xEE, 0xDB]) {
        return Some(Format::Rpm);
    }
    if magic.starts_with(b"!<arch>\n") {
        if magic.len() >= 21 && &magic[8..21] == b"debian-binary" {
            return Some(Format::Deb);
        }
        return Some(Format::Ar);
    }
    if magic.starts_with(b"070701") || magic.starts_with(b"070702") || magic.starts_with(b"070707")
    {
        return Some(Format::Cpio);
    }
    if magic.starts_with(&[0xC7, 0x71]) || magic.starts_with(&[0x71, 0xC7]) {
        return Some(Format::Cpio);
    }
    if magic.starts_with(&[0x60, 0xEA]) {
        return Some(Format::Arj);
    }
    if magic.starts_with(b"ZOO ") {
        return Some(Format::Zoo);
    }
    if magic.starts_with(b"ALZ\x01") {
        return Some(Format::Alzip);
    }
    if magic.len() >= 14 && &magic[7..14] == b"**ACE**" {
        return Some(Format::Ace);
    }

    // LZH: "-lh?-" or "-lz?-" at offset 2
    if magic.len() >= 7
        && magic[2] == b'-'
        && magic[3] == b'l'
        && (magic[4] == b'h' || magic[4] == b'z')
        && magic[6] == b'-'
    {
        return Some(Format::Lzh);
    }

    if magic.len() >= 262 && &magic[257..262] == b"ustar" {
        return Some(Format::Tar);
    }
    if magic.len() >= 32774 && &magic[32769..32774] == b"CD001" {
        return Some(Format::Iso);
    }

    // lzma-alone has no real magic, only the usual properties byte
    if magic.len() >= 13 && magic[0] == 0x5D && magic[1] == 0x00 && magic[2] == 0x00 {
        return Some(Format::Lzma);
    }

    None
}

fn read_head(reader: impl Read, limit: u64) -> std::io::Result<Vec<u8>> {
    let mut head = Vec::new();
    reader.take(limit).read_to_end(&mut head)?;
    Ok(head)
}

/// Decode the start of a compressed file. `None` when no decoder is built in.
fn decode_head(path: &Path, compression: Format) -> Result<Option<Vec<u8>>> {
    let file = File::open(path)?;
    let decoded = match compression {
        Format::Gzip => read_head(MultiGzDecoder::new(file), INNER_LEN),
        Format::Xz => read_head(XzDecoder::new(file), INNER_LEN),
        Format::Lzma => {
            let stream = Stream::new_lzma_decoder(u64::MAX)
                .map_err(|e| WrapError::codec("lzma", e))?;
            read_head(XzDecoder::new_stream(file, stream), INNER_LEN)
        }
        _ => return Ok(None),
    };
    // A truncated or corrupt stream still tells us nothing about the inside.
    Ok(decoded.ok())
}

/// A [`MimeSniffer`] based on built-in signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct MagicSniffer;

impl MagicSniffer {
    /// Create a sniffer.
    pub fn new() -> Self {
        Self
    }

    fn detect(path: &Path) -> Result<Option<Format>> {
        let head = read_head(File::open(path)?, HEAD_LEN)?;
        Ok(from_magic(&head))
    }
}

fn mime_of(format: Format) -> String {
    encoding_mime(format)
        .unwrap_or_else(|| canonical_mime(format))
        .to_string()
}

impl MimeSniffer for MagicSniffer {
    fn sniff(&self, path: &Path) -> Result<Sniffed> {
        Ok(Sniffed {
            mime: Self::detect(path)?.map(mime_of),
            encoding: None,
        })
    }

    fn sniff_uncompressed(&self, path: &Path) -> Result<Sniffed> {
        let Some(outer) = Self::detect(path)? else {
            return Ok(Sniffed::default());
        };
        let Some(encoding) = encoding_mime(outer) else {
            return Ok(Sniffed::mime(mime_of(outer)));
        };
        let Some(head) = decode_head(path, outer)? else {
            return Ok(Sniffed::mime(encoding));
        };
        let inner = match from_magic(&head) {
            Some(format) => mime_of(format),
            None => "application/octet-stream".to_string(),
        };
        Ok(Sniffed::wrapped(inner, encoding))
    }
}
