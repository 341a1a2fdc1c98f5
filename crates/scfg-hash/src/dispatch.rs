//! The digest dispatcher: one entry point over every algorithm and input kind.
//!
//! Output always goes into a caller-sized [`SboBuffer`] of bytes. The
//! dispatcher checks the capacity up front and never grows the buffer; on
//! any error the buffer keeps its previous contents.

use std::io::{self, Read, Seek, SeekFrom};

use tracing::{debug, trace, warn};

use scfg_core::{
    unicode, Allocator, BufferKindTag, ByteBuffer, Bytes, Result, SboBuffer, ScfgError, Utf8,
    Wide, WideUnit,
};

use crate::algorithm::{digest_into, Blake3, DigestAlgorithm, Sha512, Whirlpool};
use crate::config::HashConfig;
use crate::id::HashId;

/// Data accepted by the dispatcher, tagged with its kind.
#[derive(Debug, Clone, Copy)]
pub enum HashInput<'a> {
    /// Raw bytes, hashed as-is.
    Bytes(&'a [u8]),
    /// UTF-8 text, hashed as its bytes.
    Utf8(&'a [u8]),
    /// Wide text, transcoded to UTF-8 before hashing.
    Wide(&'a [WideUnit]),
}

impl HashInput<'_> {
    /// Buffer kind the input was taken from.
    pub fn kind(&self) -> BufferKindTag {
        match self {
            HashInput::Bytes(_) => BufferKindTag::Bytes,
            HashInput::Utf8(_) => BufferKindTag::Utf8,
            HashInput::Wide(_) => BufferKindTag::Wide,
        }
    }
}

impl<'a> From<&'a [u8]> for HashInput<'a> {
    fn from(data: &'a [u8]) -> Self {
        HashInput::Bytes(data)
    }
}

impl<'a, const L: usize> From<&'a [u8; L]> for HashInput<'a> {
    fn from(data: &'a [u8; L]) -> Self {
        HashInput::Bytes(data)
    }
}

impl<'a> From<&'a str> for HashInput<'a> {
    fn from(text: &'a str) -> Self {
        HashInput::Utf8(text.as_bytes())
    }
}

impl<'a> From<&'a [WideUnit]> for HashInput<'a> {
    fn from(wide: &'a [WideUnit]) -> Self {
        HashInput::Wide(wide)
    }
}

impl<'a, A: Allocator, const N: usize> From<&'a SboBuffer<Bytes, A, N>> for HashInput<'a> {
    fn from(buf: &'a SboBuffer<Bytes, A, N>) -> Self {
        HashInput::Bytes(buf.as_slice())
    }
}

impl<'a, A: Allocator, const N: usize> From<&'a SboBuffer<Utf8, A, N>> for HashInput<'a> {
    fn from(buf: &'a SboBuffer<Utf8, A, N>) -> Self {
        HashInput::Utf8(buf.as_slice())
    }
}

impl<'a, A: Allocator, const N: usize> From<&'a SboBuffer<Wide, A, N>> for HashInput<'a> {
    fn from(buf: &'a SboBuffer<Wide, A, N>) -> Self {
        HashInput::Wide(buf.as_slice())
    }
}

/// Hashes inputs and streams according to a [`HashConfig`].
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    config: HashConfig,
}

impl Dispatcher {
    /// Create a dispatcher with the given configuration.
    pub fn new(config: HashConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HashConfig {
        &self.config
    }

    /// Hash in-memory `input` with algorithm `id` into `out`.
    ///
    /// `out` must already hold at least `id.output_size()` bytes. Wide input
    /// is transcoded into a transient UTF-8 buffer that is released before
    /// this returns, whatever the outcome.
    pub fn hash<'a, A: Allocator, const N: usize>(
        &self,
        input: impl Into<HashInput<'a>>,
        id: HashId,
        out: &mut SboBuffer<Bytes, A, N>,
    ) -> Result<()> {
        ensure_capacity(id, out.len())?;

        match input.into() {
            HashInput::Bytes(data) | HashInput::Utf8(data) => {
                hash_slice(id, data, out.as_mut_slice())
            }
            HashInput::Wide(wide) => {
                let utf8 = unicode::to_utf8_buffer(wide)?;
                trace!(units = wide.len(), bytes = utf8.len(), "transcoded wide input for hashing");
                hash_slice(id, &utf8, out.as_mut_slice())
            }
        }
    }

    /// Hash `stream` from byte `offset` to its end with algorithm `id`.
    ///
    /// The stream is seeked and read but never closed. Offsets past the end
    /// of the stream and failed seeks are reported as `InvalidStream`; read
    /// failures after hashing has started are `GeneralFailure`.
    pub fn hash_stream<R, A, const N: usize>(
        &self,
        stream: &mut R,
        offset: u64,
        id: HashId,
        out: &mut SboBuffer<Bytes, A, N>,
    ) -> Result<()>
    where
        R: Read + Seek + ?Sized,
        A: Allocator,
    {
        ensure_capacity(id, out.len())?;
        seek_to(stream, offset)?;

        let chunk_size = self.config.chunk_size.max(1);
        let out = out.as_mut_slice();
        match id {
            HashId::Blake3 => digest_stream::<Blake3, R>(stream, offset, chunk_size, out),
            HashId::Sha512 => digest_stream::<Sha512, R>(stream, offset, chunk_size, out),
            HashId::Whirlpool => digest_stream::<Whirlpool, R>(stream, offset, chunk_size, out),
        }
    }
}

fn ensure_capacity(id: HashId, available: usize) -> Result<()> {
    let required = id.output_size();
    if available < required {
        return Err(ScfgError::BufferTooSmall {
            required,
            available,
        });
    }
    Ok(())
}

fn hash_slice(id: HashId, data: &[u8], out: &mut [u8]) -> Result<()> {
    match id {
        HashId::Blake3 => digest_into::<Blake3>(data, out),
        HashId::Sha512 => digest_into::<Sha512>(data, out),
        HashId::Whirlpool => digest_into::<Whirlpool>(data, out),
    }
}

fn seek_to<R: Seek + ?Sized>(stream: &mut R, offset: u64) -> Result<()> {
    let end = stream.seek(SeekFrom::End(0)).map_err(|e| {
        warn!(error = %e, "failed to seek stream");
        ScfgError::InvalidStream(e.to_string())
    })?;
    if offset > end {
        return Err(ScfgError::InvalidStream(format!(
            "offset {offset} is past the end of the stream ({end} bytes)"
        )));
    }
    stream.seek(SeekFrom::Start(offset)).map_err(|e| {
        warn!(error = %e, offset, "failed to seek stream");
        ScfgError::InvalidStream(e.to_string())
    })?;
    Ok(())
}

/// Fill `buf` from `stream`; fewer bytes than `buf.len()` means end of data.
fn read_chunk<R: Read + ?Sized>(stream: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match stream.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn digest_stream<D: DigestAlgorithm, R: Read + ?Sized>(
    stream: &mut R,
    offset: u64,
    chunk_size: usize,
    out: &mut [u8],
) -> Result<()> {
    let mut chunk = ByteBuffer::zeroed(chunk_size)?;
    let mut ctx = D::init()?;
    let mut total = 0u64;
    let mut chunks = 0u64;

    loop {
        let read = read_chunk(stream, &mut chunk).map_err(|e| {
            warn!(algorithm = %D::ID, offset, bytes = total, error = %e, "stream read failed");
            ScfgError::GeneralFailure(format!("read failed after {total} bytes: {e}"))
        })?;
        if read == 0 {
            break;
        }

        ctx.update(&chunk[..read])?;
        total += read as u64;
        chunks += 1;

        if read < chunk_size {
            break;
        }
    }

    ctx.finalize_into(out)?;
    debug!(algorithm = %D::ID, offset, bytes = total, chunks, "hashed stream");
    Ok(())
}

/// Hash `input` into `out` with the default configuration.
pub fn hash<'a, A: Allocator, const N: usize>(
    input: impl Into<HashInput<'a>>,
    id: HashId,
    out: &mut SboBuffer<Bytes, A, N>,
) -> Result<()> {
    Dispatcher::default().hash(input, id, out)
}

/// Hash `stream` from `offset` into `out` with the default configuration.
pub fn hash_stream<R, A, const N: usize>(
    stream: &mut R,
    offset: u64,
    id: HashId,
    out: &mut SboBuffer<Bytes, A, N>,
) -> Result<()>
where
    R: Read + Seek + ?Sized,
    A: Allocator,
{
    Dispatcher::default().hash_stream(stream, offset, id, out)
}

/// Hash `input` and return the digest bytes.
pub fn hash_to_vec<'a>(input: impl Into<HashInput<'a>>, id: HashId) -> Result<Vec<u8>> {
    let mut out = ByteBuffer::zeroed(id.output_size())?;
    hash(input, id, &mut out)?;
    Ok(out.to_vec())
}

/// Hash `input` and return the digest as lowercase hex.
pub fn hash_to_hex<'a>(input: impl Into<HashInput<'a>>, id: HashId) -> Result<String> {
    hash_to_vec(input, id).map(hex::encode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn wide(s: &str) -> Vec<WideUnit> {
        s.chars().map(|c| c as u32).collect()
    }

    /// Yields `limit` bytes, then fails every read.
    struct FailingReader {
        inner: Cursor<Vec<u8>>,
        limit: u64,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.inner.position() >= self.limit {
                return Err(io::Error::new(io::ErrorKind::Other, "device gone"));
            }
            let room = (self.limit - self.inner.position()) as usize;
            let n = buf.len().min(room);
            self.inner.read(&mut buf[..n])
        }
    }

    impl Seek for FailingReader {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    /// Hands out at most three bytes per read.
    struct Trickle(Cursor<Vec<u8>>);

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(3);
            self.0.read(&mut buf[..n])
        }
    }

    impl Seek for Trickle {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            self.0.seek(pos)
        }
    }

    #[test]
    fn test_deterministic_for_every_algorithm() {
        for id in HashId::ALL {
            let mut a = ByteBuffer::zeroed(id.output_size()).unwrap();
            let mut b = ByteBuffer::zeroed(id.output_size()).unwrap();
            hash(b"fixed input", id, &mut a).unwrap();
            hash(b"fixed input", id, &mut b).unwrap();
            assert_eq!(a, b);
            assert!(a.iter().any(|&x| x != 0));
        }
    }

    #[test]
    fn test_empty_input() {
        for id in HashId::ALL {
            let digest = hash_to_vec(&b""[..], id).unwrap();
            assert_eq!(digest.len(), id.output_size());
        }
    }

    #[test]
    fn test_buffer_too_small_leaves_output_untouched() {
        let mut out = ByteBuffer::from_slice(&[0x5A; 16]).unwrap();
        let err = hash(b"data", HashId::Sha512, &mut out).unwrap_err();
        assert!(matches!(
            err,
            ScfgError::BufferTooSmall {
                required: 64,
                available: 16
            }
        ));
        assert_eq!(out.as_slice(), &[0x5A; 16]);
    }

    #[test]
    fn test_oversized_output_keeps_tail() {
        let mut out = ByteBuffer::from_slice(&[0xEE; 48]).unwrap();
        hash(b"abc", HashId::Blake3, &mut out).unwrap();
        assert_eq!(&out[..32], blake3::hash(b"abc").as_bytes());
        assert!(out[32..].iter().all(|&b| b == 0xEE));
    }

    #[test]
    fn test_text_kinds_agree() {
        let text = "zażółć gęślą jaźń";
        let units = wide(text);
        for id in HashId::ALL {
            let from_utf8 = hash_to_vec(text, id).unwrap();
            let from_wide = hash_to_vec(&units[..], id).unwrap();
            let from_bytes = hash_to_vec(text.as_bytes(), id).unwrap();
            assert_eq!(from_utf8, from_wide);
            assert_eq!(from_utf8, from_bytes);
        }
    }

    #[test]
    fn test_wide_input_out_of_range() {
        let mut out = ByteBuffer::zeroed(32).unwrap();
        let units: Vec<WideUnit> = vec![0x41, 0x110000];
        let err = hash(&units[..], HashId::Blake3, &mut out).unwrap_err();
        assert!(matches!(err, ScfgError::CodePointTooLarge { .. }));
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_buffer_inputs() {
        let bytes = ByteBuffer::from_slice(b"payload").unwrap();
        let input: HashInput<'_> = (&bytes).into();
        assert_eq!(input.kind(), BufferKindTag::Bytes);

        let text = scfg_core::Utf8Buffer::from_text("payload").unwrap();
        let wide_buf = scfg_core::to_wide_buffer(b"payload").unwrap();
        assert_eq!(HashInput::from(&wide_buf).kind(), BufferKindTag::Wide);

        let a = hash_to_vec(&bytes, HashId::Whirlpool).unwrap();
        let b = hash_to_vec(&text, HashId::Whirlpool).unwrap();
        let c = hash_to_vec(&wide_buf, HashId::Whirlpool).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_stream_matches_memory() {
        let data: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        for id in HashId::ALL {
            let mut out = ByteBuffer::zeroed(id.output_size()).unwrap();
            hash_stream(&mut Cursor::new(data.clone()), 0, id, &mut out).unwrap();
            assert_eq!(out.to_vec(), hash_to_vec(&data[..], id).unwrap());
        }
    }

    #[test]
    fn test_stream_at_offset() {
        let data: Vec<u8> = (0..2048u32).map(|i| (i * 7) as u8).collect();
        let mut out = ByteBuffer::zeroed(32).unwrap();
        hash_stream(&mut Cursor::new(data.clone()), 1024, HashId::Blake3, &mut out).unwrap();
        assert_eq!(&out[..], blake3::hash(&data[1024..]).as_bytes());
    }

    #[test]
    fn test_stream_offset_at_end_hashes_nothing() {
        let mut out = ByteBuffer::zeroed(32).unwrap();
        hash_stream(&mut Cursor::new(vec![1u8; 10]), 10, HashId::Blake3, &mut out).unwrap();
        assert_eq!(&out[..], blake3::hash(b"").as_bytes());
    }

    #[test]
    fn test_stream_offset_past_end() {
        let mut out = ByteBuffer::zeroed(64).unwrap();
        let err = hash_stream(&mut Cursor::new(vec![0u8; 10]), 11, HashId::Whirlpool, &mut out)
            .unwrap_err();
        assert!(matches!(err, ScfgError::InvalidStream(_)));
    }

    #[test]
    fn test_short_reads_do_not_end_stream() {
        let data = vec![0x42u8; 3000];
        let mut out = ByteBuffer::zeroed(64).unwrap();
        hash_stream(&mut Trickle(Cursor::new(data.clone())), 0, HashId::Sha512, &mut out).unwrap();
        assert_eq!(out.to_vec(), hash_to_vec(&data[..], HashId::Sha512).unwrap());
    }

    /// Readable, but every seek fails.
    struct Unseekable;

    impl Read for Unseekable {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Ok(0)
        }
    }

    impl Seek for Unseekable {
        fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
            Err(io::Error::new(io::ErrorKind::Unsupported, "pipe"))
        }
    }

    #[test]
    fn test_seek_failure_is_invalid_stream() {
        let mut out = ByteBuffer::from_slice(&[0x77u8; 64][..]).unwrap();
        let err = hash_stream(&mut Unseekable, 0, HashId::Sha512, &mut out).unwrap_err();
        assert!(matches!(err, ScfgError::InvalidStream(_)));
        assert!(out.iter().all(|&b| b == 0x77));
    }

    #[test]
    fn test_read_failure_is_general_failure() {
        let mut reader = FailingReader {
            inner: Cursor::new(vec![9u8; 4096]),
            limit: 1500,
        };
        let mut out = ByteBuffer::zeroed(32).unwrap();
        let err = hash_stream(&mut reader, 0, HashId::Blake3, &mut out).unwrap_err();
        assert!(matches!(err, ScfgError::GeneralFailure(_)));
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_custom_chunk_size() {
        let data = vec![0xA5u8; 777];
        let dispatcher = Dispatcher::new(HashConfig::default().with_chunk_size(100));
        let mut out = ByteBuffer::zeroed(32).unwrap();
        dispatcher
            .hash_stream(&mut Cursor::new(data.clone()), 0, HashId::Blake3, &mut out)
            .unwrap();
        assert_eq!(&out[..], blake3::hash(&data).as_bytes());
    }

    #[test]
    fn test_hex_output() {
        let hex = hash_to_hex("abc", HashId::Blake3).unwrap();
        assert_eq!(hex, blake3::hash(b"abc").to_hex().as_str());
    }

    proptest::proptest! {
        #[test]
        fn test_stream_matches_memory_for_any_split(
            data in proptest::collection::vec(proptest::prelude::any::<u8>(), 0..3000),
            chunk in 1usize..2048,
            split in 0usize..3000,
        ) {
            let offset = split.min(data.len());
            let dispatcher = Dispatcher::new(HashConfig::default().with_chunk_size(chunk));
            let mut out = ByteBuffer::zeroed(64).unwrap();
            dispatcher
                .hash_stream(&mut Cursor::new(data.clone()), offset as u64, HashId::Whirlpool, &mut out)
                .unwrap();
            proptest::prop_assert_eq!(
                out.to_vec(),
                hash_to_vec(&data[offset..], HashId::Whirlpool).unwrap()
            );
        }
    }
}
