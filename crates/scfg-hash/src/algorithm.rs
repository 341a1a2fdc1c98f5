//! Digest algorithms behind one init/update/finalize contract.
//!
//! Wraps the BLAKE3, SHA3-512 and Whirlpool implementations so the
//! dispatcher can drive any of them the same way.

use sha3::Digest;

use scfg_core::{Result, ScfgError};

use crate::id::HashId;

/// Incremental digest computation.
///
/// A context is created by [`init`](DigestAlgorithm::init), fed with
/// [`update`](DigestAlgorithm::update) and consumed by
/// [`finalize_into`](DigestAlgorithm::finalize_into). Internal failures of
/// the underlying library are reported as [`ScfgError::GeneralFailure`];
/// dropping a context releases all of its state.
pub trait DigestAlgorithm: Sized {
    /// Identifier of this algorithm.
    const ID: HashId;

    /// Digest size in bytes.
    const OUTPUT_SIZE: usize;

    /// Start a new computation.
    fn init() -> Result<Self>;

    /// Absorb more input.
    fn update(&mut self, data: &[u8]) -> Result<()>;

    /// Write the digest into the first `OUTPUT_SIZE` bytes of `out`.
    fn finalize_into(self, out: &mut [u8]) -> Result<()>;
}

fn check_output(out: &[u8], required: usize) -> Result<()> {
    if out.len() < required {
        return Err(ScfgError::BufferTooSmall {
            required,
            available: out.len(),
        });
    }
    Ok(())
}

/// BLAKE3 with the default 32-byte output.
pub struct Blake3(blake3::Hasher);

impl DigestAlgorithm for Blake3 {
    const ID: HashId = HashId::Blake3;
    const OUTPUT_SIZE: usize = 32;

    fn init() -> Result<Self> {
        Ok(Self(blake3::Hasher::new()))
    }

    fn update(&mut self, data: &[u8]) -> Result<()> {
        self.0.update(data);
        Ok(())
    }

    fn finalize_into(self, out: &mut [u8]) -> Result<()> {
        check_output(out, Self::OUTPUT_SIZE)?;
        out[..Self::OUTPUT_SIZE].copy_from_slice(self.0.finalize().as_bytes());
        Ok(())
    }
}

/// SHA3-512.
pub struct Sha512(sha3::Sha3_512);

impl DigestAlgorithm for Sha512 {
    const ID: HashId = HashId::Sha512;
    const OUTPUT_SIZE: usize = 64;

    fn init() -> Result<Self> {
        Ok(Self(sha3::Sha3_512::new()))
    }

    fn update(&mut self, data: &[u8]) -> Result<()> {
        Digest::update(&mut self.0, data);
        Ok(())
    }

    fn finalize_into(self, out: &mut [u8]) -> Result<()> {
        check_output(out, Self::OUTPUT_SIZE)?;
        out[..Self::OUTPUT_SIZE].copy_from_slice(&self.0.finalize());
        Ok(())
    }
}

/// Whirlpool.
pub struct Whirlpool(whirlpool::Whirlpool);

impl DigestAlgorithm for Whirlpool {
    const ID: HashId = HashId::Whirlpool;
    const OUTPUT_SIZE: usize = 64;

    fn init() -> Result<Self> {
        Ok(Self(whirlpool::Whirlpool::new()))
    }

    fn update(&mut self, data: &[u8]) -> Result<()> {
        Digest::update(&mut self.0, data);
        Ok(())
    }

    fn finalize_into(self, out: &mut [u8]) -> Result<()> {
        check_output(out, Self::OUTPUT_SIZE)?;
        out[..Self::OUTPUT_SIZE].copy_from_slice(&self.0.finalize());
        Ok(())
    }
}

/// Run a whole init/update/finalize sequence over `data`.
pub fn digest_into<D: DigestAlgorithm>(data: &[u8], out: &mut [u8]) -> Result<()> {
    let mut ctx = D::init()?;
    ctx.update(data)?;
    ctx.finalize_into(out)
}
