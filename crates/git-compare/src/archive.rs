//! Digest of a materialized tree archive.
//!
//! `git archive` stamps tree archives with the current time, so hashing the
//! raw stream would make two runs over the same tree disagree. Instead the
//! digest covers what a checkout would produce: for every member its type,
//! permission bits, path, link target and content, in archive order. Header
//! fields filled from the clock and pax global headers (which only carry the
//! commit id comment) do not contribute.

use std::io::{self, Read};

use bstr::BString;
use git_hash::{Digest, HashAlgorithm, Hasher};
use git_repository::{RepoError, RepositoryAccess};
use git_utils::tempfile::TempFile;
use git_utils::UtilError;

use crate::method::ComparisonMethod;
use crate::outcome::TreeId;
use crate::CompareError;

const BLOCK: usize = 512;

/// Materialize `tree` into scratch storage and digest it.
///
/// The scratch file is removed when this returns, whether or not it succeeds.
pub(crate) fn archive_digest(
    repo: &dyn RepositoryAccess,
    tree: &TreeId,
    algorithm: HashAlgorithm,
) -> Result<Digest, CompareError> {
    let fail = |operation: &str, source: RepoError| {
        CompareError::access(ComparisonMethod::Archive, format!("{operation} {tree}"), source)
    };

    let mut scratch = TempFile::new().map_err(|e| fail("allocate scratch space for", e.into()))?;
    repo.materialize_archive(tree.object_id(), &mut scratch)
        .map_err(|e| fail("materialize tree", e))?;
    tracing::debug!(%tree, bytes = scratch.len(), "materialized archive");

    let reader = scratch.reader().map_err(|e| fail("read back the archive of", e.into()))?;
    let digest = digest_tar(reader, algorithm).map_err(|e| fail("digest the archive of", e.into()))?;
    tracing::trace!(%tree, %digest, "archive digest");
    Ok(digest)
}

/// Failure while walking a tar stream.
#[derive(Debug)]
pub(crate) enum TarError {
    Io(io::Error),
    Malformed(String),
}

impl From<io::Error> for TarError {
    fn from(err: io::Error) -> Self {
        TarError::Io(err)
    }
}

impl From<TarError> for RepoError {
    fn from(err: TarError) -> Self {
        match err {
            TarError::Io(e) => RepoError::Util(UtilError::Io(e)),
            TarError::Malformed(reason) => RepoError::Parse {
                command: "git archive --format=tar".to_string(),
                reason,
            },
        }
    }
}

fn malformed(reason: impl Into<String>) -> TarError {
    TarError::Malformed(reason.into())
}

/// Values from a pax extended header, applying to the next member only.
#[derive(Debug, Default)]
struct PaxOverrides {
    path: Option<BString>,
    linkpath: Option<BString>,
    size: Option<u64>,
}

/// Digest the file-level content of a tar stream.
pub(crate) fn digest_tar(reader: &mut dyn Read, algorithm: HashAlgorithm) -> Result<Digest, TarError> {
    let mut hasher = Hasher::new(algorithm);
    let mut pending = PaxOverrides::default();
    let mut block = [0u8; BLOCK];
    let mut members = 0usize;

    loop {
        if !read_block(reader, &mut block)? {
            return Err(malformed("archive ends without an end-of-archive marker"));
        }
        if block.iter().all(|&b| b == 0) {
            break;
        }

        let header_size = number(&block[124..136], "size")?;
        match block[156] {
            b'g' => {
                skip(reader, padded(header_size))?;
            }
            b'x' => {
                let data = read_exact_vec(reader, header_size)?;
                skip(reader, padding(header_size))?;
                pending = parse_pax(&data)?;
            }
            typeflag => {
                let overrides = std::mem::take(&mut pending);
                let size = overrides.size.unwrap_or(header_size);
                let path = overrides.path.unwrap_or_else(|| ustar_path(&block));
                let link = overrides
                    .linkpath
                    .unwrap_or_else(|| BString::from(until_nul(&block[157..257])));
                let mode = number(&block[100..108], "mode")? & 0o7777;
                // Pre-POSIX archives mark regular files with NUL.
                let typeflag = if typeflag == 0 { b'0' } else { typeflag };

                hasher.update(&[typeflag]);
                hasher.update(format!(" {mode:o} {size} ").as_bytes());
                hasher.update(&path);
                hasher.update(b"\0");
                hasher.update(&link);
                hasher.update(b"\0");

                let copied = io::copy(&mut (&mut *reader).take(size), &mut hasher)?;
                if copied != size {
                    return Err(malformed(format!("member '{path}' is truncated")));
                }
                skip(reader, padding(size))?;
                members += 1;
            }
        }
    }

    tracing::trace!(members, "walked archive");
    Ok(hasher.finalize())
}

/// Read one block. `Ok(false)` on a clean end of stream.
fn read_block(reader: &mut dyn Read, block: &mut [u8; BLOCK]) -> Result<bool, TarError> {
    let mut filled = 0;
    while filled < BLOCK {
        match reader.read(&mut block[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => return Err(malformed("archive ends inside a header block")),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(true)
}

fn read_exact_vec(reader: &mut dyn Read, len: u64) -> Result<Vec<u8>, TarError> {
    let mut data = Vec::new();
    let copied = (&mut *reader).take(len).read_to_end(&mut data)?;
    if copied as u64 != len {
        return Err(malformed("extended header is truncated"));
    }
    Ok(data)
}

fn skip(reader: &mut dyn Read, len: u64) -> Result<(), TarError> {
    let skipped = io::copy(&mut (&mut *reader).take(len), &mut io::sink())?;
    if skipped != len {
        return Err(malformed("archive ends inside a member"));
    }
    Ok(())
}

fn padding(size: u64) -> u64 {
    let block = BLOCK as u64;
    (block - size % block) % block
}

fn padded(size: u64) -> u64 {
    size + padding(size)
}

fn until_nul(field: &[u8]) -> &[u8] {
    match field.iter().position(|&b| b == 0) {
        Some(end) => &field[..end],
        None => field,
    }
}

/// Full member path from a ustar header: `prefix/name` when a prefix is set.
fn ustar_path(block: &[u8; BLOCK]) -> BString {
    let name = until_nul(&block[0..100]);
    let prefix: &[u8] = if &block[257..262] == b"ustar" {
        until_nul(&block[345..500])
    } else {
        &[]
    };
    if prefix.is_empty() {
        return BString::from(name);
    }
    let mut path = BString::from(prefix);
    path.push(b'/');
    path.extend_from_slice(name);
    path
}

/// Parse a numeric header field: octal text, or base-256 when the high bit is
/// set.
fn number(field: &[u8], what: &str) -> Result<u64, TarError> {
    if field.first().is_some_and(|&b| b & 0x80 != 0) {
        let mut value: u64 = u64::from(field[0] & 0x7f);
        for &b in &field[1..] {
            value = value
                .checked_mul(256)
                .and_then(|v| v.checked_add(u64::from(b)))
                .ok_or_else(|| malformed(format!("{what} field overflows")))?;
        }
        return Ok(value);
    }

    let text = until_nul(field);
    let mut value: u64 = 0;
    for &b in text.iter().filter(|&&b| b != b' ') {
        if !(b'0'..=b'7').contains(&b) {
            return Err(malformed(format!("{what} field is not octal")));
        }
        value = value
            .checked_mul(8)
            .and_then(|v| v.checked_add(u64::from(b - b'0')))
            .ok_or_else(|| malformed(format!("{what} field overflows")))?;
    }
    Ok(value)
}

/// Parse pax records of the form `"<len> <key>=<value>\n"`.
fn parse_pax(mut data: &[u8]) -> Result<PaxOverrides, TarError> {
    let mut overrides = PaxOverrides::default();
    while !data.is_empty() {
        let space = data
            .iter()
            .position(|&b| b == b' ')
            .ok_or_else(|| malformed("pax record without length"))?;
        let len: usize = std::str::from_utf8(&data[..space])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| malformed("pax record length is not a number"))?;
        if len <= space + 1 || len > data.len() || data[len - 1] != b'\n' {
            return Err(malformed("pax record length is inconsistent"));
        }

        let record = &data[space + 1..len - 1];
        let eq = record
            .iter()
            .position(|&b| b == b'=')
            .ok_or_else(|| malformed("pax record without '='"))?;
        let (key, value) = (&record[..eq], &record[eq + 1..]);
        match key {
            b"path" => overrides.path = Some(BString::from(value)),
            b"linkpath" => overrides.linkpath = Some(BString::from(value)),
            b"size" => {
                let size = std::str::from_utf8(value)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| malformed("pax size is not a number"))?;
                overrides.size = Some(size);
            }
            // mtime, comment and ownership do not describe content.
            _ => {}
        }
        data = &data[len..];
    }
    Ok(overrides)
}
