//! Primitive reads and writes on sysfs pseudo-files.
//!
//! Every control the IIO subsystem exposes is a small text file: writing
//! `"1"` into `buffer/enable` flips the ring buffer on, reading
//! `in_voltage0_raw` yields a decimal sample. These helpers are the only
//! place the crate touches those files directly; everything above them
//! sequences calls into the acquisition protocol.

use std::fmt::Write as _;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use log::{debug, error, warn};

use crate::errors::{Error, Result};
use crate::fixed_str::FixedStr;

/// Size of the formatting buffer for attribute writes and reads.
///
/// Attribute values are short; anything longer is clipped (writes) or
/// rejected (reads) rather than heap-allocated.
pub const ATTR_BUF_LEN: usize = 64;

/// Writes `value` into the pseudo-file at `path`.
///
/// The value is staged through a bounded buffer; an over-long value is
/// truncated and logged, not rejected, matching how sysfs itself clips
/// oversized attribute stores.
pub fn write_str(path: &Path, value: &str) -> Result<()> {
    let mut buf = FixedStr::<ATTR_BUF_LEN>::empty();
    if buf.write_truncating(value) {
        warn!(
            "sysfs: value '{}' truncated to '{}' while writing {}",
            value,
            buf,
            path.display()
        );
    }
    write_bytes(path, buf.as_bytes())
}

/// Formats `value` as decimal text and writes it into `path`.
pub fn write_int(path: &Path, value: i64) -> Result<()> {
    let mut buf = FixedStr::<ATTR_BUF_LEN>::empty();
    write!(buf, "{value}")
        .map_err(|_| Error::Unspecified("decimal value overflowed the attribute buffer"))?;
    write_bytes(path, buf.as_bytes())
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut f = OpenOptions::new().write(true).open(path).map_err(|source| {
        error!(
            "sysfs: failed to open {} for writing: {source}",
            path.display()
        );
        Error::ResourceUnavailable {
            path: path.into(),
            source,
        }
    })?;

    f.write_all(bytes).map_err(|e| {
        error!("sysfs: failed to write to {}: {e}", path.display());
        Error::from(e)
    })?;

    debug!(
        "sysfs: wrote '{}' to {}",
        String::from_utf8_lossy(bytes),
        path.display()
    );
    Ok(())
}

/// Reads raw bytes from `path` into `out` with a single `read(2)` call.
///
/// Returns the actual byte count, which may be less than `out.len()`; there
/// is no retry loop. This is the bulk-data path for buffered captures, where
/// a short read means the device produced fewer samples than asked for.
pub fn read_bulk(path: &Path, out: &mut [u8]) -> Result<usize> {
    let mut f = File::open(path).map_err(|source| {
        error!(
            "sysfs: failed to open {} for reading: {source}",
            path.display()
        );
        Error::ResourceUnavailable {
            path: path.into(),
            source,
        }
    })?;

    let n = f.read(out)?;
    debug!("sysfs: read {} bytes from {}", n, path.display());
    Ok(n)
}

/// Reads a short attribute value (up to [`ATTR_BUF_LEN`] bytes of UTF-8).
pub fn read_attr(path: &Path) -> Result<FixedStr<ATTR_BUF_LEN>> {
    let mut raw = [0u8; ATTR_BUF_LEN];
    let n = read_bulk(path, &mut raw)?;
    let s = FixedStr::from_bytes(&raw[..n]).map_err(std::io::Error::from)?;
    Ok(s)
}
