//! Analog input channels: context lifecycle and the single-sample read path.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};

use log::{error, warn};

use crate::errors::{Error, Result};
use crate::platform::{PinCapabilities, Platform};
use crate::scan::{self, ScanReport};
use crate::topology::Topology;

/// Output resolution a freshly opened channel reports samples at.
pub const DEFAULT_RESOLUTION_BITS: u32 = 10;

/// Widest supported output resolution; samples are `u32`.
pub const MAX_RESOLUTION_BITS: u32 = 32;

/// A raw-value attribute is a short decimal; 16 bytes covers any `u32`
/// plus the trailing newline.
const RAW_SAMPLE_LEN: usize = 16;

/// One sample from [`AdcChannel::read`].
///
/// The polling read path never errors: a transient sysfs hiccup yields a
/// best-effort value (usually 0) with `degraded` set, so callers can tell a
/// genuine zero sample from a failed read without taking an error path in
/// their polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    /// The sample, rescaled to the channel's configured resolution.
    pub value: u32,
    /// Set when the handle could not be (re)opened, the read failed, or the
    /// file content did not parse as a decimal number.
    pub degraded: bool,
}

impl Reading {
    const fn degraded(value: u32) -> Self {
        Self {
            value,
            degraded: true,
        }
    }
}

/// An open analog input channel.
///
/// Owns the read handle to the channel's raw-value attribute. The handle is
/// kept open across reads (the attribute is re-read via seek rather than
/// reopened on the hot path) and lazily reopened if it has been dropped by
/// [`close`](Self::close).
///
/// A channel is not internally synchronized; the `&mut self` receivers on
/// the read path encode the one-caller-at-a-time assumption.
#[derive(Debug)]
pub struct AdcChannel {
    hardware_channel: u32,
    raw: Option<File>,
    resolution_bits: u32,
    raw_bits: u32,
    topology: Topology,
}

impl AdcChannel {
    /// Opens logical analog channel `channel` as described by `platform`.
    ///
    /// Validates the index against the platform's channel count and the
    /// pin's analog capability, runs multiplexer setup where the board
    /// requires it, and opens the raw-value attribute for reading. Any
    /// failure aborts the whole call; no partially initialized channel is
    /// ever returned.
    pub fn open(platform: &dyn Platform, topology: Topology, channel: u32) -> Result<Self> {
        let count = platform.adc_channel_count();
        if channel >= count {
            error!("aio: requested channel {channel} out of range");
            return Err(Error::ChannelOutOfRange { channel, count });
        }

        let caps = platform.pin_capabilities(channel);
        if !caps.contains(PinCapabilities::ANALOG_IN) {
            error!("aio: pin backing channel {channel} is not analog capable");
            return Err(Error::NotAnalogCapable(channel));
        }

        platform.setup_mux(channel)?;

        let mut ch = Self {
            hardware_channel: platform.hardware_channel(channel),
            raw: None,
            resolution_bits: DEFAULT_RESOLUTION_BITS,
            raw_bits: platform.adc_raw_bits(),
            topology,
        };
        ch.raw = Some(ch.open_raw()?);

        Ok(ch)
    }

    fn open_raw(&self) -> Result<File> {
        let path = self.topology.raw_value_path(self.hardware_channel);
        File::open(&path).map_err(|source| {
            error!("aio: failed to open {} for reading", path.display());
            Error::ResourceUnavailable { path, source }
        })
    }

    /// The device-local channel index samples are read from.
    pub const fn hardware_channel(&self) -> u32 {
        self.hardware_channel
    }

    /// The currently configured output resolution in bits.
    pub const fn resolution(&self) -> u32 {
        self.resolution_bits
    }

    /// Sets the output resolution.
    ///
    /// Rejects widths outside `1..=32` without touching the current value.
    pub fn set_resolution(&mut self, bits: u32) -> Result<()> {
        if bits < 1 || bits > MAX_RESOLUTION_BITS {
            return Err(Error::InvalidParameter(
                "resolution must be between 1 and 32 bits",
            ));
        }
        self.resolution_bits = bits;
        Ok(())
    }

    /// Drops the read handle. Idempotent; the next [`read`](Self::read)
    /// reopens it. Dropping the channel closes the handle too.
    pub fn close(&mut self) {
        self.raw = None;
    }

    /// Reads one sample, rescaled to the configured resolution.
    ///
    /// Best-effort by design: see [`Reading`].
    pub fn read(&mut self) -> Reading {
        if self.raw.is_none() {
            match self.open_raw() {
                Ok(f) => self.raw = Some(f),
                Err(e) => {
                    warn!("aio: failed to get to the device: {e}");
                    return Reading::degraded(0);
                }
            }
        }
        let Some(file) = self.raw.as_mut() else {
            return Reading::degraded(0);
        };

        let mut buf = [0u8; RAW_SAMPLE_LEN];
        let read = sample_bytes(file, &mut buf);

        let mut degraded = false;
        let n = match read {
            Ok(n) if n > 0 => n,
            Ok(_) => {
                warn!(
                    "aio: empty sample from channel {}",
                    self.hardware_channel
                );
                degraded = true;
                0
            }
            Err(e) => {
                warn!("aio: failed to read a sensible value: {e}");
                degraded = true;
                0
            }
        };

        let value = match parse_decimal(&buf[..n]) {
            Some(v) => v,
            None => {
                if n > 0 {
                    warn!("aio: value is not a decimal number");
                }
                degraded = true;
                0
            }
        };

        Reading {
            value: rescale(value, self.raw_bits, self.resolution_bits),
            degraded,
        }
    }

    /// Reads one sample scaled into `[0.0, 1.0]` of the configured
    /// resolution's full range.
    pub fn read_normalized(&mut self) -> f32 {
        let max = ((1u64 << self.resolution_bits) - 1) as f32;
        self.read().value as f32 / max
    }

    /// Captures `samples` triggered samples through the kernel ring buffer
    /// into `out`. See [`crate::scan`] for the protocol and its
    /// best-effort semantics.
    pub fn read_buffered(&self, samples: u32, out: &mut [u8]) -> Result<ScanReport> {
        scan::acquire(&self.topology, samples, out)
    }
}

/// Re-reads the attribute from offset 0, leaving the offset back at 0 for
/// the next call.
fn sample_bytes(file: &mut File, buf: &mut [u8]) -> io::Result<usize> {
    file.seek(SeekFrom::Start(0))?;
    let n = file.read(buf)?;
    file.seek(SeekFrom::Start(0))?;
    Ok(n)
}

/// Parses a leading base-10 unsigned integer, `strtoul`-style: leading
/// ASCII whitespace is skipped and trailing non-digits are ignored. `None`
/// if no digits are present or the value overflows `u32`.
fn parse_decimal(bytes: &[u8]) -> Option<u32> {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace())?;
    let digits = bytes[start..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }

    let mut value: u32 = 0;
    for b in &bytes[start..start + digits] {
        value = value
            .checked_mul(10)?
            .checked_add(u32::from(b - b'0'))?;
    }
    Some(value)
}

/// Shifts a raw sample between the hardware bit depth and the requested
/// one. Lossy on purpose: narrowing truncates the low bits, widening zero
/// fills them.
fn rescale(raw: u32, raw_bits: u32, out_bits: u32) -> u32 {
    if raw_bits > out_bits {
        raw >> (raw_bits - out_bits)
    } else {
        raw << (out_bits - raw_bits)
    }
}
