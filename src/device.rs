//! Generic IIO device attribute access and device discovery.

use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use bstr::ByteSlice;

use crate::errors::{Error, Result};
use crate::sysfs;
use crate::topology::SYSFS_IIO_PATH;

/// One enumerated IIO device (`iio:device<N>`).
///
/// This is the read-only attribute surface of a device, independent of any
/// analog channel context; use it for things like `scale` or `offset`
/// attributes published next to the raw values.
#[derive(Debug, Clone)]
pub struct Device {
    index: u32,
    root: PathBuf,
}

impl Device {
    pub fn new(index: u32) -> Self {
        Self::with_root(index, SYSFS_IIO_PATH.into())
    }

    /// A device under a non-default sysfs root.
    pub fn with_root(index: u32, root: PathBuf) -> Self {
        Self { index, root }
    }

    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Reads the `in_voltage<channel>_<attribute>` attribute as a decimal
    /// integer.
    pub fn read_channel_attr(&self, channel: u32, attribute: &str) -> Result<i64> {
        let path = self.channel_attr_path(channel, attribute);
        let raw = sysfs::read_attr(&path)?;
        raw.trim()
            .parse()
            .map_err(|_| Error::Unspecified("attribute is not a decimal number"))
    }

    /// Writing voltage-channel attributes is not supported by this crate.
    pub fn write_channel_attr(&self, _channel: u32, _attribute: &str, _value: i64) -> Result<()> {
        Err(Error::NotImplemented("IIO attribute writes"))
    }

    fn channel_attr_path(&self, channel: u32, attribute: &str) -> PathBuf {
        self.root.join(format!(
            "iio:device{}/in_voltage{}_{}",
            self.index, channel, attribute
        ))
    }
}

/// Iterate over the IIO devices currently present on this system
pub fn devices() -> Result<DeviceIterator> {
    devices_at(Path::new(SYSFS_IIO_PATH))
}

/// Iterate over the IIO devices enumerated under `root`.
pub fn devices_at(root: &Path) -> Result<DeviceIterator> {
    Ok(DeviceIterator {
        root: root.to_path_buf(),
        readdir: std::fs::read_dir(root)?,
    })
}

/// Iterator over devices
#[derive(Debug)]
pub struct DeviceIterator {
    root: PathBuf,
    readdir: std::fs::ReadDir,
}

impl Iterator for DeviceIterator {
    type Item = Result<Device>;

    fn next(&mut self) -> Option<Result<Device>> {
        for entry in &mut self.readdir {
            let e = match entry {
                Ok(e) => e,
                Err(e) => {
                    return Some(Err(e.into()));
                }
            };
            let name = e.file_name();
            let bytes = name.as_bytes();
            // triggers and iio_sysfs_trigger live in the same directory
            if !bytes.starts_with_str("iio:device") {
                continue;
            }
            let rest = &bytes["iio:device".len()..];
            let Some(index) = std::str::from_utf8(rest).ok().and_then(|s| s.parse().ok())
            else {
                continue;
            };
            return Some(Ok(Device::with_root(index, self.root.clone())));
        }

        None
    }
}
