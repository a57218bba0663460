//! Where the IIO subsystem puts things on a particular board.
//!
//! The kernel enumerates IIO devices and triggers under
//! `/sys/bus/iio/devices`, but which `iio:deviceN` carries the raw voltage
//! attributes, which one owns the scan buffer, and how wide a scan element
//! is are all driver- and board-specific. [`Topology`] captures that layout
//! once so the acquisition code never hardcodes a device index, and so tests
//! can point the whole crate at a simulated tree.

use std::path::{Path, PathBuf};

/// Kernel mount point for the IIO device directory.
pub const SYSFS_IIO_PATH: &str = "/sys/bus/iio/devices";

/// Directory holding the buffer character devices.
pub const DEV_PATH: &str = "/dev";

/// sysfs/IIO layout descriptor for one board.
///
/// The `Default` layout matches a board whose ADC exposes single-shot raw
/// attributes on `iio:device0` and buffered capture on `iio:device1` with
/// 16-bit scan elements, driven by software trigger 0 (`sysfstrig0`, which
/// exists when the `iio-trig-sysfs` module is loaded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    /// Root of the IIO sysfs tree.
    pub sysfs_root: PathBuf,
    /// Root of the device-node tree.
    pub dev_root: PathBuf,
    /// Index of the device exposing `in_voltage<N>_raw`.
    pub raw_device: u32,
    /// Index of the device exposing the trigger, scan-element and buffer
    /// controls, and the buffer character device.
    pub scan_device: u32,
    /// Index of the sysfs software-trigger instance.
    pub trigger_index: u32,
    /// Scan-element channel enabled for buffered capture.
    pub scan_channel: u32,
    /// Size of one scan element in bytes.
    pub scan_size: usize,
}

impl Default for Topology {
    fn default() -> Self {
        Self {
            sysfs_root: PathBuf::from(SYSFS_IIO_PATH),
            dev_root: PathBuf::from(DEV_PATH),
            raw_device: 0,
            scan_device: 1,
            trigger_index: 0,
            scan_channel: 0,
            scan_size: 2,
        }
    }
}

impl Topology {
    /// Single-shot raw sample attribute for a hardware channel.
    pub fn raw_value_path(&self, channel: u32) -> PathBuf {
        self.sysfs_root
            .join(format!("iio:device{}/in_voltage{}_raw", self.raw_device, channel))
    }

    pub fn add_trigger_path(&self) -> PathBuf {
        self.sysfs_root.join("iio_sysfs_trigger/add_trigger")
    }

    pub fn remove_trigger_path(&self) -> PathBuf {
        self.sysfs_root.join("iio_sysfs_trigger/remove_trigger")
    }

    /// The scan device's `current_trigger` binding attribute.
    pub fn current_trigger_path(&self) -> PathBuf {
        self.scan_device_dir().join("trigger/current_trigger")
    }

    /// Scan-element enable attribute for [`scan_channel`](Self::scan_channel).
    pub fn scan_element_path(&self) -> PathBuf {
        self.scan_device_dir()
            .join(format!("scan_elements/in_voltage{}_en", self.scan_channel))
    }

    pub fn buffer_length_path(&self) -> PathBuf {
        self.scan_device_dir().join("buffer/length")
    }

    pub fn buffer_enable_path(&self) -> PathBuf {
        self.scan_device_dir().join("buffer/enable")
    }

    /// The `trigger_now` pulse attribute of the software trigger.
    pub fn trigger_now_path(&self) -> PathBuf {
        self.sysfs_root
            .join(format!("trigger{}/trigger_now", self.trigger_index))
    }

    /// Character device the kernel drains the ring buffer through.
    pub fn bulk_device_path(&self) -> PathBuf {
        self.dev_root.join(format!("iio:device{}", self.scan_device))
    }

    /// Name the kernel gives the software trigger instance.
    pub fn trigger_name(&self) -> String {
        format!("sysfstrig{}", self.trigger_index)
    }

    fn scan_device_dir(&self) -> PathBuf {
        self.sysfs_root.join(format!("iio:device{}", self.scan_device))
    }

    /// A copy of this layout rooted under `base`, for simulated trees.
    pub fn rooted_at(&self, base: &Path) -> Self {
        Self {
            sysfs_root: base.join("sys"),
            dev_root: base.join("dev"),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_paths() {
        let t = Topology::default();
        assert_eq!(
            t.raw_value_path(3),
            Path::new("/sys/bus/iio/devices/iio:device0/in_voltage3_raw")
        );
        assert_eq!(
            t.current_trigger_path(),
            Path::new("/sys/bus/iio/devices/iio:device1/trigger/current_trigger")
        );
        assert_eq!(
            t.scan_element_path(),
            Path::new("/sys/bus/iio/devices/iio:device1/scan_elements/in_voltage0_en")
        );
        assert_eq!(
            t.trigger_now_path(),
            Path::new("/sys/bus/iio/devices/trigger0/trigger_now")
        );
        assert_eq!(t.bulk_device_path(), Path::new("/dev/iio:device1"));
        assert_eq!(t.trigger_name(), "sysfstrig0");
    }

    #[test]
    fn custom_indices_show_up_in_paths() {
        let t = Topology {
            scan_device: 2,
            trigger_index: 5,
            scan_channel: 1,
            ..Topology::default()
        };
        assert_eq!(
            t.scan_element_path(),
            Path::new("/sys/bus/iio/devices/iio:device2/scan_elements/in_voltage1_en")
        );
        assert_eq!(t.trigger_name(), "sysfstrig5");
    }
}
