//! Integration tests against a simulated sysfs/IIO tree in a tempdir.

use std::fs;
use std::path::Path;

use adc_iio::{
    device::{devices_at, Device},
    scan, AdcChannel, Error, PinCapabilities, Platform, Stage, Topology,
};
use tempfile::TempDir;

/// One straight-mapped analog pin on a 10-bit ADC.
struct OnePin;

impl Platform for OnePin {
    fn adc_channel_count(&self) -> u32 {
        1
    }

    fn pin_capabilities(&self, _channel: u32) -> PinCapabilities {
        PinCapabilities::VALID | PinCapabilities::ANALOG_IN
    }

    fn hardware_channel(&self, channel: u32) -> u32 {
        channel
    }

    fn adc_raw_bits(&self) -> u32 {
        10
    }
}

struct DigitalOnlyPin;

impl Platform for DigitalOnlyPin {
    fn adc_channel_count(&self) -> u32 {
        1
    }

    fn pin_capabilities(&self, _channel: u32) -> PinCapabilities {
        PinCapabilities::VALID | PinCapabilities::GPIO
    }

    fn hardware_channel(&self, channel: u32) -> u32 {
        channel
    }

    fn adc_raw_bits(&self) -> u32 {
        10
    }
}

struct BrokenMux;

impl Platform for BrokenMux {
    fn adc_channel_count(&self) -> u32 {
        1
    }

    fn pin_capabilities(&self, _channel: u32) -> PinCapabilities {
        PinCapabilities::VALID | PinCapabilities::ANALOG_IN
    }

    fn hardware_channel(&self, channel: u32) -> u32 {
        channel
    }

    fn setup_mux(&self, channel: u32) -> adc_iio::Result<()> {
        Err(Error::MuxSetup(channel))
    }

    fn adc_raw_bits(&self) -> u32 {
        10
    }
}

fn sim() -> (TempDir, Topology) {
    let dir = TempDir::new().unwrap();
    let topology = Topology::default().rooted_at(dir.path());
    (dir, topology)
}

fn seed(path: &Path, content: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn seed_raw(topology: &Topology, content: &str) {
    seed(&topology.raw_value_path(0), content.as_bytes());
}

/// Creates every pipeline control file except those named in `skip`.
fn seed_scan_tree(topology: &Topology, skip: &[&str], bulk: &[u8]) {
    let controls = [
        ("add_trigger", topology.add_trigger_path()),
        ("remove_trigger", topology.remove_trigger_path()),
        ("current_trigger", topology.current_trigger_path()),
        ("scan_element", topology.scan_element_path()),
        ("buffer_length", topology.buffer_length_path()),
        ("buffer_enable", topology.buffer_enable_path()),
        ("trigger_now", topology.trigger_now_path()),
    ];
    for (name, path) in controls {
        if !skip.contains(&name) {
            seed(&path, b"");
        }
    }
    seed(&topology.bulk_device_path(), bulk);
}

#[test]
fn open_resolves_channel_and_defaults() {
    let (_dir, topology) = sim();
    seed_raw(&topology, "0");

    let channel = AdcChannel::open(&OnePin, topology, 0).unwrap();
    assert_eq!(channel.hardware_channel(), 0);
    assert_eq!(channel.resolution(), 10);
}

#[test]
fn open_rejects_out_of_range_channel() {
    let (_dir, topology) = sim();
    let err = AdcChannel::open(&OnePin, topology, 1).unwrap_err();
    assert!(matches!(
        err,
        Error::ChannelOutOfRange {
            channel: 1,
            count: 1
        }
    ));
}

#[test]
fn open_rejects_digital_only_pin() {
    let (_dir, topology) = sim();
    let err = AdcChannel::open(&DigitalOnlyPin, topology, 0).unwrap_err();
    assert!(matches!(err, Error::NotAnalogCapable(0)));
}

#[test]
fn open_rejects_mux_failure() {
    let (_dir, topology) = sim();
    seed_raw(&topology, "0");
    let err = AdcChannel::open(&BrokenMux, topology, 0).unwrap_err();
    assert!(matches!(err, Error::MuxSetup(0)));
}

#[test]
fn open_fails_when_raw_attribute_is_missing() {
    let (_dir, topology) = sim();
    let err = AdcChannel::open(&OnePin, topology, 0).unwrap_err();
    assert!(matches!(err, Error::ResourceUnavailable { .. }));
}

#[test]
fn read_narrows_to_requested_resolution() {
    let (_dir, topology) = sim();
    seed_raw(&topology, "512");

    let mut channel = AdcChannel::open(&OnePin, topology, 0).unwrap();
    channel.set_resolution(8).unwrap();

    let sample = channel.read();
    assert_eq!(sample.value, 128);
    assert!(!sample.degraded);
}

#[test]
fn read_widens_past_native_resolution() {
    let (_dir, topology) = sim();
    seed_raw(&topology, "512");

    let mut channel = AdcChannel::open(&OnePin, topology, 0).unwrap();
    channel.set_resolution(12).unwrap();
    assert_eq!(channel.read().value, 2048);
}

#[test]
fn repeated_reads_reuse_the_handle() {
    let (_dir, topology) = sim();
    seed_raw(&topology, "17");

    let mut channel = AdcChannel::open(&OnePin, topology, 0).unwrap();
    for _ in 0..3 {
        let sample = channel.read();
        assert_eq!(sample.value, 17);
        assert!(!sample.degraded);
    }
}

#[test]
fn invalid_resolution_is_rejected_without_mutation() {
    let (_dir, topology) = sim();
    seed_raw(&topology, "0");

    let mut channel = AdcChannel::open(&OnePin, topology, 0).unwrap();
    assert!(channel.set_resolution(0).is_err());
    assert!(channel.set_resolution(33).is_err());
    assert_eq!(channel.resolution(), 10);
}

#[test]
fn normalized_read_spans_unit_interval() {
    let (_dir, topology) = sim();
    seed_raw(&topology, "1023");

    let mut channel = AdcChannel::open(&OnePin, topology.clone(), 0).unwrap();
    assert_eq!(channel.read_normalized(), 1.0);

    seed_raw(&topology, "0");
    channel.close();
    assert_eq!(channel.read_normalized(), 0.0);
}

#[test]
fn read_degrades_when_the_attribute_disappears() {
    let (_dir, topology) = sim();
    seed_raw(&topology, "512");

    let mut channel = AdcChannel::open(&OnePin, topology.clone(), 0).unwrap();
    channel.close();
    fs::remove_file(topology.raw_value_path(0)).unwrap();

    let sample = channel.read();
    assert_eq!(sample.value, 0);
    assert!(sample.degraded);
}

#[test]
fn read_degrades_on_non_decimal_content() {
    let (_dir, topology) = sim();
    seed_raw(&topology, "not-a-number");

    let mut channel = AdcChannel::open(&OnePin, topology, 0).unwrap();
    let sample = channel.read();
    assert_eq!(sample.value, 0);
    assert!(sample.degraded);
}

#[test]
fn close_is_idempotent_and_read_reopens() {
    let (_dir, topology) = sim();
    seed_raw(&topology, "512");

    let mut channel = AdcChannel::open(&OnePin, topology, 0).unwrap();
    channel.close();
    channel.close();

    let sample = channel.read();
    assert_eq!(sample.value, 512);
    assert!(!sample.degraded);
}

#[test]
fn pipeline_continues_past_buffer_enable_failure() {
    let (_dir, topology) = sim();
    seed_scan_tree(&topology, &["buffer_enable"], b"ABCDEFGH");

    let mut out = [0u8; 8];
    let report = scan::acquire(&topology, 4, &mut out).unwrap();

    // the bulk read and every other stage still ran
    assert_eq!(report.bytes_read(), 8);
    assert_eq!(&out, b"ABCDEFGH");
    assert_eq!(
        report.failed_stages(),
        [Stage::EnableBuffer, Stage::DisableBuffer]
    );

    // setup wrote the sample count and teardown disabled what it enabled
    assert_eq!(fs::read(topology.buffer_length_path()).unwrap(), b"4");
    assert_eq!(fs::read(topology.scan_element_path()).unwrap(), b"0");
    assert_eq!(fs::read(topology.remove_trigger_path()).unwrap(), b"0");
}

#[test]
fn pipeline_reports_zero_samples_as_clean() {
    let (_dir, topology) = sim();
    seed_scan_tree(&topology, &[], b"");

    let mut out = [0u8; 8];
    let report = scan::acquire(&topology, 4, &mut out).unwrap();
    assert_eq!(report.bytes_read(), 0);
    assert!(report.is_clean());
}

#[test]
fn pipeline_reports_total_setup_failure() {
    let (_dir, topology) = sim();
    // nothing seeded: every control file is missing

    let mut out = [0u8; 8];
    let report = scan::acquire(&topology, 4, &mut out).unwrap();
    assert_eq!(report.bytes_read(), 0);
    assert!(!report.is_clean());
    assert_eq!(report.failed_stages().len(), 11);
    assert!(report.stage_failed(Stage::AddTrigger));
    assert!(report.stage_failed(Stage::Fire));
    assert!(report.stage_failed(Stage::BulkRead));
    assert!(report.stage_failed(Stage::UnbindTrigger));
}

#[test]
fn pipeline_rejects_zero_sample_count() {
    let (_dir, topology) = sim();
    let mut out = [0u8; 8];
    let err = scan::acquire(&topology, 0, &mut out).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));
}

#[test]
fn pipeline_rejects_undersized_output_buffer() {
    let (_dir, topology) = sim();
    let mut out = [0u8; 4];
    let err = scan::acquire(&topology, 4, &mut out).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));
}

#[test]
fn device_attribute_read_parses_decimal() {
    let (dir, _topology) = sim();
    let root = dir.path().join("sys");
    seed(&root.join("iio:device0/in_voltage0_scale"), b"56\n");

    let device = Device::with_root(0, root);
    assert_eq!(device.read_channel_attr(0, "scale").unwrap(), 56);
}

#[test]
fn device_attribute_write_is_not_implemented() {
    let device = Device::new(0);
    let err = device.write_channel_attr(0, "scale", 1).unwrap_err();
    assert!(matches!(err, Error::NotImplemented(_)));
}

#[test]
fn device_iterator_skips_triggers() {
    let (dir, _topology) = sim();
    let root = dir.path().join("sys");
    for entry in ["iio:device0", "iio:device2", "trigger0", "iio_sysfs_trigger"] {
        fs::create_dir_all(root.join(entry)).unwrap();
    }

    let mut indices: Vec<u32> = devices_at(&root)
        .unwrap()
        .map(|d| d.unwrap().index())
        .collect();
    indices.sort_unstable();
    assert_eq!(indices, [0, 2]);
}
