//! Buffered, triggered acquisition through the kernel ring buffer.
//!
//! A buffered capture is a fixed protocol over sysfs controls: register a
//! software trigger, bind it to the scan device, enable the scan element,
//! size and enable the ring buffer, pulse the trigger once per sample, then
//! drain the buffer character device with one bulk read. Teardown undoes
//! the configuration in a fixed order and always runs, even when setup only
//! partially succeeded, so no trigger or buffer is left enabled on the
//! device.
//!
//! Stage failures are logged and recorded but never abort the remaining
//! stages; the pipeline gets as far as it can and reports what worked
//! through [`ScanReport`].

use log::{debug, warn};

use crate::errors::{Error, Result};
use crate::sysfs;
use crate::topology::Topology;

/// One stage of the acquisition protocol, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Register a software trigger instance with the kernel.
    AddTrigger,
    /// Bind the trigger to the scan device's `current_trigger`.
    BindTrigger,
    /// Enable the scan element for capture.
    EnableChannel,
    /// Set the ring buffer length to the sample count.
    SizeBuffer,
    /// Flip the ring buffer on.
    EnableBuffer,
    /// Pulse `trigger_now`, once per requested sample.
    Fire,
    /// Drain the buffer character device.
    BulkRead,
    /// Teardown: flip the ring buffer off.
    DisableBuffer,
    /// Teardown: disable the scan element.
    DisableChannel,
    /// Teardown: unregister the software trigger.
    RemoveTrigger,
    /// Teardown: clear the scan device's `current_trigger`.
    UnbindTrigger,
}

const STAGE_COUNT: usize = 11;

/// Outcome of one buffered capture.
///
/// `bytes_read` reflects only the bulk-read stage. The failed-stage list is
/// what distinguishes "the device produced no data" (zero bytes, no failed
/// stages) from "setup never succeeded" (zero bytes, setup stages listed).
#[derive(Debug, Default)]
pub struct ScanReport {
    bytes_read: usize,
    failed: heapless::Vec<Stage, STAGE_COUNT>,
}

impl ScanReport {
    /// Bytes captured by the bulk read; may be less than requested.
    pub const fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    /// Stages that reported failure, in execution order. [`Stage::Fire`]
    /// appears at most once regardless of how many pulses failed.
    pub fn failed_stages(&self) -> &[Stage] {
        &self.failed
    }

    pub fn stage_failed(&self, stage: Stage) -> bool {
        self.failed.contains(&stage)
    }

    /// `true` when every stage, including teardown, succeeded.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, stage: Stage) {
        if !self.stage_failed(stage) {
            // capacity equals the stage count, so this cannot overflow
            let _ = self.failed.push(stage);
        }
    }
}

/// Runs one buffered capture of `samples` scan elements into `out`.
///
/// `samples` must be positive and `out` must hold at least
/// `samples * scan_size` bytes; both are checked before any control file is
/// touched. Everything after that point is best-effort, per the module
/// docs.
pub fn acquire(topology: &Topology, samples: u32, out: &mut [u8]) -> Result<ScanReport> {
    if samples == 0 {
        return Err(Error::InvalidParameter("sample count must be positive"));
    }
    let wanted = samples as usize * topology.scan_size;
    if out.len() < wanted {
        return Err(Error::InvalidParameter(
            "output buffer too small for the requested sample count",
        ));
    }

    let mut report = ScanReport::default();

    attempt(
        &mut report,
        Stage::AddTrigger,
        "register sysfs trigger",
        sysfs::write_int(&topology.add_trigger_path(), topology.trigger_index.into()),
    );
    attempt(
        &mut report,
        Stage::BindTrigger,
        "bind trigger to scan device",
        sysfs::write_str(&topology.current_trigger_path(), &topology.trigger_name()),
    );
    attempt(
        &mut report,
        Stage::EnableChannel,
        "enable scan channel",
        sysfs::write_int(&topology.scan_element_path(), 1),
    );
    attempt(
        &mut report,
        Stage::SizeBuffer,
        "set ring buffer length",
        sysfs::write_int(&topology.buffer_length_path(), samples.into()),
    );
    attempt(
        &mut report,
        Stage::EnableBuffer,
        "enable ring buffer",
        sysfs::write_int(&topology.buffer_enable_path(), 1),
    );

    let trigger_now = topology.trigger_now_path();
    for pulse in 0..samples {
        match sysfs::write_int(&trigger_now, 1) {
            Ok(()) => debug!("scan: fired trigger, pulse {} of {samples}", pulse + 1),
            Err(e) => {
                warn!("scan: trigger pulse {} of {samples} failed: {e}", pulse + 1);
                report.record(Stage::Fire);
            }
        }
    }

    match sysfs::read_bulk(&topology.bulk_device_path(), &mut out[..wanted]) {
        Ok(n) => {
            report.bytes_read = n;
            debug!("scan: captured {n} of {wanted} bytes");
        }
        Err(e) => {
            warn!("scan: bulk read failed: {e}");
            report.record(Stage::BulkRead);
        }
    }

    attempt(
        &mut report,
        Stage::DisableBuffer,
        "disable ring buffer",
        sysfs::write_int(&topology.buffer_enable_path(), 0),
    );
    attempt(
        &mut report,
        Stage::DisableChannel,
        "disable scan channel",
        sysfs::write_int(&topology.scan_element_path(), 0),
    );
    attempt(
        &mut report,
        Stage::RemoveTrigger,
        "remove sysfs trigger",
        sysfs::write_int(&topology.remove_trigger_path(), topology.trigger_index.into()),
    );
    attempt(
        &mut report,
        Stage::UnbindTrigger,
        "detach trigger from scan device",
        sysfs::write_str(&topology.current_trigger_path(), ""),
    );

    Ok(report)
}

fn attempt(report: &mut ScanReport, stage: Stage, what: &str, res: Result<()>) {
    match res {
        Ok(()) => debug!("scan: {what}"),
        Err(e) => {
            warn!("scan: could not {what}: {e}");
            report.record(stage);
        }
    }
}
