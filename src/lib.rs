// Copyright (c) The adc-iio Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `adc-iio` crate provides access to analog input channels (ADC) on
//! embedded Linux boards through the kernel's [Industrial I/O sysfs
//! interface](https://www.kernel.org/doc/Documentation/ABI/testing/sysfs-bus-iio).
//!
//! A board definition supplies the channel mapping through the [`Platform`]
//! trait and the sysfs layout through a [`Topology`]; from those an
//! [`AdcChannel`] gives you single-shot polled reads with resolution
//! normalization, or a buffered capture driven by a kernel software trigger.
//!
//! # Examples
//!
//! Polling a channel:
//!
//! ```no_run
//! use adc_iio::{AdcChannel, PinCapabilities, Platform, Topology};
//!
//! // Board definitions normally come from a platform support crate; this
//! // one exposes six straight-mapped channels on a 12-bit ADC.
//! struct Board;
//!
//! impl Platform for Board {
//!     fn adc_channel_count(&self) -> u32 {
//!         6
//!     }
//!     fn pin_capabilities(&self, _channel: u32) -> PinCapabilities {
//!         PinCapabilities::VALID | PinCapabilities::ANALOG_IN
//!     }
//!     fn hardware_channel(&self, channel: u32) -> u32 {
//!         channel
//!     }
//!     fn adc_raw_bits(&self) -> u32 {
//!         12
//!     }
//! }
//!
//! fn main() -> adc_iio::Result<()> {
//!     let mut channel = AdcChannel::open(&Board, Topology::default(), 0)?;
//!     channel.set_resolution(10)?;
//!     loop {
//!         let sample = channel.read();
//!         if sample.degraded {
//!             eprintln!("read degraded, got {}", sample.value);
//!         } else {
//!             println!("{} ({:.3})", sample.value, channel.read_normalized());
//!         }
//!     }
//! }
//! ```
//!
//! A buffered capture of 16 samples:
//!
//! ```no_run
//! # use adc_iio::{AdcChannel, PinCapabilities, Platform, Topology};
//! # struct Board;
//! # impl Platform for Board {
//! #     fn adc_channel_count(&self) -> u32 { 6 }
//! #     fn pin_capabilities(&self, _channel: u32) -> PinCapabilities {
//! #         PinCapabilities::VALID | PinCapabilities::ANALOG_IN
//! #     }
//! #     fn hardware_channel(&self, channel: u32) -> u32 { channel }
//! #     fn adc_raw_bits(&self) -> u32 { 12 }
//! # }
//! # fn main() -> adc_iio::Result<()> {
//! let topology = Topology::default();
//! let channel = AdcChannel::open(&Board, topology.clone(), 0)?;
//!
//! let mut data = vec![0u8; 16 * topology.scan_size];
//! let report = channel.read_buffered(16, &mut data)?;
//! println!(
//!     "captured {} bytes, clean: {}, failed stages: {:?}",
//!     report.bytes_read(),
//!     report.is_clean(),
//!     report.failed_stages()
//! );
//! # Ok(()) }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

mod errors;

pub mod fixed_str;

pub mod channel;

pub mod device;

pub mod platform;

pub mod scan;

pub mod sysfs;

pub mod topology;

pub use channel::{AdcChannel, Reading, DEFAULT_RESOLUTION_BITS};
pub use device::{devices, Device};
pub use errors::{Error, Result};
pub use platform::{PinCapabilities, Platform};
pub use scan::{ScanReport, Stage};
pub use topology::Topology;
