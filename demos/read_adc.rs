// Copyright (c) The adc-iio Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use adc_iio::{AdcChannel, PinCapabilities, Platform, Topology};
use quicli::prelude::*;
use std::thread::sleep;
use std::time::Duration;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Cli {
    /// The logical analog channel to read
    channel: u32,
    /// Number of samples to take
    count: u32,
    /// Delay between samples in milliseconds
    period_ms: u64,
    /// Output resolution in bits
    #[structopt(default_value = "10")]
    bits: u32,
}

/// A board with straight-mapped analog pins and a 12-bit ADC. Real board
/// definitions belong in a platform support crate.
struct GenericBoard;

impl Platform for GenericBoard {
    fn adc_channel_count(&self) -> u32 {
        6
    }

    fn pin_capabilities(&self, _channel: u32) -> PinCapabilities {
        PinCapabilities::VALID | PinCapabilities::ANALOG_IN
    }

    fn hardware_channel(&self, channel: u32) -> u32 {
        channel
    }

    fn adc_raw_bits(&self) -> u32 {
        12
    }
}

fn do_main(args: Cli) -> adc_iio::Result<()> {
    let mut channel = AdcChannel::open(&GenericBoard, Topology::default(), args.channel)?;
    channel.set_resolution(args.bits)?;

    for _ in 0..args.count {
        let sample = channel.read();
        if sample.degraded {
            eprintln!("{} (degraded)", sample.value);
        } else {
            println!("{}", sample.value);
        }
        sleep(Duration::from_millis(args.period_ms));
    }

    Ok(())
}

fn main() -> CliResult {
    env_logger::init();
    let args = Cli::from_args();
    do_main(args).or_else(|e| {
        error!("{:?}", e);
        Ok(())
    })
}
