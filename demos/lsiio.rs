// Copyright (c) The adc-iio Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Lists enumerated IIO devices and their channel 0 raw/scale attributes.

use adc_iio::devices;

fn main() {
    let device_iterator = match devices() {
        Ok(devices) => devices,
        Err(e) => {
            println!("Failed to get device iterator: {:?}", e);
            return;
        }
    };

    for device in device_iterator {
        let device = match device {
            Ok(d) => d,
            Err(e) => {
                eprintln!("error enumerating device: {e}");
                continue;
            }
        };

        println!("IIO device {}", device.index());
        for attr in ["raw", "scale", "offset"] {
            match device.read_channel_attr(0, attr) {
                Ok(v) => println!("\tin_voltage0_{attr}: {v}"),
                Err(_) => println!("\tin_voltage0_{attr}: (unavailable)"),
            }
        }
    }
}
