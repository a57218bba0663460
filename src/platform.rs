//! The board-descriptor contract the acquisition core is built against.
//!
//! Pin tables, multiplexer wiring and board detection live outside this
//! crate. The core only needs two things from a board definition: a way to
//! turn a logical analog-channel index into a validated hardware channel,
//! and the native bit depth of the ADC. Both come through [`Platform`].

use crate::errors::Result;

bitflags::bitflags! {
    /// Capability word for a physical pin, as reported by the board tables.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PinCapabilities: u8 {
        /// The pin exists and is routed on this board.
        const VALID = 1 << 0;
        const GPIO = 1 << 1;
        const PWM = 1 << 2;
        const FAST_GPIO = 1 << 3;
        const SPI = 1 << 4;
        const I2C = 1 << 5;
        /// The pin is wired to an ADC input.
        const ANALOG_IN = 1 << 6;
        const UART = 1 << 7;
    }
}

/// A board definition, as seen by the analog acquisition core.
///
/// Channel arguments are logical analog-input indices in
/// `0..adc_channel_count()`; [`crate::AdcChannel::open`] validates the range
/// and the [`PinCapabilities::ANALOG_IN`] capability before calling
/// [`setup_mux`](Platform::setup_mux) or
/// [`hardware_channel`](Platform::hardware_channel).
pub trait Platform {
    /// Number of analog input channels the board exposes.
    fn adc_channel_count(&self) -> u32;

    /// Capability flags of the physical pin backing a logical channel.
    fn pin_capabilities(&self, channel: u32) -> PinCapabilities;

    /// Device-local hardware channel for a logical channel.
    ///
    /// This is the `N` in the `in_voltage<N>_raw` attribute name and need
    /// not equal the logical index on boards with remapped pinouts.
    fn hardware_channel(&self, channel: u32) -> u32;

    /// Routes the pin multiplexer so the ADC reaches the pin.
    ///
    /// Boards whose analog pins need no mux setup keep the default no-op.
    /// A failure here aborts channel initialization.
    fn setup_mux(&self, _channel: u32) -> Result<()> {
        Ok(())
    }

    /// Native bit width of samples produced by the ADC hardware.
    ///
    /// Queried once per channel open and stored in the context; samples are
    /// rescaled from this width to the caller's requested resolution.
    fn adc_raw_bits(&self) -> u32;
}
