#[cfg(target_arch = "avr")]
use avr_device::atmega328p::ADC;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AdcChannel {
    Adc0 = 0,
    Adc1 = 1,
    Adc2 = 2,
    Adc3 = 3,
    Adc4 = 4,
    Adc5 = 5,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AdcReference {
    /// AVCC with external cap at AREF
    Avcc = 1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AdcPrescaler {
    Div2 = 1,
    Div4 = 2,
    Div8 = 3,
    Div16 = 4,
    Div32 = 5,
    Div64 = 6,
    Div128 = 7,
}

// ADMUX
const ADLAR: u8 = 1 << 5;
// ADCSRA
const ADEN: u8 = 1 << 7;
const ADSC: u8 = 1 << 6;
const ADATE: u8 = 1 << 5;
const ADIF: u8 = 1 << 4;
const ADIE: u8 = 1 << 3;

/// Conversion mode written to ADCSRA.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Conversion {
    /// One conversion per ADSC write
    Single,
    /// Auto-triggered back to back, result delivered by the ADC interrupt
    FreeRunning,
}

/// ADMUX value. Left adjustment puts the 8 most significant bits in ADCH.
pub const fn admux_bits(reference: AdcReference, channel: AdcChannel, left_adjust: bool) -> u8 {
    let adlar = if left_adjust { ADLAR } else { 0 };
    ((reference as u8) << 6) | adlar | channel as u8
}

/// ADCSRA value. Free running also starts the first conversion.
pub const fn adcsra_bits(prescaler: AdcPrescaler, conversion: Conversion) -> u8 {
    match conversion {
        Conversion::Single => ADEN | prescaler as u8,
        Conversion::FreeRunning => ADEN | ADSC | ADATE | ADIE | prescaler as u8,
    }
}

/// ADCSRA after leaving free running: auto trigger and interrupt off, the
/// prescaler kept, and a pending ADIF cleared by writing it back as one.
pub const fn adcsra_stopped(current: u8) -> u8 {
    (current & !(ADSC | ADATE | ADIE)) | ADIF
}

/// Upper 8 bits of a left-adjusted 16-bit result.
#[inline]
pub const fn high_byte(raw: u16) -> u8 {
    (raw >> 8) as u8
}

#[cfg(target_arch = "avr")]
pub struct Adc {
    adc: ADC,
}

#[cfg(target_arch = "avr")]
impl Adc {
    /// Enable the ADC, idle, at the slowest clock (125kHz @ 16MHz) with
    /// AVCC reference.
    pub fn new(adc: ADC) -> Self {
        unsafe {
            adc.adcsrb.write(|w| w.bits(0));
            adc.admux
                .write(|w| w.bits(admux_bits(AdcReference::Avcc, AdcChannel::Adc0, true)));
            adc.adcsra
                .write(|w| w.bits(adcsra_bits(AdcPrescaler::Div128, Conversion::Single)));
        }
        Self { adc }
    }

    /// Convert `channel` continuously, raising the ADC interrupt after every
    /// result. Trigger source stays at free running (ADTS = 0).
    pub fn start_free_running(&mut self, channel: AdcChannel, prescaler: AdcPrescaler) {
        unsafe {
            // Digital input buffer off on the analog pin
            self.adc.didr0.write(|w| w.bits(1 << channel as u8));
            self.adc.adcsrb.write(|w| w.bits(0));
            self.adc
                .admux
                .write(|w| w.bits(admux_bits(AdcReference::Avcc, channel, true)));
            self.adc
                .adcsra
                .write(|w| w.bits(adcsra_bits(prescaler, Conversion::FreeRunning)));
        }
    }

    /// Back to polled single conversions at the prescaler already set.
    pub fn stop_free_running(&mut self) {
        unsafe {
            self.adc.adcsra.modify(|r, w| w.bits(adcsra_stopped(r.bits())));
        }
    }

    /// ADIF, only meaningful while the ADC interrupt is not being serviced.
    pub fn conversion_complete(&self) -> bool {
        self.adc.adcsra.read().bits() & ADIF != 0
    }

    pub fn clear_complete(&mut self) {
        unsafe {
            // ADIF is cleared by writing a one
            self.adc.adcsra.modify(|r, w| w.bits(r.bits() | ADIF));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admux_selects_avcc_left_adjusted_adc0() {
        assert_eq!(admux_bits(AdcReference::Avcc, AdcChannel::Adc0, true), 0x60);
        assert_eq!(admux_bits(AdcReference::Avcc, AdcChannel::Adc3, false), 0x43);
    }

    #[test]
    fn free_running_at_slowest_clock() {
        // ADEN | ADSC | ADATE | ADIE | ADPS = 0b111
        assert_eq!(adcsra_bits(AdcPrescaler::Div128, Conversion::FreeRunning), 0xEF);
    }

    #[test]
    fn single_conversion_has_no_auto_trigger() {
        assert_eq!(adcsra_bits(AdcPrescaler::Div128, Conversion::Single), 0x87);
    }

    #[test]
    fn stopping_keeps_the_prescaler() {
        let running = adcsra_bits(AdcPrescaler::Div32, Conversion::FreeRunning);
        assert_eq!(
            adcsra_stopped(running),
            adcsra_bits(AdcPrescaler::Div32, Conversion::Single) | ADIF
        );
        // a completed conversion stays acknowledged
        assert_eq!(adcsra_stopped(running | ADIF) & ADIF, ADIF);
    }

    #[test]
    fn left_adjusted_result_keeps_top_bits() {
        // full scale 10-bit result 0x3FF shifted left by 6
        assert_eq!(high_byte(0xFFC0), 0xFF);
        assert_eq!(high_byte(0x8040), 0x80);
        assert_eq!(high_byte(0x00C0), 0x00);
    }
}
