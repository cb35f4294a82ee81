//! External interrupt lines INT0 (PD2) and INT1 (PD3)

#[cfg(target_arch = "avr")]
use avr_device::atmega328p::EXINT;

/// Sense control for one INTn line (ISCn1:ISCn0)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Edge {
    LowLevel = 0,
    Any = 1,
    Falling = 2,
    Rising = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Line {
    Int0 = 0,
    Int1 = 1,
}

impl Line {
    #[inline]
    pub const fn mask(self) -> u8 {
        1 << self as u8
    }
}

/// EICRA value for the two lines.
pub const fn eicra_bits(int0: Edge, int1: Edge) -> u8 {
    (int0 as u8) | ((int1 as u8) << 2)
}

#[cfg(target_arch = "avr")]
pub struct ExtInt {
    exint: EXINT,
}

#[cfg(target_arch = "avr")]
impl ExtInt {
    pub fn new(exint: EXINT) -> Self {
        unsafe {
            exint.eimsk.write(|w| w.bits(0));
        }
        Self { exint }
    }

    /// Set the sense control of both lines. Leaves them masked.
    pub fn configure(&mut self, int0: Edge, int1: Edge) {
        unsafe {
            // Changing ISCn can raise a spurious flag, so mask first and
            // clear the flags afterwards
            self.exint.eimsk.write(|w| w.bits(0));
            self.exint.eicra.write(|w| w.bits(eicra_bits(int0, int1)));
            self.exint
                .eifr
                .write(|w| w.bits(Line::Int0.mask() | Line::Int1.mask()));
        }
    }

    pub fn enable(&mut self, line: Line) {
        unsafe {
            self.exint
                .eimsk
                .modify(|r, w| w.bits(r.bits() | line.mask()));
        }
    }

    pub fn disable(&mut self, line: Line) {
        unsafe {
            self.exint
                .eimsk
                .modify(|r, w| w.bits(r.bits() & !line.mask()));
        }
    }

    /// (EICRA, EIMSK), used by the hardware self test.
    pub fn registers(&self) -> (u8, u8) {
        (
            self.exint.eicra.read().bits(),
            self.exint.eimsk.read().bits(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falling_edge_on_both_lines() {
        assert_eq!(eicra_bits(Edge::Falling, Edge::Falling), 0x0A);
    }

    #[test]
    fn lines_are_configured_independently() {
        assert_eq!(eicra_bits(Edge::Falling, Edge::LowLevel), 0x02);
        assert_eq!(eicra_bits(Edge::LowLevel, Edge::Falling), 0x08);
        assert_eq!(eicra_bits(Edge::Rising, Edge::Any), 0x07);
    }

    #[test]
    fn line_masks() {
        assert_eq!(Line::Int0.mask() | Line::Int1.mask(), 0x03);
    }
}
