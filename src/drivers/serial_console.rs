use embedded_hal::serial;

pub struct SerialConsole<W> {
    tx: W,
}

impl<W: serial::Write<u8>> SerialConsole<W> {
    pub fn new(tx: W) -> Self {
        Self { tx }
    }

    pub fn write_byte(&mut self, byte: u8) -> Result<(), W::Error> {
        nb::block!(self.tx.write(byte))
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), W::Error> {
        for byte in s.bytes() {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    pub fn write_line(&mut self, s: &str) -> Result<(), W::Error> {
        self.write_str(s)?;
        self.write_str("\r\n")
    }

    #[cfg(test)]
    pub(crate) fn inner(&self) -> &W {
        &self.tx
    }
}

impl<W: serial::Write<u8>> ufmt::uWrite for SerialConsole<W> {
    type Error = W::Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        SerialConsole::write_str(self, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::FakeSerial;

    #[test]
    fn write_line_waits_out_busy_transmitter() {
        let mut console = SerialConsole::new(FakeSerial::default());
        console.write_line("Ready").unwrap();
        assert_eq!(console.tx.text(), "Ready\r\n");
    }

    #[test]
    fn ufmt_formatting() {
        let mut console = SerialConsole::new(FakeSerial::default());
        ufmt::uwrite!(&mut console, "duty {}/{}", 64u8, 255u8).unwrap();
        assert_eq!(console.tx.text(), "duty 64/255");
    }
}
