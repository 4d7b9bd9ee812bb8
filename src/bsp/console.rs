use embedded_hal::serial;

use crate::Error;

/// Blocking text console on top of a serial transmitter
///
/// Line feeds are expanded to CR+LF for terminal emulators.
pub struct SerialConsole<W> {
    tx: W,
}

impl<W: serial::Write<u8>> SerialConsole<W> {
    pub fn new(tx: W) -> Self {
        Self { tx }
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        nb::block!(self.tx.write(byte)).map_err(|_| Error::Console)
    }
}

impl<W: serial::Write<u8>> ufmt::uWrite for SerialConsole<W> {
    type Error = Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.write_byte(b'\r')?;
            }
            self.write_byte(byte)?;
        }
        nb::block!(self.tx.flush()).map_err(|_| Error::Console)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;
    use ufmt::uWrite;

    #[derive(Default)]
    struct Tx {
        data: Vec<u8>,
        busy: usize,
        broken: bool,
    }

    impl serial::Write<u8> for Tx {
        type Error = ();

        fn write(&mut self, word: u8) -> nb::Result<(), ()> {
            if self.broken {
                return Err(nb::Error::Other(()));
            }
            // Report busy every other call to exercise blocking
            self.busy += 1;
            if self.busy % 2 == 1 {
                return Err(nb::Error::WouldBlock);
            }
            self.data.push(word);
            Ok(())
        }

        fn flush(&mut self) -> nb::Result<(), ()> {
            Ok(())
        }
    }

    #[test]
    fn expands_newlines() {
        let mut console = SerialConsole::new(Tx::default());
        console.write_str("Round 1\n").unwrap();
        assert_eq!(console.tx.data, b"Round 1\r\n");
    }

    #[test]
    fn uwrite_macro() {
        let mut console = SerialConsole::new(Tx::default());
        ufmt::uwrite!(console, "{} ms", 500u32).unwrap();
        assert_eq!(console.tx.data, b"500 ms");
    }

    #[test]
    fn write_error() {
        let mut console = SerialConsole::new(Tx { broken: true, ..Default::default() });
        assert_eq!(console.write_str("x"), Err(Error::Console));
    }
}
