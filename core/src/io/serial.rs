//! Serial port stub (§4.9). A real second Game Boy is never modeled: writes to `SC`
//! that trigger a transfer are assumed to complete immediately, and the transmitted
//! byte is appended to an outbound buffer the host/tests can inspect. This is how the
//! blargg test ROMs report pass/fail, one ASCII character at a time.

#[derive(Debug, Default, Clone)]
pub struct Serial {
    /// `SB`, `FF01`. The one-byte transmit/receive latch.
    pub data: u8,
    /// `SC`, `FF02`. Bit 7 starts a transfer, bit 0 selects the (unmodeled) clock source.
    pub control: u8,
    buffer: Vec<u8>,
}

impl Serial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_byte(&mut self, byte: u8) {
        self.buffer.push(byte);
    }

    /// The bytes transmitted so far, decoded lossily as ASCII. Used by test harnesses
    /// to scan for the blargg ROMs' `"Passed"`/`"Failed"` markers.
    pub fn as_string(&self) -> String {
        String::from_utf8_lossy(&self.buffer).into_owned()
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushed_bytes_decode_as_string() {
        let mut serial = Serial::new();
        for b in b"Passed" {
            serial.push_byte(*b);
        }
        assert_eq!(serial.as_string(), "Passed");
    }
}
