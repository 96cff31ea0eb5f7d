//! Configuration EEPROM
//!
//! The CC430 boards have no EEPROM fitted. [`Eeprom`] keeps the interface so radio stacks can be
//! written against it: every read returns zero and every write is dropped. Persistent settings
//! belong in [`crate::info_mem`].

/// Byte addresses of the stored radio settings
pub mod addr {
    /// Frequency channel, 1 byte
    pub const FREQ_CHANNEL: u16 = 0x00;
    /// Unused, 1 byte
    pub const NOT_USED: u16 = 0x01;
    /// Sync word, 2 bytes
    pub const SYNC_WORD: u16 = 0x02;
    /// Device address, 1 byte
    pub const DEVICE_ADDR: u16 = 0x04;
    /// Transmit interval, 2 bytes
    pub const TX_INTERVAL: u16 = 0x05;
    /// First application defined address
    pub const FIRST_CUSTOM: u16 = 0x20;
}

/// Byte addressed non-volatile store
pub trait ByteStore {
    /// Read one byte
    fn read_byte(&mut self, address: u16) -> u8;

    /// Write one byte
    fn write_byte(&mut self, value: u8, address: u16);

    /// Fill `buf` from consecutive addresses starting at `address`
    fn read_segment(&mut self, buf: &mut [u8], address: u16) {
        for (a, byte) in (address..).zip(buf.iter_mut()) {
            *byte = self.read_byte(a);
        }
    }

    /// Write `data` to consecutive addresses starting at `address`
    fn write_segment(&mut self, data: &[u8], address: u16) {
        for (a, &byte) in (address..).zip(data) {
            self.write_byte(byte, a);
        }
    }

    /// Read a little-endian 16-bit value
    fn read_integer(&mut self, address: u16) -> u16 {
        let mut buf = [0; 2];
        self.read_segment(&mut buf, address);
        u16::from_le_bytes(buf)
    }

    /// Read a little-endian 32-bit value
    fn read_long(&mut self, address: u16) -> u32 {
        let mut buf = [0; 4];
        self.read_segment(&mut buf, address);
        u32::from_le_bytes(buf)
    }

    /// Write the low `size` bytes of `value`, least significant first
    fn write_integer(&mut self, value: u32, address: u16, size: u8) {
        let bytes = value.to_le_bytes();
        for (i, &byte) in bytes.iter().take(usize::from(size)).enumerate() {
            self.write_byte(byte, address.wrapping_add(i as u16));
        }
    }
}

/// Placeholder for the missing EEPROM
#[derive(Debug, Default, Clone, Copy)]
pub struct Eeprom;

impl ByteStore for Eeprom {
    #[inline]
    fn read_byte(&mut self, _address: u16) -> u8 {
        0
    }

    #[inline]
    fn write_byte(&mut self, _value: u8, _address: u16) {}

    #[inline]
    fn read_segment(&mut self, _buf: &mut [u8], _address: u16) {}

    #[inline]
    fn write_segment(&mut self, _data: &[u8], _address: u16) {}
}
