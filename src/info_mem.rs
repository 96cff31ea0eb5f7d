//! Information Memory.
//! Four 128-byte flash segments (A to D) of non-volatile storage.
//!
//! Flash can only be erased a whole segment at a time, so every write rewrites the complete
//! segment: the current contents are saved, the segment is erased, and all 128 bytes are
//! programmed back with the caller's bytes substituted. Erasing and programming happen inside a
//! critical section.

use crate::hw_traits::cc430::{Fctl1, Fctl3, FlashRegs};

/// Size of one information memory segment in bytes
pub const SECTION_SIZE: usize = 128;

/// Information memory segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Segment A, `0x1980`
    A,
    /// Segment B, `0x1900`
    B,
    /// Segment C, `0x1880`
    C,
    /// Segment D, `0x1800`
    D,
}

impl Section {
    /// Start address of the segment
    #[inline]
    pub fn base(self) -> u16 {
        match self {
            Section::A => 0x1980,
            Section::B => 0x1900,
            Section::C => 0x1880,
            Section::D => 0x1800,
        }
    }
}

impl TryFrom<char> for Section {
    type Error = InfoMemError;

    fn try_from(tag: char) -> Result<Self, Self::Error> {
        match tag {
            'A' => Ok(Section::A),
            'B' => Ok(Section::B),
            'C' => Ok(Section::C),
            'D' => Ok(Section::D),
            other => Err(InfoMemError::UnknownSection(other)),
        }
    }
}

/// Information memory errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoMemError {
    /// `position + length` runs past the end of the segment
    OutOfRange {
        /// Requested start offset
        position: u8,
        /// Requested length
        length: usize,
    },
    /// Section tag is not one of `'A'..='D'`
    UnknownSection(char),
}

/// Byte offsets of the node configuration stored in information memory
pub mod offsets {
    /// Radio frequency channel, 1 byte
    pub const FREQ_CHANNEL: u8 = 0x00;
    /// Unused, 1 byte
    pub const NOT_USED: u8 = 0x01;
    /// Radio sync word, 2 bytes
    pub const SYNC_WORD: u8 = 0x02;
    /// Device address slot, 1 or 2 bytes
    pub const DEVICE_ADDR: u8 = 0x04;
    /// Transmit interval, 2 bytes
    pub const TX_INTERVAL: u8 = 0x06;
    /// First offset free for application data
    pub const FIRST_CUSTOM: u8 = 0x20;

    /// Offset of the 1-byte device address inside its slot
    #[cfg(feature = "swap_extended_address")]
    pub const DEVICE_ADDRESS: u8 = DEVICE_ADDR;
    /// Offset of the 1-byte device address inside its slot
    #[cfg(not(feature = "swap_extended_address"))]
    pub const DEVICE_ADDRESS: u8 = DEVICE_ADDR + 1;
}

/// Reads and rewrites the information memory segments.
pub struct InfoMemory<F: FlashRegs> {
    flash: F,
}

impl<F: FlashRegs> InfoMemory<F> {
    /// Take ownership of the flash controller
    #[inline]
    pub fn new(flash: F) -> Self {
        InfoMemory { flash }
    }

    /// Release the flash controller
    #[inline]
    pub fn free(self) -> F {
        self.flash
    }

    fn check_range(position: u8, length: usize) -> Result<(), InfoMemError> {
        if usize::from(position) + length > SECTION_SIZE {
            Err(InfoMemError::OutOfRange { position, length })
        } else {
            Ok(())
        }
    }

    /// Copy `buf.len()` bytes starting at `position` of `section` into `buf`.
    /// Returns the number of bytes read.
    pub fn read(
        &self,
        section: Section,
        position: u8,
        buf: &mut [u8],
    ) -> Result<usize, InfoMemError> {
        Self::check_range(position, buf.len())?;

        let start = section.base() + u16::from(position);
        for (addr, byte) in (start..).zip(buf.iter_mut()) {
            *byte = self.flash.read_byte(addr);
        }
        Ok(buf.len())
    }

    /// Store `data` at `position` of `section`, keeping the rest of the segment intact.
    /// Returns the number of bytes written. An empty `data` leaves the flash untouched.
    pub fn write(
        &mut self,
        section: Section,
        position: u8,
        data: &[u8],
    ) -> Result<usize, InfoMemError> {
        Self::check_range(position, data.len())?;
        if data.is_empty() {
            return Ok(0);
        }

        let base = section.base();
        let mut segment = [0u8; SECTION_SIZE];
        for (addr, byte) in (base..).zip(segment.iter_mut()) {
            *byte = self.flash.read_byte(addr);
        }
        let start = usize::from(position);
        segment[start..start + data.len()].copy_from_slice(data);

        let flash = &mut self.flash;
        critical_section::with(|_| {
            // Unlock, then a dummy write erases the whole segment
            flash.set_fctl3(Fctl3::empty());
            flash.set_fctl1(Fctl1::ERASE);
            flash.write_byte(base, 0);

            flash.set_fctl1(Fctl1::WRT);
            for (addr, byte) in (base..).zip(segment.iter()) {
                flash.write_byte(addr, *byte);
            }

            flash.set_fctl1(Fctl1::empty());
            flash.set_fctl3(Fctl3::LOCK);
        });

        Ok(data.len())
    }

    /// [`read`](Self::read) addressed by section letter
    pub fn read_tagged(&self, tag: char, position: u8, buf: &mut [u8]) -> Result<usize, InfoMemError> {
        self.read(Section::try_from(tag)?, position, buf)
    }

    /// [`write`](Self::write) addressed by section letter
    pub fn write_tagged(&mut self, tag: char, position: u8, data: &[u8]) -> Result<usize, InfoMemError> {
        self.write(Section::try_from(tag)?, position, data)
    }
}
