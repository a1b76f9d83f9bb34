use crate::mmio::{
    MmioError,
    helpers::{WORD, cursor_offset},
};

/// A device that can be driven through a byte-stream handle.
///
/// Each stream call moves exactly one register. Drivers implement the
/// word accessors; [`StreamHandle`] owns the cursor and all offset checks.
pub trait StreamTarget {
    /// Size of the readable window in bytes.
    const SPAN: usize;
    /// Offsets at or past this bound are rejected for writes with
    /// `InvalidOffset`.
    const WRITABLE_END: usize = Self::SPAN;

    /// Fails with `DeviceGone` once the device has been detached.
    fn ensure_attached(&self) -> Result<(), MmioError>;

    /// Reads the register at an aligned, in-range `offset`.
    fn read_word(&self, offset: usize) -> Result<u32, MmioError>;

    /// Writes the register at an aligned offset below `WRITABLE_END`.
    fn write_word(&self, offset: usize, value: u32) -> Result<(), MmioError>;
}

/// Open byte-stream handle onto a device.
///
/// The cursor starts at 0 and advances by the number of bytes moved on
/// each successful call. Register values travel little-endian.
#[derive(Debug)]
pub struct StreamHandle<'a, T: StreamTarget> {
    target: &'a T,
    cursor: i64,
}

impl<'a, T: StreamTarget> StreamHandle<'a, T> {
    pub fn open(target: &'a T) -> Self {
        Self { target, cursor: 0 }
    }

    /// Current cursor position.
    pub fn position(&self) -> i64 {
        self.cursor
    }

    /// Moves the cursor to an absolute position.
    ///
    /// Any position is accepted here; invalid ones are reported by the next
    /// read or write.
    pub fn seek(&mut self, position: i64) -> i64 {
        self.cursor = position;
        self.cursor
    }

    /// Reads one register at the cursor into the front of `buf`.
    ///
    /// Returns `Ok(0)` at or past the end of the window.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, MmioError> {
        self.target.ensure_attached()?;
        let offset = cursor_offset(self.cursor)?;
        if offset >= T::SPAN {
            return Ok(0);
        }
        check_aligned(offset)?;

        let dest = buf.get_mut(..WORD).ok_or_else(|| {
            log::warn!("stream read: caller buffer shorter than a register");
            MmioError::TransferFailed
        })?;
        let value = self.target.read_word(offset)?;
        dest.copy_from_slice(&value.to_le_bytes());

        self.advance();
        Ok(WORD)
    }

    /// Writes the first four bytes of `buf` to the register at the cursor.
    ///
    /// Offsets past the window are `NotWritable`; offsets inside the window
    /// but at or past the writable bound are `InvalidOffset`.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize, MmioError> {
        self.target.ensure_attached()?;
        let offset = cursor_offset(self.cursor)?;
        if offset >= T::SPAN {
            return Err(MmioError::NotWritable);
        }
        if offset >= T::WRITABLE_END {
            return Err(MmioError::InvalidOffset);
        }
        check_aligned(offset)?;

        let src: [u8; WORD] = buf
            .get(..WORD)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| {
                log::warn!("stream write: nothing copied from caller");
                MmioError::TransferFailed
            })?;
        self.target.write_word(offset, u32::from_le_bytes(src))?;

        self.advance();
        Ok(WORD)
    }

    fn advance(&mut self) {
        self.cursor += WORD as i64;
    }
}

fn check_aligned(offset: usize) -> Result<(), MmioError> {
    if offset % WORD != 0 {
        log::warn!("stream access: unaligned offset {offset:#x}");
        return Err(MmioError::Unaligned);
    }
    Ok(())
}
