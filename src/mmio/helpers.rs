//! Offset validation shared by windows, stream handles and policies.
//!
//! Every register access is checked here before it reaches a bus. The
//! checks are pure: they never touch hardware, so a rejected access has
//! no side effects.

use crate::mmio::MmioError;

/// Width of a single register in bytes.
pub const WORD: usize = 4;

/// Validates a byte offset into a window of `SPAN` bytes.
///
/// The range check runs before the alignment check, matching the order in
/// which the drivers report failures.
///
/// # Errors
/// * [`MmioError::InvalidOffset`] - if `offset >= SPAN`
/// * [`MmioError::Unaligned`] - if `offset` is not a multiple of [`WORD`]
///
/// # Example
/// ```
/// use fpga_mmio::mmio::{MmioError, helpers::check_offset};
///
/// assert_eq!(check_offset::<16>(0xC), Ok(3));
/// assert_eq!(check_offset::<16>(0x10), Err(MmioError::InvalidOffset));
/// assert_eq!(check_offset::<16>(0x2), Err(MmioError::Unaligned));
/// ```
pub fn check_offset<const SPAN: usize>(offset: usize) -> Result<usize, MmioError> {
    if offset >= SPAN {
        return Err(MmioError::InvalidOffset);
    }
    if offset % WORD != 0 {
        return Err(MmioError::Unaligned);
    }
    Ok(offset / WORD)
}

/// Converts a signed stream cursor into a byte offset.
///
/// Returns [`MmioError::InvalidOffset`] for negative cursors. Cursors too
/// large for `usize` saturate, so they land on the past-end path of every
/// window instead of failing.
pub fn cursor_offset(cursor: i64) -> Result<usize, MmioError> {
    if cursor < 0 {
        return Err(MmioError::InvalidOffset);
    }
    Ok(usize::try_from(cursor).unwrap_or(usize::MAX))
}

/// Returns true if `span` is a usable window size: non-empty and a whole
/// number of registers.
pub const fn is_valid_span(span: usize) -> bool {
    span != 0 && span % WORD == 0
}

#[test]
fn check_offset_edge_cases() {
    // First and last register
    assert_eq!(check_offset::<32>(0), Ok(0));
    assert_eq!(check_offset::<32>(28), Ok(7));

    // One past the end, and far past the end
    assert_eq!(check_offset::<32>(32), Err(MmioError::InvalidOffset));
    assert_eq!(check_offset::<32>(usize::MAX), Err(MmioError::InvalidOffset));

    // Range is reported before alignment
    assert_eq!(check_offset::<32>(33), Err(MmioError::InvalidOffset));

    // Every misalignment inside the window
    for offset in [1, 2, 3, 5, 31] {
        assert_eq!(check_offset::<32>(offset), Err(MmioError::Unaligned));
    }
}

#[test]
fn cursor_offset_rejects_negative() {
    assert_eq!(cursor_offset(-1), Err(MmioError::InvalidOffset));
    assert_eq!(cursor_offset(i64::MIN), Err(MmioError::InvalidOffset));
    assert_eq!(cursor_offset(0), Ok(0));
    assert_eq!(cursor_offset(12), Ok(12));
}

#[test]
fn huge_cursor_is_past_end_not_invalid() {
    // Above u32::MAX, which does not fit usize on 32-bit targets
    let offset = cursor_offset(i64::from(u32::MAX) + 4).unwrap();
    assert!(offset > u32::MAX as usize || offset == usize::MAX);
    assert_eq!(check_offset::<32>(offset), Err(MmioError::InvalidOffset));

    let offset = cursor_offset(i64::MAX).unwrap();
    assert_eq!(check_offset::<32>(offset), Err(MmioError::InvalidOffset));
}

#[test]
fn span_validity() {
    assert!(is_valid_span(4));
    assert!(is_valid_span(32));
    assert!(!is_valid_span(0));
    assert!(!is_valid_span(6));
}
