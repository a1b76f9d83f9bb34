/// Errors produced while parsing attribute text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Input contained no digits.
    Empty,
    /// Input contained characters that are not valid for the detected base.
    Invalid,
    /// Value does not fit the target width.
    Overflow,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty input"),
            ParseError::Invalid => write!(f, "invalid numeric input"),
            ParseError::Overflow => write!(f, "value out of range"),
        }
    }
}

/// Errors that can occur while accessing a register window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmioError {
    /// Offset is negative or outside the permitted range.
    InvalidOffset,
    /// Offset is not a multiple of the register width.
    Unaligned,
    /// The caller-side buffer did not supply or accept a full transfer.
    TransferFailed,
    /// Target register or offset cannot be written.
    NotWritable,
    /// Target register or offset cannot be read.
    NotReadable,
    /// Attribute text could not be parsed.
    Parse(ParseError),
    /// No attribute with the requested name exists.
    UnknownAttribute,
    /// The device instance has been detached.
    DeviceGone,
}

impl From<ParseError> for MmioError {
    fn from(err: ParseError) -> Self {
        MmioError::Parse(err)
    }
}

impl core::fmt::Display for MmioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MmioError::InvalidOffset => write!(f, "offset outside the permitted range"),
            MmioError::Unaligned => write!(f, "unaligned register access"),
            MmioError::TransferFailed => write!(f, "caller buffer transfer failed"),
            MmioError::NotWritable => write!(f, "register is not writable"),
            MmioError::NotReadable => write!(f, "register is not readable"),
            MmioError::Parse(err) => write!(f, "parse error: {err}"),
            MmioError::UnknownAttribute => write!(f, "no such attribute"),
            MmioError::DeviceGone => write!(f, "device has been detached"),
        }
    }
}
