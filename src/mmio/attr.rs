use crate::mmio::{
    MmioError, Register,
    text::{AttrText, format_decimal, parse_bool, parse_u8, parse_u32},
};

/// Text representation accepted by an attribute's `store`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    U32,
    U8,
    Bool,
}

impl ValueFormat {
    /// Parses `text` according to this format.
    pub fn parse(self, text: &str) -> Result<u32, MmioError> {
        let value = match self {
            ValueFormat::U32 => parse_u32(text)?,
            ValueFormat::U8 => u32::from(parse_u8(text)?),
            ValueFormat::Bool => u32::from(parse_bool(text)?),
        };
        Ok(value)
    }
}

/// Where an attribute's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    /// Mirrors one register; access follows the register's direction.
    Register(Register, ValueFormat),
    /// Software copy of a register the hardware cannot read back.
    Shadow(Register, ValueFormat),
    /// Write-only trigger: any store writes 1 to the register.
    Trigger(Register),
    /// Informational constant, never touches the window.
    Constant(u32),
}

/// A named property of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttrKind,
}

impl Attribute {
    pub const fn register(reg: Register, format: ValueFormat) -> Self {
        Self {
            name: reg.name,
            kind: AttrKind::Register(reg, format),
        }
    }

    pub const fn shadow(reg: Register, format: ValueFormat) -> Self {
        Self {
            name: reg.name,
            kind: AttrKind::Shadow(reg, format),
        }
    }

    pub const fn trigger(reg: Register) -> Self {
        Self {
            name: reg.name,
            kind: AttrKind::Trigger(reg),
        }
    }

    pub const fn constant(name: &'static str, value: u32) -> Self {
        Self {
            name,
            kind: AttrKind::Constant(value),
        }
    }
}

/// A device exposing a fixed set of named attributes.
///
/// Drivers supply the table and the register accessors; `show` and
/// `store` are provided.
pub trait AttributeTarget {
    /// The device's attribute set.
    fn attributes(&self) -> &'static [Attribute];

    /// Fails with `DeviceGone` once the device has been detached.
    fn ensure_attached(&self) -> Result<(), MmioError>;

    /// Reads a register for display.
    fn read_register(&self, reg: Register) -> Result<u32, MmioError>;

    /// Writes a register under the device guard.
    fn write_register(&self, reg: Register, value: u32) -> Result<(), MmioError>;

    /// Returns the software copy of a write-only register.
    fn read_shadow(&self, _reg: Register) -> Result<u32, MmioError> {
        Err(MmioError::NotReadable)
    }

    /// Writes a write-only register and its software copy under the same
    /// guard.
    fn write_shadow(&self, _reg: Register, _value: u32) -> Result<(), MmioError> {
        Err(MmioError::NotWritable)
    }

    /// Looks up an attribute by name.
    fn attribute(&self, name: &str) -> Result<Attribute, MmioError> {
        self.attributes()
            .iter()
            .find(|attr| attr.name == name)
            .copied()
            .ok_or(MmioError::UnknownAttribute)
    }

    /// Renders the attribute's current value as decimal text.
    fn show(&self, name: &str) -> Result<AttrText, MmioError> {
        self.ensure_attached()?;
        let value = match self.attribute(name)?.kind {
            AttrKind::Register(reg, _) => self.read_register(reg)?,
            AttrKind::Shadow(reg, _) => self.read_shadow(reg)?,
            AttrKind::Trigger(_) => return Err(MmioError::NotReadable),
            AttrKind::Constant(value) => value,
        };
        Ok(format_decimal(value))
    }

    /// Parses `text` and writes it to the attribute.
    ///
    /// Returns the number of bytes consumed (all of `text`). A parse error
    /// is returned unchanged and nothing is written.
    fn store(&self, name: &str, text: &str) -> Result<usize, MmioError> {
        self.ensure_attached()?;
        match self.attribute(name)?.kind {
            AttrKind::Register(reg, format) => {
                if !reg.access.writable() {
                    return Err(MmioError::NotWritable);
                }
                let value = format.parse(text)?;
                self.write_register(reg, value)?;
            }
            AttrKind::Shadow(reg, format) => {
                let value = format.parse(text)?;
                self.write_shadow(reg, value)?;
            }
            AttrKind::Trigger(reg) => self.write_register(reg, 1)?,
            AttrKind::Constant(_) => return Err(MmioError::NotWritable),
        }
        Ok(text.len())
    }
}
