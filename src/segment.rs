//! Where a segment slot lives, as something the emitter can load or store.

use crate::ast::Segment;

pub const TEMP_BASE: u16 = 5;
pub const POINTER_BASE: u16 = 3;

/// Addressing recipe for one (segment, index) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    /// Not memory backed; the value itself.
    Immediate(u16),
    /// A fixed RAM address.
    Direct(u16),
    /// A per-unit symbol the assembler allocates.
    Static(String),
    /// Base register holding an address, plus an offset.
    Indirect { base: &'static str, offset: u16 },
}

/// Base registers in the order a call frame saves them.
pub const FRAME_REGISTERS: [&str; 4] = ["LCL", "ARG", "THIS", "THAT"];

pub fn static_symbol(file_name: &str, index: u16) -> String {
    format!("{}.{}", file_name, index)
}

pub fn resolve(segment: Segment, index: u16, file_name: &str) -> Address {
    let indirect = |base| Address::Indirect { base, offset: index };
    match segment {
        Segment::Constant => Address::Immediate(index),
        Segment::Temp => Address::Direct(TEMP_BASE.saturating_add(index)),
        Segment::Pointer => Address::Direct(POINTER_BASE.saturating_add(index)),
        Segment::Static => Address::Static(static_symbol(file_name, index)),
        Segment::Local => indirect("LCL"),
        Segment::Argument => indirect("ARG"),
        Segment::This => indirect("THIS"),
        Segment::That => indirect("THAT"),
    }
}
