//! SAM flag bits used by the record builders.
//!
//! The bitfield itself is the `noodles` [`Flags`] type, so any raw value
//! (including unusual combinations) can be carried through unchanged with
//! [`Flags::from_bits_retain`].

pub use noodles::sam::alignment::record::Flags;

/// "Next read unmapped" (0x8), the one bit scenarios OR onto a built record.
pub const NEXT_UNMAPPED: Flags = Flags::MATE_UNMAPPED;

/// Template bits a linked secondary alignment inherits from its parent.
pub const TEMPLATE_BITS: Flags = Flags::SEGMENTED
    .union(Flags::FIRST_SEGMENT)
    .union(Flags::LAST_SEGMENT);
