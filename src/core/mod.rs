//! Core data types for synthetic alignment batches.
//!
//! - [`alignment`]: the record type and its builders
//! - [`flags`]: SAM flag bits
//! - [`cigar`]: read length and reference span of a CIGAR string
//! - [`bases`]: where aligned records get their bases from
//!
//! ## Record shapes
//!
//! | Kind       | Flags set by the builder | Placement | Bases              |
//! |------------|--------------------------|-----------|--------------------|
//! | Primary    | none                     | yes       | from a base source |
//! | Secondary  | 0x100                    | yes       | from a base source |
//! | Unaligned  | 0x4                      | no        | given explicitly   |
//!
//! A secondary built with a parent copies the parent's name, template bits
//! and mate position; the parent itself is never modified.

pub mod alignment;
pub mod bases;
pub mod cigar;
pub mod flags;
