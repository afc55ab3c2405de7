//! File formats the harness reads and writes.
//!
//! - [`fasta`]: reference sequences supplying read bases
//! - [`sam`]: the SAM batch and alias configuration handed to the loader

pub mod fasta;
pub mod sam;
