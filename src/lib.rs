// lib.rs
pub mod aligner;
pub mod alignment;
pub mod commands;
pub mod duplicates;
pub mod error;
pub mod finalize;
pub mod insertions;
pub mod io;
pub mod merge;
pub mod notes;
pub mod reference;
pub mod sequence;
pub mod trim;
