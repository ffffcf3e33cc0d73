//! Outer surfaces: the command line and a stdout-backed checkout view.

pub mod cli;
pub mod terminal;
