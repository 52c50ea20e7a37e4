//! JSON input and report formats of the command-line tool.

pub mod cluster;
pub mod rank;
