//! CLI subcommand implementations for the prospector binary.

pub mod doctor;
pub mod output;
pub mod scan_cmd;
