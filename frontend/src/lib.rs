//! Shared pieces of the command-line frontends: schedule-file parsing and
//! port-dump formatting.

pub mod output;
pub mod schedule;
