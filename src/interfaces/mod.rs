//! File formats the dry-run tool reads and writes.

pub mod csv;
