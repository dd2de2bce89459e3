//! Two-stage filter over the public company registry dumps.
//!
//! The establishment stage keeps active establishments whose primary CNAE is
//! in a fixed set and closes the set of their base identifiers; the company
//! stage keeps the companies owning those identifiers. Both stages stream
//! their inputs in bounded batches and write one `;`-delimited file each.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod telemetry;
