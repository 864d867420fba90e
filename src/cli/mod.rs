//! Command-line operations.
//!
//! - [`filter_records`]: Apply URL-encoded filter state to a record file
//!
//! Output formatting utilities are in [`output`].

pub mod filter_records;
pub mod output;
