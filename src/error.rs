//! Errors reported by the fallible table API.

use std::collections::TryReserveError;

use thiserror::Error;

/// Failure of a `try_*` table operation.
///
/// A missing key is never an error; lookups report it with `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The allocator could not provide memory for part of the table.
    #[error("failed to allocate {what}: {source}")]
    Allocation {
        /// The structure that was being allocated
        what: &'static str,
        /// The underlying reservation error
        #[source]
        source: TryReserveError,
    },
}
