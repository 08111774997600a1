//! Row-count collaborators backing the `unique` and `exists` rules

mod memory;

pub use memory::MemoryStore;

use crate::core::error::StoreError;

/// Counting interface queried by the store-backed rules.
///
/// `count` answers how many rows of `table` hold `value` in `column`,
/// leaving out the row whose id equals `exclude_id` when one is given.
/// Calls block; the engine runs rule checks strictly in sequence. Any error
/// is propagated to the validate caller as a hard failure and is never
/// folded into a validation verdict.
pub trait RowCount: Send + Sync {
    /// Count rows of `table` where `column` equals `value`
    fn count(
        &self,
        table: &str,
        column: &str,
        value: &str,
        exclude_id: Option<&str>,
    ) -> Result<u64, StoreError>;
}
