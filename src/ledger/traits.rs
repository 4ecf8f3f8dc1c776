use async_trait::async_trait;
use std::sync::Arc;

use crate::ledger::errors::LedgerError;

/// 1-based row index into a worksheet.
pub type RowId = u32;

/// Operations the core needs from a row-oriented ledger worksheet.
///
/// Implementations wrap whatever spreadsheet API the host process talks to;
/// the core only sees rows, cells, and the error taxonomy in
/// [`LedgerError`]. Every operation may fail transiently with
/// [`LedgerError::RateLimited`]; callers are expected to go through
/// [`RetryingLedger`](crate::ledger::RetryingLedger) rather than hitting an
/// implementation directly.
#[async_trait]
pub trait LedgerOps: Send + Sync {
    /// All values of one column, top to bottom. Missing cells come back as
    /// empty strings so row indices stay aligned.
    async fn column_values(&self, column: u32) -> Result<Vec<String>, LedgerError>;

    /// A single cell, `None` when the cell is empty or the row is shorter
    /// than `column`.
    async fn read_field(&self, row: RowId, column: u32) -> Result<Option<String>, LedgerError>;

    /// Overwrite a single cell.
    async fn write_field(&self, row: RowId, column: u32, value: &str)
        -> Result<(), LedgerError>;

    /// Append a row after the last one, returning its index.
    async fn append_row(&self, values: &[String]) -> Result<RowId, LedgerError>;

    /// Insert an empty row directly below `row`, returning the new row's
    /// index. The collaborator carries formatting over from the row above.
    async fn insert_row_after(&self, row: RowId) -> Result<RowId, LedgerError>;

    /// Remove a row entirely; rows below shift up.
    async fn delete_row(&self, row: RowId) -> Result<(), LedgerError>;

    /// First row whose `column` value equals `name`, compared trimmed and
    /// case-insensitively. Duplicate names resolve to the first match; the
    /// sheet does not guarantee uniqueness and neither do we.
    async fn find_row_by_name(
        &self,
        column: u32,
        name: &str,
    ) -> Result<Option<RowId>, LedgerError> {
        let target = name.trim().to_lowercase();
        let values = self.column_values(column).await?;
        Ok(values
            .iter()
            .position(|value| {
                let value = value.trim();
                !value.is_empty() && value.to_lowercase() == target
            })
            .map(|index| (index + 1) as RowId))
    }
}

#[async_trait]
impl<T: LedgerOps + ?Sized> LedgerOps for Arc<T> {
    async fn column_values(&self, column: u32) -> Result<Vec<String>, LedgerError> {
        (**self).column_values(column).await
    }

    async fn read_field(&self, row: RowId, column: u32) -> Result<Option<String>, LedgerError> {
        (**self).read_field(row, column).await
    }

    async fn write_field(
        &self,
        row: RowId,
        column: u32,
        value: &str,
    ) -> Result<(), LedgerError> {
        (**self).write_field(row, column, value).await
    }

    async fn append_row(&self, values: &[String]) -> Result<RowId, LedgerError> {
        (**self).append_row(values).await
    }

    async fn insert_row_after(&self, row: RowId) -> Result<RowId, LedgerError> {
        (**self).insert_row_after(row).await
    }

    async fn delete_row(&self, row: RowId) -> Result<(), LedgerError> {
        (**self).delete_row(row).await
    }

    async fn find_row_by_name(
        &self,
        column: u32,
        name: &str,
    ) -> Result<Option<RowId>, LedgerError> {
        (**self).find_row_by_name(column, name).await
    }
}
