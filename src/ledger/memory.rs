// In-memory worksheet used by the test suites and for local development
// without spreadsheet credentials. Records every executed operation and
// supports queued failure injection per operation kind.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::ledger::errors::LedgerError;
use crate::ledger::traits::{LedgerOps, RowId};

/// Executed ledger operations, recorded in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerOp {
    ColumnValues { column: u32 },
    ReadField { row: RowId, column: u32 },
    WriteField { row: RowId, column: u32, value: String },
    AppendRow { values: Vec<String> },
    InsertRowAfter { row: RowId },
    DeleteRow { row: RowId },
}

impl LedgerOp {
    pub fn kind(&self) -> LedgerOpKind {
        match self {
            LedgerOp::ColumnValues { .. } => LedgerOpKind::ColumnValues,
            LedgerOp::ReadField { .. } => LedgerOpKind::ReadField,
            LedgerOp::WriteField { .. } => LedgerOpKind::WriteField,
            LedgerOp::AppendRow { .. } => LedgerOpKind::AppendRow,
            LedgerOp::InsertRowAfter { .. } => LedgerOpKind::InsertRowAfter,
            LedgerOp::DeleteRow { .. } => LedgerOpKind::DeleteRow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerOpKind {
    ColumnValues,
    ReadField,
    WriteField,
    AppendRow,
    InsertRowAfter,
    DeleteRow,
}

#[derive(Default)]
struct MemoryState {
    rows: Vec<Vec<String>>,
    executed: Vec<LedgerOp>,
    failures: HashMap<LedgerOpKind, Vec<LedgerError>>,
}

/// In-memory [`LedgerOps`] implementation.
#[derive(Default)]
pub struct InMemoryLedger {
    state: Mutex<MemoryState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the worksheet with rows; cell values are given left to right
    /// starting at column 1.
    pub fn with_rows(rows: Vec<Vec<&str>>) -> Self {
        let ledger = Self::new();
        {
            let mut state = ledger.lock();
            state.rows = rows
                .into_iter()
                .map(|row| row.into_iter().map(str::to_string).collect())
                .collect();
        }
        ledger
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Queue an error for the next execution of `kind`; queued errors pop
    /// in FIFO order before the operation touches the sheet.
    pub fn queue_failure(&self, kind: LedgerOpKind, error: LedgerError) {
        self.lock().failures.entry(kind).or_default().push(error);
    }

    pub fn executed(&self) -> Vec<LedgerOp> {
        self.lock().executed.clone()
    }

    pub fn executed_of(&self, kind: LedgerOpKind) -> Vec<LedgerOp> {
        self.lock()
            .executed
            .iter()
            .filter(|op| op.kind() == kind)
            .cloned()
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.lock().rows.len()
    }

    /// Current value of one cell, for assertions.
    pub fn cell(&self, row: RowId, column: u32) -> Option<String> {
        let state = self.lock();
        state
            .rows
            .get(row as usize - 1)
            .and_then(|cells| cells.get(column as usize - 1))
            .filter(|value| !value.is_empty())
            .cloned()
    }

    fn record(state: &mut MemoryState, op: LedgerOp) -> Result<(), LedgerError> {
        let kind = op.kind();
        state.executed.push(op);
        if let Some(queued) = state.failures.get_mut(&kind) {
            if !queued.is_empty() {
                return Err(queued.remove(0));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerOps for InMemoryLedger {
    async fn column_values(&self, column: u32) -> Result<Vec<String>, LedgerError> {
        let mut state = self.lock();
        Self::record(&mut state, LedgerOp::ColumnValues { column })?;
        Ok(state
            .rows
            .iter()
            .map(|cells| {
                cells
                    .get(column as usize - 1)
                    .cloned()
                    .unwrap_or_default()
            })
            .collect())
    }

    async fn read_field(&self, row: RowId, column: u32) -> Result<Option<String>, LedgerError> {
        let mut state = self.lock();
        Self::record(&mut state, LedgerOp::ReadField { row, column })?;
        Ok(state
            .rows
            .get(row as usize - 1)
            .and_then(|cells| cells.get(column as usize - 1))
            .filter(|value| !value.is_empty())
            .cloned())
    }

    async fn write_field(
        &self,
        row: RowId,
        column: u32,
        value: &str,
    ) -> Result<(), LedgerError> {
        let mut state = self.lock();
        Self::record(
            &mut state,
            LedgerOp::WriteField {
                row,
                column,
                value: value.to_string(),
            },
        )?;
        let cells = state
            .rows
            .get_mut(row as usize - 1)
            .ok_or(LedgerError::RowOutOfBounds { row })?;
        let index = column as usize - 1;
        if cells.len() <= index {
            cells.resize(index + 1, String::new());
        }
        cells[index] = value.to_string();
        Ok(())
    }

    async fn append_row(&self, values: &[String]) -> Result<RowId, LedgerError> {
        let mut state = self.lock();
        Self::record(
            &mut state,
            LedgerOp::AppendRow {
                values: values.to_vec(),
            },
        )?;
        state.rows.push(values.to_vec());
        Ok(state.rows.len() as RowId)
    }

    async fn insert_row_after(&self, row: RowId) -> Result<RowId, LedgerError> {
        let mut state = self.lock();
        Self::record(&mut state, LedgerOp::InsertRowAfter { row })?;
        if row as usize > state.rows.len() {
            return Err(LedgerError::RowOutOfBounds { row });
        }
        state.rows.insert(row as usize, Vec::new());
        Ok(row + 1)
    }

    async fn delete_row(&self, row: RowId) -> Result<(), LedgerError> {
        let mut state = self.lock();
        Self::record(&mut state, LedgerOp::DeleteRow { row })?;
        if row == 0 || row as usize > state.rows.len() {
            return Err(LedgerError::RowOutOfBounds { row });
        }
        state.rows.remove(row as usize - 1);
        Ok(())
    }
}
