// Hiring - place a new staff member into the entry-rank block of the
// staff worksheet.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::ledger::{LedgerOps, RowId};
use crate::notify::Notifier;
use crate::roster::{RosterError, RosterManager};

/// Where a new hire landed on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HirePlacement {
    /// No entry-rank rows existed; a fresh row was appended.
    Appended(RowId),
    /// An entry-rank row with a blank username slot was reused.
    ReusedRow(RowId),
    /// A new row was inserted directly below the last entry-rank row.
    InsertedAfter { anchor: RowId, row: RowId },
}

impl HirePlacement {
    pub fn row(&self) -> RowId {
        match self {
            HirePlacement::Appended(row) => *row,
            HirePlacement::ReusedRow(row) => *row,
            HirePlacement::InsertedAfter { row, .. } => *row,
        }
    }
}

impl<L: LedgerOps, N: Notifier> RosterManager<L, N> {
    /// Add a staff member at the entry rank.
    ///
    /// Entry-rank rows are grouped on the sheet; the first blank username
    /// slot is reused before a new row is inserted below the group. With no
    /// group at all, the row is appended at the bottom.
    pub async fn hire(
        &self,
        username: &str,
        plate: &str,
        today: DateTime<Utc>,
    ) -> Result<HirePlacement, RosterError> {
        let hire_date = today.format("%m/%d/%Y").to_string();
        let ranks = self.staff.column_values(self.columns.rank).await?;
        let entry = self.entry_rank.trim().to_lowercase();
        let rank_rows: Vec<RowId> = ranks
            .iter()
            .enumerate()
            .filter(|(_, value)| value.trim().to_lowercase() == entry)
            .map(|(index, _)| (index + 1) as RowId)
            .collect();

        let placement = match rank_rows.last() {
            None => {
                let row = self
                    .staff
                    .append_row(&self.build_staff_row(username, plate, &hire_date))
                    .await?;
                HirePlacement::Appended(row)
            }
            Some(&anchor) => {
                let mut open_slot = None;
                for &row in &rank_rows {
                    let slot = self.staff.read_field(row, self.columns.username).await?;
                    if slot.map_or(true, |value| value.trim().is_empty()) {
                        open_slot = Some(row);
                        break;
                    }
                }
                match open_slot {
                    Some(row) => {
                        self.fill_staff_row(row, false, username, plate, &hire_date)
                            .await?;
                        HirePlacement::ReusedRow(row)
                    }
                    None => {
                        let row = self.staff.insert_row_after(anchor).await?;
                        self.fill_staff_row(row, true, username, plate, &hire_date)
                            .await?;
                        HirePlacement::InsertedAfter { anchor, row }
                    }
                }
            }
        };

        info!(
            username,
            plate,
            rank = %self.entry_rank,
            row = placement.row(),
            "staff member hired"
        );
        Ok(placement)
    }

    fn build_staff_row(&self, username: &str, plate: &str, hire_date: &str) -> Vec<String> {
        let mut row = vec![String::new(); self.columns.row_width()];
        row[self.columns.rank as usize - 1] = self.entry_rank.clone();
        row[self.columns.username as usize - 1] = username.to_string();
        row[self.columns.plate as usize - 1] = plate.to_string();
        row[self.columns.hire_date as usize - 1] = hire_date.to_string();
        row[self.columns.minutes as usize - 1] = "0".to_string();
        row[self.columns.disciplinary as usize - 1] = "None".to_string();
        row
    }

    async fn fill_staff_row(
        &self,
        row: RowId,
        include_rank: bool,
        username: &str,
        plate: &str,
        hire_date: &str,
    ) -> Result<(), RosterError> {
        if include_rank {
            self.staff
                .write_field(row, self.columns.rank, &self.entry_rank)
                .await?;
        }
        self.staff
            .write_field(row, self.columns.username, username)
            .await?;
        self.staff.write_field(row, self.columns.plate, plate).await?;
        self.staff
            .write_field(row, self.columns.hire_date, hire_date)
            .await?;
        self.staff.write_field(row, self.columns.minutes, "0").await?;
        self.staff
            .write_field(row, self.columns.disciplinary, "None")
            .await?;
        Ok(())
    }
}
