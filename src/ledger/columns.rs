use serde::{Deserialize, Serialize};

/// 1-based column layout of the staff worksheet.
///
/// The first two columns are decorative in the production sheet, so the
/// defaults start at column C.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaffColumns {
    /// Rank, e.g. "Baker"
    pub rank: u32,
    /// Display name used to locate a member's row
    pub username: u32,
    /// Workbench plate identifier
    pub plate: u32,
    /// Hire date, formatted %m/%d/%Y
    pub hire_date: u32,
    /// Accumulated approved duty minutes
    pub minutes: u32,
    /// Disciplinary status ladder
    pub disciplinary: u32,
}

impl Default for StaffColumns {
    fn default() -> Self {
        Self {
            rank: 3,
            username: 4,
            plate: 5,
            hire_date: 6,
            minutes: 7,
            disciplinary: 8,
        }
    }
}

impl StaffColumns {
    /// Width a freshly appended row needs to cover every configured column.
    pub fn row_width(&self) -> usize {
        [
            self.rank,
            self.username,
            self.plate,
            self.hire_date,
            self.minutes,
            self.disciplinary,
        ]
        .into_iter()
        .max()
        .unwrap_or(0) as usize
    }
}
