use chrono::NaiveDate;

/// Options for a single [`Report::process`](crate::Report::process) pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessConfig {
    /// The value of `system.date`. `None` uses today's local date.
    pub report_date: Option<NaiveDate>,
    /// Reset every calculation before the first row, so repeated passes over
    /// the same report do not carry aggregates over.
    pub reset_calculations: bool,
    /// Stop after this many rows.
    pub max_rows: Option<usize>,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            report_date: None,
            reset_calculations: true,
            max_rows: None,
        }
    }
}

impl ProcessConfig {
    pub fn with_report_date(mut self, date: NaiveDate) -> Self {
        self.report_date = Some(date);
        self
    }

    pub fn with_max_rows(mut self, rows: usize) -> Self {
        self.max_rows = Some(rows);
        self
    }

    /// Keeps calculation state from a previous pass.
    pub fn keep_calculations(mut self) -> Self {
        self.reset_calculations = false;
        self
    }

    pub(crate) fn date(&self) -> NaiveDate {
        self.report_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}
