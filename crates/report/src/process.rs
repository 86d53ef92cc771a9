//! The pagination loop.
//!
//! A single pass over the main data source moves a vertical cursor down the
//! page: title once, a header at the top of every page, one body band per
//! row and finally the summary. A body band that would cross the top of the
//! footer closes the page with a footer first. The last page gets its footer
//! after the final row unless that row is the one that broke the page.

use crate::calculation::ResetScope;
use crate::config::ProcessConfig;
use crate::error::ReportError;
use crate::report::{Band, Report};
use banded_expr::{Environment, SystemInfo, Value};
use banded_layout::pagination::rows_per_page;
use banded_layout::{check_band_fit, ensure_body_fits, summary_fits};
use banded_render_core::{Renderer, paint};
use banded_source::DataSource;

/// Totals of a finished pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: u32,
    pub rows: usize,
}

/// Mutable state of one pass. Created fresh by every `process` call.
#[derive(Debug)]
struct PaginationState {
    page: u32,
    cursor: f32,
    rows: usize,
    row: Option<Value>,
    footer_drawn: bool,
    reset_page_calculations: bool,
    system: SystemInfo,
}

impl PaginationState {
    fn new(config: &ProcessConfig) -> Self {
        Self {
            page: 0,
            cursor: 0.0,
            rows: 0,
            row: None,
            footer_drawn: false,
            reset_page_calculations: false,
            system: SystemInfo::new(0, config.date()),
        }
    }
}

impl Report {
    /// Lays the report out over the rows of `source` and drives `renderer`.
    ///
    /// `source` must already be running. Fails with
    /// [`ReportError::NoData`] if it yields no rows, before anything is
    /// drawn.
    pub fn process<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        source: &mut dyn DataSource,
        config: &ProcessConfig,
    ) -> Result<RunSummary, ReportError> {
        let page_height = self.page.height();
        let header_height = self.band_height(Band::Header);
        let body_height = self.band_height(Band::Body);
        let footer_height = self.band_height(Band::Footer);
        let footer_top = page_height - footer_height;

        ensure_body_fits(
            Band::Body.name(),
            body_height,
            page_height,
            header_height,
            footer_height,
        )?;
        if !self.groups.is_empty() {
            log::warn!(
                "Report declares {} group(s); group bands are not printed",
                self.groups.len()
            );
        }
        if !self.page.margins.is_zero() {
            log::warn!("Page margins are not applied by pagination");
        }
        if config.reset_calculations {
            self.reset_calculations();
        }
        if let Some(rows) = rows_per_page(page_height, header_height, footer_height, body_height) {
            log::debug!("Up to {} body row(s) per page", rows);
        }

        let mut state = PaginationState::new(config);
        let Some(first) = source.next()? else {
            return Err(ReportError::NoData);
        };
        log::info!(
            "Processing report: page {}x{}mm, {} calculation(s){}",
            self.page.width(),
            page_height,
            self.calculations.len(),
            source
                .size_hint()
                .map(|n| format!(", {} row(s) expected", n))
                .unwrap_or_default()
        );

        // First page: title once, then the page header below it.
        self.open_page(renderer, &mut state)?;
        state.cursor = self.tree.position(self.section(Band::Title)).y;
        self.draw_band(Band::Title, state.cursor, renderer, &state)?;
        state.cursor += self.band_height(Band::Title);
        let mut pending = Some(Value::from(first));
        state.row = pending.clone();
        self.draw_band(Band::Header, state.cursor, renderer, &state)?;
        state.cursor += header_height;

        while let Some(row) = pending.take() {
            state.rows += 1;
            state.row = Some(row);
            // Only an overflow on the last row leaves this set.
            state.footer_drawn = false;
            log::trace!("Row {} at y={:.2}", state.rows, state.cursor);

            let fit = check_band_fit(state.cursor, body_height, footer_top);
            if fit.should_break {
                log::debug!(
                    "Page {} full with {:.2}mm left above the footer",
                    state.page,
                    fit.remaining_height
                );
                self.draw_band(Band::Footer, footer_top, renderer, &state)?;
                state.footer_drawn = true;
                self.close_page(renderer, &state)?;

                self.open_page(renderer, &mut state)?;
                state.cursor = 0.0;
                self.draw_band(Band::Header, state.cursor, renderer, &state)?;
                state.cursor += header_height;
                state.reset_page_calculations = true;
            }

            self.draw_band(Band::Body, state.cursor, renderer, &state)?;
            state.cursor += body_height;

            if state.reset_page_calculations {
                state.reset_page_calculations = false;
                self.reset_page_scoped();
            }
            self.run_calculations(renderer, &state)?;

            if config.max_rows.is_some_and(|max| state.rows >= max) {
                log::warn!("Stopping after {} rows (max_rows)", state.rows);
                break;
            }
            // The last row stays bound for the footer and summary.
            pending = source.next()?.map(Value::from);
        }

        if !state.footer_drawn {
            self.draw_band(Band::Footer, footer_top, renderer, &state)?;
        }

        let summary_height = self.band_height(Band::Summary);
        if summary_fits(state.cursor, summary_height, footer_top) {
            self.draw_band(Band::Summary, state.cursor, renderer, &state)?;
            self.close_page(renderer, &state)?;
        } else {
            log::debug!("Summary does not fit on page {}; moving it to a new page", state.page);
            self.close_page(renderer, &state)?;
            self.open_page(renderer, &mut state)?;
            self.draw_band(Band::Summary, 0.0, renderer, &state)?;
            self.close_page(renderer, &state)?;
        }

        log::info!(
            "Report finished: {} page(s), {} row(s)",
            state.page,
            state.rows
        );
        Ok(RunSummary {
            pages: state.page,
            rows: state.rows,
        })
    }

    fn open_page<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        state: &mut PaginationState,
    ) -> Result<(), ReportError> {
        renderer.start_page()?;
        state.page += 1;
        state.system.page = state.page;
        log::debug!("Opened page {}", state.page);
        Ok(())
    }

    fn close_page<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        state: &PaginationState,
    ) -> Result<(), ReportError> {
        renderer.finalize_page()?;
        log::debug!("Closed page {} at y={:.2}", state.page, state.cursor);
        Ok(())
    }

    /// Moves a band to `y` and draws it with the current row bound.
    fn draw_band<R: Renderer + ?Sized>(
        &mut self,
        band: Band,
        y: f32,
        renderer: &mut R,
        state: &PaginationState,
    ) -> Result<(), ReportError> {
        let section = self.section(band);
        self.tree.set_y(section, y)?;
        let env = Environment::new(state.system, &self.variables, &self.parameters)
            .with_row(state.row.as_ref());
        paint(&self.tree, section, &self.fonts, renderer, &env)?;
        Ok(())
    }

    fn reset_page_scoped(&mut self) {
        let mut reset = 0;
        for calculation in &mut self.calculations {
            if calculation.reset_scope() == ResetScope::Page {
                calculation.reset();
                reset += 1;
            }
        }
        if reset > 0 {
            log::debug!("Reset {} page-scoped calculation(s)", reset);
        }
    }

    /// Runs every calculation in registration order. Each one sees the
    /// values published by the ones before it.
    fn run_calculations<R: Renderer + ?Sized>(
        &mut self,
        renderer: &R,
        state: &PaginationState,
    ) -> Result<(), ReportError> {
        for index in 0..self.calculations.len() {
            let published = {
                let env = Environment::new(state.system, &self.variables, &self.parameters)
                    .with_row(state.row.as_ref());
                self.calculations[index].execute(renderer, &env)?
            };
            let name = self.calculations[index].variable();
            if let Some(variable) = self.variables.get_mut(name) {
                variable.set_value(published);
            }
        }
        Ok(())
    }
}
