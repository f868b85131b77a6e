//! Statement table extraction.
//!
//! A statement page carries six tables: annual and quarterly income
//! statements, balance sheets and cash flow statements, alternating
//! annual/quarterly in that order.

use valuescore_primitives::{
    ExtractionError, FinancialRecord, LineItem, Period, PeriodIndex, StatementSnapshot,
    StatementTable,
};

const CONSOLIDATED: &str = "IFRS(연결)";
const SEPARATE: &str = "IFRS(개별)";

/// Line items read from one statement table.
#[derive(Debug, Clone, Copy)]
pub struct Section {
    /// Position of the table on the statement page.
    pub table: usize,
    /// Rows to read.
    pub items: &'static [LineItem],
    /// Keep only columns ending on the fiscal year-end month.
    pub fiscal_years_only: bool,
}

/// Sections merged into the quarterly snapshot.
pub const QUARTERLY_SECTIONS: [Section; 3] = [
    Section {
        table: 1,
        items: &[LineItem::Revenue, LineItem::OperatingProfit, LineItem::NetProfit],
        fiscal_years_only: false,
    },
    Section {
        table: 3,
        items: &[
            LineItem::Assets,
            LineItem::Liabilities,
            LineItem::Equity,
            LineItem::CurrentAssets,
            LineItem::CurrentLiabilities,
        ],
        fiscal_years_only: false,
    },
    Section { table: 5, items: &[LineItem::InvestingCashFlow], fiscal_years_only: false },
];

/// Sections merged into the annual snapshot.
pub const ANNUAL_SECTIONS: [Section; 2] = [
    Section {
        table: 0,
        items: &[LineItem::OperatingProfit, LineItem::NetProfit],
        fiscal_years_only: true,
    },
    Section {
        table: 2,
        items: &[LineItem::Liabilities, LineItem::Equity],
        fiscal_years_only: true,
    },
];

/// Extract the quarterly and annual snapshots of one ticker.
///
/// # Errors
/// Fails if a table is missing, has an unexpected heading or no period
/// columns, repeats a period, or lacks one of the section's rows.
pub fn extract_snapshots(tables: &[StatementTable]) -> Result<FinancialRecord, ExtractionError> {
    Ok(FinancialRecord {
        quarterly: extract_sections(tables, &QUARTERLY_SECTIONS)?,
        annual: extract_sections(tables, &ANNUAL_SECTIONS)?,
    })
}

fn extract_sections(
    tables: &[StatementTable],
    sections: &[Section],
) -> Result<StatementSnapshot, ExtractionError> {
    let mut snapshot = StatementSnapshot::default();
    for section in sections {
        snapshot.merge(extract_section(tables, section)?);
    }
    Ok(snapshot)
}

fn extract_section(
    tables: &[StatementTable],
    section: &Section,
) -> Result<StatementSnapshot, ExtractionError> {
    let table = tables.get(section.table).ok_or(ExtractionError::MissingTable(section.table))?;

    match table.label_heading() {
        Some(CONSOLIDATED | SEPARATE) => {}
        other => return Err(ExtractionError::UnknownHeading(other.unwrap_or_default().to_string())),
    }

    let mut columns = table.period_columns();
    if columns.is_empty() {
        return Err(ExtractionError::NoPeriods(section.table));
    }
    // align cell order with the sorted period index
    columns.sort_by_key(|(_, period)| *period);
    if section.fiscal_years_only {
        // annual tables end with a year-to-date column on another month
        if let Some(month) = fiscal_month(&columns) {
            columns.retain(|(_, period)| period.month() == month);
        }
    }
    let periods = PeriodIndex::new(columns.iter().map(|(_, period)| *period).collect())?;

    let mut snapshot = StatementSnapshot::new(periods);
    for item in section.items {
        let row = table.row(item.label()).ok_or(ExtractionError::MissingItem(*item))?;
        let values = columns.iter().map(|(cell, _)| row.cells.get(*cell).copied().flatten()).collect();
        snapshot.insert(*item, values)?;
    }
    Ok(snapshot)
}

/// Most frequent period-end month of the columns, the oldest on ties.
fn fiscal_month(columns: &[(usize, Period)]) -> Option<u32> {
    columns
        .iter()
        .rev()
        .map(|(_, period)| period.month())
        .max_by_key(|month| columns.iter().filter(|(_, p)| p.month() == *month).count())
}
