//! Terminal output for the rendered page

use serde::{Deserialize, Serialize};

use super::buffer::Row;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned plain-text columns
    #[default]
    Table,
    /// One JSON object per render
    Json,
}

/// Snapshot of a grid's visible page
#[derive(Debug, Clone, Serialize)]
pub struct PageView<'a> {
    pub grid: &'a str,
    pub offset: usize,
    pub total_rows: usize,
    pub rows: &'a [Row],
}

impl PageView<'_> {
    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => render_table(self),
            OutputFormat::Json => render_json(self),
        }
    }
}

fn display_cell(cell: &str) -> String {
    cell.replace("&nbsp;", " ")
}

pub fn render_table(view: &PageView<'_>) -> String {
    let cells: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| row.iter().map(|c| display_cell(c)).collect())
        .collect();

    let columns = cells.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let last = view.offset + view.rows.len();
    let mut out = format!(
        "{}: rows {}-{} of {}\n",
        view.grid,
        if view.rows.is_empty() { view.offset } else { view.offset + 1 },
        last,
        view.total_rows
    );
    let number_width = last.to_string().len();

    for (i, row) in cells.iter().enumerate() {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(col, cell)| format!("{:<width$}", cell, width = widths[col]))
            .collect();
        out.push_str(&format!(
            "{:>nw$} | {}\n",
            view.offset + i + 1,
            line.join(" | ").trim_end(),
            nw = number_width
        ));
    }
    out
}

pub fn render_json(view: &PageView<'_>) -> String {
    match serde_json::to_string(view) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!("Failed to serialize page: {}", e);
            String::new()
        }
    }
}
