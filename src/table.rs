//! Cluster performance table

use crate::data::ClusterSummaryRecord;

/// Displayed columns, in order. The cluster label is not shown.
pub const TABLE_COLUMNS: [&str; 6] = [
    "Strategic Name",
    "Recency_Mean",
    "Frequency_Mean",
    "Monetary_Mean",
    "Count",
    "Percentage",
];

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub strategic_name: String,
    pub recency_mean: f64,
    pub frequency_mean: f64,
    pub monetary_mean: f64,
    pub count: i64,
    pub percentage: f64,
}

impl TableRow {
    fn cells(&self) -> [String; 6] {
        [
            self.strategic_name.clone(),
            format!("{:.2}", self.recency_mean),
            format!("{:.2}", self.frequency_mean),
            format!("{:.2}", self.monetary_mean),
            self.count.to_string(),
            format!("{:.2}", self.percentage),
        ]
    }
}

/// Summary rows sorted by mean Monetary, highest first
pub fn performance_table(summary: &[ClusterSummaryRecord]) -> Vec<TableRow> {
    let mut rows: Vec<TableRow> = summary
        .iter()
        .map(|s| TableRow {
            strategic_name: s.strategic_name.clone(),
            recency_mean: s.recency_mean,
            frequency_mean: s.frequency_mean,
            monetary_mean: s.monetary_mean,
            count: s.count,
            percentage: s.percentage,
        })
        .collect();

    // Stable, so ties keep file order.
    rows.sort_by(|a, b| b.monetary_mean.total_cmp(&a.monetary_mean));
    rows
}

/// Render rows as a fixed-width text table
pub fn format_table(rows: &[TableRow]) -> String {
    let cells: Vec<[String; 6]> = rows.iter().map(TableRow::cells).collect();

    let mut widths: [usize; 6] = TABLE_COLUMNS.map(|c| c.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = TABLE_COLUMNS
        .iter()
        .zip(widths)
        .map(|(name, width)| pad(name, width, true))
        .collect();
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();

    let mut lines = vec![header.join(" | "), rule.join("-|-")];
    lines.extend(cells.iter().map(|row| {
        row.iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, width))| pad(cell, width, i == 0))
            .collect::<Vec<_>>()
            .join(" | ")
    }));

    lines.iter().map(|line| format!("  {}\n", line)).collect()
}

/// Pad by character count so names with emoji line up with plain text
fn pad(text: &str, width: usize, left_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(text.chars().count()));
    if left_align {
        format!("{}{}", text, fill)
    } else {
        format!("{}{}", fill, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, monetary: f64) -> ClusterSummaryRecord {
        ClusterSummaryRecord {
            cluster_label: 0,
            recency_mean: 10.0,
            frequency_mean: 2.0,
            monetary_mean: monetary,
            count: 5,
            percentage: 20.0,
            strategic_name: name.to_string(),
        }
    }

    #[test]
    fn test_sorted_by_monetary_descending() {
        let summary = vec![
            record("low", 100.0),
            record("high", 9000.0),
            record("mid", 1500.0),
            record("mid-tie", 1500.0),
        ];
        let rows = performance_table(&summary);

        for pair in rows.windows(2) {
            assert!(pair[0].monetary_mean >= pair[1].monetary_mean);
        }
        let names: Vec<&str> = rows.iter().map(|r| r.strategic_name.as_str()).collect();
        assert_eq!(names, vec!["high", "mid", "mid-tie", "low"]);
    }

    #[test]
    fn test_format_table_columns() {
        let rows = performance_table(&[record("Best", 8200.5)]);
        let text = format_table(&rows);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].trim_start().starts_with("Strategic Name"));
        assert!(lines[0].contains("Percentage"));
        assert!(!lines[0].contains("Cluster_Label"));
        assert!(lines[2].contains("8200.50"));
    }

    #[test]
    fn test_empty_table_has_header_only() {
        let text = format_table(&[]);
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_rows_are_aligned() {
        let rows = performance_table(&[record("0 - Best Customers 🏆", 8200.5), record("Cluster 7", 12.0)]);
        let text = format_table(&rows);

        let widths: Vec<usize> = text.lines().map(|l| l.chars().count()).collect();
        assert_eq!(widths.len(), 4);
        assert!(widths.iter().all(|&w| w == widths[0]));
        assert!(text.ends_with('\n'));
    }
}
