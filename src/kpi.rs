//! Headline metrics shown above the strategy panel

use crate::catalog::SegmentCatalog;
use crate::data::Datasets;
use crate::error::{DashboardError, DashboardResult};
use std::collections::HashSet;

/// Scalar aggregates over the loaded tables
#[derive(Debug, Clone, PartialEq)]
pub struct Kpis {
    /// Distinct customer identifiers
    pub total_customers: usize,
    /// Sum of Monetary over every customer row, unrounded
    pub total_revenue: f64,
    /// Percentage column of the best-customers summary row
    pub best_segment_percentage: f64,
}

/// One labelled value card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
}

impl Kpis {
    pub fn cards(&self) -> [MetricCard; 3] {
        [
            MetricCard {
                label: "Total Customers (UK)",
                value: format_count(self.total_customers),
            },
            MetricCard {
                label: "Total Revenue",
                value: format!("£{}", format_amount(self.total_revenue)),
            },
            MetricCard {
                label: "Best Customers Segment Size",
                value: format!("{:.2}%", self.best_segment_percentage),
            },
        ]
    }
}

/// Compute the KPIs for a non-empty pair of tables
///
/// Fails with `MissingSegment` when no summary row carries the catalog's
/// best-segment name.
pub fn compute_kpis(datasets: &Datasets, catalog: &SegmentCatalog) -> DashboardResult<Kpis> {
    let total_customers = datasets
        .customers
        .iter()
        .map(|c| c.customer_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let total_revenue = datasets.customers.iter().map(|c| c.monetary).sum();

    let best_name = catalog.best_name();
    let best_segment_percentage = datasets
        .summary
        .iter()
        .find(|s| s.strategic_name == best_name)
        .map(|s| s.percentage)
        .ok_or(DashboardError::MissingSegment { name: best_name })?;

    Ok(Kpis {
        total_customers,
        total_revenue,
        best_segment_percentage,
    })
}

/// Integer with comma thousands separators, e.g. `4,338`
pub fn format_count(value: usize) -> String {
    group_thousands(&value.to_string())
}

/// Two-decimal amount with comma thousands separators, e.g. `8,911,407.90`
pub fn format_amount(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, group_thousands(whole), fraction)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ClusterSummaryRecord, CustomerSegmentRecord};

    fn customer(id: &str, monetary: f64, label: i64, catalog: &SegmentCatalog) -> CustomerSegmentRecord {
        CustomerSegmentRecord {
            customer_id: id.to_string(),
            recency: 10.0,
            frequency: 2.0,
            monetary,
            cluster_label: label,
            strategic_name: catalog.name_for(label),
        }
    }

    fn summary(label: i64, percentage: f64, catalog: &SegmentCatalog) -> ClusterSummaryRecord {
        ClusterSummaryRecord {
            cluster_label: label,
            recency_mean: 1.0,
            frequency_mean: 1.0,
            monetary_mean: 1.0,
            count: 1,
            percentage,
            strategic_name: catalog.name_for(label),
        }
    }

    #[test]
    fn test_compute_kpis() {
        let catalog = SegmentCatalog::default();
        let datasets = Datasets {
            customers: vec![
                customer("1", 100.25, 0, &catalog),
                customer("2", 50.50, 1, &catalog),
                customer("2", 10.00, 1, &catalog),
                customer("3", 0.25, 2, &catalog),
            ],
            summary: vec![
                summary(0, 40.0, &catalog),
                summary(1, 35.0, &catalog),
                summary(2, 25.0, &catalog),
            ],
        };

        let kpis = compute_kpis(&datasets, &catalog).unwrap();
        assert_eq!(kpis.total_customers, 3);
        assert!((kpis.total_revenue - 161.0).abs() < 1e-9);
        assert_eq!(kpis.best_segment_percentage, 40.0);
    }

    #[test]
    fn test_missing_best_segment() {
        let catalog = SegmentCatalog::default();
        let datasets = Datasets {
            customers: vec![customer("1", 1.0, 1, &catalog)],
            summary: vec![summary(1, 100.0, &catalog)],
        };

        let result = compute_kpis(&datasets, &catalog);
        assert!(matches!(result, Err(DashboardError::MissingSegment { .. })));
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(4338), "4,338");
        assert_eq!(format_count(1234567), "1,234,567");

        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(1234.5), "1,234.50");
        assert_eq!(format_amount(8911407.904), "8,911,407.90");
        assert_eq!(format_amount(-1500.0), "-1,500.00");
    }

    #[test]
    fn test_cards() {
        let kpis = Kpis {
            total_customers: 3920,
            total_revenue: 7308391.554,
            best_segment_percentage: 40.0,
        };
        let cards = kpis.cards();
        assert_eq!(cards[0].value, "3,920");
        assert_eq!(cards[1].value, "£7,308,391.55");
        assert_eq!(cards[2].value, "40.00%");
        assert_eq!(cards[2].label, "Best Customers Segment Size");
    }
}
