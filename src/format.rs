//! KPI Display Formats
//! Currency, percentage and grouped-integer text for the metric widgets.

use crate::stats::Kpis;

/// Display format attached to each KPI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KpiFormat {
    /// `$1,234.56`
    Currency,
    /// `12.50%`
    Percent,
    /// `1,234`
    Count,
}

impl KpiFormat {
    /// Render a value; NaN and infinities render as `N/A`.
    pub fn render(self, value: f64) -> String {
        if !value.is_finite() {
            return "N/A".to_string();
        }
        match self {
            KpiFormat::Currency => {
                let sign = if value < 0.0 { "-" } else { "" };
                format!("{sign}${}", group_thousands(&format!("{:.2}", value.abs())))
            }
            KpiFormat::Percent => format!("{value:.2}%"),
            KpiFormat::Count => {
                let sign = if value < 0.0 { "-" } else { "" };
                format!("{sign}{}", group_thousands(&format!("{:.0}", value.abs().trunc())))
            }
        }
    }
}

/// One labelled metric widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: &'static str,
    pub value: f64,
    pub format: KpiFormat,
}

impl Metric {
    pub fn text(&self) -> String {
        self.format.render(self.value)
    }
}

impl Kpis {
    /// The four headline widgets in display order.
    pub fn metrics(&self) -> [Metric; 4] {
        [
            Metric {
                label: "Total Profit",
                value: self.total_profit,
                format: KpiFormat::Currency,
            },
            Metric {
                label: "Average Profit Margin",
                value: self.average_profit_margin,
                format: KpiFormat::Percent,
            },
            Metric {
                label: "Total Revenue",
                value: self.total_revenue,
                format: KpiFormat::Currency,
            },
            Metric {
                label: "Total Customers",
                value: self.total_customers as f64,
                format: KpiFormat::Count,
            },
        ]
    }
}

/// Insert `,` every three digits of the integer part of an unsigned number.
fn group_thousands(digits: &str) -> String {
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(digits.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

/// Short axis label for large values (`1.2M`, `350K`).
pub fn compact_number(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.0}K", value / 1e3)
    } else {
        format!("{value:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_has_grouping_and_two_decimals() {
        assert_eq!(KpiFormat::Currency.render(1_234_567.891), "$1,234,567.89");
        assert_eq!(KpiFormat::Currency.render(0.0), "$0.00");
        assert_eq!(KpiFormat::Currency.render(999.999), "$1,000.00");
        assert_eq!(KpiFormat::Currency.render(-1500.5), "-$1,500.50");
    }

    #[test]
    fn percent_has_two_decimals() {
        assert_eq!(KpiFormat::Percent.render(12.5), "12.50%");
        assert_eq!(KpiFormat::Percent.render(f64::NAN), "N/A");
    }

    #[test]
    fn count_groups_thousands() {
        assert_eq!(KpiFormat::Count.render(6000.0), "6,000");
        assert_eq!(KpiFormat::Count.render(123.0), "123");
        assert_eq!(KpiFormat::Count.render(1_000_000.0), "1,000,000");
    }

    #[test]
    fn metrics_follow_display_order() {
        let kpis = Kpis {
            total_profit: 2250.0,
            average_profit_margin: 13.2,
            total_revenue: 11_500.0,
            total_customers: 6000,
        };
        let texts: Vec<String> = kpis.metrics().iter().map(Metric::text).collect();
        assert_eq!(texts, vec!["$2,250.00", "13.20%", "$11,500.00", "6,000"]);
    }

    #[test]
    fn compact_axis_numbers() {
        assert_eq!(compact_number(1_300_000.0), "1.3M");
        assert_eq!(compact_number(350_000.0), "350K");
        assert_eq!(compact_number(42.0), "42");
    }
}
