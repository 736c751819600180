//! Month-level aggregation of daily battery series.

mod aggregator;
mod month;

pub use aggregator::{DailyAverage, MonthlyAggregator, MonthlyCacheEntry, NO_DATA_AVERAGE};
pub use month::Month;

use crate::battery::BatteryConfig;

/// Render daily averages as a bar chart, one row per day.
pub fn render_month_chart(month: Month, averages: &[DailyAverage], config: &BatteryConfig) -> String {
    let mut output = format!("\nDaily Average Battery {month}:\n");
    output.push_str(&"─".repeat(50));
    output.push('\n');

    for average in averages {
        let ratio = if config.max_level > 0.0 {
            (average.avg_battery / config.max_level).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let bar_length = (ratio * 30.0) as usize;
        let marker = if average.avg_battery == NO_DATA_AVERAGE { "·" } else { " " };
        output.push_str(&format!(
            "{} {}{} {:>5.1}{}\n",
            average.day.format("%m-%d"),
            "█".repeat(bar_length),
            " ".repeat(30 - bar_length),
            average.avg_battery,
            marker
        ));
    }

    output.push_str(&"─".repeat(50));
    output.push_str("\n· no data\n");
    output
}
