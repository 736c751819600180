//! Single-day battery analysis.

use clap::Subcommand;
use serde::Serialize;

use emobattery_core::{today_level, BatteryStatus, DayBatterySeries};

use crate::common::{print_json, Context};

#[derive(Subcommand)]
pub enum BatteryAction {
    /// Analyze one day (YYYY-MM-DD or YYYYMMDD)
    Day {
        date: String,
        /// Only count observations of this user
        #[arg(long)]
        user: Option<String>,
        /// Print JSON instead of a chart
        #[arg(long)]
        json: bool,
    },
    /// Today's battery and current level
    Today {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct TodayReport<'a> {
    level: u32,
    status: BatteryStatus,
    series: &'a DayBatterySeries,
}

pub fn run(ctx: &Context, action: BatteryAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = ctx.open_db()?;
    let aggregator = ctx.aggregator(&db);

    match action {
        BatteryAction::Day { date, user, json } => {
            let series = aggregator.simulate_day_str(&date, user.as_deref())?;
            if json {
                print_json(&series)?;
            } else {
                println!("{}", series.render_ascii_chart(ctx.config.battery.max_level));
                println!("Observations: {}", series.observation_total);
                if series.unknown_labels > 0 {
                    println!("Unrecognized labels (no weight): {}", series.unknown_labels);
                }
                if let Some(average) = series.average_level() {
                    println!("Average level: {average:.1}");
                }
            }
        }
        BatteryAction::Today { json } => {
            let series = aggregator.simulate_today()?;
            let level = today_level(&series);
            let status = BatteryStatus::from_level(level);
            if json {
                print_json(&TodayReport {
                    level,
                    status,
                    series: &series,
                })?;
            } else {
                println!("{}", series.render_ascii_chart(ctx.config.battery.max_level));
                println!("Current battery level: {level}% ({})", status.label());
            }
        }
    }
    Ok(())
}
