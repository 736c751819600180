//! Monthly averages and cache maintenance.

use clap::Subcommand;
use emobattery_core::monthly::render_month_chart;
use emobattery_core::{BatteryStatus, Clock, Month};

use crate::common::{print_json, Context};

#[derive(Subcommand)]
pub enum MonthAction {
    /// Daily average battery for a month (YYYY-MM, default: current month)
    Show {
        month: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Average battery of the current month
    Average,
    /// Drop the cached averages of a month
    Clear { month: String },
}

pub fn run(ctx: &Context, action: MonthAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = ctx.open_db()?;
    let aggregator = ctx.aggregator(&db);

    match action {
        MonthAction::Show { month, json } => {
            let month: Month = match month {
                Some(raw) => raw.parse()?,
                None => Month::containing(ctx.config.clock().now().date()),
            };
            let averages = aggregator.monthly_averages_for(month)?;
            if json {
                print_json(&averages)?;
            } else {
                println!("{}", render_month_chart(month, &averages, &ctx.config.battery));
            }
        }
        MonthAction::Average => {
            let level = aggregator.current_month_average()?;
            println!(
                "Current month average: {level}% ({})",
                BatteryStatus::from_level(level).label()
            );
        }
        MonthAction::Clear { month } => {
            aggregator.clear_month_cache(&month)?;
            println!("cleared cached averages for {month}");
        }
    }
    Ok(())
}
