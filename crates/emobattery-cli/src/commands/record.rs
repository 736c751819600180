//! Emotion record store access.

use clap::Subcommand;
use emobattery_core::emotion::{format_record_timestamp, parse_record_timestamp};
use emobattery_core::{Clock, NewEmotionRecord};

use crate::common::Context;

#[derive(Subcommand)]
pub enum RecordAction {
    /// Append an observation
    Add {
        /// Emotion label as reported by the provider
        emotion: String,
        /// YYYYMMDD-HHMMSS[_NN] (default: now)
        #[arg(long)]
        timestamp: Option<String>,
        /// Record the observation without a detected face
        #[arg(long)]
        no_face: bool,
        #[arg(long, default_value = "1.0")]
        confidence: f64,
        #[arg(long)]
        user: Option<String>,
    },
    /// List known usernames
    Users,
}

pub fn run(ctx: &Context, action: RecordAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = ctx.open_db()?;

    match action {
        RecordAction::Add {
            emotion,
            timestamp,
            no_face,
            confidence,
            user,
        } => {
            let timestamp = match timestamp {
                Some(raw) => {
                    let raw = raw.trim().to_string();
                    if parse_record_timestamp(&raw).is_none() {
                        return Err(format!(
                            "invalid timestamp '{raw}': expected YYYYMMDD-HHMMSS[_NN]"
                        )
                        .into());
                    }
                    raw
                }
                None => format_record_timestamp(ctx.config.clock().now()),
            };
            let id = db.insert_record(&NewEmotionRecord {
                timestamp: timestamp.clone(),
                emotion,
                confidence,
                has_face: !no_face,
                username: user,
            })?;
            println!("Record added: {id} ({timestamp})");
        }
        RecordAction::Users => {
            for name in db.usernames()? {
                println!("{name}");
            }
        }
    }
    Ok(())
}
