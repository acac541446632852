// Ohmyfin demo - runs each API operation once against the configured endpoint
// Needs OHMYFIN_API_KEY (a .env file works too); OHMYFIN_BASE_URL points it at a sandbox.

use anyhow::Context;
use chrono::NaiveDate;
use colored::Colorize;
use ohmyfin::{
    ChangeRequest, ChangeStatus, Client, ClientConfig, Error, Role, SsiRequest, TrackRequest,
    ValidateRequest,
};
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const SAMPLE_UETR: &str = "97ed4827-7b6f-4491-a06f-b548d5a7512d";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ClientConfig::from_env().context("Failed to load configuration")?;
    info!("Using Ohmyfin API at {}", config.base_url());
    let client = Client::new(config)?;

    let date = NaiveDate::from_ymd_opt(2024, 1, 15).context("invalid sample date")?;

    println!("{}", "== track ==".bold());
    let track = client
        .track(&TrackRequest::by_uetr(SAMPLE_UETR, dec!(10000), date, "USD"))
        .await;
    report(track);

    println!("{}", "== validate ==".bold());
    let validate = client
        .validate(&ValidateRequest::new(
            "DEUTDEFF",
            "EUR",
            "DE89370400440532013000",
        ))
        .await;
    report(validate);

    println!("{}", "== get_ssi ==".bold());
    let ssi = client.get_ssi(&SsiRequest::new("DEUTDEFF", "EUR")).await;
    report(ssi);

    // Writes to the live service; opt in explicitly
    if std::env::var("OHMYFIN_DEMO_CHANGE").is_ok() {
        println!("{}", "== change ==".bold());
        let role: Role = std::env::var("OHMYFIN_DEMO_ROLE")
            .unwrap_or_else(|_| "correspondent".to_string())
            .parse()?;
        let change = client
            .change(&ChangeRequest::new(
                SAMPLE_UETR,
                dec!(10000),
                date,
                "USD",
                ChangeStatus::Success,
                role,
            ))
            .await
            .map(|ack| ack.body);
        report(change);
    }

    Ok(())
}

fn report<T: Serialize>(result: ohmyfin::Result<T>) {
    match result {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(json) => println!("{}", json.green()),
            Err(e) => println!("{} {}", "unprintable result:".yellow(), e),
        },
        Err(Error::Api {
            status_code,
            message,
            errors,
        }) => {
            println!("{} {} {}", "API error".red().bold(), status_code, message);
            for (field, messages) in errors {
                println!("  {}: {}", field.yellow(), messages.join("; "));
            }
        }
        Err(e) => println!("{} {}", "failed:".red().bold(), e),
    }
}
