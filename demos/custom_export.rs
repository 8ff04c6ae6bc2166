//! Run one custom export job end to end
//!
//! Usage: cargo run --example custom_export
//!
//! Reads `BRANCH_APP_ID` and `BRANCH_ACCESS_TOKEN` from the environment (or .env). Optional:
//! `EXPORT_REPORT_TYPE` (default: eo_open), `EXPORT_HOURS` (default: 1), `EXPORT_OUTPUT` (write
//! the file there instead of counting lines).

use branch_export::{
    CustomExportClient, CustomExportConfig, Error, ExportRequest, ExportRequestParams,
    ResponseFormat,
};
use chrono::{Duration as ChronoDuration, Utc};
use chrono_tz::Tz;
use std::time::{Duration, Instant};

const MAX_POLLS: usize = 128;
const POLL_INTERVAL: Duration = Duration::from_secs(16);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let app_id = std::env::var("BRANCH_APP_ID").map_err(|_| "BRANCH_APP_ID not set")?;
    let access_token =
        std::env::var("BRANCH_ACCESS_TOKEN").map_err(|_| "BRANCH_ACCESS_TOKEN not set")?;
    let report_type = std::env::var("EXPORT_REPORT_TYPE").unwrap_or_else(|_| "eo_open".into());
    let hours: i64 = std::env::var("EXPORT_HOURS")
        .ok()
        .and_then(|h| h.parse().ok())
        .unwrap_or(1);

    let client = CustomExportClient::new(CustomExportConfig::new(app_id, access_token))?;

    let end = (Utc::now() - ChronoDuration::days(1)).naive_utc();
    let mut params = ExportRequestParams::new(
        report_type.as_str(),
        end - ChronoDuration::hours(hours),
        end,
        ["timestamp", "name", "user_data_os", "user_data_platform"],
    );
    params.timezone = Some(Tz::UTC);
    params.response_format = Some(ResponseFormat::Json);
    let request = ExportRequest::new(params)?;

    println!("═══════════════════════════════════════════════════════════");
    println!("  branch-export custom export");
    println!("═══════════════════════════════════════════════════════════");
    println!("  Report type: {}", request.report_type());
    println!("  Window: {} .. {}", request.start_date(), request.end_date());
    println!("═══════════════════════════════════════════════════════════");

    let started = Instant::now();
    let response = client.submit_export(&request).await?;
    if response.has_errors_with(|errors| eprintln!("Submission rejected: {errors}")) {
        return Err("export job rejected".into());
    }
    println!("\nJob handle: {}", response.handle().unwrap_or("<none>"));

    let mut status = client.check_status(&response).await?;
    let mut polls = 1;
    while !status.is_completed() {
        if polls >= MAX_POLLS {
            return Err(format!("export not complete after {polls} polls").into());
        }
        println!(
            "  [{:>4}s] status={} lines_exported={}",
            started.elapsed().as_secs(),
            status.status().unwrap_or("?"),
            status.lines_exported()
        );
        tokio::time::sleep(POLL_INTERVAL).await;
        status = client.check_status(&response).await?;
        polls += 1;
    }
    println!(
        "\nComplete after {:.1}s: {} line(s)",
        started.elapsed().as_secs_f64(),
        status.lines_exported()
    );

    match std::env::var("EXPORT_OUTPUT") {
        Ok(output) => {
            let path = client.download_exported(&status, output).await?;
            println!("Written to {}", path.display());
        }
        Err(_) => {
            let lines = client
                .download_and_read_lines(&status, |mut lines| async move {
                    let mut count = 0u64;
                    while lines.next_line().await?.is_some() {
                        count += 1;
                    }
                    Ok::<_, Error>(count)
                })
                .await?;
            println!("Downloaded {lines} line(s)");
        }
    }

    Ok(())
}
