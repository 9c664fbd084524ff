// src/fetch/mod.rs
//
// Getting the sheet: HTTP with retry, HTML sniffing, then CSV or JSON into a
// Table. Transport problems and "this is a login page" are reported here so the
// parser only ever sees sheet data.

pub mod sniff;
pub mod urls;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::{Config, FetchConfig, SourceConfig, SourceFormat};
use crate::error::{CatalogError, Result};
use crate::process::{self, detect_delimiter, strip_bom, Table};

pub use sniff::{ensure_not_html, looks_like_html};
pub use urls::export_url;

/// Build the HTTP client used for every sheet request.
pub fn build_client(cfg: &FetchConfig) -> Result<Client> {
    Ok(Client::builder()
        .timeout(cfg.timeout())
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

async fn get_text_core(client: &Client, url: &Url) -> Result<String> {
    debug!("Fetching text from {}", url);
    let resp = client.get(url.clone()).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(CatalogError::Http {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(resp.text().await?)
}

fn is_retryable(e: &CatalogError) -> bool {
    match e {
        CatalogError::Transport(_) => true,
        CatalogError::Http { status, .. } => {
            *status >= 500 || *status == StatusCode::TOO_MANY_REQUESTS.as_u16()
        }
        _ => false,
    }
}

/// `initial_ms * 2^(attempt-1)`, saturating instead of overflowing.
fn backoff_delay_ms(initial_ms: u64, attempt: u32) -> u64 {
    initial_ms.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)))
}

/// GET `url` as text, retrying network errors, 5xx and 429 with exponential
/// backoff (`initial_backoff_ms * 2^(attempt-1)`).
pub async fn get_text_with_retry(
    client: &Client,
    url: &Url,
    max_retries: u32,
    initial_backoff_ms: u64,
) -> Result<String> {
    let mut attempts = 0;
    loop {
        match get_text_core(client, url).await {
            Ok(t) => return Ok(t),
            Err(e) if attempts < max_retries && is_retryable(&e) => {
                attempts += 1;
                let backoff = backoff_delay_ms(initial_backoff_ms, attempts);
                warn!(%url, attempt = attempts, delay_ms = backoff, error = %e, "Retrying");
                sleep(Duration::from_millis(backoff)).await;
            }
            Err(e) => {
                error!(%url, error = %e, "giving up");
                return Err(e);
            }
        }
    }
}

/// Parse a JSON array of records (sheet-to-JSON proxy output) into a Table.
pub fn records_table(body: &str) -> Result<Table> {
    let value: Value = serde_json::from_str(strip_bom(body))
        .map_err(|e| CatalogError::InvalidJson(e.to_string()))?;
    let items = value
        .as_array()
        .ok_or_else(|| CatalogError::InvalidJson("expected a top-level array".into()))?;

    let records = items
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_object()
                .cloned()
                .ok_or_else(|| CatalogError::InvalidJson(format!("record {i} is not an object")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Table::from_records(&records))
}

/// Turn an already-fetched body into a Table according to `source`.
pub fn table_from_body(body: &str, source: &SourceConfig, sniff_window: usize) -> Result<Table> {
    ensure_not_html(body, sniff_window)?;
    let table = match source.format {
        SourceFormat::Csv => {
            let delimiter = source.delimiter.unwrap_or_else(|| detect_delimiter(body));
            debug!(?delimiter, "parsing CSV");
            process::parse(body, delimiter)
        }
        SourceFormat::Json => records_table(body)?,
    };
    Ok(table)
}

/// Fetch the configured sheet and parse it.
#[instrument(level = "info", skip(client, config), fields(url = %config.source.url))]
pub async fn load_table(client: &Client, config: &Config) -> Result<Table> {
    let url = export_url(&config.source.url)?;
    let body = get_text_with_retry(
        client,
        &url,
        config.fetch.max_retries,
        config.fetch.backoff_ms,
    )
    .await?;
    info!(bytes = body.len(), "fetched sheet");

    let table = table_from_body(&body, &config.source, config.fetch.sniff_window)?;
    info!(rows = table.len(), "parsed sheet");
    Ok(table)
}
