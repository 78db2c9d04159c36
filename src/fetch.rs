use anyhow::{Context, Result};
use scraper::Html;
use tracing::{debug, info};

use crate::category::Category;

/// Fetch a category's documentation page and parse it as HTML.
pub async fn fetch_page(client: &reqwest::Client, base: &str, category: &Category) -> Result<Html> {
    let url = category.url(base);

    info!("Fetching {}", url);
    let body = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?
        .error_for_status()
        .with_context(|| format!("Bad response from {}", url))?
        .text()
        .await
        .with_context(|| format!("Failed to read body of {}", url))?;
    debug!("{}: {} bytes", category.id, body.len());

    Ok(Html::parse_document(&body))
}
