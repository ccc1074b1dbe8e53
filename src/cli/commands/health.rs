use anyhow::Context;
use clap::Args;
use serde_json::{Map, Value};

use crate::cli::{utils, OutputFormat};
use crate::config;

#[derive(Args, Debug)]
pub struct HealthArgs {
    #[arg(long, help = "Server base URL (defaults to http://localhost:<configured port>)")]
    pub url: Option<String>,
}

pub async fn handle(args: HealthArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let base = args
        .url
        .unwrap_or_else(|| format!("http://localhost:{}", config::config().server.port));
    let endpoint = url::Url::parse(&base)
        .and_then(|u| u.join("/health"))
        .with_context(|| format!("invalid server URL: {}", base))?;

    let response = reqwest::get(endpoint.clone())
        .await
        .with_context(|| format!("failed to reach {}", endpoint))?;
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        let mut data = Map::new();
        data.insert("status".into(), Value::from(status.as_u16()));
        data.insert("health".into(), body);
        utils::output_success(output_format, &format!("{} is healthy", base), Some(data))
    } else {
        utils::output_error(output_format, &format!("{} answered {}", base, status), Some("UNHEALTHY"))?;
        anyhow::bail!("server unhealthy: {}", status)
    }
}
