use clap::Args;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::auth::JwtAuth;
use crate::cli::{utils, OutputFormat};
use crate::config;

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(help = "User id the token authenticates")]
    pub user_id: Uuid,

    #[arg(long, help = "Validity in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
    pub hours: Option<u64>,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = &config::config().security;
    let auth = JwtAuth::from_config(security)?;
    let hours = args.hours.unwrap_or(security.jwt_expiry_hours);
    let token = auth.issue_for(args.user_id, hours)?;

    match output_format {
        OutputFormat::Json => {
            let mut data = Map::new();
            data.insert("token".into(), Value::String(token));
            data.insert("user_id".into(), json!(args.user_id));
            data.insert("expires_in_hours".into(), json!(hours));
            utils::output_success(output_format, "Token issued", Some(data))
        }
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}
