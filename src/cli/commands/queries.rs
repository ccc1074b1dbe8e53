use clap::Subcommand;
use serde_json::{json, Map};

use crate::cli::{utils, OutputFormat};
use crate::config;
use crate::database::QueryCatalog;

#[derive(Subcommand)]
pub enum QueriesCommands {
    #[command(about = "List every query id in the effective catalog")]
    List,

    #[command(about = "Print the SQL behind a query id")]
    Show {
        #[arg(help = "Query id, e.g. cart/addItemCart")]
        id: String,
    },
}

pub fn handle(cmd: QueriesCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let catalog = QueryCatalog::load(config::config().database.query_catalog_path.as_deref())?;

    match cmd {
        QueriesCommands::List => {
            let ids = catalog.ids();
            match output_format {
                OutputFormat::Json => {
                    let mut data = Map::new();
                    data.insert("queries".into(), json!(ids));
                    utils::output_success(output_format, &format!("{} queries", ids.len()), Some(data))
                }
                OutputFormat::Text => {
                    for id in ids {
                        println!("{}", id);
                    }
                    Ok(())
                }
            }
        }
        QueriesCommands::Show { id } => match catalog.get(&id) {
            Some(sql) => match output_format {
                OutputFormat::Json => {
                    let mut data = Map::new();
                    data.insert("id".into(), json!(id));
                    data.insert("sql".into(), json!(sql));
                    utils::output_success(output_format, "Query found", Some(data))
                }
                OutputFormat::Text => {
                    println!("{}", sql);
                    Ok(())
                }
            },
            None => {
                utils::output_error(output_format, &format!("Unknown query: {}", id), Some("UNKNOWN_QUERY"))?;
                anyhow::bail!("unknown query id {}", id)
            }
        },
    }
}
