//! Generic record CLI commands.

use clap::{Args, Subcommand};
use serde_json::Value;

use crate::output::{self, OutputFormat};
use tenantguard_core::error::AppError;
use tenantguard_core::types::{Predicates, SortField};
use tenantguard_entity::{EntityType, Record};
use tenantguard_service::Backend;

/// Arguments for entity commands
#[derive(Debug, Args)]
pub struct EntityArgs {
    /// Entity subcommand
    #[command(subcommand)]
    pub command: EntityCommand,
}

/// Entity subcommands
#[derive(Debug, Subcommand)]
pub enum EntityCommand {
    /// List visible records of a type
    List {
        /// Entity type (e.g. Asset, Risk)
        entity: String,
        /// Equality filter, repeatable (field=value)
        #[arg(short = 'w', long = "where")]
        filters: Vec<String>,
        /// Sort field; prefix with '-' for descending
        #[arg(short, long, allow_hyphen_values = true)]
        sort: Option<String>,
        /// Maximum records to return
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Create a record from a JSON object
    Create {
        /// Entity type
        entity: String,
        /// Fields as a JSON object
        #[arg(long)]
        data: String,
    },
    /// Merge a JSON object into a record
    Update {
        /// Entity type
        entity: String,
        /// Record ID
        id: String,
        /// Fields as a JSON object
        #[arg(long)]
        data: String,
    },
    /// Delete a record
    Delete {
        /// Entity type
        entity: String,
        /// Record ID
        id: String,
    },
}

/// Execute entity commands
pub async fn execute(
    args: &EntityArgs,
    backend: &Backend,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        EntityCommand::List {
            entity,
            filters,
            sort,
            limit,
        } => {
            let handle = backend.entities(entity.parse::<EntityType>()?);
            let sort = sort.as_deref().map(str::parse::<SortField>).transpose()?;
            let records = if filters.is_empty() {
                handle.list(sort.as_ref(), *limit).await?
            } else {
                handle
                    .filter(&parse_predicates(filters)?, sort.as_ref(), *limit)
                    .await?
            };
            output::print_records(&records, format);
        }
        EntityCommand::Create { entity, data } => {
            let record = backend
                .entities(entity.parse::<EntityType>()?)
                .create(parse_object(data)?)
                .await?;
            output::print_item(&record, format);
        }
        EntityCommand::Update { entity, id, data } => {
            let record = backend
                .entities(entity.parse::<EntityType>()?)
                .update(id, parse_object(data)?)
                .await?;
            output::print_item(&record, format);
        }
        EntityCommand::Delete { entity, id } => {
            backend
                .entities(entity.parse::<EntityType>()?)
                .delete(id)
                .await?;
            output::print_success(&format!("{entity} '{id}' deleted"));
        }
    }

    Ok(())
}

fn parse_object(data: &str) -> Result<Record, AppError> {
    match serde_json::from_str::<Value>(data)? {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::validation("--data must be a JSON object")),
    }
}

/// `field=value` pairs; values that parse as JSON keep their type.
fn parse_predicates(filters: &[String]) -> Result<Predicates, AppError> {
    filters.iter().try_fold(Predicates::new(), |acc, pair| {
        let (field, raw) = pair
            .split_once('=')
            .ok_or_else(|| AppError::validation(format!("Expected field=value, got '{pair}'")))?;
        let value = serde_json::from_str::<Value>(raw)
            .unwrap_or_else(|_| Value::String(raw.to_string()));
        Ok(acc.eq(field.trim(), value))
    })
}
