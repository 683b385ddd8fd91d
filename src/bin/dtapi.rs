//! Dynatrace API CLI binary.
//!
//! A command-line interface for browsing monitored entities.

use clap::Parser;
use dtapi::cli::{Cli, Command, Resource};
use dtapi::output::{EntityRow, EntityTypeRow, PrettyPrint};
use dtapi::{DynatraceClient, DynatraceError, EntityListQuery, PaginatedList, DEFAULT_PAGE_SIZE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .init();

    let cli = Cli::parse();

    let client = match DynatraceClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set DT_API_TOKEN and DT_ENV_URL environment variables");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &DynatraceClient, cli: Cli) -> dtapi::Result<()> {
    match cli.command {
        Command::Get { resource, id } => handle_get(client, resource, &id, cli.json).await,
        Command::List {
            resource,
            selector,
            from,
            to,
            fields,
            page_size,
            limit,
        } => {
            let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
            match resource {
                Resource::Entity => {
                    let selector = selector.ok_or_else(|| {
                        DynatraceError::InvalidArgument(
                            "--selector required for listing entities".to_string(),
                        )
                    })?;
                    let mut query = EntityListQuery::new(selector)
                        .time_from(from)
                        .time_to(to)
                        .page_size(page_size);
                    if let Some(fields) = fields {
                        query = query.fields(fields);
                    }
                    let list = client.entities().list_with_query(query);
                    output_list(list, limit, cli.json, |e| EntityRow::from(e)).await
                }
                Resource::Type => {
                    let list = client.entities().list_types(page_size);
                    output_list(list, limit, cli.json, |t| EntityTypeRow::from(t)).await
                }
            }
        }
    }
}

async fn handle_get(
    client: &DynatraceClient,
    resource: Resource,
    id: &str,
    json: bool,
) -> dtapi::Result<()> {
    match resource {
        Resource::Entity => {
            let entity = client.entities().get(id).await?;
            output_single(&entity, json)
        }
        Resource::Type => {
            let entity_type = client.entities().get_type(id).await?;
            output_single(&entity_type, json)
        }
    }
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> dtapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

async fn output_list<T, Q, R, F>(
    mut list: PaginatedList<'_, T, Q>,
    limit: Option<usize>,
    json: bool,
    to_row: F,
) -> dtapi::Result<()>
where
    T: Serialize + DeserializeOwned,
    Q: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    let mut items = Vec::new();
    while limit.map_or(true, |l| items.len() < l) {
        match list.try_next().await? {
            Some(item) => items.push(item),
            None => break,
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        match list.total_count() {
            Some(total) => println!("\n{} of {} total items", items.len(), total),
            None => println!("\n{} items", items.len()),
        }
    }
    Ok(())
}
