//! Basic example demonstrating the Dynatrace entity API client.
//!
//! Run with:
//! ```
//! DT_API_TOKEN=dt0c01.... DT_ENV_URL=https://abc12345.live.dynatrace.com cargo run --example basic
//! ```

use dtapi::{DynatraceClient, EntityListQuery};

#[tokio::main]
async fn main() -> dtapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating Dynatrace client...");
    let client = DynatraceClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    let entities = client.entities();

    // First page of hosts
    println!("\n--- Listing Hosts (first page) ---");
    let mut hosts = entities.list_with_query(EntityListQuery::new("type(HOST)").page_size(10));
    if let Some(page) = hosts.next_page().await? {
        println!("Got {} hosts (total: {:?})", page.len(), page.total_count);
        for host in &page {
            println!(
                "  {} - {}",
                host.entity_id.as_deref().unwrap_or("?"),
                host.display_name.as_deref().unwrap_or("")
            );
        }
    }

    // Fetch details of one service
    println!("\n--- First Service ---");
    let mut services = entities.list("type(SERVICE)");
    if let Some(service) = services.try_next().await? {
        if let Some(ref id) = service.entity_id {
            let detail = entities.get(id).await?;
            println!("{:#?}", detail);
        }
    }

    // Entity type schemas
    println!("\n--- Entity Types ---");
    let types = entities.list_types(100).collect_all().await?;
    for ty in types.iter().take(10) {
        println!(
            "  {} ({} properties)",
            ty.entity_type.as_deref().unwrap_or("?"),
            ty.properties.len()
        );
    }
    println!("Found {} entity types", types.len());

    Ok(())
}
