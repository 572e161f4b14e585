use catalog_store::{CatalogState, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. dotenv + logging
    let config = setup_environment()?;

    // 2. open the store and apply migrations
    let state = CatalogState::initialize(&config).await?;

    let size = i64::from(config.default_page_size);
    let tag_pages = state.tags.get_last_page(size).await?;
    let certificate_pages = state.certificates.get_last_page(size).await?;
    let order_pages = state.orders.get_last_page(size).await?;
    tracing::info!(tag_pages, certificate_pages, order_pages, "Catalog store ready");
    Ok(())
}
