use std::path::Path;

use anyhow::Result;

use super::Context;

pub async fn list(context: &Context, catalog: Option<&Path>) -> Result<()> {
    let config = context.config().await?;
    let catalog = context.load_catalog(catalog, config).await?;

    if catalog.is_empty() {
        println!("No personas in catalog.");
        return Ok(());
    }

    let width = catalog.iter().map(|persona| persona.id.len()).max().unwrap_or(0);
    for persona in catalog.iter() {
        println!("{:<width$}  {}", persona.id, persona.display_name());
    }
    Ok(())
}
