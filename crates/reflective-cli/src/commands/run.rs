use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result, bail};
use reflective_application::{ExportArtifact, FeedbackService, export_all, export_one};
use reflective_core::feedback::{FeedbackRun, Material, Sentiment};
use reflective_core::persona::PersonaCatalog;
use tokio_util::sync::CancellationToken;

use super::Context;
use crate::{OutputFormat, RunArgs};

pub async fn execute(context: &Context, args: RunArgs) -> Result<()> {
    let mut config = context.config().await?.clone();
    if let Some(concurrency) = args.concurrency {
        config.generation.concurrency = concurrency;
    }

    let catalog = Arc::new(context.load_catalog(args.catalog.as_deref(), &config).await?);
    let material = read_material(&args).await?;
    let backend = context.backend(&config).await?;
    let service = FeedbackService::new(catalog.clone(), backend, &config.generation)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling run");
            on_interrupt.cancel();
        }
    });

    let run = service
        .run_with_cancel(&args.personas, &material, args.style, &cancel)
        .await?;

    match args.format {
        OutputFormat::Text => print_run(&run, &catalog),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&run.report())?),
    }

    if let Some(output) = &args.output {
        write_artifact(output, &export_all(&run, &catalog)).await?;
    }

    if let Some(dir) = &args.per_persona_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        for (id, result) in run.ordered_results() {
            if let Some(persona) = catalog.get(id) {
                let artifact = export_one(persona, result);
                write_artifact(&dir.join(&artifact.filename), &artifact).await?;
            }
        }
    }

    Ok(())
}

async fn read_material(args: &RunArgs) -> Result<Material> {
    let text = match (&args.material, &args.material_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read material from {}", path.display()))?,
        (None, None) if args.image.is_some() => String::new(),
        (None, None) => bail!("Provide --material, --material-file or --image"),
    };

    let material = Material::new(text);
    Ok(match &args.image {
        Some(image) => material.with_image(image.display().to_string()),
        None => material,
    })
}

fn print_run(run: &FeedbackRun, catalog: &PersonaCatalog) {
    for (id, result) in run.ordered_results() {
        let name = catalog
            .get(id)
            .map_or_else(|| id.to_string(), |persona| persona.display_name());
        println!("== {name} ==");
        println!("Sentiment: {}", result.sentiment_label());
        println!("{}\n", result.feedback);
    }

    println!("Sentiment distribution:");
    for sentiment in [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative] {
        println!("  {sentiment}: {}", run.tally.count(sentiment));
    }

    println!("\nOverall Trends:\n{}", run.summary.text());
}

async fn write_artifact(path: &Path, artifact: &ExportArtifact) -> Result<()> {
    tokio::fs::write(path, &artifact.content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}
