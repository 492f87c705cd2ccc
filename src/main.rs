mod cli;

use imagestore::config;
use imagestore::images::{Consent, ImageStore, ResetOutcome};
use imagestore::schema::SchemaManager;
use imagestore_common::ImageStatus;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use std::io::{BufRead, IsTerminal, Write};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "imagestore=trace,imagestore_db=debug,imagestore_common=debug".to_string()
        } else {
            "imagestore=info,imagestore_db=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = config::load_config_or_default(cli.config.as_deref())?;
    if let Some(base_dir) = cli.base_dir.clone() {
        config.base_dir = base_dir;
    }

    let manager = SchemaManager::new(config.clone());
    manager
        .ensure_directories()
        .with_context(|| format!("Failed to create directories under {:?}", config.base_dir))?;
    println!("Directories ensured under {}", config.base_dir.display());
    manager
        .create_schema()
        .with_context(|| format!("Failed to create schema in {:?}", config.database_path()))?;

    let store = ImageStore::new(config.clone());

    if let Some(target) = &cli.schema {
        let written = manager.export_schema(target.as_deref())?;
        println!("Schema exported to {}", written.display());
    }

    let consent = if cli.reset {
        reset_store(&store, cli.yes)?
    } else if cli.clean {
        clean_images(&store, cli.yes)?
    } else {
        if let Some(limit) = cli.add_sample_data {
            add_sample_data(&store, limit)?;
        }
        Consent::Granted
    };

    // A declined confirmation ends the run.
    if !consent.is_granted() {
        return Ok(());
    }

    if let Some(status) = cli.list {
        list_images(&store, status)?;
    }

    if cli.check {
        check_store(&store)?;
    }

    Ok(())
}

/// Ask for an explicit yes. `--yes` grants consent without asking.
///
/// Falls back to reading a plain line when stdin is not a terminal.
fn confirm(prompt: &str, assume_yes: bool) -> Result<Consent> {
    if assume_yes {
        return Ok(Consent::Granted);
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        let granted = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        return Ok(Consent::from(granted));
    }

    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    stdin.lock().read_line(&mut answer)?;
    println!();
    Ok(Consent::from_answer(&answer))
}

fn reset_store(store: &ImageStore, assume_yes: bool) -> Result<Consent> {
    let consent = confirm("Delete all images and recreate the database?", assume_yes)?;

    match store.reset_all(consent)? {
        ResetOutcome::Declined => {
            println!("Aborted, nothing changed");
            return Ok(Consent::Declined);
        }
        ResetOutcome::Completed {
            images_removed,
            database_existed,
        } => {
            println!("Deleted {} image file(s)", images_removed);
            if database_existed {
                println!("Deleted database");
            } else {
                println!("No existing database");
            }
            println!(
                "Created empty database at {}",
                store.config().database_path().display()
            );
        }
    }
    Ok(Consent::Granted)
}

fn clean_images(store: &ImageStore, assume_yes: bool) -> Result<Consent> {
    let consent = confirm("Delete all images from the file system?", assume_yes)?;
    if !consent.is_granted() {
        println!("Aborted, nothing changed");
        return Ok(consent);
    }

    let removed = store.purge_images()?;
    println!("Deleted {} image file(s)", removed);
    Ok(consent)
}

fn add_sample_data(store: &ImageStore, limit: usize) -> Result<()> {
    let report = store.seed_from_examples(limit)?;
    if report.available == 0 {
        println!(
            "No example images found in {}",
            store.config().examples_path().display()
        );
        return Ok(());
    }

    println!("Added {} sample image(s)", report.added());
    for seeded in &report.seeded {
        tracing::debug!(
            id = %seeded.id,
            source = %seeded.source.display(),
            confidence = seeded.prediction.confidence,
            "Seeded"
        );
    }
    Ok(())
}

fn list_images(store: &ImageStore, status: Option<ImageStatus>) -> Result<()> {
    let records = store.list(status)?;
    if records.is_empty() {
        println!("No images stored");
        return Ok(());
    }

    for record in &records {
        let confidence = record
            .class_confidence
            .map(|c| format!("{:.2}", c))
            .unwrap_or_else(|| "-".to_string());
        let bbox = record
            .bbox
            .map(|b| format!("({}, {}, {}, {})", b.xmin, b.ymin, b.xmax, b.ymax))
            .unwrap_or_else(|| "-".to_string());
        let path = record.path.as_deref().unwrap_or("-");
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            record.id, record.timestamp, record.status, confidence, bbox, path
        );
    }
    println!("{} image(s)", records.len());
    Ok(())
}

fn check_store(store: &ImageStore) -> Result<()> {
    let report = store.check_consistency()?;
    if report.is_consistent() {
        println!("✓ All {} record(s) consistent", store.count()?);
        return Ok(());
    }

    for id in &report.without_path {
        println!("✗ Image {} has no file path", id);
    }
    for id in &report.missing_files {
        println!("✗ Image {} file is missing", id);
    }
    for id in &report.misnamed {
        println!("✗ Image {} file name does not match its record", id);
    }
    anyhow::bail!(
        "Store at {} is inconsistent",
        store.config().database_path().display()
    )
}
