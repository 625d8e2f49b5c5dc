//! Sources command

use anyhow::{Context, Result};
use cleancap_core::backend::SystemHost;
use cleancap_core::directory::{is_screen_candidate, select};
use cleancap_core::{CaptureHost, ConfigFile, Selection};

/// List capture sources and show what the picker would do with them
pub async fn list_sources(config: ConfigFile) -> Result<()> {
    println!("Clean Capture - Available Capture Sources\n");

    let host = SystemHost::new();

    if !host
        .check_screen_permission()
        .await
        .context("Failed to check screen recording permission")?
    {
        println!("Screen recording permission is not granted.");
        println!("Run 'cleancap settings screen' to open the privacy settings.");
        return Ok(());
    }

    let sources = host
        .list_sources(&config.source_query())
        .await
        .context("Failed to list capture sources")?;

    if sources.is_empty() {
        println!("No sources found.");
        return Ok(());
    }

    println!("{:<24} {:<32} {:<8} {}", "ID", "Name", "Type", "Screen?");
    println!("{}", "-".repeat(72));

    for source in &sources {
        println!(
            "{:<24} {:<32} {:<8} {}",
            source.id,
            truncate(&source.name, 30),
            source.kind,
            if is_screen_candidate(source) { "yes" } else { "" }
        );
    }

    println!();
    match select(sources) {
        Selection::Auto(source) => println!("Would share '{}' without asking.", source.name),
        Selection::Grid(list) => println!("Would offer {} sources in the picker.", list.len()),
        Selection::Unavailable => println!("Nothing to share."),
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
