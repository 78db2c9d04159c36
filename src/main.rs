mod catalog;
mod category;
mod document;
mod fetch;
mod model;
mod normalize;
mod parser;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use category::{CATEGORIES, DOCS_BASE_URL};
use model::ParentUsage;

const DEFAULT_OUTPUT: &str = "available-rules.xml";

#[derive(Parser)]
#[command(
    name = "rule_catalog",
    about = "Build a Checkstyle rule catalog from the online documentation",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// File to write the generated catalog to
    #[arg(default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a previously generated catalog
    Inspect {
        /// Catalog file to read
        path: PathBuf,
        /// Only show this category (e.g. "Imports")
        #[arg(short, long)]
        category: Option<String>,
        /// Show the properties of one rule
        #[arg(short, long, conflicts_with = "category")]
        rule: Option<String>,
        /// Dump the whole catalog as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            let usage = generate(&cli.output).await?;
            println!("Wrote {}", cli.output.display());
            usage.print();
            Ok(())
        }
        Some(Commands::Inspect {
            path,
            category,
            rule,
            json,
        }) => {
            let catalog = catalog::read_catalog_file(&path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&catalog)?);
                return Ok(());
            }
            match rule {
                Some(name) => match catalog.find_rule(&name) {
                    Some(m) => print_rule(m),
                    None => println!("No rule named {}.", name),
                },
                None => print_catalog(&catalog, category.as_deref()),
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// Fetch every category page, extract its rules and write the catalog.
/// The output is created up front and written in one go at the end.
async fn generate(output: &Path) -> Result<ParentUsage> {
    let file = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let mut out = BufWriter::new(file);

    let client = reqwest::Client::new();
    let mut usage = ParentUsage::default();
    let mut categories = Vec::with_capacity(CATEGORIES.len());

    let pb = ProgressBar::new(CATEGORIES.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    for category in &CATEGORIES {
        pb.set_message(category.id);
        let page = fetch::fetch_page(&client, DOCS_BASE_URL, category).await?;
        let rules = parser::extract_category(&page, category, &mut usage)
            .with_context(|| format!("Failed to extract rules for '{}'", category.id))?;
        info!("{}: {} rules ({})", category.id, rules.rules.len(), rules.label);
        categories.push(rules);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let lines = document::catalog_lines(&categories);
    document::write_lines(&mut out, &lines, 0, document::SPACES_PER_INDENT)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    out.flush()?;

    let total: usize = categories.iter().map(|c| c.rules.len()).sum();
    info!("Catalog: {} categories, {} rules", categories.len(), total);
    Ok(usage)
}

fn print_catalog(catalog: &catalog::Catalog, only: Option<&str>) {
    let shown: Vec<_> = catalog
        .categories
        .iter()
        .filter(|c| only.map_or(true, |name| c.name.eq_ignore_ascii_case(name)))
        .collect();
    if let (Some(name), true) = (only, shown.is_empty()) {
        println!("No category named {}.", name);
        return;
    }

    if only.is_none() {
        for m in &catalog.modules {
            println!("{} ({} properties)", m.name, m.properties.len());
        }
    }

    for c in &shown {
        println!("\n--- {} ({} rules) ---", c.name, c.rules.len());
        println!("{:>3} | {:<32} | {:<16} | {:>5}", "#", "Rule", "Parent", "Props");
        println!("{}", "-".repeat(66));
        for (i, r) in c.rules.iter().enumerate() {
            let parent = r.parent.as_deref().unwrap_or("-");
            println!(
                "{:>3} | {:<32} | {:<16} | {:>5}",
                i + 1,
                truncate(&r.name, 32),
                truncate(parent, 16),
                r.properties.len()
            );
        }
    }

    println!(
        "\n{} categories | {} rules",
        catalog.categories.len(),
        catalog.rule_count()
    );
}

fn print_rule(m: &catalog::CatalogModule) {
    match &m.parent {
        Some(parent) => println!("{} (parent: {})", m.name, parent),
        None => println!("{}", m.name),
    }
    println!("{}\n", m.description);
    for p in &m.properties {
        println!("  {} : {} = {}", p.name, p.type_label, p.default_value);
        println!("      {}", truncate(&p.description, 100));
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
