//! BSData importer CLI
//!
//! Command-line tool for extracting BSData catalogs into normalized JSON
//! and reconciling point values against stored application data.

use bsdata_core::{
    diff, faction_slug, find_catalog, list_catalogs, parse_catalog, render_markdown, sync_points,
    Dataset, Error, StoredFile,
};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bsdata")]
#[command(about = "BSData catalog importer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalogs available in a BSData repo checkout
    List {
        /// Path to the BSData repo checkout
        repo: PathBuf,
    },

    /// Extract a catalog into normalized JSON and Markdown
    Import {
        /// Path to the BSData repo checkout
        repo: PathBuf,

        /// Faction name (exact catalog name or a substring of it)
        faction: String,

        /// Output directory for the generated files
        #[arg(short, long, default_value = "data")]
        output: PathBuf,
    },

    /// Compare a catalog against stored data and report differences
    Compare {
        /// Path to the BSData repo checkout
        repo: PathBuf,

        /// Faction name (exact catalog name or a substring of it)
        faction: String,

        /// Stored data file to compare against
        stored: PathBuf,

        /// Output directory for the comparison report
        #[arg(short, long, default_value = "data")]
        output: PathBuf,
    },

    /// Apply fresh point values onto a stored data file
    Sync {
        /// Path to the BSData repo checkout
        repo: PathBuf,

        /// Faction name (exact catalog name or a substring of it)
        faction: String,

        /// Stored data file to update in place
        stored: PathBuf,

        /// Apply changes without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        if let Error::CatalogNotFound { available, .. } = &e {
            eprintln!("Available catalogs:");
            for name in available {
                eprintln!("  - {}", name);
            }
        }
        std::process::exit(1);
    }
}

fn run() -> bsdata_core::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List { repo } => cmd_list(&repo),
        Commands::Import {
            repo,
            faction,
            output,
        } => cmd_import(&repo, &faction, &output),
        Commands::Compare {
            repo,
            faction,
            stored,
            output,
        } => cmd_compare(&repo, &faction, &stored, &output),
        Commands::Sync {
            repo,
            faction,
            stored,
            yes,
        } => cmd_sync(&repo, &faction, &stored, yes),
    }
}

fn cmd_list(repo: &Path) -> bsdata_core::Result<()> {
    let catalogs = list_catalogs(repo)?;

    println!("Available catalogs ({}):", catalogs.len());
    for name in &catalogs {
        println!("  - {}", name);
    }

    Ok(())
}

fn cmd_import(repo: &Path, faction: &str, output: &Path) -> bsdata_core::Result<()> {
    let data = load_dataset(repo, faction)?;

    fs::create_dir_all(output)?;
    let slug = faction_slug(faction);
    let json_path = output.join(format!("bsdata-{}.json", slug));
    let md_path = output.join(format!("bsdata-{}.md", slug));

    data.save(&json_path)?;
    println!("Written: {}", json_path.display());

    fs::write(&md_path, render_markdown(&data, None))?;
    println!("Written: {}", md_path.display());

    println!();
    println!(
        "Extracted: {} units, {} enhancements, {} detachments",
        data.units.len(),
        data.enhancements.len(),
        data.detachments.len()
    );

    Ok(())
}

fn cmd_compare(
    repo: &Path,
    faction: &str,
    stored_path: &Path,
    output: &Path,
) -> bsdata_core::Result<()> {
    let data = load_dataset(repo, faction)?;
    let stored = StoredFile::load(stored_path)?;
    let report = diff(&data, &stored)?;

    fs::create_dir_all(output)?;
    let md_path = output.join(format!("bsdata-{}.md", faction_slug(faction)));
    fs::write(&md_path, render_markdown(&data, Some(&report)))?;
    println!("Written: {}", md_path.display());

    println!();
    println!(
        "✅ Matching: {} units, {} enhancements",
        report.matching_units, report.matching_enhancements
    );
    if !report.unit_mismatches.is_empty() {
        println!("❌ Unit differences: {}", report.unit_mismatches.len());
        for mismatch in &report.unit_mismatches {
            println!(
                "   {}: {} -> {}",
                mismatch.name, mismatch.stored, mismatch.fresh
            );
        }
    }
    if !report.enhancement_mismatches.is_empty() {
        println!(
            "❌ Enhancement differences: {}",
            report.enhancement_mismatches.len()
        );
    }
    if !report.missing_in_stored.is_empty() {
        println!("⚠️  Missing in stored data: {}", report.missing_in_stored.len());
        for record in report.missing_in_stored.iter().take(10) {
            println!("   {} ({})", record.name, record.kind);
        }
    }

    Ok(())
}

fn cmd_sync(repo: &Path, faction: &str, stored_path: &Path, yes: bool) -> bsdata_core::Result<()> {
    let data = load_dataset(repo, faction)?;
    let mut stored = StoredFile::load(stored_path)?;

    let changes = sync_points(&data, &mut stored);

    if changes.is_empty() {
        println!();
        println!("✅ All points match - no changes needed.");
        return Ok(());
    }

    println!();
    println!("Changes to apply:");
    for change in &changes {
        println!("  {}", change);
    }

    if !yes && !confirm("Apply changes? [y/N]: ")? {
        println!("Aborted.");
        return Ok(());
    }

    stored.save(stored_path)?;
    println!("Updated: {}", stored_path.display());

    Ok(())
}

fn load_dataset(repo: &Path, faction: &str) -> bsdata_core::Result<Dataset> {
    let cat_file = find_catalog(repo, faction)?;
    println!("Parsing: {}", cat_file.display());
    parse_catalog(&cat_file)
}

/// Ask on stdin before overwriting the stored file
fn confirm(prompt: &str) -> io::Result<bool> {
    print!("\n{}", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
