//! Render publication pages for a site checkout

use bibfolio::pages::{self, PagesConfig};
use bibfolio::Result;
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <bibtex-file> [site-root]", args[0]);
        std::process::exit(1);
    }

    let root = args.get(2).map_or(".", String::as_str);
    println!("Parsing {}...", args[1]);
    let db = bibfolio::parse_file(&args[1])?;
    println!("  {} entries", db.entries().len());

    let config_path = Path::new(root).join("pages.json");
    let config = if config_path.exists() {
        println!("Using {}", config_path.display());
        PagesConfig::load(&config_path)?
    } else {
        PagesConfig::default()
    };

    let stats = pages::render(&db, &config, root)?;

    println!("\nPages written:       {}", stats.written);
    println!("Stale pages removed: {}", stats.removed);
    println!(
        "Cover images:        {} found, {} missing",
        stats.images_found, stats.images_missing
    );

    Ok(())
}
