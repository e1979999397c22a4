//! Example of querying a personal bibliography

use bibfolio::{Database, Result};

fn main() -> Result<()> {
    let bibtex = r#"
        @string{wrr = "Water Resources Research"}

        @article{dossgollin2022flood,
            author = "Doss-Gollin, James and Keller, Klaus",
            title = "Subjective Uncertainty in Flood Frequency Analysis",
            journaltitle = wrr,
            date = "2022-06-01",
            doi = "10.1029/2021WR031684"
        }

        @article{lu2023variability,
            author = "Lu, Yuchen and Doss-Gollin, James",
            title = "Low-Frequency Variability in Hurricane Genesis",
            journal = "Journal of Climate",
            year = 2023
        }

        @inproceedings{dossgollin2023egu,
            author = "Doss-Gollin, James",
            title = "House Elevation Decisions under Deep Uncertainty",
            eventtitle = "EGU General Assembly 2023",
            date = "2023-04-24"
        }

        @article{incomplete2024,
            author = "Doe, Jane"
        }
    "#;

    let db = Database::parser().parse(bibtex)?;

    // Find all journal articles
    println!("Articles:");
    for entry in db.find_by_type("article") {
        println!(
            "  - {} ({})",
            entry.get("title").unwrap_or("Unknown"),
            entry.get_text("year").or_else(|| entry.get_text("date")).unwrap_or_default()
        );
    }

    // Find everything with a given coauthor
    println!("\nPapers with Yuchen Lu:");
    for entry in db.find_by_field("author", "Lu, Yuchen") {
        println!("  - {}", entry.get("title").unwrap_or("Unknown"));
    }

    // Look a specific entry up by key
    if let Some(entry) = db.find_by_key("dossgollin2022flood") {
        println!("\nFound {}:", entry.key());
        println!("  Type: {}", entry.entry_type());
        println!("  Journal: {}", entry.get("journaltitle").unwrap_or("Unknown"));
        println!("  DOI: {}", entry.get("doi").unwrap_or("Unknown"));
    }

    // Required-field coverage per entry
    println!("\nCompleteness:");
    for entry in db.entries() {
        if entry.is_complete() {
            println!("  {} ok", entry.key());
        } else {
            for group in entry.missing_fields() {
                println!("  {} missing {}", entry.key(), group.join("/"));
            }
        }
    }

    Ok(())
}
