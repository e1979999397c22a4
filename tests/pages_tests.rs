use bibfolio::pages::{self, PagesConfig};
use bibfolio::Database;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};

const PAPERS: &str = include_str!("fixtures/papers.bib");

fn fresh_site(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("bibfolio_site_{name}_{}", std::process::id()));
    if root.exists() {
        fs::remove_dir_all(&root).unwrap();
    }
    fs::create_dir_all(&root).unwrap();
    root
}

fn owner_config() -> PagesConfig {
    PagesConfig {
        self_names: vec!["James Doss-Gollin".to_string()],
        group_members: vec!["Yuchen Lu".to_string()],
        ..PagesConfig::default()
    }
}

fn qmd_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|dent| dent.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".qmd"))
        .collect();
    names.sort();
    names
}

#[test]
fn pages_land_in_routing_directories() {
    let root = fresh_site("routing");
    let db = Database::parse(PAPERS).unwrap();

    let stats = pages::render(&db, &owner_config(), &root).unwrap();
    assert_eq!(stats.written, 6);
    assert_eq!(stats.removed, 0);

    let base = root.join("publications");
    assert_eq!(
        qmd_files(&base.join("article")),
        ["dossgollin2024flood.qmd", "lu2023variability.qmd"]
    );
    assert_eq!(qmd_files(&base.join("conference")), ["dossgollin2023egu.qmd"]);
    assert_eq!(
        qmd_files(&base.join("forthcoming")),
        ["doe2025storm.qmd", "vandenberg2024levee.qmd"]
    );
    assert_eq!(qmd_files(&base.join("other")), ["dossgollin2020thesis.qmd"]);

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn pages_decorate_names_and_links() {
    let root = fresh_site("content");
    let db = Database::parse(PAPERS).unwrap();
    pages::render(&db, &owner_config(), &root).unwrap();

    let flood = fs::read_to_string(
        root.join("publications").join("article").join("dossgollin2024flood.qmd"),
    )
    .unwrap();
    assert!(flood.contains("title: \"What Does ENSO Teach Us About Flood Risk?\""));
    assert!(flood.contains("  - \"**James Doss-Gollin**\"\n"));
    assert!(flood.contains("  - Klaus Keller\n"));
    assert!(flood.contains("date: 2024-03-15\n"));
    assert!(flood.contains("details: \"Water Resources Research\"\n"));
    assert!(flood.contains("'DOI: 10.1029/2023WR036000 (Open Access)'"));
    assert!(flood.contains("    - icon: github\n"));

    let lu = fs::read_to_string(
        root.join("publications").join("article").join("lu2023variability.qmd"),
    )
    .unwrap();
    assert!(lu.contains("  - \"*Yuchen Lu*\"\n"));
    assert!(lu.contains("  - \"**James Doss-Gollin**\"\n"));

    let levee = fs::read_to_string(
        root.join("publications").join("forthcoming").join("vandenberg2024levee.qmd"),
    )
    .unwrap();
    assert!(levee.contains("  - Hans van den Berg\n"));
    assert!(levee.contains("    - text: Preprint\n"));
    assert!(levee.contains("date: 2024-11\n"));
    assert!(levee.contains("year: 2024\n"));

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn cover_images_are_discovered() {
    let root = fresh_site("images");
    let assets = root.join("_assets").join("img").join("pubs");
    fs::create_dir_all(&assets).unwrap();
    fs::write(assets.join("dossgollin2024flood.png"), b"png").unwrap();

    let db = Database::parse(PAPERS).unwrap();
    let stats = pages::render(&db, &owner_config(), &root).unwrap();
    assert_eq!(stats.images_found, 1);
    assert_eq!(stats.images_missing, 5);

    let flood = fs::read_to_string(
        root.join("publications").join("article").join("dossgollin2024flood.qmd"),
    )
    .unwrap();
    assert!(flood.contains("image: ../../_assets/img/pubs/dossgollin2024flood.png\n"));

    let lu = fs::read_to_string(
        root.join("publications").join("article").join("lu2023variability.qmd"),
    )
    .unwrap();
    assert!(!lu.contains("image:"));

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn stale_pages_are_removed_first() {
    let root = fresh_site("stale");
    let article_dir = root.join("publications").join("article");
    fs::create_dir_all(&article_dir).unwrap();
    fs::write(article_dir.join("retracted2019.qmd"), "old page").unwrap();
    fs::write(article_dir.join("notes.txt"), "keep me").unwrap();

    let db = Database::parse(PAPERS).unwrap();
    let stats = pages::render(&db, &owner_config(), &root).unwrap();

    assert_eq!(stats.removed, 1);
    assert!(!article_dir.join("retracted2019.qmd").exists());
    assert!(article_dir.join("notes.txt").exists());
    assert!(article_dir.join("dossgollin2024flood.qmd").exists());

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn rendering_twice_replaces_every_page() {
    let root = fresh_site("rerender");
    let db = Database::parse(PAPERS).unwrap();

    let first = pages::render(&db, &owner_config(), &root).unwrap();
    assert_eq!(first.written, 6);
    assert_eq!(first.removed, 0);

    let second = pages::render(&db, &owner_config(), &root).unwrap();
    assert_eq!(second.written, 6);
    assert_eq!(second.removed, 6);

    fs::remove_dir_all(&root).unwrap();
}
