//! Catalog store behaviour across the public API

use std::fs;
use std::path::Path;

use bookshelf::{config::StorageConfig, AppError, BookStatus, CatalogService, NewBook, Repository};
use tempfile::TempDir;

fn open(path: &Path) -> CatalogService {
    CatalogService::open(Repository::new(&StorageConfig::new(path))).unwrap()
}

fn catalog_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("library.json")
}

#[test]
fn test_add_remove_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = open(&catalog_path(&dir));
    assert!(catalog.is_empty());

    let dune = catalog.add_book(NewBook::new("Dune", "Herbert", 1965)).unwrap();
    assert_eq!(dune.id(), 1);
    assert_eq!(dune.status(), BookStatus::Available);

    let second = catalog.add_book(NewBook::new("Solaris", "Lem", 1961)).unwrap();
    assert_eq!(second.id(), 2);

    catalog.remove_book(1).unwrap();
    let ids: Vec<i32> = catalog.list_books().iter().map(|b| b.id()).collect();
    assert_eq!(ids, vec![2]);

    let new = catalog.add_book(NewBook::new("New", "Author", 2020)).unwrap();
    assert_eq!(new.id(), 3);
}

#[test]
fn test_ids_strictly_increase_across_removals() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = open(&catalog_path(&dir));

    let mut last = 0;
    for round in 0..5 {
        let id = catalog
            .add_book(NewBook::new(format!("Book {round}"), "Someone", 2000 + round))
            .unwrap()
            .id();
        assert!(id > last);
        last = id;
        if round % 2 == 0 {
            catalog.remove_book(id).unwrap();
        }
    }
    assert_eq!(last, 5);
}

#[test]
fn test_reopen_reproduces_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = catalog_path(&dir);

    let mut catalog = open(&path);
    catalog.add_book(NewBook::new("Дюна", "Херберт", 1965)).unwrap();
    catalog.add_book(NewBook::new("Solaris", "Lem", 1961)).unwrap();
    catalog.add_book(NewBook::new("Ubik", "Dick", 1969)).unwrap();
    catalog.change_status(2, "checked-out").unwrap();
    catalog.remove_book(1).unwrap();
    let before = catalog.list_books().to_vec();

    let reopened = open(&path);
    assert_eq!(reopened.list_books(), before.as_slice());
}

#[test]
fn test_every_mutation_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = catalog_path(&dir);
    let mut catalog = open(&path);

    catalog.add_book(NewBook::new("Dune", "Herbert", 1965)).unwrap();
    assert_eq!(open(&path).len(), 1);

    catalog.change_status(1, "checked-out").unwrap();
    assert_eq!(
        open(&path).find_by_id(1).unwrap().status(),
        BookStatus::CheckedOut
    );

    catalog.remove_book(1).unwrap();
    assert!(open(&path).is_empty());
}

#[test]
fn test_removed_book_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = open(&catalog_path(&dir));
    catalog.add_book(NewBook::new("Dune", "Herbert", 1965)).unwrap();
    catalog.remove_book(1).unwrap();
    assert!(matches!(catalog.find_by_id(1), Err(AppError::NotFound(1))));
    assert!(matches!(catalog.remove_book(1), Err(AppError::NotFound(1))));
}

#[test]
fn test_status_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = open(&catalog_path(&dir));
    catalog.add_book(NewBook::new("Dune", "Herbert", 1965)).unwrap();

    let out = catalog.change_status(1, "checked-out").unwrap().status();
    assert_eq!(out, BookStatus::CheckedOut);
    let back = catalog.change_status(1, "available").unwrap().status();
    assert_eq!(back, BookStatus::Available);
}

#[test]
fn test_invalid_status_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = catalog_path(&dir);
    let mut catalog = open(&path);
    catalog.add_book(NewBook::new("Dune", "Herbert", 1965)).unwrap();
    let on_disk = fs::read_to_string(&path).unwrap();

    let err = catalog.change_status(1, "borrowed").unwrap_err();
    assert!(matches!(err, AppError::InvalidStatus(ref s) if s == "borrowed"));
    assert!(!err.is_fatal());
    assert_eq!(catalog.find_by_id(1).unwrap().status(), BookStatus::Available);
    assert_eq!(fs::read_to_string(&path).unwrap(), on_disk);
}

#[test]
fn test_search_is_case_insensitive_and_ordered() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = open(&catalog_path(&dir));
    catalog.add_book(NewBook::new("The Hobbit", "Tolkien", 1937)).unwrap();
    catalog.add_book(NewBook::new("Dune", "Herbert", 1965)).unwrap();
    catalog.add_book(NewBook::new("Silmarillion", "J.R.R. TOLKIEN", 1977)).unwrap();

    let by_author: Vec<i32> = catalog.search_books("tolkien").iter().map(|b| b.id()).collect();
    assert_eq!(by_author, vec![1, 3]);

    let by_title: Vec<i32> = catalog.search_books("DUNE").iter().map(|b| b.id()).collect();
    assert_eq!(by_title, vec![2]);

    let by_year: Vec<i32> = catalog.search_books("19").iter().map(|b| b.id()).collect();
    assert_eq!(by_year, vec![1, 2, 3]);

    assert!(catalog.search_books("asimov").is_empty());
}

#[test]
fn test_corrupt_file_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = catalog_path(&dir);
    fs::write(&path, "[{\"id\": 1, \"title\": ").unwrap();

    let err = CatalogService::open(Repository::new(&StorageConfig::new(&path))).unwrap_err();
    assert!(matches!(err, AppError::Corrupt { .. }));
    assert!(err.is_fatal());
    // The broken file is left for the user to inspect
    assert_eq!(fs::read_to_string(&path).unwrap(), "[{\"id\": 1, \"title\": ");
}

#[test]
fn test_legacy_catalog_is_upgraded_on_first_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = catalog_path(&dir);
    fs::write(
        &path,
        r#"[
    {
        "id": 1,
        "title": "Идиот",
        "author": "Достоевский",
        "year": 1869,
        "status": "выдана"
    }
]"#,
    )
    .unwrap();

    let mut catalog = open(&path);
    assert_eq!(catalog.find_by_id(1).unwrap().status(), BookStatus::CheckedOut);
    catalog.add_book(NewBook::new("Бесы", "Достоевский", 1872)).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"status\": \"checked-out\""));
    assert!(raw.contains("\"title\": \"Бесы\""));
    assert!(!raw.contains("выдана"));
}

#[cfg(unix)]
#[test]
fn test_unreadable_catalog_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = catalog_path(&dir);
    fs::create_dir(&path).unwrap();

    let err = CatalogService::open(Repository::new(&StorageConfig::new(&path))).unwrap_err();
    assert!(matches!(err, AppError::Io { .. }));
    assert!(err.is_fatal());
}
