//! Types command - manage the variation-type list.

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use collatio::service::FileTypeStore;
use collatio::{HttpBackend, ServiceConfig, VariationTypeCatalog, VariationTypeStore};

use crate::cli::TypesAction;

pub fn run(
    types: PathBuf,
    service_url: Option<String>,
    action: Option<TypesAction>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store: Arc<dyn VariationTypeStore> = match service_url {
        Some(url) => Arc::new(HttpBackend::new(&ServiceConfig::new(url))?),
        None => Arc::new(FileTypeStore::new(&types)),
    };

    if verbose {
        println!("Using {} variation-type store", store.name());
    }

    let mut catalog = VariationTypeCatalog::load(store)?;

    match action.unwrap_or(TypesAction::List) {
        TypesAction::List => {}
        TypesAction::Add { label } => {
            catalog.add(&label)?;
            println!("{} {}", "Added".green().bold(), label.trim().white());
        }
        TypesAction::Rename { number, label } => {
            let index = to_index(number, catalog.len())?;
            let old = catalog.list()[index].clone();
            catalog.rename(index, &label)?;
            println!(
                "{} {} {} {}",
                "Renamed".green().bold(),
                old.white(),
                "→".dimmed(),
                label.trim().white()
            );
        }
        TypesAction::Delete { number } => {
            let index = to_index(number, catalog.len())?;
            let old = catalog.list()[index].clone();
            catalog.delete(index)?;
            println!("{} {}", "Deleted".green().bold(), old.white());
        }
    }

    println!();
    println!("{}", "Variation types".cyan().bold());
    for (i, label) in catalog.list().iter().enumerate() {
        println!("  {:>2}. {}", i + 1, label);
    }

    Ok(())
}

/// Convert a 1-based list number to an index.
fn to_index(number: usize, len: usize) -> Result<usize, Box<dyn std::error::Error>> {
    if number == 0 || number > len {
        return Err(format!("No variation type numbered {} (list has {})", number, len).into());
    }
    Ok(number - 1)
}

#[cfg(test)]
mod tests {
    use collatio::DEFAULT_VARIATION_TYPES;
    use tempfile::TempDir;

    use super::*;

    fn stored(path: &std::path::Path) -> Vec<String> {
        FileTypeStore::new(path)
            .fetch_types()
            .unwrap()
            .unwrap_or_default()
    }

    #[test]
    fn test_to_index() {
        assert_eq!(to_index(1, 3).unwrap(), 0);
        assert_eq!(to_index(3, 3).unwrap(), 2);
        assert!(to_index(0, 3).is_err());
        assert!(to_index(4, 3).is_err());
    }

    #[test]
    fn test_file_backed_add_rename_delete() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings").join("variation_types.json");

        let add = TypesAction::Add {
            label: " Transposition ".to_string(),
        };
        run(path.clone(), None, Some(add), false).unwrap();
        let labels = stored(&path);
        assert_eq!(labels.len(), DEFAULT_VARIATION_TYPES.len() + 1);
        assert_eq!(labels.last().map(String::as_str), Some("Transposition"));

        let rename = TypesAction::Rename {
            number: 1,
            label: "Orthography".to_string(),
        };
        run(path.clone(), None, Some(rename), false).unwrap();
        assert_eq!(stored(&path)[0], "Orthography");

        run(path.clone(), None, Some(TypesAction::Delete { number: 1 }), false).unwrap();
        let labels = stored(&path);
        assert_eq!(labels[0], DEFAULT_VARIATION_TYPES[1]);
        assert!(!labels.iter().any(|l| l == "Orthography"));
    }

    #[test]
    fn test_file_backed_list_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("variation_types.json");

        run(path.clone(), None, None, false).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_out_of_range_number_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("variation_types.json");
        run(
            path.clone(),
            None,
            Some(TypesAction::Add {
                label: "Lacuna".to_string(),
            }),
            false,
        )
        .unwrap();
        let before = stored(&path);

        let result = run(path.clone(), None, Some(TypesAction::Delete { number: 99 }), false);
        assert!(result.is_err());
        assert_eq!(stored(&path), before);
    }
}
