//! Test helpers for composing catalog exports and stub sessions.

use super::*;
use camino::{Utf8Path, Utf8PathBuf};
use eventwise_core::test_support::StaticCatalogSource;
use eventwise_core::{Catalog, CatalogError, CatalogSource, Category, KeyValueStore};
use crate::session::{CatalogConfig, StoreConfig};
use tempfile::TempDir;

/// Evaluation date used by every CLI test.
pub(super) const TODAY: &str = "2025-03-10";

/// Two Technical events: "1" three days out, "2" forty days out.
pub(super) const CAMPUS_EXPORT: &str = r#"[
    { "id": "1", "title": "TechFest",
      "categories": { "name": "Technical", "icon": "💻" },
      "tags": ["AI", "Robotics"], "rating": 4.5, "registrations": 100,
      "society": "TechSoc", "date": "2025-03-13" },
    { "id": "2", "title": "AI Hackathon",
      "categories": { "name": "Technical", "icon": "💻" },
      "tags": ["AI", "Coding"], "rating": 5.0, "registrations": 50,
      "society": "TechSoc", "date": "2025-04-19" }
]"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent directory");
    }
    std::fs::write(path, contents).expect("write file");
}

/// Temporary workspace holding a catalog export and a state directory.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn catalog_path(&self) -> Utf8PathBuf {
        self.root.join("events.json")
    }

    pub(super) fn state_dir(&self) -> Utf8PathBuf {
        self.root.join("state")
    }

    pub(super) fn write_catalog(&self, contents: &str) {
        write_utf8(&self.catalog_path(), contents.as_bytes());
    }
}

/// Session builder serving a fixed catalog and real file-backed preferences.
pub(super) struct StubSessionBuilder {
    catalog: Result<Catalog, CatalogError>,
    categories: Vec<Category>,
}

impl StubSessionBuilder {
    pub(super) fn with_catalog(catalog: Catalog) -> Self {
        Self {
            catalog: Ok(catalog),
            categories: Vec::new(),
        }
    }

    pub(super) fn failing(error: CatalogError) -> Self {
        Self {
            catalog: Err(error),
            categories: Vec::new(),
        }
    }

    pub(super) fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }
}

impl SessionBuilder for StubSessionBuilder {
    fn catalog_source(&self, _config: &CatalogConfig) -> Result<Box<dyn CatalogSource>, CliError> {
        let source = match &self.catalog {
            Ok(catalog) => {
                StaticCatalogSource::new(catalog.clone()).with_categories(self.categories.clone())
            }
            Err(error) => StaticCatalogSource::failing(error.clone()),
        };
        Ok(Box::new(source))
    }

    fn preference_backend(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, CliError> {
        DefaultSessionBuilder.preference_backend(config)
    }
}

/// Parse `argv`, run the command and return the printed JSON.
pub(super) fn run_cli(
    argv: &[String],
    builder: &dyn SessionBuilder,
) -> Result<serde_json::Value, CliError> {
    let cli = Cli::try_parse_from(argv).map_err(CliError::ArgumentParsing)?;
    let mut buffer = Vec::new();
    run_command(cli.command, builder, &mut buffer)?;
    Ok(serde_json::from_slice(&buffer).expect("output should be JSON"))
}

/// Event ids listed under `events` in a command's output.
pub(super) fn printed_ids(output: &serde_json::Value) -> Vec<String> {
    output["events"]
        .as_array()
        .expect("events array")
        .iter()
        .map(|event| event["id"].as_str().expect("string id").to_owned())
        .collect()
}
