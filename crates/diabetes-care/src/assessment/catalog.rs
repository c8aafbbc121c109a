use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

const EMBEDDED_CATALOG: &str = include_str!("../../data/home_remedies.csv");

/// One informational entry shown alongside a positive verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryEntry {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

/// Immutable, ordered list of advisory entries loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdvisoryCatalog {
    entries: Vec<AdvisoryEntry>,
}

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Csv(csv::Error),
    BlankTitle { row: usize },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(err) => write!(f, "failed to read advisory catalog: {}", err),
            CatalogError::Csv(err) => write!(f, "invalid advisory catalog CSV: {}", err),
            CatalogError::BlankTitle { row } => {
                write!(f, "advisory catalog row {} has no title", row)
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(err) => Some(err),
            CatalogError::Csv(err) => Some(err),
            CatalogError::BlankTitle { .. } => None,
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl AdvisoryCatalog {
    /// The home-remedy list bundled with the crate.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_reader(EMBEDDED_CATALOG.as_bytes())
    }

    /// Loads `path` when given, otherwise the embedded list.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::embedded(),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut entries = Vec::new();

        for (index, record) in csv_reader.deserialize::<AdvisoryEntry>().enumerate() {
            let entry = record?;
            if entry.title.is_empty() {
                // header is line 1
                return Err(CatalogError::BlankTitle { row: index + 2 });
            }
            entries.push(entry);
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[AdvisoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
