use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::record::{Header, MatchRecord, RowIssue};

/// Where the raw text of a competition's dataset comes from.
pub trait DatasetSource: Send + Sync {
    fn read(&self, competition: &str) -> EngineResult<String>;
}

/// One `<competition><suffix>` file per competition under a root directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    suffix: String,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            suffix: suffix.into(),
        }
    }

    pub fn path_for(&self, competition: &str) -> Option<PathBuf> {
        if !is_valid_competition_id(competition) {
            return None;
        }
        Some(self.root.join(format!("{competition}{}", self.suffix)))
    }

    /// Competition ids for which a file exists, sorted.
    pub fn competitions(&self) -> io::Result<Vec<String>> {
        let mut out = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(id) = name.strip_suffix(self.suffix.as_str()) {
                if is_valid_competition_id(id) {
                    out.push(id.to_string());
                }
            }
        }
        out.sort();
        Ok(out)
    }
}

impl DatasetSource for DirectorySource {
    fn read(&self, competition: &str) -> EngineResult<String> {
        let Some(path) = self.path_for(competition) else {
            return Err(EngineError::dataset_not_found(competition));
        };
        fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                EngineError::dataset_not_found(competition)
            } else {
                EngineError::DatasetUnreadable {
                    competition: competition.to_string(),
                    source,
                }
            }
        })
    }
}

fn is_valid_competition_id(id: &str) -> bool {
    !id.trim().is_empty() && !id.contains(['/', '\\']) && !id.contains("..")
}

/// In-memory datasets keyed by competition id.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    datasets: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, competition: &str, text: impl Into<String>) -> Self {
        self.insert(competition, text);
        self
    }

    pub fn insert(&mut self, competition: &str, text: impl Into<String>) {
        self.datasets.insert(competition.to_string(), text.into());
    }
}

impl DatasetSource for MemorySource {
    fn read(&self, competition: &str) -> EngineResult<String> {
        self.datasets
            .get(competition)
            .cloned()
            .ok_or_else(|| EngineError::dataset_not_found(competition))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParsedDataset {
    pub records: Vec<MatchRecord>,
    pub skipped: Vec<RowIssue>,
}

/// Parses a whole dataset. Bad rows are skipped, never fatal.
pub fn parse_records(text: &str, competition: &str) -> ParsedDataset {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let header = match reader.headers() {
        Ok(headers) if headers.is_empty() => return ParsedDataset::default(),
        Ok(headers) => Header::from_record(headers),
        Err(err) => {
            warn!(competition, error = %err, "dataset header unreadable");
            return ParsedDataset::default();
        }
    };
    if !header.has_teams() {
        warn!(competition, "dataset header has no home_team/away_team columns");
        return ParsedDataset::default();
    }

    let mut out = ParsedDataset::default();
    for result in reader.records() {
        let row = match result {
            Ok(row) => row,
            Err(err) => {
                debug!(competition, error = %err, "skipping unreadable row");
                continue;
            }
        };
        let line = row.position().map_or(0, |pos| pos.line() as usize);
        match header.decode(line, &row, competition) {
            Ok(record) => out.records.push(record),
            Err(issue) => {
                debug!(competition, %issue, "skipping row");
                out.skipped.push(issue);
            }
        }
    }
    out
}

/// Load-once cache of parsed datasets, owned by whoever composes the engine.
///
/// Parsing happens outside the lock, so two threads loading the same cold
/// competition may both parse it; the last insert wins and both values are equal.
pub struct RecordStore<S> {
    source: S,
    cache: RwLock<HashMap<String, Arc<[MatchRecord]>>>,
}

impl<S: DatasetSource> RecordStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn load(&self, competition: &str) -> EngineResult<Arc<[MatchRecord]>> {
        if let Some(records) = self.cached(competition) {
            debug!(competition, "dataset cache hit");
            return Ok(records);
        }

        let text = self.source.read(competition).inspect_err(|err| {
            warn!(competition, error = %err, "dataset load failed");
        })?;
        let parsed = parse_records(&text, competition);
        info!(
            competition,
            records = parsed.records.len(),
            skipped = parsed.skipped.len(),
            "dataset parsed"
        );

        let records: Arc<[MatchRecord]> = parsed.records.into();
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(competition.to_string(), Arc::clone(&records));
        Ok(records)
    }

    /// Pre-populates the cache, bypassing the source.
    pub fn seed(&self, competition: &str, records: Vec<MatchRecord>) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(competition.to_string(), records.into());
    }

    pub fn is_cached(&self, competition: &str) -> bool {
        self.cached(competition).is_some()
    }

    pub fn cached_competitions(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    fn cached(&self, competition: &str) -> Option<Arc<[MatchRecord]>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(competition)
            .cloned()
    }
}
