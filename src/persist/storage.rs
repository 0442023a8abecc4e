use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use super::format::{read_terms, write_terms};
use crate::{
    config::StorageConfig,
    error::Result,
    types::{IndexSnapshot, Term},
};

/// Where a dictionary keeps its terms and definition index between runs.
pub trait Storage {
    /// All stored terms. An absent store is an empty dictionary.
    fn load_terms(&self) -> Result<Vec<Term>>;

    fn save_terms(&mut self, terms: &[&Term]) -> Result<()>;

    /// The persisted index, or `None` if there is none yet.
    fn load_index(&self) -> Result<Option<IndexSnapshot>>;

    fn save_index(&mut self, snapshot: &IndexSnapshot) -> Result<()>;
}

/// Terms in the line format and the index as JSON, at the configured paths.
#[derive(Debug, Clone)]
pub struct FileStorage {
    config: StorageConfig,
}

impl FileStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

fn open_existing(path: &Path) -> Result<Option<File>> {
    match File::open(path) {
        Ok(file) => Ok(Some(file)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn create_with_parents(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(File::create(path)?)
}

impl Storage for FileStorage {
    fn load_terms(&self) -> Result<Vec<Term>> {
        match open_existing(&self.config.terms_path)? {
            Some(file) => read_terms(BufReader::new(file)),
            None => Ok(Vec::new()),
        }
    }

    fn save_terms(&mut self, terms: &[&Term]) -> Result<()> {
        let file = create_with_parents(&self.config.terms_path)?;
        write_terms(BufWriter::new(file), terms.iter().copied())
    }

    fn load_index(&self) -> Result<Option<IndexSnapshot>> {
        match open_existing(&self.config.index_path)? {
            Some(file) => Ok(Some(serde_json::from_reader(BufReader::new(file))?)),
            None => Ok(None),
        }
    }

    fn save_index(&mut self, snapshot: &IndexSnapshot) -> Result<()> {
        let mut writer = BufWriter::new(create_with_parents(&self.config.index_path)?);
        serde_json::to_writer(&mut writer, snapshot)?;
        writer.flush()?;
        Ok(())
    }
}

/// In-process storage, mostly for tests. Writes can be made to fail on demand.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    pub terms: Vec<Term>,
    pub index: Option<IndexSnapshot>,
    pub fail_writes: bool,
    /// Fail only `save_index`, leaving term saves working.
    pub fail_index_writes: bool,
    /// Successful `save_terms` calls.
    pub term_saves: usize,
}

impl MemoryStorage {
    pub fn with_terms(terms: Vec<Term>) -> Self {
        Self {
            terms,
            ..Self::default()
        }
    }

    fn check_writable(&self, failing: bool) -> Result<()> {
        if self.fail_writes || failing {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "storage is read-only").into());
        }
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn load_terms(&self) -> Result<Vec<Term>> {
        Ok(self.terms.clone())
    }

    fn save_terms(&mut self, terms: &[&Term]) -> Result<()> {
        self.check_writable(false)?;
        self.terms = terms.iter().map(|term| (*term).clone()).collect();
        self.term_saves += 1;
        Ok(())
    }

    fn load_index(&self) -> Result<Option<IndexSnapshot>> {
        Ok(self.index.clone())
    }

    fn save_index(&mut self, snapshot: &IndexSnapshot) -> Result<()> {
        self.check_writable(self.fail_index_writes)?;
        self.index = Some(snapshot.clone());
        Ok(())
    }
}
