use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Component, Path, PathBuf};

/// File-system collaborator: opens slides by name as readable streams.
///
/// Failing to open is recoverable; the engine reports it and skips the transition.
pub trait SlideSource {
    /// Open the slide called `name` for reading.
    fn open(&mut self, name: &str) -> io::Result<Box<dyn Read + '_>>;
}

/// Slides stored as files below a root directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Source rooted at `root`; nothing is touched until a slide is opened.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory slides are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `name` below the root. Absolute names and `..` components are refused.
    pub fn resolve(&self, name: &str) -> io::Result<PathBuf> {
        let rel = Path::new(name);
        if name.is_empty()
            || rel
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("slide name '{name}' must be a relative path inside the slide root"),
            ));
        }
        Ok(self.root.join(rel))
    }
}

impl SlideSource for DirSource {
    fn open(&mut self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        let path = self.resolve(name)?;
        let f = File::open(&path)?;
        Ok(Box::new(BufReader::new(f)))
    }
}

/// In-memory slides keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the slide `name`.
    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> &mut Self {
        self.files.insert(name.into(), bytes);
        self
    }

    /// Builder form of [`MemorySource::insert`].
    pub fn with(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(name, bytes);
        self
    }

    /// Stored slide names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}

impl SlideSource for MemorySource {
    fn open(&mut self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        match self.files.get(name) {
            Some(bytes) => Ok(Box::new(Cursor::new(bytes.as_slice()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no slide named '{name}'"),
            )),
        }
    }
}
