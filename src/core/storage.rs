//! # Book Storage
//!
//! One JSON file per book in a flat data directory (`~/.placebooks/` by default).
//!
//! The filename is derived from the book name via [`sanitize`], so the name is
//! the identity: saving a book overwrites whatever file its name maps to.
//! Listing is a directory scan. There is no index file to keep in sync.
//!
//! All writes use atomic rename (write `.tmp`, then `rename()`) for crash safety.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::core::model::Book;

/// Extension of persisted book files. Anything else in the directory is ignored.
const BOOK_EXTENSION: &str = "json";

/// Errors from reading or writing book files.
#[derive(Debug)]
pub enum StorageError {
    /// Filesystem failure on the given path.
    Io { path: PathBuf, source: io::Error },
    /// The book could not be encoded as JSON.
    Serialize(serde_json::Error),
    /// A file exists but is not a valid book document.
    Parse { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io { path, source } => {
                write!(f, "I/O error on {}: {source}", path.display())
            }
            StorageError::Serialize(e) => write!(f, "could not encode book: {e}"),
            StorageError::Parse { path, source } => {
                write!(f, "could not parse {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io { source, .. } => Some(source),
            StorageError::Serialize(e) => Some(e),
            StorageError::Parse { source, .. } => Some(source),
        }
    }
}

/// Map a book name to a filesystem-safe file stem.
///
/// Every character that is not alphanumeric becomes `_`. The mapping is
/// per character, so the output has as many characters as the input and
/// applying it twice changes nothing.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Handle on the directory that holds the book files.
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file a book with this name is stored in.
    pub fn book_path(&self, name: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", sanitize(name), BOOK_EXTENSION))
    }

    /// Creates the data directory (and parents) if it is missing.
    pub fn ensure_dir(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir).map_err(|source| StorageError::Io {
            path: self.data_dir.clone(),
            source,
        })
    }

    /// Every readable book in the data directory, in directory-listing order.
    ///
    /// Files that fail to read or parse are skipped with a warning. A missing
    /// or unreadable directory yields an empty list.
    pub fn list_books(&self) -> Vec<Book> {
        if let Err(e) = self.ensure_dir() {
            warn!("Failed to prepare data directory: {}", e);
            return Vec::new();
        }

        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to list {}: {}", self.data_dir.display(), e);
                return Vec::new();
            }
        };

        let mut books = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    warn!("Skipping unreadable directory entry: {}", e);
                    continue;
                }
            };
            if !is_book_file(&path) {
                continue;
            }
            match read_book(&path) {
                Ok(book) => books.push(book),
                Err(e) => warn!("Skipping book file: {}", e),
            }
        }

        debug!(
            "Listed {} books from {}",
            books.len(),
            self.data_dir.display()
        );
        books
    }

    /// Load the book stored under `name`'s derived filename.
    pub fn load_book(&self, name: &str) -> Result<Book, StorageError> {
        read_book(&self.book_path(name))
    }

    /// Write `book` to its derived filename, replacing any existing file.
    ///
    /// If the file currently holds a book with a different name (the two
    /// names sanitize to the same stem) it is still overwritten, but the
    /// collision is logged.
    pub fn save_book(&self, book: &Book) -> Result<PathBuf, StorageError> {
        self.ensure_dir()?;
        let path = self.book_path(&book.name);

        if path.exists()
            && let Ok(existing) = read_book(&path)
            && existing.name != book.name
        {
            warn!(
                "Book '{}' overwrites '{}' (both stored as {})",
                book.name,
                existing.name,
                path.display()
            );
        }

        atomic_write_json(&path, book)?;
        debug!("Saved book '{}' to {}", book.name, path.display());
        Ok(path)
    }
}

fn is_book_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == BOOK_EXTENSION)
}

fn read_book(path: &Path) -> Result<Book, StorageError> {
    let json = fs::read_to_string(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| StorageError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Encode `data` as JSON indented with four spaces.
fn to_indented_json<T: Serialize>(data: &T) -> Result<Vec<u8>, StorageError> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    data.serialize(&mut ser).map_err(StorageError::Serialize)?;
    Ok(buf)
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> Result<(), StorageError> {
    let tmp_path = path.with_extension("tmp");
    let json = to_indented_json(data)?;
    fs::write(&tmp_path, json).map_err(|source| StorageError::Io {
        path: tmp_path.clone(),
        source,
    })?;
    fs::rename(&tmp_path, path).map_err(|source| {
        let _ = fs::remove_file(&tmp_path);
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}
