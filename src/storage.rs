//! `RouteStorage` implementations.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::warn;

use crate::archive::{ImportPosition, SavedRoute};
use crate::error::StorageError;
use crate::traits::RouteStorage;

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StorageError> {
    mutex.lock().map_err(|_| StorageError::Poisoned)
}

fn upsert(routes: &mut Vec<SavedRoute>, route: SavedRoute) {
    match routes.iter_mut().find(|r| r.id == route.id) {
        Some(existing) => *existing = route,
        None => routes.push(route),
    }
}

fn splice_at(routes: &mut Vec<SavedRoute>, added: Vec<SavedRoute>, position: ImportPosition) {
    match position {
        ImportPosition::Before => {
            let existing = std::mem::replace(routes, added);
            routes.extend(existing);
        }
        ImportPosition::After => routes.extend(added),
    }
}

/// Routes kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    routes: Mutex<Vec<SavedRoute>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_routes(routes: Vec<SavedRoute>) -> Self {
        Self {
            routes: Mutex::new(routes),
        }
    }
}

impl RouteStorage for MemoryStorage {
    fn list(&self) -> Result<Vec<SavedRoute>, StorageError> {
        Ok(lock(&self.routes)?.clone())
    }

    fn get(&self, id: &str) -> Result<Option<SavedRoute>, StorageError> {
        Ok(lock(&self.routes)?.iter().find(|r| r.id == id).cloned())
    }

    fn put(&self, route: SavedRoute) -> Result<(), StorageError> {
        upsert(&mut *lock(&self.routes)?, route);
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), StorageError> {
        lock(&self.routes)?.retain(|r| r.id != id);
        Ok(())
    }

    fn replace_all(&self, routes: Vec<SavedRoute>) -> Result<(), StorageError> {
        *lock(&self.routes)? = routes;
        Ok(())
    }

    fn splice(&self, routes: Vec<SavedRoute>, position: ImportPosition) -> Result<(), StorageError> {
        splice_at(&mut *lock(&self.routes)?, routes, position);
        Ok(())
    }
}

/// Routes kept in a JSON file.
///
/// A missing or unreadable file reads as an empty collection. An unreadable
/// file is moved to [`JsonFileStorage::corrupt_path`] before the next write.
/// Writes go to a temporary file that is renamed over the existing file.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    guard: Mutex<()>,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unreadable route file is moved before it is overwritten.
    pub fn corrupt_path(&self) -> PathBuf {
        self.path.with_extension("corrupt")
    }

    fn read(&self) -> Result<Vec<SavedRoute>, StorageError> {
        Ok(self.read_parsed()?.unwrap_or_default())
    }

    /// `None` when the file exists but does not parse.
    fn read_parsed(&self) -> Result<Option<Vec<SavedRoute>>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Some(Vec::new())),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_slice(&bytes) {
            Ok(routes) => Ok(Some(routes)),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring unreadable route file");
                Ok(None)
            }
        }
    }

    fn write(&self, routes: &[SavedRoute]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("tmp");
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        serde_json::to_writer_pretty(&mut writer, routes)?;
        writer.flush()?;
        drop(writer);
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn modify<F>(&self, change: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut Vec<SavedRoute>),
    {
        let _guard = lock(&self.guard)?;
        let mut routes = match self.read_parsed()? {
            Some(routes) => routes,
            None => {
                let aside = self.corrupt_path();
                fs::rename(&self.path, &aside)?;
                warn!(path = %self.path.display(), moved_to = %aside.display(), "moved unreadable route file aside");
                Vec::new()
            }
        };
        change(&mut routes);
        self.write(&routes)
    }
}

impl RouteStorage for JsonFileStorage {
    fn list(&self) -> Result<Vec<SavedRoute>, StorageError> {
        let _guard = lock(&self.guard)?;
        self.read()
    }

    fn get(&self, id: &str) -> Result<Option<SavedRoute>, StorageError> {
        Ok(self.list()?.into_iter().find(|r| r.id == id))
    }

    fn put(&self, route: SavedRoute) -> Result<(), StorageError> {
        self.modify(|routes| upsert(routes, route))
    }

    fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.modify(|routes| routes.retain(|r| r.id != id))
    }

    fn replace_all(&self, routes: Vec<SavedRoute>) -> Result<(), StorageError> {
        self.modify(|existing| *existing = routes)
    }

    fn splice(&self, routes: Vec<SavedRoute>, position: ImportPosition) -> Result<(), StorageError> {
        self.modify(|existing| splice_at(existing, routes, position))
    }
}
