//! Saved-route archive: save, list, load, delete, export and import.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::ArchiveError;
use crate::point::{Point, new_id, timestamp};
use crate::traits::RouteStorage;
use crate::validate::{MAX_NAME_LENGTH, validate_import};

/// A named route snapshot. Points and path are copies taken at save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRoute {
    pub id: String,
    pub name: String,
    /// (latitude, longitude) pairs.
    #[serde(rename = "routeLine")]
    pub path: Vec<(f64, f64)>,
    pub points: Vec<Point>,
    pub created_at: String,
    pub updated_at: String,
}

/// What the editor needs to reopen a saved route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteData {
    pub points: Vec<Point>,
    pub path: Vec<(f64, f64)>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<SavedRoute> for RouteData {
    fn from(route: SavedRoute) -> Self {
        Self {
            points: route.points,
            path: route.path,
            created_at: route.created_at,
            updated_at: route.updated_at,
        }
    }
}

/// Which end of the collection imported routes go to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportPosition {
    Before,
    #[default]
    After,
}

/// The saved-route collection over an injected storage backend.
///
/// Construct one per session and pass it to whatever needs it.
#[derive(Debug)]
pub struct RouteArchive<S> {
    storage: S,
}

impl<S: RouteStorage> RouteArchive<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Save a snapshot under a fresh id, appended after existing routes.
    pub fn save(
        &self,
        name: &str,
        points: &[Point],
        path: &[(f64, f64)],
    ) -> Result<SavedRoute, ArchiveError> {
        let name = name.trim();
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ArchiveError::Validation(vec![format!(
                "nameが{}文字を超えています",
                MAX_NAME_LENGTH
            )]));
        }

        let now = timestamp();
        let route = SavedRoute {
            id: new_id(),
            name: name.to_string(),
            path: path.to_vec(),
            points: points.to_vec(),
            created_at: now.clone(),
            updated_at: now,
        };
        self.storage.put(route.clone())?;
        info!(id = %route.id, points = route.points.len(), "route saved");
        Ok(route)
    }

    /// Routes in collection order.
    pub fn list(&self) -> Result<Vec<SavedRoute>, ArchiveError> {
        Ok(self.storage.list()?)
    }

    /// Routes sorted by creation time, newest first.
    pub fn list_newest_first(&self) -> Result<Vec<SavedRoute>, ArchiveError> {
        let mut routes = self.list()?;
        routes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(routes)
    }

    pub fn get(&self, id: &str) -> Result<SavedRoute, ArchiveError> {
        self.storage
            .get(id)?
            .ok_or_else(|| ArchiveError::NotFound(id.to_string()))
    }

    pub fn load(&self, id: &str) -> Result<RouteData, ArchiveError> {
        self.get(id).map(RouteData::from)
    }

    /// The most recently appended route, if any.
    pub fn latest(&self) -> Result<Option<RouteData>, ArchiveError> {
        Ok(self.list()?.pop().map(RouteData::from))
    }

    /// Remove a route. Unknown ids are ignored.
    pub fn delete(&self, id: &str) -> Result<(), ArchiveError> {
        self.storage.delete(id)?;
        info!(id, "route deleted");
        Ok(())
    }

    /// The whole collection as JSON indented by two spaces.
    pub fn export_all(&self) -> Result<String, ArchiveError> {
        let routes = self.list()?;
        serde_json::to_string_pretty(&routes).map_err(ArchiveError::Malformed)
    }

    /// Import routes from JSON and return how many were added.
    ///
    /// The payload is validated first and rejected as a whole on any error.
    /// Imported routes get new ids and a fresh `updated_at`, so importing
    /// the same export twice adds two independent copies.
    pub fn import(&self, json: &str, position: ImportPosition) -> Result<usize, ArchiveError> {
        let value: Value = serde_json::from_str(json).map_err(ArchiveError::Malformed)?;

        let result = validate_import(&value);
        if !result.valid {
            warn!(errors = result.errors.len(), "import rejected");
            return Err(ArchiveError::Validation(result.errors));
        }

        let imported: Vec<SavedRoute> =
            serde_json::from_value(value).map_err(ArchiveError::Malformed)?;
        let now = timestamp();
        let imported: Vec<SavedRoute> = imported
            .into_iter()
            .map(|route| SavedRoute {
                id: new_id(),
                updated_at: now.clone(),
                ..route
            })
            .collect();
        let count = imported.len();

        self.storage.splice(imported, position)?;

        info!(count, ?position, "routes imported");
        Ok(count)
    }
}
