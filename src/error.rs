//! Error types for the route planner.
//!
//! Every failing concern has its own enum. `ErrorKind` folds them into the
//! coarse categories hosts use to pick a user message.

use thiserror::Error;

/// Message shown when routing fails and the path is drawn as straight lines.
pub const FALLBACK_MESSAGE: &str = "経路の生成に失敗しました。直線で接続します。";

/// Coarse error category for surfacing to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Network,
    Timeout,
    Unknown,
}

impl ErrorKind {
    /// Default user-facing text for this category.
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorKind::Validation => "リクエストが不正です。",
            ErrorKind::NotFound => "要求されたリソースが見つかりません。",
            ErrorKind::Network => "ネットワークエラーが発生しました。接続を確認してください。",
            ErrorKind::Timeout => "Valhalla APIタイムアウト",
            ErrorKind::Unknown => "予期しないエラーが発生しました。",
        }
    }
}

/// Classify an HTTP status the way the UI reports it.
pub fn kind_for_status(status: u16) -> ErrorKind {
    match status {
        400 => ErrorKind::Validation,
        404 => ErrorKind::NotFound,
        401 | 403 => ErrorKind::Network,
        s if s >= 500 => ErrorKind::Network,
        _ => ErrorKind::Unknown,
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolylineError {
    #[error("invalid polyline character {byte:#04x} at index {index}")]
    InvalidCharacter { index: usize, byte: u8 },
    #[error("polyline truncated at index {index}")]
    Truncated { index: usize },
    #[error("polyline value overflows at index {index}")]
    Overflow { index: usize },
}

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("routing request timed out")]
    Timeout,
    #[error("routing request failed: {0}")]
    Network(#[source] reqwest::Error),
    #[error("routing service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected routing response: {0}")]
    Decode(String),
    #[error("route shape could not be decoded: {0}")]
    Polyline(#[from] PolylineError),
    #[error("at least two points are required")]
    InsufficientPoints,
}

impl From<reqwest::Error> for RoutingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RoutingError::Timeout
        } else if err.is_decode() {
            RoutingError::Decode(err.to_string())
        } else {
            RoutingError::Network(err)
        }
    }
}

impl RoutingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RoutingError::Timeout => ErrorKind::Timeout,
            RoutingError::Network(_) => ErrorKind::Network,
            RoutingError::Status { status, .. } => kind_for_status(*status),
            RoutingError::InsufficientPoints => ErrorKind::Validation,
            RoutingError::Decode(_) | RoutingError::Polyline(_) => ErrorKind::Unknown,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            RoutingError::InsufficientPoints => "最低2つのポイントが必要です".to_string(),
            RoutingError::Status { status, body } => format!("Valhalla APIエラー: {} {}", status, body),
            other => other.kind().default_message().to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored routes could not be serialized: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("route {0} not found")]
    NotFound(String),
    #[error("invalid route data: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("malformed route JSON: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ArchiveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArchiveError::NotFound(_) => ErrorKind::NotFound,
            ArchiveError::Validation(_) | ArchiveError::Malformed(_) => ErrorKind::Validation,
            ArchiveError::Storage(_) => ErrorKind::Unknown,
        }
    }

    /// Text for direct display. Validation errors are surfaced verbatim.
    pub fn user_message(&self) -> String {
        match self {
            ArchiveError::NotFound(_) => "経路が見つかりません".to_string(),
            ArchiveError::Validation(errors) => errors.join("\n"),
            ArchiveError::Malformed(_) => "無効なJSONフォーマットです".to_string(),
            ArchiveError::Storage(_) => ErrorKind::Unknown.default_message().to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("address search timed out")]
    Timeout,
    #[error("address search failed: {0}")]
    Network(#[source] reqwest::Error),
    #[error("address search returned {0}")]
    Status(u16),
}

impl From<reqwest::Error> for GeocodingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeocodingError::Timeout
        } else {
            GeocodingError::Network(err)
        }
    }
}

impl GeocodingError {
    pub fn user_message(&self) -> String {
        match self {
            GeocodingError::Timeout => "住所検索がタイムアウトしました".to_string(),
            GeocodingError::Network(err) => format!("住所検索エラー: {}", err),
            GeocodingError::Status(status) => format!("住所検索エラー: {}", status),
        }
    }
}
