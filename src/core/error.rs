use thiserror::Error;

/// Failure to fetch or decode a model asset.
///
/// Never retried: the controller logs it and leaves the scene empty until the
/// next navigation.
#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error("fetch {url} failed: {reason}")]
    Fetch { url: String, reason: String },
    #[error("fetch {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("invalid glTF: {0}")]
    Parse(String),
    #[error("glTF contains no triangle primitives")]
    Empty,
}
