/// User profile shown in the header
///
/// The profile arrives once from a `ProfileSource` (the readiness signal).
/// The avatar template carries a `{size}` placeholder that is replaced
/// with a fixed pixel size.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Avatar size substituted into the template, in pixels
pub const AVATAR_SIZE: u32 = 80;

/// Name shown when no profile could be obtained
pub const FALLBACK_NAME: &str = "Guest";

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed profile: {0}")]
    Json(#[from] serde_json::Error),
    #[error("profile signal did not resolve within {0:?}")]
    Timeout(Duration),
}

/// Payload delivered by the readiness signal. Extra fields are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProfileData {
    pub name: String,
    pub avatar_template: String,
}

/// Display-ready profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    /// Concrete avatar URL; empty when unknown
    pub avatar_url: String,
    /// The avatar as an existing local file, when the URL names one
    pub avatar_file: Option<PathBuf>,
}

impl Profile {
    /// Only the first `{size}` placeholder is substituted.
    pub fn from_data(data: ProfileData) -> Self {
        let avatar_url = data
            .avatar_template
            .replacen("{size}", &AVATAR_SIZE.to_string(), 1);
        Self {
            avatar_file: local_avatar(&avatar_url),
            avatar_url,
            name: data.name,
        }
    }

    pub fn fallback() -> Self {
        Self {
            name: FALLBACK_NAME.to_string(),
            avatar_url: String::new(),
            avatar_file: None,
        }
    }

    /// Upper-cased first letter of the name, shown in place of the avatar image
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

/// `file://` URLs and plain paths that exist on disk. Remote URLs yield None.
fn local_avatar(url: &str) -> Option<PathBuf> {
    let path = match url.strip_prefix("file://") {
        Some(path) => path,
        None if url.is_empty() || url.contains("://") => return None,
        None => url,
    };
    Path::new(path).is_file().then(|| PathBuf::from(path))
}

/// Resolves once with the user's profile data
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn ready(&self) -> Result<ProfileData, ProfileError>;
}

/// Reads the profile payload from a JSON file
#[derive(Debug, Clone)]
pub struct FileProfileSource {
    path: PathBuf,
}

impl FileProfileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ProfileSource for FileProfileSource {
    async fn ready(&self) -> Result<ProfileData, ProfileError> {
        let json = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Wait for the profile signal, giving up after `timeout`.
pub async fn try_load_profile(
    source: &dyn ProfileSource,
    timeout: Duration,
) -> Result<Profile, ProfileError> {
    let data = tokio::time::timeout(timeout, source.ready())
        .await
        .map_err(|_| ProfileError::Timeout(timeout))??;
    Ok(Profile::from_data(data))
}

/// Load the profile, falling back to a guest profile on any failure
pub async fn load_profile(source: &dyn ProfileSource, timeout: Duration) -> Profile {
    match try_load_profile(source, timeout).await {
        Ok(profile) => {
            tracing::info!(name = %profile.name, "profile loaded");
            profile
        }
        Err(e) => {
            tracing::warn!(error = %e, "profile unavailable, using fallback");
            Profile::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource(ProfileData);

    #[async_trait]
    impl ProfileSource for FixedSource {
        async fn ready(&self) -> Result<ProfileData, ProfileError> {
            Ok(self.0.clone())
        }
    }

    /// Never resolves
    struct PendingSource;

    #[async_trait]
    impl ProfileSource for PendingSource {
        async fn ready(&self) -> Result<ProfileData, ProfileError> {
            std::future::pending().await
        }
    }

    fn data() -> ProfileData {
        ProfileData {
            name: "sam".to_string(),
            avatar_template: "/user_avatar/forum/sam/{size}/42.png".to_string(),
        }
    }

    #[test]
    fn test_avatar_size_substitution() {
        let profile = Profile::from_data(data());
        assert_eq!(profile.avatar_url, "/user_avatar/forum/sam/80/42.png");
        assert_eq!(profile.name, "sam");
        assert_eq!(profile.initial(), "S");
        assert_eq!(profile.avatar_file, None);
    }

    #[test]
    fn test_only_first_placeholder_is_substituted() {
        let profile = Profile::from_data(ProfileData {
            name: "sam".to_string(),
            avatar_template: "https://cdn.example/{size}/a_{size}.png".to_string(),
        });
        assert_eq!(profile.avatar_url, "https://cdn.example/80/a_{size}.png");
    }

    #[test]
    fn test_local_avatar_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let avatar = dir.path().join("avatar_80.png");
        std::fs::write(&avatar, b"png").unwrap();
        let template = dir.path().join("avatar_{size}.png");

        let profile = Profile::from_data(ProfileData {
            name: "sam".to_string(),
            avatar_template: template.to_string_lossy().into_owned(),
        });
        assert_eq!(profile.avatar_file.as_deref(), Some(avatar.as_path()));

        let file_url = format!("file://{}", avatar.display());
        assert_eq!(local_avatar(&file_url), Some(avatar.clone()));
        assert_eq!(local_avatar("https://cdn.example/80.png"), None);
        assert_eq!(local_avatar(""), None);
        assert_eq!(local_avatar(&dir.path().join("missing.png").to_string_lossy()), None);
    }

    #[tokio::test]
    async fn test_load_from_source() {
        let profile = load_profile(&FixedSource(data()), Duration::from_secs(1)).await;
        assert_eq!(profile.avatar_url, "/user_avatar/forum/sam/80/42.png");
    }

    #[tokio::test]
    async fn test_pending_signal_times_out() {
        let result = try_load_profile(&PendingSource, Duration::from_millis(10)).await;
        assert!(matches!(result, Err(ProfileError::Timeout(_))));

        let profile = load_profile(&PendingSource, Duration::from_millis(10)).await;
        assert_eq!(profile, Profile::fallback());
    }

    #[tokio::test]
    async fn test_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(
            &path,
            r#"{"name":"Ada","avatar_template":"https://cdn.example/{size}.png","username":"ada"}"#,
        )
        .unwrap();

        let profile = load_profile(&FileProfileSource::new(&path), Duration::from_secs(1)).await;
        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.avatar_url, "https://cdn.example/80.png");
    }

    #[tokio::test]
    async fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileProfileSource::new(dir.path().join("absent.json"));

        let result = try_load_profile(&source, Duration::from_secs(1)).await;
        assert!(matches!(result, Err(ProfileError::Io(_))));
        assert_eq!(load_profile(&source, Duration::from_secs(1)).await, Profile::fallback());
    }
}
