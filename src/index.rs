use std::fmt;
use std::time::Duration;
use semver::Version;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use crate::error::{Result, SetupError};
use crate::fetch::{MirrorFetcher, Transport};
use crate::platform::Platform;

/// Name of the manifest file on every mirror.
pub const INDEX_FILE: &str = "index.json";
/// Version token that resolves to the newest release.
pub const LATEST: &str = "latest";
/// Index key of the nightly development build.
pub const MASTER: &str = "master";

/// Download metadata for one platform of one version.
///
/// `shasum` and `size` are carried as published; nothing verifies them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuildDescriptor {
    /// The URL of the archive. Its last path segment names the file on the mirrors.
    pub tarball: String,
    #[serde(default)]
    pub shasum: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
}

/// One version entry of the index: its builds keyed by `<arch>-<os>`,
/// plus the scalar metadata the manifest publishes next to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformBuildMap {
    /// Concrete version string, only published for `master`.
    pub version: Option<String>,
    pub date: Option<String>,
    builds: Vec<(String, BuildDescriptor)>,
}

impl PlatformBuildMap {
    pub fn get(&self, key: &str) -> Option<&BuildDescriptor> {
        self.builds.iter().find(|(k, _)| k == key).map(|(_, b)| b)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.builds.iter().map(|(k, _)| k.as_str())
    }

    /// Human-readable name of the entry stored under `key`: the concrete
    /// version when the index publishes one (`master`), plus its date.
    pub fn describe(&self, key: &str) -> String {
        let version = self.version.as_deref().unwrap_or(key);
        match &self.date {
            Some(date) => format!("{version} ({date})"),
            None => version.to_string(),
        }
    }
}

/// How `latest` is picked from the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LatestStrategy {
    /// First non-`master` key in document order.
    #[default]
    DocumentOrder,
    /// Highest key that parses as a semantic version.
    Semver,
}

/// All known versions in the order the manifest lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionIndex {
    entries: Vec<(String, PlatformBuildMap)>,
}

impl VersionIndex {
    /// Parses a manifest document.
    pub fn from_slice(bytes: &[u8]) -> Result<VersionIndex> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn get(&self, version: &str) -> Option<&PlatformBuildMap> {
        self.entries.iter().find(|(k, _)| k == version).map(|(_, v)| v)
    }

    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Turns a requested token into a concrete index key.
    ///
    /// `latest` is substituted according to `strategy`, every other token is
    /// passed through unchanged and must be a key of the index.
    ///
    /// # Errors
    ///
    /// [`SetupError::UnknownVersion`] if the token is not in the index, or if
    /// `latest` was requested and the index holds no release.
    pub fn resolve_version(&self, token: &str, strategy: LatestStrategy) -> Result<String> {
        if token == LATEST {
            let latest = match strategy {
                LatestStrategy::DocumentOrder => self.versions().find(|v| *v != MASTER),
                LatestStrategy::Semver => self
                    .versions()
                    .filter(|v| *v != MASTER)
                    .filter_map(|v| Version::parse(v).ok().map(|parsed| (parsed, v)))
                    .max_by(|(a, _), (b, _)| a.cmp(b))
                    .map(|(_, v)| v),
            };
            return latest
                .map(str::to_string)
                .ok_or_else(|| SetupError::UnknownVersion(LATEST.to_string()));
        }
        if self.get(token).is_none() {
            return Err(SetupError::UnknownVersion(token.to_string()));
        }
        Ok(token.to_string())
    }

    /// Looks up the build of `version` for `platform`.
    pub fn build_for(&self, version: &str, platform: &Platform) -> Result<&BuildDescriptor> {
        let builds = self
            .get(version)
            .ok_or_else(|| SetupError::UnknownVersion(version.to_string()))?;
        let key = platform.key();
        builds.get(&key).ok_or(SetupError::UnsupportedBuild {
            version: version.to_string(),
            key,
        })
    }
}

/// Downloads and parses the index through the mirrors.
///
/// # Errors
///
/// [`SetupError::IndexUnavailable`] if no mirror serves it, or
/// [`SetupError::IndexParse`] for a malformed document.
pub fn fetch_index<T: Transport>(fetcher: &MirrorFetcher<T>, timeout: Duration) -> Result<VersionIndex> {
    let bytes = fetcher.fetch(INDEX_FILE, timeout).map_err(|e| match e {
        SetupError::AllMirrorsFailed { .. } => SetupError::IndexUnavailable,
        other => other,
    })?;
    let index = VersionIndex::from_slice(&bytes)?;
    debug!("Index lists {} versions", index.entries.len());
    Ok(index)
}

impl<'de> Deserialize<'de> for VersionIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct IndexVisitor;

        impl<'de> Visitor<'de> for IndexVisitor {
            type Value = VersionIndex;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of versions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::new();
                while let Some((version, builds)) = map.next_entry::<String, PlatformBuildMap>()? {
                    entries.push((version, builds));
                }
                Ok(VersionIndex { entries })
            }
        }

        deserializer.deserialize_map(IndexVisitor)
    }
}

impl<'de> Deserialize<'de> for PlatformBuildMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct BuildsVisitor;

        impl<'de> Visitor<'de> for BuildsVisitor {
            type Value = PlatformBuildMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of platform builds")
            }

            // Only objects with a `tarball` become builds. Anything else
            // apart from string `version` and `date` values is dropped.
            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
                let mut out = PlatformBuildMap::default();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    match value {
                        Value::String(v) if key == "version" => out.version = Some(v),
                        Value::String(d) if key == "date" => out.date = Some(d),
                        Value::Object(obj) => {
                            if let Ok(build) = serde_json::from_value::<BuildDescriptor>(Value::Object(obj)) {
                                out.builds.push((key, build));
                            }
                        }
                        _ => {}
                    }
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(BuildsVisitor)
    }
}
