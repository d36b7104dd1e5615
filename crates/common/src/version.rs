use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors produced when parsing a [`Version`]
#[derive(Debug, Error)]
pub enum VersionParseError {
    /// The text is not a `major.minor.patch[-suffix]` version
    #[error("invalid version: {0}")]
    Invalid(#[from] semver::Error),

    /// Build metadata (`+...`) has no meaning for tool versions
    #[error("build metadata is not supported in version '{0}'")]
    BuildMetadata(String),
}

/// Semantic version used to identify a build of the tool
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    /// Major version
    pub major: u64,
    /// Minor version
    pub minor: u64,
    /// Patch version
    pub patch: u64,
    /// Pre-release suffix, such as `dev` or `rc.1`
    pub suffix: Option<Cow<'static, str>>,
}

impl Version {
    /// Version of this build. Kept in sync with the package version.
    pub const CURRENT: Self = Self::new(0, 1, 0);

    /// Create a release version with no suffix
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            suffix: None,
        }
    }

    /// Attach a pre-release suffix
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<Cow<'static, str>>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Whether this is a pre-release
    pub const fn is_prerelease(&self) -> bool {
        self.suffix.is_some()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(suffix) = &self.suffix {
            write!(f, "-{suffix}")?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = semver::Version::parse(s)?;
        if !parsed.build.is_empty() {
            return Err(VersionParseError::BuildMetadata(s.to_string()));
        }

        let version = Self::new(parsed.major, parsed.minor, parsed.patch);
        if parsed.pre.is_empty() {
            Ok(version)
        } else {
            Ok(version.with_suffix(parsed.pre.as_str().to_string()))
        }
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.suffix, &other.suffix) {
                (None, None) => Ordering::Equal,
                // A pre-release sorts before its release
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => compare_suffixes(a, b),
            })
    }
}

/// Orders suffixes by semver precedence (`rc.2 < rc.10`), falling back to a
/// lexical comparison for suffixes that are not valid semver pre-releases.
fn compare_suffixes(a: &str, b: &str) -> Ordering {
    match (semver::Prerelease::new(a), semver::Prerelease::new(b)) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
