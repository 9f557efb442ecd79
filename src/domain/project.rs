use crate::domain::Version;

/// Last successfully parsed manifest
///
/// Replaced wholesale on every parse; only the version is patched in place,
/// and only by a successful bump.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Project {
    pub name: String,
    /// `None` once the manifest failed to parse or had no usable version
    pub version: Option<Version>,
    /// Whether a manifest location is currently resolved
    pub has_package: bool,
}

impl Project {
    pub fn new(name: impl Into<String>, version: Option<Version>, has_package: bool) -> Self {
        Project {
            name: name.into(),
            version,
            has_package,
        }
    }

    /// Textual version, empty when no version is known.
    pub fn version_text(&self) -> String {
        self.version
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    /// Whether `name`/`version` differ from what this project holds.
    ///
    /// A missing version only counts as unchanged when no version is cached
    /// either.
    pub fn differs_from(&self, name: &str, version: Option<&str>) -> bool {
        let cached = self.version.as_ref().map(|v| v.to_string());
        name != self.name || version != cached.as_deref()
    }
}
