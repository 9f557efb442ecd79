use crate::error::{ProjectVersionError, Result};
use std::fmt;
use std::str::FromStr;

/// Upper bound shared by every version component.
pub const MAX_COMPONENT: u32 = 999_999_999;

/// One of the three numeric parts of a version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Major,
    Minor,
    Patch,
}

impl Component {
    pub const ALL: [Component; 3] = [Component::Major, Component::Minor, Component::Patch];

    pub fn name(&self) -> &'static str {
        match self {
            Component::Major => "major",
            Component::Minor => "minor",
            Component::Patch => "patch",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Component {
    type Err = ProjectVersionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "major" => Ok(Component::Major),
            "minor" => Ok(Component::Minor),
            "patch" => Ok(Component::Patch),
            _ => Err(ProjectVersionError::config(format!(
                "Unknown version component '{}': expected major, minor or patch",
                s
            ))),
        }
    }
}

/// Semantic version with bounded components
///
/// Each component stays within `0..=max_component` at all times. Operations
/// that would break the bound are rejected before anything is mutated.
///
/// In strict mode only `MAJOR.MINOR.PATCH` is accepted. Otherwise a semver
/// pre-release and/or build suffix is allowed and kept verbatim.
#[derive(Debug, Clone)]
pub struct Version {
    major: u32,
    minor: u32,
    patch: u32,
    suffix: String,
    strict: bool,
    max_component: u32,
}

impl Version {
    /// Create a strict version from three components.
    ///
    /// # Returns
    /// * `Err(InvalidVersion)` - If any component exceeds [`MAX_COMPONENT`]
    pub fn new(major: u32, minor: u32, patch: u32) -> Result<Self> {
        Self::with_max_component(major, minor, patch, MAX_COMPONENT)
    }

    /// Create a strict version whose components are capped at `max_component`.
    pub fn with_max_component(major: u32, minor: u32, patch: u32, max_component: u32) -> Result<Self> {
        for (component, value) in [
            (Component::Major, major),
            (Component::Minor, minor),
            (Component::Patch, patch),
        ] {
            if value > max_component {
                return Err(ProjectVersionError::invalid_version(
                    format!("{}.{}.{}", major, minor, patch),
                    format!("{} {} exceeds the maximum of {}", component, value, max_component),
                ));
            }
        }

        Ok(Version {
            major,
            minor,
            patch,
            suffix: String::new(),
            strict: true,
            max_component,
        })
    }

    /// The `0.0.0` strict version.
    pub fn zero() -> Self {
        Version {
            major: 0,
            minor: 0,
            patch: 0,
            suffix: String::new(),
            strict: true,
            max_component: MAX_COMPONENT,
        }
    }

    /// Parse a version string.
    ///
    /// # Arguments
    /// * `text` - Version text such as `"1.2.3"` (or `"1.2.3-beta.1+build"` when not strict)
    /// * `strict` - Reject pre-release and build metadata
    ///
    /// # Returns
    /// * `Ok(Version)` - Parsed version
    /// * `Err(InvalidVersion)` - Malformed, negative, suffixed in strict mode, or out of bound
    pub fn parse(text: &str, strict: bool) -> Result<Self> {
        Self::parse_with_max(text, strict, MAX_COMPONENT)
    }

    /// Parse a version string with a custom component bound.
    pub fn parse_with_max(text: &str, strict: bool, max_component: u32) -> Result<Self> {
        let parsed = semver::Version::parse(text)
            .map_err(|e| ProjectVersionError::invalid_version(text, e.to_string()))?;

        let has_suffix = !parsed.pre.is_empty() || !parsed.build.is_empty();
        if strict && has_suffix {
            return Err(ProjectVersionError::invalid_version(
                text,
                "pre-release and build metadata are not allowed in strict mode",
            ));
        }

        let bounded = |component: Component, value: u64| -> Result<u32> {
            u32::try_from(value)
                .ok()
                .filter(|v| *v <= max_component)
                .ok_or_else(|| {
                    ProjectVersionError::invalid_version(
                        text,
                        format!("{} {} exceeds the maximum of {}", component, value, max_component),
                    )
                })
        };

        let mut suffix = String::new();
        if !parsed.pre.is_empty() {
            suffix.push('-');
            suffix.push_str(parsed.pre.as_str());
        }
        if !parsed.build.is_empty() {
            suffix.push('+');
            suffix.push_str(parsed.build.as_str());
        }

        Ok(Version {
            major: bounded(Component::Major, parsed.major)?,
            minor: bounded(Component::Minor, parsed.minor)?,
            patch: bounded(Component::Patch, parsed.patch)?,
            suffix,
            strict,
            max_component,
        })
    }

    /// Check whether `text` parses under the given strictness.
    pub fn is_valid(text: &str, strict: bool) -> bool {
        Self::parse(text, strict).is_ok()
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn max_component(&self) -> u32 {
        self.max_component
    }

    /// Pre-release/build suffix including its leading `-` or `+`, empty if none.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Current value of `component`.
    pub fn get(&self, component: Component) -> u32 {
        match component {
            Component::Major => self.major,
            Component::Minor => self.minor,
            Component::Patch => self.patch,
        }
    }

    /// Largest increment that keeps `component` within bound.
    pub fn max_increase(&self, component: Component) -> u32 {
        self.max_component.saturating_sub(self.get(component))
    }

    /// True iff `1 <= by <= max_increase(component)`.
    pub fn can_increase(&self, component: Component, by: u64) -> bool {
        by >= 1 && by <= u64::from(self.max_increase(component))
    }

    /// Increase a single component by `by`.
    ///
    /// Lower components are left untouched: bumping major does not reset minor
    /// or patch. On error the version is unchanged.
    pub fn increase(&mut self, component: Component, by: u64) -> Result<()> {
        if !self.can_increase(component, by) {
            return Err(ProjectVersionError::OutOfRange {
                component,
                by,
                max: self.max_increase(component),
            });
        }

        // can_increase bounds `by` by a u32 difference
        let by = by as u32;
        match component {
            Component::Major => self.major += by,
            Component::Minor => self.minor += by,
            Component::Patch => self.patch += by,
        }
        Ok(())
    }

    /// Replace the whole version with `text`, keeping strictness and bound.
    ///
    /// The version is unchanged if `text` does not parse.
    pub fn set_version(&mut self, text: &str) -> Result<()> {
        *self = Self::parse_with_max(text, self.strict, self.max_component)?;
        Ok(())
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.major == other.major
            && self.minor == other.minor
            && self.patch == other.patch
            && self.suffix == other.suffix
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}{}", self.major, self.minor, self.patch, self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse("1.2.3", true).unwrap();
        assert_eq!(v.major(), 1);
        assert_eq!(v.minor(), 2);
        assert_eq!(v.patch(), 3);
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(Version::parse("1.2", true).is_err());
        assert!(Version::parse("1.2.3.4", true).is_err());
        assert!(Version::parse("a.b.c", true).is_err());
        assert!(Version::parse("-1.2.3", true).is_err());
        assert!(Version::parse("v1.2.3", true).is_err());
        assert!(Version::parse("", true).is_err());
    }

    #[test]
    fn test_version_parse_rejects_out_of_bound() {
        assert!(Version::parse("1000000000.0.0", true).is_err());
        assert!(Version::parse("0.0.99999999999999999999", true).is_err());
        assert!(Version::parse("999999999.999999999.999999999", true).is_ok());
    }

    #[test]
    fn test_strict_rejects_suffix() {
        assert!(Version::parse("1.2.3-beta.1", true).is_err());
        assert!(Version::parse("1.2.3+build.5", true).is_err());
        assert!(!Version::is_valid("1.2.3-rc.1", true));
    }

    #[test]
    fn test_non_strict_keeps_suffix() {
        let v = Version::parse("1.2.3-beta.1+build.5", false).unwrap();
        assert_eq!(v.suffix(), "-beta.1+build.5");
        assert_eq!(v.to_string(), "1.2.3-beta.1+build.5");
    }

    #[test]
    fn test_parse_display_roundtrip() {
        for text in ["0.0.0", "1.2.3", "10.20.30", "999999999.0.1"] {
            let v = Version::parse(text, true).unwrap();
            assert_eq!(v.to_string(), text);
            assert_eq!(Version::parse(&v.to_string(), true).unwrap(), v);
        }
    }

    #[test]
    fn test_new_checks_bound() {
        assert!(Version::new(MAX_COMPONENT, 0, 0).is_ok());
        assert!(Version::new(MAX_COMPONENT + 1, 0, 0).is_err());
        assert!(Version::with_max_component(0, 11, 0, 10).is_err());
    }

    #[test]
    fn test_max_increase() {
        let v = Version::new(1, 2, 3).unwrap();
        assert_eq!(v.max_increase(Component::Major), MAX_COMPONENT - 1);
        assert_eq!(v.max_increase(Component::Minor), MAX_COMPONENT - 2);
        assert_eq!(v.max_increase(Component::Patch), MAX_COMPONENT - 3);
    }

    #[test]
    fn test_can_increase_bounds() {
        let v = Version::with_max_component(0, 5, 0, 10).unwrap();
        assert!(!v.can_increase(Component::Minor, 0));
        assert!(v.can_increase(Component::Minor, 1));
        assert!(v.can_increase(Component::Minor, 5));
        assert!(!v.can_increase(Component::Minor, 6));
    }

    #[test]
    fn test_increase_to_max_then_fail() {
        let mut v = Version::new(1, 2, 3).unwrap();
        let max = v.max_increase(Component::Patch);
        v.increase(Component::Patch, u64::from(max)).unwrap();
        assert_eq!(v.patch(), MAX_COMPONENT);
        assert_eq!(v.max_increase(Component::Patch), 0);

        let err = v.increase(Component::Patch, 1).unwrap_err();
        assert!(matches!(err, ProjectVersionError::OutOfRange { .. }));
        assert_eq!(v.patch(), MAX_COMPONENT);
    }

    #[test]
    fn test_increase_past_max_leaves_version_unchanged() {
        let mut v = Version::new(4, 5, 6).unwrap();
        let over = u64::from(v.max_increase(Component::Major)) + 1;
        assert!(v.increase(Component::Major, over).is_err());
        assert_eq!(v, Version::new(4, 5, 6).unwrap());
    }

    #[test]
    fn test_increase_zero_rejected() {
        let mut v = Version::new(1, 1, 1).unwrap();
        assert!(v.increase(Component::Minor, 0).is_err());
        assert_eq!(v.to_string(), "1.1.1");
    }

    #[test]
    fn test_increase_does_not_cascade() {
        let mut v = Version::new(1, 2, 3).unwrap();
        v.increase(Component::Major, 1).unwrap();
        assert_eq!(v.to_string(), "2.2.3");

        v.increase(Component::Minor, 4).unwrap();
        assert_eq!(v.to_string(), "2.6.3");

        v.increase(Component::Patch, 10).unwrap();
        assert_eq!(v.to_string(), "2.6.13");
    }

    #[test]
    fn test_increase_keeps_suffix() {
        let mut v = Version::parse("1.0.0-alpha", false).unwrap();
        v.increase(Component::Patch, 1).unwrap();
        assert_eq!(v.to_string(), "1.0.1-alpha");
    }

    #[test]
    fn test_set_version_failure_keeps_old() {
        let mut v = Version::new(1, 2, 3).unwrap();
        assert!(v.set_version("nope").is_err());
        assert_eq!(v.to_string(), "1.2.3");

        v.set_version("3.2.1").unwrap();
        assert_eq!(v.to_string(), "3.2.1");
        assert!(v.is_strict());
    }

    #[test]
    fn test_component_from_str() {
        assert_eq!("major".parse::<Component>().unwrap(), Component::Major);
        assert_eq!("Minor".parse::<Component>().unwrap(), Component::Minor);
        assert_eq!("PATCH".parse::<Component>().unwrap(), Component::Patch);
        assert!("build".parse::<Component>().is_err());
    }

    #[test]
    fn test_version_display() {
        let v = Version::new(1, 2, 3).unwrap();
        assert_eq!(v.to_string(), "1.2.3");
        assert_eq!(Version::default().to_string(), "0.0.0");
    }
}
