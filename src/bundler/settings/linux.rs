//! Linux platform-specific settings.

/// Default control file section.
pub const DEFAULT_SECTION: &str = "misc";

/// Default control file priority.
pub const DEFAULT_PRIORITY: &str = "optional";

/// Debian package (.deb) configuration.
///
/// Optional control file fields taken from the package header. Every field
/// has a usable default, so an empty `DebianSettings` still produces a valid
/// control file.
///
/// # Header Keys
///
/// ```text
/// Section: utils
/// Priority: optional
/// URL: https://example.com
/// Depends: libc6 (>= 2.31), libssl3
/// Description:
///  Longer text shown by package managers.
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DebianSettings {
    /// Package dependencies in Debian syntax.
    ///
    /// Example: `["libc6 (>= 2.31)", "libssl3"]`
    ///
    /// Default: None
    pub depends: Option<Vec<String>>,

    /// Debian control file section.
    ///
    /// Default: None (uses "misc")
    pub section: Option<String>,

    /// Package priority in Debian repository.
    ///
    /// Default: None (uses "optional")
    pub priority: Option<String>,

    /// Upstream homepage, written as `Homepage`.
    ///
    /// Default: None
    pub homepage: Option<String>,

    /// Extended description lines following the summary.
    ///
    /// Default: None
    pub long_description: Option<String>,
}

impl DebianSettings {
    /// Section, falling back to [`DEFAULT_SECTION`].
    pub fn section(&self) -> &str {
        self.section.as_deref().unwrap_or(DEFAULT_SECTION)
    }

    /// Priority, falling back to [`DEFAULT_PRIORITY`].
    pub fn priority(&self) -> &str {
        self.priority.as_deref().unwrap_or(DEFAULT_PRIORITY)
    }
}
