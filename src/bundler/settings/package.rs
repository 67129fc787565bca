//! Package metadata and configuration.

/// Package metadata applied to the control file and the output filename.
///
/// Maps from the required fields of the package header file.
///
/// # Examples
///
/// ```
/// use stage_bundler_deb::bundler::PackageSettings;
///
/// let settings = PackageSettings {
///     name: "sample".into(),
///     version: "1.0".into(),
///     maintainer: "Jane Doe".into(),
///     maintainer_email: "jane@example.com".into(),
///     summary: "A sample package".into(),
/// };
/// assert_eq!(settings.maintainer_field(), "Jane Doe <jane@example.com>");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSettings {
    /// Debian package name (`Name:`).
    pub name: String,

    /// Package version (`Version:`).
    pub version: String,

    /// Maintainer display name (`Packager:`).
    pub maintainer: String,

    /// Maintainer email address (`PackagerEmail:`).
    pub maintainer_email: String,

    /// One-line synopsis (`Summary:`).
    pub summary: String,
}

impl PackageSettings {
    /// Value of the control file `Maintainer` field.
    pub fn maintainer_field(&self) -> String {
        format!("{} <{}>", self.maintainer, self.maintainer_email)
    }
}
