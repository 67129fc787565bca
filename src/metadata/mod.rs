//! Package metadata from the package header file.
//!
//! The header is a list of `Key: Value` lines:
//!
//! ```text
//! # comments and blank lines are ignored
//! Name: sample
//! Version: 1.0
//! Packager: Jane Doe
//! PackagerEmail: jane@example.com
//! Summary: A sample package
//! Depends: libc6, libssl3
//! Description:
//!   Extended description, continued on
//!   indented lines.
//! ```
//!
//! Keys are case-insensitive. `Name`, `Version`, `Packager`, `PackagerEmail`
//! and `Summary` are required; `Section`, `Priority`, `URL`, `Depends` and
//! `Description` are optional. Unrecognised keys are ignored.

use std::path::Path;

use crate::bundler::{DebianSettings, Error, PackageSettings, Result, error::ErrorExt};

/// Parsed package header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageHeader {
    /// Required package metadata.
    pub package: PackageSettings,
    /// Optional control file fields.
    pub debian: DebianSettings,
}

/// Loads and parses the header file at `path`.
///
/// # Errors
///
/// [`Error::SpecNotFound`] if the file does not exist, [`Error::SpecParse`]
/// for a malformed line, [`Error::MissingField`] when a required field is
/// absent or empty.
pub fn load_header(path: &Path) -> Result<PackageHeader> {
    if !path.exists() {
        return Err(Error::SpecNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path).fs_context("reading package header", path)?;
    let header = parse_header(path, &contents)?;

    log::info!(
        "Loaded {} {} from {}",
        header.package.name,
        header.package.version,
        path.display()
    );
    Ok(header)
}

/// Parses header `contents`; `path` is only used in error messages.
pub fn parse_header(path: &Path, contents: &str) -> Result<PackageHeader> {
    let mut header = PackageHeader::default();
    let mut description: Option<Vec<String>> = None;

    for (index, line) in contents.lines().enumerate() {
        let line_no = index + 1;

        if line.starts_with([' ', '\t']) && !line.trim().is_empty() {
            match description.as_mut() {
                Some(body) => body.push(line.trim().to_string()),
                None => {
                    return Err(parse_error(path, line_no, "unexpected continuation line"));
                }
            }
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            if let (true, Some(body)) = (trimmed.is_empty(), description.as_mut()) {
                body.push(String::new());
            }
            continue;
        }

        if description.is_some() {
            header.debian.long_description = finish_description(description.take());
        }

        let (key, value) = trimmed.split_once(':').ok_or_else(|| {
            parse_error(path, line_no, format!("expected `Key: Value`, got {trimmed:?}"))
        })?;
        let value = value.trim().to_string();

        match key.trim().to_ascii_lowercase().as_str() {
            "name" => header.package.name = value,
            "version" => header.package.version = value,
            "packager" => header.package.maintainer = value,
            "packageremail" => header.package.maintainer_email = value,
            "summary" => header.package.summary = value,
            "section" => header.debian.section = non_empty(value),
            "priority" => header.debian.priority = non_empty(value),
            "url" | "homepage" => header.debian.homepage = non_empty(value),
            "depends" => {
                let depends: Vec<String> = value
                    .split(',')
                    .map(|dep| dep.trim().to_string())
                    .filter(|dep| !dep.is_empty())
                    .collect();
                header.debian.depends = (!depends.is_empty()).then_some(depends);
            }
            "description" => {
                let mut body = Vec::new();
                if !value.is_empty() {
                    body.push(value);
                }
                description = Some(body);
            }
            other => log::debug!("{}:{}: ignoring key {:?}", path.display(), line_no, other),
        }
    }

    if description.is_some() {
        header.debian.long_description = finish_description(description);
    }

    let package = &header.package;
    for (field, value) in [
        ("Name", &package.name),
        ("Version", &package.version),
        ("Packager", &package.maintainer),
        ("PackagerEmail", &package.maintainer_email),
        ("Summary", &package.summary),
    ] {
        if value.is_empty() {
            return Err(Error::MissingField {
                path: path.to_path_buf(),
                field,
            });
        }
    }

    Ok(header)
}

fn parse_error(path: &Path, line: usize, reason: impl Into<String>) -> Error {
    Error::SpecParse {
        path: path.to_path_buf(),
        line,
        reason: reason.into(),
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Joins description lines, dropping trailing blank lines.
fn finish_description(lines: Option<Vec<String>>) -> Option<String> {
    let mut lines = lines?;
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    (!lines.is_empty()).then(|| lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "Name: sample\n\
                           Version: 1.0\n\
                           Packager: Jane Doe\n\
                           PackagerEmail: jane@example.com\n\
                           Summary: s\n";

    fn parse(contents: &str) -> Result<PackageHeader> {
        parse_header(Path::new("spec/header"), contents)
    }

    #[test]
    fn parses_required_fields() {
        let header = parse(MINIMAL).unwrap();
        assert_eq!(
            header.package,
            PackageSettings {
                name: "sample".into(),
                version: "1.0".into(),
                maintainer: "Jane Doe".into(),
                maintainer_email: "jane@example.com".into(),
                summary: "s".into(),
            }
        );
        assert_eq!(header.debian, DebianSettings::default());
    }

    #[test]
    fn keys_are_case_insensitive_and_comments_skipped() {
        let header = parse(
            "# package header\n\
             name: sample\n\
             VERSION:1.0\n\
             \n\
             packager:   Jane Doe  \n\
             packageremail: jane@example.com\n\
             SUMMARY: s\n\
             License: MIT\n",
        )
        .unwrap();
        assert_eq!(header.package.version, "1.0");
        assert_eq!(header.package.maintainer, "Jane Doe");
    }

    #[test]
    fn parses_optional_fields() {
        let contents = format!(
            "{MINIMAL}Section: utils\nURL: https://example.com\nDepends: libc6 (>= 2.31), , libssl3\n\
             Description:\n  First line.\n\n  Second paragraph.\n\nPriority: extra\n"
        );
        let debian = parse(&contents).unwrap().debian;

        assert_eq!(debian.section.as_deref(), Some("utils"));
        assert_eq!(debian.priority.as_deref(), Some("extra"));
        assert_eq!(debian.homepage.as_deref(), Some("https://example.com"));
        assert_eq!(
            debian.depends,
            Some(vec!["libc6 (>= 2.31)".to_string(), "libssl3".to_string()])
        );
        assert_eq!(
            debian.long_description.as_deref(),
            Some("First line.\n\nSecond paragraph.")
        );
    }

    #[test]
    fn missing_field_is_reported() {
        let err = parse("Name: sample\nVersion: 1.0\nPackager: x\nSummary: s\n").unwrap_err();
        assert!(matches!(
            err,
            Error::MissingField {
                field: "PackagerEmail",
                ..
            }
        ));
    }

    #[test]
    fn empty_field_counts_as_missing() {
        let contents = MINIMAL.replace("Summary: s", "Summary:");
        assert!(matches!(
            parse(&contents),
            Err(Error::MissingField { field: "Summary", .. })
        ));
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let err = parse("Name: sample\nnot a header line\n").unwrap_err();
        assert!(matches!(err, Error::SpecParse { line: 2, .. }));
        assert!(err.to_string().starts_with("spec/header:2: "));
    }

    #[test]
    fn stray_continuation_is_rejected() {
        assert!(matches!(
            parse("  dangling\n"),
            Err(Error::SpecParse { line: 1, .. })
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_header(&dir.path().join("spec/header")).unwrap_err();
        assert!(matches!(err, Error::SpecNotFound(_)));
    }
}
