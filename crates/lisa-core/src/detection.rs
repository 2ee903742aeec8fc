//! Project-type detection

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::Result;

/// A project type with its own template directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProjectType {
    TypeScript,
    NpmPackage,
    Expo,
    NestJs,
    Cdk,
    Rails,
}

impl ProjectType {
    /// Canonical order: parents before children.
    pub const ORDER: [ProjectType; 6] = [
        Self::TypeScript,
        Self::NpmPackage,
        Self::Expo,
        Self::NestJs,
        Self::Cdk,
        Self::Rails,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::NpmPackage => "npm-package",
            Self::Expo => "expo",
            Self::NestJs => "nestjs",
            Self::Cdk => "cdk",
            Self::Rails => "rails",
        }
    }

    /// The type whose templates this one inherits.
    pub fn parent(&self) -> Option<ProjectType> {
        match self {
            Self::Expo | Self::NestJs | Self::Cdk | Self::NpmPackage => Some(Self::TypeScript),
            Self::TypeScript | Self::Rails => None,
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supplies the ordered list of type labels for a destination.
pub trait TypeDetector {
    fn detect(&self, dest: &Path) -> Result<Vec<String>>;
}

/// Recognizes a single project type.
pub trait ProjectTypeDetector: Send + Sync {
    fn project_type(&self) -> ProjectType;
    fn matches(&self, project: &ProjectFiles) -> bool;
}

/// The parts of a destination detectors look at, read once.
#[derive(Debug, Default)]
pub struct ProjectFiles<'a> {
    root: Option<&'a Path>,
    package: Option<PackageJson>,
}

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    #[serde(default)]
    private: bool,
    main: Option<Value>,
    bin: Option<Value>,
    exports: Option<Value>,
    files: Option<Vec<Value>>,
    #[serde(default)]
    dependencies: Map<String, Value>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: Map<String, Value>,
}

impl<'a> ProjectFiles<'a> {
    /// Inspect `root`. An unreadable or invalid `package.json` counts as absent.
    pub fn load(root: &'a Path) -> Self {
        let package = std::fs::read_to_string(root.join("package.json"))
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok());
        Self {
            root: Some(root),
            package,
        }
    }

    pub fn has_file(&self, relative: &str) -> bool {
        self.root.is_some_and(|root| root.join(relative).exists())
    }

    /// Whether `name` is a dependency or dev dependency.
    pub fn has_dependency(&self, name: &str) -> bool {
        self.package.as_ref().is_some_and(|pkg| {
            pkg.dependencies.contains_key(name) || pkg.dev_dependencies.contains_key(name)
        })
    }

    /// Whether any dependency or dev dependency starts with `prefix`.
    pub fn has_dependency_prefix(&self, prefix: &str) -> bool {
        self.package.as_ref().is_some_and(|pkg| {
            pkg.dependencies
                .keys()
                .chain(pkg.dev_dependencies.keys())
                .any(|name| name.starts_with(prefix))
        })
    }

    /// Whether `package.json` describes a publishable package.
    pub fn is_publishable(&self) -> bool {
        self.package.as_ref().is_some_and(|pkg| {
            !pkg.private
                && (pkg.main.is_some()
                    || pkg.bin.is_some()
                    || pkg.exports.is_some()
                    || pkg.files.as_ref().is_some_and(|files| !files.is_empty()))
        })
    }
}

struct TypeScriptDetector;
struct NpmPackageDetector;
struct ExpoDetector;
struct NestJsDetector;
struct CdkDetector;
struct RailsDetector;

impl ProjectTypeDetector for TypeScriptDetector {
    fn project_type(&self) -> ProjectType {
        ProjectType::TypeScript
    }

    fn matches(&self, project: &ProjectFiles) -> bool {
        project.has_file("tsconfig.json") || project.has_dependency("typescript")
    }
}

impl ProjectTypeDetector for NpmPackageDetector {
    fn project_type(&self) -> ProjectType {
        ProjectType::NpmPackage
    }

    fn matches(&self, project: &ProjectFiles) -> bool {
        project.is_publishable()
    }
}

impl ProjectTypeDetector for ExpoDetector {
    fn project_type(&self) -> ProjectType {
        ProjectType::Expo
    }

    fn matches(&self, project: &ProjectFiles) -> bool {
        project.has_file("app.json") || project.has_file("eas.json") || project.has_dependency("expo")
    }
}

impl ProjectTypeDetector for NestJsDetector {
    fn project_type(&self) -> ProjectType {
        ProjectType::NestJs
    }

    fn matches(&self, project: &ProjectFiles) -> bool {
        project.has_file("nest-cli.json") || project.has_dependency_prefix("@nestjs")
    }
}

impl ProjectTypeDetector for CdkDetector {
    fn project_type(&self) -> ProjectType {
        ProjectType::Cdk
    }

    fn matches(&self, project: &ProjectFiles) -> bool {
        project.has_file("cdk.json") || project.has_dependency_prefix("aws-cdk")
    }
}

impl ProjectTypeDetector for RailsDetector {
    fn project_type(&self) -> ProjectType {
        ProjectType::Rails
    }

    fn matches(&self, project: &ProjectFiles) -> bool {
        project.has_file("bin/rails") || project.has_file("config/application.rb")
    }
}

/// Runs every registered detector and expands the result with parents.
pub struct DetectorRegistry {
    detectors: Vec<Box<dyn ProjectTypeDetector>>,
}

impl DetectorRegistry {
    /// Registry with every built-in detector.
    pub fn new() -> Self {
        Self {
            detectors: vec![
                Box::new(TypeScriptDetector),
                Box::new(NpmPackageDetector),
                Box::new(ExpoDetector),
                Box::new(NestJsDetector),
                Box::new(CdkDetector),
                Box::new(RailsDetector),
            ],
        }
    }

    pub fn with_detectors(detectors: Vec<Box<dyn ProjectTypeDetector>>) -> Self {
        Self { detectors }
    }

    /// Types whose detector matches, in registration order.
    pub fn detect_all(&self, dest: &Path) -> Vec<ProjectType> {
        let project = ProjectFiles::load(dest);
        self.detectors
            .iter()
            .filter(|detector| detector.matches(&project))
            .map(|detector| detector.project_type())
            .collect()
    }

    /// Add parents of every type, deduplicate and sort canonically.
    pub fn expand_and_order(types: &[ProjectType]) -> Vec<ProjectType> {
        ProjectType::ORDER
            .into_iter()
            .filter(|candidate| {
                types
                    .iter()
                    .any(|t| t == candidate || t.parent() == Some(*candidate))
            })
            .collect()
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDetector for DetectorRegistry {
    fn detect(&self, dest: &Path) -> Result<Vec<String>> {
        let detected = self.detect_all(dest);
        let expanded = Self::expand_and_order(&detected);
        debug!(?detected, ?expanded, "Detected project types");
        Ok(expanded.iter().map(|t| t.as_str().to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::tempdir;

    fn detect(files: &[(&str, &str)]) -> Vec<String> {
        let dir = tempdir().unwrap();
        for (path, content) in files {
            lisa_fs::write_text(&dir.path().join(path), content).unwrap();
        }
        DetectorRegistry::new().detect(dir.path()).unwrap()
    }

    #[rstest]
    #[case::tsconfig(&[("tsconfig.json", "{}")], &["typescript"])]
    #[case::ts_dev_dependency(&[("package.json", r#"{"devDependencies": {"typescript": "5"}}"#)], &["typescript"])]
    #[case::expo_app_json(&[("app.json", "{}")], &["typescript", "expo"])]
    #[case::nestjs_scoped(&[("package.json", r#"{"dependencies": {"@nestjs/core": "10"}}"#)], &["typescript", "nestjs"])]
    #[case::cdk_lib(&[("package.json", r#"{"dependencies": {"aws-cdk-lib": "2"}}"#)], &["typescript", "cdk"])]
    #[case::publishable(&[("package.json", r#"{"main": "index.js"}"#)], &["typescript", "npm-package"])]
    #[case::private_package(&[("package.json", r#"{"private": true, "main": "index.js"}"#)], &[])]
    #[case::empty_files(&[("package.json", r#"{"files": []}"#)], &[])]
    #[case::rails(&[("config/application.rb", "")], &["rails"])]
    #[case::nothing(&[], &[])]
    fn test_detection(#[case] files: &[(&str, &str)], #[case] expected: &[&str]) {
        assert_eq!(detect(files), expected);
    }

    #[test]
    fn test_expand_and_order_dedupes_and_sorts() {
        let expanded = DetectorRegistry::expand_and_order(&[
            ProjectType::Cdk,
            ProjectType::Expo,
            ProjectType::TypeScript,
        ]);
        assert_eq!(
            expanded,
            vec![ProjectType::TypeScript, ProjectType::Expo, ProjectType::Cdk]
        );
    }

    #[test]
    fn test_invalid_package_json_is_ignored() {
        assert_eq!(detect(&[("package.json", "{ not json")]), Vec::<String>::new());
    }
}
