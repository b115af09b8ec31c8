use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// A `groupId:artifactId:version` triple identifying a published module
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinates {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl Coordinates {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// A dependency declared by a module descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    /// Empty for the main artifact
    pub classifier: String,
    pub scope: String,
    pub optional: bool,
}

impl Dependency {
    /// Whether both records point at the same artifact (group, artifact, classifier).
    pub fn same_identity(&self, other: &Dependency) -> bool {
        self.group_id == other.group_id
            && self.artifact_id == other.artifact_id
            && self.classifier == other.classifier
    }

    /// Whether the resolved attributes (version, scope, optional flag) agree.
    pub fn attributes_equal(&self, other: &Dependency) -> bool {
        self.version == other.version
            && self.scope == other.scope
            && self.optional == other.optional
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)?;
        if !self.classifier.is_empty() {
            write!(f, ":{}", self.classifier)?;
        }
        write!(f, " ({}", self.scope)?;
        if self.optional {
            f.write_str(", optional")?;
        }
        f.write_str(")")
    }
}

/// Keys present on only one side once shared keys cancelled out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diff<T> {
    pub only_in_left: Vec<T>,
    pub only_in_right: Vec<T>,
}

impl<T> Diff<T> {
    pub fn new(only_in_left: Vec<T>, only_in_right: Vec<T>) -> Self {
        Self {
            only_in_left,
            only_in_right,
        }
    }

    pub fn has_same_entries(&self) -> bool {
        self.only_in_left.is_empty() && self.only_in_right.is_empty()
    }
}

impl<T> Default for Diff<T> {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl<T: fmt::Display> Diff<T> {
    /// Render an indented block listing the keys of each side, right side first.
    pub fn describe(&self, title: &str, left_label: &str, right_label: &str) -> String {
        let mut message = format!("{}:", title);
        append_section(&mut message, &format!("Only in {}", right_label), &self.only_in_right);
        append_section(&mut message, &format!("Only in {}", left_label), &self.only_in_left);
        message
    }
}

/// Append a `\n\t<heading>:` section with one `\t\t` line per item, if any.
pub fn append_section<T: fmt::Display>(message: &mut String, heading: &str, items: &[T]) {
    if items.is_empty() {
        return;
    }
    message.push_str(&format!("\n\t{}:", heading));
    for item in items {
        message.push_str(&format!("\n\t\t{}", item));
    }
}

/// A manifest attribute present on both sides with different values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueMismatch {
    pub key: String,
    pub left_value: String,
    pub right_value: String,
}

impl ValueMismatch {
    pub fn describe(&self, left_name: &str, right_name: &str) -> String {
        format!(
            "'{}': '{}' ({}) vs. '{}' ({})",
            self.key, self.left_value, left_name, self.right_value, right_name
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManifestDiff {
    pub only_in_left: Vec<String>,
    pub only_in_right: Vec<String>,
    pub value_mismatches: Vec<ValueMismatch>,
}

impl ManifestDiff {
    pub fn has_same_entries(&self) -> bool {
        self.only_in_left.is_empty()
            && self.only_in_right.is_empty()
            && self.value_mismatches.is_empty()
    }
}

/// Two dependencies with the same identity that resolved differently
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyMismatch {
    pub left: Dependency,
    pub right: Dependency,
}

impl fmt::Display for DependencyMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs. {}", self.left, self.right)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PomDiff {
    pub only_in_left: Vec<Dependency>,
    pub only_in_right: Vec<Dependency>,
    pub mismatches: Vec<DependencyMismatch>,
}

impl PomDiff {
    pub fn has_same_entries(&self) -> bool {
        self.only_in_left.is_empty() && self.only_in_right.is_empty() && self.mismatches.is_empty()
    }
}

/// Outcome of comparing the two archives published for one classifier
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveDiff {
    pub classifier: String,
    /// Left archive, relative to the left root
    pub left: PathBuf,
    /// Right archive, relative to the right root
    pub right: PathBuf,
    pub entries: Diff<String>,
    pub manifest: ManifestDiff,
}

impl ArchiveDiff {
    pub fn has_same_entries(&self) -> bool {
        self.entries.has_same_entries() && self.manifest.has_same_entries()
    }
}

/// Human label for a classifier: `main` for the primary archive.
pub fn classifier_label(classifier: &str) -> String {
    if classifier.is_empty() {
        "main".to_string()
    } else {
        format!("'{}'", classifier)
    }
}

/// A classifier whose archives could not be compared
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveFailure {
    pub classifier: String,
    pub reason: String,
}

/// A module directory on each side; `None` when the side lacks the module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    pub name: String,
    pub left: Option<PathBuf>,
    pub right: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleDiff {
    pub module: Module,
    pub files: Diff<String>,
    pub pom: PomDiff,
    pub archives: Vec<ArchiveDiff>,
    pub archive_failures: Vec<ArchiveFailure>,
}

impl ModuleDiff {
    /// A module whose right side is missing: every left file is reported.
    pub fn missing_right(module: Module, left_files: Vec<String>) -> Self {
        Self {
            module,
            files: Diff::new(left_files, Vec::new()),
            pom: PomDiff::default(),
            archives: Vec::new(),
            archive_failures: Vec::new(),
        }
    }

    pub fn only_in_left(&self) -> &[String] {
        &self.files.only_in_left
    }

    pub fn only_in_right(&self) -> &[String] {
        &self.files.only_in_right
    }

    pub fn has_same_entries(&self) -> bool {
        self.module.left.is_some()
            && self.module.right.is_some()
            && self.files.has_same_entries()
            && self.pom.has_same_entries()
    }

    pub fn has_archive_mismatches(&self) -> bool {
        !self.archive_failures.is_empty()
            || self.archives.iter().any(|archive| !archive.has_same_entries())
    }
}

/// Entry diff of an auxiliary bundle compared outside the module tree
#[derive(Debug, Clone, Serialize)]
pub struct BundleDiff {
    pub title: String,
    pub left: PathBuf,
    pub right: PathBuf,
    pub entries: Diff<String>,
}

/// Result of a full deployment run
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentReport {
    pub group_id: String,
    pub version: String,
    pub left_name: String,
    pub right_name: String,
    pub modules: Vec<ModuleDiff>,
    /// Modules only present on the right side
    pub only_in_right: Vec<String>,
    pub bundles: Vec<BundleDiff>,
}

impl DeploymentReport {
    pub fn is_clean(&self) -> bool {
        self.only_in_right.is_empty()
            && self
                .modules
                .iter()
                .all(|module| module.has_same_entries() && !module.has_archive_mismatches())
            && self.bundles.iter().all(|bundle| bundle.entries.has_same_entries())
    }

    pub fn mismatching_modules(&self) -> impl Iterator<Item = &ModuleDiff> {
        self.modules
            .iter()
            .filter(|module| !module.has_same_entries() || module.has_archive_mismatches())
    }
}

/// Glob patterns suppressing keys on either side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRules {
    #[serde(default)]
    pub ignore_in_left: Vec<String>,

    #[serde(default)]
    pub ignore_in_right: Vec<String>,
}

impl FilterRules {
    pub fn is_empty(&self) -> bool {
        self.ignore_in_left.is_empty() && self.ignore_in_right.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomFilterConfig {
    /// Do not report optional dependencies missing from the right side
    #[serde(default = "default_true")]
    pub ignore_optional_in_left: bool,

    /// Do not report optional dependencies missing from the left side
    #[serde(default)]
    pub ignore_optional_in_right: bool,
}

impl Default for PomFilterConfig {
    fn default() -> Self {
        Self {
            ignore_optional_in_left: true,
            ignore_optional_in_right: false,
        }
    }
}

/// An archive pair compared by entry names only.
///
/// Paths are relative to the group directory of each side; `{version}` is
/// replaced by the release version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleConfig {
    pub title: String,
    pub left: String,
    pub right: String,
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Display name of the left deployment
    #[serde(default = "default_left_name")]
    pub left_name: String,

    /// Display name of the right deployment
    #[serde(default = "default_right_name")]
    pub right_name: String,

    /// Dotted group id whose modules are compared
    #[serde(default)]
    pub group_id: Option<String>,

    /// Require every directory on the group path to hold a single child
    #[serde(default = "default_true")]
    pub unique_group_path: bool,

    /// Dependency scopes taken into account
    #[serde(default = "default_included_scopes")]
    pub included_scopes: Vec<String>,

    /// Entry filters per archive classifier ("" is the main archive)
    #[serde(default = "default_archive_filters")]
    pub archive_filters: BTreeMap<String, FilterRules>,

    /// Filter applied to the files of a module version directory
    #[serde(default = "default_module_filter")]
    pub module_filter: FilterRules,

    #[serde(default)]
    pub pom_filter: PomFilterConfig,

    #[serde(default)]
    pub bundles: Vec<BundleConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            left_name: default_left_name(),
            right_name: default_right_name(),
            group_id: None,
            unique_group_path: true,
            included_scopes: default_included_scopes(),
            archive_filters: default_archive_filters(),
            module_filter: default_module_filter(),
            pom_filter: PomFilterConfig::default(),
            bundles: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_left_name() -> String {
    "Maven".to_string()
}

fn default_right_name() -> String {
    "Gradle".to_string()
}

fn default_included_scopes() -> Vec<String> {
    ["compile", "compile+runtime", "runtime"]
        .iter()
        .map(|scope| scope.to_string())
        .collect()
}

fn default_archive_filters() -> BTreeMap<String, FilterRules> {
    let mut filters = BTreeMap::new();
    filters.insert(
        String::new(),
        FilterRules {
            ignore_in_left: vec!["*package-info.class".to_string()],
            ignore_in_right: Vec::new(),
        },
    );
    filters.insert(
        "javadoc".to_string(),
        FilterRules {
            ignore_in_left: vec!["*/class-use/*".to_string(), "*/package-use.html".to_string()],
            ignore_in_right: Vec::new(),
        },
    );
    filters
}

fn default_module_filter() -> FilterRules {
    FilterRules {
        ignore_in_left: Vec::new(),
        ignore_in_right: ["*.sha256", "*.sha512", "*.md5", "*.module", "*.module.sha1"]
            .iter()
            .map(|suffix| suffix.to_string())
            .collect(),
    }
}
