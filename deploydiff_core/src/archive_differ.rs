use crate::deployment::GroupDeployment;
use crate::diff::diff;
use crate::vfs::archive::require_file;
use deploydiff_common::{
    append_section, classifier_label, ArchiveDiff, ArchiveError, ArchiveReader, ManifestDiff,
    MismatchFilter, ValueMismatch,
};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Compares the two archives published for one classifier of a module.
pub struct ArchiveDiffer<'a> {
    deployment: &'a GroupDeployment,
    reader: &'a dyn ArchiveReader,
    left: PathBuf,
    right: PathBuf,
    classifier: String,
}

impl<'a> ArchiveDiffer<'a> {
    pub fn new(
        deployment: &'a GroupDeployment,
        reader: &'a dyn ArchiveReader,
        left: impl Into<PathBuf>,
        right: impl Into<PathBuf>,
        classifier: impl Into<String>,
    ) -> Self {
        Self {
            deployment,
            reader,
            left: left.into(),
            right: right.into(),
            classifier: classifier.into(),
        }
    }

    /// Diffs the entry names with `entries_filter`, then the manifest main
    /// attributes. Mismatches are logged and returned, never raised.
    pub fn diff(
        &self,
        entries_filter: &dyn MismatchFilter<String>,
    ) -> Result<ArchiveDiff, ArchiveError> {
        let kind = classifier_label(&self.classifier);
        debug!("Checking {} archives", kind);

        let entries = diff(
            &entry_names(self.reader, &self.left)?,
            &entry_names(self.reader, &self.right)?,
            entries_filter,
        );
        let left_path = self.deployment.relativize_left(&self.left);
        let right_path = self.deployment.relativize_right(&self.right);

        if entries.has_same_entries() {
            debug!("Identical entries for {} archives", kind);
        } else {
            let mut message = format!("Mismatch between {} archives:", kind);
            append_section(
                &mut message,
                &format!(
                    "Only in {} archive ({})",
                    self.deployment.right_name(),
                    right_path.display()
                ),
                &entries.only_in_right,
            );
            append_section(
                &mut message,
                &format!(
                    "Only in {} archive ({})",
                    self.deployment.left_name(),
                    left_path.display()
                ),
                &entries.only_in_left,
            );
            error!("{}", message);
        }

        let manifest = diff_manifest(
            &self.reader.manifest_attributes(&self.left)?,
            &self.reader.manifest_attributes(&self.right)?,
        );
        if manifest.has_same_entries() {
            debug!("Identical manifest entries for {} archives", kind);
        } else {
            let mut message = format!("Mismatch between manifest of {} archives:", kind);
            let mismatches: Vec<String> = manifest
                .value_mismatches
                .iter()
                .map(|mismatch| {
                    mismatch.describe(self.deployment.left_name(), self.deployment.right_name())
                })
                .collect();
            append_section(&mut message, "Values mismatches", &mismatches);
            append_section(
                &mut message,
                &format!(
                    "Only in {} manifest ({})",
                    self.deployment.right_name(),
                    right_path.display()
                ),
                &manifest.only_in_right,
            );
            append_section(
                &mut message,
                &format!(
                    "Only in {} manifest ({})",
                    self.deployment.left_name(),
                    left_path.display()
                ),
                &manifest.only_in_left,
            );
            error!("{}", message);
        }

        Ok(ArchiveDiff {
            classifier: self.classifier.clone(),
            left: left_path,
            right: right_path,
            entries,
            manifest,
        })
    }
}

fn entry_names(reader: &dyn ArchiveReader, path: &Path) -> Result<Vec<String>, ArchiveError> {
    require_file(path)?;
    reader.entry_names(path)
}

/// Compares two attribute maps: a key missing on one side is reported for the
/// other side, a key present on both with different values is a mismatch.
///
/// Attribute names match ignoring ASCII case; the left spelling is reported
/// for keys present on both sides.
pub fn diff_manifest(
    left: &BTreeMap<String, String>,
    right: &BTreeMap<String, String>,
) -> ManifestDiff {
    let left_keys = lowercase_keys(left);
    let right_keys = lowercase_keys(right);

    let mut result = ManifestDiff::default();
    for (key, left_value) in left {
        match right_keys.get(&key.to_ascii_lowercase()) {
            None => result.only_in_left.push(key.clone()),
            Some(right_key) => {
                let right_value = &right[*right_key];
                if right_value != left_value {
                    result.value_mismatches.push(ValueMismatch {
                        key: key.clone(),
                        left_value: left_value.clone(),
                        right_value: right_value.clone(),
                    });
                }
            }
        }
    }
    result.only_in_right = right
        .keys()
        .filter(|key| !left_keys.contains_key(&key.to_ascii_lowercase()))
        .cloned()
        .collect();
    result
}

fn lowercase_keys(attributes: &BTreeMap<String, String>) -> HashMap<String, &String> {
    attributes
        .keys()
        .map(|key| (key.to_ascii_lowercase(), key))
        .collect()
}
