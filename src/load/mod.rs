//! Reading manifests and rule files from disk.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use serde_json::Value;
use walkdir::WalkDir;

use crate::{object::Object, rules::RuleSet};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode rules in {}: {source}", path.display())]
    Rules {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Loads every object from the `.yaml`/`.yml` files below `root`.
///
/// Files are visited in file name order so that repeated runs see the
/// objects in the same order. A file may hold several documents separated
/// by `---`. Documents that cannot be decoded or have no identity are
/// skipped with a warning; failing to read a file is an error.
pub fn load_objects(root: &Path) -> Result<Vec<Object>, LoadError> {
    let mut objects = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| LoadError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !is_yaml(path) {
            tracing::warn!(path = %path.display(), "skipping non-yaml file");
            continue;
        }

        let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let loaded = parse_objects(path, &content);
        tracing::debug!(path = %path.display(), objects = loaded.len(), "loaded manifests");
        objects.extend(loaded);
    }

    Ok(objects)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    )
}

fn parse_objects(path: &Path, content: &str) -> Vec<Object> {
    let mut objects = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(content).enumerate() {
        let value = match Value::deserialize(document) {
            Ok(Value::Null) => continue,
            Ok(value) => value,
            Err(e) => {
                // the rest of the stream is unreadable after a syntax error
                tracing::warn!(path = %path.display(), document = index, "failed to decode yaml: {e}");
                break;
            }
        };
        match Object::new(value) {
            Ok(object) => objects.push(object),
            Err(e) => {
                tracing::warn!(path = %path.display(), document = index, "skipping document: {e}");
            }
        }
    }

    objects
}

/// Loads and merges rule files in the given order, then desugars the result.
pub fn load_rule_set<P: AsRef<Path>>(paths: &[P]) -> Result<RuleSet, LoadError> {
    let mut rule_set = RuleSet::default();

    for path in paths {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            continue;
        }
        let rules: RuleSet = serde_yaml::from_str(&content).map_err(|source| LoadError::Rules {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), rules = rules.len(), "loaded rules");
        rule_set.merge(rules);
    }

    Ok(rule_set.desugar())
}
