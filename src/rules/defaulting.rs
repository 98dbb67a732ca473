use std::{
    fmt,
    io::{self, Write},
    path::PathBuf,
    process::{Command, Stdio},
};

use serde_json::Value;

use crate::{
    debug::RuleDebugInfo,
    object::Object,
    rules::{RuleDescription, RuleError, RuleStep},
};

/// Submits an object for validation without persisting it and returns the
/// object as the API server would store it.
pub trait DryRunClient {
    fn create(&self, object: &Value) -> Result<Value, DryRunError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DryRunError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to talk to {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("dry run rejected the object ({status}): {stderr}")]
    Rejected { status: String, stderr: String },

    #[error("invalid JSON exchanged with the dry run: {0}")]
    Json(#[from] serde_json::Error),
}

/// Dry runs through `kubectl create --dry-run=server`.
#[derive(Debug, Clone)]
pub struct KubectlDryRun {
    program: PathBuf,
    context: Option<String>,
}

impl KubectlDryRun {
    pub fn new(program: impl Into<PathBuf>, context: Option<String>) -> Self {
        KubectlDryRun {
            program: program.into(),
            context,
        }
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec![
            "create".to_string(),
            "--dry-run=server".to_string(),
            "--output=json".to_string(),
            "--filename=-".to_string(),
        ];
        if let Some(context) = &self.context {
            args.push(format!("--context={context}"));
        }
        args
    }
}

impl Default for KubectlDryRun {
    fn default() -> Self {
        KubectlDryRun::new("kubectl", None)
    }
}

impl DryRunClient for KubectlDryRun {
    fn create(&self, object: &Value) -> Result<Value, DryRunError> {
        let program = self.program.display().to_string();
        let input = serde_json::to_vec(object)?;

        let mut child = Command::new(&self.program)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| DryRunError::Spawn {
                program: program.clone(),
                source,
            })?;

        // kubectl may exit before reading its input, its stderr says why
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(&input),
            None => Ok(()),
        };

        let output = child.wait_with_output().map_err(|source| DryRunError::Io {
            program: program.clone(),
            source,
        })?;
        if !output.status.success() {
            return Err(DryRunError::Rejected {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written.map_err(|source| DryRunError::Io { program, source })?;

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

/// Fills in the values the API server would default, so that a manifest
/// spelling out a default compares equal to one that omits it.
pub struct DefaultingRule {
    client: Box<dyn DryRunClient>,
}

impl DefaultingRule {
    pub const NAME: &'static str = "Fill in default values";

    /// Namespace submitted for objects that have none.
    const PLACEHOLDER_NAMESPACE: &'static str = "default";

    /// Bookkeeping the server assigns to every created object.
    const SERVER_FIELDS: [&'static str; 3] = ["creationTimestamp", "managedFields", "uid"];

    pub fn new(client: Box<dyn DryRunClient>) -> Self {
        DefaultingRule { client }
    }

    pub fn describe(&self) -> RuleDescription {
        RuleDescription {
            name: Self::NAME.to_string(),
            match_steps: Vec::new(),
            patch_steps: vec![RuleStep::SetDefaults],
        }
    }

    pub(crate) fn map_object(
        &self,
        object: &Object,
        debug: Option<&mut RuleDebugInfo>,
    ) -> Result<Option<Object>, RuleError> {
        let key = object.key();
        let blank_namespace = object.namespace().is_none();

        let mut submitted = object.clone();
        if blank_namespace {
            submitted.set_namespace(Some(Self::PLACEHOLDER_NAMESPACE));
        }

        tracing::trace!(object = %key, "submitting object for dry run");
        let response = self
            .client
            .create(submitted.as_value())
            .map_err(|source| RuleError::DryRun {
                key: key.clone(),
                source,
            })?;
        let mut defaulted = Object::new(response).map_err(|source| RuleError::InvalidObject {
            key: key.clone(),
            source,
        })?;

        defaulted.remove_metadata_fields(&Self::SERVER_FIELDS);
        if blank_namespace {
            defaulted.set_namespace(None);
        }

        if let Some(debug) = debug {
            debug.record_patch(0, object.as_value().clone(), defaulted.as_value().clone());
        }

        Ok(Some(defaulted))
    }
}

impl fmt::Debug for DefaultingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultingRule").finish_non_exhaustive()
    }
}
