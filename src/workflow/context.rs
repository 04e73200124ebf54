use super::types::WorkflowError;

/// Extended state threaded through one workflow run.
///
/// `requirements` is always present; only the revision handler rewrites it.
/// `script` is set by the generation handler before verification runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowContext {
    requirements: String,
    script: Option<String>,
}

impl WorkflowContext {
    pub fn new(requirements: impl Into<String>) -> Self {
        Self {
            requirements: requirements.into(),
            script: None,
        }
    }

    pub fn requirements(&self) -> &str {
        &self.requirements
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn require_script(&self) -> Result<&str, WorkflowError> {
        self.script().ok_or(WorkflowError::MissingVariable("script"))
    }

    pub(crate) fn set_script(&mut self, script: String) {
        self.script = Some(script);
    }

    pub(crate) fn set_requirements(&mut self, requirements: String) {
        self.requirements = requirements;
    }
}
