use crate::error::Error;

/// Result of one synchronous engine run.
#[derive(Debug, Default)]
pub struct RunOutput {
    /// Exit code; `None` when the process could not be launched or was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// Why the process never ran, if it didn't.
    pub error: Option<Error>,
}

impl RunOutput {
    pub fn failed(error: Error) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}
