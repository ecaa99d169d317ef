use serde::Deserialize;

/// Which error policy the driver composes the sequence with.
///
/// - `Propagate`: a failed launch is an error of the whole invocation
///   (default behaviour).
/// - `Recover`: an error sink is added; a failed launch is reported and the
///   driver exits with [`LAUNCH_FAILURE_EXIT_CODE`](crate::LAUNCH_FAILURE_EXIT_CODE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicyKind {
    Propagate,
    Recover,
}

impl Default for ErrorPolicyKind {
    fn default() -> Self {
        ErrorPolicyKind::Propagate
    }
}
