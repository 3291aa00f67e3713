use serde::{Deserialize, Serialize};

/// What a stage does when one path fails.
///
/// `Abort` surfaces the error to the consumer and ends the sequence. `Skip`
/// logs a warning, counts the failure and moves on to the next path; it has
/// to be selected explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    #[default]
    Abort,
    Skip,
}

impl ErrorPolicy {
    /// `Skip` when a skip flag was given, otherwise `self` unchanged.
    pub fn or_skip(self, skip: bool) -> Self {
        if skip {
            Self::Skip
        } else {
            self
        }
    }
}
