//! Confirmation lines for commands that change the cache without returning
//! records.

use std::fmt;

/// How an operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    /// Nothing went wrong, but nothing was done either.
    Warning,
    Error,
}

impl StatusKind {
    /// Leading label of the rendered line.
    pub fn label(self) -> &'static str {
        match self {
            StatusKind::Success => "Success:",
            StatusKind::Warning => "Warning:",
            StatusKind::Error => "Error:",
        }
    }
}

/// One labelled line, optionally followed by a detail paragraph.
///
/// ```
/// use wayfarer_core::display::OperationStatus;
///
/// let status = OperationStatus::success("Cleared the offline cache")
///     .with_detail("Removed: 2 saved, 0 pending.");
/// assert!(status.to_string().starts_with("Success: Cleared"));
/// ```
#[derive(Debug, Clone)]
pub struct OperationStatus {
    pub kind: StatusKind,
    pub message: String,
    pub detail: Option<String>,
}

impl OperationStatus {
    fn new(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(StatusKind::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(StatusKind::Warning, message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(StatusKind::Error, message)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.kind == StatusKind::Success
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.kind.label(), self.message)?;
        if let Some(detail) = &self.detail {
            writeln!(f)?;
            writeln!(f, "{detail}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_follow_kind() {
        assert_eq!(
            OperationStatus::success("Dropped pending change a1").to_string(),
            "Success: Dropped pending change a1\n"
        );
        assert_eq!(
            OperationStatus::warning("Nothing was cleared").to_string(),
            "Warning: Nothing was cleared\n"
        );
        assert_eq!(
            OperationStatus::failure("No pending change with ID x").to_string(),
            "Error: No pending change with ID x\n"
        );
    }

    #[test]
    fn test_detail_is_a_separate_paragraph() {
        let status = OperationStatus::success("Cleared the offline cache")
            .with_detail("Removed: 2 saved, 1 pending.");

        assert!(status.is_success());
        assert_eq!(
            status.to_string(),
            "Success: Cleared the offline cache\n\nRemoved: 2 saved, 1 pending.\n"
        );
    }

    #[test]
    fn test_only_success_counts_as_success() {
        assert!(!OperationStatus::warning("skipped").is_success());
        assert!(!OperationStatus::failure("failed").is_success());
    }
}
