//! Aggregation of per-item results in a batch.
//!
//! A batch keeps going after an item fails. Success messages and errors are
//! collected in input order and reported together once the batch is done.

use thiserror::Error;

use crate::error::{Error, ErrorCode, Result};

/// Ordered collection of errors from one batch.
///
/// Each error keeps its own code and severity; `Display` joins the texts with
/// newlines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", merged_text(.0))]
pub struct ErrorList(Vec<Error>);

fn merged_text(errors: &[Error]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl ErrorList {
    pub fn errors(&self) -> &[Error] {
        &self.0
    }

    pub fn codes(&self) -> Vec<ErrorCode> {
        self.0.iter().map(|e| e.code).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<Error> {
        self.0
    }
}

impl IntoIterator for ErrorList {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Combine errors into one; `Ok` when there are none.
pub fn merge_errors(errors: Vec<Error>) -> std::result::Result<(), ErrorList> {
    if errors.is_empty() {
        return Ok(());
    }
    Err(ErrorList(errors))
}

/// Join messages with newlines.
pub fn merge_msgs(msgs: &[String]) -> String {
    msgs.join("\n")
}

/// Result of processing a batch of components or traits.
#[derive(Debug, Clone, Default)]
pub struct HandleOutcome {
    messages: Vec<String>,
    errors: Vec<Error>,
}

impl HandleOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_message(&mut self, msg: impl Into<String>) {
        self.messages.push(msg.into());
    }

    pub fn push_error(&mut self, err: Error) {
        self.errors.push(err);
    }

    /// Record the result of one item.
    pub fn record(&mut self, result: Result<String>) {
        match result {
            Ok(msg) => self.messages.push(msg),
            Err(err) => self.errors.push(err),
        }
    }

    /// Append another outcome's messages and errors after this one's.
    pub fn extend(&mut self, other: HandleOutcome) {
        self.messages.extend(other.messages);
        self.errors.extend(other.errors);
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Newline-joined success messages.
    pub fn message(&self) -> String {
        merge_msgs(&self.messages)
    }

    /// Combined error, if anything failed.
    pub fn error(&self) -> Option<ErrorList> {
        merge_errors(self.errors.clone()).err()
    }

    pub fn into_parts(self) -> (String, Option<ErrorList>) {
        let message = merge_msgs(&self.messages);
        (message, merge_errors(self.errors).err())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_errors_empty() {
        assert!(merge_errors(Vec::new()).is_ok());
    }

    #[test]
    fn test_merge_errors_joins_text() {
        let e1 = Error::install_nginx("first");
        let e2 = Error::load_namespace_to_mesh("second");
        let expected = format!("{}\n{}", e1, e2);

        let merged = merge_errors(vec![e1, e2]).unwrap_err();
        assert_eq!(merged.to_string(), expected);
        assert_eq!(
            merged.codes(),
            vec![ErrorCode::InstallNginx, ErrorCode::LoadNamespaceToMesh]
        );
    }

    #[test]
    fn test_merge_msgs() {
        assert_eq!(merge_msgs(&[]), "");
        assert_eq!(merge_msgs(&["a".to_string(), "b".to_string()]), "a\nb");
    }

    #[test]
    fn test_outcome_keeps_partial_success() {
        let mut outcome = HandleOutcome::new();
        outcome.record(Ok("one".to_string()));
        outcome.record(Err(Error::mesh_config("boom")));
        outcome.record(Ok("three".to_string()));

        assert!(!outcome.is_success());
        let (message, error) = outcome.into_parts();
        assert_eq!(message, "one\nthree");
        let error = error.unwrap();
        assert_eq!(error.len(), 1);
        assert_eq!(error.to_string(), "Error configuration mesh: boom");
    }

    #[test]
    fn test_extend_preserves_order() {
        let mut first = HandleOutcome::new();
        first.push_message("a");
        first.push_error(Error::sample_app("x"));

        let mut second = HandleOutcome::new();
        second.push_message("b");
        second.push_error(Error::stream_event("y"));

        first.extend(second);
        assert_eq!(first.message(), "a\nb");
        assert_eq!(
            first.error().unwrap().codes(),
            vec![ErrorCode::SampleApp, ErrorCode::StreamEvent]
        );
    }

    #[test]
    fn test_empty_outcome() {
        let outcome = HandleOutcome::new();
        assert!(outcome.is_success());
        assert_eq!(outcome.message(), "");
        assert!(outcome.error().is_none());
    }
}
