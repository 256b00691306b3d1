//! Session state for an interactive front-end.
//!
//! A UI holds exactly one [`Session`]: the selected file and its encoded
//! preview, the job form, the last result or error, and a busy flag. Every
//! user event is a method that takes the session by value and returns the
//! next one, so transitions are easy to test and there is no hidden shared
//! state. Only [`run_submission`] touches the network, and it does so
//! between two pure transitions ([`Session::submit`] and
//! [`Session::complete`]).
//!
//! The busy flag guarantees at most one analysis in flight per session:
//! `submit` refuses while a previous submission is outstanding.

use crate::analyze::analyze_data_uri;
use crate::config::AnalyzerConfig;
use crate::error::AuditError;
use crate::model::{AnalysisResult, JobDetails, UploadedDocument};
use crate::pipeline::{encode, input, validate};
use std::path::Path;
use tracing::debug;

/// Everything a front-end renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub document: Option<UploadedDocument>,
    /// `data:<mime>;base64,<payload>` for the selected document.
    pub preview: Option<String>,
    pub job: JobDetails,
    pub result: Option<AnalysisResult>,
    /// User-facing text of the last failure.
    pub error: Option<String>,
    pub is_analyzing: bool,
}

/// The work order handed out by [`Session::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub data_uri: String,
    pub job: JobDetails,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// A file was picked and encoded.
    ///
    /// The preview must already be encoded; use [`load_file`] to start from
    /// a path so size and type are checked before any encoding. On
    /// validation failure the previous selection is kept and only the
    /// error is set. On success the new file replaces the old one wholesale
    /// and any previous error is cleared.
    pub fn select_file(mut self, doc: UploadedDocument, preview: String) -> Self {
        match validate::validate_document(&doc) {
            Ok(kind) => {
                debug!("Selected {} ({})", doc.file_name, kind);
                self.document = Some(doc);
                self.preview = Some(preview);
                self.error = None;
            }
            Err(e) => self.error = Some(e.user_message()),
        }
        self
    }

    /// File selection failed before a document existed (unreadable, too big).
    pub fn reject_file(mut self, error: &AuditError) -> Self {
        self.error = Some(error.user_message());
        self
    }

    pub fn set_title(mut self, title: impl Into<String>) -> Self {
        self.job.title = title.into();
        self
    }

    pub fn set_company(mut self, company: impl Into<String>) -> Self {
        self.job.company = company.into();
        self
    }

    pub fn set_description(mut self, description: impl Into<String>) -> Self {
        self.job.description = description.into();
        self
    }

    /// The user pressed "analyze".
    ///
    /// Returns the submission to run, or `None` if the form is incomplete
    /// (the error is recorded) or an analysis is already running (state is
    /// unchanged).
    pub fn submit(mut self) -> (Self, Option<Submission>) {
        if self.is_analyzing {
            return (self, None);
        }
        if let Err(e) = validate::validate_submission(&self.job, self.preview.as_deref()) {
            self.error = Some(e.user_message());
            return (self, None);
        }

        let submission = match self.preview.clone() {
            Some(data_uri) => Submission {
                data_uri,
                job: self.job.clone(),
            },
            None => return (self, None),
        };
        self.is_analyzing = true;
        self.error = None;
        (self, Some(submission))
    }

    /// The outstanding analysis finished. All-or-nothing: a failure never
    /// leaves a partial result behind.
    pub fn complete(mut self, outcome: Result<AnalysisResult, AuditError>) -> Self {
        self.is_analyzing = false;
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.error = None;
            }
            Err(e) => {
                self.result = None;
                self.error = Some(e.user_message());
            }
        }
        self
    }

    /// Start over. Clears the file, preview, result and error; the job form
    /// is kept so the user can try another resume against the same role.
    pub fn reset(self) -> Self {
        Self {
            job: self.job,
            ..Self::default()
        }
    }
}

/// Pick a file from disk: read, validate, encode, then select it.
///
/// The size limit is checked from metadata and the type is checked before
/// encoding, so an oversized or unsupported file is never base64-encoded.
/// Any failure keeps the previous selection and records the message.
pub async fn load_file(session: Session, path: impl AsRef<Path>) -> Session {
    let doc = match input::read_document(path).await {
        Ok(doc) => doc,
        Err(e) => return session.reject_file(&e),
    };
    if let Err(e) = validate::validate_document(&doc) {
        return session.reject_file(&e);
    }
    match encode::encode_document(&doc).await {
        Ok(preview) => session.select_file(doc, preview),
        Err(e) => session.reject_file(&e),
    }
}

/// Run one submit → analyze → complete cycle.
pub async fn run_submission(session: Session, config: &AnalyzerConfig) -> Session {
    let (session, submission) = session.submit();
    let Some(submission) = submission else {
        return session;
    };
    let outcome = analyze_data_uri(&submission.data_uri, &submission.job, config).await;
    session.complete(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::INCOMPLETE_SUBMISSION_MESSAGE;
    use std::io::Write;

    fn pdf() -> (UploadedDocument, String) {
        (
            UploadedDocument::new("cv.pdf", "application/pdf", b"%PDF-1.4".to_vec()),
            "data:application/pdf;base64,JVBERi0xLjQ=".to_string(),
        )
    }

    fn ready() -> Session {
        let (doc, preview) = pdf();
        Session::new()
            .select_file(doc, preview)
            .set_title("Backend Engineer")
            .set_description("Go and distributed systems experience required")
    }

    #[test]
    fn select_then_submit() {
        let (session, submission) = ready().submit();
        assert!(session.is_analyzing);
        let submission = submission.expect("form is complete");
        assert_eq!(submission.job.title, "Backend Engineer");
        assert!(submission.data_uri.starts_with("data:application/pdf"));
    }

    #[test]
    fn unsupported_file_keeps_previous_selection() {
        let session = ready().select_file(
            UploadedDocument::new("cv.gif", "image/gif", vec![1, 2, 3]),
            "data:image/gif;base64,AQID".into(),
        );
        assert_eq!(session.document.as_ref().unwrap().file_name, "cv.pdf");
        assert_eq!(
            session.error.as_deref(),
            Some("Please upload a PDF or an image file.")
        );
    }

    #[test]
    fn incomplete_form_blocks_submission() {
        let (doc, preview) = pdf();
        let (session, submission) = Session::new().select_file(doc, preview).submit();
        assert!(submission.is_none());
        assert!(!session.is_analyzing);
        assert_eq!(session.error.as_deref(), Some(INCOMPLETE_SUBMISSION_MESSAGE));

        let (session, submission) = Session::new()
            .set_title("t")
            .set_description("d")
            .submit();
        assert!(submission.is_none());
        assert!(session.error.is_some());
    }

    #[test]
    fn second_submit_while_busy_is_ignored() {
        let (session, first) = ready().submit();
        assert!(first.is_some());
        let (session, second) = session.submit();
        assert!(second.is_none());
        assert!(session.is_analyzing);
        assert!(session.error.is_none());
    }

    #[test]
    fn failure_clears_busy_flag_and_records_message() {
        let (session, _) = ready().submit();
        let session = session.complete(Err(AuditError::EmptyResponse));
        assert!(!session.is_analyzing);
        assert!(session.result.is_none());
        assert_eq!(session.error.as_deref(), Some("Empty response from AI."));
    }

    #[test]
    fn reset_clears_everything_but_the_form() {
        let (session, _) = ready().submit();
        let session = session
            .complete(Err(AuditError::EmptyResponse))
            .set_company("Acme")
            .reset();
        assert!(session.document.is_none());
        assert!(session.preview.is_none());
        assert!(session.result.is_none());
        assert!(session.error.is_none());
        assert!(!session.is_analyzing);
        assert_eq!(session.job.company, "Acme");
        assert_eq!(session.job.title, "Backend Engineer");
    }

    #[tokio::test]
    async fn load_file_selects_and_encodes() {
        let mut tmp = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        tmp.write_all(b"%PDF-1.4").unwrap();

        let session = load_file(Session::new(), tmp.path()).await;
        assert!(session.error.is_none());
        assert_eq!(session.document.as_ref().unwrap().size_bytes, 8);
        assert_eq!(
            session.preview.as_deref(),
            Some("data:application/pdf;base64,JVBERi0xLjQ=")
        );
    }

    #[tokio::test]
    async fn load_file_rejects_oversized_and_keeps_selection() {
        let tmp = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        tmp.as_file().set_len(150 * 1024 * 1024).unwrap();

        let session = load_file(ready(), tmp.path()).await;
        assert_eq!(session.document.as_ref().unwrap().file_name, "cv.pdf");
        assert!(session.preview.as_deref().unwrap().starts_with("data:application/pdf"));
        assert_eq!(session.error.as_deref(), Some("File size exceeds 100MB limit."));
    }

    #[tokio::test]
    async fn load_file_reports_unsupported_and_missing_files() {
        let mut gif = tempfile::Builder::new().suffix(".gif").tempfile().unwrap();
        gif.write_all(b"GIF89a").unwrap();
        let session = load_file(Session::new(), gif.path()).await;
        assert!(session.document.is_none());
        assert!(session.preview.is_none());
        assert_eq!(
            session.error.as_deref(),
            Some("Please upload a PDF or an image file.")
        );

        let dir = tempfile::tempdir().unwrap();
        let session = load_file(Session::new(), dir.path().join("missing.pdf")).await;
        assert!(session.document.is_none());
        assert!(session.error.as_deref().unwrap().contains("not found"));
    }
}
