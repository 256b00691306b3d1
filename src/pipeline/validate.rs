//! Input validation: gate file selection and submission.
//!
//! Two checkpoints, matching the two user actions:
//!
//! * [`validate_document`] runs when a file is selected (size, then type).
//! * [`validate_submission`] runs when the user asks for an analysis
//!   (title, description and an encoded document must all be present).
//!
//! Both are pure: they inspect their arguments and return a verdict.

use crate::error::AuditError;
use crate::model::{DocumentKind, JobDetails, UploadedDocument, MAX_DOCUMENT_BYTES};

/// Check a selected file against the size limit and the allowed MIME set.
///
/// Size is checked first, so a 150 MB GIF is reported as too large.
pub fn validate_document(doc: &UploadedDocument) -> Result<DocumentKind, AuditError> {
    validate_file_meta(doc.size_bytes, &doc.mime_type)
}

/// Same as [`validate_document`] for callers that only have metadata.
pub fn validate_file_meta(size_bytes: u64, mime_type: &str) -> Result<DocumentKind, AuditError> {
    if size_bytes > MAX_DOCUMENT_BYTES {
        return Err(AuditError::FileTooLarge {
            size_bytes,
            limit_bytes: MAX_DOCUMENT_BYTES,
        });
    }
    DocumentKind::from_mime(mime_type).ok_or_else(|| AuditError::UnsupportedFileType {
        mime_type: mime_type.to_string(),
    })
}

/// Check that the form is complete before submitting.
///
/// `encoded_document` is the data URI produced by the encoder, or `None`
/// when no file has been selected yet. Company is optional.
pub fn validate_submission(
    job: &JobDetails,
    encoded_document: Option<&str>,
) -> Result<(), AuditError> {
    let mut missing = Vec::new();
    if encoded_document.map_or(true, |d| d.is_empty()) {
        missing.push("document");
    }
    if job.title.trim().is_empty() {
        missing.push("title");
    }
    if job.description.trim().is_empty() {
        missing.push("description");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AuditError::IncompleteSubmission { missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(size: u64, mime: &str) -> UploadedDocument {
        UploadedDocument {
            file_name: "resume".into(),
            mime_type: mime.into(),
            size_bytes: size,
            bytes: Vec::new(),
        }
    }

    #[test]
    fn accepts_every_allowed_type() {
        for kind in DocumentKind::ALL {
            assert_eq!(
                validate_document(&doc(5 * 1024 * 1024, kind.mime_type())).unwrap(),
                kind
            );
        }
    }

    #[test]
    fn limit_is_inclusive() {
        assert!(validate_file_meta(MAX_DOCUMENT_BYTES, "application/pdf").is_ok());
        assert!(matches!(
            validate_file_meta(MAX_DOCUMENT_BYTES + 1, "application/pdf"),
            Err(AuditError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn size_checked_before_type() {
        let err = validate_document(&doc(150 * 1024 * 1024, "image/gif")).unwrap_err();
        assert!(matches!(err, AuditError::FileTooLarge { .. }));
    }

    #[test]
    fn rejects_unsupported_types() {
        for mime in ["image/gif", "text/plain", "application/octet-stream", ""] {
            let err = validate_document(&doc(10, mime)).unwrap_err();
            assert_eq!(err.user_message(), "Please upload a PDF or an image file.");
        }
    }

    #[test]
    fn submission_requires_title_description_and_document() {
        let full = JobDetails::new("Backend Engineer", "", "Go experience");
        assert!(validate_submission(&full, Some("data:application/pdf;base64,AAAA")).is_ok());

        match validate_submission(&full, None) {
            Err(AuditError::IncompleteSubmission { missing }) => assert_eq!(missing, vec!["document"]),
            other => panic!("unexpected: {other:?}"),
        }

        let blank = JobDetails::new(" ", "Acme", "");
        match validate_submission(&blank, Some("")) {
            Err(AuditError::IncompleteSubmission { missing }) => {
                assert_eq!(missing, vec!["document", "title", "description"])
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
