use std::rc::Rc;

use yew::Reducible;

use crate::config::{ACCEPTED_EXTENSIONS, MAX_UPLOAD_BYTES};
use crate::error::ValidationError;

#[derive(Clone, Debug, PartialEq)]
pub enum UploadStatus {
    Idle,
    Uploading { progress: u8 },
    Success,
    Error(String),
}

impl UploadStatus {
    pub fn is_uploading(&self) -> bool {
        matches!(self, UploadStatus::Uploading { .. })
    }

    /// A new file is only taken while nothing is in flight or waiting out
    /// the success delay.
    pub fn accepts_file(&self) -> bool {
        matches!(self, UploadStatus::Idle | UploadStatus::Error(_))
    }

    pub fn apply(&self, event: UploadEvent) -> UploadStatus {
        match (self, event) {
            (UploadStatus::Idle | UploadStatus::Error(_), UploadEvent::Started) => {
                UploadStatus::Uploading { progress: 0 }
            }
            (UploadStatus::Uploading { .. }, UploadEvent::Progress(progress)) => {
                UploadStatus::Uploading { progress }
            }
            (UploadStatus::Uploading { .. }, UploadEvent::Succeeded) => UploadStatus::Success,
            (UploadStatus::Success, UploadEvent::Failed(_)) => UploadStatus::Success,
            (_, UploadEvent::Failed(message)) => UploadStatus::Error(message),
            (_, UploadEvent::Reset) => UploadStatus::Idle,
            // progress after the request settled, duplicate starts
            (current, _) => current.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum UploadEvent {
    Started,
    Progress(u8),
    Succeeded,
    Failed(String),
    Reset,
}

impl Reducible for UploadStatus {
    type Action = UploadEvent;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new(self.apply(action))
    }
}

pub fn file_extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Checks an upload before any request is made and hands back the target
/// account id.
pub fn validate_upload<'a>(
    account_id: Option<&'a str>,
    file_name: &str,
    size: u64,
) -> Result<&'a str, ValidationError> {
    let account_id = account_id
        .filter(|id| !id.is_empty())
        .ok_or(ValidationError::MissingAccount)?;

    match file_extension(file_name) {
        Some(ext) if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) => {}
        _ => return Err(ValidationError::UnsupportedFileType),
    }

    if size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::FileTooLarge);
    }

    Ok(account_id)
}

pub fn progress_percent(loaded: f64, total: f64) -> u8 {
    if total <= 0.0 || !loaded.is_finite() || !total.is_finite() {
        return 0;
    }
    (loaded * 100.0 / total).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_supported_extensions_in_any_case() {
        for name in ["jan.csv", "statement.TXT", "export.xlsx", "old.Xls", "a.b.csv"] {
            assert_eq!(validate_upload(Some("acc-1"), name, 1_024), Ok("acc-1"), "{name}");
        }
    }

    #[test]
    fn rejects_unsupported_extensions() {
        for name in ["statement.pdf", "noext", "trailingdot.", "archive.csv.zip"] {
            assert_eq!(
                validate_upload(Some("acc-1"), name, 10),
                Err(ValidationError::UnsupportedFileType),
                "{name}"
            );
        }
    }

    #[test]
    fn account_is_checked_first() {
        assert_eq!(
            validate_upload(None, "statement.pdf", 10),
            Err(ValidationError::MissingAccount)
        );
        assert_eq!(
            validate_upload(Some(""), "statement.csv", 10),
            Err(ValidationError::MissingAccount)
        );
    }

    #[test]
    fn size_ceiling_is_ten_mebibytes() {
        assert!(validate_upload(Some("acc-1"), "big.csv", MAX_UPLOAD_BYTES).is_ok());
        assert_eq!(
            validate_upload(Some("acc-1"), "big.csv", MAX_UPLOAD_BYTES + 1),
            Err(ValidationError::FileTooLarge)
        );
    }

    #[test]
    fn progress_is_a_rounded_clamped_percentage() {
        assert_eq!(progress_percent(0.0, 200.0), 0);
        assert_eq!(progress_percent(1.0, 3.0), 33);
        assert_eq!(progress_percent(2.0, 3.0), 67);
        assert_eq!(progress_percent(300.0, 200.0), 100);
        assert_eq!(progress_percent(5.0, 0.0), 0);
    }

    #[test]
    fn happy_path_goes_idle_uploading_success_idle() {
        let status = UploadStatus::Idle
            .apply(UploadEvent::Started)
            .apply(UploadEvent::Progress(40));
        assert_eq!(status, UploadStatus::Uploading { progress: 40 });

        let status = status.apply(UploadEvent::Succeeded);
        assert_eq!(status, UploadStatus::Success);
        assert_eq!(status.apply(UploadEvent::Reset), UploadStatus::Idle);
    }

    #[test]
    fn failure_then_retry() {
        let status = UploadStatus::Idle
            .apply(UploadEvent::Started)
            .apply(UploadEvent::Failed("Failed to upload file. Please try again.".to_string()));
        assert!(matches!(status, UploadStatus::Error(_)));

        let retried = status.apply(UploadEvent::Reset).apply(UploadEvent::Started);
        assert_eq!(retried, UploadStatus::Uploading { progress: 0 });
    }

    #[test]
    fn validation_failure_goes_straight_to_error() {
        let status = UploadStatus::Idle.apply(UploadEvent::Failed(
            ValidationError::UnsupportedFileType.to_string(),
        ));
        assert_eq!(
            status,
            UploadStatus::Error("Please upload a valid file format (CSV, TXT, or Excel)".to_string())
        );
    }

    #[test]
    fn late_events_do_not_revive_a_finished_upload() {
        assert_eq!(UploadStatus::Success.apply(UploadEvent::Progress(80)), UploadStatus::Success);
        assert_eq!(
            UploadStatus::Success.apply(UploadEvent::Failed("late".to_string())),
            UploadStatus::Success
        );
        assert_eq!(
            UploadStatus::Uploading { progress: 5 }.apply(UploadEvent::Started),
            UploadStatus::Uploading { progress: 5 }
        );
    }

    #[test]
    fn only_idle_or_failed_uploads_accept_a_file() {
        assert!(UploadStatus::Idle.accepts_file());
        assert!(UploadStatus::Error("bad".to_string()).accepts_file());
        assert!(!UploadStatus::Uploading { progress: 0 }.accepts_file());
        assert!(!UploadStatus::Success.accepts_file());
    }
}
