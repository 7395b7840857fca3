//! `tonic` integration.
//!
//! Lets the adapters work directly on `tonic::Status`. Classified statuses are
//! returned as the same value, so metadata and details survive; masked ones
//! are rebuilt as `Code::Internal` with the token as the message and nothing
//! else.

use ::tonic::{Code as TonicCode, Status as TonicStatus};

use crate::{
    masking::MaskedError,
    status::{Classify, Code, RpcStatus, Status},
};

impl From<TonicCode> for Code {
    fn from(code: TonicCode) -> Self {
        Code::from_i32(i32::from(code))
    }
}

impl From<Code> for TonicCode {
    fn from(code: Code) -> Self {
        TonicCode::from(code.as_i32())
    }
}

impl Classify for TonicStatus {
    fn code(&self) -> Code {
        TonicStatus::code(self).into()
    }
}

impl RpcStatus for TonicStatus {
    fn message(&self) -> &str {
        TonicStatus::message(self)
    }

    fn from_masked(masked: MaskedError) -> Self {
        TonicStatus::new(masked.code().into(), masked.into_token().to_string())
    }

    /// The binary details (lossy UTF-8) and the metadata, when present.
    fn diagnostic_detail(&self) -> Option<String> {
        let mut parts = Vec::new();
        if !self.details().is_empty() {
            parts.push(format!(
                "details={}",
                String::from_utf8_lossy(self.details())
            ));
        }
        if !self.metadata().is_empty() {
            parts.push(format!("metadata={:?}", self.metadata()));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

impl From<Status> for TonicStatus {
    fn from(status: Status) -> Self {
        TonicStatus::new(status.code().into(), status.message())
    }
}

impl From<TonicStatus> for Status {
    fn from(status: TonicStatus) -> Self {
        Status::new(Classify::code(&status), status.message())
            .with_detail(status.diagnostic_detail())
    }
}

#[cfg(test)]
mod tests {
    use ::tonic::{metadata::MetadataValue, Code as TonicCode, Status as TonicStatus};
    use bytes::Bytes;

    use crate::{Code, ErrorMasker, MemorySink, RpcStatus, Status};

    #[test]
    fn codes_map_one_to_one() {
        for code in Code::ALL {
            let tonic_code = TonicCode::from(code);
            assert_eq!(Code::from(tonic_code), code);
        }
    }

    #[test]
    fn classified_status_keeps_metadata() {
        let masker = ErrorMasker::new(MemorySink::new());
        let mut status = TonicStatus::not_found("user 123 missing");
        status
            .metadata_mut()
            .insert("x-request-id", MetadataValue::from_static("req-1"));

        let returned = masker.sanitize(status);

        assert_eq!(returned.code(), TonicCode::NotFound);
        assert_eq!(returned.message(), "user 123 missing");
        let request_id = returned.metadata().get("x-request-id").unwrap();
        assert_eq!(request_id.to_str().unwrap(), "req-1");
    }

    #[test]
    fn unknown_status_is_masked() {
        let masker = ErrorMasker::new(MemorySink::new());

        let returned = masker.sanitize(TonicStatus::unknown("nil pointer at line 42"));

        assert_eq!(returned.code(), TonicCode::Internal);
        assert!(!returned.message().contains("nil pointer"));
        let record = masker.sink().lookup(returned.message()).unwrap();
        assert_eq!(record.message(), "nil pointer at line 42");
    }

    #[test]
    fn masked_status_details_reach_the_record_only() {
        let masker = ErrorMasker::new(MemorySink::new());
        let mut status = TonicStatus::with_details(
            TonicCode::Unknown,
            "boom",
            Bytes::from_static(b"STACKTRACE-DETAIL"),
        );
        status
            .metadata_mut()
            .insert("x-request-id", MetadataValue::from_static("req-9"));

        let returned = masker.sanitize(status);

        assert!(returned.details().is_empty());
        assert!(returned.metadata().is_empty());
        let record = masker.sink().lookup(returned.message()).unwrap();
        assert_eq!(record.message(), "boom");
        let detail = record.detail().unwrap();
        assert!(detail.contains("details=STACKTRACE-DETAIL"));
        assert!(detail.contains("req-9"));
    }

    #[test]
    fn plain_status_has_no_detail() {
        assert_eq!(TonicStatus::unknown("boom").diagnostic_detail(), None);
    }

    #[test]
    fn conversions_preserve_code_and_message() {
        let status = Status::already_exists("duplicate key");
        let tonic_status = TonicStatus::from(status.clone());
        assert_eq!(tonic_status.code(), TonicCode::AlreadyExists);
        assert_eq!(Status::from(tonic_status), status);
    }
}
