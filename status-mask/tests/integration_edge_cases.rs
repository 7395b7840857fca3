//! Edge cases around classification and tokens.

use chrono::{TimeZone, Utc};
use status_mask::{
    classify, Classification, Code, CorrelationToken, ErrorMasker, MemorySink, Status,
    TokenGenerator,
};
use uuid::Uuid;

#[test]
fn ok_code_on_an_error_is_masked() {
    let masker = ErrorMasker::new(MemorySink::new());
    let odd = Status::new(Code::Ok, "handler returned an error with an ok code");

    assert_eq!(classify(Some(&odd)), Classification::Unclassified);
    let err = masker.sanitize(odd);

    assert_eq!(err.code(), Code::Internal);
    assert_eq!(masker.sink().records()[0].code(), Code::Ok);
}

#[test]
fn internal_raised_on_purpose_is_not_masked() {
    let masker = ErrorMasker::new(MemorySink::new());
    let original = Status::internal("replica lag too high");

    assert_eq!(masker.sanitize(original.clone()), original);
    assert!(masker.sink().is_empty());
}

#[test]
fn out_of_range_wire_code_is_treated_as_unknown() {
    let masker = ErrorMasker::new(MemorySink::new());
    let err = masker.sanitize(Status::new(Code::from_i32(99), "from a newer peer"));

    assert_eq!(err.code(), Code::Internal);
    assert_eq!(masker.sink().len(), 1);
}

#[test]
fn empty_and_unicode_messages_are_recorded_verbatim() {
    let masker = ErrorMasker::new(MemorySink::new());

    let empty = masker.sanitize(Status::unknown(""));
    let unicode = masker.sanitize(Status::unknown("échec: ファイルが見つかりません"));

    assert_eq!(masker.sink().lookup(empty.message()).unwrap().message(), "");
    assert_eq!(
        masker.sink().lookup(unicode.message()).unwrap().message(),
        "échec: ファイルが見つかりません"
    );
    assert!(!unicode.message().contains("échec"));
}

#[test]
fn masked_message_is_a_parseable_token() {
    let instant = Utc.with_ymd_and_hms(2025, 11, 3, 17, 42, 8).unwrap();
    let id = Uuid::parse_str("a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d").unwrap();
    let masker = ErrorMasker::new(MemorySink::new())
        .with_clock(move || instant)
        .with_id_source(move || id);

    let err = masker.sanitize(Status::unknown("serialization failed"));
    let token = CorrelationToken::parse(err.message()).unwrap();

    assert_eq!(token.timestamp(), instant);
    assert_eq!(token.id(), id);
    assert_eq!(
        err.message(),
        "2025-11-03T17:42:08.000000000Z-a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d"
    );
}

#[test]
fn tokens_order_by_capture_time() {
    let earlier = TokenGenerator::system()
        .with_clock(|| Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
        .generate();
    let later = TokenGenerator::system()
        .with_clock(|| Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 1).unwrap())
        .generate();

    assert!(earlier.as_str() < later.as_str());
    assert!(earlier.timestamp() < later.timestamp());
}

#[test]
fn lookup_accepts_token_with_trailing_newline() {
    let masker = ErrorMasker::new(MemorySink::new());
    let err = masker.sanitize(Status::unknown("pasted from a terminal"));

    let pasted = format!("{}\n", err.message());
    assert!(masker.sink().lookup(&pasted).is_some());
}

#[test]
fn wire_codes_follow_the_grpc_numbering() {
    assert_eq!(Code::Ok.as_i32(), 0);
    assert_eq!(Code::NotFound.as_i32(), 5);
    assert_eq!(Code::Unknown.as_i32(), 2);
    assert_eq!(Code::Internal.as_i32(), 13);
    assert_eq!(Code::Unauthenticated.as_i32(), 16);
    assert_eq!(Code::from(-1), Code::Unknown);
    assert_eq!(i32::from(Code::DataLoss), 15);
}
