//! Tests for per-file validation.

use super::*;

fn policy() -> (tempfile::TempDir, UploadPolicy) {
    let dir = tempfile::tempdir().unwrap();
    let policy = UploadPolicy::new(dir.path()).unwrap();
    (dir, policy)
}

fn file(name: &str, mime: &str, size: u64) -> FileDescriptor {
    FileDescriptor::new(name, mime, "/tmp/phpA1b2", size)
}

#[test]
fn accepts_permitted_file() {
    let (_d, p) = policy();
    assert_eq!(validate(&file("cat.png", "image/png", 2048), &p), Ok(()));
}

#[test]
fn transport_error_wins_over_everything() {
    let (_d, p) = policy();
    let f = file("cat.png", "text/html", 0).with_error_code(4);
    assert_eq!(validate(&f, &p), Err(Rejection::NoFile));
    assert_eq!(
        Rejection::NoFile.messages("cat.png"),
        ["You didn't choose a file."]
    );
}

#[test]
fn transport_codes_map_to_messages() {
    let (_d, p) = policy();
    for code in [1, 2] {
        let r = validate(&file("big.png", "image/png", 10).with_error_code(code), &p).unwrap_err();
        assert_eq!(r, Rejection::TransportTooLarge { max_size: 153_600 });
        assert_eq!(r.messages("big.png"), ["big.png is too large: (max: 150.0 KB)."]);
    }

    let r = validate(&file("odd.png", "image/png", 10).with_error_code(7), &p).unwrap_err();
    assert_eq!(r, Rejection::TransportFailed { code: 7 });
    assert_eq!(
        r.messages("odd.png"),
        ["Sorry, something went wrong when trying to upload odd.png"]
    );
}

#[test]
fn partial_transfer_yields_one_message_by_default() {
    let (_d, p) = policy();
    let r = validate(&file("half.png", "image/png", 10).with_error_code(3), &p).unwrap_err();
    assert_eq!(r.messages("half.png"), ["half.png is too large."]);
}

#[test]
fn partial_transfer_legacy_fallthrough_adds_no_file_line() {
    let (_d, mut p) = policy();
    p.set_legacy_partial_fallthrough(true);
    let r = validate(&file("half.png", "image/png", 10).with_error_code(3), &p).unwrap_err();
    assert_eq!(
        r.messages("half.png"),
        ["half.png is too large.", "You didn't choose a file."]
    );
}

#[test]
fn empty_file_rejected_with_or_without_type_checking() {
    let (_d, mut p) = policy();
    let f = file("blank.png", "image/png", 0);
    assert_eq!(validate(&f, &p), Err(Rejection::Empty));
    p.allow_all_types(None);
    assert_eq!(validate(&f, &p), Err(Rejection::Empty));
    assert_eq!(Rejection::Empty.messages("blank.png"), ["blank.png is empty."]);
}

#[test]
fn oversized_file_cites_formatted_max() {
    let (_d, p) = policy();
    let r = validate(&file("huge.jpg", "image/jpeg", 153_601), &p).unwrap_err();
    assert_eq!(
        r.messages("huge.jpg"),
        ["huge.jpg exceeds maximum size for a file to be uploaded which is 150.0 KB"]
    );
    assert_eq!(validate(&file("edge.jpg", "image/jpeg", 153_600), &p), Ok(()));
}

#[test]
fn type_checked_only_when_enabled() {
    let (_d, mut p) = policy();
    let f = file("notes.txt", "text/plain", 10);
    let r = validate(&f, &p).unwrap_err();
    assert_eq!(r.messages("notes.txt"), ["notes.txt is not a permitted file type."]);
    p.allow_all_types(None);
    assert_eq!(validate(&f, &p), Ok(()));
}

#[test]
fn size_checked_before_type() {
    let (_d, p) = policy();
    let r = validate(&file("notes.txt", "text/plain", 0), &p).unwrap_err();
    assert_eq!(r, Rejection::Empty);
}

#[test]
fn names_without_a_usable_basename_are_rejected() {
    let (_d, p) = policy();
    for name in ["", "uploads/", "..", "a/.."] {
        let r = validate(&file(name, "image/png", 10), &p).unwrap_err();
        assert_eq!(r, Rejection::InvalidName, "{:?}", name);
    }
    assert_eq!(validate(&file("../../cat.png", "image/png", 10), &p), Ok(()));
}
