use super::*;

crate::define_id! {
    pub struct TestId("tid-");
}

#[test]
fn new_id_has_prefix_and_fits_idbuf() {
    let id = TestId::new();
    assert!(id.as_str().starts_with("tid-"));
    assert_eq!(id.as_str().len(), ID_MAX_LEN);
}

#[test]
fn from_string_round_trips() {
    let id = TestId::from_string("tid-abc123");
    assert_eq!(id.as_str(), "tid-abc123");
    assert_eq!(id.suffix(), "abc123");
}

#[test]
fn short_truncates_suffix() {
    let id = TestId::from_string("tid-abcdefgh");
    assert_eq!(id.short(3), "abc");
}

#[test]
fn display_matches_as_str() {
    let id = TestId::from_string("tid-xyz");
    assert_eq!(format!("{id}"), "tid-xyz");
}

#[test]
fn eq_str_compares_full_id() {
    let id = TestId::from_string("tid-xyz");
    assert_eq!(id, "tid-xyz");
}

#[test]
fn two_generated_ids_differ() {
    assert_ne!(TestId::new(), TestId::new());
}
