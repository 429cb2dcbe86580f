use super::*;

#[test]
fn observer_id_carries_its_prefix() {
    let id = ObserverId::new();
    assert!(id.as_str().starts_with("obs-"));
}

#[test]
fn observer_ids_are_unique() {
    assert_ne!(ObserverId::new(), ObserverId::new());
}
