use super::*;
use document::Operation;

fn tags(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn op(id: &str) -> Operation {
    Operation {
        operation_id: Some(id.to_string()),
        ..Default::default()
    }
}

fn raw_table(entries: &[(&str, &str, &str)]) -> PathTable {
    let mut table = PathTable::new();
    for (path, method, id) in entries {
        table
            .entry(path.to_string())
            .or_insert_with(PathItem::new)
            .insert(method.to_string(), op(id));
    }
    table
}

#[test]
fn empty_allow_list_retains_everything_in_order() {
    let candidates = vec![
        CandidateOperation::new("/b", "/", "get"),
        CandidateOperation::new("/a", "/", "get").with_class_tags(["internal"]),
        CandidateOperation::new("/c", "/{id}", "delete").with_method_tags(["admin"]),
    ];

    let retained = retain(&candidates, &BTreeSet::new());
    assert_eq!(retained.len(), candidates.len());
    for (kept, original) in retained.iter().zip(&candidates) {
        assert_eq!(*kept, original);
    }
}

#[test]
fn class_tag_match_is_enough() {
    let candidate = CandidateOperation::new("/users", "/", "get").with_class_tags(["admin", "public"]);
    assert!(is_visible(&candidate, &tags(&["admin"])));
}

#[test]
fn method_tag_match_is_enough() {
    let candidate = CandidateOperation::new("/users", "/", "get")
        .with_class_tags(["public"])
        .with_method_tags(["admin"]);
    assert!(is_visible(&candidate, &tags(&["admin"])));
}

#[test]
fn no_tag_match_is_rejected() {
    let candidate = CandidateOperation::new("/users", "/", "get")
        .with_class_tags(["public"])
        .with_method_tags(["internal"]);
    assert!(!is_visible(&candidate, &tags(&["admin"])));
}

#[test]
fn untagged_candidate_rejected_when_filtering() {
    let candidate = CandidateOperation::new("/users", "/", "get");
    assert!(!is_visible(&candidate, &tags(&["admin"])));
    assert!(is_visible(&candidate, &BTreeSet::new()));
}

#[test]
fn operation_path_composition() {
    assert_eq!(CandidateOperation::new("/users", "/{id}", "get").operation_path(), "/users/{id}");
    assert_eq!(CandidateOperation::new("/users/", "", "get").operation_path(), "/users");
    assert_eq!(CandidateOperation::new("users", "{id}", "get").operation_path(), "/users/{id}");
    assert_eq!(CandidateOperation::new("/", "/", "get").operation_path(), "");
}

#[test]
fn select_paths_drops_empty_and_unmatched() {
    let raw = raw_table(&[("/users", "get", "listUsers"), ("/users/{id}", "get", "getUser")]);
    let candidates = vec![
        CandidateOperation::new("/", "/", "get"),
        CandidateOperation::new("/users", "/", "get"),
        CandidateOperation::new("/ghost", "/", "get"),
        CandidateOperation::new("/users", "/{id}", "post"),
        CandidateOperation::new("/users", "/{id}", "get"),
    ];

    let selected = select_paths(&candidates, &BTreeSet::new(), &raw);
    let keys: Vec<_> = selected.keys().cloned().collect();
    assert_eq!(keys, vec!["/users", "/users/{id}"]);
    assert_eq!(selected["/users/{id}"].len(), 1);
    assert!(selected["/users/{id}"].contains_key("get"));
}

#[test]
fn select_paths_follows_candidate_order_not_raw_order() {
    let raw = raw_table(&[("/a", "get", "a"), ("/b", "get", "b"), ("/c", "get", "c")]);
    let candidates = vec![
        CandidateOperation::new("/c", "/", "get"),
        CandidateOperation::new("/a", "/", "get"),
        CandidateOperation::new("/b", "/", "get"),
    ];

    let selected = select_paths(&candidates, &BTreeSet::new(), &raw);
    let keys: Vec<_> = selected.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["/c", "/a", "/b"]);
}

#[test]
fn select_paths_merges_methods_on_shared_path() {
    let raw = raw_table(&[("/items", "get", "list"), ("/items", "post", "create")]);
    let candidates = vec![
        CandidateOperation::new("/items", "/", "get").with_method_tags(["public"]),
        CandidateOperation::new("/items", "/", "post").with_method_tags(["admin"]),
    ];

    let everything = select_paths(&candidates, &BTreeSet::new(), &raw);
    assert_eq!(everything["/items"].len(), 2);

    let public_only = select_paths(&candidates, &tags(&["public"]), &raw);
    assert_eq!(public_only["/items"].len(), 1);
    assert_eq!(
        public_only["/items"]["get"].operation_id.as_deref(),
        Some("list")
    );
}
