//! Integration tests for contributor merging and rights resolution.

use manuscript_ingest::contributors::{
    credit_set, credit_sets_match, merge_per_role, parse_contributors, resolve_rights,
    AuthorityDirectory, AuthorityId, Contributor, Role, RightsStatus, EXPLICIT_EMPTY,
};
use std::collections::HashSet;

fn contributor(id: AuthorityId, role: Role) -> Contributor {
    Contributor {
        seqno: 1,
        authority_id: Some(id),
        authority_name: format!("authority {}", id),
        role,
    }
}

fn json(list: &[Contributor]) -> String {
    serde_json::to_string(list).unwrap()
}

struct PublicDomainSet(HashSet<AuthorityId>);

impl AuthorityDirectory for PublicDomainSet {
    fn is_public_domain(&self, id: AuthorityId) -> bool {
        self.0.contains(&id)
    }
}

// Per-role merging

#[test]
fn test_work_role_overrides_default_role() {
    let work = json(&[contributor(5, Role::Translator)]);
    let defaults = json(&[contributor(1, Role::Author), contributor(9, Role::Translator)]);

    let merged = merge_per_role(&work, &defaults);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].authority_id, Some(5));
    assert_eq!(merged[0].role, Role::Translator);
    assert_eq!(merged[1].authority_id, Some(1));
    assert_eq!(merged[1].role, Role::Author);
}

#[test]
fn test_blank_work_list_uses_all_defaults() {
    let defaults = json(&[contributor(1, Role::Author)]);
    let merged = merge_per_role("", &defaults);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].authority_id, Some(1));
}

#[test]
fn test_explicit_empty_sentinel_overrides_defaults() {
    let defaults = json(&[contributor(1, Role::Author)]);
    assert!(merge_per_role(EXPLICIT_EMPTY, &defaults).is_empty());
    assert!(merge_per_role(" [] ", &defaults).is_empty());
}

#[test]
fn test_merge_with_no_defaults_returns_work_list() {
    let work = json(&[contributor(3, Role::Editor)]);
    let merged = merge_per_role(&work, "");
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].role, Role::Editor);
}

#[test]
fn test_malformed_work_list_degrades_to_defaults() {
    let defaults = json(&[contributor(1, Role::Author)]);
    let merged = merge_per_role("{not valid json", &defaults);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].role, Role::Author);
}

#[test]
fn test_parse_round_trips_stored_field_names() {
    let raw = r#"[{"seqno":1,"authority_id":7,"authority_name":"שם","role":"editor"}]"#;
    let parsed = parse_contributors(raw);
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].authority_id, Some(7));
    assert_eq!(parsed[0].role, Role::Editor);
}

// Set comparisons

#[test]
fn test_credit_sets_match_ignores_order() {
    let a = json(&[contributor(1, Role::Author), contributor(2, Role::Editor)]);
    let b = json(&[contributor(2, Role::Editor), contributor(1, Role::Author)]);
    assert!(credit_sets_match(&a, &b));
}

#[test]
fn test_credit_sets_differ_by_role() {
    let a = json(&[contributor(1, Role::Author)]);
    let b = json(&[contributor(1, Role::Translator)]);
    assert!(!credit_sets_match(&a, &b));
}

#[test]
fn test_credit_sets_blank_rules() {
    assert!(credit_sets_match("", ""));
    assert!(credit_sets_match("  ", ""));
    let a = json(&[contributor(1, Role::Author)]);
    assert!(!credit_sets_match(&a, ""));
    assert!(!credit_sets_match("", &a));
}

#[test]
fn test_malformed_json_never_matches() {
    let a = json(&[contributor(1, Role::Author)]);
    assert!(!credit_sets_match("{broken", &a));
    assert!(!credit_sets_match(&a, "{broken"));
}

#[test]
fn test_credit_set_projection() {
    let list = vec![contributor(1, Role::Author), contributor(1, Role::Author)];
    // Duplicate pairs collapse; display data is irrelevant.
    assert_eq!(credit_set(&list).len(), 1);
}

// Rights resolution

#[test]
fn test_no_authorities_is_conservative() {
    let directory = PublicDomainSet(HashSet::new());
    assert_eq!(resolve_rights(&[], &directory), RightsStatus::Copyrighted);
}

#[test]
fn test_all_public_domain() {
    let directory = PublicDomainSet([1, 2].into_iter().collect());
    assert_eq!(
        resolve_rights(&[1, 2, 2], &directory),
        RightsStatus::PublicDomain
    );
}

#[test]
fn test_one_protected_authority_wins() {
    let directory = PublicDomainSet([1].into_iter().collect());
    assert_eq!(
        resolve_rights(&[1, 3], &directory),
        RightsStatus::Copyrighted
    );
}

#[test]
fn test_rights_wire_codes() {
    assert_eq!(RightsStatus::PublicDomain.as_str(), "public_domain");
    assert_eq!(RightsStatus::Copyrighted.as_str(), "copyrighted");
}
