//! Contributor lists and the rights resolver.
//!
//! Contributor lists travel as embedded JSON (inside table-of-contents
//! records and on the session itself) with a fixed field layout shared with
//! already-stored sessions. Lists merge per role: a work that names any
//! contributor for a role fully overrides the session default for that role.
//! Malformed stored JSON never aborts a workflow; it is logged and treated
//! as an empty list or a failed match.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identifier of an authority record (a person or corporate entity).
pub type AuthorityId = u64;

/// Literal JSON value of the explicit-empty contributor list. Distinguishes
/// "no contributors, and do not apply defaults" from an unset list.
pub const EXPLICIT_EMPTY: &str = "[]";

/// Role a contributor plays for a work or container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Original author
    Author,
    /// Editor
    Editor,
    /// Illustrator
    Illustrator,
    /// Translator
    Translator,
    /// Photographer
    Photographer,
    /// Designer
    Designer,
    /// Generic contributor
    Contributor,
    /// Any other role
    Other,
}

/// One entry of a contributor list.
///
/// Field names are part of the stored-session contract and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    /// Presentation order within the list.
    #[serde(default)]
    pub seqno: u32,
    /// Authority record id; absent for names not yet linked to a record.
    #[serde(default)]
    pub authority_id: Option<AuthorityId>,
    /// Display name, informational only.
    #[serde(default)]
    pub authority_name: String,
    /// Role played.
    pub role: Role,
}

/// Parse a contributor-list JSON string.
///
/// A blank string is an empty list. Malformed JSON degrades to an empty list
/// with a warning, so a corrupt record never aborts the surrounding
/// workflow.
pub fn parse_contributors(json: &str) -> Vec<Contributor> {
    let trimmed = json.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str(trimmed) {
        Ok(list) => list,
        Err(e) => {
            log::warn!("malformed contributor list ignored: {}", e);
            Vec::new()
        },
    }
}

/// Merge a work's contributor list with the session defaults, per role.
///
/// The literal `[]` sentinel means "explicitly no contributors" and yields an
/// empty result regardless of defaults. Otherwise the work list wins: for
/// every role it names, the defaults for that role are dropped wholesale;
/// defaults for roles the work list lacks are appended.
///
/// # Examples
///
/// ```
/// use manuscript_ingest::contributors::{merge_per_role, Role};
///
/// let work = r#"[{"seqno":1,"authority_id":5,"authority_name":"T","role":"translator"}]"#;
/// let defaults = concat!(
///     r#"[{"seqno":1,"authority_id":1,"authority_name":"A","role":"author"},"#,
///     r#"{"seqno":2,"authority_id":9,"authority_name":"U","role":"translator"}]"#,
/// );
/// let merged = merge_per_role(work, defaults);
/// assert_eq!(merged.len(), 2);
/// assert_eq!(merged[0].authority_id, Some(5));
/// assert_eq!(merged[1].role, Role::Author);
/// ```
pub fn merge_per_role(work_json: &str, default_json: &str) -> Vec<Contributor> {
    if work_json.trim() == EXPLICIT_EMPTY {
        return Vec::new();
    }

    let work = parse_contributors(work_json);
    let defaults = parse_contributors(default_json);
    if defaults.is_empty() {
        return work;
    }

    let work_roles: HashSet<Role> = work.iter().map(|c| c.role).collect();
    let mut merged = work;
    for default in defaults {
        if !work_roles.contains(&default.role) {
            merged.push(default);
        }
    }
    merged
}

/// Project a contributor list to its conflict-comparison set.
///
/// Ordinals and display names are presentation data; only the
/// `(authority_id, role)` pairs matter for duplicate detection.
pub fn credit_set(list: &[Contributor]) -> HashSet<(Option<AuthorityId>, Role)> {
    list.iter().map(|c| (c.authority_id, c.role)).collect()
}

/// Whether two stored contributor-list JSON strings describe the same set of
/// `(authority_id, role)` pairs.
///
/// Two blank strings match; one blank string never matches a non-blank one;
/// malformed JSON on either side is logged and treated as no match.
pub fn credit_sets_match(json_a: &str, json_b: &str) -> bool {
    let a_blank = json_a.trim().is_empty();
    let b_blank = json_b.trim().is_empty();
    if a_blank && b_blank {
        return true;
    }
    if a_blank || b_blank {
        return false;
    }

    let parse = |json: &str| -> Option<Vec<Contributor>> {
        match serde_json::from_str(json.trim()) {
            Ok(list) => Some(list),
            Err(e) => {
                log::warn!("malformed contributor list in comparison: {}", e);
                None
            },
        }
    };
    match (parse(json_a), parse(json_b)) {
        (Some(a), Some(b)) => credit_set(&a) == credit_set(&b),
        _ => false,
    }
}

/// Rights classification of a work derived from its contributors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RightsStatus {
    /// Every referenced contributor is known to be public domain.
    PublicDomain,
    /// At least one contributor is not public domain, or nothing is known.
    Copyrighted,
}

impl RightsStatus {
    /// Wire code of the classification.
    pub fn as_str(&self) -> &'static str {
        match self {
            RightsStatus::PublicDomain => "public_domain",
            RightsStatus::Copyrighted => "copyrighted",
        }
    }
}

/// External registry of authority records, consulted for rights status.
pub trait AuthorityDirectory {
    /// Whether the authority's works are in the public domain.
    fn is_public_domain(&self, id: AuthorityId) -> bool;
}

/// Classify rights from the set of referenced authority ids.
///
/// An empty set yields the conservative [`RightsStatus::Copyrighted`];
/// otherwise public domain requires every distinct id to be public domain.
pub fn resolve_rights(ids: &[AuthorityId], directory: &dyn AuthorityDirectory) -> RightsStatus {
    let distinct: HashSet<AuthorityId> = ids.iter().copied().collect();
    if distinct.is_empty() {
        return RightsStatus::Copyrighted;
    }
    if distinct.iter().all(|id| directory.is_public_domain(*id)) {
        RightsStatus::PublicDomain
    } else {
        RightsStatus::Copyrighted
    }
}
