//! Duplicate/conflict detection for prospective target containers.
//!
//! Two concurrent ingestion sessions are free to run against the same
//! prospective container (the advisory lock does not prevent it), so this
//! detector is the last gate before any persistence commit. It compares
//! contributor lists as exact sets of `(authority_id, role)` pairs; nothing
//! fuzzy. Findings are validation outcomes carrying enough detail for a
//! human to resolve, never errors.

use crate::contributors::{credit_set, credit_sets_match, parse_contributors, AuthorityId, Role};
use crate::session::{ContainerId, ContainerTarget, IngestSession, PublicationId};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// A stored container row as seen by the detector.
#[derive(Debug, Clone)]
pub struct ContainerRecord {
    /// Container id.
    pub id: ContainerId,
    /// Container title.
    pub title: String,
    /// Credited contributors, already projected to id/role pairs.
    pub credits: Vec<(AuthorityId, Role)>,
}

/// Another in-flight session's container proposal.
#[derive(Debug, Clone)]
pub struct PeerProposal {
    /// Proposing session.
    pub session_id: Uuid,
    /// What the peer proposes to create.
    pub target: ProspectiveTarget,
    /// The peer's container contributor list, as stored JSON.
    pub credits_json: String,
}

/// The two ways a new container can be proposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProspectiveTarget {
    /// Derived from a source publication.
    Publication(PublicationId),
    /// Created from scratch under a title.
    Title(String),
}

/// Query access to stored containers.
pub trait ContainerCatalog {
    /// Containers with the given title.
    fn containers_titled(&self, title: &str) -> Vec<ContainerRecord>;

    /// The container already derived from a publication, if any.
    fn container_for_publication(&self, publication: PublicationId) -> Option<ContainerRecord>;
}

/// Query access to other in-flight ingestion sessions.
pub trait SessionDirectory {
    /// Container proposals of every in-flight session except `exclude`.
    fn in_flight_proposals(&self, exclude: Uuid) -> Vec<PeerProposal>;
}

/// One detected collision, naming the rule and the colliding record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// An existing container shares the proposed title and contributor set.
    ContainerByTitle {
        /// The colliding container.
        container: ContainerId,
        /// Its title.
        title: String,
    },
    /// A container for the proposed publication already exists with the same
    /// contributor set.
    ContainerForPublication {
        /// The colliding container.
        container: ContainerId,
        /// The publication both derive from.
        publication: PublicationId,
    },
    /// Another in-flight session proposes the same target with the same
    /// contributor set.
    PeerSession {
        /// The other session.
        session: Uuid,
    },
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::ContainerByTitle { container, title } => {
                write!(
                    f,
                    "container {} titled '{}' already has this contributor set",
                    container, title
                )
            },
            Conflict::ContainerForPublication {
                container,
                publication,
            } => {
                write!(
                    f,
                    "container {} already exists for publication {} with this contributor set",
                    container, publication
                )
            },
            Conflict::PeerSession { session } => {
                write!(f, "session {} already proposes this container", session)
            },
        }
    }
}

/// Check a session's prospective container against stored containers and
/// other in-flight sessions.
///
/// Runs only when the session actually proposes creating a new container and
/// names at least one contributor for it; otherwise there is nothing to
/// collide with and the result is empty. An empty result permits creation.
pub fn detect_conflicts(
    session: &IngestSession,
    catalog: &dyn ContainerCatalog,
    directory: &dyn SessionDirectory,
) -> Vec<Conflict> {
    if !session.creating_new_container() {
        return Vec::new();
    }
    let proposed = parse_contributors(&session.container_contributors);
    if proposed.is_empty() {
        return Vec::new();
    }
    let proposed_set = credit_set(&proposed);

    let mut conflicts = Vec::new();
    match &session.target {
        ContainerTarget::ProspectivePublication(publication) => {
            if let Some(existing) = catalog.container_for_publication(*publication) {
                if stored_credit_set(&existing.credits) == proposed_set {
                    conflicts.push(Conflict::ContainerForPublication {
                        container: existing.id,
                        publication: *publication,
                    });
                }
            }
        },
        ContainerTarget::ProspectiveTitle(title) => {
            for existing in catalog.containers_titled(title) {
                if stored_credit_set(&existing.credits) == proposed_set {
                    conflicts.push(Conflict::ContainerByTitle {
                        container: existing.id,
                        title: existing.title,
                    });
                    break;
                }
            }
        },
        _ => return conflicts,
    }

    for peer in directory.in_flight_proposals(session.id) {
        let same_target = match (&peer.target, &session.target) {
            (ProspectiveTarget::Publication(a), ContainerTarget::ProspectivePublication(b)) => {
                a == b
            },
            (ProspectiveTarget::Title(a), ContainerTarget::ProspectiveTitle(b)) => a == b,
            _ => false,
        };
        if same_target && credit_sets_match(&peer.credits_json, &session.container_contributors) {
            conflicts.push(Conflict::PeerSession {
                session: peer.session_id,
            });
            break;
        }
    }

    conflicts
}

fn stored_credit_set(credits: &[(AuthorityId, Role)]) -> HashSet<(Option<AuthorityId>, Role)> {
    credits.iter().map(|(id, role)| (Some(*id), *role)).collect()
}
