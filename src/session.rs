//! The ingestion session aggregate.
//!
//! An [`IngestSession`] holds one manuscript on its way into the catalogue:
//! the normalized markup, the per-work table of contents, derived work
//! records, contributor defaults, the target-container decision, and the
//! advisory edit lock. The pipeline operations themselves (normalization,
//! splitting, relocation) are pure; the session sequences them and tracks
//! staleness so derived buffers are only rebuilt after the markup changed.

use crate::config::IngestConfig;
use crate::contributors::{
    merge_per_role, parse_contributors, resolve_rights, AuthorityDirectory, AuthorityId,
    Contributor, RightsStatus,
};
use crate::converter::{diagnostics_exhausted_resources, Converter};
use crate::error::{Error, Result};
use crate::footnotes::{has_footnote_markers, relocate_footnotes};
use crate::hebrew::Vocalization;
use crate::normalizer::Normalizer;
use crate::splitter::{has_multiple_works, split_works, Work};
use crate::toc::{decode_toc, encode_toc, included, placeholders, TocEntry};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Identifier of a target container (volume or other grouping entity).
pub type ContainerId = u64;

/// Identifier of a source publication.
pub type PublicationId = u64;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Being prepared and edited.
    Draft,
    /// All derived works persisted successfully.
    Ingested,
    /// Unrecoverable conversion error.
    Failed,
    /// Blocked on authority records that do not exist yet.
    AwaitingAuthorities,
}

/// Shape of the manuscript, derived from its markup and table of contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// One work.
    Single,
    /// Several works, all uploaded.
    Multiple,
    /// Several works, some recorded as placeholders only.
    Mixed,
}

/// How the session resolves its target container.
///
/// Exactly one driver at a time, by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerTarget {
    /// Works are attached to no container.
    NoContainer,
    /// Reuse an existing container.
    Existing(ContainerId),
    /// Load an existing container chosen during review.
    ProspectiveExisting(ContainerId),
    /// Create a new container derived from a publication.
    ProspectivePublication(PublicationId),
    /// Create a new container from scratch under this title.
    ProspectiveTitle(String),
}

/// Advisory edit lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lock {
    /// Identity of the holder.
    pub holder: String,
    /// Last refresh time; the lock expires a fixed window after it.
    pub refreshed_at: DateTime<Utc>,
}

/// One manuscript being prepared for inclusion in the catalogue.
#[derive(Debug, Clone)]
pub struct IngestSession {
    /// Session identity.
    pub id: Uuid,
    /// Human-facing session title.
    pub title: String,
    /// Lifecycle state.
    pub status: Status,
    /// Normalized markup, editable by reviewers.
    pub markup: String,
    /// Flat table-of-contents buffer, editable by reviewers.
    pub toc_buffer: String,
    /// Works derived from the markup.
    pub works: Vec<Work>,
    /// Default contributor list (JSON) applied to works per role.
    pub default_contributors: String,
    /// Contributor list (JSON) for the target container itself.
    pub container_contributors: String,
    /// Publisher line carried to created works.
    pub publisher: Option<String>,
    /// Publication year carried to created works.
    pub year_published: Option<String>,
    /// Target-container decision.
    pub target: ContainerTarget,
    /// Last markup change.
    pub markup_updated_at: DateTime<Utc>,
    /// Last rebuild of the derived works, if any.
    pub works_updated_at: Option<DateTime<Utc>>,
    lock: Option<Lock>,
}

impl IngestSession {
    /// Create a fresh draft session.
    pub fn new(title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            status: Status::Draft,
            markup: String::new(),
            toc_buffer: String::new(),
            works: Vec::new(),
            default_contributors: String::new(),
            container_contributors: String::new(),
            publisher: None,
            year_published: None,
            target: ContainerTarget::NoContainer,
            markup_updated_at: now,
            works_updated_at: None,
            lock: None,
        }
    }

    // ── Markup and derived works ────────────────────────────────────────

    /// Replace the markup (reviewer edit path) and record the change time.
    pub fn set_markup(&mut self, markup: impl Into<String>, now: DateTime<Utc>) {
        self.markup = markup.into();
        self.markup_updated_at = now;
    }

    /// Convert an uploaded document and store the normalized markup.
    ///
    /// Resource exhaustion is returned as the retryable
    /// [`Error::ConversionResources`] with the session untouched, so the
    /// caller can retry the upload. Any other conversion failure marks the
    /// session [`Status::Failed`].
    pub fn convert_document(
        &mut self,
        converter: &dyn Converter,
        document: &[u8],
        config: &IngestConfig,
        vocalization: &dyn Vocalization,
        now: DateTime<Utc>,
    ) -> Result<()> {
        match converter.convert(document, &config.converter_options()) {
            Ok(conversion) => {
                if diagnostics_exhausted_resources(&conversion.diagnostics) {
                    return Err(Error::ConversionResources);
                }
                let normalized = Normalizer::new(vocalization).normalize(&conversion.markup);
                self.set_markup(normalized, now);
                Ok(())
            },
            Err(Error::ConversionResources) => Err(Error::ConversionResources),
            Err(e) => {
                self.status = Status::Failed;
                Err(e)
            },
        }
    }

    /// Whether the derived works lag behind the markup.
    pub fn works_stale(&self) -> bool {
        self.works_updated_at
            .map_or(true, |at| self.markup_updated_at > at)
    }

    /// Rebuild the derived works from the markup.
    ///
    /// Splits the markup into works and, when the document bundles several
    /// works and carries footnote markers, rewrites each work's content with
    /// its relocated footnotes. Work boundaries can move under manual markup
    /// edits, so the rebuild always starts from the full markup.
    pub fn refresh_works(&mut self, now: DateTime<Utc>) {
        if self.markup.trim().is_empty() {
            return;
        }
        let mut works = split_works(&self.markup);
        if has_multiple_works(&self.markup) && has_footnote_markers(&self.markup) {
            let relocated = relocate_footnotes(&self.markup);
            for (i, body) in relocated.values().enumerate() {
                if let Some(work) = works.get_mut(i) {
                    work.content = body.clone();
                }
            }
        }
        self.works = works;
        self.works_updated_at = Some(now);
    }

    /// Rebuild the derived works only when stale.
    pub fn sync_works(&mut self, now: DateTime<Utc>) {
        if self.works_stale() {
            self.refresh_works(now);
        }
    }

    /// Whether the markup bundles more than one work.
    pub fn has_multiple_works(&self) -> bool {
        has_multiple_works(&self.markup)
    }

    /// Shape of the manuscript: mixed when the table of contents lists both
    /// uploaded works and placeholders, multiple when the markup bundles
    /// several works, single otherwise.
    pub fn scenario(&self) -> Scenario {
        if let Ok(entries) = self.decode_toc() {
            if !included(&entries).is_empty() && !placeholders(&entries).is_empty() {
                return Scenario::Mixed;
            }
        }
        if self.has_multiple_works() {
            Scenario::Multiple
        } else {
            Scenario::Single
        }
    }

    // ── Table of contents ───────────────────────────────────────────────

    /// Decode the table-of-contents buffer.
    pub fn decode_toc(&self) -> Result<Vec<TocEntry>> {
        decode_toc(&self.toc_buffer)
    }

    /// Replace the table-of-contents buffer from records.
    pub fn set_toc(&mut self, entries: &[TocEntry]) {
        self.toc_buffer = encode_toc(entries);
    }

    /// Records flagged for upload.
    pub fn included_entries(&self) -> Result<Vec<TocEntry>> {
        let entries = self.decode_toc()?;
        Ok(included(&entries).into_iter().cloned().collect())
    }

    /// Records kept as placeholders only.
    pub fn placeholder_entries(&self) -> Result<Vec<TocEntry>> {
        let entries = self.decode_toc()?;
        Ok(placeholders(&entries).into_iter().cloned().collect())
    }

    // ── Contributors and rights ─────────────────────────────────────────

    /// Adopt a container's contributor list (fetched by the caller from
    /// storage) as this session's container contributors, mirroring it into
    /// the defaults unless those were edited by hand.
    ///
    /// Publisher metadata is taken over when `replace_publisher` is set or
    /// nothing was recorded yet.
    pub fn adopt_container_credits(
        &mut self,
        credits: &[Contributor],
        publisher: Option<&str>,
        year_published: Option<&str>,
        replace_publisher: bool,
    ) -> Result<()> {
        let previous = std::mem::take(&mut self.container_contributors);
        if !credits.is_empty() {
            self.container_contributors = serde_json::to_string(credits)?;
            let defaults_untouched = self.default_contributors.trim().is_empty()
                || self.default_contributors == previous;
            if defaults_untouched {
                self.default_contributors = self.container_contributors.clone();
            }
        }
        if publisher.is_some() && (replace_publisher || self.publisher.is_none()) {
            self.publisher = publisher.map(str::to_string);
            self.year_published = year_published.map(str::to_string);
        }
        Ok(())
    }

    /// Effective contributor list for one work: the work's own list merged
    /// with the session defaults per role.
    pub fn effective_contributors(&self, work_contributors_json: &str) -> Vec<Contributor> {
        merge_per_role(work_contributors_json, &self.default_contributors)
    }

    /// Rights classification for one work at finalize time.
    ///
    /// Collects every authority referenced by the work's effective
    /// contributor list and by the container's own list, then asks the
    /// directory whether all of them are public domain.
    pub fn calculate_rights(
        &self,
        work_contributors_json: &str,
        directory: &dyn AuthorityDirectory,
    ) -> RightsStatus {
        let merged = self.effective_contributors(work_contributors_json);
        let container = parse_contributors(&self.container_contributors);
        let ids: Vec<AuthorityId> = merged
            .iter()
            .chain(container.iter())
            .filter_map(|c| c.authority_id)
            .collect();
        resolve_rights(&ids, directory)
    }

    // ── Target container ────────────────────────────────────────────────

    /// Whether finalizing this session would create a new container.
    ///
    /// Only prospective targets create; reusing or loading an existing
    /// container never does, and neither does a session already past its
    /// draft lifecycle.
    pub fn creating_new_container(&self) -> bool {
        if matches!(self.status, Status::Ingested | Status::Failed) {
            return false;
        }
        matches!(
            self.target,
            ContainerTarget::ProspectivePublication(_) | ContainerTarget::ProspectiveTitle(_)
        )
    }

    // ── Advisory lock ───────────────────────────────────────────────────

    /// Current lock, whether expired or not.
    pub fn lock(&self) -> Option<&Lock> {
        self.lock.as_ref()
    }

    /// Whether an unexpired lock exists.
    pub fn is_locked(&self, now: DateTime<Utc>, config: &IngestConfig) -> bool {
        self.lock.as_ref().map_or(false, |lock| {
            now - lock.refreshed_at < Duration::seconds(config.lock_timeout_secs)
        })
    }

    /// Acquire or refresh the advisory lock.
    ///
    /// Fails against another holder's unexpired lock. An expired lock can be
    /// taken over by anyone. Re-acquiring one's own lock within the debounce
    /// window performs no write at all, so rapid UI polling does not amplify
    /// into storage churn. This is a metadata-only update that bypasses
    /// content validation; a corrupt session must still be lockable.
    pub fn acquire_lock(
        &mut self,
        holder: &str,
        now: DateTime<Utc>,
        config: &IngestConfig,
    ) -> bool {
        if self.is_locked(now, config)
            && self.lock.as_ref().map_or(false, |l| l.holder != holder)
        {
            return false;
        }
        let refresh = match &self.lock {
            None => true,
            Some(lock) => now - lock.refreshed_at >= Duration::seconds(config.lock_debounce_secs),
        };
        if refresh {
            self.lock = Some(Lock {
                holder: holder.to_string(),
                refreshed_at: now,
            });
        }
        true
    }

    /// Release the lock unconditionally. Metadata-only, like acquisition.
    pub fn release_lock(&mut self) {
        self.lock = None;
    }

    /// Boundary check before edits: errors when another holder's unexpired
    /// lock is in place. The pipeline itself never consults the lock.
    pub fn ensure_editable(
        &self,
        holder: &str,
        now: DateTime<Utc>,
        config: &IngestConfig,
    ) -> Result<()> {
        match &self.lock {
            Some(lock) if self.is_locked(now, config) && lock.holder != holder => {
                Err(Error::Locked {
                    holder: lock.holder.clone(),
                })
            },
            _ => Ok(()),
        }
    }
}
