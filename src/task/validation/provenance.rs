//! Link provenance classification for remote deletion.

use super::LinkValidationError;
use crate::task::domain::{Link, LinkProvenance, MetadataRelation};
use serde::{Deserialize, Serialize};

/// What the provider needs to delete a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provenance", rename_all = "snake_case")]
pub enum LinkDeletion {
    /// Delete a first-class remote link.
    Native {
        /// Remote identifier of the linked target.
        remote_target: String,
    },
    /// Remove relation metadata from the source description.
    Metadata {
        /// Relation recorded in the metadata.
        relation: MetadataRelation,
        /// Project-local number of the target.
        target_iid: u64,
    },
}

/// Classifies a link for deletion.
///
/// # Errors
///
/// Returns [`LinkValidationError::IncompleteMetadata`] when the link has no
/// provider record yet, or its record lacks the fields its provenance
/// requires.
pub fn classify_deletion(link: &Link) -> Result<LinkDeletion, LinkValidationError> {
    let incomplete = || LinkValidationError::IncompleteMetadata(link.id());
    let record = link.record().ok_or_else(incomplete)?;
    match record.provenance {
        LinkProvenance::Native => record
            .remote_target
            .as_ref()
            .filter(|target| !target.trim().is_empty())
            .map(|target| LinkDeletion::Native {
                remote_target: target.clone(),
            })
            .ok_or_else(incomplete),
        LinkProvenance::Metadata => match (record.relation, record.target_iid) {
            (Some(relation), Some(target_iid)) => Ok(LinkDeletion::Metadata {
                relation,
                target_iid,
            }),
            _ => Err(incomplete()),
        },
    }
}
