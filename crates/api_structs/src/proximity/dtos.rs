use coupon_ledger_domain::{Branch, RankedCollaborator, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BranchDTO {
    pub id: ID,
    pub collaborator_id: ID,
    pub name: String,
    pub location: Option<String>,
}

impl BranchDTO {
    pub fn new(branch: Branch) -> Self {
        Self {
            id: branch.id,
            collaborator_id: branch.collaborator_id,
            name: branch.name,
            location: branch.location,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NearbyCollaboratorDTO {
    pub id: ID,
    pub name: String,
    /// Distance in km to the closest branch
    pub distance: f64,
    pub closest_branch: BranchDTO,
    pub total_branches_with_location: usize,
}

impl NearbyCollaboratorDTO {
    pub fn new(ranked: RankedCollaborator) -> Self {
        Self {
            id: ranked.collaborator.id,
            name: ranked.collaborator.name,
            distance: ranked.distance,
            closest_branch: BranchDTO::new(ranked.closest_branch),
            total_branches_with_location: ranked.total_branches_with_location,
        }
    }
}
