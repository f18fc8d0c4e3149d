use crate::{
    geo::Coordinates,
    shared::entity::{Entity, ID},
};
use serde::Serialize;

/// A business offering `Promotion`s through one or more physical `Branch`es
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collaborator {
    pub id: ID,
    pub name: String,
}

impl Collaborator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Default::default(),
            name: name.into(),
        }
    }
}

impl Entity for Collaborator {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Branch {
    pub id: ID,
    pub collaborator_id: ID,
    pub name: String,
    /// Location as persisted, e.g. `"(-99.1332,19.4326)"`. Branches that have
    /// not been geocoded yet have no location, and legacy rows may hold
    /// garbage, so this is only ever interpreted through `Branch::coordinates`.
    pub location: Option<String>,
}

impl Branch {
    pub fn new(
        collaborator_id: ID,
        name: impl Into<String>,
        location: Option<Coordinates>,
    ) -> Self {
        Self {
            id: Default::default(),
            collaborator_id,
            name: name.into(),
            location: location.map(|c| c.format_for_storage()),
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.location.as_deref().and_then(Coordinates::parse)
    }
}

impl Entity for Branch {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollaboratorWithBranches {
    pub collaborator: Collaborator,
    pub branches: Vec<Branch>,
}
