use crate::shared::entity::{Entity, ID};

/// A consumer of coupons. Owned by an external user service, this core
/// only needs to know that the user exists.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: ID,
}

impl User {
    pub fn new() -> Self {
        Self {
            id: Default::default(),
        }
    }
}

impl Default for User {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}
