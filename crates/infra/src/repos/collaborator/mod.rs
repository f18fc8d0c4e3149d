mod inmemory;
mod postgres;

use coupon_ledger_domain::{Branch, Collaborator, CollaboratorWithBranches, ID};
pub use inmemory::InMemoryCollaboratorRepo;
pub use postgres::PostgresCollaboratorRepo;

/// Read access to the `Collaborator`s and their `Branch`es. They are managed
/// by another service, `insert` only exists for seeding.
#[async_trait::async_trait]
pub trait ICollaboratorRepo: Send + Sync {
    async fn insert(&self, collaborator: &Collaborator) -> anyhow::Result<()>;
    async fn insert_branch(&self, branch: &Branch) -> anyhow::Result<()>;
    async fn find(&self, collaborator_id: &ID) -> anyhow::Result<Option<Collaborator>>;
    async fn find_branch(&self, branch_id: &ID) -> anyhow::Result<Option<Branch>>;
    /// All `Collaborator`s in a stable order, each with all of its `Branch`es
    async fn find_all_with_branches(&self) -> anyhow::Result<Vec<CollaboratorWithBranches>>;
}
