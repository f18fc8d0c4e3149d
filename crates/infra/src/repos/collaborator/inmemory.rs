use super::ICollaboratorRepo;
use crate::repos::shared::inmemory_repo::*;
use coupon_ledger_domain::{Branch, Collaborator, CollaboratorWithBranches, ID};

pub struct InMemoryCollaboratorRepo {
    collaborators: std::sync::Mutex<Vec<Collaborator>>,
    branches: std::sync::Mutex<Vec<Branch>>,
}

impl InMemoryCollaboratorRepo {
    pub fn new() -> Self {
        Self {
            collaborators: std::sync::Mutex::new(vec![]),
            branches: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl ICollaboratorRepo for InMemoryCollaboratorRepo {
    async fn insert(&self, collaborator: &Collaborator) -> anyhow::Result<()> {
        insert(collaborator, &self.collaborators);
        Ok(())
    }

    async fn insert_branch(&self, branch: &Branch) -> anyhow::Result<()> {
        insert(branch, &self.branches);
        Ok(())
    }

    async fn find(&self, collaborator_id: &ID) -> anyhow::Result<Option<Collaborator>> {
        Ok(find(collaborator_id, &self.collaborators))
    }

    async fn find_branch(&self, branch_id: &ID) -> anyhow::Result<Option<Branch>> {
        Ok(find(branch_id, &self.branches))
    }

    async fn find_all_with_branches(&self) -> anyhow::Result<Vec<CollaboratorWithBranches>> {
        let collaborators = find_by(&self.collaborators, |_| true);
        let branches = find_by(&self.branches, |_| true);

        Ok(collaborators
            .into_iter()
            .map(|collaborator| {
                let branches = branches
                    .iter()
                    .filter(|b| b.collaborator_id == collaborator.id)
                    .cloned()
                    .collect();
                CollaboratorWithBranches {
                    collaborator,
                    branches,
                }
            })
            .collect())
    }
}
