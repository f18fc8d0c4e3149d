use super::ICollaboratorRepo;
use coupon_ledger_domain::{Branch, Collaborator, CollaboratorWithBranches, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::collections::HashMap;

pub struct PostgresCollaboratorRepo {
    pool: PgPool,
}

impl PostgresCollaboratorRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CollaboratorRaw {
    collaborator_uid: Uuid,
    name: String,
}

#[derive(Debug, FromRow)]
struct BranchRaw {
    branch_uid: Uuid,
    collaborator_uid: Uuid,
    name: String,
    location: Option<String>,
}

impl From<CollaboratorRaw> for Collaborator {
    fn from(raw: CollaboratorRaw) -> Self {
        Self {
            id: raw.collaborator_uid.into(),
            name: raw.name,
        }
    }
}

impl From<BranchRaw> for Branch {
    fn from(raw: BranchRaw) -> Self {
        Self {
            id: raw.branch_uid.into(),
            collaborator_id: raw.collaborator_uid.into(),
            name: raw.name,
            location: raw.location,
        }
    }
}

#[async_trait::async_trait]
impl ICollaboratorRepo for PostgresCollaboratorRepo {
    async fn insert(&self, collaborator: &Collaborator) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO collaborators(collaborator_uid, name)
            VALUES($1, $2)
            "#,
        )
        .bind(collaborator.id.inner_ref())
        .bind(&collaborator.name)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_branch(&self, branch: &Branch) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO branches(branch_uid, collaborator_uid, name, location)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(branch.id.inner_ref())
        .bind(branch.collaborator_id.inner_ref())
        .bind(&branch.name)
        .bind(&branch.location)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, collaborator_id: &ID) -> anyhow::Result<Option<Collaborator>> {
        let collaborator: Option<CollaboratorRaw> = sqlx::query_as(
            r#"
            SELECT collaborator_uid, name FROM collaborators AS c
            WHERE c.collaborator_uid = $1
            "#,
        )
        .bind(collaborator_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(collaborator.map(|c| c.into()))
    }

    async fn find_branch(&self, branch_id: &ID) -> anyhow::Result<Option<Branch>> {
        let branch: Option<BranchRaw> = sqlx::query_as(
            r#"
            SELECT branch_uid, collaborator_uid, name, location FROM branches AS b
            WHERE b.branch_uid = $1
            "#,
        )
        .bind(branch_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(branch.map(|b| b.into()))
    }

    async fn find_all_with_branches(&self) -> anyhow::Result<Vec<CollaboratorWithBranches>> {
        let collaborators: Vec<CollaboratorRaw> = sqlx::query_as(
            r#"
            SELECT collaborator_uid, name FROM collaborators
            ORDER BY created_at ASC, collaborator_uid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let branches: Vec<BranchRaw> = sqlx::query_as(
            r#"
            SELECT branch_uid, collaborator_uid, name, location FROM branches
            ORDER BY created_at ASC, branch_uid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut branches_by_collaborator: HashMap<Uuid, Vec<Branch>> = HashMap::new();
        for branch in branches {
            branches_by_collaborator
                .entry(branch.collaborator_uid)
                .or_default()
                .push(branch.into());
        }

        Ok(collaborators
            .into_iter()
            .map(|c| {
                let branches = branches_by_collaborator
                    .remove(&c.collaborator_uid)
                    .unwrap_or_default();
                CollaboratorWithBranches {
                    collaborator: c.into(),
                    branches,
                }
            })
            .collect())
    }
}
