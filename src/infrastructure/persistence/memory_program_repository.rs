//! In-memory implementation of the program repository.

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

use crate::associator::Table;
use crate::domain::entities::Program;
use crate::domain::repositories::ProgramRepository;
use crate::error::AppError;

/// Program store kept in process memory.
///
/// Each program is stored as a whole aggregate, join collections and
/// invitations included.
pub struct InMemoryProgramRepository {
    programs: RwLock<Table<Program>>,
    invitation_seq: AtomicI64,
}

impl InMemoryProgramRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            programs: RwLock::new(Table::new()),
            invitation_seq: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryProgramRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProgramRepository for InMemoryProgramRepository {
    async fn find(&self, short_name: &str) -> Result<Option<Program>, AppError> {
        let programs = self.programs.read().await;
        Ok(programs.get(&short_name.to_string()).cloned())
    }

    async fn list(&self) -> Result<Vec<Program>, AppError> {
        let programs = self.programs.read().await;
        Ok(programs.iter().cloned().collect())
    }

    async fn insert(&self, program: Program) -> Result<Program, AppError> {
        let mut programs = self.programs.write().await;
        if programs.contains(&program.short_name) {
            return Err(AppError::conflict(
                "Program already exists",
                json!({ "short_name": program.short_name }),
            ));
        }

        debug!(short_name = %program.short_name, "Inserting program");
        programs.insert(program.clone());
        Ok(program)
    }

    async fn update(&self, program: Program) -> Result<Program, AppError> {
        let mut programs = self.programs.write().await;
        if !programs.contains(&program.short_name) {
            return Err(AppError::not_found(
                "Program not found",
                json!({ "short_name": program.short_name }),
            ));
        }

        programs.insert(program.clone());
        Ok(program)
    }

    async fn delete(&self, short_name: &str) -> Result<(), AppError> {
        let mut programs = self.programs.write().await;
        programs
            .remove(&short_name.to_string())
            .map(|_| ())
            .ok_or_else(|| {
                AppError::not_found("Program not found", json!({ "short_name": short_name }))
            })
    }

    async fn next_invitation_id(&self) -> Result<i64, AppError> {
        Ok(self.invitation_seq.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::MembershipType;
    use chrono::Utc;

    fn program(short_name: &str) -> Program {
        Program::new(
            short_name.to_string(),
            "Test program".to_string(),
            MembershipType::Associate,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryProgramRepository::new();

        repo.insert(program("TEST-CA")).await.unwrap();

        let found = repo.find("TEST-CA").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().membership_type, MembershipType::Associate);
        assert!(repo.find("OTHER-US").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_conflicts() {
        let repo = InMemoryProgramRepository::new();
        repo.insert(program("TEST-CA")).await.unwrap();

        let result = repo.insert(program("TEST-CA")).await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_update_missing_program() {
        let repo = InMemoryProgramRepository::new();

        let result = repo.update(program("TEST-CA")).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_short_name() {
        let repo = InMemoryProgramRepository::new();
        repo.insert(program("ZETA-US")).await.unwrap();
        repo.insert(program("ALPHA-CA")).await.unwrap();

        let names: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.short_name)
            .collect();

        assert_eq!(names, vec!["ALPHA-CA", "ZETA-US"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryProgramRepository::new();
        repo.insert(program("TEST-CA")).await.unwrap();

        repo.delete("TEST-CA").await.unwrap();

        assert!(repo.find("TEST-CA").await.unwrap().is_none());
        assert!(matches!(
            repo.delete("TEST-CA").await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_invitation_ids_are_sequential() {
        let repo = InMemoryProgramRepository::new();

        assert_eq!(repo.next_invitation_id().await.unwrap(), 1);
        assert_eq!(repo.next_invitation_id().await.unwrap(), 2);
    }
}
