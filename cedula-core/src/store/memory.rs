use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::repository::{RepositoryError, ScheduleRepository, ScheduleSnapshot};
use crate::models::FeeSchedule;

/// [`ScheduleRepository`] kept entirely in memory.
///
/// Readers receive cloned [`ScheduleSnapshot`]s; the lock is only held while
/// the map itself is read or replaced.
#[derive(Debug, Default)]
pub struct InMemoryScheduleRepository {
    schedules: RwLock<HashMap<String, ScheduleSnapshot>>,
}

impl InMemoryScheduleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_snapshot(
        name: &str,
        previous: Option<&ScheduleSnapshot>,
        schedule: FeeSchedule,
    ) -> ScheduleSnapshot {
        ScheduleSnapshot {
            name: name.to_string(),
            version: previous.map_or(1, |s| s.version + 1),
            published_at: Utc::now(),
            schedule: Arc::new(schedule),
        }
    }
}

#[async_trait]
impl ScheduleRepository for InMemoryScheduleRepository {
    async fn publish(
        &self,
        name: &str,
        schedule: FeeSchedule,
    ) -> Result<ScheduleSnapshot, RepositoryError> {
        schedule.validate()?;

        let mut schedules = self.schedules.write().await;
        let snapshot = Self::next_snapshot(name, schedules.get(name), schedule);
        schedules.insert(name.to_string(), snapshot.clone());

        info!(
            schedule = name,
            version = snapshot.version,
            active = snapshot.schedule.active,
            "fee schedule published"
        );
        Ok(snapshot)
    }

    async fn snapshot(&self, name: &str) -> Result<ScheduleSnapshot, RepositoryError> {
        let snapshot = self
            .schedules
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(name.to_string()))?;

        debug!(schedule = name, version = snapshot.version, "fee schedule snapshot taken");
        Ok(snapshot)
    }

    async fn set_active(
        &self,
        name: &str,
        active: bool,
    ) -> Result<ScheduleSnapshot, RepositoryError> {
        let mut schedules = self.schedules.write().await;
        let current = schedules
            .get(name)
            .ok_or_else(|| RepositoryError::NotFound(name.to_string()))?;

        let schedule = FeeSchedule {
            active,
            ..(*current.schedule).clone()
        };
        let snapshot = Self::next_snapshot(name, Some(current), schedule);
        schedules.insert(name.to_string(), snapshot.clone());

        info!(
            schedule = name,
            version = snapshot.version,
            active,
            "fee schedule activation changed"
        );
        Ok(snapshot)
    }

    async fn list_names(&self) -> Result<Vec<String>, RepositoryError> {
        let mut names: Vec<String> = self.schedules.read().await.keys().cloned().collect();
        names.sort_unstable();
        Ok(names)
    }

    async fn remove(&self, name: &str) -> Result<(), RepositoryError> {
        match self.schedules.write().await.remove(name) {
            Some(_) => {
                info!(schedule = name, "fee schedule removed");
                Ok(())
            }
            None => Err(RepositoryError::NotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::{ComputationError, ScheduleError, compute_basic_plus_marginal};
    use crate::models::{TaxBracket, TaxpayerDeclaration};

    fn test_schedule() -> FeeSchedule {
        FeeSchedule::new(dec!(5), dec!(1), dec!(5000))
    }

    fn init_test_logging() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    }

    #[tokio::test]
    async fn publish_starts_at_version_one() {
        init_test_logging();
        let repo = InMemoryScheduleRepository::new();

        let snapshot = repo
            .publish("2026", test_schedule())
            .await
            .expect("publish should succeed");

        assert_eq!(snapshot.name, "2026");
        assert_eq!(snapshot.version, 1);
        assert_eq!(*snapshot.schedule, test_schedule());
    }

    #[tokio::test]
    async fn publish_bumps_version_on_replace() {
        init_test_logging();
        let repo = InMemoryScheduleRepository::new();
        repo.publish("2026", test_schedule()).await.expect("publish");

        let replaced = repo
            .publish("2026", FeeSchedule::new(dec!(10), dec!(1), dec!(5000)))
            .await
            .expect("publish");

        assert_eq!(replaced.version, 2);
        assert_eq!(replaced.schedule.basic_tax, dec!(10));
    }

    #[tokio::test]
    async fn publish_rejects_invalid_schedule() {
        let repo = InMemoryScheduleRepository::new();
        let schedule = test_schedule().with_brackets(vec![TaxBracket::new(
            dec!(0),
            Some(dec!(-1)),
            dec!(5),
        )]);

        let result = repo.publish("2026", schedule).await;

        assert!(matches!(
            result,
            Err(RepositoryError::Invalid(ScheduleError::InvalidBracket { index: 0, .. }))
        ));
        assert_eq!(
            repo.snapshot("2026").await,
            Err(RepositoryError::NotFound("2026".to_string()))
        );
    }

    #[tokio::test]
    async fn snapshot_is_unaffected_by_later_publish() {
        let repo = InMemoryScheduleRepository::new();
        repo.publish("2026", test_schedule()).await.expect("publish");
        let held = repo.snapshot("2026").await.expect("snapshot");

        repo.publish("2026", FeeSchedule::new(dec!(50), dec!(2), dec!(0)))
            .await
            .expect("publish");
        let declaration = TaxpayerDeclaration::new(dec!(25000));

        let result = compute_basic_plus_marginal(&held.schedule, &declaration).expect("compute");

        assert_eq!(held.version, 1);
        assert_eq!(result.gross_tax, dec!(30));
    }

    #[tokio::test]
    async fn set_active_false_blocks_computation() {
        let repo = InMemoryScheduleRepository::new();
        repo.publish("2026", test_schedule()).await.expect("publish");

        let snapshot = repo.set_active("2026", false).await.expect("set_active");

        assert_eq!(snapshot.version, 2);
        assert_eq!(
            compute_basic_plus_marginal(&snapshot.schedule, &TaxpayerDeclaration::new(dec!(1))),
            Err(ComputationError::ScheduleInactive)
        );
    }

    #[tokio::test]
    async fn set_active_unknown_schedule_is_not_found() {
        let repo = InMemoryScheduleRepository::new();

        let result = repo.set_active("missing", true).await;

        assert_eq!(result, Err(RepositoryError::NotFound("missing".to_string())));
    }

    #[tokio::test]
    async fn list_names_is_sorted() {
        let repo = InMemoryScheduleRepository::new();
        for name in ["zone-b", "2026", "zone-a"] {
            repo.publish(name, test_schedule()).await.expect("publish");
        }

        let names = repo.list_names().await.expect("list");

        assert_eq!(names, vec!["2026", "zone-a", "zone-b"]);
    }

    #[tokio::test]
    async fn remove_deletes_schedule() {
        let repo = InMemoryScheduleRepository::new();
        repo.publish("2026", test_schedule()).await.expect("publish");

        repo.remove("2026").await.expect("remove");

        assert_eq!(
            repo.remove("2026").await,
            Err(RepositoryError::NotFound("2026".to_string()))
        );
        assert!(repo.list_names().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn concurrent_readers_share_one_version() {
        let repo = Arc::new(InMemoryScheduleRepository::new());
        repo.publish("2026", test_schedule()).await.expect("publish");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.snapshot("2026").await })
            })
            .collect();

        for handle in handles {
            let snapshot = handle.await.expect("join").expect("snapshot");
            assert_eq!(snapshot.version, 1);
        }
    }
}
