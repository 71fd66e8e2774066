pub use sea_orm_migration::prelude::*;

mod m20261016_000001_core;
mod m20261016_000002_workforce;
mod m20261016_000003_recruitment;
mod m20261016_000004_workplace;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261016_000001_core::Migration),
            Box::new(m20261016_000002_workforce::Migration),
            Box::new(m20261016_000003_recruitment::Migration),
            Box::new(m20261016_000004_workplace::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use sea_orm_migration::sea_orm::Database;

    use super::*;

    const TABLES: [&str; 9] = [
        "organization",
        "employee",
        "attendance",
        "salary",
        "recruitment_applicant",
        "interview_insight",
        "shift_schedule",
        "notice",
        "balance",
    ];

    #[tokio::test]
    async fn migrations_apply_and_roll_back() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        assert!(Migrator::get_pending_migrations(&db).await.unwrap().is_empty());

        let manager = SchemaManager::new(&db);
        for table in TABLES {
            assert!(manager.has_table(table).await.unwrap(), "{table} missing");
        }

        Migrator::down(&db, None).await.unwrap();
        for table in TABLES {
            assert!(!manager.has_table(table).await.unwrap(), "{table} left behind");
        }
    }
}
