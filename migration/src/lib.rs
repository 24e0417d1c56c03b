pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_employees;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_employees::Migration)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectionTrait, Database, DatabaseBackend, Statement};

    async fn table_exists(db: &sea_orm::DatabaseConnection) -> bool {
        let row = db
            .query_one(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT count(*) AS count FROM sqlite_master WHERE type = 'table' AND name = 'employees'",
            ))
            .await
            .unwrap()
            .unwrap();
        let count: i64 = row.try_get("", "count").unwrap();
        count == 1
    }

    #[tokio::test]
    async fn up_and_down_round_trip_on_sqlite() {
        let db = Database::connect("sqlite::memory:").await.unwrap();

        Migrator::up(&db, None).await.unwrap();
        assert!(table_exists(&db).await);
        assert!(Migrator::get_pending_migrations(&db).await.unwrap().is_empty());

        Migrator::down(&db, Some(1)).await.unwrap();
        assert!(!table_exists(&db).await);
    }
}
