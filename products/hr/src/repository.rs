use async_trait::async_trait;

use crate::employee::Employee;
use crate::error::HrResult;
use crate::queries::NameParams;

/// Generic persistence operations shared by every record type.
#[async_trait]
pub trait CrudRepository<T, Id>: Send + Sync
where
    T: Send + Sync + 'static,
    Id: Send + 'static,
{
    /// Inserts a record without an identifier, otherwise updates it in place.
    async fn save(&self, entity: T) -> HrResult<T>;

    /// Saves every record atomically; output order follows input order.
    async fn save_all(&self, entities: Vec<T>) -> HrResult<Vec<T>>;

    async fn find_all(&self) -> HrResult<Vec<T>>;

    async fn find_by_id(&self, id: Id) -> HrResult<Option<T>>;

    async fn exists_by_id(&self, id: Id) -> HrResult<bool>;

    async fn count(&self) -> HrResult<u64>;

    /// Removes the row keyed by the record's identifier. Absent rows are ignored.
    async fn delete(&self, entity: &T) -> HrResult<()>;

    async fn delete_by_id(&self, id: Id) -> HrResult<()>;

    /// Returns the number of rows removed.
    async fn delete_all(&self) -> HrResult<u64>;
}

/// Employee lookups. Each returns the lowest-id match, or `None`.
#[async_trait]
pub trait EmployeeRepository: CrudRepository<Employee, i64> {
    async fn find_by_email(&self, email: &str) -> HrResult<Option<Employee>>;

    async fn find_by_entity_query(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> HrResult<Option<Employee>>;

    async fn find_by_entity_query_named(&self, params: &NameParams)
    -> HrResult<Option<Employee>>;

    async fn find_by_native_sql(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> HrResult<Option<Employee>>;

    async fn find_by_native_sql_named(&self, params: &NameParams) -> HrResult<Option<Employee>>;
}
