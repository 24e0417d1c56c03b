use std::sync::Arc;

use async_trait::async_trait;
use entity::employees;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryOrder, Select, Statement, TransactionTrait, Value,
};
use tracing::{Instrument, debug, info_span};

use crate::employee::Employee;
use crate::error::{HrError, HrResult};
use crate::named::bind_named;
use crate::queries::{self, NameParams};
use crate::repository::{CrudRepository, EmployeeRepository};

/// [`EmployeeRepository`] over a sea-orm connection.
#[derive(Clone, Debug)]
pub struct SeaEmployeeRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaEmployeeRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn first(&self, select: Select<employees::Entity>) -> HrResult<Option<Employee>> {
        let found = select.one(self.db.as_ref()).await?;
        debug!(found = found.is_some(), "employee lookup finished");
        Ok(found.map(Employee::from))
    }

    async fn first_raw(&self, stmt: Statement) -> HrResult<Option<Employee>> {
        let found = employees::Entity::find()
            .from_raw_sql(stmt)
            .one(self.db.as_ref())
            .await?;
        debug!(found = found.is_some(), "employee lookup finished");
        Ok(found.map(Employee::from))
    }
}

async fn persist<C>(conn: &C, employee: Employee) -> HrResult<Employee>
where
    C: ConnectionTrait,
{
    let is_new = employee.id().is_none();
    let active = employee.into_active_model();
    let model = if is_new {
        active.insert(conn).await?
    } else {
        active.update(conn).await?
    };
    Ok(model.into())
}

#[async_trait]
impl CrudRepository<Employee, i64> for SeaEmployeeRepository {
    async fn save(&self, employee: Employee) -> HrResult<Employee> {
        let span = info_span!(
            "hr.employees.save",
            id = employee.id(),
            new = employee.id().is_none()
        );
        async move {
            let saved = persist(self.db.as_ref(), employee).await?;
            debug!(id = saved.id(), "employee saved");
            Ok(saved)
        }
        .instrument(span)
        .await
    }

    async fn save_all(&self, employees: Vec<Employee>) -> HrResult<Vec<Employee>> {
        let span = info_span!("hr.employees.save_all", batch = employees.len());
        async move {
            let txn = self.db.begin().await?;
            let mut saved = Vec::with_capacity(employees.len());
            for employee in employees {
                saved.push(persist(&txn, employee).await?);
            }
            txn.commit().await?;
            debug!(saved = saved.len(), "employee batch committed");
            Ok(saved)
        }
        .instrument(span)
        .await
    }

    async fn find_all(&self) -> HrResult<Vec<Employee>> {
        let span = info_span!("hr.employees.find_all");
        async move {
            let rows = employees::Entity::find()
                .order_by_asc(employees::Column::Id)
                .all(self.db.as_ref())
                .await?;
            debug!(rows = rows.len(), "employees listed");
            Ok(rows.into_iter().map(Employee::from).collect())
        }
        .instrument(span)
        .await
    }

    async fn find_by_id(&self, id: i64) -> HrResult<Option<Employee>> {
        let span = info_span!("hr.employees.find_by_id", id);
        self.first(employees::Entity::find_by_id(id))
            .instrument(span)
            .await
    }

    async fn exists_by_id(&self, id: i64) -> HrResult<bool> {
        let span = info_span!("hr.employees.exists_by_id", id);
        async move {
            let hits = employees::Entity::find_by_id(id)
                .count(self.db.as_ref())
                .await?;
            Ok(hits > 0)
        }
        .instrument(span)
        .await
    }

    async fn count(&self) -> HrResult<u64> {
        let span = info_span!("hr.employees.count");
        async move { Ok(employees::Entity::find().count(self.db.as_ref()).await?) }
            .instrument(span)
            .await
    }

    async fn delete(&self, employee: &Employee) -> HrResult<()> {
        let id = employee.id().ok_or(HrError::Transient)?;
        self.delete_by_id(id).await
    }

    async fn delete_by_id(&self, id: i64) -> HrResult<()> {
        let span = info_span!("hr.employees.delete", id);
        async move {
            let result = employees::Entity::delete_by_id(id)
                .exec(self.db.as_ref())
                .await?;
            debug!(rows = result.rows_affected, "employee delete finished");
            Ok(())
        }
        .instrument(span)
        .await
    }

    async fn delete_all(&self) -> HrResult<u64> {
        let span = info_span!("hr.employees.delete_all");
        async move {
            let result = employees::Entity::delete_many()
                .exec(self.db.as_ref())
                .await?;
            debug!(rows = result.rows_affected, "employees cleared");
            Ok(result.rows_affected)
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl EmployeeRepository for SeaEmployeeRepository {
    async fn find_by_email(&self, email: &str) -> HrResult<Option<Employee>> {
        let span = info_span!("hr.employees.find_by_email");
        self.first(queries::by_email(email)).instrument(span).await
    }

    async fn find_by_entity_query(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> HrResult<Option<Employee>> {
        let span = info_span!("hr.employees.find_by_entity_query", binding = "positional");
        let select = queries::entity_positional(
            queries::ENTITY_BY_FULL_NAME,
            &[Value::from(first_name), Value::from(last_name)],
        )?;
        self.first(select).instrument(span).await
    }

    async fn find_by_entity_query_named(
        &self,
        params: &NameParams,
    ) -> HrResult<Option<Employee>> {
        let span = info_span!("hr.employees.find_by_entity_query", binding = "named");
        let select = queries::entity_named(queries::ENTITY_BY_FULL_NAME_NAMED, params)?;
        self.first(select).instrument(span).await
    }

    async fn find_by_native_sql(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> HrResult<Option<Employee>> {
        let span = info_span!("hr.employees.find_by_native_sql", binding = "positional");
        let stmt = Statement::from_sql_and_values(
            self.db.get_database_backend(),
            queries::NATIVE_BY_FULL_NAME,
            [Value::from(first_name), Value::from(last_name)],
        );
        self.first_raw(stmt).instrument(span).await
    }

    async fn find_by_native_sql_named(&self, params: &NameParams) -> HrResult<Option<Employee>> {
        let span = info_span!("hr.employees.find_by_native_sql", binding = "named");
        let stmt = bind_named(
            self.db.get_database_backend(),
            queries::NATIVE_BY_FULL_NAME_NAMED,
            params,
        )?;
        self.first_raw(stmt).instrument(span).await
    }
}
