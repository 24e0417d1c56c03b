//! Statically declared lookups against `employees`.
//!
//! Entity queries name mapped columns; native queries name the physical
//! table and columns. The tests below keep the two in step.

use entity::employees;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Select, Value};
use serde::{Deserialize, Serialize};

use crate::error::{HrError, HrResult};
use crate::named::ParamSource;

/// `firstName = ?1 AND lastName = ?2` over the entity mapping.
pub const ENTITY_BY_FULL_NAME: &[employees::Column] =
    &[employees::Column::FirstName, employees::Column::LastName];

/// `firstName = :fname AND lastName = :lname` over the entity mapping.
pub const ENTITY_BY_FULL_NAME_NAMED: &[(employees::Column, &str)] = &[
    (employees::Column::FirstName, "fname"),
    (employees::Column::LastName, "lname"),
];

/// Postgres/SQLite dialect, positional binding.
pub const NATIVE_BY_FULL_NAME: &str =
    "SELECT * FROM employees e WHERE e.first_name = $1 AND e.last_name = $2 ORDER BY e.id";

/// Named binding; rewritten by [`crate::named::bind_named`] before execution.
pub const NATIVE_BY_FULL_NAME_NAMED: &str =
    "SELECT * FROM employees e WHERE e.first_name = :fname AND e.last_name = :lname ORDER BY e.id";

/// Name pair bound by label (`fname`, `lname`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameParams {
    pub fname: String,
    pub lname: String,
}

impl NameParams {
    pub fn new(fname: impl Into<String>, lname: impl Into<String>) -> Self {
        Self {
            fname: fname.into(),
            lname: lname.into(),
        }
    }
}

impl ParamSource for NameParams {
    fn value_of(&self, name: &str) -> Option<Value> {
        match name {
            "fname" => Some(self.fname.as_str().into()),
            "lname" => Some(self.lname.as_str().into()),
            _ => None,
        }
    }
}

pub fn by_email(email: &str) -> Select<employees::Entity> {
    employees::Entity::find()
        .filter(employees::Column::Email.eq(email))
        .order_by_asc(employees::Column::Id)
}

/// Binds `args` to `columns` by position; every column needs an argument.
pub fn entity_positional(
    columns: &[employees::Column],
    args: &[Value],
) -> HrResult<Select<employees::Entity>> {
    let mut select = employees::Entity::find();
    for (idx, column) in columns.iter().enumerate() {
        let value = args
            .get(idx)
            .cloned()
            .ok_or_else(|| HrError::UnboundParameter(format!("?{}", idx + 1)))?;
        select = select.filter(column.eq(value));
    }
    Ok(select.order_by_asc(employees::Column::Id))
}

/// Binds each column's labelled parameter from `params`.
pub fn entity_named<P>(
    bindings: &[(employees::Column, &str)],
    params: &P,
) -> HrResult<Select<employees::Entity>>
where
    P: ParamSource + ?Sized,
{
    let mut select = employees::Entity::find();
    for (column, name) in bindings {
        let value = params
            .value_of(name)
            .ok_or_else(|| HrError::UnboundParameter(format!(":{name}")))?;
        select = select.filter(column.eq(value));
    }
    Ok(select.order_by_asc(employees::Column::Id))
}
