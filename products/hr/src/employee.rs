use entity::employees;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use serde::Serialize;

use crate::error::{HrError, HrResult};

/// An employee record. The identifier is assigned by the store on first save
/// and cannot be set by callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Employee {
    id: Option<i64>,
    first_name: String,
    last_name: String,
    email: String,
}

impl Employee {
    pub fn builder() -> EmployeeBuilder {
        EmployeeBuilder::default()
    }

    /// `None` until the record has been saved.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.first_name = first_name.into();
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.last_name = last_name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Field-wise equality ignoring the identifier.
    pub fn same_content(&self, other: &Employee) -> bool {
        self.first_name == other.first_name
            && self.last_name == other.last_name
            && self.email == other.email
    }

    pub(crate) fn into_active_model(self) -> employees::ActiveModel {
        employees::ActiveModel {
            id: match self.id {
                Some(id) => Unchanged(id),
                None => NotSet,
            },
            first_name: Set(self.first_name),
            last_name: Set(self.last_name),
            email: Set(self.email),
        }
    }
}

impl From<employees::Model> for Employee {
    fn from(model: employees::Model) -> Self {
        Self {
            id: Some(model.id),
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct EmployeeBuilder {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
}

impl EmployeeBuilder {
    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn build(self) -> HrResult<Employee> {
        Ok(Employee {
            id: None,
            first_name: self.first_name.ok_or(HrError::MissingField("first_name"))?,
            last_name: self.last_name.ok_or(HrError::MissingField("last_name"))?,
            email: self.email.ok_or(HrError::MissingField("email"))?,
        })
    }
}
