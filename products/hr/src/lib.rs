//! HR vertical slice: the `Employee` record, its repository contract and a
//! sea-orm backed implementation.

mod employee;
mod error;
pub mod named;
pub mod queries;
mod repository;
mod store;

pub use employee::{Employee, EmployeeBuilder};
pub use error::{HrError, HrResult};
pub use named::ParamSource;
pub use queries::NameParams;
pub use repository::{CrudRepository, EmployeeRepository};
pub use store::SeaEmployeeRepository;
