use std::sync::Arc;

use platform_db::connect_ephemeral;
use products_hr::{Employee, SeaEmployeeRepository};

/// Repository over a fresh, isolated in-memory store.
pub async fn repository() -> SeaEmployeeRepository {
    let db = connect_ephemeral().await.unwrap();
    SeaEmployeeRepository::new(Arc::new(db))
}

pub fn employee(first_name: &str, last_name: &str, email: &str) -> Employee {
    Employee::builder()
        .first_name(first_name)
        .last_name(last_name)
        .email(email)
        .build()
        .unwrap()
}

pub fn ali() -> Employee {
    employee("Ali", "karaca", "alik@gmail.com")
}

pub fn john() -> Employee {
    employee("John", "Cena", "cena@gmail.com")
}
