use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HrError {
    /// Store failures pass through untouched.
    #[error(transparent)]
    Db(#[from] DbErr),
    #[error("employee field `{0}` is required")]
    MissingField(&'static str),
    #[error("employee has not been saved yet")]
    Transient,
    #[error("query parameter `{0}` has no bound value")]
    UnboundParameter(String),
}

pub type HrResult<T> = Result<T, HrError>;
