//! Named-parameter binding for native SQL.
//!
//! Neither sqlx backend understands `:name` placeholders, so named templates
//! are rewritten into the backend's positional form before execution.

use std::fmt::Write as _;
use std::iter::Peekable;
use std::str::Chars;

use sea_orm::{DbBackend, Statement, Value};

use crate::error::{HrError, HrResult};

/// Supplies values for `:name` placeholders.
pub trait ParamSource {
    fn value_of(&self, name: &str) -> Option<Value>;
}

impl<'a> ParamSource for [(&'a str, Value)] {
    fn value_of(&self, name: &str) -> Option<Value> {
        self.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.clone())
    }
}

/// Rewrites `template` for `backend` and binds every `:name` from `params`.
///
/// Postgres and SQLite get numbered `$n` slots and a repeated name reuses its
/// slot; MySQL gets one `?` per occurrence. Quoted text, `--` comments and
/// `::` casts are copied verbatim.
pub fn bind_named<P>(backend: DbBackend, template: &str, params: &P) -> HrResult<Statement>
where
    P: ParamSource + ?Sized,
{
    let mut sql = String::with_capacity(template.len());
    let mut values = Vec::new();
    let mut slots: Vec<String> = Vec::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => copy_quoted(c, &mut chars, &mut sql),
            '-' if chars.peek() == Some(&'-') => {
                sql.push(c);
                for next in chars.by_ref() {
                    sql.push(next);
                    if next == '\n' {
                        break;
                    }
                }
            }
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                sql.push_str("::");
            }
            ':' if chars.peek().is_some_and(|n| n.is_ascii_alphabetic() || *n == '_') => {
                let name = read_ident(&mut chars);
                let reused = slots.iter().position(|s| *s == name);
                match (backend, reused) {
                    (DbBackend::MySql, _) => {
                        values.push(lookup(params, &name)?);
                        sql.push('?');
                    }
                    (_, Some(slot)) => {
                        let _ = write!(sql, "${}", slot + 1);
                    }
                    (_, None) => {
                        values.push(lookup(params, &name)?);
                        slots.push(name);
                        let _ = write!(sql, "${}", slots.len());
                    }
                }
            }
            _ => sql.push(c),
        }
    }

    Ok(Statement::from_sql_and_values(backend, &sql, values))
}

fn lookup<P>(params: &P, name: &str) -> HrResult<Value>
where
    P: ParamSource + ?Sized,
{
    params
        .value_of(name)
        .ok_or_else(|| HrError::UnboundParameter(format!(":{name}")))
}

fn copy_quoted(quote: char, chars: &mut Peekable<Chars<'_>>, sql: &mut String) {
    sql.push(quote);
    while let Some(c) = chars.next() {
        sql.push(c);
        if c == quote {
            // A doubled quote is an escaped quote, not the end.
            if chars.peek() == Some(&quote) {
                chars.next();
                sql.push(quote);
            } else {
                return;
            }
        }
    }
}

fn read_ident(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '_' {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }
    name
}
