//! Generic settings-driven read/upsert/delete over identifier-keyed rows.
//!
//! Every operation builds a parameterized statement and binds its values as
//! text, positionally, in identifier order. Table and column names are
//! `&'static str` so they can only come from compile-time-trusted literals
//! (see the constants in [`crate::db::schema`]); they are interpolated into
//! the SQL text, values never are.

use crate::errors::{Error, Result};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, QueryResult, Statement, TransactionTrait,
    Value,
};

/// Settings for a parameterized SELECT keyed by identifier columns.
#[derive(Debug, Clone)]
pub struct Query {
    /// Target table
    pub table: &'static str,
    /// Columns to fetch; `None` means all columns
    pub columns: Option<Vec<&'static str>>,
    /// Identifier columns forming the WHERE clause, in binding order
    pub identifiers: Vec<&'static str>,
    /// One value per identifier, bound positionally as text
    pub values: Vec<String>,
}

/// Settings for an upsert: insert the row if the identifier tuple is absent,
/// update it in place otherwise.
#[derive(Debug, Clone)]
pub struct Upsert {
    /// Target table
    pub table: &'static str,
    /// All columns to write, aligned index-for-index with `values`
    pub columns: Vec<&'static str>,
    /// Identifier columns; each must also appear in `columns`
    pub identifiers: Vec<&'static str>,
    /// One value per column, bound positionally as text
    pub values: Vec<String>,
}

/// Settings for a parameterized DELETE keyed by identifier columns.
#[derive(Debug, Clone)]
pub struct Delete {
    /// Target table
    pub table: &'static str,
    /// Identifier columns forming the WHERE clause, in binding order
    pub identifiers: Vec<&'static str>,
    /// One value per identifier, bound positionally as text
    pub values: Vec<String>,
}

fn validation(message: impl Into<String>) -> Error {
    Error::Validation {
        message: message.into(),
    }
}

fn placeholder(backend: DbBackend, index: usize) -> String {
    match backend {
        DbBackend::Postgres => format!("${index}"),
        _ => "?".to_string(),
    }
}

/// `id1 = $1 AND id2 = $2 ...`, with placeholder numbering starting after
/// `offset` already-bound parameters.
fn predicate(backend: DbBackend, identifiers: &[&'static str], offset: usize) -> String {
    identifiers
        .iter()
        .enumerate()
        .map(|(index, identifier)| {
            format!("{identifier} = {}", placeholder(backend, offset + index + 1))
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn bind(values: &[String]) -> Vec<Value> {
    values.iter().map(|value| Value::from(value.clone())).collect()
}

impl Query {
    fn validate(&self) -> Result<()> {
        if self.identifiers.len() != self.values.len() {
            return Err(validation(format!(
                "query on `{}` has {} identifiers but {} values",
                self.table,
                self.identifiers.len(),
                self.values.len()
            )));
        }
        Ok(())
    }
}

impl Upsert {
    fn validate(&self) -> Result<()> {
        if self.columns.len() != self.values.len() {
            return Err(validation(format!(
                "upsert on `{}` has {} columns but {} values",
                self.table,
                self.columns.len(),
                self.values.len()
            )));
        }
        if self.identifiers.is_empty() {
            return Err(validation(format!(
                "upsert on `{}` has no identifier columns",
                self.table
            )));
        }
        Ok(())
    }

    /// The subset of `values` belonging to the identifier columns, matched
    /// positionally against `columns`. An identifier missing from `columns`
    /// is a validation error, not a silent misalignment.
    fn identifier_values(&self) -> Result<Vec<String>> {
        self.identifiers
            .iter()
            .map(|identifier| {
                self.columns
                    .iter()
                    .position(|column| column == identifier)
                    .map(|index| self.values[index].clone())
                    .ok_or_else(|| {
                        validation(format!(
                            "identifier `{identifier}` is not among the columns of `{}`",
                            self.table
                        ))
                    })
            })
            .collect()
    }
}

impl Delete {
    fn validate(&self) -> Result<()> {
        if self.identifiers.len() != self.values.len() {
            return Err(validation(format!(
                "delete on `{}` has {} identifiers but {} values",
                self.table,
                self.identifiers.len(),
                self.values.len()
            )));
        }
        Ok(())
    }
}

/// Runs `SELECT <columns|*> FROM <table> WHERE id1 = $1 AND id2 = $2 ...`,
/// binding the values positionally in identifier order.
pub async fn get_data(db: &DatabaseConnection, query: Query) -> Result<Vec<QueryResult>> {
    query.validate()?;
    let backend = db.get_database_backend();

    let columns = query
        .columns
        .as_ref()
        .map_or_else(|| "*".to_string(), |columns| columns.join(", "));
    let mut sql = format!("SELECT {columns} FROM {}", query.table);
    if !query.identifiers.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&predicate(backend, &query.identifiers, 0));
    }

    db.query_all(Statement::from_sql_and_values(
        backend,
        sql,
        bind(&query.values),
    ))
    .await
    .map_err(Into::into)
}

/// Atomic upsert keyed by the identifier columns. The existence probe and
/// the insert/update run inside one transaction, so two concurrent writers
/// of the same identifier tuple cannot both take the insert path.
///
/// Returns true iff the affected-row count is positive.
pub async fn set_data(db: &DatabaseConnection, upsert: Upsert) -> Result<bool> {
    upsert.validate()?;
    let identifier_values = upsert.identifier_values()?;
    let backend = db.get_database_backend();

    let txn = db.begin().await?;

    let probe = format!(
        "SELECT {} FROM {} WHERE {}",
        upsert.identifiers.join(", "),
        upsert.table,
        predicate(backend, &upsert.identifiers, 0)
    );
    let existing = txn
        .query_all(Statement::from_sql_and_values(
            backend,
            probe,
            bind(&identifier_values),
        ))
        .await?;

    let affected = if existing.is_empty() {
        let column_list = upsert.columns.join(", ");
        let value_list = (1..=upsert.values.len())
            .map(|index| placeholder(backend, index))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({column_list}) VALUES ({value_list})",
            upsert.table
        );
        txn.execute(Statement::from_sql_and_values(
            backend,
            sql,
            bind(&upsert.values),
        ))
        .await?
        .rows_affected()
    } else {
        let assignments = upsert
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{column} = {}", placeholder(backend, index + 1)))
            .collect::<Vec<_>>()
            .join(", ");
        // Identifier values are re-bound a second time at the tail of the
        // parameter list for the WHERE clause.
        let sql = format!(
            "UPDATE {} SET {assignments} WHERE {}",
            upsert.table,
            predicate(backend, &upsert.identifiers, upsert.values.len())
        );
        let mut parameters = bind(&upsert.values);
        parameters.extend(bind(&identifier_values));
        txn.execute(Statement::from_sql_and_values(backend, sql, parameters))
            .await?
            .rows_affected()
    };

    txn.commit().await?;
    Ok(affected > 0)
}

/// Runs a parameterized DELETE keyed by the identifier columns and returns
/// the affected-row count.
pub async fn del_data(db: &DatabaseConnection, delete: Delete) -> Result<u64> {
    delete.validate()?;
    let backend = db.get_database_backend();

    let mut sql = format!("DELETE FROM {}", delete.table);
    if !delete.identifiers.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&predicate(backend, &delete.identifiers, 0));
    }

    let result = db
        .execute(Statement::from_sql_and_values(
            backend,
            sql,
            bind(&delete.values),
        ))
        .await?;
    Ok(result.rows_affected())
}
