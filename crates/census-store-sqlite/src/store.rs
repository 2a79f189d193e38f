//! [`SqliteStore`]: the SQLite implementation of [`PersonStore`].

use std::path::Path;

use census_core::{
  filter::ListQuery,
  person::{Person, PersonDraft, PersonId},
  store::PersonStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{PERSON_COLUMNS, encode_list_query, person_from_row},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A person store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Map the affected-row count of a single-row mutation onto the not-found
/// signal.
fn expect_one_row(id: PersonId, count: usize) -> Result<()> {
  match count {
    1 => Ok(()),
    0 => Err(Error::PersonNotFound(id)),
    count => Err(Error::UnexpectedRowCount { id, count }),
  }
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  type Error = Error;

  async fn insert(&self, draft: PersonDraft) -> Result<Person> {
    let row = draft.clone();

    let id: PersonId = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "INSERT INTO people (name, surname, patronymic, age, gender, nationality)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           RETURNING id",
          rusqlite::params![
            row.name,
            row.surname,
            row.patronymic,
            row.age,
            row.gender,
            row.nationality,
          ],
          |r| r.get(0),
        )?)
      })
      .await?;

    tracing::debug!(id, "inserted person");
    Ok(draft.with_id(id))
  }

  async fn list(&self, query: &ListQuery) -> Result<Vec<Person>> {
    let (sql, params) = encode_list_query(query);

    let people = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), person_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(people)
  }

  async fn get(&self, id: PersonId) -> Result<Person> {
    let found: Option<Person> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLUMNS} FROM people WHERE id = ?1"),
              rusqlite::params![id],
              person_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    found.ok_or(Error::PersonNotFound(id))
  }

  async fn update(&self, person: Person) -> Result<Person> {
    let row = person.clone();

    let count = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE people
           SET name = ?1, surname = ?2, patronymic = ?3,
               age = ?4, gender = ?5, nationality = ?6
           WHERE id = ?7",
          rusqlite::params![
            row.name,
            row.surname,
            row.patronymic,
            row.age,
            row.gender,
            row.nationality,
            row.id,
          ],
        )?)
      })
      .await?;

    expect_one_row(person.id, count)?;
    Ok(person)
  }

  async fn delete(&self, id: PersonId) -> Result<()> {
    let count = self
      .conn
      .call(move |conn| Ok(conn.execute("DELETE FROM people WHERE id = ?1", rusqlite::params![id])?))
      .await?;

    expect_one_row(id, count)
  }
}
