//! Row-level persistence for source code records.
//!
//! Every mutating query carries the owner id in its predicate, so the
//! ownership rule lives in exactly one place: a record that is absent or
//! owned by someone else produces zero affected rows, which callers treat
//! as "not found or not permitted" without distinguishing the two.

use common::model::category::Category;
use common::model::source_code::{SourceCode, SourceCodeDetail, Visibility};
use rusqlite::{params, OptionalExtension, Row};

use crate::db::Database;

/// Field values for an insert or update, already validated and normalized
/// by the service layer. `code_content` arrives verbatim; everything else
/// is trimmed and escaped upstream.
#[derive(Debug, Clone)]
pub struct SourceCodeInput {
    pub title: String,
    pub description: String,
    pub language: String,
    pub category_id: i64,
    pub code_content: String,
    pub file_path: Option<String>,
    pub visibility: Visibility,
    pub tags: String,
}

#[derive(Debug, Clone)]
pub struct SourceCodeRepository {
    db: Database,
}

impl SourceCodeRepository {
    pub fn new(db: Database) -> SourceCodeRepository {
        SourceCodeRepository { db }
    }

    /// Inserts a new record for the owner and returns its assigned id.
    /// `created_at` and `updated_at` are both set to the current time.
    pub fn create(&self, owner_id: i64, input: &SourceCodeInput) -> rusqlite::Result<i64> {
        let conn = self.db.conn()?;
        conn.execute(
            "INSERT INTO source_codes
             (user_id, title, description, language, category_id, code_content,
              file_path, visibility, tags, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, datetime('now'), datetime('now'))",
            params![
                owner_id,
                input.title,
                input.description,
                input.language,
                input.category_id,
                input.code_content,
                input.file_path,
                input.visibility.as_str(),
                input.tags,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// All records owned by the given user, ordered by id.
    pub fn list_by_owner(&self, owner_id: i64) -> rusqlite::Result<Vec<SourceCode>> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, description, language, category_id,
                    code_content, file_path, visibility, tags, created_at, updated_at
             FROM source_codes WHERE user_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![owner_id], row_to_source_code)?;
        rows.collect()
    }

    /// Fetch by primary key regardless of owner, joined with the
    /// submitter's username. Backs the public detail view.
    pub fn find_by_id(&self, id: i64) -> rusqlite::Result<Option<SourceCodeDetail>> {
        let conn = self.db.conn()?;
        conn.query_row(
            "SELECT sc.id, sc.user_id, sc.title, sc.description, sc.language,
                    sc.category_id, sc.code_content, sc.file_path, sc.visibility,
                    sc.tags, sc.created_at, sc.updated_at, u.username
             FROM source_codes sc
             JOIN users u ON sc.user_id = u.id
             WHERE sc.id = ?1",
            params![id],
            |row| {
                Ok(SourceCodeDetail {
                    code: row_to_source_code(row)?,
                    username: row.get(12)?,
                })
            },
        )
        .optional()
    }

    /// Fetch only if the record belongs to the owner. This is the
    /// authorization gate for update and delete.
    pub fn find_by_id_for_owner(
        &self,
        id: i64,
        owner_id: i64,
    ) -> rusqlite::Result<Option<SourceCode>> {
        let conn = self.db.conn()?;
        conn.query_row(
            "SELECT id, user_id, title, description, language, category_id,
                    code_content, file_path, visibility, tags, created_at, updated_at
             FROM source_codes WHERE id = ?1 AND user_id = ?2",
            params![id, owner_id],
            row_to_source_code,
        )
        .optional()
    }

    /// Updates the record if it belongs to the owner, refreshing
    /// `updated_at`. Returns false when no row matched.
    pub fn update(
        &self,
        id: i64,
        owner_id: i64,
        input: &SourceCodeInput,
    ) -> rusqlite::Result<bool> {
        let conn = self.db.conn()?;
        let affected = conn.execute(
            "UPDATE source_codes
             SET title = ?1, description = ?2, language = ?3, category_id = ?4,
                 code_content = ?5, file_path = ?6, visibility = ?7, tags = ?8,
                 updated_at = datetime('now')
             WHERE id = ?9 AND user_id = ?10",
            params![
                input.title,
                input.description,
                input.language,
                input.category_id,
                input.code_content,
                input.file_path,
                input.visibility.as_str(),
                input.tags,
                id,
                owner_id,
            ],
        )?;
        Ok(affected > 0)
    }

    /// Deletes the record if it belongs to the owner. Returns false when no
    /// row matched.
    pub fn delete(&self, id: i64, owner_id: i64) -> rusqlite::Result<bool> {
        let conn = self.db.conn()?;
        let affected = conn.execute(
            "DELETE FROM source_codes WHERE id = ?1 AND user_id = ?2",
            params![id, owner_id],
        )?;
        Ok(affected > 0)
    }

    /// All categories, for the submission form.
    pub fn list_categories(&self) -> rusqlite::Result<Vec<Category>> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        rows.collect()
    }
}

fn row_to_source_code(row: &Row<'_>) -> rusqlite::Result<SourceCode> {
    let visibility: String = row.get(8)?;
    Ok(SourceCode {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        language: row.get(4)?,
        category_id: row.get(5)?,
        code_content: row.get(6)?,
        file_path: row.get(7)?,
        visibility: Visibility::parse_or_default(&visibility),
        tags: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}
