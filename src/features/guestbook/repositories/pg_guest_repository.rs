use async_trait::async_trait;
use sqlx::PgPool;

use crate::features::guestbook::models::{GuestEntry, GuestEntryChanges, NewGuestEntry};
use crate::features::guestbook::repositories::{GuestPage, GuestRepository, RepositoryError};
use crate::shared::types::ListQuery;

const COLUMNS: &str = "id, nama, nik, desa_kelurahan, alamat, no_telepon, keperluan, \
                       dokumentasi_pelayanan, tanggal_pelayanan, created_at";

/// `$1` is either NULL (no search) or an already escaped `%term%` pattern
const SEARCH_FILTER: &str = r#"
    WHERE $1::text IS NULL
       OR nama ILIKE $1 ESCAPE '\'
       OR nik ILIKE $1 ESCAPE '\'
       OR desa_kelurahan ILIKE $1 ESCAPE '\'
       OR keperluan ILIKE $1 ESCAPE '\'
"#;

/// Escapes LIKE metacharacters so they match literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn search_pattern(query: &ListQuery) -> Option<String> {
    query
        .search_term()
        .map(|term| format!("%{}%", escape_like(term)))
}

/// PostgreSQL-backed guest repository
pub struct PgGuestRepository {
    pool: PgPool,
}

impl PgGuestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuestRepository for PgGuestRepository {
    async fn create(&self, entry: NewGuestEntry) -> Result<GuestEntry, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO guest_entries
                (nama, nik, desa_kelurahan, alamat, no_telepon, keperluan, dokumentasi_pelayanan)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, GuestEntry>(&sql)
            .bind(entry.nama)
            .bind(entry.nik)
            .bind(entry.desa_kelurahan)
            .bind(entry.alamat)
            .bind(entry.no_telepon)
            .bind(entry.keperluan)
            .bind(entry.dokumentasi_pelayanan)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn find_many(&self, query: &ListQuery) -> Result<GuestPage, RepositoryError> {
        let pattern = search_pattern(query);

        let count_sql = format!("SELECT COUNT(*) FROM guest_entries {SEARCH_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(pattern.as_deref())
            .fetch_one(&self.pool)
            .await?;

        let list_sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM guest_entries
            {SEARCH_FILTER}
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        );
        let records = sqlx::query_as::<_, GuestEntry>(&list_sql)
            .bind(pattern.as_deref())
            .bind(query.limit())
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(GuestPage { records, total })
    }

    async fn find_by_id(&self, id: i32) -> Result<GuestEntry, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM guest_entries WHERE id = $1");
        sqlx::query_as::<_, GuestEntry>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn update(
        &self,
        id: i32,
        changes: GuestEntryChanges,
    ) -> Result<GuestEntry, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE guest_entries SET
                nama = COALESCE($2, nama),
                nik = COALESCE($3, nik),
                desa_kelurahan = COALESCE($4, desa_kelurahan),
                alamat = COALESCE($5, alamat),
                no_telepon = COALESCE($6, no_telepon),
                keperluan = COALESCE($7, keperluan),
                dokumentasi_pelayanan = COALESCE($8, dokumentasi_pelayanan),
                tanggal_pelayanan = COALESCE($9, tanggal_pelayanan)
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );

        sqlx::query_as::<_, GuestEntry>(&sql)
            .bind(id)
            .bind(changes.nama)
            .bind(changes.nik)
            .bind(changes.desa_kelurahan)
            .bind(changes.alamat)
            .bind(changes.no_telepon)
            .bind(changes.keperluan)
            .bind(changes.dokumentasi_pelayanan)
            .bind(changes.tanggal_pelayanan)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM guest_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
