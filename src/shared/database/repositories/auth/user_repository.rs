use sqlx::{postgres::PgRow, PgPool, Row};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use crate::domains::auth::models::user::{NewUser, User};
use super::{DuplicateUser, UserStore};

// PostgreSQL unique_violation
const UNIQUE_VIOLATION: &str = "23505";

const USER_COLUMNS: &str =
    "id, username, email, fullname, password_hash, avatar, cover_image, refresh_token, created_at, updated_at";

/// PostgreSQL 사용자 저장소
/// PostgreSQL-backed `UserStore`
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 유니크 제약 위반은 DuplicateUser 로, 나머지는 context 를 붙여 반환
    fn write_error(e: sqlx::Error, context: &'static str) -> anyhow::Error {
        let unique = matches!(
            &e,
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION)
        );

        if unique {
            DuplicateUser.into()
        } else {
            anyhow::Error::new(e).context(context)
        }
    }

    fn map_row(row: &PgRow) -> User {
        User {
            id: row.get::<i64, _>("id") as u64,
            username: row.get("username"),
            email: row.get("email"),
            fullname: row.get("fullname"),
            password_hash: row.get("password_hash"),
            avatar: row.get("avatar"),
            cover_image: row.get("cover_image"),
            refresh_token: row.get("refresh_token"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    // 단일 문자열 컬럼 갱신 후 갱신된 레코드 반환
    // Targeted single-column update returning the updated row
    async fn update_text_column(&self, id: u64, column: &str, value: &str) -> Result<Option<User>> {
        let sql = format!(
            "UPDATE users SET {} = $1, updated_at = $2 WHERE id = $3 RETURNING {}",
            column, USER_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(value)
            .bind(Utc::now())
            .bind(id as i64)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to update user {}", column))?;

        Ok(row.as_ref().map(Self::map_row))
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        let sql = format!(
            r#"
            INSERT INTO users (username, email, fullname, password_hash, avatar, cover_image, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(&new_user.username)
            .bind(&new_user.email)
            .bind(&new_user.fullname)
            .bind(&new_user.password_hash)
            .bind(&new_user.avatar)
            .bind(&new_user.cover_image)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::write_error(e, "Failed to create user"))?;

        Ok(Self::map_row(&row))
    }

    // ID로 사용자 조회
    // Get user by ID
    async fn get_user_by_id(&self, id: u64) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(id as i64)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by id")?;

        Ok(row.as_ref().map(Self::map_row))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by email")?;

        Ok(row.as_ref().map(Self::map_row))
    }

    async fn find_by_username_or_email(&self, username: &str, email: &str) -> Result<Option<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE username = $1 OR email = $2 LIMIT 1",
            USER_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(username)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by username or email")?;

        Ok(row.as_ref().map(Self::map_row))
    }

    async fn set_refresh_token(&self, id: u64, refresh_token: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token = $1, updated_at = $2
            WHERE id = $3
            "#,
        )
        .bind(refresh_token)
        .bind(Utc::now())
        .bind(id as i64)
        .execute(&self.pool)
        .await
        .context("Failed to store refresh token")?;

        if result.rows_affected() == 0 {
            anyhow::bail!("User {} not found while storing refresh token", id);
        }

        Ok(())
    }

    async fn clear_refresh_token(&self, id: u64) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET refresh_token = NULL, updated_at = $1
            WHERE id = $2 AND refresh_token IS NOT NULL
            "#,
        )
        .bind(Utc::now())
        .bind(id as i64)
        .execute(&self.pool)
        .await
        .context("Failed to clear refresh token")?;

        Ok(())
    }

    async fn update_password(&self, id: u64, password_hash: &str) -> Result<()> {
        self.update_text_column(id, "password_hash", password_hash)
            .await?
            .with_context(|| format!("User {} not found while updating password", id))?;

        Ok(())
    }

    async fn update_details(&self, id: u64, fullname: &str, email: &str) -> Result<Option<User>> {
        let sql = format!(
            "UPDATE users SET fullname = $1, email = $2, updated_at = $3 WHERE id = $4 RETURNING {}",
            USER_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(fullname)
            .bind(email)
            .bind(Utc::now())
            .bind(id as i64)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::write_error(e, "Failed to update user details"))?;

        Ok(row.as_ref().map(Self::map_row))
    }

    async fn update_avatar(&self, id: u64, avatar_url: &str) -> Result<Option<User>> {
        self.update_text_column(id, "avatar", avatar_url).await
    }

    async fn update_cover_image(&self, id: u64, cover_image_url: &str) -> Result<Option<User>> {
        self.update_text_column(id, "cover_image", cover_image_url).await
    }
}
