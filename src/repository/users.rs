//! Users repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::{AccountType, User},
};

const SELECT_USER: &str =
    "SELECT id, login, password, first_name, last_name, account_type, created_at FROM users";

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!("{} WHERE id = $1", SELECT_USER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    pub async fn get_by_login(&self, login: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("{} WHERE login = $1", SELECT_USER))
            .bind(login)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Insert a user; `password_hash` must already be an argon2 PHC string
    pub async fn create(
        &self,
        login: &str,
        password_hash: &str,
        account_type: AccountType,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (login, password, account_type)
            VALUES ($1, $2, $3)
            RETURNING id, login, password, first_name, last_name, account_type, created_at
            "#,
        )
        .bind(login)
        .bind(password_hash)
        .bind(account_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}
