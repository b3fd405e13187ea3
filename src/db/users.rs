//! Users table and credential checks.

use serde_json::json;

use super::{Database, DbError, NewUser, User};
use crate::auth::{hash_password, verify_against_dummy, verify_password};

const USER_COLUMNS: &str = "id, username, email, password_hash, role, created_at";

impl Database {
    /// Store a new account. The password is hashed before it reaches SQL.
    pub async fn register_user(&self, user: &NewUser) -> Result<User, DbError> {
        let details = json!({ "username": user.username, "email": user.email, "role": user.role });

        let password = user.password.clone();
        let hashed = self
            .blocking("INSERT", "Users", details.clone(), move || hash_password(&password))
            .await?;

        let sql = format!(
            "INSERT INTO Users (username, email, password_hash, role) VALUES (?1, ?2, ?3, ?4) \
             RETURNING {USER_COLUMNS}"
        );
        self.execute("INSERT", "Users", details, async {
            let mut conn = self.pool.acquire().await?;
            sqlx::query_as::<_, User>(&sql)
                .bind(&user.username)
                .bind(&user.email)
                .bind(&hashed)
                .bind(&user.role)
                .fetch_one(&mut *conn)
                .await
        })
        .await
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM Users WHERE email = ?1");
        self.execute("SELECT", "Users", json!({ "email": email }), async {
            let mut conn = self.pool.acquire().await?;
            sqlx::query_as::<_, User>(&sql)
                .bind(email)
                .fetch_optional(&mut *conn)
                .await
        })
        .await
    }

    /// Return the account when `password` matches its stored hash.
    pub async fn login_user(&self, email: &str, password: &str) -> Result<Option<User>, DbError> {
        let user = self.find_user_by_email(email).await?;
        let candidate = password.to_string();

        let Some(user) = user else {
            self.blocking("VERIFY", "Users", json!({ "email": email }), move || {
                verify_against_dummy(&candidate);
                Ok::<(), DbError>(())
            })
            .await?;
            return Ok(None);
        };

        let stored = user.password_hash.clone();
        let details = json!({ "email": email, "user_id": user.id });
        let verified = self
            .blocking("VERIFY", "Users", details, move || verify_password(&stored, &candidate))
            .await?;
        Ok(verified.then_some(user))
    }
}
