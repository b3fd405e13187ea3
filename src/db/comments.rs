//! Comments table.

use serde_json::json;

use super::{Comment, Database, DbError, NewComment, WriteResult};

impl Database {
    pub async fn get_comments_by_post(&self, post_id: i64) -> Result<Vec<Comment>, DbError> {
        self.execute("SELECT", "Comments", json!({ "post_id": post_id }), async {
            let mut conn = self.pool.acquire().await?;
            sqlx::query_as::<_, Comment>(
                "SELECT id, post_id, user_id, content, created_at, updated_at \
                 FROM Comments WHERE post_id = ?1 ORDER BY created_at ASC, id ASC",
            )
            .bind(post_id)
            .fetch_all(&mut *conn)
            .await
        })
        .await
    }

    pub async fn create_comment(&self, comment: &NewComment) -> Result<Comment, DbError> {
        let details = json!({ "post_id": comment.post_id, "user_id": comment.user_id });
        self.execute("INSERT", "Comments", details, async {
            let mut conn = self.pool.acquire().await?;
            sqlx::query_as::<_, Comment>(
                "INSERT INTO Comments (post_id, user_id, content) VALUES (?1, ?2, ?3) \
                 RETURNING id, post_id, user_id, content, created_at, updated_at",
            )
            .bind(comment.post_id)
            .bind(comment.user_id)
            .bind(&comment.content)
            .fetch_one(&mut *conn)
            .await
        })
        .await
    }

    pub async fn update_comment(&self, id: i64, content: &str) -> Result<WriteResult, DbError> {
        self.execute("UPDATE", "Comments", json!({ "id": id }), async {
            let mut conn = self.pool.acquire().await?;
            sqlx::query("UPDATE Comments SET content = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2")
                .bind(content)
                .bind(id)
                .execute(&mut *conn)
                .await
                .map(|done| WriteResult { rows_affected: done.rows_affected() })
        })
        .await
    }

    pub async fn delete_comment(&self, id: i64) -> Result<WriteResult, DbError> {
        self.execute("DELETE", "Comments", json!({ "id": id }), async {
            let mut conn = self.pool.acquire().await?;
            sqlx::query("DELETE FROM Comments WHERE id = ?1")
                .bind(id)
                .execute(&mut *conn)
                .await
                .map(|done| WriteResult { rows_affected: done.rows_affected() })
        })
        .await
    }
}
