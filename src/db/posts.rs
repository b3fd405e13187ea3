//! Posts table.

use serde_json::json;

use super::{Database, DbError, NewPost, Post, WriteResult};

const POST_COLUMNS: &str = "id, title, content, user_id, created_at, updated_at";

impl Database {
    pub async fn get_all_posts(&self) -> Result<Vec<Post>, DbError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM Posts ORDER BY created_at DESC, id DESC");
        self.execute("SELECT", "Posts", json!({}), async {
            let mut conn = self.pool.acquire().await?;
            sqlx::query_as::<_, Post>(&sql).fetch_all(&mut *conn).await
        })
        .await
    }

    pub async fn get_post_by_id(&self, id: i64) -> Result<Option<Post>, DbError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM Posts WHERE id = ?1");
        self.execute("SELECT", "Posts", json!({ "id": id }), async {
            let mut conn = self.pool.acquire().await?;
            sqlx::query_as::<_, Post>(&sql)
                .bind(id)
                .fetch_optional(&mut *conn)
                .await
        })
        .await
    }

    pub async fn create_post(&self, post: &NewPost) -> Result<Post, DbError> {
        let sql = format!(
            "INSERT INTO Posts (title, content, user_id) VALUES (?1, ?2, ?3) RETURNING {POST_COLUMNS}"
        );
        let details = json!({ "title": post.title, "user_id": post.user_id });
        self.execute("INSERT", "Posts", details, async {
            let mut conn = self.pool.acquire().await?;
            sqlx::query_as::<_, Post>(&sql)
                .bind(&post.title)
                .bind(&post.content)
                .bind(post.user_id)
                .fetch_one(&mut *conn)
                .await
        })
        .await
    }

    pub async fn update_post(&self, id: i64, title: &str, content: &str) -> Result<WriteResult, DbError> {
        let details = json!({ "id": id, "title": title });
        self.execute("UPDATE", "Posts", details, async {
            let mut conn = self.pool.acquire().await?;
            sqlx::query(
                "UPDATE Posts SET title = ?1, content = ?2, updated_at = CURRENT_TIMESTAMP WHERE id = ?3",
            )
            .bind(title)
            .bind(content)
            .bind(id)
            .execute(&mut *conn)
            .await
            .map(|done| WriteResult { rows_affected: done.rows_affected() })
        })
        .await
    }

    pub async fn delete_post(&self, id: i64) -> Result<WriteResult, DbError> {
        self.execute("DELETE", "Posts", json!({ "id": id }), async {
            let mut conn = self.pool.acquire().await?;
            sqlx::query("DELETE FROM Posts WHERE id = ?1")
                .bind(id)
                .execute(&mut *conn)
                .await
                .map(|done| WriteResult { rows_affected: done.rows_affected() })
        })
        .await
    }
}
