use anyhow::Result;

use super::schema::Database;

impl Database {
    // ========================================================================
    // User Preferences Operations
    // ========================================================================

    /// Get a single preference value by key.
    pub async fn get_preference(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM user_preferences WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Set a preference value (UPSERT), refreshing `updated_at`.
    pub async fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_preferences (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a preference row. Deleting a missing key is not an error.
    pub async fn remove_preference(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM user_preferences WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// All preferences whose key starts with `prefix`, ordered by key.
    ///
    /// An empty prefix returns every row.
    pub async fn get_preferences_by_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        let pattern = format!("{}%", escape_like(prefix));
        let rows: Vec<(String, String)> = sqlx::query_as(
            r"SELECT key, value FROM user_preferences WHERE key LIKE ? ESCAPE '\' ORDER BY key",
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Remove every stored preference. Returns the number of rows deleted.
    pub async fn clear_preferences(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM user_preferences")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Escape LIKE wildcards so a prefix matches literally.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::storage::Database;

    async fn test_db() -> Database {
        Database::open(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_get_preference_missing() {
        let db = test_db().await;
        assert_eq!(db.get_preference("favoriteChannels").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_preference_upsert() {
        let db = test_db().await;
        db.set_preference("darkMode", "enabled").await.unwrap();
        db.set_preference("darkMode", "disabled").await.unwrap();

        let value = db.get_preference("darkMode").await.unwrap();
        assert_eq!(value.as_deref(), Some("disabled"));
    }

    #[tokio::test]
    async fn test_remove_preference() {
        let db = test_db().await;
        db.set_preference("favoriteChannels", r#"["a"]"#)
            .await
            .unwrap();
        db.remove_preference("favoriteChannels").await.unwrap();
        assert_eq!(db.get_preference("favoriteChannels").await.unwrap(), None);

        // Removing again is fine
        db.remove_preference("favoriteChannels").await.unwrap();
    }

    #[tokio::test]
    async fn test_prefix_query() {
        let db = test_db().await;
        db.set_preference("themeColor", "#e50914").await.unwrap();
        db.set_preference("themeShadow", "#b20710").await.unwrap();
        db.set_preference("lastView", "grid").await.unwrap();

        let theme = db.get_preferences_by_prefix("theme").await.unwrap();
        assert_eq!(
            theme,
            vec![
                ("themeColor".to_string(), "#e50914".to_string()),
                ("themeShadow".to_string(), "#b20710".to_string()),
            ]
        );
        assert_eq!(db.get_preferences_by_prefix("").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_prefix_wildcards_are_literal() {
        let db = test_db().await;
        db.set_preference("keybind.quit", "q").await.unwrap();
        db.set_preference("keybindXquit", "x").await.unwrap();

        let rows = db.get_preferences_by_prefix("keybind_").await.unwrap();
        assert!(rows.is_empty());
        let rows = db.get_preferences_by_prefix("keybind.").await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_preferences() {
        let db = test_db().await;
        db.set_preference("a", "1").await.unwrap();
        db.set_preference("b", "2").await.unwrap();
        assert_eq!(db.clear_preferences().await.unwrap(), 2);
        assert!(db.get_preferences_by_prefix("").await.unwrap().is_empty());
    }
}
