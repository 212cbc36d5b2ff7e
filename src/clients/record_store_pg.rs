use serde_json::Value;

use crate::{
    api::error,
    clients::record_store::{Filter, Item, RecordKey, RecordStore},
};

/// Record store backed by a single JSONB table in Postgres.
///
/// Rows are `(table_name, record_key, item, seq)`. Scans filter with JSONB
/// containment and partial updates merge with `||`.
#[derive(Clone)]
pub struct RecordStorePg {
    pool: sqlx::PgPool,
}

impl RecordStorePg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

fn into_item(value: Value) -> Result<Item, error::SystemError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(error::SystemError::Dependency(error::DependencyError::StoreUnavailable(
            format!("stored record is not an object: {}", other),
        ))),
    }
}

#[async_trait::async_trait]
impl RecordStore for RecordStorePg {
    async fn get(&self, table: &str, key: &RecordKey) -> Result<Option<Item>, error::SystemError> {
        let item = sqlx::query_scalar::<_, Value>(
            "SELECT item FROM records WHERE table_name = $1 AND record_key = $2",
        )
        .bind(table)
        .bind(key.as_text())
        .fetch_optional(&self.pool)
        .await?;

        item.map(into_item).transpose()
    }

    async fn put_new(
        &self,
        table: &str,
        key: &RecordKey,
        item: Item,
    ) -> Result<bool, error::SystemError> {
        let rows = sqlx::query(
            r#"
            INSERT INTO records (table_name, record_key, item)
            VALUES ($1, $2, $3)
            ON CONFLICT (table_name, record_key) DO NOTHING
            "#,
        )
        .bind(table)
        .bind(key.as_text())
        .bind(Value::Object(item))
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }

    async fn update(
        &self,
        table: &str,
        key: &RecordKey,
        fields: Item,
    ) -> Result<Option<Item>, error::SystemError> {
        let item = sqlx::query_scalar::<_, Value>(
            r#"
            UPDATE records
            SET item = item || $3
            WHERE table_name = $1 AND record_key = $2
            RETURNING item
            "#,
        )
        .bind(table)
        .bind(key.as_text())
        .bind(Value::Object(fields))
        .fetch_optional(&self.pool)
        .await?;

        item.map(into_item).transpose()
    }

    async fn scan(&self, table: &str, filter: &Filter) -> Result<Vec<Item>, error::SystemError> {
        let items = sqlx::query_scalar::<_, Value>(
            r#"
            SELECT item FROM records
            WHERE table_name = $1 AND item @> $2
            ORDER BY seq
            "#,
        )
        .bind(table)
        .bind(filter.to_json())
        .fetch_all(&self.pool)
        .await?;

        items.into_iter().map(into_item).collect()
    }

    async fn delete(&self, table: &str, key: &RecordKey) -> Result<(), error::SystemError> {
        sqlx::query("DELETE FROM records WHERE table_name = $1 AND record_key = $2")
            .bind(table)
            .bind(key.as_text())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn store() -> RecordStorePg {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = sqlx::PgPool::connect(&url).await.unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        RecordStorePg::new(pool)
    }

    fn table() -> String {
        format!("Test-{}", uuid::Uuid::now_v7())
    }

    fn item(v: Value) -> Item {
        v.as_object().cloned().unwrap()
    }

    #[actix_web::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn test_put_new_never_overwrites() {
        let store = store().await;
        let table = table();
        let key = RecordKey::N(1);

        assert!(store.put_new(&table, &key, item(json!({"id": 1, "v": "first"}))).await.unwrap());
        assert!(!store.put_new(&table, &key, item(json!({"id": 1, "v": "second"}))).await.unwrap());

        let stored = store.get(&table, &key).await.unwrap().unwrap();
        assert_eq!(stored["v"], "first");
    }

    #[actix_web::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn test_update_merges_named_fields() {
        let store = store().await;
        let table = table();
        let key = RecordKey::N(7);
        store.put_new(&table, &key, item(json!({"id": 7, "a": 1, "b": 2}))).await.unwrap();

        let updated = store.update(&table, &key, item(json!({"b": 3}))).await.unwrap().unwrap();
        assert_eq!(Value::Object(updated), json!({"id": 7, "a": 1, "b": 3}));

        let absent = store.update(&table, &RecordKey::N(8), item(json!({"b": 3}))).await.unwrap();
        assert!(absent.is_none());
    }

    #[actix_web::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn test_scan_filters_by_containment_in_insertion_order() {
        let store = store().await;
        let table = table();
        let rows = [
            json!({"id": 3, "userEmail": "a@b.c", "isPublic": true}),
            json!({"id": 1, "userEmail": "x@y.z", "isPublic": true}),
            json!({"id": 2, "userEmail": "a@b.c", "isPublic": false}),
            json!({"id": 4, "userEmail": "a@b.c", "isPublic": true}),
        ];
        for row in rows {
            let key = RecordKey::N(row["id"].as_i64().unwrap());
            store.put_new(&table, &key, item(row)).await.unwrap();
        }

        let filter = Filter::new().eq("userEmail", "a@b.c").eq("isPublic", true);
        let ids: Vec<_> = store
            .scan(&table, &filter)
            .await
            .unwrap()
            .iter()
            .map(|i| i["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![3, 4]);

        assert_eq!(store.scan(&table, &Filter::new()).await.unwrap().len(), 4);
        assert!(store.scan(&self::table(), &Filter::new()).await.unwrap().is_empty());
    }

    #[actix_web::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn test_delete_is_idempotent() {
        let store = store().await;
        let table = table();
        let key = RecordKey::S("a@b.c".into());
        store.put_new(&table, &key, item(json!({"email": "a@b.c"}))).await.unwrap();

        store.delete(&table, &key).await.unwrap();
        store.delete(&table, &key).await.unwrap();
        assert!(store.get(&table, &key).await.unwrap().is_none());
    }
}
