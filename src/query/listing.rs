//! Listing orchestrator: composes the filter, projection/sort, and pagination
//! compilers into a single list query per request and packages the response
//! envelope. The result is an explicit return value the handler serializes.

use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::PgArguments;
use sqlx::Row;
use uuid::Uuid;

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::query::filter::Column;
use crate::query::{fields, filter, pagination::PageParams, pagination::Pagination};

const RESERVED_KEYS: &[&str] = &["select", "sort", "page", "limit"];
const DEFAULT_SORT: &str = "-created_at";

/// Related entity to embed in each row, keyed by a local foreign-key column.
/// The analogue of the original population descriptor.
pub struct Relation {
    pub name: &'static str,
    pub table: &'static str,
    pub local_key: &'static str,
    pub columns: &'static [&'static str],
}

/// Per-entity description of what the listing pipeline may touch.
pub struct ListSpec {
    pub table: &'static str,
    /// Whitelist of filterable, selectable, and sortable columns, each with
    /// its storage kind so filter values coerce correctly.
    pub columns: &'static [Column],
    /// Columns stripped from every row regardless of projection.
    pub hidden: &'static [&'static str],
    pub relation: Option<Relation>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub count: usize,
    pub pagination: Pagination,
    pub data: Vec<Value>,
}

/// Run the full listing pipeline for raw query-string pairs.
pub async fn list(spec: &ListSpec, raw: &[(String, String)]) -> ApiResult<ListResponse> {
    let reserved = |key: &str| raw.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.as_str());

    let filter_pairs: Vec<(String, String)> = raw
        .iter()
        .filter(|(k, _)| !RESERVED_KEYS.contains(&k.as_str()))
        .cloned()
        .collect();

    let conditions = filter::parse(&filter_pairs, spec.columns)?;
    let select = fields::parse_select(reserved("select"), spec.columns)?;
    let sort_sql = fields::compile_sort(reserved("sort").unwrap_or(DEFAULT_SORT), spec.columns)?;
    let page_params = PageParams::from_raw(reserved("page"), reserved("limit"));

    // Pagination runs against the unfiltered table total, matching the
    // pre-existing behavior of the listing pipeline.
    let total = count_all(spec.table).await?;
    let pagination = page_params.paginate(total);

    let (where_sql, params) = filter::compile(&conditions, 0);
    let where_clause = if where_sql.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", where_sql)
    };

    let sql = format!(
        "SELECT row_to_json(t) AS row FROM (SELECT * FROM \"{}\" {} {} LIMIT {} OFFSET {}) t",
        spec.table,
        where_clause,
        sort_sql,
        page_params.limit,
        page_params.offset(),
    );

    let mut query = sqlx::query(&sql);
    for param in &params {
        query = bind_value(query, param);
    }

    let rows = query.fetch_all(db::pool()).await.map_err(ApiError::from)?;
    let mut data: Vec<Value> = Vec::with_capacity(rows.len());
    for row in rows {
        let value: Value = row.try_get("row").map_err(ApiError::from)?;
        data.push(value);
    }

    for row in &mut data {
        if let Value::Object(map) = row {
            for hidden in spec.hidden {
                map.remove(*hidden);
            }
        }
    }

    let foreign_keys = spec
        .relation
        .as_ref()
        .map(|relation| collect_keys(&data, relation.local_key))
        .unwrap_or_default();

    if let Some(columns) = &select {
        for row in &mut data {
            if let Value::Object(map) = row {
                map.retain(|key, _| columns.iter().any(|c| c == key));
            }
        }
    }

    if let Some(relation) = &spec.relation {
        expand_relation(&mut data, relation, &foreign_keys).await?;
    }

    Ok(ListResponse {
        success: true,
        count: data.len(),
        pagination,
        data,
    })
}

async fn count_all(table: &str) -> ApiResult<i64> {
    let sql = format!("SELECT COUNT(*) AS count FROM \"{}\"", table);
    let row = sqlx::query(&sql)
        .fetch_one(db::pool())
        .await
        .map_err(ApiError::from)?;
    row.try_get("count").map_err(ApiError::from)
}

fn collect_keys(rows: &[Value], local_key: &str) -> Vec<(usize, Uuid)> {
    rows.iter()
        .enumerate()
        .filter_map(|(i, row)| {
            row.get(local_key)
                .and_then(Value::as_str)
                .and_then(|s| Uuid::parse_str(s).ok())
                .map(|id| (i, id))
        })
        .collect()
}

/// Batch-fetch the referenced parent rows and embed the selected columns
/// under the relation name in each child row.
async fn expand_relation(
    rows: &mut [Value],
    relation: &Relation,
    keys: &[(usize, Uuid)],
) -> ApiResult<()> {
    if keys.is_empty() {
        return Ok(());
    }

    let ids: Vec<Uuid> = keys.iter().map(|(_, id)| *id).collect();
    let columns = relation
        .columns
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT row_to_json(t) AS row FROM (SELECT {} FROM \"{}\" WHERE id = ANY($1)) t",
        columns, relation.table,
    );

    let parent_rows = sqlx::query(&sql)
        .bind(&ids)
        .fetch_all(db::pool())
        .await
        .map_err(ApiError::from)?;

    let mut parents = std::collections::HashMap::new();
    for row in parent_rows {
        let value: Value = row.try_get("row").map_err(ApiError::from)?;
        if let Some(id) = value
            .get("id")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
        {
            parents.insert(id, value);
        }
    }

    for (index, id) in keys {
        if let (Some(Value::Object(map)), Some(parent)) = (rows.get_mut(*index), parents.get(id)) {
            map.insert(relation.name.to_string(), parent.clone());
        }
    }

    Ok(())
}

/// Bind a JSON parameter value with its native type so comparisons behave
/// correctly against typed columns.
pub fn bind_value<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    value: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match value {
        Value::Null => {
            let none: Option<String> = None;
            query.bind(none)
        }
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else if let Some(f) = n.as_f64() {
                query.bind(f)
            } else {
                query.bind(n.to_string())
            }
        }
        Value::String(s) => query.bind(s),
        other => query.bind(other.to_string()),
    }
}
