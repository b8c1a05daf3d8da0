//! Projection and sort compilers for comma-separated field lists.

use super::error::QueryError;
use super::filter::Column;

/// Compile a `select` parameter into the list of columns to keep.
/// Absent input means no restriction (`None`). No deduplication.
pub fn parse_select(
    input: Option<&str>,
    allowed: &[Column],
) -> Result<Option<Vec<String>>, QueryError> {
    let Some(raw) = input else {
        return Ok(None);
    };

    let mut columns = Vec::new();
    for field in raw.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        if !allowed.iter().any(|c| c.name == field) {
            return Err(QueryError::UnknownSelectField(field.to_string()));
        }
        columns.push(field.to_string());
    }

    Ok(Some(columns))
}

/// Compile a `sort` parameter into an ORDER BY clause. A leading `-` on a
/// token means descending. The caller supplies the default for absent input.
pub fn compile_sort(input: &str, allowed: &[Column]) -> Result<String, QueryError> {
    let mut parts = Vec::new();

    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (field, direction) = match token.strip_prefix('-') {
            Some(field) => (field, "DESC"),
            None => (token, "ASC"),
        };
        if !allowed.iter().any(|c| c.name == field) {
            return Err(QueryError::UnknownSortField(field.to_string()));
        }
        parts.push(format!("\"{}\" {}", field, direction));
    }

    if parts.is_empty() {
        return Ok(String::new());
    }
    Ok(format!("ORDER BY {}", parts.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::filter::{col, ColumnKind};

    const ALLOWED: &[Column] = &[
        col("name", ColumnKind::Text),
        col("description", ColumnKind::Text),
        col("created_at", ColumnKind::Timestamp),
        col("tuition", ColumnKind::Integer),
    ];

    #[test]
    fn absent_select_means_no_restriction() {
        assert_eq!(parse_select(None, ALLOWED).unwrap(), None);
    }

    #[test]
    fn select_splits_on_commas() {
        let columns = parse_select(Some("name,description"), ALLOWED).unwrap().unwrap();
        assert_eq!(columns, vec!["name", "description"]);
    }

    #[test]
    fn select_rejects_unknown_field() {
        let err = parse_select(Some("name,secret"), ALLOWED).unwrap_err();
        assert_eq!(err, QueryError::UnknownSelectField("secret".to_string()));
    }

    #[test]
    fn sort_handles_directions() {
        let sql = compile_sort("-created_at,name", ALLOWED).unwrap();
        assert_eq!(sql, "ORDER BY \"created_at\" DESC, \"name\" ASC");
    }

    #[test]
    fn sort_rejects_unknown_field() {
        let err = compile_sort("-secret", ALLOWED).unwrap_err();
        assert_eq!(err, QueryError::UnknownSortField("secret".to_string()));
    }
}
