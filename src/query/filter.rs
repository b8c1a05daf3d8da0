//! Filter compiler: raw query-string pairs to a SQL predicate.
//!
//! Accepts `field=value` (equality) and `field[op]=value` with a closed
//! operator set. The operator is taken from the bracket suffix of the key,
//! never matched as a substring, so values like `gtown` are left untouched.
//! Values are coerced by the declared column kind, never by what the text
//! happens to parse as, so numeric-looking text such as a zipcode stays text.

use serde_json::Value;
use uuid::Uuid;

use super::error::QueryError;

/// Storage type of a whitelisted column. Drives value coercion and the
/// placeholder cast in the compiled predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Float,
    Boolean,
    Uuid,
    Timestamp,
    /// Postgres enum; carries the type name for the placeholder cast.
    Enum(&'static str),
}

/// A filterable, selectable, and sortable column of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

pub const fn col(name: &'static str, kind: ColumnKind) -> Column {
    Column { name, kind }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Equals,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    OneOf,
}

impl FilterOp {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "gt" => Some(FilterOp::GreaterThan),
            "gte" => Some(FilterOp::GreaterOrEqual),
            "lt" => Some(FilterOp::LessThan),
            "lte" => Some(FilterOp::LessOrEqual),
            "in" => Some(FilterOp::OneOf),
            _ => None,
        }
    }

    fn sql_op(self) -> &'static str {
        match self {
            FilterOp::Equals => "=",
            FilterOp::GreaterThan => ">",
            FilterOp::GreaterOrEqual => ">=",
            FilterOp::LessThan => "<",
            FilterOp::LessOrEqual => "<=",
            FilterOp::OneOf => "IN",
        }
    }
}

/// A single typed filter condition over a whitelisted column.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: Column,
    pub op: FilterOp,
    pub values: Vec<Value>,
}

/// Parse query-string pairs (reserved keys already stripped by the caller)
/// into typed conditions. Fields outside `allowed`, operators outside the
/// closed set, and values that do not fit the column kind are rejected.
pub fn parse(pairs: &[(String, String)], allowed: &[Column]) -> Result<Vec<Condition>, QueryError> {
    let mut conditions = Vec::new();

    for (key, raw_value) in pairs {
        let (field, op) = match key.split_once('[') {
            Some((field, rest)) => {
                let keyword = rest
                    .strip_suffix(']')
                    .ok_or_else(|| QueryError::UnsupportedOperator(rest.to_string()))?;
                let op = FilterOp::from_keyword(keyword)
                    .ok_or_else(|| QueryError::UnsupportedOperator(keyword.to_string()))?;
                (field, op)
            }
            None => (key.as_str(), FilterOp::Equals),
        };

        let column = *allowed
            .iter()
            .find(|c| c.name == field)
            .ok_or_else(|| QueryError::UnknownFilterField(field.to_string()))?;

        let values = match op {
            FilterOp::OneOf => raw_value
                .split(',')
                .map(|v| coerce(&column, v.trim()))
                .collect::<Result<Vec<_>, _>>()?,
            _ => vec![coerce(&column, raw_value)?],
        };

        conditions.push(Condition { column, op, values });
    }

    Ok(conditions)
}

/// Compile conditions to a SQL predicate with `$n` placeholders, numbering
/// from `start_index + 1`. Returns the predicate and the bind parameters.
pub fn compile(conditions: &[Condition], start_index: usize) -> (String, Vec<Value>) {
    let mut clauses = Vec::with_capacity(conditions.len());
    let mut params = Vec::new();
    let mut index = start_index;

    for condition in conditions {
        let quoted = format!("\"{}\"", condition.column.name);
        let cast = cast_suffix(condition.column.kind);
        match condition.op {
            FilterOp::OneOf => {
                let placeholders: Vec<String> = condition
                    .values
                    .iter()
                    .map(|v| {
                        params.push(v.clone());
                        index += 1;
                        format!("${}{}", index, cast)
                    })
                    .collect();
                if placeholders.is_empty() {
                    clauses.push("1=0".to_string());
                } else {
                    clauses.push(format!("{} IN ({})", quoted, placeholders.join(", ")));
                }
            }
            op => {
                params.push(condition.values[0].clone());
                index += 1;
                clauses.push(format!("{} {} ${}{}", quoted, op.sql_op(), index, cast));
            }
        }
    }

    (clauses.join(" AND "), params)
}

/// Kinds with no native bind representation go over the wire as text and
/// get cast inside the predicate.
fn cast_suffix(kind: ColumnKind) -> String {
    match kind {
        ColumnKind::Uuid => "::uuid".to_string(),
        ColumnKind::Timestamp => "::timestamptz".to_string(),
        ColumnKind::Enum(type_name) => format!("::{}", type_name),
        _ => String::new(),
    }
}

/// Coerce a raw query-string value by the declared column kind. Text stays
/// text untouched; numbers and booleans bind natively; uuids are validated
/// up front so a malformed one is a client error, not a storage error.
fn coerce(column: &Column, raw: &str) -> Result<Value, QueryError> {
    let invalid = || QueryError::InvalidFilterValue {
        field: column.name.to_string(),
        value: raw.to_string(),
    };

    Ok(match column.kind {
        ColumnKind::Integer => Value::from(raw.parse::<i64>().map_err(|_| invalid())?),
        ColumnKind::Float => Value::from(raw.parse::<f64>().map_err(|_| invalid())?),
        ColumnKind::Boolean => match raw {
            "true" => Value::from(true),
            "false" => Value::from(false),
            _ => return Err(invalid()),
        },
        ColumnKind::Uuid => {
            Uuid::parse_str(raw).map_err(|_| invalid())?;
            Value::from(raw)
        }
        ColumnKind::Text | ColumnKind::Timestamp | ColumnKind::Enum(_) => Value::from(raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALLOWED: &[Column] = &[
        col("tuition", ColumnKind::Integer),
        col("name", ColumnKind::Text),
        col("zipcode", ColumnKind::Text),
        col("minimum_skill", ColumnKind::Enum("minimum_skill")),
        col("average_cost", ColumnKind::Integer),
        col("user_id", ColumnKind::Uuid),
        col("created_at", ColumnKind::Timestamp),
    ];

    fn pairs(input: &[(&str, &str)]) -> Vec<(String, String)> {
        input
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn bare_equality_is_never_rewritten() {
        // "gtown" contains "gt" but must stay a plain equality value
        let conditions = parse(&pairs(&[("name", "gtown")]), ALLOWED).unwrap();
        assert_eq!(conditions[0].op, FilterOp::Equals);

        let (sql, params) = compile(&conditions, 0);
        assert_eq!(sql, "\"name\" = $1");
        assert_eq!(params, vec![Value::from("gtown")]);
    }

    #[test]
    fn numeric_looking_text_stays_text() {
        // a zipcode parses as a number but the column is text; coercing it
        // would both break the comparison and drop the leading zero
        let conditions = parse(&pairs(&[("zipcode", "02115")]), ALLOWED).unwrap();
        let (sql, params) = compile(&conditions, 0);
        assert_eq!(sql, "\"zipcode\" = $1");
        assert_eq!(params, vec![Value::from("02115")]);
    }

    #[test]
    fn bracket_operator_compiles_to_comparison() {
        let conditions = parse(&pairs(&[("tuition", "1000")]), ALLOWED).unwrap();
        assert_eq!(conditions[0].op, FilterOp::Equals);

        let conditions = parse(&pairs(&[("tuition[gt]", "1000")]), ALLOWED).unwrap();
        let (sql, params) = compile(&conditions, 0);
        assert_eq!(sql, "\"tuition\" > $1");
        assert_eq!(params, vec![Value::from(1000)]);
    }

    #[test]
    fn in_operator_splits_on_commas() {
        let conditions =
            parse(&pairs(&[("minimum_skill[in]", "beginner,intermediate")]), ALLOWED).unwrap();
        let (sql, params) = compile(&conditions, 0);
        assert_eq!(
            sql,
            "\"minimum_skill\" IN ($1::minimum_skill, $2::minimum_skill)"
        );
        assert_eq!(
            params,
            vec![Value::from("beginner"), Value::from("intermediate")]
        );
    }

    #[test]
    fn multiple_conditions_join_with_and() {
        let conditions = parse(
            &pairs(&[("tuition[lte]", "5000"), ("average_cost[gte]", "100")]),
            ALLOWED,
        )
        .unwrap();
        let (sql, params) = compile(&conditions, 2);
        assert_eq!(sql, "\"tuition\" <= $3 AND \"average_cost\" >= $4");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn uuid_columns_are_validated_and_cast() {
        let id = "5a8ee2ba-33dc-4eb9-a9a6-20d5a8b4f0ab";
        let conditions = parse(&pairs(&[("user_id", id)]), ALLOWED).unwrap();
        let (sql, params) = compile(&conditions, 0);
        assert_eq!(sql, "\"user_id\" = $1::uuid");
        assert_eq!(params, vec![Value::from(id)]);

        let err = parse(&pairs(&[("user_id", "not-a-uuid")]), ALLOWED).unwrap_err();
        assert!(matches!(err, QueryError::InvalidFilterValue { .. }));
    }

    #[test]
    fn integer_column_rejects_non_numeric_value() {
        let err = parse(&pairs(&[("tuition", "cheap")]), ALLOWED).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidFilterValue {
                field: "tuition".to_string(),
                value: "cheap".to_string(),
            }
        );
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = parse(&pairs(&[("password", "x")]), ALLOWED).unwrap_err();
        assert_eq!(err, QueryError::UnknownFilterField("password".to_string()));
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let err = parse(&pairs(&[("tuition[regex]", "x")]), ALLOWED).unwrap_err();
        assert_eq!(err, QueryError::UnsupportedOperator("regex".to_string()));
    }
}
