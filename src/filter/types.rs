use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::FilterError;

/// Columns a comparison may target.
///
/// `Email` is only reachable from inside the crate (account lookup); the
/// query string exposes `name`, `age`, `number` and `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Name,
    Email,
    Age,
    Number,
    Date,
}

/// Declared type of a filterable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Unsigned,
    Integer,
    Timestamp,
}

impl FilterField {
    pub fn column(&self) -> &'static str {
        match self {
            FilterField::Name => "name",
            FilterField::Email => "email",
            FilterField::Age => "age",
            FilterField::Number => "number",
            FilterField::Date => "date",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FilterField::Name | FilterField::Email => FieldKind::Text,
            FilterField::Age => FieldKind::Unsigned,
            FilterField::Number => FieldKind::Integer,
            FilterField::Date => FieldKind::Timestamp,
        }
    }

    /// Text columns only support implicit equality; the raw value is never
    /// scanned for an operator prefix.
    pub fn accepts_operator_prefix(&self) -> bool {
        !matches!(self.kind(), FieldKind::Text)
    }
}

impl std::fmt::Display for FilterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl FilterOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "=" => FilterOp::Eq,
            "<>" => FilterOp::Neq,
            ">" => FilterOp::Gt,
            ">=" => FilterOp::Gte,
            "<" => FilterOp::Lt,
            "<=" => FilterOp::Lte,
            _ => return None,
        })
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Neq => "<>",
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
            FilterOp::Lt => "<",
            FilterOp::Lte => "<=",
        }
    }

    /// Whether `record.cmp(value)` satisfies this operator.
    pub fn matches(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            FilterOp::Eq => ordering == Equal,
            FilterOp::Neq => ordering != Equal,
            FilterOp::Gt => ordering == Greater,
            FilterOp::Gte => ordering != Less,
            FilterOp::Lt => ordering == Less,
            FilterOp::Lte => ordering != Greater,
        }
    }
}

/// A type-checked scalar travelling as a bound parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Unsigned(u32),
    Integer(i32),
    Timestamp(DateTime<Utc>),
}

impl FilterValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FilterValue::Text(_) => FieldKind::Text,
            FilterValue::Unsigned(_) => FieldKind::Unsigned,
            FilterValue::Integer(_) => FieldKind::Integer,
            FilterValue::Timestamp(_) => FieldKind::Timestamp,
        }
    }
}

/// One `field operator value` predicate of a [`FilterSet`](super::FilterSet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    field: FilterField,
    operator: FilterOp,
    value: FilterValue,
}

impl Comparison {
    /// Rejects a value whose type does not match the field's declared kind.
    pub fn new(field: FilterField, operator: FilterOp, value: FilterValue) -> Result<Self, FilterError> {
        if value.kind() != field.kind() {
            return Err(FilterError::InvalidValue(field));
        }
        Ok(Self { field, operator, value })
    }

    pub fn field(&self) -> FilterField {
        self.field
    }

    pub fn operator(&self) -> FilterOp {
        self.operator
    }

    pub fn value(&self) -> &FilterValue {
        &self.value
    }

    /// Store-agnostic rendering, e.g. `age >= ?`. The value never appears
    /// in the text.
    pub fn predicate(&self) -> String {
        format!("{} {} ?", self.field.column(), self.operator.to_sql())
    }
}

/// Raw filter, order and pagination query parameters.
///
/// Empty strings are treated the same as absent keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterData {
    pub name: Option<String>,
    pub age: Option<String>,
    pub number: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "Order")]
    pub order: Option<String>,
    #[serde(rename = "OrderDir")]
    pub order_dir: Option<String>,
    #[serde(rename = "Limit")]
    pub limit: Option<String>,
    #[serde(rename = "Offset")]
    pub offset: Option<String>,
}

impl FilterData {
    pub(crate) fn present(value: &Option<String>) -> Option<&str> {
        value.as_deref().filter(|v| !v.is_empty())
    }

    /// Field filters in the order they are folded into a filter set.
    pub fn field_filters(&self) -> impl Iterator<Item = (FilterField, &str)> {
        [
            (FilterField::Name, &self.name),
            (FilterField::Age, &self.age),
            (FilterField::Number, &self.number),
            (FilterField::Date, &self.date),
        ]
        .into_iter()
        .filter_map(|(field, raw)| Self::present(raw).map(|raw| (field, raw)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterWhereOptions {
    /// Soft-deleted rows are hidden unless this is set.
    pub include_deleted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Whitelisted sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    Id,
    Name,
    Age,
    Number,
    Date,
}

impl OrderField {
    pub fn from_param(param: &str) -> Option<Self> {
        Some(match param {
            "id" => OrderField::Id,
            "name" => OrderField::Name,
            "age" => OrderField::Age,
            "number" => OrderField::Number,
            "date" => OrderField::Date,
            _ => return None,
        })
    }

    pub fn column(&self) -> &'static str {
        match self {
            OrderField::Id => "id",
            OrderField::Name => "name",
            OrderField::Age => "age",
            OrderField::Number => "number",
            OrderField::Date => "date",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<FilterValue>,
}
