use super::error::FilterError;
use super::operator::parse_operator;
use super::types::{Comparison, FilterData, FilterField, FilterOp, FilterValue, FilterWhereOptions, SqlResult};
use super::value::validate_value;

/// AND-combined comparisons in arrival order.
///
/// Order does not change which records match, but it fixes the order in
/// which values are bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    comparisons: Vec<Comparison>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds already-validated triples into a fresh set.
    pub fn build<I>(triples: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (FilterField, FilterOp, FilterValue)>,
    {
        let mut set = Self::new();
        for (field, operator, value) in triples {
            set.push(Comparison::new(field, operator, value)?);
        }
        Ok(set)
    }

    /// Parses the `name`/`age`/`number`/`date` query values of `data`.
    pub fn from_data(data: &FilterData) -> Result<Self, FilterError> {
        let mut set = Self::new();
        for (field, raw) in data.field_filters() {
            set.push(parse_field_filter(field, raw)?);
        }
        Ok(set)
    }

    pub fn push(&mut self, comparison: Comparison) {
        self.comparisons.push(comparison);
    }

    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    pub fn is_empty(&self) -> bool {
        self.comparisons.is_empty()
    }

    pub fn len(&self) -> usize {
        self.comparisons.len()
    }

    /// `["age >= ?", "name = ?"]`
    pub fn predicates(&self) -> Vec<String> {
        self.comparisons.iter().map(Comparison::predicate).collect()
    }

    /// Bound values, aligned with [`predicates`](Self::predicates).
    pub fn params(&self) -> Vec<FilterValue> {
        self.comparisons.iter().map(|c| c.value().clone()).collect()
    }
}

/// One raw query value → one comparison. Text fields skip operator parsing.
pub fn parse_field_filter(field: FilterField, raw: &str) -> Result<Comparison, FilterError> {
    if !field.accepts_operator_prefix() {
        let value = validate_value(field, raw)?;
        return Comparison::new(field, FilterOp::Eq, value);
    }

    let parsed = parse_operator(raw);
    let operator = parsed.op().ok_or(FilterError::InvalidOperator(field))?;
    let value = validate_value(field, parsed.value)?;
    Comparison::new(field, operator, value)
}

/// Renders a [`FilterSet`] into a PostgreSQL WHERE body with `$n` placeholders.
pub struct FilterWhere {
    param_values: Vec<FilterValue>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self { param_values: vec![], param_index: starting_param_index }
    }

    /// `starting_param_index` is the number of placeholders already used by
    /// the surrounding statement; the first comparison binds `$start+1`.
    pub fn generate(set: &FilterSet, starting_param_index: usize, options: &FilterWhereOptions) -> SqlResult {
        let mut filter_where = Self::new(starting_param_index);
        filter_where.build(set, options)
    }

    fn build(&mut self, set: &FilterSet, options: &FilterWhereOptions) -> SqlResult {
        let mut conditions = vec![];
        if !options.include_deleted {
            conditions.push("\"deleted_at\" IS NULL".to_string());
        }
        for comparison in set.comparisons() {
            let placeholder = self.param(comparison.value().clone());
            conditions.push(format!(
                "\"{}\" {} {}",
                comparison.field().column(),
                comparison.operator().to_sql(),
                placeholder
            ));
        }
        let query = if conditions.is_empty() { "1=1".to_string() } else { conditions.join(" AND ") };
        SqlResult { query, params: std::mem::take(&mut self.param_values) }
    }

    fn param(&mut self, value: FilterValue) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}
