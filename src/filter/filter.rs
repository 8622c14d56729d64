use super::error::FilterError;
use super::filter_order::{FilterOrder, OrderSpec};
use super::filter_page::PageWindow;
use super::filter_where::{FilterSet, FilterWhere};
use super::types::{FilterData, FilterWhereOptions, SqlResult};

/// The three validated parts of a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindQuery {
    pub filter: FilterSet,
    pub order: OrderSpec,
    pub page: PageWindow,
}

impl FindQuery {
    /// Fails on the first invalid part; empty strings count as absent.
    pub fn from_data(data: &FilterData) -> Result<Self, FilterError> {
        let filter = FilterSet::from_data(data)?;
        let order = FilterOrder::validate_and_parse(
            FilterData::present(&data.order),
            FilterData::present(&data.order_dir),
        )?;
        let page = PageWindow::from_params(FilterData::present(&data.limit), FilterData::present(&data.offset))?;
        Ok(Self { filter, order, page })
    }
}

/// A validated query: predicates, sort key and page window for one table.
#[derive(Debug, Clone)]
pub struct Filter {
    table_name: String,
    where_set: FilterSet,
    order: OrderSpec,
    page: PageWindow,
    options: FilterWhereOptions,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        Self::validate_table_name(&table_name)?;
        Ok(Self {
            table_name,
            where_set: FilterSet::new(),
            order: OrderSpec::default(),
            page: PageWindow::default(),
            options: FilterWhereOptions::default(),
        })
    }

    /// Validates every part of `data`; nothing is assigned unless all parts
    /// are valid.
    pub fn assign(&mut self, data: &FilterData) -> Result<&mut Self, FilterError> {
        let FindQuery { filter, order, page } = FindQuery::from_data(data)?;
        self.where_set = filter;
        self.order = order;
        self.page = page;
        Ok(self)
    }

    pub fn where_set(&mut self, set: FilterSet) -> &mut Self {
        self.where_set = set;
        self
    }

    pub fn order(&mut self, order: OrderSpec) -> &mut Self {
        self.order = order;
        self
    }

    pub fn page(&mut self, page: PageWindow) -> &mut Self {
        self.page = page;
        self
    }

    pub fn include_deleted(&mut self, include: bool) -> &mut Self {
        self.options.include_deleted = include;
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn to_sql(&self) -> SqlResult {
        let where_result = self.to_where_sql(0);
        let order_clause = FilterOrder::generate(&self.order);
        let limit_clause = self.page.to_sql();

        let query = [
            "SELECT *".to_string(),
            format!("FROM \"{}\"", self.table_name),
            format!("WHERE {}", where_result.query),
            order_clause,
            limit_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params: where_result.params }
    }

    /// WHERE body only, numbering placeholders after `starting_param_index`.
    pub fn to_where_sql(&self, starting_param_index: usize) -> SqlResult {
        FilterWhere::generate(&self.where_set, starting_param_index, &self.options)
    }

    fn validate_table_name(name: &str) -> Result<(), FilterError> {
        let mut chars = name.chars();
        let valid_start = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(FilterError::InvalidTableName(name.to_string()));
        }
        Ok(())
    }
}
