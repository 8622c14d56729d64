use super::error::FilterError;
use super::types::{OrderField, SortDirection};

/// A single sort key. Defaults to `id DESC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSpec {
    pub field: OrderField,
    pub direction: SortDirection,
}

impl Default for OrderSpec {
    fn default() -> Self {
        Self { field: OrderField::Id, direction: SortDirection::Desc }
    }
}

pub struct FilterOrder;

impl FilterOrder {
    /// Absent parts fall back to the default; present-but-unknown values are
    /// rejected. Direction matching is case-sensitive.
    pub fn validate_and_parse(order: Option<&str>, order_dir: Option<&str>) -> Result<OrderSpec, FilterError> {
        let mut spec = OrderSpec::default();

        if let Some(field) = order {
            spec.field = OrderField::from_param(field).ok_or(FilterError::InvalidOrderField)?;
        }

        if let Some(dir) = order_dir {
            spec.direction = match dir {
                "ASC" => SortDirection::Asc,
                "DESC" => SortDirection::Desc,
                _ => return Err(FilterError::InvalidDirection),
            };
        }

        Ok(spec)
    }

    pub fn generate(spec: &OrderSpec) -> String {
        format!("ORDER BY \"{}\" {}", spec.field.column(), spec.direction.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_id_desc() {
        let spec = FilterOrder::validate_and_parse(None, None).unwrap();
        assert_eq!(spec, OrderSpec { field: OrderField::Id, direction: SortDirection::Desc });
        assert_eq!(FilterOrder::generate(&spec), "ORDER BY \"id\" DESC");
    }

    #[test]
    fn accepts_whitelisted_pair() {
        let spec = FilterOrder::validate_and_parse(Some("age"), Some("ASC")).unwrap();
        assert_eq!(spec, OrderSpec { field: OrderField::Age, direction: SortDirection::Asc });
    }

    #[test]
    fn fills_missing_half_from_default() {
        let spec = FilterOrder::validate_and_parse(None, Some("ASC")).unwrap();
        assert_eq!(spec.field, OrderField::Id);
        let spec = FilterOrder::validate_and_parse(Some("date"), None).unwrap();
        assert_eq!(spec.direction, SortDirection::Desc);
    }

    #[test]
    fn rejects_unknown_field_and_direction() {
        assert_eq!(FilterOrder::validate_and_parse(Some("bogus"), None), Err(FilterError::InvalidOrderField));
        assert_eq!(FilterOrder::validate_and_parse(Some("email"), None), Err(FilterError::InvalidOrderField));
        assert_eq!(FilterOrder::validate_and_parse(None, Some("asc")), Err(FilterError::InvalidDirection));
        assert_eq!(FilterOrder::validate_and_parse(Some("id"), Some("UP")), Err(FilterError::InvalidDirection));
    }
}
