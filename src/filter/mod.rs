pub mod types;
pub mod filter;
pub mod filter_where;
pub mod filter_order;
pub mod filter_page;
pub mod operator;
pub mod value;
pub mod error;

pub use types::*;
pub use error::FilterError;
pub use filter::{Filter, FindQuery};
pub use filter_order::{FilterOrder, OrderSpec};
pub use filter_page::{PageWindow, UNBOUNDED};
pub use filter_where::{FilterSet, FilterWhere};
pub use operator::{parse_operator, ParsedOperator};
