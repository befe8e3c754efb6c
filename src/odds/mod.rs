pub mod moneyline;
pub mod normalize;
pub mod wire;

pub use moneyline::{flatten_moneyline, group_moneyline, rows_on_date, summarize};
pub use normalize::normalize_props;
