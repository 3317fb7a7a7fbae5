// Temporal stage: year-month values, ranges with their overlap rule, and the
// resolver that recognizes range expressions inside a line.

pub mod range;
pub mod resolver;

pub use range::{DateRange, YearMonth, MAX_YEAR, MIN_YEAR};
pub use resolver::{
    contains_date_range, find_date_range, find_year_range, parse_date_range, parse_date_token,
    DateMatch, DateToken,
};
