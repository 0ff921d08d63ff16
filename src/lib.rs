mod cleaner;
mod email_resolver;
mod format;
mod group_key;
mod grouping;
mod loader;
mod merge;
mod table;

pub use cleaner::{clean_table, parse_amount, parse_percent};
pub use email_resolver::{resolve_recipient, validate_email, ConflictPolicy, Resolution};
pub use format::{format_currency, format_percent};
pub use group_key::normalize_group_key;
pub use grouping::{
    group_data_with_wildcard, summarize_groups, ConflictEntry, GroupRecord, GroupingConfig,
    GroupingSummary,
};
pub use loader::load_table;
pub use merge::merge_email_data;
pub use table::{is_blank_token, CellValue, Table};
