//! Utility functions for string and value formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{format_date, format_money, format_phone, format_rating, truncate_string};
