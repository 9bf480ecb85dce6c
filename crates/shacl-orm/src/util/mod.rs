//! Utility modules.

pub mod datetime;

pub use datetime::{
    format_date, format_datetime, format_time, parse_date, parse_datetime, parse_time,
    DateTimeError,
};
