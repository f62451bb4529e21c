//
//  bbdc-cli
//  util/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Utility Module
//!
//! Common helpers used by the command implementations:
//!
//! - [`format_timestamp`]: converts the server's Unix-millisecond epochs to
//!   readable UTC datetimes
//! - [`truncate`]: bounds string width for table rendering

use chrono::DateTime;

/// Formats a Unix timestamp in milliseconds as a UTC datetime string.
///
/// Bitbucket Data Center reports `createdDate`/`updatedDate` in milliseconds.
/// Unrepresentable values fall back to the raw number.
///
/// # Example
///
/// ```rust
/// use bbdc_cli::util::format_timestamp;
///
/// assert_eq!(format_timestamp(0), "1970-01-01 00:00:00");
/// ```
pub fn format_timestamp(ms: u64) -> String {
    let secs = (ms / 1000) as i64;
    let nsecs = ((ms % 1000) * 1_000_000) as u32;

    match DateTime::from_timestamp(secs, nsecs) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => ms.to_string(),
    }
}

/// Truncates a string to `max_len` characters, appending "…" when truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(1_700_000_000_000), "2023-11-14 22:13:20");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 6), "hello…");
        assert_eq!(truncate("héllo wörld", 6), "héllo…");
    }
}
