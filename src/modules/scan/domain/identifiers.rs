//! Graph identifier and timestamp handling
//!
//! Graph ids are composite: a post id looks like `{group}_{post}` and a
//! comment id like `{post}_{comment}`. Only the last segment is stored.

use crate::shared::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};

/// Timestamp layout used by the Graph API, e.g. `2025-03-01T10:00:00+0000`
pub const GRAPH_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Longest comment id accepted from the feed
pub const MAX_COMMENT_ID_LEN: usize = 15;

pub fn parse_graph_time(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_str(raw, GRAPH_TIME_FORMAT)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| AppError::ValidationError(format!("Invalid Graph timestamp {:?}: {}", raw, e)))
}

/// Local post id: the last `_` segment, or the whole id when it has none
pub fn local_post_id(external_id: &str) -> &str {
    external_id.rsplit('_').next().unwrap_or(external_id)
}

/// Local comment id: the last `_` segment of a composite id
pub fn local_comment_id(external_id: &str) -> AppResult<&str> {
    match external_id.rsplit_once('_') {
        Some((_, last)) => Ok(last),
        None => Err(AppError::ValidationError(format!(
            "Invalid comment ID format: {}",
            external_id
        ))),
    }
}

/// Reject anonymous and malformed comment ids
pub fn validate_comment_id(id: Option<&str>) -> AppResult<&str> {
    match id {
        Some(id) if id.len() <= MAX_COMMENT_ID_LEN => Ok(id),
        other => Err(AppError::ValidationError(format!(
            "Anonymous comment or invalid comment ID: {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_local_ids_keep_last_segment() {
        assert_eq!(local_post_id("456_7891"), "7891");
        assert_eq!(local_comment_id("7891_123").unwrap(), "123");
        assert_eq!(local_comment_id("1_2_3").unwrap(), "3");
    }

    #[test]
    fn test_local_post_id_without_separator() {
        assert_eq!(local_post_id("7891"), "7891");
    }

    #[test]
    fn test_comment_id_needs_two_segments() {
        assert!(matches!(
            local_comment_id("123"),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_comment_id() {
        assert_eq!(validate_comment_id(Some("7891_123")).unwrap(), "7891_123");
        assert!(validate_comment_id(None).is_err());
        assert!(validate_comment_id(Some("1234567890_123456")).is_err());
    }

    #[test]
    fn test_parse_graph_time() {
        let parsed = parse_graph_time("2025-03-01T10:00:00+0000").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap());

        let shifted = parse_graph_time("2025-03-01T12:00:00+0200").unwrap();
        assert_eq!(shifted, parsed);

        assert!(parse_graph_time("yesterday").is_err());
    }
}
