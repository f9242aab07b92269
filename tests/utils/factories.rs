/// Test data factories
///
/// Feed payloads are built the way the Graph API returns them, with
/// composite ids and `+0000` timestamps.
use fleetscan::modules::facebook::domain::{
    CommentsData, FeedPage, FlexibleId, FromUser, Post, PostComment,
};
use fleetscan::modules::scan::domain::{GroupToScan, ProfileToScan};

pub const GRAPH_TIME: &str = "2025-03-01T10:00:00+0000";

pub fn group(id: i32, account_id: i32) -> GroupToScan {
    GroupToScan {
        id,
        group_id: format!("g{}", id),
        group_name: format!("Group {}", id),
        account_id,
        access_token: Some(format!("token-{}", account_id)),
    }
}

pub fn group_without_token(id: i32, account_id: i32) -> GroupToScan {
    GroupToScan {
        access_token: None,
        ..group(id, account_id)
    }
}

pub fn profile(id: i32, facebook_id: &str, account_id: i32) -> ProfileToScan {
    ProfileToScan {
        id,
        facebook_id: facebook_id.to_string(),
        account_id,
        access_token: Some(format!("token-{}", account_id)),
    }
}

pub fn comment(id: &str, author_id: &str) -> PostComment {
    PostComment {
        id: Some(id.to_string()),
        message: Some(format!("comment {}", id)),
        created_time: Some(GRAPH_TIME.to_string()),
        like_count: None,
        from: Some(FromUser {
            id: Some(FlexibleId::new(author_id)),
            name: Some(format!("Author {}", author_id)),
        }),
    }
}

pub fn authorless_comment(id: &str) -> PostComment {
    PostComment {
        from: None,
        ..comment(id, "0")
    }
}

/// A post whose embedded comments match its reported count
pub fn post(id: &str, comments: Vec<PostComment>) -> Post {
    Post {
        id: Some(id.to_string()),
        updated_time: Some(GRAPH_TIME.to_string()),
        message: Some(format!("post {}", id)),
        comments: Some(CommentsData {
            count: Some(comments.len() as u64),
            data: Some(comments),
        }),
        ..Post::default()
    }
}

/// A post reporting `count` comments without embedding any
pub fn post_with_remote_comments(id: &str, count: u64) -> Post {
    Post {
        comments: Some(CommentsData {
            count: Some(count),
            data: None,
        }),
        ..post(id, Vec::new())
    }
}

pub fn post_without_comments(id: &str) -> Post {
    Post {
        comments: None,
        ..post(id, Vec::new())
    }
}

pub fn feed(posts: Vec<Post>) -> FeedPage {
    FeedPage {
        data: Some(posts),
        paging: None,
    }
}

pub fn empty_feed() -> FeedPage {
    FeedPage {
        data: None,
        paging: None,
    }
}
