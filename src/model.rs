//! Post records and request payloads.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::Identity;

/// Sentinel understood by the store as "assign the server-side timestamp".
/// Client clocks are never used for `created`.
pub fn server_timestamp() -> Value {
    json!({ ".sv": "timestamp" })
}

/// Body of a `POST /posts/` request, before sanitization.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Author attribution stored with each post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A post as written to the store. `created` holds the server-timestamp
/// sentinel on the way in and the assigned epoch-millis value on read-back.
#[derive(Debug, Clone, Serialize)]
pub struct PostRecord {
    pub author: Author,
    pub title: String,
    pub content: String,
    pub created: Value,
}

impl PostRecord {
    /// Build a record attributed to the authenticated identity. The `name`
    /// claim is carried only when the identity supplies one.
    pub fn new(identity: &Identity, title: String, content: String) -> Self {
        Self {
            author: Author {
                uid: identity.subject.clone(),
                name: identity.name.clone(),
            },
            title,
            content,
            created: server_timestamp(),
        }
    }
}
