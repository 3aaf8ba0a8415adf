use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::null_as_empty;

/// A user record as the server returns it. Login and register only send
/// `id`, `username` and `email`; the profile fields fall back to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub profile_image_url: String,
    /// Unix seconds.
    #[serde(default)]
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

impl From<bool> for Visibility {
    fn from(public: bool) -> Self {
        if public { Self::Public } else { Self::Private }
    }
}

/// The four optional 1-10 scales attached to an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DreamRatings {
    #[serde(rename = "nightmare_rating", default, skip_serializing_if = "Option::is_none")]
    pub nightmare: Option<u8>,
    #[serde(rename = "vividness_rating", default, skip_serializing_if = "Option::is_none")]
    pub vividness: Option<u8>,
    #[serde(rename = "clarity_rating", default, skip_serializing_if = "Option::is_none")]
    pub clarity: Option<u8>,
    #[serde(
        rename = "emotional_intensity_rating",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub emotional_intensity: Option<u8>,
}

impl DreamRatings {
    /// Iterates `(field name, value)` over the ratings that are set.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u8)> {
        [
            ("nightmare_rating", self.nightmare),
            ("vividness_rating", self.vividness),
            ("clarity_rating", self.clarity),
            ("emotional_intensity_rating", self.emotional_intensity),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }
}

/// A journal entry. `id` is the server-assigned public shortcode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dream {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(rename = "profileImageURL", default)]
    pub profile_image_url: String,
    #[serde(default)]
    pub title: String,
    pub text: String,
    pub public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub ratings: DreamRatings,
}

impl Dream {
    pub fn visibility(&self) -> Visibility {
        Visibility::from(self.public)
    }
}

/// Aggregate tag entry used by per-user tag listings and stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_dreams: u64,
    pub public_dreams: u64,
    pub private_dreams: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub most_common_tags: Vec<Tag>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dream_frequency: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub profile_image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    /// Not sent by the server; filled in by the client from the request path.
    #[serde(default)]
    pub dream_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: CommentAuthor,
}

impl Comment {
    pub fn author_id(&self) -> &str {
        &self.user.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendStatus {
    Pending,
    Accepted,
    Removed,
}

/// A friendship edge as last reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRelationship {
    pub requester_id: String,
    pub recipient_id: String,
    pub status: FriendStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendSummary {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub profile_image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicDream {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicProfile {
    pub user: User,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dreams: Vec<PublicDream>,
}
