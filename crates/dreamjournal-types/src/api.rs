use serde::{Deserialize, Serialize};

use crate::models::{Comment, Dream, DreamRatings, FriendStatus, FriendSummary, User};
use crate::null_as_empty;

// -- JWT Claims --

/// Claims carried by the bearer token the server issues on login/register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    /// Expiry, unix seconds.
    pub exp: i64,
}

// -- Auth --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of a successful login or register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: User,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
}

// -- Dreams --

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDreamRequest {
    pub title: String,
    pub text: String,
    pub public: bool,
    #[serde(flatten)]
    pub ratings: DreamRatings,
}

/// Filters for `GET /api/dreams`. With neither set the server returns every entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DreamQuery {
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub public: bool,
}

impl DreamQuery {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            public: false,
        }
    }

    pub fn public_only(mut self) -> Self {
        self.public = true;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DreamIdRequest {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsBody {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestTagsRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProphecyResponse {
    pub prophecy: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiInsightsRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiInsight {
    #[serde(rename = "dreamId")]
    pub dream_id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendsDreamsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dreams: Vec<Dream>,
}

// -- Comments --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comments: Vec<Comment>,
}

// -- Profiles --

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: String,
    pub description: String,
    pub profile_image_url: String,
}

// -- Friends --

/// Body shared by the request/accept/remove friend endpoints.
/// `user_id` is the requester, `friend_id` the recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRequest {
    pub user_id: String,
    pub friend_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendStatusResponse {
    pub status: FriendStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub friends: Vec<FriendSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRequestsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub requests: Vec<FriendSummary>,
}
