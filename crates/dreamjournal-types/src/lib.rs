pub mod api;
pub mod models;

pub use models::{
    Comment, CommentAuthor, Dream, DreamRatings, FriendRelationship, FriendStatus, FriendSummary,
    PublicDream, PublicProfile, Stats, Tag, User, Visibility,
};

use serde::{Deserialize, Deserializer};

/// The server encodes empty lists as `null`; read those as an empty `Vec`.
pub fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
