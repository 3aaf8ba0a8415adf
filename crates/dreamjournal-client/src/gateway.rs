use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use dreamjournal_store::Storage;
use dreamjournal_types::api::{
    AiInsight, AiInsightsRequest, AuthResponse, CommentsResponse, CreateCommentRequest,
    CreateDreamRequest, DreamIdRequest, DreamQuery, FriendRequest, FriendRequestsResponse,
    FriendStatusResponse, FriendsDreamsResponse, FriendsResponse, LoginRequest, MeResponse,
    ProphecyResponse, RegisterRequest, SuggestTagsRequest, SummaryResponse, TagsBody,
    UpdateProfileRequest,
};
use dreamjournal_types::{
    Comment, Dream, FriendRelationship, FriendSummary, PublicProfile, Stats, Tag, User,
    null_as_empty,
};

use crate::error::{ClientError, Result};
use crate::validation;

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the JSON-serialized user record.
pub const USER_KEY: &str = "user";

/// Stateless typed wrapper over the REST API.
///
/// The bearer token is read from storage on every call, so whatever the
/// session layer last persisted is what goes out.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    storage: Arc<dyn Storage>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, storage: Arc<dyn Storage>) -> Self {
        Self::with_http_client(Client::new(), base_url, storage)
    }

    pub fn with_http_client(
        http: Client,
        base_url: impl Into<String>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            storage,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -- Auth --

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse> {
        self.fetch(self.request(Method::POST, &["api", "login"])?.json(req)).await
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse> {
        self.fetch(self.request(Method::POST, &["api", "register"])?.json(req)).await
    }

    pub async fn me(&self) -> Result<MeResponse> {
        self.fetch(self.request(Method::GET, &["api", "me"])?).await
    }

    // -- Dreams --

    pub async fn list_dreams(&self, query: &DreamQuery) -> Result<Vec<Dream>> {
        let req = self.request(Method::GET, &["api", "dreams"])?.query(query);
        self.fetch_list(req).await
    }

    pub async fn create_dream(&self, req: &CreateDreamRequest) -> Result<Dream> {
        validation::validate_dream(req)?;
        self.fetch(self.request(Method::POST, &["api", "dreams"])?.json(req)).await
    }

    pub async fn get_dream(&self, id: &str) -> Result<Dream> {
        self.fetch(self.request(Method::GET, &["api", "dreams", id])?).await
    }

    pub async fn delete_dream(&self, id: &str) -> Result<()> {
        self.execute(self.request(Method::DELETE, &["api", "dreams", id])?).await
    }

    // -- Tags --

    pub async fn dream_tags(&self, id: &str) -> Result<Vec<String>> {
        let body: TagsBody =
            self.fetch(self.request(Method::GET, &["api", "dreams", id, "tags"])?).await?;
        Ok(body.tags)
    }

    /// Replaces the entry's tags. The list is trimmed and checked for
    /// duplicates and the word limit before sending.
    pub async fn update_dream_tags(&self, id: &str, tags: &[String]) -> Result<()> {
        let tags = validation::validate_tags(tags)?;
        let req = self
            .request(Method::PUT, &["api", "dreams", id, "tags"])?
            .json(&TagsBody { tags });
        self.execute(req).await
    }

    /// Fetches the entry's current tags, appends one, and writes the list back.
    pub async fn add_dream_tag(&self, id: &str, tag: &str) -> Result<Vec<String>> {
        let existing = self.dream_tags(id).await?;
        let tags = validation::add_tag(&existing, tag)?;
        self.update_dream_tags(id, &tags).await?;
        Ok(tags)
    }

    /// AI tag suggestions for free text. Nothing is stored server-side.
    pub async fn suggest_tags(&self, text: &str) -> Result<Vec<String>> {
        let req = self.request(Method::POST, &["api", "dreams", "tags"])?.json(&SuggestTagsRequest {
            text: text.to_string(),
        });
        let body: TagsBody = self.fetch(req).await?;
        Ok(body.tags)
    }

    // -- AI text --

    pub async fn summarize_dream(&self, id: &str) -> Result<String> {
        let req = self
            .request(Method::POST, &["api", "dreams", "summary"])?
            .json(&DreamIdRequest { id: id.to_string() });
        let body: SummaryResponse = self.fetch(req).await?;
        Ok(body.summary)
    }

    pub async fn generate_prophecy(&self, id: &str) -> Result<String> {
        let req = self
            .request(Method::POST, &["api", "dreams", "prophecy"])?
            .json(&DreamIdRequest { id: id.to_string() });
        let body: ProphecyResponse = self.fetch(req).await?;
        Ok(body.prophecy)
    }

    pub async fn ai_insights(&self, user_id: &str) -> Result<Vec<AiInsight>> {
        let req = self.request(Method::POST, &["api", "ai-insights"])?.json(&AiInsightsRequest {
            user_id: user_id.to_string(),
        });
        self.fetch_list(req).await
    }

    // -- Comments --

    pub async fn list_comments(&self, dream_id: &str) -> Result<Vec<Comment>> {
        let body: CommentsResponse = self
            .fetch(self.request(Method::GET, &["api", "dreams", dream_id, "comments"])?)
            .await?;
        Ok(body
            .comments
            .into_iter()
            .map(|c| stamp_dream_id(c, dream_id))
            .collect())
    }

    pub async fn add_comment(&self, dream_id: &str, text: &str) -> Result<Comment> {
        validation::validate_comment(text)?;
        let req = self
            .request(Method::POST, &["api", "dreams", dream_id, "comments"])?
            .json(&CreateCommentRequest {
                text: text.to_string(),
            });
        let comment: Comment = self.fetch(req).await?;
        Ok(stamp_dream_id(comment, dream_id))
    }

    pub async fn delete_comment(&self, comment_id: i64) -> Result<()> {
        let id = comment_id.to_string();
        self.execute(self.request(Method::DELETE, &["api", "comments", id.as_str()])?)
            .await
    }

    // -- Profiles --

    pub async fn own_profile(&self) -> Result<User> {
        self.fetch(self.request(Method::GET, &["api", "users", "me", "profile"])?).await
    }

    pub async fn update_own_profile(&self, req: &UpdateProfileRequest) -> Result<()> {
        validation::validate_profile(req)?;
        self.execute(self.request(Method::PUT, &["api", "users", "me", "profile"])?.json(req)).await
    }

    pub async fn public_profile(&self, username: &str) -> Result<PublicProfile> {
        self.fetch(self.request(Method::GET, &["api", "users", username, "public"])?)
            .await
    }

    pub async fn user_stats(&self, user_id: &str) -> Result<Stats> {
        self.fetch(self.request(Method::GET, &["api", "users", user_id, "stats"])?)
            .await
    }

    pub async fn user_tags(&self, user_id: &str) -> Result<Vec<Tag>> {
        self.fetch_list(self.request(Method::GET, &["api", "users", user_id, "tags"])?)
            .await
    }

    // -- Friends --

    pub async fn send_friend_request(
        &self,
        requester_id: &str,
        recipient_id: &str,
    ) -> Result<FriendRelationship> {
        self.friend_action("request", requester_id, recipient_id)
            .await
    }

    pub async fn accept_friend_request(
        &self,
        requester_id: &str,
        recipient_id: &str,
    ) -> Result<FriendRelationship> {
        self.friend_action("accept", requester_id, recipient_id)
            .await
    }

    pub async fn remove_friend(&self, user_id: &str, friend_id: &str) -> Result<FriendRelationship> {
        self.friend_action("remove", user_id, friend_id).await
    }

    /// Accepted friends of `user_id`, or of the token's owner when `None`.
    pub async fn list_friends(&self, user_id: Option<&str>) -> Result<Vec<FriendSummary>> {
        let mut req = self.request(Method::GET, &["api", "friends"])?;
        if let Some(user_id) = user_id {
            req = req.query(&[("user_id", user_id)]);
        }
        let body: FriendsResponse = self.fetch(req).await?;
        Ok(body.friends)
    }

    /// Users with a pending request addressed to `user_id`.
    pub async fn list_friend_requests(&self, user_id: &str) -> Result<Vec<FriendSummary>> {
        let req = self
            .request(Method::GET, &["api", "friends"])?
            .query(&[("pending_for", user_id)]);
        let body: FriendRequestsResponse = self.fetch(req).await?;
        Ok(body.requests)
    }

    /// Public entries of the token owner's accepted friends, newest first.
    pub async fn friends_dreams(&self) -> Result<Vec<Dream>> {
        let body: FriendsDreamsResponse =
            self.fetch(self.request(Method::GET, &["api", "friends", "dreams"])?).await?;
        Ok(body.dreams)
    }

    async fn friend_action(
        &self,
        action: &str,
        user_id: &str,
        friend_id: &str,
    ) -> Result<FriendRelationship> {
        let req = self.request(Method::POST, &["api", "friends", action])?.json(&FriendRequest {
            user_id: user_id.to_string(),
            friend_id: friend_id.to_string(),
        });
        let body: FriendStatusResponse = self.fetch(req).await?;
        Ok(FriendRelationship {
            requester_id: user_id.to_string(),
            recipient_id: friend_id.to_string(),
            status: body.status,
        })
    }

    // -- Plumbing --

    /// Builds a request and attaches the stored bearer token, if any.
    ///
    /// Each segment is percent-encoded on its own, so ids and usernames can
    /// never add path components or start a query.
    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.url(segments)?;
        debug!("{} {}", method, url);

        let builder = self.http.request(method, url);
        match self.storage.get(TOKEN_KEY)? {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Ok(builder),
        }
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let invalid = |reason: String| ClientError::InvalidUrl {
            url: self.base_url.clone(),
            reason,
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let body = body.trim().to_string();
            warn!("Request failed ({}): {}", status, body);
            return Err(ClientError::Status { status, body });
        }
        Ok(resp)
    }

    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let bytes = self.send(req).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Like `fetch`, but a `null` body decodes as an empty list.
    async fn fetch_list<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<Vec<T>> {
        let bytes = self.send(req).await?.bytes().await?;
        let mut de = serde_json::Deserializer::from_slice(&bytes);
        let list = null_as_empty(&mut de)?;
        de.end()?;
        Ok(list)
    }

    async fn execute(&self, req: RequestBuilder) -> Result<()> {
        self.send(req).await?;
        Ok(())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn stamp_dream_id(mut comment: Comment, dream_id: &str) -> Comment {
    if comment.dream_id.is_empty() {
        comment.dream_id = dream_id.to_string();
    }
    comment
}
