//! In-process stand-in for the journal server.
//!
//! Speaks the same JSON shapes and status codes as the real API, issues real
//! HS256 tokens, and records the `Authorization` header of every request so
//! tests can assert what the client sent.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{FromRequestParts, Path, Query, Request, State},
    http::{HeaderMap, StatusCode, header, request::Parts},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::Deserialize;

use dreamjournal_client::SessionManager;
use dreamjournal_store::MemoryStorage;
use dreamjournal_types::api::{
    AiInsight, AiInsightsRequest, AuthResponse, Claims, CommentsResponse, CreateCommentRequest,
    CreateDreamRequest, DreamIdRequest, DreamQuery, FriendRequest, FriendRequestsResponse,
    FriendStatusResponse, FriendsDreamsResponse, FriendsResponse, LoginRequest, MeResponse,
    ProphecyResponse, RegisterRequest, SuggestTagsRequest, SummaryResponse, TagsBody,
    UpdateProfileRequest,
};
use dreamjournal_types::{
    Comment, CommentAuthor, Dream, FriendStatus, FriendSummary, PublicDream, PublicProfile,
    Stats, Tag, User,
};

const JWT_SECRET: &str = "test-secret";

type ApiError = (StatusCode, &'static str);

#[derive(Debug, Clone)]
struct UserRecord {
    user: User,
    password: String,
}

#[derive(Debug, Clone)]
struct Friendship {
    user_id: String,
    friend_id: String,
    status: FriendStatus,
}

#[derive(Debug, Default)]
pub struct Inner {
    users: Vec<UserRecord>,
    dreams: Vec<Dream>,
    comments: Vec<Comment>,
    friends: Vec<Friendship>,
    next_comment_id: i64,
    /// `(path, Authorization header)` for every request, in arrival order.
    pub seen: Vec<(String, Option<String>)>,
    /// When set, `/api/me` answers with this status.
    pub me_status: Option<StatusCode>,
}

#[derive(Clone, Default)]
pub struct FakeState {
    pub inner: Arc<Mutex<Inner>>,
}

impl FakeState {
    /// Authorization header sent with the most recent request to `path`.
    pub fn last_auth_for(&self, path: &str) -> Option<Option<String>> {
        let inner = self.inner.lock().unwrap();
        inner
            .seen
            .iter()
            .rev()
            .find(|(p, _)| p == path)
            .map(|(_, auth)| auth.clone())
    }

    pub fn request_count(&self, path: &str) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.seen.iter().filter(|(p, _)| p == path).count()
    }

    pub fn fail_me_with(&self, status: StatusCode) {
        self.inner.lock().unwrap().me_status = Some(status);
    }

    pub fn dream_tags(&self, id: &str) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner
            .dreams
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.tags.clone())
            .unwrap_or_default()
    }
}

pub struct TestServer {
    pub url: String,
    pub state: FakeState,
}

impl TestServer {
    /// A session manager pointed at this server with fresh in-memory storage.
    pub fn session(&self) -> (SessionManager, MemoryStorage) {
        let storage = MemoryStorage::new();
        let manager = SessionManager::new(&self.url, Arc::new(storage.clone()));
        (manager, storage)
    }

    /// Registers a user directly and returns a session logged in as them.
    pub async fn signed_in(&self, username: &str) -> (SessionManager, MemoryStorage) {
        let (manager, storage) = self.session();
        manager
            .register(username, &format!("{}@example.com", username), "correct-horse", None)
            .await
            .expect("register");
        (manager, storage)
    }
}

pub async fn spawn() -> TestServer {
    let state = FakeState::default();
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        url: format!("http://{}", addr),
        state,
    }
}

fn router(state: FakeState) -> Router {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/me", get(me))
        .route("/api/dreams", get(list_dreams).post(create_dream))
        .route("/api/dreams/tags", post(suggest_tags))
        .route("/api/dreams/summary", post(summarize))
        .route("/api/dreams/prophecy", post(prophecy))
        .route("/api/dreams/{id}", get(get_dream).delete(delete_dream))
        .route("/api/dreams/{id}/tags", get(get_tags).put(put_tags))
        .route("/api/dreams/{id}/comments", get(list_comments).post(add_comment))
        .route("/api/comments/{id}", delete(delete_comment))
        .route("/api/ai-insights", post(ai_insights))
        .route("/api/users/me/profile", get(own_profile).put(update_profile))
        .route("/api/users/{user}/public", get(public_profile))
        .route("/api/users/{user}/stats", get(stats))
        .route("/api/users/{user}/tags", get(user_tags))
        .route("/api/friends", get(list_friends))
        .route("/api/friends/request", post(friend_request))
        .route("/api/friends/accept", post(friend_accept))
        .route("/api/friends/remove", post(friend_remove))
        .route("/api/friends/dreams", get(friends_dreams))
        .layer(middleware::from_fn_with_state(state.clone(), record_auth))
        .with_state(state)
}

async fn record_auth(State(state): State<FakeState>, req: Request, next: Next) -> Response {
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state
        .inner
        .lock()
        .unwrap()
        .seen
        .push((req.uri().path().to_string(), auth));
    next.run(req).await
}

// -- Auth --

/// Caller identity taken from a valid `Authorization: Bearer` header.
struct AuthUser(String);

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_user(&parts.headers).map(AuthUser)
    }
}

fn bearer_user(headers: &HeaderMap) -> Result<String, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or((StatusCode::UNAUTHORIZED, "missing Authorization header"))?;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(JWT_SECRET.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| (StatusCode::UNAUTHORIZED, "invalid token"))?;

    Ok(data.claims.user_id)
}

/// Issues a token for `user_id` that expires in 24 hours.
pub fn issue_token(user_id: &str) -> String {
    issue_token_expiring(user_id, Duration::hours(24))
}

pub fn issue_token_expiring(user_id: &str, ttl: Duration) -> String {
    let claims = Claims {
        user_id: user_id.to_string(),
        exp: (Utc::now() + ttl).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

async fn register(
    State(state): State<FakeState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.email.is_empty() || req.username.is_empty() || req.password.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Missing required fields"));
    }

    let mut inner = state.inner.lock().unwrap();
    if inner.users.iter().any(|u| u.user.email == req.email) {
        return Err((StatusCode::CONFLICT, "User already exists"));
    }

    let user = User {
        id: (inner.users.len() + 1).to_string(),
        email: req.email,
        username: req.username,
        display_name: String::new(),
        description: String::new(),
        profile_image_url: String::new(),
        created_at: Utc::now().timestamp(),
    };
    inner.users.push(UserRecord {
        user: user.clone(),
        password: req.password,
    });

    let token = issue_token(&user.id);
    Ok(Json(AuthResponse { user, token }))
}

async fn login(
    State(state): State<FakeState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let inner = state.inner.lock().unwrap();
    let record = inner
        .users
        .iter()
        .find(|u| u.user.email == req.email && u.password == req.password)
        .ok_or((StatusCode::UNAUTHORIZED, "Invalid credentials"))?;

    let user = record.user.clone();
    let token = issue_token(&user.id);
    Ok(Json(AuthResponse { user, token }))
}

async fn me(
    State(state): State<FakeState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let inner = state.inner.lock().unwrap();
    if let Some(status) = inner.me_status {
        return Err((status, "unavailable"));
    }
    let user = find_user(&inner, &user_id)?;
    Ok(Json(MeResponse {
        user,
        is_admin: false,
    }))
}

fn find_user(inner: &Inner, user_id: &str) -> Result<User, ApiError> {
    inner
        .users
        .iter()
        .find(|u| u.user.id == user_id)
        .map(|u| u.user.clone())
        .ok_or((StatusCode::NOT_FOUND, "User not found"))
}

// -- Dreams --

async fn list_dreams(
    State(state): State<FakeState>,
    Query(query): Query<DreamQuery>,
) -> Json<Option<Vec<Dream>>> {
    let inner = state.inner.lock().unwrap();
    let dreams: Vec<Dream> = inner
        .dreams
        .iter()
        .filter(|d| query.user_id.as_ref().is_none_or(|uid| d.user_id == *uid))
        .filter(|d| !query.public || d.public)
        .cloned()
        .collect();

    // The real server encodes an empty result as `null`.
    if dreams.is_empty() { Json(None) } else { Json(Some(dreams)) }
}

async fn create_dream(
    State(state): State<FakeState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<CreateDreamRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.ratings.iter().any(|(_, v)| !(1..=10).contains(&v)) {
        return Err((StatusCode::BAD_REQUEST, "All ratings must be between 1 and 10"));
    }

    let mut inner = state.inner.lock().unwrap();
    let author = find_user(&inner, &user_id)?;
    let now = Utc::now();
    let dream = Dream {
        id: shortcode(),
        user_id,
        username: author.username,
        display_name: author.display_name,
        profile_image_url: author.profile_image_url,
        title: req.title,
        text: req.text,
        public: req.public,
        created_at: now,
        updated_at: now,
        tags: vec![],
        ratings: req.ratings,
    };
    inner.dreams.push(dream.clone());
    Ok(Json(dream))
}

fn shortcode() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect()
}

async fn get_dream(
    State(state): State<FakeState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let inner = state.inner.lock().unwrap();
    inner
        .dreams
        .iter()
        .find(|d| d.id == id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Dream not found"))
}

fn owned_dream_index(inner: &Inner, id: &str, user_id: &str) -> Result<usize, ApiError> {
    let idx = inner
        .dreams
        .iter()
        .position(|d| d.id == id)
        .ok_or((StatusCode::NOT_FOUND, "Dream not found"))?;
    if inner.dreams[idx].user_id != user_id {
        return Err((StatusCode::FORBIDDEN, "Forbidden: not your dream"));
    }
    Ok(idx)
}

async fn delete_dream(
    State(state): State<FakeState>,
    Path(id): Path<String>,
    AuthUser(user_id): AuthUser,
) -> Result<StatusCode, ApiError> {
    let mut inner = state.inner.lock().unwrap();
    let idx = owned_dream_index(&inner, &id, &user_id)?;
    inner.dreams.remove(idx);
    inner.comments.retain(|c| c.dream_id != id);
    Ok(StatusCode::NO_CONTENT)
}

async fn get_tags(
    State(state): State<FakeState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let inner = state.inner.lock().unwrap();
    let dream = inner
        .dreams
        .iter()
        .find(|d| d.id == id)
        .ok_or((StatusCode::NOT_FOUND, "Dream not found"))?;
    Ok(Json(TagsBody {
        tags: dream.tags.clone(),
    }))
}

async fn put_tags(
    State(state): State<FakeState>,
    Path(id): Path<String>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<TagsBody>,
) -> Result<StatusCode, ApiError> {
    let mut inner = state.inner.lock().unwrap();
    let idx = owned_dream_index(&inner, &id, &user_id)?;
    inner.dreams[idx].tags = body
        .tags
        .into_iter()
        .filter(|t| !t.trim().is_empty())
        .collect();
    Ok(StatusCode::NO_CONTENT)
}

async fn suggest_tags(Json(req): Json<SuggestTagsRequest>) -> Json<TagsBody> {
    let mut tags: Vec<String> = Vec::new();
    for word in req.text.split_whitespace() {
        let word = word
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if word.len() > 4 && !tags.contains(&word) {
            tags.push(word);
        }
        if tags.len() == 3 {
            break;
        }
    }
    Json(TagsBody { tags })
}

fn dream_text(inner: &Inner, id: &str) -> Result<String, ApiError> {
    inner
        .dreams
        .iter()
        .find(|d| d.id == id)
        .map(|d| d.text.clone())
        .ok_or((StatusCode::NOT_FOUND, "Dream not found"))
}

async fn summarize(
    State(state): State<FakeState>,
    Json(req): Json<DreamIdRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let text = dream_text(&state.inner.lock().unwrap(), &req.id)?;
    let first = text.split('.').next().unwrap_or_default().trim().to_string();
    Ok(Json(SummaryResponse {
        summary: format!("{}.", first),
    }))
}

async fn prophecy(
    State(state): State<FakeState>,
    Json(req): Json<DreamIdRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let text = dream_text(&state.inner.lock().unwrap(), &req.id)?;
    Ok(Json(ProphecyResponse {
        prophecy: format!("This dream means you are thinking about {} things.", text.len()),
    }))
}

async fn ai_insights(
    State(state): State<FakeState>,
    Json(req): Json<AiInsightsRequest>,
) -> Result<Json<Option<Vec<AiInsight>>>, ApiError> {
    if req.user_id.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Missing userId"));
    }
    let inner = state.inner.lock().unwrap();
    let insights: Vec<AiInsight> = inner
        .dreams
        .iter()
        .rev()
        .filter(|d| d.user_id == req.user_id)
        .take(5)
        .map(|d| AiInsight {
            dream_id: d.id.clone(),
            summary: d.text.clone(),
            tags: d.tags.clone(),
        })
        .collect();
    Ok(Json(if insights.is_empty() { None } else { Some(insights) }))
}

// -- Comments --

async fn list_comments(
    State(state): State<FakeState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let inner = state.inner.lock().unwrap();
    if !inner.dreams.iter().any(|d| d.id == id) {
        return Err((StatusCode::NOT_FOUND, "Dream not found"));
    }
    let comments = inner
        .comments
        .iter()
        .filter(|c| c.dream_id == id)
        .cloned()
        .map(|mut c| {
            // The wire shape has no dream id.
            c.dream_id = String::new();
            c
        })
        .collect();
    Ok(Json(CommentsResponse { comments }))
}

async fn add_comment(
    State(state): State<FakeState>,
    Path(id): Path<String>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut inner = state.inner.lock().unwrap();
    if !inner.dreams.iter().any(|d| d.id == id) {
        return Err((StatusCode::NOT_FOUND, "Dream not found"));
    }
    if req.text.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Invalid comment text"));
    }

    let author = find_user(&inner, &user_id)?;
    inner.next_comment_id += 1;
    let now = Utc::now();
    let comment = Comment {
        id: inner.next_comment_id,
        dream_id: id,
        text: req.text,
        created_at: now,
        updated_at: now,
        user: CommentAuthor {
            id: author.id,
            username: author.username,
            display_name: author.display_name,
            profile_image_url: author.profile_image_url,
        },
    };
    inner.comments.push(comment.clone());

    let mut wire = comment;
    wire.dream_id = String::new();
    Ok((StatusCode::CREATED, Json(wire)))
}

async fn delete_comment(
    State(state): State<FakeState>,
    Path(id): Path<i64>,
    AuthUser(user_id): AuthUser,
) -> Result<StatusCode, ApiError> {
    let mut inner = state.inner.lock().unwrap();
    let idx = inner
        .comments
        .iter()
        .position(|c| c.id == id)
        .ok_or((StatusCode::NOT_FOUND, "Comment not found"))?;
    if inner.comments[idx].user.id != user_id {
        return Err((StatusCode::FORBIDDEN, "Forbidden"));
    }
    inner.comments.remove(idx);
    Ok(StatusCode::NO_CONTENT)
}

// -- Profiles --

async fn own_profile(
    State(state): State<FakeState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let inner = state.inner.lock().unwrap();
    Ok(Json(find_user(&inner, &user_id)?))
}

async fn update_profile(
    State(state): State<FakeState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<StatusCode, ApiError> {
    let mut inner = state.inner.lock().unwrap();
    let record = inner
        .users
        .iter_mut()
        .find(|u| u.user.id == user_id)
        .ok_or((StatusCode::NOT_FOUND, "User not found"))?;
    record.user.display_name = req.display_name;
    record.user.description = req.description;
    record.user.profile_image_url = req.profile_image_url;
    Ok(StatusCode::NO_CONTENT)
}

async fn public_profile(
    State(state): State<FakeState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let inner = state.inner.lock().unwrap();
    let mut user = inner
        .users
        .iter()
        .find(|u| u.user.username == username)
        .map(|u| u.user.clone())
        .ok_or((StatusCode::NOT_FOUND, "User not found"))?;
    user.email = String::new();

    let dreams = inner
        .dreams
        .iter()
        .filter(|d| d.user_id == user.id && d.public)
        .map(|d| PublicDream {
            id: d.id.clone(),
            title: d.title.clone(),
            text: d.text.clone(),
            created_at: d.created_at,
        })
        .collect();
    Ok(Json(PublicProfile { user, dreams }))
}

fn tag_counts(inner: &Inner, user_id: &str) -> Vec<Tag> {
    let mut counts: Vec<(String, u64)> = Vec::new();
    for tag in inner
        .dreams
        .iter()
        .filter(|d| d.user_id == user_id)
        .flat_map(|d| d.tags.iter())
    {
        match counts.iter_mut().find(|(name, _)| name == tag) {
            Some((_, n)) => *n += 1,
            None => counts.push((tag.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
        .into_iter()
        .map(|(name, count)| Tag {
            id: name.clone(),
            name,
            count: Some(count),
        })
        .collect()
}

async fn stats(State(state): State<FakeState>, Path(user_id): Path<String>) -> Json<Stats> {
    let inner = state.inner.lock().unwrap();
    let mine: Vec<&Dream> = inner.dreams.iter().filter(|d| d.user_id == user_id).collect();
    let public = mine.iter().filter(|d| d.public).count() as u64;
    Json(Stats {
        total_dreams: mine.len() as u64,
        public_dreams: public,
        private_dreams: mine.len() as u64 - public,
        most_common_tags: tag_counts(&inner, &user_id),
        dream_frequency: vec![mine.len() as u32],
    })
}

async fn user_tags(State(state): State<FakeState>, Path(user_id): Path<String>) -> Json<Vec<Tag>> {
    let inner = state.inner.lock().unwrap();
    Json(tag_counts(&inner, &user_id))
}

// -- Friends --

fn summary(user: &User) -> FriendSummary {
    FriendSummary {
        id: user.id.clone(),
        username: user.username.clone(),
        display_name: user.display_name.clone(),
        profile_image_url: user.profile_image_url.clone(),
    }
}

async fn friend_request(
    State(state): State<FakeState>,
    AuthUser(caller): AuthUser,
    Json(req): Json<FriendRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.user_id != caller {
        return Err((StatusCode::FORBIDDEN, "Forbidden"));
    }
    let mut inner = state.inner.lock().unwrap();
    if let Some(existing) = inner
        .friends
        .iter()
        .find(|f| f.user_id == req.user_id && f.friend_id == req.friend_id)
    {
        return Ok(Json(FriendStatusResponse {
            status: existing.status,
        }));
    }
    inner.friends.push(Friendship {
        user_id: req.user_id,
        friend_id: req.friend_id,
        status: FriendStatus::Pending,
    });
    Ok(Json(FriendStatusResponse {
        status: FriendStatus::Pending,
    }))
}

async fn friend_accept(
    State(state): State<FakeState>,
    AuthUser(caller): AuthUser,
    Json(req): Json<FriendRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.friend_id != caller {
        return Err((StatusCode::FORBIDDEN, "Forbidden"));
    }
    let mut inner = state.inner.lock().unwrap();
    for f in inner.friends.iter_mut() {
        if f.user_id == req.user_id && f.friend_id == req.friend_id {
            f.status = FriendStatus::Accepted;
        }
    }
    let reciprocal = inner
        .friends
        .iter()
        .any(|f| f.user_id == req.friend_id && f.friend_id == req.user_id);
    if reciprocal {
        for f in inner.friends.iter_mut() {
            if f.user_id == req.friend_id && f.friend_id == req.user_id {
                f.status = FriendStatus::Accepted;
            }
        }
    } else {
        inner.friends.push(Friendship {
            user_id: req.friend_id,
            friend_id: req.user_id,
            status: FriendStatus::Accepted,
        });
    }
    Ok(Json(FriendStatusResponse {
        status: FriendStatus::Accepted,
    }))
}

async fn friend_remove(
    State(state): State<FakeState>,
    AuthUser(caller): AuthUser,
    Json(req): Json<FriendRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.user_id != caller && req.friend_id != caller {
        return Err((StatusCode::FORBIDDEN, "Forbidden"));
    }
    let mut inner = state.inner.lock().unwrap();
    inner.friends.retain(|f| {
        !((f.user_id == req.user_id && f.friend_id == req.friend_id)
            || (f.user_id == req.friend_id && f.friend_id == req.user_id))
    });
    Ok(Json(FriendStatusResponse {
        status: FriendStatus::Removed,
    }))
}

#[derive(Debug, Deserialize)]
struct FriendsQuery {
    user_id: Option<String>,
    pending_for: Option<String>,
}

async fn list_friends(
    State(state): State<FakeState>,
    Query(query): Query<FriendsQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let inner = state.inner.lock().unwrap();

    if let Some(pending_for) = query.pending_for {
        let requests = inner
            .friends
            .iter()
            .filter(|f| f.friend_id == pending_for && f.status == FriendStatus::Pending)
            .filter_map(|f| find_user(&inner, &f.user_id).ok())
            .map(|u| summary(&u))
            .collect();
        return Ok(Json(FriendRequestsResponse { requests }).into_response());
    }

    let user_id = match query.user_id {
        Some(user_id) => user_id,
        None => bearer_user(&headers)?,
    };
    let friends = accepted_friend_ids(&inner, &user_id)
        .iter()
        .filter_map(|id| find_user(&inner, id).ok())
        .map(|u| summary(&u))
        .collect();
    Ok(Json(FriendsResponse { friends }).into_response())
}

fn accepted_friend_ids(inner: &Inner, user_id: &str) -> Vec<String> {
    inner
        .friends
        .iter()
        .filter(|f| f.user_id == user_id && f.status == FriendStatus::Accepted)
        .map(|f| f.friend_id.clone())
        .collect()
}

async fn friends_dreams(
    State(state): State<FakeState>,
    AuthUser(caller): AuthUser,
) -> Json<FriendsDreamsResponse> {
    let inner = state.inner.lock().unwrap();
    let friend_ids = accepted_friend_ids(&inner, &caller);
    let mut dreams: Vec<Dream> = inner
        .dreams
        .iter()
        .filter(|d| d.public && friend_ids.contains(&d.user_id))
        .cloned()
        .collect();
    dreams.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Json(FriendsDreamsResponse { dreams })
}
