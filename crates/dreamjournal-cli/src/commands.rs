use anyhow::{Context, Result, bail};
use clap::Subcommand;
use serde::Serialize;

use dreamjournal_client::{SessionManager, validation};
use dreamjournal_types::{DreamRatings, User};
use dreamjournal_types::api::{CreateDreamRequest, DreamQuery, UpdateProfileRequest};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session locally
    Login {
        email: String,
        #[arg(long, env = "DREAMJOURNAL_PASSWORD", hide_env_values = true)]
        password: String,
        /// Page to return to after sign-in
        #[arg(long)]
        from: Option<String>,
    },
    /// Create an account and sign in
    Register {
        username: String,
        email: String,
        #[arg(long, env = "DREAMJOURNAL_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,

    /// List entries (your own unless --user or --all is given)
    Dreams {
        #[arg(long)]
        user: Option<String>,
        /// Every user's entries
        #[arg(long, conflicts_with = "user")]
        all: bool,
        /// Only public entries
        #[arg(long)]
        public: bool,
    },
    /// Show one entry
    Show { id: String },
    /// Record a new entry
    New {
        #[arg(long)]
        title: String,
        #[arg(long)]
        text: String,
        #[arg(long)]
        public: bool,
        #[command(flatten)]
        ratings: RatingArgs,
    },
    /// Delete one of your entries
    Delete { id: String },

    /// Show an entry's tags
    Tags { id: String },
    /// Add a tag to an entry
    Tag { id: String, tag: String },
    /// Replace an entry's tags
    SetTags { id: String, tags: Vec<String> },
    /// Ask the server for tag suggestions
    SuggestTags { text: String },
    /// Summarize an entry
    Summarize { id: String },
    /// Interpret an entry
    Prophecy { id: String },
    /// Summaries of recent entries
    Insights {
        #[arg(long)]
        user: Option<String>,
    },

    /// List comments on an entry
    Comments { id: String },
    /// Comment on an entry
    Comment { id: String, text: String },
    /// Delete one of your comments
    DeleteComment { id: i64 },

    /// Show your profile, or someone's public profile
    Profile { username: Option<String> },
    /// Update your profile; fields not given keep their current value
    EditProfile(ProfileEdits),
    /// Entry counts and most common tags
    Stats {
        #[arg(long)]
        user: Option<String>,
    },
    /// Tags used across a user's entries
    UserTags {
        #[arg(long)]
        user: Option<String>,
    },

    /// List accepted friends
    Friends {
        #[arg(long)]
        user: Option<String>,
    },
    /// List pending requests addressed to you
    Requests,
    /// Send a friend request
    Befriend { user_id: String },
    /// Accept a pending request
    Accept { requester_id: String },
    /// Remove a friend
    Unfriend { friend_id: String },
    /// Public entries from your friends
    Feed,
}

#[derive(clap::Args, Debug, Default)]
pub struct RatingArgs {
    #[arg(long)]
    nightmare: Option<u8>,
    #[arg(long)]
    vividness: Option<u8>,
    #[arg(long)]
    clarity: Option<u8>,
    #[arg(long)]
    emotional_intensity: Option<u8>,
}

#[derive(clap::Args, Debug, Default)]
pub struct ProfileEdits {
    #[arg(long)]
    display_name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    image_url: Option<String>,
}

impl ProfileEdits {
    /// The full update body: `current` with the given flags applied.
    fn apply(self, current: User) -> UpdateProfileRequest {
        UpdateProfileRequest {
            display_name: self.display_name.unwrap_or(current.display_name),
            description: self.description.unwrap_or(current.description),
            profile_image_url: self.image_url.unwrap_or(current.profile_image_url),
        }
    }
}

impl From<RatingArgs> for DreamRatings {
    fn from(args: RatingArgs) -> Self {
        Self {
            nightmare: args.nightmare,
            vividness: args.vividness,
            clarity: args.clarity,
            emotional_intensity: args.emotional_intensity,
        }
    }
}

pub async fn run(session: &SessionManager, command: Command) -> Result<()> {
    let api = session.api();

    match command {
        Command::Login {
            email,
            password,
            from,
        } => {
            let redirect = session.login(&email, &password, from.as_deref()).await?;
            print_json(&session.current())?;
            println!("-> {}", redirect.path);
        }
        Command::Register {
            username,
            email,
            password,
            confirm_password,
        } => {
            let confirm = confirm_password.as_deref().unwrap_or(&password);
            validation::validate_registration(&username, &email, &password, confirm)?;
            let redirect = session.register(&username, &email, &password, None).await?;
            print_json(&session.current())?;
            println!("-> {}", redirect.path);
        }
        Command::Logout => {
            let redirect = session.logout();
            println!("-> {}", redirect.path);
        }
        Command::Whoami => print_json(&session.current())?,

        Command::Dreams { user, all, public } => {
            let mut query = match (user, all) {
                (Some(user), _) => DreamQuery::for_user(user),
                (None, true) => DreamQuery::default(),
                (None, false) => DreamQuery::for_user(signed_in_id(session)?),
            };
            query.public = public;
            print_json(&api.list_dreams(&query).await?)?;
        }
        Command::Show { id } => print_json(&api.get_dream(&id).await?)?,
        Command::New {
            title,
            text,
            public,
            ratings,
        } => {
            let req = CreateDreamRequest {
                title,
                text,
                public,
                ratings: ratings.into(),
            };
            print_json(&api.create_dream(&req).await?)?;
        }
        Command::Delete { id } => api.delete_dream(&id).await?,

        Command::Tags { id } => print_json(&api.dream_tags(&id).await?)?,
        Command::Tag { id, tag } => print_json(&api.add_dream_tag(&id, &tag).await?)?,
        Command::SetTags { id, tags } => api.update_dream_tags(&id, &tags).await?,
        Command::SuggestTags { text } => print_json(&api.suggest_tags(&text).await?)?,
        Command::Summarize { id } => println!("{}", api.summarize_dream(&id).await?),
        Command::Prophecy { id } => println!("{}", api.generate_prophecy(&id).await?),
        Command::Insights { user } => {
            let user = user_or_self(session, user)?;
            print_json(&api.ai_insights(&user).await?)?;
        }

        Command::Comments { id } => print_json(&api.list_comments(&id).await?)?,
        Command::Comment { id, text } => print_json(&api.add_comment(&id, &text).await?)?,
        Command::DeleteComment { id } => api.delete_comment(id).await?,

        Command::Profile { username: None } => print_json(&api.own_profile().await?)?,
        Command::Profile {
            username: Some(username),
        } => print_json(&api.public_profile(&username).await?)?,
        Command::EditProfile(edits) => {
            let req = edits.apply(api.own_profile().await?);
            api.update_own_profile(&req).await?;
            print_json(&api.own_profile().await?)?;
        }
        Command::Stats { user } => {
            let user = user_or_self(session, user)?;
            print_json(&api.user_stats(&user).await?)?;
        }
        Command::UserTags { user } => {
            let user = user_or_self(session, user)?;
            print_json(&api.user_tags(&user).await?)?;
        }

        Command::Friends { user } => print_json(&api.list_friends(user.as_deref()).await?)?,
        Command::Requests => {
            let me = signed_in_id(session)?;
            print_json(&api.list_friend_requests(&me).await?)?;
        }
        Command::Befriend { user_id } => {
            let me = signed_in_id(session)?;
            print_json(&api.send_friend_request(&me, &user_id).await?)?;
        }
        Command::Accept { requester_id } => {
            let me = signed_in_id(session)?;
            print_json(&api.accept_friend_request(&requester_id, &me).await?)?;
        }
        Command::Unfriend { friend_id } => {
            let me = signed_in_id(session)?;
            print_json(&api.remove_friend(&me, &friend_id).await?)?;
        }
        Command::Feed => print_json(&api.friends_dreams().await?)?,
    }

    Ok(())
}

fn signed_in_id(session: &SessionManager) -> Result<String> {
    match session.current() {
        Some(s) => Ok(s.user.id),
        None => bail!("not signed in; run `dreamjournal login` first"),
    }
}

fn user_or_self(session: &SessionManager, user: Option<String>) -> Result<String> {
    match user {
        Some(user) => Ok(user),
        None => signed_in_id(session),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("encoding output")?;
    println!("{}", out);
    Ok(())
}
