use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use blog::api::dto::{DeleteResultDto, PostDto, UserDto};
use blog::client::{PostsApi, UsersApi};
use blog::model::{ListOptions, NewPost, NewUser, PostPatch, SortField, SortOrder, User};
use blog::{Blog, BlogConfig};
use blog_db::{redact_credentials_in_dsn, DbHandle};
use clap::{Args, Parser, Subcommand};
use runtime::{AppConfig, CliArgs};
use serde::Serialize;
use uuid::Uuid;

/// Blog backend admin tool
#[derive(Parser)]
#[command(name = "blogctl")]
#[command(about = "Blog backend admin tool: manage users and posts")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check configuration and database connectivity
    Check,
    /// Create or upgrade the database schema
    Migrate,
    /// Manage users
    #[command(subcommand)]
    User(UserCommand),
    /// Manage posts
    #[command(subcommand)]
    Post(PostCommand),
}

#[derive(Subcommand)]
enum UserCommand {
    /// Register a new user
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Show a user by username or id
    Show {
        #[arg(long, conflicts_with = "id", required_unless_present = "id")]
        username: Option<String>,
        #[arg(long)]
        id: Option<String>,
    },
}

/// Credentials of the acting author.
#[derive(Args)]
struct Auth {
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: String,
}

#[derive(Args)]
struct Sorting {
    /// createdAt, updatedAt or title
    #[arg(long)]
    sort_by: Option<SortField>,
    /// ascending or descending
    #[arg(long)]
    sort_order: Option<SortOrder>,
}

impl From<Sorting> for ListOptions {
    fn from(s: Sorting) -> Self {
        ListOptions {
            sort_by: s.sort_by,
            sort_order: s.sort_order,
        }
    }
}

#[derive(Subcommand)]
enum PostCommand {
    /// Create a post as the authenticated user
    Create {
        #[command(flatten)]
        auth: Auth,
        #[arg(long)]
        title: String,
        #[arg(long)]
        contents: Option<String>,
        /// Repeat for several tags; order is kept
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Print one post, or null when it does not exist
    Get { id: String },
    /// List posts, optionally filtered by author or tag
    List {
        /// Author username
        #[arg(long, conflicts_with_all = ["author_id", "tag"])]
        author: Option<String>,
        #[arg(long, conflicts_with = "tag")]
        author_id: Option<Uuid>,
        #[arg(long)]
        tag: Option<String>,
        #[command(flatten)]
        sorting: Sorting,
    },
    /// Update fields of a post owned by the authenticated user
    Update {
        id: String,
        #[command(flatten)]
        auth: Auth,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        contents: Option<String>,
        /// Remove the contents
        #[arg(long, conflicts_with = "contents")]
        clear_contents: bool,
        /// Replaces all tags when given
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Remove every tag
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,
    },
    /// Delete a post owned by the authenticated user
    Delete {
        id: String,
        #[command(flatten)]
        auth: Auth,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.home_dir));
    tracing::debug!("blogctl starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let Some(command) = cli.command else {
        return Err(anyhow!("no command given, see --help"));
    };

    let db = connect(&config).await?;
    let result = run(command, &config, &db).await;
    db.close().await;
    result
}

async fn connect(config: &AppConfig) -> Result<DbHandle> {
    let db_config = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("Database is not configured"))?;
    let dsn = db_config.resolved_url(Path::new(&config.home_dir))?;

    tracing::info!("Connecting to database: {}", redact_credentials_in_dsn(&dsn));
    let db = DbHandle::connect(&dsn, db_config.connect_opts())
        .await
        .with_context(|| format!("cannot connect to {}", redact_credentials_in_dsn(&dsn)))?;
    tracing::info!("Connected DB backend: {:?}", db.engine());
    Ok(db)
}

async fn run(command: Commands, config: &AppConfig, db: &DbHandle) -> Result<()> {
    match command {
        Commands::Check => check_config(config),
        Commands::Migrate => {
            Blog::migrate(db).await?;
            println!("Migrations applied");
            Ok(())
        }
        Commands::User(cmd) => {
            let blog = init_blog(config, db).await?;
            user_command(cmd, blog.users_api()).await
        }
        Commands::Post(cmd) => {
            let blog = init_blog(config, db).await?;
            post_command(cmd, blog.posts_api(), blog.users_api()).await
        }
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    let blog_cfg: BlogConfig = config.module_config("blog")?;
    blog_cfg.service_config()?;
    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}

/// Data commands always run against an up-to-date schema.
async fn init_blog(config: &AppConfig, db: &DbHandle) -> Result<Blog> {
    let blog_cfg: BlogConfig = config.module_config("blog")?;
    Blog::migrate(db).await?;
    Blog::init(db, &blog_cfg)
}

async fn user_command(cmd: UserCommand, users: Arc<dyn UsersApi>) -> Result<()> {
    match cmd {
        UserCommand::Create { username, password } => {
            let user = users.create_user(NewUser { username, password }).await?;
            print_json(&UserDto::from(user))
        }
        UserCommand::Show { username, id } => {
            let found = match (username, id) {
                (Some(name), _) => users.get_user_by_username(&name).await?,
                (None, Some(id)) => users.get_user_by_id(&id).await?,
                (None, None) => return Err(anyhow!("--username or --id is required")),
            };
            print_json(&found.map(UserDto::from))
        }
    }
}

async fn authenticate(users: &dyn UsersApi, auth: &Auth) -> Result<User> {
    users
        .verify_credentials(&auth.username, &auth.password)
        .await?
        .ok_or_else(|| anyhow!("invalid username or password"))
}

async fn post_command(
    cmd: PostCommand,
    posts: Arc<dyn PostsApi>,
    users: Arc<dyn UsersApi>,
) -> Result<()> {
    match cmd {
        PostCommand::Create {
            auth,
            title,
            contents,
            tags,
        } => {
            let author = authenticate(users.as_ref(), &auth).await?;
            let post = posts
                .create_post(
                    author.id,
                    NewPost {
                        title,
                        contents,
                        tags,
                    },
                )
                .await?;
            print_json(&PostDto::from(post))
        }
        PostCommand::Get { id } => {
            let post = posts.get_post_by_id(&id).await?;
            print_json(&post.map(PostDto::from))
        }
        PostCommand::List {
            author,
            author_id,
            tag,
            sorting,
        } => {
            let options = ListOptions::from(sorting);
            let found = match (author, author_id, tag) {
                (Some(username), _, _) => {
                    posts.list_posts_by_author_username(&username, options).await?
                }
                (None, Some(id), _) => posts.list_posts_by_author(id, options).await?,
                (None, None, Some(tag)) => posts.list_posts_by_tag(&tag, options).await?,
                (None, None, None) => posts.list_all_posts(options).await?,
            };
            let dtos: Vec<PostDto> = found.into_iter().map(PostDto::from).collect();
            print_json(&dtos)
        }
        PostCommand::Update {
            id,
            auth,
            title,
            contents,
            clear_contents,
            tags,
            clear_tags,
        } => {
            let author = authenticate(users.as_ref(), &auth).await?;
            let tags = if clear_tags {
                Some(Vec::new())
            } else if tags.is_empty() {
                None
            } else {
                Some(tags)
            };
            let contents = if clear_contents {
                Some(None)
            } else {
                contents.map(Some)
            };
            let patch = PostPatch {
                title,
                contents,
                tags,
            };
            let updated = posts.update_post(&id, author.id, patch).await?;
            print_json(&updated.map(PostDto::from))
        }
        PostCommand::Delete { id, auth } => {
            let author = authenticate(users.as_ref(), &auth).await?;
            let result = posts.delete_post(&id, author.id).await?;
            print_json(&DeleteResultDto::from(result))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
