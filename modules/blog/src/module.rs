use std::sync::Arc;

use blog_db::DbHandle;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::config::BlogConfig;
use crate::contract::client::{PostsApi, UsersApi};
use crate::domain::ports::PasswordHasher;
use crate::domain::post_service::PostService;
use crate::domain::user_service::UserService;
use crate::gateways::local::BlogLocalClient;
use crate::infra::password::Argon2PasswordHasher;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{SeaOrmPostsRepository, SeaOrmUsersRepository};

/// The blog module: services wired to SeaORM repositories, exposed
/// through the in-process client.
#[derive(Clone)]
pub struct Blog {
    client: Arc<BlogLocalClient>,
}

impl Blog {
    /// Create or upgrade the blog tables.
    pub async fn migrate(db: &DbHandle) -> anyhow::Result<()> {
        info!("Running blog database migrations");
        Migrator::up(db.seaorm(), None).await?;
        info!("Blog database migrations completed successfully");
        Ok(())
    }

    pub fn init(db: &DbHandle, cfg: &BlogConfig) -> anyhow::Result<Self> {
        Self::with_hasher(db.sea(), cfg, Arc::new(Argon2PasswordHasher))
    }

    /// Wire the module over an existing connection with a chosen hasher.
    pub fn with_hasher(
        conn: DatabaseConnection,
        cfg: &BlogConfig,
        hasher: Arc<dyn PasswordHasher>,
    ) -> anyhow::Result<Self> {
        info!("Initializing blog module");
        let service_config = cfg.service_config()?;
        debug!(
            "Loaded blog config: default_sort={} {}, max_title_length={}",
            service_config.default_sort.field,
            service_config.default_sort.order,
            service_config.max_title_length
        );

        let users_repo = Arc::new(SeaOrmUsersRepository::new(conn.clone()));
        let posts_repo = Arc::new(SeaOrmPostsRepository::new(conn));

        let posts = PostService::new(posts_repo, users_repo.clone(), service_config);
        let users = UserService::new(users_repo, hasher);

        Ok(Self {
            client: Arc::new(BlogLocalClient::new(Arc::new(posts), Arc::new(users))),
        })
    }

    pub fn posts_api(&self) -> Arc<dyn PostsApi> {
        self.client.clone()
    }

    pub fn users_api(&self) -> Arc<dyn UsersApi> {
        self.client.clone()
    }
}
