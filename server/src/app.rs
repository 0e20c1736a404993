//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::{ApiServer, AuthManager};
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::data::TransactionalService;
use crate::domain::seed::{self, SeedPaths};

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub database: Arc<TransactionalService>,
    pub auth: Arc<AuthManager>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::InitDb) => Self::init_db(&cli_config).await,
            Some(Commands::Seed {
                data_dir,
                users,
                movies,
                ratings,
            }) => {
                let config = AppConfig::load(&cli_config)?;
                let dir = data_dir.unwrap_or_else(|| config.seed.data_dir.clone());
                let defaults = SeedPaths::in_dir(&dir);
                let paths = SeedPaths {
                    users: users.unwrap_or(defaults.users),
                    movies: movies.unwrap_or(defaults.movies),
                    ratings: ratings.unwrap_or(defaults.ratings),
                };
                Self::seed(&config, &paths).await
            }
            Some(Commands::Start) | None => {
                let app = Self::init(&cli_config).await?;
                Self::start_server(app).await
            }
        }
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let auth = Arc::new(AuthManager::init(&config.auth)?);
        let database = Arc::new(
            TransactionalService::init(&config.database)
                .await
                .context("Failed to initialize database")?,
        );
        tracing::debug!(backend = %database.backend(), "Database initialized");

        let shutdown = ShutdownService::new(database.clone());

        Ok(Self {
            shutdown,
            config,
            database,
            auth,
        })
    }

    async fn init_db(cli: &CliConfig) -> Result<()> {
        let config = AppConfig::load(cli)?;
        let database = TransactionalService::init(&config.database)
            .await
            .context("Failed to initialize database")?;
        println!("Database ready ({})", database.backend());
        database.close().await;
        Ok(())
    }

    async fn seed(config: &AppConfig, paths: &SeedPaths) -> Result<()> {
        let database = TransactionalService::init(&config.database)
            .await
            .context("Failed to initialize database")?;

        let result = seed::run(database.repository().as_ref(), paths).await;
        database.close().await;

        let summary = result.context("Seeding failed")?;
        println!(
            "Seeded {} users, {} movies, {} ratings (next user id {})",
            summary.users, summary.movies, summary.ratings, summary.next_user_id
        );
        Ok(())
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        banner::print_banner(
            &app.config.server.host,
            app.config.server.port,
            app.database.backend(),
            app.config.auth.dev,
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }
}
