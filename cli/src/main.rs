use adminhub::Config;
use adminhub::auth::{decrypt_payment_url, encrypt_payment_url, hash_password};
use adminhub::error::{AppError, AppResult};
use adminhub::model::entity::{UserEntity, UserEntityCreateUpdate};
use adminhub::model::{CrudRepository, DbConnection, ModelManager};
use adminhub::validation::Validate;
use adminhub::web::dto::users::UserCreateBody;
use adminhub::web::{AccountStatus, AuthenticatedUser, UserRole};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(about = "Operator tool for the adminhub database", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage console accounts
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Encrypt or decrypt payment URLs with the configured key
    Crypt {
        #[command(subcommand)]
        action: CryptCommands,
    },
}

/// Account management
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    Add {
        #[arg(long)]
        email: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        password: String,
        /// Repeat for several roles
        #[arg(long = "role", default_value = "user")]
        roles: Vec<UserRole>,
    },
    SetRoles {
        #[arg(long)]
        email: String,
        #[arg(long = "role", required = true)]
        roles: Vec<UserRole>,
    },
    Deactivate {
        #[arg(long)]
        email: String,
    },
    Activate {
        #[arg(long)]
        email: String,
    },
}

/// Payment URL tokens
#[derive(Subcommand, Debug)]
pub enum CryptCommands {
    EncryptUrl {
        #[arg(long)]
        url: String,
        /// Overrides `app.encryption_key`
        #[arg(long)]
        key: Option<String>,
    },
    DecryptUrl {
        #[arg(long)]
        token: String,
        /// Overrides `app.encryption_key`
        #[arg(long)]
        key: Option<String>,
    },
}

async fn connect() -> AppResult<ModelManager> {
    let config = Config::get_or_init(cfg!(debug_assertions)).await;
    let app = config.app();
    let db_con = DbConnection::connect(app.database_uri(), app.max_connections())?;
    Ok(ModelManager::new(db_con))
}

async fn encryption_key(key: Option<String>) -> String {
    match key {
        Some(key) => key,
        None => Config::get_or_init(cfg!(debug_assertions))
            .await
            .app()
            .encryption_key()
            .to_string(),
    }
}

async fn find_user(
    mm: &ModelManager,
    actor: &AuthenticatedUser,
    email: &str,
) -> AppResult<UserEntity> {
    UserEntity::find_by_email(mm, actor, email)
        .await?
        .ok_or_else(|| AppError::UserNotFound(email.to_string()))
}

async fn run_user(action: UserCommands) -> AppResult<()> {
    let mm = connect().await?;
    let actor = AuthenticatedUser::admin();

    match action {
        UserCommands::Add {
            email,
            full_name,
            password,
            roles,
        } => {
            let body = UserCreateBody {
                email,
                full_name,
                phone: None,
                country: None,
                password,
                roles,
            };
            body.validate()
                .map_err(|e| AppError::InvalidInput(e.to_string()))?;

            let user = UserEntity::create(
                &mm,
                &actor,
                UserEntityCreateUpdate {
                    email: body.email.trim().to_lowercase(),
                    full_name: body.full_name.trim().to_string(),
                    phone: None,
                    country: None,
                    roles: body.roles,
                    password_hash: Some(hash_password(&body.password)?),
                },
            )
            .await?;
            println!("User created: {} {:?}", user.id(), user.roles());
        }

        UserCommands::SetRoles { email, roles } => {
            let user = find_user(&mm, &actor, &email).await?;
            let user = user.set_roles(&mm, &actor, &roles).await?;
            println!("Roles of {}: {:?}", user.email(), user.roles());
        }

        UserCommands::Deactivate { email } => {
            let user = find_user(&mm, &actor, &email).await?;
            let user = user
                .set_status(&mm, &actor, AccountStatus::Deactivated)
                .await?;
            println!("Deactivated {}", user.email());
        }

        UserCommands::Activate { email } => {
            let user = find_user(&mm, &actor, &email).await?;
            let user = user.set_status(&mm, &actor, AccountStatus::Active).await?;
            println!("Activated {}", user.email());
        }
    }

    Ok(())
}

async fn run_crypt(action: CryptCommands) -> AppResult<()> {
    match action {
        CryptCommands::EncryptUrl { url, key } => {
            let key = encryption_key(key).await;
            println!("{}", encrypt_payment_url(&url, &key)?);
        }
        CryptCommands::DecryptUrl { token, key } => {
            let key = encryption_key(key).await;
            println!("{}", decrypt_payment_url(&token, &key)?);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    match args.command {
        Commands::User { action } => run_user(action).await,
        Commands::Crypt { action } => run_crypt(action).await,
    }
}
