use std::{io, path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    auth::{LOGIN_FAILURE, PASSWORD_FAILURE},
    ApiClient, AuthClient, FileTokenStore, HttpOrderGateway, OrderDashboard, Session, Settled,
    TokenStore,
};
use shared::{
    domain::{OrderId, OrderStatus},
    error::GENERIC_FAILURE,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod secrets;

use config::{load_settings, Settings};
use secrets::{resolve_secret, CONFIRM_PASSWORD_ENV, NEW_PASSWORD_ENV, PASSWORD_ENV};

#[derive(Parser, Debug)]
#[command(name = "sneaker-admin", about = "Order administration for the sneaker configurator")]
struct Args {
    /// Overrides the configured API origin.
    #[arg(long, global = true)]
    api_base_url: Option<String>,
    /// Overrides where the session token is kept.
    #[arg(long, global = true)]
    token_path: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in as an admin and keep the session token.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
        /// Read the password from the first line of stdin.
        #[arg(long)]
        password_stdin: bool,
    },
    /// Forget the stored session token.
    Logout,
    #[command(subcommand)]
    Orders(OrdersCommand),
    ChangePassword {
        #[arg(long, env = NEW_PASSWORD_ENV, hide_env_values = true)]
        new_password: Option<String>,
        #[arg(long, env = CONFIRM_PASSWORD_ENV, hide_env_values = true)]
        confirm_password: Option<String>,
        /// Read the new password, then its confirmation, from stdin.
        #[arg(long)]
        passwords_stdin: bool,
    },
}

#[derive(Subcommand, Debug)]
enum OrdersCommand {
    List,
    Show {
        id: String,
    },
    SetStatus {
        id: String,
        /// One of in-production, shipped, canceled.
        status: OrderStatus,
    },
    Delete {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(url) = args.api_base_url {
        settings.api_base_url = url;
    }
    if let Some(path) = args.token_path {
        settings.token_path = path;
    }
    settings.validate()?;

    let api = ApiClient::new(&settings.api_base_url, settings.request_timeout())
        .context("failed to build api client")?;
    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&settings.token_path));
    let auth = AuthClient::new(api.clone(), store);

    match args.command {
        Command::Login {
            username,
            password,
            password_stdin,
        } => {
            let password =
                resolve_secret(password, password_stdin, &mut io::stdin().lock(), "password")?;
            auth.login(&username, &password)
                .await
                .map_err(|err| anyhow!(err.user_message(LOGIN_FAILURE)))?;
            println!("Logged in as {username}");
        }
        Command::Logout => {
            auth.logout()?;
            println!("Logged out");
        }
        Command::ChangePassword {
            new_password,
            confirm_password,
            passwords_stdin,
        } => {
            let session = require_session(&auth)?;
            let new_password = resolve_secret(
                new_password,
                passwords_stdin,
                &mut io::stdin().lock(),
                "new password",
            )?;
            let confirm_password = resolve_secret(
                confirm_password,
                passwords_stdin,
                &mut io::stdin().lock(),
                "password confirmation",
            )?;
            auth.change_password(&session, &new_password, &confirm_password)
                .await
                .map_err(|err| anyhow!(err.user_message(PASSWORD_FAILURE)))?;
            println!("Password changed successfully.");
        }
        Command::Orders(action) => {
            let session = require_session(&auth)?;
            run_orders(action, api, session, &settings).await?;
        }
    }

    Ok(())
}

fn require_session(auth: &AuthClient) -> Result<Session> {
    auth.restore()
        .map_err(|err| anyhow!(err.user_message(GENERIC_FAILURE)))?
        .ok_or_else(|| anyhow!("Not logged in. Run `sneaker-admin login` first."))
}

async fn run_orders(
    action: OrdersCommand,
    api: ApiClient,
    session: Session,
    settings: &Settings,
) -> Result<()> {
    let gateway = Arc::new(HttpOrderGateway::new(api, session));
    let mut dashboard = OrderDashboard::new(gateway, settings.date_style()?);
    if let Err(err) = dashboard.initialize().await {
        let message = dashboard.last_error().unwrap_or(GENERIC_FAILURE);
        if err.is_credential_rejected() {
            bail!("{message} Run `sneaker-admin login` again.");
        }
        bail!(message.to_string());
    }

    match action {
        OrdersCommand::List => {
            print!(
                "{}",
                render::order_table(dashboard.orders(), dashboard.total_orders())
            );
        }
        OrdersCommand::Show { id } => {
            let detail = dashboard.view(&OrderId::new(id))?;
            print!("{}", render::order_detail(detail));
        }
        OrdersCommand::SetStatus { id, status } => {
            let id = listed_order(&dashboard, id)?;
            dashboard.view(&id)?;
            let outcome = dashboard.update_status(&id, status).await;
            report(outcome)?;
            if let Some(detail) = dashboard.selected_order() {
                print!("{}", render::order_detail(detail));
            }
            dashboard.close();
        }
        OrdersCommand::Delete { id } => {
            let id = listed_order(&dashboard, id)?;
            report(dashboard.delete(&id).await)?;
            info!(order_id = %id, "cli: order deleted");
            print!(
                "{}",
                render::order_table(dashboard.orders(), dashboard.total_orders())
            );
        }
    }

    Ok(())
}

/// Actions are only offered for orders present in the freshly loaded list.
fn listed_order(dashboard: &OrderDashboard<HttpOrderGateway>, id: String) -> Result<OrderId> {
    let id = OrderId::new(id);
    if dashboard.order(&id).is_none() {
        bail!("Order {id} is not in the current order list.");
    }
    Ok(id)
}

fn report(outcome: Settled) -> Result<()> {
    match outcome {
        Settled::Applied => Ok(()),
        Settled::Failed(message) => Err(anyhow!(message)),
        Settled::Stale => {
            warn!("cli: result superseded by a newer request");
            Ok(())
        }
    }
}
