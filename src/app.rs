use std::time::Duration;

use clap::{Parser, Subcommand};
use teller_lib::types::Money;
use teller_lib::{AccountService, Client, Route, Session};

use crate::{config, logging, store::ConfyStore, Error};

mod deposit;
mod health;
mod login;
mod logout;
mod statement;
mod status;
mod transactions;
mod withdraw;

#[derive(Debug, Parser)]
#[clap(author, version, about = "Command-line client for the bank account service")]
pub struct App {
    /// Print more detail (-v info, -vv debug, -vvv trace)
    #[clap(long, short, parse(from_occurrences), global = true)]
    verbose: u8,

    /// Override the configured api base url
    #[clap(long, global = true)]
    api_url: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Bind this session to an account
    Login(login::Login),
    /// Unbind the session and clear the cached account view
    Logout(logout::Logout),
    /// Show the session: bound account, balance, backend health
    Status(status::Status),
    /// Deposit money into the bound account
    Deposit(deposit::Deposit),
    /// Withdraw money from the bound account
    Withdraw(withdraw::Withdraw),
    /// List the bound account's transactions
    Transactions(transactions::Transactions),
    /// Export a statement for the bound account
    Statement(statement::Statement),
    /// Check backend health
    Health(health::Health),
}

impl Command {
    /// The navigation target this command enters.
    fn route(&self) -> Route {
        match self {
            Self::Login(_) | Self::Logout(_) => Route::Settings,
            Self::Status(_) | Self::Health(_) => Route::Home,
            Self::Deposit(_) => Route::Deposit,
            Self::Withdraw(_) => Route::Withdraw,
            Self::Transactions(_) | Self::Statement(_) => Route::Transactions,
        }
    }
}

/// Dependencies threaded to every subcommand.
#[derive(Debug)]
pub struct Context {
    pub session: Session,
    pub accounts: AccountService,
    pub client: Client,
    pub currency: String,
}

impl Context {
    fn new(config: &config::AppConfig) -> Result<Self, Error> {
        let client = Client::new(&config.api_url, Duration::from_secs(config.timeout_secs))?;
        let session = Session::restore(&ConfyStore);
        let accounts = AccountService::new(client.clone(), session.settings.clone());

        Ok(Self {
            session,
            accounts,
            client,
            currency: config.currency.clone(),
        })
    }
}

impl App {
    pub fn from_cli() -> Self {
        Self::parse()
    }

    pub async fn run(self) -> Result<(), Error> {
        logging::set_up(self.verbose);

        let mut config = config::load()?;
        if let Some(api_url) = self.api_url {
            config.api_url = api_url;
        }
        if config.api_url.trim().is_empty() {
            return Err(Error::MissingApiUrl);
        }

        let ctx = Context::new(&config)?;

        // The guard runs on every invocation; a protected command without a
        // bound account lands on the home view instead.
        let route = self.command.route();
        if route.gate(&ctx.session.settings) != route {
            println!(
                "no account is bound to this session; run `{} login <account-id>` first\n",
                config::BIN_NAME
            );
            return status::Status::default().run(&ctx).await;
        }

        match self.command {
            Command::Login(cmd) => cmd.run(&ctx).await,
            Command::Logout(cmd) => cmd.run(&ctx),
            Command::Status(cmd) => cmd.run(&ctx).await,
            Command::Deposit(cmd) => cmd.run(&ctx).await,
            Command::Withdraw(cmd) => cmd.run(&ctx).await,
            Command::Transactions(cmd) => cmd.run(&ctx).await,
            Command::Statement(cmd) => cmd.run(&ctx).await,
            Command::Health(cmd) => cmd.run(&ctx).await,
        }
    }
}

fn format_money(amount: Money, currency: &str) -> String {
    match rusty_money::iso::find(currency) {
        Some(iso) => format!("{}", rusty_money::Money::from_decimal(amount, iso)),
        None => amount.to_string(),
    }
}
