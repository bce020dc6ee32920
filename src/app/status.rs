use clap::Parser;

use crate::app::{format_money, Context};
use crate::Error;

#[derive(Debug, Default, Parser)]
pub struct Status {
    /// Inspect this account instead of the bound one
    #[clap(long)]
    account: Option<String>,
}

impl Status {
    pub async fn run(self, ctx: &Context) -> Result<(), Error> {
        match self.account.as_deref() {
            None => ctx.session.refresh(&ctx.accounts, &ctx.client).await,
            Some(id) => {
                ctx.session.account.refresh(&ctx.accounts, Some(id)).await;
                ctx.session.health.check(&ctx.client).await;
            }
        }

        let account_id = ctx.session.settings.account_id();
        match account_id.trim() {
            "" => println!("account: none bound"),
            id => println!("account: {id}"),
        }

        let account = ctx.session.account.snapshot();
        if let Some(balance) = account.balance {
            match account.last_fetched_at {
                Some(at) => println!(
                    "balance: {} (as of {})",
                    format_money(balance, &ctx.currency),
                    at.to_rfc3339()
                ),
                None => println!("balance: {}", format_money(balance, &ctx.currency)),
            }
        } else {
            println!("balance: unknown");
        }
        if let Some(error) = &account.error {
            println!("last refresh failed: {error}");
        }

        let health = ctx.session.health.snapshot();
        println!("backend: {}", health.status);

        Ok(())
    }
}
