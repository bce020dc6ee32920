use clap::Parser;

use crate::app::{format_money, Context};
use crate::Error;

#[derive(Debug, Parser)]
pub struct Login {
    /// The account id to bind this session to
    account_id: String,
}

impl Login {
    pub async fn run(self, ctx: &Context) -> Result<(), Error> {
        let account_id = self.account_id.trim();
        if account_id.is_empty() {
            return Err(anyhow::anyhow!("account id must not be empty").into());
        }

        ctx.session.settings.set_account_id(account_id);
        println!("session bound to account {account_id}");

        // Immediate feedback; a fetch failure leaves the binding in place.
        ctx.session.account.refresh(&ctx.accounts, None).await;
        let snapshot = ctx.session.account.snapshot();
        if let Some(balance) = snapshot.balance {
            println!("balance: {}", format_money(balance, &ctx.currency));
        } else if let Some(error) = snapshot.error {
            println!("could not fetch the account yet: {error}");
        }

        Ok(())
    }
}
