use chrono::{DateTime, Utc};
use clap::Parser;
use teller_lib::types::{TimeRange, TransactionKind};

use crate::app::{format_money, Context};
use crate::Error;

#[derive(Debug, Parser, Clone, Copy)]
pub struct Transactions {
    /// Only transactions at or after this instant (RFC 3339)
    #[clap(long)]
    from: Option<DateTime<Utc>>,

    /// Only transactions at or before this instant (RFC 3339)
    #[clap(long)]
    to: Option<DateTime<Utc>>,
}

impl Transactions {
    pub async fn run(self, ctx: &Context) -> Result<(), Error> {
        let range = TimeRange {
            from: self.from,
            to: self.to,
        };
        let transactions = ctx.accounts.transactions(Some(range)).await?;

        if transactions.is_empty() {
            println!("no transactions in range");
            return Ok(());
        }

        for tx in &transactions {
            let kind = match tx.kind {
                TransactionKind::Deposit => "deposit",
                TransactionKind::Withdrawal => "withdrawal",
            };
            println!(
                "{}  {:<10}  {:>14}  balance {}",
                tx.timestamp.to_rfc3339(),
                kind,
                format_money(tx.amount, &ctx.currency),
                format_money(tx.resulting_balance, &ctx.currency),
            );
        }

        Ok(())
    }
}
