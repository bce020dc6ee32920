use clap::Parser;
use teller_lib::types::{Money, OperationId, TransferRequest};

use crate::app::{format_money, Context};
use crate::Error;

#[derive(Debug, Parser, Clone, Copy)]
pub struct Withdraw {
    /// Amount to withdraw, e.g. 40.00
    amount: Money,

    /// Reuse the operation id of a timed-out submission instead of minting
    /// a new one, so the withdrawal applies at most once
    #[clap(long)]
    operation_id: Option<OperationId>,
}

impl Withdraw {
    pub async fn run(self, ctx: &Context) -> Result<(), Error> {
        let operation_id = self.operation_id.unwrap_or_else(OperationId::fresh);
        let request = TransferRequest {
            amount: self.amount,
            operation_id,
        };

        match ctx.accounts.withdraw(&request).await {
            Ok(receipt) => {
                ctx.session
                    .account
                    .record_balance(receipt.account_id, receipt.balance);

                println!("withdrew {}", format_money(self.amount, &ctx.currency));
                println!("balance: {}", format_money(receipt.balance, &ctx.currency));
                Ok(())
            }
            Err(e) if e.is_rejection() => {
                eprintln!("the bank refused the withdrawal");
                Err(e.into())
            }
            Err(e) => {
                eprintln!(
                    "the withdrawal may or may not have reached the bank; \
                     retry with --operation-id {operation_id} so it applies at most once"
                );
                Err(e.into())
            }
        }
    }
}
