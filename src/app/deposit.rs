use clap::Parser;
use teller_lib::types::{Money, OperationId, TransferRequest};

use crate::app::{format_money, Context};
use crate::Error;

#[derive(Debug, Parser, Clone, Copy)]
pub struct Deposit {
    /// Amount to deposit, e.g. 50.00
    amount: Money,

    /// Reuse the operation id of a timed-out submission instead of minting
    /// a new one, so the deposit applies at most once
    #[clap(long)]
    operation_id: Option<OperationId>,
}

impl Deposit {
    pub async fn run(self, ctx: &Context) -> Result<(), Error> {
        let operation_id = self.operation_id.unwrap_or_else(OperationId::fresh);
        let request = TransferRequest {
            amount: self.amount,
            operation_id,
        };

        match ctx.accounts.deposit(&request).await {
            Ok(receipt) => {
                ctx.session
                    .account
                    .record_balance(receipt.account_id, receipt.balance);

                if receipt.applied {
                    println!("deposited {}", format_money(self.amount, &ctx.currency));
                } else {
                    println!("operation {operation_id} had already been applied; nothing moved");
                }
                println!("balance: {}", format_money(receipt.balance, &ctx.currency));
                Ok(())
            }
            Err(e) if e.is_rejection() => Err(e.into()),
            Err(e) => {
                eprintln!(
                    "the deposit may or may not have reached the bank; \
                     retry with --operation-id {operation_id} so it applies at most once"
                );
                Err(e.into())
            }
        }
    }
}
