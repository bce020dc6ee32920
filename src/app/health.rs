use clap::Parser;

use crate::app::Context;
use crate::Error;

#[derive(Debug, Default, Parser, Clone, Copy)]
pub struct Health;

impl Health {
    pub async fn run(self, ctx: &Context) -> Result<(), Error> {
        ctx.session.health.check(&ctx.client).await;

        let snapshot = ctx.session.health.snapshot();
        println!("backend: {}", snapshot.status);
        if let Some(details) = &snapshot.details {
            println!("{details}");
        }
        if let Some(checked_at) = snapshot.last_checked_at {
            println!("checked at {}", checked_at.to_rfc3339());
        }

        Ok(())
    }
}
