use clap::Parser;

use crate::app::Context;
use crate::Error;

#[derive(Debug, Default, Parser, Clone, Copy)]
pub struct Logout;

impl Logout {
    pub fn run(self, ctx: &Context) -> Result<(), Error> {
        ctx.session.settings.clear();
        ctx.session.account.clear();
        println!("session unbound");
        Ok(())
    }
}
