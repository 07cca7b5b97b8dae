//! Login and logout.

use anyhow::Result;

use regdesk_core::{ConsoleSession, Credentials};

use crate::bootstrap::CliContext;

pub fn login(ctx: &CliContext, username: &str, password: &str) -> Result<()> {
    let mut session = ConsoleSession::new();
    if !session.login(&Credentials::operator_default(), username, password) {
        anyhow::bail!("invalid credentials");
    }

    ctx.store.save(&session)?;
    println!("logged in as {username}");
    Ok(())
}

pub fn logout(ctx: &CliContext) -> Result<()> {
    let mut session = ctx.store.load();
    session.logout();
    ctx.store.clear()?;
    println!("logged out");
    Ok(())
}
