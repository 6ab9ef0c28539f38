//! Manage the saved connection profile.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::cli::ConnectionArgs;
use crate::config::{self, Profile};
use crate::output;

#[derive(Args, Debug)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileSubcommand {
    /// Save the current connection flags (merged over any saved profile)
    Save,

    /// Display the saved profile
    Show,

    /// Remove the saved profile
    Clear,
}

pub fn handle(conn: &ConnectionArgs, cmd: ProfileCommand) -> Result<()> {
    match cmd.command {
        ProfileSubcommand::Save => save(conn),
        ProfileSubcommand::Show => show(),
        ProfileSubcommand::Clear => clear(),
    }
}

fn save(conn: &ConnectionArgs) -> Result<()> {
    let profile = config::resolve(conn)?;
    let path = config::save_profile(&profile)?;

    output::success(format!("Profile saved to {}", path.display()));
    print_profile(&profile);
    Ok(())
}

fn show() -> Result<()> {
    let profile = config::load_profile()?
        .context("No saved profile. Run 'wikirpc profile save --url ...' first.")?;
    print_profile(&profile);
    Ok(())
}

fn clear() -> Result<()> {
    if config::clear_profile()? {
        output::success("Profile removed");
    } else {
        output::notice("No saved profile.");
    }
    Ok(())
}

fn print_profile(profile: &Profile) {
    output::field("URL", profile.url.as_str());
    output::field("Auth", profile.auth().kind());
    output::field("User", output::or_dash(profile.basic_auth.as_ref().map(|b| &b.user)));
    output::field("Cookies", if profile.cookies { "on" } else { "off" });
}
