//! Connection configuration and the saved profile.
//!
//! Flags and environment variables (handled by clap) win over the profile
//! stored in the platform config directory.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use wikirpc::{Auth, BasicAuth, ClientOptions, Endpoint, WikiRpcClient};

use crate::cli::ConnectionArgs;

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

/// Stored connection profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub url: Endpoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<BasicAuth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_auth: Option<String>,
    #[serde(default)]
    pub cookies: bool,
}

impl Profile {
    pub fn auth(&self) -> Auth {
        Auth::resolve(self.basic_auth.clone(), self.bearer_auth.clone())
    }
}

/// Get the profile file path.
fn profile_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "wikirpc").context("Could not determine config directory")?;

    let config_dir = dirs.config_dir();
    fs::create_dir_all(config_dir).context("Failed to create config directory")?;

    Ok(config_dir.join("profile.json"))
}

/// Save the profile to disk, readable by the owner only.
pub fn save_profile(profile: &Profile) -> Result<PathBuf> {
    let path = profile_path()?;
    let json = serde_json::to_string_pretty(profile)?;

    write_private(&path, &json).context("Failed to write profile")?;
    Ok(path)
}

/// Write `contents` to a file only the owner can read, from creation on.
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path)?;

    // An existing file keeps its old mode on open
    #[cfg(unix)]
    file.set_permissions(fs::Permissions::from_mode(0o600))?;

    file.write_all(contents.as_bytes())
}

/// Load the profile, if one was saved.
pub fn load_profile() -> Result<Option<Profile>> {
    let path = profile_path()?;

    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&path).context("Failed to read profile")?;
    let profile = serde_json::from_str(&json).context("Invalid profile file")?;
    Ok(Some(profile))
}

/// Delete the saved profile. Returns whether there was one.
pub fn clear_profile() -> Result<bool> {
    let path = profile_path()?;

    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(&path).context("Failed to remove profile")?;
    Ok(true)
}

/// Credentials given on the command line, if any.
fn auth_from_args(args: &ConnectionArgs) -> Result<Option<Auth>> {
    let basic = match (&args.user, &args.password) {
        (Some(user), password) => Some(BasicAuth::new(user, password.clone().unwrap_or_default())),
        (None, Some(_)) => bail!("--password needs --user"),
        (None, None) => None,
    };

    Ok(match (basic, &args.token) {
        (None, None) => None,
        (basic, token) => Some(Auth::resolve(basic, token.clone())),
    })
}

/// Merge command-line arguments over the saved profile.
pub fn resolve(args: &ConnectionArgs) -> Result<Profile> {
    let saved = load_profile()?;

    let url = match (&args.url, &saved) {
        (Some(url), _) => Endpoint::new(url).context("Invalid endpoint URL")?,
        (None, Some(profile)) => profile.url.clone(),
        (None, None) => bail!(
            "No endpoint configured. Pass --url, set WIKIRPC_URL or run 'wikirpc profile save --url ...'"
        ),
    };

    let auth = match auth_from_args(args)? {
        Some(auth) => auth,
        None => saved.as_ref().map(Profile::auth).unwrap_or_default(),
    };
    let (basic_auth, bearer_auth) = match auth {
        Auth::None => (None, None),
        Auth::Basic(basic) => (Some(basic), None),
        Auth::Bearer(token) => (None, Some(token)),
    };

    Ok(Profile {
        url,
        basic_auth,
        bearer_auth,
        cookies: args.cookies || saved.is_some_and(|p| p.cookies),
    })
}

/// Build a client from arguments and profile.
pub fn connect(args: &ConnectionArgs) -> Result<WikiRpcClient> {
    let profile = resolve(args)?;
    let auth = profile.auth();
    debug!(url = %profile.url, auth = auth.kind(), "connecting");

    let mut options = ClientOptions::new().auth(auth).cookies(profile.cookies);
    if let Some(secs) = args.timeout {
        options = options.timeout(Duration::from_secs(secs));
    }

    WikiRpcClient::new(profile.url.as_str(), options).context("Failed to create client")
}
