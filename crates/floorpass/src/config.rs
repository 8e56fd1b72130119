//! CLI configuration -- thin wrapper around `floorpass_config`.
//!
//! Resolves the active profile, applies `GlobalOpts` overrides
//! (--api-url, --timeout) and builds the API client every command uses.

use std::sync::Arc;
use std::time::Duration;

use floorpass_api::{ApiClient, SessionListener};
use floorpass_core::ClientConfig;
use tracing::{debug, warn};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use floorpass_config::{
    Config, Defaults, KeyringTokenStore, Profile, config_path, load_config, save_config,
};

/// Everything a backend-bound command needs.
pub struct Session {
    pub profile_name: String,
    pub profile: Profile,
    pub client_config: ClientConfig,
    pub client: Arc<ApiClient>,
}

/// Logs when the stored session could not be renewed. The keyring entry
/// is already gone by the time this fires.
struct ExpiryNotice {
    profile: String,
}

impl SessionListener for ExpiryNotice {
    fn session_expired(&self) {
        warn!(profile = %self.profile, "session expired, stored tokens cleared");
    }
}

/// Load config and pick the profile, honoring --profile and --api-url.
pub fn resolve_profile(global: &GlobalOpts) -> Result<(String, Profile, Defaults), CliError> {
    let cfg = load_config()?;
    let name = cfg.active_profile_name(global.profile.as_deref());

    let mut profile = match (cfg.profiles.get(&name), global.api_url.as_deref()) {
        (Some(profile), _) => profile.clone(),
        // No profile, but enough on the command line to talk to a backend.
        (None, Some(api_url)) => Profile {
            api_url: api_url.to_owned(),
            ..Profile::default()
        },
        (None, None) if cfg.profiles.is_empty() => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
        (None, None) => {
            let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
            available.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name,
                available: available.join(", "),
            });
        }
    };

    if let Some(api_url) = &global.api_url {
        profile.api_url.clone_from(api_url);
    }
    Ok((name, profile, cfg.defaults))
}

/// Resolve the profile and build a keyring-backed client for it.
pub fn open_session(global: &GlobalOpts) -> Result<Session, CliError> {
    let (profile_name, profile, defaults) = resolve_profile(global)?;

    let mut client_config = floorpass_config::profile_to_client_config(&profile, &defaults)?;
    if let Some(secs) = global.timeout {
        client_config.timeout = Duration::from_secs(secs);
    }
    debug!(
        profile = %profile_name,
        api_url = %client_config.api_url,
        "resolved profile"
    );

    let tokens = Arc::new(KeyringTokenStore::new(profile_name.clone()));
    let listener: Arc<dyn SessionListener> = Arc::new(ExpiryNotice {
        profile: profile_name.clone(),
    });
    let client = client_config
        .build_client(tokens, Some(listener))
        .map_err(|e| CliError::from(e).for_profile(&profile_name))?;

    Ok(Session {
        profile_name,
        profile,
        client_config,
        client: Arc::new(client),
    })
}
