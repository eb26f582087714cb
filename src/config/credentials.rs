use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

/// Default config file checked next to the working directory.
pub const CONFIG_PATH: &str = "scrape_config.json";

/// API keys for the image-search providers, all optional.
///
/// Each key gates one provider: a provider with no key is skipped for the
/// whole run rather than treated as an error.
#[derive(Debug, Clone, Default)]
pub struct ApiCredentials {
    pub serpapi: Option<String>,
    pub bing: Option<String>,
    pub apify: Option<String>,
    pub pexels: Option<String>,
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    api_keys: HashMap<String, String>,
}

impl ApiCredentials {
    /// Reads keys from the environment.
    pub fn from_env() -> Self {
        ApiCredentials {
            serpapi: env_key("SERPAPI_KEY"),
            bing: env_key("BING_SEARCH_KEY"),
            apify: env_key("APIFY_API_TOKEN"),
            pexels: env_key("PEXELS_API_KEY"),
        }
    }

    /// Environment keys overridden by `scrape_config.json` entries, if the
    /// file exists and parses. A malformed file is logged and ignored.
    pub fn load() -> Self {
        let mut creds = Self::from_env();
        let path = Path::new(CONFIG_PATH);
        if !path.exists() {
            return creds;
        }

        let parsed: Result<ConfigFile, _> = File::open(path)
            .map_err(|e| e.to_string())
            .and_then(|f| serde_json::from_reader(BufReader::new(f)).map_err(|e| e.to_string()));

        match parsed {
            Ok(config) => creds.apply(&config.api_keys),
            Err(e) => warn!("ignoring malformed {}: {}", CONFIG_PATH, e),
        }
        creds
    }

    fn apply(&mut self, keys: &HashMap<String, String>) {
        for (name, value) in keys {
            if value.trim().is_empty() {
                continue;
            }
            match name.as_str() {
                "serpapi" => self.serpapi = Some(value.clone()),
                "bing" => self.bing = Some(value.clone()),
                "apify" => self.apify = Some(value.clone()),
                "pexels" => self.pexels = Some(value.clone()),
                other => warn!("unknown api_keys entry '{}' in {}", other, CONFIG_PATH),
            }
        }
    }

    /// True when at least one provider has a key.
    pub fn any_available(&self) -> bool {
        self.serpapi.is_some() || self.bing.is_some() || self.apify.is_some() || self.pexels.is_some()
    }
}

fn env_key(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_overrides_env() {
        let mut creds = ApiCredentials {
            serpapi: Some("from-env".into()),
            ..Default::default()
        };
        let mut keys = HashMap::new();
        keys.insert("serpapi".to_string(), "from-file".to_string());
        keys.insert("pexels".to_string(), "px".to_string());
        creds.apply(&keys);

        assert_eq!(creds.serpapi.as_deref(), Some("from-file"));
        assert_eq!(creds.pexels.as_deref(), Some("px"));
        assert!(creds.bing.is_none());
    }

    #[test]
    fn empty_values_do_not_override() {
        let mut creds = ApiCredentials {
            bing: Some("keep".into()),
            ..Default::default()
        };
        let mut keys = HashMap::new();
        keys.insert("bing".to_string(), "  ".to_string());
        creds.apply(&keys);

        assert_eq!(creds.bing.as_deref(), Some("keep"));
    }
}
