//! Paths of the two plugin endpoints, relative to the plugin namespace root

pub const DEFAULT_PLUGIN_ID: &str = "github-actions";
pub const HISTORY_PATH: &str = "github-actions-history";
pub const TRIGGER_PATH: &str = "github-actions-trigger";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    /// Builds `{base_url}/{plugin_id}`. An empty plugin id mounts the
    /// endpoints directly under `base_url`.
    pub fn new(base_url: &str, plugin_id: &str) -> Self {
        let base_url = base_url.trim().trim_end_matches('/');
        let plugin_id = plugin_id.trim().trim_matches('/');

        let base = if plugin_id.is_empty() {
            base_url.to_string()
        } else {
            format!("{base_url}/{plugin_id}")
        };

        Self { base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn history(&self) -> String {
        format!("{}/{HISTORY_PATH}", self.base)
    }

    pub fn trigger(&self) -> String {
        format!("{}/{TRIGGER_PATH}", self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths() {
        let endpoints = Endpoints::new("http://localhost:1337", "github-actions");
        assert_eq!(
            endpoints.history(),
            "http://localhost:1337/github-actions/github-actions-history"
        );
        assert_eq!(
            endpoints.trigger(),
            "http://localhost:1337/github-actions/github-actions-trigger"
        );
    }

    #[test]
    fn test_slashes_are_normalized() {
        let endpoints = Endpoints::new("http://localhost:1337/", "/github-actions/");
        assert_eq!(endpoints.base(), "http://localhost:1337/github-actions");
    }

    #[test]
    fn test_empty_plugin_id() {
        let endpoints = Endpoints::new("http://localhost:1337/admin", "");
        assert_eq!(
            endpoints.trigger(),
            "http://localhost:1337/admin/github-actions-trigger"
        );
    }
}
