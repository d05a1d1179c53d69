use crate::*;
use confique::Config as _;

#[derive(confique::Config, Debug)]
pub struct Config {
    /// Connection string used by `run` when none is passed on the command line.
    #[config(env = "SQLSCRIPT_DATABASE_URL")]
    pub database_url: Option<String>,
    /// One connection keeps session state (`SET`, temp tables) across the script.
    #[config(env = "SQLSCRIPT_MAX_CONNECTIONS", default = 1)]
    pub max_connections: u32,
    #[config(env = "SQLSCRIPT_STOP_ON_ERROR", default = true)]
    pub stop_on_error: bool,
    #[cfg(test)]
    #[config(env = "SQLSCRIPT_CONTAINER_RAMDISKED", default = true)]
    pub container_ramdisked: bool,
    #[cfg(test)]
    #[config(env = "SQLSCRIPT_CONTAINER_LOGS", default = false)]
    pub container_logs: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Config::builder().env().load()?;
        debug!(
            "Loaded configuration: database_url set = {}, max_connections = {}, stop_on_error = {}",
            config.database_url.is_some(),
            config.max_connections,
            config.stop_on_error
        );
        Ok(config)
    }
}

#[cfg(test)]
pub fn config() -> &'static Config {
    use std::sync::OnceLock;
    static CONFIG: OnceLock<Config> = OnceLock::new();
    CONFIG.get_or_init(|| {
        Config::from_env()
            .expect("Failed to load one or more value configuration from the current environment")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let config = Config::from_env().expect("defaults should load");
        assert!(config.max_connections >= 1);
    }
}
