use booktutor_core::config::{ConfigError, TutorConfig};
use std::net::SocketAddr;

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub tutor: TutorConfig,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let tutor = TutorConfig::from_env()?;

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        Ok(Self {
            bind_address,
            tutor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use booktutor_core::config::Provider;
    use serial_test::serial;
    use std::{env, fs};

    fn clear_env_vars() {
        unsafe {
            env::remove_var("BIND_ADDRESS");
            env::remove_var("LLM_PROVIDER");
            env::remove_var("GROQ_API_KEY");
            env::remove_var("CHAT_MODEL");
            env::remove_var("RUST_LOG");
            env::remove_var("QDRANT_URL");
        }
    }

    #[test]
    #[serial]
    fn test_config_from_env_default_bind_address() {
        clear_env_vars();
        unsafe {
            env::set_var("GROQ_API_KEY", "test-groq-key");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "0.0.0.0:3000");
        assert_eq!(config.tutor.provider, Provider::Groq);
    }

    #[test]
    #[serial]
    fn test_config_custom_bind_address() {
        clear_env_vars();
        unsafe {
            env::set_var("GROQ_API_KEY", "test-groq-key");
            env::set_var("BIND_ADDRESS", "127.0.0.1:8080");
        }

        let config = Config::from_env().expect("Config should load successfully");
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080");
    }

    #[test]
    #[serial]
    fn test_config_invalid_bind_address() {
        clear_env_vars();
        unsafe {
            env::set_var("BIND_ADDRESS", "not-a-valid-address");
            env::set_var("GROQ_API_KEY", "test-groq-key");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "BIND_ADDRESS"),
            _ => panic!("Expected InvalidValue for BIND_ADDRESS"),
        }
    }

    #[test]
    #[serial]
    fn test_config_missing_groq_key() {
        clear_env_vars();

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::MissingVar(msg) => assert!(msg.contains("GROQ_API_KEY")),
            _ => panic!("Expected MissingVar for GROQ_API_KEY"),
        }
    }

    #[test]
    #[serial]
    fn test_config_ignores_dotenv_in_working_directory() {
        clear_env_vars();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env"), "GROQ_API_KEY=from-dotenv\n").unwrap();
        let previous = env::current_dir().unwrap();
        env::set_current_dir(dir.path()).unwrap();

        let result = Config::from_env();
        env::set_current_dir(previous).unwrap();

        match result {
            Err(ConfigError::MissingVar(msg)) => assert!(msg.contains("GROQ_API_KEY")),
            _ => panic!("Expected MissingVar, the .env file must not be read"),
        }
    }
}
