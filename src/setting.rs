use crate::{Error, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// number of threads config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Thread {
    /// number of http server threads
    pub http: usize,
}

/// network config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Network {
    /// server bind host
    pub host: String,
    /// server bind port
    pub port: u16,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// uploaded files config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Upload {
    /// directory the files are written to
    pub dir: PathBuf,
    /// public path the directory is served under
    pub url_prefix: String,
    /// max size of a form field in bytes
    pub max_size: usize,
}

impl Default for Upload {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./uploads"),
            url_prefix: "/uploads".to_owned(),
            max_size: 10 << 20,
        }
    }
}

/// cors config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Cors {
    /// allow any origin if empty
    pub allowed_origins: Vec<String>,
}

impl Default for Cors {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:5173".to_owned(),
                "http://localhost:3000".to_owned(),
            ],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    /// read only
    Demo,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Demo => "demo",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub password: String,
    pub role: Role,
}

/// auth config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Auth {
    /// login accounts
    pub users: Vec<User>,
}

impl Default for Auth {
    fn default() -> Self {
        Self {
            users: vec![
                User {
                    name: "mamah".to_owned(),
                    password: "123".to_owned(),
                    role: Role::Admin,
                },
                User {
                    name: "admin".to_owned(),
                    password: "321".to_owned(),
                    role: Role::Admin,
                },
                User {
                    name: "demo".to_owned(),
                    password: "demo123".to_owned(),
                    role: Role::Demo,
                },
            ],
        }
    }
}

impl Auth {
    pub fn login(&self, name: &str, password: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.name == name && u.password == password)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Setting {
    /// database url, postgres://, mysql:// or sqlite://
    /// https://www.sea-ql.org/SeaORM/docs/install-and-config/connection/
    pub db_url: String,

    /// max database connections, driver default if not set
    pub db_pool_size: Option<u32>,

    pub thread: Thread,
    pub network: Network,
    pub upload: Upload,
    pub cors: Cors,
    pub auth: Auth,
}

impl Default for Setting {
    fn default() -> Self {
        Self {
            db_url: "sqlite://kontrakanku.sqlite?mode=rwc".to_string(),
            db_pool_size: None,
            thread: Default::default(),
            network: Default::default(),
            upload: Default::default(),
            cors: Default::default(),
            auth: Default::default(),
        }
    }
}

impl Setting {
    /// read config from file and env
    pub fn read<P: AsRef<Path>>(file: P, env_prefix: Option<String>) -> Result<Self> {
        let path = file
            .as_ref()
            .to_str()
            .ok_or_else(|| Error::Message("invalid config path".to_owned()))?;
        let mut config = Config::builder().add_source(File::with_name(path));
        if let Some(prefix) = env_prefix {
            config = config.add_source(Self::env_source(&prefix));
        }

        let config = config.build()?;
        let mut setting: Setting = config.try_deserialize()?;
        setting.validate()?;
        Ok(setting)
    }

    fn env_source(prefix: &str) -> Environment {
        Environment::with_prefix(prefix)
            .try_parsing(true)
            .prefix_separator("_")
            .separator("__")
            .list_separator(" ")
            .with_list_parse_key("cors.allowed_origins")
    }

    /// read config from env
    pub fn from_env(env_prefix: String) -> Result<Self> {
        let mut config = Config::builder();
        config = config.add_source(Self::env_source(&env_prefix));

        let config = config.build()?;
        let mut setting: Setting = config.try_deserialize()?;
        setting.validate()?;
        Ok(setting)
    }

    /// config from str
    pub fn from_str(s: &str, format: FileFormat) -> Result<Self> {
        let builder = Config::builder();
        let config = builder.add_source(File::from_str(s, format)).build()?;
        let mut setting: Setting = config.try_deserialize()?;
        setting.validate()?;
        Ok(setting)
    }

    fn validate(&mut self) -> Result<()> {
        let prefix = self.upload.url_prefix.trim_end_matches('/');
        if !prefix.starts_with('/') {
            return Err(Error::Message(format!(
                "upload.url_prefix must start with '/': {:?}",
                self.upload.url_prefix
            )));
        }
        self.upload.url_prefix = prefix.to_owned();
        if self.upload.max_size == 0 {
            return Err(Error::Message("upload.max_size must be positive".to_owned()));
        }
        Ok(())
    }
}
