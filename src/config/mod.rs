//! Configuration loading and validation.
//!
//! The cluster description lives in `oraclust.cluster.yaml`; secrets come
//! from the environment (optionally via a `.env` file).

pub mod parser;
pub mod spec;
pub mod validator;

pub use parser::{find_config_file, ConfigParser, DEFAULT_CONFIG_FILES};
pub use spec::{
    ApiConfig, ClusterConfig, InstallConfig, MonitorConfig, ProvisionConfig, SshConfig,
};
pub use validator::{ConfigValidator, ValidationResult};
