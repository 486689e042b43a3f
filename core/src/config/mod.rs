mod load;
mod types;

pub use load::{
    apply_env_overrides, get_carebook_data_dir, load_default, load_from_path, validate,
    ENV_API_TOKEN, ENV_API_URL,
};
pub use types::{AppConfig, BackendConfig, CredentialTransport, LoggingConfig};
