use scan_prediction::{config::ModelConfig, ScanKind};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    #[serde(default)]
    pub upload: UploadConfig,
    pub models: ModelsConfig,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.try_into().map_err(serde::de::Error::custom)
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn get_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

fn default_max_bytes() -> usize {
    20 * 1024 * 1024
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelsConfig {
    pub eye: ModelConfig,
    pub brain: ModelConfig,
}

impl ModelsConfig {
    pub fn get(&self, kind: ScanKind) -> &ModelConfig {
        match kind {
            ScanKind::Eye => &self.eye,
            ScanKind::Brain => &self.brain,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub enum LogLevel {
    Debug,
    Info,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            other => Err(format!(
                "{} is not a supported minimum log level. Use either `debug` or `info`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Config, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("current directory: {}", e)))?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    let config = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.yaml"),
        ))
        .add_source(config::File::from(
            configuration_directory.join(format!("{}.yaml", environment.as_str())),
        ))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    config.try_deserialize::<Config>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use scan_prediction::config::{ChannelPolicy, ScoreKind, TensorLayout};

    const BASE: &str = r#"
log_level: info
server:
  host: 127.0.0.1
  port: 8501
models:
  eye:
    model_dir: models/eye_disease
    onnx_file: model.onnx
  brain:
    model_dir: models/brain_tumor
    onnx_file: model.onnx
    enabled: false
    layout: nchw
    channel_policy: replicate
    scores: logits
"#;

    fn parse(yaml: &str) -> Result<Config, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize::<Config>()
    }

    #[test]
    fn test_parse_configuration() {
        let config = parse(BASE).unwrap();

        assert_eq!(config.server.get_address(), "127.0.0.1:8501");
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.upload.max_bytes, 20 * 1024 * 1024);

        let eye = config.models.get(ScanKind::Eye);
        assert!(eye.enabled);
        assert_eq!(eye.layout, TensorLayout::Nhwc);
        assert_eq!(eye.channel_policy, None);

        let brain = config.models.get(ScanKind::Brain);
        assert!(!brain.enabled);
        assert_eq!(brain.layout, TensorLayout::Nchw);
        assert_eq!(brain.channel_policy, Some(ChannelPolicy::Replicate));
        assert_eq!(brain.scores, ScoreKind::Logits);
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let yaml = BASE.replace("log_level: info", "log_level: trace");
        assert!(parse(&yaml).is_err());
    }

    #[test]
    fn test_environment_names() {
        let env: Environment = "Production".to_string().try_into().unwrap();
        assert_eq!(env.as_str(), "production");
        assert!(Environment::try_from("staging".to_string()).is_err());
    }
}
