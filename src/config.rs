//! 配置系统模块
//!
//! 统一处理 TOML 配置文件、环境变量、命令行参数

use crate::health::{GoalThresholds, HA1C_MAX};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use config::{Config as ConfigBuilder, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const APP_NAME: &str = "physician-metrics";

/// 命令行参数
#[derive(Parser, Debug, Clone)]
#[command(name = "physician-metrics")]
#[command(about = "Physician performance metrics for blood pressure, cholesterol and HA1C goals")]
#[command(version)]
pub struct Cli {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 日志级别
    #[arg(short, long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// 种子数据文件 (TOML)
    #[arg(short, long)]
    pub seed_file: Option<PathBuf>,

    /// 子命令
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// 支持的命令
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive session (default)
    Interactive,
    /// Print the full dashboard once
    Show,
    /// Print goal attainment metrics
    Metrics {
        /// Only this physician
        #[arg(short, long)]
        doctor: Option<String>,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Add a patient to a fresh session and print the updated dashboard
    Add {
        #[arg(long)]
        doctor: String,
        #[arg(long)]
        patient: String,
        /// e.g. 120/80
        #[arg(long)]
        blood_pressure: String,
        #[arg(long)]
        cholesterol: String,
        #[arg(long)]
        ha1c: String,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the default configuration
    PrintConfig,
    /// 重置配置
    ResetConfig,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Output format for one-shot commands
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// 日志级别
#[derive(clap::ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// 主配置结构
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// 日志配置
    pub logging: LoggingConfig,
    /// 达标阈值
    pub goals: GoalThresholds,
    /// 种子数据配置
    pub roster: RosterConfig,
    /// 显示配置
    pub display: DisplayConfig,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,
    /// 日志格式
    pub format: LogFormat,
    /// 日志输出目录
    pub directory: Option<PathBuf>,
}

/// 日志格式
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// 简洁格式
    Compact,
    /// 详细格式
    Full,
    /// JSON 格式
    Json,
}

/// 种子数据配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RosterConfig {
    /// 种子文件；为空时使用内置数据
    pub seed_file: Option<PathBuf>,
}

/// 显示配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// 表单之后再显示一次全部患者表
    pub show_updated_section: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            directory: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_updated_section: true,
        }
    }
}

impl Config {
    /// 使用指定的 CLI 参数加载配置
    pub fn load_with_cli(cli: &Cli) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        // 1. 默认配置
        builder = builder.add_source(ConfigBuilder::try_from(&Config::default())?);

        // 2. 系统配置文件
        if let Some(system_config) = Self::get_system_config_path() {
            if system_config.exists() {
                builder = builder.add_source(File::from(system_config));
            }
        }

        // 3. 用户配置文件
        if let Some(user_config) = Self::get_user_config_path() {
            if user_config.exists() {
                builder = builder.add_source(File::from(user_config));
            }
        }

        // 4. 指定的配置文件
        if let Some(config_path) = &cli.config {
            if config_path.exists() {
                builder = builder.add_source(File::from(config_path.clone()));
            } else {
                return Err(anyhow!("配置文件不存在: {}", config_path.display()));
            }
        }

        // 5. 环境变量（前缀 PHYSICIAN_METRICS_）
        builder = builder.add_source(
            Environment::with_prefix("PHYSICIAN_METRICS")
                .prefix_separator("_")
                .separator("__"),
        );

        let mut config: Config = builder.build()?.try_deserialize()?;

        // 6. 命令行参数覆盖
        if let Some(log_level) = &cli.log_level {
            config.logging.level = log_level.clone();
        }

        if let Some(seed_file) = &cli.seed_file {
            config.roster.seed_file = Some(seed_file.clone());
        }

        // 7. 验证配置
        config.validate()?;

        Ok(config)
    }

    /// 获取系统配置文件路径
    pub fn get_system_config_path() -> Option<PathBuf> {
        Some(PathBuf::from("/etc/physician-metrics/config.toml"))
    }

    /// 获取用户配置文件路径
    pub fn get_user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// 生成默认配置文件
    pub fn generate_default_config() -> Result<String> {
        let config = Config::default();
        toml::to_string_pretty(&config).map_err(|e| anyhow!("生成默认配置失败: {}", e))
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| anyhow!("序列化配置失败: {}", e))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("写入配置失败: {}", path.display()))?;
        Ok(())
    }

    /// 验证配置
    pub fn validate(&self) -> Result<()> {
        let goals = &self.goals;
        if goals.bp_systolic_below == 0 || goals.bp_diastolic_below == 0 {
            return Err(anyhow!("血压阈值必须大于 0"));
        }

        if !(goals.ha1c_below > 0.0 && goals.ha1c_below <= HA1C_MAX) {
            return Err(anyhow!(
                "HA1C 阈值必须在 (0, {}] 之间: {}",
                HA1C_MAX,
                goals.ha1c_below
            ));
        }

        if let Some(seed_file) = &self.roster.seed_file {
            if !seed_file.exists() {
                return Err(anyhow!("种子文件不存在: {}", seed_file.display()));
            }
        }

        if let Some(log_dir) = &self.logging.directory {
            if !log_dir.exists() {
                std::fs::create_dir_all(log_dir)?;
            }
        }

        Ok(())
    }

    /// 初始化日志系统
    ///
    /// 日志写到 stderr，stdout 留给仪表板输出。配置了日志目录时，返回的
    /// guard 必须存活到进程结束，否则文件日志会丢失。
    pub fn init_logging(&self) -> Result<Option<WorkerGuard>> {
        let level_filter = EnvFilter::builder()
            .with_default_directive(Level::from(self.logging.level.clone()).into())
            .from_env_lossy();

        let (file_writer, guard) = match &self.logging.directory {
            Some(log_dir) => {
                std::fs::create_dir_all(log_dir)?;
                let file_appender = tracing_appender::rolling::daily(log_dir, "physician-metrics.log");
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                (Some(non_blocking), Some(guard))
            }
            None => (None, None),
        };

        // 根据格式选择不同的初始化方式
        match self.logging.format {
            LogFormat::Compact => tracing_subscriber::registry()
                .with(level_filter)
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .with(file_writer.map(|w| fmt::layer().compact().with_ansi(false).with_writer(w)))
                .try_init()?,
            LogFormat::Full => tracing_subscriber::registry()
                .with(level_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(file_writer.map(|w| fmt::layer().with_ansi(false).with_writer(w)))
                .try_init()?,
            LogFormat::Json => tracing_subscriber::registry()
                .with(level_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .with(file_writer.map(|w| fmt::layer().json().with_writer(w)))
                .try_init()?,
        }

        tracing::debug!("日志系统已初始化，级别: {:?}", self.logging.level);
        Ok(guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["physician-metrics"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.goals, GoalThresholds::default());
        assert!(config.roster.seed_file.is_none());
        assert!(config.display.show_updated_section);
        assert!(matches!(config.logging.level, LogLevel::Warn));
    }

    #[test]
    fn test_config_serialization() {
        let toml_str = Config::generate_default_config().unwrap();
        assert!(toml_str.contains("[logging]"));
        assert!(toml_str.contains("[goals]"));
        assert!(toml_str.contains("bp_systolic_below = 130"));
        assert!(toml_str.contains("ha1c_below = 7.0"));
    }

    #[test]
    fn test_config_file_loading() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let test_config = r#"
[goals]
cholesterol_below = 190
ha1c_below = 6.5

[display]
show_updated_section = false

[logging]
level = "debug"
format = "json"
        "#;

        std::fs::write(&config_path, test_config).unwrap();

        let builder = ConfigBuilder::builder()
            .add_source(File::from(config_path))
            .build()
            .unwrap();

        let config: Config = builder.try_deserialize().unwrap();
        assert_eq!(config.goals.cholesterol_below, 190);
        assert_eq!(config.goals.ha1c_below, 6.5);
        assert_eq!(config.goals.bp_systolic_below, 130);
        assert!(!config.display.show_updated_section);
        assert!(matches!(config.logging.level, LogLevel::Debug));
        assert!(matches!(config.logging.format, LogFormat::Json));
    }

    #[test]
    fn test_cli_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let seed_path = temp_dir.path().join("seed.toml");
        std::fs::write(&seed_path, "[[physicians]]\nname = \"Dr. Lee\"\n").unwrap();

        let cli = cli(&[
            "--log-level",
            "trace",
            "--seed-file",
            seed_path.to_str().unwrap(),
            "show",
        ]);
        let config = Config::load_with_cli(&cli).unwrap();
        assert!(matches!(config.logging.level, LogLevel::Trace));
        assert_eq!(config.roster.seed_file, Some(seed_path));
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("PHYSICIAN_METRICS_GOALS__HA1C_BELOW", "6.5");
        let result = Config::load_with_cli(&cli(&["show"]));
        std::env::remove_var("PHYSICIAN_METRICS_GOALS__HA1C_BELOW");

        let config = result.unwrap();
        assert_eq!(config.goals.ha1c_below, 6.5);
        assert_eq!(config.goals.cholesterol_below, 200);
    }

    #[test]
    fn test_missing_config_file() {
        let cli = cli(&["--config", "/nonexistent/physician-metrics.toml"]);
        assert!(Config::load_with_cli(&cli).is_err());
    }

    #[test]
    fn test_invalid_goals_rejected() {
        let mut config = Config::default();
        config.goals.ha1c_below = 20.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.goals.bp_diastolic_below = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_seed_file_rejected() {
        let mut config = Config::default();
        config.roster.seed_file = Some(PathBuf::from("/nonexistent/seed.toml"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");
        Config::default().save_to_file(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Config = toml::from_str(&content).unwrap();
        assert_eq!(parsed.goals, GoalThresholds::default());
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(LogLevel::Info), Level::INFO);
        assert_eq!(Level::from(LogLevel::Debug), Level::DEBUG);
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
    }
}
