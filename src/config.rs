//! 应用配置
//!
//! 从 ~/.config/lodestar/config.toml 加载；文件不存在时使用默认值

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::BeaconRegion;

/// 厂商信标出厂默认的区域 UUID
pub const DEFAULT_REGION_UUID: &str = "b9407f30-f5f8-466e-aff9-25556b57fe6d";

/// 云端凭据，原样透传给提供者
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudConfig {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub app_token: String,
}

/// 内置模拟提供者的参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    pub beacon_count: usize,
    pub interval_ms: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            beacon_count: 5,
            interval_ms: 1000,
        }
    }
}

/// 配置文件结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cloud: CloudConfig,
    #[serde(default = "default_region")]
    pub region: BeaconRegion,
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

fn default_region() -> BeaconRegion {
    // 出厂 UUID 是合法常量，解析不会失败
    BeaconRegion::new(Uuid::parse_str(DEFAULT_REGION_UUID).unwrap())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cloud: CloudConfig::default(),
            region: default_region(),
            simulator: SimulatorConfig::default(),
        }
    }
}

/// 获取配置目录路径 (~/.config/lodestar/)
pub fn get_config_dir() -> io::Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "无法获取用户配置目录"))?
        .join("lodestar");

    fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}

/// 从 TOML 文件加载配置，文件缺失时返回默认配置
pub fn load_config(path: &Path) -> io::Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)?;
    let config: Config =
        toml::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    Ok(config)
}
