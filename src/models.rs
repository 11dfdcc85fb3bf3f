//! 信标数据模型
//!
//! 提供者边界上的松散记录 (RawBeacon) 与校验后的值类型 (Beacon)，
//! 以及测距区域和单次测距事件的定义

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// 信标距离分级
///
/// 对应提供者回调中的 "unknown" / "immediate" / "near" / "far"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Proximity {
    #[default]
    Unknown, // 距离缺失或非法
    Immediate, // < 0.5m
    Near,      // < 3m
    Far,
}

impl Proximity {
    /// 按惯用阈值从估算距离推导分级
    pub fn from_distance(distance: f64) -> Self {
        if !distance.is_finite() || distance < 0.0 {
            Proximity::Unknown
        } else if distance < 0.5 {
            Proximity::Immediate
        } else if distance < 3.0 {
            Proximity::Near
        } else {
            Proximity::Far
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Proximity::Unknown => "unknown",
            Proximity::Immediate => "immediate",
            Proximity::Near => "near",
            Proximity::Far => "far",
        }
    }

    /// 宽松解析提供者传来的字符串，未知值一律归为 Unknown
    pub fn from_provider_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "immediate" => Proximity::Immediate,
            "near" => Proximity::Near,
            "far" => Proximity::Far,
            _ => Proximity::Unknown,
        }
    }
}

impl std::fmt::Display for Proximity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 信标外壳配色（厂商命名）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BeaconColor {
    #[default]
    Unknown,
    IcyMarshmallow,
    BlueberryPie,
    MintCocktail,
    LemonTart,
    CandyFloss,
    SweetBeetroot,
    VanillaJar,
    LiquoriceSwirl,
    White,
    Transparent,
}

impl BeaconColor {
    /// 宽松解析："mint_cocktail" / "MintCocktail" / "mint cocktail" 均可
    pub fn from_provider_str(value: &str) -> Self {
        let normalized: String = value
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "icymarshmallow" => BeaconColor::IcyMarshmallow,
            "blueberrypie" => BeaconColor::BlueberryPie,
            "mintcocktail" => BeaconColor::MintCocktail,
            "lemontart" => BeaconColor::LemonTart,
            "candyfloss" => BeaconColor::CandyFloss,
            "sweetbeetroot" => BeaconColor::SweetBeetroot,
            "vanillajar" => BeaconColor::VanillaJar,
            "liquoriceswirl" => BeaconColor::LiquoriceSwirl,
            "white" => BeaconColor::White,
            "transparent" => BeaconColor::Transparent,
            _ => BeaconColor::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BeaconColor::Unknown => "unknown",
            BeaconColor::IcyMarshmallow => "icy marshmallow",
            BeaconColor::BlueberryPie => "blueberry pie",
            BeaconColor::MintCocktail => "mint cocktail",
            BeaconColor::LemonTart => "lemon tart",
            BeaconColor::CandyFloss => "candy floss",
            BeaconColor::SweetBeetroot => "sweet beetroot",
            BeaconColor::VanillaJar => "vanilla jar",
            BeaconColor::LiquoriceSwirl => "liquorice swirl",
            BeaconColor::White => "white",
            BeaconColor::Transparent => "transparent",
        }
    }
}

/// 提供者回调送来的松散信标记录
///
/// 所有字段均为可选，进入显示层之前必须经过 [`Beacon::from_raw`] 校验。
/// Android 端把距离估算叫 "accuracy"，用 alias 兼容。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBeacon {
    #[serde(rename = "proximityUUID")]
    pub proximity_uuid: Option<String>,
    pub major: Option<u32>,
    pub minor: Option<u32>,
    pub proximity: Option<String>,
    pub color: Option<String>,
    #[serde(alias = "accuracy")]
    pub distance: Option<f64>,
    pub mac_address: Option<String>,
    pub rssi: Option<i32>,
}

/// 信标记录校验失败
#[derive(Debug, Error, PartialEq)]
pub enum BeaconFieldError {
    #[error("missing required field `{0}`")]
    Missing(&'static str),
    #[error("field `{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: u32 },
    #[error("invalid proximityUUID: {0}")]
    BadUuid(String),
}

/// 校验后的信标值类型
///
/// 仅在一次测距回调期间存在，不做持久化。
#[derive(Debug, Clone, PartialEq)]
pub struct Beacon {
    pub proximity_uuid: Uuid,
    pub major: u16,
    pub minor: u16,
    pub proximity: Proximity,
    pub color: BeaconColor,
    pub distance: f64,
    pub mac_address: Option<String>,
    pub rssi: Option<i32>,
}

impl Beacon {
    /// 在提供者边界把松散记录转换为强类型值
    ///
    /// uuid / major / minor / distance 缺失视为坏记录；
    /// proximity 与 color 缺失按提供者惯例退化为 unknown。
    pub fn from_raw(raw: RawBeacon) -> Result<Self, BeaconFieldError> {
        let uuid_text = raw
            .proximity_uuid
            .ok_or(BeaconFieldError::Missing("proximityUUID"))?;
        let proximity_uuid =
            Uuid::parse_str(&uuid_text).map_err(|_| BeaconFieldError::BadUuid(uuid_text))?;

        let major = raw.major.ok_or(BeaconFieldError::Missing("major"))?;
        let major = u16::try_from(major).map_err(|_| BeaconFieldError::OutOfRange {
            field: "major",
            value: major,
        })?;

        let minor = raw.minor.ok_or(BeaconFieldError::Missing("minor"))?;
        let minor = u16::try_from(minor).map_err(|_| BeaconFieldError::OutOfRange {
            field: "minor",
            value: minor,
        })?;

        let distance = raw.distance.ok_or(BeaconFieldError::Missing("distance"))?;

        let proximity = raw
            .proximity
            .as_deref()
            .map(Proximity::from_provider_str)
            .unwrap_or_default();

        let color = raw
            .color
            .as_deref()
            .map(BeaconColor::from_provider_str)
            .unwrap_or_default();

        Ok(Beacon {
            proximity_uuid,
            major,
            minor,
            proximity,
            color,
            distance,
            mac_address: raw.mac_address,
            rssi: raw.rssi,
        })
    }
}

/// 测距区域（提供者定义的检测范围）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeaconRegion {
    pub uuid: Uuid,
    #[serde(default)]
    pub major: Option<u16>,
    #[serde(default)]
    pub minor: Option<u16>,
}

impl BeaconRegion {
    pub fn new(uuid: Uuid) -> Self {
        Self {
            uuid,
            major: None,
            minor: None,
        }
    }

    /// 区域注册表键："uuid:major:minor"，缺省部分记为 0
    pub fn registry_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.uuid,
            self.major.map_or_else(|| "0".to_string(), |m| m.to_string()),
            self.minor.map_or_else(|| "0".to_string(), |m| m.to_string()),
        )
    }
}

/// 一次测距回调携带的数据
///
/// beacons 保持提供者送达时的顺序，显示前由组件自行排序。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangingEvent {
    pub region: BeaconRegion,
    pub beacons: Vec<RawBeacon>,
}

/// 按估算距离升序排序（稳定，全序）
pub fn sort_beacons_by_distance(beacons: &mut [Beacon]) {
    beacons.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}
