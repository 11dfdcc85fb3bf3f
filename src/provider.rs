//! 信标提供者接口
//!
//! 对应厂商 SDK 的四个入口：授权、云端凭据、开始/停止测距。
//! 回调通过 mpsc 通道送回 UI 线程，显示状态只在 UI 线程被修改。

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::config::SimulatorConfig;
use crate::models::{BeaconRegion, Proximity, RangingEvent, RawBeacon};

/// 提供者边界错误
#[derive(Debug, Error, PartialEq)]
pub enum ProviderError {
    #[error("location authorization has not been requested")]
    NotAuthorized,
    #[error("region is already being ranged: {0}")]
    AlreadyRanging(String),
    #[error("region is not being ranged: {0}")]
    NotRanging(String),
}

/// 提供者异步送达的事件
///
/// Range / Error 对应 SDK 的 onRange / onError 两个回调
#[derive(Debug, Clone)]
pub enum ProviderEvent {
    Range(RangingEvent),
    Error(String),
}

/// 信标提供者（厂商 SDK 的抽象接口）
///
/// 同一区域最多只能有一个进行中的测距订阅，以 registry_key 为准。
pub trait BeaconProvider {
    /// 请求定位/信标访问权限
    fn request_always_authorization(&mut self) -> Result<(), ProviderError>;

    /// 配置云端会话凭据（原样透传，不做解释）
    fn setup_app_id_and_token(
        &mut self,
        app_id: &str,
        app_token: &str,
    ) -> Result<(), ProviderError>;

    /// 开始测距，事件经由返回的通道送达
    fn start_ranging(
        &mut self,
        region: &BeaconRegion,
    ) -> Result<Receiver<ProviderEvent>, ProviderError>;

    /// 停止测距；只阻止后续事件，不撤回已入队的事件
    fn stop_ranging(&mut self, region: &BeaconRegion) -> Result<(), ProviderError>;
}

/// 内置模拟提供者
///
/// 每个测距会话一个线程：按 interval_ms 产出一批距离做随机游走的信标。
pub struct SimulatedProvider {
    settings: SimulatorConfig,
    authorized: bool,
    credentials: Option<(String, String)>,
    sessions: HashMap<String, Arc<AtomicBool>>,
}

impl SimulatedProvider {
    pub fn new(settings: SimulatorConfig) -> Self {
        Self {
            settings,
            authorized: false,
            credentials: None,
            sessions: HashMap::new(),
        }
    }
}

impl BeaconProvider for SimulatedProvider {
    fn request_always_authorization(&mut self) -> Result<(), ProviderError> {
        self.authorized = true;
        log::info!("simulated provider: always authorization granted");
        Ok(())
    }

    fn setup_app_id_and_token(
        &mut self,
        app_id: &str,
        app_token: &str,
    ) -> Result<(), ProviderError> {
        self.credentials = Some((app_id.to_string(), app_token.to_string()));
        log::debug!("simulated provider: cloud session configured, app_id={app_id}");
        Ok(())
    }

    fn start_ranging(
        &mut self,
        region: &BeaconRegion,
    ) -> Result<Receiver<ProviderEvent>, ProviderError> {
        if !self.authorized {
            return Err(ProviderError::NotAuthorized);
        }
        if self.credentials.is_none() {
            log::warn!("simulated provider: ranging without cloud credentials");
        }

        let key = region.registry_key();
        if self.sessions.contains_key(&key) {
            return Err(ProviderError::AlreadyRanging(key));
        }

        let (tx, rx) = channel();
        let running = Arc::new(AtomicBool::new(true));
        self.sessions.insert(key.clone(), Arc::clone(&running));

        let region = region.clone();
        let settings = self.settings.clone();
        thread::spawn(move || run_session(region, settings, running, tx));

        log::info!("simulated provider: start ranging region {key}");
        Ok(rx)
    }

    fn stop_ranging(&mut self, region: &BeaconRegion) -> Result<(), ProviderError> {
        let key = region.registry_key();
        match self.sessions.remove(&key) {
            Some(running) => {
                running.store(false, Ordering::SeqCst);
                log::info!("simulated provider: stop ranging region {key}");
                Ok(())
            }
            None => Err(ProviderError::NotRanging(key)),
        }
    }
}

/// 会话线程中一个模拟信标的持久身份
struct SimBeacon {
    major: u16,
    minor: u16,
    color: &'static str,
    mac: String,
    distance: f64,
}

/// 厂商调色板，按序循环分配给模拟信标
const SIM_COLORS: [&str; 5] = [
    "icy_marshmallow",
    "blueberry_pie",
    "mint_cocktail",
    "lemon_tart",
    "candy_floss",
];

fn run_session(
    region: BeaconRegion,
    settings: SimulatorConfig,
    running: Arc<AtomicBool>,
    tx: Sender<ProviderEvent>,
) {
    let mut rng = rand::thread_rng();

    let mut fleet: Vec<SimBeacon> = (0..settings.beacon_count)
        .map(|i| SimBeacon {
            major: region.major.unwrap_or(1000 + i as u16),
            minor: region.minor.unwrap_or(i as u16 + 1),
            color: SIM_COLORS[i % SIM_COLORS.len()],
            mac: format!("d3:4a:99:02:aa:{:02x}", i + 1),
            distance: rng.gen_range(0.3..8.0),
        })
        .collect();

    while running.load(Ordering::SeqCst) {
        // 偶发一次测距错误，走 onError 路径
        if rng.gen_bool(0.02) {
            if tx
                .send(ProviderEvent::Error(
                    "simulated bluetooth interruption".to_string(),
                ))
                .is_err()
            {
                break;
            }
        }

        for beacon in &mut fleet {
            beacon.distance = (beacon.distance + rng.gen_range(-0.4..0.4)).clamp(0.3, 12.0);
        }

        let mut beacons: Vec<RawBeacon> = fleet
            .iter()
            .map(|b| RawBeacon {
                proximity_uuid: Some(region.uuid.to_string()),
                major: Some(b.major as u32),
                minor: Some(b.minor as u32),
                proximity: Some(Proximity::from_distance(b.distance).as_str().to_string()),
                color: Some(b.color.to_string()),
                distance: Some(b.distance),
                mac_address: Some(b.mac.clone()),
                // 简化的路径损耗换算
                rssi: Some((-59.0 - 20.0 * b.distance.max(0.1).log10()) as i32),
            })
            .collect();

        // 送达顺序不做保证，由显示层自行排序
        beacons.shuffle(&mut rng);

        let event = RangingEvent {
            region: region.clone(),
            beacons,
        };
        if tx.send(ProviderEvent::Range(event)).is_err() {
            // 接收端已丢弃订阅
            break;
        }

        thread::sleep(Duration::from_millis(settings.interval_ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn fast_settings() -> SimulatorConfig {
        SimulatorConfig {
            beacon_count: 3,
            interval_ms: 10,
        }
    }

    fn region() -> BeaconRegion {
        BeaconRegion::new(Uuid::parse_str("b9407f30-f5f8-466e-aff9-25556b57fe6d").unwrap())
    }

    fn wait_for_range(rx: &Receiver<ProviderEvent>) -> RangingEvent {
        // 模拟器可能先送出一条错误事件，跳过直到拿到测距数据
        loop {
            match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                ProviderEvent::Range(event) => return event,
                ProviderEvent::Error(_) => continue,
            }
        }
    }

    #[test]
    fn test_start_requires_authorization() {
        let mut provider = SimulatedProvider::new(fast_settings());
        assert_eq!(
            provider.start_ranging(&region()).unwrap_err(),
            ProviderError::NotAuthorized
        );
    }

    #[test]
    fn test_ranging_delivers_configured_beacon_count() {
        let mut provider = SimulatedProvider::new(fast_settings());
        provider.request_always_authorization().unwrap();
        provider
            .setup_app_id_and_token("e-demo-app", "token")
            .unwrap();

        let rx = provider.start_ranging(&region()).unwrap();
        let event = wait_for_range(&rx);

        assert_eq!(event.beacons.len(), 3);
        assert_eq!(event.region, region());
        for raw in &event.beacons {
            assert!(raw.proximity_uuid.is_some());
            assert!(raw.distance.is_some());
        }

        provider.stop_ranging(&region()).unwrap();
    }

    #[test]
    fn test_double_start_is_rejected() {
        let mut provider = SimulatedProvider::new(fast_settings());
        provider.request_always_authorization().unwrap();

        let _rx = provider.start_ranging(&region()).unwrap();
        match provider.start_ranging(&region()) {
            Err(ProviderError::AlreadyRanging(key)) => {
                assert_eq!(key, region().registry_key());
            }
            other => panic!("expected AlreadyRanging, got {other:?}"),
        }

        provider.stop_ranging(&region()).unwrap();
    }

    #[test]
    fn test_stop_unknown_region_is_rejected() {
        let mut provider = SimulatedProvider::new(fast_settings());
        provider.request_always_authorization().unwrap();

        assert_eq!(
            provider.stop_ranging(&region()).unwrap_err(),
            ProviderError::NotRanging(region().registry_key())
        );
    }

    #[test]
    fn test_stop_ends_event_production() {
        let mut provider = SimulatedProvider::new(fast_settings());
        provider.request_always_authorization().unwrap();

        let rx = provider.start_ranging(&region()).unwrap();
        let _ = wait_for_range(&rx);
        provider.stop_ranging(&region()).unwrap();

        // 会话线程在标志清除后退出，通道最终断开
        loop {
            match rx.recv_timeout(Duration::from_secs(5)) {
                Ok(_) => continue, // 已入队的事件仍可被取走
                Err(_) => break,
            }
        }
    }
}
