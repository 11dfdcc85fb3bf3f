//! App 状态定义 (Model)
//!
//! 包含应用状态结构体及相关枚举

use std::sync::mpsc::Receiver;

use chrono::{DateTime, Local};

use crate::config::{CloudConfig, Config};
use crate::models::{Beacon, BeaconRegion};
use crate::provider::{BeaconProvider, ProviderEvent};

/// 当前显示的屏幕
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    Home,
    Ranging,
}

/// 应用模式
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    Confirm(ConfirmAction),
}

/// 确认操作类型
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmAction {
    /// 测距进行中退出程序
    Quit,
}

/// 应用状态
///
/// 提供者以依赖注入方式传入，不读取任何全局环境。
/// display_list 即显示表面：每次测距更新整体替换，不做增量修改。
pub struct App {
    pub provider: Box<dyn BeaconProvider>,
    pub cloud: CloudConfig,
    pub region: BeaconRegion,
    pub screen: Screen,
    pub mode: AppMode,
    pub display_list: Vec<Beacon>,
    pub selected_index: usize,
    pub message: Option<String>,
    pub last_update: Option<DateTime<Local>>,
    pub events: Option<Receiver<ProviderEvent>>,
}

impl App {
    /// 创建新的应用实例
    pub fn new(config: Config, provider: Box<dyn BeaconProvider>) -> Self {
        Self {
            provider,
            cloud: config.cloud,
            region: config.region,
            screen: Screen::Home,
            mode: AppMode::Normal,
            display_list: Vec::new(),
            selected_index: 0,
            message: None,
            last_update: None,
            events: None,
        }
    }

    /// 是否存在进行中的测距订阅
    pub fn is_ranging(&self) -> bool {
        self.events.is_some()
    }

    /// 获取当前选中的信标
    pub fn selected_beacon(&self) -> Option<&Beacon> {
        self.display_list.get(self.selected_index)
    }

    /// 显示列表替换后确保选中索引有效
    pub fn clamp_selection(&mut self) {
        if self.display_list.is_empty() {
            self.selected_index = 0;
        } else if self.selected_index >= self.display_list.len() {
            self.selected_index = self.display_list.len() - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BeaconColor, Proximity, RawBeacon, Beacon};
    use crate::provider::ProviderError;
    use uuid::Uuid;

    /// 不产出任何事件的空提供者
    pub struct NullProvider;

    impl BeaconProvider for NullProvider {
        fn request_always_authorization(&mut self) -> Result<(), ProviderError> {
            Ok(())
        }

        fn setup_app_id_and_token(&mut self, _: &str, _: &str) -> Result<(), ProviderError> {
            Ok(())
        }

        fn start_ranging(
            &mut self,
            _: &BeaconRegion,
        ) -> Result<Receiver<ProviderEvent>, ProviderError> {
            let (_tx, rx) = std::sync::mpsc::channel();
            Ok(rx)
        }

        fn stop_ranging(&mut self, _: &BeaconRegion) -> Result<(), ProviderError> {
            Ok(())
        }
    }

    fn beacon(distance: f64) -> Beacon {
        Beacon::from_raw(RawBeacon {
            proximity_uuid: Some("b9407f30-f5f8-466e-aff9-25556b57fe6d".to_string()),
            major: Some(1),
            minor: Some(1),
            proximity: Some("near".to_string()),
            color: Some("white".to_string()),
            distance: Some(distance),
            mac_address: None,
            rssi: None,
        })
        .unwrap()
    }

    #[test]
    fn test_new_app_starts_inactive_on_home_screen() {
        let app = App::new(Config::default(), Box::new(NullProvider));
        assert_eq!(app.screen, Screen::Home);
        assert!(!app.is_ranging());
        assert!(app.display_list.is_empty());
        assert_eq!(
            app.region.uuid,
            Uuid::parse_str(crate::config::DEFAULT_REGION_UUID).unwrap()
        );
    }

    #[test]
    fn test_clamp_selection() {
        let mut app = App::new(Config::default(), Box::new(NullProvider));
        app.display_list = vec![beacon(1.0), beacon(2.0)];
        app.selected_index = 5;
        app.clamp_selection();
        assert_eq!(app.selected_index, 1);

        app.display_list.clear();
        app.clamp_selection();
        assert_eq!(app.selected_index, 0);
        assert!(app.selected_beacon().is_none());
    }

    #[test]
    fn test_selected_beacon() {
        let mut app = App::new(Config::default(), Box::new(NullProvider));
        app.display_list = vec![beacon(1.0), beacon(2.0)];
        app.selected_index = 1;
        let selected = app.selected_beacon().unwrap();
        assert_eq!(selected.distance, 2.0);
        assert_eq!(selected.proximity, Proximity::Near);
        assert_eq!(selected.color, BeaconColor::White);
    }
}
