//! 业务逻辑处理 (Update/Dispatch)
//!
//! 测距会话的启动/停止与提供者回调的处理

use std::sync::mpsc::{Receiver, TryRecvError};

use chrono::Local;

use super::actions::Action;
use super::state::{App, AppMode, ConfirmAction, Screen};
use crate::models::{Beacon, RangingEvent, sort_beacons_by_distance};
use crate::provider::{ProviderError, ProviderEvent};

impl App {
    /// 核心逻辑分发
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => {
                // 测距进行中先确认再退出
                if self.is_ranging() {
                    self.mode = AppMode::Confirm(ConfirmAction::Quit);
                } else {
                    return true;
                }
            }

            Action::Submit => {
                if let AppMode::Confirm(ConfirmAction::Quit) = self.mode {
                    self.stop_ranging();
                    return true;
                }
            }

            Action::Cancel => {
                self.mode = AppMode::Normal;
                self.message = None;
            }

            Action::MoveSelectionUp => self.move_up(),
            Action::MoveSelectionDown => self.move_down(),

            Action::StartRanging => self.start_ranging(),
            Action::StopRanging => self.stop_ranging(),

            Action::Range(event) => self.on_range(event),
            Action::ProviderError(message) => self.on_error(&message),
        }
        false
    }

    // ============ 导航相关 ============

    /// 向上移动选择
    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// 向下移动选择
    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.display_list.len() {
            self.selected_index += 1;
        }
    }

    // ============ 测距会话 ============

    /// 开始测距
    ///
    /// 依次请求授权、透传云端凭据、订阅固定区域；
    /// 清空显示表面并切换到测距屏幕。失败时留在主屏幕。
    pub fn start_ranging(&mut self) {
        if self.is_ranging() {
            self.message = Some("测距已在进行".to_string());
            return;
        }

        self.display_list.clear();
        self.selected_index = 0;
        self.last_update = None;

        match self.try_start_session() {
            Ok(rx) => {
                self.events = Some(rx);
                self.screen = Screen::Ranging;
                self.message = Some(format!("测距已开始: {}", self.region.registry_key()));
            }
            Err(e) => {
                log::error!("failed to start ranging: {e}");
                self.screen = Screen::Home;
                self.message = Some(format!("无法开始测距: {e}"));
            }
        }
    }

    fn try_start_session(&mut self) -> Result<Receiver<ProviderEvent>, ProviderError> {
        self.provider.request_always_authorization()?;
        self.provider
            .setup_app_id_and_token(&self.cloud.app_id, &self.cloud.app_token)?;
        self.provider.start_ranging(&self.region)
    }

    /// 停止测距并返回主屏幕
    ///
    /// 只撤销后续事件的订阅；已在途的回调不做显式处理。
    pub fn stop_ranging(&mut self) {
        if self.events.take().is_some() {
            if let Err(e) = self.provider.stop_ranging(&self.region) {
                log::warn!("failed to stop ranging: {e}");
            }
            self.message = Some("测距已停止".to_string());
        }
        self.mode = AppMode::Normal;
        self.screen = Screen::Home;
    }

    // ============ 提供者回调 ============

    /// 测距数据回调
    ///
    /// 清空显示表面，校验并丢弃坏记录，按距离升序整体重建
    pub fn on_range(&mut self, event: RangingEvent) {
        let mut beacons = Vec::with_capacity(event.beacons.len());
        for raw in event.beacons {
            match Beacon::from_raw(raw) {
                Ok(beacon) => beacons.push(beacon),
                Err(e) => log::warn!("dropping malformed beacon record: {e}"),
            }
        }

        sort_beacons_by_distance(&mut beacons);

        self.display_list = beacons;
        self.clamp_selection();
        self.last_update = Some(Local::now());
    }

    /// 测距错误回调：记录日志，不改动显示表面，不重试
    pub fn on_error(&mut self, message: &str) {
        log::warn!("ranging error: {message}");
    }

    /// 取走通道中积压的提供者事件并逐个处理
    pub fn poll_provider(&mut self) {
        let Some(rx) = &self.events else {
            return;
        };

        let mut drained = Vec::new();
        let mut disconnected = false;
        loop {
            match rx.try_recv() {
                Ok(event) => drained.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        for event in drained {
            let action = match event {
                ProviderEvent::Range(ranging) => Action::Range(ranging),
                ProviderEvent::Error(message) => Action::ProviderError(message),
            };
            self.dispatch(action);
        }

        if disconnected {
            log::warn!("provider channel disconnected, tearing down session");
            self.events = None;
            if let Err(e) = self.provider.stop_ranging(&self.region) {
                log::debug!("stop after disconnect: {e}");
            }
            self.message = Some("提供者连接已断开".to_string());
        }
    }
}
