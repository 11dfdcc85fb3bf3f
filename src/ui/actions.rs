//! Action 枚举定义 (Intent)
//!
//! 按键输入与提供者事件统一转化为语义化 Action

use crate::models::RangingEvent;

/// 应用操作枚举
///
/// 前一组来自键盘，后两个来自提供者通道
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    MoveSelectionUp,
    MoveSelectionDown,

    // 测距会话控制
    StartRanging,
    StopRanging,

    // 确认对话框
    Cancel, // Esc / n
    Submit, // y

    // 提供者回调
    Range(RangingEvent),
    ProviderError(String),
}
