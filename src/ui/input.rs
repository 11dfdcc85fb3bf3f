//! 键盘事件映射 (Input -> Action)
//!
//! 将按键事件转换为 Action

use std::io;

use crossterm::event::KeyCode;

use super::actions::Action;
use super::state::{App, AppMode, Screen};

/// 根据当前屏幕、模式和按键获取对应的 Action
pub fn get_action(screen: Screen, mode: &AppMode, key: KeyCode) -> Option<Action> {
    if let AppMode::Confirm(_) = mode {
        return match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::Submit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        };
    }

    match screen {
        Screen::Home => match key {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('r') | KeyCode::Enter => Some(Action::StartRanging),
            _ => None,
        },
        Screen::Ranging => match key {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('x') | KeyCode::Esc => Some(Action::StopRanging),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveSelectionDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveSelectionUp),
            _ => None,
        },
    }
}

/// 处理按键事件
pub fn handle_key_event(app: &mut App, key: KeyCode) -> io::Result<bool> {
    if let Some(action) = get_action(app.screen, &app.mode, key) {
        Ok(app.dispatch(action))
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::state::ConfirmAction;

    #[test]
    fn test_home_screen_keys() {
        let mode = AppMode::Normal;
        assert_eq!(
            get_action(Screen::Home, &mode, KeyCode::Char('r')),
            Some(Action::StartRanging)
        );
        assert_eq!(
            get_action(Screen::Home, &mode, KeyCode::Char('q')),
            Some(Action::Quit)
        );
        assert_eq!(get_action(Screen::Home, &mode, KeyCode::Char('j')), None);
    }

    #[test]
    fn test_ranging_screen_keys() {
        let mode = AppMode::Normal;
        assert_eq!(
            get_action(Screen::Ranging, &mode, KeyCode::Esc),
            Some(Action::StopRanging)
        );
        assert_eq!(
            get_action(Screen::Ranging, &mode, KeyCode::Down),
            Some(Action::MoveSelectionDown)
        );
        assert_eq!(
            get_action(Screen::Ranging, &mode, KeyCode::Char('k')),
            Some(Action::MoveSelectionUp)
        );
    }

    #[test]
    fn test_confirm_mode_overrides_screen_keys() {
        let mode = AppMode::Confirm(ConfirmAction::Quit);
        assert_eq!(
            get_action(Screen::Ranging, &mode, KeyCode::Char('y')),
            Some(Action::Submit)
        );
        assert_eq!(
            get_action(Screen::Ranging, &mode, KeyCode::Esc),
            Some(Action::Cancel)
        );
        assert_eq!(get_action(Screen::Ranging, &mode, KeyCode::Char('j')), None);
    }
}
