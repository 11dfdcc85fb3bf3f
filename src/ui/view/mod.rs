//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件

pub mod components;
pub mod layouts;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use super::state::{App, AppMode, ConfirmAction, Screen};
use components::{beacon_color_style, beacon_list_line};
use layouts::centered_rect;

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &mut App) {
    match app.screen {
        Screen::Home => render_home(frame, app),
        Screen::Ranging => render_ranging(frame, app),
    }

    // 渲染弹窗
    if let AppMode::Confirm(action) = &app.mode {
        render_confirm_dialog(frame, action);
    }
}

fn render_home(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Min(8),    // 配置概览
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    render_title(frame, chunks[0]);
    render_overview(frame, app, chunks[1]);
    render_help(frame, app, chunks[2]);
}

fn render_ranging(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Min(10),   // 信标列表
            Constraint::Length(6), // 详情
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    render_title(frame, chunks[0]);
    render_beacon_list(frame, app, chunks[1]);
    render_details(frame, app, chunks[2]);
    render_help(frame, app, chunks[3]);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new("📡 Lodestar 信标测距")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_overview(frame: &mut Frame, app: &App, area: Rect) {
    let app_id = if app.cloud.app_id.is_empty() {
        "(未配置)"
    } else {
        &app.cloud.app_id
    };

    let content = format!(
        "区域: {}\nApp ID: {}\n\n按 'r' 开始对该区域的测距，检测到的信标将按距离升序显示。",
        app.region.registry_key(),
        app_id,
    );

    let overview = Paragraph::new(content)
        .block(Block::default().title("配置").borders(Borders::ALL))
        .wrap(Wrap { trim: true });

    frame.render_widget(overview, area);
}

fn render_beacon_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .display_list
        .iter()
        .enumerate()
        .map(|(i, beacon)| {
            let content = beacon_list_line(beacon);

            let style = if i == app.selected_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                beacon_color_style(beacon.color)
            };

            ListItem::new(Line::from(vec![Span::styled(content, style)]))
        })
        .collect();

    let title = match &app.last_update {
        Some(ts) => format!(
            "信标列表 ({} 个，更新于 {})",
            app.display_list.len(),
            ts.format("%H:%M:%S")
        ),
        None => "信标列表 (等待数据…)".to_string(),
    };

    let list_widget = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(list_widget, area, &mut state);
}

fn render_details(frame: &mut Frame, app: &App, area: Rect) {
    let content = if let Some(beacon) = app.selected_beacon() {
        format!(
            "UUID: {}\nMajor: {}  Minor: {}  Proximity: {}  距离: {:.2}m\n配色: {}  信号: {}  MAC: {}",
            beacon.proximity_uuid,
            beacon.major,
            beacon.minor,
            beacon.proximity,
            beacon.distance,
            beacon.color.as_str(),
            beacon
                .rssi
                .map_or_else(|| "-".to_string(), |r| format!("{r} dBm")),
            beacon.mac_address.as_deref().unwrap_or("-"),
        )
    } else {
        "暂无信标，等待提供者送达测距数据".to_string()
    };

    let details = Paragraph::new(content)
        .block(Block::default().title("详情").borders(Borders::ALL))
        .wrap(Wrap { trim: true });

    frame.render_widget(details, area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match (&app.mode, app.screen) {
        (AppMode::Confirm(_), _) => "[y] 确认  [n] 取消",
        (_, Screen::Home) => "[r] 开始测距  [q] 退出",
        (_, Screen::Ranging) => "[j/k] 选择  [x/Esc] 停止并返回  [q] 退出",
    };

    let message = app.message.as_deref().unwrap_or("");
    let text = if message.is_empty() {
        help_text.to_string()
    } else {
        format!("{}  |  {}", help_text, message)
    };

    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}

fn render_confirm_dialog(frame: &mut Frame, action: &ConfirmAction) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);

    let message = match action {
        ConfirmAction::Quit => "测距仍在进行，确认停止并退出？",
    };

    let dialog = Paragraph::new(format!("{}\n\n[y] 确认  [n] 取消", message))
        .style(Style::default().fg(Color::Red))
        .block(Block::default().title("⚠️ 确认操作").borders(Borders::ALL));

    frame.render_widget(dialog, area);
}
