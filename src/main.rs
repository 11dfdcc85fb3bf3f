mod config;
mod models;
mod provider;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use crate::config::{get_config_dir, load_config};
use crate::provider::SimulatedProvider;
use crate::ui::{App, render};

fn main() -> io::Result<()> {
    // 日志走 stderr，RUST_LOG 控制级别
    pretty_env_logger::init();

    // 配置文件路径 (~/.config/lodestar/config.toml)
    let config_path = get_config_dir()?.join("config.toml");
    let config = load_config(&config_path)?;
    log::info!(
        "loaded config, region {}",
        config.region.registry_key()
    );

    // 创建应用状态，提供者按依赖注入方式传入
    let provider = SimulatedProvider::new(config.simulator.clone());
    let mut app = App::new(config, Box::new(provider));

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        // 既等按键也等提供者事件，短超时轮询
        if crossterm::event::poll(Duration::from_millis(100))? {
            if let crossterm::event::Event::Key(key) = crossterm::event::read()? {
                if key.kind == crossterm::event::KeyEventKind::Press {
                    if ui::handle_key_event(app, key.code)? {
                        break;
                    }
                }
            }
        }

        app.poll_provider();
    }

    // 退出前确保订阅已撤销
    if app.is_ranging() {
        app.stop_ranging();
    }

    Ok(())
}
