mod app;
mod backend;
mod view;

use std::fs::File;
use std::time::Duration;

use kitpanel_core::bridge::{OscBridge, WriterBridge};
use kitpanel_core::config::Config;
use kitpanel_core::panel::DrumPanel;

use app::App;
use backend::{AppEvent, RatatuiBackend};
use view::PanelLayout;

fn init_logging(verbose: bool) {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("kitpanel")
        .join("kitpanel.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path).or_else(|_| File::create("/tmp/kitpanel.log")) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("kitpanel: cannot create log file: {}", e);
            return;
        }
    };

    if let Err(e) = WriteLogger::init(log_level, simplelog::Config::default(), log_file) {
        eprintln!("kitpanel: failed to initialize logger: {}", e);
        return;
    }

    log::info!("kitpanel starting (log level: {:?})", log_level);
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1).cloned())
}

/// Pick the host bridge: `--osc ADDR`, then the configured OSC target, then
/// `--events FILE`, then `--preview-host`. Otherwise no host is attached.
fn attach_host(app: &mut App, args: &[String], config: &Config) {
    let osc = flag_value(args, "--osc").or_else(|| config.osc_addr().map(str::to_string));
    if let Some(addr) = osc {
        match OscBridge::new(&addr) {
            Ok(bridge) => {
                app.set_bridge(bridge, format!("osc {}", addr));
                return;
            }
            Err(e) => log::warn!(target: "bridge", "OSC bridge to {} unavailable: {}", addr, e),
        }
    }

    if let Some(path) = flag_value(args, "--events") {
        match File::create(&path) {
            Ok(file) => {
                app.set_bridge(WriterBridge::new(file), format!("events {}", path));
                return;
            }
            Err(e) => log::warn!(target: "bridge", "cannot open {}: {}", path, e),
        }
    }

    if args.iter().any(|a| a == "--preview-host") {
        app.attach_preview_host();
    }
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    init_logging(verbose);

    let config = Config::load();
    let mut app = App::new(DrumPanel::new(&config));
    attach_host(&mut app, &args, &config);

    let mut backend = RatatuiBackend::new()?;
    backend.start()?;

    let result = run(&mut backend, &mut app);

    backend.stop()?;
    result
}

fn run(backend: &mut RatatuiBackend, app: &mut App) -> std::io::Result<()> {
    // Last render area, for mouse hit-testing
    let mut layout = PanelLayout::new(ratatui::layout::Rect::new(0, 0, 80, 24));

    loop {
        backend.draw(|frame| {
            layout = PanelLayout::new(frame.area());
            view::render(frame, app, &layout);
        })?;

        match backend.poll_event(Duration::from_millis(50)) {
            Some(AppEvent::Key(key)) => {
                if !app.handle_key(key) {
                    break;
                }
            }
            Some(AppEvent::Mouse(event)) => app.handle_mouse(event, &layout),
            Some(AppEvent::Resize(_, _)) | None => {}
        }
    }

    log::info!("kitpanel exiting");
    Ok(())
}
