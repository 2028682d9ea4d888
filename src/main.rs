//! Keystroke Stats - keystroke counter, WPM meter and key heatmap
//!
//! Runs a full-screen dashboard or, headless, logs every update.

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode as CtKeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use keystroke_stats::{
    config::{Config, DisplayMode},
    keyboard::{KeyListener, KeyTransition},
    report::StatsReport,
    stats::{Clock, KeystrokeStats, MonotonicClock},
    storage::FileStore,
    ui::{dashboard, App, AppState, HeadlessLogger},
};

/// Poll period for the headless key listener
const HEADLESS_POLL: Duration = Duration::from_millis(5);
/// How often the headless loop checks for a day boundary
const ROLLOVER_CHECK: Duration = Duration::from_secs(60);

fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let data_dir = config
        .data_dir()
        .context("Could not determine data directory")?;
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;

    init_logging(&config, &data_dir)?;
    info!("Keystroke Stats {} starting", env!("CARGO_PKG_VERSION"));

    let clock: Arc<dyn Clock> = Arc::new(MonotonicClock::new());
    let stats = Arc::new(
        KeystrokeStats::with_store(
            config.stats.clone(),
            Arc::clone(&clock),
            Box::new(FileStore::new(&data_dir)),
        )
        .context("Failed to start statistics engine")?,
    );

    let (event_tx, event_rx) = mpsc::channel::<KeyTransition>();
    let listener = KeyListener::new(clock, event_tx);

    let quit = Arc::new(AtomicBool::new(false));
    ctrlc::set_handler({
        let quit = Arc::clone(&quit);
        move || quit.store(true, Ordering::SeqCst)
    })
    .context("Failed to set Ctrl+C handler")?;

    match config.display.mode {
        DisplayMode::Dashboard => {
            run_dashboard(config, Arc::clone(&stats), listener, event_rx, &quit, &data_dir)?
        }
        DisplayMode::Headless => run_headless(&stats, listener, event_rx, &quit)?,
    }

    let snapshot = stats.snapshot();
    // last handle: dropping the engine flushes a pending save
    drop(stats);

    info!("Keystroke Stats stopped");
    println!("\nKeystroke Stats session complete.");
    println!(
        "Today: {}, Total: {}",
        snapshot.today_keystrokes, snapshot.total_keystrokes
    );
    Ok(())
}

/// `RUST_LOG` wins over the configured level. The dashboard owns the
/// terminal, so its logs go to a file in the data directory.
fn init_logging(config: &Config, data_dir: &Path) -> Result<()> {
    let env = env_logger::Env::default().default_filter_or(config.display.log_level.as_str());
    let mut builder = env_logger::Builder::from_env(env);

    if config.display.mode == DisplayMode::Dashboard {
        let log_path = data_dir.join("keystroke-stats.log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn run_headless(
    stats: &KeystrokeStats,
    mut listener: KeyListener,
    event_rx: Receiver<KeyTransition>,
    quit: &AtomicBool,
) -> Result<()> {
    stats
        .register_callback(Arc::new(HeadlessLogger))
        .context("Failed to register headless logger")?;
    info!("Running headless; press Ctrl+C to stop");

    let mut last_rollover_check = Instant::now();
    while !quit.load(Ordering::SeqCst) {
        listener.poll();
        while let Ok(transition) = event_rx.try_recv() {
            stats.handle_keypress(
                transition.position,
                transition.pressed,
                transition.timestamp_ms,
            );
        }

        if last_rollover_check.elapsed() >= ROLLOVER_CHECK {
            stats.check_rollover();
            last_rollover_check = Instant::now();
        }
        thread::sleep(HEADLESS_POLL);
    }
    Ok(())
}

fn run_dashboard(
    config: Config,
    stats: Arc<KeystrokeStats>,
    mut listener: KeyListener,
    event_rx: Receiver<KeyTransition>,
    quit: &AtomicBool,
    data_dir: &Path,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = config.refresh_interval();
    let mut app = App::new(config, stats);

    let result = (|| -> Result<()> {
        loop {
            listener.poll();
            while let Ok(transition) = event_rx.try_recv() {
                app.process_event(&transition);
            }
            app.tick();

            terminal.draw(|frame| dashboard::draw(frame, &app))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        handle_key(&mut app, key.code, key.modifiers, data_dir);
                    }
                }
            }

            if app.state == AppState::Quitting || quit.load(Ordering::SeqCst) {
                return Ok(());
            }
        }
    })();

    // Restore the terminal even if the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn handle_key(app: &mut App, code: CtKeyCode, modifiers: KeyModifiers, data_dir: &Path) {
    match code {
        CtKeyCode::Char('q') | CtKeyCode::Esc => app.quit(),
        // raw mode swallows the signal
        CtKeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        CtKeyCode::Char('s') => app.save(),
        CtKeyCode::Char('r') => app.reset_today(),
        CtKeyCode::Char('R') => app.reset_all(),
        CtKeyCode::Char('?') => app.toggle_help(),
        CtKeyCode::Char('e') => {
            let path: PathBuf = data_dir.join(StatsReport::default_filename());
            if let Err(e) = app.export_report(&path) {
                error!("Report export failed: {}", e);
            }
        }
        _ => {}
    }
}
