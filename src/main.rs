use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal, ExecutableCommand,
};

use typenaut::audio::AudioFeedback;
use typenaut::consts::{MAX_SUBSTEPS, SIM_DT};
use typenaut::render;
use typenaut::sim::{tick, GamePhase, GameState, TickInput};
use typenaut::{AssetManifest, HighScores, Settings};

const FRAME: Duration = Duration::from_millis(33); // ~30 FPS

fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// What the input drain decided beyond the sim's own commands.
enum LoopControl {
    Continue,
    Quit,
}

/// Drain pending key events into the next tick's input.
fn drain_input(
    rx: &mpsc::Receiver<Event>,
    state: &GameState,
    pending: &mut TickInput,
) -> LoopControl {
    while let Ok(Event::Key(KeyEvent {
        code,
        kind,
        modifiers,
        ..
    })) = rx.try_recv()
    {
        // Key-repeat spamming a word is fine; releases carry nothing
        if kind == KeyEventKind::Release {
            continue;
        }
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                return LoopControl::Quit;
            }
            KeyCode::Esc => match state.phase {
                GamePhase::Menu => return LoopControl::Quit,
                _ => pending.restart = true,
            },
            KeyCode::Enter => pending.start = true,
            KeyCode::Tab => pending.pause = true,
            KeyCode::Char(c) => pending.keys.push(c),
            _ => {}
        }
    }
    LoopControl::Continue
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, settings: &Settings) -> std::io::Result<()> {
    let assets = AssetManifest::load();
    let mut audio = AudioFeedback::new(settings, &assets.tones);
    let mut highscores = HighScores::load();

    let seed = unix_now_secs();
    let mut state = GameState::new(seed, assets);
    log::info!("Starting run with seed {seed}");

    let mut pending = TickInput::default();
    let mut run_recorded = false;
    let mut last = Instant::now();
    let mut accumulator = 0.0f32;
    let mut fps = 0.0f32;

    loop {
        let frame_start = Instant::now();

        if let LoopControl::Quit = drain_input(rx, &state, &mut pending) {
            break;
        }

        // Fixed-timestep stepping; input applies to the first substep
        let now = Instant::now();
        let frame_dt = (now - last).as_secs_f32();
        accumulator += frame_dt;
        last = now;
        if frame_dt > 0.0 {
            fps = fps * 0.9 + (1.0 / frame_dt) * 0.1;
        }

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = std::mem::take(&mut pending);
            tick(&mut state, &input, SIM_DT);
            substeps += 1;
            accumulator -= SIM_DT;
        }
        if substeps == MAX_SUBSTEPS && accumulator >= SIM_DT {
            // Fell too far behind (suspend, SIGSTOP); drop the backlog
            log::debug!("Dropping {accumulator:.2}s of simulation backlog");
            accumulator = 0.0;
        }

        for event in state.events.drain(..) {
            audio.play(event);
        }

        // Record the leaderboard entry once per finished run
        match state.phase {
            GamePhase::GameOver | GamePhase::LevelComplete if !run_recorded => {
                run_recorded = true;
                let level = state.level_id().map(|id| id.name()).unwrap_or("Menu");
                if let Some(rank) = highscores.add_score(state.player.score(), level, unix_now_secs())
                {
                    log::info!("New high score rank {rank}: {}", state.player.score());
                    highscores.save();
                }
            }
            GamePhase::Playing | GamePhase::Menu => run_recorded = false,
            _ => {}
        }

        let (cols, rows) = terminal::size()?;
        render::render(out, &state, settings, fps, &render::Viewport::new(cols, rows))?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
    Ok(())
}

fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let settings = Settings::load();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread to blocking event reads so the game loop never
    // waits on terminal I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped, program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &settings);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    settings.save();
    result
}
