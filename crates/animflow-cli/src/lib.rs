//! CLI logic for the Animflow tool.
//!
//! Each subcommand reads one document and writes a human readable report to
//! the given output.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command, PlayArgs};

use std::{fs, io::Write, thread, time::Duration};

use log::{debug, info, warn};

use animflow::{
    AnimflowError, DiagramBuilder,
    playback::{HeadlessRenderer, PlaybackEvent, SimulatedNarrator},
    session::{Program, Session},
};

use error_adapter::{DiagnosticAdapter, render};

const DEFAULT_TICK_RATE: f64 = 30.0;

/// Run the Animflow CLI application, printing to standard output.
///
/// # Errors
///
/// Returns `AnimflowError` for I/O, configuration, parse or playback
/// failures.
pub fn run(args: &Args) -> Result<(), AnimflowError> {
    let stdout = std::io::stdout();
    run_with_output(args, &mut stdout.lock())
}

/// Run the Animflow CLI application, printing to `out`.
///
/// # Errors
///
/// Returns `AnimflowError` for I/O, configuration, parse or playback
/// failures.
pub fn run_with_output(args: &Args, out: &mut dyn Write) -> Result<(), AnimflowError> {
    let input = args.command.input();
    info!(input; "Processing document");

    let app_config = config::load_config(args.config.as_ref())?;
    let source = fs::read_to_string(input)?;

    let builder = DiagramBuilder::new(app_config);
    let mut session = Session::new(builder.clone());
    let program = session.update(&source)?;

    for warning in program.warnings() {
        write!(out, "{}", render(&DiagnosticAdapter::new(warning, &source)))?;
    }

    match &args.command {
        Command::Check { .. } => {
            let diagram = program.diagram();
            writeln!(
                out,
                "{input}: {} nodes, {} edges, {} steps, {} warnings",
                diagram.nodes().len(),
                diagram.edges().len(),
                program.timeline().boundaries().len(),
                program.warnings().len()
            )?;
        }
        Command::Timeline { .. } => {
            let timeline = program.timeline();
            writeln!(out, "duration {:.3}s", timeline.duration())?;
            for boundary in timeline.boundaries() {
                writeln!(
                    out,
                    "step {:<3} [{:.3}s, {:.3}s)",
                    boundary.step(),
                    boundary.start(),
                    boundary.end()
                )?;
            }
            for op in timeline.ops() {
                writeln!(out, "{op}")?;
            }
        }
        Command::Play(play) => play_program(&builder, program, play, out)?,
    }

    info!(input; "Completed");
    Ok(())
}

/// Ticks a headless player at the configured rate until the timeline ends.
fn play_program(
    builder: &DiagramBuilder,
    program: &Program,
    play: &PlayArgs,
    out: &mut dyn Write,
) -> Result<(), AnimflowError> {
    let diagram = program.diagram();
    let config = builder.config();
    let tick_rate = config.playback().merged_with(diagram.config()).tick_rate();
    let tick_rate = if tick_rate > 0.0 { tick_rate } else { DEFAULT_TICK_RATE };
    let step = 1.0 / tick_rate;

    let rate = diagram.config().tts_rate().filter(|rate| *rate > 0.0).unwrap_or(1.0);
    let narrator = SimulatedNarrator::new(config.narration().chars_per_second() * rate);

    let mut player = builder
        .player(diagram, program.timeline().clone())
        .with_renderer(HeadlessRenderer::new(program.layout().clone()))
        .with_narrator(narrator)
        // Headless playback runs once even for looping documents.
        .with_looping(false);
    if play.no_narration {
        player = player.with_narration(false);
    }
    if let Some(speed) = play.speed {
        player.set_speed(speed)?;
    }

    info!(tick_rate, duration = player.duration(), speed = player.speed(); "Starting playback");
    player.play();

    let mut elapsed = 0.0;
    loop {
        let mut finished = false;
        for event in player.drain_events() {
            match event {
                PlaybackEvent::StepChanged { step, .. } => {
                    write!(out, "{:>8.3}s  step {step}", player.current_time())?;
                    match player.caption(step) {
                        Some(caption) => writeln!(out, "  \"{caption}\"")?,
                        None => writeln!(out)?,
                    }
                }
                PlaybackEvent::AutoPaused { step } => {
                    writeln!(out, "{:>8.3}s  waiting for narration of step {step}", player.current_time())?;
                }
                PlaybackEvent::Resumed => writeln!(out, "{:>8.3}s  resumed", player.current_time())?,
                PlaybackEvent::Finished => {
                    writeln!(out, "{:>8.3}s  finished", player.current_time())?;
                    finished = true;
                }
                event => debug!(event:?; "Playback event"),
            }
        }
        if finished {
            break;
        }
        if elapsed >= play.max_seconds {
            warn!(max_seconds = play.max_seconds; "Playback did not finish in time, stopping");
            return Err(AnimflowError::Playback(format!(
                "playback did not finish within {}s",
                play.max_seconds
            )));
        }

        if play.realtime {
            thread::sleep(Duration::from_secs_f64(step));
        }
        player.tick(step);
        elapsed += step;
    }

    info!(elapsed; "Playback finished");
    Ok(())
}
