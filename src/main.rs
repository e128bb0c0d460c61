//! Chronicle - host shell binary
//!
//! Thin renderer/driver around the engine: loads a storyline file, then
//! either validates it, plays it interactively on stdin, or runs it under an
//! automated controller. All game logic lives in the library; this binary
//! only formats read-only session views.

use anyhow::{bail, Context};
use chronicle::{
    loader::Storyline,
    session::{
        drive, ChoiceController, FirstChoiceController, RandomController, ScriptedController,
        SessionView, StopReason, VerbosityLevel,
    },
};
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Write as FmtWrite;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Controller type for automated playthroughs
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ControllerType {
    /// Always takes the first choice (for testing)
    First,
    /// Makes random choices
    Random,
    /// Replays --choices (comma-separated indices)
    Scripted,
}

/// Verbosity level (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

#[derive(Parser)]
#[command(name = "chronicle")]
#[command(about = "Branching-narrative simulation engine", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a storyline and report problems
    Validate {
        /// Storyline JSON file
        storyline: PathBuf,
    },

    /// Play a storyline interactively on stdin
    Play {
        /// Storyline JSON file
        storyline: PathBuf,
    },

    /// Run a storyline under an automated controller
    Run {
        /// Storyline JSON file
        storyline: PathBuf,

        /// Controller to drive the session
        #[arg(long, value_enum, default_value_t = ControllerType::Random)]
        controller: ControllerType,

        /// RNG seed for the random controller
        #[arg(long)]
        seed: Option<u64>,

        /// Comma-separated choice indices for the scripted controller
        #[arg(long)]
        choices: Option<String>,

        /// Stop after this many submitted choices
        #[arg(long, default_value_t = 1000)]
        max_steps: u32,

        /// Output verbosity: silent/minimal/normal/verbose or 0-3
        #[arg(long, default_value = "normal")]
        verbosity: VerbosityArg,

        /// Print the final session view as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Validate { storyline } => validate(&storyline),
        Commands::Play { storyline } => play(&storyline),
        Commands::Run {
            storyline,
            controller,
            seed,
            choices,
            max_steps,
            verbosity,
            json,
        } => run(
            &storyline, controller, seed, choices, max_steps, verbosity.0, json,
        ),
    }
}

fn load(path: &PathBuf) -> anyhow::Result<Storyline> {
    Storyline::from_file(path).with_context(|| format!("loading storyline {}", path.display()))
}

fn validate(path: &PathBuf) -> anyhow::Result<()> {
    let storyline = load(path)?;
    println!(
        "OK: '{}' - {} scenes, {} metrics, start at '{}'",
        storyline.title(),
        storyline.graph().len(),
        storyline.metric_definitions().len(),
        storyline.graph().start()
    );
    let orphans = storyline.graph().unreachable();
    if !orphans.is_empty() {
        println!("warning: {} unreachable scene(s):", orphans.len());
        for id in orphans {
            println!("  - {id}");
        }
    }
    Ok(())
}

fn run(
    path: &PathBuf,
    controller: ControllerType,
    seed: Option<u64>,
    choices: Option<String>,
    max_steps: u32,
    verbosity: VerbosityLevel,
    json: bool,
) -> anyhow::Result<()> {
    let storyline = load(path)?;
    let mut session = storyline.new_session()?;
    session.logger.set_verbosity(verbosity);

    let mut controller: Box<dyn ChoiceController> = match controller {
        ControllerType::First => Box::new(FirstChoiceController),
        ControllerType::Random => Box::new(match seed {
            Some(seed) => RandomController::with_seed(seed),
            None => RandomController::new(),
        }),
        ControllerType::Scripted => {
            let script = choices
                .as_deref()
                .map(parse_script)
                .transpose()?
                .unwrap_or_default();
            if script.is_empty() {
                bail!("scripted controller requires --choices, e.g. --choices 0,1,0");
            }
            Box::new(ScriptedController::new(script))
        }
    };

    let result = drive(&mut session, controller.as_mut(), max_steps)?;

    let view = session.view();
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        match result.reason {
            StopReason::Ended => {}
            StopReason::StepLimit => {
                println!("stopped after {} steps (step limit)", result.steps_taken)
            }
            StopReason::ControllerStopped => println!(
                "controller '{}' stopped after {} steps",
                controller.name(),
                result.steps_taken
            ),
        }
        print!("{}", render_metrics(&view));
        if let Some(ended) = &view.ended {
            println!();
            println!("{}", ended.message);
            if ended.breach {
                println!("(security breach - renderer should switch to breach theme)");
            }
        }
    }
    Ok(())
}

fn parse_script(s: &str) -> anyhow::Result<Vec<usize>> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .with_context(|| format!("invalid choice index '{part}'"))
        })
        .collect()
}

fn play(path: &PathBuf) -> anyhow::Result<()> {
    let storyline = load(path)?;
    let mut session = storyline.new_session()?;
    session.logger.set_verbosity(VerbosityLevel::Silent);

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let view = session.view();
        print!("{}", render_view(&view));

        if view.is_ended() {
            print!("\n[r]estart or [q]uit> ");
        } else {
            print!("\nchoice (number), [r]eset, [q]uit> ");
        }
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let input = line?.trim().to_lowercase();
        match input.as_str() {
            "q" | "quit" => break,
            "r" | "reset" | "restart" => {
                session.reset();
                continue;
            }
            _ => {}
        }

        let Some(scene) = &view.scene else { continue };
        let Ok(index) = input.parse::<usize>() else {
            println!("enter a choice number, 'r', or 'q'");
            continue;
        };
        if index >= scene.choices.len() {
            println!(
                "choice {index} out of range (0..{})",
                scene.choices.len().saturating_sub(1)
            );
            continue;
        }
        let scene_id = scene.id.as_str().into();
        session.submit_choice(&scene_id, index)?;
    }
    Ok(())
}

fn render_metrics(view: &SessionView) -> String {
    let mut out = String::new();
    for metric in &view.metrics {
        let filled = (metric.percent / 10.0).round() as usize;
        let _ = writeln!(
            out,
            "  {:<24} {:>4}  [{}{}]",
            metric.label,
            metric.value,
            "#".repeat(filled),
            "-".repeat(10usize.saturating_sub(filled)),
        );
    }
    out
}

fn render_view(view: &SessionView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== {} ===", view.storyline_title);

    if let Some(scene) = &view.scene {
        let _ = writeln!(out, "\n[{}] {} ({})", scene.id, scene.title, scene.period);
        if let Some(speaker) = &scene.speaker {
            let _ = writeln!(out, "{} - {}", speaker.name, speaker.role);
        }
        if !scene.objectives.is_empty() {
            for objective in &scene.objectives {
                let _ = writeln!(out, "  * {}", objective.description);
            }
        }
        let _ = writeln!(out, "\n{}\n", scene.text);
    }

    out.push_str(&render_metrics(view));

    if !view.effect_log.is_empty() {
        let _ = writeln!(out, "\nrecent effects:");
        for entry in view.effect_log.iter().rev().take(6) {
            let _ = writeln!(out, "  {} {:+}", entry.label, entry.delta);
        }
    }

    if let Some(ended) = &view.ended {
        let _ = writeln!(out, "\n{}", ended.message);
        if ended.breach {
            let _ = writeln!(out, "(the screen glitches to the breach theme)");
        }
    } else if let Some(scene) = &view.scene {
        let _ = writeln!(out);
        for choice in &scene.choices {
            let tags = if choice.tags.is_empty() {
                String::new()
            } else {
                format!("  [{}]", choice.tags.join(", "))
            };
            let _ = writeln!(out, "  {}. {}{}", choice.index, choice.text, tags);
        }
    }
    out
}
