use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use gala_motion::{
    Engine, EnvMotionGate, EvaluatedState, HostState, Millis, MotionGate as _, MotionResult,
    SceneDef, SceneHost, Sequence,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gala-motion", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a scene and report its timeline.
    Validate(SceneArgs),
    /// Print the animated state at one timeline instant as JSON.
    Sample(SampleArgs),
    /// Print the terminal state (what reduced motion shows) as JSON.
    Terminal(SceneArgs),
    /// Play a scene in real time against an in-memory tree.
    Play(PlayArgs),
    /// List built-in scenes, or dump one as JSON.
    Scenes(ScenesArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SceneSource {
    /// Scene JSON file.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Built-in scene name.
    #[arg(long)]
    scene: Option<String>,
}

#[derive(Args, Debug)]
struct SceneArgs {
    #[command(flatten)]
    source: SceneSource,
}

#[derive(Args, Debug)]
struct SampleArgs {
    #[command(flatten)]
    source: SceneSource,

    /// Time since start in milliseconds.
    #[arg(long)]
    at_ms: u64,

    /// Treat `--at-ms` as wall time across loop iterations and repeat delays.
    #[arg(long)]
    looped: bool,
}

#[derive(Args, Debug)]
struct PlayArgs {
    #[command(flatten)]
    source: SceneSource,

    /// Stop after this many loop iterations.
    #[arg(long, default_value_t = 1)]
    loops: u64,

    /// Frame callbacks per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Behave as if the user prefers reduced motion (also `GALA_REDUCED_MOTION=1`).
    #[arg(long)]
    reduced_motion: bool,
}

#[derive(Args, Debug)]
struct ScenesArgs {
    /// Print this built-in scene as JSON.
    #[arg(long)]
    dump: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Sample(args) => cmd_sample(args),
        Command::Terminal(args) => cmd_terminal(args),
        Command::Play(args) => cmd_play(args),
        Command::Scenes(args) => cmd_scenes(args),
    }
}

fn read_scene_json(path: &Path) -> anyhow::Result<SceneDef> {
    let f = File::open(path).with_context(|| format!("open scene '{}'", path.display()))?;
    let r = BufReader::new(f);
    let scene: SceneDef = serde_json::from_reader(r).with_context(|| "parse scene JSON")?;
    scene.validate()?;
    Ok(scene)
}

fn load_scene(source: &SceneSource) -> anyhow::Result<SceneDef> {
    match (&source.in_path, &source.scene) {
        (Some(path), _) => read_scene_json(path),
        (None, Some(name)) => gala_motion::scenes::by_name(name).with_context(|| {
            format!(
                "unknown built-in scene '{name}' (available: {})",
                gala_motion::scenes::NAMES.join(", ")
            )
        }),
        (None, None) => anyhow::bail!("pass --in or --scene"),
    }
}

fn build_scene(scene: &SceneDef) -> anyhow::Result<Sequence> {
    let seq = gala_motion::build(&scene.sequence, &scene.tree())
        .with_context(|| format!("build scene '{}'", scene.name))?;
    Ok(seq)
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_validate(args: SceneArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.source)?;
    let seq = build_scene(&scene)?;
    println!(
        "scene '{}': {} targets, {} tweens, duration {}, cycle {}",
        scene.name,
        scene.targets.len(),
        seq.tweens().len(),
        seq.duration(),
        seq.cycle()
    );
    for label in seq.labels() {
        println!("  {:>8}  {}", label.at.to_string(), label.name);
    }
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.source)?;
    let seq = build_scene(&scene)?;
    let at = Millis(args.at_ms);
    let state = if args.looped {
        seq.sample_looped(at)
    } else {
        seq.sample(at)
    };
    print_json(&EvaluatedState::new(at, &state))
}

fn cmd_terminal(args: SceneArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.source)?;
    let seq = build_scene(&scene)?;
    print_json(&EvaluatedState::new(seq.duration(), &seq.terminal_state()))
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.fps > 0, "--fps must be > 0");
    let scene = load_scene(&args.source)?;
    let reduced = args.reduced_motion || EnvMotionGate.prefers_reduced_motion();

    let mut host = SceneHost::new(scene);
    let mut loader = || -> MotionResult<Engine> { Ok(Engine::new()) };
    match host.mount_with(&reduced, &mut loader) {
        HostState::Animating => {}
        state => {
            eprintln!("static frame ({state:?})");
            return print_json(host.tree());
        }
    }

    let frame = Duration::from_secs_f64(1.0 / f64::from(args.fps));
    let mut loops = 0u64;
    let mut frames = 0u64;
    while loops < args.loops {
        std::thread::sleep(frame);
        let report = host.frame();
        frames += 1;
        for label in &report.labels {
            tracing::info!(scene = %host.scene().name, %label, "label");
        }
        loops += report.loops;
    }
    host.unmount();
    eprintln!(
        "played '{}': {loops} loop(s), {frames} frames, {} writes",
        host.scene().name,
        host.tree().write_count()
    );
    Ok(())
}

fn cmd_scenes(args: ScenesArgs) -> anyhow::Result<()> {
    if let Some(name) = args.dump {
        let scene = load_scene(&SceneSource {
            in_path: None,
            scene: Some(name),
        })?;
        println!("{}", scene.to_json_pretty()?);
        return Ok(());
    }
    for scene in gala_motion::scenes::all() {
        let seq = build_scene(&scene)?;
        println!(
            "{:<14} duration {:>7}  repeat delay {:>6}  {} labels",
            scene.name,
            seq.duration().to_string(),
            seq.repeat_delay().to_string(),
            seq.labels().len()
        );
    }
    Ok(())
}
