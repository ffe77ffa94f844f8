//! Glassbreak CLI
//!
//! Headless driver for the fracture showcase:
//! - Run a break and report how the fragments settle
//! - Print the quality profile a tier resolves to
//! - List the glass catalogue
//! - Read or persist the quality tier

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use glam::Vec3;
use glassbreak_core::{QualityTier, TierHint, resolve_profile};
use glassbreak_platform::storage::{load_quality_tier, save_quality_tier};
use glassbreak_platform::{DeviceCapabilities, FileStore, KeyValueStore};
use glassbreak_renderer::RenderMode;
use glassbreak_sim::{
    BreakTarget, GlassType, HudSnapshot, Intent, SceneVariant, Showcase, SimState, SimulationConfig,
};
use serde::Serialize;

/// Default location of the persisted settings
pub const DEFAULT_STORE: &str = "glassbreak-settings.json";

#[derive(Parser)]
#[command(name = "glassbreak")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print timing spans
    #[arg(long)]
    pub timings: bool,

    /// Simulation config (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Settings file holding the persisted quality tier
    #[arg(long, default_value = DEFAULT_STORE)]
    pub store: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Break a pane and run it until the fragments settle
    Simulate {
        /// Glass type (tempered, laminated, decorative, mirror)
        #[arg(short, long, default_value = "tempered")]
        glass: String,

        /// Quality tier; the stored tier is used when omitted
        #[arg(short, long, value_enum)]
        tier: Option<TierArg>,

        /// Break intensity (0.1 to 3.0)
        #[arg(short, long)]
        intensity: Option<f32>,

        /// Run at the slow-motion time scale
        #[arg(long)]
        slow_motion: bool,

        /// Wall-clock seconds to simulate at most
        #[arg(long, default_value = "12")]
        seconds: f32,

        /// Frames per second
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Scene layout
        #[arg(long, value_enum)]
        variant: Option<VariantArg>,

        /// Pane-local impact point as `x,y`; random near the top when omitted
        #[arg(long, value_parser = parse_point)]
        at: Option<(f32, f32)>,

        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Accumulate samples once idle
        #[arg(long)]
        ultra: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the quality profile for a tier
    Profile {
        /// Tier to resolve (auto uses this machine's signals)
        #[arg(short, long, value_enum, default_value = "auto")]
        tier: TierArg,
    },

    /// List the glass catalogue
    Types {
        /// Print full specs as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read or persist the quality tier
    Quality {
        #[command(subcommand)]
        action: QualityAction,
    },
}

#[derive(Subcommand)]
pub enum QualityAction {
    /// Print the stored tier
    Get,
    /// Store a tier for the next session
    Set {
        #[arg(value_enum)]
        tier: TierArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TierArg {
    Low,
    Medium,
    High,
    Auto,
}

impl TierArg {
    pub fn hint(self) -> TierHint {
        match self {
            Self::Low => TierHint::Explicit(QualityTier::Low),
            Self::Medium => TierHint::Explicit(QualityTier::Medium),
            Self::High => TierHint::Explicit(QualityTier::High),
            Self::Auto => TierHint::Auto,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    Bathroom,
    Storefront,
}

impl From<VariantArg> for SceneVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Bathroom => SceneVariant::Bathroom,
            VariantArg::Storefront => SceneVariant::Storefront,
        }
    }
}

/// Parse `x,y` into a pane-local point
pub fn parse_point(s: &str) -> Result<(f32, f32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got '{}'", s))?;
    let x = x.trim().parse::<f32>().map_err(|e| format!("bad x '{}': {}", x, e))?;
    let y = y.trim().parse::<f32>().map_err(|e| format!("bad y '{}': {}", y, e))?;
    Ok((x, y))
}

/// Outcome of a headless run
#[derive(Debug, Serialize)]
pub struct SimulationSummary {
    pub frames: u32,
    /// Wall-clock seconds covered by the run
    pub wall_seconds: f64,
    /// Simulated seconds, after slow motion
    pub simulated_seconds: f64,
    /// Wall-clock seconds from the break until everything came to rest
    pub settled_after: Option<f64>,
    pub peak_draw_calls: u32,
    pub hud: HudSnapshot,
}

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    if cli.timings {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber).context("installing timing subscriber")?;
    }

    let config = match &cli.config {
        Some(path) => SimulationConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    match cli.command {
        Commands::Simulate {
            glass,
            tier,
            intensity,
            slow_motion,
            seconds,
            fps,
            variant,
            at,
            seed,
            ultra,
            json,
        } => {
            let mut config = config;
            if let Some(variant) = variant {
                config.variant = variant.into();
            }
            if seed.is_some() {
                config.seed = seed;
            }
            let options = RunOptions {
                glass_type: GlassType::parse_lossy(&glass),
                hint: tier.map(TierArg::hint),
                intensity: intensity.unwrap_or(config.default_intensity),
                slow_motion,
                seconds,
                fps,
                at,
                ultra,
            };
            let store = FileStore::open(&cli.store);
            let summary = run_simulation(config, Box::new(store), options)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary.hud);
                println!("Frames: {} ({:.2}s wall, {:.2}s simulated)", summary.frames, summary.wall_seconds, summary.simulated_seconds);
                match summary.settled_after {
                    Some(secs) => println!("Settled after {:.2}s", secs),
                    None => println!("Still moving when the run ended"),
                }
                println!("Peak draw calls: {}", summary.peak_draw_calls);
            }
        }
        Commands::Profile { tier } => {
            let device = DeviceCapabilities::default();
            let profile = resolve_profile(tier.hint(), Some(&device.signals()));
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        Commands::Types { json } => {
            let specs: Vec<_> = GlassType::ALL.iter().map(GlassType::spec).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&specs)?);
            } else {
                for spec in specs {
                    println!(
                        "{:<12} {:<18} safety {:>3}/100  {} {}",
                        spec.glass_type, spec.display_name, spec.safety_score, spec.risk.icon, spec.risk.label
                    );
                    println!("             {}", spec.description);
                }
            }
        }
        Commands::Quality { action } => {
            let store = FileStore::open(&cli.store);
            match action {
                QualityAction::Get => println!("{}", load_quality_tier(&store)),
                QualityAction::Set { tier } => {
                    let tier = match tier.hint() {
                        TierHint::Explicit(tier) => tier,
                        TierHint::Auto => {
                            let device = DeviceCapabilities::default();
                            resolve_profile(TierHint::Auto, Some(&device.signals())).tier
                        }
                    };
                    save_quality_tier(&store, tier)
                        .with_context(|| format!("writing {}", cli.store.display()))?;
                    log::info!("Quality tier set to {}", tier);
                }
            }
        }
    }

    Ok(())
}

/// Knobs for [`run_simulation`]
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub glass_type: GlassType,
    pub hint: Option<TierHint>,
    pub intensity: f32,
    pub slow_motion: bool,
    pub seconds: f32,
    pub fps: u32,
    pub at: Option<(f32, f32)>,
    pub ultra: bool,
}

/// Break one pane headlessly and tick until it settles or time runs out
pub fn run_simulation(
    config: SimulationConfig,
    store: Box<dyn KeyValueStore>,
    options: RunOptions,
) -> Result<SimulationSummary> {
    if options.fps == 0 {
        bail!("fps must be at least 1");
    }
    if !(options.seconds.is_finite() && options.seconds > 0.0) {
        bail!("seconds must be positive, got {}", options.seconds);
    }

    let mut showcase = Showcase::start(config, DeviceCapabilities::default(), store, options.hint);
    if showcase.is_degraded() {
        bail!("no graphics context available, nothing to simulate");
    }

    let target = match options.at {
        Some((x, y)) => BreakTarget::Panel(Vec3::new(x, y, 0.0)),
        None => BreakTarget::Default,
    };
    showcase.push(Intent::SetGlassType(options.glass_type));
    showcase.push(Intent::SetIntensity(options.intensity));
    showcase.push(Intent::SetSlowMotion(options.slow_motion));
    if options.ultra {
        showcase.push(Intent::SetRenderMode(RenderMode::Ultra));
    }
    showcase.push(Intent::Break(target));

    let frame_secs = 1.0 / f64::from(options.fps);
    let max_frames = (f64::from(options.seconds) * f64::from(options.fps)).ceil() as u32;
    let mut frames = 0;
    let mut peak_draw_calls = 0;
    let mut settled_after = None;

    while frames < max_frames {
        let Some(report) = showcase.tick(frame_secs) else {
            bail!("simulation went away mid-run");
        };
        frames += 1;
        peak_draw_calls = peak_draw_calls.max(report.stats.draw_calls);
        if report.state == SimState::Settled {
            settled_after = Some(f64::from(frames) * frame_secs);
            break;
        }
    }

    let simulator = showcase
        .simulator()
        .context("simulation went away mid-run")?;
    let hud = simulator.hud();
    let simulated_seconds = simulator.clock().total_time();

    Ok(SimulationSummary {
        frames,
        wall_seconds: f64::from(frames) * frame_secs,
        simulated_seconds,
        settled_after,
        peak_draw_calls,
        hud,
    })
}
