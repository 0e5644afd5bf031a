use anyhow::Result;
use armlink::sim::{RandomTarget, SimLaser, SimRobot, SimRobotConfig, SimTargetConfig};
use armlink_core::Session;
use armlink_tcp::{TcpTransport, TcpTransportConfig};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

/// Training bridge for a simulated robot manipulator
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Port the bridge listens on
    #[arg(short, long, default_value_t = 5555)]
    port: u16,

    /// Fixed time step in seconds
    #[arg(short, long, default_value_t = 0.02)]
    time_step: f32,

    /// Number of ticks to run, 0 runs until killed
    #[arg(long, default_value_t = 0)]
    ticks: u64,

    /// Optional YAML file overriding the robot configuration
    #[arg(long)]
    robot_config: Option<PathBuf>,

    /// Seed for target spawning, random when omitted
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let robot_config = match &args.robot_config {
        Some(path) => SimRobotConfig::load(path)?,
        None => SimRobotConfig::default(),
    }
    .time_step(args.time_step);

    let transport_config = TcpTransportConfig::default().port(args.port);
    let transport = TcpTransport::bind(&transport_config)?;

    let robot = SimRobot::build(robot_config);
    let sensor = SimLaser::new();
    let target = match args.seed {
        Some(seed) => RandomTarget::build_with_seed(SimTargetConfig::default(), seed),
        None => RandomTarget::build(SimTargetConfig::default()),
    };

    let mut session = Session::new(robot, sensor, target, transport);
    session.subscribe_reset_completed(|| info!("Reset completed"));

    info!(
        "Bridge running: port={} time_step={}s",
        args.port, args.time_step
    );

    let tick_interval = Duration::from_secs_f32(args.time_step);
    let mut tick = 0u64;
    loop {
        let started = Instant::now();
        session.on_tick();

        tick += 1;
        if args.ticks > 0 && tick >= args.ticks {
            break;
        }

        if let Some(remaining) = tick_interval.checked_sub(started.elapsed()) {
            thread::sleep(remaining);
        }
    }

    session.shutdown();
    Ok(())
}
