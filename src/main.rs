use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use snn_radiation::core::network::{Network, SimNetwork};
use snn_radiation::error::SNNError;
use snn_radiation::radiation::injector::{apply_radiation, apply_weight_increase};
use snn_radiation::radiation::spec::{EffectKind, FaultSpec};

#[derive(Parser, Debug)]
struct Args {
    /// The network to irradiate (JSON)
    #[arg(long)]
    network: PathBuf,
    /// The fault configuration (JSON)
    #[arg(long)]
    fault: PathBuf,
    /// The seed used to draw the radiation effects
    #[arg(long)]
    seed: u64,
    /// Names of the nodes exempt from radiation
    #[arg(long)]
    ignore: Vec<String>,
    /// The estimated number of simulated time steps (synaptic weight increase only)
    #[arg(long, default_value = "100")]
    horizon: usize,
    /// Where the irradiated network and the log are written
    #[arg(long, default_value = "radiation")]
    out_dir: PathBuf,
}

fn main() -> Result<(), SNNError> {
    let args = Args::parse();

    let spec = FaultSpec::from_json(&args.fault)?;
    let mut network = SimNetwork::load_from(&args.network)?;

    let affected: Vec<String> = network
        .nodes()
        .iter()
        .map(|node| node.name().to_string())
        .filter(|name| !args.ignore.contains(name))
        .collect();
    let fingerprint = spec.fingerprint(&affected, args.seed);

    std::fs::create_dir_all(&args.out_dir)?;
    let log_path = args.out_dir.join(format!("{}.log", fingerprint));
    let network_path = args
        .out_dir
        .join(format!("{}{}.json", spec.file_stem(), fingerprint));

    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{l} - {m}\n")))
        .build(log_path)
        .map_err(|e| SNNError::IOError(e.to_string()))?;

    let config = Config::builder()
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .build(Root::builder().appender("logfile").build(LevelFilter::Info))
        .map_err(|e| SNNError::IOError(e.to_string()))?;

    log4rs::init_config(config).map_err(|e| SNNError::IOError(e.to_string()))?;

    log::info!("{:?}", args);
    log::info!("Fault {} (digest {})", spec.file_stem(), spec.identity_digest());

    let report = match spec.effect_kind() {
        EffectKind::SynapticWeightIncrease => {
            apply_weight_increase(&spec, args.seed, &mut network, &args.ignore, args.horizon)?
        }
        _ => apply_radiation(&spec, args.seed, &mut network, &args.ignore)?,
    };
    log::info!("Radiation injection: done! {:?}", report);

    network.save_to(&network_path)?;
    log::info!(
        "Network saving: done! Saved to {}",
        network_path.display()
    );

    println!("{}", fingerprint);
    Ok(())
}
