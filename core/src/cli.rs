use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::{json, Value};

use plotarea_core::{
    calculate_area, load_config, server, verify_geojson, AppConfig, AreaOutcome, AreaService,
    FinishReport, HttpAreaClient, LocalAreaService, PlotController, ReplaySource,
};

const USAGE: &str = "Usage: plotarea <command> [...]\n\
  serve [--config <path>]\n\
  calculate <coords.json>\n\
  verify <upload.geojson>\n\
  replay <fixes.json> [--server <url>] [--export-dir <dir>] [--config <path>]";

struct Flags {
    positional: Vec<String>,
    config: Option<PathBuf>,
    server: Option<String>,
    export_dir: Option<PathBuf>,
}

fn parse_flags(args: &[String]) -> Result<Flags> {
    let mut flags = Flags {
        positional: Vec::new(),
        config: None,
        server: None,
        export_dir: None,
    };
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        let mut value = |name: &str| {
            it.next()
                .cloned()
                .ok_or_else(|| anyhow!("{name} requires a value\n\n{USAGE}"))
        };
        match arg.as_str() {
            "--config" => flags.config = Some(PathBuf::from(value("--config")?)),
            "--server" => flags.server = Some(value("--server")?),
            "--export-dir" => flags.export_dir = Some(PathBuf::from(value("--export-dir")?)),
            other if other.starts_with("--") => bail!("unknown flag {other}\n\n{USAGE}"),
            other => flags.positional.push(other.to_string()),
        }
    }
    Ok(flags)
}

fn config_for(flags: &Flags) -> Result<AppConfig> {
    let cfg = match &flags.config {
        Some(path) => load_config(path).map_err(|e| anyhow!(e))?,
        None => AppConfig::default(),
    };
    Ok(cfg.apply_env())
}

fn read_json(path: &str) -> Result<Value> {
    let file = File::open(path).with_context(|| format!("opening {path}"))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing {path}"))
}

pub fn run(args: &[String]) -> Result<()> {
    let Some(command) = args.get(1) else {
        bail!(USAGE);
    };
    let flags = parse_flags(&args[2..])?;
    let cfg = config_for(&flags)?;

    match command.as_str() {
        "serve" => {
            let rt = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
            rt.block_on(server::serve(&cfg.server))?;
        }
        "calculate" => {
            let path = flags.positional.first().ok_or_else(|| anyhow!(USAGE))?;
            let req: server::CalculateRequest = serde_json::from_value(read_json(path)?)?;
            let calc = calculate_area(&req.coordinates, chrono::Utc::now())?;
            println!("{}", serde_json::to_string_pretty(&calc.feature_collection.to_value())?);
        }
        "verify" => {
            let path = flags.positional.first().ok_or_else(|| anyhow!(USAGE))?;
            let uploaded = verify_geojson(&read_json(path)?)?;
            let out = json!({ "coordinates": uploaded.coordinates, "properties": uploaded.properties });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        "replay" => {
            let path = flags.positional.first().ok_or_else(|| anyhow!(USAGE))?;
            let file = File::open(path).with_context(|| format!("opening {path}"))?;
            let source = ReplaySource::from_json_reader(BufReader::new(file))?;
            let export_dir = flags.export_dir.clone().unwrap_or_else(|| cfg.export_dir.clone());
            let report = match &flags.server {
                Some(url) => {
                    let mut client_cfg = cfg.client.clone();
                    client_cfg.base_url = url.clone();
                    replay(source, HttpAreaClient::from_config(&client_cfg), export_dir, &cfg)?
                }
                None => replay(source, LocalAreaService, export_dir, &cfg)?,
            };
            print_report(&report);
        }
        other => bail!("unknown command {other}\n\n{USAGE}"),
    }
    Ok(())
}

fn replay<A: AreaService>(
    source: ReplaySource,
    service: A,
    export_dir: PathBuf,
    cfg: &AppConfig,
) -> Result<FinishReport> {
    let mut controller = PlotController::new(source, service, export_dir, cfg.recording.clone());
    controller.start()?;
    let appended = controller.pump()?;
    log::info!("replay appended {appended} vertices");
    Ok(controller.finish(chrono::Utc::now())?)
}

fn print_report(report: &FinishReport) {
    println!("--- Plot Report ---");
    println!("Export: {}", report.export_path.display());
    println!("Points: {}", report.point_count);
    if let Some(est) = report.local_estimate {
        println!("Local estimate: {:.4} ha", est.area_ha);
    }
    match &report.outcome {
        AreaOutcome::Authoritative(area) => {
            println!("Area: {:.4} ha ({:.2} m²)", area.area_ha, area.area_m2)
        }
        AreaOutcome::LocalOnly { reason, .. } => {
            println!("Area service unavailable ({reason}); showing local estimate only")
        }
        AreaOutcome::Rejected(e) => println!("Area rejected: {e}"),
    }
}
