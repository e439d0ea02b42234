use anyhow::Context;
use clap::Parser;
use pgcore::recommendation::FixedGradeRecommender;
use pgcore::session::{parse_saturating, InputField, InterpolationMode, Session};
use pgcore::telemetry::MetricsRecorder;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use web::bridge::DashboardBridge;
use workflow::config::DashboardConfig;
use workflow::report::{append_report, format_report};
use workflow::runner::Runner;

mod web;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "PG selection dashboard service")]
struct Args {
    /// Load the dashboard config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Address for the HTTP page and API (overrides the config file)
    #[arg(long)]
    bind: Option<SocketAddr>,
    /// Run a single calculation from the flags below and append a report line
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Keep the HTTP page and API alive until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long, allow_negative_numbers = true, value_parser = saturating_arg)]
    rut_depth: Option<i64>,
    #[arg(long, allow_negative_numbers = true, value_parser = saturating_arg)]
    esal: Option<i64>,
    #[arg(long, allow_negative_numbers = true, value_parser = saturating_arg)]
    traffic_speed: Option<i64>,
    #[arg(long, allow_negative_numbers = true, value_parser = saturating_arg)]
    layer_depth: Option<i64>,
    #[arg(long, allow_negative_numbers = true, value_parser = saturating_arg)]
    reliability: Option<i64>,
    /// Interpolation mode key: nearest_station, linear or idw
    #[arg(long)]
    mode: Option<InterpolationMode>,
}

/// Out-of-range flag values are clamped later, so only non-integers are refused here.
fn saturating_arg(raw: &str) -> Result<i64, String> {
    parse_saturating(raw).ok_or_else(|| format!("{raw:?} is not an integer"))
}

impl Args {
    fn field_overrides(&self) -> [(InputField, Option<i64>); 5] {
        [
            (InputField::RutDepth, self.rut_depth),
            (InputField::Esal, self.esal),
            (InputField::TrafficSpeed, self.traffic_speed),
            (InputField::LayerDepth, self.layer_depth),
            (InputField::Reliability, self.reliability),
        ]
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => DashboardConfig::load(path)?.with_bind(args.bind),
        None => DashboardConfig::from_args(args.bind),
    };

    let metrics = Arc::new(MetricsRecorder::new());
    let runner = Arc::new(Runner::new(
        Arc::new(FixedGradeRecommender::default()),
        config.map.clone(),
    ));

    if args.offline {
        let mut session = Session::start(config.to_view_state(), metrics.clone());
        for (field, value) in args.field_overrides() {
            if let Some(value) = value {
                session.edit(field, value);
            }
        }
        if let Some(mode) = args.mode {
            session.select_mode(mode);
        }

        let calculation = runner.calculate(&session);
        println!("{}", calculation.acknowledgement);
        println!("{}", calculation.text);

        let report = format_report(session.inputs(), &calculation);
        append_report(&config.report_path, &report)?;
    }

    if args.serve {
        let session = Session::start(config.to_view_state(), metrics.clone());
        let bridge = DashboardBridge::new(session, runner.clone(), metrics.clone());
        bridge.spawn(config.bind)?;
        bridge.publish_status(&format!(
            "HTTP page running on http://{} (Ctrl+C to stop)...",
            config.bind
        ));
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
        let snapshot = metrics.snapshot();
        bridge.publish_status(&format!(
            "shutting down after {} edits, {} calculations",
            snapshot.edits, snapshot.calculations
        ));
    }

    Ok(())
}
