use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use errbridge_config::{ReportingSettings, SettingsStore};
use errbridge_core::events::{HostEvent, LocalEventBus};
use errbridge_core::reporting::{MemoryReportingClient, ReportableError};
use errbridge_core::script::DefaultScriptHelper;
use errbridge_core::view::InMemoryView;
use errbridge_core::{Bridge, Registration};
use errbridge_telemetry::MetricsRecorder;
use tracing::info;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Settings file; defaults to `config/errbridge.yaml` plus environment overlays
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate settings and show which reporting features are active
    Check,
    /// Print the head markup injected into rendered pages
    Snippet,
    /// Run the bridge against an in-memory client and print what it captured
    Simulate(SimulateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Message of the simulated unhandled exception
    #[arg(long, default_value = "Simulated unhandled exception")]
    pub message: String,
    /// Name of the simulated failing job
    #[arg(long, default_value = "SimulatedJob")]
    pub job: String,
    /// Template name of the simulated render
    #[arg(long, default_value = "index.twig")]
    pub template: String,
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let settings = load_settings(cli.config.as_ref())?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Check => check(&settings, &mut out),
        Commands::Snippet => snippet(settings, &mut out),
        Commands::Simulate(args) => simulate(settings, &args, &mut out),
    }
}

fn load_settings(path: Option<&PathBuf>) -> anyhow::Result<ReportingSettings> {
    match path {
        Some(path) => ReportingSettings::load_from_path(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => ReportingSettings::load().context("loading settings"),
    }
}

fn check(settings: &ReportingSettings, out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "environment:       {}", settings.environment)?;
    writeln!(
        out,
        "server reporting:  {}",
        enabled(settings.is_server_reporting_enabled())
    )?;
    writeln!(
        out,
        "client reporting:  {}",
        enabled(settings.is_client_reporting_enabled())
    )?;
    writeln!(out, "---")?;
    write!(out, "{}", serde_yaml::to_string(&settings.redacted())?)?;
    Ok(())
}

fn snippet(settings: ReportingSettings, out: &mut impl Write) -> anyhow::Result<()> {
    let bridge = Bridge::with_defaults(
        Arc::new(SettingsStore::new(settings)),
        Arc::new(MemoryReportingClient::new()),
    )?;
    match bridge.injector().markup()? {
        Some(markup) => writeln!(out, "{}", markup)?,
        None => anyhow::bail!(
            "client reporting is disabled: set client.enabled and client.access_token"
        ),
    }
    Ok(())
}

fn simulate(
    settings: ReportingSettings,
    args: &SimulateArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let store = Arc::new(SettingsStore::new(settings));
    let client = Arc::new(MemoryReportingClient::new());
    let helper = Arc::new(DefaultScriptHelper::new(Arc::clone(&store)));
    let bridge = Bridge::new(store, client.clone(), helper, MetricsRecorder::new()?);

    let bus = LocalEventBus::new();
    if let Registration::Registered(subscriptions) = bridge.initialize(&bus) {
        info!(?subscriptions, "bridge listeners registered");
    }

    bus.emit(&HostEvent::exception(ReportableError::from_message(
        args.message.clone(),
    )));
    bus.emit(&HostEvent::job_error(
        args.job.clone(),
        1,
        ReportableError::from_message(format!("{} failed", args.job)),
    ));
    let view = Arc::new(InMemoryView::new());
    bus.emit(&HostEvent::before_render(args.template.clone(), view.clone()));

    writeln!(
        out,
        "client initialized: {}",
        if bridge.server().session().is_initialized() {
            "yes"
        } else {
            "no"
        }
    )?;
    writeln!(out, "client initializations: {}", client.inits().len())?;
    for report in client.reports() {
        writeln!(
            out,
            "report [{}] env={} message={}",
            report.level, report.config.environment, report.error
        )?;
    }
    let head = view.render_head();
    if head.is_empty() {
        writeln!(out, "head markup: <none>")?;
    } else {
        writeln!(out, "head markup: {}", head)?;
    }
    writeln!(out, "---")?;
    write!(out, "{}", bridge.metrics().gather_metrics()?)?;
    Ok(())
}

fn enabled(on: bool) -> &'static str {
    if on {
        "enabled"
    } else {
        "disabled"
    }
}
