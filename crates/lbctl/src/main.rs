use anyhow::{Context, Result};
use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand, ValueEnum};
use lbctl_core::actions::{
    create_floating_ip, parse_labels, parse_protection, reset_server, FloatingIpCreateRequest,
};
use lbctl_core::{
    run_metrics, Config, HttpClient, MetricType, MetricsRequest, OutputMode, PollingWaiter,
    StructuredFormat, SystemClock,
};
use once_cell::sync::OnceCell;
use std::io;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(author, version, about = "lbctl: load balancer metrics and resource actions")]
struct Args {
    /// Path to config TOML
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the API endpoint
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load Balancer commands
    #[command(subcommand)]
    LoadBalancer(LoadBalancerCommand),
    /// Server commands
    #[command(subcommand)]
    Server(ServerCommand),
    /// Floating IP commands
    #[command(subcommand)]
    FloatingIp(FloatingIpCommand),
}

#[derive(Subcommand, Debug)]
enum LoadBalancerCommand {
    /// [ALPHA] Metrics from a Load Balancer
    Metrics(MetricsArgs),
}

#[derive(Subcommand, Debug)]
enum ServerCommand {
    /// Reset a server
    Reset {
        /// Server ID or name
        server: String,
    },
}

#[derive(Subcommand, Debug)]
enum FloatingIpCommand {
    /// Create a Floating IP
    Create(FloatingIpCreateArgs),
}

#[derive(clap::Args, Debug)]
struct MetricsArgs {
    /// Load Balancer ID or name
    load_balancer: String,
    /// Type of metrics you want to show
    #[arg(long = "type", value_parser = PossibleValuesParser::new(MetricType::NAMES))]
    metric_type: String,
    /// ISO 8601 timestamp
    #[arg(long)]
    start: Option<String>,
    /// ISO 8601 timestamp
    #[arg(long)]
    end: Option<String>,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(clap::Args, Debug)]
struct FloatingIpCreateArgs {
    /// Type (ipv4 or ipv6)
    #[arg(long = "type", value_parser = ["ipv4", "ipv6"])]
    ip_type: String,
    /// Name
    #[arg(long)]
    name: Option<String>,
    /// Home location
    #[arg(long)]
    home_location: Option<String>,
    /// Server to assign Floating IP to (ID or name)
    #[arg(long)]
    server: Option<String>,
    /// Description
    #[arg(long)]
    description: Option<String>,
    /// User-defined labels ('key=value')
    #[arg(long = "label")]
    labels: Vec<String>,
    /// Enable protection (delete)
    #[arg(long = "enable-protection")]
    enable_protection: Vec<String>,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// Structured output format; when both are given JSON is used
    #[arg(short = 'o', long = "output", value_enum)]
    formats: Vec<OutputFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

impl OutputArgs {
    fn mode(&self) -> OutputMode {
        let formats: Vec<StructuredFormat> = self
            .formats
            .iter()
            .map(|f| match f {
                OutputFormat::Json => StructuredFormat::Json,
                OutputFormat::Yaml => StructuredFormat::Yaml,
            })
            .collect();
        OutputMode::from_flags(&formats)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    config.apply_env();
    apply_overrides(&mut config, &args);

    init_logging(&config)?;
    debug!(endpoint = %config.api.endpoint, "starting lbctl");

    let client = HttpClient::new(&config.api).context("building API client")?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::LoadBalancer(LoadBalancerCommand::Metrics(metrics)) => {
            let request = MetricsRequest {
                id_or_name: &metrics.load_balancer,
                metric_type: &metrics.metric_type,
                start: metrics.start.as_deref(),
                end: metrics.end.as_deref(),
                mode: metrics.output.mode(),
            };
            run_metrics(&client, &SystemClock, &request, &mut out)?;
        }
        Command::Server(ServerCommand::Reset { server }) => {
            let waiter = PollingWaiter::new(&client, config.actions.poll_interval);
            reset_server(&client, &waiter, &server, &mut out)?;
        }
        Command::FloatingIp(FloatingIpCommand::Create(create)) => {
            let request = build_create_request(&create)?;
            let waiter = PollingWaiter::new(&client, config.actions.poll_interval);
            let mut status = io::stderr().lock();
            create_floating_ip(&client, &waiter, &request, &mut out, &mut status)?;
        }
    }
    Ok(())
}

fn build_create_request(args: &FloatingIpCreateArgs) -> Result<FloatingIpCreateRequest> {
    Ok(FloatingIpCreateRequest {
        ip_type: args.ip_type.parse()?,
        name: args.name.clone(),
        home_location: args.home_location.clone(),
        server: args.server.clone(),
        description: args.description.clone(),
        labels: parse_labels(&args.labels)?,
        protection: parse_protection(&args.enable_protection)?,
        mode: args.output.mode(),
    })
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(endpoint) = &args.endpoint {
        config.api.endpoint = endpoint.clone();
    }
    if args.verbose {
        config.logging.level = "debug".into();
    }
}

fn init_logging(config: &Config) -> Result<()> {
    let writer: BoxMakeWriter = if let Some(path) = &config.logging.file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file at {:?}", path))?;
        let (writer, guard) = tracing_appender::non_blocking(file);
        static LOG_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();
        let _ = LOG_GUARD.set(guard);
        BoxMakeWriter::new(writer)
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };

    tracing_subscriber::fmt()
        .with_env_filter(config.logging.level.clone())
        .with_ansi(config.logging.file.is_none() && atty::is(atty::Stream::Stderr))
        .with_target(false)
        .with_level(true)
        .with_writer(writer)
        .finish()
        .try_init()
        .ok();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn json_wins_over_yaml() {
        let args = Args::try_parse_from([
            "lbctl",
            "load-balancer",
            "metrics",
            "lb1",
            "--type",
            "bandwidth",
            "-o",
            "yaml",
            "-o",
            "json",
        ])
        .unwrap();
        let Command::LoadBalancer(LoadBalancerCommand::Metrics(metrics)) = args.command else {
            panic!("expected metrics command");
        };
        assert_eq!(
            metrics.output.mode(),
            OutputMode::Passthrough(StructuredFormat::Json)
        );
    }

    #[test]
    fn no_output_flag_means_graph() {
        let args = Args::try_parse_from([
            "lbctl",
            "load-balancer",
            "metrics",
            "lb1",
            "--type",
            "open_connections",
        ])
        .unwrap();
        let Command::LoadBalancer(LoadBalancerCommand::Metrics(metrics)) = args.command else {
            panic!("expected metrics command");
        };
        assert_eq!(metrics.output.mode(), OutputMode::Graph);
        assert_eq!(metrics.metric_type, "open_connections");
        assert!(metrics.start.is_none());
    }

    #[test]
    fn rejects_unknown_metric_type() {
        let err = Args::try_parse_from([
            "lbctl",
            "load-balancer",
            "metrics",
            "lb1",
            "--type",
            "latency",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn create_request_collects_labels_and_protection() {
        let args = Args::try_parse_from([
            "lbctl",
            "floating-ip",
            "create",
            "--type",
            "ipv4",
            "--home-location",
            "fsn1",
            "--label",
            "env=prod",
            "--enable-protection",
            "delete",
        ])
        .unwrap();
        let Command::FloatingIp(FloatingIpCommand::Create(create)) = args.command else {
            panic!("expected create command");
        };
        let request = build_create_request(&create).unwrap();
        assert_eq!(request.labels.get("env").map(String::as_str), Some("prod"));
        assert_eq!(request.protection.len(), 1);
        assert_eq!(request.mode, OutputMode::Graph);
    }
}
