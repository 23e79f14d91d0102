use clap::Parser;
use stackradar::application::render;
use stackradar::cli::commands::{Cli, Commands, ReportArgs};
use stackradar::domain::ports::transport::{OutgoingReport, ReportTransport};
use stackradar::domain::values::source::Source;
use stackradar::infrastructure::config::RadarConfig;
use stackradar::infrastructure::feeds::file::JsonFileFeed;
use stackradar::infrastructure::feeds::Feed;
use stackradar::infrastructure::mail::smtp::SmtpMailer;
use stackradar::{send_report, StackRadar};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = run_command(cli).await;
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn build_radar(cli_config: Option<&std::path::Path>, args: &ReportArgs) -> Result<StackRadar, Box<dyn std::error::Error>> {
    let config = RadarConfig::load(cli_config)?;
    Ok(match &args.input {
        Some(path) => {
            let feeds: Vec<Box<dyn Feed>> = vec![Box::new(JsonFileFeed::new(path.clone()))];
            StackRadar::with_feeds(config, feeds, None)
        }
        None => StackRadar::from_config(config),
    })
}

async fn emit(
    mode: &str,
    args: &ReportArgs,
    json: serde_json::Value,
    report: OutgoingReport,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }
    if args.print {
        println!("{}", report.plain);
        return Ok(());
    }
    if args.no_email {
        println!("✅ Generated {mode} report (email sending skipped)");
        return Ok(());
    }

    let mailer = SmtpMailer::from_env()?;
    let name = mailer.name().to_string();
    send_report(mailer, report).await?;
    println!("✅ Sent {mode} report email via {name}.");
    Ok(())
}

async fn run_command(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let today = chrono::Local::now().date_naive();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Stack(args) => {
            let radar = build_radar(config_path, &args)?;
            let report = radar.stack_report(today).await;
            emit("stack", &args, serde_json::to_value(&report)?, render::stack_email(&report)).await?;
        }
        Commands::Daily(args) => {
            let radar = build_radar(config_path, &args)?;
            let feed = radar.daily_feed(today).await;
            emit("daily", &args, serde_json::to_value(&feed)?, render::daily_email(&feed)).await?;
        }
        Commands::Combined(args) => {
            let radar = build_radar(config_path, &args)?;
            let report = radar.combined_report(today).await;
            emit(
                "combined",
                &args,
                serde_json::to_value(&report)?,
                render::combined_email(&report),
            )
            .await?;
        }
        Commands::Classify { title, source, link } => {
            let src: Source = source.parse().map_err(|e: String| e)?;
            let radar = StackRadar::from_config(RadarConfig::load(config_path)?);
            let annotated = radar.classify(src, &title, &link);
            println!("{}", serde_json::to_string_pretty(&annotated)?);
        }
    }
    Ok(())
}
