use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Password, Text};
use log::{info, warn};
use std::sync::Arc;
use tokio::{io::BufReader, sync::watch};
use weatherbot_core::{
    Command, CommandHandler, Config, DailyAlert, MessageSink, Reply, WeatherProvider,
    provider_from_config, sink_from_config,
};

use crate::console;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherbot", version, about = "Weather chat bot")]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Store the OpenWeather API key, owner and alert settings.
    Configure,

    /// Current weather for a city.
    Weather { city: String },

    /// 3-day forecast for a city.
    Forecast { city: String },

    /// Air quality for a city.
    Airquality { city: String },

    /// Clothing recommendation for a description and a °F temperature.
    RecommendF {
        description: String,
        #[arg(allow_negative_numbers = true)]
        degree: f64,
    },

    /// Clothing recommendation for a description and a °C temperature.
    RecommendC {
        description: String,
        #[arg(allow_negative_numbers = true)]
        degree: f64,
    },

    /// Convert °F to °C.
    FToC {
        #[arg(allow_negative_numbers = true)]
        degree: f64,
    },

    /// Convert °C to °F.
    CToF {
        #[arg(allow_negative_numbers = true)]
        degree: f64,
    },

    /// Run the bot: startup notice, daily alert, and commands read from stdin.
    Serve {
        /// User id the console speaks as; `/shutdown` needs the owner's id.
        #[arg(long, default_value_t = 0)]
        user: u64,
    },
}

impl CliCommand {
    /// The bot command a one-shot subcommand stands for.
    fn bot_command(self) -> Option<Command> {
        let cmd = match self {
            CliCommand::Weather { city } => Command::Weather { city },
            CliCommand::Forecast { city } => Command::Forecast { city },
            CliCommand::Airquality { city } => Command::AirQuality { city },
            CliCommand::RecommendF { description, degree } => {
                Command::RecommendF { description, degree }
            }
            CliCommand::RecommendC { description, degree } => {
                Command::RecommendC { description, degree }
            }
            CliCommand::FToC { degree } => Command::FahrenheitToCelsius { degree },
            CliCommand::CToF { degree } => Command::CelsiusToFahrenheit { degree },
            CliCommand::Configure | CliCommand::Serve { .. } => return None,
        };
        Some(cmd)
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        self.run_with(Config::load).await
    }

    /// Run with `load` supplying the configuration, called only when needed.
    async fn run_with(self, load: impl FnOnce() -> Result<Config>) -> Result<()> {
        let cmd = match self.command {
            CliCommand::Configure => return configure(),
            CliCommand::Serve { user } => return serve(load()?, user).await,
            other => other.bot_command(),
        };
        let Some(cmd) = cmd else {
            return Ok(());
        };

        // Conversions and recommendations need neither config nor API key.
        if let Some(reply) = cmd.local_reply() {
            println!("{reply}");
            return Ok(());
        }

        let config = load()?;
        let provider: Arc<dyn WeatherProvider> = provider_from_config(&config)?.into();
        let outcome = CommandHandler::new(provider, &config).handle(0, cmd).await;
        println!("{}", outcome.reply);

        Ok(())
    }
}

fn configure() -> Result<()> {
    let mut cfg = Config::load_file()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    cfg.api_key = Some(api_key.trim().to_string());

    cfg.owner_id = CustomType::<u64>::new("Owner user id (Esc to skip):")
        .prompt_skippable()
        .context("Failed to read owner id")?
        .or(cfg.owner_id);

    cfg.alert.city = Text::new("Daily alert city:")
        .with_default(&cfg.alert.city)
        .prompt()
        .context("Failed to read alert city")?;

    let webhook = Text::new("Webhook URL for alerts (empty prints to stdout):")
        .with_initial_value(cfg.alert.webhook_url.as_deref().unwrap_or_default())
        .prompt()
        .context("Failed to read webhook URL")?;
    cfg.alert.webhook_url = Some(webhook.trim().to_string()).filter(|url| !url.is_empty());

    cfg.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn serve(config: Config, user: u64) -> Result<()> {
    let provider: Arc<dyn WeatherProvider> = provider_from_config(&config)?.into();
    let sink: Arc<dyn MessageSink> = sink_from_config(&config).into();

    if let Err(e) = sink.publish(&Reply::text("Bot is online!")).await {
        warn!("Failed to send startup notice: {e:#}");
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let alert = tokio::spawn(
        DailyAlert::new(provider.clone(), sink, &config.alert).run(shutdown_rx),
    );

    let handler = CommandHandler::new(provider, &config);
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };
    let stopped = until_stopped(console::run(&handler, user, stdin, stdout), interrupt).await;

    let _ = shutdown_tx.send(true);
    alert.await.context("Daily alert task panicked")?;
    info!("Bye");

    stopped
}

/// Wait for an accepted `/shutdown` or an interrupt.
///
/// Closed console input is not a stop request: the bot keeps serving its
/// daily alert until `interrupt` completes.
async fn until_stopped<C, I>(console: C, interrupt: I) -> Result<()>
where
    C: Future<Output = Result<console::Exit>>,
    I: Future<Output = ()>,
{
    tokio::pin!(interrupt);

    let exit = tokio::select! {
        exit = console => exit?,
        () = &mut interrupt => {
            info!("Interrupted");
            return Ok(());
        }
    };

    if exit == console::Exit::EndOfInput {
        info!("Console input closed, running until interrupted");
        interrupt.await;
        info!("Interrupted");
    }

    Ok(())
}
