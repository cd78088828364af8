//! Hello-world scaffold: `server` (default) or `render`.

// region:    --- Imports
use clap::{Parser, Subcommand};
use tracing::error;
use wizards_bay::config::AppConfig;
use wizards_bay::hello::{self, Template};
use wizards_bay::server;
use wizards_bay::state::AppState;

// endregion: --- Imports

#[derive(Parser, Debug)]
#[command(name = "hello-world", version, about = "Hello-world scaffold server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server
    Server,
    /// Render the greeting template for the given names and exit
    Render {
        /// Also render the template with the default name
        #[arg(short = 'i', long)]
        include_default: bool,

        names: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env();
    server::init_tracing();

    match cli.command.unwrap_or(Command::Server) {
        Command::Render {
            include_default,
            names,
        } => {
            let template = Template::new(&config.hello_template, &config.hello_default_name);
            template.write_rendered(&mut std::io::stdout().lock(), &names, include_default)?;
            Ok(())
        }
        Command::Server => {
            let state = AppState::from_config(&config).await?;
            let routes_all = hello::router(&config, state);
            if let Err(err) = server::serve(routes_all, &config.bind_address).await {
                error!("{:<12} --> Server error: {}", "Main", err);
                return Err(err.into());
            }
            Ok(())
        }
    }
}
