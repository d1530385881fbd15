use anyhow::Result;
use burnup::cli::{self, Commands};
use burnup::commands::{self, SprintCommandConfig, StoryCommandConfig};

fn main() -> Result<()> {
    let cli = cli::parse_args();

    match cli.command {
        Commands::Sprint {
            name,
            config,
            entries,
            issues,
            format,
            output,
            today,
            verbosity,
            plain,
        } => {
            cli::init_tracing(verbosity);
            commands::run_sprint(SprintCommandConfig {
                name,
                config,
                entries,
                issues,
                format: format.into(),
                output,
                today: cli::resolve_today(today),
                verbosity,
                formatting: cli::formatting_config(plain),
            })
        }
        Commands::ResultPerStory {
            name,
            config,
            entries,
            issues,
            format,
            output,
            plain,
        } => {
            cli::init_tracing(0);
            commands::run_result_per_story(StoryCommandConfig {
                name,
                config,
                entries,
                issues,
                format: format.into(),
                output,
                formatting: cli::formatting_config(plain),
            })
        }
        Commands::Ls { config } => {
            cli::init_tracing(0);
            commands::list_sprints(config.as_deref())
        }
        Commands::Validate { config, plain } => {
            cli::init_tracing(0);
            commands::validate_config(config.as_deref(), cli::formatting_config(plain))
        }
        Commands::Init { force } => {
            cli::init_tracing(0);
            commands::init_config(force)
        }
        Commands::DumpConfig { name, config } => {
            cli::init_tracing(0);
            commands::dump_config(name.as_deref(), config.as_deref())
        }
    }
}
