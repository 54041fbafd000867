use std::sync::Arc;

use anyhow::{bail, Result};
use tracing_subscriber::EnvFilter;

use lyra_skills::providers::{format_model_list, registry as providers, ModelService};
use lyra_skills::skills::builtin::register_builtin_skills;
use lyra_skills::skills::{SkillContext, SkillRegistry};
use lyra_skills::Config;

fn print_help() {
    println!(
        "\
lyra-skills v{}

Skill dispatch and LLM provider capability layer for the Lyra assistant.

USAGE:
    lyra-skills [OPTIONS] <COMMAND>

COMMANDS:
    skills                      List the skill catalog
    schema <skill>              Print a skill's parameter schema
    invoke <skill> [--args J]   Dispatch a skill with JSON arguments
    providers                   Show the provider capability table
    models <provider>           List a provider's models

OPTIONS:
    -c, --config <PATH>  Path to TOML configuration file
                         [default: ~/.lyra/config.toml]
    -h, --help           Print this help message and exit
    -V, --version        Print version and exit

ENVIRONMENT VARIABLES:
    Variables are referenced in the config file via ${{VAR_NAME}} syntax.

    RUST_LOG             Log level filter for tracing
                         (e.g. debug, lyra_skills=debug,warn)
    VENICE_API_KEY       Venice.ai key for image generation and NSFW mode
    TWITCH_CLIENT_ID     Twitch Helix application client id
    YOUTUBE_API_KEY      YouTube Data API v3 key
    TAROT_AUTH_TOKEN     Token for the tarot function endpoint

EXAMPLES:
    lyra-skills skills
    lyra-skills invoke generate_password --args '{{\"length\": 24}}'
    lyra-skills invoke get_weather --args '{{\"zip_code\": \"90210\"}}'
    lyra-skills models grok",
        env!("CARGO_PKG_VERSION"),
    );
}

fn default_config_path() -> String {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".lyra")
        .join("config.toml")
        .to_string_lossy()
        .into_owned()
}

struct Cli {
    config_path: String,
    command: String,
    positional: Vec<String>,
    args_json: Option<String>,
}

fn parse_cli() -> Result<Cli> {
    let mut config_path = default_config_path();
    let mut command = String::new();
    let mut positional = Vec::new();
    let mut args_json = None;

    let mut argv = std::env::args().skip(1);
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("lyra-skills v{}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--config" | "-c" => {
                config_path = argv
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a path"))?;
            }
            "--args" => {
                args_json = Some(
                    argv.next()
                        .ok_or_else(|| anyhow::anyhow!("--args requires a JSON string"))?,
                );
            }
            other if command.is_empty() => command = other.to_string(),
            other => positional.push(other.to_string()),
        }
    }

    if command.is_empty() {
        print_help();
        std::process::exit(2);
    }

    Ok(Cli {
        config_path,
        command,
        positional,
        args_json,
    })
}

fn build_registry(config: &Arc<Config>) -> SkillRegistry {
    let mut registry = SkillRegistry::new();
    register_builtin_skills(&mut registry, config.clone());
    registry
}

async fn run(cli: Cli) -> Result<()> {
    let config = Arc::new(Config::load_or_default(&cli.config_path)?);

    match cli.command.as_str() {
        "skills" => {
            let registry = build_registry(&config);
            for def in registry.tool_definitions() {
                println!("{:<22} {}", def.name, def.description);
            }
        }
        "schema" => {
            let Some(name) = cli.positional.first() else {
                bail!("usage: lyra-skills schema <skill>");
            };
            let registry = build_registry(&config);
            let Some(skill) = registry.get(name) else {
                bail!("unknown skill: {name}");
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&skill.parameters_schema())?
            );
        }
        "invoke" => {
            let Some(name) = cli.positional.first() else {
                bail!("usage: lyra-skills invoke <skill> [--args JSON]");
            };
            let registry = build_registry(&config);
            let context = SkillContext::new(config.storage.data_dir.clone());
            let raw_args = cli.args_json.as_deref().unwrap_or("");
            match registry.dispatch_json(name, raw_args, &context).await {
                Ok(result) => println!("{}", serde_json::to_string_pretty(&result)?),
                Err(e) => {
                    eprintln!("error [{}]: {e}", e.class());
                    std::process::exit(1);
                }
            }
        }
        "providers" => {
            for provider in providers::all() {
                let tools = if provider.supports_function_calling {
                    "✓ tools"
                } else {
                    "✗ tools"
                };
                let listing = if provider.supports_model_listing {
                    "✓ listing"
                } else {
                    "✗ listing"
                };
                println!(
                    "{:<14} {:<28} {}  {}",
                    provider.id, provider.name, tools, listing
                );
                if !provider.default_model.is_empty() {
                    println!("{:<14} default: {}", "", provider.default_model);
                }
                println!("{:<14} {}", "", provider.notes);
            }
        }
        "models" => {
            let Some(provider) = cli.positional.first() else {
                bail!("usage: lyra-skills models <provider>");
            };
            let (api_key, base_url) = match config.llm.clone().filter(|l| &l.provider == provider)
            {
                Some(l) => (l.api_key, l.base_url),
                None => (String::new(), String::new()),
            };
            let service = ModelService::new(provider, &api_key, &base_url);
            let listing = service.list_models().await?;
            if let Some(warning) = &listing.warning {
                eprintln!("warning: {warning}");
            }
            print!("{}", format_model_list(&listing.models));
            if let Some(best) = service.best_tool_model() {
                println!("\nRecommended for skills: {best}");
            }
        }
        other => {
            bail!("unknown command: {other} (try --help)");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = parse_cli()?;

    // Initialize logging (RUST_LOG=debug for debug mode)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lyra_skills=info")),
        )
        .init();

    run(cli).await
}
