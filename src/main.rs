use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use voyage_core::{AppError, Config, ConfigError};
use voyage_directory::{DirectoryClient, DirectoryError};
use voyage_search::{
    MemoryQueryStore, PageLabel, QueryStore, SearchEngine, SearchSettings, SearchView,
};

const HELP: &str = "\
Commands (read from stdin once the first page is shown):
  name <text>     search by name (empty clears)
  country [id]    select a country (no id clears)
  city [name]     select a city (no name clears)
  tag <name>      toggle a tag
  page <n>        go to page n
  next | prev     move one page
  back            previous history entry
  show            print the current results
  help | quit";

type Engine = Arc<SearchEngine<DirectoryClient, MemoryQueryStore>>;

#[derive(Parser, Debug)]
#[command(name = "voyage")]
#[command(about = "Browse points of interest by name, place and tag", long_about = None)]
#[command(after_help = HELP)]
struct Cli {
    /// Initial search as a query string, e.g. "?country_id=pt&tag_name=beach"
    query: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    voyage_core::init()?;

    if let Err(e) = run(cli).await {
        eprintln!("{}", user_message(e));
        std::process::exit(1);
    }

    Ok(())
}

/// Display text for an error that stopped the program.
fn user_message(error: anyhow::Error) -> &'static str {
    let error = match error.downcast::<ConfigError>() {
        Ok(config_error) => return AppError::from(config_error).user_message(),
        Err(other) => other,
    };
    let error = match error.downcast::<DirectoryError>() {
        Ok(directory_error) => {
            tracing::error!("{}", directory_error);
            return directory_error.user_message();
        }
        Err(other) => other,
    };
    tracing::error!("{:#}", error);
    AppError::Other(error).user_message()
}

async fn run(cli: Cli) -> Result<()> {
    let (config, _) = Config::load_validated(cli.config.as_deref())?;
    tracing::info!("Using travel directory at {}", config.services.api_url);

    let directory = DirectoryClient::new(
        &config.services.api_url,
        Duration::from_secs(config.services.request_timeout_secs),
    )?;
    let settings = SearchSettings::new(
        config.search.debounce_ms,
        config.search.placeholder_image_url.clone(),
    );
    let debounce = settings.debounce;

    let store = Arc::new(MemoryQueryStore::from_query(
        cli.query.as_deref().unwrap_or_default(),
    ));

    let engine = SearchEngine::new(Arc::new(directory), store, settings);
    let listener = engine.spawn_listener();
    engine.mount();
    engine.wait_until_settled().await;
    render(&engine.view(), &engine.store().get().to_string());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, arg) = match line.split_once(' ') {
            Some((command, arg)) => (command, Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (line, None),
        };

        match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => {
                println!("{}", HELP);
                continue;
            }
            "name" => {
                engine.set_name_query(arg.unwrap_or_default());
                tokio::time::sleep(debounce).await;
            }
            "country" => engine.select_country(arg),
            "city" => engine.select_city(arg),
            "tag" => match arg {
                Some(tag) => engine.toggle_tag(tag),
                None => {
                    println!("usage: tag <name>");
                    continue;
                }
            },
            "page" => match arg.and_then(|a| a.parse::<u32>().ok()) {
                Some(page) => engine.go_to_page(page),
                None => {
                    println!("usage: page <n>");
                    continue;
                }
            },
            "next" | "prev" => step_page(&engine, command == "next"),
            "back" => {
                if !engine.store().back() {
                    println!("No earlier search");
                    continue;
                }
                engine.sync();
            }
            "show" => {}
            other => {
                println!("Unknown command '{}'. Type 'help'.", other);
                continue;
            }
        }

        engine.wait_until_settled().await;
        render(&engine.view(), &engine.store().get().to_string());
    }

    engine.unmount();
    listener.abort();
    Ok(())
}

fn step_page(engine: &Engine, forward: bool) {
    let view = engine.view();
    if forward && view.has_next {
        engine.go_to_page(view.page + 1);
    } else if !forward && view.has_previous {
        engine.go_to_page(view.page - 1);
    }
}

fn render(view: &SearchView, query: &str) {
    println!();
    println!("?{}", query);

    if view.is_empty() {
        println!("No results found");
        return;
    }

    if let Some(range) = view.range {
        println!("{}", range);
    }

    for poi in &view.pois {
        let tags = if poi.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", poi.tags.join(", "))
        };
        println!("  {}{}", poi.name, tags);
    }

    let pager: Vec<String> = view
        .page_labels
        .iter()
        .map(|label| match label {
            PageLabel::Page(n) if *n == view.page => format!("({})", n),
            other => other.to_string(),
        })
        .collect();
    println!("Pages: {}", pager.join(" "));
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn test_cli_takes_query_and_config() {
        let cli = Cli::try_parse_from([
            "voyage",
            "?country_id=pt&tag_name=beach",
            "--config",
            "/tmp/voyage.toml",
        ])
        .unwrap();
        assert_eq!(cli.query.as_deref(), Some("?country_id=pt&tag_name=beach"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/voyage.toml")));

        let bare = Cli::try_parse_from(["voyage"]).unwrap();
        assert!(bare.query.is_none() && bare.config.is_none());
    }

    #[test]
    fn test_help_flag_is_not_a_search() {
        let err = Cli::try_parse_from(["voyage", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);

        let err = Cli::try_parse_from(["voyage", "--bogus"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_directory_errors_get_their_own_message() {
        let err = anyhow::Error::from(DirectoryError::Api {
            status: 503,
            message: "down".into(),
        });
        assert_eq!(
            user_message(err),
            "The travel directory is having issues. Please try again later."
        );

        let invalid = DirectoryClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert_eq!(
            user_message(invalid.into()),
            "The travel directory address is misconfigured."
        );
    }

    #[test]
    fn test_config_and_other_errors() {
        let err = anyhow::Error::from(ConfigError::ParseError("line 1".into()));
        assert_eq!(
            user_message(err),
            "Configuration file is malformed. Check your settings."
        );
        assert_eq!(
            user_message(anyhow::anyhow!("boom")),
            "An unexpected error occurred. Please try again."
        );
    }
}
