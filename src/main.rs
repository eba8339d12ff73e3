#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

use clap::{crate_version, App, AppSettings, Arg, SubCommand};
use quern::build;
use quern::client::HttpClient;
use quern::config::{Config, Secrets};
use std::path::Path;
use std::process::exit;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let matches = App::new("quern")
        .version(crate_version!())
        .about("Renders the published pages of a Notion database as a static blog")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .default_value("_output")
                .help("The directory the site is written into"),
        )
        .subcommand(
            SubCommand::with_name("build")
                .about("Fetch every published post and write the site, indices, and feed"),
        )
        .subcommand(
            SubCommand::with_name("page")
                .about("Render a single post document to stdout")
                .arg(Arg::with_name("id").required(true).help("The page id")),
        )
        .get_matches();

    let output = Path::new(matches.value_of("output").unwrap());
    let config = match load_config(output) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            exit(1);
        }
    };

    let result = match matches.subcommand() {
        ("build", _) => build::build_site(&config),
        ("page", Some(sub)) => {
            let id = sub.value_of("id").unwrap();
            render_page(&config, id)
        }
        _ => unreachable!("SubcommandRequiredElseHelp"),
    };

    if let Err(err) = result {
        match err {
            // An unpublished page is "not found", not a fetch failure.
            build::Error::Unpublished(id) => eprintln!("Not found: {}", id),
            err => eprintln!("{}", err),
        }
        exit(1);
    }
}

fn load_config(output: &Path) -> Result<Config, quern::config::Error> {
    let directory = std::env::current_dir()
        .map_err(|err| quern::config::Error::OpenProjectFile {
            path: Path::new(".").to_owned(),
            err,
        })?;
    Config::from_directory(&directory, output, Secrets::from_env()?)
}

fn render_page(config: &Config, id: &str) -> build::Result<()> {
    let api = HttpClient::new(config)?;
    let mut stdout = std::io::stdout();
    build::render_page(config, &api, id, &mut stdout)
}
