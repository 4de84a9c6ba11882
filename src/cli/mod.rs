use crate::{
    prompts::{
        extract_preferences_from_prompt, generate_itinerary_prompt,
        generate_json_recommendation_prompt, generate_preferences_prompt,
        generate_recommendation_prompt,
    },
    types::TravelPreferences,
    Destination, ParserConfig, RecommendationParser, RecordSchema, RoutePlan, TravelError,
};
use anyhow::{anyhow, bail, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{
    fs,
    io::{self, Read},
};
use tracing::{error, info};

/// Build the `travel-parser` command tree
pub fn build_cli() -> Command {
    Command::new("travel-parser")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract structured travel records from LLM recommendation text")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("parse")
                .about("Parse a recommendation into destination records")
                .arg(input_arg())
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_name("FORMAT")
                        .help("Output format")
                        .value_parser(["json", "summary"])
                        .default_value("json"),
                )
                .arg(
                    Arg::new("strict-json")
                        .long("strict-json")
                        .help("Require JSON content to match the destination schema")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no-merge")
                        .long("no-merge")
                        .help("Keep destinations that share a base name separate")
                        .action(ArgAction::SetTrue),
                )
                .arg(config_arg())
                .arg(
                    Arg::new("require-destinations")
                        .long("require-destinations")
                        .help("Fail when no destinations could be extracted")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("route")
                .about("Decompose an itinerary into days and time blocks")
                .arg(input_arg())
                .arg(
                    Arg::new("destination")
                        .short('d')
                        .long("destination")
                        .value_name("NAME")
                        .help("Destination the itinerary belongs to")
                        .required(true),
                )
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("prompt")
                .about("Print the prompts used to request recommendations and itineraries")
                .arg(
                    Arg::new("preferences")
                        .short('p')
                        .long("preferences")
                        .value_name("FILE")
                        .help("Traveller preferences as JSON"),
                )
                .arg(
                    Arg::new("count")
                        .short('n')
                        .long("count")
                        .value_name("COUNT")
                        .help("Number of destinations to request")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("3"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Ask for JSON records instead of formatted text")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("itinerary-days")
                        .long("itinerary-days")
                        .value_name("DAYS")
                        .help("Print the itinerary system prompt for this many days")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    Arg::new("extract")
                        .long("extract")
                        .value_name("FILE")
                        .help("Recover preferences from a rendered preferences prompt"),
                ),
        )
        .subcommand(
            Command::new("schema")
                .about("Print the JSON schema of an output record")
                .arg(
                    Arg::new("record")
                        .help("Record type")
                        .value_parser(["destination", "route-plan"])
                        .required(true)
                        .index(1),
                ),
        )
}

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input file, or - for stdin")
        .index(1)
}

fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .value_name("PATH")
        .help("Parser config JSON (defaults plus TRAVEL_PARSER_* env vars otherwise)")
}

/// CLI entry point for the travel-parser tool
pub fn run() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let matches = build_cli().get_matches();
    match execute(&matches) {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(err) => {
            error!("travel-parser failed: {:#}", err);
            Err(err)
        }
    }
}

/// Run a parsed command line and return what should be printed
pub fn execute(matches: &ArgMatches) -> anyhow::Result<String> {
    match matches.subcommand() {
        Some(("parse", sub)) => run_parse(sub),
        Some(("route", sub)) => run_route(sub),
        Some(("prompt", sub)) => run_prompt(sub),
        Some(("schema", sub)) => run_schema(sub),
        _ => bail!("unknown command"),
    }
}

fn run_parse(matches: &ArgMatches) -> anyhow::Result<String> {
    let content = read_input(matches.get_one::<String>("input"))?;
    let parser = RecommendationParser::new()
        .with_config(load_config(matches)?)
        .with_strict_json(matches.get_flag("strict-json"));
    let parser = if matches.get_flag("no-merge") {
        parser.with_merge_duplicates(false)
    } else {
        parser
    };

    let mut result = parser.parse(&content);
    info!(
        "Parsed {} destination(s) from {:?} content",
        result.len(),
        result.source
    );

    if matches.get_flag("require-destinations") {
        result = match result.ensure_destinations() {
            Ok(result) => result,
            Err(err) => {
                eprintln!("{}", err.to_error_payload());
                return Err(err.into());
            }
        };
    }

    match matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("json")
    {
        "summary" => Ok(result.summary()),
        _ => Ok(serde_json::to_string_pretty(&result)?),
    }
}

fn run_route(matches: &ArgMatches) -> anyhow::Result<String> {
    let content = read_input(matches.get_one::<String>("input"))?;
    let destination = matches
        .get_one::<String>("destination")
        .ok_or_else(|| anyhow!("--destination is required"))?;

    let plan = RecommendationParser::new()
        .with_config(load_config(matches)?)
        .parse_route_plan(destination, &content);
    info!("Decomposed {} day(s) for {}", plan.days.len(), destination);

    Ok(serde_json::to_string_pretty(&plan)?)
}

fn run_prompt(matches: &ArgMatches) -> anyhow::Result<String> {
    if let Some(days) = matches.get_one::<u32>("itinerary-days") {
        return Ok(generate_itinerary_prompt(*days));
    }

    if let Some(path) = matches.get_one::<String>("extract") {
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
        return Ok(serde_json::to_string_pretty(
            &extract_preferences_from_prompt(&text),
        )?);
    }

    let Some(path) = matches.get_one::<String>("preferences") else {
        bail!("one of --preferences, --itinerary-days or --extract is required");
    };
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    let preferences: TravelPreferences = serde_json::from_str(&raw)
        .map_err(TravelError::from)
        .with_context(|| format!("parsing preferences in {}", path))?;

    let count = matches.get_one::<usize>("count").copied().unwrap_or(3);
    let request = generate_preferences_prompt(&preferences);
    let instructions = if matches.get_flag("json") {
        generate_json_recommendation_prompt(&request, count)
    } else {
        generate_recommendation_prompt(&request, count)
    };

    Ok(instructions)
}

fn run_schema(matches: &ArgMatches) -> anyhow::Result<String> {
    let handle = match matches.get_one::<String>("record").map(String::as_str) {
        Some("route-plan") => RoutePlan::schema(),
        _ => Destination::schema(),
    };
    Ok(handle.to_pretty_string())
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<ParserConfig> {
    match matches.get_one::<String>("config") {
        Some(path) => Ok(ParserConfig::from_json_file(path)?),
        None => Ok(ParserConfig::from_env()),
    }
}

fn read_input(path: Option<&String>) -> anyhow::Result<String> {
    match path.map(String::as_str) {
        None | Some("-") => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("reading stdin")?;
            Ok(buffer)
        }
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {}", path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "travel-parser-cli-{}-{}",
            std::process::id(),
            name
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    fn run_args(args: &[&str]) -> anyhow::Result<String> {
        let matches = build_cli().try_get_matches_from(args)?;
        execute(&matches)
    }

    #[test]
    fn parse_prints_json() {
        let file = scratch_file(
            "parse.txt",
            "1. Porto, Portugal\n- Places to Visit:\n• Ribeira - riverside\n",
        );
        let output = run_args(&["travel-parser", "parse", file.to_str().unwrap()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["destinations"][0]["name"], "Porto, Portugal");
        assert_eq!(value["source"], "text");
    }

    #[test]
    fn parse_summary_format() {
        let file = scratch_file("summary.txt", "1. Kyoto, Japan\nTemples.\n");
        let output = run_args(&[
            "travel-parser",
            "parse",
            "--format",
            "summary",
            file.to_str().unwrap(),
        ])
        .unwrap();
        assert!(output.contains("1. Kyoto, Japan"));
    }

    #[test]
    fn require_destinations_fails_on_empty_input() {
        let file = scratch_file("empty.txt", "nothing to see here");
        let err = run_args(&[
            "travel-parser",
            "parse",
            "--require-destinations",
            file.to_str().unwrap(),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("No destinations"));
    }

    #[test]
    fn route_prints_days() {
        let file = scratch_file("route.txt", "Day 1:\nMorning: Museum\nEvening: Dinner\n");
        let output = run_args(&[
            "travel-parser",
            "route",
            "--destination",
            "Berlin",
            file.to_str().unwrap(),
        ])
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["destinationName"], "Berlin");
        assert_eq!(value["days"][0]["morning"], "Museum");
    }

    #[test]
    fn prompt_and_schema_commands() {
        let itinerary = run_args(&["travel-parser", "prompt", "--itinerary-days", "3"]).unwrap();
        assert!(itinerary.contains("3-day itinerary"));

        let schema = run_args(&["travel-parser", "schema", "route-plan"]).unwrap();
        assert!(schema.contains("destinationName"));

        assert!(run_args(&["travel-parser", "prompt"]).is_err());
    }

    #[test]
    fn prompt_from_preferences_file() {
        let file = scratch_file(
            "prefs.json",
            r#"{ "budget": "budget", "durationDays": 4, "activities": ["hiking"] }"#,
        );
        let output = run_args(&[
            "travel-parser",
            "prompt",
            "--preferences",
            file.to_str().unwrap(),
            "--count",
            "2",
        ])
        .unwrap();
        assert!(output.contains("recommend exactly 2 travel destinations"));
        assert!(output.contains("Activities I enjoy: hiking"));
    }
}
