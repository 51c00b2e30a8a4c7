use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::{error, info};

use max_odd_harness::generator::{generate, rng_from_seed};
use max_odd_harness::{run_all, HarnessConfig, ProducerMode, Report, Result};

const VERBOSE_FLAG: &str = "verbose";
const TIMINGS_FLAG: &str = "timings";

fn command() -> Command {
    Command::new("max-odd")
        .about("Find the maximum odd value with seven concurrency strategies")
        .arg(
            Arg::new("len")
                .long("len")
                .short('n')
                .default_value("20")
                .help("Number of random integers to generate")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("lo")
                .long("lo")
                .default_value("1")
                .allow_negative_numbers(true)
                .help("Inclusive lower bound of generated values")
                .value_parser(clap::value_parser!(i32)),
        )
        .arg(
            Arg::new("hi")
                .long("hi")
                .default_value("100")
                .allow_negative_numbers(true)
                .help("Inclusive upper bound of generated values")
                .value_parser(clap::value_parser!(i32)),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Seed for reproducible input")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("pool-workers")
                .long("pool-workers")
                .default_value("4")
                .help("Threads draining the safe queue")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("atomic-workers")
                .long("atomic-workers")
                .default_value("1")
                .help("Threads raising the shared atomic maximum")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .help("Threads in the data-parallel pool [default: number of CPUs]")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("producer-mode")
                .long("producer-mode")
                .default_value(ProducerMode::default().as_str())
                .help("Whether the producer holds the lock for its whole batch")
                .value_parser(ProducerMode::NAMES),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .default_value("text")
                .help("Output format")
                .value_parser(["text", "json"]),
        )
        .arg(
            Arg::new(TIMINGS_FLAG)
                .long(TIMINGS_FLAG)
                .action(ArgAction::SetTrue)
                .help("Show how long each strategy took"),
        )
        .arg(
            Arg::new(VERBOSE_FLAG)
                .long(VERBOSE_FLAG)
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
}

fn config_from(matches: &ArgMatches) -> Result<HarnessConfig> {
    let producer_mode = matches
        .get_one::<String>("producer-mode")
        .map(|s| s.parse::<ProducerMode>())
        .transpose()?
        .unwrap_or_default();

    let defaults = HarnessConfig::default();
    let config = HarnessConfig {
        len: matches.get_one::<usize>("len").copied().unwrap_or(defaults.len),
        lo: matches.get_one::<i32>("lo").copied().unwrap_or(defaults.lo),
        hi: matches.get_one::<i32>("hi").copied().unwrap_or(defaults.hi),
        pool_workers: matches
            .get_one::<usize>("pool-workers")
            .copied()
            .unwrap_or(defaults.pool_workers),
        atomic_workers: matches
            .get_one::<usize>("atomic-workers")
            .copied()
            .unwrap_or(defaults.atomic_workers),
        parallel_threads: matches
            .get_one::<usize>("threads")
            .copied()
            .unwrap_or(defaults.parallel_threads),
        producer_mode,
        seed: matches.get_one::<u64>("seed").copied(),
    };
    config.validate()?;
    Ok(config)
}

fn run(matches: &ArgMatches) -> Result<()> {
    let config = config_from(matches)?;
    info!(?config, "starting comparison");

    let data = generate(config.len, config.lo, config.hi, &mut rng_from_seed(config.seed))?;
    let report = run_all(data, &config)?;

    let format = matches.get_one::<String>("format").map(String::as_str);
    print!("{}", render(&report, format, matches.get_flag(TIMINGS_FLAG))?);
    Ok(())
}

/// Nothing is printed unless the whole report could be rendered.
fn render(report: &Report, format: Option<&str>, timings: bool) -> Result<String> {
    match format {
        Some("json") => Ok(serde_json::to_string_pretty(report)? + "\n"),
        _ => Ok(report.render(timings)),
    }
}

fn main() -> ExitCode {
    let matches = command().get_matches();

    // Create logger
    let level = if matches.get_flag(VERBOSE_FLAG) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "comparison run failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let matches = command().try_get_matches_from(["max-odd"]).unwrap();
        let config = config_from(&matches).unwrap();
        assert_eq!((config.len, config.lo, config.hi), (20, 1, 100));
        assert_eq!(config.producer_mode, ProducerMode::Serialized);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_overrides() {
        let matches = command()
            .try_get_matches_from([
                "max-odd",
                "--len",
                "5",
                "--lo",
                "-10",
                "--hi",
                "-1",
                "--seed",
                "9",
                "--producer-mode",
                "interleaved",
                "--pool-workers",
                "2",
            ])
            .unwrap();
        let config = config_from(&matches).unwrap();
        assert_eq!((config.len, config.lo, config.hi), (5, -10, -1));
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.pool_workers, 2);
        assert_eq!(config.producer_mode, ProducerMode::Interleaved);
    }

    #[test]
    fn test_inverted_range_fails_validation() {
        let matches = command()
            .try_get_matches_from(["max-odd", "--lo", "50", "--hi", "10"])
            .unwrap();
        assert!(config_from(&matches).is_err());
    }

    #[test]
    fn test_render_formats() {
        let config = HarnessConfig {
            parallel_threads: 2,
            ..HarnessConfig::default()
        };
        let report = run_all(vec![6, 11, 4], &config).unwrap();

        let json = render(&report, Some("json"), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["outcomes"][0]["max_odd"], 11);

        let text = render(&report, Some("text"), false).unwrap();
        assert!(text.starts_with("Array: 6 11 4"));
    }

    #[test]
    fn test_unknown_producer_mode_is_rejected_by_parser() {
        assert!(command()
            .try_get_matches_from(["max-odd", "--producer-mode", "spin"])
            .is_err());
    }
}
