//! A simple CLI tool for running a voting session from a JSON file.
//! Every ballot goes through the same validation as in the library, and the
//! final standings are printed once the session closes.

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{error, info, LevelFilter};

use vote_manager::{
    error::Error as LibError,
    logging,
    model::session::{SessionReport, SessionSpec},
    Config,
};

const PROGRAM_NAME: &str = "vote-tally";

const ABOUT_TEXT: &str = "Run a two-pool voting session and print the tally.

EXIT CODES:
     0: Every ballot was accepted.
   255: Ran successfully, but at least one ballot was rejected.
 Other: Error.";

const SESSION_PATH: &str = "SESSION_PATH";

const SESSION_PATH_HELP: &str = "The path to a JSON session file listing the\n\
primary and vacant candidates and the ballots to cast";

const JSON: &str = "json";

const QUIET: &str = "quiet";

const LOG_CONFIG: &str = "log4rs.yaml";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .arg(
            Arg::new(SESSION_PATH)
                .help(SESSION_PATH_HELP)
                .action(ArgAction::Set)
                .required(true),
        )
        .arg(
            Arg::new(JSON)
                .long(JSON)
                .help("Print the full report as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(QUIET)
                .short('q')
                .long(QUIET)
                .help("Do not log individual ballots")
                .action(ArgAction::SetTrue),
        )
}

/// Errors that this program may produce.
#[derive(Debug, Eq, PartialEq)]
enum Error {
    /// IO error described by the inner message.
    IO(String),
    /// Failed to decode the session file.
    Format(String),
    /// Failed to load the configuration.
    Config(String),
}

impl From<LibError> for Error {
    fn from(err: LibError) -> Self {
        match err {
            LibError::Io(e) => Error::IO(e.to_string()),
            LibError::Format(e) => Error::Format(e.to_string()),
            LibError::Config(e) => Error::Config(e.to_string()),
            LibError::Logging(msg) => Error::IO(msg),
        }
    }
}

/// Load the configuration and the session, then run it.
fn run_session(path: &str) -> Result<SessionReport, Error> {
    let config = Config::load()?;
    let spec = SessionSpec::load(path)?;
    info!("Running session from {path}");
    Ok(spec.run(&config))
}

/// Print a human-readable report.
fn print_report(report: &SessionReport) {
    let results = &report.results;
    println!(
        "Session {}: {} ballot{} accepted.",
        if results.is_open { "still open" } else { "closed" },
        results.ballots_accepted,
        if results.ballots_accepted != 1 { "s" } else { "" }
    );
    for candidate in &results.candidates {
        println!("{}", candidate);
    }
    if !report.rejections.is_empty() {
        println!("\nRejected {} ballot(s):", report.rejections.len());
        for rejection in &report.rejections {
            println!("  voter {}: {}", rejection.voter, rejection.message);
        }
    }
}

/// Run the session, report the result, and return the exit code.
fn run(args: &ArgMatches) -> u8 {
    let path: &String = args.get_one(SESSION_PATH).unwrap(); // Required argument is guaranteed to be present.
    match run_session(path) {
        Ok(report) => {
            if args.get_flag(JSON) {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        println!("Failed to encode report: {}", e);
                        return 1;
                    }
                }
            } else {
                print_report(&report);
            }
            if report.rejections.is_empty() {
                0
            } else {
                255
            }
        }
        Err(Error::IO(msg)) => {
            println!("IO error: {}", msg);
            1
        }
        Err(Error::Format(msg)) => {
            println!("Invalid session: {}", msg);
            1
        }
        Err(Error::Config(msg)) => {
            println!("Invalid configuration: {}", msg);
            1
        }
    }
}

fn main() {
    if let Err(err) = logging::init_logging(LOG_CONFIG) {
        eprintln!("{err}; continuing without logging");
    }

    let args = cli().get_matches();
    if args.get_flag(QUIET) {
        logging::set_ballot_logging(LevelFilter::Off);
    }

    let exit_code = run(&args);
    if exit_code == 1 {
        error!("Session could not be run");
    }
    std::process::exit(exit_code.into())
}

#[cfg(test)]
mod tests {
    use vote_manager::{
        error::RejectionKind,
        model::{candidate::CandidateId, results::CandidateResult},
    };

    use super::*;

    fn result(id: u32, name: &str, vacant: bool, votes: u64) -> CandidateResult {
        CandidateResult {
            id: CandidateId(id),
            name: Some(name.to_string()),
            vacant,
            votes,
        }
    }

    #[test]
    fn sessions() {
        // This test actually enters library code, so enable logging.
        log4rs_test_utils::test_logging::init_logging_once_for(["vote_manager"], None, None);

        let report = run_session("example_sessions/session.json").unwrap();
        assert_eq!(
            report.results.candidates,
            vec![
                result(1, "Ada", false, 3),
                result(2, "Haskell", false, 2),
                result(3, "Erlang", false, 1),
                result(4, "Vakant1", true, 1),
                result(5, "Vakant2", true, 1),
                result(6, "Vakant3", true, 0),
            ]
        );
        assert!(report.rejections.is_empty());
        assert!(!report.results.is_open);
        assert_eq!(report.results.ballots_accepted, 5);

        let report = run_session("example_sessions/session_rejections.json").unwrap();
        assert_eq!(
            report
                .rejections
                .iter()
                .map(|rejection| (rejection.voter.as_str(), rejection.kind))
                .collect::<Vec<_>>(),
            vec![
                ("1", RejectionKind::InvalidSelection),
                ("2", RejectionKind::TooManyVotes),
                ("3", RejectionKind::DuplicateSelection),
                ("0", RejectionKind::DuplicateVoter),
                ("7", RejectionKind::InvalidSelection),
            ]
        );
        assert_eq!(report.results.ballots_accepted, 2);
        assert_eq!(report.results.candidates[0], result(1, "Ada", false, 1));
        assert_eq!(report.results.candidates[1], result(4, "Vakant1", true, 1));

        assert!(matches!(
            run_session("example_sessions/session_malformed.json"),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            run_session("not a real file"),
            Err(Error::IO(_))
        ));
    }

    #[test]
    fn correct_cli_usage() {
        let command_line = [PROGRAM_NAME, "example_sessions/session.json"];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 0);

        let command_line = [PROGRAM_NAME, "--json", "example_sessions/session.json"];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 0);

        let command_line = [PROGRAM_NAME, "-q", "example_sessions/session_rejections.json"];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 255);

        let command_line = [PROGRAM_NAME, "example_sessions/session_malformed.json"];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 1);

        let command_line = [PROGRAM_NAME, "not a real file"];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 1);
    }

    #[test]
    fn bad_cli_usage() {
        // Something very wrong.
        let command_line = [PROGRAM_NAME, "this", "invocation", "is", "incorrect"];
        cli().try_get_matches_from(command_line).unwrap_err();

        // No options at all.
        let command_line = [PROGRAM_NAME];
        cli().try_get_matches_from(command_line).unwrap_err();

        // Unknown flag.
        let command_line = [PROGRAM_NAME, "--loud", "example_sessions/session.json"];
        cli().try_get_matches_from(command_line).unwrap_err();
    }
}
