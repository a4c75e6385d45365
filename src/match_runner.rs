//! Playing games through an external referee program.
//!
//! The referee owns everything about the game: it builds both players from their names, plays
//! the game and prints the result. It is called as
//!
//! ```text
//! <command> [args...] <first> <second> --move-time <secs> --resign <score> [--moves m1,m2] [--verbose]
//! ```
//!
//! and must print one `label score` line per seat, first seat first. Exit status `0` is a finished
//! game, [`TOO_LONG_EXIT_CODE`] a game aborted for length; anything else is a failure.

use std::process::{Command, Output, Stdio};

use anyhow::{anyhow, bail, Context};
use tracing::{debug, instrument, trace};

use crate::agent::Agent;
use crate::error::MatchError;
use crate::game_interface::{MatchExecutor, MatchReport, MatchRequest};

/// Exit code a referee uses to report a game that ran too long.
pub const TOO_LONG_EXIT_CODE: i32 = 3;

/// A [`MatchExecutor`] running each game in a referee process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefereeProcess {
    command: String,
    args: Vec<String>,
    allow_stderr: bool,
}

impl RefereeProcess {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> RefereeProcess {
        RefereeProcess {
            command: command.into(),
            args,
            allow_stderr: false,
        }
    }

    /// Let the referee's stderr through to the terminal instead of capturing it.
    pub fn with_stderr(mut self, value: bool) -> Self {
        self.allow_stderr = value;
        self
    }

    /// Full argument list for one game.
    pub fn arguments<A: Agent>(&self, request: &MatchRequest<'_, A>) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(request.first.name().to_owned());
        args.push(request.second.name().to_owned());
        args.push("--move-time".to_owned());
        args.push(request.move_time.as_secs_f64().to_string());
        args.push("--resign".to_owned());
        args.push(request.resign_score.to_string());
        if let Some(moves) = request.opening {
            args.push("--moves".to_owned());
            args.push(moves.join(","));
        }
        if request.verbose {
            args.push("--verbose".to_owned());
        }
        args
    }

    fn run(&self, args: &[String]) -> anyhow::Result<Output> {
        let mut cmd = Command::new(&self.command);
        cmd.args(args).stdin(Stdio::null());
        if self.allow_stderr {
            cmd.stderr(Stdio::inherit());
        }
        cmd.output()
            .with_context(|| format!("command '{}' could not be run", self.command))
    }
}

impl<A: Agent> MatchExecutor<A> for RefereeProcess {
    #[instrument(skip_all, fields(first = request.first.name(), second = request.second.name()))]
    fn play(&mut self, request: MatchRequest<'_, A>) -> Result<MatchReport, MatchError> {
        let verbose = request.verbose;
        let args = self.arguments(&request);
        trace!(command = %self.command, ?args);
        let output = self.run(&args)?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        match output.status.code() {
            Some(0) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let report = parse_report(&stdout)?;
                if verbose {
                    for line in trace_lines(&stdout) {
                        println!("{line}");
                    }
                }
                debug!(?report, "referee finished");
                Ok(report)
            }
            Some(TOO_LONG_EXIT_CODE) => Err(MatchError::TooLong {
                reason: stderr.trim().to_owned(),
            }),
            code => Err(MatchError::Failed(anyhow!(
                "referee exited with {}: {}",
                code.map_or_else(|| "a signal".to_owned(), |c| format!("code {c}")),
                stderr.trim()
            ))),
        }
    }
}

fn result_lines(stdout: &str) -> Vec<&str> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Everything a referee printed before its two result lines.
pub fn trace_lines(stdout: &str) -> Vec<&str> {
    let lines: Vec<&str> = stdout.lines().filter(|l| !l.trim().is_empty()).collect();
    let end = lines.len().saturating_sub(2);
    lines[..end].to_vec()
}

/// Reads the last two `label score` lines printed by a referee.
///
/// Earlier lines are ignored so that referees can print a game trace before the result.
pub fn parse_report(stdout: &str) -> anyhow::Result<MatchReport> {
    let lines = result_lines(stdout);
    let [.., first, second] = lines.as_slice() else {
        bail!("expected two result lines, got {stdout:?}");
    };
    Ok(MatchReport {
        first: parse_seat(first)?,
        second: parse_seat(second)?,
    })
}

fn parse_seat(line: &str) -> anyhow::Result<(String, f64)> {
    let Some((label, score)) = line.rsplit_once(char::is_whitespace) else {
        bail!("malformed result line '{line}'");
    };
    let score = score
        .parse()
        .with_context(|| format!("invalid score in result line '{line}'"))?;
    Ok((label.trim().to_owned(), score))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::agent::NamedAgent;

    fn request<'a>(
        first: &'a NamedAgent,
        second: &'a NamedAgent,
        opening: Option<&'a [String]>,
    ) -> MatchRequest<'a, NamedAgent> {
        MatchRequest {
            first,
            second,
            move_time: Duration::from_millis(1500),
            opening,
            resign_score: 0.1,
            verbose: false,
        }
    }

    #[test]
    fn parse_two_lines() {
        let report = parse_report("trace...\nblack 100\nwhite 0\n").unwrap();
        assert_eq!(report.first, ("black".to_string(), 100.0));
        assert_eq!(report.second, ("white".to_string(), 0.0));
    }

    #[test]
    fn parse_draw_scores() {
        let report = parse_report("p one 50\np two 50.0").unwrap();
        assert_eq!(report.first.0, "p one");
        assert_eq!(report.second.1, 50.0);
    }

    #[test]
    fn trace_is_everything_before_the_result() {
        let stdout = "move 1: j10\n\n  move 2: k11\nblack 100\nwhite 0\n";
        assert_eq!(trace_lines(stdout), ["move 1: j10", "  move 2: k11"]);
        assert!(trace_lines("black 100\nwhite 0").is_empty());
        assert!(trace_lines("").is_empty());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_report("black 100\n").is_err());
        assert!(parse_report("black 100\nwhite zero\n").is_err());
        assert!(parse_report("").is_err());
    }

    #[test]
    fn arguments_carry_the_request() {
        let referee = RefereeProcess::new("referee", vec!["--game".into(), "hex13".into()]);
        let a = NamedAgent::new("h1_25");
        let b = NamedAgent::new("random");
        let opening = vec!["j10".to_string(), "k11".to_string()];

        let args = referee.arguments(&request(&a, &b, Some(&opening)));
        assert_eq!(
            args,
            [
                "--game",
                "hex13",
                "h1_25",
                "random",
                "--move-time",
                "1.5",
                "--resign",
                "0.1",
                "--moves",
                "j10,k11"
            ]
        );
        assert!(!referee.arguments(&request(&a, &b, None)).contains(&"--moves".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn shell_referee_round_trip() {
        let mut referee = RefereeProcess::new(
            "sh",
            vec!["-c".into(), "echo \"$0 100\"; echo \"$1 0\"".into()],
        );
        let a = NamedAgent::new("alpha");
        let b = NamedAgent::new("beta");
        let report = referee.play(request(&a, &b, None)).unwrap();
        assert_eq!(report.first, ("alpha".to_string(), 100.0));
        assert_eq!(report.second, ("beta".to_string(), 0.0));
    }

    #[cfg(unix)]
    #[test]
    fn exit_codes_map_to_errors() {
        let a = NamedAgent::new("alpha");
        let b = NamedAgent::new("beta");

        let mut too_long = RefereeProcess::new("sh", vec!["-c".into(), "exit 3".into()]);
        let err = too_long.play(request(&a, &b, None)).unwrap_err();
        assert!(matches!(err, MatchError::TooLong { .. }));

        let mut broken = RefereeProcess::new("sh", vec!["-c".into(), "exit 1".into()]);
        let err = broken.play(request(&a, &b, None)).unwrap_err();
        assert!(matches!(err, MatchError::Failed(_)));

        let mut missing = RefereeProcess::new("/definitely/not/a/referee", vec![]);
        let err = missing.play(request(&a, &b, None)).unwrap_err();
        assert!(matches!(err, MatchError::Failed(_)));
    }
}
