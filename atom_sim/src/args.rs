//! Command-line arguments

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Headless driver for the atom production core
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "atom_sim")]
#[command(about = "Play a headless atom session and print the production breakdown", long_about = None)]
#[command(version)]
pub struct SimArgs {
    /// Catalog TOML (built-in when omitted)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Production constants TOML (built-in when omitted)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Save file to resume from and write back
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Manual actions to perform
    #[arg(long, default_value_t = 100)]
    pub clicks: u64,

    /// Seconds of online play
    #[arg(long = "online", value_name = "SECS", default_value_t = 60.0, value_parser = parse_seconds)]
    pub online_secs: f64,

    /// Seconds away after the session
    #[arg(long = "offline", value_name = "SECS", default_value_t = 0.0, value_parser = parse_seconds)]
    pub offline_secs: f64,

    /// RNG seed (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Never buy upgrades
    #[arg(long = "no-buy", action = ArgAction::SetFalse)]
    pub auto_buy: bool,

    /// Never claim frenzy tokens
    #[arg(long = "no-claim", action = ArgAction::SetFalse)]
    pub auto_claim: bool,
}

/// Finite, non-negative seconds
fn parse_seconds(raw: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs >= 0.0 => Ok(secs),
        _ => Err(format!("'{}' is not a non-negative number of seconds", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<SimArgs, clap::Error> {
        SimArgs::try_parse_from(std::iter::once("atom_sim").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.catalog, None);
        assert_eq!(args.save, None);
        assert_eq!(args.clicks, 100);
        assert_eq!(args.online_secs, 60.0);
        assert_eq!(args.offline_secs, 0.0);
        assert_eq!(args.seed, None);
        assert!(args.auto_buy);
        assert!(args.auto_claim);
    }

    #[test]
    fn test_all_flags() {
        let args = parse(&[
            "--save", "run.json", "--clicks", "5", "--online", "30", "--offline", "3600",
            "--seed", "7", "--no-buy",
        ])
        .unwrap();
        assert_eq!(args.save, Some(PathBuf::from("run.json")));
        assert_eq!(args.clicks, 5);
        assert_eq!(args.online_secs, 30.0);
        assert_eq!(args.offline_secs, 3600.0);
        assert_eq!(args.seed, Some(7));
        assert!(!args.auto_buy);
        assert!(args.auto_claim);
    }

    #[test]
    fn test_errors() {
        assert!(parse(&["--bogus"]).is_err());
        assert!(parse(&["--clicks"]).is_err());
        assert!(parse(&["--clicks", "many"]).is_err());
        assert!(parse(&["--online", "-5"]).is_err());
        assert!(parse(&["--offline", "inf"]).is_err());
    }
}
