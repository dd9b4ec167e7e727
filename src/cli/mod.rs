//! Command-line interface definitions.
//!
//! Each calculator subcommand is a thin caller: it turns flags into engine
//! inputs, runs the pipeline and renders the result.

pub mod config;
pub mod convert;
pub mod dutch;
pub mod kelly;
pub mod legs;
pub mod matched;
pub mod output;

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::domain::{CommissionModel, MatchedBetKind, OddsFormat};
use crate::error::Result;

use legs::{parse_custom_stake, parse_place_terms, AccaLegArg, LegArg};

/// Matched betting calculators: odds conversion, dutching, arbitrage,
/// lay bets, accumulators, each-way bets and Kelly staking.
#[derive(Parser, Debug)]
#[command(name = "layline")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Force or release the global color override.
    pub fn apply(&self) {
        match self {
            Self::Auto => owo_colors::unset_override(),
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert odds between decimal, fractional and American notation
    Convert(ConvertArgs),

    /// Split a stake across selections to equalise profit
    Dutch(DutchArgs),

    /// Check whether a set of prices is an arbitrage
    Arb(ArbArgs),

    /// Lay stake and outcomes for a back/lay matched bet
    Matched(MatchedArgs),

    /// Four-scenario outcomes for an early payout offer
    EarlyPayout(EarlyPayoutArgs),

    /// Lay an accumulator at its combined price, with refund insurance
    Acca(AccaArgs),

    /// Match both halves of an each-way bet
    EachWay(EachWayArgs),

    /// Kelly criterion stake sizing
    Kelly(KellyArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `layline config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied
    Show,
    /// Validate the configuration file
    Validate,
}

/// Arguments for `layline convert`.
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Odds to convert, e.g. 2.5, 3/2 or +150
    #[arg(allow_negative_numbers = true)]
    pub value: String,

    /// Notation of VALUE [decimal, fractional, american]
    #[arg(long)]
    pub from: Option<OddsFormat>,
}

/// Arguments for `layline dutch`.
#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("objective").required(true)))]
pub struct DutchArgs {
    /// Selection as NAME=ODDS[@COMMISSION%], repeatable; commission defaults to 0
    #[arg(long = "leg", required = true, value_name = "LEG")]
    pub legs: Vec<LegArg>,

    /// Split this total stake
    #[arg(long, group = "objective")]
    pub total_stake: Option<f64>,

    /// Lock in this profit
    #[arg(long, group = "objective")]
    pub target_profit: Option<f64>,

    /// Fix one leg's stake, as NAME=AMOUNT
    #[arg(long, group = "objective", value_parser = parse_custom_stake)]
    pub custom_stake: Option<(String, f64)>,

    /// Commission model [winnings, payout]
    #[arg(long)]
    pub model: Option<CommissionModel>,

    /// Notation of leg odds [decimal, fractional, american]
    #[arg(long)]
    pub format: Option<OddsFormat>,
}

/// Arguments for `layline arb`.
#[derive(Parser, Debug)]
pub struct ArbArgs {
    /// Selection as NAME=ODDS[@COMMISSION%], repeatable; commission defaults to 0
    #[arg(long = "leg", value_name = "LEG")]
    pub legs: Vec<LegArg>,

    /// Commission model [winnings, payout]
    #[arg(long)]
    pub model: Option<CommissionModel>,

    /// Notation of leg odds [decimal, fractional, american]
    #[arg(long)]
    pub format: Option<OddsFormat>,
}

/// Back/lay prices shared by the two-sided calculators.
#[derive(Parser, Debug)]
pub struct BackLayArgs {
    /// Bookmaker back odds
    #[arg(long, allow_hyphen_values = true)]
    pub back_odds: String,

    /// Exchange lay odds
    #[arg(long, allow_hyphen_values = true)]
    pub lay_odds: String,

    /// Back stake
    #[arg(long)]
    pub stake: f64,

    /// Exchange commission in percent (default from config)
    #[arg(long)]
    pub commission: Option<f64>,

    /// Notation of the odds [decimal, fractional, american]
    #[arg(long)]
    pub format: Option<OddsFormat>,
}

/// Arguments for `layline matched`.
#[derive(Parser, Debug)]
pub struct MatchedArgs {
    #[command(flatten)]
    pub prices: BackLayArgs,

    /// Bet type [qualifying, snr, sr]
    #[arg(long, default_value = "qualifying")]
    pub kind: MatchedBetKind,

    /// Percent of the lay stake the exchange matched (default 100)
    #[arg(long)]
    pub matched_percent: Option<f64>,
}

/// Arguments for `layline early-payout`.
#[derive(Parser, Debug)]
pub struct EarlyPayoutArgs {
    #[command(flatten)]
    pub prices: BackLayArgs,
}

/// Refund paid when one accumulator leg loses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RefundChoice {
    /// No refund
    #[default]
    None,
    /// Stake back as cash
    Cash,
    /// Stake back as a free bet
    FreeBet,
}

/// Arguments for `layline acca`.
#[derive(Parser, Debug)]
pub struct AccaArgs {
    /// Selection as NAME=BACK:LAY, repeatable
    #[arg(long = "leg", required = true, value_name = "LEG")]
    pub legs: Vec<AccaLegArg>,

    /// Accumulator back stake
    #[arg(long)]
    pub stake: f64,

    /// Exchange commission in percent (default from config)
    #[arg(long)]
    pub commission: Option<f64>,

    /// Refund when exactly one leg loses [none, cash, free-bet]
    #[arg(long, value_enum, default_value = "none")]
    pub refund: RefundChoice,

    /// Percent of a free-bet refund you expect to keep
    #[arg(long, default_value_t = 70.0)]
    pub retention: f64,

    /// Notation of leg odds [decimal, fractional, american]
    #[arg(long)]
    pub format: Option<OddsFormat>,
}

/// Arguments for `layline each-way`.
#[derive(Parser, Debug)]
pub struct EachWayArgs {
    /// Bookmaker win odds
    #[arg(long, allow_hyphen_values = true)]
    pub back_odds: String,

    /// Exchange win-market lay odds
    #[arg(long, allow_hyphen_values = true)]
    pub lay_odds: String,

    /// Exchange place-market lay odds
    #[arg(long, allow_hyphen_values = true)]
    pub place_lay_odds: String,

    /// Bookmaker place odds (default: win odds at the place terms)
    #[arg(long, allow_hyphen_values = true)]
    pub place_odds: Option<String>,

    /// Place terms as a fraction of the win odds
    #[arg(long, default_value = "1/4", value_parser = parse_place_terms)]
    pub place_terms: f64,

    /// Total stake, split evenly between win and place
    #[arg(long)]
    pub stake: f64,

    /// Exchange commission in percent (default from config)
    #[arg(long)]
    pub commission: Option<f64>,

    /// Notation of the odds [decimal, fractional, american]
    #[arg(long)]
    pub format: Option<OddsFormat>,
}

/// Arguments for `layline kelly`.
#[derive(Parser, Debug)]
pub struct KellyArgs {
    /// Back odds
    #[arg(long, allow_hyphen_values = true)]
    pub odds: String,

    /// Your estimated win probability, between 0 and 1
    #[arg(long)]
    pub probability: f64,

    /// Cap on the staked fraction (default from config)
    #[arg(long)]
    pub max_fraction: Option<f64>,

    /// Bankroll to size the stake against
    #[arg(long)]
    pub bankroll: Option<f64>,

    /// Notation of the odds [decimal, fractional, american]
    #[arg(long)]
    pub format: Option<OddsFormat>,
}

/// Dispatch a parsed command.
pub fn run(command: &Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Convert(args) => convert::execute(args, config),
        Commands::Dutch(args) => dutch::execute(args, config),
        Commands::Arb(args) => dutch::execute_arb(args, config),
        Commands::Matched(args) => matched::execute(args, config),
        Commands::EarlyPayout(args) => matched::execute_early_payout(args, config),
        Commands::Acca(args) => matched::execute_acca(args, config),
        Commands::EachWay(args) => matched::execute_each_way(args, config),
        Commands::Kelly(args) => kelly::execute(args, config),
        Commands::Config(ConfigCommand::Show) => config::show(config),
        Commands::Config(ConfigCommand::Validate) => config::validate(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
        assert_eq!(Cli::command().get_name(), "layline");
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["layline", "--json", "-q", "-vv", "convert", "2.5"]).unwrap();
        assert!(cli.json);
        assert!(cli.quiet);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.color, ColorChoice::Auto));
    }

    #[test]
    fn test_parse_convert_negative_american() {
        let cli =
            Cli::try_parse_from(["layline", "convert", "-110", "--from", "american"]).unwrap();
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.value, "-110");
                assert_eq!(args.from, Some(OddsFormat::American));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_dutch_custom_stake() {
        let cli = Cli::try_parse_from([
            "layline",
            "dutch",
            "--leg",
            "home=2.1",
            "--leg",
            "away=2.0@5%",
            "--custom-stake",
            "away=50",
            "--model",
            "payout",
        ])
        .unwrap();
        match cli.command {
            Commands::Dutch(args) => {
                assert_eq!(args.legs.len(), 2);
                assert_eq!(args.legs[1].commission_percent, Some(5.0));
                assert_eq!(args.custom_stake, Some(("away".to_string(), 50.0)));
                assert_eq!(args.model, Some(CommissionModel::Payout));
                assert!(args.total_stake.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_dutch_objectives_are_exclusive() {
        let result = Cli::try_parse_from([
            "layline",
            "dutch",
            "--leg",
            "a=2.1",
            "--leg",
            "b=2.0",
            "--total-stake",
            "100",
            "--target-profit",
            "5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_matched_kind() {
        let cli = Cli::try_parse_from([
            "layline",
            "matched",
            "--back-odds",
            "4.0",
            "--lay-odds",
            "4.2",
            "--stake",
            "10",
            "--kind",
            "snr",
        ])
        .unwrap();
        match cli.command {
            Commands::Matched(args) => {
                assert_eq!(args.kind, MatchedBetKind::FreeBetSnr);
                assert_eq!(args.prices.commission, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_matched_partial() {
        let cli = Cli::try_parse_from([
            "layline",
            "matched",
            "--back-odds",
            "3.0",
            "--lay-odds",
            "3.1",
            "--stake",
            "100",
            "--matched-percent",
            "50",
        ])
        .unwrap();
        match cli.command {
            Commands::Matched(args) => {
                assert_eq!(args.matched_percent, Some(50.0));
                assert_eq!(args.kind, MatchedBetKind::Qualifying);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_acca() {
        let cli = Cli::try_parse_from([
            "layline",
            "acca",
            "--leg",
            "a=2.0:2.1",
            "--leg",
            "b=1.5:1.55",
            "--stake",
            "10",
            "--refund",
            "free-bet",
        ])
        .unwrap();
        match cli.command {
            Commands::Acca(args) => {
                assert_eq!(args.legs.len(), 2);
                assert_eq!(args.legs[1].lay_odds, "1.55");
                assert_eq!(args.refund, RefundChoice::FreeBet);
                assert_eq!(args.retention, 70.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_each_way_terms() {
        let cli = Cli::try_parse_from([
            "layline",
            "each-way",
            "--back-odds",
            "11.0",
            "--lay-odds",
            "11.5",
            "--place-lay-odds",
            "3.2",
            "--place-terms",
            "1/5",
            "--stake",
            "20",
        ])
        .unwrap();
        match cli.command {
            Commands::EachWay(args) => {
                assert_eq!(args.place_terms, 0.2);
                assert_eq!(args.place_odds, None);
            }
            other => panic!("unexpected command {other:?}"),
        }

        assert!(Cli::try_parse_from([
            "layline",
            "each-way",
            "--back-odds",
            "11.0",
            "--lay-odds",
            "11.5",
            "--place-lay-odds",
            "3.2",
            "--place-terms",
            "2/1",
            "--stake",
            "20",
        ])
        .is_err());
    }

    #[test]
    fn test_parse_config_subcommands() {
        let cli = Cli::try_parse_from(["layline", "config", "validate", "-c", "x.toml"]).unwrap();
        assert!(matches!(cli.command, Commands::Config(ConfigCommand::Validate)));
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }
}
