//! Handlers for the back/lay calculators: `matched`, `early-payout`,
//! `acca` and `each-way`.

use serde::Serialize;

use crate::cli::dutch::ScenarioRow;
use crate::cli::output;
use crate::cli::{AccaArgs, BackLayArgs, EachWayArgs, EarlyPayoutArgs, MatchedArgs, RefundChoice};
use crate::config::Config;
use crate::domain::{
    compute_risk_metrics, evaluate_scenarios, place_odds, to_decimal, AccaRefund, Accumulator,
    Commission, EachWay, EarlyPayout, MarketPrices, MatchedBet, Odds, RiskSummary, Scenario,
    ScenarioSource,
};
use crate::error::Result;

#[derive(Serialize)]
struct MatchedReport<'a> {
    bet: &'a MatchedBet,
    lay_stake: f64,
    liability: f64,
    capital_at_risk: f64,
    scenarios: &'a [Scenario],
    risk: RiskSummary,
}

#[derive(Serialize)]
struct EarlyPayoutReport<'a> {
    bet: &'a MatchedBet,
    lay_stake: f64,
    liability: f64,
    scenarios: &'a [Scenario],
    risk: RiskSummary,
}

#[derive(Serialize)]
struct AccaReport<'a> {
    acca: &'a Accumulator,
    combined_back_odds: Odds,
    combined_lay_odds: Odds,
    lay_stake: f64,
    liability: f64,
    refund_value: f64,
    scenarios: &'a [Scenario],
    risk: RiskSummary,
}

#[derive(Serialize)]
struct EachWayReport<'a> {
    each_way: &'a EachWay,
    win_lay_stake: f64,
    place_lay_stake: f64,
    capital_at_risk: f64,
    scenarios: &'a [Scenario],
    risk: RiskSummary,
}

struct Prices {
    back: Odds,
    lay: Odds,
    commission: Commission,
}

fn exchange_commission(percent: Option<f64>, config: &Config) -> Result<Commission> {
    Ok(match percent {
        Some(percent) => Commission::from_percent(percent)?,
        None => config.commission(),
    })
}

fn prices(args: &BackLayArgs, config: &Config) -> Result<Prices> {
    let format = args.format.unwrap_or(config.defaults.odds_format);
    Ok(Prices {
        back: to_decimal(args.back_odds.as_str(), format)?,
        lay: to_decimal(args.lay_odds.as_str(), format)?,
        commission: exchange_commission(args.commission, config)?,
    })
}

/// Execute `matched`: lay stake and both outcomes of a back/lay pair.
pub fn execute(args: &MatchedArgs, config: &Config) -> Result<()> {
    let p = prices(&args.prices, config)?;
    let mut bet = MatchedBet::new(p.back, p.lay, p.commission, args.prices.stake, args.kind)?;
    if let Some(percent) = args.matched_percent {
        bet = bet.with_matched_fraction(percent / 100.0)?;
    }

    let scenarios = evaluate_scenarios(ScenarioSource::Matched(&bet))?;
    let risk = compute_risk_metrics(&scenarios, bet.capital_at_risk(), &config.risk_config())?;

    if output::is_json() {
        return output::emit_json(&MatchedReport {
            bet: &bet,
            lay_stake: bet.lay_stake(),
            liability: bet.liability(),
            capital_at_risk: bet.capital_at_risk(),
            scenarios: &scenarios,
            risk,
        });
    }

    output::section(&format!("Matched bet ({})", bet.kind()));
    output::key_value("Back", format!("{} @ {}", output::money(bet.back_stake()), bet.back_odds()));
    output::key_value("Lay stake", format!("{} @ {}", output::money(bet.lay_stake()), bet.lay_odds()));
    output::key_value("Liability", output::money(bet.liability()));
    output::key_value("Commission", output::percent(bet.commission().rate() * 100.0));
    if bet.is_partially_matched() {
        output::key_value("Matched", output::percent(bet.matched_fraction() * 100.0));
        output::warn(&format!(
            "{} of the lay is unmatched",
            output::money(bet.unmatched_lay_stake())
        ));
    }

    output::section("Scenarios");
    output::table(scenarios.iter().map(ScenarioRow::from));

    render_risk(&risk, free_bet_stake(&bet));
    Ok(())
}

/// Execute `early-payout`: the four trigger/result outcomes of an offer.
pub fn execute_early_payout(args: &EarlyPayoutArgs, config: &Config) -> Result<()> {
    let p = prices(&args.prices, config)?;
    let offer = EarlyPayout::new(p.back, p.lay, p.commission, args.prices.stake)?;
    let bet = offer.bet();

    let scenarios = evaluate_scenarios(ScenarioSource::EarlyPayout(&offer))?;
    let risk = compute_risk_metrics(&scenarios, bet.capital_at_risk(), &config.risk_config())?;

    if output::is_json() {
        return output::emit_json(&EarlyPayoutReport {
            bet,
            lay_stake: bet.lay_stake(),
            liability: bet.liability(),
            scenarios: &scenarios,
            risk,
        });
    }

    output::section("Early payout");
    output::key_value("Back", format!("{} @ {}", output::money(bet.back_stake()), bet.back_odds()));
    output::key_value("Lay stake", format!("{} @ {}", output::money(bet.lay_stake()), bet.lay_odds()));
    output::key_value("Liability", output::money(bet.liability()));

    output::section("Scenarios");
    output::table(scenarios.iter().map(ScenarioRow::from));

    render_risk(&risk, None);
    Ok(())
}

/// Execute `acca`: lay an accumulator at its combined price.
pub fn execute_acca(args: &AccaArgs, config: &Config) -> Result<()> {
    let format = args.format.unwrap_or(config.defaults.odds_format);
    let legs = args
        .legs
        .iter()
        .map(|leg| leg.to_leg(format))
        .collect::<Result<Vec<_>>>()?;
    let commission = exchange_commission(args.commission, config)?;
    let refund = match args.refund {
        RefundChoice::None => AccaRefund::None,
        RefundChoice::Cash => AccaRefund::Cash,
        RefundChoice::FreeBet => AccaRefund::free_bet(args.retention / 100.0)?,
    };

    let acca = Accumulator::new(&legs, commission, args.stake, refund)?;
    let bet = acca.bet();
    let scenarios = evaluate_scenarios(ScenarioSource::Accumulator(&acca))?;
    let risk = compute_risk_metrics(&scenarios, bet.capital_at_risk(), &config.risk_config())?;

    if output::is_json() {
        return output::emit_json(&AccaReport {
            acca: &acca,
            combined_back_odds: bet.back_odds(),
            combined_lay_odds: bet.lay_odds(),
            lay_stake: bet.lay_stake(),
            liability: bet.liability(),
            refund_value: acca.refund_value(),
            scenarios: &scenarios,
            risk,
        });
    }

    output::section(&format!("Accumulator ({} legs)", acca.leg_count()));
    output::key_value(
        "Back",
        format!("{} @ {:.3}", output::money(bet.back_stake()), bet.back_odds().value()),
    );
    output::key_value(
        "Lay stake",
        format!("{} @ {:.3}", output::money(bet.lay_stake()), bet.lay_odds().value()),
    );
    output::key_value("Liability", output::money(bet.liability()));
    output::key_value("Refund value", output::money(acca.refund_value()));

    output::section("Scenarios");
    output::table(scenarios.iter().map(ScenarioRow::from));

    render_risk(&risk, None);
    Ok(())
}

/// Execute `each-way`: match the win and place halves separately.
pub fn execute_each_way(args: &EachWayArgs, config: &Config) -> Result<()> {
    let format = args.format.unwrap_or(config.defaults.odds_format);
    let win = MarketPrices {
        back: to_decimal(args.back_odds.as_str(), format)?,
        lay: to_decimal(args.lay_odds.as_str(), format)?,
    };
    let place_back = match &args.place_odds {
        Some(odds) => to_decimal(odds.as_str(), format)?,
        None => place_odds(win.back, args.place_terms)?,
    };
    let place = MarketPrices {
        back: place_back,
        lay: to_decimal(args.place_lay_odds.as_str(), format)?,
    };
    let commission = exchange_commission(args.commission, config)?;

    let each_way = EachWay::new(win, place, commission, args.stake)?;
    let scenarios = evaluate_scenarios(ScenarioSource::EachWay(&each_way))?;
    let risk = compute_risk_metrics(
        &scenarios,
        each_way.capital_at_risk(),
        &config.risk_config(),
    )?;

    if output::is_json() {
        return output::emit_json(&EachWayReport {
            each_way: &each_way,
            win_lay_stake: each_way.win().lay_stake(),
            place_lay_stake: each_way.place().lay_stake(),
            capital_at_risk: each_way.capital_at_risk(),
            scenarios: &scenarios,
            risk,
        });
    }

    output::section("Each-way");
    for (label, part) in [("Win", each_way.win()), ("Place", each_way.place())] {
        output::key_value(
            label,
            format!(
                "{} @ {}, lay {} @ {}",
                output::money(part.back_stake()),
                part.back_odds(),
                output::money(part.lay_stake()),
                part.lay_odds()
            ),
        );
    }
    output::key_value(
        "Liability",
        output::money(each_way.win().liability() + each_way.place().liability()),
    );

    output::section("Scenarios");
    output::table(scenarios.iter().map(ScenarioRow::from));

    render_risk(&risk, None);
    Ok(())
}

fn free_bet_stake(bet: &MatchedBet) -> Option<f64> {
    bet.kind().is_free_bet().then_some(bet.back_stake())
}

fn render_risk(risk: &RiskSummary, free_bet_stake: Option<f64>) {
    output::section("Summary");
    output::key_value("Worst case", output::profit(risk.worst_case));
    output::key_value("Best case", output::profit(risk.best_case));
    if let Some(stake) = free_bet_stake {
        // Share of the free bet's face value kept as cash.
        let retention = risk.worst_case / stake * 100.0;
        output::key_value("Retention", output::percent(retention));
    } else {
        output::key_value("Qualifying loss", output::money(risk.qualifying_loss));
    }
    if risk.is_risk_free {
        output::ok("Risk-free");
    }
}
