//! Each-way bets: half the stake on the win, half on the place.
//!
//! Each half is matched as its own qualifying back/lay pair, the win part
//! against the win market and the place part against the place market.

use serde::Serialize;

use super::error::{require_positive, CalcError};
use super::leg::Commission;
use super::matched::{MatchedBet, MatchedBetKind};
use super::odds::Odds;

/// Place odds paid at `terms` of the win odds, e.g. 1/4 of 5.0 gives 2.0.
///
/// # Errors
///
/// Returns `OutOfRange` unless `terms` is in (0, 1].
pub fn place_odds(win_odds: Odds, terms: f64) -> Result<Odds, CalcError> {
    if !(terms.is_finite() && terms > 0.0 && terms <= 1.0) {
        return Err(CalcError::OutOfRange {
            field: "place terms",
            value: terms,
        });
    }
    Odds::new(1.0 + (win_odds.value() - 1.0) * terms)
}

/// Back and lay prices for one market.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketPrices {
    pub back: Odds,
    pub lay: Odds,
}

/// An each-way bet with both parts matched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EachWay {
    win: MatchedBet,
    place: MatchedBet,
}

impl EachWay {
    /// Split `total_stake` evenly between the win and place parts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStakeAmount` if `total_stake` is not strictly positive.
    pub fn new(
        win: MarketPrices,
        place: MarketPrices,
        commission: Commission,
        total_stake: f64,
    ) -> Result<Self, CalcError> {
        let half = require_positive("each-way stake", total_stake)? / 2.0;
        let part = |prices: MarketPrices| {
            MatchedBet::new(prices.back, prices.lay, commission, half, MatchedBetKind::Qualifying)
        };
        Ok(Self {
            win: part(win)?,
            place: part(place)?,
        })
    }

    pub fn win(&self) -> &MatchedBet {
        &self.win
    }

    pub fn place(&self) -> &MatchedBet {
        &self.place
    }

    pub fn total_stake(&self) -> f64 {
        self.win.back_stake() + self.place.back_stake()
    }

    pub fn capital_at_risk(&self) -> f64 {
        self.win.capital_at_risk() + self.place.capital_at_risk()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn odds(v: f64) -> Odds {
        Odds::new(v).unwrap()
    }

    #[test]
    fn place_odds_from_terms() {
        assert_eq!(place_odds(odds(5.0), 0.25).unwrap().value(), 2.0);
        assert_eq!(place_odds(odds(11.0), 0.2).unwrap().value(), 3.0);
        for terms in [0.0, 1.5, f64::NAN] {
            assert!(matches!(
                place_odds(odds(5.0), terms),
                Err(CalcError::OutOfRange {
                    field: "place terms",
                    ..
                })
            ));
        }
    }

    #[test]
    fn stake_is_split_in_half() {
        let bet = EachWay::new(
            MarketPrices {
                back: odds(5.0),
                lay: odds(5.2),
            },
            MarketPrices {
                back: odds(2.0),
                lay: odds(2.1),
            },
            Commission::new(0.02).unwrap(),
            20.0,
        )
        .unwrap();

        assert_eq!(bet.win().back_stake(), 10.0);
        assert_eq!(bet.place().back_stake(), 10.0);
        assert_eq!(bet.total_stake(), 20.0);
        assert!((bet.win().lay_stake() - 9.652_509).abs() < 1e-6);
        assert!((bet.place().lay_stake() - 9.615_384).abs() < 1e-6);
    }

    #[test]
    fn stake_must_be_positive() {
        let prices = MarketPrices {
            back: odds(3.0),
            lay: odds(3.1),
        };
        assert!(matches!(
            EachWay::new(prices, prices, Commission::ZERO, 0.0),
            Err(CalcError::InvalidStakeAmount {
                field: "each-way stake",
                ..
            })
        ));
    }
}
