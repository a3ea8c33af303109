//! Split advisor: prompt, call, parse, normalize.

use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::parse::parse_split;
use super::prompt::split_prompt;
use super::reasoning::{GenerationConfig, GenerationRequest, ReasoningClient, Turn};
use crate::goal::Goal;
use crate::investment::{SPLIT_TOLERANCE, Split};

const DEFAULT_EQUITY: Decimal = dec!(60);
const DEFAULT_DEBT: Decimal = dec!(40);

/// An integral split proposal. The two sides always sum to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SplitProposal {
    /// Equity percentage.
    pub percentage_equity: u8,
    /// Debt percentage.
    pub percentage_debt: u8,
}

impl SplitProposal {
    /// The 60/40 default.
    pub const DEFAULT: Self = Self {
        percentage_equity: 60,
        percentage_debt: 40,
    };

    /// Converts to a stored split.
    #[must_use]
    pub fn split(self) -> Split {
        Split::from_equity(Decimal::from(self.percentage_equity)).unwrap_or_else(|_| Split::fallback())
    }
}

/// Clamps, rescales and rounds a raw pair into an integral proposal.
///
/// Each side is clamped into `[0, 100]`. A pair that misses 100 by more than
/// [`SPLIT_TOLERANCE`] is rescaled proportionally; a zero pair yields the
/// default. Equity is then rounded half away from zero and debt takes the rest.
#[must_use]
pub fn normalize(equity: Decimal, debt: Decimal) -> SplitProposal {
    let equity = equity.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let debt = debt.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

    let sum = equity + debt;
    let equity = if (sum - Decimal::ONE_HUNDRED).abs() > SPLIT_TOLERANCE {
        if sum.is_zero() {
            return SplitProposal::DEFAULT;
        }
        round_half_up(equity / sum * Decimal::ONE_HUNDRED)
    } else {
        equity
    };

    let Some(equity) = round_half_up(equity).to_u8() else {
        return SplitProposal::DEFAULT;
    };
    SplitProposal {
        percentage_equity: equity,
        percentage_debt: 100 - equity,
    }
}

fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Proposes equity/debt splits for goals.
///
/// Never fails: every upstream or parse problem degrades to the 60/40 default.
pub struct SplitAdvisor {
    client: Arc<dyn ReasoningClient>,
}

impl SplitAdvisor {
    /// Creates a new advisor.
    #[must_use]
    pub fn new(client: Arc<dyn ReasoningClient>) -> Self {
        Self { client }
    }

    /// Proposes a split for `goal`, optionally informed by questionnaire answers.
    pub async fn propose(&self, goal: &Goal, answers: Option<&Value>) -> SplitProposal {
        let request = GenerationRequest {
            contents: vec![Turn::user(split_prompt(goal, answers))],
            config: GenerationConfig::split(),
        };

        let text = match self.client.generate(&request).await {
            Ok(text) => text,
            Err(e) => {
                warn!(goal_id = %goal.id, error = %e, "Split advice unavailable, using default split");
                return SplitProposal::DEFAULT;
            }
        };

        let Some(raw) = parse_split(text.trim()) else {
            warn!(goal_id = %goal.id, response = %text, "Unparseable split advice, using default split");
            return SplitProposal::DEFAULT;
        };

        let proposal = normalize(
            raw.equity.unwrap_or(DEFAULT_EQUITY),
            raw.debt.unwrap_or(DEFAULT_DEBT),
        );
        debug!(
            goal_id = %goal.id,
            equity = proposal.percentage_equity,
            debt = proposal.percentage_debt,
            "Split proposed"
        );
        proposal
    }
}
