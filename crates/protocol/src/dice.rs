//! Dice results broadcast to the overlay.

use serde::{Deserialize, Serialize};

/// The outcome of a dice roll, as published to the overlay.
///
/// # Examples
///
/// ```
/// use gmscreen_protocol::DiceResult;
///
/// let result = DiceResult::new("2d6+3", vec![4, 5], 3);
/// assert_eq!(result.total, 12);
/// assert_eq!(result.summary(), "2d6+3: 4 5 +3 = 12");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceResult {
    /// The formula that was rolled, e.g. `"1d20+5"`.
    pub formula: String,
    /// Individual die faces, in roll order.
    pub rolls: Vec<i64>,
    /// Flat modifier added to the sum of the rolls.
    pub modifier: i64,
    /// Final total.
    pub total: i64,
}

impl DiceResult {
    /// Creates a result, computing the total from the rolls and modifier.
    #[must_use]
    pub fn new(formula: impl Into<String>, rolls: Vec<i64>, modifier: i64) -> Self {
        let total = rolls.iter().sum::<i64>() + modifier;
        Self {
            formula: formula.into(),
            rolls,
            modifier,
            total,
        }
    }

    /// Renders the result on a single line.
    ///
    /// The modifier is omitted when it is zero.
    #[must_use]
    pub fn summary(&self) -> String {
        let rolls = self
            .rolls
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        let modifier = match self.modifier {
            0 => String::new(),
            m if m > 0 => format!(" +{m}"),
            m => format!(" {m}"),
        };
        format!("{}: {rolls}{modifier} = {}", self.formula, self.total)
    }
}
