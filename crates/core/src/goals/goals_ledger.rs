//! Pure rules of the paired goal ledger.
//!
//! Everything here is storage-free so that the storage layer can apply the
//! same rules inside its write transaction and tests can exercise them
//! directly.

use chrono::NaiveDate;
use rand::Rng;

use super::goals_model::{
    MonthlyGoal, MonthlyGoalChanges, NewMonthlyGoal, NewPairedGoal, PairedGoalUpdate,
};
use crate::constants::{PAIR_PERCENTAGE_TOTAL, STATUS_ACTIVE};
use crate::errors::{invalid_input, Error, Result};

/// The partner's share given one side's share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairSplit {
    pub initiator_count: i32,
    pub percentage: i32,
}

/// `percentage_partner = 100 - percentage`,
/// `initiator_count_partner = connect_number - initiator_count`.
pub fn partner_split(connect_number: i32, initiator_count: i32, percentage: i32) -> PairSplit {
    PairSplit {
        initiator_count: connect_number - initiator_count,
        percentage: PAIR_PERCENTAGE_TOTAL - percentage,
    }
}

/// Rejects shares that would give the partner a negative value.
pub fn validate_split(connect_number: i32, initiator_count: i32, percentage: i32) -> Result<()> {
    if connect_number < 0 {
        return Err(invalid_input("Connect number cannot be negative"));
    }
    if !(0..=connect_number).contains(&initiator_count) {
        return Err(invalid_input(format!(
            "Initiator count must be between 0 and {}",
            connect_number
        )));
    }
    if !(0..=PAIR_PERCENTAGE_TOTAL).contains(&percentage) {
        return Err(invalid_input("Percentage must be between 0 and 100"));
    }
    Ok(())
}

pub fn validate_period(month_start: NaiveDate, month_end: NaiveDate) -> Result<()> {
    if month_start > month_end {
        return Err(invalid_input("Month start must not be after month end"));
    }
    Ok(())
}

impl NewPairedGoal {
    pub fn validate(&self) -> Result<()> {
        if self.user_id == self.partner_id {
            return Err(invalid_input("A goal pair needs two different users"));
        }
        validate_period(self.month_start, self.month_end)?;
        validate_split(self.connect_number, self.initiator_count, self.percentage)
    }
}

impl PairedGoalUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_period(self.month_start, self.month_end)?;
        validate_split(self.connect_number, self.initiator_count, self.percentage)
    }

    /// Changes for the edited row and for its sibling, in that order.
    pub fn pair_changes(&self) -> (MonthlyGoalChanges, MonthlyGoalChanges) {
        let split = partner_split(self.connect_number, self.initiator_count, self.percentage);
        let own = MonthlyGoalChanges {
            month_start: self.month_start,
            month_end: self.month_end,
            connect_number: self.connect_number,
            initiator_count: self.initiator_count,
            percentage: self.percentage,
        };
        let sibling = MonthlyGoalChanges {
            initiator_count: split.initiator_count,
            percentage: split.percentage,
            ..own
        };
        (own, sibling)
    }
}

/// Epoch milliseconds plus a random offset below 1000.
///
/// Not globally unique, only collision-improbable.
pub fn generate_goal_identifier<R: Rng + ?Sized>(now_millis: i64, rng: &mut R) -> i64 {
    now_millis + rng.gen_range(0..1000)
}

/// Builds the two insert rows of a new pair: the creator's row, then the partner's.
pub fn build_goal_pair(
    input: &NewPairedGoal,
    goal_identifier: i64,
) -> (NewMonthlyGoal, NewMonthlyGoal) {
    let split = partner_split(input.connect_number, input.initiator_count, input.percentage);
    let own = NewMonthlyGoal {
        partner_mapping_id: input.partner_mapping_id,
        user_id: input.user_id,
        goal_identifier,
        month_start: input.month_start,
        month_end: input.month_end,
        connect_number: input.connect_number,
        initiator_count: input.initiator_count,
        percentage: input.percentage,
        complete_count: 0,
        complete_percentage: 0,
        status: STATUS_ACTIVE,
    };
    let partner = NewMonthlyGoal {
        user_id: input.partner_id,
        initiator_count: split.initiator_count,
        percentage: split.percentage,
        ..own.clone()
    };
    (own, partner)
}

/// Closed goals are history and can no longer be edited.
pub fn ensure_editable(goal: &MonthlyGoal) -> Result<()> {
    if goal.status != STATUS_ACTIVE {
        return Err(invalid_input(format!(
            "Goal {} is closed and can no longer be edited",
            goal.id
        )));
    }
    Ok(())
}

/// Picks the sibling of `goal_id` among the active rows of its mapping.
///
/// Storage order is not trusted: the sibling is whichever row has a
/// different id. Anything other than exactly two rows sharing one
/// identifier, one of which is `goal_id`, is a data integrity error.
pub fn find_sibling(rows: &[MonthlyGoal], goal_id: i32) -> Result<&MonthlyGoal> {
    if rows.len() != 2 {
        return Err(Error::DataIntegrity(format!(
            "Goal {} has {} active rows in its partner mapping, expected 2",
            goal_id,
            rows.len()
        )));
    }
    let target = rows.iter().find(|g| g.id == goal_id).ok_or_else(|| {
        Error::DataIntegrity(format!(
            "Goal {} is not among the active rows of its partner mapping",
            goal_id
        ))
    })?;
    let sibling = rows.iter().find(|g| g.id != goal_id).ok_or_else(|| {
        Error::DataIntegrity(format!("Goal {} appears twice in its pair", goal_id))
    })?;
    if sibling.goal_identifier != target.goal_identifier {
        return Err(Error::DataIntegrity(format!(
            "Goals {} and {} do not share a goal identifier",
            target.id, sibling.id
        )));
    }
    Ok(sibling)
}
