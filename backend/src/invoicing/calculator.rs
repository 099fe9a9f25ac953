//! Billing arithmetic: turns one member aggregate into an invoice line.

use billable_shared::BillingType;
use rust_decimal::{Decimal, RoundingStrategy};

use super::aggregator::MemberAggregate;

/// Nominal length of a workday used to convert hours into days
pub const HOURS_PER_WORKDAY: i64 = 8;

/// Working days a monthly rate is spread over
pub const WORKING_DAYS_IN_MONTH: i64 = 22;

/// Round to cents, half-up, always carrying exactly two decimal places.
///
/// Every value handled here is non-negative, where away-from-zero and
/// half-up agree.
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// A priced invoice line
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatedLine {
    pub team_member_id: i32,
    pub description: String,
    /// Hours (hourly) or days worked (monthly), rounded
    pub quantity: Decimal,
    /// Hourly or daily rate, rounded
    pub rate: Decimal,
    /// Rounded line amount as persisted
    pub amount: Decimal,
    /// The amount before rounding; invoice subtotals accumulate this one
    pub unrounded_amount: Decimal,
}

pub fn calculate_line(aggregate: &MemberAggregate) -> CalculatedLine {
    let member = &aggregate.team_member;

    match member.billing_type {
        BillingType::Hourly => {
            let quantity = aggregate.total_hours;
            let amount = quantity * member.rate;

            CalculatedLine {
                team_member_id: member.id,
                description: format!(
                    "{} - {} (Hourly @ ${}/hr)",
                    member.name,
                    member.role,
                    member.rate.normalize()
                ),
                quantity: round2(quantity),
                rate: round2(member.rate),
                amount: round2(amount),
                unrounded_amount: amount,
            }
        }
        BillingType::Monthly => {
            let days_worked = aggregate.total_hours / Decimal::from(HOURS_PER_WORKDAY);
            let daily_rate = member.rate / Decimal::from(WORKING_DAYS_IN_MONTH);
            let amount = daily_rate * days_worked;

            CalculatedLine {
                team_member_id: member.id,
                description: format!(
                    "{} - {} (Daily @ ${}/day)",
                    member.name,
                    member.role,
                    round2(daily_rate)
                ),
                quantity: round2(days_worked),
                rate: round2(daily_rate),
                amount: round2(amount),
                unrounded_amount: amount,
            }
        }
    }
}
