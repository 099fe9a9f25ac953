//! Per-member aggregation of selected time entries.

use billable_shared::{TeamMember, TimeEntryWithDetails};
use indexmap::{map::Entry, IndexMap};
use rust_decimal::Decimal;

/// Everything one team member contributed to an invoice
#[derive(Debug, Clone, PartialEq)]
pub struct MemberAggregate {
    /// Billing configuration snapshot
    pub team_member: TeamMember,
    /// Exact sum of hours, never rounded here
    pub total_hours: Decimal,
    /// Project of the last entry processed for this member. Only used in the
    /// line description; entries from several projects may be pooled.
    pub project_name: String,
    pub entry_count: usize,
}

/// Group entries by team member in one pass.
///
/// Groups come out in first-appearance order.
pub fn aggregate_by_member<'a, I>(entries: I) -> Vec<MemberAggregate>
where
    I: IntoIterator<Item = &'a TimeEntryWithDetails>,
{
    let mut groups: IndexMap<i32, MemberAggregate> = IndexMap::new();

    for entry in entries {
        let project_name = &entry.project.project.project_name;

        match groups.entry(entry.entry.team_member_id) {
            Entry::Occupied(mut slot) => {
                let aggregate = slot.get_mut();
                aggregate.total_hours += entry.entry.hours;
                aggregate.project_name.clone_from(project_name);
                aggregate.entry_count += 1;
            }
            Entry::Vacant(slot) => {
                slot.insert(MemberAggregate {
                    team_member: entry.team_member.clone(),
                    total_hours: entry.entry.hours,
                    project_name: project_name.clone(),
                    entry_count: 1,
                });
            }
        }
    }

    groups.into_values().collect()
}
