use crate::models::ticket::{Status, Ticket};
use serde::Serialize;
use std::collections::HashMap;

/// Dashboard aggregates derived from the full collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    pub pending: usize,
    pub resolved: usize,
    pub total_cost: f64,
    pub total_hours: f64,
    pub by_department: HashMap<String, usize>,
    pub cost_by_department: HashMap<String, f64>,
}

/// Recompute every aggregate from scratch; pure and deterministic for a
/// fixed input, no caching at this scale.
///
/// Department grouping keys are the literal stored strings. Casing or
/// spelling variants fragment into separate groups; intake keeps entries
/// uniform by offering a fixed list, so this is left as-is.
pub fn compute_stats(tickets: &[Ticket]) -> DashboardStats {
    let mut stats = DashboardStats {
        total: tickets.len(),
        ..Default::default()
    };

    for ticket in tickets {
        match ticket.status {
            Status::Pending => stats.pending += 1,
            Status::Resolved => stats.resolved += 1,
            _ => {}
        }
        stats.total_cost += ticket.cost;
        stats.total_hours += ticket.hours;

        *stats
            .by_department
            .entry(ticket.department.clone())
            .or_insert(0) += 1;
        *stats
            .cost_by_department
            .entry(ticket.department.clone())
            .or_insert(0.0) += ticket.cost;
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ticket::Priority;

    fn ticket(department: &str, status: Status, cost: f64, hours: f64) -> Ticket {
        Ticket {
            id: format!("{department}-{cost}"),
            title: "Rework".to_string(),
            description: "Rework detail".to_string(),
            department: department.to_string(),
            priority: Priority::Medium,
            status,
            cost,
            hours,
            created_at: "2026-08-01T09:30:00+00:00".to_string(),
            root_cause: None,
        }
    }

    #[test]
    fn empty_collection_yields_zeroed_stats() {
        assert_eq!(compute_stats(&[]), DashboardStats::default());
    }

    #[test]
    fn counts_costs_and_department_groups() {
        let tickets = vec![
            ticket("Welding", Status::Pending, 100.0, 2.0),
            ticket("Welding", Status::Resolved, 50.0, 1.0),
            ticket("Paint", Status::InProgress, 200.0, 3.5),
        ];

        let stats = compute_stats(&tickets);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.resolved, 1);
        assert_eq!(stats.total_cost, 350.0);
        assert_eq!(stats.total_hours, 6.5);
        assert_eq!(stats.by_department["Welding"], 2);
        assert_eq!(stats.by_department["Paint"], 1);
        assert_eq!(stats.cost_by_department["Welding"], 150.0);
        assert_eq!(stats.cost_by_department["Paint"], 200.0);
    }

    #[test]
    fn department_cost_groups_conserve_total_cost() {
        let tickets = vec![
            ticket("Welding", Status::Pending, 10.0, 1.0),
            ticket("Paint", Status::Cancelled, 20.5, 0.5),
            ticket("Assembly", Status::Resolved, 31.25, 2.0),
            ticket("Paint", Status::Pending, 8.25, 0.25),
        ];

        let stats = compute_stats(&tickets);
        let grouped: f64 = stats.cost_by_department.values().sum();
        assert!((grouped - stats.total_cost).abs() < 1e-9);
    }

    #[test]
    fn department_keys_are_not_normalized() {
        let tickets = vec![
            ticket("Paint", Status::Pending, 10.0, 1.0),
            ticket("paint", Status::Pending, 10.0, 1.0),
        ];

        let stats = compute_stats(&tickets);
        assert_eq!(stats.by_department.len(), 2);
    }

    #[test]
    fn repeated_computation_is_identical() {
        let tickets = vec![
            ticket("Welding", Status::Pending, 100.0, 2.0),
            ticket("Paint", Status::Resolved, 200.0, 3.5),
        ];

        assert_eq!(compute_stats(&tickets), compute_stats(&tickets));
    }
}
