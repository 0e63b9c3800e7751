//! Advisor report selection.

use log::debug;
use std::collections::HashMap;

use super::packet::AdvisorReport;
use crate::condition::ConditionEvaluator;
use crate::data::AdvisorItem;

/// Which message variant an advisor speaks with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Voice {
    Standard,
    Cynical,
}

impl Voice {
    /// Cynical once `moral_index` strictly exceeds `threshold`.
    #[must_use]
    pub fn for_moral_index(moral_index: f64, threshold: f64) -> Self {
        if moral_index > threshold {
            Self::Cynical
        } else {
            Self::Standard
        }
    }

    /// Message text for `item`; falls back to the standard message when the
    /// item has no cynical variant.
    #[must_use]
    pub fn message(self, item: &AdvisorItem) -> &str {
        match (self, item.message_cynical.as_deref()) {
            (Self::Cynical, Some(cynical)) => cynical,
            _ => &item.message,
        }
    }
}

/// Group surviving items by advisor (first appearance order) and keep one
/// item per advisor: the one with the largest priority rank, first on ties.
pub fn group_by_advisor<'a, I>(items: I) -> Vec<&'a AdvisorItem>
where
    I: IntoIterator<Item = &'a AdvisorItem>,
{
    let mut chosen: Vec<&AdvisorItem> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for item in items {
        match slots.get(item.advisor.as_str()) {
            Some(&slot) => {
                if item.priority.rank() > chosen[slot].priority.rank() {
                    chosen[slot] = item;
                }
            }
            None => {
                slots.insert(item.advisor.as_str(), chosen.len());
                chosen.push(item);
            }
        }
    }

    chosen
}

/// Build the advisor reports, sorted ascending by priority level.
#[must_use]
pub fn advisor_reports(
    items: &[AdvisorItem],
    evaluator: &ConditionEvaluator<'_>,
    voice: Voice,
    timestamp: &str,
) -> Vec<AdvisorReport> {
    let matching = items
        .iter()
        .filter(|item| evaluator.evaluate(&item.condition));

    let mut reports: Vec<AdvisorReport> = group_by_advisor(matching)
        .into_iter()
        .map(|item| AdvisorReport {
            advisor: item.advisor.clone(),
            priority: item.priority.clone(),
            priority_level: item.priority.rank(),
            message: voice.message(item).to_string(),
            tags: item.tags.clone(),
            timestamp: timestamp.to_string(),
        })
        .collect();

    reports.sort_by_key(|report| report.priority_level);
    debug!(
        "advisor reports: {} advisors from {} items ({voice:?} voice)",
        reports.len(),
        items.len()
    );
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Priority;
    use crate::state::{GameState, PartyStats};

    fn item(advisor: &str, priority: Priority, message: &str) -> AdvisorItem {
        AdvisorItem {
            condition: "true".to_string(),
            advisor: advisor.to_string(),
            priority,
            message: message.to_string(),
            message_cynical: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn largest_rank_wins_and_ties_keep_first() {
        let items = vec![
            item("Strategist", Priority::High, "urgent"),
            item("Strategist", Priority::Low, "routine"),
            item("Strategist", Priority::Low, "second routine"),
            item("Whip", Priority::Medium, "count"),
        ];
        let chosen = group_by_advisor(&items);
        assert_eq!(chosen.len(), 2);
        assert_eq!(chosen[0].message, "routine");
        assert_eq!(chosen[1].message, "count");
    }

    #[test]
    fn reports_sort_by_priority_and_keep_group_order_on_ties() {
        let items = vec![
            item("Pollster", Priority::Low, "polls"),
            item("Whip", Priority::High, "whip"),
            item("Press", Priority::Low, "press"),
            item("Treasurer", Priority::from("urgent"), "money"),
        ];
        let state = GameState::default();
        let evaluator = ConditionEvaluator::for_state(&state);

        let reports = advisor_reports(&items, &evaluator, Voice::Standard, "2025-01-06T09:00:00Z");
        let order: Vec<&str> = reports.iter().map(|r| r.advisor.as_str()).collect();
        assert_eq!(order, ["Whip", "Pollster", "Press", "Treasurer"]);
        assert_eq!(reports[3].priority_level, 4);
        assert_eq!(reports[3].priority.label(), "urgent");
        assert!(reports.iter().all(|r| r.timestamp == "2025-01-06T09:00:00Z"));
    }

    #[test]
    fn conditions_gate_items() {
        let mut crisis = item("Press", Priority::High, "fracturing");
        crisis.condition = "party.narrative_coherence < 0.4".to_string();
        let items = vec![crisis];

        let low = GameState::default()
            .with_party_stats(PartyStats::new().with("narrative_coherence", 0.3));
        let high = GameState::default()
            .with_party_stats(PartyStats::new().with("narrative_coherence", 0.5));

        let included = advisor_reports(
            &items,
            &ConditionEvaluator::for_state(&low),
            Voice::Standard,
            "t",
        );
        let excluded = advisor_reports(
            &items,
            &ConditionEvaluator::for_state(&high),
            Voice::Standard,
            "t",
        );
        assert_eq!(included.len(), 1);
        assert!(excluded.is_empty());
    }

    #[test]
    fn cynical_voice_prefers_cynical_variant() {
        let mut with_variant = item("Press", Priority::Medium, "plain");
        with_variant.message_cynical = Some("they are trained to nod".to_string());
        let without_variant = item("Whip", Priority::Medium, "plain whip");

        assert_eq!(Voice::for_moral_index(0.8, 0.5), Voice::Cynical);
        assert_eq!(Voice::for_moral_index(0.5, 0.5), Voice::Standard);
        assert_eq!(Voice::Cynical.message(&with_variant), "they are trained to nod");
        assert_eq!(Voice::Cynical.message(&without_variant), "plain whip");
        assert_eq!(Voice::Standard.message(&with_variant), "plain");
    }
}
