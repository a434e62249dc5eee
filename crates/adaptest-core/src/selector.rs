//! Next-item selection by maximum Fisher information.

use std::collections::HashSet;

use crate::bank::ItemBank;
use crate::irt::information;
use crate::model::{Item, ItemId, Recommendation};

/// A candidate item together with its information at the current ability.
#[derive(Debug, Clone, Copy)]
pub struct RankedItem<'a> {
    pub item: &'a Item,
    pub information: f64,
}

/// Build the candidate pool for `theta`'s selection round.
///
/// Answered items are never eligible. When `weak_topics` is non-empty and at
/// least one unanswered item matches, only matching items are kept;
/// otherwise the whole unanswered pool is used so the exam never starves.
fn candidate_pool<'a>(
    answered: &HashSet<ItemId>,
    bank: &'a ItemBank,
    weak_topics: &[String],
) -> Vec<&'a Item> {
    let available: Vec<&Item> = bank
        .items()
        .iter()
        .filter(|item| !answered.contains(&item.id))
        .collect();

    if weak_topics.is_empty() {
        return available;
    }

    let topical: Vec<&Item> = available
        .iter()
        .copied()
        .filter(|item| weak_topics.iter().any(|t| *t == item.topic))
        .collect();

    if topical.is_empty() {
        tracing::debug!(
            weak_topics = ?weak_topics,
            "no unanswered item in weak topics, using full pool"
        );
        available
    } else {
        topical
    }
}

/// Pick the most informative unanswered item at `theta`.
///
/// Returns `None` once every item has been answered. Ties go to the item
/// that comes first in bank order.
pub fn select_item(
    theta: f64,
    answered: &HashSet<ItemId>,
    bank: &ItemBank,
    weak_topics: &[String],
) -> Option<Recommendation> {
    let mut best: Option<RankedItem<'_>> = None;
    for item in candidate_pool(answered, bank, weak_topics) {
        let info = information(theta, item.difficulty_b);
        match best {
            Some(current) if current.information >= info => {}
            _ => {
                best = Some(RankedItem {
                    item,
                    information: info,
                })
            }
        }
    }

    best.map(|ranked| {
        tracing::debug!(
            item_id = %ranked.item.id,
            information = ranked.information,
            theta,
            "selected item"
        );
        Recommendation::from(ranked.item)
    })
}

/// Every candidate ordered by descending information, bank order on ties.
///
/// The first element is always the item [`select_item`] would return.
pub fn rank_items<'a>(
    theta: f64,
    answered: &HashSet<ItemId>,
    bank: &'a ItemBank,
    weak_topics: &[String],
) -> Vec<RankedItem<'a>> {
    let mut ranked: Vec<RankedItem<'a>> = candidate_pool(answered, bank, weak_topics)
        .into_iter()
        .map(|item| RankedItem {
            item,
            information: information(theta, item.difficulty_b),
        })
        .collect();
    ranked.sort_by(|a, b| b.information.total_cmp(&a.information));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> ItemBank {
        ItemBank::new(vec![
            Item::new(1, "algebra", -1.0),
            Item::new(2, "algebra", 0.0),
            Item::new(3, "geometry", 1.0).with_level("vd"),
        ])
    }

    fn answered(ids: &[i64]) -> HashSet<ItemId> {
        ids.iter().map(|&i| ItemId::from(i)).collect()
    }

    #[test]
    fn picks_closest_difficulty_at_zero() {
        let rec = select_item(0.0, &HashSet::new(), &bank(), &[]).unwrap();
        assert_eq!(rec.id, ItemId::from(2));
        assert_eq!(rec.topic, "algebra");
        assert_eq!(rec.difficulty_level, "Medium");
    }

    #[test]
    fn skips_answered_items() {
        let rec = select_item(0.0, &answered(&[2]), &bank(), &[]).unwrap();
        assert_eq!(rec.id, ItemId::from(1));
    }

    #[test]
    fn none_when_everything_answered() {
        assert!(select_item(0.0, &answered(&[1, 2, 3]), &bank(), &[]).is_none());
        assert!(select_item(0.0, &HashSet::new(), &ItemBank::default(), &[]).is_none());
    }

    #[test]
    fn weak_topics_restrict_pool() {
        let weak = vec!["geometry".to_string()];
        let rec = select_item(0.0, &HashSet::new(), &bank(), &weak).unwrap();
        assert_eq!(rec.id, ItemId::from(3));
        assert_eq!(rec.difficulty_level, "vd");
    }

    #[test]
    fn weak_topics_fall_back_when_exhausted() {
        let weak = vec!["geometry".to_string()];
        let rec = select_item(0.0, &answered(&[3]), &bank(), &weak).unwrap();
        assert_eq!(rec.id, ItemId::from(2));

        let unknown = vec!["calculus".to_string()];
        let rec = select_item(0.0, &HashSet::new(), &bank(), &unknown).unwrap();
        assert_eq!(rec.id, ItemId::from(2));
    }

    #[test]
    fn ties_go_to_bank_order() {
        let bank = ItemBank::new(vec![
            Item::new("a", "t", 0.5),
            Item::new("b", "t", 0.5),
            Item::new("c", "t", 0.5),
        ]);
        let rec = select_item(0.0, &HashSet::new(), &bank, &[]).unwrap();
        assert_eq!(rec.id, ItemId::from("a"));

        let ranked = rank_items(0.0, &HashSet::new(), &bank, &[]);
        let order: Vec<_> = ranked.iter().map(|r| r.item.id.to_string()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn rank_agrees_with_select() {
        let bank = bank();
        for theta in [-3.0, -1.0, 0.0, 0.7, 3.0] {
            let ranked = rank_items(theta, &HashSet::new(), &bank, &[]);
            let rec = select_item(theta, &HashSet::new(), &bank, &[]).unwrap();
            assert_eq!(ranked[0].item.id, rec.id, "θ={theta}");
            assert!(ranked
                .windows(2)
                .all(|w| w[0].information >= w[1].information));
        }
    }
}
