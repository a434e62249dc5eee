//! Read-only item bank snapshot.

use std::collections::{HashMap, HashSet};

use crate::model::{Item, ItemId};

/// An immutable, ordered snapshot of the item bank.
///
/// Bank order is significant: selection ties are broken by it. Lookups by
/// identifier go through an index built once at construction; when an id
/// appears more than once, the first record wins the lookup.
#[derive(Debug, Clone, Default)]
pub struct ItemBank {
    items: Vec<Item>,
    index: HashMap<ItemId, usize>,
}

impl ItemBank {
    pub fn new(items: Vec<Item>) -> Self {
        let mut index = HashMap::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            index.entry(item.id.clone()).or_insert(pos);
        }
        Self { items, index }
    }

    /// Look up an item by identifier.
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.index.get(id).map(|&pos| &self.items[pos])
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.index.contains_key(id)
    }

    /// All items in bank order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Distinct topics in first-seen order.
    pub fn topics(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .map(|item| item.topic.as_str())
            .filter(|topic| seen.insert(*topic))
            .collect()
    }

    /// Items belonging to `topic`, in bank order.
    pub fn filter_topic<'a>(&'a self, topic: &'a str) -> impl Iterator<Item = &'a Item> + 'a {
        self.items.iter().filter(move |item| item.topic == topic)
    }
}

impl From<Vec<Item>> for ItemBank {
    fn from(items: Vec<Item>) -> Self {
        Self::new(items)
    }
}

impl FromIterator<Item> for ItemBank {
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ItemBank {
        ItemBank::new(vec![
            Item::new(1, "algebra", -1.0),
            Item::new(2, "algebra", 0.0),
            Item::new(3, "geometry", 1.0),
        ])
    }

    #[test]
    fn lookup_by_id() {
        let bank = sample();
        assert_eq!(bank.len(), 3);
        assert_eq!(bank.get(&ItemId::from(3)).unwrap().topic, "geometry");
        assert!(bank.get(&ItemId::from(4)).is_none());
        assert!(!bank.contains(&ItemId::from("1")));
    }

    #[test]
    fn duplicate_ids_resolve_to_first_record() {
        let bank = ItemBank::new(vec![
            Item::new(1, "algebra", -1.0),
            Item::new(1, "geometry", 2.0),
        ]);
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.get(&ItemId::from(1)).unwrap().topic, "algebra");
    }

    #[test]
    fn topics_in_first_seen_order() {
        assert_eq!(sample().topics(), vec!["algebra", "geometry"]);
        assert_eq!(sample().filter_topic("algebra").count(), 2);
        assert_eq!(sample().filter_topic("calculus").count(), 0);
    }
}
