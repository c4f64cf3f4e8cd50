//! Per-phase submission buffer.
//!
//! Every player owns exactly one slot per phase; a second submission from the
//! same actor replaces the first. Nothing is validated here, resolvers decide
//! what an entry is worth once the phase is sealed.

use std::collections::HashMap;

use crate::models::player::PlayerId;

#[derive(Debug, Clone)]
pub struct Collector<T> {
    entries: HashMap<PlayerId, T>,
}

impl<T> Default for Collector<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> Collector<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` for `actor`, returning the entry it replaced.
    pub fn record(&mut self, actor: PlayerId, value: T) -> Option<T> {
        self.entries.insert(actor, value)
    }

    pub fn get(&self, actor: &str) -> Option<&T> {
        self.entries.get(actor)
    }

    pub fn remove(&mut self, actor: &str) -> Option<T> {
        self.entries.remove(actor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in enumeration order without draining.
    pub fn ordered(&self, order: &[PlayerId]) -> Vec<(&PlayerId, &T)> {
        let mut out: Vec<_> = self.entries.iter().collect();
        out.sort_by(|(a, _), (b, _)| rank(order, a).cmp(&rank(order, b)));
        out
    }

    /// Drains the collector, handing entries over in enumeration order.
    ///
    /// `order` is the room's join order. Actors that are no longer members
    /// come last, sorted by id, so the result never depends on hash order.
    pub fn seal(&mut self, order: &[PlayerId]) -> Vec<(PlayerId, T)> {
        let mut out: Vec<_> = self.entries.drain().collect();
        out.sort_by(|(a, _), (b, _)| rank(order, a).cmp(&rank(order, b)));
        out
    }
}

fn rank<'a>(order: &[PlayerId], id: &'a PlayerId) -> (usize, &'a str) {
    let position = order.iter().position(|p| p == id).unwrap_or(order.len());
    (position, id.as_str())
}

/// Picks the target with the strictly greatest count. Equal counts go to
/// the target that appeared first.
pub fn plurality<'a, I>(targets: I) -> Option<PlayerId>
where
    I: IntoIterator<Item = &'a PlayerId>,
{
    let mut counts: Vec<(&PlayerId, usize)> = Vec::new();
    for target in targets {
        match counts.iter_mut().find(|(t, _)| *t == target) {
            Some((_, n)) => *n += 1,
            None => counts.push((target, 1)),
        }
    }

    let mut best: Option<(&PlayerId, usize)> = None;
    for (target, count) in counts {
        if best.map_or(true, |(_, max)| count > max) {
            best = Some((target, count));
        }
    }
    best.map(|(target, _)| target.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<PlayerId> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn later_submission_overwrites_earlier() {
        let mut votes = Collector::new();
        votes.record("a".to_string(), "b".to_string());
        let previous = votes.record("a".to_string(), "c".to_string());

        assert_eq!(previous.as_deref(), Some("b"));
        assert_eq!(votes.len(), 1);
        assert_eq!(votes.get("a").map(String::as_str), Some("c"));
    }

    #[test]
    fn seal_follows_join_order_and_empties() {
        let order = ids(&["p1", "p2", "p3"]);
        let mut votes = Collector::new();
        votes.record("p3".to_string(), 3);
        votes.record("ghost".to_string(), 0);
        votes.record("p1".to_string(), 1);

        let sealed = votes.seal(&order);
        let actors: Vec<_> = sealed.iter().map(|(a, _)| a.as_str()).collect();

        assert_eq!(actors, vec!["p1", "p3", "ghost"]);
        assert!(votes.is_empty());
    }

    #[test]
    fn plurality_prefers_strictly_greater_count() {
        let targets = ids(&["x", "y", "y", "x", "y"]);
        assert_eq!(plurality(&targets).as_deref(), Some("y"));
    }

    #[test]
    fn plurality_tie_goes_to_first_seen() {
        let targets = ids(&["y", "x", "x", "y"]);
        assert_eq!(plurality(&targets).as_deref(), Some("y"));
    }

    #[test]
    fn plurality_of_nothing_is_none() {
        let targets: Vec<PlayerId> = Vec::new();
        assert_eq!(plurality(&targets), None);
    }
}
