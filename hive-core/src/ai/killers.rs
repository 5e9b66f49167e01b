//! Killer move table

use crate::game::GameCommand;

/// Slots kept per depth
const SLOTS: usize = 2;

/// Commands that recently caused a cutoff, per remaining depth, most
/// recent first
#[derive(Clone, Debug, Default)]
pub struct KillerMoves {
    table: Vec<[Option<GameCommand>; SLOTS]>,
}

impl KillerMoves {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, depth: u32, command: GameCommand) {
        let depth = depth as usize;
        if self.table.len() <= depth {
            self.table.resize(depth + 1, [None; SLOTS]);
        }
        let slots = &mut self.table[depth];
        if slots[0] == Some(command) {
            return;
        }
        slots[1] = slots[0];
        slots[0] = Some(command);
    }

    pub fn at(&self, depth: u32) -> Vec<GameCommand> {
        self.table
            .get(depth as usize)
            .map(|slots| slots.iter().flatten().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.table.iter().all(|slots| slots.iter().all(Option::is_none))
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Hex;

    fn place(id: &str, q: i32) -> GameCommand {
        GameCommand::place(id.parse().unwrap(), Hex::new(q, 0))
    }

    #[test]
    fn test_most_recent_first() {
        let mut killers = KillerMoves::new();
        assert!(killers.at(3).is_empty());
        killers.record(3, place("wA1", 1));
        killers.record(3, place("wA1", 2));
        assert_eq!(killers.at(3), vec![place("wA1", 2), place("wA1", 1)]);

        killers.record(3, place("wA1", 3));
        assert_eq!(killers.at(3), vec![place("wA1", 3), place("wA1", 2)]);
        assert!(killers.at(2).is_empty());
    }

    #[test]
    fn test_repeat_does_not_evict() {
        let mut killers = KillerMoves::new();
        killers.record(1, place("wA1", 1));
        killers.record(1, place("wA1", 2));
        killers.record(1, place("wA1", 2));
        assert_eq!(killers.at(1), vec![place("wA1", 2), place("wA1", 1)]);
        assert!(!killers.is_empty());
        killers.clear();
        assert!(killers.at(1).is_empty());
        assert!(killers.is_empty());
    }
}
