use crate::data::TeacherId;
use crate::grid::{Day, LabBlock, TimeSlot};
use std::collections::{HashMap, HashSet};

/// Per-run record of occupied cells and teacher commitments.
///
/// Created fresh for every generation run and dropped with it; never shared
/// between runs.
#[derive(Debug, Default)]
pub struct AllocationLedger {
    occupied: HashSet<(Day, TimeSlot)>,
    committed: HashMap<(Day, TimeSlot), HashSet<TeacherId>>,
}

impl AllocationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cell_free(&self, day: Day, slot: TimeSlot) -> bool {
        !self.occupied.contains(&(day, slot))
    }

    pub fn is_teacher_free(&self, day: Day, slot: TimeSlot, teacher: &str) -> bool {
        self.committed
            .get(&(day, slot))
            .is_none_or(|teachers| !teachers.contains(teacher))
    }

    /// Cell is free and every listed teacher is free in it.
    pub fn can_place(&self, day: Day, slot: TimeSlot, teachers: &[TeacherId]) -> bool {
        self.is_cell_free(day, slot)
            && teachers
                .iter()
                .all(|teacher| self.is_teacher_free(day, slot, teacher))
    }

    /// Every period of the block passes `can_place`.
    pub fn can_place_block(&self, day: Day, block: LabBlock, teachers: &[TeacherId]) -> bool {
        block
            .slots()
            .iter()
            .all(|&slot| self.can_place(day, slot, teachers))
    }

    /// Marks the cell occupied and books every listed teacher in it.
    pub fn commit(&mut self, day: Day, slot: TimeSlot, teachers: &[TeacherId]) {
        self.occupied.insert((day, slot));
        self.reserve_teachers(day, slot, teachers);
    }

    pub fn commit_block(&mut self, day: Day, block: LabBlock, teachers: &[TeacherId]) {
        for &slot in block.slots() {
            self.commit(day, slot, teachers);
        }
    }

    /// Books teachers without occupying the cell.
    pub fn reserve_teachers(&mut self, day: Day, slot: TimeSlot, teachers: &[TeacherId]) {
        let booked = self.committed.entry((day, slot)).or_default();
        booked.extend(teachers.iter().cloned());
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<TeacherId> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn commit_occupies_cell_and_books_teachers() {
        let mut ledger = AllocationLedger::new();
        ledger.commit(Day::Monday, TimeSlot::P2, &ids(&["A", "B"]));

        assert!(!ledger.is_cell_free(Day::Monday, TimeSlot::P2));
        assert!(!ledger.is_teacher_free(Day::Monday, TimeSlot::P2, "A"));
        assert!(!ledger.is_teacher_free(Day::Monday, TimeSlot::P2, "B"));
        assert!(ledger.is_teacher_free(Day::Monday, TimeSlot::P2, "C"));
        assert!(ledger.is_cell_free(Day::Monday, TimeSlot::P3));
        assert!(ledger.is_teacher_free(Day::Tuesday, TimeSlot::P2, "A"));
    }

    #[test]
    fn reserved_teacher_leaves_cell_free() {
        let mut ledger = AllocationLedger::new();
        ledger.reserve_teachers(Day::Friday, TimeSlot::P5, &ids(&["A"]));

        assert!(ledger.is_cell_free(Day::Friday, TimeSlot::P5));
        assert!(!ledger.can_place(Day::Friday, TimeSlot::P5, &ids(&["A"])));
        assert!(ledger.can_place(Day::Friday, TimeSlot::P5, &ids(&["B"])));
        assert_eq!(ledger.occupied_count(), 0);
    }

    #[test]
    fn block_needs_every_period_free() {
        let mut ledger = AllocationLedger::new();
        ledger.reserve_teachers(Day::Monday, TimeSlot::P4, &ids(&["A"]));

        assert!(!ledger.can_place_block(Day::Monday, LabBlock::Morning, &ids(&["A"])));
        assert!(ledger.can_place_block(Day::Monday, LabBlock::Afternoon, &ids(&["A"])));

        ledger.commit_block(Day::Monday, LabBlock::Afternoon, &ids(&["B"]));
        assert_eq!(ledger.occupied_count(), 3);
        assert!(!ledger.can_place_block(Day::Monday, LabBlock::Afternoon, &ids(&["C"])));
    }
}
