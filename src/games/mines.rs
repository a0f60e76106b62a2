use crate::errors::{FairplayError, FairplayResult};
use crate::games::rng::{fisher_yates, SeededSequence};
use crate::games::types::MinesOutcome;

pub const DEFAULT_GRID_SIZE: u8 = 25;

/// A validated mine count for a given grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinesBet {
    mine_count: u8,
    grid_size: u8,
}

impl MinesBet {
    /// `mine_count` must leave at least one safe cell: `1..=grid_size - 1`
    pub fn new(mine_count: i64, grid_size: u8) -> FairplayResult<Self> {
        let max = grid_size.saturating_sub(1) as i64;
        if mine_count < 1 || mine_count > max {
            return Err(FairplayError::invalid_parameter(
                "mineCount",
                format!("{} is outside [1, {}]", mine_count, max),
            ));
        }
        Ok(Self {
            mine_count: mine_count as u8,
            grid_size,
        })
    }

    pub fn mine_count(&self) -> u8 {
        self.mine_count
    }

    pub fn grid_size(&self) -> u8 {
        self.grid_size
    }
}

/// Shuffle every cell index and take the first `mine_count` as mines
pub fn place_mines<S: SeededSequence + ?Sized>(rng: &mut S, bet: &MinesBet) -> MinesOutcome {
    let mut cells: Vec<u8> = (0..bet.grid_size).collect();
    fisher_yates(&mut cells, rng);
    cells.truncate(bet.mine_count as usize);
    MinesOutcome { mines: cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::rng::Lcg;
    use std::collections::HashSet;

    #[test]
    fn test_mine_count_validation() {
        assert!(MinesBet::new(1, DEFAULT_GRID_SIZE).is_ok());
        assert!(MinesBet::new(24, DEFAULT_GRID_SIZE).is_ok());
        for bad in [0, 25, -3] {
            assert!(matches!(
                MinesBet::new(bad, DEFAULT_GRID_SIZE),
                Err(FairplayError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn test_mines_distinct_and_in_range() {
        for step in 0..200 {
            let u = step as f64 / 200.0;
            let bet = MinesBet::new(1 + (step % 24) as i64, DEFAULT_GRID_SIZE).unwrap();
            let outcome = place_mines(&mut Lcg::from_draw(u), &bet);
            let unique: HashSet<u8> = outcome.mines.iter().copied().collect();
            assert_eq!(outcome.mines.len(), bet.mine_count() as usize);
            assert_eq!(unique.len(), outcome.mines.len());
            assert!(outcome.mines.iter().all(|&m| m < DEFAULT_GRID_SIZE));
        }
    }

    #[test]
    fn test_known_layout() {
        let bet = MinesBet::new(3, DEFAULT_GRID_SIZE).unwrap();
        let outcome = place_mines(&mut Lcg::from_draw(0.8296809342190636), &bet);
        assert_eq!(outcome.mines, vec![11, 17, 6]);
    }
}
