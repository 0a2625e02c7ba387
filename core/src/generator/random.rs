use ndarray::Array2;

use super::*;

/// Seeded uniform placement that never puts a hazard on the excluded cell,
/// keeping the first reveal safe.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomHazardGenerator {
    seed: u64,
    exclude: Coord2,
}

impl RandomHazardGenerator {
    pub fn new(seed: u64, exclude: Coord2) -> Self {
        Self { seed, exclude }
    }
}

impl HazardGenerator for RandomHazardGenerator {
    fn generate(self, config: GameConfig) -> HazardLayout {
        use rand::prelude::*;

        let total_cells = config.total_cells();
        let mut mask: Array2<bool> = Array2::default(config.size.nd_index());

        if total_cells <= 1 {
            log::warn!("board of {} cells has no room for hazards", total_cells);
            return HazardLayout::from_mask(mask);
        }

        // reserve the excluded cell so the scan below cannot pick it
        mask[self.exclude.nd_index()] = true;
        let mut free_cells = total_cells - 1;
        let mut placed = 0;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        {
            let slots = mask.as_slice_mut().expect("mask should be standard layout");
            while placed < config.hazards {
                if free_cells == 0 {
                    log::warn!("only {} of {} hazards fit on the board", placed, config.hazards);
                    break;
                }
                let mut nth_free: CellCount = rng.random_range(0..free_cells);
                for slot in slots.iter_mut() {
                    if *slot {
                        continue;
                    }
                    if nth_free == 0 {
                        *slot = true;
                        placed += 1;
                        free_cells -= 1;
                        break;
                    }
                    nth_free -= 1;
                }
            }
        }

        mask[self.exclude.nd_index()] = false;

        // double check the final count
        let layout = HazardLayout::from_mask(mask);
        if layout.hazard_count() != config.hazards {
            log::warn!(
                "hazard count mismatch, placed {} of {}",
                layout.hazard_count(),
                config.hazards
            );
        }
        layout
    }
}
