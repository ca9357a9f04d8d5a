use crate::core::buffers::*;
use crate::core::prelude::*;

use std::collections::VecDeque;

#[derive(Debug, Clone)]
struct TileSlot {
    bounds: Bounds2i,
    /// Samples accumulated into the buffer so far.
    completed: u32,
}

/// Splits a buffer into tiles and hands out work units pass by pass.
///
/// A pass gives every tile one unit of `pass_size` samples. Units of the next
/// pass are handed out as soon as the current pass is fully dispatched, so
/// fast devices never wait on slow ones. Units returned by a failed device go
/// to the front of the line.
#[derive(Debug, Clone)]
pub struct TileManager {
    params: BufferParams,
    tiles: Vec<TileSlot>,
    target: u32,
    pass_size: u32,
    pass_sample: u32,
    next_tile: usize,
    pending: VecDeque<RenderTile>,
}

impl TileManager {
    pub fn new(
        params: &BufferParams,
        tile_size: u32,
        target: u32,
        progressive: bool,
        samples_per_pass: u32,
    ) -> Self {
        let tile_size = u32::max(tile_size, 1) as i32;
        let mut tiles = Vec::new();
        let width = params.width as i32;
        let height = params.height as i32;
        let mut y = 0;
        while y < height {
            let mut x = 0;
            while x < width {
                let x1 = i32::min(x + tile_size, width);
                let y1 = i32::min(y + tile_size, height);
                tiles.push(TileSlot {
                    bounds: Bounds2i::from(((x, y), (x1, y1))),
                    completed: 0,
                });
                x = x1;
            }
            y = i32::min(y + tile_size, height);
        }

        let samples_per_pass = u32::max(samples_per_pass, 1);
        let pass_size = if target == 0 {
            if progressive {
                samples_per_pass
            } else {
                1
            }
        } else if progressive {
            u32::min(samples_per_pass, target)
        } else {
            target
        };

        TileManager {
            params: *params,
            tiles,
            target,
            pass_size,
            pass_sample: 0,
            next_tile: 0,
            pending: VecDeque::new(),
        }
    }

    pub fn num_tiles(&self) -> usize {
        return self.tiles.len();
    }

    pub fn pass_size(&self) -> u32 {
        return self.pass_size;
    }

    /// Next unit to render, or `None` when everything has been handed out.
    pub fn next_unit(&mut self) -> Option<RenderTile> {
        if let Some(unit) = self.pending.pop_front() {
            return Some(unit);
        }
        if self.tiles.is_empty() {
            return None;
        }
        if self.next_tile >= self.tiles.len() {
            let next = self.pass_sample.saturating_add(self.pass_size);
            if self.target != 0 && next >= self.target {
                return None;
            }
            self.pass_sample = next;
            self.next_tile = 0;
        }
        let index = self.next_tile;
        self.next_tile += 1;
        let num_samples = if self.target == 0 {
            self.pass_size
        } else {
            u32::min(self.pass_size, self.target - self.pass_sample)
        };
        return Some(RenderTile {
            index,
            bounds: self.tiles[index].bounds,
            sample: self.pass_sample,
            num_samples,
            buffer: self.params,
        });
    }

    pub fn complete(&mut self, unit: &RenderTile) {
        if let Some(slot) = self.tiles.get_mut(unit.index) {
            slot.completed += unit.num_samples;
        }
    }

    /// Returns a unit whose device failed.
    pub fn requeue(&mut self, unit: &RenderTile) {
        self.pending.push_back(*unit);
    }

    /// Samples every pixel of the buffer has received.
    pub fn completed_samples(&self) -> u32 {
        return self.tiles.iter().map(|t| t.completed).min().unwrap_or(0);
    }

    /// Every tile reached the target. An empty buffer is trivially finished.
    pub fn is_finished(&self) -> bool {
        if self.tiles.is_empty() {
            return true;
        }
        return self.target != 0 && self.completed_samples() >= self.target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(tiles: &mut TileManager) -> Vec<RenderTile> {
        let mut units = Vec::new();
        while let Some(u) = tiles.next_unit() {
            units.push(u);
        }
        units
    }

    #[test]
    fn test_001() {
        let params = BufferParams::new(100, 50);
        let mut tiles = TileManager::new(&params, 32, 4, false, 1);
        assert_eq!(tiles.num_tiles(), 4 * 2);
        let units = drain(&mut tiles);
        assert_eq!(units.len(), 8);
        let area: i32 = units.iter().map(|u| u.bounds.area()).sum();
        assert_eq!(area, 100 * 50);
        assert!(units.iter().all(|u| u.sample == 0 && u.num_samples == 4));

        assert!(!tiles.is_finished());
        for u in units.iter() {
            tiles.complete(u);
        }
        assert_eq!(tiles.completed_samples(), 4);
        assert!(tiles.is_finished());
    }

    #[test]
    fn test_002() {
        let params = BufferParams::new(8, 8);
        let mut tiles = TileManager::new(&params, 4, 5, true, 2);
        let units = drain(&mut tiles);
        // 4 tiles, passes of 2 + 2 + 1 samples
        assert_eq!(units.len(), 12);
        let last: Vec<&RenderTile> = units.iter().filter(|u| u.sample == 4).collect();
        assert_eq!(last.len(), 4);
        assert!(last.iter().all(|u| u.num_samples == 1));
        for u in units.iter() {
            tiles.complete(u);
        }
        assert_eq!(tiles.completed_samples(), 5);
    }

    #[test]
    fn test_003() {
        let params = BufferParams::new(4, 4);
        let mut tiles = TileManager::new(&params, 4, 0, true, 1);
        for i in 0..10 {
            let u = tiles.next_unit().unwrap();
            assert_eq!(u.sample, i);
            tiles.complete(&u);
        }
        assert!(!tiles.is_finished());
        assert_eq!(tiles.completed_samples(), 10);
    }

    #[test]
    fn test_004() {
        let params = BufferParams::new(4, 4);
        let mut tiles = TileManager::new(&params, 2, 1, false, 1);
        let first = tiles.next_unit().unwrap();
        tiles.requeue(&first);
        assert_eq!(tiles.next_unit().unwrap(), first);

        let empty = TileManager::new(&BufferParams::new(0, 0), 2, 1, false, 1);
        assert!(empty.is_finished());
    }
}
