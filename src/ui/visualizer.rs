use rand::Rng;

const MIN_HEIGHT: u64 = 10;
const MAX_HEIGHT: u64 = 1000;

/// Decorative level bars. Not driven by the audio signal: each tick while
/// something is playing just rolls new heights.
#[derive(Debug, Clone)]
pub struct Visualizer {
    count: usize,
    bars: Vec<u64>,
}

impl Visualizer {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            bars: Vec::new(),
        }
    }

    pub fn tick(&mut self, busy: bool) {
        if !busy {
            self.bars.clear();
            return;
        }
        let mut rng = rand::rng();
        self.bars = (0..self.count)
            .map(|_| rng.random_range(MIN_HEIGHT..=MAX_HEIGHT))
            .collect();
    }

    pub fn bars(&self) -> &[u64] {
        &self.bars
    }

    pub fn max_height(&self) -> u64 {
        MAX_HEIGHT
    }
}
