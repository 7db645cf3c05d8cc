use glam::Vec2;
use smallvec::SmallVec;

/// Sliding window of recent positions, oldest first.
///
/// Rockets keep up to 14 points and particles up to 10, so the inline
/// capacity covers both without spilling to the heap.
#[derive(Clone, Debug)]
pub struct Trail {
    points: SmallVec<[Vec2; 16]>,
    cap: usize,
}

impl Trail {
    pub fn new(cap: usize) -> Self {
        Self {
            points: SmallVec::new(),
            cap,
        }
    }

    /// Append a point, dropping the oldest once the window is full.
    pub fn push(&mut self, p: Vec2) {
        if self.cap == 0 {
            return;
        }
        if self.points.len() == self.cap {
            self.points.remove(0);
        }
        self.points.push(p);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Consecutive point pairs with their age fraction `i / len`
    /// (0 = oldest segment).
    pub fn segments(&self) -> impl Iterator<Item = (f32, Vec2, Vec2)> + '_ {
        let len = self.points.len() as f32;
        self.points
            .windows(2)
            .enumerate()
            .map(move |(i, w)| (i as f32 / len, w[0], w[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_oldest_when_full() {
        let mut t = Trail::new(3);
        for i in 0..5 {
            t.push(Vec2::new(i as f32, 0.0));
        }
        assert_eq!(t.len(), 3);
        let xs: Vec<f32> = t.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn segments_fade_from_oldest() {
        let mut t = Trail::new(4);
        for i in 0..4 {
            t.push(Vec2::new(i as f32, 0.0));
        }
        let segs: Vec<_> = t.segments().collect();
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].0, 0.0);
        assert_eq!(segs[2].0, 0.5);
        assert_eq!(segs[2].2, Vec2::new(3.0, 0.0));
    }
}
