//! Enumeration of fixed-horizon windows over episodes.
use serde::{Deserialize, Serialize};

/// A contiguous range `[start, end)` of steps in an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    /// Episode the window is drawn from.
    pub episode: usize,

    /// First step of the window.
    pub start: usize,

    /// One past the last step, `start + horizon`.
    pub end: usize,
}

/// Ordered list of all windows of a dataset.
///
/// Episodes are visited in storage order and starts in ascending order,
/// so the same inputs always give the same index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowIndex {
    windows: Vec<Window>,
}

impl WindowIndex {
    /// Builds the index.
    ///
    /// For an episode of valid length `L`, windows start at every step in
    /// `[0, max_start)` with `max_start = min(L - 1, max_path_length - horizon)`.
    /// Without padding, `max_start` is further limited to `L - horizon` so that
    /// windows never reach into padded steps.
    ///
    /// Episodes shorter than `horizon` contribute no window.
    pub fn build(
        path_lengths: &[usize],
        horizon: usize,
        max_path_length: usize,
        use_padding: bool,
    ) -> Self {
        let mut windows = Vec::new();
        let horizon_ = horizon as i64;
        let max_path_length_ = max_path_length as i64;

        for (episode, &path_length) in path_lengths.iter().enumerate() {
            if path_length < horizon {
                log::debug!(
                    "Episode {} ({} steps) is shorter than horizon {}",
                    episode,
                    path_length,
                    horizon
                );
                continue;
            }

            let path_length = path_length as i64;
            let mut max_start = (path_length - 1).min(max_path_length_ - horizon_);
            if !use_padding {
                max_start = max_start.min(path_length - horizon_);
            }

            for start in 0..max_start.max(0) as usize {
                windows.push(Window {
                    episode,
                    start,
                    end: start + horizon,
                });
            }
        }

        Self { windows }
    }

    /// Number of windows.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Returns `true` if there is no window.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Window at the given position.
    pub fn get(&self, ix: usize) -> Option<&Window> {
        self.windows.get(ix)
    }

    /// Iterates over windows in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Window> {
        self.windows.iter()
    }

    /// All windows as a slice.
    pub fn as_slice(&self) -> &[Window] {
        &self.windows
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn starts(index: &WindowIndex, episode: usize) -> Vec<usize> {
        index
            .iter()
            .filter(|w| w.episode == episode)
            .map(|w| w.start)
            .collect()
    }

    #[test]
    fn test_build_with_padding() {
        let index = WindowIndex::build(&[3, 5], 2, 5, true);
        assert_eq!(index.len(), 5);
        assert_eq!(starts(&index, 0), vec![0, 1]);
        assert_eq!(starts(&index, 1), vec![0, 1, 2]);
        assert!(index.iter().all(|w| w.end == w.start + 2));
    }

    #[test]
    fn test_build_without_padding() {
        // Episode 0: min(2, 3, 1) = 1, episode 1: min(4, 3, 3) = 3
        let index = WindowIndex::build(&[3, 5], 2, 5, false);
        assert_eq!(starts(&index, 0), vec![0]);
        assert_eq!(starts(&index, 1), vec![0, 1, 2]);
    }

    #[test]
    fn test_short_episodes_are_excluded() {
        for &use_padding in &[true, false] {
            let index = WindowIndex::build(&[1, 3, 0, 8], 4, 10, use_padding);
            assert!(index.iter().all(|w| w.episode == 3));
            assert!(!index.is_empty());
        }
    }

    #[test]
    fn test_windows_stay_in_storage() {
        let path_lengths = [10, 7, 4, 10, 1];
        for &use_padding in &[true, false] {
            let index = WindowIndex::build(&path_lengths, 4, 10, use_padding);
            for w in index.iter() {
                assert!(w.end <= 10);
                assert!(w.start < path_lengths[w.episode]);
                if !use_padding {
                    assert!(w.end <= path_lengths[w.episode]);
                }
            }
        }
    }

    #[test]
    fn test_padding_starts_at_zero() {
        let path_lengths = [4, 5, 9, 12];
        let index = WindowIndex::build(&path_lengths, 4, 12 + 1, true);
        for e in 0..path_lengths.len() {
            assert_eq!(starts(&index, e).first(), Some(&0));
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let path_lengths = [6, 2, 9, 9, 3];
        let a = WindowIndex::build(&path_lengths, 3, 9, true);
        let b = WindowIndex::build(&path_lengths, 3, 9, true);
        assert_eq!(a, b);
    }
}
