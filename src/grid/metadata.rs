//! Page size, total rows and buffer sizing ratios

use serde::{Deserialize, Serialize};

/// Buffer sizes expressed in pages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferRatios {
    /// Pages fetched for a full window (default 7)
    pub large_buffer_size: f64,
    /// Pages fetched for an incremental window (default 1)
    pub small_buffer_size: f64,
    /// Fraction of the large buffer treated as "near the edge" (default 0.2)
    pub near_limit_factor: f64,
}

impl Default for BufferRatios {
    fn default() -> Self {
        Self {
            large_buffer_size: 7.0,
            small_buffer_size: 1.0,
            near_limit_factor: 0.2,
        }
    }
}

/// Shape of the dataset and of the client-side window.
///
/// Derived sizes truncate toward zero.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMetadata {
    page_size: usize,
    total_rows: usize,
    ratios: BufferRatios,
}

impl GridMetadata {
    pub fn new(page_size: usize, total_rows: usize, ratios: BufferRatios) -> Self {
        Self {
            page_size,
            total_rows,
            ratios,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn set_total_rows(&mut self, total_rows: usize) {
        self.total_rows = total_rows;
    }

    pub fn ratios(&self) -> &BufferRatios {
        &self.ratios
    }

    pub fn large_buffer_size(&self) -> usize {
        (self.ratios.large_buffer_size * self.page_size as f64) as usize
    }

    pub fn small_buffer_size(&self) -> usize {
        (self.ratios.small_buffer_size * self.page_size as f64) as usize
    }

    /// Margin from a buffer edge that triggers a proactive refetch
    pub fn limit_tolerance(&self) -> usize {
        (self.large_buffer_size() as f64 * self.ratios.near_limit_factor) as usize
    }

    pub fn buffer_size(&self, full: bool) -> usize {
        if full {
            self.large_buffer_size()
        } else {
            self.small_buffer_size()
        }
    }

    /// Start of a large window that places `offset`'s page in its middle
    pub fn large_buffer_window_start(&self, offset: usize) -> usize {
        let half_window =
            0.5 * self.large_buffer_size() as f64 - 0.5 * self.page_size as f64;
        let start = offset as f64 - half_window;
        if start <= 0.0 {
            0
        } else {
            start as usize
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> GridMetadata {
        GridMetadata::new(20, 1000, BufferRatios::default())
    }

    #[test]
    fn test_default_sizes() {
        let m = meta();
        assert_eq!(m.large_buffer_size(), 140);
        assert_eq!(m.small_buffer_size(), 20);
        assert_eq!(m.limit_tolerance(), 28);
        assert_eq!(m.buffer_size(true), 140);
        assert_eq!(m.buffer_size(false), 20);
    }

    #[test]
    fn test_sizes_truncate() {
        let m = GridMetadata::new(
            15,
            100,
            BufferRatios {
                large_buffer_size: 2.5,
                small_buffer_size: 0.5,
                near_limit_factor: 0.3,
            },
        );
        assert_eq!(m.large_buffer_size(), 37); // 37.5
        assert_eq!(m.small_buffer_size(), 7); // 7.5
        assert_eq!(m.limit_tolerance(), 11); // 11.1
    }

    #[test]
    fn test_large_window_start_centers_page() {
        let m = meta();
        // half window = 70 - 10 = 60
        assert_eq!(m.large_buffer_window_start(0), 0);
        assert_eq!(m.large_buffer_window_start(59), 0);
        assert_eq!(m.large_buffer_window_start(115), 55);
        assert_eq!(m.large_buffer_window_start(500), 440);
    }

    #[test]
    fn test_set_total_rows() {
        let mut m = meta();
        m.set_total_rows(42);
        assert_eq!(m.total_rows(), 42);
    }
}
