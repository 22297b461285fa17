/// Tuning knobs for the scraping engine.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Bound on recursive entity construction. Descriptors that nest
    /// entities deeper than this (directly or through dereferenced pages)
    /// fail with [`crate::error::ScrapeError::DepthExceeded`] instead of
    /// navigating forever.
    pub max_depth: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self { max_depth: 16 }
    }
}
