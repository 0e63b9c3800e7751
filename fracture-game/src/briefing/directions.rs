//! Strategic direction selection.

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use super::packet::{StrategicDirection, StrategicDirections};
use crate::condition::ConditionEvaluator;
use crate::data::StrategicDirectionItem;

/// Supplies a recommendation level for each surviving direction.
///
/// Levels are drawn in catalog order, once per direction whose condition
/// holds. Values above `max_level` are clamped.
pub trait RecommendationSource {
    fn recommendation_level(&mut self, direction: &StrategicDirectionItem, max_level: u8) -> u8;
}

impl<F> RecommendationSource for F
where
    F: FnMut(&StrategicDirectionItem, u8) -> u8,
{
    fn recommendation_level(&mut self, direction: &StrategicDirectionItem, max_level: u8) -> u8 {
        self(direction, max_level)
    }
}

/// Uniform draw over `0..=max_level` from any RNG.
#[derive(Debug, Clone)]
pub struct RngRecommendations<R>(R);

impl<R: Rng> RngRecommendations<R> {
    pub const fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl RngRecommendations<ChaCha20Rng> {
    /// Deterministic source: the same seed yields the same levels.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha20Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> RecommendationSource for RngRecommendations<R> {
    fn recommendation_level(&mut self, _direction: &StrategicDirectionItem, max_level: u8) -> u8 {
        self.0.gen_range(0..=max_level)
    }
}

/// Filter, score and cap the direction catalog.
pub fn select_directions<S>(
    items: &[StrategicDirectionItem],
    evaluator: &ConditionEvaluator<'_>,
    recommendations: &mut S,
    max_level: u8,
    max_directions: usize,
    message: &str,
) -> StrategicDirections
where
    S: RecommendationSource + ?Sized,
{
    let mut available: Vec<StrategicDirection> = items
        .iter()
        .filter(|item| evaluator.evaluate(&item.condition))
        .map(|item| {
            let level = recommendations
                .recommendation_level(item, max_level)
                .min(max_level);
            StrategicDirection::from_item(item, level)
        })
        .collect();

    let matched = available.len();
    available.sort_by_key(|direction| direction.recommendation_level);
    available.truncate(max_directions);
    debug!(
        "strategic directions: {matched} of {} matched, offering {}",
        items.len(),
        available.len()
    );

    StrategicDirections::new(available, message)
}
