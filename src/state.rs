use std::sync::Arc;

use crate::{
    auth::JwtConfig,
    db::WardrobeStore,
    services::{
        catalog::ItemCatalog, generation::GenerationClient, recommendation::RecommendationService,
        rotation::RotationScheduler, scheduler::DeferredScheduler, weather::WeatherService,
    },
};

/// Shared application state available to all handlers via `State<AppState>`
///
/// Constructed once at startup and torn down at shutdown; there is no
/// ambient global lookup anywhere below the routing layer. Cheaply
/// cloneable, everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WardrobeStore>,
    pub catalog: Arc<ItemCatalog>,
    pub recommendations: Arc<RecommendationService>,
    pub rotation: Arc<RotationScheduler>,
    pub weather: Arc<WeatherService>,
    pub jwt: JwtConfig,
}

impl AppState {
    /// Wires the service graph over the given collaborators.
    ///
    /// The catalog, recommendation service, and rotation scheduler all
    /// share the one store handle; swapping the store (or the generator or
    /// timer) swaps it everywhere, which is how the tests run the full
    /// stack in memory.
    pub fn new(
        store: Arc<dyn WardrobeStore>,
        generator: Arc<dyn GenerationClient>,
        scheduler: Arc<dyn DeferredScheduler>,
        weather: Arc<WeatherService>,
        jwt: JwtConfig,
    ) -> Self {
        let catalog = Arc::new(ItemCatalog::new(Arc::clone(&store)));
        let recommendations = Arc::new(RecommendationService::new(
            Arc::clone(&store),
            Arc::clone(&catalog),
            generator,
        ));
        let rotation = Arc::new(RotationScheduler::new(
            Arc::clone(&store),
            Arc::clone(&catalog),
            scheduler,
        ));

        Self {
            store,
            catalog,
            recommendations,
            rotation,
            weather,
            jwt,
        }
    }
}
