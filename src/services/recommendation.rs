use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::WardrobeStore,
    error::{AppError, AppResult},
    models::{ClothingItem, NewOutfit, Outfit, OutfitDraft, OutfitWithItems, RecommendContext, User},
    services::{
        catalog::ItemCatalog,
        generation::GenerationClient,
        parser::{self, ParseError},
        prompt::{build_outfit_prompt, PromptContext, OUTFITS_PER_GENERATION},
    },
};

/// Orchestrates one recommendation round
///
/// Pulls eligible items from the catalog, renders the prompt, calls the
/// generator, parses the reply, persists the accepted outfits, and returns
/// the user's most recent outfits with items inlined. Every call persists
/// new outfits; callers needing idempotence must dedupe on their side.
pub struct RecommendationService {
    store: Arc<dyn WardrobeStore>,
    catalog: Arc<ItemCatalog>,
    generator: Arc<dyn GenerationClient>,
}

impl RecommendationService {
    pub fn new(
        store: Arc<dyn WardrobeStore>,
        catalog: Arc<ItemCatalog>,
        generator: Arc<dyn GenerationClient>,
    ) -> Self {
        Self {
            store,
            catalog,
            generator,
        }
    }

    /// Fresh outfits from the whole eligible wardrobe.
    pub async fn generate_for_user(
        &self,
        user: &User,
        context: &RecommendContext,
        image_url: Option<&str>,
    ) -> AppResult<Vec<OutfitWithItems>> {
        self.run_pipeline(user, context, &[], image_url).await
    }

    /// Outfits anchored on caller-chosen items
    ///
    /// Base items must exist, belong to the user, and be available, else
    /// `NotFound`. The prompt instructs the generator to put every anchor
    /// in every outfit plus at least one more piece.
    pub async fn build_around_items(
        &self,
        user: &User,
        base_item_ids: &[Uuid],
        context: &RecommendContext,
        image_url: Option<&str>,
    ) -> AppResult<Vec<OutfitWithItems>> {
        let base_items = self.catalog.resolve_selectable(user.id, base_item_ids).await?;
        self.run_pipeline(user, context, &base_items, image_url).await
    }

    async fn run_pipeline(
        &self,
        user: &User,
        context: &RecommendContext,
        base_items: &[ClothingItem],
        image_url: Option<&str>,
    ) -> AppResult<Vec<OutfitWithItems>> {
        // 1. Candidate items, least worn first.
        let candidates = self.catalog.eligible_items(user.id).await?;
        if candidates.is_empty() {
            return Err(AppError::NoInventory(
                "No available clothing items to recommend from".to_string(),
            ));
        }

        // 2. Render the prompt from profile plus situational context.
        let preferences: Vec<String> = user
            .preferences
            .iter()
            .chain(context.preferences.iter())
            .cloned()
            .collect();
        let prompt = build_outfit_prompt(&PromptContext {
            candidates: &candidates,
            base_items,
            weather: context.weather.as_deref(),
            temperature_c: context.temperature_c,
            day_description: context.day_description.as_deref(),
            preferences: &preferences,
            age: user.age,
            gender: user.gender.as_deref(),
        });

        // 3. One generation call; failures surface to the caller untouched.
        let raw_reply = self.generator.generate(&prompt, image_url).await?;

        // 4. Decode. A bad reply fails the request here, before anything
        //    is persisted.
        let drafts = parser::parse_outfits(&raw_reply)?;
        let draft_count = drafts.len();

        // 5. Persist, keeping only item references the generator was
        //    actually offered.
        let offered: HashSet<Uuid> = candidates.iter().map(|item| item.id).collect();
        let mut persisted = 0;
        for draft in drafts {
            let item_ids = accepted_item_ids(&draft, &offered);
            if item_ids.is_empty() {
                tracing::warn!(name = %draft.name, "Dropping draft with no offered item ids");
                continue;
            }
            self.store
                .insert_outfit(NewOutfit {
                    user_id: user.id,
                    name: draft.name,
                    description: draft.description,
                    clothing_item_ids: item_ids,
                    styling_tips: draft.styling_tips,
                })
                .await?;
            persisted += 1;
        }
        if persisted == 0 {
            return Err(AppError::Parse(ParseError::EmptyResult));
        }

        tracing::info!(
            user_id = %user.id,
            drafts = draft_count,
            persisted,
            "Recommendation round completed"
        );

        // 6. Answer with the freshest outfits, items inlined.
        let recent = self
            .store
            .recent_outfits(user.id, OUTFITS_PER_GENERATION as i64)
            .await?;
        self.expand(recent).await
    }

    /// Inlines each outfit's items. One batch read covers all outfits;
    /// references that no longer resolve are dropped, never an error.
    pub async fn expand(&self, outfits: Vec<Outfit>) -> AppResult<Vec<OutfitWithItems>> {
        let all_ids: Vec<Uuid> = outfits
            .iter()
            .flat_map(|outfit| outfit.clothing_item_ids.iter().copied())
            .collect();
        let by_id: HashMap<Uuid, ClothingItem> = self
            .store
            .items_by_ids(&all_ids)
            .await?
            .into_iter()
            .map(|item| (item.id, item))
            .collect();

        Ok(outfits
            .into_iter()
            .map(|outfit| {
                let items = outfit
                    .clothing_item_ids
                    .iter()
                    .filter_map(|id| by_id.get(id).cloned())
                    .collect();
                OutfitWithItems { outfit, items }
            })
            .collect())
    }
}

/// Draft item ids the generator was allowed to use, in draft order,
/// duplicates collapsed. Invented or malformed ids are dropped.
fn accepted_item_ids(draft: &OutfitDraft, offered: &HashSet<Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    draft
        .clothing_item_ids
        .iter()
        .filter_map(|raw| raw.parse::<Uuid>().ok())
        .filter(|id| offered.contains(id) && seen.insert(*id))
        .collect()
}
