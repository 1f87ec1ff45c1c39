use crate::models::ClothingItem;

/// Number of outfits every generation is asked to propose.
pub const OUTFITS_PER_GENERATION: usize = 3;

/// Everything the prompt may mention
///
/// Candidates are listed in the order given (the catalog hands them over
/// least-worn first). Base items, when present, are the anchors every
/// proposed outfit must contain.
pub struct PromptContext<'a> {
    pub candidates: &'a [ClothingItem],
    pub base_items: &'a [ClothingItem],
    pub weather: Option<&'a str>,
    pub temperature_c: Option<f64>,
    pub day_description: Option<&'a str>,
    pub preferences: &'a [String],
    pub age: Option<i32>,
    pub gender: Option<&'a str>,
}

/// Renders the generation prompt
///
/// Pure string assembly, no I/O. The same context always yields the same
/// text, so prompt regressions show up as plain string diffs in tests.
pub fn build_outfit_prompt(context: &PromptContext) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a personal stylist planning outfits from a fixed wardrobe. \
         Favor pieces that have been worn less often.\n\n",
    );

    prompt.push_str("Wardrobe candidates (id | description | times worn):\n");
    for item in context.candidates {
        prompt.push_str(&format!(
            "- {} | {} | worn {} times\n",
            item.id, item.description, item.frequency
        ));
    }

    if !context.base_items.is_empty() {
        prompt.push_str(
            "\nAnchor items: every outfit MUST include all of the following ids, \
             plus at least one additional candidate:\n",
        );
        for item in context.base_items {
            prompt.push_str(&format!("- {} | {}\n", item.id, item.description));
        }
    }

    let mut wearer = Vec::new();
    if let Some(age) = context.age {
        wearer.push(format!("age {age}"));
    }
    if let Some(gender) = context.gender {
        wearer.push(format!("gender {gender}"));
    }
    if !wearer.is_empty() {
        prompt.push_str(&format!("\nAbout the wearer: {}.\n", wearer.join(", ")));
    }

    if !context.preferences.is_empty() {
        prompt.push_str(&format!(
            "Style preferences: {}.\n",
            context.preferences.join("; ")
        ));
    }

    let mut conditions = Vec::new();
    if let Some(weather) = context.weather {
        conditions.push(weather.to_string());
    }
    if let Some(temperature) = context.temperature_c {
        conditions.push(format!("{temperature}\u{b0}C"));
    }
    if !conditions.is_empty() {
        prompt.push_str(&format!("\nConditions: {}.\n", conditions.join(", ")));
    }
    if let Some(day) = context.day_description {
        prompt.push_str(&format!("Plans for the day: {day}.\n"));
    }

    prompt.push_str(&format!(
        "\nInstructions:\n\
         1. Propose exactly {OUTFITS_PER_GENERATION} outfits.\n\
         2. Use only ids from the candidate list above; never invent ids.\n\
         3. Reply with a single fenced code block tagged `json` containing a JSON \
         array. Each element must have \"name\", \"description\", \
         \"clothing_item_ids\" (an array of id strings), and \"styling_tips\".\n",
    ));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn candidate(description: &str, frequency: i32) -> ClothingItem {
        ClothingItem {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            description: description.to_string(),
            frequency,
            available: true,
            created_at: Utc::now(),
            seq: 0,
        }
    }

    fn bare_context<'a>(candidates: &'a [ClothingItem]) -> PromptContext<'a> {
        PromptContext {
            candidates,
            base_items: &[],
            weather: None,
            temperature_c: None,
            day_description: None,
            preferences: &[],
            age: None,
            gender: None,
        }
    }

    #[test]
    fn test_prompt_lists_every_candidate_id() {
        let candidates = vec![candidate("linen shirt", 0), candidate("denim jacket", 3)];
        let prompt = build_outfit_prompt(&bare_context(&candidates));

        for item in &candidates {
            assert!(prompt.contains(&item.id.to_string()));
            assert!(prompt.contains(&item.description));
        }
        assert!(prompt.contains("exactly 3 outfits"));
        assert!(!prompt.contains("```"), "prompt itself must not open a fence");
    }

    #[test]
    fn test_prompt_demands_json_array_fields() {
        let candidates = vec![candidate("linen shirt", 0)];
        let prompt = build_outfit_prompt(&bare_context(&candidates));

        assert!(prompt.contains("`json`"));
        assert!(prompt.contains("\"name\""));
        assert!(prompt.contains("\"description\""));
        assert!(prompt.contains("\"clothing_item_ids\""));
        assert!(prompt.contains("\"styling_tips\""));
    }

    #[test]
    fn test_anchor_section_only_with_base_items() {
        let candidates = vec![candidate("linen shirt", 0), candidate("chinos", 1)];
        let without = build_outfit_prompt(&bare_context(&candidates));
        assert!(!without.contains("Anchor items"));

        let base = vec![candidates[1].clone()];
        let mut context = bare_context(&candidates);
        context.base_items = &base;
        let with = build_outfit_prompt(&context);

        assert!(with.contains("Anchor items"));
        assert!(with.contains("at least one additional candidate"));
        assert!(with.contains(&base[0].id.to_string()));
    }

    #[test]
    fn test_optional_context_lines_appear_only_when_set() {
        let candidates = vec![candidate("linen shirt", 0)];
        let bare = build_outfit_prompt(&bare_context(&candidates));
        assert!(!bare.contains("About the wearer"));
        assert!(!bare.contains("Conditions"));
        assert!(!bare.contains("Style preferences"));
        assert!(!bare.contains("Plans for the day"));

        let preferences = vec!["no bright colors".to_string()];
        let mut context = bare_context(&candidates);
        context.weather = Some("overcast");
        context.temperature_c = Some(18.5);
        context.day_description = Some("office, then dinner");
        context.preferences = &preferences;
        context.age = Some(34);
        context.gender = Some("female");

        let full = build_outfit_prompt(&context);
        assert!(full.contains("overcast"));
        assert!(full.contains("18.5\u{b0}C"));
        assert!(full.contains("office, then dinner"));
        assert!(full.contains("no bright colors"));
        assert!(full.contains("age 34"));
        assert!(full.contains("gender female"));
    }

    #[test]
    fn test_same_context_renders_identical_text() {
        let candidates = vec![candidate("linen shirt", 0), candidate("denim jacket", 3)];
        let preferences = vec!["loves linen".to_string()];
        let mut context = bare_context(&candidates);
        context.preferences = &preferences;
        context.temperature_c = Some(21.0);

        assert_eq!(
            build_outfit_prompt(&context),
            build_outfit_prompt(&context)
        );
    }
}
