use crate::models::OutfitDraft;

/// Typed failures for generator-reply decoding
///
/// Exactly one of these comes back whenever a reply is unusable; parsing
/// never panics on arbitrary input.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("No fenced json block in generator reply")]
    NoStructuredBlock,

    #[error("Fenced block is not valid outfit data: {0}")]
    MalformedData(String),

    #[error("No proposed outfit survived validation")]
    EmptyResult,
}

/// Decodes a generator reply into outfit drafts
///
/// The generator is instructed to wrap its proposals in a fenced block
/// tagged `json`, but replies routinely carry prose around it. Only the
/// first fenced block is considered. The block must decode to a JSON
/// array; elements missing a name, a description, or any item ids are
/// dropped rather than failing the batch, unless nothing is left.
pub fn parse_outfits(raw_text: &str) -> Result<Vec<OutfitDraft>, ParseError> {
    // 1. Locate the first json-tagged fence and cut out its body.
    let block = extract_json_block(raw_text).ok_or(ParseError::NoStructuredBlock)?;

    // 2. Strict decode; anything that is not a JSON array is malformed.
    let value: serde_json::Value = serde_json::from_str(block.trim())
        .map_err(|e| ParseError::MalformedData(e.to_string()))?;
    let elements = match value {
        serde_json::Value::Array(elements) => elements,
        other => {
            return Err(ParseError::MalformedData(format!(
                "expected a JSON array, got {}",
                json_type_name(&other)
            )))
        }
    };

    // 3. Validate element by element, dropping the unusable ones.
    let mut drafts = Vec::with_capacity(elements.len());
    for element in elements {
        match serde_json::from_value::<OutfitDraft>(element) {
            Ok(draft) if is_usable(&draft) => drafts.push(draft),
            Ok(draft) => {
                tracing::warn!(name = %draft.name, "Dropping incomplete outfit draft");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Dropping undecodable outfit draft");
            }
        }
    }

    if drafts.is_empty() {
        return Err(ParseError::EmptyResult);
    }

    Ok(drafts)
}

/// Body of the first ```json fence, or None when no closed fence exists.
fn extract_json_block(raw: &str) -> Option<&str> {
    const OPEN: &str = "```json";

    let start = raw.find(OPEN)?;
    let body = &raw[start + OPEN.len()..];
    let end = body.find("```")?;

    Some(&body[..end])
}

fn is_usable(draft: &OutfitDraft) -> bool {
    !draft.name.trim().is_empty()
        && !draft.description.trim().is_empty()
        && !draft.clothing_item_ids.is_empty()
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fenced(body: &str) -> String {
        format!("Here you go!\n```json\n{body}\n```\nEnjoy your day.")
    }

    #[test]
    fn test_well_formed_reply_round_trips_every_draft() {
        let body = r#"[
            {"name": "Monday Casual", "description": "Relaxed office look",
             "clothing_item_ids": ["a1", "b2"], "styling_tips": "Roll the sleeves"},
            {"name": "Evening Out", "description": "Dinner ready",
             "clothing_item_ids": ["c3"], "styling_tips": ""}
        ]"#;

        let drafts = parse_outfits(&fenced(body)).unwrap();

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].name, "Monday Casual");
        assert_eq!(drafts[0].description, "Relaxed office look");
        assert_eq!(drafts[0].clothing_item_ids, vec!["a1", "b2"]);
        assert_eq!(drafts[0].styling_tips, "Roll the sleeves");
        assert_eq!(drafts[1].clothing_item_ids, vec!["c3"]);
    }

    #[test]
    fn test_missing_styling_tips_defaults_to_empty() {
        let body = r#"[{"name": "N", "description": "D", "clothing_item_ids": ["x"]}]"#;
        let drafts = parse_outfits(&fenced(body)).unwrap();
        assert_eq!(drafts[0].styling_tips, "");
    }

    #[test]
    fn test_reply_without_fence_is_no_structured_block() {
        let raw = "I would suggest pairing the linen shirt with the chinos.";
        assert_eq!(parse_outfits(raw), Err(ParseError::NoStructuredBlock));
    }

    #[test]
    fn test_unclosed_fence_is_no_structured_block() {
        let raw = "```json\n[{\"name\": \"N\"}]";
        assert_eq!(parse_outfits(raw), Err(ParseError::NoStructuredBlock));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = parse_outfits(&fenced("[{not json")).unwrap_err();
        assert!(matches!(err, ParseError::MalformedData(_)));
    }

    #[test]
    fn test_non_array_document_is_malformed() {
        let body = r#"{"name": "N", "description": "D", "clothing_item_ids": ["x"]}"#;
        let err = parse_outfits(&fenced(body)).unwrap_err();
        assert!(matches!(err, ParseError::MalformedData(_)));
    }

    #[test]
    fn test_invalid_elements_drop_without_failing_the_batch() {
        let body = r#"[
            {"name": "", "description": "blank name", "clothing_item_ids": ["a"]},
            {"name": "No items", "description": "D", "clothing_item_ids": []},
            {"name": 7, "description": "numeric name", "clothing_item_ids": ["a"]},
            {"name": "Keeper", "description": "D", "clothing_item_ids": ["a"]}
        ]"#;

        let drafts = parse_outfits(&fenced(body)).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].name, "Keeper");
    }

    #[test]
    fn test_every_draft_dropped_is_empty_result() {
        let body = r#"[{"name": " ", "description": "D", "clothing_item_ids": ["a"]}]"#;
        assert_eq!(parse_outfits(&fenced(body)), Err(ParseError::EmptyResult));
    }

    #[test]
    fn test_empty_array_is_empty_result() {
        assert_eq!(parse_outfits(&fenced("[]")), Err(ParseError::EmptyResult));
    }

    #[test]
    fn test_only_first_fence_is_considered() {
        let raw = format!(
            "{}\n```json\n[{{\"name\": \"Second\", \"description\": \"D\", \
             \"clothing_item_ids\": [\"z\"]}}]\n```",
            fenced(r#"[{"name": "First", "description": "D", "clothing_item_ids": ["a"]}]"#)
        );

        let drafts = parse_outfits(&raw).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].name, "First");

        let garbage_first = format!(
            "{}\n```json\n[{{\"name\": \"Valid\", \"description\": \"D\", \
             \"clothing_item_ids\": [\"z\"]}}]\n```",
            fenced("{ nope")
        );
        assert!(matches!(
            parse_outfits(&garbage_first),
            Err(ParseError::MalformedData(_))
        ));
    }
}
