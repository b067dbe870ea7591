//! Property-based tests for the SSE decoder and strict model conversion.
//!
//! These check the decoder's pairing rules over generated event sequences
//! and that chunking of the HTTP body never changes what is decoded.

use bytes::Bytes;
use futures_util::{StreamExt, stream};
use ibm_watson::models::language_translator::{IdentifiedLanguages, Translation, TranslationResult};
use ibm_watson::models::personality_insights::Trait;
use ibm_watson::models::tone_analyzer::DocumentAnalysis;
use ibm_watson::{Model, SseEvent, WatsonError, decode_lines, parse_sse_stream};
use proptest::prelude::*;
use serde_json::Value;

// =============================================================================
// Strategy Generators
// =============================================================================

fn arb_event_name() -> impl Strategy<Value = String> {
    "[a-z_]{1,12}"
}

/// Single-line JSON payloads, as Watson sends them.
fn arb_json_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        ".*".prop_map(Value::String),
        prop::collection::btree_map("[a-zA-Z_][a-zA-Z0-9_]*", ".*", 0..5).prop_map(|m| {
            Value::Object(m.into_iter().map(|(k, v)| (k, Value::String(v))).collect())
        }),
    ]
}

fn arb_events() -> impl Strategy<Value = Vec<(String, Value)>> {
    prop::collection::vec((arb_event_name(), arb_json_value()), 0..20)
}

fn to_lines(events: &[(String, Value)]) -> Vec<String> {
    events
        .iter()
        .flat_map(|(name, data)| [format!("event: {name}"), format!("data: {data}"), String::new()])
        .collect()
}

fn decode_all(lines: &[String]) -> Vec<SseEvent> {
    decode_lines(lines)
        .collect::<Result<Vec<_>, _>>()
        .expect("generated input is valid")
}

fn decode_chunked(body: &[u8], cuts: &[usize]) -> Vec<SseEvent> {
    let mut chunks = Vec::new();
    let mut start = 0;
    for &cut in cuts {
        chunks.push(Ok::<Bytes, WatsonError>(Bytes::copy_from_slice(&body[start..cut])));
        start = cut;
    }
    chunks.push(Ok(Bytes::copy_from_slice(&body[start..])));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    runtime.block_on(async {
        parse_sse_stream(stream::iter(chunks), 0)
            .map(|event| event.expect("generated input is valid"))
            .collect()
            .await
    })
}

// =============================================================================
// SSE properties
// =============================================================================

proptest! {
    #[test]
    fn well_formed_pairs_decode_in_order(events in arb_events()) {
        let decoded = decode_all(&to_lines(&events));

        prop_assert_eq!(decoded.len(), events.len());
        for (event, (name, data)) in decoded.iter().zip(&events) {
            prop_assert_eq!(&event.event, name);
            prop_assert_eq!(&event.data, data);
        }
    }

    #[test]
    fn decoding_is_deterministic(events in arb_events()) {
        let lines = to_lines(&events);
        prop_assert_eq!(decode_all(&lines), decode_all(&lines));
    }

    #[test]
    fn stray_data_after_complete_event_is_ignored(
        events in arb_events(),
        stray in arb_json_value(),
        position in any::<prop::sample::Index>(),
    ) {
        let mut lines = to_lines(&events);
        // After a blank line nothing is pending, so the payload is dropped.
        let insert_at = if events.is_empty() { 0 } else { 3 * position.index(events.len()) };
        lines.insert(insert_at, format!("data: {stray}"));

        let decoded: Vec<Value> = decode_all(&lines).into_iter().map(|e| e.data).collect();
        let expected: Vec<Value> = events.into_iter().map(|(_, data)| data).collect();
        prop_assert_eq!(decoded, expected);
    }

    #[test]
    fn chunk_boundaries_do_not_change_events(
        events in arb_events(),
        raw_cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..8),
        crlf in any::<bool>(),
    ) {
        let separator = if crlf { "\r\n" } else { "\n" };
        let body = to_lines(&events).join(separator);
        let bytes = body.as_bytes();

        let mut cuts: Vec<usize> = raw_cuts.iter().map(|i| i.index(bytes.len() + 1)).collect();
        cuts.sort_unstable();

        let expected = decode_all(&to_lines(&events));
        prop_assert_eq!(decode_chunked(bytes, &cuts), expected);
    }
}

// =============================================================================
// Model properties
// =============================================================================

fn arb_translation_result() -> impl Strategy<Value = TranslationResult> {
    (
        any::<u32>(),
        any::<u32>(),
        prop::collection::vec(".{0,80}", 0..5),
        prop::option::of("[a-z]{2}"),
    )
        .prop_map(|(words, chars, texts, detected)| TranslationResult {
            word_count: i64::from(words),
            character_count: i64::from(chars),
            detected_language: detected,
            detected_language_confidence: None,
            translations: texts
                .into_iter()
                .map(|translation| Translation { translation })
                .collect(),
        })
}

proptest! {
    #[test]
    fn translation_result_dict_round_trip(result in arb_translation_result()) {
        let dict = result.to_dict().expect("serialize");
        prop_assert_eq!(TranslationResult::from_dict(dict.clone()).expect("deserialize"), result);
        // Unset optional fields are not serialized.
        prop_assert!(dict.get("detected_language_confidence").is_none());
    }

    #[test]
    fn undeclared_field_is_rejected(
        result in arb_translation_result(),
        field in "x_[a-z]{1,10}",
    ) {
        let mut dict = result.to_dict().expect("serialize");
        dict.as_object_mut().expect("object").insert(field, Value::Bool(true));
        prop_assert!(matches!(
            TranslationResult::from_dict(dict),
            Err(WatsonError::Validation(_))
        ));
    }
}

// =============================================================================
// Dict-first round trips with scores
// =============================================================================

/// Integral and fractional JSON numbers, as Watson mixes them in scores.
fn arb_score() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-1000i64..1000).prop_map(Value::from),
        (0u64..2).prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        (0.0f64..1.0).prop_map(Value::from),
    ]
}

fn arb_tone_score_dict() -> impl Strategy<Value = Value> {
    (arb_score(), "[a-z_]{1,12}", "[A-Za-z ]{1,20}").prop_map(|(score, id, name)| {
        serde_json::json!({"score": score, "tone_id": id, "tone_name": name})
    })
}

fn arb_trait_dict() -> impl Strategy<Value = Value> {
    (
        "[a-z_]{1,16}",
        arb_score(),
        prop::option::of(arb_score()),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(id, percentile, raw_score, significant)| {
            let mut dict = serde_json::json!({
                "trait_id": id,
                "name": id,
                "category": "personality",
                "percentile": percentile,
            });
            if let Some(raw_score) = raw_score {
                dict["raw_score"] = raw_score;
            }
            if let Some(significant) = significant {
                dict["significant"] = Value::Bool(significant);
            }
            dict
        })
}

proptest! {
    #[test]
    fn document_analysis_dict_round_trip(
        tones in prop::collection::vec(arb_tone_score_dict(), 0..6),
    ) {
        let dict = serde_json::json!({"tones": tones});
        let model = DocumentAnalysis::from_dict(dict.clone()).expect("deserialize");
        prop_assert_eq!(model.to_dict().expect("serialize"), dict);
    }

    #[test]
    fn identified_languages_dict_round_trip(
        languages in prop::collection::vec(("[a-z]{2}", arb_score()), 0..6),
    ) {
        let dict = serde_json::json!({
            "languages": languages
                .into_iter()
                .map(|(language, confidence)| serde_json::json!({"language": language, "confidence": confidence}))
                .collect::<Vec<_>>()
        });
        let model = IdentifiedLanguages::from_dict(dict.clone()).expect("deserialize");
        prop_assert_eq!(model.to_dict().expect("serialize"), dict);
    }

    #[test]
    fn trait_dict_round_trip(dict in arb_trait_dict()) {
        let model = Trait::from_dict(dict.clone()).expect("deserialize");
        prop_assert_eq!(model.to_dict().expect("serialize"), dict);
    }
}
