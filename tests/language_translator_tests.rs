//! Language Translator v3 request shape and response handling, verified
//! against a local mock server.

mod common;

use bytes::Bytes;
use common::*;
use ibm_watson::models::language_translator::{
    IdentifiedLanguages, TranslationModel, TranslationResult,
};
use ibm_watson::services::language_translator_v3::{
    CreateModelOptions, ListModelsOptions, TranslateDocumentOptions,
};
use ibm_watson::{FileWithMetadata, LanguageTranslatorV3, TranslateOptions, WatsonError};
use serde_json::json;
use wiremock::matchers::{
    any, body_json, body_string, body_string_contains, header, header_regex, method, path,
    query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VERSION: &str = "2018-05-01";

fn translator(server: &MockServer) -> LanguageTranslatorV3 {
    LanguageTranslatorV3::with_builder(VERSION, builder_for(server)).expect("client")
}

#[tokio::test]
async fn test_translate_sends_json_and_parses_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/translate"))
        .and(query_param("version", VERSION))
        .and(header("Authorization", TEST_BASIC_AUTH))
        .and(header("Accept", "application/json"))
        .and(body_json(json!({"text": ["Hello", "World"], "model_id": "en-es"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "word_count": 2,
            "character_count": 10,
            "translations": [{"translation": "Hola"}, {"translation": "Mundo"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = TranslateOptions {
        model_id: Some("en-es".to_string()),
        ..Default::default()
    };
    let response = translator(&server)
        .translate(&["Hello", "World"], &options, None)
        .await
        .expect("translate");

    assert_eq!(response.status_code, 200);
    let result: TranslationResult = response.into_model().expect("strict model");
    assert_eq!(result.translations.len(), 2);
    assert_eq!(result.translations[1].translation, "Mundo");
}

#[tokio::test]
async fn test_translate_with_source_and_target() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/translate"))
        .and(body_json(json!({"text": ["Bonjour"], "source": "fr", "target": "en"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "word_count": 1,
            "character_count": 7,
            "translations": [{"translation": "Hello"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = TranslateOptions {
        source: Some("fr".to_string()),
        target: Some("en".to_string()),
        ..Default::default()
    };
    let response = translator(&server)
        .translate(&["Bonjour".to_string()], &options, None)
        .await
        .expect("translate");
    assert_eq!(response.result["translations"][0]["translation"], "Hello");
}

#[tokio::test]
async fn test_translate_requires_text_before_io() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let empty: [&str; 0] = [];
    let result = translator(&server)
        .translate(&empty, &TranslateOptions::default(), None)
        .await;

    match result {
        Err(WatsonError::InvalidArgument(msg)) => assert!(msg.contains("text")),
        other => panic!("Expected InvalidArgument, got {other:?}"),
    }
}

#[tokio::test]
async fn test_identify_sends_plain_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/identify"))
        .and(header("Content-Type", "text/plain"))
        .and(body_string("Language Translator translates text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "languages": [
                {"language": "en", "confidence": 0.9804},
                {"language": "nn", "confidence": 0.0051}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let languages: IdentifiedLanguages = translator(&server)
        .identify("Language Translator translates text", None)
        .await
        .expect("identify")
        .into_model()
        .expect("model");
    assert_eq!(languages.languages[0].language, "en");
}

#[tokio::test]
async fn test_list_models_omits_unset_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/models"))
        .and(query_param("source", "en"))
        .and(query_param("default", "true"))
        .and(query_param_is_missing("target"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"models": []})))
        .expect(1)
        .mount(&server)
        .await;

    let options = ListModelsOptions {
        source: Some("en".to_string()),
        default: Some(true),
        ..Default::default()
    };
    let response = translator(&server)
        .list_models(&options, None)
        .await
        .expect("list_models");
    assert_eq!(response.result, json!({"models": []}));
}

#[tokio::test]
async fn test_get_model_and_strict_conversion() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/models/en-es"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model_id": "en-es",
            "source": "en",
            "target": "es",
            "status": "available",
            "brand_new_field": 1
        })))
        .mount(&server)
        .await;

    let response = translator(&server)
        .get_model("en-es", None)
        .await
        .expect("get_model");

    // The raw result keeps everything; the strict model rejects the extra field.
    assert_eq!(response.result["brand_new_field"], 1);
    let result = response.into_model::<TranslationModel>();
    assert!(matches!(result, Err(WatsonError::Validation(msg)) if msg.contains("brand_new_field")));
}

#[tokio::test]
async fn test_create_model_uploads_multipart() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/models"))
        .and(query_param("base_model_id", "en-fr"))
        .and(query_param("name", "custom-en-fr"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .and(body_string_contains(
            r#"name="forced_glossary"; filename="glossary.tmx""#,
        ))
        .and(body_string_contains("<tmx version=\"1.4\"/>"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model_id": "3e7dfdbe-f757-4150-afee-458e71eb93fb",
            "base_model_id": "en-fr",
            "status": "dispatching"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let glossary = FileWithMetadata::new(Bytes::from_static(b"<tmx version=\"1.4\"/>"))
        .with_filename("glossary.tmx");
    let options = CreateModelOptions {
        forced_glossary: Some(glossary),
        name: Some("custom-en-fr".to_string()),
        ..Default::default()
    };
    let response = translator(&server)
        .create_model("en-fr", options, None)
        .await
        .expect("create_model");
    assert_eq!(response.result["status"], "dispatching");
}

#[tokio::test]
async fn test_delete_model_maps_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v3/models/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("X-Global-Transaction-Id", "txn-404")
                .set_body_json(json!({"code": 404, "error": "Model not found"})),
        )
        .mount(&server)
        .await;

    let err = translator(&server)
        .delete_model("missing", None)
        .await
        .expect_err("404 must fail");

    match err {
        WatsonError::Api {
            status_code,
            ref message,
            ref transaction_id,
        } => {
            assert_eq!(status_code, 404);
            assert_eq!(message, "Model not found");
            assert_eq!(transaction_id.as_deref(), Some("txn-404"));
        }
        ref other => panic!("Expected Api error, got {other:?}"),
    }
    assert!(err.is_client_error());
}

#[tokio::test]
async fn test_translate_document_and_download() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/documents"))
        .and(body_string_contains(r#"name="file"; filename="letter.txt""#))
        .and(body_string_contains(r#"name="model_id""#))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "document_id": "doc-1",
            "filename": "letter.txt",
            "status": "processing",
            "model_id": "en-es",
            "source": "en",
            "target": "es",
            "created": "2019-06-05T20:07:13Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v3/documents/doc-1/translated_document"))
        .and(query_param("version", VERSION))
        .and(header("Accept", "text/plain"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain")
                .set_body_bytes(b"Querido amigo".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = translator(&server);
    let file = FileWithMetadata::new(b"Dear friend".to_vec())
        .with_filename("letter.txt")
        .with_content_type("text/plain");
    let options = TranslateDocumentOptions {
        model_id: Some("en-es".to_string()),
        ..Default::default()
    };
    let status = client
        .translate_document(file, options, None)
        .await
        .expect("translate_document");
    assert_eq!(status.status_code, 202);
    assert_eq!(status.result["document_id"], "doc-1");

    let document = client
        .get_translated_document("doc-1", Some("text/plain"), None)
        .await
        .expect("download");
    assert_eq!(document.result, Bytes::from_static(b"Querido amigo"));
}

#[tokio::test]
async fn test_translate_document_requires_file() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = translator(&server)
        .translate_document(
            FileWithMetadata::new(Vec::<u8>::new()),
            TranslateDocumentOptions::default(),
            None,
        )
        .await;
    assert!(matches!(result, Err(WatsonError::InvalidArgument(_))));
}

#[tokio::test]
async fn test_empty_response_body_is_null() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v3/documents/doc-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let response = translator(&server)
        .delete_document("doc-1", None)
        .await
        .expect("delete_document");
    assert_eq!(response.status_code, 204);
    assert!(response.result.is_null());
}

#[tokio::test]
async fn test_list_endpoints() {
    let server = MockServer::start().await;

    for endpoint in ["/v3/languages", "/v3/identifiable_languages", "/v3/documents"] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": endpoint})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = translator(&server);
    assert_eq!(
        client.list_languages(None).await.unwrap().result["ok"],
        "/v3/languages"
    );
    assert_eq!(
        client.list_identifiable_languages(None).await.unwrap().result["ok"],
        "/v3/identifiable_languages"
    );
    assert_eq!(
        client.list_documents(None).await.unwrap().result["ok"],
        "/v3/documents"
    );
}

#[tokio::test]
async fn test_get_document_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/documents/doc%201"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "available"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = translator(&server)
        .get_document_status("doc 1", None)
        .await
        .expect("status");
    assert_eq!(response.result["status"], "available");
}

#[test]
fn test_empty_version_rejected() {
    let result = LanguageTranslatorV3::new(
        "",
        ibm_watson::BasicAuthenticator::new(TEST_USERNAME, TEST_PASSWORD).unwrap(),
    );
    assert!(matches!(result, Err(WatsonError::InvalidArgument(msg)) if msg.contains("version")));
}

#[test]
fn test_malformed_version_rejected() {
    let result = LanguageTranslatorV3::new(
        "2018/05/01",
        ibm_watson::BasicAuthenticator::new(TEST_USERNAME, TEST_PASSWORD).unwrap(),
    );
    assert!(
        matches!(result, Err(WatsonError::InvalidArgument(msg)) if msg.contains("YYYY-MM-DD"))
    );
}
