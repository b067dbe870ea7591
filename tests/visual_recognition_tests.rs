//! Visual Recognition v3 (classifiers) and v4 (object collections).

mod common;

use bytes::Bytes;
use common::*;
use ibm_watson::models::visual_recognition::{ClassifiedImages, Location, TrainingDataObject};
use ibm_watson::services::visual_recognition_v3::{ClassifyOptions, UpdateClassifierOptions};
use ibm_watson::services::visual_recognition_v4::{CollectionOptions, ImageInput};
use ibm_watson::{FileWithMetadata, VisualRecognitionV3, VisualRecognitionV4, WatsonError};
use serde_json::json;
use std::collections::BTreeMap;
use wiremock::matchers::{
    any, body_json, body_string_contains, header, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const V3_VERSION: &str = "2018-03-19";
const V4_VERSION: &str = "2019-02-11";

fn v3(server: &MockServer) -> VisualRecognitionV3 {
    VisualRecognitionV3::with_builder(V3_VERSION, builder_for(server)).expect("client")
}

fn v4(server: &MockServer) -> VisualRecognitionV4 {
    VisualRecognitionV4::with_builder(V4_VERSION, builder_for(server)).expect("client")
}

fn zip(name: &str) -> FileWithMetadata {
    FileWithMetadata::new(Bytes::from_static(b"PK\x03\x04fake-zip")).with_filename(name)
}

#[tokio::test]
async fn test_classify_by_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/classify"))
        .and(query_param("version", V3_VERSION))
        .and(header("Accept-Language", "es"))
        .and(body_string_contains(r#"name="url""#))
        .and(body_string_contains("https://example.com/fruitbowl.jpg"))
        .and(body_string_contains("IBM,me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "images_processed": 1,
            "images": [{
                "source_url": "https://example.com/fruitbowl.jpg",
                "resolved_url": "https://example.com/fruitbowl.jpg",
                "classifiers": [{
                    "name": "default",
                    "classifier_id": "default",
                    "classes": [{"class": "banana", "score": 0.81, "type_hierarchy": "/fruit/banana"}]
                }]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = ClassifyOptions {
        url: Some("https://example.com/fruitbowl.jpg".to_string()),
        owners: Some(vec!["IBM".to_string(), "me".to_string()]),
        accept_language: Some("es".to_string()),
        ..Default::default()
    };
    let classified: ClassifiedImages = v3(&server)
        .classify(options, None)
        .await
        .expect("classify")
        .into_model()
        .expect("model");

    let class = &classified.images[0].classifiers[0].classes[0];
    assert_eq!(class.class_name, "banana");
    assert_eq!(class.type_hierarchy.as_deref(), Some("/fruit/banana"));
}

#[tokio::test]
async fn test_classify_requires_an_image_source() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = v3(&server).classify(ClassifyOptions::default(), None).await;
    assert!(matches!(result, Err(WatsonError::InvalidArgument(msg)) if msg.contains("url")));
}

#[tokio::test]
async fn test_create_classifier_names_parts_by_class() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/classifiers"))
        .and(body_string_contains(r#"name="name""#))
        .and(body_string_contains("Cars vs Trucks"))
        .and(body_string_contains(
            r#"name="cars_positive_examples"; filename="cars.zip""#,
        ))
        .and(body_string_contains(r#"name="negative_examples"; filename="trucks.zip""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "classifier_id": "CarsvsTrucks_1479118188",
            "name": "Cars vs Trucks",
            "status": "training"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut positives = BTreeMap::new();
    positives.insert("cars".to_string(), zip("cars.zip"));

    let response = v3(&server)
        .create_classifier("Cars vs Trucks", positives, Some(zip("trucks.zip")), None)
        .await
        .expect("create_classifier");
    assert_eq!(response.result["status"], "training");
}

#[tokio::test]
async fn test_create_classifier_requires_positive_examples() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = v3(&server)
        .create_classifier("empty", BTreeMap::new(), None, None)
        .await;
    assert!(matches!(result, Err(WatsonError::InvalidArgument(_))));
}

#[tokio::test]
async fn test_classifier_lifecycle() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/classifiers"))
        .and(query_param("verbose", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"classifiers": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/classifiers/dogs_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "classifier_id": "dogs_1", "name": "dogs", "status": "ready"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v3/classifiers/dogs_1"))
        .and(body_string_contains(r#"name="husky_positive_examples""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "classifier_id": "dogs_1", "name": "dogs", "status": "retraining"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v3/classifiers/dogs_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = v3(&server);
    client.list_classifiers(Some(true), None).await.expect("list");
    let got = client.get_classifier("dogs_1", None).await.expect("get");
    assert_eq!(got.result["status"], "ready");

    let mut positives = BTreeMap::new();
    positives.insert("husky".to_string(), zip("husky.zip"));
    let updated = client
        .update_classifier(
            "dogs_1",
            UpdateClassifierOptions {
                positive_examples: positives,
                negative_examples: None,
            },
            None,
        )
        .await
        .expect("update");
    assert_eq!(updated.result["status"], "retraining");

    client.delete_classifier("dogs_1", None).await.expect("delete");
}

#[tokio::test]
async fn test_get_core_ml_model_returns_bytes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/classifiers/dogs_1/core_ml_model"))
        .and(header("Accept", "application/octet-stream"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/octet-stream")
                .set_body_bytes(vec![0u8, 1, 2, 3]),
        )
        .expect(1)
        .mount(&server)
        .await;

    let model = v3(&server)
        .get_core_ml_model("dogs_1", None)
        .await
        .expect("core ml");
    assert_eq!(model.result.as_ref(), &[0u8, 1, 2, 3]);
}

#[tokio::test]
async fn test_delete_user_data_v3() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v3/user_data"))
        .and(query_param("customer_id", "customer-1"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let response = v3(&server)
        .delete_user_data("customer-1", None)
        .await
        .expect("delete_user_data");
    assert_eq!(response.status_code, 202);
    assert!(response.result.is_null());
}

#[tokio::test]
async fn test_v4_analyze_repeats_image_parts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v4/analyze"))
        .and(query_param("version", V4_VERSION))
        .and(body_string_contains(r#"name="collection_ids""#))
        .and(body_string_contains("col-1,col-2"))
        .and(body_string_contains(r#"name="features""#))
        .and(body_string_contains(r#"name="images_file"; filename="a.jpg""#))
        .and(body_string_contains(r#"name="images_file"; filename="b.jpg""#))
        .and(body_string_contains("https://example.com/c.jpg"))
        .and(body_string_contains(r#"name="threshold""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"images": []})))
        .expect(1)
        .mount(&server)
        .await;

    let images = ImageInput {
        images_file: vec![
            FileWithMetadata::new(b"jpg-a".to_vec()).with_filename("a.jpg"),
            FileWithMetadata::new(b"jpg-b".to_vec()).with_filename("b.jpg"),
        ],
        image_url: vec!["https://example.com/c.jpg".to_string()],
    };
    let response = v4(&server)
        .analyze(&["col-1", "col-2"], &["objects"], images, Some(0.15), None)
        .await
        .expect("analyze");
    assert_eq!(response.result, json!({"images": []}));
}

#[tokio::test]
async fn test_v4_analyze_validates_before_io() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = v4(&server);
    let no_features: [&str; 0] = [];
    let result = client
        .analyze(
            &["col-1"],
            &no_features,
            ImageInput {
                image_url: vec!["https://example.com/x.jpg".to_string()],
                ..Default::default()
            },
            None,
            None,
        )
        .await;
    assert!(matches!(result, Err(WatsonError::InvalidArgument(msg)) if msg.contains("features")));

    let result = client
        .analyze(&["col-1"], &["objects"], ImageInput::default(), None, None)
        .await;
    assert!(matches!(result, Err(WatsonError::InvalidArgument(_))));
}

#[tokio::test]
async fn test_v4_collection_crud() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v4/collections"))
        .and(body_json(json!({"name": "Giraffes", "description": "Tall"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "collection_id": "col-1", "name": "Giraffes"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v4/collections/col-1"))
        .and(body_json(json!({"description": "Very tall"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"collection_id": "col-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v4/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"collections": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v4/collections/col-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"collection_id": "col-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v4/collections/col-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = v4(&server);
    let created = client
        .create_collection(
            &CollectionOptions {
                name: Some("Giraffes".to_string()),
                description: Some("Tall".to_string()),
            },
            None,
        )
        .await
        .expect("create");
    assert_eq!(created.status_code, 201);

    client
        .update_collection(
            "col-1",
            &CollectionOptions {
                description: Some("Very tall".to_string()),
                ..Default::default()
            },
            None,
        )
        .await
        .expect("update");
    client.list_collections(None).await.expect("list");
    client.get_collection("col-1", None).await.expect("get");
    client.delete_collection("col-1", None).await.expect("delete");
}

#[tokio::test]
async fn test_v4_images_and_training() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v4/collections/col-1/images"))
        .and(body_string_contains(r#"name="training_data""#))
        .and(body_string_contains(r#"{"objects":[]}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"images": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v4/collections/col-1/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"images": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v4/collections/col-1/images/giraffe%201.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"image_id": "giraffe 1.jpg"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v4/collections/col-1/images/img-1/training_data"))
        .and(body_json(json!({
            "objects": [{
                "object": "giraffe",
                "location": {"top": 10, "left": 20, "width": 100, "height": 200}
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"objects": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v4/collections/col-1/train"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"collection_id": "col-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v4/collections/col-1/images/img-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = v4(&server);
    let images = ImageInput {
        images_file: vec![FileWithMetadata::new(b"jpg".to_vec()).with_filename("g.jpg")],
        ..Default::default()
    };
    client
        .add_images("col-1", images, Some(&json!({"objects": []})), None)
        .await
        .expect("add_images");
    client.list_images("col-1", None).await.expect("list_images");
    let details = client
        .get_image_details("col-1", "giraffe 1.jpg", None)
        .await
        .expect("details");
    assert_eq!(details.result["image_id"], "giraffe 1.jpg");

    let objects = [TrainingDataObject {
        object: Some("giraffe".to_string()),
        location: Some(Location {
            top: 10,
            left: 20,
            width: 100,
            height: 200,
        }),
    }];
    client
        .add_image_training_data("col-1", "img-1", &objects, None)
        .await
        .expect("training data");

    let trained = client.train("col-1", None).await.expect("train");
    assert_eq!(trained.status_code, 202);

    client
        .delete_image("col-1", "img-1", None)
        .await
        .expect("delete_image");
}

#[tokio::test]
async fn test_v4_training_usage_and_user_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/training_usage"))
        .and(query_param("start_time", "2019-01-01"))
        .and(query_param("end_time", "2019-12-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"completed_events": 3})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v4/user_data"))
        .and(query_param("customer_id", "customer-1"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let client = v4(&server);
    let usage = client
        .get_training_usage(Some("2019-01-01"), Some("2019-12-31"), None)
        .await
        .expect("usage");
    assert_eq!(usage.result["completed_events"], 3);

    client
        .delete_user_data("customer-1", None)
        .await
        .expect("delete_user_data");
}
