mod support;

use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use trending_pulse::{ContentGenerator, Error, ImageSource, InlineImage};

use support::{
    build_gemini_client, listings_body, small_config, text_candidate, IMAGE_MODEL_PATH,
    TEXT_MODEL_PATH,
};

fn product_photo() -> InlineImage {
    InlineImage::new(vec![0x89, 0x50, 0x4e, 0x47], "image/png").unwrap()
}

#[tokio::test]
async fn test_list_requests_schema_and_returns_listings() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TEXT_MODEL_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {"type": "ARRAY", "minItems": 4, "maxItems": 4}
            }
        })))
        .and(body_string_contains("in the fashion category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listings_body(4, "fashion")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = build_gemini_client(&mock_server.uri());
    let catalog = client.catalog(&small_config(4));
    let listings = catalog.list("fashion").await;

    assert_eq!(listings.len(), 4);
    assert_eq!(listings[0].id, "gen-0");
    assert!(listings.iter().all(|listing| listing.price > 0.0));
}

#[tokio::test]
async fn test_list_falls_back_on_api_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TEXT_MODEL_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&mock_server)
        .await;

    let client = build_gemini_client(&mock_server.uri());
    let catalog = client.catalog(&small_config(8));

    let err = catalog.try_list("vehicles").await.unwrap_err();
    assert!(err.is_transport());

    let listings = catalog.list("vehicles").await;
    assert_eq!(listings.len(), 8);
    assert!(listings.iter().all(|listing| listing.category == "vehicles"));
    assert!(listings.iter().all(|listing| listing.price > 0.0));
    assert_eq!(listings[7].name, "Premium Product 8");
}

#[tokio::test]
async fn test_list_falls_back_on_short_response() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TEXT_MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(listings_body(2, "home-decor")))
        .mount(&mock_server)
        .await;

    let client = build_gemini_client(&mock_server.uri());
    let catalog = client.catalog(&small_config(5));

    assert!(catalog.try_list("home-decor").await.unwrap_err().is_malformed());
    let listings = catalog.list("home-decor").await;
    assert_eq!(listings.len(), 5);
    assert!(listings[0].id.starts_with("fallback-"));
}

#[tokio::test]
async fn test_analyze_sends_inline_image() {
    let mock_server = MockServer::start().await;
    let analysis = json!({
        "name": "Velvet Armchair",
        "category": "Furniture",
        "description": "Mid-century lounge chair in emerald velvet.",
        "suggestedPrice": 640
    });
    Mock::given(method("POST"))
        .and(path(TEXT_MODEL_PATH))
        .and(body_string_contains(
            r#"{"inlineData":{"mimeType":"image/png","data":"iVBORw=="}}"#,
        ))
        .and(body_string_contains("suggested market price in USD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_candidate(&analysis.to_string())))
        .mount(&mock_server)
        .await;

    let client = build_gemini_client(&mock_server.uri());
    let catalog = client.catalog(&small_config(8));
    let result = catalog.analyze(&product_photo()).await.unwrap();

    assert_eq!(result.name, "Velvet Armchair");
    assert_eq!(result.suggested_price, 640.0);
}

#[tokio::test]
async fn test_analyze_rejects_partial_result() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TEXT_MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_candidate(
            "{\"name\":\"Thing\",\"category\":\"\",\"description\":\"x\",\"suggestedPrice\":0}",
        )))
        .mount(&mock_server)
        .await;

    let client = build_gemini_client(&mock_server.uri());
    let err = client
        .catalog(&small_config(8))
        .analyze(&product_photo())
        .await
        .unwrap_err();
    assert!(err.is_malformed());
}

#[tokio::test]
async fn test_analyze_propagates_api_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TEXT_MODEL_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad image"))
        .mount(&mock_server)
        .await;

    let client = build_gemini_client(&mock_server.uri());
    let err = client
        .catalog(&small_config(8))
        .analyze(&product_photo())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ApiError { status: 400, ref message } if message == "bad image"));
}

#[tokio::test]
async fn test_synthesize_scene_returns_first_image() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(IMAGE_MODEL_PATH))
        .and(body_partial_json(json!({
            "generationConfig": {"responseModalities": ["TEXT", "IMAGE"]}
        })))
        .and(body_string_contains("into this environment: misty mountain road"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "Here you go"},
                    {"inlineData": {"mimeType": "image/png", "data": ""}},
                    {"inlineData": {"mimeType": "image/jpeg", "data": "/9j/"}}
                ]},
                "finishReason": "STOP"
            }]
        })))
        .mount(&mock_server)
        .await;

    let client = build_gemini_client(&mock_server.uri());
    let image = client
        .catalog(&small_config(8))
        .synthesize_scene(" misty mountain road ", &product_photo())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(image.mime_type(), "image/jpeg");
    assert_eq!(image.data(), &[0xffu8, 0xd8, 0xff][..]);
}

#[tokio::test]
async fn test_synthesize_scene_without_image_is_sentinel() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(IMAGE_MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "I can't do that."}]},
                "finishReason": "NO_IMAGE"
            }]
        })))
        .mount(&mock_server)
        .await;

    let client = build_gemini_client(&mock_server.uri());
    let catalog = client.catalog(&small_config(8));
    let result = catalog
        .synthesize_scene("volcano", &product_photo())
        .await
        .unwrap();
    assert!(result.is_none());

    let err = catalog
        .synthesize_scene("   ", &product_photo())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));
}

#[tokio::test]
async fn test_fetch_reference_image_uses_content_type() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/d/car-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg; charset=binary")
                .set_body_bytes(vec![0xff, 0xd8, 0xff, 0xe0]),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/d/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = build_gemini_client(&mock_server.uri());
    let image = client
        .fetch_image(&format!("{}/d/car-1", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(image.mime_type(), "image/jpeg");
    assert_eq!(image.data().len(), 4);

    let err = client
        .fetch_image(&format!("{}/d/missing", mock_server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ApiError { status: 404, .. }));
}

#[tokio::test]
async fn test_reference_fetch_omits_api_key() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/d/car-2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(vec![0x89, 0x50, 0x4e, 0x47]),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = build_gemini_client(&mock_server.uri());
    client
        .fetch_image(&format!("{}/d/car-2", mock_server.uri()))
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("x-goog-api-key").is_none());
}
