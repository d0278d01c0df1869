#![allow(dead_code)]

use serde_json::{json, Value};
use trending_pulse::{Client, ShowcaseConfig};

pub const TEXT_MODEL_PATH: &str = "/v1beta/models/gemini-3-flash-preview:generateContent";
pub const IMAGE_MODEL_PATH: &str = "/v1beta/models/gemini-2.5-flash-image:generateContent";

pub fn build_gemini_client(base_url: &str) -> Client {
    Client::builder()
        .api_key("test-key")
        .base_url(base_url)
        .build()
        .unwrap()
}

pub fn small_config(listing_count: usize) -> ShowcaseConfig {
    ShowcaseConfig {
        listing_count,
        upload_delay: std::time::Duration::ZERO,
        ..Default::default()
    }
}

/// A `generateContent` body whose single candidate carries `text`.
pub fn text_candidate(text: &str) -> Value {
    json!({
        "candidates": [
            {"content": {"role": "model", "parts": [{"text": text}]}}
        ]
    })
}

pub fn listing(index: usize, category: &str) -> Value {
    json!({
        "id": format!("gen-{index}"),
        "name": format!("Trending Item {index}"),
        "price": 49.99 + index as f64,
        "category": category,
        "description": "Crafted for everyday use.",
        "imageUrl": format!("https://images.unsplash.com/photo-{index}?product")
    })
}

pub fn listings_body(count: usize, category: &str) -> Value {
    let items: Vec<Value> = (0..count).map(|index| listing(index, category)).collect();
    text_candidate(&Value::Array(items).to_string())
}
