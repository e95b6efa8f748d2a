//! Player option parsing tests

use castplay::error::PlayerError;
use castplay::PlayerOptions;
use serde_json::{json, Map, Value};

fn map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

#[test]
fn embedding_style_keys_are_accepted() {
    let options = PlayerOptions::from_json_map(map(json!({
        "startAt": 12.5,
        "autoPlay": true,
        "loop": true,
        "fontSize": "big",
        "authorImgURL": "https://example.com/a.png",
        "speed": 2
    })))
    .unwrap();
    assert_eq!(options.start_at, 12.5);
    assert!(options.auto_play);
    assert!(options.loop_playback);
    assert_eq!(options.font_size, "big");
    assert_eq!(options.author_img_url.as_deref(), Some("https://example.com/a.png"));
    assert_eq!(options.speed, 2.0);
}

#[test]
fn negative_start_is_rejected() {
    let result = PlayerOptions::from_json_map(map(json!({ "start_at": -1.0 })));
    assert!(matches!(result, Err(PlayerError::InvalidOption { .. })));
}

#[test]
fn zero_width_is_rejected() {
    let options = PlayerOptions {
        width: Some(0),
        ..PlayerOptions::default()
    };
    assert!(options.validate().is_err());
}

#[test]
fn defaults_are_valid() {
    let options = PlayerOptions::default();
    assert!(options.validate().is_ok());
    assert_eq!(options.speed, 1.0);
    assert!(!options.auto_play);
    assert_eq!(options.idle_quiet, 3.0);
}
