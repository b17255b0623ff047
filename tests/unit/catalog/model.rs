use super::*;

#[test]
fn demo_shape_keeps_document_order_and_maps_fields() {
    let cat = Catalog::from_json_str(
        r#"{
            "sarah-chen": {
                "images": [
                    {"id": "sarah_house_1", "label": "House Exterior", "category": "house", "desc": "Modern suburban house, sunny day"}
                ],
                "voice": [{"id": "sarah_voice_1", "duration": 8}]
            },
            "alex-thompson": {
                "images": [{"id": "alex_gym", "label": "Gym Selfie", "category": "gym", "desc": "Workout clothes"}]
            }
        }"#,
    )
    .unwrap();

    assert_eq!(cat.chats.len(), 2);
    assert_eq!(cat.chats[0].chat_id, "sarah-chen");
    assert_eq!(cat.chats[1].chat_id, "alex-thompson");
    assert_eq!(cat.len(), 3);

    let all: Vec<_> = cat.requests().collect();
    assert_eq!(all[0].0, "sarah-chen");
    assert_eq!(all[0].1.kind, MediaKind::Image);
    assert_eq!(all[0].1.description, "Modern suburban house, sunny day");
    assert_eq!(all[1].1.kind, MediaKind::Voice);
    assert_eq!(all[1].1.duration_seconds, Some(8));
    assert_eq!(all[2].1.id, "alex_gym");
}

#[test]
fn list_and_wrapped_shapes_parse() {
    let list = r#"[
        {"chat_id": "c1", "media": [
            {"id": "a1", "kind": "image", "category": "food", "label": "Lunch", "description": "Tacos"},
            {"id": "v1", "kind": "voice", "duration_seconds": 3}
        ]}
    ]"#;
    let cat = Catalog::from_json_str(list).unwrap();
    assert_eq!(cat.len(), 2);
    assert_eq!(cat.chats[0].media[1].duration_seconds, Some(3));

    let wrapped = format!(r#"{{"chats": {list}}}"#);
    assert_eq!(Catalog::from_json_str(&wrapped).unwrap(), cat);
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = Catalog::from_json_str("[{").unwrap_err();
    assert!(matches!(err, MediaError::Serde(_)));

    let err = Catalog::from_json_str(r#"{"c1": {"images": [{"label": "no id"}]}}"#).unwrap_err();
    assert!(err.to_string().contains("c1"));
}

#[test]
fn duplicate_ids_are_rejected_across_chats_and_kinds() {
    let cat = Catalog::new(vec![
        ChatMedia::new("c1", vec![MediaRequest::image("x", "food", "A", "B")]),
        ChatMedia::new("c2", vec![MediaRequest::voice("x", 2)]),
    ]);
    let err = cat.validate().unwrap_err();
    assert!(matches!(err, MediaError::DuplicateRequestId(ref id) if id == "x"));
}

#[test]
fn unsafe_ids_are_rejected() {
    for bad in ["", "  ", "../escape", "a/b", "a\\b", ".hidden", "c:drive", "nul\0"] {
        let cat = Catalog::new(vec![ChatMedia::new(
            "c",
            vec![MediaRequest::image(bad, "food", "", "")],
        )]);
        let err = cat.validate().unwrap_err();
        assert!(matches!(err, MediaError::Validation(_)), "{bad:?}");
    }
    validate_id("sarah_house_1").unwrap();
    validate_id("listing-2 exterior").unwrap();
}

#[test]
fn empty_catalog_is_valid() {
    let cat = Catalog::default();
    assert!(cat.is_empty());
    cat.validate().unwrap();
}

#[test]
fn list_shape_errors_name_the_bad_field() {
    let err = Catalog::from_json_str(r#"[{"chat_id": "c1", "media": [{"id": "a1"}]}]"#)
        .unwrap_err()
        .to_string();
    assert!(err.contains("kind"), "{err}");
    assert!(!err.contains("untagged"), "{err}");

    let err = Catalog::from_json_str(r#"{"chats": [{"media": []}]}"#)
        .unwrap_err()
        .to_string();
    assert!(err.contains("chat_id"), "{err}");

    assert!(Catalog::from_json_str("42").is_err());
}

#[test]
fn ids_differing_only_in_case_are_duplicates() {
    let cat = Catalog::new(vec![ChatMedia::new(
        "c1",
        vec![
            MediaRequest::image("A1", "food", "", ""),
            MediaRequest::image("a1", "food", "", ""),
        ],
    )]);
    let err = cat.validate().unwrap_err();
    assert!(matches!(err, MediaError::DuplicateRequestId(ref id) if id == "a1"));
}
