use pathlay::{CloneKind, Error, NodeShape, RoutingMode, StyleSheet};

#[test]
fn json_overrides_only_the_fields_it_names() {
    let sheet = StyleSheet::from_json_str(
        r#"{
            "spacing": { "node_spacing": 80.0 },
            "routing": "Avoid",
            "nodes": { "Gene": { "shape": { "width": 30.0, "height": 10.0 } } }
        }"#,
    )
    .unwrap();

    let defaults = StyleSheet::default();
    assert_eq!(sheet.spacing.node_spacing, 80.0);
    assert_eq!(sheet.spacing.ring_spacing, defaults.spacing.ring_spacing);
    assert_eq!(sheet.container, defaults.container);
    assert_eq!(sheet.routing, RoutingMode::Avoid);

    let gene = sheet.node_style("Gene");
    assert_eq!(gene.shape, NodeShape::new(30.0, 10.0, 0.0));
    assert!(!gene.directional);
    // Listing `nodes` replaces the built-in entries.
    assert_eq!(sheet.node_style("Reaction"), &sheet.default_node);
}

#[test]
fn a_sheet_survives_serialization() {
    let sheet = StyleSheet::default();
    let text = sheet.to_json_string().unwrap();
    assert_eq!(StyleSheet::from_json_str(&text).unwrap(), sheet);
}

#[test]
fn malformed_json_is_a_style_sheet_error() {
    let err = StyleSheet::from_json_str("{ \"spacing\": ").unwrap_err();
    assert!(matches!(err, Error::StyleSheet(_)));
    assert!(err.to_string().starts_with("invalid style sheet"));
}

#[test]
fn node_styles_fall_back_case_insensitively_then_to_the_default() {
    let sheet = StyleSheet::default();
    assert!(sheet.is_directional("Reaction"));
    assert!(sheet.is_directional("reaction"));
    assert!(!sheet.is_directional("Species"));
    assert_eq!(sheet.node_style("Complex"), &sheet.default_node);
}

#[test]
fn clone_kinds_pick_smaller_shapes() {
    let sheet = StyleSheet::default();
    let full = sheet.node_shape("Species", CloneKind::NotClone);
    let clone = sheet.node_shape("Species", CloneKind::IsClone);
    let midget = sheet.node_shape("Species", CloneKind::IsMidget);
    assert!(clone.width < full.width);
    assert!(midget.width < clone.width);

    // Reactions have no clone shapes and keep their size.
    let reaction = sheet.node_shape("Reaction", CloneKind::NotClone);
    assert_eq!(sheet.node_shape("Reaction", CloneKind::IsMidget), reaction);
}

#[test]
fn label_size_counts_display_columns() {
    let sheet = StyleSheet::default();
    assert_eq!(sheet.label_size(""), (0.0, 0.0));
    assert_eq!(sheet.label_size("abc"), (21.0, 14.0));
    assert_eq!(sheet.label_size("日本"), (28.0, 14.0));
}
