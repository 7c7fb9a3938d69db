//! Unit tests for sw-fence.

// ── Repair ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod repair {
    use proptest::prelude::*;
    use serde_json::{Value, json};

    use crate::repair_geometry_text;

    #[test]
    fn quotes_keys_and_identifiers() {
        let fixed = repair_geometry_text("{type: Polygon, coordinates: [[[0, 0], [1, 0], [1, 1]]]}");
        assert_eq!(fixed, r#"{"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1]]]}"#);
    }

    #[test]
    fn integers_stay_numeric() {
        let v: Value = serde_json::from_str(&repair_geometry_text("{a: 4506779, b: [-3, 7]}")).unwrap();
        assert_eq!(v, json!({"a": 4506779, "b": [-3, 7]}));
    }

    #[test]
    fn decimal_fractions_survive() {
        let v: Value = serde_json::from_str(&repair_geometry_text("{x: 12.5}")).unwrap();
        assert_eq!(v["x"].as_f64(), Some(12.5));
    }

    #[test]
    fn exponent_literals_become_strings() {
        let fixed = repair_geometry_text("[1e5, 2.5E3]");
        assert_eq!(fixed, r#"["1e5", 2."5E3"]"#);
        let v: Result<Value, _> = serde_json::from_str(&repair_geometry_text("[1e5]"));
        assert_eq!(v.unwrap(), json!(["1e5"]));
    }

    #[test]
    fn prequoted_strings_untouched() {
        let input = r#"{"type": "Polygon", "name": "123", "esc": "a \"b\" c", id: 7}"#;
        let fixed = repair_geometry_text(input);
        assert_eq!(fixed, r#"{"type": "Polygon", "name": "123", "esc": "a \"b\" c", "id": 7}"#);
    }

    #[test]
    fn unicode_words_are_quoted() {
        assert_eq!(repair_geometry_text("{zaun: grün}"), r#"{"zaun": "grün"}"#);
    }

    #[test]
    fn already_valid_json_is_unchanged() {
        let input = r#"{"type":"Polygon","coordinates":[[[0,0],[2,0],[2,2],[0,0]]]}"#;
        assert_eq!(repair_geometry_text(input), input);
    }

    proptest! {
        #[test]
        fn quoted_content_is_preserved(body in "[a-zA-Z0-9 _.,:{}\\[\\]-]{0,24}") {
            let input = format!(r#"{{key: "{body}", n: 3}}"#);
            let fixed = repair_geometry_text(&input);
            let quoted = format!("\"{body}\"");
            prop_assert!(fixed.contains(&quoted));
        }

        #[test]
        fn bare_tokens_repair_to_json(
            keys in proptest::collection::vec("[a-z_][a-z0-9_]{0,8}", 1..5),
            value in 0u32..1_000_000,
            word in "[a-z][a-z_]{0,6}",
        ) {
            let body: Vec<String> = keys
                .iter()
                .enumerate()
                .map(|(i, k)| format!("{k}{i}: [{value}, {word}]"))
                .collect();
            let input = format!("{{{}}}", body.join(", "));
            let parsed: Value = serde_json::from_str(&repair_geometry_text(&input)).unwrap();
            for (i, k) in keys.iter().enumerate() {
                let entry = &parsed[format!("{k}{i}")];
                prop_assert_eq!(entry[0].as_u64(), Some(u64::from(value)));
                prop_assert_eq!(entry[1].as_str(), Some(word.as_str()));
            }
        }
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod geometry {
    use crate::{FenceError, parse_fence};

    #[test]
    fn bare_polygon() {
        let p = parse_fence("{type: Polygon, coordinates: [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]]}").unwrap();
        assert_eq!(p.exterior().0.len(), 5);
        assert_eq!(p.exterior().0[1].x, 10.0);
    }

    #[test]
    fn polygon_of_point_features() {
        let text = "{type: Polygon, coordinates: [\
            {type: Feature, geometry: {type: Point, coordinates: [0, 0]}},\
            {type: Feature, geometry: {type: Point, coordinates: [4, 0]}},\
            {type: Feature, geometry: {type: Point, coordinates: [4, 3]}}]}";
        let p = parse_fence(text).unwrap();
        // geo closes the ring.
        assert_eq!(p.exterior().0.len(), 4);
        assert_eq!(p.exterior().0[2].y, 3.0);
    }

    #[test]
    fn feature_envelope() {
        let text = "{type: Feature, properties: {}, geometry: {type: Polygon, coordinates: [[[0, 0], [1, 0], [1, 1]]]}}";
        assert!(parse_fence(text).is_ok());
    }

    #[test]
    fn feature_collection_prefers_polygon() {
        let text = "{type: FeatureCollection, features: [\
            {type: Feature, geometry: {type: Point, coordinates: [9, 9]}},\
            {type: Feature, geometry: {type: Polygon, coordinates: [[[0, 0], [2, 0], [2, 2]]]}}]}";
        let p = parse_fence(text).unwrap();
        assert_eq!(p.exterior().0[1].x, 2.0);
    }

    #[test]
    fn feature_collection_of_points() {
        let text = "{type: FeatureCollection, features: [\
            {type: Feature, geometry: {type: Point, coordinates: [0, 0]}},\
            {type: Feature, geometry: {type: Point, coordinates: [5, 0]}},\
            {type: Feature, geometry: {type: Point, coordinates: [5, 5]}}]}";
        assert!(parse_fence(text).is_ok());
    }

    #[test]
    fn exponent_coordinates_are_rejected() {
        let err = parse_fence("{type: Polygon, coordinates: [[[1e5, 0], [2, 0], [2, 2]]]}").unwrap_err();
        assert!(matches!(err, FenceError::MalformedGeometry(_)), "{err}");
    }

    #[test]
    fn degenerate_ring_is_rejected() {
        let err = parse_fence("{type: Polygon, coordinates: [[[0, 0], [1, 1], [0, 0]]]}").unwrap_err();
        assert!(matches!(err, FenceError::MalformedGeometry(_)));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = parse_fence("{type: LineString, coordinates: [[0, 0], [1, 1]]}").unwrap_err();
        assert!(matches!(err, FenceError::MalformedGeometry(_)));
    }

    #[test]
    fn interior_rings_are_ignored() {
        let text = "{type: Polygon, coordinates: [\
            [[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],\
            [[4, 4], [6, 4], [6, 6], [4, 6], [4, 4]]]}";
        let p = parse_fence(text).unwrap();
        assert!(p.interiors().is_empty());
        assert_eq!(p.exterior().0[2].x, 10.0);
    }

    #[test]
    fn unparseable_text_is_json_error() {
        let err = parse_fence("{type: Polygon, coordinates: [[[0, 0]").unwrap_err();
        assert!(matches!(err, FenceError::Json(_)));
    }
}

// ── Normalisation & classification ────────────────────────────────────────────

#[cfg(test)]
mod normalize {
    use geo::{LineString, Polygon};
    use sw_core::{BoundingBox, CellCoord, GridSpec};

    use crate::{FenceClassifier, INSIDE_ZONE, OUTSIDE_ZONE, normalize_fence, parse_fence};

    fn grid() -> GridSpec {
        GridSpec::new(BoundingBox::new(0.0, 0.0, 20_000.0, 20_000.0).unwrap(), 10, 10).unwrap()
    }

    fn left_half() -> Polygon<f64> {
        parse_fence(
            "{type: Polygon, coordinates: [[[-1000, -1000], [10000, -1000], [10000, 21000], [-1000, 21000], [-1000, -1000]]]}",
        )
        .unwrap()
    }

    #[test]
    fn vertices_use_axis_flip() {
        let cells = normalize_fence(&left_half(), &grid());
        let xy: Vec<(f64, f64)> = cells.exterior().coords().map(|c| (c.x, c.y)).collect();
        assert_eq!(xy, vec![(-1.0, 10.0), (5.0, 10.0), (5.0, -1.0), (-1.0, -1.0), (-1.0, 10.0)]);
    }

    #[test]
    fn vertex_order_is_preserved() {
        let poly = Polygon::new(LineString::from(vec![(0.0, 0.0), (0.0, 8_000.0), (8_000.0, 0.0)]), vec![]);
        let cells = normalize_fence(&poly, &grid());
        let xy: Vec<(f64, f64)> = cells.exterior().coords().map(|c| (c.x, c.y)).collect();
        assert_eq!(&xy[..3], &[(0.0, 10.0), (0.0, 6.0), (4.0, 10.0)]);
    }

    #[test]
    fn left_half_classification() {
        let classifier = FenceClassifier::new(normalize_fence(&left_half(), &grid()));
        for y in 0..10 {
            for x in 0..10 {
                let expected = if x < 5 { INSIDE_ZONE } else { OUTSIDE_ZONE };
                assert_eq!(classifier.zone(CellCoord::new(x, y)), expected, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn holes_do_not_carve_the_inside_zone() {
        let exterior = LineString::from(vec![
            (-1_000.0, -1_000.0),
            (21_000.0, -1_000.0),
            (21_000.0, 21_000.0),
            (-1_000.0, 21_000.0),
            (-1_000.0, -1_000.0),
        ]);
        let hole = LineString::from(vec![
            (6_000.0, 6_000.0),
            (14_000.0, 6_000.0),
            (14_000.0, 14_000.0),
            (6_000.0, 14_000.0),
            (6_000.0, 6_000.0),
        ]);
        let cells = normalize_fence(&Polygon::new(exterior, vec![hole]), &grid());
        assert!(cells.interiors().is_empty());
        let classifier = FenceClassifier::new(cells);
        assert_eq!(classifier.zone(CellCoord::new(5, 5)), INSIDE_ZONE);
        assert_eq!(classifier.zone(CellCoord::new(0, 0)), INSIDE_ZONE);
    }

    #[test]
    fn boundary_cells_are_outside() {
        let poly = Polygon::new(LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]), vec![]);
        let classifier = FenceClassifier::new(poly);
        assert_eq!(classifier.zone(CellCoord::new(2, 2)), INSIDE_ZONE);
        assert_eq!(classifier.zone(CellCoord::new(0, 2)), OUTSIDE_ZONE);
        assert_eq!(classifier.zone(CellCoord::new(4, 4)), OUTSIDE_ZONE);
    }
}
