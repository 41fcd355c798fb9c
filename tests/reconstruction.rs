//! End-to-end scenarios (S1-S7) and cross-stage property checks. Unit tests for each stage's own
//! internals live alongside that stage's module; these exercise the pipeline the way a caller would.
use ward_reconstruction::{
    BoundarySegmentDescription, CardinalDirection, CityValidationResult, ExtractionConfidence,
    GoldenVector, GoldenVectorConfig, MatchQuality, MatcherConfig, PolygonBuilderConfig,
    SegmentReferenceType, SourceDocument, SourceDocumentType, StreetNetwork, StreetSegment,
    WardLegalDescription, WardMetrics, WardValidationResult, build_polygon_from_matches,
    detect_regressions, match_segment, match_ward_description, validate_city_against_golden,
};
use std::collections::HashMap;

fn trace_init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn seg(name: &str, geometry: Vec<(f64, f64)>) -> StreetSegment {
    StreetSegment {
        id: name.to_string(),
        name: name.to_string(),
        alt_names: Vec::new(),
        street_type: None,
        highway_class: None,
        geometry,
    }
}

fn street_centerline(feature_name: &str, direction: Option<CardinalDirection>) -> BoundarySegmentDescription {
    BoundarySegmentDescription {
        index: 0,
        reference_type: SegmentReferenceType::StreetCenterline,
        feature_name: feature_name.to_string(),
        direction,
        from: None,
        to: None,
        raw_text: format!("thence along {feature_name}"),
        parse_confidence: ExtractionConfidence::High,
    }
}

fn intersection(street1: &str, street2: &str) -> BoundarySegmentDescription {
    BoundarySegmentDescription {
        index: 0,
        reference_type: SegmentReferenceType::Coordinate,
        feature_name: BoundarySegmentDescription::intersection_feature_name(street1, street2),
        direction: None,
        from: None,
        to: None,
        raw_text: format!("STARTING_POINT:Beginning at the intersection of {street1} and {street2}"),
        parse_confidence: ExtractionConfidence::High,
    }
}

#[test]
fn s1_perpendicular_intersection() {
    trace_init();
    let network = StreetNetwork::build(vec![
        seg("Main Street", vec![(-95.0, 30.0), (-94.99, 30.0)]),
        seg("Oak Avenue", vec![(-94.995, 29.995), (-94.995, 30.005)]),
    ]);
    let config = MatcherConfig::default();
    let result = match_segment(
        &intersection("Main Street", "Oak Avenue"),
        &network,
        None,
        &config,
    );
    assert_eq!(result.match_quality, MatchQuality::Exact);
    assert_eq!(result.coordinates.len(), 1);
    let (lon, lat) = result.coordinates[0];
    assert!((lon - -94.995).abs() < 1e-3);
    assert!((lat - 30.0).abs() < 1e-3);
}

#[test]
fn s2_osm_near_miss() {
    trace_init();
    let network = StreetNetwork::build(vec![
        seg("Main Street", vec![(-95.0, 30.0), (-94.99, 30.0)]),
        seg("Oak Avenue", vec![(-94.995, 29.99), (-94.995, 29.9995)]),
    ]);
    let config = MatcherConfig::default();
    let result = match_segment(
        &intersection("Main Street", "Oak Avenue"),
        &network,
        None,
        &config,
    );
    assert_ne!(result.match_quality, MatchQuality::Failed);
    let (lon, lat) = result.coordinates[0];
    assert!((lon - -94.995).abs() < 1e-4);
    assert!((lat - 29.99975).abs() < 1e-4);
}

#[test]
fn s3_contiguous_chain_among_ten_clusters() {
    trace_init();
    let mut segments = Vec::new();
    for cluster in 0..10 {
        let base_lat = cluster as f64 * 0.05;
        segments.push(seg(
            "Watson Road",
            vec![(-123.0, base_lat), (-123.0, base_lat + 0.001)],
        ));
        segments.push(seg(
            "Watson Road",
            vec![(-123.0, base_lat + 0.001), (-123.0, base_lat + 0.002)],
        ));
        segments.push(seg(
            "Watson Road",
            vec![(-123.0, base_lat + 0.002), (-123.0, base_lat + 0.003)],
        ));
    }
    for straggler in 0..9 {
        segments.push(seg(
            "Watson Road",
            vec![(-124.0, straggler as f64), (-124.0, straggler as f64 + 0.0005)],
        ));
    }
    let network = StreetNetwork::build(segments);

    let cluster3_base = 3.0 * 0.05;
    let reference = (-123.0, cluster3_base + 0.0005);
    let config = MatcherConfig::default();
    let result = match_segment(&street_centerline("Watson Road", None), &network, Some(reference), &config);

    assert_eq!(result.matched_segments.len(), 3);
    let start = result.coordinates[0];
    let dist = ward_reconstruction::geo_math::haversine_m(reference, start);
    assert!(dist < 300.0, "start {start:?} too far from reference, dist={dist}");
}

#[test]
fn s4_rectangular_ward() {
    trace_init();
    let matches = vec![
        ward_match(vec![(-95.0, 30.0), (-94.99, 30.0)]),
        ward_match(vec![(-94.99, 30.0), (-94.99, 30.01)]),
        ward_match(vec![(-94.99, 30.01), (-95.0, 30.01)]),
        ward_match(vec![(-95.0, 30.01), (-95.0, 30.0)]),
    ];
    let config = PolygonBuilderConfig::default();
    let result = build_polygon_from_matches(&matches, &config);
    assert!(result.success);
    let validation = result.validation.unwrap();
    assert!(validation.is_closed);
    assert!(validation.is_counter_clockwise);
    assert_eq!(validation.vertex_count, 5);
    assert!(validation.area_m2 > config.min_ring_area_m2);
}

#[test]
fn s5_gap_too_large_fails_build() {
    trace_init();
    let matches = vec![
        ward_match(vec![(0.0, 0.0), (0.0, 1.0)]),
        ward_match(vec![(10.0, 10.0), (10.0, 11.0)]),
    ];
    let config = PolygonBuilderConfig::default();
    let result = build_polygon_from_matches(&matches, &config);
    assert!(!result.success);
    assert!(result.reason.unwrap().contains("exceeds"));
}

#[test]
fn s6_golden_vector_self_check() {
    trace_init();
    let golden = three_ward_golden();
    let mut actual = HashMap::new();
    for feature in &golden.expected_polygons {
        let ward_id = GoldenVector::ward_id_of(feature).unwrap();
        actual.insert(ward_id, feature.clone());
    }
    let config = GoldenVectorConfig::default();
    let result = validate_city_against_golden(&actual, &golden, &config);
    assert!(result.passed);
    assert_eq!(result.passed_count, 3);
    assert!((result.average_iou - 1.0).abs() < 1e-6);
}

#[test]
fn s7_regression_detection() {
    trace_init();
    let previous = city_result("1", true, 0.95, 10.0);
    let current = city_result("1", true, 0.88, 10.0);
    let report = detect_regressions(&previous, &current);
    assert!(report.has_regressions());
    let drop = report
        .ward_regressions
        .iter()
        .find_map(|r| match &r.kind {
            ward_reconstruction::WardRegressionKind::IouDrop(d) => Some(*d),
            _ => None,
        })
        .expect("expected an IoU-drop regression");
    assert!((drop - 0.07).abs() < 1e-6);
}

#[test]
fn match_totality_every_input_produces_one_result() {
    trace_init();
    let network = StreetNetwork::build(vec![seg("Main Street", vec![(0.0, 0.0), (0.0, 1.0)])]);
    let config = MatcherConfig::default();

    let hit = match_segment(&street_centerline("Main Street", None), &network, Some((0.0, 0.0)), &config);
    assert_ne!(hit.match_quality, MatchQuality::Failed);
    assert!(!hit.coordinates.is_empty());

    let miss = match_segment(&street_centerline("Nonexistent Boulevard", None), &network, None, &config);
    assert_eq!(miss.match_quality, MatchQuality::Failed);
    assert!(miss.coordinates.is_empty());
    assert!(miss.matched_segments.is_empty());
}

#[test]
fn ward_assembly_closes_and_winds_ccw() {
    trace_init();
    let network = StreetNetwork::build(vec![
        seg("North Street", vec![(0.0, 1.0), (1.0, 1.0)]),
        seg("East Street", vec![(1.0, 1.0), (1.0, 0.0)]),
        seg("South Street", vec![(1.0, 0.0), (0.0, 0.0)]),
        seg("West Street", vec![(0.0, 0.0), (0.0, 1.0)]),
    ]);
    let ward = WardLegalDescription {
        city_fips: "4129050".to_string(),
        city_name: "Grants Pass".to_string(),
        state: "OR".to_string(),
        ward_id: "2".to_string(),
        ward_name: "Ward 2".to_string(),
        segments: vec![
            street_segment_at(0, "North Street"),
            street_segment_at(1, "East Street"),
            street_segment_at(2, "South Street"),
            street_segment_at(3, "West Street"),
        ],
        source: SourceDocument::new(
            SourceDocumentType::OrdinanceText,
            "https://example.gov/ward2".to_string(),
            "Ward 2 Ordinance".to_string(),
        ),
        population: None,
        notes: None,
    };
    let config = MatcherConfig::default();
    let result = match_ward_description(&ward, &network, &config);
    assert!(result.success);
    let polygon = result.polygon.unwrap();
    let geojson::Value::Polygon(rings) = polygon.geometry.unwrap().value else {
        panic!("expected a polygon geometry");
    };
    let ring = &rings[0];
    assert_eq!(ring.first(), ring.last());
}

fn ward_match(coordinates: Vec<(f64, f64)>) -> ward_reconstruction::SegmentMatchResult {
    ward_reconstruction::SegmentMatchResult {
        description: street_centerline("Main Street", None),
        matched_segments: vec![0],
        match_quality: MatchQuality::Exact,
        coordinates,
        diagnostics: ward_reconstruction::MatchDiagnostics::default(),
    }
}

fn street_segment_at(index: usize, feature_name: &str) -> BoundarySegmentDescription {
    BoundarySegmentDescription {
        index,
        reference_type: SegmentReferenceType::StreetCenterline,
        feature_name: feature_name.to_string(),
        direction: None,
        from: None,
        to: None,
        raw_text: format!("thence along {feature_name}"),
        parse_confidence: ExtractionConfidence::High,
    }
}

fn three_ward_golden() -> GoldenVector {
    fn square_feature(ward_id: &str, offset: f64) -> geojson::Feature {
        let ring = vec![
            vec![0.0 + offset, 0.0],
            vec![1.0 + offset, 0.0],
            vec![1.0 + offset, 1.0],
            vec![0.0 + offset, 1.0],
            vec![0.0 + offset, 0.0],
        ];
        let mut properties = serde_json::Map::new();
        properties.insert("ward_id".to_string(), serde_json::json!(ward_id));
        geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::Polygon(vec![ring]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }

    fn legal_description(ward_id: &str) -> WardLegalDescription {
        WardLegalDescription {
            city_fips: "4129050".to_string(),
            city_name: "Grants Pass".to_string(),
            state: "OR".to_string(),
            ward_id: ward_id.to_string(),
            ward_name: format!("Ward {ward_id}"),
            segments: vec![street_segment_at(0, "Main Street")],
            source: SourceDocument::new(
                SourceDocumentType::OrdinanceText,
                "https://example.gov".to_string(),
                "Ordinance".to_string(),
            ),
            population: None,
            notes: None,
        }
    }

    GoldenVector {
        city_fips: "4129050".to_string(),
        city_name: "Grants Pass".to_string(),
        state: "OR".to_string(),
        expected_ward_count: 3,
        legal_descriptions: vec![
            legal_description("1"),
            legal_description("2"),
            legal_description("3"),
        ],
        expected_polygons: vec![
            square_feature("1", 0.0),
            square_feature("2", 2.0),
            square_feature("3", 4.0),
        ],
        verified_at: "2025-01-01T00:00:00Z".to_string(),
        verification_source: "city GIS office".to_string(),
        notes: None,
        metadata: None,
    }
}

fn city_result(ward_id: &str, passed: bool, iou: f64, hausdorff: f64) -> CityValidationResult {
    let mut ward_results = HashMap::new();
    ward_results.insert(
        ward_id.to_string(),
        WardValidationResult {
            ward_id: ward_id.to_string(),
            passed,
            metrics: WardMetrics {
                iou,
                hausdorff_distance_m: hausdorff,
                ..Default::default()
            },
            failures: Vec::new(),
        },
    );
    CityValidationResult {
        ward_results,
        total: 1,
        passed_count: 1,
        average_iou: iou,
        max_hausdorff_distance_m: hausdorff,
        passed,
    }
}
