use criterion::{Criterion, criterion_group, criterion_main};
use ward_reconstruction::{
    BoundarySegmentDescription, ExtractionConfidence, MatcherConfig, SegmentReferenceType,
    SourceDocument, SourceDocumentType, StreetNetwork, StreetSegment, WardLegalDescription,
    match_ward_description,
};

fn synthetic_network() -> StreetNetwork {
    let mut segments = Vec::new();
    for cluster in 0..10 {
        let base_lat = cluster as f64 * 0.05;
        segments.push(StreetSegment {
            id: format!("watson-{cluster}-a"),
            name: "Watson Road".to_string(),
            alt_names: Vec::new(),
            street_type: Some("road".to_string()),
            highway_class: Some("residential".to_string()),
            geometry: vec![(-123.0, base_lat), (-123.0, base_lat + 0.001)],
        });
        segments.push(StreetSegment {
            id: format!("watson-{cluster}-b"),
            name: "Watson Road".to_string(),
            alt_names: Vec::new(),
            street_type: Some("road".to_string()),
            highway_class: Some("residential".to_string()),
            geometry: vec![(-123.0, base_lat + 0.001), (-123.0, base_lat + 0.002)],
        });
        segments.push(StreetSegment {
            id: format!("watson-{cluster}-c"),
            name: "Watson Road".to_string(),
            alt_names: Vec::new(),
            street_type: Some("road".to_string()),
            highway_class: Some("residential".to_string()),
            geometry: vec![(-123.0, base_lat + 0.002), (-123.0, base_lat + 0.003)],
        });
    }
    segments.push(StreetSegment {
        id: "north".to_string(),
        name: "North Street".to_string(),
        alt_names: Vec::new(),
        street_type: Some("street".to_string()),
        highway_class: None,
        geometry: vec![(-123.0, 0.003), (-122.99, 0.003)],
    });
    segments.push(StreetSegment {
        id: "east".to_string(),
        name: "East Street".to_string(),
        alt_names: Vec::new(),
        street_type: Some("street".to_string()),
        highway_class: None,
        geometry: vec![(-122.99, 0.003), (-122.99, 0.0)],
    });
    segments.push(StreetSegment {
        id: "south".to_string(),
        name: "South Street".to_string(),
        alt_names: Vec::new(),
        street_type: Some("street".to_string()),
        highway_class: None,
        geometry: vec![(-122.99, 0.0), (-123.0, 0.0)],
    });
    StreetNetwork::build(segments)
}

fn synthetic_ward() -> WardLegalDescription {
    let segment = |index, feature_name: &str| BoundarySegmentDescription {
        index,
        reference_type: SegmentReferenceType::StreetCenterline,
        feature_name: feature_name.to_string(),
        direction: None,
        from: None,
        to: None,
        raw_text: format!("thence along {feature_name}"),
        parse_confidence: ExtractionConfidence::High,
    };
    WardLegalDescription {
        city_fips: "4129050".to_string(),
        city_name: "Grants Pass".to_string(),
        state: "OR".to_string(),
        ward_id: "3".to_string(),
        ward_name: "Ward 3".to_string(),
        segments: vec![
            segment(0, "North Street"),
            segment(1, "East Street"),
            segment(2, "South Street"),
            segment(3, "Watson Road"),
        ],
        source: SourceDocument::new(
            SourceDocumentType::OrdinanceText,
            "https://example.gov/ward3".to_string(),
            "Ward 3 Ordinance".to_string(),
        ),
        population: None,
        notes: None,
    }
}

pub fn match_ward(c: &mut Criterion) {
    let network = synthetic_network();
    let ward = synthetic_ward();
    let config = MatcherConfig::default();
    c.bench_function("match ward among 10 street-name clusters", |b| {
        b.iter(|| match_ward_description(&ward, &network, &config))
    });
}

criterion_group!(benches, match_ward);
criterion_main!(benches);
