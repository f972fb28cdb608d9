//! End-to-end tests of the profile facade.

use profile_diversity::diversity::{DiversityEngine, EngineConfig};
use profile_diversity::profile::{
    compute_diversity, compute_diversity_with, compute_user_diversity, AgentProfile,
    DiversityRequest, DiversityResponse, UserDiversityRequest, UserProfile,
};

const TOLERANCE: f64 = 1e-9;

fn xyz(id: &str, value: f64) -> AgentProfile {
    AgentProfile::new(id)
        .with_quantitative("x", value)
        .with_quantitative("y", value)
        .with_quantitative("z", value)
}

#[test]
fn test_opposed_quantitative_agents_normalize_to_half() {
    let request = DiversityRequest {
        agents: vec![xyz("1", 1.0), xyz("2", 0.0)],
        quantitative_attributes: vec!["x".to_string(), "y".to_string(), "z".to_string()],
        ..Default::default()
    };

    let value = compute_diversity(&request);
    assert!((value - 0.5).abs() < TOLERANCE, "got {}", value);
}

#[test]
fn test_json_request_end_to_end() {
    let json = r#"{
        "agents": [
            {"id": "1", "quantitativeAttributes": {"introvert": 1.0}, "qualitativeAttributes": {"gender": "M"}},
            {"id": "2", "quantitativeAttributes": {"introvert": 0.0}, "qualitativeAttributes": {"gender": "F"}}
        ],
        "qualitativeAttributes": {"gender": ["M", "F"]},
        "quantitativeAttributes": ["introvert"]
    }"#;

    let request: DiversityRequest = serde_json::from_str(json).unwrap();
    let response = DiversityResponse {
        value: compute_diversity(&request),
    };

    // (0.5 + 1.0) / 2
    assert!((response.value - 0.75).abs() < TOLERANCE, "got {}", response.value);
}

#[test]
fn test_mixed_request_stays_in_unit_interval() {
    let genders = ["M", "F", "O", "F", "M", "M"];
    let request = DiversityRequest {
        agents: genders
            .iter()
            .enumerate()
            .map(|(i, g)| {
                AgentProfile::new(i.to_string())
                    .with_qualitative("gender", *g)
                    .with_quantitative("age", i as f64 / 10.0)
            })
            .collect(),
        qualitative_attributes: [(
            "gender".to_string(),
            vec!["M".to_string(), "F".to_string(), "O".to_string()],
        )]
        .into_iter()
        .collect(),
        quantitative_attributes: vec!["age".to_string()],
    };

    let value = compute_diversity(&request);
    assert!(value > 0.0 && value <= 1.0, "got {}", value);
}

#[test]
fn test_invalid_requests_answer_zero() {
    let out_of_range = DiversityRequest {
        agents: vec![xyz("1", 2.0), xyz("2", 0.0)],
        quantitative_attributes: vec!["x".to_string()],
        ..Default::default()
    };
    assert_eq!(compute_diversity(&out_of_range), 0.0);

    let label_outside_domain = DiversityRequest {
        agents: vec![
            AgentProfile::new("1").with_qualitative("gender", "M"),
            AgentProfile::new("2").with_qualitative("gender", "X"),
        ],
        qualitative_attributes: [("gender".to_string(), vec!["M".to_string(), "F".to_string()])]
            .into_iter()
            .collect(),
        ..Default::default()
    };
    assert_eq!(compute_diversity(&label_outside_domain), 0.0);

    assert_eq!(compute_diversity(&DiversityRequest::default()), 0.0);
}

#[test]
fn test_strict_engine_rejects_degenerate_domain() {
    let request = DiversityRequest {
        agents: vec![
            AgentProfile::new("1").with_qualitative("team", "blue"),
            AgentProfile::new("2").with_qualitative("team", "blue"),
        ],
        qualitative_attributes: [("team".to_string(), vec!["blue".to_string()])]
            .into_iter()
            .collect(),
        ..Default::default()
    };

    let lenient = DiversityEngine::default();
    let strict = DiversityEngine::new(EngineConfig::new().with_strict_domains(true));
    assert_eq!(compute_diversity_with(&lenient, &request), 0.0);
    assert_eq!(compute_diversity_with(&strict, &request), 0.0);
}

#[test]
fn test_user_variant() {
    let json = r#"{
        "users": [
            {"id": "a", "attributes": {"openness": 1.0, "age": 0.2}},
            {"id": "b", "attributes": {"openness": 0.0, "age": 0.2}}
        ]
    }"#;
    let request: UserDiversityRequest = serde_json::from_str(json).unwrap();

    let value = compute_user_diversity(&request);
    assert!((value - 0.25).abs() < TOLERANCE, "got {}", value);

    let ragged = UserDiversityRequest {
        users: vec![
            UserProfile::new("a").with_attribute("openness", 1.0),
            UserProfile::new("b").with_attribute("age", 0.5),
        ],
    };
    assert_eq!(compute_user_diversity(&ragged), 0.0);
}
