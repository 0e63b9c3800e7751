use std::collections::BTreeMap;
use std::hash::Hasher;

use chrono::{DateTime, TimeZone, Utc};
use fracture_game::{
    AestheticMode, BriefingCatalog, BriefingCompositor, BriefingPacket, Demographic, GameState,
    GlitchLevel, PaletteLevel, PartyStats, RngRecommendations, StrategicDirectionItem,
};
use twox_hash::XxHash64;

fn catalog() -> BriefingCatalog {
    BriefingCatalog::from_json(include_str!("../assets/data/briefing_catalog.json")).unwrap()
}

fn issued_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 10, 7, 45, 0).unwrap()
}

fn state(coherence: f64, control: f64, integrity: f64, moral: f64) -> GameState {
    GameState::default().with_party_stats(
        PartyStats::new()
            .with("narrative_coherence", coherence)
            .with("narrative_control", control)
            .with("faction_integrity", integrity)
            .with("moral_conditioning_index", moral),
    )
}

fn generate(state: &GameState, seed: u64) -> BriefingPacket {
    let mut recommendations = RngRecommendations::seeded(seed);
    BriefingCompositor::default().generate_briefing(
        state,
        &catalog(),
        &mut recommendations,
        issued_at(),
    )
}

fn packet_hash(value: &impl serde::Serialize) -> u64 {
    let bytes = serde_json::to_vec(value).unwrap();
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(&bytes);
    hasher.finish()
}

#[test]
fn packet_has_all_three_layers() {
    let state = state(0.5, 0.6, 0.4, 0.3)
        .with_demographic(
            Demographic::new("Older Voters")
                .with_id(1)
                .with_stat("loyalty", 0.6)
                .with_stat("dissonance", 0.2),
        )
        .with_demographic(
            Demographic::new("Youth & Students")
                .with_id(2)
                .with_stat("loyalty", 0.5)
                .with_stat("dissonance", 0.3),
        );

    let packet = generate(&state, 1);
    let value = serde_json::to_value(&packet).unwrap();
    for key in [
        "advisor_reports",
        "visual_manifest",
        "strategic_directions",
        "agenda_locked",
        "lock_message",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    for key in [
        "glitch_intensity",
        "fracture_state",
        "palette_corruption",
        "aesthetic_mode",
    ] {
        assert!(value["visual_manifest"].get(key).is_some(), "missing {key}");
    }

    assert!(packet.agenda_locked);
    let directions = &packet.strategic_directions;
    assert!(directions.selection_required);
    assert!((1..=3).contains(&directions.available_directions.len()));
    assert_eq!(directions.count, directions.available_directions.len());
}

#[test]
fn crisis_state_surfaces_fracturing_report() {
    let packet = generate(&state(0.3, 0.5, 0.5, 0.0), 1);
    let crisis = packet
        .advisor_reports
        .iter()
        .find(|report| report.priority.label() == "high")
        .unwrap();
    assert!(crisis.message.contains("fractur"));
    assert_eq!(crisis.priority_level, 1);
    assert_eq!(crisis.timestamp, "2025-02-10T07:45:00Z");
}

#[test]
fn high_moral_conditioning_selects_cynical_messages() {
    let packet = generate(&state(0.3, 0.4, 0.5, 0.8), 1);
    assert!(
        packet
            .advisor_reports
            .iter()
            .any(|report| report.message.contains("cynical") || report.message.contains("trained"))
    );
}

#[test]
fn reports_are_sorted_by_priority_level() {
    let packet = generate(&state(0.3, 0.4, 0.45, 0.8), 5);
    let levels: Vec<u8> = packet
        .advisor_reports
        .iter()
        .map(|report| report.priority_level)
        .collect();
    let mut sorted = levels.clone();
    sorted.sort_unstable();
    assert_eq!(levels, sorted);

    let advisors: Vec<&str> = packet
        .advisor_reports
        .iter()
        .map(|report| report.advisor.as_str())
        .collect();
    let mut unique = advisors.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), advisors.len(), "one report per advisor");
}

#[test]
fn narrative_collapse_drives_severe_glitch() {
    let packet = generate(&state(0.2, 0.1, 0.5, 0.0), 1);
    let glitch = packet.visual_manifest.glitch_intensity;
    assert_eq!(glitch.level, GlitchLevel::Severe);
    assert!((glitch.chromatic_aberration - 0.15).abs() < f64::EPSILON);
    assert!((glitch.ui_noise - 0.8).abs() < f64::EPSILON);
    assert_eq!(packet.visual_manifest.aesthetic_mode, AestheticMode::Fractured);
}

#[test]
fn moral_conditioning_drives_palette_corruption() {
    let packet = generate(&state(0.5, 0.5, 0.5, 0.8), 1);
    let palette = &packet.visual_manifest.palette_corruption;
    assert_eq!(palette.level, PaletteLevel::Severe);
    assert_eq!(palette.shift_direction, "sickly_yellow_green");
    assert!((palette.corruption_percentage - 0.8).abs() < f64::EPSILON);
    assert!(palette.primary_color_override.is_some());
    assert!(palette.secondary_color_override.is_some());
}

#[test]
fn healthy_state_offers_directions_with_content() {
    let packet = generate(&state(0.8, 0.8, 0.7, 0.2), 3);
    let directions = &packet.strategic_directions.available_directions;
    assert!(!directions.is_empty());
    assert!(directions.len() <= 3);
    for direction in directions {
        assert!(!direction.title.is_empty());
        assert!(!direction.narrative_hook.is_empty());
        assert!(direction.recommendation_level <= 2);
    }
}

#[test]
fn identical_inputs_give_identical_reports_and_manifest() {
    let state = state(0.35, 0.45, 0.55, 0.65);
    let first = generate(&state, 11);
    let second = generate(&state, 12);

    assert_eq!(
        packet_hash(&first.advisor_reports),
        packet_hash(&second.advisor_reports)
    );
    assert_eq!(
        packet_hash(&first.visual_manifest),
        packet_hash(&second.visual_manifest)
    );
}

#[test]
fn same_seed_gives_identical_packets() {
    let state = state(0.45, 0.7, 0.4, 0.4);
    assert_eq!(packet_hash(&generate(&state, 77)), packet_hash(&generate(&state, 77)));
}

#[test]
fn direction_set_is_stable_below_the_cap() {
    // Only the unconditional direction and the campus direction (no
    // demographics, so youth loyalty reads as 0.0) survive.
    let state = state(0.9, 0.4, 0.9, 0.1);
    let handles = |seed| -> Vec<String> {
        let mut handles: Vec<String> = generate(&state, seed)
            .strategic_directions
            .handles()
            .map(str::to_string)
            .collect();
        handles.sort();
        handles
    };
    assert_eq!(handles(1), handles(2));
    assert_eq!(handles(1), ["campus_outreach", "grassroots_tour"]);
}

#[test]
fn direction_count_never_exceeds_cap() {
    let mut catalog = BriefingCatalog::empty();
    for id in 0..10 {
        catalog.strategic_directions.push(StrategicDirectionItem {
            id,
            condition: "true".to_string(),
            handle: format!("open-{id}"),
            title: format!("Open {id}"),
            narrative_hook: "hook".to_string(),
            description: String::new(),
            global_modifiers: BTreeMap::new(),
            tags: Vec::new(),
        });
    }
    let compositor = BriefingCompositor::default();
    for seed in 0..20 {
        let mut recommendations = RngRecommendations::seeded(seed);
        let packet = compositor.generate_briefing(
            &GameState::default(),
            &catalog,
            &mut recommendations,
            issued_at(),
        );
        assert_eq!(packet.strategic_directions.count, 3);
        let levels: Vec<u8> = packet
            .strategic_directions
            .available_directions
            .iter()
            .map(|direction| direction.recommendation_level)
            .collect();
        assert!(levels.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}

#[test]
fn zero_matches_is_an_empty_selection() {
    let catalog = BriefingCatalog::from_json(
        r#"{
            "strategic_directions": [
                { "id": 1, "condition": "false", "handle": "never", "title": "Never" },
                { "id": 2, "condition": "party.x ## 0.4", "handle": "broken", "title": "Broken" }
            ]
        }"#,
    )
    .unwrap();
    let mut recommendations = RngRecommendations::seeded(1);
    let packet = BriefingCompositor::default().generate_briefing(
        &GameState::default(),
        &catalog,
        &mut recommendations,
        issued_at(),
    );

    let value = serde_json::to_value(&packet.strategic_directions).unwrap();
    assert_eq!(value["available_directions"], serde_json::json!([]));
    assert_eq!(value["count"], 0);
    assert_eq!(value["selection_required"], true);
    assert!(packet.advisor_reports.is_empty());
}

#[test]
fn absent_state_sections_use_defaults() {
    let state = GameState::from_json(r#"{"week": 4}"#).unwrap();
    let packet = generate(&state, 1);
    assert_eq!(packet.visual_manifest.glitch_intensity.level, GlitchLevel::Low);
    assert_eq!(packet.visual_manifest.aesthetic_mode, AestheticMode::Pristine);
}
