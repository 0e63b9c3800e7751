use anyhow::{Result, ensure};
use std::collections::HashSet;

use crate::logic::{BriefingSummary, scenario_issued_at};
use fracture_game::{
    AestheticMode, ConditionEvaluator, GlitchLevel, format_timestamp, initial_state,
};

pub fn packet_is_complete(summary: &BriefingSummary) -> Result<()> {
    let packet = &summary.packet;
    let config = &summary.assets.config;

    ensure!(packet.agenda_locked, "Agenda must be locked after a briefing");
    ensure!(
        packet.lock_message == config.lock_message,
        "Unexpected lock message: {}",
        packet.lock_message
    );

    let directions = &packet.strategic_directions;
    ensure!(directions.selection_required, "Selection must be required");
    ensure!(
        directions.count == directions.available_directions.len(),
        "Direction count {} disagrees with {} listed",
        directions.count,
        directions.available_directions.len()
    );
    ensure!(
        directions.message == config.selection_message,
        "Unexpected selection message: {}",
        directions.message
    );

    let stamp = format_timestamp(scenario_issued_at());
    for report in &packet.advisor_reports {
        ensure!(
            report.timestamp == stamp,
            "{} report stamped {} instead of {stamp}",
            report.advisor,
            report.timestamp
        );
    }
    Ok(())
}

pub fn reports_are_ordered(summary: &BriefingSummary) -> Result<()> {
    let reports = &summary.packet.advisor_reports;
    ensure!(!reports.is_empty(), "Opening week should produce reports");
    ensure!(
        reports
            .windows(2)
            .all(|pair| pair[0].priority_level <= pair[1].priority_level),
        "Reports must be sorted by priority level"
    );

    let mut seen = HashSet::new();
    for report in reports {
        ensure!(
            seen.insert(report.advisor.as_str()),
            "{} reported twice",
            report.advisor
        );
    }
    Ok(())
}

pub fn layers_ignore_seed(summary: &BriefingSummary) -> Result<()> {
    ensure!(
        summary.packet.advisor_reports == summary.reseeded.advisor_reports,
        "Advisor reports changed with the recommendation seed"
    );
    ensure!(
        summary.packet.visual_manifest == summary.reseeded.visual_manifest,
        "Visual manifest changed with the recommendation seed"
    );
    Ok(())
}

pub fn same_seed_same_packet(summary: &BriefingSummary) -> Result<()> {
    ensure!(
        summary.packet == summary.replay,
        "Seed {} produced two different packets",
        summary.seed
    );
    Ok(())
}

pub fn directions_respect_limits(summary: &BriefingSummary) -> Result<()> {
    let config = &summary.assets.config;
    let directions = &summary.packet.strategic_directions;

    ensure!(
        directions.count <= config.max_directions,
        "{} directions offered, cap is {}",
        directions.count,
        config.max_directions
    );

    let levels: Vec<u8> = directions
        .available_directions
        .iter()
        .map(|direction| direction.recommendation_level)
        .collect();
    ensure!(
        levels
            .iter()
            .all(|&level| level <= config.max_recommendation_level),
        "Recommendation level above {}: {levels:?}",
        config.max_recommendation_level
    );
    ensure!(
        levels.windows(2).all(|pair| pair[0] <= pair[1]),
        "Directions must be sorted by recommendation level: {levels:?}"
    );

    let unique: HashSet<&str> = directions.handles().collect();
    ensure!(
        unique.len() == directions.count,
        "Duplicate direction offered"
    );
    Ok(())
}

pub fn catalog_lints_clean(summary: &BriefingSummary) -> Result<()> {
    let matching = summary.assets.config.operator_matching();
    let problems = summary.assets.catalog.lint(matching);
    ensure!(
        problems.is_empty(),
        "Catalog has {} problem(s) under {matching:?} matching: {}",
        problems.len(),
        problems
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    );
    Ok(())
}

pub fn crisis_is_flagged(summary: &BriefingSummary) -> Result<()> {
    let packet = &summary.packet;
    ensure!(
        packet
            .advisor_reports
            .first()
            .is_some_and(|report| report.priority_level == 1),
        "A collapsing narrative should lead with a high-priority report"
    );
    ensure!(
        packet.visual_manifest.glitch_intensity.level == GlitchLevel::Severe,
        "Glitch intensity should be severe, got {:?}",
        packet.visual_manifest.glitch_intensity.level
    );
    ensure!(
        packet.visual_manifest.aesthetic_mode == AestheticMode::Fractured,
        "Aesthetic should read fractured, got {}",
        packet.visual_manifest.aesthetic_mode
    );
    Ok(())
}

pub fn voice_turns_cynical(summary: &BriefingSummary) -> Result<()> {
    let items = &summary.assets.catalog.advisor_items;
    let reports = &summary.packet.advisor_reports;

    let cynical: HashSet<&str> = items
        .iter()
        .filter_map(|item| item.message_cynical.as_deref())
        .collect();
    ensure!(
        reports
            .iter()
            .any(|report| cynical.contains(report.message.as_str())),
        "No advisor switched to a cynical message"
    );

    for report in reports {
        let plain_with_variant = items.iter().any(|item| {
            item.advisor == report.advisor
                && item.message == report.message
                && item.message_cynical.is_some()
        });
        ensure!(
            !plain_with_variant,
            "{} kept the plain message despite a cynical variant",
            report.advisor
        );
    }
    Ok(())
}

pub fn conditions_fall_back(summary: &BriefingSummary) -> Result<()> {
    let evaluator = ConditionEvaluator::for_state(&summary.state)
        .with_matching(summary.assets.config.operator_matching());

    let cases = [
        ("true", true),
        ("false", false),
        ("party.not_a_metric > 0.5", false),
        ("demographics.nobody.loyalty < 0.1", true),
        ("party.narrative_coherence ~ 1", false),
        ("&&", false),
        ("party.narrative_coherence > 0.5 || false", true),
        ("party.narrative_coherence > 0.5 && party.faction_integrity > 0.9", false),
    ];
    for (expression, expected) in cases {
        let actual = evaluator.evaluate(expression);
        ensure!(
            actual == expected,
            "`{expression}` evaluated to {actual}, expected {expected}"
        );
    }

    ensure!(
        evaluator.try_evaluate("party.narrative_coherence ~ 1").is_err(),
        "Strict evaluation should reject a clause without an operator"
    );
    Ok(())
}

pub fn every_party_bootstraps(summary: &BriefingSummary) -> Result<()> {
    let archetypes = &summary.assets.archetypes;
    ensure!(!archetypes.parties.is_empty(), "No parties defined");

    for party in &archetypes.parties {
        let state = initial_state(&party.handle, archetypes)?;
        ensure!(state.week == 1, "{} opens in week {}", party.handle, state.week);
        ensure!(
            state.demographics.len() == archetypes.demographics.len(),
            "{} is missing demographics",
            party.handle
        );
        ensure!(
            !party.campaign_title().trim().is_empty(),
            "{} has no campaign title",
            party.handle
        );
    }
    Ok(())
}
