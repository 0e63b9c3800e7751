use anyhow::Result;
use colored::Colorize;
use fracture_game::BriefingPacket;
use std::io::Write;
use std::time::Duration;

use super::ScenarioResult;

#[allow(clippy::cast_precision_loss)]
fn success_rate(passed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (passed as f64 / total as f64) * 100.0
    }
}

pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Briefing Test Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "================================".cyan())?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();
    let failed_tests = total_tests - passed_tests;

    writeln!(out, "Total scenarios: {total_tests}")?;
    writeln!(out, "Passed: {}", passed_tests.to_string().green())?;
    writeln!(out, "Failed: {}", failed_tests.to_string().red())?;
    writeln!(
        out,
        "Success rate: {:.1}%",
        success_rate(passed_tests, total_tests)
    )?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };

        writeln!(
            out,
            "{} {} (seed {})",
            status,
            result.scenario_name.bold(),
            result.seed
        )?;
        writeln!(
            out,
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "   Average time: {:?}", result.average_duration)?;

        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }

    let fastest = results.iter().min_by_key(|r| r.average_duration);
    let slowest = results.iter().max_by_key(|r| r.average_duration);
    if let (Some(fastest), Some(slowest)) = (fastest, slowest) {
        writeln!(out, "{}", "⚡ Performance Summary".bright_yellow().bold())?;
        writeln!(out, "{}", "=====================".yellow())?;
        writeln!(
            out,
            "Fastest: {} ({:?})",
            fastest.scenario_name.green(),
            fastest.average_duration
        )?;
        writeln!(
            out,
            "Slowest: {} ({:?})",
            slowest.scenario_name.yellow(),
            slowest.average_duration
        )?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    writeln!(out, "# Fracture Briefing Test Results\n")?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();
    let failed_tests = total_tests - passed_tests;

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total scenarios**: {total_tests}")?;
    writeln!(out, "- **Passed**: {passed_tests}")?;
    writeln!(out, "- **Failed**: {failed_tests}")?;
    writeln!(
        out,
        "- **Success rate**: {:.1}%\n",
        success_rate(passed_tests, total_tests)
    )?;

    writeln!(out, "## Detailed Results\n")?;

    for result in results {
        let status = if result.passed { "✅" } else { "❌" };

        writeln!(
            out,
            "### {} {} (seed {})\n",
            status, result.scenario_name, result.seed
        )?;
        writeln!(
            out,
            "- **Iterations**: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "- **Average time**: {:?}", result.average_duration)?;

        if !result.failures.is_empty() {
            writeln!(out, "- **Failures**:")?;
            for failure in &result.failures {
                writeln!(out, "  - {failure}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_packet_console(out: &mut dyn Write, packet: &BriefingPacket) -> Result<()> {
    writeln!(out, "{}", "📰 Weekly Briefing".bright_cyan().bold())?;
    writeln!(out, "{}", "==================".cyan())?;

    if packet.advisor_reports.is_empty() {
        writeln!(out, "No advisor reports this week.")?;
    }
    for report in &packet.advisor_reports {
        let priority = match report.priority_level {
            1 => report.priority.label().red().bold(),
            2 => report.priority.label().yellow(),
            _ => report.priority.label().normal(),
        };
        writeln!(
            out,
            "[{}] {}: {}",
            priority,
            report.advisor.bold(),
            report.message
        )?;
    }
    writeln!(out)?;

    let visual = &packet.visual_manifest;
    writeln!(out, "{}", "🎨 Visual Manifest".bright_magenta().bold())?;
    writeln!(
        out,
        "   Glitch: {:?} (aberration {}, noise {})",
        visual.glitch_intensity.level,
        visual.glitch_intensity.chromatic_aberration,
        visual.glitch_intensity.ui_noise
    )?;
    writeln!(
        out,
        "   Fracture: {:?} (icon corruption {}, breaks {})",
        visual.fracture_state.level,
        visual.fracture_state.icon_corruption,
        if visual.fracture_state.visual_breaks {
            "on"
        } else {
            "off"
        }
    )?;
    writeln!(
        out,
        "   Palette: {:?} shifting {} ({:.0}% corrupted)",
        visual.palette_corruption.level,
        visual.palette_corruption.shift_direction,
        visual.palette_corruption.corruption_percentage * 100.0
    )?;
    writeln!(out, "   Aesthetic: {}", visual.aesthetic_mode)?;
    writeln!(out)?;

    let directions = &packet.strategic_directions;
    writeln!(out, "{}", "🧭 Strategic Directions".bright_yellow().bold())?;
    writeln!(out, "{}", directions.message)?;
    for direction in &directions.available_directions {
        writeln!(
            out,
            "   {} [{}] {} - {}",
            direction.recommendation_level,
            direction.handle.green(),
            direction.title.bold(),
            direction.narrative_hook
        )?;
    }
    if packet.agenda_locked {
        writeln!(out)?;
        writeln!(out, "🔒 {}", packet.lock_message)?;
    }
    Ok(())
}

pub fn write_packet_json(out: &mut dyn Write, packet: &BriefingPacket) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(packet)?)?;
    Ok(())
}

pub fn write_packet_markdown(out: &mut dyn Write, packet: &BriefingPacket) -> Result<()> {
    writeln!(out, "# Weekly Briefing\n")?;

    writeln!(out, "## Advisor Reports\n")?;
    if packet.advisor_reports.is_empty() {
        writeln!(out, "_No advisor reports this week._")?;
    }
    for report in &packet.advisor_reports {
        writeln!(
            out,
            "- **{}** ({}): {}",
            report.advisor,
            report.priority.label(),
            report.message
        )?;
    }
    writeln!(out)?;

    let visual = &packet.visual_manifest;
    writeln!(out, "## Visual Manifest\n")?;
    writeln!(out, "| Layer | Level |")?;
    writeln!(out, "| --- | --- |")?;
    writeln!(out, "| Glitch | {:?} |", visual.glitch_intensity.level)?;
    writeln!(out, "| Fracture | {:?} |", visual.fracture_state.level)?;
    writeln!(out, "| Palette | {:?} |", visual.palette_corruption.level)?;
    writeln!(out, "| Aesthetic | {} |", visual.aesthetic_mode)?;
    writeln!(out)?;

    let directions = &packet.strategic_directions;
    writeln!(out, "## Strategic Directions\n")?;
    writeln!(out, "{}\n", directions.message)?;
    for direction in &directions.available_directions {
        writeln!(
            out,
            "{}. **{}** (`{}`): {}",
            direction.recommendation_level, direction.title, direction.handle, direction.narrative_hook
        )?;
    }
    if packet.agenda_locked {
        writeln!(out, "\n> {}", packet.lock_message)?;
    }
    Ok(())
}
