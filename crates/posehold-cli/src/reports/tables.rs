use super::RunSummary;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use posehold_core::config::{BonusSchedule, ChallengeConfig, CriterionKind, PoseSpec};
use posehold_core::events::{EventLog, SessionEvent};
use posehold_core::stability::StabilityEvent;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn align_right(table: &mut Table, columns: std::ops::RangeInclusive<usize>) {
    for i in columns {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

fn describe(kind: &CriterionKind) -> (&'static str, String) {
    match *kind {
        CriterionKind::BodyAlignment { tolerance_deg } => {
            ("shoulder-hip-ankle", format!("{:.0} deg", tolerance_deg))
        }
        CriterionKind::ElbowAngle {
            min_deg,
            max_deg,
            tolerance_deg,
        } => (
            "elbow angle",
            format!("{:.0}-{:.0} +/- {:.0} deg", min_deg, max_deg, tolerance_deg),
        ),
        CriterionKind::HipSag { max_ratio } => {
            ("hip offset", format!("{:.0}% of span", max_ratio * 100.0))
        }
        CriterionKind::LegStraightness { tolerance_deg } => {
            ("hip-knee-ankle", format!("{:.0} deg", tolerance_deg))
        }
        CriterionKind::HorizontalOrientation { tolerance_deg } => {
            ("body horizontal", format!("{:.0} deg", tolerance_deg))
        }
        CriterionKind::ArmExtension { tolerance_deg } => {
            ("arms on shoulder line", format!("{:.0} deg", tolerance_deg))
        }
        CriterionKind::TorsoUpright { tolerance_deg } => {
            ("torso vertical", format!("{:.0} deg", tolerance_deg))
        }
    }
}

pub fn criteria(pose: &PoseSpec) {
    let mut table = new_table();

    table.add_row(vec![
        Cell::new(format!("Pose: {}", pose.name)).add_attribute(Attribute::Bold),
        Cell::new("Check"),
        Cell::new("Weight").fg(Color::Cyan),
        Cell::new("Gate").fg(Color::Red),
        Cell::new("Tolerance"),
    ]);
    align_right(&mut table, 2..=4);

    for c in &pose.criteria {
        let (check, tolerance) = describe(&c.kind);
        let gate = match c.hard_gate {
            Some(g) => Cell::new(format!("{:.2}", g)).fg(Color::Red),
            None => Cell::new("-"),
        };
        table.add_row(vec![
            Cell::new(&c.name).add_attribute(Attribute::Bold),
            Cell::new(check),
            Cell::new(format!("{:.2}", c.weight)).fg(Color::Cyan),
            gate,
            Cell::new(tolerance),
        ]);
    }

    table.add_row(vec![
        Cell::new("passes above").add_attribute(Attribute::Bold),
        Cell::new(format!("min visibility {:.2}", pose.min_visibility)),
        Cell::new(format!("{:.2}", pose.acceptance_threshold)).add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
    ]);
    println!("\n{}", table);
}

pub fn session(config: &ChallengeConfig) {
    let s = &config.session;
    let r = &config.reward;
    let mut table = new_table();

    table.add_row(vec![
        Cell::new("Session").add_attribute(Attribute::Bold),
        Cell::new("Value"),
    ]);
    align_right(&mut table, 1..=1);

    let bonus = match r.bonus {
        BonusSchedule::None => "none".to_string(),
        BonusSchedule::Scaled { scale } => format!("floor(mean x {})", scale),
        BonusSchedule::Rounded { divisor } => format!("round(mean% / {})", divisor),
    };

    let rows = [
        ("window", format!("{} frames", s.window_size)),
        (
            "quorum",
            format!("{} of {} ({:.0}%)", s.quorum_count(), s.window_size, s.quorum * 100.0),
        ),
        ("hold", format!("{} ticks", s.hold_threshold)),
        ("preparation", format!("{}s", s.preparation_seconds)),
        ("target", format!("{:.1}s", s.target_seconds)),
        ("rate", format!("{} coins/s", r.rate)),
        ("bonus", bonus),
    ];
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    println!("\n{}", table);
}

fn stability_label(stability: &StabilityEvent) -> String {
    match stability {
        StabilityEvent::Unstable => "unstable".to_string(),
        StabilityEvent::Stabilizing(p) => format!("stabilizing {:.0}%", p * 100.0),
        StabilityEvent::Held => "held".to_string(),
    }
}

fn stability_rank(stability: &StabilityEvent) -> u32 {
    match stability {
        StabilityEvent::Unstable => 0,
        StabilityEvent::Stabilizing(_) => 1,
        StabilityEvent::Held => 2,
    }
}

/// Identifies rows worth printing: state changes, countdown seconds and
/// stability band changes.
fn band(event: &SessionEvent) -> (u8, u32) {
    match event {
        SessionEvent::Idle => (0, 0),
        SessionEvent::Preparing { remaining_seconds } => (1, *remaining_seconds),
        SessionEvent::Active { stability, .. } => (2, stability_rank(stability)),
        SessionEvent::Completed { .. } => (3, 0),
    }
}

pub fn timeline(log: &EventLog) {
    let mut table = new_table();

    table.add_row(vec![
        Cell::new("Event").add_attribute(Attribute::Bold),
        Cell::new("State"),
        Cell::new("Detail"),
    ]);
    align_right(&mut table, 0..=0);

    let mut last = None;
    for (i, event) in log.events.iter().enumerate() {
        let b = band(event);
        if last == Some(b) {
            continue;
        }
        last = Some(b);

        let (state, detail) = match event {
            SessionEvent::Idle => (Cell::new("idle"), String::new()),
            SessionEvent::Preparing { remaining_seconds } => {
                (Cell::new("preparing"), format!("{}s", remaining_seconds))
            }
            SessionEvent::Active {
                elapsed_seconds,
                stability,
            } => (
                Cell::new("active"),
                format!("{:.1}s held, {}", elapsed_seconds, stability_label(stability)),
            ),
            SessionEvent::Completed { reward } => (
                Cell::new("completed").fg(Color::Green),
                format!("{} coins", reward.total_coins),
            ),
        };
        table.add_row(vec![Cell::new(i), state, Cell::new(detail)]);
    }
    println!("\n{}", table);
}

pub fn stability(log: &EventLog) {
    let mut counts = [0usize; 3];
    let mut prev_active = false;
    for event in &log.events {
        let is_active = matches!(event, SessionEvent::Active { .. });
        // The first Active event marks the transition, not a tick.
        if let (true, SessionEvent::Active { stability, .. }) = (prev_active, event) {
            counts[stability_rank(stability) as usize] += 1;
        }
        prev_active = is_active;
    }

    let total: usize = counts.iter().sum();
    if total == 0 {
        return;
    }

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Active ticks").add_attribute(Attribute::Bold),
        Cell::new("Count"),
        Cell::new("Share"),
    ]);
    align_right(&mut table, 1..=2);

    let colors = [Color::Red, Color::Yellow, Color::Green];
    for (i, name) in ["unstable", "stabilizing", "held"].iter().enumerate() {
        table.add_row(vec![
            Cell::new(name).fg(colors[i]),
            Cell::new(counts[i]),
            Cell::new(format!("{:.1}%", counts[i] as f32 / total as f32 * 100.0)),
        ]);
    }
    println!("\n{}", table);
}

pub fn reward(summary: &RunSummary) {
    let mut table = new_table();

    table.add_row(vec![
        Cell::new(format!("Result: {}", summary.challenge)).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    align_right(&mut table, 1..=1);

    let short_fp = &summary.fingerprint[..12.min(summary.fingerprint.len())];
    table.add_row(vec![Cell::new("fingerprint"), Cell::new(short_fp)]);
    table.add_row(vec![
        Cell::new("state"),
        Cell::new(summary.final_state.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("held"),
        Cell::new(format!(
            "{:.1}s / {:.1}s",
            summary.elapsed_seconds, summary.target_seconds
        )),
    ]);
    table.add_row(vec![Cell::new("ticks"), Cell::new(summary.ticks)]);

    match summary.reward {
        Some(r) => {
            table.add_row(vec![Cell::new("base coins"), Cell::new(r.base_coins)]);
            table.add_row(vec![Cell::new("bonus coins"), Cell::new(r.bonus_coins)]);
            table.add_row(vec![
                Cell::new("total coins").add_attribute(Attribute::Bold),
                Cell::new(r.total_coins)
                    .fg(Color::Green)
                    .add_attribute(Attribute::Bold),
            ]);
        }
        None => {
            table.add_row(vec![Cell::new("total coins"), Cell::new("-")]);
        }
    }
    println!("\n{}", table);
}
