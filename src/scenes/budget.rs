use std::f64::consts::PI;

use super::{Targets, numbered};
use crate::{
    anim_ease::Ease,
    counter::CounterFormat,
    dsl::{SequenceBuilder, count, set, to},
    foundation::core::{Prop, Value},
    model::SceneDef,
    position::Position,
};

const PASTE_LINES: usize = 8;
const NEW_ROWS: usize = 3;
const DONUT_CIRC: f64 = 2.0 * PI * 42.0;
const BAR_MAX_W: f64 = 380.0;
/// Category bar fill ids with their share of the bar width.
const BARS: [(&str, f64); 4] = [
    ("barLaborFill", 0.70),
    ("barProdFill", 0.55),
    ("barContFill", 0.15),
    ("barPermitsFill", 0.08),
];
/// Highlight offsets for the Lean, Producer and Vendor tiles.
const TILE_DELTAS: [(f64, f64); 3] = [(0.0, 0.0), (154.0, 0.0), (308.0, 0.0)];
const CHIPS: [&str; 4] = [
    "chipLinesValue",
    "chipBlocksValue",
    "chipTasksValue",
    "chipLinksValue",
];

/// Budget page with the spellbook modal: paste a brief, pick a variant, apply, watch the
/// new rows and KPIs land.
pub fn budget() -> SceneDef {
    let paste = numbered("pasteLine", 0..PASTE_LINES);
    let preview = numbered("previewItem", 1..=3);
    let rows = numbered("newRow", 0..NEW_ROWS);
    let bars: Vec<String> = BARS.iter().map(|(id, _)| id.to_string()).collect();
    let chips: Vec<String> = CHIPS.iter().map(|c| c.to_string()).collect();
    let totals = Position::label("animateTotals");
    let kpis = Position::label("updateKPIs");
    let money = CounterFormat::currency("$");

    let mut seq = SequenceBuilder::new()
        .repeat_delay(1.0)
        .ease(Ease::InOutCubic)
        // 1: budget view, everything reset
        .label("showBudget")
        .set(["modalScrim"], [(Prop::Opacity, 0.0)])
        .set(["modalView"], [(Prop::Opacity, 0.0), (Prop::Scale, 0.92)])
        .set(["caret"], [(Prop::Opacity, 0.0)])
        .step(set(paste.clone(), [(Prop::Opacity, 0.0), (Prop::Y, 4.0)]))
        .step(set(preview.clone(), [(Prop::Opacity, 0.0), (Prop::Y, 8.0)]))
        .set(["previewMore"], [(Prop::Opacity, 0.0)])
        .step(set(chips.clone(), [(Prop::Text, "0")]))
        .set(["budgetedValue", "finalValue", "markupValue"], [(Prop::Text, "–")])
        .step(set(bars.clone(), [(Prop::attr("width"), 0.0)]))
        .step(set(rows.clone(), [(Prop::Opacity, 0.0), (Prop::Y, 20.0)]))
        .set(["rowHighlight"], [(Prop::Opacity, 0.0)])
        .set(
            ["tileHighlight"],
            [(Prop::X, TILE_DELTAS[0].0), (Prop::Y, TILE_DELTAS[0].1)],
        )
        .set(["btnApplyGlow"], [(Prop::Opacity, 0.0)])
        .set(["kpiCostValue"], [(Prop::Text, "$209,875")])
        .set(["kpiMarginValue"], [(Prop::Text, "$66,255")])
        .set(["kpiClientTotalValue"], [(Prop::Text, "$276,130")])
        .set(["donutArcCost"], [(dash(), DONUT_CIRC * 0.24)])
        .set(["donutArcMargin"], [(dash(), DONUT_CIRC * 0.76)])
        .hold(1.0)
        // 2: open modal
        .label("openModal")
        .step(to(["modalScrim"], [(Prop::Opacity, 0.55)], 0.3))
        .step(
            to(["modalView"], [(Prop::Opacity, 1.0), (Prop::Scale, 1.0)], 0.6)
                .ease(Ease::OutBack(1.2))
                .at(Position::with_prev_offset(0.05)),
        )
        // 3: paste text
        .label("pasteText")
        .step(to(["caret"], [(Prop::Opacity, 1.0)], 0.15))
        .step(
            to(paste, [(Prop::Opacity, 1.0), (Prop::Y, 0.0)], 0.12)
                .stagger(0.04)
                .ease(Ease::OutCubic),
        )
        .step(to(["caret"], [(Prop::Opacity, 0.0)], 0.2).at(Position::after(0.3)))
        // 4: chips
        .label("incrementChips")
        .step(
            count(["chipLinesValue"], 0.0, 6.0, 0.5)
                .snap(1.0)
                .at(Position::label("incrementChips")),
        )
        // 5: preview
        .label("populatePreview")
        .step(
            to(preview, [(Prop::Opacity, 1.0), (Prop::Y, 0.0)], 0.2)
                .stagger(0.08)
                .ease(Ease::OutCubic),
        )
        .step(to(["previewMore"], [(Prop::Opacity, 1.0)], 0.2).at(Position::overlap(0.05)));

    // 6: tile highlight walks Lean → Producer → Vendor
    for (i, label) in ["moveTile1", "moveTile2"].into_iter().enumerate() {
        let (dx, dy) = TILE_DELTAS[i + 1];
        seq = seq
            .label(label)
            .step(to(["tileHighlight"], [(Prop::X, dx), (Prop::Y, dy)], 0.35))
            .step(
                to(
                    ["tileHighlight"],
                    [(Prop::ScaleX, 0.96), (Prop::ScaleY, 0.94)],
                    0.08,
                )
                .ease(Ease::InCubic),
            )
            .step(
                to(["tileHighlight"], [(Prop::ScaleX, 1.0), (Prop::ScaleY, 1.0)], 0.12)
                    .ease(Ease::OutBack(2.0)),
            )
            .hold(0.3);
    }

    // 7: totals and category bars
    seq = seq
        .label("animateTotals")
        .step(
            count(["budgetedValue"], 0.0, 5759.0, 0.6)
                .snap(1.0)
                .format(money.clone())
                .at(totals.clone()),
        )
        .step(
            count(["finalValue"], 0.0, 6987.0, 0.6)
                .snap(1.0)
                .format(money.clone())
                .at(totals.clone()),
        )
        .step(
            count(["markupValue"], 0.0, 21.0, 0.6)
                .snap(1.0)
                .format(CounterFormat::suffixed("%"))
                .at(totals),
        );
    for (i, (id, pct)) in BARS.into_iter().enumerate() {
        seq = seq.step(
            to([id], [(Prop::attr("width"), BAR_MAX_W * pct)], 0.6)
                .ease(Ease::OutCubic)
                .at(Position::label_offset("animateTotals", i as f64 * 0.06)),
        );
    }

    let seq = seq
        .hold(0.4)
        // 8: press Apply
        .label("pressApply")
        .step(
            to(["btnApplyBg"], [(Prop::ScaleX, 0.93), (Prop::ScaleY, 0.94)], 0.12)
                .ease(Ease::InCubic),
        )
        .step(
            to(["btnApplyBg"], [(Prop::ScaleX, 1.0), (Prop::ScaleY, 1.0)], 0.15)
                .ease(Ease::OutBack(2.0)),
        )
        .step(to(["btnApplyGlow"], [(Prop::Opacity, 0.6)], 0.1).at(Position::overlap(0.15)))
        .step(to(["btnApplyGlow"], [(Prop::Opacity, 0.0)], 0.4).ease(Ease::OutCubic))
        // 9: close modal, reveal rows
        .label("closeModal")
        .step(
            to(["modalView"], [(Prop::Opacity, 0.0), (Prop::Scale, 0.95)], 0.4)
                .ease(Ease::InCubic),
        )
        .step(to(["modalScrim"], [(Prop::Opacity, 0.0)], 0.3).at(Position::with_prev_offset(0.1)))
        .label("revealRows")
        .step(
            to(rows.clone(), [(Prop::Opacity, 1.0), (Prop::Y, 0.0)], 0.4)
                .stagger(0.1)
                .ease(Ease::OutBack(1.4)),
        )
        .step(to(["rowHighlight"], [(Prop::Opacity, 0.7)], 0.25))
        .step(to(["rowHighlight"], [(Prop::Opacity, 0.0)], 0.6).ease(Ease::OutCubic))
        // 10: KPIs and donut sweep
        .label("updateKPIs")
        .step(
            count(["kpiCostValue"], 209_875.0, 215_634.0, 0.8)
                .snap(1.0)
                .format(money.clone())
                .at(kpis.clone()),
        )
        .step(
            count(["kpiMarginValue"], 66_255.0, 70_821.0, 0.8)
                .snap(1.0)
                .format(money.clone())
                .at(kpis.clone()),
        )
        .step(
            count(["kpiClientTotalValue"], 276_130.0, 286_455.0, 0.8)
                .snap(1.0)
                .format(money)
                .at(kpis.clone()),
        )
        .step(to(["donutArcCost"], [(dash(), DONUT_CIRC * 0.21)], 0.8).at(kpis.clone()))
        .step(to(["donutArcMargin"], [(dash(), DONUT_CIRC * 0.72)], 0.8).at(kpis))
        .hold(1.5)
        .build();

    let targets = Targets::default()
        .one("modalScrim", &[(Prop::Opacity, 0.0)])
        .one("modalView", &[(Prop::Opacity, 0.0), (Prop::Scale, 0.92)])
        .one("caret", &[(Prop::Opacity, 0.0)])
        .add(&numbered("pasteLine", 0..PASTE_LINES), &[(Prop::Opacity, 0.0), (Prop::Y, 4.0)])
        .add(&numbered("previewItem", 1..=3), &[(Prop::Opacity, 0.0), (Prop::Y, 8.0)])
        .one("previewMore", &[(Prop::Opacity, 0.0)])
        .add(&chips, &[(Prop::Text, "0")])
        .text("budgetedValue", "–")
        .text("finalValue", "–")
        .text("markupValue", "–")
        .add(&bars, &[(Prop::attr("width"), 0.0)])
        .add(&rows, &[(Prop::Opacity, 0.0), (Prop::Y, 20.0)])
        .one("rowHighlight", &[(Prop::Opacity, 0.0)])
        .one(
            "tileHighlight",
            &[
                (Prop::X, 0.0),
                (Prop::Y, 0.0),
                (Prop::ScaleX, 1.0),
                (Prop::ScaleY, 1.0),
            ],
        )
        .one("btnApplyGlow", &[(Prop::Opacity, 0.0)])
        .one("btnApplyBg", &[(Prop::ScaleX, 1.0), (Prop::ScaleY, 1.0)])
        .text("kpiCostValue", "$209,875")
        .text("kpiMarginValue", "$66,255")
        .text("kpiClientTotalValue", "$276,130")
        .one("donutArcCost", &[(dash(), Value::Num(DONUT_CIRC * 0.24))])
        .one("donutArcMargin", &[(dash(), Value::Num(DONUT_CIRC * 0.76))]);

    SceneDef {
        name: "budget".to_string(),
        targets: targets.into_map(),
        sequence: seq,
    }
}

fn dash() -> Prop {
    Prop::attr("stroke-dashoffset")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::TrackKey;
    use crate::compile::build;
    use crate::foundation::core::Millis;

    #[test]
    fn terminal_state_lands_every_counter() {
        let scene = budget();
        let seq = build(&scene.sequence, &scene.tree()).unwrap();
        let end = seq.terminal_state();
        let text = |t: &str| end[&TrackKey::new(t, Prop::Text)].clone();
        assert_eq!(text("chipLinesValue"), Value::from("6"));
        assert_eq!(text("budgetedValue"), Value::from("$5,759"));
        assert_eq!(text("finalValue"), Value::from("$6,987"));
        assert_eq!(text("markupValue"), Value::from("21%"));
        assert_eq!(text("kpiCostValue"), Value::from("$215,634"));
        assert_eq!(text("kpiMarginValue"), Value::from("$70,821"));
        assert_eq!(text("kpiClientTotalValue"), Value::from("$286,455"));
        assert_eq!(
            end[&TrackKey::new("modalView", Prop::Opacity)],
            Value::Num(0.0)
        );
        assert_eq!(end[&TrackKey::new("newRow2", Prop::Opacity)], Value::Num(1.0));
    }

    #[test]
    fn totals_start_together() {
        let scene = budget();
        let seq = build(&scene.sequence, &scene.tree()).unwrap();
        let at = seq.label_time("animateTotals").unwrap();
        let starts: Vec<Millis> = seq
            .tweens()
            .iter()
            .filter(|t| t.track.target.starts_with("bar") && t.start >= at)
            .map(|t| t.start.saturating_sub(at))
            .collect();
        assert_eq!(starts, vec![Millis(0), Millis(60), Millis(120), Millis(180)]);
        assert_eq!(seq.repeat_delay(), Millis(1000));
    }
}
