use super::{Targets, numbered};
use crate::{
    anim_ease::Ease,
    counter::CounterFormat,
    dsl::{SequenceBuilder, count, set, to},
    foundation::core::Prop,
    model::SceneDef,
    position::Position,
};

const PASTE_LINES: usize = 6;
const FOCUS_BLOCKS: usize = 5;
const SIDE_TASKS: usize = 5;

/// Calendar week with the spellbook modal: tasks pasted in become focus blocks across the
/// week and the sidebar count ticks up.
pub fn calendar() -> SceneDef {
    let paste = numbered("calPasteLine", 0..PASTE_LINES);
    let blocks = numbered("focusBlock", 0..FOCUS_BLOCKS);
    let tasks = numbered("sideTask", 0..SIDE_TASKS);
    let pills = ["calTaskPillCount", "calTaskPillCount2"];

    let seq = SequenceBuilder::new()
        .repeat_delay(1.0)
        .ease(Ease::InOutCubic)
        // 1: calendar view, everything reset
        .label("showCalendar")
        .set(["calModalScrim"], [(Prop::Opacity, 0.0)])
        .set(["calModalView"], [(Prop::Opacity, 0.0), (Prop::Scale, 0.92)])
        .set(["calCursor"], [(Prop::Opacity, 0.0)])
        .step(set(paste.clone(), [(Prop::Opacity, 0.0), (Prop::Y, 4.0)]))
        .step(set(blocks.clone(), [(Prop::Opacity, 0.0), (Prop::ScaleY, 0.3)]))
        .step(set(tasks.clone(), [(Prop::Opacity, 0.0), (Prop::X, -8.0)]))
        .set(["bdHighlight", "fbHighlight"], [(Prop::Opacity, 0.0)])
        .set(["calBtnCreateGlow"], [(Prop::Opacity, 0.0)])
        .set(["calTaskCount"], [(Prop::Text, "0 tasks")])
        .set(["calOpenCount"], [(Prop::Text, "0")])
        .set(["calPasteTab"], [(Prop::Opacity, 1.0)])
        .set(["calCaret"], [(Prop::Opacity, 0.0)])
        .set(pills, [(Prop::Text, "0 tasks")])
        .hold(0.8)
        // 2: cursor to the spellbook button, click
        .label("cursorMove")
        .set(
            ["calCursor"],
            [(Prop::Opacity, 1.0), (Prop::X, 0.0), (Prop::Y, 100.0)],
        )
        .step(
            to(["calCursor"], [(Prop::X, 0.0), (Prop::Y, 0.0)], 0.6).ease(Ease::OutCubic),
        )
        .step(to(
            ["calSpellbookBtn"],
            [(Prop::ScaleX, 0.95), (Prop::ScaleY, 0.93)],
            0.08,
        ))
        .step(
            to(["calSpellbookBtn"], [(Prop::ScaleX, 1.0), (Prop::ScaleY, 1.0)], 0.12)
                .ease(Ease::OutBack(2.0)),
        )
        .set(["calCursor"], [(Prop::Opacity, 0.0)])
        // 3: open modal
        .label("openModal")
        .step(to(["calModalScrim"], [(Prop::Opacity, 0.55)], 0.3))
        .step(
            to(["calModalView"], [(Prop::Opacity, 1.0), (Prop::Scale, 1.0)], 0.5)
                .ease(Ease::OutBack(1.2))
                .at(Position::with_prev_offset(0.05)),
        )
        // 4: paste text
        .label("pasteText")
        .step(to(["calCaret"], [(Prop::Opacity, 1.0)], 0.1))
        .step(
            to(paste, [(Prop::Opacity, 1.0), (Prop::Y, 0.0)], 0.1)
                .stagger(0.04)
                .ease(Ease::OutCubic),
        )
        .step(to(["calCaret"], [(Prop::Opacity, 0.0)], 0.15).at(Position::after(0.2)))
        // 5: breakdown style, pills count up
        .label("selectBreakdown")
        .step(to(["bdHighlight"], [(Prop::Opacity, 1.0)], 0.3))
        .step(
            count(pills, 0.0, 12.0, 0.5)
                .snap(1.0)
                .format(CounterFormat::suffixed(" tasks"))
                .at(Position::label_offset("selectBreakdown", 0.1)),
        )
        .hold(0.3)
        // 6: focus block row
        .label("selectFocusBlock")
        .step(to(["fbHighlight"], [(Prop::Opacity, 1.0)], 0.3))
        .hold(0.3)
        // 7: create tasks
        .label("createTasks")
        .step(
            to(["calBtnCreateBg"], [(Prop::ScaleX, 0.95), (Prop::ScaleY, 0.92)], 0.1)
                .ease(Ease::InCubic),
        )
        .step(
            to(["calBtnCreateBg"], [(Prop::ScaleX, 1.0), (Prop::ScaleY, 1.0)], 0.15)
                .ease(Ease::OutBack(2.0)),
        )
        .step(
            to(["calBtnCreateGlow"], [(Prop::Opacity, 0.5)], 0.08).at(Position::overlap(0.12)),
        )
        .step(to(["calBtnCreateGlow"], [(Prop::Opacity, 0.0)], 0.35).ease(Ease::OutCubic))
        // 8: close modal
        .label("closeModal")
        .step(
            to(["calModalView"], [(Prop::Opacity, 0.0), (Prop::Scale, 0.95)], 0.35)
                .ease(Ease::InCubic),
        )
        .step(
            to(["calModalScrim"], [(Prop::Opacity, 0.0)], 0.25)
                .at(Position::with_prev_offset(0.1)),
        )
        // 9: focus blocks drop into the week
        .label("populateBlocks")
        .step(
            to(blocks.clone(), [(Prop::Opacity, 1.0), (Prop::ScaleY, 1.0)], 0.5)
                .stagger(0.1)
                .ease(Ease::OutCubic),
        )
        // 10: sidebar count and entries
        .label("updateSidebar")
        .step(
            count(["calTaskCount"], 0.0, 5.0, 0.5)
                .snap(1.0)
                .format(CounterFormat::suffixed(" tasks"))
                .at(Position::label("updateSidebar")),
        )
        .step(
            count(["calOpenCount"], 0.0, 5.0, 0.5)
                .snap(1.0)
                .at(Position::label("updateSidebar")),
        )
        .step(
            to(tasks.clone(), [(Prop::Opacity, 1.0), (Prop::X, 0.0)], 0.3)
                .stagger(0.08)
                .ease(Ease::OutCubic)
                .at(Position::label_offset("updateSidebar", 0.1)),
        )
        .hold(1.8)
        // 11: fade the week back out
        .label("reset")
        .step(
            to(blocks, [(Prop::Opacity, 0.0), (Prop::ScaleY, 0.3)], 0.3)
                .stagger(0.03)
                .ease(Ease::InCubic),
        )
        .step(
            to(tasks, [(Prop::Opacity, 0.0), (Prop::X, -8.0)], 0.2)
                .stagger(0.02)
                .at(Position::with_prev()),
        )
        .build();

    let targets = Targets::default()
        .one("calModalScrim", &[(Prop::Opacity, 0.0)])
        .one("calModalView", &[(Prop::Opacity, 0.0), (Prop::Scale, 0.92)])
        .one(
            "calCursor",
            &[(Prop::Opacity, 0.0), (Prop::X, 0.0), (Prop::Y, 100.0)],
        )
        .add(
            &numbered("calPasteLine", 0..PASTE_LINES),
            &[(Prop::Opacity, 0.0), (Prop::Y, 4.0)],
        )
        .add(
            &numbered("focusBlock", 0..FOCUS_BLOCKS),
            &[(Prop::Opacity, 0.0), (Prop::ScaleY, 0.3)],
        )
        .add(
            &numbered("sideTask", 0..SIDE_TASKS),
            &[(Prop::Opacity, 0.0), (Prop::X, -8.0)],
        )
        .one("bdHighlight", &[(Prop::Opacity, 0.0)])
        .one("fbHighlight", &[(Prop::Opacity, 0.0)])
        .one("calBtnCreateGlow", &[(Prop::Opacity, 0.0)])
        .one("calBtnCreateBg", &[(Prop::ScaleX, 1.0), (Prop::ScaleY, 1.0)])
        .one("calSpellbookBtn", &[(Prop::ScaleX, 1.0), (Prop::ScaleY, 1.0)])
        .one("calPasteTab", &[(Prop::Opacity, 1.0)])
        .one("calCaret", &[(Prop::Opacity, 0.0)])
        .text("calTaskCount", "0 tasks")
        .text("calOpenCount", "0")
        .text("calTaskPillCount", "0 tasks")
        .text("calTaskPillCount2", "0 tasks");

    SceneDef {
        name: "calendar".to_string(),
        targets: targets.into_map(),
        sequence: seq,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::TrackKey;
    use crate::compile::build;
    use crate::foundation::core::{Millis, Value};

    #[test]
    fn pills_and_sidebar_count_up() {
        let scene = calendar();
        let seq = build(&scene.sequence, &scene.tree()).unwrap();
        let end = seq.terminal_state();
        for pill in ["calTaskPillCount", "calTaskPillCount2"] {
            assert_eq!(end[&TrackKey::new(pill, Prop::Text)], Value::from("12 tasks"));
        }
        assert_eq!(end[&TrackKey::new("calTaskCount", Prop::Text)], Value::from("5 tasks"));
        assert_eq!(end[&TrackKey::new("calOpenCount", Prop::Text)], Value::from("5"));
    }

    #[test]
    fn week_is_cleared_by_the_end_of_each_loop() {
        let scene = calendar();
        let seq = build(&scene.sequence, &scene.tree()).unwrap();
        let end = seq.terminal_state();
        assert_eq!(end[&TrackKey::new("focusBlock4", Prop::Opacity)], Value::Num(0.0));
        assert_eq!(end[&TrackKey::new("sideTask0", Prop::X)], Value::Num(-8.0));

        let reset = seq.label_time("reset").unwrap();
        let shown = seq.sample(reset.saturating_sub(Millis(1)));
        assert_eq!(shown[&TrackKey::new("focusBlock4", Prop::Opacity)], Value::Num(1.0));
    }
}
