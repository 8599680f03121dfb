use super::{Targets, numbered};
use crate::{
    anim_ease::Ease,
    dsl::{SequenceBuilder, set, to},
    foundation::core::Prop,
    model::SceneDef,
    position::Position,
};

const ASSETS: usize = 12;
const FRAMES: usize = 7;
const CENTER_X: f64 = 366.0;
const AREA_Y: f64 = 126.0;

/// Frame rectangle as `(x, y, width, height)` relative to the preview area.
type Frame = (f64, f64, f64, f64);

/// Masonry presets the shuffle button cycles through.
const MASONRY: [[Frame; FRAMES]; 4] = [
    // magazine spread: 4 top, 3 bottom
    [
        (0.0, 0.0, 126.0, 160.0),
        (136.0, 0.0, 98.0, 160.0),
        (244.0, 0.0, 98.0, 160.0),
        (352.0, 0.0, 120.0, 160.0),
        (0.0, 170.0, 150.0, 140.0),
        (160.0, 170.0, 152.0, 140.0),
        (322.0, 170.0, 150.0, 140.0),
    ],
    // three columns of varying heights
    [
        (0.0, 0.0, 150.0, 200.0),
        (0.0, 210.0, 150.0, 100.0),
        (160.0, 0.0, 152.0, 130.0),
        (160.0, 140.0, 152.0, 170.0),
        (322.0, 0.0, 150.0, 95.0),
        (322.0, 105.0, 150.0, 100.0),
        (322.0, 215.0, 150.0, 95.0),
    ],
    // hero left, 2x3 grid right
    [
        (0.0, 0.0, 220.0, 310.0),
        (230.0, 0.0, 116.0, 97.0),
        (356.0, 0.0, 116.0, 97.0),
        (230.0, 107.0, 116.0, 96.0),
        (356.0, 107.0, 116.0, 96.0),
        (230.0, 213.0, 116.0, 97.0),
        (356.0, 213.0, 116.0, 97.0),
    ],
    // gallery: 3 top, 4 bottom
    [
        (0.0, 0.0, 150.0, 150.0),
        (160.0, 0.0, 152.0, 150.0),
        (322.0, 0.0, 150.0, 150.0),
        (0.0, 160.0, 111.0, 150.0),
        (121.0, 160.0, 110.0, 150.0),
        (241.0, 160.0, 110.0, 150.0),
        (361.0, 160.0, 111.0, 150.0),
    ],
];

fn rect_props(f: Frame) -> [(Prop, f64); 4] {
    [
        (Prop::attr("x"), CENTER_X + f.0),
        (Prop::attr("y"), AREA_Y + f.1),
        (Prop::attr("width"), f.2),
        (Prop::attr("height"), f.3),
    ]
}

fn handle_props(f: Frame) -> [(Prop, f64); 2] {
    [
        (Prop::attr("cx"), CENTER_X + f.0 + f.2),
        (Prop::attr("cy"), AREA_Y + f.1 + f.3),
    ]
}

/// Deck editor with the magic layout modal: pick assets, shuffle the masonry three times,
/// pin a frame, insert the new slide.
pub fn magic_layout() -> SceneDef {
    let checks = numbered("assetCheck", 1..=ASSETS);

    let mut seq = SequenceBuilder::new()
        .repeat_delay(0.5)
        .ease(Ease::InOutCubic)
        // 1: deck view, modal hidden
        .label("showDeck")
        .set(["modalView"], [(Prop::Opacity, 0.0), (Prop::Scale, 0.92)])
        .set(
            ["deckNewSlide"],
            [(Prop::Opacity, 0.0), (Prop::Scale, 0.8), (Prop::Y, 12.0)],
        )
        .set(["canvasOldContent"], [(Prop::Opacity, 1.0)])
        .set(["canvasNewLayout"], [(Prop::Opacity, 0.0)])
        .step(set(checks.clone(), [(Prop::Opacity, 0.0), (Prop::Scale, 0.0)]))
        .set(["framePin"], [(Prop::Opacity, 0.0), (Prop::Scale, 0.5)])
        .set(["pulseRing"], [(Prop::Opacity, 0.0), (Prop::Scale, 0.0)])
        .set(["planHighlight"], [(Prop::X, 0.0), (Prop::Y, 0.0)]);
    for (i, &frame) in MASONRY[0].iter().enumerate() {
        seq = seq
            .set([format!("frameRect{}", i + 1)], rect_props(frame))
            .set([format!("frameHandle{}", i + 1)], handle_props(frame));
    }
    seq = seq
        .hold(1.0)
        // 2: modal opens
        .label("openModal")
        .step(
            to(["modalView"], [(Prop::Opacity, 1.0), (Prop::Scale, 1.0)], 0.6)
                .ease(Ease::OutBack(1.2)),
        )
        // 3: asset checks pop in
        .label("checkAssets")
        .step(
            to(checks, [(Prop::Opacity, 1.0), (Prop::Scale, 1.0)], 0.15)
                .stagger(0.04)
                .ease(Ease::OutBack(2.0)),
        );

    // 4: three shuffles, each cascading the frames into the next preset
    for (n, preset) in MASONRY.iter().enumerate().skip(1) {
        let label = format!("shuffle{n}");
        seq = seq
            .label(label.clone())
            .step(
                to(["btnShuffleBg"], [(Prop::ScaleX, 0.92), (Prop::ScaleY, 0.95)], 0.12)
                    .ease(Ease::InCubic),
            )
            .step(
                to(["btnShuffleBg"], [(Prop::ScaleX, 1.0), (Prop::ScaleY, 1.0)], 0.15)
                    .ease(Ease::OutBack(2.0)),
            );
        for (i, &frame) in preset.iter().enumerate() {
            seq = seq.step(
                to([format!("frameRect{}", i + 1)], rect_props(frame), 0.5)
                    .ease(Ease::InOutCubic)
                    .at(cascade(&label, i)),
            );
        }
        for (i, &frame) in preset.iter().enumerate() {
            seq = seq.step(
                to([format!("frameHandle{}", i + 1)], handle_props(frame), 0.5)
                    .ease(Ease::InOutCubic)
                    .at(cascade(&label, i)),
            );
        }
        seq = seq.hold(0.4);
    }

    let seq = seq
        // 5: pin badge
        .label("pinFrame")
        .step(
            to(["framePin"], [(Prop::Opacity, 1.0), (Prop::Scale, 1.0)], 0.35)
                .ease(Ease::OutBack(2.0)),
        )
        // 6: insert press with pulse ring
        .label("insert")
        .step(
            to(["btnInsertBg"], [(Prop::ScaleX, 0.93), (Prop::ScaleY, 0.94)], 0.12)
                .ease(Ease::InCubic),
        )
        .step(
            to(["btnInsertBg"], [(Prop::ScaleX, 1.0), (Prop::ScaleY, 1.0)], 0.15)
                .ease(Ease::OutBack(2.0)),
        )
        .step(
            to(["pulseRing"], [(Prop::Opacity, 0.6), (Prop::Scale, 1.0)], 0.1)
                .at(Position::overlap(0.15)),
        )
        .step(
            to(["pulseRing"], [(Prop::Opacity, 0.0), (Prop::Scale, 2.5)], 0.5)
                .ease(Ease::OutCubic),
        )
        // 7: modal closes
        .label("closeModal")
        .step(
            to(["modalView"], [(Prop::Opacity, 0.0), (Prop::Scale, 0.95)], 0.4)
                .ease(Ease::InCubic),
        )
        // 8: new slide lands on the deck and the canvas
        .label("newSlide")
        .step(
            to(["canvasOldContent"], [(Prop::Opacity, 0.0)], 0.35)
                .ease(Ease::InCubic)
                .at(Position::label("newSlide")),
        )
        .step(
            to(["canvasNewLayout"], [(Prop::Opacity, 1.0)], 0.45)
                .ease(Ease::OutCubic)
                .at(Position::label_offset("newSlide", 0.2)),
        )
        .step(
            to(
                ["deckNewSlide"],
                [(Prop::Opacity, 1.0), (Prop::Scale, 1.0), (Prop::Y, 0.0)],
                0.45,
            )
            .ease(Ease::OutBack(1.5))
            .at(Position::label_offset("newSlide", 0.1)),
        )
        .hold(1.0)
        .step(to(["deckNewSlide"], [(Prop::Opacity, 0.0)], 0.5))
        .step(to(["canvasNewLayout"], [(Prop::Opacity, 0.0)], 0.4).at(Position::with_prev()))
        .step(
            to(["canvasOldContent"], [(Prop::Opacity, 1.0)], 0.4)
                .at(Position::with_prev_offset(0.1)),
        )
        .build();

    let mut targets = Targets::default()
        .one("modalView", &[(Prop::Opacity, 0.0), (Prop::Scale, 0.92)])
        .one(
            "deckNewSlide",
            &[(Prop::Opacity, 0.0), (Prop::Scale, 0.8), (Prop::Y, 12.0)],
        )
        .one("canvasOldContent", &[(Prop::Opacity, 1.0)])
        .one("canvasNewLayout", &[(Prop::Opacity, 0.0)])
        .add(
            &numbered("assetCheck", 1..=ASSETS),
            &[(Prop::Opacity, 0.0), (Prop::Scale, 0.0)],
        )
        .one("framePin", &[(Prop::Opacity, 0.0), (Prop::Scale, 0.5)])
        .one("pulseRing", &[(Prop::Opacity, 0.0), (Prop::Scale, 0.0)])
        .one("planHighlight", &[(Prop::X, 0.0), (Prop::Y, 0.0)])
        .one("btnShuffleBg", &[(Prop::ScaleX, 1.0), (Prop::ScaleY, 1.0)])
        .one("btnInsertBg", &[(Prop::ScaleX, 1.0), (Prop::ScaleY, 1.0)]);
    for (i, &frame) in MASONRY[0].iter().enumerate() {
        targets = targets
            .one(&format!("frameRect{}", i + 1), &rect_props(frame))
            .one(&format!("frameHandle{}", i + 1), &handle_props(frame));
    }

    SceneDef {
        name: "magic-layout".to_string(),
        targets: targets.into_map(),
        sequence: seq,
    }
}

/// Frame `i` of a shuffle starts `0.30 + i * 0.04` s after the shuffle label.
fn cascade(label: &str, i: usize) -> Position {
    Position::label_offset(label, 0.3 + i as f64 * 0.04)
}
