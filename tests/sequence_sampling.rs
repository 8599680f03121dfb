use gala_motion::{
    Millis, Position, Prop, SceneDef, SceneTree, Sequence, SequenceBuilder, TrackKey, Value,
    build, set, to,
};

fn fixture() -> (SceneDef, Sequence) {
    let scene = SceneDef::from_json(include_str!("data/modal_scene.json")).unwrap();
    let seq = build(&scene.sequence, &scene.tree()).unwrap();
    (scene, seq)
}

fn num(seq: &Sequence, target: &str, prop: Prop, t: u64) -> f64 {
    seq.value_at(&TrackKey::new(target, prop), Millis(t))
        .and_then(|v| v.as_num())
        .unwrap()
}

fn chip(seq: &Sequence, t: u64) -> String {
    match seq.value_at(&TrackKey::new("chipCount", Prop::Text), Millis(t)) {
        Some(Value::Text(s)) => s,
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn modal_opens_and_closes() {
    let (_, seq) = fixture();
    assert_eq!(num(&seq, "modal", Prop::Opacity, 0), 0.0);
    assert_eq!(num(&seq, "modal", Prop::Opacity, 600), 1.0);
    assert_eq!(num(&seq, "modal", Prop::Opacity, 2100), 0.0);
}

#[test]
fn parallel_steps_share_the_label_start() {
    let (_, seq) = fixture();
    // scrim fades in from the label, the modal pop starts 50ms later
    assert_eq!(num(&seq, "scrim", Prop::Opacity, 500), 0.0);
    let mid = num(&seq, "scrim", Prop::Opacity, 650);
    assert!(mid > 0.0 && mid < 0.6, "scrim at 650ms = {mid}");
    assert_eq!(num(&seq, "scrim", Prop::Opacity, 800), 0.6);
    assert_eq!(num(&seq, "modal", Prop::Scale, 550), 0.92);
    assert_eq!(num(&seq, "modal", Prop::Scale, 950), 1.0);
}

#[test]
fn back_out_overshoots_before_settling() {
    let (_, seq) = fixture();
    let peak = (550..950)
        .step_by(10)
        .map(|t| num(&seq, "modal", Prop::Scale, t))
        .fold(f64::MIN, f64::max);
    assert!(peak > 1.0, "peak scale {peak}");
}

#[test]
fn counter_reports_integers_and_lands_on_its_end() {
    let (_, seq) = fixture();
    assert_eq!(chip(&seq, 0), "0 tasks");
    let mid = chip(&seq, 950);
    let n: u32 = mid.trim_end_matches(" tasks").parse().unwrap();
    assert!(n <= 12, "mid-count value {mid}");
    assert_eq!(chip(&seq, 1200), "12 tasks");
    assert_eq!(chip(&seq, 2500), "12 tasks");
}

#[test]
fn terminal_state_matches_the_last_frame() {
    let (_, seq) = fixture();
    let end = seq.terminal_state();
    assert_eq!(end, seq.sample(Millis(9_999)));
    assert_eq!(end[&TrackKey::new("modal", Prop::Opacity)], Value::Num(0.0));
    assert_eq!(end[&TrackKey::new("modal", Prop::Scale)], Value::Num(1.0));
    assert_eq!(end[&TrackKey::new("scrim", Prop::Opacity)], Value::Num(0.0));
    assert_eq!(
        end[&TrackKey::new("chipCount", Prop::Text)],
        Value::from("12 tasks")
    );
}

#[test]
fn looped_sampling_repeats_every_cycle() {
    let (_, seq) = fixture();
    let cycle = seq.cycle().0;
    for t in (0..cycle).step_by(37) {
        assert_eq!(
            seq.sample_looped(Millis(t)),
            seq.sample_looped(Millis(t + cycle)),
            "t = {t}ms"
        );
        assert_eq!(
            seq.sample_looped(Millis(t + cycle)),
            seq.sample_looped(Millis(t + 4 * cycle)),
        );
    }
    // the repeat delay holds the terminal frame
    assert_eq!(seq.sample_looped(Millis(2800)), seq.terminal_state());
}

#[test]
fn label_must_be_declared_before_use() {
    let tree = SceneTree::new().with_target("modal", [(Prop::Opacity, Value::Num(0.0))]);
    let forward = SequenceBuilder::new()
        .step(to(["modal"], [(Prop::Opacity, 1.0)], 0.5).at(Position::label("close")))
        .label("close")
        .build();
    let err = build(&forward, &tree).unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("before it is declared"), "{err}");

    let ordered = SequenceBuilder::new()
        .label("close")
        .step(to(["modal"], [(Prop::Opacity, 1.0)], 0.5).at(Position::label("close")))
        .build();
    assert!(build(&ordered, &tree).is_ok());
}

#[test]
fn rejects_unknown_targets_and_duplicate_labels() {
    let tree = SceneTree::new().with_target("modal", [(Prop::Opacity, Value::Num(0.0))]);
    let ghost = SequenceBuilder::new()
        .step(set(["ghost"], [(Prop::Opacity, 1.0)]))
        .build();
    assert!(build(&ghost, &tree).unwrap_err().is_configuration());

    let twice = SequenceBuilder::new().label("a").hold(0.1).label("a").build();
    assert!(build(&twice, &tree).unwrap_err().is_configuration());
}

#[test]
fn stagger_offsets_each_target() {
    let tree = SceneTree::new()
        .with_target("row1", [(Prop::Y, Value::Num(10.0))])
        .with_target("row2", [(Prop::Y, Value::Num(10.0))])
        .with_target("row3", [(Prop::Y, Value::Num(10.0))]);
    let def = SequenceBuilder::new()
        .step(to(["row1", "row2", "row3"], [(Prop::Y, 0.0)], 0.3).stagger(0.1))
        .build();
    let seq = build(&def, &tree).unwrap();
    let starts: Vec<u64> = seq.tweens().iter().map(|t| t.start.0).collect();
    assert_eq!(starts, vec![0, 100, 200]);
    assert_eq!(seq.duration(), Millis(500));
}
