#![forbid(unsafe_code)]

pub mod anim;
pub mod anim_ease;
pub mod carousel;
pub mod clock;
pub mod compile;
pub mod counter;
pub mod dsl;
pub mod eval;
pub mod foundation;
pub mod host;
pub mod model;
pub mod player;
pub mod position;
pub mod routes;
pub mod scenes;
pub mod surface;

pub use anim::{Curve, TrackKey, Tween};
pub use anim_ease::Ease;
pub use carousel::{HeroCarousel, SceneId};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use compile::{LabelMark, Sequence, build};
pub use counter::{Counter, CounterFormat, CounterRun, run_counter};
pub use dsl::{SceneBuilder, SequenceBuilder, count, set, to};
pub use eval::{EvaluatedState, TrackState};
pub use foundation::core::{Millis, Prop, Value};
pub use foundation::error::{MotionError, MotionResult};
pub use host::{
    Engine, EngineLoader, EnvMotionGate, FallbackReason, HostState, LoadOutcome, LoadTicket,
    MotionGate, MountOutcome, REDUCED_MOTION_ENV, SceneHost,
};
pub use model::{
    CountStep, HoldStep, LabelStep, PropMap, SceneDef, SequenceDef, SetStep, StepDef, TweenStep,
};
pub use player::{PlaybackState, Player, TickReport};
pub use position::Position;
pub use routes::{NavigationKind, Page, Route, RouteKey, ScrollRestorer, Viewport};
pub use surface::{SceneTree, Surface};
