//! Platform abstraction layer
//!
//! The simulation core never touches hardware. A mode run is handed these
//! collaborators by its caller:
//! - Input (tilt sensor, rotary encoder)
//! - Display list
//! - Indicator lights
//! - Tick pacing

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec3;

use crate::lights::IndicatorFrame;
use crate::sim::{Glyph, Rect, RenderOp, SHIELD_ID, TickInput};

/// Tilt and rotary readings, sampled once per tick
pub trait InputSource {
    /// Current acceleration; only x and y are used
    fn acceleration(&mut self) -> Vec3;

    /// Rotary detents since the previous call (-1, 0 or +1)
    fn rotary_step(&mut self) -> i8;

    fn sample(&mut self) -> TickInput {
        TickInput {
            accel: self.acceleration(),
            rotary: self.rotary_step(),
        }
    }
}

/// Receives display-list operations in emission order
pub trait RenderSink {
    fn apply(&mut self, op: &RenderOp);
}

/// Four-way RGB indicator
pub trait IndicatorLights {
    fn show(&mut self, frame: &IndicatorFrame);
}

/// Paces ticks against wall-clock time
pub trait Pacer {
    fn wait_tick(&mut self, period_ms: u64);
}

/// One live display object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayObject {
    pub glyph: Glyph,
    pub rect: Rect,
    pub visible: bool,
}

/// In-memory display list mirroring what a screen would show
#[derive(Debug, Default)]
pub struct DisplayList {
    objects: BTreeMap<u32, DisplayObject>,
    /// Updates or removals for ids that were never created
    pub stray_ops: usize,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: u32) -> Option<&DisplayObject> {
        self.objects.get(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of live objects drawn with `pred`
    pub fn count(&self, pred: impl Fn(&Glyph) -> bool) -> usize {
        self.objects.values().filter(|o| pred(&o.glyph)).count()
    }
}

impl RenderSink for DisplayList {
    fn apply(&mut self, op: &RenderOp) {
        match *op {
            RenderOp::Create {
                id,
                glyph,
                rect,
                visible,
            } => {
                self.objects.insert(
                    id,
                    DisplayObject {
                        glyph,
                        rect,
                        visible,
                    },
                );
            }
            RenderOp::Update { id, pos, visible } => match self.objects.get_mut(&id) {
                Some(object) => {
                    object.rect.pos = pos;
                    object.visible = visible;
                }
                None => self.stray_ops += 1,
            },
            RenderOp::Remove { id } => {
                // The shield is removed unconditionally before every redraw
                if self.objects.remove(&id).is_none() && id != SHIELD_ID {
                    self.stray_ops += 1;
                }
            }
        }
    }
}

/// Framebuffer for four RGB lights, flushed to the log
#[derive(Debug)]
pub struct LoggedLights {
    brightness: f32,
    framebuffer: [(u8, u8, u8); 4],
    /// Frames shown so far
    pub frames: usize,
}

impl LoggedLights {
    pub fn new(brightness: f32) -> Self {
        Self {
            brightness,
            framebuffer: [(0, 0, 0); 4],
            frames: 0,
        }
    }

    pub fn framebuffer(&self) -> &[(u8, u8, u8); 4] {
        &self.framebuffer
    }
}

impl IndicatorLights for LoggedLights {
    fn show(&mut self, frame: &IndicatorFrame) {
        for (edge, color) in frame.iter() {
            self.framebuffer[edge.index()] = color.scaled_rgb(self.brightness);
        }
        self.frames += 1;
        log::debug!("Lights: {:?}", self.framebuffer);
    }
}

/// Sleeps out the remainder of each tick period
#[derive(Debug)]
pub struct ThreadPacer {
    last: Instant,
}

impl Default for ThreadPacer {
    fn default() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Pacer for ThreadPacer {
    fn wait_tick(&mut self, period_ms: u64) {
        let period = Duration::from_millis(period_ms);
        let elapsed = self.last.elapsed();
        if elapsed < period {
            thread::sleep(period - elapsed);
        }
        self.last = Instant::now();
    }
}

/// Runs ticks back to back
#[derive(Debug, Default)]
pub struct NoPacer;

impl Pacer for NoPacer {
    fn wait_tick(&mut self, _period_ms: u64) {}
}

/// Replays a fixed input script, then reports rest
#[derive(Debug, Default)]
pub struct ScriptedInput {
    script: VecDeque<TickInput>,
    current: TickInput,
}

impl ScriptedInput {
    pub fn new(script: impl IntoIterator<Item = TickInput>) -> Self {
        Self {
            script: script.into_iter().collect(),
            current: TickInput::default(),
        }
    }

    /// The same tilt on every tick
    pub fn constant(accel: Vec3) -> Self {
        Self {
            script: VecDeque::new(),
            current: TickInput { accel, rotary: 0 },
        }
    }
}

impl InputSource for ScriptedInput {
    fn acceleration(&mut self) -> Vec3 {
        if let Some(next) = self.script.pop_front() {
            self.current = next;
        }
        self.current.accel
    }

    fn rotary_step(&mut self) -> i8 {
        let step = self.current.rotary;
        self.current.rotary = 0;
        step
    }
}

/// Raw reading pushed by a sensor thread
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Tilt(Vec3),
    Rotary(i8),
}

/// Sensor-thread end of a `ChannelInput`
pub type InputSender = mpsc::Sender<InputEvent>;

/// Input fed by a producer thread
///
/// Each tick drains the queue: the newest tilt wins and rotary detents are
/// summed, then reduced to a single step.
#[derive(Debug)]
pub struct ChannelInput {
    rx: mpsc::Receiver<InputEvent>,
    accel: Vec3,
    rotary: i32,
}

impl ChannelInput {
    pub fn channel() -> (InputSender, Self) {
        let (tx, rx) = mpsc::channel();
        (
            tx,
            Self {
                rx,
                accel: Vec3::ZERO,
                rotary: 0,
            },
        )
    }

    fn drain(&mut self) {
        for event in self.rx.try_iter() {
            match event {
                InputEvent::Tilt(accel) => self.accel = accel,
                InputEvent::Rotary(step) => self.rotary += i32::from(step),
            }
        }
    }
}

impl InputSource for ChannelInput {
    fn acceleration(&mut self) -> Vec3 {
        self.drain();
        self.accel
    }

    fn rotary_step(&mut self) -> i8 {
        let step = self.rotary.signum() as i8;
        self.rotary = 0;
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_scripted_input_replays_then_rests() {
        let mut input = ScriptedInput::new([
            TickInput {
                accel: Vec3::X,
                rotary: 1,
            },
            TickInput {
                accel: Vec3::Y,
                rotary: 0,
            },
        ]);
        assert_eq!(input.sample().rotary, 1);
        assert_eq!(input.sample().accel, Vec3::Y);
        let rest = input.sample();
        assert_eq!(rest.accel, Vec3::Y);
        assert_eq!(rest.rotary, 0);
    }

    #[test]
    fn test_channel_input_takes_latest_tilt() {
        let (tx, mut input) = ChannelInput::channel();
        tx.send(InputEvent::Tilt(Vec3::X)).unwrap();
        tx.send(InputEvent::Rotary(1)).unwrap();
        tx.send(InputEvent::Rotary(1)).unwrap();
        tx.send(InputEvent::Tilt(Vec3::NEG_Y)).unwrap();

        let sample = input.sample();
        assert_eq!(sample.accel, Vec3::NEG_Y);
        assert_eq!(sample.rotary, 1);

        // Nothing new: tilt holds, rotary resets
        let sample = input.sample();
        assert_eq!(sample.accel, Vec3::NEG_Y);
        assert_eq!(sample.rotary, 0);
    }

    #[test]
    fn test_display_list_tracks_ops() {
        let mut list = DisplayList::new();
        list.apply(&RenderOp::Create {
            id: 20,
            glyph: Glyph::Food,
            rect: Rect::square(Vec2::new(10.0, 10.0), 2.0),
            visible: true,
        });
        list.apply(&RenderOp::Update {
            id: 20,
            pos: Vec2::new(11.0, 10.0),
            visible: false,
        });
        assert_eq!(list.get(20).unwrap().rect.pos, Vec2::new(11.0, 10.0));
        assert!(!list.get(20).unwrap().visible);

        list.apply(&RenderOp::Remove { id: 20 });
        list.apply(&RenderOp::Remove { id: 21 });
        assert!(list.is_empty());
        assert_eq!(list.stray_ops, 1);
    }

    #[test]
    fn test_logged_lights_scale_brightness() {
        let mut lights = LoggedLights::new(0.5);
        lights.show(&IndicatorFrame::uniform(crate::lights::IndicatorColor::White));
        assert_eq!(lights.framebuffer()[0], (128, 128, 128));
        assert_eq!(lights.frames, 1);
    }
}
