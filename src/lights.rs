//! Four-way indicator lights
//!
//! One RGB light sits beside each screen edge. The simulation decides what
//! they show through these pure functions; a platform sink pushes the frame
//! to hardware.

use serde::{Deserialize, Serialize};

use crate::sim::{Edge, EdgeSet};

/// Colors the indicator lights can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IndicatorColor {
    #[default]
    Off,
    Green,
    Red,
    Yellow,
    White,
}

impl IndicatorColor {
    /// Full-brightness RGB triple
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            IndicatorColor::Off => (0, 0, 0),
            IndicatorColor::Green => (0, 255, 0),
            IndicatorColor::Red => (255, 0, 0),
            IndicatorColor::Yellow => (255, 255, 0),
            IndicatorColor::White => (255, 255, 255),
        }
    }

    /// RGB triple scaled by `brightness` (0.0 - 1.0)
    pub fn scaled_rgb(&self, brightness: f32) -> (u8, u8, u8) {
        let b = brightness.clamp(0.0, 1.0);
        let (r, g, bl) = self.rgb();
        let scale = |c: u8| (c as f32 * b).round() as u8;
        (scale(r), scale(g), scale(bl))
    }
}

/// Colors of all four lights, indexed by edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndicatorFrame {
    colors: [IndicatorColor; 4],
}

impl IndicatorFrame {
    pub const OFF: IndicatorFrame = IndicatorFrame {
        colors: [IndicatorColor::Off; 4],
    };

    pub fn uniform(color: IndicatorColor) -> Self {
        Self { colors: [color; 4] }
    }

    pub fn get(&self, edge: Edge) -> IndicatorColor {
        self.colors[edge.index()]
    }

    pub fn set(&mut self, edge: Edge, color: IndicatorColor) {
        self.colors[edge.index()] = color;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Edge, IndicatorColor)> + '_ {
        Edge::ALL.into_iter().map(|e| (e, self.get(e)))
    }
}

/// Hint which open edges lead to the most food (green), most enemies (red)
/// or both (yellow)
pub fn direction_signal(food_max: EdgeSet, enemy_max: EdgeSet) -> IndicatorFrame {
    let mut frame = IndicatorFrame::OFF;
    for edge in Edge::ALL {
        let color = match (food_max.contains(edge), enemy_max.contains(edge)) {
            (true, true) => IndicatorColor::Yellow,
            (true, false) => IndicatorColor::Green,
            (false, true) => IndicatorColor::Red,
            (false, false) => IndicatorColor::Off,
        };
        frame.set(edge, color);
    }
    frame
}

/// Global health readout: white at 5+ lives, yellow below 5, red below 3
pub fn lives_signal(lives: u32) -> IndicatorFrame {
    let color = if lives < 3 {
        IndicatorColor::Red
    } else if lives < 5 {
        IndicatorColor::Yellow
    } else {
        IndicatorColor::White
    };
    IndicatorFrame::uniform(color)
}
