//! Frequency-response graph queries.
//!
//! The graph plots the cascade's magnitude response from 20 Hz to 20 kHz on
//! a log frequency axis. Vertical positions use the dB grid scale from
//! [`clavier_core::amplitude_to_graph`]: 0 dB sits at 0.4 and every
//! doubling of amplitude moves up by 1/8.

use clavier_core::amplitude_to_graph;

use crate::filter_core::InertiaFilterCore;
use crate::voice::{Filterclavier, PARAM_MODE};

/// Lowest frequency on the graph, in Hz.
pub const GRAPH_MIN_HZ: f32 = 20.0;

/// Ratio between the highest and lowest graph frequency.
pub const GRAPH_SPAN: f32 = 1000.0;

/// Number of vertical (frequency) gridlines.
const FREQ_LINES: usize = 28;

/// Legends of the horizontal lines, every other line from +24 dB down.
const DB_LEGENDS: [&str; 8] = [
    "24 dB", "12 dB", "0 dB", "-12 dB", "-24 dB", "-36 dB", "-48 dB", "-60 dB",
];

/// A single gridline of a line graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gridline {
    /// Position on the axis perpendicular to the line
    pub pos: f32,
    /// `true` for a frequency line, `false` for a level line
    pub vertical: bool,
    /// Optional label
    pub legend: Option<&'static str>,
}

/// Something that can draw line graphs for its parameters.
pub trait LineGraphProvider {
    /// Fill `data` with graph `subindex` of parameter `index`.
    ///
    /// Returns `false`, leaving `data` untouched, when there is no such
    /// graph right now.
    fn get_graph(&self, index: usize, subindex: usize, data: &mut [f32]) -> bool;

    /// Gridline `subindex` for the graph of parameter `index`, or `None` once
    /// `subindex` runs past the last line.
    fn get_gridline(&self, index: usize, subindex: usize) -> Option<Gridline>;
}

/// Frequency of point `i` out of `points`.
#[inline]
pub fn graph_frequency(i: usize, points: usize) -> f32 {
    GRAPH_MIN_HZ * libm::powf(GRAPH_SPAN, i as f32 / points as f32)
}

/// Horizontal graph position of `freq`.
#[inline]
pub fn frequency_position(freq: f32) -> f32 {
    libm::logf(freq / GRAPH_MIN_HZ) / libm::logf(GRAPH_SPAN)
}

/// Magnitude response of `core`, one value per element of `data`.
pub fn render_response(core: &InertiaFilterCore, data: &mut [f32]) {
    let points = data.len();
    for (i, value) in data.iter_mut().enumerate() {
        *value = amplitude_to_graph(core.freq_gain(graph_frequency(i, points)));
    }
}

/// Standard frequency-then-level gridlines.
///
/// Subindices 0..28 are frequency lines at 10, 20, … 90 Hz, 100 … 900 Hz,
/// 1 … 9 kHz and 10 kHz. After those come level lines 6 dB apart starting
/// at +24 dB, until they drop off the bottom of the graph.
pub fn freq_gridline(subindex: usize) -> Option<Gridline> {
    if subindex < FREQ_LINES {
        let decade = libm::powf(10.0, (subindex / 9 + 1) as f32);
        let freq = decade * (subindex % 9 + 1) as f32;
        let legend = match subindex {
            9 => Some("100 Hz"),
            18 => Some("1 kHz"),
            27 => Some("10 kHz"),
            _ => None,
        };
        return Some(Gridline {
            pos: frequency_position(freq),
            vertical: true,
            legend,
        });
    }

    let k = subindex - FREQ_LINES;
    if k >= 32 {
        return None;
    }
    let gain = 16.0 / (1u64 << k) as f32;
    let pos = amplitude_to_graph(gain);
    if pos < -1.0 {
        return None;
    }
    let legend = if k % 2 == 0 {
        DB_LEGENDS.get(k / 2).copied()
    } else {
        None
    };
    Some(Gridline {
        pos,
        vertical: false,
        legend,
    })
}

impl LineGraphProvider for Filterclavier {
    fn get_graph(&self, index: usize, subindex: usize, data: &mut [f32]) -> bool {
        if !self.core().is_active() || index != PARAM_MODE || subindex != 0 {
            return false;
        }
        render_response(self.core(), data);
        true
    }

    fn get_gridline(&self, index: usize, subindex: usize) -> Option<Gridline> {
        if !self.core().is_active() || index != PARAM_MODE {
            return None;
        }
        freq_gridline(subindex)
    }
}
