//! Note event entry points.

/// A note event as delivered by the host or sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    /// Key pressed.
    NoteOn {
        /// MIDI note number
        note: u8,
        /// Attack velocity (0–127)
        velocity: u8,
    },
    /// Key released.
    NoteOff {
        /// MIDI note number
        note: u8,
        /// Release velocity (0–127)
        velocity: u8,
    },
}

/// Receiver of note events.
///
/// Events must be delivered in the order the host produced them; receivers
/// have no queue of their own.
pub trait MidiTarget {
    /// Handle a note-on.
    fn note_on(&mut self, note: u8, velocity: u8);

    /// Handle a note-off.
    fn note_off(&mut self, note: u8, velocity: u8);

    /// Dispatch a [`MidiEvent`] to [`note_on`](Self::note_on) or
    /// [`note_off`](Self::note_off).
    fn handle_event(&mut self, event: MidiEvent) {
        match event {
            MidiEvent::NoteOn { note, velocity } => self.note_on(note, velocity),
            MidiEvent::NoteOff { note, velocity } => self.note_off(note, velocity),
        }
    }
}
