mod equal_temperament;
mod scale;

pub use equal_temperament::EqualTemperament;
pub use scale::ScaleTuning;

/// MIDI note number of A4, the origin of note-relative frequencies.
pub const A4_MIDI_NOTE: i32 = 69;
