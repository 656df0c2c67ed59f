//! Audio effect nodes (inputs → outputs)

mod gain;
mod mixer;

pub use gain::{Gain, GainMessage};
pub use mixer::Mixer;
