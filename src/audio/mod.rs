//! Audio loading.

mod decode;

pub use decode::{DecodedAudio, decode_wav, load_reference_call, load_segment, species_from_path};
