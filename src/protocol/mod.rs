pub mod decoder;
pub mod fields;

pub use decoder::{decode_frame, EXPECTED_FRAME_LEN};
pub use fields::{FieldSpec, FIELD_SPECS};
