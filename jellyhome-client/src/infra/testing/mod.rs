//! Test doubles for the repository seam and state observation
//!
//! Public so integration tests under `tests/` can script repository
//! responses and inspect published states.

pub mod recorder;
pub mod stubs;

pub use recorder::StateRecorder;
pub use stubs::{
    RecordedCall, StubMediaRepository, StubOperation, library_view,
    media_item,
};
