pub mod home;
pub mod playback;
