pub mod event_proptest;
pub mod presence_proptest;
