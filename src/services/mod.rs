pub mod booking;
pub mod calendar;
pub mod classifier;
pub mod conversation;
pub mod dialogue;
pub mod scheduling;
pub mod storage;
pub mod transcript;
pub mod validation;
