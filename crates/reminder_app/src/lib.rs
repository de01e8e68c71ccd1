//! Headless front end of the Quran reminder: configuration, console
//! presentation and the command loop driving the scheduler.
pub mod platform;
