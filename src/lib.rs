//! Shark Tank - Interactive Pitch Simulation
//!
//! A founder pitches a business idea to a panel of simulated investors,
//! answers their questions and receives verdicts. The session registry in
//! [`domain::session`] tracks each pitch conversation, numbers sessions and
//! supports continue, refresh and reset.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
