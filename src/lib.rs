//! Reservation policy sandbox: a deterministic multi-class society simulation.

pub mod simulation;
