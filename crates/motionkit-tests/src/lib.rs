//! Integration test crate for MotionKit.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It drives the timeline controller the way a host view would and checks
//! the results through the core evaluation types.

#[cfg(test)]
mod scenarios;

#[cfg(test)]
mod invariants;

#[cfg(test)]
mod documents;
