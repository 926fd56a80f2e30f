//! Hand-gesture recognition pipeline.
//!
//! Frames go to a pluggable [`provider::LandmarkProvider`], landmark results
//! are classified into [`gesture::GestureType`]s, stabilised over time and
//! reported through a callback by a [`pipeline::DetectionSession`].

pub mod config;
pub mod gesture;
pub mod pipeline;
pub mod provider;
pub mod stabilizer;
