// Submission handling — data model, rate-limit gate, and the controller.
//
// The gate logic is pure (`controller::decide`) so it can be tested without
// a store or transports. `SubmissionController` wires it to the injected
// moderator, state store, and transports.

pub mod controller;
pub mod models;
pub mod rate_limit;

pub use controller::{decide, Decision, Route, SubmissionController};
pub use models::{Channel, StatusTone, Submission, SubmissionOutcome};
