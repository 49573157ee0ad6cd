// contact-relay: contact form delivery with a fallback transport
//
// This is the library root. `submission` holds the controller and its gates,
// `transport` the two HTTP clients, `db` the persisted rate-limit state, and
// `form` the status/field shell the CLI drives.

pub mod config;
pub mod db;
pub mod form;
pub mod moderation;
pub mod output;
pub mod submission;
pub mod transport;
