//! Message routing between clients
//!
//! The router decodes each inbound frame and, for offers, answers and ICE
//! candidates, forwards it to the connection named by `target`. It keeps no
//! state of its own; every decision is made from the registry and the frame.
//!
//! | Input                         | Action                     | Reported   |
//! |-------------------------------|----------------------------|------------|
//! | routable type, live target    | forward with `sender` set  | `debug`    |
//! | routable type, unknown target | drop                       | `debug`    |
//! | routable type, no `target`    | drop                       | `debug`    |
//! | target queue full or closed   | drop                       | `debug`    |
//! | unrecognized `type`           | drop                       | `warn`     |
//! | not an envelope               | drop                       | `warn`     |
//!
//! No case closes the sender's connection or answers the sender.

pub mod route;

pub use route::{RouteOutcome, Router};
