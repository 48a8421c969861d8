//! Plate restriction protocol.
//!
//! # Data Flow
//! ```text
//! request line
//!     → codec.rs (decode: COMMAND p1 p2 ...)
//!     → dispatcher.rs (INGRESO | CALCULO | CONTADOR)
//!         → plate.rs (validation, weekday indicator)
//!         → counters.rs (per-client CALCULO count)
//!     → codec.rs (encode: STATUS message...)
//! response line
//! ```
//!
//! Nothing here performs I/O. The `net` module frames lines and supplies
//! the client address used as the counter key.

pub mod codec;
pub mod counters;
pub mod dispatcher;
pub mod plate;

pub use codec::{decode, decode_response, encode, CodecError, Request, Response, Status};
pub use counters::ClientCounters;
pub use dispatcher::{AccessCoin, Command, Dispatcher, FixedCoin, RandomCoin};
pub use plate::{DayIndicator, Plate, Weekday};
