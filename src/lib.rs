//! Thread-backed promises.
//!
//! A [`Promise`] runs its producer on its own thread and settles exactly once,
//! either fulfilled with a value or rejected with an [`Error`]. Derived promises
//! are chained with [`Promise::then`] and [`Promise::catch`]; [`all`], [`race`]
//! and [`iter`] combine many promises at once.
//!
//! ```
//! use promise_kit::{all, Error, Promise};
//!
//! let lengths = ["one", "three"]
//!     .map(|word| Promise::from_fn_with(word, |w| Ok::<_, Error>(w.len())));
//! assert_eq!(all(lengths).unwrap(), vec![3, 5]);
//! ```
mod combinators;
mod error;
mod future;
mod promise;
mod spawn;

pub use combinators::{all, iter, race, PromiseIter};
pub use error::Error;
pub use future::Settled;
pub use promise::Promise;
