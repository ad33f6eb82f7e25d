//! Combinators over many promises at once.

use std::{
    iter::FusedIterator,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use crossbeam::channel;

use crate::{Error, Promise};

/// Waits for every promise and returns their values in input order.
///
/// Every promise is waited on even after one rejects; the first rejection
/// observed is returned and the other values are dropped.
///
/// ```
/// use promise_kit::{all, Promise};
///
/// let values = all([Promise::resolved(1), Promise::resolved(2), Promise::resolved(3)]);
/// assert_eq!(values.unwrap(), vec![1, 2, 3]);
/// ```
pub fn all<T, I>(promises: I) -> Result<Vec<T>, Error>
where
    T: Clone + Send + 'static,
    I: IntoIterator<Item = Promise<T>>,
{
    let promises: Vec<_> = promises.into_iter().collect();
    let (tx, rx) = channel::unbounded();

    for (index, promise) in promises.iter().enumerate() {
        let on_success = tx.clone();
        promise.then(move |value| {
            let _ = on_success.send((index, Ok(value)));
            Ok(())
        });
        let on_failure = tx.clone();
        promise.catch(move |err| {
            let _ = on_failure.send((index, Err(err)));
            Ok(())
        });
    }
    drop(tx);

    let mut values = vec![None; promises.len()];
    let mut rejection = None;
    for _ in 0..promises.len() {
        let (index, outcome) = rx.recv().map_err(|_| Error::Abandoned)?;
        match outcome {
            Ok(value) => values[index] = Some(value),
            Err(err) => {
                rejection.get_or_insert(err);
            }
        }
    }

    match rejection {
        Some(err) => Err(err),
        None => Ok(values.into_iter().flatten().collect()),
    }
}

/// Returns the outcome of whichever promise settles first.
///
/// Fails with [`Error::NoPromises`] when given nothing to race.
pub fn race<T, I>(promises: I) -> Result<T, Error>
where
    T: Clone + Send + 'static,
    I: IntoIterator<Item = Promise<T>>,
{
    let promises: Vec<_> = promises.into_iter().collect();
    if promises.is_empty() {
        return Err(Error::NoPromises);
    }

    let done = Arc::new(AtomicBool::new(false));
    let (tx, rx) = channel::bounded(1);
    for promise in &promises {
        let (won, on_success) = (done.clone(), tx.clone());
        promise.then(move |value| {
            if !won.swap(true, Ordering::AcqRel) {
                let _ = on_success.send(Ok(value));
            }
            Ok(())
        });
        let (won, on_failure) = (done.clone(), tx.clone());
        promise.catch(move |err| {
            if !won.swap(true, Ordering::AcqRel) {
                let _ = on_failure.send(Err(err));
            }
            Ok(())
        });
    }
    drop(tx);

    rx.recv().unwrap_or(Err(Error::Abandoned))
}

/// Yields each promise's outcome in input order, blocking on the ones
/// still pending.
///
/// ```
/// use promise_kit::{iter, Promise};
///
/// let mut outcomes = iter([Promise::resolved("a"), Promise::rejected("b")]);
/// assert_eq!(outcomes.next().unwrap().unwrap(), "a");
/// assert_eq!(outcomes.next().unwrap().unwrap_err().to_string(), "b");
/// assert!(outcomes.next().is_none());
/// ```
pub fn iter<T, I>(promises: I) -> PromiseIter<T>
where
    T: Clone + Send + 'static,
    I: IntoIterator<Item = Promise<T>>,
{
    PromiseIter {
        remaining: promises.into_iter().collect::<Vec<_>>().into_iter(),
    }
}

/// Iterator returned by [`iter`].
#[derive(Debug)]
pub struct PromiseIter<T> {
    remaining: std::vec::IntoIter<Promise<T>>,
}

impl<T> Iterator for PromiseIter<T>
where
    T: Clone + Send + 'static,
{
    type Item = Result<T, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.remaining.next().map(|promise| promise.wait())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.remaining.size_hint()
    }
}

impl<T> ExactSizeIterator for PromiseIter<T> where T: Clone + Send + 'static {}

impl<T> FusedIterator for PromiseIter<T> where T: Clone + Send + 'static {}
