//! Awaiting a [`Promise`] from async code.
//!
//! ```
//! use promise_kit::{Error, Promise};
//! use futures::executor::block_on;
//!
//! let greeting = Promise::from_fn(|| Ok::<_, Error>("Hi".to_string()));
//! assert_eq!(block_on(async { greeting.await }).unwrap(), "Hi");
//! ```

use std::{
    future::{Future, IntoFuture},
    pin::Pin,
    sync::Arc,
    task::{Context, Poll, Waker},
};

use parking_lot::Mutex;

use crate::{Error, Promise};

/// Future returned by awaiting a [`Promise`].
#[derive(Debug)]
pub struct Settled<T> {
    promise: Promise<T>,
    slot: Option<Arc<Mutex<Slot<T>>>>,
}

#[derive(Debug)]
struct Slot<T> {
    value: Option<Result<T, Error>>,
    waker: Option<Waker>,
}

impl<T> Slot<T> {
    fn fill(slot: &Mutex<Slot<T>>, outcome: Result<T, Error>) {
        let waker = {
            let mut slot = slot.lock();
            slot.value = Some(outcome);
            slot.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake()
        }
    }
}

impl<T> IntoFuture for Promise<T>
where
    T: Clone + Send + 'static,
{
    type Output = Result<T, Error>;
    type IntoFuture = Settled<T>;

    fn into_future(self) -> Self::IntoFuture {
        Settled {
            promise: self,
            slot: None,
        }
    }
}

impl<T> Future for Settled<T>
where
    T: Clone + Send + 'static,
{
    type Output = Result<T, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Some(slot) = &this.slot {
            let mut slot = slot.lock();
            return match slot.value.take() {
                Some(outcome) => Poll::Ready(outcome),
                None => {
                    slot.waker = Some(cx.waker().clone());
                    Poll::Pending
                }
            };
        }

        if let Some(outcome) = this.promise.resolve() {
            return Poll::Ready(outcome);
        }

        // First pending poll: hook both branches once, they share the slot.
        let slot = Arc::new(Mutex::new(Slot {
            value: None,
            waker: Some(cx.waker().clone()),
        }));
        let on_success = slot.clone();
        this.promise.then(move |value| {
            Slot::fill(&on_success, Ok(value));
            Ok(())
        });
        let on_failure = slot.clone();
        this.promise.catch(move |err| {
            Slot::fill(&on_failure, Err(err));
            Ok(())
        });
        this.slot = Some(slot);
        Poll::Pending
    }
}
