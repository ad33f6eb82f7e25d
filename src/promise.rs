//! The settlable [`Promise`] and its chaining combinators.

use std::{fmt, sync::Arc};

use crossbeam::channel;
use log::{debug, trace, warn};
use parking_lot::Mutex;

use crate::{spawn, Error};

type SuccessHandler<T> = Box<dyn FnOnce(T) + Send + 'static>;
type FailureHandler = Box<dyn FnOnce(Error) + Send + 'static>;

/// Handlers queued while a promise is pending, in registration order.
struct Handlers<T> {
    on_success: Vec<SuccessHandler<T>>,
    on_failure: Vec<FailureHandler>,
}

impl<T> Default for Handlers<T> {
    fn default() -> Self {
        Self {
            on_success: Vec::new(),
            on_failure: Vec::new(),
        }
    }
}

enum State<T> {
    Pending(Handlers<T>),
    Settled(Result<T, Error>),
}

struct Inner<T> {
    /// Guards the outcome and the handler queues. Never held while user code runs.
    state: Mutex<State<T>>,
    /// Held for a whole handler pass, serializing every pass over this promise.
    dispatch: Mutex<()>,
}

/// A value that becomes available on another thread.
///
/// Cloning is cheap and every clone observes the same settlement.
///
/// # Examples
///
/// ```
/// use promise_kit::{Error, Promise};
///
/// let doubled = Promise::from_fn(|| Ok::<_, Error>(21)).then(|n| Ok(n * 2));
/// assert_eq!(doubled.wait().unwrap(), 42);
/// ```
pub struct Promise<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settled = matches!(*self.inner.state.lock(), State::Settled(_));
        f.debug_struct("Promise").field("settled", &settled).finish()
    }
}

/// A promise built without a producer is already settled with `T::default()`.
impl<T> Default for Promise<T>
where
    T: Clone + Default + Send + 'static,
{
    fn default() -> Self {
        Promise::resolved(T::default())
    }
}

impl<T> Promise<T>
where
    T: Clone + Send + 'static,
{
    fn pending() -> Self {
        Self::with_state(State::Pending(Handlers::default()))
    }

    fn with_state(state: State<T>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                dispatch: Mutex::new(()),
            }),
        }
    }

    /// Runs `f` on its own thread and returns a pending promise for its outcome.
    ///
    /// If the thread cannot be started the promise settles with [`Error::Spawn`].
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<T, Error> + Send + 'static,
    {
        let promise = Self::pending();
        let producer = promise.clone();
        if let Err(err) = spawn::task(move || producer.call(f)) {
            promise.settle(Err(Error::Spawn(Arc::new(err))));
        }
        promise
    }

    /// Like [`Promise::from_fn`] with `arg` bound as the producer's argument.
    pub fn from_fn_with<A, F>(arg: A, f: F) -> Self
    where
        A: Send + 'static,
        F: FnOnce(A) -> Result<T, Error> + Send + 'static,
    {
        Self::from_fn(move || f(arg))
    }

    /// An already fulfilled promise. No thread is started.
    pub fn resolved(value: T) -> Self {
        Self::with_state(State::Settled(Ok(value)))
    }

    /// An already rejected promise. No thread is started.
    pub fn rejected(err: impl Into<Error>) -> Self {
        Self::with_state(State::Settled(Err(err.into())))
    }

    /// The outcome, or `None` while pending. Never blocks on the producer.
    pub fn resolve(&self) -> Option<Result<T, Error>> {
        match &*self.inner.state.lock() {
            State::Pending(_) => None,
            State::Settled(outcome) => Some(outcome.clone()),
        }
    }

    /// Whether the promise has left the pending state.
    pub fn is_settled(&self) -> bool {
        matches!(*self.inner.state.lock(), State::Settled(_))
    }

    /// Blocks the calling thread until the promise settles.
    pub fn wait(&self) -> Result<T, Error> {
        if let Some(outcome) = self.resolve() {
            return outcome;
        }

        let (tx, rx) = channel::bounded(1);
        let on_failure = tx.clone();
        self.then(move |value| {
            let _ = tx.send(Ok(value));
            Ok(())
        });
        self.catch(move |err| {
            let _ = on_failure.send(Err(err));
            Ok(())
        });
        rx.recv().unwrap_or(Err(Error::Abandoned))
    }

    /// Derives a promise from the value this one fulfills with.
    ///
    /// A rejection skips `f` and passes through to the derived promise unchanged.
    /// Chains registered while pending run in registration order; once settled,
    /// each call dispatches on its own thread.
    pub fn then<X, F>(&self, f: F) -> Promise<X>
    where
        X: Clone + Send + 'static,
        F: FnOnce(T) -> Result<X, Error> + Send + 'static,
    {
        let mut state = self.inner.state.lock();
        let outcome = match &mut *state {
            State::Pending(handlers) => {
                let derived = Promise::pending();
                let on_success = derived.clone();
                handlers
                    .on_success
                    .push(Box::new(move |value| on_success.call(move || f(value))));
                let on_failure = derived.clone();
                handlers
                    .on_failure
                    .push(Box::new(move |err| on_failure.settle(Err(err))));
                return derived;
            }
            State::Settled(outcome) => outcome.clone(),
        };
        drop(state);

        debug!(target: "promise_kit", "then on settled promise, dispatching");
        let source = self.clone();
        Promise::from_fn(move || {
            let _pass = source.inner.dispatch.lock();
            f(outcome?)
        })
    }

    /// Derives a promise from the error this one rejects with.
    ///
    /// If this promise is already fulfilled the derived promise is returned
    /// fulfilled with `X::default()` and `f` never runs. If it fulfills later,
    /// the derived promise stays pending.
    pub fn catch<X, F>(&self, f: F) -> Promise<X>
    where
        X: Clone + Default + Send + 'static,
        F: FnOnce(Error) -> Result<X, Error> + Send + 'static,
    {
        let mut state = self.inner.state.lock();
        let err = match &mut *state {
            State::Pending(handlers) => {
                let derived = Promise::pending();
                let on_failure = derived.clone();
                handlers
                    .on_failure
                    .push(Box::new(move |err| on_failure.call(move || f(err))));
                return derived;
            }
            State::Settled(Ok(_)) => return Promise::resolved(X::default()),
            State::Settled(Err(err)) => err.clone(),
        };
        drop(state);

        debug!(target: "promise_kit", "catch on rejected promise, dispatching");
        let source = self.clone();
        Promise::from_fn(move || {
            let _pass = source.inner.dispatch.lock();
            f(err)
        })
    }

    fn call<F>(&self, f: F)
    where
        F: FnOnce() -> Result<T, Error>,
    {
        let outcome = f();
        self.settle(outcome);
    }

    fn settle(&self, outcome: Result<T, Error>) {
        let handlers = {
            let mut state = self.inner.state.lock();
            let handlers = match &mut *state {
                State::Pending(handlers) => std::mem::take(handlers),
                State::Settled(_) => {
                    warn!(target: "promise_kit", "promise settled twice, keeping first outcome");
                    return;
                }
            };
            *state = State::Settled(outcome.clone());
            handlers
        };

        let _pass = self.inner.dispatch.lock();
        match outcome {
            Ok(value) => {
                trace!(target: "promise_kit", "fulfilled, running {} handlers", handlers.on_success.len());
                for handler in handlers.on_success {
                    handler(value.clone());
                }
            }
            Err(err) => {
                trace!(target: "promise_kit", "rejected, running {} handlers", handlers.on_failure.len());
                for handler in handlers.on_failure {
                    handler(err.clone());
                }
            }
        }
    }
}
