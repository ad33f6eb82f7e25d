//! Fire-and-forget task threads used by producers and by the
//! already-settled dispatch paths of [`then`](crate::Promise::then) and
//! [`catch`](crate::Promise::catch).

use std::{io, thread};

use log::{error, trace};

/// Name given to every task thread.
pub(crate) const TASK_NAME: &str = "promise-task";

/// Starts `f` on its own named OS thread. The thread is detached.
pub(crate) fn task<F>(f: F) -> io::Result<()>
where
    F: FnOnce() + Send + 'static,
{
    match thread::Builder::new().name(TASK_NAME.into()).spawn(f) {
        Ok(handle) => {
            trace!(target: "promise_kit", "spawned task {:?}", handle.thread().id());
            Ok(())
        }
        Err(err) => {
            error!(target: "promise_kit", "failed to spawn {TASK_NAME}: {err}");
            Err(err)
        }
    }
}
