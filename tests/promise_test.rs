#[cfg(test)]
mod tests {
    use promise_kit::{Error, Promise};
    use std::{
        sync::{
            atomic::{AtomicBool, AtomicUsize, Ordering},
            Arc, Mutex,
        },
        thread,
        time::Duration,
    };

    fn delayed<T: Clone + Send + 'static>(ms: u64, outcome: Result<T, Error>) -> Promise<T> {
        Promise::from_fn(move || {
            thread::sleep(Duration::from_millis(ms));
            outcome
        })
    }

    #[test]
    fn test_from_fn_resolves() {
        let p = delayed(10, Ok("hello world".to_string()));
        assert!(p.resolve().is_none());
        thread::sleep(Duration::from_millis(50));
        assert_eq!(p.resolve().unwrap().unwrap(), "hello world");
    }

    #[test]
    fn test_from_fn_rejects() {
        let p = delayed::<String>(10, Err(Error::msg("hello world")));
        assert!(p.resolve().is_none());
        let err = p.wait().unwrap_err();
        assert_eq!(err.to_string(), "hello world");
    }

    #[test]
    fn test_from_fn_with_binds_argument() {
        let p = Promise::from_fn_with(20, |n: i32| Ok(n + 1));
        assert_eq!(p.wait().unwrap(), 21);
    }

    #[test]
    fn test_settled_constructors() {
        let ok = Promise::resolved("hello world!");
        assert!(ok.is_settled());
        assert_eq!(ok.resolve().unwrap().unwrap(), "hello world!");

        let err = Promise::<String>::rejected("hello world");
        assert!(err.is_settled());
        assert_eq!(err.resolve().unwrap().unwrap_err().to_string(), "hello world");
    }

    #[test]
    fn test_resolve_is_stable_after_settlement() {
        let p = delayed(5, Ok(7u32));
        p.wait().unwrap();
        for _ in 0..5 {
            assert_eq!(p.resolve().unwrap().unwrap(), 7);
        }
    }

    #[test]
    fn test_then_error_passthrough() {
        let called = Arc::new(AtomicBool::new(false));
        let p = delayed::<String>(10, Err(Error::msg("hello world")));
        let flag = called.clone();
        let x = p.then(move |_| {
            flag.store(true, Ordering::SeqCst);
            Ok(0)
        });
        assert_eq!(x.wait().unwrap_err().to_string(), "hello world");
        assert!(!called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_then_pending_runs_in_order() {
        let p = delayed(10, Ok("hello world".to_string()));
        let order = Arc::new(Mutex::new(vec![]));

        let first = order.clone();
        p.then(move |s| {
            assert_eq!(s, "hello world");
            first.lock().unwrap().push(1);
            Ok(())
        });
        let second = order.clone();
        let y = p.then(move |s| {
            assert_eq!(s, "hello world");
            second.lock().unwrap().push(2);
            Ok(10)
        });
        let tail = y.then(|i| Ok(i * 2));

        assert_eq!(tail.wait().unwrap(), 20);
        assert_eq!(*order.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_then_on_resolved() {
        let x = Promise::resolved("hello world".to_string());
        let y = x.then(|s| {
            assert_eq!(s, "hello world");
            Ok(10)
        });
        assert_eq!(y.wait().unwrap(), 10);
    }

    #[test]
    fn test_then_on_rejected() {
        let x = Promise::<String>::rejected("hello world");
        let y = x.then(|_| Ok(10));
        assert_eq!(y.wait().unwrap_err().to_string(), "hello world");
    }

    #[test]
    fn test_then_handler_error_rejects_derived() {
        let y = Promise::resolved(1).then(|_| Err::<i32, _>(Error::msg("bad")));
        assert_eq!(y.wait().unwrap_err().to_string(), "bad");
    }

    #[test]
    fn test_catch_skipped_on_success() {
        let called = Arc::new(AtomicBool::new(false));
        let p = delayed(10, Ok("hello world".to_string()));
        let flag = called.clone();
        p.catch(move |_| {
            flag.store(true, Ordering::SeqCst);
            Ok(0)
        });
        p.wait().unwrap();
        thread::sleep(Duration::from_millis(15));
        assert!(!called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_catch_pending_runs_in_order() {
        let p = delayed::<String>(10, Err(Error::msg("hello world")));
        let order = Arc::new(Mutex::new(vec![]));

        let first = order.clone();
        p.catch(move |e| {
            assert_eq!(e.to_string(), "hello world");
            first.lock().unwrap().push(1);
            Ok(0)
        });
        let second = order.clone();
        let y = p.catch(move |e| {
            assert_eq!(e.to_string(), "hello world");
            second.lock().unwrap().push(2);
            Ok(10)
        });
        let tail = y.then(|i| Ok(i + 1));

        assert_eq!(tail.wait().unwrap(), 11);
        assert_eq!(*order.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_catch_on_resolved_passes_default_through() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();
        let y = Promise::resolved("hello world").catch(move |_| {
            flag.store(true, Ordering::SeqCst);
            Ok(5)
        });
        assert_eq!(y.resolve().unwrap().unwrap(), 0);
        thread::sleep(Duration::from_millis(15));
        assert!(!called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_catch_on_rejected() {
        let y = Promise::<String>::rejected("hello world").catch(|e| Ok(e.to_string().len()));
        assert_eq!(y.wait().unwrap(), 11);
    }

    #[test]
    fn test_catch_can_rethrow() {
        let y = Promise::<u8>::rejected("first").catch(|_| Err::<u8, _>(Error::msg("second")));
        assert_eq!(y.wait().unwrap_err().to_string(), "second");
    }

    #[test]
    fn test_every_settled_chain_runs_once() {
        let p = Promise::resolved(3usize);
        let hits = Arc::new(AtomicUsize::new(0));
        let derived: Vec<_> = (0..8)
            .map(|_| {
                let hits = hits.clone();
                p.then(move |n| {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Ok(n)
                })
            })
            .collect();
        for d in &derived {
            assert_eq!(d.wait().unwrap(), 3);
        }
        assert_eq!(hits.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn test_chains_registered_during_settlement_run_once() {
        for _ in 0..300 {
            let p = Promise::from_fn(|| Ok(1));
            let hits = Arc::new(AtomicUsize::new(0));
            let derived: Vec<_> = (0..20)
                .map(|_| {
                    let hits = hits.clone();
                    p.then(move |n| {
                        hits.fetch_add(1, Ordering::SeqCst);
                        Ok(n)
                    })
                })
                .collect();
            for d in &derived {
                assert_eq!(d.wait().unwrap(), 1);
            }
            assert_eq!(hits.load(Ordering::SeqCst), 20);
        }
    }

    #[test]
    fn test_clones_share_settlement() {
        let p = delayed(5, Ok(1));
        let q = p.clone();
        assert_eq!(p.wait().unwrap(), 1);
        assert!(q.is_settled());
    }
}
