//! Single-value channel from the dispatch thread back to a requester.
//!
//! The receiving end can block (`recv`) or be awaited as a `Future`, so both
//! synchronous callers and async handlers can wait on the same render.
//!
//! All wakeups happen when the `Sender` is dropped. `send` consumes the sender, so a
//! delivered value and a hang-up look the same to the receiver until it checks the slot.

use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Condvar, Mutex, MutexGuard},
    task::{Context, Poll, Waker},
};

/// Create a new oneshot channel.
pub fn new<T>() -> (Sender<T>, Receiver<T>) {
    let shared = Arc::new(Shared {
        inner: Mutex::new(Inner {
            value: None,
            waker: None,
            sender_alive: true,
            receiver_alive: true,
        }),
        delivered: Condvar::new(),
    });
    (
        Sender {
            shared: shared.clone(),
        },
        Receiver { shared },
    )
}

struct Shared<T> {
    inner: Mutex<Inner<T>>,
    delivered: Condvar,
}

struct Inner<T> {
    value: Option<T>,
    waker: Option<Waker>,
    sender_alive: bool,
    receiver_alive: bool,
}

impl<T> Shared<T> {
    fn lock(&self) -> Result<MutexGuard<'_, Inner<T>>, &'static str> {
        self.inner.lock().map_err(|_| "lock poisoned")
    }
}

impl<T> Inner<T> {
    /// The outcome, once there is one.
    fn outcome(&mut self) -> Option<Result<T, &'static str>> {
        match self.value.take() {
            Some(v) => Some(Ok(v)),
            None if !self.sender_alive => Some(Err("sender hung up")),
            None => None,
        }
    }
}

/// Sending half. Sending never fails; a value sent to a dropped receiver is discarded.
pub struct Sender<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Sender<T> {
    /// Returns true if the receiver has hung up, i.e. nobody is waiting for the value.
    pub fn is_cancelled(&self) -> bool {
        self.shared.lock().map_or(true, |g| !g.receiver_alive)
    }

    pub fn send(self, value: T) {
        if let Ok(mut g) = self.shared.lock() {
            if g.receiver_alive {
                g.value = Some(value);
            }
        }
        // Dropping `self` wakes the receiver.
    }
}

impl<T> Drop for Sender<T> {
    fn drop(&mut self) {
        let waker = match self.shared.lock() {
            Err(_) => None,
            Ok(mut g) => {
                g.sender_alive = false;
                g.waker.take()
            }
        };
        self.shared.delivered.notify_all();
        if let Some(w) = waker {
            w.wake();
        }
    }
}

/// Receiving half.
pub struct Receiver<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Receiver<T> {
    /// Blocks until the value arrives.
    /// Fails if the sender went away without sending.
    pub fn recv(self) -> Result<T, &'static str> {
        let mut g = self.shared.lock()?;
        loop {
            if let Some(outcome) = g.outcome() {
                return outcome;
            }
            g = match self.shared.delivered.wait(g) {
                Ok(g) => g,
                Err(_) => return Err("lock poisoned"),
            };
        }
    }
}

impl<T> Drop for Receiver<T> {
    fn drop(&mut self) {
        if let Ok(mut g) = self.shared.lock() {
            g.receiver_alive = false;
            g.value = None;
            g.waker = None;
        }
    }
}

impl<T> Future for Receiver<T> {
    type Output = Result<T, &'static str>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut g = match self.shared.lock() {
            Err(e) => return Poll::Ready(Err(e)),
            Ok(g) => g,
        };
        match g.outcome() {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                g.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::Wake;

    #[derive(Default)]
    struct CountingWaker(AtomicUsize);

    impl Wake for CountingWaker {
        fn wake(self: Arc<Self>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn poll_once<T>(
        rx: &mut Receiver<T>,
        waker: &Arc<CountingWaker>,
    ) -> Poll<Result<T, &'static str>> {
        let waker = Waker::from(waker.clone());
        let mut cx = Context::from_waker(&waker);
        Pin::new(rx).poll(&mut cx)
    }

    #[test]
    fn delivers_across_threads() {
        let (tx, rx) = new();
        std::thread::spawn(move || tx.send(42));
        assert_eq!(rx.recv(), Ok(42));
    }

    #[test]
    fn reports_a_vanished_sender() {
        let (tx, rx) = new::<u8>();
        drop(tx);
        assert_eq!(rx.recv(), Err("sender hung up"));
    }

    #[test]
    fn sender_sees_cancellation() {
        let (tx, rx) = new::<u8>();
        assert!(!tx.is_cancelled());
        drop(rx);
        assert!(tx.is_cancelled());
        tx.send(1);
    }

    #[test]
    fn polled_receiver_is_woken_by_send() {
        let waker = Arc::new(CountingWaker::default());
        let (tx, mut rx) = new();
        assert_eq!(poll_once(&mut rx, &waker), Poll::Pending);
        assert_eq!(waker.0.load(Ordering::SeqCst), 0);

        tx.send(7);
        assert_eq!(waker.0.load(Ordering::SeqCst), 1);
        assert_eq!(poll_once(&mut rx, &waker), Poll::Ready(Ok(7)));
    }

    #[test]
    fn polled_receiver_is_woken_by_hangup() {
        let waker = Arc::new(CountingWaker::default());
        let (tx, mut rx) = new::<u8>();
        assert_eq!(poll_once(&mut rx, &waker), Poll::Pending);

        drop(tx);
        assert_eq!(waker.0.load(Ordering::SeqCst), 1);
        assert_eq!(poll_once(&mut rx, &waker), Poll::Ready(Err("sender hung up")));
    }

    #[test]
    fn awaits_a_value_from_another_thread() {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let (tx, rx) = new();
        std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(10));
            tx.send("done");
        });
        assert_eq!(rt.block_on(rx), Ok("done"));
    }
}
