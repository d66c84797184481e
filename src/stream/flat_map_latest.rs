use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use futures_util::Stream;
use pin_project_lite::pin_project;

pin_project! {
    /// Stream returned by [`flat_map_latest`].
    ///
    /// Each `Ok` item from the upstream starts a new derived future. A derived future that
    /// is still pending when the upstream produces another item is dropped. The first error,
    /// from either side, is yielded once and ends the stream.
    #[must_use = "streams do nothing unless polled"]
    pub struct FlatMapLatest<S, F, Fut> {
        #[pin]
        upstream: S,
        #[pin]
        current: Option<Fut>,
        f: F,
        upstream_done: bool,
        terminated: bool,
    }
}

pub fn flat_map_latest<S, F, Fut, T, U, E>(upstream: S, f: F) -> FlatMapLatest<S, F, Fut>
where
    S: Stream<Item = Result<T, E>>,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<U, E>>,
{
    FlatMapLatest {
        upstream,
        current: None,
        f,
        upstream_done: false,
        terminated: false,
    }
}

impl<S, F, Fut, T, U, E> Stream for FlatMapLatest<S, F, Fut>
where
    S: Stream<Item = Result<T, E>>,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<U, E>>,
{
    type Item = Result<U, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.terminated {
            return Poll::Ready(None);
        }

        loop {
            // A derived value that is already available wins over pulling the next upstream item.
            if let Some(fut) = this.current.as_mut().as_pin_mut() {
                if let Poll::Ready(output) = fut.poll(cx) {
                    this.current.set(None);
                    if output.is_err() {
                        *this.terminated = true;
                    }
                    return Poll::Ready(Some(output));
                }
            }

            if *this.upstream_done {
                return if this.current.is_none() {
                    *this.terminated = true;
                    Poll::Ready(None)
                } else {
                    Poll::Pending
                };
            }

            match this.upstream.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(item))) => {
                    this.current.set(Some((this.f)(item)));
                }
                Poll::Ready(Some(Err(err))) => {
                    this.current.set(None);
                    *this.terminated = true;
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => {
                    *this.upstream_done = true;
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.terminated {
            return (0, Some(0));
        }
        let pending = usize::from(self.current.is_some());
        if self.upstream_done {
            return (0, Some(pending));
        }
        let (_, upper) = self.upstream.size_hint();
        (0, upper.and_then(|upper| upper.checked_add(pending)))
    }
}
