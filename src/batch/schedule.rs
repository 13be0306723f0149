use std::num::NonZeroUsize;

use crate::error::{Error, Result};

pub const DEFAULT_YIELD_EVERY: usize = 5;

/// Hand control back to the host after every `every` completed items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YieldPolicy {
    every: NonZeroUsize,
}

impl YieldPolicy {
    pub fn every(every: usize) -> Result<Self> {
        NonZeroUsize::new(every)
            .map(|every| Self { every })
            .ok_or_else(|| Error::Config("yield_every must be at least 1".to_string()))
    }

    pub fn interval(&self) -> usize {
        self.every.get()
    }

    pub fn should_yield(&self, completed: usize) -> bool {
        completed > 0 && completed % self.every.get() == 0
    }
}

impl Default for YieldPolicy {
    fn default() -> Self {
        Self {
            every: NonZeroUsize::new(DEFAULT_YIELD_EVERY).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// Whatever the host does while a batch pauses: redraw, pump events, or nothing.
pub trait Yielder {
    fn pause(&mut self, completed: usize, total: usize);
}

/// Lets other threads run; the default for non-interactive hosts.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadYielder;

impl Yielder for ThreadYielder {
    fn pause(&mut self, _completed: usize, _total: usize) {
        std::thread::yield_now();
    }
}

impl<F: FnMut(usize, usize)> Yielder for F {
    fn pause(&mut self, completed: usize, total: usize) {
        self(completed, total);
    }
}

/// Drain `items` in order, reporting progress after each one and pausing per `policy`.
///
/// Stops at the first error; nothing collected so far is returned.
pub fn drive<T, I>(
    items: I,
    total: usize,
    policy: YieldPolicy,
    on_progress: &mut dyn FnMut(usize, usize),
    yielder: &mut dyn Yielder,
) -> Result<Vec<T>>
where
    I: IntoIterator<Item = Result<T>>,
{
    let mut collected = Vec::with_capacity(total);

    for item in items {
        collected.push(item?);

        let completed = collected.len();
        on_progress(completed, total);

        if completed < total && policy.should_yield(completed) {
            yielder.pause(completed, total);
        }
    }

    Ok(collected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_interval() {
        assert!(matches!(YieldPolicy::every(0), Err(Error::Config(_))));
        assert_eq!(YieldPolicy::default().interval(), DEFAULT_YIELD_EVERY);
    }

    #[test]
    fn pauses_on_cadence_but_not_after_last_item() {
        let items = (0..7).map(Ok::<usize, Error>);
        let mut progress = Vec::new();
        let mut pauses = Vec::new();

        let out = drive(
            items,
            7,
            YieldPolicy::every(3).expect("policy"),
            &mut |done, total| progress.push((done, total)),
            &mut |done: usize, _total: usize| pauses.push(done),
        )
        .expect("drive");

        assert_eq!(out, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(progress.len(), 7);
        assert_eq!(progress.last(), Some(&(7, 7)));
        assert_eq!(pauses, vec![3, 6]);
    }

    #[test]
    fn stops_at_first_error() {
        let items = vec![Ok(1), Err(Error::EmptyData), Ok(3)];
        let mut progress = Vec::new();

        let result = drive(
            items,
            3,
            YieldPolicy::default(),
            &mut |done, _| progress.push(done),
            &mut ThreadYielder,
        );

        assert!(matches!(result, Err(Error::EmptyData)));
        assert_eq!(progress, vec![1]);
    }
}
