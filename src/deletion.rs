// Deletion driver: removes an already-saved window of photos from VK while
// staying under the API's request ceiling.

use crate::api::PhotoApi;
use crate::error::Result;
use crate::model::Item;
use crate::ui::report;
use indicatif::ProgressBar;
use std::time::Duration;
use tracing::{info, warn};

/// Rate limiting and retry knobs for [`delete_window`].
#[derive(Debug, Clone, PartialEq)]
pub struct DeletionPolicy {
    /// Pause before every n-th request of a window.
    pub rate_limit_every: usize,
    pub rate_limit_pause: Duration,
    /// Failures tolerated per window; the next one aborts.
    pub retry_limit: u32,
    /// First backoff wait, multiplied by `backoff_factor` after each failure.
    pub initial_wait: Duration,
    pub backoff_factor: u32,
}

impl Default for DeletionPolicy {
    // VK allows 3 requests per second
    fn default() -> Self {
        Self {
            rate_limit_every: 3,
            rate_limit_pause: Duration::from_secs(1),
            retry_limit: 5,
            initial_wait: Duration::from_secs(5),
            backoff_factor: 3,
        }
    }
}

/// Blocking pause, abstracted so tests can observe the schedule.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<S: Sleeper + ?Sized> Sleeper for &mut S {
    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration);
    }
}

/// Delete every item of `items`, in order, returning how many deletions
/// succeeded.
///
/// One error budget covers the whole window: successes do not reset the
/// failure count or the backoff wait. A failed item is not retried; the
/// loop waits out the backoff and moves on to the next one. Once more than
/// `retry_limit` deletions have failed the last error is returned.
pub fn delete_window<A, S>(
    api: &A,
    items: &[Item],
    policy: &DeletionPolicy,
    sleeper: &mut S,
    progress: &ProgressBar,
) -> Result<usize>
where
    A: PhotoApi + ?Sized,
    S: Sleeper + ?Sized,
{
    let total = items.len();
    let mut err_count = 0u32;
    let mut wait = policy.initial_wait;
    let mut deleted = 0;

    for (i, item) in items.iter().enumerate() {
        if policy.rate_limit_every > 0 && (i + 1) % policy.rate_limit_every == 0 {
            sleeper.sleep(policy.rate_limit_pause);
        }
        report(progress, format!("[{}/{}] deleting photo {}", i + 1, total, item.id));

        match api.delete(item.owner_id, item.id) {
            Ok(()) => deleted += 1,
            Err(e) => {
                err_count += 1;
                if err_count > policy.retry_limit {
                    return Err(e);
                }
                warn!(
                    photo_id = item.id,
                    error = %e,
                    failures = err_count,
                    wait_secs = wait.as_secs_f64(),
                    "failed to delete photo, backing off"
                );
                sleeper.sleep(wait);
                wait = wait.checked_mul(policy.backoff_factor).unwrap_or(Duration::MAX);
            }
        }
    }

    info!(deleted, failed = err_count, "window deleted");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::Window;
    use std::cell::RefCell;
    use std::collections::HashSet;

    /// Fails deletes for the listed ids, records every call.
    #[derive(Default)]
    struct FakeApi {
        failing: HashSet<i64>,
        fail_all: bool,
        calls: RefCell<Vec<(i64, i64)>>,
    }

    impl PhotoApi for FakeApi {
        fn list(&self, _: &str, _: i64, _: u32, _: u64) -> Result<Window> {
            unreachable!("deletion never lists")
        }

        fn delete(&self, owner_id: i64, item_id: i64) -> Result<()> {
            self.calls.borrow_mut().push((owner_id, item_id));
            if self.fail_all || self.failing.contains(&item_id) {
                return Err(Error::Api {
                    operation: "photos.delete",
                    response: 0,
                    detail: None,
                });
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSleeper(Vec<Duration>);

    impl Sleeper for RecordingSleeper {
        fn sleep(&mut self, duration: Duration) {
            self.0.push(duration);
        }
    }

    fn items(n: i64) -> Vec<Item> {
        (1..=n)
            .map(|id| Item {
                id,
                album_id: -15,
                owner_id: 42,
                sizes: Vec::new(),
                text: String::new(),
                date: 0,
            })
            .collect()
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn pauses_every_third_request() {
        let api = FakeApi::default();
        let mut sleeper = RecordingSleeper::default();
        let deleted = delete_window(
            &api,
            &items(7),
            &DeletionPolicy::default(),
            &mut sleeper,
            &ProgressBar::hidden(),
        )
        .unwrap();

        assert_eq!(deleted, 7);
        assert_eq!(sleeper.0, vec![secs(1), secs(1)]);
        assert_eq!(api.calls.borrow().len(), 7);
    }

    #[test]
    fn two_items_need_no_pause() {
        let api = FakeApi::default();
        let mut sleeper = RecordingSleeper::default();
        delete_window(
            &api,
            &items(2),
            &DeletionPolicy::default(),
            &mut sleeper,
            &ProgressBar::hidden(),
        )
        .unwrap();

        assert!(sleeper.0.is_empty());
        assert_eq!(*api.calls.borrow(), vec![(42, 1), (42, 2)]);
    }

    #[test]
    fn aborts_on_sixth_failure_with_growing_backoff() {
        let api = FakeApi {
            fail_all: true,
            ..Default::default()
        };
        let mut sleeper = RecordingSleeper::default();
        let result = delete_window(
            &api,
            &items(10),
            &DeletionPolicy::default(),
            &mut sleeper,
            &ProgressBar::hidden(),
        );

        assert!(matches!(result, Err(Error::Api { .. })));
        assert_eq!(api.calls.borrow().len(), 6);

        let backoff: Vec<Duration> = sleeper.0.iter().copied().filter(|d| *d != secs(1)).collect();
        assert_eq!(backoff, vec![secs(5), secs(15), secs(45), secs(135), secs(405)]);
        // pauses before the 3rd and 6th requests, interleaved with backoff
        assert_eq!(
            sleeper.0,
            vec![secs(5), secs(15), secs(1), secs(45), secs(135), secs(405), secs(1)]
        );
    }

    #[test]
    fn failed_item_is_skipped_not_retried() {
        let api = FakeApi {
            failing: HashSet::from([2]),
            ..Default::default()
        };
        let mut sleeper = RecordingSleeper::default();
        let deleted = delete_window(
            &api,
            &items(3),
            &DeletionPolicy::default(),
            &mut sleeper,
            &ProgressBar::hidden(),
        )
        .unwrap();

        assert_eq!(deleted, 2);
        let ids: Vec<i64> = api.calls.borrow().iter().map(|(_, id)| *id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(sleeper.0, vec![secs(5), secs(1)]);
    }

    #[test]
    fn successes_do_not_reset_budget() {
        // every other delete fails: the 6th failure is item 11
        let api = FakeApi {
            failing: (1..=20).filter(|id| id % 2 == 1).collect(),
            ..Default::default()
        };
        let mut sleeper = RecordingSleeper::default();
        let policy = DeletionPolicy {
            rate_limit_every: 0,
            ..Default::default()
        };
        let result = delete_window(&api, &items(20), &policy, &mut sleeper, &ProgressBar::hidden());

        assert!(result.is_err());
        assert_eq!(api.calls.borrow().last(), Some(&(42, 11)));
        assert_eq!(sleeper.0.last(), Some(&secs(405)));
    }

    #[test]
    fn empty_window_is_a_no_op() {
        let api = FakeApi::default();
        let mut sleeper = RecordingSleeper::default();
        let deleted = delete_window(
            &api,
            &[],
            &DeletionPolicy::default(),
            &mut sleeper,
            &ProgressBar::hidden(),
        )
        .unwrap();
        assert_eq!(deleted, 0);
        assert!(sleeper.0.is_empty());
    }
}
