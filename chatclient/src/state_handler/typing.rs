use std::{collections::HashMap, future::poll_fn, time::Duration};
use tokio::time::Instant;
use tokio_util::time::{delay_queue, DelayQueue};

pub const TYPING_WINDOW: Duration = Duration::from_secs(3);

/// Per-user "is typing" flags that clear themselves.
///
/// Every user owns at most one timer in the queue. Marking a user again
/// moves that timer instead of adding a second one.
pub struct TypingIndicatorController {
    window: Duration,
    expiries: DelayQueue<String>,
    active: HashMap<String, (delay_queue::Key, Instant)>,
}

impl TypingIndicatorController {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            expiries: DelayQueue::new(),
            active: HashMap::new(),
        }
    }

    pub fn mark_typing(&mut self, user: &str) {
        let deadline = Instant::now() + self.window;

        match self.active.get_mut(user) {
            Some((key, expires_at)) => {
                self.expiries.reset(key, self.window);
                *expires_at = deadline;
            }
            None => {
                let key = self.expiries.insert(user.to_string(), self.window);
                self.active.insert(user.to_string(), (key, deadline));
            }
        }
    }

    pub fn is_typing(&self, user: &str) -> bool {
        self.active
            .get(user)
            .is_some_and(|(_, expires_at)| Instant::now() < *expires_at)
    }

    /// Users whose window is still open, sorted by name.
    pub fn typing_users(&self) -> Vec<String> {
        let now = Instant::now();
        let mut users: Vec<String> = self
            .active
            .iter()
            .filter(|(_, (_, expires_at))| now < *expires_at)
            .map(|(user, _)| user.clone())
            .collect();
        users.sort();

        users
    }

    pub fn active_timers(&self) -> usize {
        self.expiries.len()
    }

    /// Resolves with the next user whose window ran out. Pends forever while
    /// nobody is typing.
    pub async fn next_expired(&mut self) -> Option<String> {
        if self.expiries.is_empty() {
            std::future::pending::<()>().await;
        }

        let expired = poll_fn(|cx| self.expiries.poll_expired(cx)).await?;
        let user = expired.into_inner();
        self.active.remove(&user);

        Some(user)
    }
}

impl Default for TypingIndicatorController {
    fn default() -> Self {
        Self::new(TYPING_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, timeout};

    #[tokio::test(start_paused = true)]
    async fn marks_expire_after_window() {
        let mut typing = TypingIndicatorController::default();
        typing.mark_typing("alice");
        assert!(typing.is_typing("alice"));
        assert!(!typing.is_typing("bob"));

        let expired = typing.next_expired().await;
        assert_eq!(expired.as_deref(), Some("alice"));
        assert!(!typing.is_typing("alice"));
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_marks_keep_a_single_timer() {
        let mut typing = TypingIndicatorController::new(Duration::from_secs(3));
        typing.mark_typing("alice");
        advance(Duration::from_secs(2)).await;
        typing.mark_typing("alice");
        assert_eq!(typing.active_timers(), 1);

        // Past the first deadline, inside the refreshed one
        advance(Duration::from_secs(2)).await;
        assert!(typing.is_typing("alice"));

        let expired = typing.next_expired().await;
        assert_eq!(expired.as_deref(), Some("alice"));
        assert_eq!(typing.active_timers(), 0);

        // No second clear is ever fired for the superseded timer
        let again = timeout(Duration::from_secs(30), typing.next_expired()).await;
        assert!(again.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn users_have_independent_timers() {
        let mut typing = TypingIndicatorController::new(Duration::from_secs(3));
        typing.mark_typing("alice");
        advance(Duration::from_secs(1)).await;
        typing.mark_typing("bob");
        assert_eq!(typing.active_timers(), 2);

        assert_eq!(typing.next_expired().await.as_deref(), Some("alice"));
        assert!(typing.is_typing("bob"));
        assert_eq!(typing.next_expired().await.as_deref(), Some("bob"));
    }

    #[tokio::test(start_paused = true)]
    async fn typing_users_are_sorted_and_live() {
        let mut typing = TypingIndicatorController::new(Duration::from_secs(3));
        typing.mark_typing("carol");
        advance(Duration::from_secs(2)).await;
        typing.mark_typing("bob");
        assert_eq!(typing.typing_users(), vec!["bob", "carol"]);

        advance(Duration::from_secs(2)).await;
        assert_eq!(typing.typing_users(), vec!["bob"]);
    }
}
