use indexmap::IndexMap;

/// Stable identifier handed to the renderer for each online user.
pub type UserHandle = u64;

/// Set of online users in the order they came online.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    users: IndexMap<String, UserHandle>,
    next_handle: UserHandle,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the user was not already online.
    pub fn online(&mut self, user: &str) -> bool {
        if user.is_empty() || self.users.contains_key(user) {
            return false;
        }

        let handle = self.next_handle;
        self.next_handle += 1;
        self.users.insert(user.to_string(), handle);

        true
    }

    pub fn offline(&mut self, user: &str) -> bool {
        self.users.shift_remove(user).is_some()
    }

    pub fn contains(&self, user: &str) -> bool {
        self.users.contains_key(user)
    }

    pub fn handle(&self, user: &str) -> Option<UserHandle> {
        self.users.get(user).copied()
    }

    pub fn snapshot(&self) -> Vec<(&str, UserHandle)> {
        self.users
            .iter()
            .map(|(user, handle)| (user.as_str(), *handle))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
