use common::{Event, RoomId};
use indexmap::IndexMap;
use std::collections::{HashSet, VecDeque};

use crate::view::{ChatView, RoomEntry};

// Upper bound on remembered message ids for the visible log
const RENDERED_WINDOW: usize = 512;

pub struct RoomStateManager {
    user: String,
    active: RoomId,
    rooms: IndexMap<RoomId, String>,
    rendered: HashSet<String>,
    rendered_order: VecDeque<String>,
}

impl RoomStateManager {
    pub fn new(user: &str) -> Self {
        let mut rooms = IndexMap::new();
        rooms.insert(RoomId::main(), String::from("Main Chat"));

        Self {
            user: user.to_string(),
            active: RoomId::main(),
            rooms,
            rendered: HashSet::new(),
            rendered_order: VecDeque::new(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn active(&self) -> &RoomId {
        &self.active
    }

    pub fn is_active(&self, room: &RoomId) -> bool {
        &self.active == room
    }

    /// Lists the direct-message room shared with `peer`. Returns `true` if
    /// the room list changed.
    pub fn add_peer(&mut self, peer: &str) -> bool {
        if peer.is_empty() || peer == self.user {
            return false;
        }

        let room = RoomId::direct(&self.user, peer);
        if self.rooms.contains_key(&room) {
            return false;
        }

        self.rooms.insert(room, format!("Chat with {peer}"));

        true
    }

    /// Makes `room` the active room. The log is cleared and the returned
    /// `switch-room` event asks the server for the room's history. Switching
    /// to the room that is already active does nothing.
    pub fn switch_to(&mut self, room: RoomId, view: &mut dyn ChatView) -> Option<Event> {
        if self.active == room {
            return None;
        }

        if !self.rooms.contains_key(&room) {
            let label = room.to_string();
            self.rooms.insert(room.clone(), label);
        }

        self.active = room;

        Some(self.rejoin(view))
    }

    /// Clears the log and re-requests the active room's history.
    pub fn rejoin(&mut self, view: &mut dyn ChatView) -> Event {
        self.forget_rendered();
        view.clear_log();
        view.render_room_list(self.entries());

        Event::switch_room(&self.active)
    }

    /// Records a rendered message id. Returns `false` if it is already in
    /// the visible log.
    pub fn note_rendered(&mut self, id: &str) -> bool {
        if self.rendered.contains(id) {
            return false;
        }

        if self.rendered_order.len() == RENDERED_WINDOW {
            if let Some(oldest) = self.rendered_order.pop_front() {
                self.rendered.remove(&oldest);
            }
        }

        self.rendered.insert(id.to_string());
        self.rendered_order.push_back(id.to_string());

        true
    }

    fn forget_rendered(&mut self) {
        self.rendered.clear();
        self.rendered_order.clear();
    }

    pub fn entries(&self) -> Vec<RoomEntry> {
        self.rooms
            .iter()
            .map(|(id, label)| RoomEntry {
                id: id.clone(),
                label: label.clone(),
                selected: *id == self.active,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{Bubble, TextType, UserEntry};

    #[derive(Default)]
    struct CountingView {
        clears: usize,
        room_lists: Vec<Vec<RoomEntry>>,
    }

    impl ChatView for CountingView {
        fn render_bubble(&mut self, _bubble: Bubble) {}

        fn clear_log(&mut self) {
            self.clears += 1;
        }

        fn render_user_list(&mut self, _users: Vec<UserEntry>) {}

        fn render_room_list(&mut self, rooms: Vec<RoomEntry>) {
            self.room_lists.push(rooms);
        }

        fn render_typing(&mut self, _users: Vec<String>) {}

        fn notify(&mut self, _notice: TextType) {}
    }

    #[test]
    fn switching_twice_clears_once() {
        let mut rooms = RoomStateManager::new("alice");
        let mut view = CountingView::default();
        let dm = RoomId::direct("alice", "bob");

        let first = rooms.switch_to(dm.clone(), &mut view);
        let second = rooms.switch_to(dm.clone(), &mut view);

        assert_eq!(first, Some(Event::switch_room(&dm)));
        assert_eq!(second, None);
        assert_eq!(view.clears, 1);
        assert_eq!(rooms.active(), &dm);
    }

    #[test]
    fn switching_to_active_main_is_noop() {
        let mut rooms = RoomStateManager::new("alice");
        let mut view = CountingView::default();

        assert!(rooms.switch_to(RoomId::main(), &mut view).is_none());
        assert_eq!(view.clears, 0);
        assert!(view.room_lists.is_empty());
    }

    #[test]
    fn rejoin_always_clears_and_requests_history() {
        let mut rooms = RoomStateManager::new("alice");
        let mut view = CountingView::default();

        assert_eq!(rooms.rejoin(&mut view), Event::switch_room(&RoomId::main()));
        assert_eq!(rooms.rejoin(&mut view), Event::switch_room(&RoomId::main()));
        assert_eq!(view.clears, 2);
    }

    #[test]
    fn peers_get_direct_rooms_after_main() {
        let mut rooms = RoomStateManager::new("bob");
        assert!(rooms.add_peer("carol"));
        assert!(rooms.add_peer("alice"));
        assert!(!rooms.add_peer("alice"));
        assert!(!rooms.add_peer("bob"));
        assert!(!rooms.add_peer(""));

        let entries = rooms.entries();
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["main", "bob-carol", "alice-bob"]);
        assert_eq!(entries[2].label, "Chat with alice");
        assert!(entries[0].selected);
    }

    #[test]
    fn selection_follows_switch() {
        let mut rooms = RoomStateManager::new("bob");
        let mut view = CountingView::default();
        rooms.add_peer("alice");
        rooms.switch_to(RoomId::direct("alice", "bob"), &mut view);

        let listed = view.room_lists.last().unwrap();
        let selected: Vec<&str> = listed
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(selected, vec!["alice-bob"]);
    }

    #[test]
    fn rendered_ids_reset_with_the_log() {
        let mut rooms = RoomStateManager::new("alice");
        let mut view = CountingView::default();

        assert!(rooms.note_rendered("m-1"));
        assert!(!rooms.note_rendered("m-1"));

        rooms.rejoin(&mut view);
        assert!(rooms.note_rendered("m-1"));
    }
}
