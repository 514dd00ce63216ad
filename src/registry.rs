//! Live sessions keyed by room id. Owned by whatever manages connections; a room's session lives
//! from `open` to `close`.
use std::collections::HashMap;
use log::info;

use crate::config::SessionConfig;
use crate::error::SessionResult;
use crate::session::{self, Opponent};

#[derive(Default)]
pub struct SessionRegistry {
    rooms: HashMap<String, Box<dyn Opponent + Send>>,
}

impl SessionRegistry {
    pub fn new() -> Self { Self::default() }

    /// Create a session for `room`, replacing any session already there.
    pub fn open(&mut self, room: &str, config: &SessionConfig) -> SessionResult<()> {
        let s = session::build(config)?;
        if self.rooms.insert(room.to_string(), s).is_some() { info!("room {} replaced", room); }
        else { info!("room {} opened", room); }
        Ok(())
    }

    pub fn get_mut(&mut self, room: &str) -> Option<&mut (dyn Opponent + Send + '_)> {
        self.rooms.get_mut(room).map(|b| b.as_mut() as &mut (dyn Opponent + Send + '_))
    }

    pub fn close(&mut self, room: &str) -> bool {
        let closed = self.rooms.remove(room).is_some();
        if closed { info!("room {} closed", room); }
        closed
    }

    pub fn len(&self) -> usize { self.rooms.len() }
    pub fn is_empty(&self) -> bool { self.rooms.is_empty() }
}
