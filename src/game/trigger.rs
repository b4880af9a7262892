//! Inbound script events.
//!
//! Every event is echoed to players before it is interpreted, so the
//! game-side script can confirm delivery even for ids the session ignores.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::Position;
use crate::host::Host;

use super::rules::START_EVENT_ID;
use super::session::{Session, SessionEvent};

/// The entity that raised a script event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Display name
    pub name: String,
    /// Location when the event was raised
    pub position: Position,
}

/// A named signal from the game-side script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptEvent {
    /// Event id, e.g. `game:start`
    pub id: String,
    /// Raising entity; absent for events sent from command blocks or the console
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Actor>,
}

impl ScriptEvent {
    /// Creates an event with a source actor.
    #[must_use]
    pub fn from_actor(id: impl Into<String>, actor: Actor) -> Self {
        Self {
            id: id.into(),
            source: Some(actor),
        }
    }
}

/// Why an event did not start a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Id is not the start event
    UnknownEvent,
    /// Start event without a source entity
    MissingSource,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEvent => write!(f, "unknown_event"),
            Self::MissingSource => write!(f, "missing_source"),
        }
    }
}

/// Result of dispatching one script event.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    /// A round was (re)started at the actor's position
    Started(Vec<SessionEvent>),
    /// Echoed but otherwise ignored
    Ignored(IgnoreReason),
}

/// Echoes `event` to every player, then starts a round if it is a start
/// event with a source.
///
/// Starting is accepted in every phase and always restarts.
pub fn dispatch<H: Host>(session: &mut Session<H>, event: &ScriptEvent) -> TriggerOutcome {
    let echo = session.messages().received(&event.id);
    session.host_mut().broadcast(&echo);

    if event.id != START_EVENT_ID {
        debug!(id = %event.id, "ignoring script event");
        return TriggerOutcome::Ignored(IgnoreReason::UnknownEvent);
    }
    let Some(actor) = &event.source else {
        debug!(id = %event.id, "start event without source entity");
        return TriggerOutcome::Ignored(IgnoreReason::MissingSource);
    };

    debug!(actor = %actor.name, position = %actor.position, "start requested");
    TriggerOutcome::Started(session.start(actor.position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::messages::Messages;
    use crate::game::session::Phase;
    use crate::host::InMemoryHost;

    fn session() -> Session<InMemoryHost> {
        Session::new(InMemoryHost::new(), Messages::default())
    }

    fn actor() -> Actor {
        Actor {
            name: "Alex".to_string(),
            position: Position::new(8.0, 70.0, 8.0),
        }
    }

    #[test]
    fn test_start_event_starts_round_at_actor() {
        let mut s = session();
        let outcome = dispatch(&mut s, &ScriptEvent::from_actor("game:start", actor()));
        assert!(matches!(outcome, TriggerOutcome::Started(_)));
        assert_eq!(s.phase(), Phase::CountingDown);
        assert_eq!(s.origin(), Position::new(8.0, 70.0, 8.0));
        assert_eq!(s.host().broadcasts()[0], "received: game:start");
    }

    #[test]
    fn test_other_ids_are_echoed_and_ignored() {
        let mut s = session();
        let outcome = dispatch(&mut s, &ScriptEvent::from_actor("game:stop", actor()));
        assert_eq!(outcome, TriggerOutcome::Ignored(IgnoreReason::UnknownEvent));
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.host().broadcasts(), vec!["received: game:stop"]);
    }

    #[test]
    fn test_start_without_source_is_ignored() {
        let mut s = session();
        let event = ScriptEvent {
            id: "game:start".to_string(),
            source: None,
        };
        let outcome = dispatch(&mut s, &event);
        assert_eq!(outcome, TriggerOutcome::Ignored(IgnoreReason::MissingSource));
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.host().broadcasts(), vec!["received: game:start"]);
    }

    #[test]
    fn test_event_deserializes_without_source() {
        let event: ScriptEvent = serde_json::from_str(r#"{"id":"game:start"}"#).unwrap();
        assert!(event.source.is_none());
    }

    #[test]
    fn test_second_start_restarts() {
        let mut s = session();
        dispatch(&mut s, &ScriptEvent::from_actor("game:start", actor()));
        for _ in 0..4 {
            s.tick();
        }
        dispatch(&mut s, &ScriptEvent::from_actor("game:start", actor()));
        assert_eq!(s.round(), 2);
        assert_eq!(s.countdown_remaining(), 10);
    }
}
