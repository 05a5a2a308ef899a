use std::sync::Arc;

use shared::domain::EventRecord;
use tracing::info;

use super::{LocalKey, LocalKeys};
use crate::{
    backend::{ClientResult, SiteBackend},
    error::ClientError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventField {
    Title,
    Date,
    Time,
    Location,
    Description,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub key: LocalKey,
    pub event: EventRecord,
}

/// Events are saved one at a time; each save replaces only its own entry.
pub struct EventsEditor {
    backend: Arc<dyn SiteBackend>,
    keys: LocalKeys,
    drafts: Vec<EventDraft>,
}

impl EventsEditor {
    pub fn new(backend: Arc<dyn SiteBackend>) -> Self {
        Self {
            backend,
            keys: LocalKeys::default(),
            drafts: Vec::new(),
        }
    }

    pub fn drafts(&self) -> &[EventDraft] {
        &self.drafts
    }

    pub async fn load(&mut self) -> ClientResult<()> {
        let events = self.backend.list_events().await?;
        self.drafts = events
            .into_iter()
            .map(|event| EventDraft {
                key: self.keys.next(),
                event,
            })
            .collect();
        Ok(())
    }

    pub fn add(&mut self) -> usize {
        self.drafts.push(EventDraft {
            key: self.keys.next(),
            event: EventRecord::default(),
        });
        self.drafts.len() - 1
    }

    pub fn update_field(
        &mut self,
        index: usize,
        field: EventField,
        value: impl Into<String>,
    ) -> ClientResult<()> {
        let value = value.into();
        let event = &mut self
            .drafts
            .get_mut(index)
            .ok_or_else(|| ClientError::no_record(index))?
            .event;
        match field {
            EventField::Title => event.title = value,
            EventField::Date => event.date = value,
            EventField::Time => event.time = value,
            EventField::Location => event.location = value,
            EventField::Description => event.description = value,
        }
        Ok(())
    }

    /// Creates or updates the event at `index` and swaps in the site's row.
    /// Returns whether the event was newly created.
    pub async fn save(&mut self, index: usize) -> ClientResult<bool> {
        let draft = self
            .drafts
            .get(index)
            .ok_or_else(|| ClientError::no_record(index))?;
        let created = draft.event.id.is_none();
        let saved = if created {
            self.backend.create_event(&draft.event).await?
        } else {
            self.backend.update_event(&draft.event).await?
        };
        info!(
            event_id = saved.id.map(|id| id.0),
            created, "events editor: event saved"
        );

        if let Some(draft) = self.drafts.get_mut(index) {
            draft.event = saved;
        }
        Ok(created)
    }

    pub async fn delete(&mut self, index: usize) -> ClientResult<()> {
        let draft = self
            .drafts
            .get(index)
            .ok_or_else(|| ClientError::no_record(index))?;
        if let Some(id) = draft.event.id {
            self.backend.delete_event(id).await?;
            info!(event_id = id.0, "events editor: event deleted");
        }
        self.drafts.remove(index);
        Ok(())
    }
}
