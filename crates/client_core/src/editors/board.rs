use std::sync::Arc;

use shared::{
    domain::{normalize_initial, BoardMember},
    upload::{UploadKind, UploadLimits},
};
use tracing::info;

use super::{optional_text, parse_sequence, LocalKey, LocalKeys};
use crate::{
    backend::{ClientResult, PendingUpload, SiteBackend},
    error::ClientError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardField {
    Name,
    Position,
    Description,
    ImageUrl,
    Initial,
    Sequence,
    LinkedIn,
    Instagram,
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardDraft {
    pub key: LocalKey,
    pub member: BoardMember,
    /// Photo picked for this member, uploaded on the next save.
    pub pending_photo: Option<PendingUpload>,
}

impl BoardDraft {
    pub fn is_saved(&self) -> bool {
        self.member.id.is_some()
    }
}

/// Board members are edited as one list and saved in bulk.
pub struct BoardEditor {
    backend: Arc<dyn SiteBackend>,
    limits: UploadLimits,
    keys: LocalKeys,
    drafts: Vec<BoardDraft>,
}

impl BoardEditor {
    pub fn new(backend: Arc<dyn SiteBackend>) -> Self {
        Self::with_limits(backend, UploadLimits::default())
    }

    pub fn with_limits(backend: Arc<dyn SiteBackend>, limits: UploadLimits) -> Self {
        Self {
            backend,
            limits,
            keys: LocalKeys::default(),
            drafts: Vec::new(),
        }
    }

    pub fn drafts(&self) -> &[BoardDraft] {
        &self.drafts
    }

    pub fn members(&self) -> impl Iterator<Item = &BoardMember> {
        self.drafts.iter().map(|draft| &draft.member)
    }

    pub async fn load(&mut self) -> ClientResult<()> {
        let members = self.backend.list_board_members().await?;
        self.replace_all(members);
        Ok(())
    }

    /// Appends an empty, unsaved member at the end of the list and returns its
    /// position.
    pub fn add(&mut self) -> usize {
        let sequence = self.drafts.len() as i64 + 1;
        self.drafts.push(BoardDraft {
            key: self.keys.next(),
            member: BoardMember {
                sequence,
                ..BoardMember::default()
            },
            pending_photo: None,
        });
        self.drafts.len() - 1
    }

    pub fn update_field(
        &mut self,
        index: usize,
        field: BoardField,
        value: impl Into<String>,
    ) -> ClientResult<()> {
        let value = value.into();
        let member = &mut self
            .drafts
            .get_mut(index)
            .ok_or_else(|| ClientError::no_record(index))?
            .member;
        match field {
            BoardField::Name => member.name = value,
            BoardField::Position => member.position = value,
            BoardField::Description => member.description = value,
            BoardField::ImageUrl => member.image_url = value,
            BoardField::Initial => member.initial = normalize_initial(&value),
            BoardField::Sequence => member.sequence = parse_sequence(&value)?,
            BoardField::LinkedIn => member.linkedin = optional_text(value),
            BoardField::Instagram => member.instagram = optional_text(value),
            BoardField::Email => member.email = optional_text(value),
        }
        Ok(())
    }

    /// Validates and keeps a photo for the member; a rejected file leaves the
    /// draft untouched.
    pub fn select_photo(&mut self, index: usize, file: PendingUpload) -> ClientResult<()> {
        file.check(UploadKind::BoardPhoto, &self.limits)?;
        let draft = self
            .drafts
            .get_mut(index)
            .ok_or_else(|| ClientError::no_record(index))?;
        draft.pending_photo = Some(file);
        Ok(())
    }

    /// Drops both the stored photo URL and any photo waiting to be uploaded.
    pub fn clear_photo(&mut self, index: usize) -> ClientResult<()> {
        let draft = self
            .drafts
            .get_mut(index)
            .ok_or_else(|| ClientError::no_record(index))?;
        draft.member.image_url.clear();
        draft.pending_photo = None;
        Ok(())
    }

    /// Unsaved members are dropped locally. Saved members are removed from the
    /// list only once the site confirms the delete.
    pub async fn delete(&mut self, index: usize) -> ClientResult<()> {
        let draft = self
            .drafts
            .get(index)
            .ok_or_else(|| ClientError::no_record(index))?;
        if let Some(id) = draft.member.id {
            self.backend.delete_board_member(id).await?;
            info!(member_id = id.0, "board editor: member deleted");
        }
        self.drafts.remove(index);
        Ok(())
    }

    /// Uploads pending photos, then saves the whole list and adopts the rows
    /// the site returns, including freshly assigned ids.
    pub async fn save_all(&mut self) -> ClientResult<()> {
        for draft in &mut self.drafts {
            if let Some(file) = &draft.pending_photo {
                file.check(UploadKind::BoardPhoto, &self.limits)?;
                draft.member.image_url = self.backend.upload_board_photo(file).await?;
                draft.pending_photo = None;
            }
        }

        let members: Vec<BoardMember> = self.members().cloned().collect();
        let saved = self.backend.save_board_members(&members).await?;
        info!(count = saved.len(), "board editor: members saved");

        if saved.len() == self.drafts.len() {
            for (draft, member) in self.drafts.iter_mut().zip(saved) {
                draft.member = member;
            }
        } else {
            self.replace_all(saved);
        }
        Ok(())
    }

    fn replace_all(&mut self, members: Vec<BoardMember>) {
        self.drafts = members
            .into_iter()
            .map(|member| BoardDraft {
                key: self.keys.next(),
                member,
                pending_photo: None,
            })
            .collect();
    }
}
