//! Read-only view of the site as the public pages render it.

use chrono::{DateTime, Utc};
use shared::{
    calendar::{partition, EventPartition},
    domain::{BoardMember, EventRecord, HeroContent, ProjectRecord, QuickItem, QuickSection},
};
use tracing::info;

use crate::backend::{ClientResult, SiteBackend};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GallerySection {
    pub section: QuickSection,
    pub items: Vec<QuickItem>,
}

/// Groups gallery items in the fixed section order, each section sorted by
/// sequence. Sections without items are left out.
pub fn gallery_sections(items: &[QuickItem]) -> Vec<GallerySection> {
    QuickSection::ALL
        .into_iter()
        .filter_map(|section| {
            let mut section_items: Vec<QuickItem> = items
                .iter()
                .filter(|item| item.section == section)
                .cloned()
                .collect();
            if section_items.is_empty() {
                return None;
            }
            section_items.sort_by_key(|item| item.sequence);
            Some(GallerySection {
                section,
                items: section_items,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteSnapshot {
    pub hero: HeroContent,
    pub board: Vec<BoardMember>,
    pub projects: Vec<ProjectRecord>,
    pub events: Vec<EventRecord>,
    pub gallery: Vec<QuickItem>,
}

impl SiteSnapshot {
    pub async fn fetch(backend: &dyn SiteBackend) -> ClientResult<Self> {
        let hero = backend.get_hero().await?;
        let mut board = backend.list_board_members().await?;
        board.sort_by_key(|member| member.sequence);
        let projects = backend.list_projects().await?;
        let events = backend.list_events().await?;
        let gallery = backend.list_quick_items().await?;
        info!(
            board = board.len(),
            projects = projects.len(),
            events = events.len(),
            gallery = gallery.len(),
            "public: snapshot fetched"
        );
        Ok(Self {
            hero,
            board,
            projects,
            events,
            gallery,
        })
    }

    pub fn events_at(&self, now: DateTime<Utc>) -> EventPartition {
        partition(&self.events, now)
    }

    pub fn gallery_sections(&self) -> Vec<GallerySection> {
        gallery_sections(&self.gallery)
    }
}

#[cfg(test)]
#[path = "tests/public_tests.rs"]
mod tests;
