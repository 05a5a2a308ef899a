//! Admin-side and public-side client of the club site: an HTTP backend, the
//! form controllers the admin panel drives, and the public snapshot.

pub mod backend;
pub mod editors;
pub mod error;
pub mod gate;
pub mod notice;
pub mod public;

pub use backend::{ClientResult, HttpBackend, PendingUpload, SiteBackend};
pub use editors::{
    BoardEditor, BoardField, EventField, EventsEditor, HeroEditor, HeroField, QuickEditor,
    QuickForm,
};
pub use error::ClientError;
pub use gate::AdminGate;
pub use notice::{Notice, NoticeKind};
pub use public::{gallery_sections, GallerySection, SiteSnapshot};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
